//! Effect modes and the transition lifecycle
//!
//! Tick behavior is fully determined by the `(EffectMode, EffectPhase)`
//! pair. [`tick_action`] enumerates every combination.

mod crossfade;
mod hue_cycle;

pub use crossfade::{Crossfade, calculate_step, calculate_val};
pub use hue_cycle::HueCycle;

const EFFECT_NAME_NONE: &str = "none";
const EFFECT_NAME_FADE: &str = "fade";
const EFFECT_NAME_FAST: &str = "fast";
const EFFECT_NAME_SLOW: &str = "slow";

/// Animation mode requested by the user
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectMode {
    /// Apply colors immediately
    None,
    /// One bounded crossfade to the target, then stop
    Fade,
    /// Endless hue rotation, fast
    FastCycle,
    /// Endless hue rotation, slow
    SlowCycle,
}

impl EffectMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => EFFECT_NAME_NONE,
            Self::Fade => EFFECT_NAME_FADE,
            Self::FastCycle => EFFECT_NAME_FAST,
            Self::SlowCycle => EFFECT_NAME_SLOW,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_NONE => Some(Self::None),
            EFFECT_NAME_FADE => Some(Self::Fade),
            EFFECT_NAME_FAST => Some(Self::FastCycle),
            EFFECT_NAME_SLOW => Some(Self::SlowCycle),
            _ => None,
        }
    }

    /// Check if the mode rotates hue indefinitely
    pub const fn is_cycle(self) -> bool {
        matches!(self, Self::FastCycle | Self::SlowCycle)
    }
}

/// Transition lifecycle, independent of the mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectPhase {
    /// Idle
    Done,
    /// A transition was requested, steps not computed yet
    StartFade,
    /// Steps computed, ticking
    DoFade,
}

/// What a tick does for a given mode and phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickAction {
    /// Nothing to do
    Idle,
    /// Copy target to current and stop
    ApplyImmediately,
    /// Compute step rates, then run the first crossfade step
    StartCrossfade,
    /// Advance the running crossfade by one step
    Crossfade,
    /// Rotate hue by one unit
    AdvanceHue,
}

/// Transition table for the `(mode, phase)` state machine
pub const fn tick_action(mode: EffectMode, phase: EffectPhase) -> TickAction {
    match (mode, phase) {
        (EffectMode::None, EffectPhase::Done) => TickAction::Idle,
        // None never ramps; anything pending lands at once
        (EffectMode::None, EffectPhase::StartFade | EffectPhase::DoFade) => {
            TickAction::ApplyImmediately
        }
        (EffectMode::Fade, EffectPhase::Done) => TickAction::Idle,
        (EffectMode::Fade, EffectPhase::StartFade) => TickAction::StartCrossfade,
        (EffectMode::Fade, EffectPhase::DoFade) => TickAction::Crossfade,
        (EffectMode::FastCycle | EffectMode::SlowCycle, EffectPhase::Done) => TickAction::Idle,
        (
            EffectMode::FastCycle | EffectMode::SlowCycle,
            EffectPhase::StartFade | EffectPhase::DoFade,
        ) => TickAction::AdvanceHue,
    }
}
