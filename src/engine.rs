use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::color::{Hsv, hsv_to_rgb_percent, rgb2hsv};
use crate::command::{Command, Feedback, FeedbackList};
use crate::effect::{Crossfade, EffectMode, EffectPhase, HueCycle, TickAction, tick_action};
use crate::gamma::GammaTable;
use crate::levels::{ChannelLevels, ColorChannel};
use crate::timing::TransitionTiming;

/// Default transition time
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(5000);

/// Default level of every channel at power-up
pub const DEFAULT_IDLE_LEVEL: u8 = 60;

/// Default number of ticks in one crossfade
pub const DEFAULT_FADE_STEPS: u16 = 400;

/// Default number of ticks per transition in fast cycling
pub const DEFAULT_FAST_CYCLE_STEPS: u16 = 100;

/// Default number of ticks per transition in slow cycling
pub const DEFAULT_SLOW_CYCLE_STEPS: u16 = 2000;

/// Number of ticks a transition is split into, per mode
#[derive(Debug, Clone, Copy)]
pub struct StepCounts {
    /// Crossfade step budget
    pub fade: u16,
    /// Hue steps per transition in fast cycling
    pub fast_cycle: u16,
    /// Hue steps per transition in slow cycling
    pub slow_cycle: u16,
}

impl StepCounts {
    /// Step count that sets the tick wait for a mode
    pub const fn for_mode(&self, mode: EffectMode) -> u16 {
        match mode {
            EffectMode::None | EffectMode::Fade => self.fade,
            EffectMode::FastCycle => self.fast_cycle,
            EffectMode::SlowCycle => self.slow_cycle,
        }
    }
}

impl Default for StepCounts {
    fn default() -> Self {
        Self {
            fade: DEFAULT_FADE_STEPS,
            fast_cycle: DEFAULT_FAST_CYCLE_STEPS,
            slow_cycle: DEFAULT_SLOW_CYCLE_STEPS,
        }
    }
}

/// Configuration for the dimmer
#[derive(Debug, Clone)]
pub struct DimmerConfig {
    pub mode: EffectMode,
    pub transition: Duration,
    pub idle_level: u8,
    pub steps: StepCounts,
    pub gamma: GammaTable,
}

impl Default for DimmerConfig {
    fn default() -> Self {
        Self {
            mode: EffectMode::Fade,
            transition: DEFAULT_TRANSITION,
            idle_level: DEFAULT_IDLE_LEVEL,
            steps: StepCounts::default(),
            gamma: GammaTable::default(),
        }
    }
}

/// Current and target level of every channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimmerState {
    pub current: ChannelLevels,
    pub target: ChannelLevels,
}

/// Dimmer effect engine - the main orchestrator
///
/// Owns the channel state and the output driver. Commands and ticks must
/// come from the same thread of control.
pub struct Dimmer<D: OutputDriver> {
    // External dependencies and configuration
    driver: D,
    gamma: GammaTable,
    steps: StepCounts,

    // Internal state
    state: DimmerState,
    mode: EffectMode,
    phase: EffectPhase,
    timing: TransitionTiming,
    crossfade: Crossfade,
    cycle: HueCycle,
}

impl<D: OutputDriver> Dimmer<D> {
    /// Create a new dimmer and drive every channel to the idle level
    pub fn new(driver: D, config: &DimmerConfig) -> Self {
        let levels = ChannelLevels::uniform(config.idle_level);
        let mode = config.mode;
        let mut dimmer = Self {
            driver,
            gamma: config.gamma,
            steps: config.steps,
            state: DimmerState {
                current: levels,
                target: levels,
            },
            mode,
            phase: if mode.is_cycle() {
                EffectPhase::DoFade
            } else {
                EffectPhase::Done
            },
            timing: TransitionTiming::new(config.transition, config.steps.for_mode(mode)),
            crossfade: Crossfade::idle(),
            cycle: HueCycle::new(rgb2hsv(levels.rgb().to_rgb())),
        };
        dimmer.write_all();
        dimmer
    }

    /// Apply a validated command
    ///
    /// A new color or mode supersedes any transition in progress. Returns
    /// the values to publish; a mode change that lands a color reports the
    /// mode first and the color second.
    pub fn handle(&mut self, command: Command) -> FeedbackList {
        #[cfg(feature = "esp32-log")]
        println!("[Dimmer.handle] {:?}", command);

        let (first, second) = match command {
            Command::SetMode(mode) => (Some(Feedback::Mode(mode)), self.set_mode(mode)),
            Command::SetSpeed(transition) => {
                self.timing
                    .set_transition(transition, self.steps.for_mode(self.mode));
                (Some(Feedback::Speed(transition)), None)
            }
            Command::SetHsv(hsv) => {
                self.state.target.set_rgb(hsv_to_rgb_percent(hsv));
                self.cycle.set_base(hsv.to_hsv());
                (self.start_transition(), None)
            }
            Command::SetRgb(color) => {
                self.state.target.set_rgb(color);
                self.cycle.set_base(rgb2hsv(color.to_rgb()));
                (self.start_transition(), None)
            }
            Command::SetLevel(channel, level) if channel.is_white() => {
                self.state.target.set(channel, level);
                self.state.current.set(channel, level);
                self.write(channel);
                (Some(Feedback::Level(channel, self.state.current[channel])), None)
            }
            Command::SetLevel(channel, level) => {
                self.state.target.set(channel, level);
                self.cycle
                    .set_base(rgb2hsv(self.state.target.rgb().to_rgb()));
                (self.start_transition(), None)
            }
        };

        let mut feedback = FeedbackList::new();
        for reply in [first, second].into_iter().flatten() {
            // At most MAX_FEEDBACK_PER_COMMAND values per command
            let _ = feedback.push(reply);
        }
        feedback
    }

    /// Run one engine step
    ///
    /// Call this continuously; ticks are throttled internally. Returns the
    /// resolved color when a fade completes.
    pub fn tick(&mut self, now: Instant) -> Option<Feedback> {
        match tick_action(self.mode, self.phase) {
            TickAction::Idle => None,
            TickAction::ApplyImmediately => Some(self.apply_immediately()),
            TickAction::StartCrossfade => {
                self.crossfade = Crossfade::start(
                    &self.state.current,
                    &self.state.target,
                    self.steps.fade,
                );
                self.phase = EffectPhase::DoFade;
                self.timing.reset();

                #[cfg(feature = "esp32-log")]
                println!(
                    "[Dimmer.tick] crossfade {:?} -> {:?}, wait {}ms",
                    self.state.current,
                    self.state.target,
                    self.timing.wait().as_millis()
                );

                self.crossfade_tick(now)
            }
            TickAction::Crossfade => self.crossfade_tick(now),
            TickAction::AdvanceHue => {
                if self.timing.is_due(now) {
                    self.timing.mark(now);
                    let color = self.cycle.advance();
                    self.state.current.set_rgb(color);
                    self.state.target.set_rgb(color);
                    self.write_all();
                }
                None
            }
        }
    }

    /// Time until the next tick does any work
    ///
    /// Returns `None` while idle.
    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        match tick_action(self.mode, self.phase) {
            TickAction::Idle => None,
            TickAction::ApplyImmediately | TickAction::StartCrossfade => {
                Some(Duration::from_millis(0))
            }
            TickAction::Crossfade | TickAction::AdvanceHue => {
                Some(self.timing.time_until_due(now))
            }
        }
    }

    pub const fn mode(&self) -> EffectMode {
        self.mode
    }

    pub const fn phase(&self) -> EffectPhase {
        self.phase
    }

    pub const fn state(&self) -> &DimmerState {
        &self.state
    }

    pub const fn current(&self) -> &ChannelLevels {
        &self.state.current
    }

    pub const fn target(&self) -> &ChannelLevels {
        &self.state.target
    }

    /// Last resolved HSV color, the base for hue cycling
    pub const fn hsv(&self) -> Hsv {
        self.cycle.hsv()
    }

    pub const fn timing(&self) -> &TransitionTiming {
        &self.timing
    }

    pub const fn crossfade(&self) -> &Crossfade {
        &self.crossfade
    }

    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Switch mode, superseding the running transition
    ///
    /// Returns the resolved color when the switch lands it without a ramp.
    fn set_mode(&mut self, mode: EffectMode) -> Option<Feedback> {
        #[cfg(feature = "esp32-log")]
        println!("[Dimmer.set_mode] {} -> {}", self.mode.as_str(), mode.as_str());

        self.mode = mode;
        self.timing.set_steps(self.steps.for_mode(mode));
        self.timing.reset();

        match mode {
            EffectMode::None | EffectMode::Fade => self.start_transition(),
            EffectMode::FastCycle | EffectMode::SlowCycle => {
                self.phase = EffectPhase::DoFade;
                None
            }
        }
    }

    /// Begin moving towards a new target according to the mode
    fn start_transition(&mut self) -> Option<Feedback> {
        match self.mode {
            EffectMode::None => Some(self.apply_immediately()),
            EffectMode::Fade if self.timing.transition().as_millis() == 0 => {
                Some(self.apply_immediately())
            }
            EffectMode::Fade => {
                self.phase = EffectPhase::StartFade;
                None
            }
            // Cycling picks the new base up on its next tick
            EffectMode::FastCycle | EffectMode::SlowCycle => None,
        }
    }

    /// Jump to the target without a ramp
    fn apply_immediately(&mut self) -> Feedback {
        self.state.current = self.state.target;
        self.crossfade = Crossfade::idle();
        self.phase = EffectPhase::Done;
        self.write_all();
        Feedback::Rgb(self.state.current.rgb())
    }

    fn crossfade_tick(&mut self, now: Instant) -> Option<Feedback> {
        if !self.timing.is_due(now) {
            return None;
        }
        self.timing.mark(now);

        let complete = self
            .crossfade
            .advance(&mut self.state.current, &self.state.target);
        self.write_all();

        if !complete {
            return None;
        }

        #[cfg(feature = "esp32-log")]
        println!("[Dimmer.tick] crossfade done at {:?}", self.state.current);

        self.phase = EffectPhase::Done;
        Some(Feedback::Rgb(self.state.current.rgb()))
    }

    fn write(&mut self, channel: ColorChannel) {
        let duty = self.gamma.correct(self.state.current[channel]);
        self.driver.set_channel(channel, duty);
    }

    fn write_all(&mut self) {
        let Self {
            driver,
            gamma,
            state,
            ..
        } = self;
        for (channel, level) in state.current.iter() {
            driver.set_channel(channel, gamma.correct(level));
        }
    }
}
