//! Settable properties, parsed commands and outbound feedback
//!
//! The transport delivers property writes as `(name, text)` pairs. They are
//! parsed into [`Command`]s before they reach the engine, and the engine
//! answers with [`Feedback`] values rendered back to text.

use core::fmt::Write;

use embassy_time::Duration;
use heapless::{String, Vec};

use crate::color::{HsvPercent, MAX_HUE_DEGREES, RgbPercent};
use crate::effect::EffectMode;
use crate::levels::{ColorChannel, MAX_LEVEL};
use crate::parse::{ParseError, clamp_component, parse_integer, parse_percent, parse_triple};

/// Longest accepted transition time, in milliseconds
pub const MAX_TRANSITION_MS: u32 = 600_000;

/// Capacity of a rendered feedback value
pub const FEEDBACK_VALUE_LEN: usize = 16;

/// Most feedback values a single command produces (mode echo + landed color)
pub const MAX_FEEDBACK_PER_COMMAND: usize = 2;

/// Feedback produced by one command, in publishing order
pub type FeedbackList = Vec<Feedback, MAX_FEEDBACK_PER_COMMAND>;

const PROPERTY_NAME_EFFECT: &str = "effect";
const PROPERTY_NAME_EFFECT_MODE: &str = "effectMode";
const PROPERTY_NAME_SPEED: &str = "speed";
const PROPERTY_NAME_HSV: &str = "hsv";
const PROPERTY_NAME_RGB: &str = "rgb";

/// Settable property of the dimmer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Property {
    /// Animation mode keyword
    Effect,
    /// Transition time in milliseconds
    Speed,
    /// `H,S,V` color
    Hsv,
    /// `R,G,B` color
    Rgb,
    /// Single channel level
    Level(ColorChannel),
}

impl Property {
    /// All settable properties, in advertising order
    pub const ALL: [Self; 9] = [
        Self::Effect,
        Self::Speed,
        Self::Hsv,
        Self::Rgb,
        Self::Level(ColorChannel::Red),
        Self::Level(ColorChannel::Green),
        Self::Level(ColorChannel::Blue),
        Self::Level(ColorChannel::White1),
        Self::Level(ColorChannel::White2),
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Effect => PROPERTY_NAME_EFFECT,
            Self::Speed => PROPERTY_NAME_SPEED,
            Self::Hsv => PROPERTY_NAME_HSV,
            Self::Rgb => PROPERTY_NAME_RGB,
            Self::Level(channel) => channel.as_str(),
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            PROPERTY_NAME_EFFECT | PROPERTY_NAME_EFFECT_MODE => Some(Self::Effect),
            PROPERTY_NAME_SPEED => Some(Self::Speed),
            PROPERTY_NAME_HSV => Some(Self::Hsv),
            PROPERTY_NAME_RGB => Some(Self::Rgb),
            _ => ColorChannel::parse_from_str(s).map(Self::Level),
        }
    }
}

/// Validated request to change the dimmer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Switch animation mode
    SetMode(EffectMode),
    /// Change the transition time
    SetSpeed(Duration),
    /// Fade the color channels to an HSV color
    SetHsv(HsvPercent),
    /// Fade the color channels to an RGB color
    SetRgb(RgbPercent),
    /// Set one channel; color channels fade, white channels jump
    SetLevel(ColorChannel, u8),
}

impl Command {
    /// Parse a property write by property name
    pub fn parse_write(property: &str, value: &str) -> Result<Self, ParseError> {
        let property = Property::parse_from_str(property).ok_or(ParseError::UnknownProperty)?;
        Self::parse(property, value)
    }

    /// Parse the text value of a property write
    ///
    /// Numbers are clamped into range; only malformed triples and unknown
    /// mode keywords are rejected.
    #[allow(clippy::cast_possible_truncation)]
    pub fn parse(property: Property, value: &str) -> Result<Self, ParseError> {
        let command = match property {
            Property::Effect => {
                let mode =
                    EffectMode::parse_from_str(value.trim()).ok_or(ParseError::UnknownMode)?;
                Self::SetMode(mode)
            }
            Property::Speed => {
                let ms = parse_integer(value, MAX_TRANSITION_MS);
                Self::SetSpeed(Duration::from_millis(u64::from(ms)))
            }
            Property::Hsv => {
                let (h, s, v) = parse_triple(value)?;
                Self::SetHsv(HsvPercent::new(
                    clamp_component(h, MAX_HUE_DEGREES),
                    clamp_component(s, MAX_LEVEL.into()) as u8,
                    clamp_component(v, MAX_LEVEL.into()) as u8,
                ))
            }
            Property::Rgb => {
                let (r, g, b) = parse_triple(value)?;
                Self::SetRgb(RgbPercent::new(
                    clamp_component(r, MAX_LEVEL.into()) as u8,
                    clamp_component(g, MAX_LEVEL.into()) as u8,
                    clamp_component(b, MAX_LEVEL.into()) as u8,
                ))
            }
            Property::Level(channel) => Self::SetLevel(channel, parse_percent(value)),
        };
        Ok(command)
    }
}

/// Value reported back to the transport
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    /// Resolved color after a fade or an immediate apply
    Rgb(RgbPercent),
    /// Resolved mode after a mode change
    Mode(EffectMode),
    /// Directly set channel level
    Level(ColorChannel, u8),
    /// Resolved transition time
    Speed(Duration),
}

impl Feedback {
    /// Property the feedback is published on
    pub const fn property(&self) -> Property {
        match self {
            Self::Rgb(_) => Property::Rgb,
            Self::Mode(_) => Property::Effect,
            Self::Level(channel, _) => Property::Level(*channel),
            Self::Speed(_) => Property::Speed,
        }
    }

    /// Render the value as text, e.g. `50,0,0` or `fade`
    pub fn value(&self) -> String<FEEDBACK_VALUE_LEN> {
        let mut text = String::new();
        // Every rendering fits FEEDBACK_VALUE_LEN ("100,100,100", "600000")
        let _ = match self {
            Self::Rgb(color) => write!(text, "{color}"),
            Self::Mode(mode) => text.write_str(mode.as_str()),
            Self::Level(_, level) => write!(text, "{level}"),
            Self::Speed(duration) => write!(text, "{}", duration.as_millis()),
        };
        text
    }
}
