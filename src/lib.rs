#![no_std]

pub mod color;
pub mod command;
pub mod controller;
pub mod effect;
pub mod engine;
pub mod gamma;
pub mod levels;
pub mod math8;
pub mod parse;
pub mod queue;
pub mod timing;

pub use command::{Command, Feedback, FeedbackList, Property};
pub use controller::{Controller, PollResult};
pub use engine::{Dimmer, DimmerConfig, DimmerState, StepCounts};
pub use effect::{EffectMode, EffectPhase};
pub use gamma::GammaTable;
pub use levels::{ChannelLevels, ColorChannel};
pub use parse::ParseError;
pub use queue::{CommandQueue, CommandReceiver, CommandSender};

pub use color::{Hsv, HsvPercent, Rgb, RgbPercent};
pub use embassy_time::{Duration, Instant};

/// Abstract PWM output trait
///
/// Implement this trait to support different hardware platforms.
/// The dimmer is generic over this trait.
pub trait OutputDriver {
    /// Set the duty cycle of one output channel
    fn set_channel(&mut self, channel: ColorChannel, duty: u16);
}

/// Receiver of values reported back to the transport
pub trait FeedbackSink {
    /// Publish a property value, e.g. `("rgb", "50,0,0")`
    fn publish(&mut self, property: &str, value: &str);
}
