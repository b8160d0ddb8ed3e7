//! Output channels of the dimmer and their per-channel levels

use core::ops::Index;

use crate::color::RgbPercent;

/// Highest channel level (percent of full brightness)
pub const MAX_LEVEL: u8 = 100;

/// Number of output channels
pub const CHANNEL_COUNT: usize = 5;

const CHANNEL_NAME_RED: &str = "red";
const CHANNEL_NAME_GREEN: &str = "green";
const CHANNEL_NAME_BLUE: &str = "blue";
const CHANNEL_NAME_WHITE1: &str = "white1";
const CHANNEL_NAME_WHITE2: &str = "white2";

/// Output channel of an RGBWW dimmer, in hardware order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorChannel {
    Red = 0,
    Green = 1,
    Blue = 2,
    White1 = 3,
    White2 = 4,
}

impl ColorChannel {
    /// All channels in hardware order
    pub const ALL: [Self; CHANNEL_COUNT] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::White1,
        Self::White2,
    ];

    /// The three color channels
    pub const RGB: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_white(self) -> bool {
        matches!(self, Self::White1 | Self::White2)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => CHANNEL_NAME_RED,
            Self::Green => CHANNEL_NAME_GREEN,
            Self::Blue => CHANNEL_NAME_BLUE,
            Self::White1 => CHANNEL_NAME_WHITE1,
            Self::White2 => CHANNEL_NAME_WHITE2,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            CHANNEL_NAME_RED => Some(Self::Red),
            CHANNEL_NAME_GREEN => Some(Self::Green),
            CHANNEL_NAME_BLUE => Some(Self::Blue),
            CHANNEL_NAME_WHITE1 => Some(Self::White1),
            CHANNEL_NAME_WHITE2 => Some(Self::White2),
            _ => None,
        }
    }
}

/// One level (0-100 %) per channel
///
/// Only indexable by [`ColorChannel`]. Writes through [`ChannelLevels::set`]
/// are clamped to [`MAX_LEVEL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelLevels([u8; CHANNEL_COUNT]);

impl ChannelLevels {
    /// All channels at the same level
    pub const fn uniform(level: u8) -> Self {
        let level = if level > MAX_LEVEL { MAX_LEVEL } else { level };
        Self([level; CHANNEL_COUNT])
    }

    pub fn get(&self, channel: ColorChannel) -> u8 {
        self.0[channel.index()]
    }

    pub fn set(&mut self, channel: ColorChannel, level: u8) {
        self.0[channel.index()] = level.min(MAX_LEVEL);
    }

    /// The color channels as percent RGB
    pub fn rgb(&self) -> RgbPercent {
        RgbPercent::new(
            self.get(ColorChannel::Red),
            self.get(ColorChannel::Green),
            self.get(ColorChannel::Blue),
        )
    }

    /// Replace the color channels, leaving the white channels untouched
    pub fn set_rgb(&mut self, color: RgbPercent) {
        self.set(ColorChannel::Red, color.r);
        self.set(ColorChannel::Green, color.g);
        self.set(ColorChannel::Blue, color.b);
    }

    /// Iterate over `(channel, level)` pairs in hardware order
    pub fn iter(&self) -> impl Iterator<Item = (ColorChannel, u8)> + '_ {
        ColorChannel::ALL
            .into_iter()
            .map(move |channel| (channel, self.get(channel)))
    }
}

impl Default for ChannelLevels {
    fn default() -> Self {
        Self::uniform(0)
    }
}

impl Index<ColorChannel> for ChannelLevels {
    type Output = u8;

    fn index(&self, channel: ColorChannel) -> &Self::Output {
        &self.0[channel.index()]
    }
}
