//! Percent based color units used at the engine boundary
//!
//! RGB channels are 0-100 %, HSV is 0-360° / 0-100 % / 0-100 %.
//! Conversion goes through the byte based rainbow transform.

use core::fmt;

use crate::{
    color::{Hsv, Rgb, hsv2rgb_rainbow, rgb2hsv},
    math8::{percent_to_u8, u8_to_percent},
};

/// Highest accepted hue in degrees
pub const MAX_HUE_DEGREES: u16 = 360;

/// RGB color with every channel in percent (0-100)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RgbPercent {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbPercent {
    /// Create a color, clamping each channel to 100
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: clamp_percent(r),
            g: clamp_percent(g),
            b: clamp_percent(b),
        }
    }

    /// Expand to the full byte range
    pub const fn to_rgb(self) -> Rgb {
        Rgb {
            r: percent_to_u8(self.r),
            g: percent_to_u8(self.g),
            b: percent_to_u8(self.b),
        }
    }

    /// Reduce a byte range color to percent
    pub const fn from_rgb(rgb: Rgb) -> Self {
        Self {
            r: u8_to_percent(rgb.r),
            g: u8_to_percent(rgb.g),
            b: u8_to_percent(rgb.b),
        }
    }
}

/// Formats as `R,G,B`
impl fmt::Display for RgbPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// HSV color in boundary units: hue in degrees, saturation and value in percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HsvPercent {
    pub hue: u16,
    pub sat: u8,
    pub val: u8,
}

impl HsvPercent {
    /// Create a color, clamping hue to 360 and the rest to 100
    pub const fn new(hue: u16, sat: u8, val: u8) -> Self {
        Self {
            hue: if hue > MAX_HUE_DEGREES {
                MAX_HUE_DEGREES
            } else {
                hue
            },
            sat: clamp_percent(sat),
            val: clamp_percent(val),
        }
    }

    /// Convert to the internal 0-255 representation
    ///
    /// 360° wraps to hue 0.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn to_hsv(self) -> Hsv {
        let degrees = (self.hue % MAX_HUE_DEGREES) as u32;
        Hsv {
            hue: ((degrees * 256 + 180) / 360) as u8,
            sat: percent_to_u8(self.sat),
            val: percent_to_u8(self.val),
        }
    }

    /// Convert from the internal 0-255 representation
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_hsv(hsv: Hsv) -> Self {
        Self {
            hue: ((hsv.hue as u32 * 360 + 128) / 256) as u16,
            sat: u8_to_percent(hsv.sat),
            val: u8_to_percent(hsv.val),
        }
    }
}

/// Formats as `H,S,V`
impl fmt::Display for HsvPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.hue, self.sat, self.val)
    }
}

/// Convert a boundary HSV color to percent RGB through the rainbow transform
pub fn hsv_to_rgb_percent(hsv: HsvPercent) -> RgbPercent {
    RgbPercent::from_rgb(hsv2rgb_rainbow(hsv.to_hsv()))
}

/// Approximate inverse of [`hsv_to_rgb_percent`]
pub fn rgb_percent_to_hsv(rgb: RgbPercent) -> HsvPercent {
    HsvPercent::from_hsv(rgb2hsv(rgb.to_rgb()))
}

const fn clamp_percent(value: u8) -> u8 {
    if value > 100 { 100 } else { value }
}
