//! Rainbow HSV to RGB conversion (ported from `FastLED` `hsv2rgb_rainbow`)
//!
//! Unlike a plain spectrum conversion, the wheel is split into eight
//! sections with a widened yellow band, so equal hue steps look evenly
//! spaced on real LEDs. Saturation and value go through the quadratic
//! `scale8_video` dimming curve.

use crate::{
    color::{Hsv, Rgb},
    math8::{scale8, scale8_video},
};

const K255: u8 = 255;
const K171: u8 = 171;
const K170: u8 = 170;
const K85: u8 = 85;

/// Fully saturated, full value rainbow color for a hue
///
/// At least one channel of the result is always zero.
pub(crate) fn rainbow_hue(hue: u8) -> Rgb {
    let offset8 = (hue & 0x1F) << 3;
    let third = scale8(offset8, 85);
    let two_thirds = scale8(offset8, 170);

    let (r, g, b) = match hue >> 5 {
        // Red -> Orange
        0 => (K255 - third, third, 0),
        // Orange -> Yellow
        1 => (K171, K85 + third, 0),
        // Yellow -> Green
        2 => (K171 - two_thirds, K170 + third, 0),
        // Green -> Aqua
        3 => (0, K255 - third, third),
        // Aqua -> Blue
        4 => (0, K171 - two_thirds, K85 + two_thirds),
        // Blue -> Purple
        5 => (third, 0, K255 - third),
        // Purple -> Pink
        6 => (K85 + third, 0, K171 - third),
        // Pink -> Red
        _ => (K170 + third, 0, K85 - third),
    };

    Rgb { r, g, b }
}

/// Convert a rainbow HSV color to RGB (all channels are 0-255)
pub fn hsv2rgb_rainbow(hsv: Hsv) -> Rgb {
    let mut color = rainbow_hue(hsv.hue);

    if hsv.sat != 255 {
        if hsv.sat == 0 {
            color = Rgb {
                r: 255,
                g: 255,
                b: 255,
            };
        } else {
            let mut desat = 255 - hsv.sat;
            desat = scale8_video(desat, desat);
            let sat_scale = 255 - desat;
            color.r = scale8(color.r, sat_scale).saturating_add(desat);
            color.g = scale8(color.g, sat_scale).saturating_add(desat);
            color.b = scale8(color.b, sat_scale).saturating_add(desat);
        }
    }

    if hsv.val != 255 {
        let val = scale8_video(hsv.val, hsv.val);
        if val == 0 {
            return Rgb { r: 0, g: 0, b: 0 };
        }
        color.r = scale8(color.r, val);
        color.g = scale8(color.g, val);
        color.b = scale8(color.b, val);
    }

    color
}
