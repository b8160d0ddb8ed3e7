use crate::color::{Hsv, Rgb, rainbow_hue};

/// Convert RGB to rainbow HSV (all channels are 0-255).
///
/// Approximate inverse of [`hsv2rgb_rainbow`](super::hsv2rgb_rainbow):
/// the hue is the rainbow hue whose pure color has the same shape once the
/// white floor is removed, saturation and value undo the `scale8_video`
/// curves. Colors outside the rainbow gamut (e.g. full yellow) come back
/// dimmer.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rgb2hsv(rgb: Rgb) -> Hsv {
    let max = rgb.r.max(rgb.g).max(rgb.b);
    let min = rgb.r.min(rgb.g).min(rgb.b);

    if max == 0 {
        return Hsv {
            hue: 0,
            sat: 0,
            val: 0,
        };
    }
    if max == min {
        // Grey: hsv2rgb_rainbow renders sat 0 as white scaled by value
        return Hsv {
            hue: 0,
            sat: 0,
            val: unscale_video(f32::from(max)),
        };
    }

    let hue = nearest_rainbow_hue(rgb, min, max);
    let pure = rainbow_hue(hue);
    let pure_max = f32::from(pure.r.max(pure.g).max(pure.b));

    // out = (pure * sat_scale / 256 + desat) * brightness / 256
    let chroma = f32::from(max - min) * 256.0 / pure_max;
    let floor = f32::from(min);
    let brightness = ((chroma + floor) * 256.0 / 255.0).min(256.0);
    let desat = (floor * 255.0 / (chroma + floor)).min(255.0);

    Hsv {
        hue,
        sat: 255 - unscale_video(desat),
        val: unscale_video(brightness).max(1),
    }
}

/// Invert `scale8_video(x, x)`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unscale_video(scaled: f32) -> u8 {
    if scaled < 0.5 {
        return 0;
    }
    let x = libm::sqrtf((scaled - 1.0).max(0.0) * 256.0);
    libm::roundf(x).clamp(1.0, 255.0) as u8
}

/// Find the rainbow hue closest in shape to `rgb`
fn nearest_rainbow_hue(rgb: Rgb, min: u8, max: u8) -> u8 {
    let span = f32::from(max - min);
    let shape = [
        f32::from(rgb.r - min) / span,
        f32::from(rgb.g - min) / span,
        f32::from(rgb.b - min) / span,
    ];

    let mut best_hue = 0;
    let mut best_distance = f32::MAX;
    for hue in 0..=u8::MAX {
        let pure = rainbow_hue(hue);
        let pure_max = f32::from(pure.r.max(pure.g).max(pure.b));
        let distance = libm::fabsf(shape[0] - f32::from(pure.r) / pure_max)
            + libm::fabsf(shape[1] - f32::from(pure.g) / pure_max)
            + libm::fabsf(shape[2] - f32::from(pure.b) / pure_max);
        if distance < best_distance {
            best_distance = distance;
            best_hue = hue;
        }
    }
    best_hue
}
