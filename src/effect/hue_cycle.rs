//! Color wheel cycling
//!
//! Rotates the hue of a base color by one unit per tick. The derived color
//! is applied directly, without a crossfade.

use core::fmt;

use crate::color::{Hsv, RgbPercent, hsv2rgb_rainbow};

const HUE_STEP: u8 = 1;

/// Hue rotation around a base color
#[derive(Clone, Copy)]
pub struct HueCycle {
    hsv: Hsv,
}

impl HueCycle {
    pub const fn new(hsv: Hsv) -> Self {
        Self { hsv }
    }

    /// Last resolved color
    pub const fn hsv(&self) -> Hsv {
        self.hsv
    }

    /// Replace the base color; the next tick continues from its hue
    pub fn set_base(&mut self, hsv: Hsv) {
        self.hsv = hsv;
    }

    /// Rotate hue by one unit (wrapping) and return the new color
    pub fn advance(&mut self) -> RgbPercent {
        self.hsv.hue = self.hsv.hue.wrapping_add(HUE_STEP);
        self.color()
    }

    /// Current color as percent RGB
    pub fn color(&self) -> RgbPercent {
        RgbPercent::from_rgb(hsv2rgb_rainbow(self.hsv))
    }
}

// `smart_leds::hsv::Hsv` has no `Debug`
impl fmt::Debug for HueCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HueCycle")
            .field("hue", &self.hsv.hue)
            .field("sat", &self.hsv.sat)
            .field("val", &self.hsv.val)
            .finish()
    }
}
