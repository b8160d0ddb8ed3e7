//! Gamma correction for PWM output
//!
//! LED brightness is perceived non-linearly, so channel levels (0-100 %)
//! are mapped through a lookup table before they reach the PWM hardware.

/// Number of entries in a gamma table, one per percent step (0..=100)
pub const GAMMA_TABLE_LEN: usize = 101;

/// Maximum duty value of the default table (ESP8266 `PWMRANGE`)
pub const DEFAULT_MAX_DUTY: u16 = 1024;

/// Exponent the default table was generated with
pub const DEFAULT_GAMMA: f32 = 2.8;

/// Maps [0%-100%] to [0-1024]
const PWM_1024_LUT: [u16; GAMMA_TABLE_LEN] = [
    0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 2, 2, 3, 3, 4, 5, //
    6, 7, 8, 10, 11, 13, 15, 17, 19, 21, 24, 26, 29, 32, 35, 39, //
    42, 46, 50, 54, 59, 63, 68, 73, 79, 84, 90, 96, 103, 109, 116, 124, //
    131, 139, 147, 155, 164, 173, 182, 192, 202, 212, 223, 234, 245, 257, 269, 281, //
    293, 307, 320, 334, 348, 362, 377, 392, 408, 424, 441, 458, 475, 493, 511, 529, //
    548, 568, 587, 608, 628, 650, 671, 693, 716, 739, 762, 786, 811, 836, 861, 887, //
    913, 940, 968, 996, 1024,
];

/// Percent to duty lookup table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GammaTable {
    lut: [u16; GAMMA_TABLE_LEN],
}

impl GammaTable {
    /// Table for a 0-1024 PWM range with gamma 2.8
    pub const PWM_1024: Self = Self { lut: PWM_1024_LUT };

    /// Build a table for a different PWM range
    ///
    /// Uses `round((i / 100) ^ gamma * max_duty)`, the formula
    /// [`GammaTable::PWM_1024`] was produced with.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn generate(max_duty: u16, gamma: f32) -> Self {
        let mut lut = [0u16; GAMMA_TABLE_LEN];
        let last = (GAMMA_TABLE_LEN - 1) as f32;
        for (i, entry) in lut.iter_mut().enumerate() {
            let linear = i as f32 / last;
            let corrected = libm::powf(linear, gamma) * f32::from(max_duty) + 0.5;
            *entry = (corrected as u16).min(max_duty);
        }
        Self { lut }
    }

    /// Translate a percent level into a PWM duty value
    ///
    /// Levels above 100 are clamped.
    pub fn correct(&self, percent: u8) -> u16 {
        let index = usize::from(percent).min(GAMMA_TABLE_LEN - 1);
        self.lut[index]
    }

    /// Duty value produced for 100 %
    pub const fn max_duty(&self) -> u16 {
        self.lut[GAMMA_TABLE_LEN - 1]
    }
}

impl Default for GammaTable {
    fn default() -> Self {
        Self::PWM_1024
    }
}

/// Gamma correct a percent level with the default 0-1024 table
pub fn correct(percent: u8) -> u16 {
    GammaTable::PWM_1024.correct(percent)
}
