mod percent;
mod rainbow;
mod utils;

use smart_leds::{RGB8, hsv::Hsv as HSV};

pub use percent::{
    HsvPercent, MAX_HUE_DEGREES, RgbPercent, hsv_to_rgb_percent, rgb_percent_to_hsv,
};
pub use rainbow::hsv2rgb_rainbow;
pub(crate) use rainbow::rainbow_hue;
pub use utils::rgb2hsv;

pub type Rgb = RGB8;
pub type Hsv = HSV;
