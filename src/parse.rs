//! Text parsing for property values
//!
//! Numbers follow the firmware convention: a leading decimal integer is
//! read, anything after it is ignored, and text without digits reads as 0.

use core::fmt;

/// Error returned when a property write cannot be turned into a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer than three comma separated integers
    MissingComponent,
    /// Property name is not settable
    UnknownProperty,
    /// Effect keyword is not one of `none`, `fade`, `fast`, `slow`
    UnknownMode,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingComponent => f.write_str("expected three comma separated integers"),
            Self::UnknownProperty => f.write_str("unknown property"),
            Self::UnknownMode => f.write_str("unknown effect mode"),
        }
    }
}

/// Parse a decimal integer and clamp it into `[0, max]`
///
/// Never fails: input without a leading integer parses as 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_integer(text: &str, max: u32) -> u32 {
    match scan_integer(text) {
        Some((value, _)) => value.clamp(0, i64::from(max)) as u32,
        None => 0,
    }
}

/// Parse a percent value (0-100)
#[allow(clippy::cast_possible_truncation)]
pub fn parse_percent(text: &str) -> u8 {
    parse_integer(text, 100) as u8
}

/// Parse three comma separated integers, e.g. `"50,0,100"`
///
/// Ranges are not checked here; callers clamp at the point of use.
pub fn parse_triple(text: &str) -> Result<(i32, i32, i32), ParseError> {
    let (a, rest) = scan_integer(text).ok_or(ParseError::MissingComponent)?;
    let rest = expect_comma(rest)?;
    let (b, rest) = scan_integer(rest).ok_or(ParseError::MissingComponent)?;
    let rest = expect_comma(rest)?;
    let (c, _) = scan_integer(rest).ok_or(ParseError::MissingComponent)?;

    Ok((saturate_i32(a), saturate_i32(b), saturate_i32(c)))
}

/// Clamp a parsed component into `[0, max]`
#[allow(clippy::cast_sign_loss)]
pub(crate) fn clamp_component(value: i32, max: u16) -> u16 {
    value.clamp(0, i32::from(max)) as u16
}

fn expect_comma(text: &str) -> Result<&str, ParseError> {
    text.trim_start()
        .strip_prefix(',')
        .ok_or(ParseError::MissingComponent)
}

/// Read an optionally signed integer after leading whitespace
///
/// Returns the value (saturated) and the remaining text.
fn scan_integer(text: &str) -> Option<(i64, &str)> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }

    let magnitude = digits[..len].bytes().fold(0i64, |acc, digit| {
        acc.saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'))
    });
    let value = if negative { -magnitude } else { magnitude };

    Some((value, &digits[len..]))
}

#[allow(clippy::cast_possible_truncation)]
fn saturate_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
