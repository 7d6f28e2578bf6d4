//! Caller-supplied target colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A target color for one semantic role (foreground tint, background
/// recolor or watermark text).
///
/// Parsed from `#RRGGBB` or `#RRGGBBAA`. When no alpha digits are given the
/// color is fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorSpec {
    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with an explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses a `#RRGGBB` / `#RRGGBBAA` string.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor(input.to_string());

        let digits = input.strip_prefix('#').ok_or_else(invalid)?;
        if !(digits.len() == 6 || digits.len() == 8)
            || !digits.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Returns true when the alpha channel is 255.
    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if !self.is_opaque() {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for ColorSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ColorSpec {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ColorSpec> for String {
    fn from(color: ColorSpec) -> Self {
        color.to_string()
    }
}
