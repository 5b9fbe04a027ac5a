//! RGB display colour carried by trains for renderers.

use std::fmt;
use std::str::FromStr;

use crate::TlError;

/// An opaque 8-bit-per-channel colour.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = TlError;

    /// Accepts `#rrggbb` or `r:g:b` (decimal channels).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(TlError::Parse(format!("invalid colour {s:?}: expected #rrggbb")));
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| TlError::Parse(format!("invalid colour {s:?}: bad hex digit")))
            };
            return Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(TlError::Parse(format!(
                "invalid colour {s:?}: expected \"#rrggbb\" or \"r:g:b\""
            )));
        }
        let mut rgb = [0u8; 3];
        for (slot, part) in rgb.iter_mut().zip(&parts) {
            *slot = part
                .trim()
                .parse::<u8>()
                .map_err(|_| TlError::Parse(format!("invalid colour channel {part:?} in {s:?}")))?;
        }
        Ok(Color::rgb(rgb[0], rgb[1], rgb[2]))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
