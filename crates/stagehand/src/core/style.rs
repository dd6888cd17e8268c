/// A fill or text colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Fully transparent.
    #[default]
    Clear,
    /// Black.
    Black,
    /// Light grey.
    LightGrey,
    /// Dark grey.
    DarkGrey,
    /// White.
    White,
    /// Cyan.
    Cyan,
    /// RGB colour.
    Rgb {
        /// Red channel.
        r: u8,
        /// Green channel.
        g: u8,
        /// Blue channel.
        b: u8,
    },
}

impl Color {
    /// Construct a colour from a hex RGB string, "#RRGGBB" or "RRGGBB".
    /// Returns `None` on malformed input.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Convert any named colour to RGB. `Clear` has no RGB value.
    pub fn to_rgb(self) -> Option<Self> {
        let (r, g, b) = match self {
            Self::Clear => return None,
            Self::Rgb { .. } => return Some(self),
            Self::Black => (0, 0, 0),
            Self::LightGrey => (211, 211, 211),
            Self::DarkGrey => (169, 169, 169),
            Self::White => (255, 255, 255),
            Self::Cyan => (0, 255, 255),
        };
        Some(Self::Rgb { r, g, b })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    #[test]
    fn hex() -> Result<()> {
        assert_eq!(
            Color::from_hex("#ff8000"),
            Some(Color::Rgb { r: 255, g: 128, b: 0 })
        );
        assert_eq!(Color::from_hex("ff80"), None);
        assert_eq!(Color::from_hex("gg0000"), None);
        assert_eq!(Color::White.to_rgb(), Color::from_hex("ffffff"));
        assert_eq!(Color::Clear.to_rgb(), None);
        Ok(())
    }
}
