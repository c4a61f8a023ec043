use std::fmt;

use thiserror::Error;

/// A colour as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Ansi256(u8),
    Hex { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Error)]
#[error("invalid color value for field \"{field}\": \"{value}\"")]
pub struct ColorParseError {
    pub field: String,
    pub value: String,
}

impl Color {
    /// Parse `"0"`..`"255"`, `"#RRGGBB"` or `"#RGB"`.
    pub fn parse(s: &str, field: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError {
            field: field.to_owned(),
            value: s.to_owned(),
        };
        let Some(hex) = s.strip_prefix('#') else {
            return s.trim().parse::<u8>().map(Color::Ansi256).map_err(|_| err());
        };
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).and_then(|d| u8::try_from(d).ok()))
            .collect::<Option<_>>()
            .ok_or_else(err)?;
        match digits.as_slice() {
            [r, g, b] => Ok(Color::Hex {
                r: r * 17,
                g: g * 17,
                b: b * 17,
            }),
            [r1, r2, g1, g2, b1, b2] => Ok(Color::Hex {
                r: r1 * 16 + r2,
                g: g1 * 16 + g2,
                b: b1 * 16 + b2,
            }),
            _ => Err(err()),
        }
    }

    pub fn to_crossterm_color(self) -> crossterm::style::Color {
        match self {
            Color::Hex { r, g, b } => crossterm::style::Color::Rgb { r, g, b },
            Color::Ansi256(n) => crossterm::style::Color::AnsiValue(n),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Ansi256(n) => write!(f, "{n}"),
            Color::Hex { r, g, b } => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ansi_index() {
        assert_eq!(Color::parse("245", "f").unwrap(), Color::Ansi256(245));
        assert!(Color::parse("256", "f").is_err());
    }

    #[test]
    fn parses_hex_forms() {
        assert_eq!(
            Color::parse("#7aa2f7", "f").unwrap(),
            Color::Hex {
                r: 0x7a,
                g: 0xa2,
                b: 0xf7
            }
        );
        assert_eq!(
            Color::parse("#fff", "f").unwrap(),
            Color::Hex {
                r: 255,
                g: 255,
                b: 255
            }
        );
        assert!(Color::parse("#12345", "f").is_err());
        assert!(Color::parse("#gggggg", "f").is_err());
    }

    #[test]
    fn error_names_the_field() {
        let e = Color::parse("blue", "theme.header").unwrap_err();
        assert_eq!(e.to_string(), "invalid color value for field \"theme.header\": \"blue\"");
    }

    #[test]
    fn display_round_trips_hex() {
        let c = Color::parse("#0a0b0c", "f").unwrap();
        assert_eq!(c.to_string(), "#0a0b0c");
    }
}
