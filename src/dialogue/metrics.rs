//! Text width measurement for word-wrapping and centred labels.
//!
//! The real measurement reads horizontal glyph advances straight out of the
//! TrueType font with `ttf-parser`, so wrapping agrees with what Bevy later
//! renders.  When the font cannot be read the game renders with Bevy's
//! built-in monospace face, and [`MonospaceMeasure`] matches that.

use crate::constants::FALLBACK_ADVANCE_EM;
use crate::error::{read_file, GameError, GameResult};
use std::collections::HashMap;
use std::path::Path;

/// Anything that can report the rendered width of a string.
pub trait TextMeasure: Send + Sync {
    /// Width in pixels of `text` rendered at `font_size`.
    fn width(&self, text: &str, font_size: f32) -> f32;
}

/// Fixed advance per character.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    /// Advance of every glyph, in ems.
    pub advance_em: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            advance_em: FALLBACK_ADVANCE_EM,
        }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * self.advance_em * font_size
    }
}

/// Glyph advances extracted from a TrueType/OpenType face.
///
/// Advances are cached in ems for the Latin ranges at load time; the parsed
/// face itself borrows the font bytes and is not kept.
#[derive(Debug, Clone)]
pub struct TtfMeasure {
    advances: HashMap<char, f32>,
    missing_em: f32,
}

impl TtfMeasure {
    /// Parse an in-memory font.  `path` is only used for error reporting.
    pub fn from_bytes(data: &[u8], path: &Path) -> GameResult<Self> {
        let face = ttf_parser::Face::parse(data, 0).map_err(|_| GameError::FontParse {
            path: path.to_path_buf(),
        })?;
        let units_per_em = face.units_per_em().max(1) as f32;

        let mut advances = HashMap::new();
        for code in (0x20u32..0x250).chain(0x2010..0x2027) {
            let Some(ch) = char::from_u32(code) else {
                continue;
            };
            let advance = face
                .glyph_index(ch)
                .and_then(|glyph| face.glyph_hor_advance(glyph));
            if let Some(units) = advance {
                advances.insert(ch, units as f32 / units_per_em);
            }
        }

        if advances.is_empty() {
            return Err(GameError::FontParse {
                path: path.to_path_buf(),
            });
        }

        let missing_em = advances
            .get(&'?')
            .copied()
            .unwrap_or(FALLBACK_ADVANCE_EM);
        Ok(Self {
            advances,
            missing_em,
        })
    }

    /// Read and parse a font file.
    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        let bytes = read_file(path)?;
        Self::from_bytes(&bytes, path)
    }

    /// Number of characters with a known advance.
    pub fn glyph_count(&self) -> usize {
        self.advances.len()
    }
}

impl TextMeasure for TtfMeasure {
    fn width(&self, text: &str, font_size: f32) -> f32 {
        let ems: f32 = text
            .chars()
            .map(|c| self.advances.get(&c).copied().unwrap_or(self.missing_em))
            .sum();
        ems * font_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monospace_scales_with_length_and_size() {
        let m = MonospaceMeasure { advance_em: 0.5 };
        assert_eq!(m.width("", 20.0), 0.0);
        assert_eq!(m.width("abcd", 20.0), 40.0);
        assert_eq!(m.width("ab", 40.0), 40.0);
    }

    #[test]
    fn monospace_counts_chars_not_bytes() {
        let m = MonospaceMeasure { advance_em: 1.0 };
        assert_eq!(m.width("héllo", 1.0), 5.0);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = TtfMeasure::from_bytes(b"not a font", Path::new("fonts/bad.ttf")).unwrap_err();
        assert!(matches!(err, GameError::FontParse { .. }));
        assert!(err.to_string().contains("fonts/bad.ttf"));
    }

    #[test]
    fn missing_font_file_is_an_io_error() {
        let err = TtfMeasure::load("assets/fonts/none-such.ttf").unwrap_err();
        assert!(matches!(err, GameError::Io { .. }));
    }
}
