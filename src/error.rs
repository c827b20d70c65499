//! Game-wide error types.
//!
//! Loading code propagates these with `?`; the startup systems that call it
//! log the error and fall back to a working default instead of aborting.

use std::fmt;
use std::path::PathBuf;

/// Top-level error enum for Space Rangers.
#[derive(Debug)]
pub enum GameError {
    /// A file could not be read from disk.
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// `game.toml` (or another TOML document) failed to parse.
    ConfigParse {
        /// Parser message, including line/column information.
        message: String,
    },

    /// A font file was read but is not a usable TrueType/OpenType face.
    FontParse {
        /// Path of the rejected font.
        path: PathBuf,
    },

    /// An optional asset (image, music, sound) does not exist under `assets/`.
    AssetMissing {
        /// Asset path relative to `assets/`.
        path: String,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Io { path, source } => {
                write!(f, "failed to read '{}': {}", path.display(), source)
            }
            GameError::ConfigParse { message } => {
                write!(f, "invalid configuration: {}", message)
            }
            GameError::FontParse { path } => {
                write!(f, "'{}' is not a readable font face", path.display())
            }
            GameError::AssetMissing { path } => {
                write!(f, "asset 'assets/{}' not found", path)
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for GameError {
    fn from(err: toml::de::Error) -> Self {
        GameError::ConfigParse {
            message: err.to_string(),
        }
    }
}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

/// Read a whole file, tagging failures with the offending path.
pub fn read_file(path: impl Into<PathBuf>) -> GameResult<Vec<u8>> {
    let path = path.into();
    std::fs::read(&path).map_err(|source| GameError::Io { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_path() {
        let err = read_file("definitely/not/here.bin").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("definitely/not/here.bin"), "got: {text}");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn asset_missing_message_is_rooted_in_assets() {
        let err = GameError::AssetMissing {
            path: "audio/mars.mp3".to_string(),
        };
        assert_eq!(err.to_string(), "asset 'assets/audio/mars.mp3' not found");
    }
}
