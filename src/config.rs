//! Runtime configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] whose defaults mirror
//! [`crate::constants`].  `main` reads `assets/game.toml` before the app is
//! built (the window size has to be known up front) and overwrites the
//! defaults with any values present in the file.  Missing keys fall back to the
//! compile-time defaults, so a minimal TOML can override just the values you
//! care about:
//!
//! ```toml
//! tick_hz = 30.0
//!
//! [dialogue]
//! reveal_step = 2
//!
//! [dialogue.panel]
//! mode = "fixed"
//! x = 50.0
//! y = 600.0
//! width = 1100.0
//! height = 150.0
//! ```

use crate::constants::*;
use crate::dialogue::PanelGeometry;
use crate::error::GameResult;
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Default location of the configuration file.
pub const CONFIG_PATH: &str = "assets/game.toml";

/// Runtime-tunable window, timing, audio and dialogue configuration.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Window ───────────────────────────────────────────────────────────────
    pub window_width: u32,
    pub window_height: u32,

    // ── Timing ───────────────────────────────────────────────────────────────
    pub tick_hz: f64,

    // ── Assets ───────────────────────────────────────────────────────────────
    pub font_path: String,
    pub music_volume: f32,
    pub sfx_volume: f32,

    // ── Dialogue ─────────────────────────────────────────────────────────────
    pub dialogue: DialogueConfig,
}

/// Dialogue-box tuning: reveal speed, typography and panel placement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    pub reveal_step: usize,
    pub font_size: f32,
    pub margin: f32,
    pub line_spacing: f32,
    pub border: f32,
    pub panel: PanelGeometry,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        let [x, y, width, height] = DIALOGUE_PANEL_RELATIVE;
        Self {
            reveal_step: DIALOGUE_REVEAL_STEP,
            font_size: DIALOGUE_FONT_SIZE,
            margin: DIALOGUE_MARGIN,
            line_spacing: DIALOGUE_LINE_SPACING,
            border: DIALOGUE_BORDER,
            panel: PanelGeometry::Relative {
                x,
                y,
                width,
                height,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            tick_hz: TICK_HZ,
            font_path: FONT_PATH.to_string(),
            music_volume: MUSIC_VOLUME,
            sfx_volume: SFX_VOLUME,
            dialogue: DialogueConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse a TOML document on top of the compiled defaults.
    pub fn from_toml_str(contents: &str) -> GameResult<Self> {
        let parsed: GameConfig = toml::from_str(contents)?;
        Ok(parsed.sanitized())
    }

    /// Window size as a vector, in logical pixels.
    pub fn window_size(&self) -> Vec2 {
        Vec2::new(self.window_width as f32, self.window_height as f32)
    }

    /// Clamp values that would stall or break the game loop.
    ///
    /// A zero reveal step would never finish a dialogue; a non-positive tick
    /// rate would never advance a level.
    fn sanitized(mut self) -> Self {
        self.dialogue.reveal_step = self.dialogue.reveal_step.max(1);
        if !(self.tick_hz > 0.0) {
            self.tick_hz = TICK_HZ;
        }
        self.window_width = self.window_width.max(320);
        self.window_height = self.window_height.max(240);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }
}

/// Load `path` over the compiled defaults.
///
/// Runs before Bevy's log plugin exists, so messages go to stdout/stderr.
/// Parse errors are reported but do not abort the game.  A missing file is
/// silently ignored.
pub fn load_game_config(path: impl AsRef<Path>) -> GameConfig {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => match GameConfig::from_toml_str(&contents) {
            Ok(loaded) => {
                println!("✓ Loaded game config from {}", path.display());
                loaded
            }
            Err(e) => {
                eprintln!("⚠ {}: {e}; using defaults", path.display());
                GameConfig::default()
            }
        },
        Err(_) => {
            println!("ℹ No {} found; using compiled defaults", path.display());
            GameConfig::default()
        }
    }
}

/// Error used when a caller insists on the file being present.
pub fn require_game_config(path: impl AsRef<Path>) -> GameResult<GameConfig> {
    let path = path.as_ref();
    let bytes = crate::error::read_file(path)?;
    let text = String::from_utf8_lossy(&bytes);
    GameConfig::from_toml_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    #[test]
    fn empty_document_keeps_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.window_width, WINDOW_WIDTH);
        assert_eq!(cfg.dialogue, DialogueConfig::default());
    }

    #[test]
    fn partial_override_touches_only_named_keys() {
        let cfg = GameConfig::from_toml_str(
            r#"
            tick_hz = 30.0

            [dialogue]
            reveal_step = 2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.tick_hz, 30.0);
        assert_eq!(cfg.dialogue.reveal_step, 2);
        assert_eq!(cfg.dialogue.font_size, DIALOGUE_FONT_SIZE);
        assert_eq!(cfg.font_path, FONT_PATH);
    }

    #[test]
    fn fixed_panel_geometry_parses() {
        let cfg = GameConfig::from_toml_str(
            r#"
            [dialogue.panel]
            mode = "fixed"
            x = 50.0
            y = 600.0
            width = 1100.0
            height = 150.0
            "#,
        )
        .unwrap();
        assert_eq!(
            cfg.dialogue.panel,
            PanelGeometry::Fixed {
                x: 50.0,
                y: 600.0,
                width: 1100.0,
                height: 150.0
            }
        );
    }

    #[test]
    fn zero_reveal_step_is_clamped() {
        let cfg = GameConfig::from_toml_str("[dialogue]\nreveal_step = 0\n").unwrap();
        assert_eq!(cfg.dialogue.reveal_step, 1);
    }

    #[test]
    fn malformed_document_is_a_config_error() {
        let err = GameConfig::from_toml_str("tick_hz = \"fast\"").unwrap_err();
        assert!(matches!(err, GameError::ConfigParse { .. }));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_game_config("no/such/game.toml");
        assert_eq!(cfg.tick_hz, TICK_HZ);
        assert!(require_game_config("no/such/game.toml").is_err());
    }

    #[test]
    fn shipped_config_matches_the_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/game.toml");
        let cfg = require_game_config(path).unwrap();
        let defaults = GameConfig::default();
        assert_eq!(cfg.window_size(), defaults.window_size());
        assert_eq!(cfg.tick_hz, defaults.tick_hz);
        assert_eq!(cfg.font_path, defaults.font_path);
        assert_eq!(cfg.dialogue, defaults.dialogue);
    }
}
