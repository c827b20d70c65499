use crate::config::GameConfig;
use crate::dialogue::{MonospaceMeasure, TextMeasure, TtfMeasure};
use bevy::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

/// Handle of the font every UI text node uses.
///
/// Points at the configured TTF when it could be read, otherwise at Bevy's
/// built-in face.  Created by [`load_game_font`] at startup.
#[derive(Resource, Default)]
pub struct GameFont(pub Handle<Font>);

/// Width measurement matching [`GameFont`].
#[derive(Resource, Clone)]
pub struct FontMetrics(pub Arc<dyn TextMeasure>);

impl Default for FontMetrics {
    fn default() -> Self {
        FontMetrics(Arc::new(MonospaceMeasure::default()))
    }
}

impl FontMetrics {
    pub fn measure(&self) -> &dyn TextMeasure {
        self.0.as_ref()
    }
}

/// Directory Bevy's asset server reads from.
///
/// Follows the same lookup as the file asset reader: `BEVY_ASSET_ROOT`, then
/// `CARGO_MANIFEST_DIR`, then the executable's directory.
pub fn assets_dir() -> PathBuf {
    let base = std::env::var_os("BEVY_ASSET_ROOT")
        .or_else(|| std::env::var_os("CARGO_MANIFEST_DIR"))
        .map(PathBuf::from)
        .or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(PathBuf::from))
        })
        .unwrap_or_default();
    base.join("assets")
}

/// `true` when `relative` exists under the assets directory.
pub fn asset_exists(relative: &str) -> bool {
    assets_dir().join(relative).is_file()
}

/// Load the configured font for rendering and for text measurement.
///
/// Called from [`GraphicsPlugin::finish`], before the first state transition
/// spawns any UI text.  Without an asset server only the metrics are loaded.
pub fn load_game_font(
    config: &GameConfig,
    asset_server: Option<&AssetServer>,
) -> (GameFont, FontMetrics) {
    let path = assets_dir().join(&config.font_path);
    match TtfMeasure::load(&path) {
        Ok(measure) => {
            info!(
                "Game font loaded from {} ({} glyph advances)",
                config.font_path,
                measure.glyph_count()
            );
            let handle = asset_server
                .map(|server| server.load(config.font_path.clone()))
                .unwrap_or_default();
            (GameFont(handle), FontMetrics(Arc::new(measure)))
        }
        Err(e) => {
            warn!("{e}; falling back to the built-in font");
            (GameFont::default(), FontMetrics::default())
        }
    }
}

/// Setup camera for 2D rendering.
pub fn setup_camera(mut commands: Commands) {
    // One world unit per logical pixel, origin at the window centre
    commands.spawn(Camera2d);
    info!("Camera spawned");
}

/// Fonts and camera.
pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, setup_camera);
    }

    fn finish(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<GameConfig>()
            .cloned()
            .unwrap_or_default();
        let (font, metrics) =
            load_game_font(&config, app.world().get_resource::<AssetServer>());
        app.insert_resource(font).insert_resource(metrics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_monospace() {
        let metrics = FontMetrics::default();
        let w = metrics.measure().width("abcd", 10.0);
        assert!((w - 4.0 * 10.0 * crate::constants::FALLBACK_ADVANCE_EM).abs() < 1e-4);
    }

    #[test]
    fn unreadable_font_falls_back_without_asset_server() {
        let config = GameConfig {
            font_path: "fonts/none-such.ttf".to_string(),
            ..GameConfig::default()
        };
        let (font, metrics) = load_game_font(&config, None);
        assert_eq!(font.0, Handle::default());
        assert!((metrics.measure().width("ab", 10.0) - 12.0).abs() < 1e-3);
    }

    #[test]
    fn assets_dir_ends_in_assets() {
        assert!(assets_dir().ends_with("assets"));
        assert!(!asset_exists("definitely/missing.png"));
    }
}
