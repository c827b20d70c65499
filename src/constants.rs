//! Centralised window, timing, dialogue and navigation constants.
//!
//! These are the compiled defaults behind [`crate::config::GameConfig`].  Rule
//! constants that only one level cares about live at the top of that level's
//! module instead.

// ── Window ────────────────────────────────────────────────────────────────────

/// Logical window width in pixels.  Every arena is laid out in this space.
pub const WINDOW_WIDTH: u32 = 1200;

/// Logical window height in pixels.
pub const WINDOW_HEIGHT: u32 = 800;

/// Window title shown by the OS.
pub const WINDOW_TITLE: &str = "Space Rangers";

// ── Timing ────────────────────────────────────────────────────────────────────

/// Gameplay tick rate.  All per-tick speeds in the levels assume this rate.
pub const TICK_HZ: f64 = 60.0;

/// Seconds covered by one gameplay tick at [`TICK_HZ`].
pub const TICK_SECS: f32 = 1.0 / TICK_HZ as f32;

// ── Dialogue box ──────────────────────────────────────────────────────────────

/// Characters revealed per tick.
pub const DIALOGUE_REVEAL_STEP: usize = 1;

/// Font size of dialogue text.
pub const DIALOGUE_FONT_SIZE: f32 = 28.0;

/// Inner margin between the panel border and the text, on each side.
pub const DIALOGUE_MARGIN: f32 = 10.0;

/// Vertical gap between wrapped lines.
pub const DIALOGUE_LINE_SPACING: f32 = 5.0;

/// Border thickness of the panel.
pub const DIALOGUE_BORDER: f32 = 3.0;

/// Default panel placement as fractions of the window: x, y, width, height.
pub const DIALOGUE_PANEL_RELATIVE: [f32; 4] = [0.04, 0.75, 0.92, 0.19];

// ── Fonts ─────────────────────────────────────────────────────────────────────

/// Font file (relative to `assets/`) used for UI text and text measurement.
pub const FONT_PATH: &str = "fonts/FiraSans-Bold.ttf";

/// Horizontal advance of Bevy's built-in monospace font, in ems.
///
/// Used as the measurement fallback when [`FONT_PATH`] cannot be parsed.
pub const FALLBACK_ADVANCE_EM: f32 = 0.6;

// ── Audio ─────────────────────────────────────────────────────────────────────

/// Background music volume (linear, 0–1).
pub const MUSIC_VOLUME: f32 = 0.3;

/// Sound-effect volume (linear, 0–1).
pub const SFX_VOLUME: f32 = 0.6;

// ── Navigation map ────────────────────────────────────────────────────────────

/// Ship speed on the navigation map, world units per tick.
pub const NAV_SHIP_SPEED: f32 = 2.0;

/// Ship start position on the navigation map (next to Earth's orbit).
pub const NAV_SHIP_START: [f32; 2] = [4500.0, 0.0];

/// Ship radius on the navigation map.
pub const NAV_SHIP_RADIUS: f32 = 25.0;

/// Sun radius on the navigation map.
pub const NAV_SUN_RADIUS: f32 = 100.0;

/// Zoom change per wheel notch.
pub const NAV_ZOOM_STEP: f32 = 0.1;

/// Smallest zoom factor (furthest out).
pub const NAV_MIN_ZOOM: f32 = 0.1;

/// Largest zoom factor (closest in).
pub const NAV_MAX_ZOOM: f32 = 2.0;

/// Minimap edge length in pixels.
pub const NAV_MINIMAP_SIZE: f32 = 200.0;

/// Gap between the minimap and the window edge.
pub const NAV_MINIMAP_MARGIN: f32 = 10.0;
