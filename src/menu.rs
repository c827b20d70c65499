//! Menus and overlays: `GameState`, main menu, level select, pause and results.
//!
//! ## States
//!
//! | State         | Description                                      |
//! |---------------|--------------------------------------------------|
//! | `MainMenu`    | Initial state; title and five entries            |
//! | `LevelSelect` | Nine stages in two columns plus the Sun          |
//! | `Navigation`  | Solar-system map (see [`crate::navigation`])     |
//! | `Story`       | Prologue / epilogue (see [`crate::story`])       |
//! | `Intro`       | Level loaded, intro dialogue showing             |
//! | `Playing`     | Level ticking                                    |
//! | `Paused`      | Level frozen under the pause overlay             |
//! | `Victory`     | Result overlay, victory dialogue                 |
//! | `Defeat`      | Result overlay, defeat dialogue                  |
//!
//! ## Systems (registered by `MenuPlugin`)
//!
//! | System                   | Schedule                       | Purpose                         |
//! |--------------------------|--------------------------------|---------------------------------|
//! | `setup_main_menu`        | `OnEnter(MainMenu)`            | Spawn the title screen          |
//! | `main_menu_input`        | `Update / in MainMenu`         | Cursor, clicks, activation      |
//! | `setup_level_select`     | `OnEnter(LevelSelect)`         | Spawn the stage grid            |
//! | `level_select_input`     | `Update / in LevelSelect`      | Columns, start a stage, back    |
//! | `toggle_pause_system`    | `Update / in Playing`          | ESC opens the pause overlay     |
//! | `setup_pause_menu`       | `OnEnter(Paused)`              | Spawn the pause overlay         |
//! | `pause_menu_input`       | `Update / in Paused`           | Resume, restart, quit           |
//! | `setup_result_overlay`   | `OnEnter(Victory / Defeat)`    | Spawn the result card           |
//! | `paint_menu_items`       | `Update` on cursor change      | Highlight the selected entry    |

mod common;
pub mod level_select;
pub mod main_menu;
pub mod pause;
pub mod result;
pub mod types;

pub use types::*;

use crate::graphics::GameFont;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use common::*;

/// Registers `GameState`, every menu screen and the shared cursor.
///
/// Must be added before any plugin that schedules systems with
/// `in_state(GameState::..)`.
pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<MenuCursor>()
            // Main menu
            .add_systems(OnEnter(GameState::MainMenu), main_menu::setup_main_menu)
            .add_systems(OnExit(GameState::MainMenu), despawn_screen::<MainMenuRoot>)
            .add_systems(
                Update,
                main_menu::main_menu_input.run_if(in_state(GameState::MainMenu)),
            )
            // Level select
            .add_systems(
                OnEnter(GameState::LevelSelect),
                level_select::setup_level_select,
            )
            .add_systems(
                OnExit(GameState::LevelSelect),
                despawn_screen::<LevelSelectRoot>,
            )
            .add_systems(
                Update,
                level_select::level_select_input.run_if(in_state(GameState::LevelSelect)),
            )
            // Pause
            .add_systems(
                Update,
                pause::toggle_pause_system.run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnEnter(GameState::Paused), pause::setup_pause_menu)
            .add_systems(OnExit(GameState::Paused), despawn_screen::<PauseMenuRoot>)
            .add_systems(
                Update,
                pause::pause_menu_input.run_if(in_state(GameState::Paused)),
            )
            // Results
            .add_systems(OnEnter(GameState::Victory), result::setup_result_overlay)
            .add_systems(OnEnter(GameState::Defeat), result::setup_result_overlay)
            .add_systems(OnExit(GameState::Victory), despawn_screen::<ResultRoot>)
            .add_systems(OnExit(GameState::Defeat), despawn_screen::<ResultRoot>)
            .add_systems(
                Update,
                paint_menu_items.run_if(resource_changed::<MenuCursor>),
            );
    }
}
