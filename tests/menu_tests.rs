//! Headless tests for the [`GameState`] machine and the menu screens.
//!
//! These tests use [`MinimalPlugins`] with no window, rendering or audio.
//! Keyboard input is fed by pressing keys on a bare `ButtonInput<KeyCode>`
//! resource, so every frame is deterministic.
//!
//! Covered scenarios:
//! 1. Default initial state is `MainMenu`.
//! 2. ENTER on the first entry opens the level picker.
//! 3. DOWN + ENTER opens the prologue story.
//! 4. RIGHT + ENTER on the level picker starts stage 5 (Saturn) in `Intro`.
//! 5. ESC on the level picker returns to `MainMenu`.
//! 6. ESC pauses a running level and ESC again resumes it.
//! 7. R on the pause overlay restarts straight into `Playing`.
//! 8. Q on the pause overlay leaves for the level picker.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use space_rangers::graphics::GameFont;
use space_rangers::levels::{LevelSession, Planet, Progress};
use space_rangers::menu::{GameState, MenuPlugin};
use space_rangers::story::StoryScene;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Minimal headless app with the menu screens and the resources they read.
///
/// `StatesPlugin` adds the `StateTransition` schedule needed by `init_state`.
/// No `InputPlugin` runs, so key edges stay until [`tap`] clears them.
fn menu_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .init_resource::<ButtonInput<KeyCode>>()
        .init_resource::<GameFont>()
        .init_resource::<LevelSession>()
        .init_resource::<Progress>()
        .init_resource::<StoryScene>()
        .add_plugins(MenuPlugin);
    app.update(); // settle into MainMenu
    app
}

/// Press `keys` for exactly one frame, then let the transition land.
fn tap(app: &mut App, keys: &[KeyCode]) {
    {
        let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        for key in keys {
            input.press(*key);
        }
    }
    app.update();
    {
        let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        input.release_all();
        input.clear();
    }
    app.update();
}

fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

fn force(app: &mut App, next: GameState) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(next);
    app.update();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn default_state_is_main_menu() {
    let app = menu_app();
    assert_eq!(state(&app), GameState::MainMenu, "initial state must be MainMenu");
}

#[test]
fn enter_on_start_game_opens_level_select() {
    let mut app = menu_app();
    tap(&mut app, &[KeyCode::Enter]);
    assert_eq!(state(&app), GameState::LevelSelect);
}

#[test]
fn second_entry_opens_the_prologue() {
    let mut app = menu_app();
    tap(&mut app, &[KeyCode::ArrowDown]);
    tap(&mut app, &[KeyCode::Enter]);
    assert_eq!(state(&app), GameState::Story);
    assert_eq!(*app.world().resource::<StoryScene>(), StoryScene::Prologue);
}

#[test]
fn right_column_starts_stage_five() {
    let mut app = menu_app();
    tap(&mut app, &[KeyCode::Enter]);
    tap(&mut app, &[KeyCode::ArrowRight, KeyCode::Enter]);

    assert_eq!(state(&app), GameState::Intro);
    assert_eq!(
        app.world().resource::<LevelSession>().planet(),
        Some(Planet::Saturn),
        "RIGHT from stage 1 must land on stage 5"
    );
}

#[test]
fn escape_on_level_select_returns_to_main_menu() {
    let mut app = menu_app();
    tap(&mut app, &[KeyCode::Enter]);
    tap(&mut app, &[KeyCode::Escape]);
    assert_eq!(state(&app), GameState::MainMenu);
}

#[test]
fn escape_pauses_and_resumes() {
    let mut app = menu_app();
    force(&mut app, GameState::Playing);

    tap(&mut app, &[KeyCode::Escape]);
    assert_eq!(state(&app), GameState::Paused);

    tap(&mut app, &[KeyCode::Escape]);
    assert_eq!(state(&app), GameState::Playing, "ESC on the pause overlay resumes");
}

#[test]
fn pause_restart_returns_to_playing() {
    let mut app = menu_app();
    app.world_mut()
        .resource_mut::<LevelSession>()
        .start(Planet::Mercury);
    force(&mut app, GameState::Playing);
    tap(&mut app, &[KeyCode::Escape]);

    tap(&mut app, &[KeyCode::KeyR]);
    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(
        app.world().resource::<LevelSession>().planet(),
        Some(Planet::Mercury),
        "restart keeps the loaded level"
    );
}

#[test]
fn pause_quit_leaves_for_level_select() {
    let mut app = menu_app();
    force(&mut app, GameState::Playing);
    tap(&mut app, &[KeyCode::Escape]);
    tap(&mut app, &[KeyCode::KeyQ]);
    assert_eq!(state(&app), GameState::LevelSelect);
}
