//! Shared stage flow around every level.
//!
//! ## Systems (registered by `LevelsPlugin`)
//!
//! | System                 | Schedule                         | Purpose                               |
//! |------------------------|----------------------------------|---------------------------------------|
//! | `collect_level_input`  | `Update`                         | Fold keyboard/mouse into the pending snapshot |
//! | `enter_level_scene`    | `OnEnter(Intro)`                 | Backdrop, music, caption, intro text  |
//! | `intro_input`          | `Update / in Intro`              | Page through the intro, then play     |
//! | `reset_pending_input`  | `OnEnter(Playing)`               | Drop keys pressed before play began   |
//! | `tick_level`           | `FixedUpdate / in Playing`       | Advance the rules one step            |
//! | `draw_level`           | `Update / CanvasSet::Draw`       | Draw while the level is visible       |
//! | `open_victory`         | `OnEnter(Victory)`               | Award gems, show victory text         |
//! | `open_defeat`          | `OnEnter(Defeat)`                | Show defeat text                      |
//! | `result_input`         | `Update / in Victory or Defeat`  | Retry, next stage or level select     |
//! | `leave_level_scene`    | `OnEnter(LevelSelect / MainMenu)`| Unload the level and its scene        |
//! | `unload_level_scene`   | `OnEnter(Story)`, before the story | Unload the level, keep the dialogue |

use super::{
    input::collect_level_input, LevelOutcome, LevelSession, PendingInput, Planet, Progress,
    TickContext,
};
use crate::audio::{spawn_music, MissingAudio, SoundQueue};
use crate::canvas::{Canvas, CanvasSet};
use crate::config::GameConfig;
use crate::constants::WINDOW_TITLE;
use crate::dialogue::{ActiveDialogue, DialogueAdvance};
use crate::error::GameError;
use crate::graphics::{asset_exists, FontMetrics};
use crate::menu::{GameState, ResultButton};
use crate::story::StoryScene;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Backdrop sits behind every canvas shape.
const BACKDROP_Z: f32 = -100.0;

/// Entities that live as long as the current stage: backdrop and music.
#[derive(Component)]
pub struct LevelScoped;

pub struct LevelsPlugin;

impl Plugin for LevelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelSession>()
            .init_resource::<Progress>()
            .init_resource::<PendingInput>()
            .add_systems(Update, collect_level_input)
            .add_systems(OnEnter(GameState::Intro), enter_level_scene)
            .add_systems(Update, intro_input.run_if(in_state(GameState::Intro)))
            .add_systems(OnExit(GameState::Intro), close_dialogue)
            .add_systems(OnEnter(GameState::Playing), reset_pending_input)
            .add_systems(FixedUpdate, tick_level.run_if(in_state(GameState::Playing)))
            .add_systems(
                Update,
                draw_level
                    .in_set(CanvasSet::Draw)
                    .run_if(|state: Res<State<GameState>>| state.get().shows_level()),
            )
            .add_systems(OnEnter(GameState::Victory), open_victory)
            .add_systems(OnEnter(GameState::Defeat), open_defeat)
            .add_systems(
                Update,
                result_input
                    .run_if(in_state(GameState::Victory).or(in_state(GameState::Defeat))),
            )
            .add_systems(OnExit(GameState::Victory), close_dialogue)
            .add_systems(OnExit(GameState::Defeat), close_dialogue)
            .add_systems(OnEnter(GameState::LevelSelect), leave_level_scene)
            .add_systems(OnEnter(GameState::MainMenu), leave_level_scene)
            .add_systems(
                OnEnter(GameState::Story),
                unload_level_scene.before(crate::story::enter_story),
            );
    }
}

fn set_caption(windows: &mut Query<&mut Window, With<PrimaryWindow>>, caption: &str) {
    if let Ok(mut window) = windows.single_mut() {
        window.title = caption.to_string();
    }
}

fn despawn_scene(commands: &mut Commands, scoped: &Query<Entity, With<LevelScoped>>) {
    for entity in scoped.iter() {
        commands.entity(entity).despawn();
    }
}

// ── OnEnter(Intro) ────────────────────────────────────────────────────────────

/// Replace the previous stage's scene with the loaded planet's and open its intro.
#[allow(clippy::too_many_arguments)]
pub fn enter_level_scene(
    mut commands: Commands,
    scoped: Query<Entity, With<LevelScoped>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    session: Res<LevelSession>,
    config: Res<GameConfig>,
    metrics: Res<FontMetrics>,
    asset_server: Res<AssetServer>,
    mut missing: ResMut<MissingAudio>,
    mut active: ResMut<ActiveDialogue>,
) {
    despawn_scene(&mut commands, &scoped);
    let Some(level) = session.level() else {
        warn!("Intro entered without a level loaded");
        return;
    };
    let planet = level.planet();
    let arena = level.arena();

    let backdrop = planet.backdrop();
    let sprite = if asset_exists(&backdrop) {
        Sprite {
            image: asset_server.load(backdrop),
            custom_size: Some(arena),
            ..default()
        }
    } else {
        warn!(
            "{}; using a plain backdrop",
            GameError::AssetMissing { path: backdrop }
        );
        Sprite::from_color(planet.color(), arena)
    };
    commands.spawn((sprite, Transform::from_xyz(0.0, 0.0, BACKDROP_Z), LevelScoped));

    spawn_music(
        &mut commands,
        &asset_server,
        &mut missing,
        &config,
        &planet.music(),
        LevelScoped,
    );

    set_caption(&mut windows, &planet.caption());
    active.open(planet.intro(), &config, metrics.measure());
    info!("Stage {}: {}", planet.stage(), planet.caption());
}

/// ENTER/SPACE pages through the intro; ESC backs out to level select.
pub fn intro_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut active: ResMut<ActiveDialogue>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        next_state.set(GameState::LevelSelect);
        return;
    }
    if keys.any_just_pressed([KeyCode::Enter, KeyCode::Space])
        && active.confirm() == DialogueAdvance::Finished
    {
        next_state.set(GameState::Playing);
    }
}

pub fn close_dialogue(mut active: ResMut<ActiveDialogue>) {
    active.close();
}

// ── Playing ───────────────────────────────────────────────────────────────────

pub fn reset_pending_input(mut pending: ResMut<PendingInput>) {
    pending.reset();
}

/// Advance the loaded level one fixed step and route its outcome.
pub fn tick_level(
    mut session: ResMut<LevelSession>,
    mut pending: ResMut<PendingInput>,
    mut sounds: ResMut<SoundQueue>,
    time: Res<Time<Fixed>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    // Several fixed steps can run in one frame; stop once a transition is queued
    if matches!(*next_state, NextState::Pending(_)) {
        return;
    }
    let Some(level) = session.level_mut() else {
        return;
    };
    let input = pending.take();
    let mut cues = Vec::new();
    let outcome = level.tick(&mut TickContext::new(&input, time.delta_secs(), &mut cues));
    sounds.0.extend(cues);

    match outcome {
        LevelOutcome::Continue => {}
        LevelOutcome::Victory => next_state.set(GameState::Victory),
        LevelOutcome::Defeat => next_state.set(GameState::Defeat),
    }
}

pub fn draw_level(session: Res<LevelSession>, mut canvas: ResMut<Canvas>) {
    if let Some(level) = session.level() {
        canvas.set_arena(level.arena());
        level.draw(&mut canvas);
    }
}

// ── Victory / Defeat ──────────────────────────────────────────────────────────

pub fn open_victory(
    session: Res<LevelSession>,
    mut progress: ResMut<Progress>,
    config: Res<GameConfig>,
    metrics: Res<FontMetrics>,
    mut active: ResMut<ActiveDialogue>,
) {
    let Some(planet) = session.planet() else {
        return;
    };
    if progress.clear(planet) {
        info!("{} cleared; gems: {:?}", planet.name(), planet.gems());
    }
    active.open(planet.victory(), &config, metrics.measure());
}

pub fn open_defeat(
    session: Res<LevelSession>,
    config: Res<GameConfig>,
    metrics: Res<FontMetrics>,
    mut active: ResMut<ActiveDialogue>,
) {
    if let Some(planet) = session.planet() {
        active.open(planet.defeat(), &config, metrics.measure());
    }
}

/// What a key press on the result screen asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultChoice {
    Retry,
    LevelSelect,
    Next(Planet),
    Epilogue,
}

/// Map the result-screen keys; `N` only counts after a victory.
pub fn result_choice(
    keys: &ButtonInput<KeyCode>,
    planet: Planet,
    victory: bool,
) -> Option<ResultChoice> {
    if keys.just_pressed(KeyCode::KeyR) {
        return Some(ResultChoice::Retry);
    }
    if keys.just_pressed(KeyCode::KeyQ) {
        return Some(ResultChoice::LevelSelect);
    }
    if victory && keys.just_pressed(KeyCode::KeyN) {
        return Some(match planet.next() {
            Some(next) => ResultChoice::Next(next),
            None => ResultChoice::Epilogue,
        });
    }
    None
}

pub fn result_input(
    keys: Res<ButtonInput<KeyCode>>,
    clicks: Query<(&Interaction, &ResultButton), Changed<Interaction>>,
    state: Res<State<GameState>>,
    mut session: ResMut<LevelSession>,
    mut active: ResMut<ActiveDialogue>,
    mut story: ResMut<StoryScene>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keys.any_just_pressed([KeyCode::Enter, KeyCode::Space]) {
        active.confirm();
    }
    let Some(planet) = session.planet() else {
        next_state.set(GameState::LevelSelect);
        return;
    };
    let victory = *state.get() == GameState::Victory;
    let clicked = clicks
        .iter()
        .find(|(interaction, _)| **interaction == Interaction::Pressed)
        .map(|(_, button)| button.0);
    match result_choice(&keys, planet, victory).or(clicked) {
        Some(ResultChoice::Retry) => {
            session.restart();
            next_state.set(GameState::Playing);
        }
        Some(ResultChoice::LevelSelect) => next_state.set(GameState::LevelSelect),
        Some(ResultChoice::Next(next)) => {
            session.start(next);
            next_state.set(GameState::Intro);
        }
        Some(ResultChoice::Epilogue) => {
            *story = StoryScene::Epilogue;
            next_state.set(GameState::Story);
        }
        None => {}
    }
}

// ── Leaving ───────────────────────────────────────────────────────────────────

pub fn leave_level_scene(
    mut commands: Commands,
    scoped: Query<Entity, With<LevelScoped>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut session: ResMut<LevelSession>,
    mut active: ResMut<ActiveDialogue>,
) {
    despawn_scene(&mut commands, &scoped);
    if session.planet().is_some() {
        set_caption(&mut windows, WINDOW_TITLE);
    }
    session.end();
    active.close();
}

/// Drop the finished stage's backdrop, music and level when a story
/// follows it; the story brings its own scene and caption.
pub fn unload_level_scene(
    mut commands: Commands,
    scoped: Query<Entity, With<LevelScoped>>,
    mut session: ResMut<LevelSession>,
) {
    despawn_scene(&mut commands, &scoped);
    if let Some(planet) = session.planet() {
        info!("{} unloaded for the story", planet.name());
    }
    session.end();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(key: KeyCode) -> ButtonInput<KeyCode> {
        let mut keys = ButtonInput::default();
        keys.press(key);
        keys
    }

    #[test]
    fn next_is_only_offered_after_a_victory() {
        let keys = pressed(KeyCode::KeyN);
        assert_eq!(
            result_choice(&keys, Planet::Earth, true),
            Some(ResultChoice::Next(Planet::Mars))
        );
        assert_eq!(result_choice(&keys, Planet::Earth, false), None);
    }

    #[test]
    fn beating_the_sun_leads_to_the_epilogue() {
        let keys = pressed(KeyCode::KeyN);
        assert_eq!(
            result_choice(&keys, Planet::Sun, true),
            Some(ResultChoice::Epilogue)
        );
    }

    #[test]
    fn retry_and_quit_work_after_either_result() {
        for victory in [true, false] {
            assert_eq!(
                result_choice(&pressed(KeyCode::KeyR), Planet::Venus, victory),
                Some(ResultChoice::Retry)
            );
            assert_eq!(
                result_choice(&pressed(KeyCode::KeyQ), Planet::Venus, victory),
                Some(ResultChoice::LevelSelect)
            );
        }
    }

    #[test]
    fn wrong_answer_ends_in_the_defeat_state() {
        use bevy::state::app::StatesPlugin;

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_state(GameState::Playing)
            .init_resource::<LevelSession>()
            .init_resource::<PendingInput>()
            .init_resource::<SoundQueue>()
            .add_systems(Update, tick_level);
        app.world_mut()
            .resource_mut::<LevelSession>()
            .start(Planet::Mercury);

        // UP is the wrong track for the first question; it only counts at the fork
        for _ in 0..400 {
            app.world_mut()
                .resource_mut::<PendingInput>()
                .record(super::super::LevelInput::tapped(&[KeyCode::ArrowUp]));
            app.update();
            if *app.world().resource::<State<GameState>>().get() != GameState::Playing {
                break;
            }
        }
        let state = app.world().resource::<State<GameState>>();
        assert_eq!(*state.get(), GameState::Defeat);
    }

    #[test]
    fn sun_victory_leaves_no_stage_scene_behind_in_the_epilogue() {
        use bevy::state::app::StatesPlugin;

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_state(GameState::Victory)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<LevelSession>()
            .init_resource::<ActiveDialogue>()
            .init_resource::<StoryScene>()
            .add_systems(
                Update,
                result_input.run_if(in_state(GameState::Victory)),
            )
            .add_systems(OnEnter(GameState::Story), unload_level_scene);
        app.world_mut()
            .resource_mut::<LevelSession>()
            .start(Planet::Sun);
        // Stand-ins for the Sun's backdrop and looping music
        app.world_mut().spawn(LevelScoped);
        app.world_mut().spawn(LevelScoped);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyN);
        app.update();
        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.release_all();
            keys.clear();
        }
        app.update();

        assert_eq!(
            *app.world().resource::<State<GameState>>().get(),
            GameState::Story
        );
        assert_eq!(*app.world().resource::<StoryScene>(), StoryScene::Epilogue);
        let world = app.world_mut();
        let left = world
            .query_filtered::<Entity, With<LevelScoped>>()
            .iter(world)
            .count();
        assert_eq!(left, 0, "stage backdrop and music must not follow into the story");
        assert_eq!(world.resource::<LevelSession>().planet(), None);
    }
}
