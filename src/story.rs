//! Prologue and epilogue: paged story text over a backdrop.
//!
//! Both scenes run in [`GameState::Story`]; [`StoryScene`] says which one.
//! The pages play through the shared dialogue box.  Once the last page is
//! confirmed the music stops and the end options "Reread (R)" and
//! "Main Menu (M)" are drawn in its place.
//!
//! ## Systems (registered by `StoryPlugin`)
//!
//! | System            | Schedule                        | Purpose                              |
//! |-------------------|---------------------------------|--------------------------------------|
//! | `enter_story`     | `OnEnter(Story)`                | Backdrop, music, caption, first page |
//! | `story_input`     | `Update / in Story`             | Advance, reread, leave               |
//! | `draw_story_end`  | `Update / CanvasSet::Draw`      | End options after the last page      |
//! | `leave_story`     | `OnExit(Story)`                 | Despawn the scene                    |

use crate::audio::{spawn_music, MissingAudio};
use crate::canvas::{Canvas, CanvasSet};
use crate::config::GameConfig;
use crate::constants::WINDOW_TITLE;
use crate::dialogue::{ActiveDialogue, DialogueAdvance};
use crate::error::GameError;
use crate::graphics::{asset_exists, FontMetrics};
use crate::menu::GameState;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

const PROLOGUE: [&str; 5] = [
    "In a quiet village, John lived a simple life and spent long nights watching the stars. \
     Walking through the forest one evening, he found a gem glowing with golden light. \
     When he picked it up, a warmth spread through his hand and the gem spoke: it was the Leo gem.",
    "A few days later alien ships descended on Earth. The invaders announced that the whole \
     solar system was already theirs. Panic spread, and John felt the Leo gem stir in his pocket.",
    "That night the gem spoke again. 'The aliens could only invade because the shield machine \
     inside the Sun went dark. The gems that power it were scattered across the eight planets. \
     You, John, must find them, wake the shield and save our worlds.'",
    "John understood what was being asked of him, and he did not turn away. With the Leo gem \
     as his guide he set out across the solar system, ready to face whatever each planet held, \
     to recover the missing gems and restart the machine in the Sun.",
    "The fate of the solar system now rested on his shoulders.",
];

const EPILOGUE: [&str; 11] = [
    "John stood on the surface of the Sun, its heat held back by the aura of the gems he had \
     gathered. With the alien commander defeated, the Leo gem whispered its last instructions, \
     and the twelve gems formed a bright circle around him.",
    "With a heavy heart John set the other gems into the slots of the shield machine. Their \
     glow grew until the light became blinding, and as the machine began to hum the Leo gem \
     trembled in his pocket.",
    "'John,' the Leo gem said softly, 'you have done it. The solar system is safe. Now place \
     me in the machine so the shield can wake.'",
    "John hesitated. 'Leo, I don't want to lose you,' he said, his voice shaking.",
    "'You won't lose me, John,' Leo answered.",
    "'What we share will stay. This is what I was made for, and your courage is what made it \
     possible. The peace of every world depends on this moment.'",
    "Through his tears John took a deep breath and set the Leo gem into its slot.",
    "The machine roared, and the energy of the gems spread into a shield that reached across \
     the whole solar system. The alien ships could not break through and fled.",
    "John watched the shield settle around the Sun, a light of hope for every planet. He felt \
     the loss as Leo's voice faded, but also the quiet pride of a mission fulfilled.",
    "Back on Earth, John looked up at a night sky that was calm again. The stars shone \
     brightly, a reminder of his journey and of the friend who had guided it.",
    "It was hard to let go, yet peace had returned to the solar system, and his friendship \
     with Leo would shine in his heart forever.",
];

const END_OPTIONS: [&str; 2] = ["Reread (R)", "Main Menu (M)"];
const END_OPTION_SPACING: f32 = 40.0;
const END_OPTION_SIZE: f32 = 32.0;

/// Which story the `Story` state plays.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoryScene {
    #[default]
    Prologue,
    Epilogue,
}

impl StoryScene {
    pub fn pages(self) -> &'static [&'static str] {
        match self {
            StoryScene::Prologue => &PROLOGUE,
            StoryScene::Epilogue => &EPILOGUE,
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            StoryScene::Prologue => "Prologue",
            StoryScene::Epilogue => "Epilogue",
        }
    }

    fn stem(self) -> &'static str {
        match self {
            StoryScene::Prologue => "prologue",
            StoryScene::Epilogue => "epilogue",
        }
    }

    pub fn backdrop(self) -> String {
        format!("images/{}.png", self.stem())
    }

    pub fn music(self) -> String {
        format!("audio/{}.mp3", self.stem())
    }

    fn color(self) -> Color {
        match self {
            StoryScene::Prologue => Color::srgb_u8(10, 14, 40),
            StoryScene::Epilogue => Color::srgb_u8(60, 24, 0),
        }
    }
}

/// `true` once the last page was confirmed and the end options show.
#[derive(Resource, Debug, Default)]
pub struct StoryEnded(pub bool);

/// Backdrop and music of the story scene.
#[derive(Component)]
pub struct StoryScoped;

/// The looping story music, stopped when the end options appear.
#[derive(Component)]
pub struct StoryMusic;

/// What a key press asks the story scene to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryAction {
    Advance,
    Reread,
    MainMenu,
}

/// Map the story keys; R and M only count once the end options show.
pub fn story_action(keys: &ButtonInput<KeyCode>, ended: bool) -> Option<StoryAction> {
    if keys.just_pressed(KeyCode::Escape) {
        return Some(StoryAction::MainMenu);
    }
    if ended {
        if keys.just_pressed(KeyCode::KeyR) {
            Some(StoryAction::Reread)
        } else if keys.just_pressed(KeyCode::KeyM) {
            Some(StoryAction::MainMenu)
        } else {
            None
        }
    } else if keys.just_pressed(KeyCode::Enter) {
        Some(StoryAction::Advance)
    } else {
        None
    }
}

pub struct StoryPlugin;

impl Plugin for StoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StoryScene>()
            .init_resource::<StoryEnded>()
            .add_systems(OnEnter(GameState::Story), enter_story)
            .add_systems(Update, story_input.run_if(in_state(GameState::Story)))
            .add_systems(
                Update,
                draw_story_end
                    .in_set(CanvasSet::Draw)
                    .run_if(in_state(GameState::Story)),
            )
            .add_systems(OnExit(GameState::Story), leave_story);
    }
}

fn start_music(
    commands: &mut Commands,
    asset_server: &AssetServer,
    missing: &mut MissingAudio,
    config: &GameConfig,
    scene: StoryScene,
) {
    spawn_music(
        commands,
        asset_server,
        missing,
        config,
        &scene.music(),
        (StoryScoped, StoryMusic),
    );
}

#[allow(clippy::too_many_arguments)]
pub fn enter_story(
    mut commands: Commands,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    scene: Res<StoryScene>,
    config: Res<GameConfig>,
    metrics: Res<FontMetrics>,
    asset_server: Res<AssetServer>,
    mut missing: ResMut<MissingAudio>,
    mut active: ResMut<ActiveDialogue>,
    mut ended: ResMut<StoryEnded>,
) {
    let window = config.window_size();
    let backdrop = scene.backdrop();
    let sprite = if asset_exists(&backdrop) {
        Sprite {
            image: asset_server.load(backdrop),
            custom_size: Some(window),
            ..default()
        }
    } else {
        warn!(
            "{}; using a plain backdrop",
            GameError::AssetMissing { path: backdrop }
        );
        Sprite::from_color(scene.color(), window)
    };
    commands.spawn((sprite, Transform::from_xyz(0.0, 0.0, -100.0), StoryScoped));
    start_music(&mut commands, &asset_server, &mut missing, &config, *scene);

    if let Ok(mut window) = windows.single_mut() {
        window.title = scene.caption().to_string();
    }
    active.open(scene.pages(), &config, metrics.measure());
    ended.0 = false;
    info!("{} started ({} pages)", scene.caption(), scene.pages().len());
}

#[allow(clippy::too_many_arguments)]
pub fn story_input(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    scene: Res<StoryScene>,
    config: Res<GameConfig>,
    metrics: Res<FontMetrics>,
    asset_server: Res<AssetServer>,
    mut missing: ResMut<MissingAudio>,
    music: Query<Entity, With<StoryMusic>>,
    mut active: ResMut<ActiveDialogue>,
    mut ended: ResMut<StoryEnded>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    match story_action(&keys, ended.0) {
        Some(StoryAction::Advance) => {
            if active.confirm() == DialogueAdvance::Finished {
                active.close();
                ended.0 = true;
                for entity in music.iter() {
                    commands.entity(entity).despawn();
                }
            }
        }
        Some(StoryAction::Reread) => {
            active.open(scene.pages(), &config, metrics.measure());
            ended.0 = false;
            start_music(&mut commands, &asset_server, &mut missing, &config, *scene);
        }
        Some(StoryAction::MainMenu) => next_state.set(GameState::MainMenu),
        None => {}
    }
}

/// Black screen with the two end options centred.
pub fn draw_story_end(ended: Res<StoryEnded>, mut canvas: ResMut<Canvas>) {
    if !ended.0 {
        return;
    }
    let window = canvas.window();
    canvas.fill_rect(0.0, 0.0, window.x, window.y, Color::BLACK);
    for (i, option) in END_OPTIONS.iter().enumerate() {
        let y = window.y / 2.0 + i as f32 * END_OPTION_SPACING - END_OPTION_SIZE / 2.0;
        canvas.text_centered(*option, window.x / 2.0, y, END_OPTION_SIZE, Color::WHITE);
    }
}

pub fn leave_story(
    mut commands: Commands,
    scoped: Query<Entity, With<StoryScoped>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut active: ResMut<ActiveDialogue>,
    mut ended: ResMut<StoryEnded>,
) {
    for entity in scoped.iter() {
        commands.entity(entity).despawn();
    }
    if let Ok(mut window) = windows.single_mut() {
        window.title = WINDOW_TITLE.to_string();
    }
    active.close();
    ended.0 = false;
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
    fn prologue_has_five_pages_and_epilogue_eleven() {
        assert_eq!(StoryScene::Prologue.pages().len(), 5);
        assert_eq!(StoryScene::Epilogue.pages().len(), 11);
    }

    #[test]
    fn enter_advances_only_before_the_end() {
        let keys = pressed(KeyCode::Enter);
        assert_eq!(story_action(&keys, false), Some(StoryAction::Advance));
        assert_eq!(story_action(&keys, true), None);
    }

    #[test]
    fn end_options_answer_to_r_and_m() {
        assert_eq!(story_action(&pressed(KeyCode::KeyR), true), Some(StoryAction::Reread));
        assert_eq!(story_action(&pressed(KeyCode::KeyM), true), Some(StoryAction::MainMenu));
        assert_eq!(story_action(&pressed(KeyCode::KeyR), false), None);
    }

    #[test]
    fn escape_leaves_at_any_time() {
        for ended in [false, true] {
            assert_eq!(
                story_action(&pressed(KeyCode::Escape), ended),
                Some(StoryAction::MainMenu)
            );
        }
    }

    #[test]
    fn assets_follow_the_scene_name() {
        assert_eq!(StoryScene::Epilogue.backdrop(), "images/epilogue.png");
        assert_eq!(StoryScene::Prologue.music(), "audio/prologue.mp3");
    }
}
