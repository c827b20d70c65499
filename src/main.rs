use bevy::prelude::*;
use bevy::window::WindowResolution;
use space_rangers::audio::SoundPlugin;
use space_rangers::canvas::CanvasPlugin;
use space_rangers::config::{load_game_config, CONFIG_PATH};
use space_rangers::constants::WINDOW_TITLE;
use space_rangers::dialogue::DialoguePlugin;
use space_rangers::graphics::GraphicsPlugin;
use space_rangers::levels::LevelsPlugin;
use space_rangers::menu::MenuPlugin;
use space_rangers::navigation::NavigationPlugin;
use space_rangers::story::StoryPlugin;

fn main() {
    // Read before the window exists so its size can come from the file.
    let config = load_game_config(CONFIG_PATH);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: WINDOW_TITLE.into(),
                resolution: WindowResolution::new(config.window_width, config.window_height),
                resizable: false,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
        .insert_resource(config)
        // MenuPlugin registers GameState; it must precede every in_state user.
        .add_plugins(MenuPlugin)
        .add_plugins((
            GraphicsPlugin,
            CanvasPlugin,
            DialoguePlugin,
            SoundPlugin,
            LevelsPlugin,
            NavigationPlugin,
            StoryPlugin,
        ))
        .run();
}
