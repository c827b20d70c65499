use super::*;
use crate::story::StoryScene;

/// Entries of the title screen, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuEntry {
    StartGame,
    Prologue,
    Navigation,
    Epilogue,
    Quit,
}

impl MainMenuEntry {
    pub const ALL: [MainMenuEntry; 5] = [
        MainMenuEntry::StartGame,
        MainMenuEntry::Prologue,
        MainMenuEntry::Navigation,
        MainMenuEntry::Epilogue,
        MainMenuEntry::Quit,
    ];

    pub fn caption(self) -> &'static str {
        match self {
            MainMenuEntry::StartGame => "START GAME",
            MainMenuEntry::Prologue => "PROLOGUE",
            MainMenuEntry::Navigation => "SPACE NAVIGATION",
            MainMenuEntry::Epilogue => "EPILOGUE",
            MainMenuEntry::Quit => "QUIT",
        }
    }

    fn palette(self) -> ButtonPalette {
        match self {
            MainMenuEntry::StartGame => START,
            MainMenuEntry::Prologue | MainMenuEntry::Epilogue => STORY,
            MainMenuEntry::Navigation => NAVIGATE,
            MainMenuEntry::Quit => QUIT,
        }
    }

    /// Screen this entry leads to, with the story page set it needs.
    /// `None` means leave the game.
    pub fn target(self) -> Option<(GameState, Option<StoryScene>)> {
        match self {
            MainMenuEntry::StartGame => Some((GameState::LevelSelect, None)),
            MainMenuEntry::Prologue => Some((GameState::Story, Some(StoryScene::Prologue))),
            MainMenuEntry::Navigation => Some((GameState::Navigation, None)),
            MainMenuEntry::Epilogue => Some((GameState::Story, Some(StoryScene::Epilogue))),
            MainMenuEntry::Quit => None,
        }
    }
}

/// Spawn the full-screen title screen.
///
/// Layout:
/// ```text
/// ┌─────────────────────────────────────────────┐
/// │              SPACE RANGERS                  │
/// │     Recover the twelve zodiac gems          │
/// │                                             │
/// │           [ START GAME       ]              │
/// │           [ PROLOGUE         ]              │
/// │           [ SPACE NAVIGATION ]              │
/// │           [ EPILOGUE         ]              │
/// │           [ QUIT             ]              │
/// │                                             │
/// │     ↑↓ select  ·  ENTER confirm             │
/// └─────────────────────────────────────────────┘
/// ```
pub fn setup_main_menu(
    mut commands: Commands,
    font: Res<GameFont>,
    mut cursor: ResMut<MenuCursor>,
) {
    *cursor = MenuCursor::new(MainMenuEntry::ALL.len());

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(12.0),
                ..default()
            },
            BackgroundColor(Color::BLACK),
            MainMenuRoot,
        ))
        .with_children(|root| {
            label(root, &font, "SPACE RANGERS", 64.0, title_color());
            label(
                root,
                &font,
                "Recover the twelve zodiac gems",
                18.0,
                subtitle_color(),
            );

            spacer(root, 28.0);

            for (index, entry) in MainMenuEntry::ALL.into_iter().enumerate() {
                menu_button(
                    root,
                    &font,
                    entry.caption(),
                    Vec2::new(280.0, 50.0),
                    MenuItem {
                        index,
                        palette: entry.palette(),
                    },
                    (),
                );
            }

            spacer(root, 28.0);

            label(
                root,
                &font,
                "↑↓ select  ·  ENTER confirm  ·  mouse click",
                13.0,
                hint_color(),
            );
        });
}

/// Move the cursor and act on the activated entry.
pub fn main_menu_input(
    mut input: MenuInput,
    mut story: ResMut<StoryScene>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: MessageWriter<AppExit>,
) {
    let Some(index) = input.step() else {
        return;
    };
    let Some(entry) = MainMenuEntry::ALL.get(index).copied() else {
        return;
    };
    match entry.target() {
        Some((state, scene)) => {
            if let Some(scene) = scene {
                *story = scene;
            }
            next_state.set(state);
        }
        None => {
            info!("Quit selected from the main menu");
            exit.write(AppExit::Success);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_lead_where_their_captions_say() {
        assert_eq!(
            MainMenuEntry::StartGame.target(),
            Some((GameState::LevelSelect, None))
        );
        assert_eq!(
            MainMenuEntry::Epilogue.target(),
            Some((GameState::Story, Some(StoryScene::Epilogue)))
        );
        assert_eq!(MainMenuEntry::Quit.target(), None);
    }

    #[test]
    fn cursor_wraps_over_the_five_entries() {
        let mut cursor = MenuCursor::new(MainMenuEntry::ALL.len());
        cursor.prev();
        assert_eq!(MainMenuEntry::ALL[cursor.index], MainMenuEntry::Quit);
        cursor.next();
        assert_eq!(MainMenuEntry::ALL[cursor.index], MainMenuEntry::StartGame);
    }
}
