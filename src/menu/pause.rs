use super::*;
use crate::levels::LevelSession;

/// Entries of the pause card, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseEntry {
    Resume,
    Restart,
    LevelSelect,
}

impl PauseEntry {
    pub const ALL: [PauseEntry; 3] = [
        PauseEntry::Resume,
        PauseEntry::Restart,
        PauseEntry::LevelSelect,
    ];

    fn caption(self) -> &'static str {
        match self {
            PauseEntry::Resume => "RESUME",
            PauseEntry::Restart => "RESTART",
            PauseEntry::LevelSelect => "LEVEL SELECT",
        }
    }

    fn palette(self) -> ButtonPalette {
        match self {
            PauseEntry::Resume => START,
            PauseEntry::Restart => STORY,
            PauseEntry::LevelSelect => QUIT,
        }
    }

    /// Mnemonic keys that work without moving the cursor.
    pub fn from_key(keys: &ButtonInput<KeyCode>) -> Option<PauseEntry> {
        if keys.just_pressed(KeyCode::Escape) {
            Some(PauseEntry::Resume)
        } else if keys.just_pressed(KeyCode::KeyR) {
            Some(PauseEntry::Restart)
        } else if keys.just_pressed(KeyCode::KeyQ) {
            Some(PauseEntry::LevelSelect)
        } else {
            None
        }
    }
}

/// ESC while in `Playing` → transition to `Paused`.
pub fn toggle_pause_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        next_state.set(GameState::Paused);
    }
}

/// Spawn the in-level pause overlay.
///
/// Layout (centred over the frozen level):
/// ```text
/// ┌─────────────────────────────────────────────┐
/// │ ░░░░░░░░░ semi-transparent overlay ░░░░░░░░ │
/// │ ░░░░░   ┌───────────────────────┐   ░░░░░░ │
/// │ ░░░░░   │        PAUSED         │   ░░░░░░ │
/// │ ░░░░░   │    [ RESUME       ]   │   ░░░░░░ │
/// │ ░░░░░   │    [ RESTART      ]   │   ░░░░░░ │
/// │ ░░░░░   │    [ LEVEL SELECT ]   │   ░░░░░░ │
/// │ ░░░░░   │  ESC · R · Q          │   ░░░░░░ │
/// │ ░░░░░   └───────────────────────┘   ░░░░░░ │
/// └─────────────────────────────────────────────┘
/// ```
pub fn setup_pause_menu(
    mut commands: Commands,
    font: Res<GameFont>,
    mut cursor: ResMut<MenuCursor>,
) {
    *cursor = MenuCursor::new(PauseEntry::ALL.len());

    spawn_overlay(
        &mut commands,
        0.70,
        200,
        Color::srgb(0.04, 0.04, 0.07),
        BACK.border,
        PauseMenuRoot,
        |card| {
            label(card, &font, "PAUSED", 38.0, title_color());
            spacer(card, 4.0);

            for (index, entry) in PauseEntry::ALL.into_iter().enumerate() {
                menu_button(
                    card,
                    &font,
                    entry.caption(),
                    Vec2::new(220.0, 48.0),
                    MenuItem {
                        index,
                        palette: entry.palette(),
                    },
                    (),
                );
            }

            spacer(card, 4.0);
            label(
                card,
                &font,
                "ESC resume  ·  R restart  ·  Q level select",
                12.0,
                hint_color(),
            );
        },
    );
}

/// Resume, restart in place, or leave for the level picker.
pub fn pause_menu_input(
    mut input: MenuInput,
    keys: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<LevelSession>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let chosen = PauseEntry::from_key(&keys)
        .or_else(|| input.step().and_then(|i| PauseEntry::ALL.get(i).copied()));
    match chosen {
        Some(PauseEntry::Resume) => next_state.set(GameState::Playing),
        Some(PauseEntry::Restart) => {
            session.restart();
            next_state.set(GameState::Playing);
        }
        Some(PauseEntry::LevelSelect) => next_state.set(GameState::LevelSelect),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonics_map_to_entries() {
        let mut keys = ButtonInput::<KeyCode>::default();
        assert_eq!(PauseEntry::from_key(&keys), None);
        keys.press(KeyCode::KeyR);
        assert_eq!(PauseEntry::from_key(&keys), Some(PauseEntry::Restart));
        keys.clear();
        keys.press(KeyCode::Escape);
        assert_eq!(PauseEntry::from_key(&keys), Some(PauseEntry::Resume));
    }
}
