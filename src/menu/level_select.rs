use super::*;
use crate::levels::{LevelSession, Planet, Progress};

/// Stages per side column; the last stage sits alone below them.
const COLUMN_LEN: usize = 4;
const BUTTON_SIZE: Vec2 = Vec2::new(340.0, 54.0);

/// Cursor index after LEFT/RIGHT: stages 1–4 face 5–8, the Sun stays put.
pub fn column_jump(index: usize, key: KeyCode) -> usize {
    match key {
        KeyCode::ArrowRight if index < COLUMN_LEN => index + COLUMN_LEN,
        KeyCode::ArrowLeft if (COLUMN_LEN..2 * COLUMN_LEN).contains(&index) => {
            index - COLUMN_LEN
        }
        _ => index,
    }
}

fn stage_caption(planet: Planet, cleared: bool) -> String {
    let mark = if cleared { "  (cleared)" } else { "" };
    format!("{}. {} · {}{mark}", planet.stage(), planet.name(), planet.title())
}

fn gems_line(progress: &Progress) -> String {
    if progress.gems().is_empty() {
        "Gems: none yet".to_string()
    } else {
        format!(
            "Gems ({}/12): {}",
            progress.gems().len(),
            progress.gems().join(", ")
        )
    }
}

fn stage_button(
    parent: &mut ChildSpawnerCommands<'_>,
    font: &GameFont,
    progress: &Progress,
    index: usize,
) {
    let planet = Planet::ALL[index];
    let cleared = progress.is_cleared(planet);
    menu_button(
        parent,
        font,
        stage_caption(planet, cleared),
        BUTTON_SIZE,
        MenuItem {
            index,
            palette: if cleared { CLEARED_STAGE } else { STAGE },
        },
        (),
    );
}

/// Spawn the stage picker.
///
/// Layout:
/// ```text
/// ┌──────────────────────────────────────────────────┐
/// │                 SELECT A STAGE                   │
/// │   [ 1. Earth   ]              [ 5. Saturn  ]     │
/// │   [ 2. Mars    ]              [ 6. Uranus  ]     │
/// │   [ 3. Venus   ]              [ 7. Neptune ]     │
/// │   [ 4. Jupiter ]              [ 8. Mercury ]     │
/// │                  [ 9. Sun ]                      │
/// │            Gems: Taurus, Aries, …                │
/// └──────────────────────────────────────────────────┘
/// ```
pub fn setup_level_select(
    mut commands: Commands,
    font: Res<GameFont>,
    progress: Res<Progress>,
    mut cursor: ResMut<MenuCursor>,
) {
    *cursor = MenuCursor::new(Planet::ALL.len());

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(14.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.02, 0.02, 0.05)),
            LevelSelectRoot,
        ))
        .with_children(|root| {
            label(root, &font, "SELECT A STAGE", 44.0, title_color());
            spacer(root, 10.0);

            root.spawn(Node {
                flex_direction: FlexDirection::Row,
                column_gap: Val::Px(120.0),
                ..default()
            })
            .with_children(|columns| {
                for column in 0..2 {
                    columns
                        .spawn(Node {
                            flex_direction: FlexDirection::Column,
                            row_gap: Val::Px(12.0),
                            ..default()
                        })
                        .with_children(|col| {
                            for row in 0..COLUMN_LEN {
                                stage_button(col, &font, &progress, column * COLUMN_LEN + row);
                            }
                        });
                }
            });

            stage_button(root, &font, &progress, 2 * COLUMN_LEN);

            spacer(root, 10.0);
            label(root, &font, gems_line(&progress), 16.0, gem_color());
            label(
                root,
                &font,
                "↑↓ select  ·  ←→ switch column  ·  ENTER play  ·  ESC back",
                13.0,
                hint_color(),
            );
        });
}

/// Columns, activation and the way back to the title screen.
pub fn level_select_input(
    mut input: MenuInput,
    mut session: ResMut<LevelSession>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if input.just_pressed(KeyCode::Escape) || input.just_pressed(KeyCode::Backspace) {
        next_state.set(GameState::MainMenu);
        return;
    }
    for key in [KeyCode::ArrowLeft, KeyCode::ArrowRight] {
        if input.just_pressed(key) {
            let cursor = input.cursor_mut();
            cursor.index = column_jump(cursor.index, key);
        }
    }

    let Some(index) = input.step() else {
        return;
    };
    if let Some(planet) = Planet::ALL.get(index).copied() {
        session.start(planet);
        next_state.set(GameState::Intro);
    }
}
