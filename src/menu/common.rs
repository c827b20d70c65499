use super::*;

pub(super) const START: ButtonPalette = ButtonPalette {
    bg: Color::srgb(0.08, 0.36, 0.14),
    border: Color::srgb(0.18, 0.72, 0.28),
    text: Color::srgb(0.75, 1.0, 0.80),
};
pub(super) const STORY: ButtonPalette = ButtonPalette {
    bg: Color::srgb(0.10, 0.18, 0.36),
    border: Color::srgb(0.22, 0.44, 0.78),
    text: Color::srgb(0.65, 0.80, 1.0),
};
pub(super) const NAVIGATE: ButtonPalette = ButtonPalette {
    bg: Color::srgb(0.22, 0.15, 0.04),
    border: Color::srgb(0.62, 0.44, 0.12),
    text: Color::srgb(1.0, 0.80, 0.30),
};
pub(super) const QUIT: ButtonPalette = ButtonPalette {
    bg: Color::srgb(0.28, 0.06, 0.06),
    border: Color::srgb(0.60, 0.12, 0.12),
    text: Color::srgb(1.0, 0.65, 0.65),
};
pub(super) const STAGE: ButtonPalette = ButtonPalette {
    bg: Color::srgb(0.06, 0.09, 0.18),
    border: Color::srgb(0.22, 0.38, 0.72),
    text: Color::srgb(0.90, 0.90, 1.0),
};
pub(super) const CLEARED_STAGE: ButtonPalette = ButtonPalette {
    bg: Color::srgb(0.06, 0.16, 0.08),
    border: Color::srgb(0.18, 0.56, 0.18),
    text: Color::srgb(0.55, 1.0, 0.55),
};
pub(super) const BACK: ButtonPalette = ButtonPalette {
    bg: Color::srgb(0.12, 0.12, 0.18),
    border: Color::srgb(0.30, 0.30, 0.46),
    text: Color::srgb(0.55, 0.55, 0.70),
};

pub(super) fn title_color() -> Color {
    Color::srgb(0.95, 0.88, 0.45)
}
pub(super) fn subtitle_color() -> Color {
    Color::srgb(0.55, 0.55, 0.65)
}
pub(super) fn hint_color() -> Color {
    Color::srgb(0.40, 0.40, 0.50)
}
pub(super) fn gem_color() -> Color {
    Color::srgb(0.80, 0.95, 1.0)
}

pub(super) fn spacer(parent: &mut ChildSpawnerCommands<'_>, px: f32) {
    parent.spawn(Node {
        height: Val::Px(px),
        ..default()
    });
}

pub(super) fn label(
    parent: &mut ChildSpawnerCommands<'_>,
    font: &GameFont,
    text: impl Into<String>,
    size: f32,
    color: Color,
) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font: font.0.clone(),
            font_size: size,
            ..default()
        },
        TextColor(color),
    ));
}

/// Bordered button with a centred caption, selectable by the menu cursor.
pub(super) fn menu_button(
    parent: &mut ChildSpawnerCommands<'_>,
    font: &GameFont,
    caption: impl Into<String>,
    size: Vec2,
    item: MenuItem,
    extra: impl Bundle,
) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(size.x),
                height: Val::Px(size.y),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(item.palette.bg),
            BorderColor::all(item.palette.border),
            item,
            extra,
        ))
        .with_children(|btn| {
            label(btn, font, caption, 18.0, item.palette.text);
        });
}

/// Full-screen dim layer with a centred card, as used by in-level overlays.
pub(super) fn spawn_overlay(
    commands: &mut Commands,
    dim: f32,
    z: i32,
    card_bg: Color,
    card_border: Color,
    root: impl Bundle,
    build: impl FnOnce(&mut ChildSpawnerCommands<'_>),
) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, dim)),
            ZIndex(z),
            root,
        ))
        .with_children(|overlay| {
            overlay
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(36.0)),
                        row_gap: Val::Px(14.0),
                        border: UiRect::all(Val::Px(2.0)),
                        min_width: Val::Px(320.0),
                        ..default()
                    },
                    BackgroundColor(card_bg),
                    BorderColor::all(card_border),
                ))
                .with_children(build);
        });
}

/// Despawn every entity tagged `T`, children included.
pub(super) fn despawn_screen<T: Component>(
    mut commands: Commands,
    query: Query<Entity, With<T>>,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

/// Keyboard, hover and click handling shared by every menu.
#[derive(SystemParam)]
pub struct MenuInput<'w, 's> {
    keys: Res<'w, ButtonInput<KeyCode>>,
    cursor: ResMut<'w, MenuCursor>,
    clicks: Query<'w, 's, (&'static Interaction, &'static MenuItem), Changed<Interaction>>,
}

impl MenuInput<'_, '_> {
    /// Apply UP/DOWN and hover; returns the entry activated this frame.
    pub fn step(&mut self) -> Option<usize> {
        if self.keys.just_pressed(KeyCode::ArrowUp) {
            self.cursor.prev();
        }
        if self.keys.just_pressed(KeyCode::ArrowDown) {
            self.cursor.next();
        }

        let mut activated = None;
        for (interaction, item) in self.clicks.iter() {
            match interaction {
                Interaction::Pressed => {
                    self.cursor.select(item.index);
                    activated = Some(item.index);
                }
                Interaction::Hovered => self.cursor.select(item.index),
                Interaction::None => {}
            }
        }
        if self.keys.just_pressed(KeyCode::Enter) {
            activated = Some(self.cursor.index);
        }
        activated
    }

    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.keys.just_pressed(key)
    }

    pub fn cursor_mut(&mut self) -> &mut MenuCursor {
        &mut self.cursor
    }
}

/// Highlight the entry under the cursor and restore the others.
pub(super) fn paint_menu_items(
    cursor: Res<MenuCursor>,
    mut items: Query<(&MenuItem, &Children, &mut BorderColor, &mut BackgroundColor)>,
    mut texts: Query<&mut TextColor>,
) {
    for (item, children, mut border, mut bg) in items.iter_mut() {
        let selected = item.index == cursor.index;
        let (text, edge, fill) = if selected {
            (Color::WHITE, Color::WHITE, item.palette.border)
        } else {
            (item.palette.text, item.palette.border, item.palette.bg)
        };
        *border = BorderColor::all(edge);
        bg.0 = fill;
        for child in children.iter() {
            if let Ok(mut color) = texts.get_mut(child) {
                color.0 = text;
            }
        }
    }
}
