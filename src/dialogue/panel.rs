//! Bevy UI panel that shows the active [`DialogueBox`].
//!
//! ## Systems (registered by `DialoguePlugin`)
//!
//! | System                  | Schedule       | Purpose                                   |
//! |-------------------------|----------------|-------------------------------------------|
//! | `tick_dialogue`         | `FixedUpdate`  | Reveal `reveal_step` characters per tick  |
//! | `sync_dialogue_panel`   | `Update`       | Spawn/refresh/despawn the panel UI        |
//!
//! Scenes never touch the UI directly: they call [`ActiveDialogue::open`]
//! when a message should appear and [`ActiveDialogue::close`] when it should
//! go away.  The panel follows on the next frame.

use super::{DialogueAdvance, DialogueBox, DialogueText, TextMeasure};
use crate::config::GameConfig;
use crate::graphics::GameFont;
use bevy::prelude::*;

/// Draw order of the panel above every other UI layer.
pub const DIALOGUE_Z: i32 = 400;

/// The dialogue currently on screen, if any.
#[derive(Resource, Default)]
pub struct ActiveDialogue {
    pub dialogue: Option<DialogueBox>,
    /// Bumped on every `open`, so back-to-back dialogues never share a layout key.
    opened: u64,
}

impl ActiveDialogue {
    /// Open a new dialogue sized to the configured panel.
    pub fn open(
        &mut self,
        text: impl Into<DialogueText>,
        config: &GameConfig,
        measure: &dyn TextMeasure,
    ) {
        let rect = config.dialogue.panel.resolve(config.window_size());
        let max_width = (rect.width() - 2.0 * config.dialogue.margin).max(1.0);
        let mut dialogue = DialogueBox::new(
            config.dialogue.reveal_step,
            max_width,
            config.dialogue.font_size,
        );
        dialogue.set_text(text, measure);
        self.dialogue = Some(dialogue);
        self.opened += 1;
    }

    /// Identifies the wrapped layout on screen.
    fn layout_key(&self) -> Option<(u64, u64)> {
        self.dialogue
            .as_ref()
            .map(|dialogue| (self.opened, dialogue.generation()))
    }

    pub fn close(&mut self) {
        self.dialogue = None;
    }

    pub fn is_open(&self) -> bool {
        self.dialogue.is_some()
    }

    /// No dialogue, or the open one has revealed its last page.
    pub fn is_finished(&self) -> bool {
        self.dialogue.as_ref().map_or(true, DialogueBox::is_finished)
    }

    /// Forward the confirm key; a closed dialogue counts as finished.
    pub fn confirm(&mut self) -> DialogueAdvance {
        match self.dialogue.as_mut() {
            Some(dialogue) => dialogue.confirm(),
            None => DialogueAdvance::Finished,
        }
    }
}

// ── Component markers ─────────────────────────────────────────────────────────

/// Root of the panel; remembers which layout it was built for.
#[derive(Component)]
pub struct DialoguePanel {
    key: (u64, u64),
}

/// One wrapped line inside the panel.
#[derive(Component)]
pub struct DialogueLine(pub usize);

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveDialogue>()
            .add_systems(FixedUpdate, tick_dialogue)
            .add_systems(Update, sync_dialogue_panel);
    }
}

/// Reveal more text once per fixed tick.
pub fn tick_dialogue(mut active: ResMut<ActiveDialogue>) {
    if let Some(dialogue) = active.dialogue.as_mut() {
        dialogue.update();
    }
}

fn panel_bg() -> Color {
    Color::BLACK
}
fn panel_border() -> Color {
    Color::WHITE
}
fn line_color() -> Color {
    Color::WHITE
}

/// Keep the panel UI in step with [`ActiveDialogue`].
///
/// The panel is rebuilt when the wrapped layout changes (new text or a page
/// turn); otherwise only the revealed prefixes are rewritten.
pub fn sync_dialogue_panel(
    mut commands: Commands,
    active: Res<ActiveDialogue>,
    config: Res<GameConfig>,
    font: Res<GameFont>,
    panels: Query<(Entity, &DialoguePanel)>,
    mut lines: Query<(&DialogueLine, &mut Text)>,
) {
    let (Some(dialogue), Some(key)) = (active.dialogue.as_ref(), active.layout_key()) else {
        for (entity, _) in &panels {
            commands.entity(entity).despawn();
        }
        return;
    };

    let visible = dialogue.visible_lines();
    let mut up_to_date = false;
    for (entity, panel) in &panels {
        if panel.key == key {
            up_to_date = true;
        } else {
            commands.entity(entity).despawn();
        }
    }

    if up_to_date {
        for (line, mut text) in &mut lines {
            let shown = visible.get(line.0).copied().unwrap_or("");
            if text.0 != shown {
                text.0 = shown.to_string();
            }
        }
        return;
    }

    let style = &config.dialogue;
    let rect = style.panel.resolve(config.window_size());
    commands
        .spawn((
            DialoguePanel { key },
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(rect.min.x - style.border),
                top: Val::Px(rect.min.y - style.border),
                width: Val::Px(rect.width() + 2.0 * style.border),
                height: Val::Px(rect.height() + 2.0 * style.border),
                border: UiRect::all(Val::Px(style.border)),
                padding: UiRect::all(Val::Px(style.margin)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(style.line_spacing),
                overflow: Overflow::clip(),
                ..default()
            },
            BackgroundColor(panel_bg()),
            BorderColor::all(panel_border()),
            ZIndex(DIALOGUE_Z),
        ))
        .with_children(|panel| {
            for index in 0..dialogue.lines().len() {
                let shown = visible.get(index).copied().unwrap_or("");
                panel.spawn((
                    DialogueLine(index),
                    Text::new(shown),
                    TextFont {
                        font: font.0.clone(),
                        font_size: dialogue.font_size(),
                        ..default()
                    },
                    TextColor(line_color()),
                    TextLayout::new_with_linebreak(LineBreak::NoWrap),
                ));
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::MonospaceMeasure;

    #[test]
    fn open_wraps_to_panel_interior() {
        let mut config = GameConfig::default();
        config.dialogue.margin = 10.0;
        config.dialogue.font_size = 1.0;
        config.dialogue.panel = crate::dialogue::PanelGeometry::Fixed {
            x: 0.0,
            y: 0.0,
            width: 60.0,
            height: 20.0,
        };
        let measure = MonospaceMeasure { advance_em: 1.0 };
        let mut active = ActiveDialogue::default();
        active.open(
            "Welcome to Earth! Your mission is to navigate through the city.",
            &config,
            &measure,
        );
        let lines = active.dialogue.as_ref().unwrap().lines().to_vec();
        assert!(lines.len() >= 2);
        assert!(lines.iter().all(|l| l.chars().count() <= 40));
    }

    #[test]
    fn tick_reveals_and_close_finishes() {
        let mut world = World::new();
        let mut active = ActiveDialogue::default();
        active.open(
            "Hi",
            &GameConfig::default(),
            &MonospaceMeasure::default(),
        );
        world.insert_resource(active);

        let mut schedule = Schedule::default();
        schedule.add_systems(tick_dialogue);
        schedule.run(&mut world);
        assert!(!world.resource::<ActiveDialogue>().is_finished());
        schedule.run(&mut world);
        assert!(world.resource::<ActiveDialogue>().is_finished());

        world.resource_mut::<ActiveDialogue>().close();
        assert!(world.resource::<ActiveDialogue>().is_finished());
        assert_eq!(
            world.resource_mut::<ActiveDialogue>().confirm(),
            DialogueAdvance::Finished
        );
    }
}
