//! Per-tick input snapshot handed to levels.
//!
//! Bevy's input resources are updated once per frame, while levels tick in
//! `FixedUpdate`.  [`collect_level_input`] folds every frame's edges into
//! [`PendingInput`]; the next fixed tick takes the edges and keeps the held
//! state, so a key tapped between two ticks is never lost.

use crate::canvas::arena_origin;
use crate::config::GameConfig;
use crate::levels::LevelSession;
use bevy::input::keyboard::KeyboardInput;
use bevy::input::mouse::AccumulatedMouseScroll;
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use std::collections::HashSet;

/// What the player is doing, as seen by one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelInput {
    /// Keys down right now.
    pub held: HashSet<KeyCode>,
    /// Keys pressed since the previous tick, in the order they went down.
    pub pressed: Vec<KeyCode>,
    /// Cursor in arena coordinates, if it is over the window.
    pub cursor: Option<Vec2>,
    pub mouse_pressed: bool,
    pub mouse_held: bool,
    pub mouse_released: bool,
    /// Wheel lines since the previous tick, positive away from the user.
    pub scroll: f32,
}

impl LevelInput {
    pub fn held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    pub fn pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Snapshot with `keys` tapped this tick.
    pub fn tapped(keys: &[KeyCode]) -> Self {
        Self {
            pressed: keys.to_vec(),
            held: keys.iter().copied().collect(),
            ..default()
        }
    }

    /// Snapshot with `keys` held down.
    pub fn holding(keys: &[KeyCode]) -> Self {
        Self {
            held: keys.iter().copied().collect(),
            ..default()
        }
    }

    /// Snapshot of a left click at `at`.
    pub fn click(at: Vec2) -> Self {
        Self {
            cursor: Some(at),
            mouse_pressed: true,
            mouse_held: true,
            ..default()
        }
    }

    /// Snapshot of the mouse button held at `at`.
    pub fn drag(at: Vec2) -> Self {
        Self {
            cursor: Some(at),
            mouse_held: true,
            ..default()
        }
    }

    /// Snapshot of the mouse button released at `at`.
    pub fn release(at: Vec2) -> Self {
        Self {
            cursor: Some(at),
            mouse_released: true,
            ..default()
        }
    }
}

/// Digit typed by `key`, from the top row or the keypad.
pub fn digit_of(key: KeyCode) -> Option<u8> {
    let digit = match key {
        KeyCode::Digit0 | KeyCode::Numpad0 => 0,
        KeyCode::Digit1 | KeyCode::Numpad1 => 1,
        KeyCode::Digit2 | KeyCode::Numpad2 => 2,
        KeyCode::Digit3 | KeyCode::Numpad3 => 3,
        KeyCode::Digit4 | KeyCode::Numpad4 => 4,
        KeyCode::Digit5 | KeyCode::Numpad5 => 5,
        KeyCode::Digit6 | KeyCode::Numpad6 => 6,
        KeyCode::Digit7 | KeyCode::Numpad7 => 7,
        KeyCode::Digit8 | KeyCode::Numpad8 => 8,
        KeyCode::Digit9 | KeyCode::Numpad9 => 9,
        _ => return None,
    };
    Some(digit)
}

/// Input accumulated since the last fixed tick.
#[derive(Resource, Debug, Default)]
pub struct PendingInput(LevelInput);

impl PendingInput {
    /// Snapshot for one tick; edges are consumed, held state is kept.
    pub fn take(&mut self) -> LevelInput {
        let snapshot = self.0.clone();
        self.0.pressed.clear();
        self.0.mouse_pressed = false;
        self.0.mouse_released = false;
        self.0.scroll = 0.0;
        snapshot
    }

    pub fn reset(&mut self) {
        self.0 = LevelInput::default();
    }

    /// Fold one frame of input in.
    pub fn record(&mut self, frame: LevelInput) {
        self.0.held = frame.held;
        self.0.pressed.extend(frame.pressed);
        self.0.cursor = frame.cursor;
        self.0.mouse_pressed |= frame.mouse_pressed;
        self.0.mouse_held = frame.mouse_held;
        self.0.mouse_released |= frame.mouse_released;
        self.0.scroll += frame.scroll;
    }
}

/// Read Bevy's input resources into [`PendingInput`].
///
/// Press order comes from the keyboard messages; `ButtonInput` only keeps a set.
#[allow(clippy::too_many_arguments)]
pub fn collect_level_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut key_events: MessageReader<KeyboardInput>,
    mouse: Res<ButtonInput<MouseButton>>,
    scroll: Res<AccumulatedMouseScroll>,
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<GameConfig>,
    session: Res<LevelSession>,
    mut pending: ResMut<PendingInput>,
) {
    let arena = session
        .level()
        .map_or(config.window_size(), |level| level.arena());
    let origin = arena_origin(config.window_size(), arena);
    let cursor = windows
        .single()
        .ok()
        .and_then(Window::cursor_position)
        .map(|p| p - origin);

    pending.record(LevelInput {
        held: keys.get_pressed().copied().collect(),
        pressed: key_events
            .read()
            .filter(|event| event.state == ButtonState::Pressed && !event.repeat)
            .map(|event| event.key_code)
            .collect(),
        cursor,
        mouse_pressed: mouse.just_pressed(MouseButton::Left),
        mouse_held: mouse.pressed(MouseButton::Left),
        mouse_released: mouse.just_released(MouseButton::Left),
        scroll: scroll.delta.y,
    });
}
