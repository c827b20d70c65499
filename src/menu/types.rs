use crate::levels::flow::ResultChoice;
use bevy::prelude::*;

/// Top-level application state machine.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Title screen; shown on startup.
    #[default]
    MainMenu,
    /// Nine-stage picker.
    LevelSelect,
    /// Free-roam solar-system map.
    Navigation,
    /// Prologue or epilogue pages, see [`crate::story::StoryScene`].
    Story,
    /// Loaded level behind its intro dialogue.
    Intro,
    /// Level rules ticking.
    Playing,
    /// Level frozen; pause overlay visible.
    Paused,
    /// Level won; result overlay and victory dialogue.
    Victory,
    /// Level lost; result overlay and defeat dialogue.
    Defeat,
}

impl GameState {
    /// States in which the loaded level is drawn.
    pub fn shows_level(self) -> bool {
        matches!(
            self,
            GameState::Intro
                | GameState::Playing
                | GameState::Paused
                | GameState::Victory
                | GameState::Defeat
        )
    }
}

/// Highlighted entry of whichever menu is on screen.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuCursor {
    pub index: usize,
    pub len: usize,
}

impl MenuCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    /// Move down, wrapping past the last entry.
    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    /// Move up, wrapping past the first entry.
    pub fn prev(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    pub fn select(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }
}

/// Look of a menu button in its idle state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonPalette {
    pub bg: Color,
    pub border: Color,
    pub text: Color,
}

/// A selectable entry; `index` is its position in the cursor order.
#[derive(Component, Debug, Clone, Copy)]
pub struct MenuItem {
    pub index: usize,
    pub palette: ButtonPalette,
}

/// Root node of the main-menu UI; despawned on `OnExit(MainMenu)`.
#[derive(Component)]
pub struct MainMenuRoot;

/// Root node of the level picker; despawned on `OnExit(LevelSelect)`.
#[derive(Component)]
pub struct LevelSelectRoot;

/// Root node of the pause overlay; despawned on `OnExit(Paused)`.
#[derive(Component)]
pub struct PauseMenuRoot;

/// Root node of the victory/defeat overlay.
#[derive(Component)]
pub struct ResultRoot;

/// Clickable shortcut on the result overlay.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultButton(pub ResultChoice);
