//! Space Rangers
//!
//! Nine planetary mini-games tied together by a title screen, a level picker,
//! a solar-system map and two story scenes.  Every scene talks to the player
//! through the same typewriter dialogue box.

pub mod audio;
pub mod canvas;
pub mod collision;
pub mod config;
pub mod constants;
pub mod dialogue;
pub mod error;
pub mod graphics;
pub mod levels;
pub mod menu;
pub mod navigation;
pub mod story;
