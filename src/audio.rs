//! Background music and sound-effect cues.
//!
//! Levels never touch the audio engine.  They push a [`SoundCue`] from their
//! tick and [`play_sound_cues`] turns queued cues into one-shot players.
//! Every audio file is optional: a missing file is skipped with a warning
//! (once per file) and the game carries on in silence.

use crate::config::GameConfig;
use crate::graphics::asset_exists;
use bevy::audio::Volume;
use bevy::prelude::*;
use std::collections::HashSet;

/// One-shot sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Player fires the laser.
    Laser,
    /// Something is destroyed or hit hard.
    Explosion,
}

impl SoundCue {
    /// File under `assets/`.
    pub fn path(self) -> &'static str {
        match self {
            SoundCue::Laser => "audio/laser.wav",
            SoundCue::Explosion => "audio/explosion.wav",
        }
    }
}

/// Cues emitted since the last frame.
#[derive(Resource, Debug, Default)]
pub struct SoundQueue(pub Vec<SoundCue>);

/// Files already reported missing.
#[derive(Resource, Debug, Default)]
pub struct MissingAudio(HashSet<String>);

impl MissingAudio {
    /// `true` when `path` exists; warns the first time it does not.
    pub fn check(&mut self, path: &str) -> bool {
        if asset_exists(path) {
            return true;
        }
        if self.0.insert(path.to_string()) {
            warn!("{}; playing without it", crate::error::GameError::AssetMissing {
                path: path.to_string()
            });
        }
        false
    }
}

/// Marks a looping music player.
#[derive(Component)]
pub struct Music;

/// Start looping `path` if the file exists.
pub fn spawn_music(
    commands: &mut Commands,
    asset_server: &AssetServer,
    missing: &mut MissingAudio,
    config: &GameConfig,
    path: &str,
    bundle: impl Bundle,
) -> Option<Entity> {
    if !missing.check(path) {
        return None;
    }
    let entity = commands
        .spawn((
            Music,
            AudioPlayer::new(asset_server.load(path.to_string())),
            PlaybackSettings::LOOP.with_volume(Volume::Linear(config.music_volume)),
            bundle,
        ))
        .id();
    info!("Playing music {path}");
    Some(entity)
}

/// Turn queued cues into one-shot players.
pub fn play_sound_cues(
    mut commands: Commands,
    mut queue: ResMut<SoundQueue>,
    mut missing: ResMut<MissingAudio>,
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
) {
    for cue in queue.0.drain(..) {
        if !missing.check(cue.path()) {
            continue;
        }
        commands.spawn((
            AudioPlayer::new(asset_server.load(cue.path())),
            PlaybackSettings::DESPAWN.with_volume(Volume::Linear(config.sfx_volume)),
        ));
    }
}

pub struct SoundPlugin;

impl Plugin for SoundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SoundQueue>()
            .init_resource::<MissingAudio>()
            .add_systems(Update, play_sound_cues);
    }
}
