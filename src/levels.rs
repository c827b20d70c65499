//! The nine planetary mini-games and the state flow that drives them.
//!
//! Each planet owns its rules behind the small [`Level`] trait: `reset`,
//! `tick` once per fixed step with an input snapshot, and `draw` onto the
//! [`Canvas`].  Everything around a level (intro dialogue, pause overlay,
//! victory/defeat screens, music and backdrop) is shared and lives in
//! [`flow`].
//!
//! ## Stage order
//!
//! | Stage | Planet  | Game                 | Arena     |
//! |-------|---------|----------------------|-----------|
//! | 1     | Earth   | Airplane Dodge       | 1200×800  |
//! | 2     | Mars    | Volcano Climbing     | 800×600   |
//! | 3     | Venus   | Zodiac Memory        | 1200×800  |
//! | 4     | Jupiter | Balance the Stones   | 1200×800  |
//! | 5     | Saturn  | Zodiac Jigsaw        | 800×600   |
//! | 6     | Uranus  | Balloon Pop          | 1200×800  |
//! | 7     | Neptune | Underwater Adventure | 1200×800  |
//! | 8     | Mercury | Trolley Problem      | 1200×800  |
//! | 9     | Sun     | Boss Fight           | 1200×800  |

pub mod earth;
pub mod flow;
pub mod input;
pub mod jupiter;
pub mod mars;
pub mod mercury;
pub mod neptune;
pub mod saturn;
pub mod sun;
pub mod uranus;
pub mod venus;

pub use flow::LevelsPlugin;
pub use input::{LevelInput, PendingInput};

use crate::audio::SoundCue;
use crate::canvas::Canvas;
use bevy::prelude::*;
use std::collections::BTreeSet;

/// Full-window arena used by most levels.
pub const FULL_ARENA: Vec2 = Vec2::new(1200.0, 800.0);

/// Smaller arena used by Mars and Saturn, centred in the window.
pub const SMALL_ARENA: Vec2 = Vec2::new(800.0, 600.0);

// ── Planets ───────────────────────────────────────────────────────────────────

/// Level identifiers in stage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Planet {
    Earth,
    Mars,
    Venus,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Mercury,
    Sun,
}

impl Planet {
    /// Every stage, in play order.
    pub const ALL: [Planet; 9] = [
        Planet::Earth,
        Planet::Mars,
        Planet::Venus,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Mercury,
        Planet::Sun,
    ];

    /// 1-based stage number.
    pub fn stage(self) -> usize {
        Planet::ALL
            .iter()
            .position(|p| *p == self)
            .map_or(0, |i| i + 1)
    }

    /// The stage after this one, if any.
    pub fn next(self) -> Option<Planet> {
        Planet::ALL.get(self.stage()).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
            Planet::Venus => "Venus",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
            Planet::Mercury => "Mercury",
            Planet::Sun => "Sun",
        }
    }

    /// Name of the mini-game.
    pub fn title(self) -> &'static str {
        match self {
            Planet::Earth => "Airplane Dodge",
            Planet::Mars => "Volcano Climbing",
            Planet::Venus => "Zodiac Memory",
            Planet::Jupiter => "Balance the Stones",
            Planet::Saturn => "Zodiac Jigsaw",
            Planet::Uranus => "Balloon Pop",
            Planet::Neptune => "Underwater Adventure",
            Planet::Mercury => "Trolley Problem",
            Planet::Sun => "Boss Fight",
        }
    }

    /// Window caption while the level runs.
    pub fn caption(self) -> String {
        format!("Space Rangers · {} · {}", self.name(), self.title())
    }

    /// Zodiac gems awarded on victory.
    pub fn gems(self) -> &'static [&'static str] {
        match self {
            Planet::Earth => &["Taurus"],
            Planet::Mars => &["Aries"],
            Planet::Venus => &["Gemini", "Virgo"],
            Planet::Jupiter => &["Libra"],
            Planet::Saturn => &["Scorpio", "Capricorn"],
            Planet::Uranus => &["Sagittarius"],
            Planet::Neptune => &["Aquarius", "Pisces"],
            Planet::Mercury => &["Cancer"],
            Planet::Sun => &["Leo"],
        }
    }

    /// Intro dialogue pages.
    pub fn intro(self) -> &'static [&'static str] {
        match self {
            Planet::Earth => &[
                "Welcome to Earth! Your mission is to navigate through the city.",
                "Hold SPACE to climb. Clear 20 buildings without touching them, the ground or the sky.",
            ],
            Planet::Mars => &[
                "Welcome to Mars! John, the Aries gem sits at the top of the great volcano.",
                "Move with LEFT and RIGHT, jump with SPACE and dodge the falling rocks until you reach 22000 m.",
            ],
            Planet::Venus => &[
                "Welcome to Venus! John, your mission is to match the cards with same zodiac name.",
            ],
            Planet::Jupiter => &[
                "Welcome to Jupiter! Three kinds of stones hide the Libra gem: gold, silver and copper.",
                "Drag stones onto the scale pans to compare them. Press ENTER when you are ready to guess each weight, type one digit per stone and press ENTER again.",
            ],
            Planet::Saturn => &[
                "Welcome to Saturn! The picture of two constellations was shattered around the rings.",
                "Drag the pieces to swap them and press ENTER to check your puzzle.",
            ],
            Planet::Uranus => &[
                "Welcome to Uranus! Pop the five red balloons with your bow.",
                "Click to shoot toward the cursor. Do not hit a gray balloon and do not waste an arrow.",
            ],
            Planet::Neptune => &[
                "Welcome to Neptune! Dive through the deep ocean and collect at least 10 coins before the 500 m mark.",
                "Steer with the arrow keys and stay clear of rocks and fish.",
            ],
            Planet::Mercury => &[
                "Welcome to Mercury! The trolley will stop at every fork and ask you a question.",
                "Press UP or DOWN to pick the track with the right answer. One wrong track ends the ride.",
            ],
            Planet::Sun => &[
                "This is it, John. The alien commander guards the shield machine inside the Sun.",
                "Move with LEFT and RIGHT and fire with SPACE. Bring its health down to zero!",
            ],
        }
    }

    /// Victory dialogue pages.
    pub fn victory(self) -> &'static [&'static str] {
        match self {
            Planet::Earth => &["Great flying! You made it through the city and found the Taurus gem."],
            Planet::Mars => &["You reached the summit! The Aries gem was waiting in the crater."],
            Planet::Venus => &[
                "Congratulations! You've successfully matched all the cards! Obtained the Gemini and the Virgo gem.",
                "John! It seems like we can not go to Mercury because of the heat barrier. We need to find Aquarius and Pisces to go through it!",
            ],
            Planet::Jupiter => &["The scale is at peace. You obtained the Libra gem."],
            Planet::Saturn => &["The constellations shine again. You obtained the Scorpio and the Capricorn gem."],
            Planet::Uranus => &["Every red balloon is gone! The Sagittarius gem drifts down into your hands."],
            Planet::Neptune => &[
                "You found the Aquarius and the Pisces gem in the deep!",
                "Their water can cool the heat barrier around Mercury.",
            ],
            Planet::Mercury => &["Five right answers! The Cancer gem is yours. Only the Sun remains."],
            Planet::Sun => &["The commander is defeated! The shield machine is within reach."],
        }
    }

    /// Defeat dialogue pages.
    pub fn defeat(self) -> &'static [&'static str] {
        match self {
            Planet::Earth => &["Your plane crashed. Press R to fly again."],
            Planet::Mars => &["A rock knocked you off the volcano. Press R to climb again."],
            Planet::Venus => &["The cards are hiding from you. Press R to try again."],
            Planet::Jupiter => &["Wrong weights. The scale tips away the Libra gem. Press R to try again."],
            Planet::Saturn => &["The picture is still broken. Press R to try again."],
            Planet::Uranus => &["That arrow went astray. Press R to try again."],
            Planet::Neptune => &["The ocean was too much this time. Press R to dive again."],
            Planet::Mercury => &["Wrong track! The trolley derailed. Press R to try again."],
            Planet::Sun => &["You were overwhelmed by the commander. Press R to fight again."],
        }
    }

    /// Background music under `assets/`.
    pub fn music(self) -> String {
        format!("audio/{}.mp3", self.name().to_lowercase())
    }

    /// Backdrop image under `assets/`.
    pub fn backdrop(self) -> String {
        format!("images/{}.png", self.name().to_lowercase())
    }

    /// Solid colour used when the backdrop image is missing.
    pub fn color(self) -> Color {
        match self {
            Planet::Earth => Color::srgb_u8(135, 206, 235),
            Planet::Mars => Color::srgb_u8(120, 40, 20),
            Planet::Venus => Color::srgb_u8(60, 30, 10),
            Planet::Jupiter => Color::srgb_u8(210, 180, 140),
            Planet::Saturn => Color::srgb_u8(40, 36, 30),
            Planet::Uranus => Color::srgb_u8(180, 240, 240),
            Planet::Neptune => Color::srgb_u8(0, 60, 140),
            Planet::Mercury => Color::srgb_u8(169, 169, 169),
            Planet::Sun => Color::srgb_u8(40, 10, 0),
        }
    }

    /// Fresh rules for this planet.
    pub fn build(self) -> Box<dyn Level> {
        match self {
            Planet::Earth => Box::new(earth::Earth::new()),
            Planet::Mars => Box::new(mars::Mars::new()),
            Planet::Venus => Box::new(venus::Venus::new()),
            Planet::Jupiter => Box::new(jupiter::Jupiter::new()),
            Planet::Saturn => Box::new(saturn::Saturn::new()),
            Planet::Uranus => Box::new(uranus::Uranus::new()),
            Planet::Neptune => Box::new(neptune::Neptune::new()),
            Planet::Mercury => Box::new(mercury::Mercury::new()),
            Planet::Sun => Box::new(sun::Sun::new()),
        }
    }
}

// ── Level contract ────────────────────────────────────────────────────────────

/// What a tick decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    Continue,
    Victory,
    Defeat,
}

/// Everything a level may read or emit during one tick.
pub struct TickContext<'a> {
    pub input: &'a LevelInput,
    /// Seconds covered by this tick.
    pub dt: f32,
    pub cues: &'a mut Vec<SoundCue>,
}

impl<'a> TickContext<'a> {
    pub fn new(input: &'a LevelInput, dt: f32, cues: &'a mut Vec<SoundCue>) -> Self {
        Self { input, dt, cues }
    }

    pub fn play(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }
}

/// A self-contained mini-game.
///
/// Coordinates are arena pixels with the origin at the top-left corner and y
/// growing downward.
pub trait Level: Send + Sync + 'static {
    fn planet(&self) -> Planet;

    /// Playfield size, centred in the window.
    fn arena(&self) -> Vec2 {
        FULL_ARENA
    }

    /// Reinitialise every piece of per-level state.
    fn reset(&mut self);

    /// Advance one fixed step.
    fn tick(&mut self, ctx: &mut TickContext) -> LevelOutcome;

    fn draw(&self, canvas: &mut Canvas);
}

// ── Session & progress ────────────────────────────────────────────────────────

/// The level currently loaded, if any.
#[derive(Resource, Default)]
pub struct LevelSession {
    level: Option<Box<dyn Level>>,
}

impl LevelSession {
    /// Load fresh rules for `planet`.
    pub fn start(&mut self, planet: Planet) {
        self.level = Some(planet.build());
    }

    pub fn restart(&mut self) {
        if let Some(level) = self.level.as_mut() {
            level.reset();
        }
    }

    pub fn end(&mut self) {
        self.level = None;
    }

    pub fn planet(&self) -> Option<Planet> {
        self.level.as_ref().map(|l| l.planet())
    }

    pub fn level(&self) -> Option<&dyn Level> {
        self.level.as_deref()
    }

    pub fn level_mut(&mut self) -> Option<&mut (dyn Level + 'static)> {
        self.level.as_deref_mut()
    }
}

/// Stages cleared and gems collected during this run.
#[derive(Resource, Debug, Clone, Default)]
pub struct Progress {
    cleared: BTreeSet<Planet>,
    gems: Vec<&'static str>,
}

impl Progress {
    /// Record a victory; gems are only granted the first time.
    pub fn clear(&mut self, planet: Planet) -> bool {
        let first = self.cleared.insert(planet);
        if first {
            self.gems.extend_from_slice(planet.gems());
        }
        first
    }

    pub fn is_cleared(&self, planet: Planet) -> bool {
        self.cleared.contains(&planet)
    }

    pub fn cleared_count(&self) -> usize {
        self.cleared.len()
    }

    pub fn gems(&self) -> &[&'static str] {
        &self.gems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order_and_next() {
        assert_eq!(Planet::Earth.stage(), 1);
        assert_eq!(Planet::Sun.stage(), 9);
        assert_eq!(Planet::Earth.next(), Some(Planet::Mars));
        assert_eq!(Planet::Neptune.next(), Some(Planet::Mercury));
        assert_eq!(Planet::Sun.next(), None);
    }

    #[test]
    fn all_twelve_zodiac_gems_are_awarded() {
        let total: usize = Planet::ALL.iter().map(|p| p.gems().len()).sum();
        assert_eq!(total, 12);
    }

    #[test]
    fn every_planet_builds_matching_rules() {
        for planet in Planet::ALL {
            let level = planet.build();
            assert_eq!(level.planet(), planet);
            assert!(!planet.intro().is_empty());
            assert!(!planet.victory().is_empty());
            assert!(!planet.defeat().is_empty());
        }
    }

    #[test]
    fn progress_grants_gems_once() {
        let mut progress = Progress::default();
        assert!(progress.clear(Planet::Venus));
        assert!(!progress.clear(Planet::Venus));
        assert_eq!(progress.gems(), &["Gemini", "Virgo"]);
        assert!(progress.is_cleared(Planet::Venus));
        assert!(!progress.is_cleared(Planet::Earth));
    }

    #[test]
    fn asset_paths_follow_the_planet_name() {
        assert_eq!(Planet::Mars.music(), "audio/mars.mp3");
        assert_eq!(Planet::Sun.backdrop(), "images/sun.png");
    }

    #[test]
    fn session_restart_keeps_the_planet() {
        let mut session = LevelSession::default();
        assert!(session.planet().is_none());
        session.start(Planet::Earth);
        session.restart();
        assert_eq!(session.planet(), Some(Planet::Earth));
        session.end();
        assert!(session.level().is_none());
    }
}
