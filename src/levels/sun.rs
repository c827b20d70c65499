//! Sun: the final duel against the alien commander.
//!
//! Ships are 64 px sprites positioned by their top-left corner; hits are
//! measured between those corners.

use super::{Level, LevelOutcome, Planet, TickContext, FULL_ARENA};
use crate::audio::SoundCue;
use crate::canvas::Canvas;
use crate::collision::within_distance;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SHIP: f32 = 64.0;
const PLAYER_START: Vec2 = Vec2::new(600.0, 640.0);
const PLAYER_SPEED: f32 = 3.5;
const MAX_X: f32 = FULL_ARENA.x - SHIP;
const PLAYER_HP: u32 = 3;

const BOSS_START: Vec2 = Vec2::new(600.0, 75.0);
const BOSS_SPEED: f32 = 2.0;
const BOSS_HP: u32 = 100;
const LASER_DAMAGE: u32 = 10;

const SHOT_SPEED: f32 = 5.0;
const HIT_DISTANCE: f32 = 27.0;

pub struct Sun {
    rng: StdRng,
    player_x: f32,
    player_hp: u32,
    boss: Vec2,
    boss_dir: f32,
    boss_hp: u32,
    /// Laser in flight, top-left corner.
    laser: Option<Vec2>,
    bullets: Vec<Vec2>,
    fire_timer: f32,
    fire_interval: f32,
}

impl Sun {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut level = Self {
            rng,
            player_x: PLAYER_START.x,
            player_hp: PLAYER_HP,
            boss: BOSS_START,
            boss_dir: 1.0,
            boss_hp: BOSS_HP,
            laser: None,
            bullets: Vec::new(),
            fire_timer: 0.0,
            fire_interval: 1.0,
        };
        level.reset();
        level
    }

    pub fn boss_hp(&self) -> u32 {
        self.boss_hp
    }

    pub fn player_hp(&self) -> u32 {
        self.player_hp
    }

    fn player(&self) -> Vec2 {
        Vec2::new(self.player_x, PLAYER_START.y)
    }

    fn move_player(&mut self, ctx: &TickContext) {
        if ctx.input.held(KeyCode::ArrowLeft) {
            self.player_x -= PLAYER_SPEED;
        }
        if ctx.input.held(KeyCode::ArrowRight) {
            self.player_x += PLAYER_SPEED;
        }
        self.player_x = self.player_x.clamp(0.0, MAX_X);
    }

    fn move_boss(&mut self, dt: f32) {
        self.boss.x += BOSS_SPEED * self.boss_dir;
        if self.boss.x <= 0.0 {
            self.boss_dir = 1.0;
        } else if self.boss.x >= MAX_X {
            self.boss_dir = -1.0;
        }

        self.fire_timer += dt;
        if self.fire_timer >= self.fire_interval {
            self.bullets.push(self.boss);
            self.fire_timer = 0.0;
            self.fire_interval = self.rng.gen_range(1.0..=3.0);
        }
    }
}

impl Default for Sun {
    fn default() -> Self {
        Self::new()
    }
}

impl Level for Sun {
    fn planet(&self) -> Planet {
        Planet::Sun
    }

    fn reset(&mut self) {
        self.player_x = PLAYER_START.x;
        self.player_hp = PLAYER_HP;
        self.boss = BOSS_START;
        self.boss_dir = 1.0;
        self.boss_hp = BOSS_HP;
        self.laser = None;
        self.bullets.clear();
        self.fire_timer = 0.0;
        self.fire_interval = self.rng.gen_range(1.0..=3.0);
    }

    fn tick(&mut self, ctx: &mut TickContext) -> LevelOutcome {
        self.move_player(ctx);
        if ctx.input.pressed(KeyCode::Space) && self.laser.is_none() {
            self.laser = Some(self.player());
            ctx.play(SoundCue::Laser);
        }

        self.move_boss(ctx.dt);

        if let Some(laser) = self.laser.as_mut() {
            if within_distance(self.boss, *laser, HIT_DISTANCE) {
                self.laser = None;
                self.boss_hp = self.boss_hp.saturating_sub(LASER_DAMAGE);
                ctx.play(SoundCue::Explosion);
                if self.boss_hp == 0 {
                    return LevelOutcome::Victory;
                }
            } else {
                laser.y -= SHOT_SPEED;
                if laser.y <= 0.0 {
                    self.laser = None;
                }
            }
        }

        let player = self.player();
        let mut hits = 0;
        self.bullets.retain_mut(|bullet| {
            bullet.y += SHOT_SPEED;
            if within_distance(player, *bullet, HIT_DISTANCE) {
                hits += 1;
                return false;
            }
            bullet.y < FULL_ARENA.y
        });
        if hits > 0 {
            ctx.play(SoundCue::Explosion);
            self.player_hp = self.player_hp.saturating_sub(hits);
            if self.player_hp == 0 {
                return LevelOutcome::Defeat;
            }
        }
        LevelOutcome::Continue
    }

    fn draw(&self, canvas: &mut Canvas) {
        // Commander's saucer
        let boss_centre = self.boss + Vec2::splat(SHIP / 2.0);
        canvas.fill_ellipse(
            boss_centre + Vec2::new(0.0, 8.0),
            Vec2::new(32.0, 14.0),
            Color::srgb_u8(120, 200, 80),
        );
        canvas.fill_circle(boss_centre - Vec2::new(0.0, 4.0), 14.0, Color::srgb_u8(180, 255, 140));

        let p = self.player();
        canvas.fill_polygon(
            vec![
                p + Vec2::new(SHIP / 2.0, 0.0),
                p + Vec2::new(SHIP, SHIP),
                p + Vec2::new(0.0, SHIP),
            ],
            Color::srgb_u8(80, 160, 255),
        );

        if let Some(laser) = self.laser {
            canvas.fill_rect(laser.x + 28.0, laser.y + 10.0, 8.0, 24.0, Color::srgb_u8(255, 60, 60));
        }
        for bullet in &self.bullets {
            canvas.fill_circle(*bullet + Vec2::splat(SHIP / 2.0), 6.0, Color::srgb_u8(255, 220, 0));
        }

        canvas.text(format!("HP: {}", self.boss_hp), Vec2::new(10.0, 10.0), 32.0, Color::WHITE);
        canvas.text(
            format!("Shields: {}", self.player_hp),
            Vec2::new(10.0, 50.0),
            32.0,
            Color::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelInput;

    const DT: f32 = 1.0 / 60.0;

    fn tick_with(level: &mut Sun, input: &LevelInput) -> (LevelOutcome, Vec<SoundCue>) {
        let mut cues = Vec::new();
        let outcome = level.tick(&mut TickContext::new(input, DT, &mut cues));
        (outcome, cues)
    }

    fn tick(level: &mut Sun, input: &LevelInput) -> LevelOutcome {
        tick_with(level, input).0
    }

    /// Keep the commander from shooting during a test.
    fn hold_fire(level: &mut Sun) {
        level.fire_interval = f32::MAX;
        level.bullets.clear();
    }

    #[test]
    fn player_is_clamped() {
        let mut level = Sun::with_seed(1);
        hold_fire(&mut level);
        for _ in 0..400 {
            tick(&mut level, &LevelInput::holding(&[KeyCode::ArrowRight]));
        }
        assert_eq!(level.player_x, 1136.0);
        for _ in 0..400 {
            tick(&mut level, &LevelInput::holding(&[KeyCode::ArrowLeft]));
        }
        assert_eq!(level.player_x, 0.0);
    }

    #[test]
    fn boss_reverses_at_the_edge() {
        let mut level = Sun::with_seed(2);
        hold_fire(&mut level);
        level.boss.x = MAX_X - 1.0;
        tick(&mut level, &LevelInput::default());
        assert_eq!(level.boss_dir, -1.0);
        tick(&mut level, &LevelInput::default());
        assert!(level.boss.x < MAX_X);
    }

    #[test]
    fn one_laser_at_a_time_with_a_sound() {
        let mut level = Sun::with_seed(3);
        hold_fire(&mut level);
        let (_, cues) = tick_with(&mut level, &LevelInput::tapped(&[KeyCode::Space]));
        assert_eq!(cues, vec![SoundCue::Laser]);
        let first = level.laser.unwrap();
        let (_, cues) = tick_with(&mut level, &LevelInput::tapped(&[KeyCode::Space]));
        assert!(cues.is_empty());
        assert_eq!(level.laser.unwrap().y, first.y - SHOT_SPEED);
    }

    #[test]
    fn laser_hit_costs_the_boss_ten() {
        let mut level = Sun::with_seed(4);
        hold_fire(&mut level);
        level.boss_dir = 0.0;
        level.laser = Some(level.boss + Vec2::new(0.0, 10.0));
        let (outcome, cues) = tick_with(&mut level, &LevelInput::default());
        assert_eq!(outcome, LevelOutcome::Continue);
        assert_eq!(level.boss_hp(), 90);
        assert_eq!(cues, vec![SoundCue::Explosion]);
        assert!(level.laser.is_none());
    }

    #[test]
    fn last_hit_on_the_boss_wins() {
        let mut level = Sun::with_seed(5);
        hold_fire(&mut level);
        level.boss_dir = 0.0;
        level.boss_hp = LASER_DAMAGE;
        level.laser = Some(level.boss);
        assert_eq!(tick(&mut level, &LevelInput::default()), LevelOutcome::Victory);
    }

    #[test]
    fn commander_fires_within_three_seconds() {
        let mut level = Sun::with_seed(6);
        level.player_x = 0.0;
        for _ in 0..185 {
            tick(&mut level, &LevelInput::default());
        }
        assert!(!level.bullets.is_empty());
    }

    #[test]
    fn losing_the_last_shield_is_defeat() {
        let mut level = Sun::with_seed(7);
        hold_fire(&mut level);
        level.bullets.push(level.player() - Vec2::new(0.0, SHOT_SPEED));
        assert_eq!(tick(&mut level, &LevelInput::default()), LevelOutcome::Continue);
        assert_eq!(level.player_hp(), 2);
        level.player_hp = 1;
        level.bullets.push(level.player() - Vec2::new(0.0, SHOT_SPEED));
        assert_eq!(tick(&mut level, &LevelInput::default()), LevelOutcome::Defeat);
    }

    #[test]
    fn bullets_leave_at_the_bottom() {
        let mut level = Sun::with_seed(8);
        hold_fire(&mut level);
        level.bullets.push(Vec2::new(0.0, FULL_ARENA.y - 2.0));
        level.player_x = 1000.0;
        tick(&mut level, &LevelInput::default());
        assert!(level.bullets.is_empty());
    }
}
