//! Neptune: steer a submarine to the 500 m mark, collecting coins.

use super::{Level, LevelOutcome, Planet, TickContext, FULL_ARENA};
use crate::canvas::Canvas;
use crate::collision::{rect, rects_overlap};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SUB_W: f32 = 50.0;
const SUB_H: f32 = 30.0;
const SUB_SPEED: f32 = 2.0;
const SUB_SPEED_LEFT: f32 = 4.0;
const SINK_RATE: f32 = 1.0;

const COIN_SIZE: f32 = 30.0;
const COIN_COUNT: usize = 2;
const OBSTACLE_SIZE: Vec2 = Vec2::new(50.0, 50.0);
const FISH_SIZE: Vec2 = Vec2::new(50.0, 30.0);
const SCROLL_SPEED: f32 = 2.0;
/// A hazard appears when a roll in `0..=100` lands below this.
const SPAWN_ROLL: u32 = 2;

/// Distance is counted in tenths of a metre, one per tick.
const FINISH_TENTHS: u32 = 5_000;
const COINS_NEEDED: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HazardKind {
    Rock,
    Fish,
}

impl HazardKind {
    fn size(self) -> Vec2 {
        match self {
            HazardKind::Rock => OBSTACLE_SIZE,
            HazardKind::Fish => FISH_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hazard {
    pos: Vec2,
    kind: HazardKind,
}

impl Hazard {
    fn bounds(&self) -> Rect {
        let size = self.kind.size();
        rect(self.pos.x, self.pos.y, size.x, size.y)
    }
}

pub struct Neptune {
    rng: StdRng,
    sub: Vec2,
    coins: Vec<Vec2>,
    hazards: Vec<Hazard>,
    tenths: u32,
    collected: u32,
}

impl Neptune {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut level = Self {
            rng,
            sub: Vec2::ZERO,
            coins: Vec::new(),
            hazards: Vec::new(),
            tenths: 0,
            collected: 0,
        };
        level.reset();
        level
    }

    /// Metres travelled so far.
    pub fn distance(&self) -> f32 {
        self.tenths as f32 / 10.0
    }

    pub fn coins_collected(&self) -> u32 {
        self.collected
    }

    fn random_y(&mut self, height: f32) -> f32 {
        self.rng.gen_range(0..=(FULL_ARENA.y - height) as i32) as f32
    }

    fn respawn_coin(&mut self, index: usize) {
        let x = FULL_ARENA.x + self.rng.gen_range(100..=300) as f32;
        let y = self.random_y(COIN_SIZE);
        self.coins[index] = Vec2::new(x, y);
    }

    fn maybe_spawn(&mut self, kind: HazardKind) {
        if self.rng.gen_range(0..=100) < SPAWN_ROLL {
            let y = self.random_y(kind.size().y);
            self.hazards.push(Hazard {
                pos: Vec2::new(FULL_ARENA.x, y),
                kind,
            });
        }
    }

    fn steer(&mut self, ctx: &TickContext) {
        let input = ctx.input;
        let mut step = Vec2::ZERO;
        if input.held(KeyCode::ArrowUp) {
            step.y -= SUB_SPEED;
        }
        if input.held(KeyCode::ArrowDown) {
            step.y += SUB_SPEED;
        }
        if input.held(KeyCode::ArrowLeft) {
            step.x -= SUB_SPEED_LEFT;
        }
        if input.held(KeyCode::ArrowRight) {
            step.x += SUB_SPEED;
        }
        step.y += SINK_RATE;
        self.sub = (self.sub + step).clamp(Vec2::ZERO, FULL_ARENA - Vec2::new(SUB_W, SUB_H));
    }
}

impl Default for Neptune {
    fn default() -> Self {
        Self::new()
    }
}

impl Level for Neptune {
    fn planet(&self) -> Planet {
        Planet::Neptune
    }

    fn reset(&mut self) {
        self.sub = ((FULL_ARENA - Vec2::new(SUB_W, SUB_H)) / 2.0).floor();
        self.coins.clear();
        for i in 0..COIN_COUNT {
            let y = self.random_y(COIN_SIZE);
            self.coins.push(Vec2::new(FULL_ARENA.x + i as f32 * 200.0, y));
        }
        self.hazards.clear();
        self.tenths = 0;
        self.collected = 0;
    }

    fn tick(&mut self, ctx: &mut TickContext) -> LevelOutcome {
        self.steer(ctx);
        self.tenths += 1;
        let sub = rect(self.sub.x, self.sub.y, SUB_W, SUB_H);

        for i in 0..self.coins.len() {
            self.coins[i].x -= SCROLL_SPEED;
            let coin = self.coins[i];
            if rects_overlap(sub, rect(coin.x, coin.y, COIN_SIZE, COIN_SIZE)) {
                self.collected += 1;
                self.respawn_coin(i);
            } else if coin.x < 0.0 {
                self.respawn_coin(i);
            }
        }

        let finished = self.tenths >= FINISH_TENTHS;
        if !finished {
            self.maybe_spawn(HazardKind::Rock);
            self.maybe_spawn(HazardKind::Fish);
        }
        for hazard in &mut self.hazards {
            hazard.pos.x -= SCROLL_SPEED;
        }
        self.hazards.retain(|h| h.pos.x + h.kind.size().x >= 0.0);
        if self.hazards.iter().any(|h| rects_overlap(sub, h.bounds())) {
            return LevelOutcome::Defeat;
        }

        match (finished, self.collected >= COINS_NEEDED) {
            (true, true) => LevelOutcome::Victory,
            (true, false) => LevelOutcome::Defeat,
            _ => LevelOutcome::Continue,
        }
    }

    fn draw(&self, canvas: &mut Canvas) {
        for coin in &self.coins {
            let half = COIN_SIZE / 2.0;
            canvas.fill_circle(*coin + Vec2::splat(half), half, Color::srgb_u8(255, 255, 0));
        }
        for hazard in &self.hazards {
            let size = hazard.kind.size();
            match hazard.kind {
                HazardKind::Rock => canvas.fill_rect(
                    hazard.pos.x,
                    hazard.pos.y,
                    size.x,
                    size.y,
                    Color::srgb_u8(169, 169, 169),
                ),
                HazardKind::Fish => {
                    let centre = hazard.pos + size / 2.0;
                    canvas.fill_ellipse(centre, size / 2.0, Color::srgb_u8(255, 0, 0));
                    canvas.fill_polygon(
                        vec![
                            Vec2::new(hazard.pos.x + size.x, centre.y),
                            Vec2::new(hazard.pos.x + size.x + 12.0, centre.y - 10.0),
                            Vec2::new(hazard.pos.x + size.x + 12.0, centre.y + 10.0),
                        ],
                        Color::srgb_u8(200, 0, 0),
                    );
                }
            }
        }

        let Vec2 { x, y } = self.sub;
        canvas.fill_ellipse(
            Vec2::new(x + SUB_W / 2.0, y + SUB_H / 2.0),
            Vec2::new(SUB_W / 2.0, SUB_H / 2.0),
            Color::srgb_u8(0, 0, 255),
        );
        canvas.fill_rect(x + 20.0, y - 8.0, 12.0, 10.0, Color::srgb_u8(0, 0, 200));
        canvas.fill_circle(Vec2::new(x + 36.0, y + SUB_H / 2.0), 4.0, Color::srgb_u8(200, 240, 255));

        let black = Color::BLACK;
        canvas.text(
            format!("Coins: {}/{}", self.collected, COINS_NEEDED),
            Vec2::new(20.0, 20.0),
            36.0,
            black,
        );
        canvas.text(
            format!("Distance: {} m", self.tenths / 10),
            Vec2::new(20.0, 60.0),
            36.0,
            black,
        );

        // Progress toward the finish line
        let progress = (self.tenths as f32 / FINISH_TENTHS as f32).min(1.0);
        canvas.stroke_rect(20.0, 100.0, 200.0, 10.0, black);
        canvas.fill_rect(20.0, 100.0, 200.0 * progress, 10.0, Color::srgb_u8(0, 255, 0));
    }
}
