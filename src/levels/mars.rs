//! Mars: climb the volcano while dodging falling rocks.

use super::{Level, LevelOutcome, Planet, TickContext, SMALL_ARENA};
use crate::canvas::Canvas;
use crate::collision::{rect, rects_overlap};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SHIP_W: f32 = 50.0;
const SHIP_H: f32 = 60.0;
const SHIP_SPEED: f32 = 5.0;
const JUMP_VELOCITY: f32 = -10.0;
const GRAVITY: f32 = 1.0;

const ROCK_SIZE: f32 = 50.0;
const ROCK_SPEED: f32 = 5.0;
const FIRST_ROCK_SECS: f32 = 2.0;

/// Height gained per tick.
const CLIMB_RATE: u32 = 5;
const TARGET_HEIGHT: u32 = 22_000;

pub struct Mars {
    rng: StdRng,
    ship: Vec2,
    velocity: f32,
    airborne: bool,
    rocks: Vec<Vec2>,
    rock_timer: f32,
    rock_interval: f32,
    height: u32,
}

impl Mars {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut level = Self {
            rng,
            ship: Vec2::ZERO,
            velocity: 0.0,
            airborne: false,
            rocks: Vec::new(),
            rock_timer: 0.0,
            rock_interval: FIRST_ROCK_SECS,
            height: 0,
        };
        level.reset();
        level
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn ground(&self) -> f32 {
        SMALL_ARENA.y - SHIP_H
    }
}

impl Default for Mars {
    fn default() -> Self {
        Self::new()
    }
}

impl Level for Mars {
    fn planet(&self) -> Planet {
        Planet::Mars
    }

    fn arena(&self) -> Vec2 {
        SMALL_ARENA
    }

    fn reset(&mut self) {
        self.ship = Vec2::new(SMALL_ARENA.x / 2.0, self.ground());
        self.velocity = 0.0;
        self.airborne = false;
        self.rocks.clear();
        self.rock_timer = 0.0;
        self.rock_interval = FIRST_ROCK_SECS;
        self.height = 0;
    }

    fn tick(&mut self, ctx: &mut TickContext) -> LevelOutcome {
        let input = ctx.input;
        if input.pressed(KeyCode::Space) && !self.airborne {
            self.airborne = true;
            self.velocity = JUMP_VELOCITY;
        }
        if input.held(KeyCode::ArrowLeft) {
            self.ship.x -= SHIP_SPEED;
        }
        if input.held(KeyCode::ArrowRight) {
            self.ship.x += SHIP_SPEED;
        }
        self.ship.x = self.ship.x.clamp(0.0, SMALL_ARENA.x - SHIP_W);

        if self.airborne {
            self.ship.y += self.velocity;
            self.velocity += GRAVITY;
            if self.ship.y >= self.ground() {
                self.ship.y = self.ground();
                self.airborne = false;
            }
        }

        self.height += CLIMB_RATE;
        if self.height >= TARGET_HEIGHT {
            return LevelOutcome::Victory;
        }

        self.rock_timer += ctx.dt;
        if self.rock_timer > self.rock_interval {
            let x = self.rng.gen_range(0.0..=SMALL_ARENA.x - ROCK_SIZE);
            self.rocks.push(Vec2::new(x, 0.0));
            self.rock_timer = 0.0;
            self.rock_interval = self.rng.gen_range(1.0..=3.0);
        }

        let ship = rect(self.ship.x, self.ship.y, SHIP_W, SHIP_H);
        let mut hit = false;
        for rock in &mut self.rocks {
            rock.y += ROCK_SPEED;
            hit |= rects_overlap(ship, rect(rock.x, rock.y, ROCK_SIZE, ROCK_SIZE));
        }
        self.rocks.retain(|r| r.y <= SMALL_ARENA.y);

        if hit {
            LevelOutcome::Defeat
        } else {
            LevelOutcome::Continue
        }
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.set_arena(SMALL_ARENA);
        for rock in &self.rocks {
            let centre = *rock + Vec2::splat(ROCK_SIZE / 2.0);
            canvas.fill_circle(centre, ROCK_SIZE / 2.0, Color::srgb_u8(90, 70, 60));
            canvas.stroke_circle(centre, ROCK_SIZE / 2.0, Color::srgb_u8(40, 30, 25));
        }

        // Saucer-style ship: dome over a wide hull
        let Vec2 { x, y } = self.ship;
        canvas.fill_ellipse(
            Vec2::new(x + SHIP_W / 2.0, y + 22.0),
            Vec2::new(14.0, 18.0),
            Color::srgb_u8(140, 220, 255),
        );
        canvas.fill_ellipse(
            Vec2::new(x + SHIP_W / 2.0, y + 42.0),
            Vec2::new(SHIP_W / 2.0, 12.0),
            Color::srgb_u8(200, 200, 210),
        );
        canvas.fill_rect(x + 10.0, y + 52.0, 30.0, 8.0, Color::srgb_u8(255, 200, 0));

        canvas.text(
            format!("Height: {}m", self.height),
            Vec2::new(10.0, 10.0),
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

    fn tick(level: &mut Mars, input: &LevelInput) -> LevelOutcome {
        let mut cues = Vec::new();
        level.tick(&mut TickContext::new(input, DT, &mut cues))
    }

    #[test]
    fn ship_is_clamped_to_the_arena() {
        let mut level = Mars::with_seed(1);
        let left = LevelInput::holding(&[KeyCode::ArrowLeft]);
        for _ in 0..100 {
            tick(&mut level, &left);
            level.rocks.clear();
        }
        assert_eq!(level.ship.x, 0.0);
        let right = LevelInput::holding(&[KeyCode::ArrowRight]);
        for _ in 0..200 {
            tick(&mut level, &right);
            level.rocks.clear();
        }
        assert_eq!(level.ship.x, SMALL_ARENA.x - SHIP_W);
    }

    #[test]
    fn jump_lands_back_on_the_ground() {
        let mut level = Mars::with_seed(2);
        tick(&mut level, &LevelInput::tapped(&[KeyCode::Space]));
        assert!(level.airborne);
        assert!(level.ship.y < level.ground());
        for _ in 0..30 {
            tick(&mut level, &LevelInput::default());
        }
        assert!(!level.airborne);
        assert_eq!(level.ship.y, level.ground());
    }

    #[test]
    fn first_rock_arrives_after_two_seconds() {
        let mut level = Mars::with_seed(3);
        for _ in 0..119 {
            tick(&mut level, &LevelInput::default());
        }
        assert!(level.rocks.is_empty());
        for _ in 0..3 {
            tick(&mut level, &LevelInput::default());
        }
        assert_eq!(level.rocks.len(), 1);
        assert!((1.0..=3.0).contains(&level.rock_interval));
    }

    #[test]
    fn rock_on_the_ship_is_defeat() {
        let mut level = Mars::with_seed(4);
        level.rocks.push(level.ship + Vec2::new(0.0, -ROCK_SIZE));
        assert_eq!(tick(&mut level, &LevelInput::default()), LevelOutcome::Defeat);
    }

    #[test]
    fn rocks_below_the_arena_are_removed() {
        let mut level = Mars::with_seed(5);
        level.rocks.push(Vec2::new(0.0, SMALL_ARENA.y - 2.0));
        level.ship.x = 500.0;
        tick(&mut level, &LevelInput::default());
        assert!(level.rocks.is_empty());
    }

    #[test]
    fn reaching_the_summit_is_victory() {
        let mut level = Mars::with_seed(6);
        level.height = TARGET_HEIGHT - CLIMB_RATE;
        assert_eq!(tick(&mut level, &LevelInput::default()), LevelOutcome::Victory);
        level.reset();
        assert_eq!(level.height(), 0);
        assert!(level.rocks.is_empty());
    }
}
