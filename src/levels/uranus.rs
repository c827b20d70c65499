//! Uranus: pop the red balloons with a bow, never a gray one.

use super::{Level, LevelOutcome, Planet, TickContext, FULL_ARENA};
use crate::canvas::Canvas;
use crate::collision::within_distance;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

const BALLOON_RADIUS: f32 = 30.0;
const RED_BALLOONS: usize = 5;
const GRAY_BALLOONS: usize = 10;
const SPAWN_INSET: i32 = 50;

const BOW: Vec2 = Vec2::new(FULL_ARENA.x / 2.0, FULL_ARENA.y - 50.0);
const AIM_LENGTH: f32 = 50.0;
const ARROW_SPEED: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BalloonColor {
    Red,
    Gray,
}

#[derive(Debug, Clone, PartialEq)]
struct Balloon {
    pos: Vec2,
    velocity: Vec2,
    color: BalloonColor,
}

impl Balloon {
    fn drift(&mut self) {
        self.pos += self.velocity;
        if self.pos.x < 0.0 {
            self.velocity.x = self.velocity.x.abs();
        } else if self.pos.x > FULL_ARENA.x {
            self.velocity.x = -self.velocity.x.abs();
        }
        if self.pos.y < 0.0 {
            self.velocity.y = self.velocity.y.abs();
        } else if self.pos.y > FULL_ARENA.y {
            self.velocity.y = -self.velocity.y.abs();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Arrow {
    tip: Vec2,
    velocity: Vec2,
}

pub struct Uranus {
    rng: StdRng,
    balloons: Vec<Balloon>,
    arrow: Option<Arrow>,
    cursor: Option<Vec2>,
    popped: u32,
}

impl Uranus {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut level = Self {
            rng,
            balloons: Vec::new(),
            arrow: None,
            cursor: None,
            popped: 0,
        };
        level.reset();
        level
    }

    pub fn popped(&self) -> u32 {
        self.popped
    }

    fn spawn_balloon(&mut self, color: BalloonColor) -> Balloon {
        let x = self.rng.gen_range(SPAWN_INSET..=FULL_ARENA.x as i32 - SPAWN_INSET);
        let y = self.rng.gen_range(SPAWN_INSET..=FULL_ARENA.y as i32 - SPAWN_INSET);
        let speed = self.rng.gen_range(1.0..3.0);
        let heading = self.rng.gen_range(0.0..TAU);
        Balloon {
            pos: Vec2::new(x as f32, y as f32),
            velocity: Vec2::from_angle(heading) * speed,
            color,
        }
    }

    fn fire(&mut self, target: Vec2) {
        let heading = (target - BOW).try_normalize().unwrap_or(Vec2::NEG_Y);
        self.arrow = Some(Arrow {
            tip: BOW,
            velocity: heading * ARROW_SPEED,
        });
    }
}

impl Default for Uranus {
    fn default() -> Self {
        Self::new()
    }
}

impl Level for Uranus {
    fn planet(&self) -> Planet {
        Planet::Uranus
    }

    fn reset(&mut self) {
        self.balloons.clear();
        for _ in 0..RED_BALLOONS {
            let balloon = self.spawn_balloon(BalloonColor::Red);
            self.balloons.push(balloon);
        }
        for _ in 0..GRAY_BALLOONS {
            let balloon = self.spawn_balloon(BalloonColor::Gray);
            self.balloons.push(balloon);
        }
        self.arrow = None;
        self.popped = 0;
    }

    fn tick(&mut self, ctx: &mut TickContext) -> LevelOutcome {
        self.cursor = ctx.input.cursor;
        if ctx.input.mouse_pressed && self.arrow.is_none() {
            if let Some(target) = ctx.input.cursor {
                self.fire(target);
            }
        }

        for balloon in &mut self.balloons {
            balloon.drift();
        }

        let Some(arrow) = self.arrow.as_mut() else {
            return LevelOutcome::Continue;
        };
        arrow.tip += arrow.velocity;
        let tip = arrow.tip;

        let hit = self
            .balloons
            .iter()
            .position(|b| within_distance(b.pos, tip, BALLOON_RADIUS));
        if let Some(index) = hit {
            self.arrow = None;
            if self.balloons[index].color == BalloonColor::Gray {
                return LevelOutcome::Defeat;
            }
            self.balloons.remove(index);
            self.popped += 1;
            return if self.popped as usize >= RED_BALLOONS {
                LevelOutcome::Victory
            } else {
                LevelOutcome::Continue
            };
        }

        // A wasted arrow ends the round; the bottom edge too, so a shot aimed
        // downward cannot leave the bow stuck
        if tip.y < 0.0 || tip.x < 0.0 || tip.x > FULL_ARENA.x || tip.y > FULL_ARENA.y {
            self.arrow = None;
            return LevelOutcome::Defeat;
        }
        LevelOutcome::Continue
    }

    fn draw(&self, canvas: &mut Canvas) {
        for balloon in &self.balloons {
            let color = match balloon.color {
                BalloonColor::Red => Color::srgb_u8(255, 0, 0),
                BalloonColor::Gray => Color::srgb_u8(169, 169, 169),
            };
            canvas.line(
                balloon.pos + Vec2::new(0.0, BALLOON_RADIUS),
                balloon.pos + Vec2::new(0.0, BALLOON_RADIUS + 25.0),
                Color::BLACK,
            );
            canvas.fill_circle(balloon.pos, BALLOON_RADIUS, color);
        }

        canvas.fill_rect(BOW.x - 30.0, BOW.y + 5.0, 60.0, 8.0, Color::srgb_u8(120, 70, 30));
        match self.arrow {
            Some(arrow) => {
                let forward = arrow.velocity.normalize_or_zero();
                let side = forward.perp();
                let base = arrow.tip - forward * 20.0;
                canvas.line(base - forward * 30.0, base, Color::BLACK);
                canvas.fill_polygon(
                    vec![arrow.tip, base + side * 10.0, base - side * 10.0],
                    Color::BLACK,
                );
            }
            None => {
                if let Some(cursor) = self.cursor {
                    let heading = (cursor - BOW).try_normalize().unwrap_or(Vec2::NEG_Y);
                    canvas.line(BOW, BOW + heading * AIM_LENGTH, Color::BLACK);
                }
            }
        }

        canvas.text(
            format!("Score: {}/{}", self.popped, RED_BALLOONS),
            Vec2::new(20.0, 20.0),
            36.0,
            Color::BLACK,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelInput;

    fn tick(level: &mut Uranus, input: &LevelInput) -> LevelOutcome {
        let mut cues = Vec::new();
        level.tick(&mut TickContext::new(input, 1.0 / 60.0, &mut cues))
    }

    /// Freeze every balloon far from the bow's line of fire.
    fn park_balloons(level: &mut Uranus) {
        for (i, balloon) in level.balloons.iter_mut().enumerate() {
            balloon.pos = Vec2::new(60.0 + i as f32 * 10.0, 100.0);
            balloon.velocity = Vec2::ZERO;
        }
    }

    fn run_until_resolved(level: &mut Uranus) -> LevelOutcome {
        for _ in 0..200 {
            let outcome = tick(level, &LevelInput::default());
            if outcome != LevelOutcome::Continue || level.arrow.is_none() {
                return outcome;
            }
        }
        LevelOutcome::Continue
    }

    #[test]
    fn five_red_and_ten_gray_inside_the_inset() {
        let level = Uranus::with_seed(1);
        let reds = level.balloons.iter().filter(|b| b.color == BalloonColor::Red).count();
        assert_eq!(reds, 5);
        assert_eq!(level.balloons.len(), 15);
        for b in &level.balloons {
            assert!((50.0..=1150.0).contains(&b.pos.x));
            assert!((50.0..=750.0).contains(&b.pos.y));
            let speed = b.velocity.length();
            assert!((0.99..3.01).contains(&speed));
        }
    }

    #[test]
    fn balloons_bounce_off_the_walls() {
        let mut balloon = Balloon {
            pos: Vec2::new(1.0, 400.0),
            velocity: Vec2::new(-2.0, 0.0),
            color: BalloonColor::Red,
        };
        balloon.drift();
        assert!(balloon.velocity.x > 0.0);
        balloon.drift();
        assert!(balloon.pos.x > 0.0);
    }

    #[test]
    fn only_one_arrow_at_a_time() {
        let mut level = Uranus::with_seed(2);
        park_balloons(&mut level);
        tick(&mut level, &LevelInput::click(Vec2::new(600.0, 0.0)));
        let first = level.arrow.unwrap();
        tick(&mut level, &LevelInput::click(Vec2::new(0.0, 750.0)));
        assert_eq!(level.arrow.unwrap().velocity, first.velocity);
        assert_eq!(first.velocity, Vec2::new(0.0, -ARROW_SPEED));
    }

    #[test]
    fn popping_a_red_balloon_scores() {
        let mut level = Uranus::with_seed(3);
        park_balloons(&mut level);
        let red = level.balloons.iter().position(|b| b.color == BalloonColor::Red).unwrap();
        level.balloons[red].pos = Vec2::new(600.0, 400.0);
        tick(&mut level, &LevelInput::click(Vec2::new(600.0, 0.0)));
        assert_eq!(run_until_resolved(&mut level), LevelOutcome::Continue);
        assert_eq!(level.popped(), 1);
        assert_eq!(level.balloons.len(), 14);
        assert!(level.arrow.is_none());
    }

    #[test]
    fn gray_balloon_is_defeat() {
        let mut level = Uranus::with_seed(4);
        park_balloons(&mut level);
        let gray = level.balloons.iter().position(|b| b.color == BalloonColor::Gray).unwrap();
        level.balloons[gray].pos = Vec2::new(600.0, 400.0);
        tick(&mut level, &LevelInput::click(Vec2::new(600.0, 0.0)));
        assert_eq!(run_until_resolved(&mut level), LevelOutcome::Defeat);
    }

    #[test]
    fn a_miss_is_defeat() {
        let mut level = Uranus::with_seed(5);
        park_balloons(&mut level);
        tick(&mut level, &LevelInput::click(Vec2::new(1199.0, 700.0)));
        assert_eq!(run_until_resolved(&mut level), LevelOutcome::Defeat);
    }

    #[test]
    fn fifth_red_balloon_wins() {
        let mut level = Uranus::with_seed(6);
        park_balloons(&mut level);
        level.popped = 4;
        let red = level.balloons.iter().position(|b| b.color == BalloonColor::Red).unwrap();
        level.balloons[red].pos = Vec2::new(600.0, 400.0);
        tick(&mut level, &LevelInput::click(Vec2::new(600.0, 0.0)));
        assert_eq!(run_until_resolved(&mut level), LevelOutcome::Victory);
    }
}
