//! Earth: fly a plane over a scrolling skyline.

use super::{Level, LevelOutcome, Planet, TickContext, FULL_ARENA};
use crate::canvas::Canvas;
use crate::collision::{rect, rects_overlap};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PLANE_W: f32 = 80.0;
const PLANE_H: f32 = 40.0;
const GRAVITY: f32 = 1.0;
const CLIMB_VELOCITY: f32 = -15.0;

const BUILDING_W: f32 = 150.0;
const BUILDING_MIN_H: i32 = 200;
const BUILDING_MAX_H: i32 = 500;
const BUILDING_GAP: f32 = 300.0;
const BUILDING_COUNT: usize = 6;
const SCROLL_SPEED: f32 = 5.0;

const TARGET_SCORE: u32 = 20;

#[derive(Debug, Clone, PartialEq)]
struct Building {
    x: f32,
    height: f32,
}

impl Building {
    fn top(&self) -> f32 {
        FULL_ARENA.y - self.height
    }

    fn bounds(&self) -> Rect {
        rect(self.x, self.top(), BUILDING_W, self.height)
    }
}

pub struct Earth {
    rng: StdRng,
    plane: Vec2,
    velocity: f32,
    buildings: Vec<Building>,
    score: u32,
}

impl Earth {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut level = Self {
            rng,
            plane: Vec2::ZERO,
            velocity: 0.0,
            buildings: Vec::new(),
            score: 0,
        };
        level.reset();
        level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    fn random_height(&mut self) -> f32 {
        self.rng.gen_range(BUILDING_MIN_H..=BUILDING_MAX_H) as f32
    }

    fn plane_bounds(&self) -> Rect {
        rect(self.plane.x, self.plane.y, PLANE_W, PLANE_H)
    }
}

impl Default for Earth {
    fn default() -> Self {
        Self::new()
    }
}

impl Level for Earth {
    fn planet(&self) -> Planet {
        Planet::Earth
    }

    fn reset(&mut self) {
        self.plane = Vec2::new(FULL_ARENA.x / 4.0, FULL_ARENA.y / 2.0);
        self.velocity = 0.0;
        self.score = 0;
        self.buildings.clear();
        for i in 0..BUILDING_COUNT {
            let height = self.random_height();
            self.buildings.push(Building {
                x: FULL_ARENA.x + i as f32 * BUILDING_GAP,
                height,
            });
        }
    }

    fn tick(&mut self, ctx: &mut TickContext) -> LevelOutcome {
        self.velocity += GRAVITY;
        self.plane.y += self.velocity;
        if ctx.input.held(KeyCode::Space) {
            self.velocity = CLIMB_VELOCITY;
        }

        for building in &mut self.buildings {
            building.x -= SCROLL_SPEED;
        }
        if self.buildings.first().is_some_and(|b| b.x < -BUILDING_W) {
            self.buildings.remove(0);
            let last_x = self.buildings.last().map_or(FULL_ARENA.x, |b| b.x);
            let height = self.random_height();
            self.buildings.push(Building {
                x: last_x + BUILDING_GAP,
                height,
            });
            self.score += 1;
        }

        let plane = self.plane_bounds();
        if self.buildings.iter().any(|b| rects_overlap(plane, b.bounds())) {
            return LevelOutcome::Defeat;
        }
        if plane.max.y > FULL_ARENA.y || plane.min.y < 0.0 {
            return LevelOutcome::Defeat;
        }
        if self.score >= TARGET_SCORE {
            return LevelOutcome::Victory;
        }
        LevelOutcome::Continue
    }

    fn draw(&self, canvas: &mut Canvas) {
        let window_blue = Color::srgb_u8(135, 206, 235);
        let frame = Color::srgb_u8(50, 50, 50);
        for b in &self.buildings {
            canvas.fill_rect(b.x, b.top(), BUILDING_W, b.height, Color::srgb_u8(100, 100, 100));
            let mut row = 5.0;
            while row < b.height {
                let mut col = 20.0;
                while col < BUILDING_W {
                    canvas.fill_rect(b.x + col, b.top() + row, 40.0, 30.0, window_blue);
                    canvas.stroke_rect(b.x + col, b.top() + row, 40.0, 30.0, frame);
                    col += 80.0;
                }
                row += 40.0;
            }
        }

        let Vec2 { x, y } = self.plane;
        let white = Color::WHITE;
        canvas.fill_rect(x, y + 10.0, PLANE_W, 20.0, white);
        canvas.fill_polygon(
            vec![
                Vec2::new(x + PLANE_W, y + 10.0),
                Vec2::new(x + PLANE_W + 20.0, y + 20.0),
                Vec2::new(x + PLANE_W, y + 30.0),
            ],
            white,
        );
        canvas.fill_polygon(
            vec![Vec2::new(x, y + 10.0), Vec2::new(x - 20.0, y), Vec2::new(x, y + 20.0)],
            white,
        );
        canvas.fill_polygon(
            vec![Vec2::new(x, y + 20.0), Vec2::new(x - 20.0, y + 40.0), Vec2::new(x, y + 30.0)],
            white,
        );
        canvas.fill_rect(x + 50.0, y + 10.0, 20.0, 20.0, Color::srgb_u8(255, 0, 0));

        canvas.text(format!("Score: {}", self.score), Vec2::new(20.0, 20.0), 40.0, white);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelInput;

    fn tick(level: &mut Earth, input: &LevelInput) -> LevelOutcome {
        let mut cues = Vec::new();
        level.tick(&mut TickContext::new(input, 1.0 / 60.0, &mut cues))
    }

    #[test]
    fn reset_lays_out_six_buildings_off_screen() {
        let level = Earth::with_seed(1);
        assert_eq!(level.buildings.len(), BUILDING_COUNT);
        for (i, b) in level.buildings.iter().enumerate() {
            assert_eq!(b.x, FULL_ARENA.x + i as f32 * BUILDING_GAP);
            assert!((200.0..=500.0).contains(&b.height));
        }
    }

    #[test]
    fn free_fall_hits_the_ground() {
        let mut level = Earth::with_seed(2);
        let idle = LevelInput::default();
        let mut outcome = LevelOutcome::Continue;
        for _ in 0..60 {
            outcome = tick(&mut level, &idle);
            if outcome != LevelOutcome::Continue {
                break;
            }
        }
        assert_eq!(outcome, LevelOutcome::Defeat);
    }

    #[test]
    fn holding_space_climbs_into_the_sky() {
        let mut level = Earth::with_seed(3);
        let climb = LevelInput::holding(&[KeyCode::Space]);
        let mut outcome = LevelOutcome::Continue;
        for _ in 0..60 {
            outcome = tick(&mut level, &climb);
            if outcome != LevelOutcome::Continue {
                break;
            }
        }
        assert_eq!(outcome, LevelOutcome::Defeat);
        assert!(level.plane.y < 0.0);
    }

    #[test]
    fn recycled_building_scores_a_point() {
        let mut level = Earth::with_seed(4);
        level.buildings[0].x = -BUILDING_W + 1.0;
        // Keep the plane airborne and away from everything
        level.plane.y = 100.0;
        level.velocity = -1.0;
        for b in &mut level.buildings[1..] {
            b.x += 2000.0;
        }
        let last_x = level.buildings[BUILDING_COUNT - 1].x;
        assert_eq!(tick(&mut level, &LevelInput::default()), LevelOutcome::Continue);
        assert_eq!(level.score(), 1);
        assert_eq!(level.buildings.len(), BUILDING_COUNT);
        assert_eq!(
            level.buildings[BUILDING_COUNT - 1].x,
            last_x - SCROLL_SPEED + BUILDING_GAP
        );
    }

    #[test]
    fn building_overlap_is_defeat() {
        let mut level = Earth::with_seed(5);
        level.buildings[0] = Building {
            x: level.plane.x + 10.0,
            height: 500.0,
        };
        assert_eq!(tick(&mut level, &LevelInput::default()), LevelOutcome::Defeat);
    }

    #[test]
    fn twenty_points_is_victory_and_reset_clears_it() {
        let mut level = Earth::with_seed(6);
        level.score = TARGET_SCORE;
        level.plane.y = 100.0;
        level.velocity = -1.0;
        assert_eq!(tick(&mut level, &LevelInput::default()), LevelOutcome::Victory);
        level.reset();
        assert_eq!(level.score(), 0);
        assert_eq!(level.plane, Vec2::new(300.0, 400.0));
    }
}
