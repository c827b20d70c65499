//! Jupiter: weigh stones on a two-pan scale, then guess their weights.

use super::input::digit_of;
use super::{Level, LevelOutcome, Planet, TickContext, FULL_ARENA};
use crate::canvas::Canvas;
use crate::collision::{point_in_circle, point_in_rect, rect};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const STONE_RADIUS: f32 = 20.0;
const STONES_PER_KIND: usize = 10;
const PILE_Y: f32 = 700.0;
const JITTER: i32 = 20;

const LEFT_PAN: Rect = Rect {
    min: Vec2::new(200.0, 300.0),
    max: Vec2::new(400.0, 500.0),
};
const RIGHT_PAN: Rect = Rect {
    min: Vec2::new(800.0, 300.0),
    max: Vec2::new(1000.0, 500.0),
};

/// Pixels of tilt per unit of weight difference.
const TILT_PER_WEIGHT: i32 = 5;
const MAX_TILT: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoneKind {
    Gold,
    Silver,
    Copper,
}

impl StoneKind {
    pub const ALL: [StoneKind; 3] = [StoneKind::Gold, StoneKind::Silver, StoneKind::Copper];

    pub fn weight(self) -> i32 {
        match self {
            StoneKind::Gold => 7,
            StoneKind::Silver => 4,
            StoneKind::Copper => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StoneKind::Gold => "Gold",
            StoneKind::Silver => "Silver",
            StoneKind::Copper => "Copper",
        }
    }

    fn pile_x(self) -> f32 {
        match self {
            StoneKind::Gold => 100.0,
            StoneKind::Silver => 200.0,
            StoneKind::Copper => 300.0,
        }
    }

    fn color(self) -> Color {
        match self {
            StoneKind::Gold => Color::srgb_u8(255, 215, 0),
            StoneKind::Silver => Color::srgb_u8(192, 192, 192),
            StoneKind::Copper => Color::srgb_u8(184, 115, 51),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pan {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
struct Stone {
    pos: Vec2,
    kind: StoneKind,
    pan: Option<Pan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Weighing,
    Guessing,
}

pub struct Jupiter {
    rng: StdRng,
    stones: Vec<Stone>,
    dragging: Option<usize>,
    left: i32,
    right: i32,
    phase: Phase,
    /// Gold, silver and copper guesses, one digit each.
    guesses: [Option<u8>; 3],
}

impl Jupiter {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut level = Self {
            rng,
            stones: Vec::new(),
            dragging: None,
            left: 0,
            right: 0,
            phase: Phase::Weighing,
            guesses: [None; 3],
        };
        level.reset();
        level
    }

    /// Weight on the left and right pans.
    pub fn pan_weights(&self) -> (i32, i32) {
        (self.left, self.right)
    }

    /// Vertical pan offset; positive when the right pan is heavier.
    pub fn tilt(&self) -> f32 {
        ((self.right - self.left) * TILT_PER_WEIGHT).clamp(-MAX_TILT, MAX_TILT) as f32
    }

    pub fn is_guessing(&self) -> bool {
        self.phase == Phase::Guessing
    }

    fn stone_at(&self, point: Vec2) -> Option<usize> {
        self.stones
            .iter()
            .position(|s| point_in_circle(point, s.pos, STONE_RADIUS))
    }

    /// Settle the dragged stone and move its weight to whichever pan it landed on.
    fn drop_stone(&mut self, index: usize) {
        let stone = &mut self.stones[index];
        match stone.pan {
            Some(Pan::Left) => self.left -= stone.kind.weight(),
            Some(Pan::Right) => self.right -= stone.kind.weight(),
            None => {}
        }
        stone.pan = if point_in_rect(stone.pos, LEFT_PAN) {
            Some(Pan::Left)
        } else if point_in_rect(stone.pos, RIGHT_PAN) {
            Some(Pan::Right)
        } else {
            None
        };
        match stone.pan {
            Some(Pan::Left) => self.left += stone.kind.weight(),
            Some(Pan::Right) => self.right += stone.kind.weight(),
            None => {}
        }
    }

    fn weigh(&mut self, ctx: &TickContext) {
        let input = ctx.input;
        if input.mouse_pressed && self.dragging.is_none() {
            self.dragging = input.cursor.and_then(|p| self.stone_at(p));
        }
        if let (Some(index), Some(cursor)) = (self.dragging, input.cursor) {
            self.stones[index].pos = cursor;
        }
        if input.mouse_released || (self.dragging.is_some() && !input.mouse_held) {
            if let Some(index) = self.dragging.take() {
                self.drop_stone(index);
            }
        }
        if input.pressed(KeyCode::Enter) {
            if let Some(index) = self.dragging.take() {
                self.drop_stone(index);
            }
            self.phase = Phase::Guessing;
        }
    }

    fn guess(&mut self, ctx: &TickContext) -> LevelOutcome {
        let input = ctx.input;
        if input.pressed(KeyCode::Backspace) {
            if let Some(last) = self.guesses.iter_mut().rev().find(|g| g.is_some()) {
                *last = None;
            }
        }
        for digit in input.pressed.iter().filter_map(|k| digit_of(*k)) {
            if let Some(slot) = self.guesses.iter_mut().find(|g| g.is_none()) {
                *slot = Some(digit);
            }
        }

        if input.pressed(KeyCode::Enter) && self.guesses.iter().all(Option::is_some) {
            let correct = StoneKind::ALL
                .iter()
                .zip(self.guesses)
                .all(|(kind, guess)| guess.map(i32::from) == Some(kind.weight()));
            return if correct {
                LevelOutcome::Victory
            } else {
                LevelOutcome::Defeat
            };
        }
        LevelOutcome::Continue
    }

    fn draw_scale(&self, canvas: &mut Canvas) {
        let pink = Color::srgb_u8(238, 25, 91);
        let tilt = self.tilt();
        let left_y = 400.0 - tilt;
        let right_y = 400.0 + tilt;

        canvas.fill_rect(500.0, 500.0, 200.0, 20.0, pink);
        canvas.fill_rect(590.0, 300.0, 20.0, 200.0, pink);
        canvas.fill_rect(200.0, left_y, 200.0, 20.0, pink);
        canvas.fill_rect(300.0, left_y - 100.0, 10.0, 100.0, pink);
        canvas.fill_rect(800.0, right_y, 200.0, 20.0, pink);
        canvas.fill_rect(900.0, right_y - 100.0, 10.0, 100.0, pink);
        canvas.line(
            Vec2::new(600.0, left_y + 10.0),
            Vec2::new(300.0, left_y + 10.0),
            pink,
        );
        canvas.line(
            Vec2::new(600.0, right_y + 10.0),
            Vec2::new(900.0, right_y + 10.0),
            pink,
        );
        canvas.line(
            Vec2::new(600.0, left_y + 10.0),
            Vec2::new(600.0, right_y + 10.0),
            Color::BLACK,
        );
    }
}

impl Default for Jupiter {
    fn default() -> Self {
        Self::new()
    }
}

impl Level for Jupiter {
    fn planet(&self) -> Planet {
        Planet::Jupiter
    }

    fn reset(&mut self) {
        self.stones.clear();
        for _ in 0..STONES_PER_KIND {
            for kind in StoneKind::ALL {
                let dx = self.rng.gen_range(-JITTER..=JITTER) as f32;
                let dy = self.rng.gen_range(-JITTER..=JITTER) as f32;
                self.stones.push(Stone {
                    pos: Vec2::new(kind.pile_x() + dx, PILE_Y + dy),
                    kind,
                    pan: None,
                });
            }
        }
        self.dragging = None;
        self.left = 0;
        self.right = 0;
        self.phase = Phase::Weighing;
        self.guesses = [None; 3];
    }

    fn tick(&mut self, ctx: &mut TickContext) -> LevelOutcome {
        match self.phase {
            Phase::Weighing => {
                self.weigh(ctx);
                LevelOutcome::Continue
            }
            Phase::Guessing => self.guess(ctx),
        }
    }

    fn draw(&self, canvas: &mut Canvas) {
        let centre_x = FULL_ARENA.x / 2.0;
        match self.phase {
            Phase::Weighing => {
                for (i, kind) in StoneKind::ALL.iter().enumerate() {
                    canvas.fill_rect(50.0 + i as f32 * 100.0, 650.0, 100.0, 100.0, kind.color());
                }
                self.draw_scale(canvas);
                for stone in &self.stones {
                    canvas.fill_circle(stone.pos, STONE_RADIUS, stone.kind.color());
                }
                canvas.text_centered(
                    format!("Left: {}  Right: {}", self.left, self.right),
                    centre_x,
                    40.0,
                    32.0,
                    Color::WHITE,
                );
                canvas.text_centered(
                    "Press ENTER when you are ready to guess",
                    centre_x,
                    80.0,
                    24.0,
                    Color::WHITE,
                );
            }
            Phase::Guessing => {
                canvas.text_centered("Guess the weights!", centre_x, 50.0, 64.0, Color::BLACK);
                for (i, (kind, guess)) in StoneKind::ALL.iter().zip(self.guesses).enumerate() {
                    let shown = guess.map(|d| d.to_string()).unwrap_or_default();
                    canvas.text_centered(
                        format!("{}: {}", kind.label(), shown),
                        centre_x,
                        200.0 + i as f32 * 100.0,
                        64.0,
                        kind.color(),
                    );
                }
                if self.guesses.iter().all(Option::is_some) {
                    canvas.text_centered(
                        "Press Enter to submit your guess",
                        centre_x,
                        500.0,
                        32.0,
                        Color::BLACK,
                    );
                }
            }
        }
    }
}
