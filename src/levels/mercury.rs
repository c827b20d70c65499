//! Mercury: answer quiz questions by switching the trolley's track.

use super::{Level, LevelOutcome, Planet, TickContext, FULL_ARENA};
use crate::canvas::Canvas;
use bevy::prelude::*;

const TROLLEY_SIZE: f32 = 50.0;
const TROLLEY_SPEED: f32 = 5.0;
const START_X: f32 = 50.0;
const DIVERGENCE_X: f32 = FULL_ARENA.x / 2.0;
const END_X: f32 = FULL_ARENA.x - TROLLEY_SIZE / 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    Middle,
    Upper,
    Lower,
}

impl Track {
    fn y(self) -> f32 {
        match self {
            Track::Middle => FULL_ARENA.y / 2.0,
            Track::Upper => FULL_ARENA.y / 4.0,
            Track::Lower => FULL_ARENA.y * 3.0 / 4.0,
        }
    }
}

pub struct Question {
    pub prompt: &'static str,
    pub up: &'static str,
    pub down: &'static str,
    pub correct: Track,
}

pub const QUESTIONS: [Question; 5] = [
    Question {
        prompt: "What is 2 + 2?",
        up: "3",
        down: "4",
        correct: Track::Lower,
    },
    Question {
        prompt: "What is the capital of France?",
        up: "Paris",
        down: "London",
        correct: Track::Upper,
    },
    Question {
        prompt: "What is the largest planet?",
        up: "Earth",
        down: "Jupiter",
        correct: Track::Lower,
    },
    Question {
        prompt: "What is the square root of 16?",
        up: "3",
        down: "4",
        correct: Track::Lower,
    },
    Question {
        prompt: "What is the chemical symbol for water?",
        up: "H2O",
        down: "CO2",
        correct: Track::Upper,
    },
];

pub struct Mercury {
    /// Centre x of the trolley.
    x: f32,
    track: Track,
    /// Halted at the fork waiting for an answer.
    asking: bool,
    /// The fork has been handled on this run.
    forked: bool,
    question: usize,
    correct: usize,
    /// This run took the wrong track.
    wrong: bool,
}

impl Mercury {
    pub fn new() -> Self {
        let mut level = Self {
            x: START_X,
            track: Track::Middle,
            asking: false,
            forked: false,
            question: 0,
            correct: 0,
            wrong: false,
        };
        level.reset();
        level
    }

    pub fn correct_answers(&self) -> usize {
        self.correct
    }

    pub fn is_asking(&self) -> bool {
        self.asking
    }

    fn answer(&mut self, choice: Track) {
        self.track = choice;
        self.asking = false;
        if QUESTIONS[self.question].correct == choice {
            self.correct += 1;
            self.question += 1;
        } else {
            self.wrong = true;
        }
    }
}

impl Default for Mercury {
    fn default() -> Self {
        Self::new()
    }
}

impl Level for Mercury {
    fn planet(&self) -> Planet {
        Planet::Mercury
    }

    fn reset(&mut self) {
        self.x = START_X;
        self.track = Track::Middle;
        self.asking = false;
        self.forked = false;
        self.question = 0;
        self.correct = 0;
        self.wrong = false;
    }

    fn tick(&mut self, ctx: &mut TickContext) -> LevelOutcome {
        if self.asking {
            if ctx.input.pressed(KeyCode::ArrowUp) {
                self.answer(Track::Upper);
            } else if ctx.input.pressed(KeyCode::ArrowDown) {
                self.answer(Track::Lower);
            }
            return LevelOutcome::Continue;
        }

        self.x += TROLLEY_SPEED;
        if self.x > DIVERGENCE_X && !self.forked {
            self.forked = true;
            self.asking = true;
            return LevelOutcome::Continue;
        }

        if self.x >= END_X {
            self.x = START_X;
            self.track = Track::Middle;
            self.forked = false;
            if self.wrong {
                return LevelOutcome::Defeat;
            }
            if self.question >= QUESTIONS.len() {
                return if self.correct == QUESTIONS.len() {
                    LevelOutcome::Victory
                } else {
                    LevelOutcome::Defeat
                };
            }
        }
        LevelOutcome::Continue
    }

    fn draw(&self, canvas: &mut Canvas) {
        let rail = Color::BLACK;
        let (upper, middle, lower) = (Track::Upper.y(), Track::Middle.y(), Track::Lower.y());
        canvas.fill_rect(0.0, middle - 2.5, DIVERGENCE_X, 5.0, rail);
        canvas.fill_rect(DIVERGENCE_X - 2.5, upper, 5.0, lower - upper, rail);
        canvas.fill_rect(DIVERGENCE_X, upper - 2.5, FULL_ARENA.x - DIVERGENCE_X, 5.0, rail);
        canvas.fill_rect(DIVERGENCE_X, lower - 2.5, FULL_ARENA.x - DIVERGENCE_X, 5.0, rail);

        let half = TROLLEY_SIZE / 2.0;
        let y = self.track.y();
        canvas.fill_rect(self.x - half, y - half, TROLLEY_SIZE, TROLLEY_SIZE, Color::srgb_u8(255, 0, 0));
        canvas.fill_circle(Vec2::new(self.x - 12.0, y + half), 6.0, rail);
        canvas.fill_circle(Vec2::new(self.x + 12.0, y + half), 6.0, rail);

        let centre_x = FULL_ARENA.x / 2.0;
        if self.asking {
            let question = &QUESTIONS[self.question];
            canvas.text_centered(question.prompt, centre_x, 30.0, 44.0, rail);
            canvas.text_centered(format!("UP: {}", question.up), centre_x, 90.0, 44.0, rail);
            canvas.text_centered(format!("DOWN: {}", question.down), centre_x, 150.0, 44.0, rail);
        } else {
            canvas.text_centered("Press UP or DOWN to choose track", centre_x, 30.0, 44.0, rail);
        }
        canvas.text(
            format!("Correct: {}/{}", self.correct, QUESTIONS.len()),
            Vec2::new(20.0, FULL_ARENA.y - 50.0),
            32.0,
            rail,
        );
    }
}
