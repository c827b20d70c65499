//! Venus: a zodiac memory game on a 4×3 grid.

use super::{Level, LevelOutcome, Planet, TickContext, FULL_ARENA};
use crate::canvas::Canvas;
use crate::collision::{point_in_rect, rect};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub const ZODIAC_SIGNS: [&str; 6] = ["Aries", "Taurus", "Gemini", "Cancer", "Leo", "Virgo"];

const COLS: usize = 4;
const ROWS: usize = 3;
const CARD_W: f32 = 100.0;
const CARD_H: f32 = 150.0;
const CARD_MARGIN: f32 = 20.0;
const PAIRS: u32 = 6;

/// How long a mismatched pair stays face up.
const REVEAL_SECS: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
struct Card {
    bounds: Rect,
    sign: &'static str,
    face_up: bool,
}

pub struct Venus {
    rng: StdRng,
    cards: Vec<Card>,
    /// Indices of face-up cards awaiting a verdict.
    selection: Vec<usize>,
    /// Counts down while a complete selection is shown.
    hold: Option<f32>,
    pairs: u32,
    attempts: u32,
}

impl Venus {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut level = Self {
            rng,
            cards: Vec::new(),
            selection: Vec::new(),
            hold: None,
            pairs: 0,
            attempts: 0,
        };
        level.reset();
        level
    }

    pub fn pairs(&self) -> u32 {
        self.pairs
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    fn grid_origin() -> Vec2 {
        let size = Vec2::new(
            COLS as f32 * (CARD_W + CARD_MARGIN) - CARD_MARGIN,
            ROWS as f32 * (CARD_H + CARD_MARGIN) - CARD_MARGIN,
        );
        ((FULL_ARENA - size) / 2.0).floor()
    }

    fn card_at(&self, point: Vec2) -> Option<usize> {
        self.cards.iter().position(|c| point_in_rect(point, c.bounds))
    }

    fn flip(&mut self, index: usize) {
        if self.selection.len() >= 2 || self.cards[index].face_up {
            return;
        }
        self.cards[index].face_up = true;
        self.selection.push(index);
        if let [a, b] = self.selection[..] {
            self.attempts += 1;
            if self.cards[a].sign == self.cards[b].sign {
                self.pairs += 1;
            }
            self.hold = Some(REVEAL_SECS);
        }
    }

    fn settle_selection(&mut self) {
        if let [a, b] = self.selection[..] {
            if self.cards[a].sign != self.cards[b].sign {
                self.cards[a].face_up = false;
                self.cards[b].face_up = false;
            }
        }
        self.selection.clear();
        self.hold = None;
    }
}

impl Default for Venus {
    fn default() -> Self {
        Self::new()
    }
}

impl Level for Venus {
    fn planet(&self) -> Planet {
        Planet::Venus
    }

    fn reset(&mut self) {
        let mut deck: Vec<&'static str> = ZODIAC_SIGNS
            .iter()
            .chain(ZODIAC_SIGNS.iter())
            .copied()
            .collect();
        deck.shuffle(&mut self.rng);

        let origin = Self::grid_origin();
        self.cards = (0..ROWS * COLS)
            .map(|i| {
                let (row, col) = (i / COLS, i % COLS);
                let x = origin.x + col as f32 * (CARD_W + CARD_MARGIN);
                let y = origin.y + row as f32 * (CARD_H + CARD_MARGIN);
                Card {
                    bounds: rect(x, y, CARD_W, CARD_H),
                    sign: deck[i],
                    face_up: false,
                }
            })
            .collect();
        self.selection.clear();
        self.hold = None;
        self.pairs = 0;
        self.attempts = 0;
    }

    fn tick(&mut self, ctx: &mut TickContext) -> LevelOutcome {
        if let Some(remaining) = self.hold.as_mut() {
            *remaining -= ctx.dt;
            if *remaining <= 0.0 {
                self.settle_selection();
            }
        }

        if ctx.input.mouse_pressed {
            if let Some(index) = ctx.input.cursor.and_then(|p| self.card_at(p)) {
                self.flip(index);
            }
        }

        if self.pairs >= PAIRS {
            LevelOutcome::Victory
        } else {
            LevelOutcome::Continue
        }
    }

    fn draw(&self, canvas: &mut Canvas) {
        let black = Color::BLACK;
        for card in &self.cards {
            let Rect { min, max } = card.bounds;
            let size = max - min;
            if card.face_up {
                canvas.fill_rect(min.x, min.y, size.x, size.y, Color::WHITE);
                canvas.stroke_rect(min.x, min.y, size.x, size.y, black);
                let corner: String = card.sign.chars().take(2).collect();
                let red = Color::srgb_u8(255, 0, 0);
                canvas.text(corner.clone(), min + Vec2::splat(5.0), 22.0, red);
                canvas.text(corner, max - Vec2::splat(25.0), 22.0, red);
                canvas.text_centered(
                    card.sign,
                    min.x + size.x / 2.0,
                    min.y + size.y / 2.0 - 12.0,
                    22.0,
                    black,
                );
            } else {
                canvas.fill_rect(min.x, min.y, size.x, size.y, Color::srgb_u8(50, 50, 200));
                canvas.stroke_rect(min.x, min.y, size.x, size.y, black);
                canvas.stroke_rect(min.x + 5.0, min.y + 5.0, size.x - 10.0, size.y - 10.0, black);
                canvas.stroke_rect(min.x + 10.0, min.y + 10.0, size.x - 20.0, size.y - 20.0, black);
            }
        }
        canvas.text_centered(
            format!("Pairs: {}/{} | Attempts: {}", self.pairs, PAIRS, self.attempts),
            FULL_ARENA.x / 2.0,
            20.0,
            36.0,
            Color::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelInput;

    const DT: f32 = 1.0 / 60.0;

    fn tick(level: &mut Venus, input: &LevelInput) -> LevelOutcome {
        let mut cues = Vec::new();
        level.tick(&mut TickContext::new(input, DT, &mut cues))
    }

    fn click_card(level: &mut Venus, index: usize) -> LevelOutcome {
        let at = level.cards[index].bounds.center();
        tick(level, &LevelInput::click(at))
    }

    /// Indices of a matching pair and of a card with a different sign.
    fn pair_and_stranger(level: &Venus) -> (usize, usize, usize) {
        let a = 0;
        let b = (1..12).find(|&i| level.cards[i].sign == level.cards[a].sign).unwrap();
        let c = (1..12).find(|&i| level.cards[i].sign != level.cards[a].sign).unwrap();
        (a, b, c)
    }

    fn wait_one_second(level: &mut Venus) {
        for _ in 0..65 {
            tick(level, &LevelInput::default());
        }
    }

    #[test]
    fn deck_holds_each_sign_twice() {
        let level = Venus::with_seed(7);
        for sign in ZODIAC_SIGNS {
            assert_eq!(level.cards.iter().filter(|c| c.sign == sign).count(), 2);
        }
        assert!(level.cards.iter().all(|c| !c.face_up));
    }

    #[test]
    fn grid_is_centred_with_margins() {
        let level = Venus::with_seed(7);
        let first = level.cards[0].bounds;
        let second = level.cards[1].bounds;
        assert_eq!(second.min.x - first.max.x, CARD_MARGIN);
        assert_eq!(first.min, Vec2::new(370.0, 155.0));
    }

    #[test]
    fn matching_pair_stays_face_up() {
        let mut level = Venus::with_seed(1);
        let (a, b, _) = pair_and_stranger(&level);
        click_card(&mut level, a);
        click_card(&mut level, b);
        assert_eq!(level.pairs(), 1);
        assert_eq!(level.attempts(), 1);
        wait_one_second(&mut level);
        assert!(level.cards[a].face_up && level.cards[b].face_up);
        assert!(level.selection.is_empty());
    }

    #[test]
    fn mismatch_flips_back_after_a_second() {
        let mut level = Venus::with_seed(2);
        let (a, _, c) = pair_and_stranger(&level);
        click_card(&mut level, a);
        click_card(&mut level, c);
        assert_eq!(level.pairs(), 0);
        assert_eq!(level.attempts(), 1);
        assert!(level.cards[c].face_up);
        wait_one_second(&mut level);
        assert!(!level.cards[a].face_up && !level.cards[c].face_up);
    }

    #[test]
    fn third_click_is_ignored_while_a_pair_is_shown() {
        let mut level = Venus::with_seed(3);
        let (a, _, c) = pair_and_stranger(&level);
        click_card(&mut level, a);
        click_card(&mut level, c);
        let third = (0..12).find(|&i| i != a && i != c).unwrap();
        click_card(&mut level, third);
        assert!(!level.cards[third].face_up);
    }

    #[test]
    fn clicking_a_face_up_card_does_nothing() {
        let mut level = Venus::with_seed(4);
        click_card(&mut level, 0);
        click_card(&mut level, 0);
        assert_eq!(level.selection, vec![0]);
        assert_eq!(level.attempts(), 0);
    }

    #[test]
    fn six_pairs_win() {
        let mut level = Venus::with_seed(5);
        let mut outcome = LevelOutcome::Continue;
        for sign in ZODIAC_SIGNS {
            let pair: Vec<usize> = (0..12).filter(|&i| level.cards[i].sign == sign).collect();
            click_card(&mut level, pair[0]);
            outcome = click_card(&mut level, pair[1]);
            wait_one_second(&mut level);
        }
        assert_eq!(level.pairs(), 6);
        assert_eq!(outcome, LevelOutcome::Victory);
    }
}
