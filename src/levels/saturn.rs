//! Saturn: reassemble two shattered constellation pictures.
//!
//! The board is a 6×3 grid of 100 px cells.  The left three columns belong
//! to Scorpio and the right three to Capricorn; each cell must end up holding
//! the piece cut from the same spot of its picture.

use super::{Level, LevelOutcome, Planet, TickContext, SMALL_ARENA};
use crate::canvas::Canvas;
use crate::collision::{point_in_rect, rect};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const PIECE: f32 = 100.0;
/// Pieces per picture side.
const SIDE: usize = 3;
const COLS: usize = SIDE * 2;
const CELLS: usize = SIDE * SIDE * 2;
const PICTURE: f32 = PIECE * SIDE as f32;

/// Top-left of the board, leaving room for the reference thumbnails.
const BOARD_ORIGIN: Vec2 = Vec2::new((SMALL_ARENA.x - COLS as f32 * PIECE) / 2.0, 150.0);
const THUMB: f32 = 100.0;

/// One of the two pictures.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Picture {
    name: &'static str,
    backdrop: [u8; 3],
    /// Stars in picture space (0..300 on both axes), joined in order.
    stars: &'static [(f32, f32)],
}

const SCORPIO: Picture = Picture {
    name: "Scorpio",
    backdrop: [110, 30, 40],
    stars: &[
        (40.0, 50.0),
        (70.0, 80.0),
        (110.0, 95.0),
        (145.0, 125.0),
        (165.0, 165.0),
        (180.0, 205.0),
        (210.0, 245.0),
        (250.0, 250.0),
        (270.0, 215.0),
        (255.0, 180.0),
    ],
};

const CAPRICORN: Picture = Picture {
    name: "Capricorn",
    backdrop: [30, 80, 100],
    stars: &[
        (30.0, 80.0),
        (90.0, 55.0),
        (160.0, 70.0),
        (245.0, 50.0),
        (270.0, 115.0),
        (235.0, 190.0),
        (170.0, 235.0),
        (110.0, 205.0),
        (60.0, 150.0),
        (30.0, 80.0),
    ],
};

const PICTURES: [Picture; 2] = [SCORPIO, CAPRICORN];

/// Piece id: picture index, then row and column within that picture.
fn piece_parts(piece: usize) -> (usize, usize, usize) {
    let picture = piece / (SIDE * SIDE);
    let local = piece % (SIDE * SIDE);
    (picture, local / SIDE, local % SIDE)
}

/// Piece that belongs in `cell` once the puzzle is solved.
fn solved_piece(cell: usize) -> usize {
    let (row, col) = (cell / COLS, cell % COLS);
    let picture = col / SIDE;
    picture * SIDE * SIDE + row * SIDE + col % SIDE
}

fn cell_bounds(cell: usize) -> Rect {
    let (row, col) = (cell / COLS, cell % COLS);
    rect(
        BOARD_ORIGIN.x + col as f32 * PIECE,
        BOARD_ORIGIN.y + row as f32 * PIECE,
        PIECE,
        PIECE,
    )
}

fn cell_at(point: Vec2) -> Option<usize> {
    (0..CELLS).find(|&cell| {
        let bounds = cell_bounds(cell);
        // Half-open so a point on a shared edge picks one cell
        point_in_rect(point, bounds) && point.x < bounds.max.x && point.y < bounds.max.y
    })
}

pub struct Saturn {
    rng: StdRng,
    /// Piece id shown in each cell.
    board: Vec<usize>,
    dragging: Option<usize>,
    cursor: Option<Vec2>,
    /// Cells found correct by the last check.
    correct: Vec<bool>,
    show_retry: bool,
}

impl Saturn {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut level = Self {
            rng,
            board: Vec::new(),
            dragging: None,
            cursor: None,
            correct: vec![false; CELLS],
            show_retry: false,
        };
        level.reset();
        level
    }

    pub fn is_solved(&self) -> bool {
        self.board
            .iter()
            .enumerate()
            .all(|(cell, &piece)| piece == solved_piece(cell))
    }

    fn check(&mut self) -> bool {
        for (cell, &piece) in self.board.iter().enumerate() {
            self.correct[cell] = piece == solved_piece(cell);
        }
        self.correct.iter().all(|&c| c)
    }

    fn draw_piece(canvas: &mut Canvas, piece: usize, at: Vec2) {
        let (picture, row, col) = piece_parts(piece);
        let art = PICTURES[picture];
        let [r, g, b] = art.backdrop;
        // Shade by position so neighbouring pieces are told apart
        let shade = (row * SIDE + col) as u8 * 6;
        canvas.fill_rect(
            at.x,
            at.y,
            PIECE,
            PIECE,
            Color::srgb_u8(r.saturating_add(shade), g.saturating_add(shade), b.saturating_add(shade)),
        );
        let offset = Vec2::new(col as f32 * PIECE, row as f32 * PIECE);
        let piece_area = Rect::from_corners(offset, offset + Vec2::splat(PIECE));
        for &(x, y) in art.stars {
            let star = Vec2::new(x, y);
            if point_in_rect(star, piece_area) {
                canvas.fill_circle(at + star - offset, 5.0, Color::WHITE);
            }
        }
        for pair in art.stars.windows(2) {
            let (a, b) = (Vec2::from(pair[0]), Vec2::from(pair[1]));
            if point_in_rect(a, piece_area) && point_in_rect(b, piece_area) {
                canvas.line(at + a - offset, at + b - offset, Color::srgb_u8(255, 255, 180));
            }
        }
        canvas.stroke_rect(at.x, at.y, PIECE, PIECE, Color::BLACK);
    }

    fn draw_thumbnail(canvas: &mut Canvas, art: Picture, at: Vec2) {
        let [r, g, b] = art.backdrop;
        canvas.fill_rect(at.x, at.y, THUMB, THUMB, Color::srgb_u8(r, g, b));
        let scale = THUMB / PICTURE;
        let stars: Vec<Vec2> = art
            .stars
            .iter()
            .map(|&(x, y)| at + Vec2::new(x, y) * scale)
            .collect();
        for pair in stars.windows(2) {
            canvas.line(pair[0], pair[1], Color::srgb_u8(255, 255, 180));
        }
        for star in stars {
            canvas.fill_circle(star, 2.0, Color::WHITE);
        }
        canvas.text(art.name, at + Vec2::new(0.0, THUMB + 2.0), 16.0, Color::BLACK);
    }
}

impl Default for Saturn {
    fn default() -> Self {
        Self::new()
    }
}

impl Level for Saturn {
    fn planet(&self) -> Planet {
        Planet::Saturn
    }

    fn arena(&self) -> Vec2 {
        SMALL_ARENA
    }

    fn reset(&mut self) {
        self.board = (0..CELLS).collect();
        self.board.shuffle(&mut self.rng);
        while self.is_solved() {
            self.board.shuffle(&mut self.rng);
        }
        self.dragging = None;
        self.cursor = None;
        self.correct = vec![false; CELLS];
        self.show_retry = false;
    }

    fn tick(&mut self, ctx: &mut TickContext) -> LevelOutcome {
        let input = ctx.input;
        self.cursor = input.cursor;

        if input.mouse_pressed {
            self.dragging = input.cursor.and_then(cell_at);
        }
        if input.mouse_released || (self.dragging.is_some() && !input.mouse_held) {
            if let (Some(from), Some(to)) = (self.dragging.take(), input.cursor.and_then(cell_at)) {
                if from != to {
                    self.board.swap(from, to);
                    self.show_retry = false;
                }
            }
        }

        if input.pressed(KeyCode::Enter) {
            if self.check() {
                return LevelOutcome::Victory;
            }
            self.show_retry = true;
        }
        LevelOutcome::Continue
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.set_arena(SMALL_ARENA);
        canvas.fill_rect(0.0, 0.0, SMALL_ARENA.x, SMALL_ARENA.y, Color::WHITE);
        Self::draw_thumbnail(canvas, SCORPIO, Vec2::new(BOARD_ORIGIN.x, 10.0));
        Self::draw_thumbnail(canvas, CAPRICORN, Vec2::new(BOARD_ORIGIN.x + THUMB + 20.0, 10.0));

        for (cell, &piece) in self.board.iter().enumerate() {
            let bounds = cell_bounds(cell);
            if self.dragging == Some(cell) {
                canvas.fill_rect(bounds.min.x, bounds.min.y, PIECE, PIECE, Color::srgb_u8(60, 60, 60));
            } else {
                Self::draw_piece(canvas, piece, bounds.min);
            }
            if self.correct[cell] {
                canvas.stroke_rect(
                    bounds.min.x + 2.0,
                    bounds.min.y + 2.0,
                    PIECE - 4.0,
                    PIECE - 4.0,
                    Color::srgb_u8(169, 169, 169),
                );
            }
        }

        if let (Some(cell), Some(cursor)) = (self.dragging, self.cursor) {
            Self::draw_piece(canvas, self.board[cell], cursor - Vec2::splat(PIECE / 2.0));
        }

        if self.show_retry {
            let centre_x = SMALL_ARENA.x / 2.0;
            canvas.text_centered("Incorrect", centre_x, SMALL_ARENA.y / 2.0 - 40.0, 64.0, Color::BLACK);
            canvas.text_centered("Try Again", centre_x, SMALL_ARENA.y / 2.0 + 30.0, 44.0, Color::BLACK);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelInput;

    fn tick(level: &mut Saturn, input: &LevelInput) -> LevelOutcome {
        let mut cues = Vec::new();
        level.tick(&mut TickContext::new(input, 1.0 / 60.0, &mut cues))
    }

    fn swap_cells(level: &mut Saturn, from: usize, to: usize) {
        let a = cell_bounds(from).center();
        let b = cell_bounds(to).center();
        tick(level, &LevelInput::click(a));
        tick(level, &LevelInput::drag(b));
        tick(level, &LevelInput::release(b));
    }

    fn solve(level: &mut Saturn) {
        for cell in 0..CELLS {
            let want = solved_piece(cell);
            let at = level.board.iter().position(|&p| p == want).unwrap();
            if at != cell {
                swap_cells(level, at, cell);
            }
        }
    }

    #[test]
    fn board_is_a_shuffled_permutation() {
        let level = Saturn::with_seed(1);
        let mut pieces = level.board.clone();
        pieces.sort_unstable();
        assert_eq!(pieces, (0..CELLS).collect::<Vec<_>>());
        assert!(!level.is_solved());
    }

    #[test]
    fn board_sits_below_the_thumbnails() {
        assert_eq!(cell_bounds(0).min, Vec2::new(100.0, 150.0));
        assert_eq!(cell_bounds(CELLS - 1).max, Vec2::new(700.0, 450.0));
        assert_eq!(cell_at(Vec2::new(150.0, 150.0)), Some(0));
        assert_eq!(cell_at(Vec2::new(50.0, 200.0)), None);
    }

    #[test]
    fn each_picture_fills_its_own_half() {
        assert_eq!(solved_piece(0), 0);
        assert_eq!(solved_piece(3), 9);
        assert_eq!(solved_piece(COLS), 3);
        assert_eq!(piece_parts(solved_piece(COLS + 4)), (1, 1, 1));
    }

    #[test]
    fn drag_and_drop_swaps_two_cells() {
        let mut level = Saturn::with_seed(2);
        let before = level.board.clone();
        swap_cells(&mut level, 0, 7);
        assert_eq!(level.board[0], before[7]);
        assert_eq!(level.board[7], before[0]);
        assert_eq!(level.dragging, None);
    }

    #[test]
    fn dropping_outside_the_board_changes_nothing() {
        let mut level = Saturn::with_seed(3);
        let before = level.board.clone();
        tick(&mut level, &LevelInput::click(cell_bounds(4).center()));
        tick(&mut level, &LevelInput::release(Vec2::new(10.0, 10.0)));
        assert_eq!(level.board, before);
        assert_eq!(level.dragging, None);
    }

    #[test]
    fn wrong_check_marks_correct_cells_and_keeps_playing() {
        let mut level = Saturn::with_seed(4);
        let outcome = tick(&mut level, &LevelInput::tapped(&[KeyCode::Enter]));
        assert_eq!(outcome, LevelOutcome::Continue);
        assert!(level.show_retry);
        for cell in 0..CELLS {
            assert_eq!(level.correct[cell], level.board[cell] == solved_piece(cell));
        }
    }

    #[test]
    fn solved_board_wins_on_enter() {
        let mut level = Saturn::with_seed(5);
        solve(&mut level);
        assert!(level.is_solved());
        let outcome = tick(&mut level, &LevelInput::tapped(&[KeyCode::Enter]));
        assert_eq!(outcome, LevelOutcome::Victory);
    }
}
