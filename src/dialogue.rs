//! Typewriter dialogue box shared by every scene.
//!
//! [`DialogueBox`] is plain data: it owns the pages of the current message,
//! wraps them against the panel's interior width and reveals the current page
//! a few characters per tick.  The Bevy side lives in [`panel`], which keeps a
//! UI panel in sync with whatever [`ActiveDialogue`] currently holds.
//!
//! ## Lifecycle
//!
//! | Call           | Effect                                                      |
//! |----------------|-------------------------------------------------------------|
//! | `set_text`     | Replace all pages, rewrap, reset to page 0 / 0 chars        |
//! | `update`       | Reveal `reveal_step` more characters (saturating)           |
//! | `skip`         | Reveal the whole current page                               |
//! | `confirm`      | Skip, else turn the page, else report the dialogue finished |
//! | `is_finished`  | Last page fully revealed                                    |

pub mod metrics;
pub mod panel;
pub mod wrap;

pub use metrics::{MonospaceMeasure, TextMeasure, TtfMeasure};
pub use panel::{ActiveDialogue, DialoguePlugin};
pub use wrap::wrap_text;

use bevy::math::Rect;
use bevy::math::Vec2;
use serde::Deserialize;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Where the panel sits on screen (top-left origin, logical pixels).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PanelGeometry {
    /// Absolute pixels.
    Fixed {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Fractions of the window size.
    Relative {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

impl PanelGeometry {
    /// Resolve to a pixel rectangle for a window of `window` size.
    pub fn resolve(&self, window: Vec2) -> Rect {
        match *self {
            PanelGeometry::Fixed {
                x,
                y,
                width,
                height,
            } => Rect::new(x, y, x + width, y + height),
            PanelGeometry::Relative {
                x,
                y,
                width,
                height,
            } => {
                let min = Vec2::new(x, y) * window;
                let size = Vec2::new(width, height) * window;
                Rect::from_corners(min, min + size)
            }
        }
    }
}

// ── Text input ────────────────────────────────────────────────────────────────

/// One message or an ordered sequence of pages.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DialogueText(pub Vec<String>);

impl From<&str> for DialogueText {
    fn from(text: &str) -> Self {
        DialogueText(vec![text.to_string()])
    }
}

impl From<String> for DialogueText {
    fn from(text: String) -> Self {
        DialogueText(vec![text])
    }
}

impl From<Vec<String>> for DialogueText {
    fn from(pages: Vec<String>) -> Self {
        DialogueText(pages)
    }
}

impl From<&[&str]> for DialogueText {
    fn from(pages: &[&str]) -> Self {
        DialogueText(pages.iter().map(|p| p.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for DialogueText {
    fn from(pages: [&str; N]) -> Self {
        DialogueText(pages.iter().map(|p| p.to_string()).collect())
    }
}

/// Result of pressing the confirm key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueAdvance {
    /// The current page was still revealing and is now complete.
    Skipped,
    /// Moved on to the following page.
    NextPage,
    /// Already on the last, fully revealed page.
    Finished,
}

// ── Dialogue box ──────────────────────────────────────────────────────────────

/// Incremental text reveal over one or more wrapped pages.
#[derive(Debug, Clone)]
pub struct DialogueBox {
    pages: Vec<Vec<String>>,
    page: usize,
    revealed: usize,
    reveal_step: usize,
    max_width: f32,
    font_size: f32,
    generation: u64,
}

impl DialogueBox {
    /// Empty box wrapping to `max_width` pixels at `font_size`.
    pub fn new(reveal_step: usize, max_width: f32, font_size: f32) -> Self {
        Self {
            pages: vec![Vec::new()],
            page: 0,
            revealed: 0,
            reveal_step: reveal_step.max(1),
            max_width,
            font_size,
            generation: 0,
        }
    }

    /// Replace the contents and start again from the first page.
    pub fn set_text(&mut self, text: impl Into<DialogueText>, measure: &dyn TextMeasure) {
        let DialogueText(pages) = text.into();
        self.pages = pages
            .iter()
            .map(|page| wrap_text(page, self.max_width, self.font_size, measure))
            .collect();
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        self.page = 0;
        self.revealed = 0;
        self.generation += 1;
    }

    /// Reveal the next `reveal_step` characters.
    pub fn update(&mut self) {
        self.revealed = (self.revealed + self.reveal_step).min(self.total_chars());
    }

    /// Reveal the whole current page.
    pub fn skip(&mut self) {
        self.revealed = self.total_chars();
    }

    /// Handle the confirm key.
    pub fn confirm(&mut self) -> DialogueAdvance {
        if !self.page_finished() {
            self.skip();
            DialogueAdvance::Skipped
        } else if self.page + 1 < self.pages.len() {
            self.page += 1;
            self.revealed = 0;
            self.generation += 1;
            DialogueAdvance::NextPage
        } else {
            DialogueAdvance::Finished
        }
    }

    /// Current page fully revealed.
    pub fn page_finished(&self) -> bool {
        self.revealed >= self.total_chars()
    }

    /// Last page fully revealed.
    pub fn is_finished(&self) -> bool {
        self.is_last_page() && self.page_finished()
    }

    pub fn is_last_page(&self) -> bool {
        self.page + 1 >= self.pages.len()
    }

    /// Wrapped lines of the current page.
    pub fn lines(&self) -> &[String] {
        &self.pages[self.page]
    }

    /// Character count of the current page, summed over its wrapped lines.
    pub fn total_chars(&self) -> usize {
        self.lines().iter().map(|l| l.chars().count()).sum()
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn page_index(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Bumped whenever the set of lines on screen changes shape.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Revealed prefix of every line that has started to appear.
    pub fn visible_lines(&self) -> Vec<&str> {
        let mut remaining = self.revealed;
        let mut out = Vec::new();
        for line in self.lines() {
            if remaining == 0 {
                break;
            }
            let len = line.chars().count();
            if remaining >= len {
                out.push(line.as_str());
                remaining -= len;
            } else {
                let cut = line
                    .char_indices()
                    .nth(remaining)
                    .map(|(i, _)| i)
                    .unwrap_or(line.len());
                out.push(&line[..cut]);
                remaining = 0;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: MonospaceMeasure = MonospaceMeasure { advance_em: 1.0 };

    fn forty_wide() -> DialogueBox {
        DialogueBox::new(1, 40.0, 1.0)
    }

    #[test]
    fn earth_intro_wraps_and_finishes_in_time() {
        let mut d = forty_wide();
        d.set_text(
            "Welcome to Earth! Your mission is to navigate through the city.",
            &UNIT,
        );
        assert!(d.lines().len() >= 2);
        assert!(d.lines().iter().all(|l| l.chars().count() <= 40));
        assert!(!d.is_finished());
        for _ in 0..200 {
            d.update();
        }
        assert!(d.is_finished());
    }

    #[test]
    fn finished_exactly_when_counter_reaches_total() {
        let mut d = forty_wide();
        d.set_text("ab cd", &UNIT);
        assert_eq!(d.total_chars(), 4);
        for _ in 0..3 {
            d.update();
            assert!(!d.is_finished());
        }
        d.update();
        assert!(d.is_finished());
        d.update();
        assert_eq!(d.revealed(), 4);
    }

    #[test]
    fn reveal_step_advances_several_chars() {
        let mut d = DialogueBox::new(3, 40.0, 1.0);
        d.set_text("abcdefg", &UNIT);
        d.update();
        assert_eq!(d.visible_lines(), vec!["abc"]);
        d.update();
        d.update();
        assert_eq!(d.revealed(), 7);
    }

    #[test]
    fn set_text_resets_and_is_deterministic() {
        let mut d = forty_wide();
        d.set_text("first message here", &UNIT);
        d.skip();
        let text = "The quick brown fox jumps over the lazy dog, twice over.";
        d.set_text(text, &UNIT);
        assert_eq!(d.revealed(), 0);
        assert_eq!(d.page_index(), 0);
        let first = d.lines().to_vec();
        d.set_text(text, &UNIT);
        assert_eq!(d.lines(), first.as_slice());
    }

    #[test]
    fn skip_is_idempotent() {
        let mut d = forty_wide();
        d.set_text("skip me please", &UNIT);
        d.skip();
        let after_one = d.revealed();
        d.skip();
        assert_eq!(after_one, d.total_chars());
        assert_eq!(d.revealed(), after_one);
        assert!(d.is_finished());
    }

    #[test]
    fn partially_revealed_line_shows_prefix() {
        let mut d = DialogueBox::new(1, 5.0, 1.0);
        d.set_text("abcde fgh", &UNIT);
        for _ in 0..7 {
            d.update();
        }
        assert_eq!(d.visible_lines(), vec!["abcde", "fg"]);
    }

    #[test]
    fn confirm_walks_through_pages() {
        let mut d = forty_wide();
        d.set_text(["page one", "page two"], &UNIT);
        assert_eq!(d.page_count(), 2);
        assert_eq!(d.confirm(), DialogueAdvance::Skipped);
        assert!(!d.is_finished());
        assert_eq!(d.confirm(), DialogueAdvance::NextPage);
        assert_eq!(d.revealed(), 0);
        assert_eq!(d.lines(), ["page two".to_string()]);
        assert_eq!(d.confirm(), DialogueAdvance::Skipped);
        assert!(d.is_finished());
        assert_eq!(d.confirm(), DialogueAdvance::Finished);
    }

    #[test]
    fn empty_page_is_immediately_finished() {
        let mut d = forty_wide();
        d.set_text("", &UNIT);
        assert_eq!(d.total_chars(), 0);
        assert!(d.is_finished());
        assert!(d.visible_lines().is_empty());
    }

    #[test]
    fn relative_geometry_scales_with_window() {
        let g = PanelGeometry::Relative {
            x: 0.25,
            y: 0.5,
            width: 0.5,
            height: 0.25,
        };
        let r = g.resolve(Vec2::new(1200.0, 800.0));
        assert_eq!(r.min, Vec2::new(300.0, 400.0));
        assert_eq!(r.size(), Vec2::new(600.0, 200.0));
    }
}
