//! Greedy word-wrapping against a pixel width.

use super::metrics::TextMeasure;

/// Break `text` into lines no wider than `max_width` when rendered at
/// `font_size`.
///
/// Words are appended to the current line while the joined line still fits.
/// A word that is wider than the limit on its own is cut at character
/// boundaries.  `\n` forces a break and runs of whitespace collapse to a
/// single space.  No empty lines are produced.
///
/// The width guarantee holds as long as every single character fits in
/// `max_width`; a lone glyph wider than the limit still gets a line of its own.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    font_size: f32,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            for piece in split_overlong(word, max_width, font_size, measure) {
                if current.is_empty() {
                    current = piece;
                    continue;
                }
                let candidate = format!("{current} {piece}");
                if measure.width(&candidate, font_size) <= max_width {
                    current = candidate;
                } else {
                    lines.push(std::mem::replace(&mut current, piece));
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Cut a single word into chunks that each fit `max_width`.
fn split_overlong(
    word: &str,
    max_width: f32,
    font_size: f32,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    if measure.width(word, font_size) <= max_width {
        return vec![word.to_string()];
    }

    let mut chunks = Vec::new();
    let mut chunk = String::new();
    for ch in word.chars() {
        chunk.push(ch);
        if chunk.chars().count() > 1 && measure.width(&chunk, font_size) > max_width {
            chunk.pop();
            chunks.push(std::mem::take(&mut chunk));
            chunk.push(ch);
        }
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}
