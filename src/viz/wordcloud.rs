//! Word cloud layout: spiral placement of words sized by frequency.

use anyhow::Result;

use crate::present::FrequencyTable;

/// Upper bound on words drawn, most frequent first.
pub const MAX_WORDS: usize = 200;

const PADDING: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// A word positioned on the canvas; `(x, y)` is the top-left corner of its box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedWord {
    pub text: String,
    pub weight: usize,
    pub font_size: u32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub color_index: usize,
}

impl PlacedWord {
    fn overlaps(&self, x: i32, y: i32, width: u32, height: u32) -> bool {
        let (w, h) = (width as i32, height as i32);
        x < self.x + self.width as i32 + PADDING
            && self.x < x + w + PADDING
            && y < self.y + self.height as i32 + PADDING
            && self.y < y + h + PADDING
    }
}

/// Place words by descending weight. Font size scales with the square root of
/// the weight so glyph area tracks frequency; a word that does not fit is
/// shrunk, and dropped once it no longer fits at the minimum size.
///
/// `measure` returns the pixel box of `text` at a font size.
pub fn layout<M>(
    frequencies: &FrequencyTable,
    canvas: Canvas,
    mut measure: M,
) -> Result<Vec<PlacedWord>>
where
    M: FnMut(&str, u32) -> Result<(u32, u32)>,
{
    let ranked = frequencies.ranked();
    let Some(&(_, max_weight)) = ranked.first() else {
        return Ok(Vec::new());
    };

    let max_font = (canvas.height * 2 / 5).max(1);
    let min_font = (canvas.height / 100).max(4).min(max_font);
    let mut placed: Vec<PlacedWord> = Vec::new();

    for (index, (text, weight)) in ranked.into_iter().take(MAX_WORDS).enumerate() {
        let ratio = (weight as f64 / max_weight as f64).sqrt();
        let mut size = ((max_font as f64 * ratio).round() as u32).max(min_font);
        loop {
            let (width, height) = measure(text, size)?;
            if let Some((x, y)) = find_slot(width, height, canvas, &placed) {
                placed.push(PlacedWord {
                    text: text.to_string(),
                    weight,
                    font_size: size,
                    x,
                    y,
                    width,
                    height,
                    color_index: index,
                });
                break;
            }
            if size <= min_font {
                break;
            }
            size = (size * 9 / 10).max(min_font);
        }
    }
    Ok(placed)
}

/// Walk an Archimedean spiral out from the centre until the box fits.
/// Returns the top-left corner, or `None` once the spiral has swept the
/// whole canvas.
pub fn find_slot(
    width: u32,
    height: u32,
    canvas: Canvas,
    placed: &[PlacedWord],
) -> Option<(i32, i32)> {
    if width > canvas.width || height > canvas.height {
        return None;
    }
    let (cw, ch) = (canvas.width as f64, canvas.height as f64);
    let (w, h) = (width as f64, height as f64);
    let max_x = (canvas.width - width) as i32;
    let max_y = (canvas.height - height) as i32;
    // Successive spiral turns sit `gap` pixels apart; samples along a turn too.
    let gap = (cw.min(ch) / 100.0).max(1.0);
    let spacing = gap / std::f64::consts::TAU;
    let aspect = ch / cw;
    // y is squashed by `aspect`, so the sweep must reach the corners in
    // unscaled units.
    let limit = cw.max(ch / aspect) / 2.0 * std::f64::consts::SQRT_2;

    let mut t: f64 = 0.0;
    loop {
        let radius = spacing * t;
        if radius > limit {
            return None;
        }
        let x = (cw / 2.0 + radius * t.cos() - w / 2.0).round() as i32;
        let y = (ch / 2.0 + radius * aspect * t.sin() - h / 2.0).round() as i32;
        let inside = (0..=max_x).contains(&x) && (0..=max_y).contains(&y);
        if inside && !placed.iter().any(|p| p.overlaps(x, y, width, height)) {
            return Some((x, y));
        }
        t += (gap / radius.max(gap)).clamp(0.02, 0.5);
    }
}
