//! Vertical (top-to-bottom) layout of the special-note cells.
//!
//! Each of the six fixed cells carries one short label drawn glyph by
//! glyph down the cell. Labels up to four glyphs use a fixed size and
//! spacing; longer labels divide the available height evenly and
//! shrink the font in proportion, so the block stays centered in the
//! cell whatever its length.

use crate::layout::{palette, CardLayout, Rect, NOTE_GRID};
use crate::surface::{Surface, TextStyle};

/// Glyph budget a cell fits without compression.
pub const BASE_CHAR_BUDGET: usize = 4;

/// Logical font size and per-glyph spacing of an uncompressed label.
const BASE_FONT: f64 = 12.0;
const BASE_SPACING: f64 = 15.0;

/// Vertical padding inside a cell, split between top and bottom.
const CELL_PADDING: f64 = 10.0;

/// Compression never shrinks the font below this, so even a very long
/// note stays legible.
const MIN_FONT: f64 = 5.0;

/// Header label of cell 0; never caller-supplied.
pub const NOTE_HEADER: &str = "特記事項";

/// Positional fallbacks for cells 1-5 when the caller supplies fewer
/// than five notes.
pub const DEFAULT_NOTES: [&str; 5] = ["もふもふ", "つぶらな瞳", "マイペース", "良く寝る", "食欲旺盛"];

/// Maps horizontal prolonged-sound marks (any of the three common
/// encodings) onto the vertical-writing glyph. Without this a
/// vertical run renders with a sideways dash.
pub fn vertical_glyph(c: char) -> char {
    match c {
        'ー' | '-' | '－' => '｜',
        _ => c,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellMetrics {
    pub font_size: f64,
    pub spacing: f64,
    /// y of the first glyph anchor; the block is centered in the cell.
    pub start_y: f64,
}

/// Vertical metrics for a label of `char_count` glyphs in `cell`
/// (both in output pixels).
pub fn cell_metrics(layout: &CardLayout, cell: Rect, char_count: usize) -> CellMetrics {
    let (font_size, spacing) = if char_count > BASE_CHAR_BUDGET {
        let available = cell.h - layout.s(CELL_PADDING);
        let shrunk = layout.s(BASE_FONT) * BASE_CHAR_BUDGET as f64 / char_count as f64;
        (shrunk.max(layout.s(MIN_FONT)), available / char_count as f64)
    } else {
        (layout.s(BASE_FONT), layout.s(BASE_SPACING))
    };

    let total = spacing * char_count.saturating_sub(1) as f64;
    CellMetrics {
        font_size,
        spacing,
        start_y: cell.y + (cell.h - total) / 2.0,
    }
}

/// Labels for all six cells: the fixed header, then caller notes with
/// positional defaults for missing or empty entries.
pub fn cell_labels(user_notes: &[String]) -> Vec<String> {
    let mut labels = Vec::with_capacity(NOTE_GRID.cells);
    labels.push(NOTE_HEADER.to_string());
    for (i, default) in DEFAULT_NOTES.iter().enumerate() {
        let note = user_notes.get(i).map(String::as_str).unwrap_or("");
        labels.push(if note.is_empty() { default.to_string() } else { note.to_string() });
    }
    labels
}

/// Draws the note grid: cell boxes (header cell tinted) and one
/// vertical glyph run per cell.
pub fn draw_notes<S: Surface>(surface: &mut S, layout: &CardLayout, user_notes: &[String]) {
    let stroke_w = layout.s(0.5).max(1.0);
    for i in 0..NOTE_GRID.cells {
        let cell = layout.note_cell(i);
        if i == 0 {
            surface.fill_rect(cell, palette::NOTE_HEADER);
        }
        surface.stroke_rounded_rect(cell, 0.0, palette::BLACK, stroke_w);
    }

    for (i, label) in cell_labels(user_notes).iter().enumerate() {
        let cell = layout.note_cell(i);
        let chars: Vec<char> = label.chars().map(vertical_glyph).collect();
        let metrics = cell_metrics(layout, cell, chars.len());
        let style = TextStyle::plain(metrics.font_size, palette::BLACK).centered();

        let center_x = cell.x + cell.w / 2.0;
        let mut buf = [0u8; 4];
        for (row, ch) in chars.iter().enumerate() {
            let y = metrics.start_y + metrics.spacing * row as f64;
            surface.fill_text(ch.encode_utf8(&mut buf), center_x, y, &style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::mock::{Op, RecordingSurface};

    fn layout() -> CardLayout {
        CardLayout::default()
    }

    #[test]
    fn short_labels_use_base_metrics() {
        let l = layout();
        let cell = l.note_cell(1);
        for count in 1..=BASE_CHAR_BUDGET {
            let m = cell_metrics(&l, cell, count);
            assert_eq!(m.font_size, l.s(12.0));
            assert_eq!(m.spacing, l.s(15.0));
        }
    }

    #[test]
    fn long_labels_compress_font_and_spacing() {
        let l = layout();
        let cell = l.note_cell(1);
        let base = cell_metrics(&l, cell, 4);
        let m = cell_metrics(&l, cell, 6);
        assert_eq!(m.font_size, l.s(12.0) * 4.0 / 6.0);
        assert_eq!(m.spacing, (cell.h - l.s(10.0)) / 6.0);
        assert!(m.font_size < base.font_size);
        assert!(m.spacing < base.spacing);
    }

    #[test]
    fn font_never_shrinks_below_floor() {
        let l = layout();
        let cell = l.note_cell(1);
        let m = cell_metrics(&l, cell, 40);
        assert_eq!(m.font_size, l.s(5.0));
        // Spacing still divides the available height so the run fits.
        assert_eq!(m.spacing, (cell.h - l.s(10.0)) / 40.0);
    }

    #[test]
    fn block_is_vertically_centered() {
        let l = layout();
        let cell = l.note_cell(2);
        let m = cell_metrics(&l, cell, 4);
        let total = m.spacing * 3.0;
        assert_eq!(m.start_y, cell.y + (cell.h - total) / 2.0);
        let center = cell.y + cell.h / 2.0;
        let bottom = m.start_y + total;
        assert!(((bottom - center) - (center - m.start_y)).abs() < 1e-9);
    }

    #[test]
    fn prolonged_sound_marks_become_vertical() {
        for c in ['ー', '-', '－'] {
            assert_eq!(vertical_glyph(c), '｜');
        }
        assert_eq!(vertical_glyph('あ'), 'あ');
    }

    #[test]
    fn labels_fall_back_to_defaults() {
        let labels = cell_labels(&[]);
        assert_eq!(labels[0], NOTE_HEADER);
        assert_eq!(labels[1], "もふもふ");
        assert_eq!(labels[5], "食欲旺盛");

        let user = vec!["クール".to_string(), String::new()];
        let labels = cell_labels(&user);
        assert_eq!(labels[1], "クール");
        assert_eq!(labels[2], "つぶらな瞳"); // empty entry falls back
    }

    #[test]
    fn draw_substitutes_and_stacks_glyphs() {
        let l = layout();
        let mut s = RecordingSurface::new();
        draw_notes(&mut s, &l, &["スー".to_string()]);

        let texts = s.texts();
        assert!(texts.contains(&"｜"));
        assert!(!texts.contains(&"ー"));

        // Cell 1 holds the two-glyph user note, stacked by spacing.
        let cell = l.note_cell(1);
        let ys: Vec<f64> = s
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, x, y, .. }
                    if (*x - (cell.x + cell.w / 2.0)).abs() < 1e-9
                        && (text == "ス" || text == "｜") =>
                {
                    Some(*y)
                }
                _ => None,
            })
            .collect();
        assert_eq!(ys.len(), 2);
        assert_eq!(ys[1] - ys[0], l.s(15.0));
    }

    #[test]
    fn header_cell_is_tinted_once() {
        let mut s = RecordingSurface::new();
        draw_notes(&mut s, &layout(), &[]);
        let tinted = s
            .ops
            .iter()
            .filter(|op| matches!(op, Op::FillRect { color, .. } if *color == palette::NOTE_HEADER))
            .count();
        assert_eq!(tinted, 1);
    }
}
