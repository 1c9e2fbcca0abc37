//! Fit-to-width text: horizontal-only compression of one line so it
//! never overflows a fixed bar.

use crate::surface::{Surface, TextStyle};

/// Draws `text` at `(x, y)` compressed horizontally to at most
/// `max_width`. The vertical size is untouched and text narrower than
/// the bar is never enlarged. Returns the scale factor applied.
pub fn draw_fitted_text<S: Surface>(
    surface: &mut S,
    text: &str,
    x: f64,
    y: f64,
    style: &TextStyle,
    max_width: f64,
) -> f64 {
    let measured = surface.measure_text(text, style);
    let scale_x = if measured > 0.0 {
        (max_width / measured).min(1.0)
    } else {
        1.0
    };

    surface.with_transform(x, y, scale_x, 1.0, |s| {
        s.fill_text(text, 0.0, 0.0, style);
    });

    scale_x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::palette;
    use crate::surface::mock::{Op, RecordingSurface, GLYPH_WIDTH_RATIO};

    fn style() -> TextStyle {
        TextStyle::bold(27.0, palette::BLACK)
    }

    #[test]
    fn short_text_is_not_scaled() {
        let mut s = RecordingSurface::new();
        let style = style();
        let width = s.measure_text("短い", &style);
        assert!(width < 500.0);

        let scale = draw_fitted_text(&mut s, "短い", 30.0, 174.0, &style, 500.0);
        assert_eq!(scale, 1.0);
        // Idempotent: a second pass still leaves the scale at 1.0.
        assert_eq!(draw_fitted_text(&mut s, "短い", 30.0, 174.0, &style, 500.0), 1.0);
    }

    #[test]
    fn empty_text_is_stable() {
        let mut s = RecordingSurface::new();
        assert_eq!(draw_fitted_text(&mut s, "", 0.0, 0.0, &style(), 100.0), 1.0);
    }

    #[test]
    fn long_text_compresses_to_the_bar() {
        let mut s = RecordingSurface::new();
        let style = style();
        let text = "2027年（令和09年）05月03日まで有効";
        let measured = s.measure_text(text, &style);
        let bar = measured / 2.0;

        let scale = draw_fitted_text(&mut s, text, 30.0, 174.0, &style, bar);
        assert!(scale < 1.0);
        assert!((measured * scale - bar).abs() < 1e-6);
    }

    #[test]
    fn draw_happens_under_the_transform_then_restores() {
        let mut s = RecordingSurface::new();
        let style = style();
        let text = "ながいながいながいながい";
        let bar = 100.0;
        draw_fitted_text(&mut s, text, 30.0, 174.0, &style, bar);

        let Some(Op::Text { x, y, sx, .. }) = s.ops.last() else {
            panic!("no text drawn");
        };
        assert_eq!((*x, *y), (30.0, 174.0));
        assert!(*sx < 1.0);

        // Subsequent drawing is untransformed.
        s.fill_text("後", 1.0, 2.0, &style);
        let Some(Op::Text { x, sx, .. }) = s.ops.last() else { unreachable!() };
        assert_eq!(*x, 1.0);
        assert_eq!(*sx, 1.0);
    }

    #[test]
    fn mock_measurement_matches_ratio() {
        // Sanity on the mock itself so the numbers above mean something.
        let s = RecordingSurface::new();
        let style = TextStyle::plain(10.0, palette::BLACK);
        assert_eq!(s.measure_text("abc", &style), 3.0 * 10.0 * GLYPH_WIDTH_RATIO);
    }
}
