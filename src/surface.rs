//! Drawing seam every card component renders through.
//!
//! The engine itself is backend-agnostic: layout, text fitting and
//! compositing only speak this trait, and `RasterSurface` is the one
//! backend-specific piece. Coordinates passed to the surface are
//! already in output pixels (the layout table applies the scale
//! factor).

use image::RgbaImage;

use crate::layout::{Color, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
}

/// Style for one line of text. The baseline is always the vertical
/// middle of the em box, matching how every anchor on the card is
/// specified.
#[derive(Clone, Copy, Debug)]
pub struct TextStyle {
    pub size: f64,
    pub bold: bool,
    pub color: Color,
    pub align: Align,
    pub letter_spacing: f64,
}

impl TextStyle {
    pub fn plain(size: f64, color: Color) -> Self {
        TextStyle { size, bold: false, color, align: Align::Start, letter_spacing: 0.0 }
    }

    pub fn bold(size: f64, color: Color) -> Self {
        TextStyle { bold: true, ..Self::plain(size, color) }
    }

    pub fn centered(self) -> Self {
        TextStyle { align: Align::Center, ..self }
    }

    pub fn spaced(self, letter_spacing: f64) -> Self {
        TextStyle { letter_spacing, ..self }
    }
}

pub trait Surface {
    /// Radius 0 gives square corners; radius equal to half the short
    /// side gives a pill.
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Color);
    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f64, color: Color, line_width: f64);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, width: f64);

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle);
    /// Width of `text` at `style` without the current transform applied.
    fn measure_text(&self, text: &str, style: &TextStyle) -> f64;

    /// Blits an already-sized image. The origin goes through the
    /// current transform; the pixels themselves are not rescaled. An
    /// optional clip rect discards overflow.
    fn draw_image(&mut self, img: &RgbaImage, x: f64, y: f64, clip: Option<Rect>);

    fn push_transform(&mut self, tx: f64, ty: f64, sx: f64, sy: f64);
    fn pop_transform(&mut self);

    /// Runs `f` under a translate+scale transform and restores the
    /// previous coordinate system afterwards, error or not.
    fn with_transform<R>(
        &mut self,
        tx: f64,
        ty: f64,
        sx: f64,
        sy: f64,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R
    where
        Self: Sized,
    {
        self.push_transform(tx, ty, sx, sy);
        let result = f(self);
        self.pop_transform();
        result
    }
}
