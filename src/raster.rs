//! Software raster backend: an RGBA pixel buffer with glyph
//! rendering, implementing [`Surface`].
//!
//! The buffer starts fully transparent; the card background is the
//! first shape drawn, so the rounded card corners stay transparent in
//! the serialized PNG.

use image::{ImageBuffer, ImageEncoder, Rgba, RgbaImage};
use rusttype::{point, Scale};

use crate::error::RenderError;
use crate::fonts::FontSet;
use crate::layout::{Color, Rect};
use crate::surface::{Align, Surface, TextStyle};

/// Hard cap on either output dimension.
const MAX_DIMENSION: u32 = 8192;

#[derive(Clone, Copy, Debug)]
struct Transform2 {
    tx: f64,
    ty: f64,
    sx: f64,
    sy: f64,
}

const IDENTITY: Transform2 = Transform2 { tx: 0.0, ty: 0.0, sx: 1.0, sy: 1.0 };

impl Transform2 {
    fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (self.tx + x * self.sx, self.ty + y * self.sy)
    }

    fn map_rect(&self, r: Rect) -> Rect {
        let (x, y) = self.map(r.x, r.y);
        Rect::new(x, y, r.w * self.sx, r.h * self.sy)
    }
}

pub struct RasterSurface {
    img: RgbaImage,
    fonts: FontSet,
    stack: Vec<Transform2>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, fonts: FontSet) -> Result<Self, RenderError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RenderError::SurfaceUnavailable(format!(
                "unsupported canvas size {width}x{height}"
            )));
        }
        Ok(RasterSurface {
            img: ImageBuffer::from_pixel(width, height, Rgba([0, 0, 0, 0])),
            fonts,
            stack: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    /// Serializes the finished surface as a lossless RGBA PNG.
    pub fn into_png(self) -> Result<Vec<u8>, RenderError> {
        let (w, h) = (self.img.width(), self.img.height());
        let mut buf = Vec::new();
        let enc = image::codecs::png::PngEncoder::new(&mut buf);
        enc.write_image(&self.img, w, h, image::ExtendedColorType::Rgba8)
            .map_err(|e| RenderError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.img.get_pixel(x, y)
    }

    fn current(&self) -> Transform2 {
        self.stack.last().copied().unwrap_or(IDENTITY)
    }

    fn put_opaque(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.img.width() || y >= self.img.height() {
            return;
        }
        self.img.put_pixel(x, y, Rgba([color.r, color.g, color.b, 255]));
    }

    fn blend(&mut self, x: i64, y: i64, color: Color, coverage: f32) {
        if x < 0 || y < 0 || coverage <= 0.0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.img.width() || y >= self.img.height() {
            return;
        }
        let sa = coverage.min(1.0);
        let inv = 1.0 - sa;
        let dst = self.img.get_pixel_mut(x, y);
        dst.0[0] = (color.r as f32 * sa + dst.0[0] as f32 * inv) as u8;
        dst.0[1] = (color.g as f32 * sa + dst.0[1] as f32 * inv) as u8;
        dst.0[2] = (color.b as f32 * sa + dst.0[2] as f32 * inv) as u8;
        dst.0[3] = dst.0[3].max((sa * 255.0) as u8);
    }

    /// Scanline fill of the region where `test` holds for the pixel
    /// center, bounded by `bounds`.
    fn fill_where(&mut self, bounds: Rect, color: Color, test: impl Fn(f64, f64) -> bool) {
        let x0 = bounds.x.floor() as i64;
        let y0 = bounds.y.floor() as i64;
        let x1 = (bounds.x + bounds.w).ceil() as i64;
        let y1 = (bounds.y + bounds.h).ceil() as i64;
        for y in y0..y1 {
            for x in x0..x1 {
                if test(x as f64 + 0.5, y as f64 + 0.5) {
                    self.put_opaque(x, y, color);
                }
            }
        }
    }
}

/// Pixel-center containment for a rounded rect.
fn rr_contains(px: f64, py: f64, r: Rect, radius: f64) -> bool {
    if px < r.x || px >= r.x + r.w || py < r.y || py >= r.y + r.h {
        return false;
    }
    let radius = radius.min(r.w / 2.0).min(r.h / 2.0);
    if radius <= 0.0 {
        return true;
    }
    let dx = if px < r.x + radius {
        r.x + radius - px
    } else if px > r.x + r.w - radius {
        px - (r.x + r.w - radius)
    } else {
        0.0
    };
    let dy = if py < r.y + radius {
        r.y + radius - py
    } else if py > r.y + r.h - radius {
        py - (r.y + r.h - radius)
    } else {
        0.0
    };
    dx * dx + dy * dy <= radius * radius
}

fn expand(r: Rect, by: f64) -> Rect {
    Rect::new(r.x - by, r.y - by, r.w + 2.0 * by, r.h + 2.0 * by)
}

impl Surface for RasterSurface {
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Color) {
        let rect = self.current().map_rect(rect);
        self.fill_where(rect, color, |px, py| rr_contains(px, py, rect, radius));
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f64, color: Color, line_width: f64) {
        let rect = self.current().map_rect(rect);
        let hw = line_width.max(1.0) / 2.0;
        let outer = expand(rect, hw);
        let inner = expand(rect, -hw);
        // Square corners stay square; only a rounded path widens its
        // radius with the stroke.
        let outer_radius = if radius > 0.0 { radius + hw } else { 0.0 };
        let inner_radius = (radius - hw).max(0.0);
        self.fill_where(outer, color, |px, py| {
            rr_contains(px, py, outer, outer_radius)
                && !(inner.w > 0.0 && inner.h > 0.0 && rr_contains(px, py, inner, inner_radius))
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = self.current().map_rect(rect);
        self.fill_where(rect, color, |px, py| rr_contains(px, py, rect, 0.0));
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, width: f64) {
        let t = self.current();
        let (x1, y1) = t.map(x1, y1);
        let (x2, y2) = t.map(x2, y2);
        let w = width.max(1.0);
        let hw = w / 2.0;

        if (y1 - y2).abs() < f64::EPSILON {
            let rect = Rect::new(x1.min(x2), y1 - hw, (x2 - x1).abs(), w);
            self.fill_where(rect, color, |px, py| rr_contains(px, py, rect, 0.0));
        } else if (x1 - x2).abs() < f64::EPSILON {
            let rect = Rect::new(x1 - hw, y1.min(y2), w, (y2 - y1).abs());
            self.fill_where(rect, color, |px, py| rr_contains(px, py, rect, 0.0));
        } else {
            // The card only uses axis-aligned rules; stamp for the
            // general case.
            let len = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
            let steps = (len * 2.0).ceil() as usize;
            for i in 0..=steps {
                let f = i as f64 / steps.max(1) as f64;
                let cx = x1 + (x2 - x1) * f;
                let cy = y1 + (y2 - y1) * f;
                let rect = Rect::new(cx - hw, cy - hw, w, w);
                self.fill_where(rect, color, |px, py| rr_contains(px, py, rect, 0.0));
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        let t = self.current();
        let logical_x = match style.align {
            Align::Start => x,
            Align::Center => x - self.measure_text(text, style) / 2.0,
        };
        let (dev_x, dev_y) = t.map(logical_x, y);

        // Non-uniform transform scale maps straight onto the glyph
        // scale, which is what makes fit-to-width compression cheap.
        let scale = Scale {
            x: (style.size * t.sx) as f32,
            y: (style.size * t.sy) as f32,
        };
        let font = if style.bold { &self.fonts.bold } else { &self.fonts.regular };
        let font = std::sync::Arc::clone(font);

        // Anchor y is the middle of the em box, not the baseline.
        let vm = font.v_metrics(scale);
        let baseline = dev_y as f32 + (vm.ascent + vm.descent) / 2.0;
        let spacing = (style.letter_spacing * t.sx) as f32;

        let mut caret = dev_x as f32;
        for ch in text.chars() {
            let glyph = font.glyph(ch).scaled(scale).positioned(point(caret, baseline));
            let advance = glyph.unpositioned().h_metrics().advance_width;
            if let Some(bb) = glyph.pixel_bounding_box() {
                let color = style.color;
                let mut spans: Vec<(i64, i64, f32)> = Vec::new();
                glyph.draw(|gx, gy, v| {
                    spans.push((gx as i64 + bb.min.x as i64, gy as i64 + bb.min.y as i64, v));
                });
                for (px, py, v) in spans {
                    self.blend(px, py, color, v);
                }
            }
            caret += advance + spacing;
        }
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let scale = Scale::uniform(style.size as f32);
        let font = if style.bold { &self.fonts.bold } else { &self.fonts.regular };
        let advances: f32 = text
            .chars()
            .map(|ch| font.glyph(ch).scaled(scale).h_metrics().advance_width)
            .sum();
        let glyphs = text.chars().count();
        advances as f64 + style.letter_spacing * (glyphs.saturating_sub(1)) as f64
    }

    fn draw_image(&mut self, img: &RgbaImage, x: f64, y: f64, clip: Option<Rect>) {
        let (x, y) = self.current().map(x, y);
        let (x0, y0) = (x.round() as i64, y.round() as i64);
        for oy in 0..img.height() {
            for ox in 0..img.width() {
                let dx = x0 + ox as i64;
                let dy = y0 + oy as i64;
                if let Some(c) = clip {
                    let (px, py) = (dx as f64 + 0.5, dy as f64 + 0.5);
                    if px < c.x || px >= c.x + c.w || py < c.y || py >= c.y + c.h {
                        continue;
                    }
                }
                let p = img.get_pixel(ox, oy);
                let coverage = p.0[3] as f32 / 255.0;
                self.blend(dx, dy, Color { r: p.0[0], g: p.0[1], b: p.0[2] }, coverage);
            }
        }
    }

    fn push_transform(&mut self, tx: f64, ty: f64, sx: f64, sy: f64) {
        let p = self.current();
        self.stack.push(Transform2 {
            tx: p.tx + tx * p.sx,
            ty: p.ty + ty * p.sy,
            sx: p.sx * sx,
            sy: p.sy * sy,
        });
    }

    fn pop_transform(&mut self) {
        self.stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::palette;

    fn surface(w: u32, h: u32) -> Option<RasterSurface> {
        let fonts = FontSet::discover()?;
        Some(RasterSurface::new(w, h, fonts).expect("surface"))
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        let Some(fonts) = FontSet::discover() else { return };
        assert!(matches!(
            RasterSurface::new(0, 100, fonts.clone()),
            Err(RenderError::SurfaceUnavailable(_))
        ));
        assert!(matches!(
            RasterSurface::new(100, MAX_DIMENSION + 1, fonts),
            Err(RenderError::SurfaceUnavailable(_))
        ));
    }

    #[test]
    fn rounded_fill_leaves_corners_transparent() {
        let Some(mut s) = surface(100, 100) else { return };
        s.fill_rounded_rect(Rect::new(0.0, 0.0, 100.0, 100.0), 30.0, palette::CARD_BG);
        assert_eq!(s.pixel(0, 0).0[3], 0);
        assert_eq!(s.pixel(50, 50).0[3], 255);
        assert_eq!(s.pixel(50, 50).0[0], 0xed);
    }

    #[test]
    fn stroke_paints_edge_not_interior() {
        let Some(mut s) = surface(100, 100) else { return };
        s.stroke_rounded_rect(Rect::new(10.0, 10.0, 80.0, 80.0), 0.0, palette::BLACK, 2.0);
        assert_eq!(s.pixel(10, 50).0[3], 255);
        assert_eq!(s.pixel(50, 50).0[3], 0);
    }

    #[test]
    fn lines_have_minimum_one_pixel_width() {
        let Some(mut s) = surface(50, 50) else { return };
        s.line(10.0, 20.0, 40.0, 20.0, palette::BLACK, 0.5);
        assert_eq!(s.pixel(25, 20).0[3], 255);
    }

    #[test]
    fn measure_is_zero_for_empty_and_grows_with_text() {
        let Some(s) = surface(10, 10) else { return };
        let style = TextStyle::plain(18.0, palette::BLACK);
        assert_eq!(s.measure_text("", &style), 0.0);
        let one = s.measure_text("あ", &style);
        let two = s.measure_text("ああ", &style);
        assert!(one > 0.0);
        assert!(two > one);
    }

    #[test]
    fn png_serialization_round_trips() {
        let Some(mut s) = surface(40, 30) else { return };
        s.fill_rect(Rect::new(0.0, 0.0, 40.0, 30.0), palette::BAR_GREEN);
        let png = s.into_png().expect("png");
        let decoded = image::load_from_memory(&png).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }
}
