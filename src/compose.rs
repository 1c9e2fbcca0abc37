//! Bitmap compositing: the uploaded pet photo and the brand logo.
//!
//! The photo cover-fits its slot (fills it completely, cropping the
//! overflow symmetrically) and the logo is rasterized from a compiled
//! in vector asset. Logo failure never fails a render; the card falls
//! back to the wordmark as plain text.

use image::{imageops, RgbaImage};
use resvg::{tiny_skia, usvg};

use crate::card::PhotoSource;
use crate::error::RenderError;
use crate::layout::{anchors, palette, CardLayout, Rect};
use crate::surface::{Surface, TextStyle};
use crate::util;

/// Brand logo, compiled in so renders need no asset directory.
const LOGO_SVG: &[u8] = include_bytes!("../assets/logo.svg");

/// Wordmark drawn when the logo cannot be rasterized.
pub const LOGO_FALLBACK_TEXT: &str = "PETEMO";

pub enum LogoResult {
    Loaded(RgbaImage),
    Failed,
}

/// Decodes the uploaded pet photo into RGBA pixels.
pub async fn load_photo(source: &PhotoSource) -> Result<RgbaImage, RenderError> {
    let decoded;
    let bytes: &[u8] = match source {
        PhotoSource::Bytes(b) => b,
        PhotoSource::DataUri(s) => {
            decoded = util::b64_decode(s)
                .ok_or_else(|| RenderError::AssetRead("photo is not valid base64".into()))?;
            &decoded
        }
    };
    if bytes.is_empty() {
        return Err(RenderError::AssetRead("photo payload is empty".into()));
    }

    let img = image::load_from_memory(bytes)
        .map_err(|e| RenderError::PhotoDecode(format!("failed to decode photo: {e}")))?;
    Ok(img.to_rgba8())
}

/// Cover-fit of a `src_w` x `src_h` image into `target`: scaled size
/// and top-left placement. The image fills the whole target and the
/// overflow on the long axis is split evenly.
pub fn cover_fit(src_w: u32, src_h: u32, target: Rect) -> (u32, u32, f64, f64) {
    let scale = (target.w / src_w as f64).max(target.h / src_h as f64);
    let w = ((src_w as f64 * scale).round() as u32).max(1);
    let h = ((src_h as f64 * scale).round() as u32).max(1);
    let x = target.x + (target.w - w as f64) / 2.0;
    let y = target.y + (target.h - h as f64) / 2.0;
    (w, h, x, y)
}

/// Draws the photo slot: grey backing, then the cover-fitted photo
/// clipped to the slot.
pub fn draw_photo<S: Surface>(surface: &mut S, layout: &CardLayout, photo: &RgbaImage) {
    let slot = layout.photo_rect();
    surface.fill_rect(slot, palette::PHOTO_BG);

    if photo.width() == 0 || photo.height() == 0 {
        return;
    }
    let (w, h, x, y) = cover_fit(photo.width(), photo.height(), slot);
    let resized = imageops::resize(photo, w, h, imageops::FilterType::Lanczos3);
    surface.draw_image(&resized, x, y, Some(slot));
}

/// Rasterizes the logo at the size of its slot. Failure is reported
/// as `Failed`, not an error, so the card still renders.
pub async fn load_logo(layout: &CardLayout) -> LogoResult {
    let slot = layout.logo_rect();
    match rasterize_svg(LOGO_SVG, slot.w as u32, slot.h as u32) {
        Ok(img) => LogoResult::Loaded(img),
        Err(e) => {
            tracing::warn!(error = %e, "logo rasterization failed, falling back to wordmark");
            LogoResult::Failed
        }
    }
}

pub fn draw_logo<S: Surface>(surface: &mut S, layout: &CardLayout, logo: &LogoResult) {
    match logo {
        LogoResult::Loaded(img) => {
            let slot = layout.logo_rect();
            surface.draw_image(img, slot.x, slot.y, None);
        }
        LogoResult::Failed => {
            let a = layout.place(anchors::LOGO_FALLBACK);
            let style = TextStyle::bold(a.size, palette::LOGO_GREEN).centered();
            surface.fill_text(LOGO_FALLBACK_TEXT, a.x, a.y, &style);
        }
    }
}

/// Renders SVG data contain-fitted and centered into a `width` x
/// `height` pixel buffer.
fn rasterize_svg(data: &[u8], width: u32, height: u32) -> Result<RgbaImage, RenderError> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())
        .map_err(|e| RenderError::AssetRead(format!("bad logo svg: {e}")))?;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| RenderError::AssetRead("logo slot has zero size".into()))?;

    let size = tree.size();
    let scale = (width as f32 / size.width()).min(height as f32 / size.height());
    let dx = (width as f32 - size.width() * scale) / 2.0;
    let dy = (height as f32 - size.height() * scale) / 2.0;
    let transform = tiny_skia::Transform::from_scale(scale, scale).post_translate(dx, dy);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // The pixmap stores premultiplied alpha; the compositor expects
    // straight alpha, so antialiased edges must be demultiplied or
    // they darken when blended.
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| RenderError::AssetRead("logo pixel buffer size mismatch".into()))
}
