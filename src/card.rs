//! Card assembly: the request model and the full render pipeline.
//!
//! `generate_license` is the entry point: it validates the request,
//! draws the static chrome and every text field through the layout
//! table, composites the photo and logo, and encodes the canvas as
//! PNG. Rendering is deterministic; the same request yields the same
//! bytes.

use serde::Deserialize;

use crate::compose;
use crate::era;
use crate::error::RenderError;
use crate::fit;
use crate::fonts::FontSet;
use crate::layout::{anchors, palette, CardLayout, Color, TextAnchor, TITLE_COLUMN};
use crate::raster::RasterSurface;
use crate::surface::{Surface, TextStyle};
use crate::vertical;

/// Uploaded photo payload: raw image bytes or a base64 string
/// (optionally a `data:` URI).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PhotoSource {
    DataUri(String),
    Bytes(Vec<u8>),
}

/// One license card. Empty strings count as absent and fall back to
/// the same defaults as missing optional fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub photo: PhotoSource,
    pub owner_name: String,
    pub pet_name: String,
    pub animal_type: String,
    pub breed: String,
    /// ISO `YYYY-MM-DD`; must fall in the current era.
    pub birth_date: String,
    pub color: String,
    pub issue_location: String,
    /// ISO `YYYY-MM-DD`; validity runs three years from here.
    pub issue_date: String,
    #[serde(default)]
    pub favorite_word: Option<String>,
    #[serde(default)]
    pub microchip_no: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub special_notes: Vec<String>,
}

const DEFAULT_GENDER: &str = "オス";
const DEFAULT_BREED: &str = "ミックス";
const DEFAULT_COLOR: &str = "ブラック";
const DEFAULT_OWNER: &str = "イオンペット";
const DEFAULT_FAVORITE_WORD: &str = "お好きな一言";
const DEFAULT_MICROCHIP: &str = "012345678900";

/// Vertical card title down the green column.
const TITLE_TEXT: &str = "ペット免許証";

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

fn opt_or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    or_default(value.as_deref().unwrap_or(""), default)
}

/// Renders the card at the default output scale and encodes it as PNG.
pub async fn generate_license(fonts: &FontSet, req: &RenderRequest) -> Result<Vec<u8>, RenderError> {
    generate_license_scaled(fonts, req, &CardLayout::default()).await
}

pub async fn generate_license_scaled(
    fonts: &FontSet,
    req: &RenderRequest,
    layout: &CardLayout,
) -> Result<Vec<u8>, RenderError> {
    // Dates are validated before any pixel is touched.
    let birth = era::format_era(era::parse_ymd(&req.birth_date)?)?;
    let issue_date = era::parse_ymd(&req.issue_date)?;
    let issue = era::format_era(issue_date)?;
    let expiry = era::format_expiry(issue_date)?;

    let (width, height) = layout.canvas_size();
    let mut surface = RasterSurface::new(width, height, fonts.clone())?;

    draw_static(&mut surface, layout);
    draw_fields(&mut surface, layout, req, &birth, &issue, &expiry);

    let photo = compose::load_photo(&req.photo).await?;
    compose::draw_photo(&mut surface, layout, &photo);

    let logo = compose::load_logo(layout).await;
    compose::draw_logo(&mut surface, layout, &logo);

    tracing::debug!(width, height, "license card rendered");
    surface.into_png()
}

/// Draws the card chrome that carries no request data: frames, rules
/// and the green expiry bar.
fn draw_static<S: Surface>(surface: &mut S, layout: &CardLayout) {
    for frame in layout.frames() {
        if let Some(fill) = frame.fill {
            surface.fill_rounded_rect(frame.rect, frame.radius, fill);
        }
        if let Some((color, width)) = frame.stroke {
            surface.stroke_rounded_rect(frame.rect, frame.radius, color, width);
        }
    }
    for rule in layout.rules() {
        surface.line(rule.x1, rule.y1, rule.x2, rule.y2, palette::BLACK, rule.width);
    }
    surface.fill_rect(layout.expiry_bar(), palette::BAR_GREEN);
}

fn draw_at<S: Surface>(
    surface: &mut S,
    layout: &CardLayout,
    anchor: TextAnchor,
    color: Color,
    text: &str,
) {
    let a = layout.place(anchor);
    let mut style = if a.bold {
        TextStyle::bold(a.size, color)
    } else {
        TextStyle::plain(a.size, color)
    };
    if a.center {
        style = style.centered();
    }
    surface.fill_text(text, a.x, a.y, &style.spaced(a.letter_spacing));
}

fn draw_fields<S: Surface>(
    surface: &mut S,
    layout: &CardLayout,
    req: &RenderRequest,
    birth: &str,
    issue: &str,
    expiry: &str,
) {
    let black = palette::BLACK;

    // Name bar.
    draw_at(surface, layout, anchors::NAME_LABEL, black, "氏名");
    draw_at(surface, layout, anchors::NAME_VALUE, black, &req.pet_name);
    draw_at(surface, layout, anchors::BIRTH_DATE, black, birth);
    draw_at(surface, layout, anchors::BIRTH_SUFFIX, black, "生");

    // Issue section.
    draw_at(surface, layout, anchors::ISSUE_PLACE_LABEL, black, "交付場所");
    draw_at(surface, layout, anchors::ISSUE_PLACE_VALUE, black, &req.issue_location);
    draw_at(surface, layout, anchors::ISSUE_LABEL, black, "交付");
    draw_at(surface, layout, anchors::ISSUE_VALUE, black, issue);

    // Expiry line, compressed into the green bar.
    let e = layout.place(anchors::EXPIRY);
    let style = TextStyle::bold(e.size, black);
    fit::draw_fitted_text(surface, expiry, e.x, e.y, &style, layout.expiry_max_width());

    // Pet info, with positional defaults for blank values.
    draw_at(surface, layout, anchors::GENDER_LABEL, black, "性別　：");
    draw_at(surface, layout, anchors::GENDER_VALUE, black, opt_or_default(&req.gender, DEFAULT_GENDER));
    draw_at(surface, layout, anchors::BREED_LABEL, black, "種類　：");
    draw_at(surface, layout, anchors::BREED_VALUE, black, or_default(&req.breed, DEFAULT_BREED));
    draw_at(surface, layout, anchors::COLOR_LABEL, black, "毛色　：");
    draw_at(surface, layout, anchors::COLOR_VALUE, black, or_default(&req.color, DEFAULT_COLOR));
    draw_at(surface, layout, anchors::OWNER_LABEL, black, "保護者：");
    draw_at(surface, layout, anchors::OWNER_VALUE, black, or_default(&req.owner_name, DEFAULT_OWNER));

    // License-conditions box.
    draw_at(surface, layout, anchors::CONDITION_TOP, black, "免許の");
    draw_at(surface, layout, anchors::CONDITION_BOTTOM, black, "条件等");

    draw_at(
        surface,
        layout,
        anchors::FAVORITE_WORD,
        black,
        opt_or_default(&req.favorite_word, DEFAULT_FAVORITE_WORD),
    );

    // Microchip number bar.
    draw_at(surface, layout, anchors::CHIP_CAPTION, black, "マイクロチップNo.");
    draw_at(surface, layout, anchors::CHIP_PREFIX, black, "第");
    draw_at(
        surface,
        layout,
        anchors::CHIP_VALUE,
        black,
        opt_or_default(&req.microchip_no, DEFAULT_MICROCHIP),
    );
    draw_at(surface, layout, anchors::CHIP_SUFFIX, black, "号");

    draw_title(surface, layout);
    vertical::draw_notes(surface, layout, &req.special_notes);
}

/// The vertical green title; the first three glyphs run larger than
/// the last three.
fn draw_title<S: Surface>(surface: &mut S, layout: &CardLayout) {
    let x = layout.s(TITLE_COLUMN.x);
    let mut buf = [0u8; 4];
    for (i, ch) in TITLE_TEXT.chars().enumerate() {
        let size = if i < 3 { TITLE_COLUMN.head_size } else { TITLE_COLUMN.tail_size };
        let style = TextStyle::plain(layout.s(size), palette::BAR_GREEN).centered();
        let y = layout.s(TITLE_COLUMN.start_y) + layout.s(TITLE_COLUMN.step) * i as f64;
        surface.fill_text(ch.encode_utf8(&mut buf), x, y, &style);
    }
}
