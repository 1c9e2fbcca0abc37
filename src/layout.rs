//! Static layout table for the license card.
//!
//! Every shape and text anchor on the card is defined here in logical
//! units on a 593x350 design canvas and scaled by one global factor
//! before drawing. Nothing in this module is mutated at runtime; the
//! drawing code iterates the table instead of carrying inline
//! coordinates.

/// Logical design canvas, matching the Figma source of the card.
pub const DESIGN_WIDTH: f64 = 593.0;
pub const DESIGN_HEIGHT: f64 = 350.0;

/// Default design-to-output ratio (593x350 -> 890x525).
pub const DEFAULT_SCALE: f64 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(col: u32) -> Self {
        Color {
            r: (col >> 16) as u8,
            g: (col >> 8) as u8,
            b: col as u8,
        }
    }
}

pub mod palette {
    use super::Color;

    pub const CARD_BG: Color = Color::rgb(0xedecde);
    pub const CARD_EDGE: Color = Color::rgb(0xc9c9c9);
    pub const WHITE: Color = Color::rgb(0xffffff);
    pub const BLACK: Color = Color::rgb(0x000000);
    pub const BAR_GREEN: Color = Color::rgb(0x699428);
    pub const NOTE_HEADER: Color = Color::rgb(0xffb9b9);
    pub const PHOTO_BG: Color = Color::rgb(0xd9d9d9);
    pub const LOGO_GREEN: Color = Color::rgb(0x6f8d1b);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }
}

/// A rounded rectangle drawn once per render.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    pub rect: Rect,
    pub radius: f64,
    pub fill: Option<Color>,
    pub stroke: Option<(Color, f64)>,
}

/// A straight rule (always axis-aligned on this card).
#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub width: f64,
}

/// Placement of one line of text: position, font size, weight,
/// horizontal alignment and extra per-glyph spacing, in logical units.
/// The baseline is always the vertical middle of the line.
#[derive(Clone, Copy, Debug)]
pub struct TextAnchor {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub bold: bool,
    pub center: bool,
    pub letter_spacing: f64,
}

impl TextAnchor {
    pub const fn plain(x: f64, y: f64, size: f64) -> Self {
        TextAnchor { x, y, size, bold: false, center: false, letter_spacing: 0.0 }
    }

    pub const fn bold(x: f64, y: f64, size: f64) -> Self {
        TextAnchor { x, y, size, bold: true, center: false, letter_spacing: 0.0 }
    }

    pub const fn centered(self) -> Self {
        TextAnchor { center: true, ..self }
    }

    pub const fn spaced(self, letter_spacing: f64) -> Self {
        TextAnchor { letter_spacing, ..self }
    }
}

/// Text anchors of the card, in drawing order.
pub mod anchors {
    use super::TextAnchor;

    pub const NAME_LABEL: TextAnchor = TextAnchor::plain(32.0, 26.0, 18.0).spaced(7.38);
    pub const NAME_VALUE: TextAnchor = TextAnchor::plain(108.0, 26.0, 18.0);
    pub const BIRTH_DATE: TextAnchor = TextAnchor::plain(390.0, 26.0, 13.0);
    pub const BIRTH_SUFFIX: TextAnchor = TextAnchor::plain(555.0, 26.0, 13.0);

    pub const ISSUE_PLACE_LABEL: TextAnchor = TextAnchor::plain(30.0, 60.0, 12.0);
    pub const ISSUE_PLACE_VALUE: TextAnchor = TextAnchor::plain(98.0, 60.0, 12.0);
    pub const ISSUE_LABEL: TextAnchor = TextAnchor::plain(45.0, 86.0, 12.0);
    pub const ISSUE_VALUE: TextAnchor = TextAnchor::plain(98.0, 86.0, 12.0);

    /// Origin of the expiry line inside the green bar; the line itself
    /// is horizontally compressed to `EXPIRY_MAX_WIDTH`.
    pub const EXPIRY: TextAnchor = TextAnchor::bold(20.0, 116.0, 18.0);

    pub const GENDER_LABEL: TextAnchor = TextAnchor::plain(27.0, 147.0, 12.0);
    pub const GENDER_VALUE: TextAnchor = TextAnchor::plain(87.0, 147.0, 12.0);
    pub const BREED_LABEL: TextAnchor = TextAnchor::plain(27.0, 167.0, 12.0);
    pub const BREED_VALUE: TextAnchor = TextAnchor::plain(87.0, 167.0, 12.0);
    pub const COLOR_LABEL: TextAnchor = TextAnchor::plain(27.0, 187.0, 12.0);
    pub const COLOR_VALUE: TextAnchor = TextAnchor::plain(87.0, 187.0, 12.0);
    pub const OWNER_LABEL: TextAnchor = TextAnchor::plain(28.0, 209.0, 12.0);
    pub const OWNER_VALUE: TextAnchor = TextAnchor::plain(89.0, 209.0, 12.0);

    pub const CONDITION_TOP: TextAnchor = TextAnchor::plain(52.0, 244.0, 12.0).centered();
    pub const CONDITION_BOTTOM: TextAnchor = TextAnchor::plain(52.0, 264.0, 12.0).centered();

    pub const FAVORITE_WORD: TextAnchor = TextAnchor::bold(213.0, 255.0, 17.0).centered();

    pub const CHIP_CAPTION: TextAnchor = TextAnchor::plain(23.0, 290.0, 10.0);
    pub const CHIP_PREFIX: TextAnchor = TextAnchor::plain(25.0, 316.0, 14.0);
    pub const CHIP_VALUE: TextAnchor = TextAnchor::bold(50.0, 316.0, 16.0);
    pub const CHIP_SUFFIX: TextAnchor = TextAnchor::plain(320.0, 316.0, 14.0);

    pub const LOGO_FALLBACK: TextAnchor = TextAnchor::bold(483.0, 318.0, 14.0).centered();
}

/// Horizontal budget for the expiry line: bar width minus padding.
pub const EXPIRY_MAX_WIDTH: f64 = 343.0 - 10.0;

/// Vertical card title down the green column ("ペット免許証").
pub struct TitleColumn {
    pub x: f64,
    pub start_y: f64,
    pub step: f64,
    /// Font size for the first three glyphs, then the remaining ones.
    pub head_size: f64,
    pub tail_size: f64,
}

pub const TITLE_COLUMN: TitleColumn = TitleColumn {
    x: 375.0,
    start_y: 120.0,
    step: 27.0,
    head_size: 26.0,
    tail_size: 23.0,
};

/// Special-note grid: 6 adjacent fixed cells, cell 0 is the header.
pub struct NoteGrid {
    pub x: f64,
    pub y: f64,
    pub cell_w: f64,
    pub cell_h: f64,
    pub cells: usize,
}

pub const NOTE_GRID: NoteGrid = NoteGrid {
    x: 221.0,
    y: 140.0,
    cell_w: 23.4,
    cell_h: 78.0,
    cells: 6,
};

const FRAMES: &[Frame] = &[
    // Card background and edge.
    Frame {
        rect: Rect::new(0.0, 0.0, DESIGN_WIDTH, DESIGN_HEIGHT),
        radius: 20.0,
        fill: Some(palette::CARD_BG),
        stroke: Some((palette::CARD_EDGE, 0.5)),
    },
    // Inner white frame.
    Frame {
        rect: Rect::new(14.0, 47.0, 565.0, 291.0),
        radius: 14.0,
        fill: Some(palette::WHITE),
        stroke: Some((palette::BLACK, 1.0)),
    },
    // Name bar: radius is half the height, i.e. a pill.
    Frame {
        rect: Rect::new(14.0, 12.0, 565.0, 28.0),
        radius: 14.0,
        fill: Some(palette::WHITE),
        stroke: Some((palette::BLACK, 1.0)),
    },
    // License-conditions box.
    Frame {
        rect: Rect::new(23.0, 227.0, 57.0, 50.0),
        radius: 10.0,
        fill: None,
        stroke: Some((palette::BLACK, 0.5)),
    },
    // Microchip number bar.
    Frame {
        rect: Rect::new(18.0, 298.0, 338.0, 35.0),
        radius: 10.0,
        fill: None,
        stroke: Some((palette::BLACK, 1.0)),
    },
];

const RULES: &[Rule] = &[
    // Name bar dividers.
    Rule { x1: 93.0, y1: 12.0, x2: 93.0, y2: 40.0, width: 1.0 },
    Rule { x1: 379.0, y1: 12.0, x2: 379.0, y2: 40.0, width: 1.0 },
    // Issue-section separators.
    Rule { x1: 14.0, y1: 73.0, x2: 579.0, y2: 73.0, width: 1.0 },
    Rule { x1: 93.0, y1: 47.0, x2: 93.0, y2: 100.0, width: 1.0 },
    // Pet-info rules.
    Rule { x1: 27.0, y1: 157.0, x2: 213.0, y2: 157.0, width: 1.0 },
    Rule { x1: 27.0, y1: 177.0, x2: 213.0, y2: 177.0, width: 1.0 },
    Rule { x1: 27.0, y1: 197.0, x2: 213.0, y2: 197.0, width: 1.0 },
    Rule { x1: 27.0, y1: 220.0, x2: 213.0, y2: 220.0, width: 1.0 },
    // Favorite-word underline.
    Rule { x1: 98.0, y1: 273.0, x2: 328.0, y2: 273.0, width: 1.0 },
];

/// Green expiry bar behind the fitted expiry line.
pub const EXPIRY_BAR: Rect = Rect::new(15.0, 100.0, 343.0, 31.0);

/// Target rectangle the pet photo cover-fits into.
pub const PHOTO_RECT: Rect = Rect::new(393.0, 81.0, 176.0, 217.0);

/// Placement of the vector logo over the number-bar area.
pub const LOGO_RECT: Rect = Rect::new(413.0, 302.0, 140.0, 31.0);

/// The layout table bound to one output scale factor.
#[derive(Clone, Copy, Debug)]
pub struct CardLayout {
    scale: f64,
}

impl Default for CardLayout {
    fn default() -> Self {
        CardLayout { scale: DEFAULT_SCALE }
    }
}

impl CardLayout {
    pub fn with_scale(scale: f64) -> Self {
        CardLayout { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Logical units to output pixels.
    pub fn s(&self, n: f64) -> f64 {
        (n * self.scale).round()
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.s(DESIGN_WIDTH) as u32, self.s(DESIGN_HEIGHT) as u32)
    }

    pub fn rect(&self, r: Rect) -> Rect {
        Rect::new(self.s(r.x), self.s(r.y), self.s(r.w), self.s(r.h))
    }

    pub fn place(&self, a: TextAnchor) -> TextAnchor {
        TextAnchor {
            x: self.s(a.x),
            y: self.s(a.y),
            size: self.s(a.size),
            letter_spacing: self.s(a.letter_spacing),
            ..a
        }
    }

    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        FRAMES.iter().map(|f| Frame {
            rect: self.rect(f.rect),
            radius: self.s(f.radius),
            fill: f.fill,
            stroke: f.stroke.map(|(c, w)| (c, self.s(w).max(1.0))),
        })
    }

    pub fn rules(&self) -> impl Iterator<Item = Rule> + '_ {
        RULES.iter().map(|r| Rule {
            x1: self.s(r.x1),
            y1: self.s(r.y1),
            x2: self.s(r.x2),
            y2: self.s(r.y2),
            width: self.s(r.width).max(1.0),
        })
    }

    pub fn expiry_bar(&self) -> Rect {
        self.rect(EXPIRY_BAR)
    }

    pub fn expiry_max_width(&self) -> f64 {
        self.s(EXPIRY_MAX_WIDTH)
    }

    pub fn photo_rect(&self) -> Rect {
        self.rect(PHOTO_RECT)
    }

    pub fn logo_rect(&self) -> Rect {
        self.rect(LOGO_RECT)
    }

    /// Geometry of special-note cell `i`, 0-based left to right.
    pub fn note_cell(&self, i: usize) -> Rect {
        debug_assert!(i < NOTE_GRID.cells);
        Rect::new(
            self.s(NOTE_GRID.x) + self.s(NOTE_GRID.cell_w) * i as f64,
            self.s(NOTE_GRID.y),
            self.s(NOTE_GRID.cell_w),
            self.s(NOTE_GRID.cell_h),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scale_matches_output_resolution() {
        let layout = CardLayout::default();
        assert_eq!(layout.canvas_size(), (890, 525));
    }

    #[test]
    fn scaling_rounds_to_whole_pixels() {
        let layout = CardLayout::default();
        assert_eq!(layout.s(23.4), 35.0); // 35.1 rounds down
        assert_eq!(layout.s(0.5), 1.0);
        assert_eq!(layout.s(593.0), 890.0);
    }

    #[test]
    fn unit_scale_is_identity_geometry() {
        let layout = CardLayout::with_scale(1.0);
        assert_eq!(layout.canvas_size(), (593, 350));
        let photo = layout.photo_rect();
        assert_eq!((photo.x, photo.y, photo.w, photo.h), (393.0, 81.0, 176.0, 217.0));
    }

    #[test]
    fn note_cells_are_adjacent() {
        let layout = CardLayout::default();
        for i in 1..NOTE_GRID.cells {
            let prev = layout.note_cell(i - 1);
            let cell = layout.note_cell(i);
            assert_eq!(cell.x, prev.x + prev.w);
            assert_eq!(cell.y, prev.y);
        }
    }

    #[test]
    fn name_bar_is_a_pill() {
        // Radius equals half the bar height.
        let bar = FRAMES[2];
        assert_eq!(bar.radius * 2.0, bar.rect.h);
    }

    #[test]
    fn frame_strokes_never_vanish() {
        // The 0.5-unit hairlines must still paint at least one pixel.
        let layout = CardLayout::with_scale(1.0);
        for frame in layout.frames() {
            if let Some((_, w)) = frame.stroke {
                assert!(w >= 1.0);
            }
        }
    }
}
