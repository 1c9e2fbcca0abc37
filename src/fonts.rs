//! Font loading for the raster backend.
//!
//! Parsed fonts are cached per path behind a mutex so concurrent
//! renders share one copy. CJK system fonts commonly ship as `.ttc`
//! collections, so faces are read at collection index 0.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rusttype::Font;

use crate::error::RenderError;

static FONT_CACHE: Lazy<Mutex<HashMap<PathBuf, Arc<Font<'static>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Overrides font discovery with an explicit file path.
pub const FONT_ENV: &str = "PETCARD_FONT";

/// Known locations of CJK-capable system fonts, tried in order.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-VF.ttc",
    "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "C:\\Windows\\Fonts\\meiryo.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
];

/// Regular and bold faces the card is drawn with. Cheap to clone.
#[derive(Clone, Debug)]
pub struct FontSet {
    pub regular: Arc<Font<'static>>,
    pub bold: Arc<Font<'static>>,
}

impl FontSet {
    /// Builds a set from raw font bytes. Without dedicated bold bytes
    /// the regular face doubles as the bold one.
    pub fn from_bytes(regular: Vec<u8>, bold: Option<Vec<u8>>) -> Result<Self, RenderError> {
        let regular = Arc::new(parse_font(regular)?);
        let bold = match bold {
            Some(bytes) => Arc::new(parse_font(bytes)?),
            None => Arc::clone(&regular),
        };
        Ok(FontSet { regular, bold })
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, RenderError> {
        let regular = load_font_cached(path.into())?;
        let bold = Arc::clone(&regular);
        Ok(FontSet { regular, bold })
    }

    /// Finds a usable system font: the `PETCARD_FONT` override first,
    /// then the candidate list. `None` means no candidate parsed.
    pub fn discover() -> Option<Self> {
        let mut paths: Vec<PathBuf> = Vec::new();
        if let Ok(p) = std::env::var(FONT_ENV) {
            paths.push(PathBuf::from(p));
        }
        paths.extend(FONT_CANDIDATES.iter().map(PathBuf::from));

        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(set) => {
                    tracing::debug!(path = %path.display(), "using font");
                    return Some(set);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping font");
                }
            }
        }
        None
    }
}

fn parse_font(bytes: Vec<u8>) -> Result<Font<'static>, RenderError> {
    Font::try_from_vec_and_index(bytes, 0)
        .ok_or_else(|| RenderError::SurfaceUnavailable("failed to parse font".into()))
}

fn load_font_cached(path: PathBuf) -> Result<Arc<Font<'static>>, RenderError> {
    if let Some(f) = FONT_CACHE.lock().get(&path) {
        return Ok(Arc::clone(f));
    }

    let bytes = std::fs::read(&path).map_err(|e| {
        RenderError::SurfaceUnavailable(format!("failed to read font {}: {e}", path.display()))
    })?;
    let font = Arc::new(parse_font(bytes)?);

    FONT_CACHE.lock().insert(path, Arc::clone(&font));
    Ok(font)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_not_a_font() {
        assert!(matches!(
            FontSet::from_bytes(vec![0u8; 64], None),
            Err(RenderError::SurfaceUnavailable(_))
        ));
    }

    #[test]
    fn missing_file_reports_read_failure() {
        let err = FontSet::from_file("/nonexistent/font.ttf").unwrap_err();
        assert!(matches!(err, RenderError::SurfaceUnavailable(_)));
    }
}
