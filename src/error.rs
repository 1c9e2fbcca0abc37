use thiserror::Error;

/// Terminal failures of a render call.
///
/// A logo decode failure is deliberately absent: it is recovered
/// internally by drawing the text fallback and never reaches the
/// caller.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("asset read: {0}")]
    AssetRead(String),
    #[error("photo decode: {0}")]
    PhotoDecode(String),
    #[error("serialization: {0}")]
    Serialization(String),
}
