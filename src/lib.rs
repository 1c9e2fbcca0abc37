//! Deterministic pet-license card renderer.
//!
//! Takes a [`RenderRequest`] (pet photo plus the card fields), lays
//! the card out on a fixed 593x350 design grid scaled to 890x525, and
//! returns encoded PNG bytes. Identical requests produce identical
//! bytes.
//!
//! ```no_run
//! use petcard::{generate_license, FontSet, PhotoSource, RenderRequest};
//!
//! # async fn demo(photo_png: Vec<u8>) -> Result<(), petcard::RenderError> {
//! let fonts = FontSet::discover()
//!     .ok_or_else(|| petcard::RenderError::SurfaceUnavailable("no font".into()))?;
//! let req = RenderRequest {
//!     photo: PhotoSource::Bytes(photo_png),
//!     owner_name: "山田".into(),
//!     pet_name: "ポチ".into(),
//!     animal_type: "犬".into(),
//!     breed: "柴犬".into(),
//!     birth_date: "2023-01-15".into(),
//!     color: "茶".into(),
//!     issue_location: "東京都".into(),
//!     issue_date: "2024-05-03".into(),
//!     favorite_word: None,
//!     microchip_no: None,
//!     gender: None,
//!     special_notes: vec![],
//! };
//! let png = generate_license(&fonts, &req).await?;
//! # Ok(())
//! # }
//! ```

pub mod card;
pub mod compose;
pub mod era;
pub mod error;
pub mod fit;
pub mod fonts;
pub mod layout;
pub mod raster;
pub mod surface;
pub mod util;
pub mod vertical;

pub use card::{generate_license, generate_license_scaled, PhotoSource, RenderRequest};
pub use compose::LogoResult;
pub use error::RenderError;
pub use fonts::FontSet;
pub use layout::CardLayout;
pub use raster::RasterSurface;
pub use surface::{Surface, TextStyle};
