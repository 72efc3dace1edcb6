//! gatha - layout-aware verse extraction from hOCR documents.
//!
//! Pages are read from hOCR markup, footnote lines and superscript words are
//! filtered out by geometry, lines are stitched into numbered verses, and
//! verses are grouped into single or composite text entities.

pub mod api;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod hocr;
pub mod layout;
pub mod params;

pub use api::high_level;

pub use api::{ExtractOptions, Extraction, PassStats};
pub use entities::{CompositePair, EntityOrder, TextEntity, VerseMapping};
pub use error::{GathaError, Result};
