//! High-level API module for verse extraction.
//!
//! # Example
//!
//! ```ignore
//! use gatha_core::api::{ExtractOptions, extract_from_path};
//! use gatha_core::entities::parse_pairs;
//!
//! let options = ExtractOptions {
//!     pairs: parse_pairs("58-59,104-105")?,
//!     ..ExtractOptions::default()
//! };
//! let extraction = extract_from_path("dhammapada_hocr.html", &options)?;
//! ```

pub mod high_level;

pub use high_level::{
    ExtractOptions, Extraction, PassStats, extract, extract_from_path, extract_from_str,
    extract_verses, stitch_page,
};
