//! Layout analysis for hOCR pages.
//!
//! - `lines`: footnote and superscript filtering, word ordering
//! - `stitch`: verse stitching across lines and pages

pub mod lines;
pub mod stitch;

pub use lines::{Line, LineFilterCounts, PageGeometry, Word, build_lines};
pub use stitch::{
    LineOutcome, Reopen, StitchState, VerseMap, VerseStitcher, normalize_punctuation,
};
