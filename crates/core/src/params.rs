//! Extraction parameters.
//!
//! Contains ExtractParams for the geometric heuristics and PageWindow for
//! restricting a pass to a range of printed page numbers.

use crate::error::{GathaError, Result};

/// Parameters for the line builder and verse stitcher.
///
/// Controls which lines count as footnotes, which words count as
/// superscripts, and how far from the left edge a verse number may sit.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractParams {
    /// Lines whose top edge is at or below this fraction of the page height
    /// belong to the footnote region and are dropped whole.
    pub footnote_frac: f64,

    /// A leading integer token opens a verse only if its left edge is within
    /// this fraction of the page width.
    pub left_margin_frac: f64,

    /// Words whose top edge sits more than this many pixels above their
    /// line's top edge are treated as superscripts and dropped.
    pub superscript_rise_px: i32,
}

impl Default for ExtractParams {
    fn default() -> Self {
        Self {
            footnote_frac: 0.82,
            left_margin_frac: 0.20,
            superscript_rise_px: 5,
        }
    }
}

impl ExtractParams {
    /// Creates parameters, rejecting fractions outside `[0, 1]` and
    /// negative rise thresholds.
    pub fn new(footnote_frac: f64, left_margin_frac: f64, superscript_rise_px: i32) -> Result<Self> {
        for (name, frac) in [
            ("footnote_frac", footnote_frac),
            ("left_margin_frac", left_margin_frac),
        ] {
            if !(0.0..=1.0).contains(&frac) {
                return Err(GathaError::InvalidParams(format!(
                    "{name} must be between 0.0 and 1.0, got {frac}"
                )));
            }
        }
        if superscript_rise_px < 0 {
            return Err(GathaError::InvalidParams(format!(
                "superscript_rise_px must not be negative, got {superscript_rise_px}"
            )));
        }

        Ok(Self {
            footnote_frac,
            left_margin_frac,
            superscript_rise_px,
        })
    }
}

/// Inclusive window of printed page numbers (`ppageno`) to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub min: i32,
    pub max: i32,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::all()
    }
}

impl PageWindow {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// A window that admits every page.
    pub const fn all() -> Self {
        Self {
            min: i32::MIN,
            max: i32::MAX,
        }
    }

    /// Whether a page with the given (optional) page number is processed.
    ///
    /// Pages without a page number are always included.
    pub fn admits(&self, page_number: Option<i32>) -> bool {
        match page_number {
            Some(n) => (self.min..=self.max).contains(&n),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_fractions() {
        assert!(ExtractParams::new(1.2, 0.2, 5).is_err());
        assert!(ExtractParams::new(0.8, -0.1, 5).is_err());
        assert!(ExtractParams::new(0.8, 0.2, -1).is_err());
        assert_eq!(
            ExtractParams::new(0.82, 0.20, 5).unwrap(),
            ExtractParams::default()
        );
    }

    #[test]
    fn window_is_inclusive_and_lets_unnumbered_pages_through() {
        let window = PageWindow::new(60, 96);
        assert!(window.admits(Some(60)));
        assert!(window.admits(Some(96)));
        assert!(!window.admits(Some(59)));
        assert!(!window.admits(Some(97)));
        assert!(window.admits(None));
        assert!(PageWindow::all().admits(Some(0)));
    }
}
