//! High-level extraction API.
//!
//! Provides the main public entry points:
//! - `extract_verses()` - Run the page loop into a verse map
//! - `extract()` - Verses plus assembled text entities from a parsed document
//! - `extract_from_str()` / `extract_from_path()` - The same, from hOCR markup

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::entities::{Assembly, CompositePair, EntityOrder, assemble_entities};
use crate::error::Result;
use crate::geometry::{parse_bbox, parse_page_number};
use crate::hocr::{HocrDocument, HocrPage};
use crate::layout::{
    LineFilterCounts, LineOutcome, PageGeometry, VerseMap, VerseStitcher, build_lines,
};
use crate::params::{ExtractParams, PageWindow};

/// Options for an extraction run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractOptions {
    /// Geometric heuristics.
    pub params: ExtractParams,

    /// Printed page numbers to process. Pages without a number always pass.
    pub window: PageWindow,

    /// Verse pairs published as one entity.
    pub pairs: Vec<CompositePair>,

    /// Entity numbering order.
    pub order: EntityOrder,
}

/// Counters collected over one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    pub pages_seen: usize,
    pub pages_outside_window: usize,
    pub pages_without_bbox: usize,
    pub lines_kept: usize,
    pub lines_without_bbox: usize,
    pub footnote_lines: usize,
    pub superscripts: usize,
    pub orphan_lines: usize,
    pub verses_reopened: usize,
}

impl PassStats {
    fn absorb(&mut self, counts: &LineFilterCounts) {
        self.lines_without_bbox += counts.lines_without_bbox;
        self.footnote_lines += counts.footnote_lines;
        self.superscripts += counts.superscripts;
    }
}

/// Result of a full extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub verses: VerseMap,
    pub assembly: Assembly,
    pub stats: PassStats,
}

/// Fold one page into `verses`.
///
/// Returns `false` when the page was skipped, either for falling outside
/// the window or for lacking a page box.
pub fn stitch_page(
    page_index: usize,
    page: &HocrPage,
    params: &ExtractParams,
    window: &PageWindow,
    verses: &mut VerseMap,
    stats: &mut PassStats,
) -> bool {
    stats.pages_seen += 1;

    let Some(page_box) = parse_bbox(&page.title) else {
        debug!(page = page_index, "skipping page without bbox");
        stats.pages_without_bbox += 1;
        return false;
    };
    let page_number = parse_page_number(&page.title);
    if !window.admits(page_number) {
        debug!(page = page_index, ?page_number, "skipping page outside window");
        stats.pages_outside_window += 1;
        return false;
    }

    let geom = PageGeometry::new(page_box, params);
    let mut counts = LineFilterCounts::default();
    let lines = build_lines(page, &geom, &mut counts);
    stats.absorb(&counts);
    stats.lines_kept += lines.len();

    let mut stitcher = VerseStitcher::new(page_index, geom.left_cutoff);
    for line in &lines {
        if stitcher.feed(line, verses) == LineOutcome::Orphan {
            stats.orphan_lines += 1;
        }
    }
    stats.verses_reopened += stitcher.finish(verses).len();

    debug!(
        page = page_index,
        ?page_number,
        lines = lines.len(),
        footnotes = counts.footnote_lines,
        superscripts = counts.superscripts,
        "stitched page"
    );
    true
}

/// Run the page loop over `pages` in order and return the verse map.
pub fn extract_verses(
    pages: &[HocrPage],
    params: &ExtractParams,
    window: &PageWindow,
    stats: &mut PassStats,
) -> VerseMap {
    let mut verses = VerseMap::new();
    for (idx, page) in pages.iter().enumerate() {
        stitch_page(idx, page, params, window, &mut verses, stats);
    }
    verses
}

/// Extract verses and assemble text entities from a parsed document.
pub fn extract(doc: &HocrDocument, options: &ExtractOptions) -> Extraction {
    let mut stats = PassStats::default();
    let verses = extract_verses(&doc.pages, &options.params, &options.window, &mut stats);
    let assembly = assemble_entities(&verses, &options.pairs, options.order);

    info!(
        verses = verses.len(),
        entities = assembly.entities.len(),
        pages = stats.pages_seen,
        skipped = stats.pages_outside_window + stats.pages_without_bbox,
        "extraction finished"
    );
    Extraction {
        verses,
        assembly,
        stats,
    }
}

/// Parse hOCR markup and run [`extract`].
pub fn extract_from_str(markup: &str, options: &ExtractOptions) -> Result<Extraction> {
    let doc = HocrDocument::parse(markup)?;
    Ok(extract(&doc, options))
}

/// Read an hOCR file and run [`extract`].
pub fn extract_from_path(path: impl AsRef<Path>, options: &ExtractOptions) -> Result<Extraction> {
    let doc = HocrDocument::from_path(path)?;
    Ok(extract(&doc, options))
}
