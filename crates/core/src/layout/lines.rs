//! Line builder: turns one page's raw lines into cleaned, ordered lines.

use crate::geometry::{BoundingBox, parse_bbox, scale_trunc};
use crate::hocr::{HocrLine, HocrPage};
use crate::params::ExtractParams;

/// A word reduced to its left edge and trimmed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub x: i32,
    pub text: String,
}

impl Word {
    pub fn new(x: i32, text: impl Into<String>) -> Self {
        Self {
            x,
            text: text.into(),
        }
    }
}

/// A cleaned line. `words` is never empty and is ordered by ascending `x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub bbox: BoundingBox,
    pub words: Vec<Word>,
}

impl Line {
    pub fn first(&self) -> &Word {
        &self.words[0]
    }
}

/// Page-level cutoffs derived from the page box and [`ExtractParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub bbox: BoundingBox,
    /// Lines whose top is at or below this y are footnotes.
    pub footnote_cutoff: i32,
    /// A verse number must start at or left of this x.
    pub left_cutoff: i32,
    pub superscript_rise: i32,
}

impl PageGeometry {
    pub fn new(bbox: BoundingBox, params: &ExtractParams) -> Self {
        Self {
            bbox,
            footnote_cutoff: bbox.y0 + scale_trunc(bbox.height(), params.footnote_frac),
            left_cutoff: bbox.x0 + scale_trunc(bbox.width(), params.left_margin_frac),
            superscript_rise: params.superscript_rise_px,
        }
    }

    /// Whether a line starting at `top` lies in the footnote region.
    pub fn is_footnote(&self, top: i32) -> bool {
        top >= self.footnote_cutoff
    }

    /// Whether a word with top `word_top` is raised above a line with top
    /// `line_top` far enough to be a superscript.
    pub fn is_superscript(&self, word_top: i32, line_top: i32) -> bool {
        word_top < line_top - self.superscript_rise
    }
}

/// What the line builder dropped on one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineFilterCounts {
    pub lines_without_bbox: usize,
    pub footnote_lines: usize,
    pub superscripts: usize,
    pub empty_lines: usize,
}

/// Build the cleaned lines of one page, in document order.
pub fn build_lines(
    page: &HocrPage,
    geom: &PageGeometry,
    counts: &mut LineFilterCounts,
) -> Vec<Line> {
    page.lines
        .iter()
        .filter_map(|raw| clean_line(raw, geom, counts))
        .collect()
}

fn clean_line(raw: &HocrLine, geom: &PageGeometry, counts: &mut LineFilterCounts) -> Option<Line> {
    let Some(bbox) = parse_bbox(&raw.title) else {
        counts.lines_without_bbox += 1;
        return None;
    };
    if geom.is_footnote(bbox.top()) {
        counts.footnote_lines += 1;
        return None;
    }

    let mut words = Vec::with_capacity(raw.words.len());
    for w in &raw.words {
        let Some(wb) = parse_bbox(&w.title) else {
            continue;
        };
        let text = w.text.trim();
        if text.is_empty() {
            continue;
        }
        if geom.is_superscript(wb.top(), bbox.top()) {
            counts.superscripts += 1;
            continue;
        }
        words.push(Word::new(wb.left(), text));
    }

    if words.is_empty() {
        counts.empty_lines += 1;
        return None;
    }
    words.sort_by_key(|w| w.x);
    Some(Line { bbox, words })
}
