//! Verse stitching.
//!
//! A [`VerseStitcher`] walks the cleaned lines of one page and folds them
//! into a [`VerseMap`] shared by the whole pass. A line whose first word is
//! an integer sitting in the left margin opens a verse; any other line
//! continues the open verse, or is dropped when none is open.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use super::lines::Line;

static SPACE_BEFORE_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\t\n\x0C\r ]+([,.;:!?])").expect("valid punctuation regex"));

/// Remove whitespace that immediately precedes `, . ; : ! ?`.
///
/// OCR output commonly tokenizes trailing punctuation as its own word, so a
/// naive join yields `"knows ."`.
pub fn normalize_punctuation(text: &str) -> String {
    SPACE_BEFORE_PUNCT_RE.replace_all(text, "$1").into_owned()
}

/// A verse number that received text more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reopen {
    pub verse: u32,
    /// Page index of the fragment already stored.
    pub previous_page: usize,
    pub page: usize,
}

impl Reopen {
    /// A re-open on the same page is more likely a misread number than a
    /// verse running over a page break.
    pub fn is_same_page(&self) -> bool {
        self.previous_page == self.page
    }
}

/// Verse number to accumulated text, shared across all pages of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerseMap {
    texts: BTreeMap<u32, String>,
    last_page: FxHashMap<u32, usize>,
}

impl VerseMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a finished fragment for `verse`, appending to earlier text with
    /// one separating space.
    pub fn append(&mut self, verse: u32, fragment: &str, page: usize) -> Option<Reopen> {
        let previous_page = self.last_page.insert(verse, page);
        match self.texts.get_mut(&verse) {
            Some(prev) => {
                let joined = format!("{prev} {fragment}");
                *prev = joined.trim().to_string();
                Some(Reopen {
                    verse,
                    previous_page: previous_page.unwrap_or(page),
                    page,
                })
            }
            None => {
                self.texts.insert(verse, fragment.trim().to_string());
                None
            }
        }
    }

    pub fn get(&self, verse: u32) -> Option<&str> {
        self.texts.get(&verse).map(String::as_str)
    }

    pub fn contains(&self, verse: u32) -> bool {
        self.texts.contains_key(&verse)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Verses in ascending numeric order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.texts.iter().map(|(n, t)| (*n, t.as_str()))
    }

    pub fn numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.texts.keys().copied()
    }
}

impl FromIterator<(u32, String)> for VerseMap {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (verse, text) in iter {
            map.append(verse, &text, 0);
        }
        map
    }
}

/// Stitcher state: either no verse is open, or verse `n` is collecting text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StitchState {
    #[default]
    Idle,
    Open(u32),
}

/// What the stitcher did with one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Opened(u32),
    Continued(u32),
    Orphan,
}

/// Per-page stitcher. State does not carry over between pages; verses
/// spanning a page break are joined through the [`VerseMap`].
#[derive(Debug)]
pub struct VerseStitcher {
    page: usize,
    left_cutoff: i32,
    state: StitchState,
    buf: Vec<String>,
    reopened: Vec<Reopen>,
}

fn verse_number(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(token.parse().unwrap_or(0))
}

impl VerseStitcher {
    /// `page` identifies the page in the pass; `left_cutoff` is the largest x
    /// at which a verse number may start.
    pub fn new(page: usize, left_cutoff: i32) -> Self {
        Self {
            page,
            left_cutoff,
            state: StitchState::Idle,
            buf: Vec::new(),
            reopened: Vec::new(),
        }
    }

    pub fn state(&self) -> StitchState {
        self.state
    }

    /// Fold one cleaned line into the stitcher.
    pub fn feed(&mut self, line: &Line, verses: &mut VerseMap) -> LineOutcome {
        let first = line.first();
        if first.x <= self.left_cutoff
            && let Some(n) = verse_number(&first.text)
        {
            self.flush(verses);
            self.state = StitchState::Open(n);
            self.buf.extend(line.words[1..].iter().map(|w| w.text.clone()));
            return LineOutcome::Opened(n);
        }

        match self.state {
            StitchState::Open(n) => {
                self.buf.extend(line.words.iter().map(|w| w.text.clone()));
                LineOutcome::Continued(n)
            }
            StitchState::Idle => {
                debug!(
                    page = self.page,
                    text = %first.text,
                    "dropping line before any verse number"
                );
                LineOutcome::Orphan
            }
        }
    }

    /// Flush the open verse and return the verses that were re-opened on
    /// this page.
    pub fn finish(mut self, verses: &mut VerseMap) -> Vec<Reopen> {
        self.flush(verses);
        self.reopened
    }

    fn flush(&mut self, verses: &mut VerseMap) {
        if let StitchState::Open(n) = self.state
            && !self.buf.is_empty()
        {
            let text = normalize_punctuation(&self.buf.join(" "));
            if let Some(reopen) = verses.append(n, text.trim(), self.page) {
                if reopen.is_same_page() {
                    warn!(
                        verse = n,
                        page = self.page,
                        "verse number repeated on the same page; appending to earlier text"
                    );
                } else {
                    debug!(
                        verse = n,
                        from_page = reopen.previous_page,
                        page = self.page,
                        "verse continues across page break"
                    );
                }
                self.reopened.push(reopen);
            }
        }
        self.state = StitchState::Idle;
        self.buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;
    use crate::layout::lines::Word;

    fn line(words: &[(i32, &str)]) -> Line {
        Line {
            bbox: BoundingBox::new(0, 0, 500, 30),
            words: words.iter().map(|(x, t)| Word::new(*x, *t)).collect(),
        }
    }

    #[test]
    fn number_in_margin_opens_and_continuation_appends() {
        let mut verses = VerseMap::new();
        let mut st = VerseStitcher::new(0, 100);

        assert_eq!(
            st.feed(&line(&[(10, "12"), (40, "The"), (90, "fool")]), &mut verses),
            LineOutcome::Opened(12)
        );
        assert_eq!(st.state(), StitchState::Open(12));
        assert_eq!(
            st.feed(&line(&[(150, "who"), (200, "knows"), (260, ".")]), &mut verses),
            LineOutcome::Continued(12)
        );
        assert!(st.finish(&mut verses).is_empty());

        assert_eq!(verses.get(12), Some("The fool who knows."));
    }

    #[test]
    fn number_outside_margin_is_plain_text() {
        let mut verses = VerseMap::new();
        let mut st = VerseStitcher::new(0, 100);
        st.feed(&line(&[(10, "3"), (40, "Hatred")]), &mut verses);
        st.feed(&line(&[(120, "4"), (150, "ceases")]), &mut verses);
        st.finish(&mut verses);

        assert_eq!(verses.len(), 1);
        assert_eq!(verses.get(3), Some("Hatred 4 ceases"));
    }

    #[test]
    fn orphan_lines_are_dropped() {
        let mut verses = VerseMap::new();
        let mut st = VerseStitcher::new(0, 100);
        assert_eq!(
            st.feed(&line(&[(10, "Chapter"), (80, "One")]), &mut verses),
            LineOutcome::Orphan
        );
        st.finish(&mut verses);
        assert!(verses.is_empty());
    }

    #[test]
    fn number_only_verse_leaves_no_entry() {
        let mut verses = VerseMap::new();
        let mut st = VerseStitcher::new(0, 100);
        st.feed(&line(&[(10, "5")]), &mut verses);
        st.feed(&line(&[(10, "6"), (40, "Few")]), &mut verses);
        st.finish(&mut verses);

        assert!(!verses.contains(5));
        assert_eq!(verses.get(6), Some("Few"));
    }

    #[test]
    fn reopen_on_same_page_is_reported() {
        let mut verses = VerseMap::new();
        let mut st = VerseStitcher::new(4, 100);
        st.feed(&line(&[(10, "9"), (40, "a")]), &mut verses);
        st.feed(&line(&[(10, "9"), (40, "b")]), &mut verses);
        let reopened = st.finish(&mut verses);

        assert_eq!(verses.get(9), Some("a b"));
        assert_eq!(reopened.len(), 1);
        assert!(reopened[0].is_same_page());
    }

    #[test]
    fn punctuation_normalization() {
        assert_eq!(normalize_punctuation("Hear , O monks ; listen !"), "Hear, O monks; listen!");
        assert_eq!(normalize_punctuation("why ? so : it ."), "why? so: it.");
        assert_eq!(normalize_punctuation("no change here."), "no change here.");
    }

    #[test]
    fn punctuation_normalization_is_idempotent() {
        for s in ["a , b", "x  .", "tab\t;", "a , , b", "plain", ". leading"] {
            let once = normalize_punctuation(s);
            assert_eq!(normalize_punctuation(&once), once);
        }
    }
}
