//! hOCR reader.
//!
//! Parses hOCR markup into a small owned document model. Only what the line
//! builder needs is kept: each element's `title` annotation and each word's
//! text. Geometry is not interpreted here; see [`crate::geometry`].

use std::path::Path;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{GathaError, Result};

/// One `ocrx_word` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HocrWord {
    pub title: String,
    pub text: String,
}

/// One `ocr_line` element with its words in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HocrLine {
    pub title: String,
    pub words: Vec<HocrWord>,
}

/// One `ocr_page` element with its lines in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HocrPage {
    pub title: String,
    pub lines: Vec<HocrLine>,
}

/// A parsed hOCR document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HocrDocument {
    pub pages: Vec<HocrPage>,
}

impl HocrWord {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

impl HocrLine {
    pub fn new(title: impl Into<String>, words: Vec<HocrWord>) -> Self {
        Self {
            title: title.into(),
            words,
        }
    }
}

impl HocrPage {
    pub fn new(title: impl Into<String>, lines: Vec<HocrLine>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }
}

struct Selectors {
    page: Selector,
    line: Selector,
    word: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            page: selector(".ocr_page")?,
            line: selector(".ocr_line")?,
            word: selector(".ocrx_word")?,
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| GathaError::Selector(format!("{css}: {e}")))
}

fn title_of(element: &ElementRef<'_>) -> String {
    element.value().attr("title").unwrap_or_default().to_string()
}

impl HocrDocument {
    /// Parse hOCR markup.
    ///
    /// HTML parsing itself is forgiving; the document is rejected only when
    /// it holds no `ocr_page` element at all.
    pub fn parse(markup: &str) -> Result<Self> {
        let selectors = Selectors::new()?;
        let html = Html::parse_document(markup);

        let pages: Vec<HocrPage> = html
            .select(&selectors.page)
            .map(|page| {
                let lines = page
                    .select(&selectors.line)
                    .map(|line| {
                        let words = line
                            .select(&selectors.word)
                            .map(|word| HocrWord {
                                title: title_of(&word),
                                text: word.text().collect(),
                            })
                            .collect();
                        HocrLine {
                            title: title_of(&line),
                            words,
                        }
                    })
                    .collect();
                HocrPage {
                    title: title_of(&page),
                    lines,
                }
            })
            .collect();

        if pages.is_empty() {
            return Err(GathaError::NoPages);
        }
        debug!(pages = pages.len(), "parsed hOCR document");
        Ok(Self { pages })
    }

    /// Read and parse an hOCR file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let markup = std::fs::read_to_string(path)?;
        Self::parse(&markup)
    }
}
