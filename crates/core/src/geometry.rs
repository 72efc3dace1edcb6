//! Geometry primitives for hOCR title annotations.
//!
//! hOCR stores element geometry in the `title` attribute as a list of
//! `; `-separated properties, e.g. `bbox 10 20 300 40; ppageno 61`.
//! Coordinates are in page pixel space with a top-left origin, so a smaller
//! y is higher on the page.

use std::sync::LazyLock;

use regex::Regex;

static BBOX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"bbox\s+([0-9]+)\s+([0-9]+)\s+([0-9]+)\s+([0-9]+)").expect("valid bbox regex")
});

static PAGENO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ppageno\s+([0-9]+)").expect("valid ppageno regex"));

/// An axis-aligned box (x0, y0, x1, y1) in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoundingBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl BoundingBox {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub const fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub const fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    /// Top edge. With a top-left origin this is `y0`.
    pub const fn top(&self) -> i32 {
        self.y0
    }

    /// Left edge.
    pub const fn left(&self) -> i32 {
        self.x0
    }
}

/// Parse a `bbox x0 y0 x1 y1` property out of a title string.
///
/// Returns `None` when the property is missing or malformed; the caller is
/// expected to skip the element.
pub fn parse_bbox(title: &str) -> Option<BoundingBox> {
    let caps = BBOX_RE.captures(title)?;
    Some(BoundingBox::new(
        lenient_int(&caps[1]),
        lenient_int(&caps[2]),
        lenient_int(&caps[3]),
        lenient_int(&caps[4]),
    ))
}

/// Parse a `ppageno N` property out of a title string.
///
/// `None` means the page carries no page number, which callers treat as
/// "no page-number constraint".
pub fn parse_page_number(title: &str) -> Option<i32> {
    let caps = PAGENO_RE.captures(title)?;
    Some(lenient_int(&caps[1]))
}

/// Parse a decimal integer, falling back to zero.
///
/// A numeral the OCR engine mangled (or one that overflows) must not abort a
/// whole document.
pub fn lenient_int(s: &str) -> i32 {
    s.trim().parse().unwrap_or(0)
}

/// Scale a length by a fraction, truncating toward zero.
#[inline]
pub(crate) fn scale_trunc(length: i32, frac: f64) -> i32 {
    (f64::from(length) * frac) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bbox_with_trailing_properties() {
        let bbox = parse_bbox("bbox 12 30 410 58; baseline 0 -6; x_size 28").unwrap();
        assert_eq!(bbox, BoundingBox::new(12, 30, 410, 58));
        assert_eq!(bbox.width(), 398);
        assert_eq!(bbox.height(), 28);
    }

    #[test]
    fn parses_bbox_after_other_properties() {
        let bbox = parse_bbox("image \"p61.png\"; bbox 0 0 2480 3508; ppageno 61").unwrap();
        assert_eq!(bbox, BoundingBox::new(0, 0, 2480, 3508));
    }

    #[test]
    fn missing_or_short_bbox_is_none() {
        assert_eq!(parse_bbox(""), None);
        assert_eq!(parse_bbox("x_wconf 93"), None);
        assert_eq!(parse_bbox("bbox 1 2 3"), None);
        assert_eq!(parse_bbox("bbox -1 2 3 4"), None);
    }

    #[test]
    fn page_number_is_optional() {
        assert_eq!(parse_page_number("bbox 0 0 10 10; ppageno 61"), Some(61));
        assert_eq!(parse_page_number("bbox 0 0 10 10"), None);
    }

    #[test]
    fn overflowing_numeral_is_zero() {
        assert_eq!(lenient_int("99999999999999999999"), 0);
        assert_eq!(lenient_int("42"), 42);
        let bbox = parse_bbox("bbox 99999999999999999999 5 10 20").unwrap();
        assert_eq!(bbox.x0, 0);
        assert_eq!(bbox.y0, 5);
    }

    #[test]
    fn scale_truncates() {
        assert_eq!(scale_trunc(1000, 0.82), 820);
        assert_eq!(scale_trunc(999, 0.2), 199);
    }
}
