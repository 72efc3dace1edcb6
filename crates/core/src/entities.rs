//! Entity assembly: groups finished verses into postable text entities.
//!
//! Verses listed in a composite pair become one entity labeled `"A–B"`;
//! every other verse becomes a single entity labeled with its number.

use itertools::Itertools;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::{GathaError, Result};
use crate::layout::VerseMap;

/// Two verses published together as one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompositePair {
    pub first: u32,
    pub second: u32,
}

impl CompositePair {
    pub const fn new(first: u32, second: u32) -> Self {
        Self { first, second }
    }

    /// Display label, joined with an en dash.
    pub fn label(&self) -> String {
        format!("{}\u{2013}{}", self.first, self.second)
    }
}

/// Parse a pair list such as `"58-59, 104-105"`.
///
/// Blank chunks are ignored. Anything else that is not `A-B` with two
/// distinct positive integers is an error, as is a verse listed in more than
/// one pair.
pub fn parse_pairs(spec: &str) -> Result<Vec<CompositePair>> {
    let mut pairs = Vec::new();
    let mut seen = FxHashSet::default();

    for chunk in spec.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let invalid = |reason: String| GathaError::InvalidPair {
            chunk: chunk.to_string(),
            reason,
        };

        let parts: Vec<&str> = chunk.split('-').collect();
        let [a, b] = parts.as_slice() else {
            return Err(invalid("want A-B".to_string()));
        };
        let parse = |s: &str| {
            s.trim()
                .parse::<u32>()
                .map_err(|e| invalid(format!("{:?}: {e}", s.trim())))
        };
        let (first, second) = (parse(*a)?, parse(*b)?);

        if first == 0 || second == 0 {
            return Err(invalid("verse numbers must be positive".to_string()));
        }
        if first == second {
            return Err(invalid("pair members must differ".to_string()));
        }
        for n in [first, second] {
            if !seen.insert(n) {
                return Err(invalid(format!("verse {n} already belongs to an earlier pair")));
            }
        }
        pairs.push(CompositePair::new(first, second));
    }

    Ok(pairs)
}

/// A postable text: one verse, or a composite pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEntity {
    pub id: u32,
    pub label: String,
    pub body: String,
}

/// Join row linking an entity to one of its verse numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerseMapping {
    pub text_id: u32,
    pub verse_number: u32,
}

/// Order in which entities are numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityOrder {
    /// Composites in configuration order, then singles by verse number.
    #[default]
    CompositesFirst,
    /// All entities by their lowest verse number.
    ByVerse,
}

/// Entities and their verse mappings, ids contiguous from 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assembly {
    pub entities: Vec<TextEntity>,
    pub mappings: Vec<VerseMapping>,
}

struct Draft {
    label: String,
    body: String,
    verses: Vec<u32>,
}

impl Draft {
    fn sort_key(&self) -> u32 {
        self.verses.iter().copied().min().unwrap_or(u32::MAX)
    }
}

/// Group verses into entities.
///
/// A pair with neither verse present is skipped. A pair with one verse
/// present still becomes a composite holding just that text, and both
/// numbers are mapped to it so neither reappears as a single.
pub fn assemble_entities(verses: &VerseMap, pairs: &[CompositePair], order: EntityOrder) -> Assembly {
    let mut drafts = Vec::with_capacity(verses.len());
    let mut consumed = FxHashSet::default();

    for pair in pairs {
        let (a, b) = (verses.get(pair.first), verses.get(pair.second));
        if a.is_none() && b.is_none() {
            continue;
        }
        let body = [a, b]
            .into_iter()
            .flatten()
            .filter(|t| !t.trim().is_empty())
            .join(" ");
        drafts.push(Draft {
            label: pair.label(),
            body: body.trim().to_string(),
            verses: vec![pair.first, pair.second],
        });
        consumed.insert(pair.first);
        consumed.insert(pair.second);
    }

    for (n, text) in verses.iter().filter(|(n, _)| !consumed.contains(n)) {
        drafts.push(Draft {
            label: n.to_string(),
            body: text.to_string(),
            verses: vec![n],
        });
    }

    if order == EntityOrder::ByVerse {
        drafts.sort_by_key(Draft::sort_key);
    }

    let mut assembly = Assembly::default();
    for (idx, draft) in drafts.into_iter().enumerate() {
        let id = idx as u32 + 1;
        assembly
            .mappings
            .extend(draft.verses.iter().map(|&verse_number| VerseMapping {
                text_id: id,
                verse_number,
            }));
        assembly.entities.push(TextEntity {
            id,
            label: draft.label,
            body: draft.body,
        });
    }
    assembly
}
