//! Family identifiers and the ordered, deduplicated sets built from them.
//!
//! A family is the deployment-chosen name shared by a rolling set of
//! concrete indices, e.g. `app` for `app-2024.01.01` and `app-2024.01.02`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Names starting with this are system-owned and never reported.
pub const RESERVED_PREFIX: char = '.';

/// Which delimiter-separated segment of a name is its family.
///
/// The defaults encode the usual conventions: `<family>-<suffix>` for
/// indices and `<type>-<family>-<namespace>` for data streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyConvention {
    pub delimiter: char,
    pub index_segment: usize,
    pub data_stream_segment: usize,
}

impl Default for FamilyConvention {
    fn default() -> Self {
        Self {
            delimiter: '-',
            index_segment: 0,
            data_stream_segment: 1,
        }
    }
}

/// Why a name produced no family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    Reserved,
    /// Fewer segments than the convention requires, or an empty segment.
    NoSegment,
}

/// Derive the family of `name` by taking its `segment`-th piece.
pub fn derive_family(name: &str, delimiter: char, segment: usize) -> Result<&str, Skip> {
    if name.starts_with(RESERVED_PREFIX) {
        return Err(Skip::Reserved);
    }
    match name.split(delimiter).nth(segment) {
        Some(family) if !family.is_empty() => Ok(family),
        _ => Err(Skip::NoSegment),
    }
}

/// Unique family identifiers in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilySet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl FamilySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `family` unless already present. Returns whether it was added.
    pub fn insert(&mut self, family: &str) -> bool {
        if self.seen.contains(family) {
            return false;
        }
        self.seen.insert(family.to_string());
        self.items.push(family.to_string());
        true
    }

    pub fn contains(&self, family: &str) -> bool {
        self.seen.contains(family)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }
}

impl<S: AsRef<str>> FromIterator<S> for FamilySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = FamilySet::new();
        for family in iter {
            set.insert(family.as_ref());
        }
        set
    }
}

impl<'a> IntoIterator for &'a FamilySet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
