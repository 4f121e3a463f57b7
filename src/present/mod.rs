//! Presentation layer: colours, label grouping and frequency counts.

pub mod highlight;
pub mod table;

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::nlp::Entity;

/// Link colour used for labels missing from the palette.
pub const DEFAULT_LINK_COLOR: &str = "black";

/// Display colours for one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelStyle {
    /// CSS background used for inline highlighting.
    pub highlight: String,
    /// CSS colour used for entity links in the table.
    pub link: String,
}

/// Fixed label → colour mapping, built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Palette {
    styles: IndexMap<String, LabelStyle>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new([
            (
                "DISEASE",
                "linear-gradient(90deg, #ff9999, #ff4d4d)",
                "crimson",
            ),
            (
                "NON-CODING_RNA",
                "linear-gradient(90deg, #cc66ff, #9933cc)",
                "darkgreen",
            ),
        ])
    }
}

impl Palette {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) -> Self {
        let styles = entries
            .into_iter()
            .map(|(label, highlight, link)| {
                (
                    label.to_string(),
                    LabelStyle {
                        highlight: highlight.to_string(),
                        link: link.to_string(),
                    },
                )
            })
            .collect();
        Self { styles }
    }

    /// Highlight background, or `None` when the label is not highlighted.
    pub fn highlight(&self, label: &str) -> Option<&str> {
        self.styles.get(label).map(|s| s.highlight.as_str())
    }

    pub fn link_color(&self, label: &str) -> &str {
        self.styles
            .get(label)
            .map(|s| s.link.as_str())
            .unwrap_or(DEFAULT_LINK_COLOR)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }
}

/// Label → unique trimmed entity texts. Labels keep first-appearance order;
/// entity texts iterate lexicographically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelGroups(IndexMap<String, BTreeSet<String>>);

impl LabelGroups {
    pub fn from_entities(entities: &[Entity]) -> Self {
        let mut groups: IndexMap<String, BTreeSet<String>> = IndexMap::new();
        for entity in entities {
            groups
                .entry(entity.label.clone())
                .or_default()
                .insert(entity.text.trim().to_string());
        }
        Self(groups)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&BTreeSet<String>> {
        self.0.get(label)
    }

    /// Groups in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.0.iter().map(|(label, set)| (label.as_str(), set))
    }

    /// Groups ordered by label.
    pub fn sorted(&self) -> Vec<(&str, &BTreeSet<String>)> {
        let mut out: Vec<_> = self.iter().collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }
}

/// Normalised entity text → number of mentions (a multiset, not a set).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyTable(IndexMap<String, usize>);

impl FrequencyTable {
    pub fn from_entities(entities: &[Entity]) -> Self {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for entity in entities {
            let key = normalize_surface(&entity.text);
            if key.is_empty() {
                continue;
            }
            *counts.entry(key).or_insert(0) += 1;
        }
        Self(counts)
    }

    pub fn get(&self, text: &str) -> usize {
        self.0.get(text).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Entries by descending count, ties broken by text.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut out: Vec<_> = self.0.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        out
    }
}

fn normalize_surface(text: &str) -> String {
    text.replace('\n', " ").trim().to_string()
}
