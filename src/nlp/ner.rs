//! Gazetteer-backed NER. The model is a label → terms lexicon read from disk.

use std::{collections::HashMap, sync::Arc};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Settings;

/// File name of the lexicon inside the model folder.
pub const GAZETTEER_FILE: &str = "gazetteer.json";

/// Extracted entity span with byte offsets relative to the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

/// Trait for NER implementations. Results are ordered by `start` and never overlap.
pub trait Ner: Send + Sync {
    fn extract(&self, text: &str) -> Vec<Entity>;
}

static DISEASE_TERMS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "rice blast",
        "late blight",
        "powdery mildew",
        "downy mildew",
        "fusarium wilt",
        "bacterial leaf blight",
        "anthracnose",
        "root rot",
        "mosaic virus disease",
        "breast cancer",
        "hepatocellular carcinoma",
        "colorectal cancer",
        "gastric cancer",
        "diabetes",
    ]
});

static NON_CODING_RNA_TERMS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "miR-21",
        "miR-155",
        "miR-156",
        "miR-159",
        "miR-172",
        "miR-393",
        "miR-398",
        "MALAT1",
        "HOTAIR",
        "H19",
        "XIST",
        "lncRNA",
        "circRNA",
        "microRNA",
    ]
});

fn seed_lexicon() -> IndexMap<String, Vec<String>> {
    let mut lexicon = IndexMap::new();
    lexicon.insert(
        "DISEASE".to_string(),
        DISEASE_TERMS.iter().map(|t| t.to_string()).collect(),
    );
    lexicon.insert(
        "NON-CODING_RNA".to_string(),
        NON_CODING_RNA_TERMS.iter().map(|t| t.to_string()).collect(),
    );
    lexicon
}

/// Case-insensitive, longest-match-first dictionary tagger.
pub struct GazetteerNer {
    pattern: Option<Regex>,
    /// Label of each capture group, in pattern order (group `i + 1`).
    group_labels: Vec<String>,
}

impl GazetteerNer {
    /// Build from a label → terms lexicon. A term listed under several labels
    /// keeps the first label it appears under.
    pub fn new(lexicon: &IndexMap<String, Vec<String>>) -> Result<Self> {
        let mut labels: HashMap<String, String> = HashMap::new();
        for (label, terms) in lexicon {
            for term in terms {
                let term = term.trim();
                if term.is_empty() {
                    continue;
                }
                labels
                    .entry(term.to_lowercase())
                    .or_insert_with(|| label.clone());
            }
        }

        if labels.is_empty() {
            return Ok(Self {
                pattern: None,
                group_labels: Vec::new(),
            });
        }

        let mut terms: Vec<(String, String)> = labels.into_iter().collect();
        terms.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        // Group `i + 1` matches `terms[i]`, under the regex's case folding.
        let alternatives = terms
            .iter()
            .map(|(term, _)| format!("({})", bounded(term)))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&format!("(?:{alternatives})"))
            .case_insensitive(true)
            .size_limit(64 << 20)
            .build()
            .context("compiling gazetteer pattern")?;

        Ok(Self {
            pattern: Some(pattern),
            group_labels: terms.into_iter().map(|(_, label)| label).collect(),
        })
    }

    /// Number of distinct terms known to the tagger.
    pub fn term_count(&self) -> usize {
        self.group_labels.len()
    }
}

impl Ner for GazetteerNer {
    fn extract(&self, text: &str) -> Vec<Entity> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };
        pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let (group, m) = caps
                    .iter()
                    .enumerate()
                    .skip(1)
                    .find_map(|(i, m)| m.map(|m| (i, m)))?;
                Some(Entity {
                    text: m.as_str().to_string(),
                    label: self.group_labels[group - 1].clone(),
                    start: m.start(),
                    end: m.end(),
                })
            })
            .collect()
    }
}

/// Word boundaries only where the term edge is itself a word character, so
/// terms such as `miR-21` or `(S)-ABA` still match.
fn bounded(term: &str) -> String {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let mut out = String::new();
    if is_word(term.chars().next()) {
        out.push_str(r"\b");
    }
    out.push_str(&regex::escape(term));
    if is_word(term.chars().last()) {
        out.push_str(r"\b");
    }
    out
}

/// Load the tagger from `MODEL_DIR/gazetteer.json`, or the built-in seed lexicon.
pub async fn load_model(settings: &Settings) -> Result<Arc<dyn Ner>> {
    let lexicon = match &settings.model_dir {
        Some(dir) if dir.join(GAZETTEER_FILE).exists() => {
            let path = dir.join(GAZETTEER_FILE);
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let lexicon: IndexMap<String, Vec<String>> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", path.display()))?;
            info!(path = %path.display(), labels = lexicon.len(), "loaded gazetteer model");
            lexicon
        }
        Some(dir) => {
            warn!(dir = %dir.display(), "no gazetteer.json in model dir; using seed lexicon");
            seed_lexicon()
        }
        None => {
            warn!("MODEL_DIR unset; using seed lexicon");
            seed_lexicon()
        }
    };
    let ner = GazetteerNer::new(&lexicon)?;
    info!(terms = ner.term_count(), "ner ready");
    Ok(Arc::new(ner) as Arc<dyn Ner>)
}
