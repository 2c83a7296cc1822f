//! Flagged-term sets and the bundled default word lists.
//!
//! A term is a lowercase word or a multi-word phrase. Sets come either from
//! caller-supplied custom text or from a union of the per-language default
//! lists loaded once at startup.

use anyhow::Context;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Deduplicated, lowercased set of flagged words and phrases. Guaranteed
/// non-empty by construction; an empty selection is a caller error caught
/// before any provider is contacted.
#[derive(Debug, Clone)]
pub struct FlaggedTermSet {
    terms: HashSet<String>,
}

impl FlaggedTermSet {
    /// Build from caller-supplied text, one term per line; commas are
    /// accepted as separators too.
    pub fn from_custom(raw: &str) -> anyhow::Result<Self> {
        let normalized = raw.replace(',', "\n");
        let terms = normalized
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_terms(terms)
    }

    /// Union of the selected default lists. Unknown language codes are
    /// skipped with a warning, matching per-list best-effort loading.
    pub fn from_defaults(lists: &DefaultWordLists, langs: &[String]) -> anyhow::Result<Self> {
        let mut terms = HashSet::new();
        for lang in langs {
            match lists.get(lang) {
                Some(words) => terms.extend(words.iter().cloned()),
                None => warn!("requested default word list '{lang}' is not loaded"),
            }
        }
        Self::from_terms(terms)
    }

    fn from_terms(terms: HashSet<String>) -> anyhow::Result<Self> {
        if terms.is_empty() {
            anyhow::bail!("no flagged words selected or provided");
        }
        Ok(Self { terms })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Per-language default lists, loaded once at process start.
#[derive(Debug, Default)]
pub struct DefaultWordLists {
    lists: BTreeMap<String, Vec<String>>,
}

impl DefaultWordLists {
    /// Scan `dir` for `default_<lang>.txt` files. Unreadable or empty files
    /// are logged and skipped; ending up with zero lists is fatal.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let entries =
            fs::read_dir(dir).with_context(|| format!("read word list dir {}", dir.display()))?;

        let mut lists = BTreeMap::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
            let file_name = entry.file_name();
            let Some(lang) = file_name
                .to_str()
                .and_then(|n| n.strip_prefix("default_"))
                .and_then(|n| n.strip_suffix(".txt"))
            else {
                continue;
            };

            match fs::read_to_string(entry.path()) {
                Ok(raw) => {
                    let words: Vec<String> = raw
                        .lines()
                        .map(|line| line.trim().to_lowercase())
                        .filter(|line| !line.is_empty())
                        .collect();
                    if words.is_empty() {
                        warn!("default word list for '{lang}' is empty, skipping");
                        continue;
                    }
                    info!("loaded {} terms for '{lang}'", words.len());
                    lists.insert(lang.to_string(), words);
                }
                Err(err) => {
                    warn!("failed to read default word list for '{lang}': {err}");
                }
            }
        }

        if lists.is_empty() {
            anyhow::bail!("no default word lists could be loaded from {}", dir.display());
        }
        Ok(Self { lists })
    }

    pub fn get(&self, lang: &str) -> Option<&Vec<String>> {
        self.lists.get(lang)
    }

    /// Loaded languages with their term counts, in language order.
    pub fn languages(&self) -> impl Iterator<Item = (&str, usize)> {
        self.lists.iter().map(|(lang, words)| (lang.as_str(), words.len()))
    }
}
