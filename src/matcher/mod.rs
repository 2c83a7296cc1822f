//! Flagged-term matching over lyrics.
//!
//! Two modes, picked by the shape of the lyrics source. Synced mode works
//! line by line and attaches the line offset to every match; plain mode
//! tests each term against the whole body and yields bare terms. Both are
//! boundary-safe: plain mode through `\b` anchors, synced single-word
//! matching through `\w+` tokenization.

use crate::lyrics::SyncedLine;
use crate::words::FlaggedTermSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::cmp::Ordering;
use std::collections::HashSet;

/// A single flagged-term hit. The serialized shape differs by source and
/// consumers rely on that: timed hits become `{"timestamp": .., "context":
/// ..}` objects, plain hits become bare strings.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchRecord {
    Timed { timestamp: f64, context: String },
    Term(String),
}

impl Serialize for MatchRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Timed { timestamp, context } => {
                let mut s = serializer.serialize_struct("MatchRecord", 2)?;
                s.serialize_field("timestamp", timestamp)?;
                s.serialize_field("context", context)?;
                s.end()
            }
            Self::Term(term) => serializer.serialize_str(term),
        }
    }
}

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid regex"));

/// Matcher for one term set, built once per batch. Boundary patterns for
/// plain mode are compiled up front so per-track work is just matching.
#[derive(Debug)]
pub struct Matcher {
    terms: FlaggedTermSet,
    boundary: Vec<(String, Regex)>,
}

impl Matcher {
    pub fn new(terms: FlaggedTermSet) -> Self {
        let mut boundary: Vec<(String, Regex)> = terms
            .iter()
            .filter_map(|term| {
                let pattern = format!(r"\b{}\b", regex::escape(term));
                Regex::new(&pattern).ok().map(|re| (term.to_string(), re))
            })
            .collect();
        boundary.sort_by(|a, b| a.0.cmp(&b.0));

        Self { terms, boundary }
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Synced mode: per line, phrases first (substring containment), then
    /// single words over `\w+` tokens. A word that is a whitespace-split
    /// component of a phrase already matched on the same line is
    /// suppressed so it is not double-reported. Records are deduplicated
    /// by (timestamp, term) and stably sorted by timestamp.
    pub fn match_synced(&self, lines: &[SyncedLine]) -> Vec<MatchRecord> {
        let mut found: Vec<(f64, String)> = Vec::new();

        for line in lines {
            let lower = line.text.to_lowercase();
            let timestamp = round3(line.offset_seconds);

            let mut phrases_in_line: Vec<&str> = Vec::new();
            for term in self.terms.iter() {
                if term.contains(' ') && lower.contains(term) {
                    found.push((timestamp, term.to_string()));
                    phrases_in_line.push(term);
                }
            }

            for token in WORD.find_iter(&lower).map(|m| m.as_str()) {
                if !self.terms.contains(token) {
                    continue;
                }
                let covered = phrases_in_line
                    .iter()
                    .any(|phrase| phrase.split_whitespace().any(|w| w == token));
                if !covered {
                    found.push((timestamp, token.to_string()));
                }
            }
        }

        // Timestamps are already rounded to 3 decimals, so quantizing to
        // milliseconds makes an exact dedup key.
        let mut seen: HashSet<(i64, String)> = HashSet::new();
        let mut records: Vec<(f64, String)> = Vec::new();
        for (timestamp, term) in found {
            if seen.insert(((timestamp * 1000.0).round() as i64, term.clone())) {
                records.push((timestamp, term));
            }
        }
        records.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        });

        records
            .into_iter()
            .map(|(timestamp, context)| MatchRecord::Timed { timestamp, context })
            .collect()
    }

    /// Plain mode: each term (word or phrase) must appear with non-word
    /// boundaries on both sides somewhere in the body. Output is the
    /// sorted set of matching terms, no positions.
    pub fn match_plain(&self, body: &str) -> Vec<MatchRecord> {
        let lower = body.to_lowercase();
        self.boundary
            .iter()
            .filter(|(_, re)| re.is_match(&lower))
            .map(|(term, _)| MatchRecord::Term(term.clone()))
            .collect()
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(terms: &str) -> Matcher {
        Matcher::new(FlaggedTermSet::from_custom(terms).unwrap())
    }

    fn line(offset: f64, text: &str) -> SyncedLine {
        SyncedLine {
            offset_seconds: offset,
            text: text.to_string(),
        }
    }

    #[test]
    fn synced_word_match_carries_timestamp() {
        let m = matcher("heck");
        let records = m.match_synced(&[line(12.345, "Oh heck yes")]);
        assert_eq!(
            records,
            vec![MatchRecord::Timed {
                timestamp: 12.345,
                context: "heck".to_string()
            }]
        );
    }

    #[test]
    fn phrase_suppresses_its_constituent_word() {
        let m = matcher("oh heck, heck");
        let records = m.match_synced(&[line(12.345, "oh heck yes")]);
        // The phrase wins; the standalone word is not double-reported.
        assert_eq!(
            records,
            vec![MatchRecord::Timed {
                timestamp: 12.345,
                context: "oh heck".to_string()
            }]
        );
    }

    #[test]
    fn word_outside_matched_phrase_still_reports() {
        let m = matcher("oh heck, darn");
        let records = m.match_synced(&[line(3.0, "oh heck you darn thing")]);
        assert_eq!(records.len(), 2);
        assert!(records.contains(&MatchRecord::Timed {
            timestamp: 3.0,
            context: "oh heck".to_string()
        }));
        assert!(records.contains(&MatchRecord::Timed {
            timestamp: 3.0,
            context: "darn".to_string()
        }));
    }

    #[test]
    fn synced_records_deduplicate_and_sort_by_timestamp() {
        let m = matcher("heck");
        let records = m.match_synced(&[
            line(20.0, "heck heck heck"),
            line(5.0, "a heck again"),
            line(20.0, "heck"),
        ]);
        assert_eq!(
            records,
            vec![
                MatchRecord::Timed {
                    timestamp: 5.0,
                    context: "heck".to_string()
                },
                MatchRecord::Timed {
                    timestamp: 20.0,
                    context: "heck".to_string()
                },
            ]
        );
    }

    #[test]
    fn synced_tokenization_enforces_word_boundaries() {
        let m = matcher("ass");
        assert!(m.match_synced(&[line(1.0, "this class is great")]).is_empty());
        assert_eq!(m.match_synced(&[line(1.0, "you are an ass")]).len(), 1);
    }

    #[test]
    fn plain_mode_is_boundary_safe() {
        let m = matcher("ass");
        assert!(m.match_plain("this class is great").is_empty());
        assert_eq!(
            m.match_plain("you are an ass"),
            vec![MatchRecord::Term("ass".to_string())]
        );
    }

    #[test]
    fn plain_mode_matches_phrases_and_case_folds() {
        let m = matcher("bloody heck, darn");
        let records = m.match_plain("BLOODY HECK!\nwhat a Darn day");
        assert_eq!(
            records,
            vec![
                MatchRecord::Term("bloody heck".to_string()),
                MatchRecord::Term("darn".to_string()),
            ]
        );
    }

    #[test]
    fn plain_mode_reports_each_term_once() {
        let m = matcher("darn");
        assert_eq!(m.match_plain("darn darn darn").len(), 1);
    }

    #[test]
    fn matching_is_idempotent() {
        let m = matcher("oh heck, heck, darn");
        let lines = [line(1.5, "oh heck"), line(9.0, "darn it")];
        assert_eq!(m.match_synced(&lines), m.match_synced(&lines));
        assert_eq!(m.match_plain("oh heck darn"), m.match_plain("oh heck darn"));
    }

    #[test]
    fn timed_and_plain_records_serialize_differently() {
        let timed = MatchRecord::Timed {
            timestamp: 12.345,
            context: "heck".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&timed).unwrap(),
            r#"{"timestamp":12.345,"context":"heck"}"#
        );
        let plain = MatchRecord::Term("heck".to_string());
        assert_eq!(serde_json::to_string(&plain).unwrap(), r#""heck""#);
    }
}
