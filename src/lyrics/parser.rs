//! Synced lyrics payload parser.
//!
//! Providers return synced lyrics as one timestamped line per row:
//!
//! [00:12.34] Hello world
//! [00:15.00] Another line
//!
//! Each line becomes an offset in seconds plus the trimmed text. Rows that
//! do not match the pattern (metadata tags, blank rows, malformed stamps)
//! are dropped silently.

use once_cell::sync::Lazy;
use regex::Regex;

/// A single lyrics line with its playback offset.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncedLine {
    /// Seconds from the start of the track.
    pub offset_seconds: f64,
    pub text: String,
}

static TIMED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d+):(\d+\.\d+)\]\s*(.*)").expect("valid regex"));

/// Parse a synced lyrics payload into ordered (offset, text) lines.
///
/// Returns `None` when no line parses; an unparsable synced field must not
/// be mistaken for an empty-but-present one by callers.
pub fn parse_synced(payload: &str) -> Option<Vec<SyncedLine>> {
    let mut lines = Vec::new();

    for caps in TIMED_LINE.captures_iter(payload) {
        let (Ok(minutes), Ok(seconds)) = (caps[1].parse::<u64>(), caps[2].parse::<f64>()) else {
            continue;
        };
        lines.push(SyncedLine {
            offset_seconds: minutes as f64 * 60.0 + seconds,
            text: caps[3].trim().to_string(),
        });
    }

    if lines.is_empty() { None } else { Some(lines) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timestamped_lines() {
        let payload = "[00:12.34] First line\n[01:15.00] Second line\n";
        let lines = parse_synced(payload).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].offset_seconds, 12.34);
        assert_eq!(lines[0].text, "First line");
        assert_eq!(lines[1].offset_seconds, 75.0);
    }

    #[test]
    fn drops_rows_that_do_not_match() {
        let payload = "[ti:Title]\n[00:05.50] Real line\nno stamp here\n[bad] nope\n";
        let lines = parse_synced(payload).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Real line");
    }

    #[test]
    fn keeps_empty_line_text() {
        // Instrumental gaps come through as stamped empty lines.
        let lines = parse_synced("[00:30.00]\n").unwrap();
        assert_eq!(lines[0].text, "");
    }

    #[test]
    fn unparsable_payload_is_none() {
        assert!(parse_synced("").is_none());
        assert!(parse_synced("just some plain lyrics\nwith no stamps").is_none());
        // Whole-second stamps without a fractional part are not the synced format.
        assert!(parse_synced("[00:12] text").is_none());
    }
}
