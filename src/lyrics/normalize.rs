//! Track title cleanup before querying lyrics providers.
//!
//! Provider catalogs index tracks by their base title; featuring credits and
//! remix/live qualifiers in the catalog title tank the hit-rate, so they are
//! stripped before lookup.

use once_cell::sync::Lazy;
use regex::Regex;

static FEAT_PAREN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+\((?:feat\.|featuring)[^)]*\)").expect("valid regex"));
static FEAT_BRACKET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+\[(?:feat\.|featuring)[^\]]*\]").expect("valid regex"));
static QUALIFIER_PAREN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+\((?:Remix|Live|Acoustic|Radio Edit)\)").expect("valid regex"));
static QUALIFIER_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+-\s+(?:Remix|Live|Acoustic|Radio Edit|From .*|Mono|Stereo)")
        .expect("valid regex")
});
static PART_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+\((?:Pt\.|Vol\.)\s*\d+\)").expect("valid regex"));

/// Strip noise qualifiers from a track title. Pure; returns the input
/// unchanged when nothing matches.
pub fn clean_track_title(title: &str) -> String {
    let mut t = title.to_string();
    for re in [
        &*FEAT_PAREN,
        &*FEAT_BRACKET,
        &*QUALIFIER_PAREN,
        &*QUALIFIER_SUFFIX,
        &*PART_MARKER,
    ] {
        t = re.replace_all(&t, "").into_owned();
    }
    t.trim_matches([' ', '-']).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_featuring_credits() {
        assert_eq!(clean_track_title("Song (feat. Someone)"), "Song");
        assert_eq!(clean_track_title("Song [feat. Someone & Other]"), "Song");
        assert_eq!(clean_track_title("Song (Featuring Someone)"), "Song");
    }

    #[test]
    fn strips_version_qualifiers() {
        assert_eq!(clean_track_title("Song (Live)"), "Song");
        assert_eq!(clean_track_title("Song (Radio Edit)"), "Song");
        assert_eq!(clean_track_title("Song - Remix"), "Song");
        assert_eq!(clean_track_title("Song - From The Motion Picture"), "Song");
        assert_eq!(clean_track_title("Song - Mono"), "Song");
    }

    #[test]
    fn strips_part_and_volume_markers() {
        assert_eq!(clean_track_title("Saga (Pt. 2)"), "Saga");
        assert_eq!(clean_track_title("Saga (Vol. 12)"), "Saga");
    }

    #[test]
    fn trims_leftover_hyphens_and_whitespace() {
        assert_eq!(clean_track_title("  Song -  "), "Song");
    }

    #[test]
    fn leaves_clean_titles_alone() {
        assert_eq!(clean_track_title("Plain Title"), "Plain Title");
        // Parenthetical that is part of the actual title.
        assert_eq!(clean_track_title("Song (I Mean It)"), "Song (I Mean It)");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(clean_track_title("   "), "");
    }
}
