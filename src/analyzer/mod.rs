//! Per-track analysis pipeline and the sequential batch runner.
//!
//! Each track walks a fixed priority chain: LRCLIB synced lines, then the
//! LRCLIB plain body, then the Genius fallback. The first productive source
//! wins; there is no merging and no retry. Tracks are processed one at a
//! time, in input order, with a small courtesy pause between them so the
//! rate-limited providers are not hammered.

use crate::catalog::Track;
use crate::config::Config;
use crate::lyrics::{GeniusClient, LrclibClient, LrclibLookup, clean_track_title};
use crate::matcher::{MatchRecord, Matcher};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Terminal state of one track's analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Clean,
    Explicit,
    #[serde(rename = "Lyrics Not Found")]
    LyricsNotFound,
    Error,
}

/// One result record per input track, in input order. Field names on the
/// wire match what the report consumer expects.
#[derive(Debug, Clone, Serialize)]
pub struct TrackAnalysisResult {
    pub track_number: usize,
    pub track_name: String,
    pub status: Status,
    #[serde(rename = "flagged_words")]
    pub flagged_matches: Vec<MatchRecord>,
    #[serde(rename = "lrclib_url")]
    pub source_record_url: Option<String>,
}

impl TrackAnalysisResult {
    fn new(
        track_number: usize,
        track_name: &str,
        status: Status,
        flagged_matches: Vec<MatchRecord>,
        source_record_url: Option<String>,
    ) -> Self {
        Self {
            track_number,
            track_name: track_name.to_string(),
            status,
            flagged_matches,
            source_record_url,
        }
    }

    /// Explicit when anything matched, Clean otherwise.
    fn from_matches(
        track_number: usize,
        track_name: &str,
        flagged_matches: Vec<MatchRecord>,
        source_record_url: Option<String>,
    ) -> Self {
        let status = if flagged_matches.is_empty() {
            Status::Clean
        } else {
            Status::Explicit
        };
        Self::new(track_number, track_name, status, flagged_matches, source_record_url)
    }
}

/// Drives the per-track pipeline. Holds one client per provider; both are
/// built once per run.
pub struct Analyzer {
    lrclib: LrclibClient,
    genius: GeniusClient,
    pause_between_tracks: Duration,
}

impl Analyzer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let lrclib = LrclibClient::new(&cfg.lyrics.lrclib_base_url, cfg.lyrics.request_timeout_secs)?;
        let genius = GeniusClient::new(cfg.genius_token(), cfg.lyrics.request_timeout_secs)?;
        Ok(Self {
            lrclib,
            genius,
            pause_between_tracks: Duration::from_millis(cfg.analysis.pause_between_tracks_ms),
        })
    }

    /// Analyze every track sequentially. Output count and order equal the
    /// input; numbering is 1-based. A failure inside one track becomes an
    /// Error record and the batch continues.
    pub async fn analyze_batch(
        &self,
        tracks: &[Track],
        matcher: &Matcher,
    ) -> Vec<TrackAnalysisResult> {
        info!("analyzing {} tracks with {} flagged terms", tracks.len(), matcher.term_count());

        let mut results = Vec::with_capacity(tracks.len());
        for (idx, track) in tracks.iter().enumerate() {
            let track_number = idx + 1;
            let result = match self.analyze_track(track_number, track, matcher).await {
                Ok(result) => result,
                Err(err) => {
                    warn!("unexpected failure analyzing track {track_number} '{}': {err:#}", track.name);
                    TrackAnalysisResult::new(track_number, &track.name, Status::Error, Vec::new(), None)
                }
            };
            results.push(result);

            if track_number < tracks.len() && !self.pause_between_tracks.is_zero() {
                tokio::time::sleep(self.pause_between_tracks).await;
            }
        }
        results
    }

    /// The per-track state machine: guard, normalize, then the source
    /// priority chain as an explicit sequence of attempts.
    pub async fn analyze_track(
        &self,
        track_number: usize,
        track: &Track,
        matcher: &Matcher,
    ) -> anyhow::Result<TrackAnalysisResult> {
        if !track.has_identity() {
            warn!("skipping track {track_number}: missing id or name");
            return Ok(TrackAnalysisResult::new(
                track_number,
                "Track Data Unavailable",
                Status::Error,
                Vec::new(),
                None,
            ));
        }

        let title = clean_track_title(&track.name);
        let artist = track.primary_artist();
        info!("analyzing track {track_number}: '{}' by '{artist}' (query title '{title}')", track.name);

        let lookup = self
            .lrclib
            .fetch(&title, artist, track.album_name(), track.duration_seconds.unwrap_or(0.0))
            .await;

        // The fallback provider is contacted only when LRCLIB produced
        // neither synced lines nor a plain body.
        let fallback = if lookup.synced.is_none() && lookup.plain.is_none() {
            self.genius.fetch(&title, artist).await
        } else {
            (None, None)
        };

        Ok(resolve(track_number, &track.name, matcher, lookup, fallback))
    }
}

/// Source-priority selection over already-fetched provider outcomes:
/// synced lines, then the provider's plain body, then the fallback body.
/// First productive source wins; no merging. Pure, so the chain is
/// exercised without touching the network.
fn resolve(
    track_number: usize,
    track_name: &str,
    matcher: &Matcher,
    lookup: LrclibLookup,
    fallback: (Option<String>, Option<String>),
) -> TrackAnalysisResult {
    if let Some(lines) = lookup.synced.as_deref() {
        let matches = matcher.match_synced(lines);
        return TrackAnalysisResult::from_matches(track_number, track_name, matches, lookup.record_url);
    }

    if let Some(body) = lookup.plain.as_deref() {
        let matches = matcher.match_plain(body);
        return TrackAnalysisResult::from_matches(track_number, track_name, matches, lookup.record_url);
    }

    let (body, fallback_url) = fallback;
    if let Some(body) = body {
        let matches = matcher.match_plain(&body);
        return TrackAnalysisResult::from_matches(track_number, track_name, matches, fallback_url);
    }

    // Nothing usable anywhere. Keep whatever record url we did obtain so
    // the report can still cite the provider entry.
    TrackAnalysisResult::new(
        track_number,
        track_name,
        Status::LyricsNotFound,
        Vec::new(),
        lookup.record_url.or(fallback_url),
    )
}
