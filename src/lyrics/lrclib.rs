//! LRCLIB API client
//!
//! LRCLIB is a free lyrics API that provides synchronized (LRC format)
//! lyrics alongside a plain-text body. We issue exactly one `/get` lookup
//! per track, keyed by (title, artist, album, truncated duration); any
//! failure degrades to an empty lookup so the caller can fall back.
//! API Documentation: https://lrclib.net/docs

use crate::lyrics::parser::{self, SyncedLine};
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// LRCLIB `/get` response. Absent fields stay `None`; "field absent" and
/// "field present but unparsable" are distinct states downstream.
#[derive(Debug, Deserialize, Clone)]
pub struct LrclibResponse {
    id: Option<i64>,
    #[serde(rename = "plainLyrics")]
    plain_lyrics: Option<String>,
    #[serde(rename = "syncedLyrics")]
    synced_lyrics: Option<String>,
}

/// Outcome of a single LRCLIB lookup.
#[derive(Debug, Clone, Default)]
pub struct LrclibLookup {
    /// Parsed synced lines, when the synced field was present and parsable.
    pub synced: Option<Vec<SyncedLine>>,
    /// Plain lyrics body, extracted independently of synced-parse success.
    pub plain: Option<String>,
    /// Canonical link to the record, derived from the provider id.
    pub record_url: Option<String>,
}

/// LRCLIB API client
#[derive(Debug, Clone)]
pub struct LrclibClient {
    client: reqwest::Client,
    base_url: String,
}

impl LrclibClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://lrclib.net/api";
    const USER_AGENT: &'static str = "lyricscreen/0.1.0 (https://github.com/lyricscreen)";

    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("build lrclib http client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Look a track up once. Network errors, timeouts and non-success
    /// statuses all yield an empty lookup (logged, never retried); the
    /// analyzer proceeds down its fallback chain.
    pub async fn fetch(
        &self,
        title: &str,
        artist: &str,
        album: &str,
        duration_seconds: f64,
    ) -> LrclibLookup {
        match self.get_exact(title, artist, album, duration_seconds).await {
            Ok(Some(resp)) => {
                let lookup = lookup_from_response(resp);
                debug!(
                    "lrclib hit for '{title}' by '{artist}': synced={} plain={}",
                    lookup.synced.is_some(),
                    lookup.plain.is_some()
                );
                lookup
            }
            Ok(None) => {
                debug!("lrclib has no record for '{title}' by '{artist}'");
                LrclibLookup::default()
            }
            Err(err) => {
                warn!("lrclib lookup failed for '{title}' by '{artist}': {err:#}");
                LrclibLookup::default()
            }
        }
    }

    async fn get_exact(
        &self,
        title: &str,
        artist: &str,
        album: &str,
        duration_seconds: f64,
    ) -> anyhow::Result<Option<LrclibResponse>> {
        let url = format!(
            "{}/get?track_name={}&artist_name={}&album_name={}&duration={}",
            self.base_url,
            urlencoding::encode(title),
            urlencoding::encode(artist),
            urlencoding::encode(album),
            duration_seconds as u64
        );

        let response = self.client.get(&url).send().await.context("send lrclib request")?;

        if response.status().is_success() {
            let body: LrclibResponse = response.json().await.context("parse lrclib json")?;
            Ok(Some(body))
        } else if response.status() == reqwest::StatusCode::NOT_FOUND {
            Ok(None)
        } else {
            anyhow::bail!("lrclib api error: {}", response.status());
        }
    }
}

fn lookup_from_response(resp: LrclibResponse) -> LrclibLookup {
    let record_url = resp.id.map(|id| format!("https://lrclib.net/track/{id}"));

    // An empty or unparsable synced field yields None even when plain
    // lyrics are present.
    let synced = resp
        .synced_lyrics
        .as_deref()
        .and_then(parser::parse_synced);

    let plain = resp.plain_lyrics.filter(|p| !p.trim().is_empty());

    LrclibLookup {
        synced,
        plain,
        record_url,
    }
}
