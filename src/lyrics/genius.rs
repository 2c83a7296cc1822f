//! Genius fallback lyrics client.
//!
//! Best-effort full-text provider used only when LRCLIB yields nothing
//! usable. Requires an API token; without one the client is disabled and
//! every fetch reports not-found without touching the network. Lookup is a
//! `/search` call for the best matching song followed by a scrape of the
//! song page's lyrics containers.

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchBody,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "type", default)]
    kind: String,
    result: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    url: String,
}

/// Genius API client. Construct once per run; `new` logs the disabled
/// state so a missing token is reported once, not per track.
#[derive(Debug, Clone)]
pub struct GeniusClient {
    client: reqwest::Client,
    api_base_url: String,
    token: Option<String>,
}

impl GeniusClient {
    pub const DEFAULT_API_BASE_URL: &'static str = "https://api.genius.com";
    const USER_AGENT: &'static str = "lyricscreen/0.1.0 (https://github.com/lyricscreen)";

    pub fn new(token: Option<String>, timeout_secs: u64) -> anyhow::Result<Self> {
        let token = token.filter(|t| !t.trim().is_empty());
        if token.is_none() {
            info!("genius token not configured; fallback lyrics provider disabled");
        }

        let client = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("build genius http client")?;

        Ok(Self {
            client,
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            token,
        })
    }

    /// Fetch a plain lyrics body (lowercased) and its record URL.
    ///
    /// Unconfigured client, lookup failure and no-hit all collapse to
    /// `(None, None)`; the provider is best-effort and never retried.
    pub async fn fetch(&self, title: &str, artist: &str) -> (Option<String>, Option<String>) {
        let Some(token) = self.token.clone() else {
            return (None, None);
        };

        match self.lookup(&token, title, artist).await {
            Ok(Some((body, url))) => (Some(body), Some(url)),
            Ok(None) => {
                debug!("genius has no lyrics for '{title}' by '{artist}'");
                (None, None)
            }
            Err(err) => {
                warn!("genius fetch failed for '{title}' by '{artist}': {err:#}");
                (None, None)
            }
        }
    }

    async fn lookup(
        &self,
        token: &str,
        title: &str,
        artist: &str,
    ) -> anyhow::Result<Option<(String, String)>> {
        let query = format!("{title} {artist}");
        let url = format!(
            "{}/search?q={}",
            self.api_base_url,
            urlencoding::encode(&query)
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .context("send genius search request")?
            .error_for_status()
            .context("genius search http status")?;

        let payload: SearchResponse = response.json().await.context("parse genius search json")?;

        let Some(song_url) = payload
            .response
            .hits
            .into_iter()
            .find(|hit| hit.kind.eq_ignore_ascii_case("song") && !hit.result.url.trim().is_empty())
            .map(|hit| hit.result.url)
        else {
            return Ok(None);
        };

        let page = self
            .client
            .get(&song_url)
            .send()
            .await
            .context("fetch genius song page")?
            .error_for_status()
            .context("genius song page http status")?
            .text()
            .await
            .context("read genius song page")?;

        Ok(extract_lyrics(&page).map(|body| (body.to_lowercase(), song_url)))
    }
}

static LYRICS_CONTAINER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<div[^>]*data-lyrics-container="true"[^>]*>(.*?)</div>"#)
        .expect("valid regex")
});
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Pull the lyrics text out of a Genius song page.
fn extract_lyrics(html: &str) -> Option<String> {
    let mut body = String::new();

    for caps in LYRICS_CONTAINER.captures_iter(html) {
        let block = caps[1].replace("<br/>", "\n").replace("<br>", "\n");
        let text = HTML_TAG.replace_all(&block, "");
        body.push_str(&decode_entities(&text));
        body.push('\n');
    }

    let body = body.trim().to_string();
    if body.is_empty() { None } else { Some(body) }
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
}
