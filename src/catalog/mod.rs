//! Track records as supplied by the catalog service.
//!
//! The catalog itself (search, album/playlist expansion, auth) lives outside
//! this crate; we only consume its track objects. Optional fields may be
//! absent and are tolerated with defaults.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
}

impl Track {
    pub fn primary_artist(&self) -> &str {
        self.artists
            .first()
            .map(String::as_str)
            .filter(|a| !a.trim().is_empty())
            .unwrap_or("Unknown Artist")
    }

    pub fn album_name(&self) -> &str {
        self.album.as_deref().unwrap_or("")
    }

    /// A track is analyzable only when the catalog gave it an id and a name.
    pub fn has_identity(&self) -> bool {
        !self.id.trim().is_empty() && !self.name.trim().is_empty()
    }
}

/// Load a JSON array of tracks from a file, or stdin when the path is "-".
pub fn load_tracks(path: &Path) -> anyhow::Result<Vec<Track>> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read tracks from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
    };

    serde_json::from_str(&raw).context("parse track list json")
}
