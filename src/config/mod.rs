use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment fallback for the Genius token, so the secret can stay out
/// of the config file.
const GENIUS_TOKEN_ENV: &str = "GENIUS_ACCESS_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub lyrics: LyricsConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// LRCLIB API base URL.
    pub lrclib_base_url: String,
    /// Per-request timeout for lyrics providers, in seconds.
    pub request_timeout_secs: u64,
    /// Genius API access token. Falls back to GENIUS_ACCESS_TOKEN.
    pub genius_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory holding default_<lang>.txt word lists.
    pub wordlist_dir: PathBuf,
    /// Courtesy pause between tracks in a batch, milliseconds.
    pub pause_between_tracks_ms: u64,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            lrclib_base_url: crate::lyrics::LrclibClient::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            genius_token: None,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            wordlist_dir: PathBuf::from("wordlists"),
            pause_between_tracks_ms: 50,
        }
    }
}

impl Config {
    /// Effective Genius token: config value first, environment second.
    pub fn genius_token(&self) -> Option<String> {
        self.lyrics
            .genius_token
            .clone()
            .or_else(|| std::env::var(GENIUS_TOKEN_ENV).ok())
            .filter(|t| !t.trim().is_empty())
    }
}

pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(&path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "lyricscreen", "lyricscreen")
        .context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
        }
        let cfg = Config::default();
        let raw = toml::to_string_pretty(&cfg).context("serialize default config")?;
        fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&path, fs::Permissions::from_mode(0o600));
        }
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let cfg = Config::default();
        assert_eq!(cfg.lyrics.lrclib_base_url, "https://lrclib.net/api");
        assert_eq!(cfg.lyrics.request_timeout_secs, 10);
        assert_eq!(cfg.analysis.pause_between_tracks_ms, 50);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[analysis]
pause_between_tracks_ms = 0
"#,
        )
        .unwrap();
        assert_eq!(cfg.analysis.pause_between_tracks_ms, 0);
        assert_eq!(cfg.lyrics.request_timeout_secs, 10);
    }

    #[test]
    fn blank_config_token_is_ignored() {
        let mut cfg = Config::default();
        cfg.lyrics.genius_token = Some("   ".to_string());
        // Env may or may not supply one; a blank config value alone must not.
        if std::env::var(GENIUS_TOKEN_ENV).is_err() {
            assert_eq!(cfg.genius_token(), None);
        }
    }
}
