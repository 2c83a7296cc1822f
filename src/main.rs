mod analyzer;
mod catalog;
mod config;
mod lyrics;
mod matcher;
mod words;

use anyhow::Context;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "lyricscreen",
    version,
    about = "Checks tracks, albums and playlists for flagged lyrics"
)]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a JSON track list and print a per-track report.
    Analyze {
        /// Path to a JSON array of track objects, or "-" for stdin.
        tracks: std::path::PathBuf,
        /// Custom flagged terms, comma or newline separated. Overrides --lists.
        #[arg(long)]
        words: Option<String>,
        /// Default list language codes to union, e.g. "en,de".
        #[arg(long, value_delimiter = ',')]
        lists: Vec<String>,
    },
    /// Check a single ad-hoc track (headless).
    Check {
        #[arg(long)]
        title: String,
        #[arg(long)]
        artist: String,
        #[arg(long)]
        album: Option<String>,
        /// Duration in seconds; improves provider matching.
        #[arg(long)]
        duration: Option<f64>,
        #[arg(long)]
        words: Option<String>,
        #[arg(long, value_delimiter = ',')]
        lists: Vec<String>,
    },
    /// Print the loaded default word lists.
    Lists,
    /// Manage the Genius fallback provider token.
    Auth {
        #[command(subcommand)]
        cmd: AuthCommand,
    },
}

#[derive(Debug, Subcommand)]
enum AuthCommand {
    /// Store a Genius API access token in the config.
    Token { token: String },
    /// Remove the stored token.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;

    match cli.command {
        Command::Analyze { tracks, words, lists } => {
            let track_list = catalog::load_tracks(&tracks)?;
            let terms = build_terms(&cfg, words.as_deref(), &lists)?;
            let matcher = matcher::Matcher::new(terms);
            let analyzer = analyzer::Analyzer::new(&cfg)?;
            let results = analyzer.analyze_batch(&track_list, &matcher).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Check {
            title,
            artist,
            album,
            duration,
            words,
            lists,
        } => {
            let track = catalog::Track {
                id: "adhoc".to_string(),
                name: title,
                artists: vec![artist],
                album,
                duration_seconds: duration,
            };
            let terms = build_terms(&cfg, words.as_deref(), &lists)?;
            let matcher = matcher::Matcher::new(terms);
            let analyzer = analyzer::Analyzer::new(&cfg)?;
            let result = analyzer.analyze_track(1, &track, &matcher).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Lists => {
            let defaults = words::DefaultWordLists::load(&cfg.analysis.wordlist_dir)?;
            for (lang, count) in defaults.languages() {
                println!("{lang}: {count} terms");
            }
        }
        Command::Auth { cmd } => {
            let mut cfg = cfg;
            match cmd {
                AuthCommand::Token { token } => {
                    cfg.lyrics.genius_token = Some(token);
                }
                AuthCommand::Clear => {
                    cfg.lyrics.genius_token = None;
                }
            }
            config::save(&cfg, cli.config.as_deref()).context("save config")?;
            println!("Updated Genius auth settings.");
        }
    }

    Ok(())
}

/// Custom terms win over default-list selection; both empty is an input
/// error reported before any provider is contacted.
fn build_terms(
    cfg: &config::Config,
    custom: Option<&str>,
    lists: &[String],
) -> anyhow::Result<words::FlaggedTermSet> {
    if let Some(raw) = custom
        && !raw.trim().is_empty()
    {
        return words::FlaggedTermSet::from_custom(raw);
    }
    let defaults = words::DefaultWordLists::load(&cfg.analysis.wordlist_dir)
        .context("load default word lists")?;
    words::FlaggedTermSet::from_defaults(&defaults, lists)
}
