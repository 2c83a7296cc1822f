//! Lyrics acquisition: title cleanup, providers and payload parsing.
//!
//! Two heterogeneous providers feed the analyzer: LRCLIB (synced lines plus
//! an optional plain body) and Genius (plain text only, token-gated). Each
//! is queried at most once per track; failures degrade to not-found.

pub mod genius;
pub mod lrclib;
pub mod normalize;
pub mod parser;

pub use genius::GeniusClient;
pub use lrclib::{LrclibClient, LrclibLookup};
pub use normalize::clean_track_title;
pub use parser::SyncedLine;
