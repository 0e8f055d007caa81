//! opuscaf - lossless container repackaging between Ogg and CAF for OPUS audio
//!
//! The core is a pair of bidirectional transcoders: Ogg page parsing/building
//! (`ogg`) and CAF chunk parsing/building (`caf`), wired together by
//! `convert`. Only container framing, packet tables, and metadata are
//! rewritten; OPUS packets are copied verbatim.

pub mod caf;
pub mod cli;
pub mod codec;
pub mod config;
pub mod convert;
pub mod crc;
pub mod error;
pub mod ogg;

pub use config::ConvertOptions;
pub use convert::{caf_to_ogg, ogg_to_caf};
pub use error::{ChunkKind, ConvertError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "opuscaf";
