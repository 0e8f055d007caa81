//! Error model for container conversion
//!
//! A closed enumeration so callers can branch on kind rather than parse
//! strings, mirroring how the broader crate core keeps its failures typed.

use thiserror::Error;

/// Which CAF chunk was missing or too short/malformed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Desc,
    Pakt,
    Data,
    Chan,
}

impl std::fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChunkKind::Desc => "desc",
            ChunkKind::Pakt => "pakt",
            ChunkKind::Data => "data",
            ChunkKind::Chan => "chan",
        };
        f.write_str(name)
    }
}

/// Failure kinds across the Ogg/CAF parsers and builders.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The Ogg source ended before a full 27-byte page header could be read.
    ///
    /// Terminal during audio-data extraction (treated as end of stream),
    /// fatal during header reading.
    #[error("short Ogg page header")]
    ShortPageHeader,

    #[error("first Ogg page signature is not OggS")]
    BadIDPageSignature,

    #[error("first Ogg page header type is not beginning-of-stream (0x02)")]
    BadIDPageType,

    #[error("first Ogg page's first segment is not 19 bytes")]
    BadIDPageLength,

    #[error("first Ogg page's first segment does not begin with OpusHead")]
    BadIDPagePayloadSignature,

    #[error("required CAF chunk `{0}` not found")]
    ChunkNotFound(ChunkKind),

    #[error("varint decode overflowed or ran out of input")]
    BadVarint,

    /// The packet-table sizes don't sum to the audio payload length, so
    /// packets can't be reconstituted without reading out of bounds.
    #[error(
        "packet table sizes sum to {expected} bytes but audio payload is {actual} bytes"
    )]
    PacketTableMismatch { expected: usize, actual: usize },

    #[error("I/O failure: {0}")]
    IoFailure(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
