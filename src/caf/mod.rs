//! CAF-side container support: chunk model, chunk reader, and builder.

pub mod builder;
pub mod chunks;

pub use builder::{build_caf_bytes, CafBuildInput};
pub use chunks::{parse_caf, AudioData, AudioDescription, CafChunk, CafFile, PacketTable};
