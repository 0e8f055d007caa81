//! Ogg-side container support: page parsing/building, header decoding, and
//! OPUS TOC inspection.

pub mod builder;
pub mod header;
pub mod page;
pub mod toc;

pub use builder::{build_ogg_stream, OggBuildInput};
pub use header::{read_headers, OpusHead};
pub use page::{OggPage, OggPageHeader, OggReader};
pub use toc::frame_size_from_toc;
