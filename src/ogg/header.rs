//! Ogg header reader: validates the ID page and decodes `OpusHead`.

use crate::codec::{read_u16_le, read_u32_le};
use crate::error::{ConvertError, Result};
use crate::ogg::page::{OggReader, HEADER_BEGINNING_OF_STREAM};

const OPUS_HEAD_LEN: usize = 19;
const OPUS_HEAD_SIGNATURE: &[u8; 8] = b"OpusHead";

#[derive(Debug, Clone, Copy)]
pub struct OpusHead {
    pub version: u8,
    pub channels: u8,
    pub pre_skip: u16,
    pub input_sample_rate: u32,
    pub output_gain: i16,
    pub channel_mapping_family: u8,
}

/// Read and validate the ID page, returning the decoded `OpusHead` and the
/// stream's serial number (needed by the audio-extraction loop to recognize
/// pages belonging to this logical stream).
pub fn read_headers(reader: &mut OggReader<'_>) -> Result<(OpusHead, u32)> {
    let page = reader.parse_next_page().map_err(|e| match e {
        // Running out of input on the very first page is fatal, not EOF.
        ConvertError::ShortPageHeader => ConvertError::BadIDPageSignature,
        other => other,
    })?;

    if page.header.header_type != HEADER_BEGINNING_OF_STREAM {
        return Err(ConvertError::BadIDPageType);
    }

    if page.packets.len() != 1 || page.packets[0].len() != OPUS_HEAD_LEN {
        return Err(ConvertError::BadIDPageLength);
    }

    let segment = &page.packets[0];
    if &segment[0..8] != OPUS_HEAD_SIGNATURE {
        return Err(ConvertError::BadIDPagePayloadSignature);
    }

    let head = OpusHead {
        version: segment[8],
        channels: segment[9],
        pre_skip: read_u16_le(&segment[10..12]),
        input_sample_rate: read_u32_le(&segment[12..16]),
        output_gain: read_u16_le(&segment[16..18]) as i16,
        channel_mapping_family: segment[18],
    };

    tracing::debug!(
        channels = head.channels,
        sample_rate = head.input_sample_rate,
        pre_skip = head.pre_skip,
        "parsed OpusHead"
    );

    Ok((head, page.header.serial))
}
