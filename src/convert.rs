//! Orchestrators: wire the Ogg and CAF sides together, managing
//! granule position and preserving sample-rate/channel/pre-skip metadata.

use crate::caf::{build_caf_bytes, parse_caf, CafBuildInput};
use crate::codec::FourCc;
use crate::config::ConvertOptions;
use crate::error::{ConvertError, Result};
use crate::ogg::{build_ogg_stream, frame_size_from_toc, read_headers, OggBuildInput, OggReader};

const OPUS_TAGS_SIGNATURE: &[u8; 8] = b"OpusTags";

struct OpusAudio {
    packet_sizes: Vec<u32>,
    audio_data: Vec<u8>,
    frame_size: u32,
}

/// Walk the remaining pages of an Ogg-OPUS stream after the ID page,
/// skipping the comment (`OpusTags`) page, collecting packet sizes and the
/// concatenated packet bytes, and deriving the OPUS frame size from the
/// first audio packet's TOC byte.
fn read_opus_data(reader: &mut OggReader<'_>, sample_rate: u32) -> Result<OpusAudio> {
    let mut packet_sizes = Vec::new();
    let mut audio_data = Vec::new();
    let mut frame_size = None;

    loop {
        let page = match reader.parse_next_page() {
            Ok(page) => page,
            Err(ConvertError::ShortPageHeader) => break,
            Err(e) => return Err(e),
        };

        let is_tags_page = page
            .packets
            .first()
            .map(|p| p.len() >= 8 && &p[0..8] == OPUS_TAGS_SIGNATURE)
            .unwrap_or(false);
        if is_tags_page {
            continue;
        }

        if frame_size.is_none() {
            if let Some(first_byte) = page.packets.first().and_then(|p| p.first()) {
                frame_size = Some(frame_size_from_toc(*first_byte, sample_rate));
            }
        }

        for packet in &page.packets {
            packet_sizes.push(packet.len() as u32);
            audio_data.extend_from_slice(packet);
        }
    }

    Ok(OpusAudio {
        packet_sizes,
        audio_data,
        frame_size: frame_size.unwrap_or(0),
    })
}

/// Convert a buffered Ogg-OPUS stream to a buffered CAF file.
pub fn ogg_to_caf(input: &[u8]) -> Result<Vec<u8>> {
    let mut reader = OggReader::new(input);
    let (opus_head, _serial) = read_headers(&mut reader)?;
    let audio = read_opus_data(&mut reader, opus_head.input_sample_rate)?;

    tracing::info!(
        input_bytes = input.len(),
        packets = audio.packet_sizes.len(),
        frame_size = audio.frame_size,
        "converting Ogg to CAF"
    );

    let caf_input = CafBuildInput {
        sample_rate: opus_head.input_sample_rate,
        channels: opus_head.channels,
        frame_size: audio.frame_size,
        audio_data: &audio.audio_data,
        packet_sizes: &audio.packet_sizes,
    };
    let bytes = build_caf_bytes(&caf_input);

    tracing::info!(output_bytes = bytes.len(), "Ogg to CAF conversion complete");
    Ok(bytes)
}

/// Convert a buffered CAF file to a buffered Ogg-OPUS stream.
pub fn caf_to_ogg(input: &[u8], options: &ConvertOptions) -> Result<Vec<u8>> {
    let caf = parse_caf(input)?;
    let desc = caf.desc()?;
    let pakt = caf.pakt()?;
    let data = caf.data()?;

    if desc.format_id != FourCc::new("opus") {
        tracing::warn!(
            format = %desc.format_id,
            "CAF formatID is not opus; converting anyway per input packet table"
        );
    }

    let serial = options.resolve_serial();

    tracing::info!(
        input_bytes = input.len(),
        packets = pakt.sizes.len(),
        sample_rate = desc.sample_rate,
        "converting CAF to Ogg"
    );

    let build_input = OggBuildInput {
        channels: desc.channels_per_packet as u8,
        sample_rate: desc.sample_rate as u32,
        frame_size: desc.frames_per_packet,
        packet_sizes: &pakt.sizes,
        audio_data: &data.data,
        serial,
        vendor: &options.vendor,
        repackage_granule: options.repackage_granule,
    };
    let bytes = build_ogg_stream(&build_input)?;

    tracing::info!(output_bytes = bytes.len(), "CAF to Ogg conversion complete");
    Ok(bytes)
}
