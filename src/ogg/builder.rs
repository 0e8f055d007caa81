//! Ogg page builder: lace OPUS packets into pages and emit them with
//! CRC-32 checksums.

use crate::error::{ConvertError, Result};
use crate::ogg::page::{
    encode_header_unchecksummed, finalize_checksum, OggPageHeader, HEADER_BEGINNING_OF_STREAM,
    HEADER_CONTINUATION, HEADER_END_OF_STREAM,
};

const MAX_SEGMENTS: usize = 255;
const MAX_BODY: usize = MAX_SEGMENTS * 255; // 65025

/// Inputs needed to rebuild an Ogg-OPUS stream from a flat packet list.
pub struct OggBuildInput<'a> {
    pub channels: u8,
    pub sample_rate: u32,
    pub frame_size: u32,
    pub packet_sizes: &'a [u32],
    pub audio_data: &'a [u8],
    pub serial: u32,
    pub vendor: &'a str,
    /// When true, advance the granule position by `frame_size` per packet
    /// directly; when false, rescale to 48kHz samples.
    pub repackage_granule: bool,
}

/// Lacing values for a single packet of `size` bytes, per the rule that a
/// packet whose size is an exact positive multiple of 255 ends with a
/// trailing zero-length segment.
fn lacing_for_packet(size: usize) -> Vec<u8> {
    if size == 0 {
        return vec![0];
    }
    let mut segments = Vec::new();
    let mut remaining = size;
    while remaining >= 255 {
        segments.push(255);
        remaining -= 255;
    }
    segments.push(remaining as u8);
    segments
}

struct PageAccumulator {
    segments: Vec<u8>,
    body: Vec<u8>,
    page_index: u32,
    header_type: u8,
}

impl PageAccumulator {
    fn new(page_index: u32, header_type: u8) -> Self {
        PageAccumulator {
            segments: Vec::new(),
            body: Vec::new(),
            page_index,
            header_type,
        }
    }

    fn flush(&mut self, serial: u32, granule: i64, out: &mut Vec<u8>) {
        if self.segments.is_empty() {
            return;
        }
        let header = OggPageHeader {
            version: 0,
            header_type: self.header_type,
            granule_position: granule,
            serial,
            page_index: self.page_index,
            checksum: 0,
            segment_table: std::mem::take(&mut self.segments),
        };
        let mut bytes = encode_header_unchecksummed(&header);
        bytes.extend_from_slice(&self.body);
        out.extend_from_slice(&finalize_checksum(bytes));
        self.body.clear();
    }
}

/// Build the full byte sequence of an Ogg-OPUS stream: ID page, comment
/// page, then audio pages carrying the packets reconstituted from
/// `packet_sizes`/`audio_data`.
///
/// Fails with `PacketTableMismatch` if `packet_sizes` doesn't sum to
/// exactly `audio_data.len()` — a malformed or adversarial CAF packet
/// table would otherwise reconstitute packets with an out-of-bounds slice.
pub fn build_ogg_stream(input: &OggBuildInput<'_>) -> Result<Vec<u8>> {
    let total: usize = input.packet_sizes.iter().map(|&s| s as usize).sum();
    if total != input.audio_data.len() {
        return Err(ConvertError::PacketTableMismatch {
            expected: total,
            actual: input.audio_data.len(),
        });
    }

    let mut out = Vec::new();

    // Step 2: OpusHead page.
    let mut id_body = Vec::with_capacity(19);
    id_body.extend_from_slice(b"OpusHead");
    id_body.push(1);
    id_body.push(input.channels);
    // Preserved source quirk: pre-skip is written as the per-packet frame
    // size rather than the decoder-delay sample count RFC 7845 defines.
    id_body.extend_from_slice(&(input.frame_size as u16).to_le_bytes());
    id_body.extend_from_slice(&input.sample_rate.to_le_bytes());
    id_body.extend_from_slice(&0u16.to_le_bytes());
    id_body.push(0);

    let id_header = OggPageHeader {
        version: 0,
        header_type: HEADER_BEGINNING_OF_STREAM,
        granule_position: 0,
        serial: input.serial,
        page_index: 0,
        checksum: 0,
        segment_table: vec![id_body.len() as u8],
    };
    let mut id_bytes = encode_header_unchecksummed(&id_header);
    id_bytes.extend_from_slice(&id_body);
    out.extend_from_slice(&finalize_checksum(id_bytes));

    // Step 3: OpusTags page.
    let mut tags_body = Vec::new();
    tags_body.extend_from_slice(b"OpusTags");
    tags_body.extend_from_slice(&(input.vendor.len() as u32).to_le_bytes());
    tags_body.extend_from_slice(input.vendor.as_bytes());
    tags_body.extend_from_slice(&0u32.to_le_bytes());

    let tags_header = OggPageHeader {
        version: 0,
        header_type: 0x00,
        granule_position: 0,
        serial: input.serial,
        page_index: 1,
        checksum: 0,
        segment_table: vec![tags_body.len() as u8],
    };
    let mut tags_bytes = encode_header_unchecksummed(&tags_header);
    tags_bytes.extend_from_slice(&tags_body);
    out.extend_from_slice(&finalize_checksum(tags_bytes));

    // Step 1: reconstitute packets from the flat audio buffer.
    let mut packets = Vec::with_capacity(input.packet_sizes.len());
    let mut cursor = 0usize;
    for &size in input.packet_sizes {
        let size = size as usize;
        packets.push(&input.audio_data[cursor..cursor + size]);
        cursor += size;
    }

    // Step 4: audio pages.
    let mut page_index = 2u32;
    let mut granule: i64 = 0;
    let granule_step = if input.repackage_granule {
        input.frame_size as i64
    } else if input.sample_rate == 0 {
        0
    } else {
        (input.frame_size as i64 * 48_000) / input.sample_rate as i64
    };

    let mut acc = PageAccumulator::new(page_index, HEADER_CONTINUATION);
    let last = packets.len().saturating_sub(1);

    for (i, packet) in packets.iter().enumerate() {
        let lacing = lacing_for_packet(packet.len());
        let mut offset = 0usize;
        for &seg_lacing in &lacing {
            let seg_len = seg_lacing as usize;
            if acc.segments.len() == MAX_SEGMENTS || acc.body.len() + seg_len > MAX_BODY {
                acc.flush(input.serial, granule, &mut out);
                page_index += 1;
                acc.page_index = page_index;
                acc.header_type = 0x00;
            }
            acc.segments.push(seg_lacing);
            acc.body.extend_from_slice(&packet[offset..offset + seg_len]);
            offset += seg_len;
        }
        granule += granule_step;

        if i == last {
            acc.header_type = HEADER_END_OF_STREAM;
            acc.flush(input.serial, granule, &mut out);
        }
    }

    // No audio packets at all: still emit a terminal empty page so the
    // stream has a well-formed end-of-stream marker.
    if packets.is_empty() {
        acc.header_type = HEADER_END_OF_STREAM;
        acc.flush(input.serial, granule, &mut out);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ogg::page::OggReader;

    fn build(packet_sizes: &[u32], audio_data: &[u8]) -> Vec<u8> {
        let input = OggBuildInput {
            channels: 1,
            sample_rate: 48000,
            frame_size: 960,
            packet_sizes,
            audio_data,
            serial: 777,
            vendor: "opuscaf",
            repackage_granule: true,
        };
        build_ogg_stream(&input).unwrap()
    }

    #[test]
    fn emits_id_and_tags_pages_first() {
        let data = vec![0xAAu8; 10];
        let bytes = build(&[10], &data);
        let mut reader = OggReader::new(&bytes);
        let id_page = reader.parse_next_page().unwrap();
        assert_eq!(id_page.header.page_index, 0);
        assert_eq!(id_page.packets[0][0..8], *b"OpusHead");
        let tags_page = reader.parse_next_page().unwrap();
        assert_eq!(tags_page.header.page_index, 1);
        assert_eq!(tags_page.packets[0][0..8], *b"OpusTags");
    }

    #[test]
    fn two_packets_end_in_single_terminal_page() {
        let data = vec![1u8, 2, 3, 4];
        let bytes = build(&[2, 2], &data);
        let mut reader = OggReader::new(&bytes);
        reader.parse_next_page().unwrap(); // id
        reader.parse_next_page().unwrap(); // tags
        let audio = reader.parse_next_page().unwrap();
        assert_eq!(audio.header.header_type & HEADER_END_OF_STREAM, HEADER_END_OF_STREAM);
        assert_eq!(audio.packets.len(), 2);
        assert_eq!(audio.packets[0], vec![1, 2]);
        assert_eq!(audio.packets[1], vec![3, 4]);
    }

    #[test]
    fn exact_multiple_of_255_packet_roundtrips() {
        let data = vec![7u8; 255];
        let bytes = build(&[255], &data);
        let mut reader = OggReader::new(&bytes);
        reader.parse_next_page().unwrap();
        reader.parse_next_page().unwrap();
        let audio = reader.parse_next_page().unwrap();
        assert_eq!(audio.packets[0], data);
    }

    #[test]
    fn every_page_crc_verifies() {
        let data = (0u8..=254).cycle().take(2000).collect::<Vec<u8>>();
        let sizes: Vec<u32> = std::iter::repeat(100).take(20).collect();
        let bytes = build(&sizes, &data);

        // Walk pages manually to recompute CRC over header-zeroed||body.
        let mut pos = 0usize;
        while pos + 27 <= bytes.len() {
            let segs = bytes[pos + 26] as usize;
            let table = &bytes[pos + 27..pos + 27 + segs];
            let body_len: usize = table.iter().map(|&b| b as usize).sum();
            let page_len = 27 + segs + body_len;
            let mut page = bytes[pos..pos + page_len].to_vec();
            let stored = u32::from_le_bytes(page[22..26].try_into().unwrap());
            page[22..26].copy_from_slice(&[0, 0, 0, 0]);
            assert_eq!(crate::crc::crc32(&page), stored);
            pos += page_len;
        }
        assert_eq!(pos, bytes.len());
    }

    #[test]
    fn mismatched_packet_table_is_typed_error_not_panic() {
        let input = OggBuildInput {
            channels: 1,
            sample_rate: 48000,
            frame_size: 960,
            packet_sizes: &[10, 10],
            audio_data: &[0u8; 4], // sizes claim 20 bytes, buffer only has 4
            serial: 777,
            vendor: "opuscaf",
            repackage_granule: true,
        };
        assert!(matches!(
            build_ogg_stream(&input),
            Err(ConvertError::PacketTableMismatch {
                expected: 20,
                actual: 4
            })
        ));
    }
}
