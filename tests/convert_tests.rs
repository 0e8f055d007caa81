mod common;

use common::{sample_caf_opus, sample_ogg_opus};
use opuscaf::caf::parse_caf;
use opuscaf::codec::{decode_varint, encode_varint};
use opuscaf::ogg::OggReader;
use opuscaf::{caf_to_ogg, ogg_to_caf, ConvertOptions};

/// Invariant 1: converting Ogg -> CAF -> Ogg preserves the sequence of OPUS
/// packet payloads.
#[test]
fn ogg_caf_ogg_round_trip_preserves_packet_payloads() {
    let ogg = sample_ogg_opus(5);
    let caf_bytes = ogg_to_caf(&ogg).unwrap();

    let options = ConvertOptions {
        serial: Some(1),
        ..ConvertOptions::default()
    };
    let ogg_again = caf_to_ogg(&caf_bytes, &options).unwrap();

    let packets_of = |bytes: &[u8]| -> Vec<Vec<u8>> {
        let mut reader = OggReader::new(bytes);
        reader.parse_next_page().unwrap(); // id
        reader.parse_next_page().unwrap(); // tags
        let mut packets = Vec::new();
        while let Ok(page) = reader.parse_next_page() {
            packets.extend(page.packets);
        }
        packets
    };

    assert_eq!(packets_of(&ogg), packets_of(&ogg_again));
}

/// Invariant 2: converting CAF -> Ogg -> CAF preserves the `data` chunk
/// payload and the packet-size sequence.
#[test]
fn caf_ogg_caf_round_trip_preserves_data_and_sizes() {
    let caf = sample_caf_opus(4);
    let options = ConvertOptions {
        serial: Some(7),
        ..ConvertOptions::default()
    };
    let ogg = caf_to_ogg(&caf, &options).unwrap();
    let caf_again = ogg_to_caf(&ogg).unwrap();

    let original = parse_caf(&caf).unwrap();
    let roundtripped = parse_caf(&caf_again).unwrap();

    assert_eq!(
        original.data().unwrap().data,
        roundtripped.data().unwrap().data
    );
    assert_eq!(
        original.pakt().unwrap().sizes,
        roundtripped.pakt().unwrap().sizes
    );
}

/// Invariant 3: varint encode/decode round-trips and is minimum-length.
#[test]
fn varint_round_trips_for_arbitrary_sizes() {
    for size in [0u64, 1, 2, 126, 127, 128, 200, 16383, 16384, 1_000_000, u32::MAX as u64] {
        let encoded = encode_varint(size);
        let (decoded, consumed) = decode_varint(&encoded).unwrap();
        assert_eq!(decoded, size);
        assert_eq!(consumed, encoded.len());
        // Minimum length: re-encoding from the decoded value matches.
        assert_eq!(encode_varint(decoded), encoded);
    }
}

/// Invariant 4 & 5: every emitted Ogg page has a verifiable CRC and a
/// segment table within bounds.
#[test]
fn emitted_pages_have_valid_crc_and_bounded_segments() {
    let ogg = sample_ogg_opus(50);
    let mut pos = 0usize;
    while pos + 27 <= ogg.len() {
        let segments_count = ogg[pos + 26] as usize;
        assert!((1..=255).contains(&segments_count));

        let table = &ogg[pos + 27..pos + 27 + segments_count];
        let body_len: usize = table.iter().map(|&b| b as usize).sum();
        assert!(body_len <= 65025);

        let page_len = 27 + segments_count + body_len;
        let mut page = ogg[pos..pos + page_len].to_vec();
        let stored_crc = u32::from_le_bytes(page[22..26].try_into().unwrap());
        page[22..26].copy_from_slice(&[0, 0, 0, 0]);
        assert_eq!(opuscaf::crc::crc32(&page), stored_crc);

        pos += page_len;
    }
    assert_eq!(pos, ogg.len());
}

/// Invariant 6: CAF output has `data.size == len(audioData)+4` and
/// `pakt.numberPackets` equal to the varint count.
#[test]
fn caf_data_and_pakt_sizes_are_consistent() {
    let ogg = sample_ogg_opus(10);
    let caf_bytes = ogg_to_caf(&ogg).unwrap();
    let caf = parse_caf(&caf_bytes).unwrap();

    let data_chunk = caf.data().unwrap();
    let pakt = caf.pakt().unwrap();
    let summed_packet_sizes: u32 = pakt.sizes.iter().sum();
    assert_eq!(data_chunk.data.len() as u32, summed_packet_sizes);
    assert_eq!(pakt.sizes.len(), pakt.number_packets() as usize);
}

/// Boundary: a packet of size exactly 255*k requires k+1 lacing bytes
/// ending with a zero, and a two-packet stream ends in a single terminal
/// page.
#[test]
fn two_packet_stream_ends_in_single_terminal_page() {
    let input = opuscaf::ogg::OggBuildInput {
        channels: 1,
        sample_rate: 48000,
        frame_size: 960,
        packet_sizes: &[10, 10],
        audio_data: &[0u8; 20],
        serial: 55,
        vendor: "opuscaf",
        repackage_granule: true,
    };
    let bytes = opuscaf::ogg::build_ogg_stream(&input).unwrap();

    let mut reader = OggReader::new(&bytes);
    reader.parse_next_page().unwrap();
    reader.parse_next_page().unwrap();
    let audio_page = reader.parse_next_page().unwrap();
    assert_eq!(audio_page.header.header_type & 0x04, 0x04);
    assert!(matches!(
        reader.parse_next_page(),
        Err(opuscaf::ConvertError::ShortPageHeader)
    ));
}

/// S6: `parse_next_page` reports `ShortPageHeader` for a truncated stream.
#[test]
fn short_page_header_is_reported_for_truncated_stream() {
    let ogg = sample_ogg_opus(1);
    let mut reader = OggReader::new(&ogg[..5]);
    assert!(matches!(
        reader.parse_next_page(),
        Err(opuscaf::ConvertError::ShortPageHeader)
    ));
}

/// FourCC equality and sentinel-collapse vectors.
#[test]
fn fourcc_vectors() {
    use opuscaf::codec::FourCc;
    assert_eq!(FourCc::new("test").0, [0x74, 0x65, 0x73, 0x74]);
    assert_eq!(FourCc::new("ab").0, [0, 0, 0, 0]);
    assert_ne!(FourCc::new("ab"), FourCc::new("caff"));
}
