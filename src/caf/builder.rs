//! CAF builder: assemble the fixed five-chunk sequence this converter
//! always writes: `desc`, `chan`, `info`, `data`, `pakt`, in that order.

use crate::caf::chunks::{
    AudioData, AudioDescription, CafChunk, ChannelLayout, InfoList, PacketTable, CHUNK_HEADER_LEN,
};
use crate::codec::FourCc;

const KAUDIO_CHANNEL_LAYOUT_TAG_STEREO: i32 = 6_619_138;
const KAUDIO_CHANNEL_LAYOUT_TAG_MONO: i32 = 6_553_601;

/// Everything the builder needs to assemble a CAF file from Ogg-derived data.
pub struct CafBuildInput<'a> {
    pub sample_rate: u32,
    pub channels: u8,
    pub frame_size: u32,
    pub audio_data: &'a [u8],
    pub packet_sizes: &'a [u32],
}

fn encode_chunk(fourcc: FourCc, chunk: &CafChunk) -> Vec<u8> {
    let payload = chunk.encode();
    let mut out = Vec::with_capacity(CHUNK_HEADER_LEN + payload.len());
    out.extend_from_slice(&fourcc.0);
    out.extend_from_slice(&(payload.len() as i64).to_be_bytes());
    out.extend_from_slice(&payload);
    out
}

/// Build the complete CAF byte sequence, file header included.
pub fn build_caf_bytes(input: &CafBuildInput<'_>) -> Vec<u8> {
    let desc = AudioDescription {
        sample_rate: input.sample_rate as f64,
        format_id: FourCc::new("opus"),
        format_flags: 0,
        bytes_per_packet: 0,
        frames_per_packet: input.frame_size,
        channels_per_packet: input.channels as u32,
        bits_per_channel: 0,
    };

    let chan = ChannelLayout {
        layout_tag: if input.channels == 2 {
            KAUDIO_CHANNEL_LAYOUT_TAG_STEREO
        } else {
            KAUDIO_CHANNEL_LAYOUT_TAG_MONO
        },
        bitmap: 0,
        descriptions: Vec::new(),
    };

    let info = InfoList(vec![(
        "encoder".to_string(),
        "Lavf59.27.100".to_string(),
    )]);

    let data = AudioData {
        edit_count: 0,
        data: input.audio_data.to_vec(),
    };

    let pakt = PacketTable {
        number_valid_frames: input.frame_size as i64 * input.packet_sizes.len() as i64,
        priming_frames: 0,
        remainder_frames: 0,
        sizes: input.packet_sizes.to_vec(),
    };

    tracing::debug!(
        packets = input.packet_sizes.len(),
        bytes = input.audio_data.len(),
        "assembling CAF chunk sequence"
    );

    let mut out = Vec::new();
    out.extend_from_slice(b"caff");
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());

    out.extend_from_slice(&encode_chunk(FourCc::new("desc"), &CafChunk::Desc(desc)));
    out.extend_from_slice(&encode_chunk(FourCc::new("chan"), &CafChunk::Chan(chan)));
    out.extend_from_slice(&encode_chunk(FourCc::new("info"), &CafChunk::Info(info)));
    out.extend_from_slice(&encode_chunk(FourCc::new("data"), &CafChunk::Data(data)));
    out.extend_from_slice(&encode_chunk(FourCc::new("pakt"), &CafChunk::Pakt(pakt)));

    out
}
