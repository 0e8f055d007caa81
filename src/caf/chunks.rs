//! CAF chunk model and reader.
//!
//! A chunk's payload is a sum type with one constructor per kind, with a
//! total `encode` method rather than a dynamic cast at write time.

use crate::codec::{
    decode_varint, encode_varint, read_f64_be, read_i32_be, read_i64_be, read_u32_be, FourCc,
};
use crate::error::{ChunkKind, ConvertError, Result};

pub const FILE_HEADER_LEN: usize = 8;
pub const CHUNK_HEADER_LEN: usize = 12;
pub const DESC_CHUNK_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct AudioDescription {
    pub sample_rate: f64,
    pub format_id: FourCc,
    pub format_flags: u32,
    pub bytes_per_packet: u32,
    pub frames_per_packet: u32,
    pub channels_per_packet: u32,
    pub bits_per_channel: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDescription {
    pub channel_label: u32,
    pub channel_flags: u32,
    pub coordinates: (f32, f32, f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelLayout {
    pub layout_tag: i32,
    pub bitmap: i32,
    pub descriptions: Vec<ChannelDescription>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfoList(pub Vec<(String, String)>);

#[derive(Debug, Clone, PartialEq)]
pub struct AudioData {
    pub edit_count: u32,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PacketTable {
    pub number_valid_frames: i64,
    pub priming_frames: i32,
    pub remainder_frames: i32,
    /// Per-packet sizes, decoded from the chunk's varint stream up front
    /// so downstream code never has to reinterpret raw varint bytes as
    /// already-decoded sizes.
    pub sizes: Vec<u32>,
}

impl PacketTable {
    pub fn number_packets(&self) -> i64 {
        self.sizes.len() as i64
    }
}

/// A tagged CAF chunk payload, keyed by its FourCC at the call site.
#[derive(Debug, Clone, PartialEq)]
pub enum CafChunk {
    Desc(AudioDescription),
    Chan(ChannelLayout),
    Info(InfoList),
    Data(AudioData),
    Pakt(PacketTable),
    Midi(Vec<u8>),
    Unknown(FourCc, Vec<u8>),
}

impl CafChunk {
    pub fn fourcc(&self) -> FourCc {
        match self {
            CafChunk::Desc(_) => FourCc::new("desc"),
            CafChunk::Chan(_) => FourCc::new("chan"),
            CafChunk::Info(_) => FourCc::new("info"),
            CafChunk::Data(_) => FourCc::new("data"),
            CafChunk::Pakt(_) => FourCc::new("pakt"),
            CafChunk::Midi(_) => FourCc::new("midi"),
            CafChunk::Unknown(tag, _) => *tag,
        }
    }

    /// Encode this chunk's payload (not including the 12-byte chunk header).
    pub fn encode(&self) -> Vec<u8> {
        match self {
            CafChunk::Desc(desc) => {
                let mut out = Vec::with_capacity(DESC_CHUNK_LEN);
                out.extend_from_slice(&desc.sample_rate.to_be_bytes());
                out.extend_from_slice(&desc.format_id.0);
                out.extend_from_slice(&desc.format_flags.to_be_bytes());
                out.extend_from_slice(&desc.bytes_per_packet.to_be_bytes());
                out.extend_from_slice(&desc.frames_per_packet.to_be_bytes());
                out.extend_from_slice(&desc.channels_per_packet.to_be_bytes());
                out.extend_from_slice(&desc.bits_per_channel.to_be_bytes());
                out
            }
            CafChunk::Chan(chan) => {
                let mut out = Vec::new();
                out.extend_from_slice(&chan.layout_tag.to_be_bytes());
                out.extend_from_slice(&chan.bitmap.to_be_bytes());
                out.extend_from_slice(&(chan.descriptions.len() as i32).to_be_bytes());
                for d in &chan.descriptions {
                    out.extend_from_slice(&d.channel_label.to_be_bytes());
                    out.extend_from_slice(&d.channel_flags.to_be_bytes());
                    out.extend_from_slice(&d.coordinates.0.to_be_bytes());
                    out.extend_from_slice(&d.coordinates.1.to_be_bytes());
                    out.extend_from_slice(&d.coordinates.2.to_be_bytes());
                }
                out
            }
            CafChunk::Info(InfoList(entries)) => {
                let mut out = Vec::new();
                out.extend_from_slice(&(entries.len() as u32).to_be_bytes());
                for (key, value) in entries {
                    out.extend_from_slice(key.as_bytes());
                    out.push(0);
                    out.extend_from_slice(value.as_bytes());
                    out.push(0);
                }
                out
            }
            CafChunk::Data(audio) => {
                let mut out = Vec::with_capacity(4 + audio.data.len());
                out.extend_from_slice(&audio.edit_count.to_be_bytes());
                out.extend_from_slice(&audio.data);
                out
            }
            CafChunk::Pakt(pakt) => {
                let mut out = Vec::with_capacity(24);
                out.extend_from_slice(&pakt.number_packets().to_be_bytes());
                out.extend_from_slice(&pakt.number_valid_frames.to_be_bytes());
                out.extend_from_slice(&pakt.priming_frames.to_be_bytes());
                out.extend_from_slice(&pakt.remainder_frames.to_be_bytes());
                for &size in &pakt.sizes {
                    out.extend_from_slice(&encode_varint(size as u64));
                }
                out
            }
            CafChunk::Midi(bytes) => bytes.clone(),
            CafChunk::Unknown(_, bytes) => bytes.clone(),
        }
    }
}

/// Decode a chunk's in-memory payload given its FourCC. Chunk types this
/// converter does not need to interpret are kept verbatim as `Unknown`.
pub fn decode_chunk(fourcc: FourCc, payload: &[u8]) -> Result<CafChunk> {
    match fourcc.as_str() {
        Some("desc") => {
            if payload.len() < DESC_CHUNK_LEN {
                return Err(ConvertError::ChunkNotFound(ChunkKind::Desc));
            }
            Ok(CafChunk::Desc(AudioDescription {
                sample_rate: read_f64_be(&payload[0..8]),
                format_id: FourCc::from_bytes(payload[8..12].try_into().unwrap()),
                format_flags: read_u32_be(&payload[12..16]),
                bytes_per_packet: read_u32_be(&payload[16..20]),
                frames_per_packet: read_u32_be(&payload[20..24]),
                channels_per_packet: read_u32_be(&payload[24..28]),
                bits_per_channel: read_u32_be(&payload[28..32]),
            }))
        }
        Some("chan") => {
            if payload.len() < 12 {
                return Err(ConvertError::ChunkNotFound(ChunkKind::Chan));
            }
            let layout_tag = read_i32_be(&payload[0..4]);
            let bitmap = read_i32_be(&payload[4..8]);
            let count_raw = read_i32_be(&payload[8..12]);
            if count_raw < 0 {
                return Err(ConvertError::ChunkNotFound(ChunkKind::Chan));
            }
            let count = count_raw as usize;
            if payload.len() < 12 + count * 20 {
                return Err(ConvertError::ChunkNotFound(ChunkKind::Chan));
            }
            let mut descriptions = Vec::with_capacity(count);
            let mut offset = 12;
            for _ in 0..count {
                let channel_label = read_u32_be(&payload[offset..offset + 4]);
                let channel_flags = read_u32_be(&payload[offset + 4..offset + 8]);
                let x = f32::from_be_bytes(payload[offset + 8..offset + 12].try_into().unwrap());
                let y = f32::from_be_bytes(payload[offset + 12..offset + 16].try_into().unwrap());
                let z = f32::from_be_bytes(payload[offset + 16..offset + 20].try_into().unwrap());
                descriptions.push(ChannelDescription {
                    channel_label,
                    channel_flags,
                    coordinates: (x, y, z),
                });
                offset += 20;
            }
            Ok(CafChunk::Chan(ChannelLayout {
                layout_tag,
                bitmap,
                descriptions,
            }))
        }
        Some("info") => {
            let count = read_u32_be(&payload[0..4]);
            let mut entries = Vec::with_capacity(count as usize);
            let mut offset = 4usize;
            for _ in 0..count {
                let key_end = payload[offset..]
                    .iter()
                    .position(|&b| b == 0)
                    .map(|p| offset + p)
                    .unwrap_or(payload.len());
                let key = String::from_utf8_lossy(&payload[offset..key_end]).into_owned();
                offset = key_end + 1;
                let val_end = payload[offset..]
                    .iter()
                    .position(|&b| b == 0)
                    .map(|p| offset + p)
                    .unwrap_or(payload.len());
                let value = String::from_utf8_lossy(&payload[offset..val_end]).into_owned();
                offset = val_end + 1;
                entries.push((key, value));
            }
            Ok(CafChunk::Info(InfoList(entries)))
        }
        Some("data") => {
            if payload.len() < 4 {
                return Err(ConvertError::ChunkNotFound(ChunkKind::Data));
            }
            Ok(CafChunk::Data(AudioData {
                edit_count: read_u32_be(&payload[0..4]),
                data: payload[4..].to_vec(),
            }))
        }
        Some("pakt") => {
            if payload.len() < 24 {
                return Err(ConvertError::ChunkNotFound(ChunkKind::Pakt));
            }
            let number_packets = read_i64_be(&payload[0..8]);
            let number_valid_frames = read_i64_be(&payload[8..16]);
            let priming_frames = read_i32_be(&payload[16..20]);
            let remainder_frames = read_i32_be(&payload[20..24]);
            let mut sizes = Vec::with_capacity(number_packets.max(0) as usize);
            let mut rest = &payload[24..];
            for _ in 0..number_packets {
                let (value, consumed) = decode_varint(rest)?;
                sizes.push(value as u32);
                rest = &rest[consumed..];
            }
            Ok(CafChunk::Pakt(PacketTable {
                number_valid_frames,
                priming_frames,
                remainder_frames,
                sizes,
            }))
        }
        Some("midi") => Ok(CafChunk::Midi(payload.to_vec())),
        _ => Ok(CafChunk::Unknown(fourcc, payload.to_vec())),
    }
}

/// A parsed CAF file: its chunks in on-disk order.
#[derive(Debug, Clone, Default)]
pub struct CafFile {
    pub chunks: Vec<CafChunk>,
}

impl CafFile {
    pub fn desc(&self) -> Result<&AudioDescription> {
        self.chunks
            .iter()
            .find_map(|c| match c {
                CafChunk::Desc(d) => Some(d),
                _ => None,
            })
            .ok_or(ConvertError::ChunkNotFound(ChunkKind::Desc))
    }

    pub fn pakt(&self) -> Result<&PacketTable> {
        self.chunks
            .iter()
            .find_map(|c| match c {
                CafChunk::Pakt(p) => Some(p),
                _ => None,
            })
            .ok_or(ConvertError::ChunkNotFound(ChunkKind::Pakt))
    }

    pub fn data(&self) -> Result<&AudioData> {
        self.chunks
            .iter()
            .find_map(|c| match c {
                CafChunk::Data(d) => Some(d),
                _ => None,
            })
            .ok_or(ConvertError::ChunkNotFound(ChunkKind::Data))
    }
}

/// Scan a fully-buffered CAF byte stream into a `CafFile`.
///
/// Tolerates any file-version/flags combination in the 8-byte file header
/// (logs and proceeds rather than failing).
pub fn parse_caf(bytes: &[u8]) -> Result<CafFile> {
    if bytes.len() < FILE_HEADER_LEN || &bytes[0..4] != b"caff" {
        return Err(ConvertError::ChunkNotFound(ChunkKind::Desc));
    }
    let file_version = u16::from_be_bytes([bytes[4], bytes[5]]);
    let file_flags = u16::from_be_bytes([bytes[6], bytes[7]]);
    if file_version != 1 || file_flags != 0 {
        tracing::warn!(file_version, file_flags, "non-standard CAF file header, proceeding");
    }

    let mut chunks = Vec::new();
    let mut pos = FILE_HEADER_LEN;
    while pos + CHUNK_HEADER_LEN <= bytes.len() {
        let fourcc = FourCc::from_bytes(bytes[pos..pos + 4].try_into().unwrap());
        let size = read_i64_be(&bytes[pos + 4..pos + 12]);
        let payload_start = pos + CHUNK_HEADER_LEN;
        let payload_len = if size < 0 {
            // -1 marks a chunk that runs to EOF (only valid for audio data).
            bytes.len() - payload_start
        } else {
            size as usize
        };
        if payload_start + payload_len > bytes.len() {
            break;
        }
        let payload = &bytes[payload_start..payload_start + payload_len];
        match decode_chunk(fourcc, payload) {
            Ok(chunk) => chunks.push(chunk),
            Err(_) => tracing::warn!(chunk = %fourcc, "skipping malformed chunk"),
        }
        pos = payload_start + payload_len;
    }

    tracing::debug!(chunk_count = chunks.len(), "parsed CAF chunk list");
    Ok(CafFile { chunks })
}
