//! Ogg page parsing: consume a byte source, emit `OggPage` records with the
//! segment table reassembled into logical packets.

use crate::codec::{read_i64_le, read_u32_le};
use crate::crc::crc32;
use crate::error::{ConvertError, Result};

const PAGE_HEADER_LEN: usize = 27;
const SIGNATURE: &[u8; 4] = b"OggS";

pub const HEADER_CONTINUATION: u8 = 0x01;
pub const HEADER_BEGINNING_OF_STREAM: u8 = 0x02;
pub const HEADER_END_OF_STREAM: u8 = 0x04;

#[derive(Debug, Clone)]
pub struct OggPageHeader {
    pub version: u8,
    pub header_type: u8,
    pub granule_position: i64,
    pub serial: u32,
    pub page_index: u32,
    pub checksum: u32,
    pub segment_table: Vec<u8>,
}

/// A parsed page: its header, plus every packet completed while processing
/// this page's segment table (which may include the tail of a packet that
/// began on a previous page).
#[derive(Debug, Clone)]
pub struct OggPage {
    pub header: OggPageHeader,
    pub packets: Vec<Vec<u8>>,
}

/// Stateful reader over a fully-buffered Ogg byte stream.
///
/// Holds the tail of any packet left incomplete by the previous page (its
/// last lacing value was 255) so the next `parse_next_page` call can
/// continue it: a run of 255s with no terminator means the packet continues
/// into the next page.
pub struct OggReader<'a> {
    data: &'a [u8],
    pos: usize,
    pending: Vec<u8>,
}

impl<'a> OggReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        OggReader {
            data,
            pos: 0,
            pending: Vec::new(),
        }
    }

    /// Read and parse the next page. Returns `Err(ShortPageHeader)` once the
    /// remaining input is too small to hold a full 27-byte header; callers
    /// reading audio data treat that as normal end of stream, callers
    /// reading the ID page treat it as fatal.
    pub fn parse_next_page(&mut self) -> Result<OggPage> {
        if self.data.len() - self.pos < PAGE_HEADER_LEN {
            return Err(ConvertError::ShortPageHeader);
        }

        let header_start = self.pos;
        let h = &self.data[header_start..header_start + PAGE_HEADER_LEN];

        if &h[0..4] != SIGNATURE {
            return Err(ConvertError::BadIDPageSignature);
        }
        let version = h[4];
        let header_type = h[5];
        let granule_position = read_i64_le(&h[6..14]);
        let serial = read_u32_le(&h[14..18]);
        let page_index = read_u32_le(&h[18..22]);
        let checksum = read_u32_le(&h[22..26]);
        let segments_count = h[26] as usize;

        let table_start = header_start + PAGE_HEADER_LEN;
        if self.data.len() < table_start + segments_count {
            return Err(ConvertError::ShortPageHeader);
        }
        let segment_table = self.data[table_start..table_start + segments_count].to_vec();

        let body_start = table_start + segments_count;
        let body_len: usize = segment_table.iter().map(|&b| b as usize).sum();
        if self.data.len() < body_start + body_len {
            return Err(ConvertError::ShortPageHeader);
        }
        let body = &self.data[body_start..body_start + body_len];

        let mut packets = Vec::new();
        let mut current = std::mem::take(&mut self.pending);
        let mut offset = 0usize;
        for &lacing in &segment_table {
            let segment = &body[offset..offset + lacing as usize];
            current.extend_from_slice(segment);
            offset += lacing as usize;
            if lacing < 255 {
                packets.push(std::mem::take(&mut current));
            }
        }
        // A trailing run of 255s (or an empty segment table) leaves `current`
        // non-empty/continuing; carry it forward instead of emitting it.
        self.pending = current;

        self.pos = body_start + body_len;

        Ok(OggPage {
            header: OggPageHeader {
                version,
                header_type,
                granule_position,
                serial,
                page_index,
                checksum,
                segment_table,
            },
            packets,
        })
    }
}

/// Build the 27-byte fixed header plus segment table for `header`, with the
/// checksum field zero-filled (the CRC is computed and spliced in by the
/// caller once the body is known, see `ogg::builder`).
pub fn encode_header_unchecksummed(header: &OggPageHeader) -> Vec<u8> {
    let mut out = Vec::with_capacity(PAGE_HEADER_LEN + header.segment_table.len());
    out.extend_from_slice(SIGNATURE);
    out.push(header.version);
    out.push(header.header_type);
    out.extend_from_slice(&header.granule_position.to_le_bytes());
    out.extend_from_slice(&header.serial.to_le_bytes());
    out.extend_from_slice(&header.page_index.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.push(header.segment_table.len() as u8);
    out.extend_from_slice(&header.segment_table);
    out
}

/// Recompute and splice the CRC into a header-plus-body byte sequence whose
/// checksum field (offset 22) is currently zero.
pub fn finalize_checksum(mut page_bytes: Vec<u8>) -> Vec<u8> {
    let crc = crc32(&page_bytes);
    page_bytes[22..26].copy_from_slice(&crc.to_le_bytes());
    page_bytes
}
