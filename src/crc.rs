//! Ogg CRC-32 (polynomial 0x04C11DB7, reflected-off, big-endian accumulation).
//!
//! Initial value 0, no final XOR; the 256-entry table is built once and
//! reused for every page.

const POLYNOMIAL: u32 = 0x04c1_1db7;

fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut r = (i as u32) << 24;
        let mut j = 0;
        while j < 8 {
            r = if r & 0x8000_0000 != 0 {
                (r << 1) ^ POLYNOMIAL
            } else {
                r << 1
            };
            j += 1;
        }
        table[i] = r;
        i += 1;
    }
    table
}

/// Compute the Ogg page CRC over `bytes`.
///
/// Callers are responsible for zeroing the checksum field before calling
/// this and splicing the result back in afterward (see `ogg::builder`).
pub fn crc32(bytes: &[u8]) -> u32 {
    // Rebuilt per call; the table is cheap (256 u32s) and this keeps the
    // module free of lazily-initialized statics.
    let table = build_table();
    let mut crc: u32 = 0;
    for &byte in bytes {
        let index = ((crc >> 24) as u8) ^ byte;
        crc = (crc << 8) ^ table[index as usize];
    }
    crc
}
