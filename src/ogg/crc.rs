// Ogg page checksum
//
// CRC-32 with polynomial 0x04C11DB7, no reflection, zero initial value and no final
// xor. It is computed over the whole page with the checksum field set to zero.
//
// Incoming pages are verified by the `ogg` crate's page parser. Its CRC routine is
// private and its packet writer assigns its own sequence numbers and flags, so
// pages built here are signed with this table.

use crate::ogg::page::{CRC_OFFSET, HEADER_SIZE};

const POLYNOMIAL: u32 = 0x04C1_1DB7;

static TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut r = (i as u32) << 24;
        let mut bit = 0;
        while bit < 8 {
            r = if r & 0x8000_0000 != 0 { (r << 1) ^ POLYNOMIAL } else { r << 1 };
            bit += 1;
        }
        table[i] = r;
        i += 1;
    }
    table
}

/// Feed `data` into a running checksum
pub fn update(crc: u32, data: &[u8]) -> u32 {
    data.iter().fold(crc, |crc, &byte| {
        (crc << 8) ^ TABLE[(((crc >> 24) as u8) ^ byte) as usize]
    })
}

/// Checksum of a plain byte buffer
pub fn checksum(data: &[u8]) -> u32 {
    update(0, data)
}

/// Checksum of a complete page, treating its checksum field as zero
pub fn page_checksum(page: &[u8]) -> u32 {
    if page.len() < HEADER_SIZE {
        return checksum(page);
    }
    let crc = update(0, &page[..CRC_OFFSET]);
    let crc = update(crc, &[0u8; 4]);
    update(crc, &page[CRC_OFFSET + 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_answer() {
        assert_eq!(checksum(b""), 0);
        assert_eq!(checksum(b"123456789"), 0x89A1_897F);
    }

    #[test]
    fn test_update_is_incremental() {
        let whole = checksum(b"OggS page body");
        let split = update(checksum(b"OggS "), b"page body");
        assert_eq!(whole, split);
    }

    #[test]
    fn test_page_checksum_ignores_stored_value() {
        let mut page = vec![0u8; HEADER_SIZE];
        page[..4].copy_from_slice(b"OggS");
        let before = page_checksum(&page);
        page[CRC_OFFSET..CRC_OFFSET + 4].copy_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        assert_eq!(page_checksum(&page), before);
    }

    #[test]
    fn test_assembled_page_passes_ogg_parser() {
        let raw = crate::ogg::writer::assemble_page(0, 960, 3, 4, &[5], b"hello").unwrap();
        let fixed: [u8; HEADER_SIZE] = raw[..HEADER_SIZE].try_into().unwrap();
        let (mut parser, segments) = ::ogg::reading::PageParser::new(fixed).unwrap();
        assert_eq!(segments, 1);
        let body = parser.parse_segments(raw[HEADER_SIZE..HEADER_SIZE + segments].to_vec());
        assert_eq!(body, 5);
        assert!(parser.parse_packet_data(raw[HEADER_SIZE + segments..].to_vec()).is_ok());
    }
}
