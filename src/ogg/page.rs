use crate::error::{Error, Result};
use crate::ogg::{OGG_HEADER_TYPE_BOS, OGG_HEADER_TYPE_CONTINUATION, OGG_HEADER_TYPE_EOS, OGG_SIGNATURE};
use crate::utils::io::{le_u32, le_u64};

/// Size of the fixed part of a page header, before the segment table
pub const HEADER_SIZE: usize = 27;

/// Offset of the checksum field inside the header
pub const CRC_OFFSET: usize = 22;

/// Largest lacing value; a segment this long continues the packet
pub const MAX_SEGMENT: u8 = 255;

/// OGG Page Header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OggPageHeader {
    pub version: u8,
    pub header_type: u8,
    pub granule_position: u64,
    pub bitstream_serial: u32,
    pub page_sequence: u32,
    pub crc: u32,
    pub segment_count: u8,
}

impl OggPageHeader {
    /// Header with no segments and a zero checksum, filled in when the page is assembled
    pub fn new(header_type: u8, granule_position: u64, serial: u32, sequence: u32) -> Self {
        OggPageHeader {
            version: 0,
            header_type,
            granule_position,
            bitstream_serial: serial,
            page_sequence: sequence,
            crc: 0,
            segment_count: 0,
        }
    }

    /// Parse the fixed 27-byte header
    pub fn parse(header: &[u8; HEADER_SIZE]) -> Result<Self> {
        // Check OGG signature
        if &header[0..4] != OGG_SIGNATURE {
            return Err(Error::ogg("missing OggS capture pattern"));
        }

        let version = header[4];
        if version != 0 {
            return Err(Error::ogg(format!("unsupported page version {}", version)));
        }

        let field = |range: std::ops::Range<usize>| le_u32(&header[range]).unwrap_or_default();
        Ok(OggPageHeader {
            version,
            header_type: header[5],
            granule_position: le_u64(&header[6..14]).unwrap_or_default(),
            bitstream_serial: field(14..18),
            page_sequence: field(18..22),
            crc: field(22..26),
            segment_count: header[26],
        })
    }

    /// Append the fixed header to `out`
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(OGG_SIGNATURE);
        out.push(self.version);
        out.push(self.header_type);
        out.extend_from_slice(&self.granule_position.to_le_bytes());
        out.extend_from_slice(&self.bitstream_serial.to_le_bytes());
        out.extend_from_slice(&self.page_sequence.to_le_bytes());
        out.extend_from_slice(&self.crc.to_le_bytes());
        out.push(self.segment_count);
    }

    /// Check if this is the beginning of a stream
    pub fn is_bos(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_BOS != 0
    }

    /// Check if this is the end of a stream
    pub fn is_eos(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_EOS != 0
    }

    /// Check if the first packet on this page started on a previous one
    pub fn is_continuation(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_CONTINUATION != 0
    }
}

/// Build a lacing table for one packet of `size` bytes
///
/// A packet whose size is a multiple of 255 ends with a zero lacing value.
pub fn lacing_values(size: usize) -> Vec<u8> {
    let mut table = vec![MAX_SEGMENT; size / MAX_SEGMENT as usize];
    table.push((size % MAX_SEGMENT as usize) as u8);
    table
}

/// Count the packets that start on a page, and whether the last one is complete
pub fn count_packets(segment_table: &[u8]) -> (usize, bool) {
    let complete = segment_table.iter().filter(|&&l| l < MAX_SEGMENT).count();
    match segment_table.last() {
        Some(&MAX_SEGMENT) => (complete + 1, false),
        Some(_) => (complete, true),
        None => (0, true),
    }
}
