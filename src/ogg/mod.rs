// OGG container support
//
// OGG File Structure:
// - OGG Page Header (27 bytes)
//   - Capture Pattern: "OggS" (4 bytes)
//   - Version: 0 (1 byte)
//   - Header Type: 1=continuation, 2=bos, 4=eos (1 byte)
//   - Granule Position (8 bytes)
//   - Bitstream Serial Number (4 bytes)
//   - Page Sequence Number (4 bytes)
//   - CRC Checksum (4 bytes)
//   - Number of Page Segments (1 byte)
//   - Segment Table (variable)
//
// Pages and packets handed out by a demuxer borrow its internal buffer, so the
// borrow checker stops anyone from holding one across the next read.

mod crc;
pub mod page;
pub mod reader;
pub mod writer;

pub use page::OggPageHeader;
pub use reader::OggReader;
pub use writer::OggWriter;

use crate::error::Result;

// OGG signature
pub const OGG_SIGNATURE: &[u8; 4] = b"OggS";

// OGG page header types
pub const OGG_HEADER_TYPE_CONTINUATION: u8 = 0x01;
pub const OGG_HEADER_TYPE_BOS: u8 = 0x02; // Beginning of Stream
pub const OGG_HEADER_TYPE_EOS: u8 = 0x04; // End of Stream

/// One physical page, borrowed from the demuxer that read it
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    header: OggPageHeader,
    raw: &'a [u8],
}

impl<'a> Page<'a> {
    pub(crate) fn new(header: OggPageHeader, raw: &'a [u8]) -> Self {
        Page { header, raw }
    }

    pub fn header(&self) -> &OggPageHeader {
        &self.header
    }

    pub fn serial(&self) -> u32 {
        self.header.bitstream_serial
    }

    pub fn sequence(&self) -> u32 {
        self.header.page_sequence
    }

    pub fn is_bos(&self) -> bool {
        self.header.is_bos()
    }

    /// Header and body exactly as read
    pub fn as_bytes(&self) -> &'a [u8] {
        self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// One logical packet, borrowed from the page it was extracted from
#[derive(Debug, Clone, Copy)]
pub struct Packet<'a> {
    pub data: &'a [u8],
}

/// Source of Ogg pages
pub trait Demux {
    /// Read the next page, or `None` at a clean end of stream
    fn read_page(&mut self) -> Result<Option<Page<'_>>>;

    /// The page returned by the last successful `read_page`
    fn page(&self) -> Option<Page<'_>>;

    /// Hand the single packet of the current header page to `handler`
    fn read_header_packet<T, F>(&mut self, handler: F) -> Result<T>
    where
        F: FnOnce(Packet<'_>) -> Result<T>;
}

/// Sink for Ogg pages
pub trait Mux {
    /// Write raw page bytes unchanged
    fn write_page(&mut self, raw: &[u8]) -> Result<()>;

    /// Wrap `packet` in a page of its own and write it
    ///
    /// Serial, sequence number, granule position and stream flags are taken from
    /// `header`, normally the header of the page the packet was read from.
    fn write_header_packet(&mut self, header: &OggPageHeader, packet: &[u8]) -> Result<()>;
}

impl<D: Demux> Demux for &mut D {
    fn read_page(&mut self) -> Result<Option<Page<'_>>> {
        (**self).read_page()
    }

    fn page(&self) -> Option<Page<'_>> {
        (**self).page()
    }

    fn read_header_packet<T, F>(&mut self, handler: F) -> Result<T>
    where
        F: FnOnce(Packet<'_>) -> Result<T>,
    {
        (**self).read_header_packet(handler)
    }
}

impl<M: Mux> Mux for &mut M {
    fn write_page(&mut self, raw: &[u8]) -> Result<()> {
        (**self).write_page(raw)
    }

    fn write_header_packet(&mut self, header: &OggPageHeader, packet: &[u8]) -> Result<()> {
        (**self).write_header_packet(header, packet)
    }
}
