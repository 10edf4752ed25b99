// Ogg page demuxer
//
// Pulls one physical page at a time from any `Read` into an internal buffer and
// checks its framing. Only the two header pages are ever split into packets; the
// rest are handed back as raw bytes for pass-through.

use std::io::Read;

use ::ogg::reading::{OggReadError, PageParser};
use tracing::trace;

use crate::error::{Error, Result};
use crate::ogg::page::{self, OggPageHeader, HEADER_SIZE};
use crate::ogg::{Demux, Packet, Page};
use crate::utils::io::read_full;

/// Demuxer over a byte stream
pub struct OggReader<R> {
    reader: R,
    buffer: Vec<u8>,
    header: Option<OggPageHeader>,
    serial: Option<u32>,
    header_sequence: Option<u32>,
    pages: u64,
}

impl<R: Read> OggReader<R> {
    /// Create a demuxer reading from `reader`
    pub fn new(reader: R) -> Self {
        OggReader {
            reader,
            buffer: Vec::new(),
            header: None,
            serial: None,
            header_sequence: None,
            pages: 0,
        }
    }

    /// Append exactly `len` bytes from the input to the page buffer
    fn fill(&mut self, len: usize, what: &str) -> Result<()> {
        let start = self.buffer.len();
        self.buffer.resize(start + len, 0);
        let read = read_full(&mut self.reader, &mut self.buffer[start..])?;
        if read < len {
            return Err(Error::ogg(format!(
                "truncated {} on page {}: expected {} bytes, got {}",
                what, self.pages, len, read
            )));
        }
        Ok(())
    }
}

impl<R: Read> Demux for OggReader<R> {
    fn read_page(&mut self) -> Result<Option<Page<'_>>> {
        self.header = None;
        self.buffer.clear();

        let mut fixed = [0u8; HEADER_SIZE];
        let read = read_full(&mut self.reader, &mut fixed)?;
        if read == 0 {
            return Ok(None);
        }
        if read < HEADER_SIZE {
            return Err(Error::ogg(format!("truncated page header after page {}", self.pages)));
        }

        let header = OggPageHeader::parse(&fixed)?;
        let sequence = header.page_sequence;
        let (mut parser, segment_count) = PageParser::new(fixed).map_err(|e| framing(e, sequence))?;

        self.buffer.extend_from_slice(&fixed);
        self.fill(segment_count, "segment table")?;
        let body_size = parser.parse_segments(self.buffer[HEADER_SIZE..].to_vec());
        self.fill(body_size, "page body")?;

        // Only the checksum verdict is kept; pages are handed out from our own buffer.
        parser
            .parse_packet_data(self.buffer[HEADER_SIZE + segment_count..].to_vec())
            .map_err(|e| framing(e, sequence))?;

        self.header = Some(header);
        self.pages += 1;
        trace!(
            sequence = header.page_sequence,
            serial = header.bitstream_serial,
            size = self.buffer.len(),
            "read page"
        );
        Ok(Some(Page::new(header, &self.buffer)))
    }

    fn page(&self) -> Option<Page<'_>> {
        self.header.map(|header| Page::new(header, &self.buffer))
    }

    fn read_header_packet<T, F>(&mut self, handler: F) -> Result<T>
    where
        F: FnOnce(Packet<'_>) -> Result<T>,
    {
        let header = self
            .header
            .ok_or_else(|| Error::ogg("no page to extract a header packet from"))?;

        // Header packets all belong to the first logical stream, in order.
        match self.serial {
            None => self.serial = Some(header.bitstream_serial),
            Some(serial) if serial != header.bitstream_serial => {
                return Err(Error::ogg(format!(
                    "header page belongs to stream {:#010x}, expected {:#010x}",
                    header.bitstream_serial, serial
                )));
            }
            Some(_) => {}
        }
        if let Some(previous) = self.header_sequence {
            if header.page_sequence != previous.wrapping_add(1) {
                return Err(Error::ogg(format!(
                    "header page {} does not follow page {}",
                    header.page_sequence, previous
                )));
            }
        }
        self.header_sequence = Some(header.page_sequence);

        if header.is_continuation() {
            return Err(Error::ogg("header page continues a packet from a previous page"));
        }

        let table_end = HEADER_SIZE + header.segment_count as usize;
        let (count, complete) = page::count_packets(&self.buffer[HEADER_SIZE..table_end]);
        if count != 1 {
            return Err(Error::HeaderPacketCount(count));
        }
        if !complete {
            return Err(Error::ogg("header packet spans several pages"));
        }

        handler(Packet {
            data: &self.buffer[table_end..],
        })
    }
}

fn framing(error: OggReadError, sequence: u32) -> Error {
    match error {
        OggReadError::HashMismatch(stored, computed) => Error::ogg(format!(
            "checksum mismatch on page {}: stored {:#010x}, computed {:#010x}",
            sequence, stored, computed
        )),
        other => Error::ogg(format!("unreadable page {}: {:?}", sequence, other)),
    }
}
