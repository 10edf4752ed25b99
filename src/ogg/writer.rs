// Ogg page muxer
//
// Header packets are wrapped in a page of their own; every other page is written
// exactly as it was read. Nothing is ever read back from the output.

use std::io::Write;

use tracing::trace;

use crate::error::{Error, Result};
use crate::ogg::page::{self, OggPageHeader, CRC_OFFSET};
use crate::ogg::{crc, Mux, OGG_HEADER_TYPE_BOS, OGG_HEADER_TYPE_EOS};

/// Muxer writing pages to a byte sink
pub struct OggWriter<W> {
    writer: W,
}

impl<W: Write> OggWriter<W> {
    /// Create a muxer writing to `writer`
    pub fn new(writer: W) -> Self {
        OggWriter { writer }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Mux for OggWriter<W> {
    fn write_page(&mut self, raw: &[u8]) -> Result<()> {
        self.writer.write_all(raw)?;
        Ok(())
    }

    fn write_header_packet(&mut self, header: &OggPageHeader, packet: &[u8]) -> Result<()> {
        let lacing = page::lacing_values(packet.len());
        if lacing.len() > u8::MAX as usize {
            return Err(Error::ogg(format!(
                "header packet of {} bytes does not fit in a single page",
                packet.len()
            )));
        }

        // The packet starts on this page, so only the stream flags carry over.
        let header_type = header.header_type & (OGG_HEADER_TYPE_BOS | OGG_HEADER_TYPE_EOS);
        let raw = assemble_page(
            header_type,
            header.granule_position,
            header.bitstream_serial,
            header.page_sequence,
            &lacing,
            packet,
        )?;
        trace!(
            sequence = header.page_sequence,
            serial = header.bitstream_serial,
            size = raw.len(),
            "write header page"
        );
        self.write_page(&raw)
    }
}

/// Build a complete page with a valid checksum
///
/// `segment_table` must describe `body` exactly.
pub fn assemble_page(
    header_type: u8,
    granule_position: u64,
    serial: u32,
    sequence: u32,
    segment_table: &[u8],
    body: &[u8],
) -> Result<Vec<u8>> {
    let segment_count = u8::try_from(segment_table.len())
        .map_err(|_| Error::ogg("more than 255 segments in one page"))?;
    let described: usize = segment_table.iter().map(|&l| l as usize).sum();
    if described != body.len() {
        return Err(Error::ogg(format!(
            "segment table describes {} bytes but the body has {}",
            described,
            body.len()
        )));
    }

    let header = OggPageHeader {
        segment_count,
        ..OggPageHeader::new(header_type, granule_position, serial, sequence)
    };

    let mut raw = Vec::with_capacity(page::HEADER_SIZE + segment_table.len() + body.len());
    header.write_to(&mut raw);
    raw.extend_from_slice(segment_table);
    raw.extend_from_slice(body);

    let checksum = crc::page_checksum(&raw);
    raw[CRC_OFFSET..CRC_OFFSET + 4].copy_from_slice(&checksum.to_le_bytes());
    Ok(raw)
}
