// Stream orchestration
//
// Drives a demuxer and a muxer over a whole Opus stream:
//
//   ExpectIdentificationHeader -> ExpectTagsHeader -> PassThrough -> Done
//
// Any error moves to `Aborted` and stops there. The identification page and every
// audio page are copied verbatim; only the tags page is rebuilt.

use std::io::{Read, Write};

use tracing::{debug, trace};

use crate::edit::EditPlan;
use crate::error::{Error, Result};
use crate::ogg::{Demux, Mux, OggReader, OggWriter};
use crate::opus::{parse_tags, render_tags, validate_identification_header, OpusTags};

/// Where the orchestrator stands in the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    ExpectIdentificationHeader,
    ExpectTagsHeader,
    PassThrough,
    Done,
    Aborted,
}

impl State {
    /// Whether no further step can change anything
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Done | State::Aborted)
    }
}

/// What a completed run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Serial number of the logical stream
    pub serial: u32,
    /// Pages written to the output, header pages included
    pub pages: u64,
    /// Tags as written
    pub tags: OpusTags,
}

/// Stream orchestrator
pub struct Processor<'p, D, M> {
    demux: D,
    mux: M,
    plan: &'p EditPlan,
    state: State,
    serial: u32,
    pages: u64,
    tags: Option<OpusTags>,
}

impl<'p, D: Demux, M: Mux> Processor<'p, D, M> {
    pub fn new(demux: D, mux: M, plan: &'p EditPlan) -> Self {
        Processor {
            demux,
            mux,
            plan,
            state: State::ExpectIdentificationHeader,
            serial: 0,
            pages: 0,
            tags: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Advance by one state, or by one page while passing through
    pub fn step(&mut self) -> Result<State> {
        let result = match self.state {
            State::ExpectIdentificationHeader => self.identification_header(),
            State::ExpectTagsHeader => self.tags_header(),
            State::PassThrough => self.pass_page(),
            State::Done | State::Aborted => Ok(self.state),
        };
        match result {
            Ok(next) => {
                if next != self.state {
                    debug!(from = ?self.state, to = ?next, "state transition");
                }
                self.state = next;
                Ok(next)
            }
            Err(e) => {
                debug!(from = ?self.state, error = %e, "aborting");
                self.state = State::Aborted;
                Err(e)
            }
        }
    }

    /// Run to the end of the stream
    pub fn run(mut self) -> Result<Summary> {
        while !self.step()?.is_terminal() {}
        Ok(Summary {
            serial: self.serial,
            pages: self.pages,
            tags: self.tags.unwrap_or_default(),
        })
    }

    fn identification_header(&mut self) -> Result<State> {
        read_identification_header(&mut self.demux)?;
        let page = self.demux.page().ok_or(Error::EndOfFile)?;
        self.serial = page.serial();
        self.mux.write_page(page.as_bytes())?;
        self.pages += 1;
        Ok(State::ExpectTagsHeader)
    }

    fn tags_header(&mut self) -> Result<State> {
        let mut tags = read_tags_header(&mut self.demux)?;
        let header = *self.demux.page().ok_or(Error::EndOfFile)?.header();

        self.plan.apply(&mut tags)?;
        let packet = render_tags(&tags)?;
        self.mux.write_header_packet(&header, &packet)?;
        self.pages += 1;
        self.tags = Some(tags);
        Ok(State::PassThrough)
    }

    fn pass_page(&mut self) -> Result<State> {
        match self.demux.read_page()? {
            Some(page) => {
                trace!(sequence = page.sequence(), size = page.len(), "pass through");
                self.mux.write_page(page.as_bytes())?;
                self.pages += 1;
                Ok(State::PassThrough)
            }
            None => Ok(State::Done),
        }
    }
}

/// Read the first page and check it carries an OpusHead
fn read_identification_header<D: Demux>(demux: &mut D) -> Result<()> {
    if demux.read_page()?.is_none() {
        return Err(Error::EndOfFile);
    }
    demux.read_header_packet(|packet| validate_identification_header(packet.data))
}

/// Read the second page and decode its OpusTags
fn read_tags_header<D: Demux>(demux: &mut D) -> Result<OpusTags> {
    if demux.read_page()?.is_none() {
        return Err(Error::EndOfFile);
    }
    let tags = demux.read_header_packet(|packet| parse_tags(packet.data))?;
    debug!(
        vendor = %String::from_utf8_lossy(&tags.vendor),
        comments = tags.comments.len(),
        extra = tags.extra_data.len(),
        "decoded tags"
    );
    Ok(tags)
}

/// Decode the tags of a stream without writing anything
pub fn read_tags<R: Read>(input: R) -> Result<OpusTags> {
    let mut reader = OggReader::new(input);
    read_identification_header(&mut reader)?;
    read_tags_header(&mut reader)
}

/// Copy `input` to `output` with `plan` applied to its tags
///
/// `output` must not be the storage `input` is read from: on error it holds a
/// partial stream that has to be discarded.
pub fn edit_stream<R: Read, W: Write>(input: R, output: W, plan: &EditPlan) -> Result<Summary> {
    plan.validate()?;
    let mut writer = OggWriter::new(output);
    let summary = Processor::new(OggReader::new(input), &mut writer, plan).run()?;
    writer.flush()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ogg::writer::assemble_page;
    use crate::ogg::{OggPageHeader, OGG_HEADER_TYPE_BOS};
    use std::io::Cursor;

    fn header_page(sequence: u32) -> OggPageHeader {
        let flags = if sequence == 0 { OGG_HEADER_TYPE_BOS } else { 0 };
        OggPageHeader::new(flags, 0, 77, sequence)
    }

    fn opus_head() -> Vec<u8> {
        let mut head = b"OpusHead\x01\x02".to_vec();
        head.extend_from_slice(&[0; 9]);
        head
    }

    fn stream(head: &[u8], tags: &[u8]) -> Vec<u8> {
        let mut writer = OggWriter::new(Vec::new());
        writer.write_header_packet(&header_page(0), head).unwrap();
        writer.write_header_packet(&header_page(1), tags).unwrap();
        let mut bytes = writer.into_inner();
        bytes.extend(assemble_page(0, 960, 77, 2, &[3], b"abc").unwrap());
        bytes
    }

    fn tags_packet() -> Vec<u8> {
        render_tags(&OpusTags {
            vendor: b"x".to_vec(),
            comments: vec![b"TITLE=A".to_vec()],
            extra_data: Vec::new(),
        })
        .unwrap()
    }

    #[test]
    fn test_states_in_order() {
        let input = stream(&opus_head(), &tags_packet());
        let plan = EditPlan::default();
        let mut output = OggWriter::new(Vec::new());
        let mut processor = Processor::new(OggReader::new(Cursor::new(input.clone())), &mut output, &plan);

        assert_eq!(processor.state(), State::ExpectIdentificationHeader);
        assert_eq!(processor.step().unwrap(), State::ExpectTagsHeader);
        assert_eq!(processor.step().unwrap(), State::PassThrough);
        assert_eq!(processor.step().unwrap(), State::PassThrough);
        assert_eq!(processor.step().unwrap(), State::Done);
        assert_eq!(processor.step().unwrap(), State::Done);
        drop(processor);

        assert_eq!(output.into_inner(), input);
    }

    #[test]
    fn test_error_is_absorbing() {
        let input = stream(b"OpusHeaX\x01", &tags_packet());
        let plan = EditPlan::default();
        let mut output = OggWriter::new(Vec::new());
        let mut processor = Processor::new(OggReader::new(Cursor::new(input)), &mut output, &plan);

        assert!(matches!(processor.step(), Err(Error::BadIdentificationHeader)));
        assert_eq!(processor.state(), State::Aborted);
        assert_eq!(processor.step().unwrap(), State::Aborted);
        drop(processor);
        assert!(output.get_ref().is_empty());
    }

    #[test]
    fn test_read_tags() {
        let input = stream(&opus_head(), &tags_packet());
        let tags = read_tags(Cursor::new(input)).unwrap();
        assert_eq!(tags.vendor, b"x");
        assert_eq!(tags.get("title"), Some(&b"A"[..]));
    }

    #[test]
    fn test_missing_headers_is_end_of_file() {
        assert!(matches!(read_tags(Cursor::new(Vec::new())), Err(Error::EndOfFile)));

        let mut writer = OggWriter::new(Vec::new());
        writer.write_header_packet(&header_page(0), &opus_head()).unwrap();
        assert!(matches!(read_tags(Cursor::new(writer.into_inner())), Err(Error::EndOfFile)));
    }

    #[test]
    fn test_invalid_plan_writes_nothing() {
        let input = stream(&opus_head(), &tags_packet());
        let plan = EditPlan {
            additions: vec!["broken".to_string()],
            ..Default::default()
        };
        let mut output = Vec::new();
        let result = edit_stream(Cursor::new(input), &mut output, &plan);
        assert!(matches!(result, Err(Error::BadArguments(_))));
        assert!(output.is_empty());
    }
}
