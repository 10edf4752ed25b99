// opustags - edit the comment header of Ogg Opus files
//
// The audio is never decoded: pages are streamed from input to output unchanged,
// except the OpusTags page, which is decoded, edited and rebuilt.
//
// Layers, leaves first:
// - ogg: page demuxer and muxer
// - opus: OpusHead check and OpusTags codec
// - edit: comment list edits
// - stream: state machine tying them together

pub mod edit;
pub mod error;
pub mod ogg;
pub mod opus;
pub mod stream;
mod utils;

pub use edit::EditPlan;
pub use error::{Error, Result};
pub use opus::{parse_tags, render_tags, validate_identification_header, OpusTags};
pub use stream::{edit_stream, read_tags, Processor, State, Summary};
