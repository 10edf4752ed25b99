// OPUS format support (in OGG container)
//
// OPUS File Structure:
// - Uses OGG container, one logical stream
// - Identification header: "OpusHead" (8 bytes) in first page
// - Comment header: "OpusTags" (8 bytes) followed by a Vorbis-style comment list
//   in second page
// - Audio data pages
//
// Reference:
// - https://wiki.xiph.org/OggOpus
// - RFC 7845: Ogg Encapsulation for the Opus Audio Codec

pub mod head;
pub mod tags;

pub use head::validate_identification_header;
pub use tags::{parse_tags, render_tags, OpusTags};

pub const OPUS_SIGNATURE: &[u8; 8] = b"OpusHead";
pub const OPUS_TAGS: &[u8; 8] = b"OpusTags";
