// OpusTags comment header codec
//
// Layout, all integers little-endian:
// - "OpusTags" (8 bytes)
// - Vendor length (4 bytes) + vendor string
// - Comment count (4 bytes)
// - For each comment: length (4 bytes) + "NAME=value"
// - Anything left: opaque data, kept byte for byte
//
// Every length comes from the file and is checked against what is left of the
// packet before it is used. Strings are kept as raw bytes: files tagged in some
// other encoding still round-trip unchanged.

use crate::error::{Error, Result};
use crate::opus::OPUS_TAGS;
use crate::utils::io::le_u32;

/// Decoded comment header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpusTags {
    /// Encoder identification, free-form
    pub vendor: Vec<u8>,
    /// "NAME=value" entries in file order
    pub comments: Vec<Vec<u8>>,
    /// Whatever follows the comment list; never interpreted or truncated
    pub extra_data: Vec<u8>,
}

impl OpusTags {
    /// Value of the first comment with this field name
    pub fn get(&self, field: &str) -> Option<&[u8]> {
        self.comments.iter().find_map(|comment| {
            let name = field_name(comment)?;
            name.eq_ignore_ascii_case(field.as_bytes())
                .then(|| &comment[name.len() + 1..])
        })
    }

    /// Remove every comment with this field name, keeping the order of the others
    pub fn delete(&mut self, field: &str) {
        self.comments.retain(|comment| {
            !field_name(comment).is_some_and(|name| name.eq_ignore_ascii_case(field.as_bytes()))
        });
    }
}

/// Bounds-checked reader over a packet
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Take `len` bytes, or fail with `short` if the packet ends first
    fn take(&mut self, len: usize, short: Error) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(Error::IntOverflow)?;
        if end > self.data.len() {
            return Err(short);
        }
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_length(&mut self, short: Error) -> Result<usize> {
        let bytes = self.take(4, short)?;
        let value = le_u32(bytes).ok_or(Error::IntOverflow)?;
        usize::try_from(value).map_err(|_| Error::IntOverflow)
    }
}

/// Field name of a comment: everything before the first '=', if there is one
pub fn field_name(comment: &[u8]) -> Option<&[u8]> {
    let separator = comment.iter().position(|&b| b == b'=')?;
    Some(&comment[..separator])
}

/// Decode an OpusTags packet
pub fn parse_tags(data: &[u8]) -> Result<OpusTags> {
    let mut cursor = Cursor { data, pos: 0 };

    let magic = cursor.take(OPUS_TAGS.len(), Error::OverflowingMagicNumber)?;
    if magic != OPUS_TAGS {
        return Err(Error::BadMagicNumber);
    }

    // Vendor string
    let vendor_length = cursor.read_length(Error::OverflowingVendorLength)?;
    let vendor = cursor.take(vendor_length, Error::OverflowingVendorData)?.to_vec();

    // Comment list; the count is not trusted for preallocation
    let count = cursor.read_length(Error::OverflowingCommentCount)?;
    let mut comments = Vec::with_capacity(count.min(cursor.remaining() / 4));
    for _ in 0..count {
        let length = cursor.read_length(Error::OverflowingCommentLength)?;
        let comment = cursor.take(length, Error::OverflowingCommentData)?;
        comments.push(comment.to_vec());
    }

    let extra_data = data[cursor.pos..].to_vec();
    Ok(OpusTags {
        vendor,
        comments,
        extra_data,
    })
}

fn push_length(out: &mut Vec<u8>, length: usize) -> Result<()> {
    let length = u32::try_from(length).map_err(|_| Error::IntOverflow)?;
    out.extend_from_slice(&length.to_le_bytes());
    Ok(())
}

/// Encode tags back into an OpusTags packet
pub fn render_tags(tags: &OpusTags) -> Result<Vec<u8>> {
    let size = tags.comments.iter().map(|c| 4 + c.len()).sum::<usize>()
        + OPUS_TAGS.len()
        + 8
        + tags.vendor.len()
        + tags.extra_data.len();
    let mut out = Vec::with_capacity(size);

    out.extend_from_slice(OPUS_TAGS);
    push_length(&mut out, tags.vendor.len())?;
    out.extend_from_slice(&tags.vendor);

    push_length(&mut out, tags.comments.len())?;
    for comment in &tags.comments {
        push_length(&mut out, comment.len())?;
        out.extend_from_slice(comment);
    }

    out.extend_from_slice(&tags.extra_data);
    Ok(out)
}
