// OpusHead identification header check

use crate::error::{Error, Result};
use crate::opus::OPUS_SIGNATURE;

/// Validate the first packet of the stream as an OpusHead
///
/// Only the magic number and the major version (upper nibble of the version byte)
/// are checked. Minor versions are backward compatible by definition.
pub fn validate_identification_header(data: &[u8]) -> Result<()> {
    if data.len() < OPUS_SIGNATURE.len() + 1 || &data[..OPUS_SIGNATURE.len()] != OPUS_SIGNATURE {
        return Err(Error::BadIdentificationHeader);
    }
    let version = data[OPUS_SIGNATURE.len()];
    if version >> 4 != 0 {
        return Err(Error::BadIdentificationHeader);
    }
    Ok(())
}
