// I/O utilities for reading Ogg streams

use std::io::{ErrorKind, Read};

/// Read little-endian 32-bit integer from the start of a slice
pub fn le_u32(bytes: &[u8]) -> Option<u32> {
    let buffer: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
    Some(u32::from_le_bytes(buffer))
}

/// Read little-endian 64-bit integer from the start of a slice
pub fn le_u64(bytes: &[u8]) -> Option<u64> {
    let buffer: [u8; 8] = bytes.get(..8)?.try_into().ok()?;
    Some(u64::from_le_bytes(buffer))
}

/// Fill `buffer` as far as the reader allows
///
/// Unlike `read_exact`, hitting the end of the stream is not an error: the number of
/// bytes actually read is returned, so callers can tell a clean end (0) from a
/// truncated record.
pub fn read_full<R: Read>(reader: &mut R, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
