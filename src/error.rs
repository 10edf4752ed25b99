// Error types for opustags
//
// One closed enumeration covers every way an edit can stop. Callers match it
// exhaustively; the only non-failure terminator, the clean end of the page stream,
// is reported as `Ok(None)` by the demuxer and never travels as an error.

use thiserror::Error;

/// Result type alias for opustags operations
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while reading, editing or writing an Opus stream
#[derive(Error, Debug)]
pub enum Error {
    /// The caller asked for something that cannot be done
    #[error("invalid arguments: {0}")]
    BadArguments(String),

    /// A length field would overflow size arithmetic
    #[error("integer overflow")]
    IntOverflow,

    /// I/O failure, carrying the system error captured where it happened
    #[error("standard error: {0}")]
    StandardError(#[from] std::io::Error),

    /// The stream ended before the headers were read
    #[error("end of file")]
    EndOfFile,

    /// Corrupt container framing
    #[error("ogg framing error: {0}")]
    Ogg(String),

    /// A header page must carry exactly one packet
    #[error("header page must carry exactly one packet, found {0}")]
    HeaderPacketCount(usize),

    /// The first packet is not an OpusHead this tool understands
    #[error("invalid identification header, not an Opus stream")]
    BadIdentificationHeader,

    /// The second packet ends before its 8-byte magic number
    #[error("magic number runs past the end of the comment header")]
    OverflowingMagicNumber,

    /// The second packet does not start with "OpusTags"
    #[error("invalid comment header magic number")]
    BadMagicNumber,

    #[error("vendor length field runs past the end of the comment header")]
    OverflowingVendorLength,

    #[error("vendor string runs past the end of the comment header")]
    OverflowingVendorData,

    #[error("comment count field runs past the end of the comment header")]
    OverflowingCommentCount,

    #[error("comment length field runs past the end of the comment header")]
    OverflowingCommentLength,

    #[error("comment string runs past the end of the comment header")]
    OverflowingCommentData,
}

impl Error {
    /// Create a framing error
    pub fn ogg<S: Into<String>>(msg: S) -> Self {
        Error::Ogg(msg.into())
    }

    /// Create an invalid arguments error
    pub fn bad_arguments<S: Into<String>>(msg: S) -> Self {
        Error::BadArguments(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io;

    // Adding a variant without listing it here fails to compile.
    fn listed(error: &Error) -> bool {
        match error {
            Error::BadArguments(_)
            | Error::IntOverflow
            | Error::StandardError(_)
            | Error::EndOfFile
            | Error::Ogg(_)
            | Error::HeaderPacketCount(_)
            | Error::BadIdentificationHeader
            | Error::OverflowingMagicNumber
            | Error::BadMagicNumber
            | Error::OverflowingVendorLength
            | Error::OverflowingVendorData
            | Error::OverflowingCommentCount
            | Error::OverflowingCommentLength
            | Error::OverflowingCommentData => true,
        }
    }

    fn every_variant() -> Vec<Error> {
        vec![
            Error::bad_arguments("x"),
            Error::IntOverflow,
            Error::StandardError(io::Error::new(io::ErrorKind::Other, "disk on fire")),
            Error::EndOfFile,
            Error::ogg("bad checksum"),
            Error::HeaderPacketCount(2),
            Error::BadIdentificationHeader,
            Error::OverflowingMagicNumber,
            Error::BadMagicNumber,
            Error::OverflowingVendorLength,
            Error::OverflowingVendorData,
            Error::OverflowingCommentCount,
            Error::OverflowingCommentLength,
            Error::OverflowingCommentData,
        ]
    }

    #[test]
    fn test_every_variant_has_a_distinct_message() {
        let errors = every_variant();
        assert_eq!(errors.len(), 14);

        let mut seen = HashSet::new();
        for error in &errors {
            assert!(listed(error));
            let message = error.to_string();
            assert!(!message.is_empty());
            assert!(seen.insert(message), "duplicate message for {:?}", error);
        }
    }

    #[test]
    fn test_standard_error_keeps_system_detail() {
        let error: Error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied").into();
        assert!(matches!(error, Error::StandardError(ref e) if e.kind() == io::ErrorKind::PermissionDenied));
        assert_eq!(error.to_string(), "standard error: permission denied");
    }

    #[test]
    fn test_helpers() {
        assert!(matches!(Error::ogg("x"), Error::Ogg(ref m) if m == "x"));
        assert!(matches!(Error::bad_arguments("y"), Error::BadArguments(ref m) if m == "y"));
    }
}
