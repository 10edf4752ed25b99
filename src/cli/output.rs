// Output formatting for CLI

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use std::borrow::Cow;
use std::io::Write;

use crate::cli::OutputFormat;
use opustags::OpusTags;

/// Serializable view of the tags; bytes that are not UTF-8 show as U+FFFD
#[derive(Debug, Serialize)]
struct TagsView<'a> {
    vendor: Cow<'a, str>,
    comments: Vec<Cow<'a, str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra_data: Option<String>,
}

/// Format and output tags
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Output the comments of `tags`
    pub fn print_tags(&self, tags: &OpusTags, writer: &mut impl Write) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Pretty => {
                for comment in &tags.comments {
                    writer.write_all(comment)?;
                    writer.write_all(b"\n")?;
                }
            }
            OutputFormat::Json => {
                let view = TagsView {
                    vendor: String::from_utf8_lossy(&tags.vendor),
                    comments: tags.comments.iter().map(|c| String::from_utf8_lossy(c)).collect(),
                    extra_data: (!tags.extra_data.is_empty()).then(|| STANDARD.encode(&tags.extra_data)),
                };
                serde_json::to_writer_pretty(&mut *writer, &view)?;
                writeln!(writer)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> OpusTags {
        OpusTags {
            vendor: b"libopus".to_vec(),
            comments: vec![b"TITLE=A".to_vec(), b"ARTIST=B".to_vec()],
            extra_data: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_pretty() {
        let mut out = Vec::new();
        OutputFormatter::new(OutputFormat::Pretty).print_tags(&tags(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "TITLE=A\nARTIST=B\n");
    }

    #[test]
    fn test_json() {
        let mut out = Vec::new();
        OutputFormatter::new(OutputFormat::Json).print_tags(&tags(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["vendor"], "libopus");
        assert_eq!(value["comments"][1], "ARTIST=B");
        assert_eq!(value["extra_data"], "AAEC");
    }

    #[test]
    fn test_non_utf8_comment() {
        let mut t = tags();
        t.comments.push(b"TITLE=caf\xE9".to_vec());

        let mut out = Vec::new();
        OutputFormatter::new(OutputFormat::Pretty).print_tags(&t, &mut out).unwrap();
        assert!(out.ends_with(b"TITLE=caf\xE9\n"));

        let mut out = Vec::new();
        OutputFormatter::new(OutputFormat::Json).print_tags(&t, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["comments"][2], "TITLE=caf\u{FFFD}");
    }

    #[test]
    fn test_json_without_extra_data() {
        let mut t = tags();
        t.extra_data.clear();
        let mut out = Vec::new();
        OutputFormatter::new(OutputFormat::Json).print_tags(&t, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(value.get("extra_data").is_none());
    }
}
