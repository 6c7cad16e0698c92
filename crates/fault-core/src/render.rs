//! # Renderer
//!
//! Turns a fault into human-readable lines:
//!
//! ```text
//! [ERROR] (OperationFailed) the specified key was not found.
//!
//! Occurred at: 2026-10-19 08:00:00 UTC
//! Suggestions:
//! - check spelling
//! Context:
//! - key: Mark
//! ```
//!
//! Line 0 is the base's message followed by a period, line 1 is blank, and
//! the rest are the info lines of the embedding tower, innermost first.
//! [`write_fault`] sends the same lines to an [`io::Write`] sink.

use crate::descriptor::SHORT_WRITE;
use crate::fault::Fault;
use crate::tower::embedding_tower;
use std::io;
use thiserror::Error;

/// Render `fault`. Absence renders as no lines.
#[must_use]
pub fn render(fault: Option<&Fault>) -> Vec<String> {
    let Some(fault) = fault else {
        return Vec::new();
    };

    let mut lines = vec![format!("{}.", fault.error_message()), String::new()];
    lines.extend(info_lines_of(fault));
    lines
}

/// The info lines of every fault in the embedding tower of `fault`,
/// innermost first.
#[must_use]
pub fn info_lines_of(fault: &Fault) -> Vec<String> {
    embedding_tower(fault)
        .iter()
        .flat_map(Fault::info_lines)
        .collect()
}

// =============================================================================
// WRITER BOUNDARY
// =============================================================================

/// Failure to hand a rendering to a sink.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("short write: {written} of {expected} bytes accepted")]
    ShortWrite { written: usize, expected: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<WriteError> for Fault {
    fn from(err: WriteError) -> Self {
        let fault = SHORT_WRITE.init();

        let noted = match &err {
            WriteError::ShortWrite { written, expected } => fault
                .add_key("written", *written)
                .and_then(|()| fault.add_key("expected", *expected)),
            WriteError::Io(io_err) => fault.add_key("io", io_err.to_string()),
        };

        match noted {
            Ok(()) => fault,
            Err(misuse) => misuse,
        }
    }
}

/// Write `render(fault)` to `sink`, one `write` call per line.
///
/// Each line is terminated by `\n`. Returns the total number of bytes
/// written.
pub fn write_fault<W>(sink: &mut W, fault: Option<&Fault>) -> Result<usize, WriteError>
where
    W: io::Write + ?Sized,
{
    let mut total = 0;

    for line in render(fault) {
        let bytes = format!("{}\n", line);
        let written = sink.write(bytes.as_bytes())?;
        total += written;

        if written < bytes.len() {
            return Err(WriteError::ShortWrite {
                written: total,
                expected: total - written + bytes.len(),
            });
        }
    }

    Ok(total)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::StandardCode;
    use crate::descriptor::Descriptor;
    use crate::fault::FaultKind;
    use crate::level::Severity;
    use crate::traverse::is;

    #[derive(Debug)]
    struct Located(&'static str);

    impl FaultKind for Located {
        fn info_lines(&self) -> Vec<String> {
            vec![format!("- Location: {}", self.0)]
        }
    }

    /// Accepts at most `limit` bytes per call.
    struct Throttled {
        limit: usize,
        buf: Vec<u8>,
    }

    impl io::Write for Throttled {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            let n = bytes.len().min(self.limit);
            self.buf.extend_from_slice(&bytes[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn not_found() -> Fault {
        Descriptor::new(
            Severity::Error,
            StandardCode::OperationFailed,
            "the specified key was not found",
        )
        .init()
    }

    #[test]
    fn absent_renders_nothing() {
        assert!(render(None).is_empty());
    }

    #[test]
    fn render_lookup_miss() {
        let fault = not_found();
        fault.add_suggestions(["check spelling"]).expect("suggest");
        fault.add_key("key", "Mark").expect("context");

        let lines = render(Some(&fault));

        assert_eq!(
            lines[0],
            "[ERROR] (OperationFailed) the specified key was not found."
        );
        assert_eq!(lines[1], "");
        assert!(lines[2].starts_with("Occurred at: "));
        assert_eq!(
            &lines[3..],
            &["Suggestions:", "- check spelling", "Context:", "- key: Mark"]
        );
    }

    #[test]
    fn tower_renders_innermost_first() {
        let inner = not_found();
        let middle = Fault::wrap(inner, Located("middle"));
        let outer = Fault::wrap(middle, Located("outer"));

        let lines = render(Some(&outer));
        let tail: Vec<&str> = lines.iter().skip(3).map(String::as_str).collect();

        assert_eq!(tail, vec!["- Location: middle", "- Location: outer"]);
    }

    #[test]
    fn opaque_wrapper_renders_misuse_message() {
        let hidden = Fault::wrap_opaque(not_found(), Located("hidden"));
        let lines = render(Some(&hidden));

        assert_eq!(
            lines,
            vec![
                "[FATAL] (Invalid) fault does not embed a base fault.".to_string(),
                String::new(),
                "- Location: hidden".to_string(),
            ]
        );
    }

    #[test]
    fn write_fault_counts_bytes() {
        let fault = Descriptor::new(Severity::Debug, StandardCode::UnknownCode, "hi").init_at(None);
        let mut sink = Vec::new();

        let n = write_fault(&mut sink, Some(&fault)).expect("write");
        let text = String::from_utf8(sink).expect("utf8");

        assert_eq!(text, "[DEBUG] (UnknownCode) hi.\n\n");
        assert_eq!(n, text.len());
        assert_eq!(write_fault(&mut Vec::<u8>::new(), None).expect("empty"), 0);
    }

    #[test]
    fn short_write_carries_counts() {
        let fault = Descriptor::new(Severity::Debug, StandardCode::UnknownCode, "hi").init_at(None);
        let mut sink = Throttled {
            limit: 4,
            buf: Vec::new(),
        };

        let err = write_fault(&mut sink, Some(&fault)).expect_err("short");
        let line_len = "[DEBUG] (UnknownCode) hi.\n".len();

        assert!(matches!(
            err,
            WriteError::ShortWrite { written: 4, expected } if expected == line_len
        ));
        assert_eq!(sink.buf, b"[DEB");
    }

    #[test]
    fn write_error_becomes_short_write_fault() {
        let fault: Fault = WriteError::ShortWrite {
            written: 3,
            expected: 10,
        }
        .into();

        assert!(is(Some(&fault), Some(&SHORT_WRITE.init())));
        assert_eq!(fault.typed_value::<usize>("written").expect("written"), 3);
        assert_eq!(fault.typed_value::<usize>("expected").expect("expected"), 10);
    }
}
