//! Forward-only scanner turning a sectioned buffer into records.

use std::iter::FusedIterator;

use thiserror::Error;

use crate::core::types::{LineEnding, Record};

/// Buffer shapes the scanner refuses to process.
///
/// Offsets are byte offsets into the scanned buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("unsupported format: mixed line endings at byte {offset} (buffer uses {expected:?})")]
    MixedLineEndings { offset: usize, expected: LineEnding },
    #[error("unsupported format: bare carriage return at byte {offset}")]
    BareCarriageReturn { offset: usize },
    #[error("unsupported format: invalid utf-8 at byte {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("unsupported format: last line at byte {offset} has no terminator")]
    MissingTerminator { offset: usize },
}

/// Detect the single line-ending convention of `buf`.
///
/// Buffers without any terminator default to LF.
pub fn detect_line_ending(buf: &[u8]) -> Result<LineEnding, ScanError> {
    let mut detected: Option<LineEnding> = None;
    for (offset, byte) in buf.iter().enumerate() {
        let found = match byte {
            b'\n' if offset > 0 && buf[offset - 1] == b'\r' => LineEnding::CrLf,
            b'\n' => LineEnding::Lf,
            b'\r' => {
                if buf.get(offset + 1) != Some(&b'\n') {
                    return Err(ScanError::BareCarriageReturn { offset });
                }
                continue;
            }
            _ => continue,
        };
        match detected {
            None => detected = Some(found),
            Some(expected) if expected != found => {
                return Err(ScanError::MixedLineEndings { offset, expected });
            }
            Some(_) => {}
        }
    }
    Ok(detected.unwrap_or_default())
}

/// Pull-based record sequence over a validated buffer.
///
/// The whole buffer is validated in [`Scanner::new`], so iteration itself
/// cannot fail. A fresh scan always starts from the beginning of the buffer.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    rest: &'a str,
    section: &'a str,
    ending: LineEnding,
}

impl<'a> Scanner<'a> {
    pub fn new(buf: &'a [u8]) -> Result<Self, ScanError> {
        let ending = detect_line_ending(buf)?;
        let text = std::str::from_utf8(buf).map_err(|err| ScanError::InvalidUtf8 {
            offset: err.valid_up_to(),
        })?;
        if !text.is_empty() && !text.ends_with('\n') {
            let offset = text.rfind('\n').map_or(0, |idx| idx + 1);
            return Err(ScanError::MissingTerminator { offset });
        }
        Ok(Self {
            rest: text,
            section: "",
            ending,
        })
    }

    pub fn line_ending(&self) -> LineEnding {
        self.ending
    }

    /// Section that encloses the next content line.
    pub fn current_section(&self) -> &'a str {
        self.section
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Record<'a>> {
        if self.rest.is_empty() {
            return None;
        }
        let end = self.rest.find('\n').map_or(self.rest.len(), |idx| idx + 1);
        let (line, rest) = self.rest.split_at(end);
        self.rest = rest;

        if let Some(name) = header_name(line, self.ending) {
            self.section = name;
            return Some(Record::header(name));
        }
        Some(Record::content(self.section, line))
    }
}

impl FusedIterator for Scanner<'_> {}

/// Name of a `[name]` header line, or `None` for content.
fn header_name(line: &str, ending: LineEnding) -> Option<&str> {
    line.strip_suffix(ending.as_str())?
        .strip_prefix('[')?
        .strip_suffix(']')
        .filter(|name| !name.is_empty())
}
