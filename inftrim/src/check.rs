//! Validation for `inftrim check`.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::scanner::{ScanError, Scanner};
use crate::core::types::LineEnding;

/// Shape of a file that scanned cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub line_ending: LineEnding,
    /// Header lines, counting repeated headers separately.
    pub headers: usize,
    /// Distinct section names.
    pub sections: usize,
    pub lines: usize,
}

pub fn check_buffer(buf: &[u8]) -> Result<CheckReport, ScanError> {
    let scanner = Scanner::new(buf)?;
    let line_ending = scanner.line_ending();
    let mut names = BTreeSet::new();
    let mut headers = 0;
    let mut lines = 0;
    for record in scanner {
        if record.is_header() {
            headers += 1;
            names.insert(record.section);
        } else {
            lines += 1;
        }
    }
    Ok(CheckReport {
        line_ending,
        headers,
        sections: names.len(),
        lines,
    })
}

pub fn check_file(path: &Path) -> Result<CheckReport> {
    let buf = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    check_buffer(&buf).with_context(|| format!("scan {}", path.display()))
}
