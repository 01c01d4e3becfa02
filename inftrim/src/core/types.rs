//! Shared deterministic types for the section rewriter and the pruner.
//!
//! These types define stable contracts between core components. They should not
//! depend on external state or I/O and must remain deterministic across runs.

use serde::Serialize;

/// Line terminator convention used consistently by a whole buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// One scanner event.
///
/// - `line` empty, `section` non-empty: a section header was crossed.
/// - `line` non-empty: one physical line including its terminator, inside
///   `section` (empty before the first header).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub section: &'a str,
    pub line: &'a str,
}

impl<'a> Record<'a> {
    pub fn header(section: &'a str) -> Self {
        Self { section, line: "" }
    }

    pub fn content(section: &'a str, line: &'a str) -> Self {
        Self { section, line }
    }

    pub fn is_header(&self) -> bool {
        self.line.is_empty()
    }
}

/// Why a module was dropped from the retained set.
///
/// `missing` lists each absent dependency once, in the order it first appears
/// in the module's import list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removal {
    pub module: String,
    /// 1-based pruning round.
    pub round: usize,
    pub missing: Vec<String>,
}

/// Result of a pruning run.
///
/// `removals` is in removal order: by round, then by module name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PruneOutcome {
    pub retained: std::collections::BTreeSet<String>,
    pub removals: Vec<Removal>,
}

impl PruneOutcome {
    /// Number of rounds that removed at least one module.
    pub fn rounds(&self) -> usize {
        self.removals.last().map_or(0, |removal| removal.round)
    }
}
