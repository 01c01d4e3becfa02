//! Orchestration for `inftrim patch`.
//!
//! Reads a sectioned file, filters it through the configured rule set, reports
//! the diff, and replaces the file unless running dry.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::rewrite::rewrite;
use crate::core::rules::RuleSet;
use crate::diff::{present, present_colored};
use crate::io::transform::{FileEdit, transform_file};

#[derive(Debug, Clone, Copy, Default)]
pub struct PatchOptions {
    pub dry_run: bool,
}

/// Outcome of `inftrim patch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    pub edit: FileEdit,
    pub written: bool,
}

impl PatchOutcome {
    pub fn changed(&self) -> bool {
        self.edit.changed()
    }

    /// Unified diff between the original and patched contents.
    pub fn diff(&self) -> String {
        let (before, after) = self.labels();
        present(&before, &self.edit.before, &after, &self.edit.after)
    }

    /// [`PatchOutcome::diff`] coloured for a terminal, lines prefixed by `indent`.
    pub fn diff_colored(&self, indent: &str) -> String {
        let (before, after) = self.labels();
        present_colored(indent, &before, &self.edit.before, &after, &self.edit.after)
    }

    fn labels(&self) -> (String, String) {
        let label = self.edit.path.display().to_string();
        (format!("a/{label}"), format!("b/{label}"))
    }
}

/// Apply `rules` to the file at `path`.
pub fn patch_file(path: &Path, rules: &RuleSet, opts: PatchOptions) -> Result<PatchOutcome> {
    debug!(path = %path.display(), dry_run = opts.dry_run, "patching");
    let edit = transform_file(path, |buf| {
        Ok(rewrite(buf, |records, sink| rules.apply(records, sink))?)
    })?;

    let written = if opts.dry_run {
        false
    } else {
        edit.persist()
            .with_context(|| format!("write patched {}", path.display()))?
    };
    info!(
        path = %path.display(),
        changed = edit.changed(),
        written,
        "patched"
    );
    Ok(PatchOutcome { edit, written })
}
