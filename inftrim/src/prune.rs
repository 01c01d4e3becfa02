//! Orchestration for `inftrim prune`.
//!
//! Builds the module graph of a directory, computes its dependency closure,
//! and deletes every module that imports something no longer present.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::core::prune::prune;
use crate::core::types::PruneOutcome;
use crate::io::config::PruneConfig;
use crate::io::imports::{ImportExtractor, build_graph};

#[derive(Debug, Clone, Copy, Default)]
pub struct PruneOptions {
    pub dry_run: bool,
}

/// Outcome of `inftrim prune`.
///
/// `deleted` lists file paths in removal order, every spelling of a removed
/// module included; it stays empty on dry runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub dir: PathBuf,
    pub modules: usize,
    #[serde(flatten)]
    pub outcome: PruneOutcome,
    pub deleted: Vec<PathBuf>,
}

pub fn prune_dir<E: ImportExtractor>(
    dir: &Path,
    cfg: &PruneConfig,
    extractor: &E,
    opts: PruneOptions,
) -> Result<PruneReport> {
    info!(dir = %dir.display(), "building module graph");
    let graph = build_graph(dir, cfg, extractor)?;
    let outcome = prune(&graph);

    let mut deleted = Vec::new();
    for removal in &outcome.removals {
        let files = graph.spellings(&removal.module);
        debug!(
            iteration = removal.round,
            name = %graph.canonical(&removal.module).unwrap_or(removal.module.as_str()),
            files = ?files,
            broken_deps = ?removal.missing,
            "removing"
        );
        if opts.dry_run {
            continue;
        }
        for file in files {
            let path = dir.join(file);
            fs::remove_file(&path).with_context(|| format!("delete {}", path.display()))?;
            deleted.push(path);
        }
    }

    info!(
        modules = graph.len(),
        removed = outcome.removals.len(),
        rounds = outcome.rounds(),
        dry_run = opts.dry_run,
        "pruned module graph"
    );
    Ok(PruneReport {
        dir: dir.to_path_buf(),
        modules: graph.len(),
        outcome,
        deleted,
    })
}
