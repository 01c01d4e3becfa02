//! Import-table extraction and module graph construction.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use goblin::pe::PE;
use tracing::{debug, warn};

use crate::core::prune::DependencyGraph;
use crate::io::config::PruneConfig;

/// Source of a module's imported library names.
pub trait ImportExtractor {
    fn imports(&self, path: &Path) -> Result<Vec<String>>;
}

/// Reads the import descriptors of a PE image.
pub struct PeImportExtractor;

impl ImportExtractor for PeImportExtractor {
    fn imports(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
        let pe = PE::parse(&bytes).map_err(|err| anyhow!("parse pe {}: {err}", path.display()))?;
        Ok(pe.libraries.iter().map(|lib| lib.to_string()).collect())
    }
}

/// Build the dependency graph of the modules directly under `dir`.
///
/// Every non-directory entry with a configured extension is a module, symlinks
/// included; skipped names are left out, so anything importing them is pruned.
/// Files whose names differ only by case share one node.
pub fn build_graph<E: ImportExtractor>(
    dir: &Path,
    cfg: &PruneConfig,
    extractor: &E,
) -> Result<DependencyGraph> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read dir entry in {}", dir.display()))?;
        let path = entry.path();
        // Follows symlinks; a link to a module is a module.
        if path.is_dir() {
            continue;
        }
        entries.push(path);
    }
    entries.sort();

    let mut graph = DependencyGraph::new();
    for path in entries {
        if !cfg.matches_extension(&path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            warn!(path = %path.display(), "skipping non-utf8 file name");
            continue;
        };
        if cfg.is_skipped(name) {
            debug!(name, "skipping module");
            continue;
        }
        if graph.contains(name) {
            warn!(
                name,
                canonical = graph.canonical(name).unwrap_or(name),
                "module name differs from another only by case, treating both as one module"
            );
        }
        let deps = extractor
            .imports(&path)
            .with_context(|| format!("get deps for {name:?}"))?;
        debug!(name, deps = ?deps, "module imports");
        graph.insert(name, deps);
    }
    Ok(graph)
}
