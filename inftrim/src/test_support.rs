//! Test-only helpers for building fixtures.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::core::prune::DependencyGraph;
use crate::io::imports::ImportExtractor;

/// Strip the common indentation of an indented multiline literal.
///
/// The literal must start with a newline. The trailing whitespace-only line
/// (the indentation before the closing quote) is dropped; blank lines stay
/// blank.
pub fn unindent(text: &str) -> String {
    let text = text
        .strip_prefix('\n')
        .expect("fixture must start on a new line");
    let body = text.trim_end_matches([' ', '\t']);
    let indent_len = body.len() - body.trim_start_matches([' ', '\t']).len();
    let indent = &body[..indent_len];

    let mut out = String::with_capacity(body.len());
    for line in body.split_inclusive('\n') {
        if line == "\n" {
            out.push('\n');
            continue;
        }
        let stripped = line
            .strip_prefix(indent)
            .unwrap_or_else(|| panic!("line {line:?} is not indented with {indent:?}"));
        out.push_str(stripped);
    }
    out
}

/// Build a dependency graph from `(module, imports)` pairs.
pub fn graph(entries: &[(&str, &[&str])]) -> DependencyGraph {
    entries.iter().map(|(name, deps)| (*name, deps.iter())).collect()
}

pub fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Import extractor backed by a fixed table keyed by file name.
#[derive(Debug, Default)]
pub struct FakeExtractor {
    imports: BTreeMap<String, Vec<String>>,
}

impl FakeExtractor {
    pub fn new(entries: &[(&str, &[&str])]) -> Self {
        let imports = entries
            .iter()
            .map(|(name, deps)| {
                (
                    name.to_string(),
                    deps.iter().map(|dep| dep.to_string()).collect(),
                )
            })
            .collect();
        Self { imports }
    }
}

impl ImportExtractor for FakeExtractor {
    fn imports(&self, path: &Path) -> Result<Vec<String>> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow!("bad path {}", path.display()))?;
        self.imports
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("not a module: {name}"))
    }
}

/// Create empty files named `names` under `dir`.
pub fn touch_all(dir: &Path, names: &[&str]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for name in names {
        let path = dir.join(name);
        fs::write(&path, b"").with_context(|| format!("write {}", path.display()))?;
        paths.push(path);
    }
    Ok(paths)
}

/// Sorted names of the non-directory entries directly under `dir`.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
