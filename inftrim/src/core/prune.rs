//! Dependency closure pruning.
//!
//! Starting from every module, repeatedly drop modules that import something
//! no longer present until a round removes nothing.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::types::{PruneOutcome, Removal};

/// Case-folded graph identity of a module name.
pub fn fold_name(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Module name -> imported module names, keyed by folded name.
///
/// Names differing only by case are the same node. Every spelling seen is
/// recorded; the first one is canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    deps: BTreeMap<String, Vec<String>>,
    spelling: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name` with its imports. Inserting the same node twice merges the
    /// import lists.
    pub fn insert<I, S>(&mut self, name: &str, deps: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = fold_name(name);
        let spellings = self.spelling.entry(key.clone()).or_default();
        if !spellings.iter().any(|known| known == name) {
            spellings.push(name.to_string());
        }
        self.deps
            .entry(key)
            .or_default()
            .extend(deps.into_iter().map(|dep| fold_name(dep.as_ref())));
    }

    pub fn len(&self) -> usize {
        self.deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.deps.contains_key(&fold_name(name))
    }

    /// Folded module names in lexicographic order.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.deps.keys().map(String::as_str)
    }

    pub fn dependencies(&self, name: &str) -> Option<&[String]> {
        self.deps.get(&fold_name(name)).map(Vec::as_slice)
    }

    /// First spelling recorded for `name`.
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.spellings(name).first().map(String::as_str)
    }

    /// Every spelling recorded for `name`, in insertion order.
    pub fn spellings(&self, name: &str) -> &[String] {
        self.spelling
            .get(&fold_name(name))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Sub-graph of the modules in `keep`, with their import lists untouched.
    pub fn restricted_to(&self, keep: &BTreeSet<String>) -> DependencyGraph {
        let deps = self
            .deps
            .iter()
            .filter(|(name, _)| keep.contains(*name))
            .map(|(name, deps)| (name.clone(), deps.clone()))
            .collect();
        let spelling = self
            .spelling
            .iter()
            .filter(|(name, _)| keep.contains(*name))
            .map(|(name, original)| (name.clone(), original.clone()))
            .collect();
        DependencyGraph { deps, spelling }
    }
}

impl<N, I, S> FromIterator<(N, I)> for DependencyGraph
where
    N: AsRef<str>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        let mut graph = DependencyGraph::new();
        for (name, deps) in iter {
            graph.insert(name.as_ref(), deps);
        }
        graph
    }
}

/// Compute the largest subset of `graph` whose members import only members.
///
/// Each round checks every retained module, in name order, against a frozen
/// snapshot of the retained set, then removes all broken modules together.
/// A self-import never causes removal on its own: the module is still
/// retained when it is checked. Duplicate imports are reported once.
pub fn prune(graph: &DependencyGraph) -> PruneOutcome {
    let mut retained: BTreeSet<String> = graph.deps.keys().cloned().collect();
    let mut removals = Vec::new();
    let mut round = 0;

    loop {
        round += 1;
        let broken: Vec<(String, Vec<String>)> = retained
            .iter()
            .filter_map(|name| {
                let deps = graph.deps.get(name).map_or(&[][..], Vec::as_slice);
                let missing = missing_dependencies(deps, &retained);
                (!missing.is_empty()).then(|| (name.clone(), missing))
            })
            .collect();
        if broken.is_empty() {
            break;
        }
        for (module, missing) in broken {
            retained.remove(&module);
            removals.push(Removal {
                module,
                round,
                missing,
            });
        }
    }

    PruneOutcome { retained, removals }
}

fn missing_dependencies(deps: &[String], retained: &BTreeSet<String>) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for dep in deps {
        if !retained.contains(dep) && !missing.contains(dep) {
            missing.push(dep.clone());
        }
    }
    missing
}
