//! Section-aware rewriting of INF-style configuration files and dependency
//! closure pruning of module directories.
//!
//! The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (scanner, rewrite driver, rule
//!   filter, pruner). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config files, file replacement,
//!   import-table extraction).
//!
//! Orchestration modules ([`patch`], [`prune`], [`check`]) coordinate core
//! logic with I/O to implement CLI commands. [`diff`] renders before/after
//! reports.

pub mod check;
pub mod core;
pub mod diff;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod patch;
pub mod prune;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
