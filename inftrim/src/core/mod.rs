//! Deterministic, pure logic shared by the rewriter and the pruner.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! buffers and name lists and return deterministic outputs suitable for tests.

pub mod prune;
pub mod rewrite;
pub mod rules;
pub mod scanner;
pub mod sink;
pub mod types;
