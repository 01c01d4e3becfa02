//! I/O helpers for inftrim commands.

pub mod config;
pub mod imports;
pub mod transform;
