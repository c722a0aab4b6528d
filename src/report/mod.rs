//! Report renderers for check results.
//!
//! - [`terminal`] — colored, tabular output with summary box; respects `--verbose` / `--quiet`.
//!
//! The machine-readable JSON report is plain serialization of
//! [`crate::models::CheckReport`] and needs no renderer of its own.

pub mod terminal;
