//! Deterministic logic with no I/O.

pub mod committer;
pub mod committers_set;
pub mod trailers;
