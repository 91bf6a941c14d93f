//! Shared utilities for palimpsest.
//!
//! This crate provides the ambient pieces the other crates lean on:
//! - Prefixed ULID identifier generation
//! - Path helpers (storage directories, normalization, safe joins)
//! - Logging setup built on `tracing`
//! - Wildcard matching for path-exclusion patterns

pub mod id;
pub mod log;
pub mod path;
pub mod wildcard;
