//! Common types and utilities for the Lyra compiler.
//!
//! This crate provides foundational types used across all lyra crates:
//! - String interning (`Atom`, `Interner`, `ShardedInterner`)

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner, ShardedInterner};
