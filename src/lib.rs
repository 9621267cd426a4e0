//! algohash
//!
//! Proof-of-work digests for altcoin block headers.
//!
//! # Overview
//!
//! The algorithms live in [`algorithm`] (the `algohash-core` crate) and are
//! looked up by name through an immutable registry. This crate adds a
//! self-test runner and the `algohash` command-line tool.
//!
//! # Example
//!
//! ```rust
//! use algohash::algorithm::{TEST_HEADER, compute};
//!
//! let digest = compute("quark", &TEST_HEADER).unwrap();
//! assert_eq!(digest.len(), 32);
//!
//! let report = algohash::selftest::run();
//! assert!(report.passed());
//! ```

// Re-export the core algorithms
pub use algohash_core as algorithm;

pub mod selftest;

// Convenience re-exports
pub use algorithm::{Error, Registry, compute, registry};
