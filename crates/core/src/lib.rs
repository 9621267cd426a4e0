//! # algohash core
//!
//! Proof-of-work digests used by altcoin block headers, behind a single
//! lookup-by-name entry point.
//!
//! ## Algorithms
//!
//! - **Chains**: x11, x13, x14, x15, quark, nist5, qubit, fresh, threes,
//!   groestl, myr-groestl, skein, shavite3
//! - **Header-ordered chains**: x16r, x16s
//! - **Single primitives**: keccak, blake, blake256, fugue
//! - **Memory-hard**: scrypt (alias `ltc_scrypt`), neoscrypt
//! - **Light verification**: meraki
//!
//! Every algorithm returns a 32-byte digest. Chains whose last stage is wider
//! keep its first 32 bytes.
//!
//! ## Example
//!
//! ```rust
//! use algohash_core::{compute, x11_hash, TEST_HEADER};
//!
//! let a = compute("x11", &TEST_HEADER).unwrap();
//! let b = x11_hash(&TEST_HEADER).unwrap();
//! assert_eq!(a, b);
//!
//! assert!(compute("not-an-algorithm", b"").is_err());
//! ```
//!
//! ## Concurrency
//!
//! The registry is built once and never mutated. Every function here is safe
//! to call from any number of threads; the only per-call state is local.

mod params;

pub mod chain;
pub mod error;
pub mod meraki;
pub mod neoscrypt;
pub mod primitives;
pub mod registry;

#[cfg(feature = "ffi")]
mod ffi;

pub use error::{Error, InputRule, Result};
pub use params::*;
pub use primitives::{Output, Primitive};
pub use registry::{
    Entry, Kind, Registry, blake_hash, blake256_hash, compute, compute_batch, digest,
    fresh_hash, fugue_hash, groestl_hash, keccak_hash, meraki_hash, myr_groestl_hash,
    neoscrypt_hash, nist5_hash, quark_hash, qubit_hash, registry, scrypt_hash, shavite3_hash,
    skein_hash, threes_hash, x11_hash, x13_hash, x14_hash, x15_hash, x16r_hash, x16s_hash,
};

#[cfg(test)]
mod tests;
