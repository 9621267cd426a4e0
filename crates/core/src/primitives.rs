//! Hash primitives
//!
//! Each primitive is a pure function from bytes to a fixed-size digest. The
//! SHA-3 candidate family used by the X-chains is implemented here; SHA-2,
//! Keccak and BLAKE2s come from RustCrypto.

pub mod aes;
pub mod bytes;

mod blake;
mod bmw;
mod cubehash;
mod echo;
mod fugue;
mod groestl;
mod hamsi;
mod jh;
mod luffa;
mod shabal;
mod shavite;
mod simd;
mod skein;
mod whirlpool;

pub use blake::{ROUNDS_256, ROUNDS_256_FAST, blake256, blake256_rounds, blake512};
pub use bmw::bmw512;
pub use cubehash::cubehash512;
pub use echo::echo512;
pub use fugue::{fugue256, fugue512};
pub use groestl::groestl512;
pub use hamsi::hamsi512;
pub use jh::jh512;
pub use luffa::luffa512;
pub use shabal::shabal512;
pub use shavite::shavite512;
pub use simd::simd512;
pub use skein::skein512;
pub use whirlpool::whirlpool;

use core::fmt;
use core::ops::Deref;

use sha2::{Digest, Sha256, Sha512};
use sha3::{Keccak256, Keccak512};

use crate::params::MAX_STAGE_OUTPUT;

/// Descriptor of one hash primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Blake512,
    Bmw512,
    Groestl512,
    Skein512,
    Jh512,
    /// Keccak-512 with the original `0x01` padding
    Keccak512,
    Luffa512,
    CubeHash512,
    Shavite512,
    Simd512,
    Echo512,
    Hamsi512,
    Fugue512,
    Shabal512,
    Whirlpool,
    Sha512,
    Sha256,
    Keccak256,
    /// BLAKE-256, 14 rounds
    Blake256,
    /// BLAKE-256, 8 rounds
    Blake256R8,
    Fugue256,
}

impl Primitive {
    /// Every primitive, in declaration order
    pub const ALL: [Primitive; 21] = [
        Primitive::Blake512,
        Primitive::Bmw512,
        Primitive::Groestl512,
        Primitive::Skein512,
        Primitive::Jh512,
        Primitive::Keccak512,
        Primitive::Luffa512,
        Primitive::CubeHash512,
        Primitive::Shavite512,
        Primitive::Simd512,
        Primitive::Echo512,
        Primitive::Hamsi512,
        Primitive::Fugue512,
        Primitive::Shabal512,
        Primitive::Whirlpool,
        Primitive::Sha512,
        Primitive::Sha256,
        Primitive::Keccak256,
        Primitive::Blake256,
        Primitive::Blake256R8,
        Primitive::Fugue256,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Primitive::Blake512 => "blake512",
            Primitive::Bmw512 => "bmw512",
            Primitive::Groestl512 => "groestl512",
            Primitive::Skein512 => "skein512",
            Primitive::Jh512 => "jh512",
            Primitive::Keccak512 => "keccak512",
            Primitive::Luffa512 => "luffa512",
            Primitive::CubeHash512 => "cubehash512",
            Primitive::Shavite512 => "shavite512",
            Primitive::Simd512 => "simd512",
            Primitive::Echo512 => "echo512",
            Primitive::Hamsi512 => "hamsi512",
            Primitive::Fugue512 => "fugue512",
            Primitive::Shabal512 => "shabal512",
            Primitive::Whirlpool => "whirlpool",
            Primitive::Sha512 => "sha512",
            Primitive::Sha256 => "sha256",
            Primitive::Keccak256 => "keccak256",
            Primitive::Blake256 => "blake256",
            Primitive::Blake256R8 => "blake256r8",
            Primitive::Fugue256 => "fugue256",
        }
    }

    /// Digest length in bytes
    pub const fn output_size(self) -> usize {
        match self {
            Primitive::Sha256
            | Primitive::Keccak256
            | Primitive::Blake256
            | Primitive::Blake256R8
            | Primitive::Fugue256 => 32,
            _ => 64,
        }
    }

    /// Bytes absorbed per compression call (the rate, for sponges)
    pub const fn block_size(self) -> usize {
        match self {
            Primitive::Blake512
            | Primitive::Bmw512
            | Primitive::Groestl512
            | Primitive::Shavite512
            | Primitive::Simd512
            | Primitive::Echo512
            | Primitive::Sha512 => 128,
            Primitive::Skein512
            | Primitive::Jh512
            | Primitive::Shabal512
            | Primitive::Whirlpool
            | Primitive::Sha256
            | Primitive::Blake256
            | Primitive::Blake256R8 => 64,
            Primitive::Keccak512 => 72,
            Primitive::Keccak256 => 136,
            Primitive::Luffa512 | Primitive::CubeHash512 => 32,
            Primitive::Hamsi512 => 8,
            Primitive::Fugue512 | Primitive::Fugue256 => 4,
        }
    }

    /// Internal state carried between blocks, in bytes
    pub const fn state_size(self) -> usize {
        match self {
            Primitive::Blake512 | Primitive::Skein512 | Primitive::Shavite512 => 64,
            Primitive::Hamsi512 | Primitive::Whirlpool | Primitive::Sha512 => 64,
            Primitive::Bmw512
            | Primitive::Groestl512
            | Primitive::Jh512
            | Primitive::CubeHash512
            | Primitive::Simd512
            | Primitive::Echo512 => 128,
            Primitive::Keccak512 | Primitive::Keccak256 => 200,
            Primitive::Luffa512 => 160,
            Primitive::Fugue512 => 144,
            Primitive::Fugue256 => 120,
            Primitive::Shabal512 => 176,
            Primitive::Sha256 | Primitive::Blake256 | Primitive::Blake256R8 => 32,
        }
    }

    /// Hash `data`
    pub fn digest(self, data: &[u8]) -> Output {
        let mut out = Output::new(self.output_size());
        let buf = &mut out.buf;
        match self {
            Primitive::Blake512 => *buf = blake512(data),
            Primitive::Bmw512 => *buf = bmw512(data),
            Primitive::Groestl512 => *buf = groestl512(data),
            Primitive::Skein512 => *buf = skein512(data),
            Primitive::Jh512 => *buf = jh512(data),
            Primitive::Keccak512 => buf.copy_from_slice(&Keccak512::digest(data)),
            Primitive::Luffa512 => *buf = luffa512(data),
            Primitive::CubeHash512 => *buf = cubehash512(data),
            Primitive::Shavite512 => *buf = shavite512(data),
            Primitive::Simd512 => *buf = simd512(data),
            Primitive::Echo512 => *buf = echo512(data),
            Primitive::Hamsi512 => *buf = hamsi512(data),
            Primitive::Fugue512 => *buf = fugue512(data),
            Primitive::Shabal512 => *buf = shabal512(data),
            Primitive::Whirlpool => *buf = whirlpool(data),
            Primitive::Sha512 => buf.copy_from_slice(&Sha512::digest(data)),
            Primitive::Sha256 => buf[..32].copy_from_slice(&Sha256::digest(data)),
            Primitive::Keccak256 => buf[..32].copy_from_slice(&Keccak256::digest(data)),
            Primitive::Blake256 => buf[..32].copy_from_slice(&blake256(data)),
            Primitive::Blake256R8 => {
                buf[..32].copy_from_slice(&blake256_rounds(data, ROUNDS_256_FAST))
            }
            Primitive::Fugue256 => buf[..32].copy_from_slice(&fugue256(data)),
        }
        out
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stack buffer holding one primitive's digest
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Output {
    buf: [u8; MAX_STAGE_OUTPUT],
    len: usize,
}

impl Output {
    fn new(len: usize) -> Self {
        Self {
            buf: [0u8; MAX_STAGE_OUTPUT],
            len,
        }
    }
}

impl Deref for Output {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.iter() {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_sizes() {
        for p in Primitive::ALL {
            assert_eq!(p.digest(b"abc").len(), p.output_size(), "{p}");
        }
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<_> = Primitive::ALL.iter().map(|p| p.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Primitive::ALL.len());
    }

    #[test]
    fn test_rustcrypto_backed() {
        assert_eq!(
            hex::encode(&*Primitive::Sha256.digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            hex::encode(&*Primitive::Keccak256.digest(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(
            hex::encode(&*Primitive::Keccak512.digest(b"")),
            "0eab42de4c3ceb9235fc91acffe746b29c29a8c366b7c60e4e67c466f36a4304\
             c00fa9caf9d87976ba469bcbe06713b435f091ef2769fb160cdab33d3670680e"
        );
    }

    #[test]
    fn test_blake_round_variants_differ() {
        assert_ne!(
            Primitive::Blake256.digest(b"blake"),
            Primitive::Blake256R8.digest(b"blake")
        );
    }

    #[test]
    fn test_digest_is_pure() {
        for p in Primitive::ALL {
            assert_eq!(p.digest(&[0x5a; 80]), p.digest(&[0x5a; 80]), "{p}");
        }
    }
}
