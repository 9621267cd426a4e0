//! NeoScrypt (profile 0)
//!
//! FastKDF expands the 80-byte header into a 256-byte working buffer, which
//! is run through two sequential memory-hard mixes (ChaCha20/20 first, then
//! Salsa20/20) whose results are XORed together. A second FastKDF pass keyed
//! by the mixed buffer produces the 32-byte digest.

use blake2::Blake2sMac256;
use digest::{KeyInit, Mac};

use crate::error::{Error, Result};
use crate::params::*;

const BLOCK_WORDS: usize = 16;
const BLOCKS: usize = 2 * NEOSCRYPT_R;

/// PRF input window
const PRF_INPUT: usize = 64;
/// PRF key window and output size
const PRF_KEY: usize = 32;

type Blocks = [[u32; BLOCK_WORDS]; BLOCKS];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mixer {
    Salsa,
    ChaCha,
}

/// NeoScrypt hasher
///
/// Owns the 32 KB lookup table so repeated hashes avoid reallocating it.
/// Not meant to be shared across threads; give each worker its own.
pub struct NeoScrypt {
    v: Vec<Blocks>,
}

impl NeoScrypt {
    pub fn new() -> Self {
        Self {
            v: vec![[[0u32; BLOCK_WORDS]; BLOCKS]; NEOSCRYPT_N],
        }
    }

    /// Hash an 80-byte header
    pub fn hash(&mut self, header: &[u8; HEADER_SIZE]) -> Result<[u8; 32]> {
        let mut kdf = [0u8; FASTKDF_BUFFER];
        fastkdf(header, header, &mut kdf)?;

        let mut x = to_blocks(&kdf);
        let mut z = x;
        self.smix(&mut z, Mixer::ChaCha);
        self.smix(&mut x, Mixer::Salsa);
        for (xb, zb) in x.iter_mut().zip(&z) {
            xor_block(xb, zb);
        }

        let mut out = [0u8; 32];
        fastkdf(header, &from_blocks(&x), &mut out)?;
        Ok(out)
    }

    fn smix(&mut self, x: &mut Blocks, mixer: Mixer) {
        for slot in self.v.iter_mut() {
            *slot = *x;
            block_mix(x, mixer);
        }
        for _ in 0..NEOSCRYPT_N {
            let j = x[BLOCKS - 1][0] as usize & (NEOSCRYPT_N - 1);
            for (xb, vb) in x.iter_mut().zip(&self.v[j]) {
                xor_block(xb, vb);
            }
            block_mix(x, mixer);
        }
    }
}

impl Default for NeoScrypt {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot NeoScrypt
pub fn neoscrypt(header: &[u8; HEADER_SIZE]) -> Result<[u8; 32]> {
    NeoScrypt::new().hash(header)
}

/// FastKDF with BLAKE2s as the PRF
///
/// `password` must be at least 64 bytes and `salt` at least 32; `out` is at
/// most [`FASTKDF_BUFFER`] bytes.
pub fn fastkdf(password: &[u8], salt: &[u8], out: &mut [u8]) -> Result<()> {
    if password.len() < PRF_INPUT || salt.len() < PRF_KEY || out.len() > FASTKDF_BUFFER {
        return Err(Error::Kdf("fastkdf buffer sizes"));
    }

    // Ring buffers, each followed by a copy of its head.
    let mut a = [0u8; FASTKDF_BUFFER + PRF_INPUT];
    for (i, byte) in a[..FASTKDF_BUFFER].iter_mut().enumerate() {
        *byte = password[i % password.len()];
    }
    a[FASTKDF_BUFFER..].copy_from_slice(&password[..PRF_INPUT]);

    let mut b = [0u8; FASTKDF_BUFFER + PRF_KEY];
    for (i, byte) in b[..FASTKDF_BUFFER].iter_mut().enumerate() {
        *byte = salt[i % salt.len()];
    }
    b[FASTKDF_BUFFER..].copy_from_slice(&salt[..PRF_KEY]);

    let mut ptr = 0usize;
    for _ in 0..FASTKDF_ROUNDS {
        let mut prf = <Blake2sMac256 as KeyInit>::new_from_slice(&b[ptr..ptr + PRF_KEY])
            .map_err(|_| Error::Kdf("blake2s key length"))?;
        prf.update(&a[ptr..ptr + PRF_INPUT]);
        let prf = prf.finalize().into_bytes();

        ptr = prf.iter().map(|&x| x as usize).sum::<usize>() & (FASTKDF_BUFFER - 1);
        for (dst, src) in b[ptr..ptr + PRF_KEY].iter_mut().zip(prf.iter()) {
            *dst ^= src;
        }

        // Keep head and tail copies in sync.
        if ptr < PRF_KEY {
            b.copy_within(ptr..PRF_KEY, FASTKDF_BUFFER + ptr);
        }
        if FASTKDF_BUFFER - ptr < PRF_KEY {
            let n = ptr + PRF_KEY - FASTKDF_BUFFER;
            b.copy_within(FASTKDF_BUFFER..FASTKDF_BUFFER + n, 0);
        }
    }

    let head = FASTKDF_BUFFER - ptr;
    if head >= out.len() {
        for (k, o) in out.iter_mut().enumerate() {
            *o = b[ptr + k] ^ a[k];
        }
    } else {
        let (lo, hi) = out.split_at_mut(head);
        for (k, o) in lo.iter_mut().enumerate() {
            *o = b[ptr + k] ^ a[k];
        }
        for (k, o) in hi.iter_mut().enumerate() {
            *o = b[k] ^ a[head + k];
        }
    }
    Ok(())
}

fn to_blocks(bytes: &[u8; FASTKDF_BUFFER]) -> Blocks {
    core::array::from_fn(|blk| {
        core::array::from_fn(|w| {
            let o = 4 * (blk * BLOCK_WORDS + w);
            u32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]])
        })
    })
}

fn from_blocks(x: &Blocks) -> [u8; FASTKDF_BUFFER] {
    let mut out = [0u8; FASTKDF_BUFFER];
    for (chunk, w) in out.chunks_exact_mut(4).zip(x.iter().flatten()) {
        chunk.copy_from_slice(&w.to_le_bytes());
    }
    out
}

#[inline(always)]
fn xor_block(x: &mut [u32; BLOCK_WORDS], y: &[u32; BLOCK_WORDS]) {
    for (a, b) in x.iter_mut().zip(y) {
        *a ^= b;
    }
}

/// Chain every block with its predecessor through the core, then put even
/// blocks before odd ones.
fn block_mix(x: &mut Blocks, mixer: Mixer) {
    for i in 0..BLOCKS {
        let prev = x[(i + BLOCKS - 1) % BLOCKS];
        xor_block(&mut x[i], &prev);
        match mixer {
            Mixer::Salsa => salsa(&mut x[i]),
            Mixer::ChaCha => chacha(&mut x[i]),
        }
    }
    let t = *x;
    for i in 0..NEOSCRYPT_R {
        x[i] = t[2 * i];
        x[NEOSCRYPT_R + i] = t[2 * i + 1];
    }
}

#[inline(always)]
fn salsa_quarter(x: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    x[b] ^= x[a].wrapping_add(x[d]).rotate_left(7);
    x[c] ^= x[b].wrapping_add(x[a]).rotate_left(9);
    x[d] ^= x[c].wrapping_add(x[b]).rotate_left(13);
    x[a] ^= x[d].wrapping_add(x[c]).rotate_left(18);
}

fn salsa(block: &mut [u32; 16]) {
    let mut x = *block;
    for _ in 0..NEOSCRYPT_ROUNDS / 2 {
        // columns
        salsa_quarter(&mut x, 0, 4, 8, 12);
        salsa_quarter(&mut x, 5, 9, 13, 1);
        salsa_quarter(&mut x, 10, 14, 2, 6);
        salsa_quarter(&mut x, 15, 3, 7, 11);
        // rows
        salsa_quarter(&mut x, 0, 1, 2, 3);
        salsa_quarter(&mut x, 5, 6, 7, 4);
        salsa_quarter(&mut x, 10, 11, 8, 9);
        salsa_quarter(&mut x, 15, 12, 13, 14);
    }
    for (b, v) in block.iter_mut().zip(x) {
        *b = b.wrapping_add(v);
    }
}

#[inline(always)]
fn chacha_quarter(x: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    x[a] = x[a].wrapping_add(x[b]);
    x[d] = (x[d] ^ x[a]).rotate_left(16);
    x[c] = x[c].wrapping_add(x[d]);
    x[b] = (x[b] ^ x[c]).rotate_left(12);
    x[a] = x[a].wrapping_add(x[b]);
    x[d] = (x[d] ^ x[a]).rotate_left(8);
    x[c] = x[c].wrapping_add(x[d]);
    x[b] = (x[b] ^ x[c]).rotate_left(7);
}

fn chacha(block: &mut [u32; 16]) {
    let mut x = *block;
    for _ in 0..NEOSCRYPT_ROUNDS / 2 {
        chacha_quarter(&mut x, 0, 4, 8, 12);
        chacha_quarter(&mut x, 1, 5, 9, 13);
        chacha_quarter(&mut x, 2, 6, 10, 14);
        chacha_quarter(&mut x, 3, 7, 11, 15);
        chacha_quarter(&mut x, 0, 5, 10, 15);
        chacha_quarter(&mut x, 1, 6, 11, 12);
        chacha_quarter(&mut x, 2, 7, 8, 13);
        chacha_quarter(&mut x, 3, 4, 9, 14);
    }
    for (b, v) in block.iter_mut().zip(x) {
        *b = b.wrapping_add(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neoscrypt_header_vector() {
        assert_eq!(
            hex::encode(neoscrypt(&TEST_HEADER).unwrap()),
            "eed93239b2b63409b9d3babbf187874253e98e370c4517f805ab6c1ad1a4151a"
        );
        assert_eq!(
            hex::encode(neoscrypt(&[0u8; HEADER_SIZE]).unwrap()),
            "2c400aba7b67aae2eb8afe32a31303b43a5b2ad884badd97c7984e6b7e3b2c7b"
        );
    }

    #[test]
    fn test_fastkdf_vector() {
        let mut out = [0u8; 32];
        fastkdf(&TEST_HEADER, &TEST_HEADER, &mut out).unwrap();
        assert_eq!(
            hex::encode(out),
            "523abc4d580868455729e9f5ce73bc7a2806abf03828cd5f95b655820e8b145f"
        );
    }

    #[test]
    fn test_fastkdf_rejects_short_password() {
        let mut out = [0u8; 32];
        assert_eq!(
            fastkdf(&[0u8; 16], &[0u8; 80], &mut out),
            Err(Error::Kdf("fastkdf buffer sizes"))
        );
    }

    #[test]
    fn test_hasher_reuse() {
        let mut hasher = NeoScrypt::new();
        let a = hasher.hash(&TEST_HEADER).unwrap();
        let b = hasher.hash(&[1u8; HEADER_SIZE]).unwrap();
        assert_ne!(a, b);
        assert_eq!(hasher.hash(&TEST_HEADER).unwrap(), a);
    }

    #[test]
    fn test_chacha_rfc7539_block() {
        // RFC 7539 2.3.2 test vector (state before the keystream serialisation)
        let mut state: [u32; 16] = [
            0x61707865, 0x3320646e, 0x79622d32, 0x6b206574, 0x03020100, 0x07060504, 0x0b0a0908,
            0x0f0e0d0c, 0x13121110, 0x17161514, 0x1b1a1918, 0x1f1e1d1c, 0x00000001, 0x09000000,
            0x4a000000, 0x00000000,
        ];
        chacha(&mut state);
        assert_eq!(state[0], 0xe4e7f110);
        assert_eq!(state[15], 0x4e3c50a2);
    }

    #[test]
    fn test_block_mix_reorders() {
        let mut x: Blocks = [[0u32; 16]; BLOCKS];
        x[0][0] = 1;
        let mut y = x;
        block_mix(&mut x, Mixer::Salsa);
        block_mix(&mut y, Mixer::ChaCha);
        assert_ne!(x, y);
    }
}
