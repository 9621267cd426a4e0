//! Whirlpool (ISO/IEC 10118-3, final version)
//!
//! The 8x8 state is row-major: byte `8 * row + col`.

use super::bytes::split_blocks;

const ROUNDS: usize = 10;

const E: [u8; 16] = [0x1, 0xB, 0x9, 0xC, 0xD, 0x6, 0xF, 0x3, 0xE, 0x8, 0x7, 0x4, 0xA, 0x2, 0x5, 0x0];
const R: [u8; 16] = [0x7, 0xC, 0xB, 0xD, 0xE, 0x4, 0x9, 0xF, 0x6, 0x3, 0x8, 0xA, 0x2, 0x5, 0x1, 0x0];

const CIRC: [u8; 8] = [1, 1, 4, 1, 8, 5, 2, 9];

/// S-box assembled from the E, E^-1 and R mini-boxes
const SBOX: [u8; 256] = {
    let mut e_inv = [0u8; 16];
    let mut i = 0;
    while i < 16 {
        e_inv[E[i] as usize] = i as u8;
        i += 1;
    }

    let mut s = [0u8; 256];
    let mut u = 0;
    while u < 256 {
        let a = E[u >> 4];
        let b = e_inv[u & 0xf];
        let r = R[(a ^ b) as usize];
        s[u] = (E[(a ^ r) as usize] << 4) | e_inv[(b ^ r) as usize];
        u += 1;
    }
    s
};

/// Multiply in GF(2^8) modulo x^8 + x^4 + x^3 + x^2 + 1
const fn mul(mut a: u8, mut b: u8) -> u8 {
    let mut r = 0u8;
    while b != 0 {
        if b & 1 != 0 {
            r ^= a;
        }
        let hi = a & 0x80;
        a <<= 1;
        if hi != 0 {
            a ^= 0x1d;
        }
        b >>= 1;
    }
    r
}

type State = [u8; 64];

/// Whirlpool-512
pub fn whirlpool(data: &[u8]) -> [u8; 64] {
    let mut h: State = [0u8; 64];

    let (blocks, tail) = split_blocks::<64>(data);
    for block in blocks {
        compress(&mut h, block);
    }

    let mut buf = [0u8; 128];
    buf[..tail.len()].copy_from_slice(tail);
    buf[tail.len()] = 0x80;
    let end = if tail.len() < 32 { 64 } else { 128 };
    let bits = (data.len() as u64).wrapping_mul(8);
    buf[end - 8..end].copy_from_slice(&bits.to_be_bytes());

    for chunk in buf[..end].chunks_exact(64) {
        let mut m = [0u8; 64];
        m.copy_from_slice(chunk);
        compress(&mut h, &m);
    }
    h
}

/// Miyaguchi-Preneel step over the W block cipher
fn compress(h: &mut State, m: &State) {
    let mut k = *h;
    let mut s: State = core::array::from_fn(|i| m[i] ^ k[i]);

    for r in 1..=ROUNDS {
        let mut rc = [0u8; 64];
        rc[..8].copy_from_slice(&SBOX[8 * (r - 1)..8 * r]);
        k = round(&k, &rc);
        s = round(&s, &k);
    }

    for i in 0..64 {
        h[i] ^= s[i] ^ m[i];
    }
}

/// One round: SubBytes, column rotation, row mixing, key addition
fn round(a: &State, key: &State) -> State {
    let mut p = [0u8; 64];
    for row in 0..8 {
        for col in 0..8 {
            // Column `col` moves down by `col` rows.
            p[8 * row + col] = SBOX[a[8 * ((row + 8 - col) % 8) + col] as usize];
        }
    }

    let mut out = [0u8; 64];
    for row in 0..8 {
        for col in 0..8 {
            let mut acc = 0u8;
            for k in 0..8 {
                acc ^= mul(p[8 * row + k], CIRC[(col + 8 - k) % 8]);
            }
            out[8 * row + col] = acc ^ key[8 * row + col];
        }
    }
    out
}
