//! BLAKE-256 and BLAKE-512 (final SHA-3 round version)
//!
//! The counter fed to each compression is the number of message bits up to
//! and including that block; a block holding only padding uses counter 0.

use super::bytes::{be32, be64, put_be32, put_be64, split_blocks};

/// Message word permutations, shared by both widths
const SIGMA: [[usize; 16]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
];

/// Digits of pi, 32-bit words
const C32: [u32; 16] = [
    0x243F6A88, 0x85A308D3, 0x13198A2E, 0x03707344, 0xA4093822, 0x299F31D0, 0x082EFA98,
    0xEC4E6C89, 0x452821E6, 0x38D01377, 0xBE5466CF, 0x34E90C6C, 0xC0AC29B7, 0xC97C50DD,
    0x3F84D5B5, 0xB5470917,
];

/// Digits of pi, 64-bit words
const C64: [u64; 16] = [
    0x243F6A8885A308D3,
    0x13198A2E03707344,
    0xA4093822299F31D0,
    0x082EFA98EC4E6C89,
    0x452821E638D01377,
    0xBE5466CF34E90C6C,
    0xC0AC29B7C97C50DD,
    0x3F84D5B5B5470917,
    0x9216D5D98979FB1B,
    0xD1310BA698DFB5AC,
    0x2FFD72DBD01ADFB7,
    0xB8E1AFED6A267E96,
    0xBA7C9045F12C7F99,
    0x24A19947B3916CF7,
    0x0801F2E2858EFC16,
    0x636920D871574E69,
];

const IV256: [u32; 8] = [
    0x6A09E667, 0xBB67AE85, 0x3C6EF372, 0xA54FF53A, 0x510E527F, 0x9B05688C, 0x1F83D9AB,
    0x5BE0CD19,
];

const IV512: [u64; 8] = [
    0x6A09E667F3BCC908,
    0xBB67AE8584CAA73B,
    0x3C6EF372FE94F82B,
    0xA54FF53A5F1D36F1,
    0x510E527FADE682D1,
    0x9B05688C2B3E6C1F,
    0x1F83D9ABFB41BD6B,
    0x5BE0CD19137E2179,
];

/// Standard BLAKE-256 round count
pub const ROUNDS_256: usize = 14;

/// Reduced round count used by Blakecoin and its forks
pub const ROUNDS_256_FAST: usize = 8;

const ROUNDS_512: usize = 16;

/// BLAKE-256 with the standard 14 rounds
pub fn blake256(data: &[u8]) -> [u8; 32] {
    blake256_rounds(data, ROUNDS_256)
}

/// BLAKE-256 with a caller-chosen round count
pub fn blake256_rounds(data: &[u8], rounds: usize) -> [u8; 32] {
    let mut h = IV256;
    let (blocks, tail) = split_blocks::<64>(data);

    let mut counter: u64 = 0;
    for block in blocks {
        counter += 512;
        compress256(&mut h, block, counter, rounds);
    }

    let bits = (data.len() as u64) << 3;
    let mut buf = [0u8; 64];
    buf[..tail.len()].copy_from_slice(tail);
    buf[tail.len()] = 0x80;

    // Only padding in the final block: counter restarts at zero.
    let tail_counter = if tail.is_empty() { 0 } else { bits };

    if tail.len() <= 55 {
        buf[55] |= 0x01;
        buf[56..].copy_from_slice(&bits.to_be_bytes());
        compress256(&mut h, &buf, tail_counter, rounds);
    } else {
        compress256(&mut h, &buf, tail_counter, rounds);
        let mut last = [0u8; 64];
        last[55] = 0x01;
        last[56..].copy_from_slice(&bits.to_be_bytes());
        compress256(&mut h, &last, 0, rounds);
    }

    let mut out = [0u8; 32];
    put_be32(&mut out, &h);
    out
}

/// BLAKE-512
pub fn blake512(data: &[u8]) -> [u8; 64] {
    let mut h = IV512;
    let (blocks, tail) = split_blocks::<128>(data);

    let mut counter: u128 = 0;
    for block in blocks {
        counter += 1024;
        compress512(&mut h, block, counter);
    }

    let bits = (data.len() as u128) << 3;
    let mut buf = [0u8; 128];
    buf[..tail.len()].copy_from_slice(tail);
    buf[tail.len()] = 0x80;

    let tail_counter = if tail.is_empty() { 0 } else { bits };

    if tail.len() <= 111 {
        buf[111] |= 0x01;
        buf[112..].copy_from_slice(&bits.to_be_bytes());
        compress512(&mut h, &buf, tail_counter);
    } else {
        compress512(&mut h, &buf, tail_counter);
        let mut last = [0u8; 128];
        last[111] = 0x01;
        last[112..].copy_from_slice(&bits.to_be_bytes());
        compress512(&mut h, &last, 0);
    }

    let mut out = [0u8; 64];
    put_be64(&mut out, &h);
    out
}

fn compress256(h: &mut [u32; 8], block: &[u8; 64], counter: u64, rounds: usize) {
    let m: [u32; 16] = core::array::from_fn(|i| be32(block, i));
    let t0 = counter as u32;
    let t1 = (counter >> 32) as u32;

    let mut v = [0u32; 16];
    v[..8].copy_from_slice(h);
    v[8..12].copy_from_slice(&C32[..4]);
    v[12] = t0 ^ C32[4];
    v[13] = t0 ^ C32[5];
    v[14] = t1 ^ C32[6];
    v[15] = t1 ^ C32[7];

    for r in 0..rounds {
        let s = &SIGMA[r % 10];
        g32(&mut v, &m, s, 0, 0, 4, 8, 12);
        g32(&mut v, &m, s, 1, 1, 5, 9, 13);
        g32(&mut v, &m, s, 2, 2, 6, 10, 14);
        g32(&mut v, &m, s, 3, 3, 7, 11, 15);
        g32(&mut v, &m, s, 4, 0, 5, 10, 15);
        g32(&mut v, &m, s, 5, 1, 6, 11, 12);
        g32(&mut v, &m, s, 6, 2, 7, 8, 13);
        g32(&mut v, &m, s, 7, 3, 4, 9, 14);
    }

    for i in 0..8 {
        h[i] ^= v[i] ^ v[i + 8];
    }
}

#[allow(clippy::too_many_arguments)]
#[inline(always)]
fn g32(v: &mut [u32; 16], m: &[u32; 16], s: &[usize; 16], i: usize, a: usize, b: usize, c: usize, d: usize) {
    let (x, y) = (s[2 * i], s[2 * i + 1]);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(m[x] ^ C32[y]);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(12);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(m[y] ^ C32[x]);
    v[d] = (v[d] ^ v[a]).rotate_right(8);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(7);
}

fn compress512(h: &mut [u64; 8], block: &[u8; 128], counter: u128) {
    let m: [u64; 16] = core::array::from_fn(|i| be64(block, i));
    let t0 = counter as u64;
    let t1 = (counter >> 64) as u64;

    let mut v = [0u64; 16];
    v[..8].copy_from_slice(h);
    v[8..12].copy_from_slice(&C64[..4]);
    v[12] = t0 ^ C64[4];
    v[13] = t0 ^ C64[5];
    v[14] = t1 ^ C64[6];
    v[15] = t1 ^ C64[7];

    for r in 0..ROUNDS_512 {
        let s = &SIGMA[r % 10];
        g64(&mut v, &m, s, 0, 0, 4, 8, 12);
        g64(&mut v, &m, s, 1, 1, 5, 9, 13);
        g64(&mut v, &m, s, 2, 2, 6, 10, 14);
        g64(&mut v, &m, s, 3, 3, 7, 11, 15);
        g64(&mut v, &m, s, 4, 0, 5, 10, 15);
        g64(&mut v, &m, s, 5, 1, 6, 11, 12);
        g64(&mut v, &m, s, 6, 2, 7, 8, 13);
        g64(&mut v, &m, s, 7, 3, 4, 9, 14);
    }

    for i in 0..8 {
        h[i] ^= v[i] ^ v[i + 8];
    }
}

#[allow(clippy::too_many_arguments)]
#[inline(always)]
fn g64(v: &mut [u64; 16], m: &[u64; 16], s: &[usize; 16], i: usize, a: usize, b: usize, c: usize, d: usize) {
    let (x, y) = (s[2 * i], s[2 * i + 1]);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(m[x] ^ C64[y]);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(25);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(m[y] ^ C64[x]);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(11);
}
