//! SIMD-512
//!
//! Message expansion is a number-theoretic transform over F_257 followed by
//! an inner code; the compression runs four rounds of eight steps over four
//! 8-word registers, then a four-step feed-forward keyed by the chaining
//! value.

use once_cell::sync::Lazy;

use super::bytes::{le32, put_le32, split_blocks};

const BLOCK: usize = 128;
const P: i32 = 257;
/// Element of order 256 in F_257
const ALPHA: i32 = 41;

const ROT: [[u32; 4]; 4] = [[3, 23, 17, 27], [28, 19, 22, 7], [29, 9, 15, 5], [4, 13, 10, 25]];
const FEED_ROT: [u32; 4] = [4, 13, 10, 25];

/// Word-exchange masks, indexed by the running step count modulo 7
const PERM: [usize; 7] = [1, 6, 2, 3, 5, 7, 4];

/// Which 16-coefficient slice of the transform feeds each step
const SLICE: [[usize; 8]; 4] = [
    [4, 6, 0, 2, 7, 5, 3, 1],
    [15, 11, 12, 8, 9, 13, 10, 14],
    [17, 18, 23, 20, 22, 21, 16, 19],
    [30, 24, 25, 31, 27, 29, 28, 26],
];

/// Per round: offsets of the low and high coefficient, and the inner-code multiplier
const PAIRING: [(isize, isize, i32); 4] = [(0, 1, 185), (0, 1, 185), (-256, -128, 233), (-383, -255, 233)];

type State = [[u32; 8]; 4];

static POW: Lazy<[i32; 256]> = Lazy::new(|| {
    let mut p = [1i32; 256];
    for i in 1..256 {
        p[i] = p[i - 1] * ALPHA % P;
    }
    p
});

static IV: Lazy<State> = Lazy::new(|| {
    let mut block = [0u8; BLOCK];
    let tag = b"SIMD-512 v1.1";
    block[..tag.len()].copy_from_slice(tag);
    let mut h = [[0u32; 8]; 4];
    compress(&mut h, &block, false);
    h
});

/// SIMD-512
pub fn simd512(data: &[u8]) -> [u8; 64] {
    let mut h = *IV;

    let (blocks, tail) = split_blocks::<BLOCK>(data);
    for block in blocks {
        compress(&mut h, block, false);
    }
    if !tail.is_empty() {
        let mut buf = [0u8; BLOCK];
        buf[..tail.len()].copy_from_slice(tail);
        compress(&mut h, &buf, false);
    }

    let mut len = [0u8; BLOCK];
    len[..8].copy_from_slice(&(data.len() as u64).wrapping_mul(8).to_le_bytes());
    compress(&mut h, &len, true);

    let mut out = [0u8; 64];
    put_le32(&mut out[..32], &h[0]);
    put_le32(&mut out[32..], &h[1]);
    out
}

/// NTT of the block bytes, centred into (-128, 128]
fn expand(block: &[u8; BLOCK], last: bool) -> [i32; 256] {
    let pow = &*POW;
    core::array::from_fn(|i| {
        let mut acc: i32 = 0;
        for (j, &x) in block.iter().enumerate() {
            acc = (acc + x as i32 * pow[(i * j) % 256]) % P;
        }
        // Coefficient 255 is 1 for every block, coefficient 253 only for
        // the length block
        acc = (acc + pow[(i * 255) % 256]) % P;
        if last {
            acc = (acc + pow[(i * 253) % 256]) % P;
        }
        if acc > 128 { acc - P } else { acc }
    })
}

/// Message words for step `k` of `round`: two 16-bit halves per word
fn message_words(y: &[i32; 256], round: usize, k: usize) -> [u32; 8] {
    let (lo_off, hi_off, mul) = PAIRING[round];
    let base = 16 * SLICE[round][k] as isize;
    core::array::from_fn(|i| {
        let at = |off: isize| y[(base + 2 * i as isize + off) as usize] * mul;
        (at(lo_off) as u32 & 0xffff).wrapping_add((at(hi_off) as u32) << 16)
    })
}

#[inline(always)]
fn if_fn(a: u32, b: u32, c: u32) -> u32 {
    (a & b) | (!a & c)
}

#[inline(always)]
fn maj(a: u32, b: u32, c: u32) -> u32 {
    (a & b) | (a & c) | (b & c)
}

fn step(s: &mut State, w: &[u32; 8], boolean: fn(u32, u32, u32) -> u32, r: u32, rs: u32, mask: usize) {
    let [a, b, c, d] = *s;
    let a_rot: [u32; 8] = core::array::from_fn(|j| a[j].rotate_left(r));
    let new_a: [u32; 8] = core::array::from_fn(|j| {
        d[j].wrapping_add(w[j])
            .wrapping_add(boolean(a[j], b[j], c[j]))
            .rotate_left(rs)
            .wrapping_add(a_rot[j ^ mask])
    });
    *s = [new_a, a_rot, b, c];
}

fn compress(h: &mut State, block: &[u8; BLOCK], last: bool) {
    let y = expand(block, last);

    let mut s = *h;
    for (k, reg) in s.iter_mut().flat_map(|r| r.iter_mut()).enumerate() {
        *reg ^= le32(block, k);
    }

    for round in 0..4 {
        let pi = &ROT[round];
        for k in 0..8 {
            let w = message_words(&y, round, k);
            let boolean: fn(u32, u32, u32) -> u32 = if k < 4 { if_fn } else { maj };
            step(&mut s, &w, boolean, pi[k % 4], pi[(k + 1) % 4], PERM[(8 * round + k) % 7]);
        }
    }

    // Feed-forward keyed by the incoming chaining value
    for (k, chain) in h.iter().enumerate() {
        step(&mut s, chain, if_fn, FEED_ROT[k], FEED_ROT[(k + 1) % 4], PERM[(k + 4) % 7]);
    }

    *h = s;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_order() {
        let pow = &*POW;
        assert_eq!(pow[128], P - 1);
        assert_eq!(pow[255] * ALPHA % P, 1);
    }

    #[test]
    fn test_iv_from_tag() {
        assert_eq!(IV[0][..4], [0x0BA16B95, 0x72F999AD, 0x9FECC2AE, 0xBA3264FC]);
        assert_eq!(IV[3][4..], [0x8FA14956, 0x21BF9BD3, 0xB94D0943, 0x6FFDDC22]);
    }

    #[test]
    fn test_simd512_empty() {
        assert_eq!(
            hex::encode(simd512(b"")),
            "51a5af7e243cd9a5989f7792c880c4c3168c3d60c4518725fe5757d1f7a69c63\
             66977eaba7905ce2da5d7cfd07773725f0935b55f3efb954996689a49b6d29e0"
        );
    }

    #[test]
    fn test_simd512_multi_block() {
        let data: Vec<u8> = (0..200u8).collect();
        assert_eq!(
            hex::encode(simd512(&data)),
            "b3c99981ebeaeb773a6b48146af6f5f5ff740a6f0b6a7a324f21524985eba9ac\
             624573f160415c82f836570e529ae449ff0225ded2536cb9c8b1a2678f13160f"
        );
    }

    #[test]
    fn test_expansion_range() {
        let y = expand(&[0xffu8; BLOCK], true);
        assert!(y.iter().all(|&v| v > -129 && v <= 128));
    }

    #[test]
    fn test_final_flag_changes_output() {
        let mut a = *IV;
        let mut b = *IV;
        compress(&mut a, &[1u8; BLOCK], false);
        compress(&mut b, &[1u8; BLOCK], true);
        assert_ne!(a, b);
    }

    #[test]
    fn test_simd512_lengths() {
        let data = [0u8; 256];
        assert_ne!(simd512(&data[..0]), simd512(&data[..1]));
        assert_ne!(simd512(&data[..128]), simd512(&data[..129]));
    }
}
