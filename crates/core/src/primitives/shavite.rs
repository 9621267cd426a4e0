//! SHAvite-3-512
//!
//! Fourteen-round Feistel over four 128-bit quarters. Every round key set is
//! 32 words; odd sets come from the nonlinear AES-based expansion, even sets
//! from the linear one.

use super::aes::round_nokey_le32;
use super::bytes::{le32, put_le32, split_blocks};

const ROUNDS: usize = 14;
const BLOCK: usize = 128;

const IV: [u32; 16] = [
    0x72FCCDD8, 0x79CA4727, 0x128A077B, 0x40D55AEC, 0xD1901A06, 0x430AE307, 0xB29F5CD1, 0xDF07FBFC,
    0x8E45D73D, 0x681AB538, 0xBDE86578, 0xDD577E47, 0xE275EADE, 0x502D9FCD, 0xB9357178, 0x022A4B9A,
];

/// SHAvite-3-512
pub fn shavite512(data: &[u8]) -> [u8; 64] {
    let mut h = IV;

    let mut count: u128 = 0;
    let (blocks, tail) = split_blocks::<BLOCK>(data);
    for block in blocks {
        count += (BLOCK * 8) as u128;
        compress(&mut h, block, count);
    }

    let total = count + (tail.len() * 8) as u128;
    let mut buf = [0u8; BLOCK];
    buf[..tail.len()].copy_from_slice(tail);
    buf[tail.len()] = 0x80;

    let mut block_count = if tail.is_empty() { 0 } else { total };
    if tail.len() >= 110 {
        compress(&mut h, &buf, block_count);
        buf = [0u8; BLOCK];
        block_count = 0;
    }
    buf[110..126].copy_from_slice(&total.to_le_bytes());
    buf[126..].copy_from_slice(&512u16.to_le_bytes());
    compress(&mut h, &buf, block_count);

    let mut out = [0u8; 64];
    put_le32(&mut out, &h);
    out
}

/// Four keyless AES rounds, each preceded by a round-key XOR
#[inline(always)]
fn f(x: [u32; 4], k: &[u32]) -> [u32; 4] {
    let mut x = x;
    for chunk in k.chunks_exact(4) {
        x = round_nokey_le32([x[0] ^ chunk[0], x[1] ^ chunk[1], x[2] ^ chunk[2], x[3] ^ chunk[3]]);
    }
    x
}

#[inline(always)]
fn xor_into(p: &mut [u32; 4], x: [u32; 4]) {
    for (a, b) in p.iter_mut().zip(x) {
        *a ^= b;
    }
}

fn compress(h: &mut [u32; 16], block: &[u8; BLOCK], count: u128) {
    let c = [count as u32, (count >> 32) as u32, (count >> 64) as u32, (count >> 96) as u32];

    let mut rk: [u32; 32] = core::array::from_fn(|i| le32(block, i));
    let mut p: [[u32; 4]; 4] = core::array::from_fn(|q| [h[4 * q], h[4 * q + 1], h[4 * q + 2], h[4 * q + 3]]);

    for round in 0..ROUNDS {
        if round > 0 {
            if round % 2 == 1 {
                expand_nonlinear(&mut rk, round, c);
            } else {
                for i in 0..32 {
                    rk[i] ^= rk[(i + 25) % 32];
                }
            }
        }

        let (lo, hi) = rk.split_at(16);
        // (source, target) quarter pairs for the two Feistel branches
        let [(s0, t0), (s1, t1)] = match round % 4 {
            0 => [(1, 0), (3, 2)],
            1 => [(0, 3), (2, 1)],
            2 => [(3, 2), (1, 0)],
            _ => [(2, 1), (0, 3)],
        };
        let x0 = f(p[s0], lo);
        let x1 = f(p[s1], hi);
        xor_into(&mut p[t0], x0);
        xor_into(&mut p[t1], x1);
    }

    for (i, q) in [2usize, 3, 0, 1].into_iter().enumerate() {
        for j in 0..4 {
            h[4 * i + j] ^= p[q][j];
        }
    }
}

fn expand_nonlinear(rk: &mut [u32; 32], round: usize, c: [u32; 4]) {
    for g in 0..8 {
        let b = 4 * g;
        let prev = (b + 28) % 32;
        let y = round_nokey_le32([rk[b + 1], rk[b + 2], rk[b + 3], rk[b]]);
        for j in 0..4 {
            rk[b + j] = y[j] ^ rk[prev + j];
        }

        let inject = match (round, g) {
            (1, 0) => Some([c[0], c[1], c[2], !c[3]]),
            (5, 1) => Some([c[3], c[2], c[1], !c[0]]),
            (9, 7) => Some([c[2], c[3], c[0], !c[1]]),
            (13, 6) => Some([c[1], c[0], c[3], !c[2]]),
            _ => None,
        };
        if let Some(words) = inject {
            for j in 0..4 {
                rk[b + j] ^= words[j];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shavite512_empty() {
        assert_eq!(
            hex::encode(shavite512(b"")),
            "a485c1b2578459d1efc5dddd840bb0b4a650ac82fe68f58c4442ccda747da006\
             b2d1dc6b4a4eb7d84ff91e1f466fef429d259acd995dddcad16fa545c7a6e5ba"
        );
    }

    #[test]
    fn test_shavite512_lengths() {
        let data = [0x77u8; 256];
        let mut seen = std::collections::HashSet::new();
        for len in [0, 1, 64, 109, 110, 128, 129, 255] {
            assert!(seen.insert(shavite512(&data[..len]).to_vec()));
        }
    }

    #[test]
    fn test_counter_changes_output() {
        let block = [0u8; BLOCK];
        let mut a = IV;
        let mut b = IV;
        compress(&mut a, &block, 0);
        compress(&mut b, &block, 1024);
        assert_ne!(a, b);
    }
}
