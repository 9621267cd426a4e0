//! Grøstl-512
//!
//! The 1024-bit state is an 8x16 byte matrix stored column-major, so byte
//! `8 * col + row` is the cell at (`row`, `col`) and message bytes map onto
//! it without reordering.

use super::aes::{SBOX, gf_mul};
use super::bytes::split_blocks;

const ROUNDS: usize = 14;
const BLOCK: usize = 128;

const SHIFT_P: [usize; 8] = [0, 1, 2, 3, 4, 5, 6, 11];
const SHIFT_Q: [usize; 8] = [1, 3, 5, 11, 0, 2, 4, 6];

const MIX: [u8; 8] = [2, 2, 3, 4, 5, 3, 5, 7];

type State = [u8; BLOCK];

/// Grøstl-512
pub fn groestl512(data: &[u8]) -> [u8; 64] {
    let mut h: State = [0u8; BLOCK];
    // Output length in bits, big-endian, in the last bytes of the IV
    h[BLOCK - 2] = 0x02;

    let mut blocks_done: u64 = 0;
    let (blocks, tail) = split_blocks::<BLOCK>(data);
    for block in blocks {
        compress(&mut h, block);
        blocks_done += 1;
    }

    let mut buf = [0u8; 2 * BLOCK];
    buf[..tail.len()].copy_from_slice(tail);
    buf[tail.len()] = 0x80;
    let pad_blocks = if tail.len() < BLOCK - 8 { 1 } else { 2 };
    let total = blocks_done + pad_blocks as u64;
    let end = pad_blocks * BLOCK;
    buf[end - 8..end].copy_from_slice(&total.to_be_bytes());

    for chunk in buf[..end].chunks_exact(BLOCK) {
        let mut m = [0u8; BLOCK];
        m.copy_from_slice(chunk);
        compress(&mut h, &m);
    }

    // Output transformation: truncate P(h) ^ h to its last 512 bits.
    let mut x = h;
    permute(&mut x, Variant::P);
    let mut out = [0u8; 64];
    for (o, (a, b)) in out.iter_mut().zip(x[64..].iter().zip(&h[64..])) {
        *o = a ^ b;
    }
    out
}

fn compress(h: &mut State, m: &State) {
    let mut p = *h;
    for (a, b) in p.iter_mut().zip(m) {
        *a ^= b;
    }
    let mut q = *m;

    permute(&mut p, Variant::P);
    permute(&mut q, Variant::Q);

    for i in 0..BLOCK {
        h[i] ^= p[i] ^ q[i];
    }
}

#[derive(Clone, Copy)]
enum Variant {
    P,
    Q,
}

fn permute(s: &mut State, v: Variant) {
    for r in 0..ROUNDS {
        // AddRoundConstant
        match v {
            Variant::P => {
                for col in 0..16 {
                    s[8 * col] ^= ((col as u8) << 4) ^ r as u8;
                }
            }
            Variant::Q => {
                for b in s.iter_mut() {
                    *b ^= 0xff;
                }
                for col in 0..16 {
                    s[8 * col + 7] ^= ((col as u8) << 4) ^ r as u8;
                }
            }
        }

        // SubBytes
        for b in s.iter_mut() {
            *b = SBOX[*b as usize];
        }

        // ShiftBytes: row `i` moves left by `shift[i]` columns
        let shift = match v {
            Variant::P => &SHIFT_P,
            Variant::Q => &SHIFT_Q,
        };
        let t = *s;
        for row in 0..8 {
            for col in 0..16 {
                s[8 * col + row] = t[8 * ((col + shift[row]) % 16) + row];
            }
        }

        // MixBytes
        for col in 0..16 {
            let c: [u8; 8] = core::array::from_fn(|i| s[8 * col + i]);
            for i in 0..8 {
                let mut acc = 0u8;
                for j in 0..8 {
                    acc ^= gf_mul(c[j], MIX[(j + 8 - i) % 8]);
                }
                s[8 * col + i] = acc;
            }
        }
    }
}
