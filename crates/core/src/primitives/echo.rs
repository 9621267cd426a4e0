//! ECHO-512
//!
//! The state is sixteen 128-bit words laid out as a 4x4 matrix, word
//! `4 * col + row`; the first eight carry the chaining value.

use super::aes::{mix_column, round};
use super::bytes::split_blocks;

const ROUNDS: usize = 10;
const BLOCK: usize = 128;

type Word = [u8; 16];

/// ECHO-512
pub fn echo512(data: &[u8]) -> [u8; 64] {
    let mut iv = [0u8; 16];
    iv[..2].copy_from_slice(&512u16.to_le_bytes());
    let mut v = [iv; 8];

    let mut counter: u128 = 0;
    let (blocks, tail) = split_blocks::<BLOCK>(data);
    for block in blocks {
        counter += (BLOCK * 8) as u128;
        compress(&mut v, block, counter);
    }

    let total = counter + (tail.len() * 8) as u128;
    let mut buf = [0u8; BLOCK];
    buf[..tail.len()].copy_from_slice(tail);
    buf[tail.len()] = 0x80;

    // A block holding only padding is compressed with a zero counter.
    let mut block_counter = if tail.is_empty() { 0 } else { total };
    if tail.len() >= BLOCK - 18 {
        compress(&mut v, &buf, block_counter);
        buf = [0u8; BLOCK];
        block_counter = 0;
    }
    buf[BLOCK - 18..BLOCK - 16].copy_from_slice(&512u16.to_le_bytes());
    buf[BLOCK - 16..].copy_from_slice(&total.to_le_bytes());
    compress(&mut v, &buf, block_counter);

    let mut out = [0u8; 64];
    for (chunk, w) in out.chunks_exact_mut(16).zip(&v) {
        chunk.copy_from_slice(w);
    }
    out
}

fn compress(v: &mut [Word; 8], block: &[u8; BLOCK], counter: u128) {
    let mut m = [[0u8; 16]; 8];
    for (w, chunk) in m.iter_mut().zip(block.chunks_exact(16)) {
        w.copy_from_slice(chunk);
    }

    let mut s = [[0u8; 16]; 16];
    s[..8].copy_from_slice(v);
    s[8..].copy_from_slice(&m);

    let mut k = counter;
    for _ in 0..ROUNDS {
        // BigSubWords
        for w in s.iter_mut() {
            *w = round(w, &k.to_le_bytes());
            *w = round(w, &[0u8; 16]);
            k = k.wrapping_add(1);
        }

        // BigShiftRows: row `r` rotates left by `r` columns
        let t = s;
        for col in 0..4 {
            for row in 1..4 {
                s[4 * col + row] = t[4 * ((col + row) % 4) + row];
            }
        }

        // BigMixColumns
        for col in 0..4 {
            for j in 0..16 {
                let mixed = mix_column([
                    s[4 * col][j],
                    s[4 * col + 1][j],
                    s[4 * col + 2][j],
                    s[4 * col + 3][j],
                ]);
                for (r, b) in mixed.into_iter().enumerate() {
                    s[4 * col + r][j] = b;
                }
            }
        }
    }

    for i in 0..8 {
        for j in 0..16 {
            v[i][j] ^= m[i][j] ^ s[i][j] ^ s[i + 8][j];
        }
    }
}
