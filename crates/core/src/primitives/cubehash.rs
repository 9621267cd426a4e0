//! CubeHash16/32-512

use super::bytes::{le32, put_le32, split_blocks};

const ROUNDS: usize = 16;
const INIT_ROUNDS: usize = 160;

/// CubeHash-512 with 16 rounds per 32-byte block
pub fn cubehash512(data: &[u8]) -> [u8; 64] {
    let mut x = initial_state();

    let (blocks, tail) = split_blocks::<32>(data);
    for block in blocks {
        absorb(&mut x, block);
    }

    let mut buf = [0u8; 32];
    buf[..tail.len()].copy_from_slice(tail);
    buf[tail.len()] = 0x80;
    absorb(&mut x, &buf);

    x[31] ^= 1;
    rounds(&mut x, INIT_ROUNDS);

    let mut out = [0u8; 64];
    put_le32(&mut out, &x[..16]);
    out
}

fn initial_state() -> [u32; 32] {
    let mut x = [0u32; 32];
    x[0] = 64;
    x[1] = 32;
    x[2] = ROUNDS as u32;
    rounds(&mut x, INIT_ROUNDS);
    x
}

fn absorb(x: &mut [u32; 32], block: &[u8; 32]) {
    for i in 0..8 {
        x[i] ^= le32(block, i);
    }
    rounds(x, ROUNDS);
}

fn rounds(x: &mut [u32; 32], n: usize) {
    for _ in 0..n {
        for i in 0..16 {
            x[16 + i] = x[16 + i].wrapping_add(x[i]);
        }
        for w in &mut x[..16] {
            *w = w.rotate_left(7);
        }
        for i in 0..8 {
            x.swap(i, i + 8);
        }
        for i in 0..16 {
            x[i] ^= x[16 + i];
        }
        for i in (16..32).filter(|i| i & 2 == 0) {
            x.swap(i, i + 2);
        }
        for i in 0..16 {
            x[16 + i] = x[16 + i].wrapping_add(x[i]);
        }
        for w in &mut x[..16] {
            *w = w.rotate_left(11);
        }
        for i in (0..16).filter(|i| i & 4 == 0) {
            x.swap(i, i + 4);
        }
        for i in 0..16 {
            x[i] ^= x[16 + i];
        }
        for i in (16..32).step_by(2) {
            x.swap(i, i + 1);
        }
    }
}
