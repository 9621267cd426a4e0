//! Skein-512-512 (Threefish-512 in UBI chaining mode)

use super::bytes::{le64, put_le64, split_blocks};

const C240: u64 = 0x1BD11BDAA9FC1A22;

const ROT: [[u32; 4]; 8] = [
    [46, 36, 19, 37],
    [33, 27, 14, 42],
    [17, 49, 36, 39],
    [44, 9, 54, 56],
    [39, 30, 34, 24],
    [13, 50, 10, 17],
    [25, 29, 39, 43],
    [8, 35, 56, 22],
];

const PERM: [usize; 8] = [2, 1, 4, 7, 6, 5, 0, 3];

const TYPE_CFG: u64 = 4;
const TYPE_MSG: u64 = 48;
const TYPE_OUT: u64 = 63;
const FLAG_FIRST: u64 = 1 << 62;
const FLAG_FINAL: u64 = 1 << 63;

/// Skein-512 with a 512-bit output
pub fn skein512(data: &[u8]) -> [u8; 64] {
    // Configuration block: schema "SHA3", version 1, output bits
    let mut cfg = [0u8; 64];
    cfg[..4].copy_from_slice(b"SHA3");
    cfg[4] = 1;
    cfg[8..16].copy_from_slice(&512u64.to_le_bytes());
    let mut h = ubi(&[0u64; 8], &cfg, 32, TYPE_CFG, true, true);

    if data.is_empty() {
        h = ubi(&h, &[0u8; 64], 0, TYPE_MSG, true, true);
    } else {
        let mut pos = 0u64;
        let (blocks, tail) = split_blocks::<64>(data);
        let full: Vec<&[u8; 64]> = blocks.collect();
        let last_is_full = tail.is_empty();
        for (i, block) in full.iter().enumerate() {
            pos += 64;
            let fin = last_is_full && i + 1 == full.len();
            h = ubi(&h, block, pos, TYPE_MSG, i == 0, fin);
        }
        if !last_is_full {
            let mut buf = [0u8; 64];
            buf[..tail.len()].copy_from_slice(tail);
            pos += tail.len() as u64;
            h = ubi(&h, &buf, pos, TYPE_MSG, full.is_empty(), true);
        }
    }

    // Output stage with counter 0
    let h = ubi(&h, &[0u8; 64], 8, TYPE_OUT, true, true);

    let mut out = [0u8; 64];
    put_le64(&mut out, &h);
    out
}

fn ubi(h: &[u64; 8], block: &[u8; 64], pos: u64, kind: u64, first: bool, fin: bool) -> [u64; 8] {
    let mut t1 = kind << 56;
    if first {
        t1 |= FLAG_FIRST;
    }
    if fin {
        t1 |= FLAG_FINAL;
    }
    let m: [u64; 8] = core::array::from_fn(|i| le64(block, i));
    let c = threefish(h, [pos, t1], &m);
    core::array::from_fn(|i| c[i] ^ m[i])
}

/// Threefish-512 block encryption
fn threefish(key: &[u64; 8], tweak: [u64; 2], block: &[u64; 8]) -> [u64; 8] {
    let mut k = [0u64; 9];
    k[..8].copy_from_slice(key);
    k[8] = key.iter().fold(C240, |a, &w| a ^ w);
    let t = [tweak[0], tweak[1], tweak[0] ^ tweak[1]];

    let subkey = |s: usize| -> [u64; 8] {
        let mut ks: [u64; 8] = core::array::from_fn(|i| k[(s + i) % 9]);
        ks[5] = ks[5].wrapping_add(t[s % 3]);
        ks[6] = ks[6].wrapping_add(t[(s + 1) % 3]);
        ks[7] = ks[7].wrapping_add(s as u64);
        ks
    };

    let mut x = *block;
    for d in 0..72 {
        if d % 4 == 0 {
            let ks = subkey(d / 4);
            for (w, k) in x.iter_mut().zip(ks) {
                *w = w.wrapping_add(k);
            }
        }
        let r = &ROT[d % 8];
        for j in 0..4 {
            let (a, b) = (2 * j, 2 * j + 1);
            x[a] = x[a].wrapping_add(x[b]);
            x[b] = x[b].rotate_left(r[j]) ^ x[a];
        }
        let y = x;
        for (i, &p) in PERM.iter().enumerate() {
            x[i] = y[p];
        }
    }
    let ks = subkey(18);
    for (w, k) in x.iter_mut().zip(ks) {
        *w = w.wrapping_add(k);
    }
    x
}
