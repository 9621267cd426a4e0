//! Blue Midnight Wish 512 (BMW-512)

use super::bytes::{le64, put_le64, split_blocks};

const IV: [u64; 16] = {
    let mut iv = [0u64; 16];
    let mut i = 0;
    while i < 16 {
        // Bytes 0x80, 0x81, .. 0xFF read as big-endian words
        let b = 0x80 + 8 * i as u64;
        iv[i] = (b << 56)
            | ((b + 1) << 48)
            | ((b + 2) << 40)
            | ((b + 3) << 32)
            | ((b + 4) << 24)
            | ((b + 5) << 16)
            | ((b + 6) << 8)
            | (b + 7);
        i += 1;
    }
    iv
};

const FINAL: [u64; 16] = {
    let mut f = [0u64; 16];
    let mut i = 0;
    while i < 16 {
        f[i] = 0xaaaaaaaaaaaaaaa0 + i as u64;
        i += 1;
    }
    f
};

/// BMW-512
pub fn bmw512(data: &[u8]) -> [u8; 64] {
    let mut h = IV;
    let (blocks, tail) = split_blocks::<128>(data);
    for block in blocks {
        let m: [u64; 16] = core::array::from_fn(|i| le64(block, i));
        h = compress(&h, &m);
    }

    let bits = (data.len() as u64).wrapping_mul(8);
    let mut buf = [0u8; 128];
    buf[..tail.len()].copy_from_slice(tail);
    buf[tail.len()] = 0x80;
    if tail.len() >= 120 {
        let m: [u64; 16] = core::array::from_fn(|i| le64(&buf, i));
        h = compress(&h, &m);
        buf = [0u8; 128];
    }
    buf[120..].copy_from_slice(&bits.to_le_bytes());
    let m: [u64; 16] = core::array::from_fn(|i| le64(&buf, i));
    h = compress(&h, &m);

    // Final transform: the chaining value becomes the message.
    let h = compress(&FINAL, &h);

    let mut out = [0u8; 64];
    put_le64(&mut out, &h[8..]);
    out
}

#[inline(always)]
fn s0(x: u64) -> u64 {
    (x >> 1) ^ (x << 3) ^ x.rotate_left(4) ^ x.rotate_left(37)
}

#[inline(always)]
fn s1(x: u64) -> u64 {
    (x >> 1) ^ (x << 2) ^ x.rotate_left(13) ^ x.rotate_left(43)
}

#[inline(always)]
fn s2(x: u64) -> u64 {
    (x >> 2) ^ (x << 1) ^ x.rotate_left(19) ^ x.rotate_left(53)
}

#[inline(always)]
fn s3(x: u64) -> u64 {
    (x >> 2) ^ (x << 2) ^ x.rotate_left(28) ^ x.rotate_left(59)
}

#[inline(always)]
fn s4(x: u64) -> u64 {
    (x >> 1) ^ x
}

#[inline(always)]
fn s5(x: u64) -> u64 {
    (x >> 2) ^ x
}

/// Signed combinations of `M ^ H` feeding the first quadruple
///
/// Each row lists five word indices; a negative sign is encoded as `true`.
const F0_TERMS: [[(usize, bool); 5]; 16] = [
    [(5, false), (7, true), (10, false), (13, false), (14, false)],
    [(6, false), (8, true), (11, false), (14, false), (15, true)],
    [(0, false), (7, false), (9, false), (12, true), (15, false)],
    [(0, false), (1, true), (8, false), (10, true), (13, false)],
    [(1, false), (2, false), (9, false), (11, true), (14, true)],
    [(3, false), (2, true), (10, false), (12, true), (15, false)],
    [(4, false), (0, true), (3, true), (11, true), (13, false)],
    [(1, false), (4, true), (5, true), (12, true), (14, true)],
    [(2, false), (5, true), (6, true), (13, false), (15, true)],
    [(0, false), (3, true), (6, false), (7, true), (14, false)],
    [(8, false), (1, true), (4, true), (7, true), (15, false)],
    [(8, false), (0, true), (2, true), (5, true), (9, false)],
    [(1, false), (3, false), (6, true), (9, true), (10, false)],
    [(2, false), (4, false), (7, false), (10, false), (11, false)],
    [(3, false), (5, true), (8, false), (11, true), (12, true)],
    [(12, false), (4, true), (6, true), (9, true), (13, false)],
];

fn compress(h: &[u64; 16], m: &[u64; 16]) -> [u64; 16] {
    let mut q = [0u64; 32];

    // f0
    let x: [u64; 16] = core::array::from_fn(|i| m[i] ^ h[i]);
    for (j, terms) in F0_TERMS.iter().enumerate() {
        let w = terms.iter().fold(0u64, |acc, &(idx, neg)| {
            if neg {
                acc.wrapping_sub(x[idx])
            } else {
                acc.wrapping_add(x[idx])
            }
        });
        let s = match j % 5 {
            0 => s0(w),
            1 => s1(w),
            2 => s2(w),
            3 => s3(w),
            _ => s4(w),
        };
        q[j] = s.wrapping_add(h[(j + 1) % 16]);
    }

    // f1: two expand1 rounds, fourteen expand2 rounds
    for j in 16..32 {
        let mut acc = add_element(m, h, j - 16);
        if j < 18 {
            for (k, f) in [s1, s2, s3, s0].iter().cycle().take(16).enumerate() {
                acc = acc.wrapping_add(f(q[j - 16 + k]));
            }
        } else {
            let rot = [0, 5, 0, 11, 0, 27, 0, 32, 0, 37, 0, 43, 0, 53];
            for (k, &r) in rot.iter().enumerate() {
                let v = q[j - 16 + k];
                acc = acc.wrapping_add(if r == 0 { v } else { v.rotate_left(r) });
            }
            acc = acc.wrapping_add(s4(q[j - 2])).wrapping_add(s5(q[j - 1]));
        }
        q[j] = acc;
    }

    // f2
    let xl = q[16..24].iter().fold(0u64, |a, &v| a ^ v);
    let xh = q[24..32].iter().fold(xl, |a, &v| a ^ v);

    let mut out = [0u64; 16];
    out[0] = ((xh << 5) ^ (q[16] >> 5) ^ m[0]).wrapping_add(xl ^ q[24] ^ q[0]);
    out[1] = ((xh >> 7) ^ (q[17] << 8) ^ m[1]).wrapping_add(xl ^ q[25] ^ q[1]);
    out[2] = ((xh >> 5) ^ (q[18] << 5) ^ m[2]).wrapping_add(xl ^ q[26] ^ q[2]);
    out[3] = ((xh >> 1) ^ (q[19] << 5) ^ m[3]).wrapping_add(xl ^ q[27] ^ q[3]);
    out[4] = ((xh >> 3) ^ q[20] ^ m[4]).wrapping_add(xl ^ q[28] ^ q[4]);
    out[5] = ((xh << 6) ^ (q[21] >> 6) ^ m[5]).wrapping_add(xl ^ q[29] ^ q[5]);
    out[6] = ((xh >> 4) ^ (q[22] << 6) ^ m[6]).wrapping_add(xl ^ q[30] ^ q[6]);
    out[7] = ((xh >> 11) ^ (q[23] << 2) ^ m[7]).wrapping_add(xl ^ q[31] ^ q[7]);

    out[8] = out[4]
        .rotate_left(9)
        .wrapping_add(xh ^ q[24] ^ m[8])
        .wrapping_add((xl << 8) ^ q[23] ^ q[8]);
    out[9] = out[5]
        .rotate_left(10)
        .wrapping_add(xh ^ q[25] ^ m[9])
        .wrapping_add((xl >> 6) ^ q[16] ^ q[9]);
    out[10] = out[6]
        .rotate_left(11)
        .wrapping_add(xh ^ q[26] ^ m[10])
        .wrapping_add((xl << 6) ^ q[17] ^ q[10]);
    out[11] = out[7]
        .rotate_left(12)
        .wrapping_add(xh ^ q[27] ^ m[11])
        .wrapping_add((xl << 4) ^ q[18] ^ q[11]);
    out[12] = out[0]
        .rotate_left(13)
        .wrapping_add(xh ^ q[28] ^ m[12])
        .wrapping_add((xl >> 3) ^ q[19] ^ q[12]);
    out[13] = out[1]
        .rotate_left(14)
        .wrapping_add(xh ^ q[29] ^ m[13])
        .wrapping_add((xl >> 4) ^ q[20] ^ q[13]);
    out[14] = out[2]
        .rotate_left(15)
        .wrapping_add(xh ^ q[30] ^ m[14])
        .wrapping_add((xl >> 7) ^ q[21] ^ q[14]);
    out[15] = out[3]
        .rotate_left(16)
        .wrapping_add(xh ^ q[31] ^ m[15])
        .wrapping_add((xl >> 2) ^ q[22] ^ q[15]);

    out
}

/// Message-dependent term added to expanded word `16 + j`
#[inline(always)]
fn add_element(m: &[u64; 16], h: &[u64; 16], j: usize) -> u64 {
    let k = ((j + 16) as u64).wrapping_mul(0x0555555555555555);
    let a = m[j].rotate_left((j + 1) as u32);
    let b = m[(j + 3) % 16].rotate_left(((j + 3) % 16 + 1) as u32);
    let c = m[(j + 10) % 16].rotate_left(((j + 10) % 16 + 1) as u32);
    a.wrapping_add(b).wrapping_sub(c).wrapping_add(k) ^ h[(j + 7) % 16]
}
