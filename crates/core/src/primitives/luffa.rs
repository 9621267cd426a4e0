//! Luffa-512 (five 256-bit lanes)

use super::bytes::{be32, put_be32, split_blocks};

type Lane = [u32; 8];

const IV: [Lane; 5] = [
    [0x6d251e69, 0x44b051e0, 0x4eaa6fb4, 0xdbf78465, 0x6e292011, 0x90152df4, 0xee058139, 0xdef610bb],
    [0xc3b44b95, 0xd9d2f256, 0x70eee9a0, 0xde099fa3, 0x5d9b0557, 0x8fc944b3, 0xcf1ccf0e, 0x746cd581],
    [0xf7efc89d, 0x5dba5781, 0x04016ce5, 0xad659c05, 0x0306194f, 0x666d1836, 0x24aa230a, 0x8b264ae7],
    [0x858075d5, 0x36d79cce, 0xe571f7d7, 0x204b1f67, 0x35870c6a, 0x57e9e923, 0x14bcb808, 0x7cde72ce],
    [0x6c68e9be, 0x5ec41e22, 0xc825b7c7, 0xaffb4363, 0xf5df3999, 0x0fc688f1, 0xb07224cc, 0x03e86cea],
];

/// Step constants per lane, added to words 0 and 4
const RC: [[[u32; 8]; 2]; 5] = [
    [
        [0x303994a6, 0xc0e65299, 0x6cc33a12, 0xdc56983e, 0x1e00108f, 0x7800423d, 0x8f5b7882, 0x96e1db12],
        [0xe0337818, 0x441ba90d, 0x7f34d442, 0x9389217f, 0xe5a8bce6, 0x5274baf4, 0x26889ba7, 0x9a226e9d],
    ],
    [
        [0xb6de10ed, 0x70f47aae, 0x0707a3d4, 0x1c1e8f51, 0x707a3d45, 0xaeb28562, 0xbaca1589, 0x40a46f3e],
        [0x01685f3d, 0x05a17cf4, 0xbd09caca, 0xf4272b28, 0x144ae5cc, 0xfaa7ae2b, 0x2e48f1c1, 0xb923c704],
    ],
    [
        [0xfc20d9d2, 0x34552e25, 0x7ad8818f, 0x8438764a, 0xbb6de032, 0xedb780c8, 0xd9847356, 0xa2c78434],
        [0xe25e72c1, 0xe623bb72, 0x5c58a4a4, 0x1e38e2e7, 0x78e38b9d, 0x27586719, 0x36eda57f, 0x703aace7],
    ],
    [
        [0xb213afa5, 0xc84ebe95, 0x4e608a22, 0x56d858fe, 0x343b138f, 0xd0ec4e3d, 0x2ceb4882, 0xb3ad2208],
        [0xe028c9bf, 0x44756f91, 0x7e8fce32, 0x956548be, 0xfe191be2, 0x3cb226e5, 0x5944a28e, 0xa1c4c355],
    ],
    [
        [0xf0d2e9e3, 0xac11d7fa, 0x1bcb66f2, 0x6f2d9bc9, 0x78602649, 0x8edae952, 0x3b6ba548, 0xedae9520],
        [0x5090d577, 0x2d1925ab, 0xb46496ac, 0xd1925ab0, 0x29131ab6, 0x0fc053c3, 0x3f014f0c, 0xfc053c31],
    ],
];

/// Luffa-512
pub fn luffa512(data: &[u8]) -> [u8; 64] {
    let mut v = IV;

    let (blocks, tail) = split_blocks::<32>(data);
    for block in blocks {
        step(&mut v, &load(block));
    }

    let mut buf = [0u8; 32];
    buf[..tail.len()].copy_from_slice(tail);
    buf[tail.len()] = 0x80;
    step(&mut v, &load(&buf));

    // Two blank rounds, each releasing 256 bits of output.
    let mut out = [0u8; 64];
    for half in out.chunks_exact_mut(32) {
        step(&mut v, &[0u32; 8]);
        let words: Lane = core::array::from_fn(|i| v.iter().fold(0, |acc, lane| acc ^ lane[i]));
        put_be32(half, &words);
    }
    out
}

fn load(block: &[u8; 32]) -> Lane {
    core::array::from_fn(|i| be32(block, i))
}

fn step(v: &mut [Lane; 5], m: &Lane) {
    inject(v, m);
    for (j, lane) in v.iter_mut().enumerate() {
        // Tweak: rotate the upper half of lane j by j bits.
        for w in &mut lane[4..] {
            *w = w.rotate_left(j as u32);
        }
        permute(lane, &RC[j]);
    }
}

/// Multiplication by x in GF(2^8)[x] over 32-bit words
#[inline(always)]
fn m2(s: &Lane) -> Lane {
    let t = s[7];
    [t, s[0] ^ t, s[1], s[2] ^ t, s[3] ^ t, s[4], s[5], s[6]]
}

#[inline(always)]
fn xor(a: &Lane, b: &Lane) -> Lane {
    core::array::from_fn(|i| a[i] ^ b[i])
}

/// Message injection for five lanes
fn inject(v: &mut [Lane; 5], m: &Lane) {
    let sum = v[1..].iter().fold(v[0], |acc, lane| xor(&acc, lane));
    let a = m2(&sum);
    for lane in v.iter_mut() {
        *lane = xor(lane, &a);
    }

    // Forward pass: V_i = 2 V_i + V_{i+1}, cyclically
    let b = xor(&m2(&v[0]), &v[1]);
    v[1] = xor(&m2(&v[1]), &v[2]);
    v[2] = xor(&m2(&v[2]), &v[3]);
    v[3] = xor(&m2(&v[3]), &v[4]);
    v[4] = xor(&m2(&v[4]), &v[0]);

    // Backward pass: V_i = 2 V_i + V_{i-1}, cyclically
    v[0] = xor(&m2(&b), &v[4]);
    v[4] = xor(&m2(&v[4]), &v[3]);
    v[3] = xor(&m2(&v[3]), &v[2]);
    v[2] = xor(&m2(&v[2]), &v[1]);
    v[1] = xor(&m2(&v[1]), &b);

    let mut m = *m;
    for (i, lane) in v.iter_mut().enumerate() {
        if i > 0 {
            m = m2(&m);
        }
        *lane = xor(lane, &m);
    }
}

#[inline(always)]
fn sub_crumb(x: &mut Lane, i0: usize, i1: usize, i2: usize, i3: usize) {
    let (mut a0, mut a1, mut a2, mut a3) = (x[i0], x[i1], x[i2], x[i3]);
    let mut tmp = a0;
    a0 |= a1;
    a2 ^= a3;
    a1 = !a1;
    a0 ^= a3;
    a3 &= tmp;
    a1 ^= a3;
    a3 ^= a2;
    a2 &= a0;
    a0 = !a0;
    a2 ^= a1;
    a1 |= a3;
    tmp ^= a1;
    a3 ^= a2;
    a2 &= a1;
    a1 ^= a0;
    a0 = tmp;
    x[i0] = a0;
    x[i1] = a1;
    x[i2] = a2;
    x[i3] = a3;
}

#[inline(always)]
fn mix_word(x: &mut Lane, k: usize) {
    let (mut u, mut v) = (x[k], x[k + 4]);
    v ^= u;
    u = u.rotate_left(2) ^ v;
    v = v.rotate_left(14) ^ u;
    u = u.rotate_left(10) ^ v;
    v = v.rotate_left(1);
    x[k] = u;
    x[k + 4] = v;
}

fn permute(x: &mut Lane, rc: &[[u32; 8]; 2]) {
    for r in 0..8 {
        sub_crumb(x, 0, 1, 2, 3);
        sub_crumb(x, 5, 6, 7, 4);
        for k in 0..4 {
            mix_word(x, k);
        }
        x[0] ^= rc[0][r];
        x[4] ^= rc[1][r];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_m2_feedback() {
        let s = [0, 0, 0, 0, 0, 0, 0, 1];
        assert_eq!(m2(&s), [1, 1, 0, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_luffa512_empty() {
        assert_eq!(
            hex::encode(luffa512(b"")),
            "6e7de4501189b3ca58f3ac114916654bbcd4922024b4cc1cd764acfe8ab4b780\
             5df133eab345ffdb1c414564c924f48e0a301824e2ac4c34bd4efde2e43da90e"
        );
    }

    #[test]
    fn test_luffa512_abc() {
        assert_eq!(
            hex::encode(luffa512(b"abc")),
            "f40245973e80d79d0f4b9b202ddd4505b81b8830501bea31612b5817aae38792\
             1dcefd808ca2c78020aff59345d6f91f0ee6b2eee113f0cbcf22b64381387e8a"
        );
    }

    #[test]
    fn test_luffa512_multi_block() {
        let data: Vec<u8> = (0..200u8).collect();
        assert_eq!(
            hex::encode(luffa512(&data)),
            "bef9b87ff7e6d2a671dc0d26fd3682c960e619c92867e20d0aacaee5dbe4a404\
             45f36831e42640162d71edbc7b5970186773b3d83f30f4c037981406fcf18a7f"
        );
    }

    #[test]
    fn test_luffa512_padding() {
        let data = [0u8; 64];
        assert_ne!(luffa512(&data[..31]), luffa512(&data[..32]));
        assert_ne!(luffa512(&data[..32]), luffa512(&data[..33]));
        assert_eq!(luffa512(b"luffa"), luffa512(b"luffa"));
    }
}
