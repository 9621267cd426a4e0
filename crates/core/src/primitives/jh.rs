//! JH-512
//!
//! Nibble-sliced form of the E8 permutation: the 1024-bit state is held as
//! 256 four-bit elements, each built from one bit of every 256-bit quarter.

use super::bytes::split_blocks;

const ROUNDS: usize = 42;

const SBOX: [[u8; 16]; 2] = [
    [9, 0, 4, 11, 13, 12, 3, 15, 1, 10, 2, 6, 7, 5, 8, 14],
    [3, 12, 6, 13, 5, 7, 1, 9, 15, 2, 0, 4, 11, 10, 14, 8],
];

/// Round-0 constant: the fractional part of sqrt(2), one nibble per entry
const RC0: [u8; 64] = [
    0x6, 0xa, 0x0, 0x9, 0xe, 0x6, 0x6, 0x7, 0xf, 0x3, 0xb, 0xc, 0xc, 0x9, 0x0, 0x8, //
    0xb, 0x2, 0xf, 0xb, 0x1, 0x3, 0x6, 0x6, 0xe, 0xa, 0x9, 0x5, 0x7, 0xd, 0x3, 0xe, //
    0x3, 0xa, 0xd, 0xe, 0xc, 0x1, 0x7, 0x5, 0x1, 0x2, 0x7, 0x7, 0x5, 0x0, 0x9, 0x9, //
    0xd, 0xa, 0x2, 0xf, 0x5, 0x9, 0x0, 0xb, 0x0, 0x6, 0x6, 0x7, 0x3, 0x2, 0x2, 0xa,
];

/// JH-512
pub fn jh512(data: &[u8]) -> [u8; 64] {
    let mut h = [0u8; 128];
    h[0] = 0x02;
    h[1] = 0x00;
    f8(&mut h, &[0u8; 64]);

    let (blocks, tail) = split_blocks::<64>(data);
    for block in blocks {
        f8(&mut h, block);
    }

    let bits = (data.len() as u64).wrapping_mul(8);
    let mut last = [0u8; 64];
    if tail.is_empty() {
        last[0] = 0x80;
    } else {
        last[..tail.len()].copy_from_slice(tail);
        last[tail.len()] = 0x80;
        f8(&mut h, &last);
        last = [0u8; 64];
    }
    last[56..].copy_from_slice(&bits.to_be_bytes());
    f8(&mut h, &last);

    let mut out = [0u8; 64];
    out.copy_from_slice(&h[64..]);
    out
}

fn f8(h: &mut [u8; 128], m: &[u8; 64]) {
    for (a, b) in h.iter_mut().zip(m) {
        *a ^= b;
    }
    e8(h);
    for (a, b) in h[64..].iter_mut().zip(m) {
        *a ^= b;
    }
}

#[inline(always)]
fn l(a: &mut u8, b: &mut u8) {
    *b ^= ((*a << 1) ^ (*a >> 3) ^ ((*a >> 2) & 2)) & 0xf;
    *a ^= ((*b << 1) ^ (*b >> 3) ^ ((*b >> 2) & 2)) & 0xf;
}

/// Linear layer shared by the state and round-constant updates
fn permute_nibbles<const N: usize>(tem: &mut [u8; N], out: &mut [u8; N]) {
    for i in (0..N).step_by(2) {
        let (lo, hi) = tem.split_at_mut(i + 1);
        l(&mut lo[i], &mut hi[0]);
    }
    for i in (0..N).step_by(4) {
        tem.swap(i + 2, i + 3);
    }
    let half = N / 2;
    for i in 0..half {
        out[i] = tem[i << 1];
        out[i + half] = tem[(i << 1) + 1];
    }
    for i in (half..N).step_by(2) {
        out.swap(i, i + 1);
    }
}

fn e8(h: &mut [u8; 128]) {
    let mut rc = RC0;

    // Group bits into nibbles, interleaving the two halves.
    let mut tem = [0u8; 256];
    for (i, t) in tem.iter_mut().enumerate() {
        let bit = |base: usize| (h[(i + base) >> 3] >> (7 - (i & 7))) & 1;
        *t = (bit(0) << 3) | (bit(256) << 2) | (bit(512) << 1) | bit(768);
    }
    let mut a = [0u8; 256];
    for i in 0..128 {
        a[i << 1] = tem[i];
        a[(i << 1) + 1] = tem[i + 128];
    }

    for _ in 0..ROUNDS {
        let mut t = [0u8; 256];
        for (i, x) in t.iter_mut().enumerate() {
            let sel = (rc[i >> 2] >> (3 - (i & 3))) & 1;
            *x = SBOX[sel as usize][a[i] as usize];
        }
        permute_nibbles(&mut t, &mut a);

        let mut t: [u8; 64] = core::array::from_fn(|i| SBOX[0][rc[i] as usize]);
        permute_nibbles(&mut t, &mut rc);
    }

    // Degroup
    for i in 0..128 {
        tem[i] = a[i << 1];
        tem[i + 128] = a[(i << 1) + 1];
    }
    h.fill(0);
    for (i, t) in tem.iter().enumerate() {
        let shift = 7 - (i & 7);
        h[i >> 3] |= ((t >> 3) & 1) << shift;
        h[(i + 256) >> 3] |= ((t >> 2) & 1) << shift;
        h[(i + 512) >> 3] |= ((t >> 1) & 1) << shift;
        h[(i + 768) >> 3] |= (t & 1) << shift;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jh512_empty() {
        assert_eq!(
            hex::encode(jh512(b"")),
            "90ecf2f76f9d2c8017d979ad5ab96b87d58fc8fc4b83060f3f900774faa2c8fa\
             be69c5f4ff1ec2b61d6b316941cedee117fb04b1f4c5bc1b919ae841c50eec4f"
        );
    }

    #[test]
    fn test_full_block_gets_own_padding_block() {
        let data = [0x3cu8; 128];
        assert_ne!(jh512(&data[..63]), jh512(&data[..64]));
        assert_ne!(jh512(&data[..64]), jh512(&data[..65]));
    }
}
