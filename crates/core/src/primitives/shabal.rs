//! Shabal-512

use super::bytes::{le32, put_le32, split_blocks};

struct State {
    a: [u32; 12],
    b: [u32; 16],
    c: [u32; 16],
    w: u64,
}

impl State {
    /// Runs the two prefix blocks that encode the output length.
    fn new() -> Self {
        let mut s = State {
            a: [0; 12],
            b: [0; 16],
            c: [0; 16],
            w: u64::MAX,
        };
        let prefix0: [u32; 16] = core::array::from_fn(|i| 512 + i as u32);
        let prefix1: [u32; 16] = core::array::from_fn(|i| 512 + 16 + i as u32);
        s.block(&prefix0);
        s.block(&prefix1);
        s
    }

    fn block(&mut self, m: &[u32; 16]) {
        self.add_message(m);
        self.xor_counter();
        self.apply_p(m);
        for (c, w) in self.c.iter_mut().zip(m) {
            *c = c.wrapping_sub(*w);
        }
        core::mem::swap(&mut self.b, &mut self.c);
        self.w = self.w.wrapping_add(1);
    }

    fn add_message(&mut self, m: &[u32; 16]) {
        for (b, w) in self.b.iter_mut().zip(m) {
            *b = b.wrapping_add(*w);
        }
    }

    fn xor_counter(&mut self) {
        self.a[0] ^= self.w as u32;
        self.a[1] ^= (self.w >> 32) as u32;
    }

    fn apply_p(&mut self, m: &[u32; 16]) {
        for b in self.b.iter_mut() {
            *b = b.rotate_left(17);
        }

        for j in 0..3 {
            for i in 0..16 {
                let ia = (16 * j + i) % 12;
                let ia1 = (16 * j + i + 11) % 12;
                let xc = self.c[(24 - i) % 16];
                let xb1 = self.b[(i + 13) % 16];
                let xb2 = self.b[(i + 9) % 16];
                let xb3 = self.b[(i + 6) % 16];

                let a = ((self.a[ia] ^ self.a[ia1].rotate_left(15).wrapping_mul(5) ^ xc)
                    .wrapping_mul(3))
                    ^ xb1
                    ^ (xb2 & !xb3)
                    ^ m[i];
                self.a[ia] = a;
                self.b[i] = !(self.b[i].rotate_left(1) ^ a);
            }
        }

        for j in 0..36 {
            self.a[j % 12] = self.a[j % 12].wrapping_add(self.c[(j + 3) % 16]);
        }
    }
}

/// Shabal-512
pub fn shabal512(data: &[u8]) -> [u8; 64] {
    let mut s = State::new();

    let (blocks, tail) = split_blocks::<64>(data);
    for block in blocks {
        let m: [u32; 16] = core::array::from_fn(|i| le32(block, i));
        s.block(&m);
    }

    let mut buf = [0u8; 64];
    buf[..tail.len()].copy_from_slice(tail);
    buf[tail.len()] = 0x80;
    let m: [u32; 16] = core::array::from_fn(|i| le32(&buf, i));

    // Final block followed by three extra permutations; the counter holds.
    s.add_message(&m);
    s.xor_counter();
    s.apply_p(&m);
    for _ in 0..3 {
        core::mem::swap(&mut s.b, &mut s.c);
        s.xor_counter();
        s.apply_p(&m);
    }

    let mut out = [0u8; 64];
    put_le32(&mut out, &s.b);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_initial_value() {
        let s = State::new();
        assert_eq!(s.a[0], 0x20728DFD);
        assert_eq!(s.w, 1);
    }

    #[test]
    fn test_shabal512_empty() {
        assert_eq!(
            hex::encode(shabal512(b"")),
            "fc2d5dff5d70b7f6b1f8c2fcc8c1f9fe9934e54257eded0cf2b539a2ef0a19cc\
             ffa84f8d9fa135e4bd3c09f590f3a927ebd603ac29eb729e6f2a9af031ad8dc6"
        );
    }

    #[test]
    fn test_shabal512_distinguishes_lengths() {
        let data = [0u8; 65];
        assert_ne!(shabal512(&data[..63]), shabal512(&data[..64]));
        assert_ne!(shabal512(&data[..64]), shabal512(&data[..65]));
    }
}
