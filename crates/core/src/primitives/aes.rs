//! Single AES encryption round shared by ECHO, SHAvite-3, Groestl and Fugue
//!
//! `round` is one AESENC: SubBytes + ShiftRows + MixColumns + AddRoundKey on a
//! 16-byte column-major state. Hardware AES is used when the CPU reports it,
//! the table-driven software round otherwise.

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
cpufeatures::new!(aes_intrinsics, "aes");

#[cfg(target_arch = "aarch64")]
cpufeatures::new!(aes_intrinsics, "aes");

/// One AES round with the given round key
#[inline(always)]
pub fn round(state: &[u8; 16], key: &[u8; 16]) -> [u8; 16] {
    #[cfg(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64"))]
    if aes_intrinsics::get() {
        // SAFETY: the CPU supports the `aes` target feature (checked above).
        return unsafe { round_hw(state, key) };
    }

    round_soft(state, key)
}

/// One AES round with an all-zero round key
#[inline(always)]
pub fn round_nokey(state: &[u8; 16]) -> [u8; 16] {
    round(state, &[0u8; 16])
}

/// AES round over four little-endian 32-bit columns
///
/// ECHO and SHAvite-3 keep their state as `u32` words; column `i` is
/// bytes `4i..4i+4` of the AES state.
#[inline(always)]
pub fn round_le32(x: [u32; 4], k: [u32; 4]) -> [u32; 4] {
    let out = round(&words_to_block(x), &words_to_block(k));
    block_to_words(&out)
}

/// Unkeyed AES round over four little-endian 32-bit columns
#[inline(always)]
pub fn round_nokey_le32(x: [u32; 4]) -> [u32; 4] {
    block_to_words(&round_nokey(&words_to_block(x)))
}

#[inline(always)]
fn words_to_block(w: [u32; 4]) -> [u8; 16] {
    let mut b = [0u8; 16];
    for (chunk, word) in b.chunks_exact_mut(4).zip(w) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    b
}

#[inline(always)]
fn block_to_words(b: &[u8; 16]) -> [u32; 4] {
    [
        u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        u32::from_le_bytes([b[4], b[5], b[6], b[7]]),
        u32::from_le_bytes([b[8], b[9], b[10], b[11]]),
        u32::from_le_bytes([b[12], b[13], b[14], b[15]]),
    ]
}

/// x86 AES-NI round
#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
#[target_feature(enable = "aes")]
unsafe fn round_hw(state: &[u8; 16], key: &[u8; 16]) -> [u8; 16] {
    #[cfg(target_arch = "x86")]
    use core::arch::x86::{__m128i, _mm_aesenc_si128, _mm_loadu_si128, _mm_storeu_si128};
    #[cfg(target_arch = "x86_64")]
    use core::arch::x86_64::{__m128i, _mm_aesenc_si128, _mm_loadu_si128, _mm_storeu_si128};

    unsafe {
        let s = _mm_loadu_si128(state.as_ptr() as *const __m128i);
        let k = _mm_loadu_si128(key.as_ptr() as *const __m128i);
        let s = _mm_aesenc_si128(s, k);

        let mut result = [0u8; 16];
        _mm_storeu_si128(result.as_mut_ptr() as *mut __m128i, s);
        result
    }
}

/// ARM AES round
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "aes")]
unsafe fn round_hw(state: &[u8; 16], key: &[u8; 16]) -> [u8; 16] {
    use core::arch::aarch64::{vaeseq_u8, vaesmcq_u8, vdupq_n_u8, veorq_u8, vld1q_u8, vst1q_u8};

    unsafe {
        let s = vld1q_u8(state.as_ptr());
        let k = vld1q_u8(key.as_ptr());
        let zero = vdupq_n_u8(0);

        // AESE XORs its key before SubBytes/ShiftRows while AESENC XORs after
        // MixColumns: run AESE with a zero key, AESMC, then add the key.
        let s = veorq_u8(vaesmcq_u8(vaeseq_u8(s, zero)), k);

        let mut result = [0u8; 16];
        vst1q_u8(result.as_mut_ptr(), s);
        result
    }
}

/// Software AES round (WASM, older CPUs)
#[inline(always)]
fn round_soft(state: &[u8; 16], round_key: &[u8; 16]) -> [u8; 16] {
    // SubBytes
    let mut s = [0u8; 16];
    for i in 0..16 {
        s[i] = SBOX[state[i] as usize];
    }

    // ShiftRows (4x4 column-major matrix, row r rotates left by r)
    let t = s;
    s[1] = t[5];
    s[5] = t[9];
    s[9] = t[13];
    s[13] = t[1];

    s[2] = t[10];
    s[6] = t[14];
    s[10] = t[2];
    s[14] = t[6];

    s[3] = t[15];
    s[7] = t[3];
    s[11] = t[7];
    s[15] = t[11];

    // MixColumns
    let mut out = [0u8; 16];
    for col in 0..4 {
        let i = col * 4;
        let [b0, b1, b2, b3] = mix_column([s[i], s[i + 1], s[i + 2], s[i + 3]]);
        out[i] = b0;
        out[i + 1] = b1;
        out[i + 2] = b2;
        out[i + 3] = b3;
    }

    // AddRoundKey
    for i in 0..16 {
        out[i] ^= round_key[i];
    }

    out
}

/// AES MixColumns on one column
#[inline(always)]
pub fn mix_column([a0, a1, a2, a3]: [u8; 4]) -> [u8; 4] {
    [
        gf_mul2(a0) ^ gf_mul3(a1) ^ a2 ^ a3,
        a0 ^ gf_mul2(a1) ^ gf_mul3(a2) ^ a3,
        a0 ^ a1 ^ gf_mul2(a2) ^ gf_mul3(a3),
        gf_mul3(a0) ^ a1 ^ a2 ^ gf_mul2(a3),
    ]
}

/// Multiply by 2 in GF(2^8) with reduction polynomial x^8 + x^4 + x^3 + x + 1
#[inline(always)]
pub const fn gf_mul2(x: u8) -> u8 {
    let hi = x >> 7;
    let shifted = x << 1;
    shifted ^ (hi * 0x1b)
}

/// Multiply by 3 in GF(2^8): 3*x = 2*x + x
#[inline(always)]
pub const fn gf_mul3(x: u8) -> u8 {
    gf_mul2(x) ^ x
}

/// General multiplication in the AES field
pub const fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut r = 0u8;
    while b != 0 {
        if b & 1 != 0 {
            r ^= a;
        }
        a = gf_mul2(a);
        b >>= 1;
    }
    r
}

/// AES S-box
pub const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_round_matches_dispatch() {
        let state: [u8; 16] = core::array::from_fn(|i| (i as u8).wrapping_mul(17));
        let key: [u8; 16] = core::array::from_fn(|i| 0xa0 ^ i as u8);

        assert_eq!(round(&state, &key), round_soft(&state, &key));
    }

    #[test]
    fn test_fips197_first_round() {
        // FIPS-197 appendix B: state after the initial AddRoundKey, and
        // the state after round 1 with round key 1.
        let start = hex("193de3bea0f4e22b9ac68d2ae9f84808");
        let k1 = hex("a0fafe1788542cb123a339392a6c7605");
        let expected = hex("a49c7ff2689f352b6b5bea43026a5049");

        assert_eq!(round_soft(&start, &k1), expected);
        assert_eq!(round(&start, &k1), expected);
    }

    #[test]
    fn test_le32_view_matches_bytes() {
        let x = [0x03020100, 0x07060504, 0x0b0a0908, 0x0f0e0d0c];
        let bytes: [u8; 16] = core::array::from_fn(|i| i as u8);
        let words = round_nokey_le32(x);

        assert_eq!(words_to_block(words), round_nokey(&bytes));
    }

    #[test]
    fn test_gf_mul() {
        assert_eq!(gf_mul(0x57, 0x83), 0xc1);
        assert_eq!(gf_mul(0x57, 0x02), gf_mul2(0x57));
        assert_eq!(gf_mul(0x57, 0x03), gf_mul3(0x57));
    }

    fn hex(s: &str) -> [u8; 16] {
        let v = ::hex::decode(s).unwrap();
        v.try_into().unwrap()
    }
}
