//! Byte-order helpers shared by the primitives

/// Little-endian 32-bit word `i` of `b`
#[inline(always)]
pub fn le32(b: &[u8], i: usize) -> u32 {
    let o = i * 4;
    u32::from_le_bytes([b[o], b[o + 1], b[o + 2], b[o + 3]])
}

/// Big-endian 32-bit word `i` of `b`
#[inline(always)]
pub fn be32(b: &[u8], i: usize) -> u32 {
    let o = i * 4;
    u32::from_be_bytes([b[o], b[o + 1], b[o + 2], b[o + 3]])
}

/// Little-endian 64-bit word `i` of `b`
#[inline(always)]
pub fn le64(b: &[u8], i: usize) -> u64 {
    let o = i * 8;
    let mut w = [0u8; 8];
    w.copy_from_slice(&b[o..o + 8]);
    u64::from_le_bytes(w)
}

/// Big-endian 64-bit word `i` of `b`
#[inline(always)]
pub fn be64(b: &[u8], i: usize) -> u64 {
    let o = i * 8;
    let mut w = [0u8; 8];
    w.copy_from_slice(&b[o..o + 8]);
    u64::from_be_bytes(w)
}

/// Serialize words little-endian into `out`
#[inline(always)]
pub fn put_le32(out: &mut [u8], words: &[u32]) {
    for (chunk, w) in out.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&w.to_le_bytes());
    }
}

/// Serialize words big-endian into `out`
#[inline(always)]
pub fn put_be32(out: &mut [u8], words: &[u32]) {
    for (chunk, w) in out.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&w.to_be_bytes());
    }
}

/// Serialize words little-endian into `out`
#[inline(always)]
pub fn put_le64(out: &mut [u8], words: &[u64]) {
    for (chunk, w) in out.chunks_exact_mut(8).zip(words) {
        chunk.copy_from_slice(&w.to_le_bytes());
    }
}

/// Serialize words big-endian into `out`
#[inline(always)]
pub fn put_be64(out: &mut [u8], words: &[u64]) {
    for (chunk, w) in out.chunks_exact_mut(8).zip(words) {
        chunk.copy_from_slice(&w.to_be_bytes());
    }
}

/// Split `data` into full `N`-byte blocks and the trailing remainder
///
/// A message that is an exact multiple of `N` leaves an empty remainder.
#[inline(always)]
pub fn split_blocks<const N: usize>(data: &[u8]) -> (impl Iterator<Item = &[u8; N]>, &[u8]) {
    let chunks = data.chunks_exact(N);
    let tail = chunks.remainder();
    (chunks.filter_map(|c| <&[u8; N]>::try_from(c).ok()), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_loads() {
        let b = [1u8, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(le32(&b, 1), 0x08070605);
        assert_eq!(be32(&b, 0), 0x01020304);
        assert_eq!(le64(&b, 0), 0x0807060504030201);
        assert_eq!(be64(&b, 0), 0x0102030405060708);
    }

    #[test]
    fn test_split_blocks() {
        let data = [0u8; 130];
        let (blocks, tail) = split_blocks::<64>(&data);
        assert_eq!(blocks.count(), 2);
        assert_eq!(tail.len(), 2);

        let (blocks, tail) = split_blocks::<64>(&data[..128]);
        assert_eq!(blocks.count(), 2);
        assert!(tail.is_empty());
    }
}
