//! Meraki proof of work
//!
//! An ethash-style epoch construction (Keccak light cache, FNV-mixed 1024-bit
//! dataset items, 64 dataset reads per hash) plus the Keccak-f[800] light
//! verification used by the header hash. The registry exposes the light
//! verification; the epoch context backs full hashing and verification.

use sha3::{Digest, Keccak256, Keccak512};

use crate::error::{InputRule, Result};
use crate::params::*;
use crate::primitives::bytes::le32 as le_word;

type Item = [u32; 16];

/// Constraint words absorbed by both Keccak-f[800] passes
///
/// `RAVENCOINKAWPOW`, except that the first word is a lower-case `r`.
const KAWPOW_TAG: [u32; 15] = [
    b'r' as u32,
    b'A' as u32,
    b'V' as u32,
    b'E' as u32,
    b'N' as u32,
    b'C' as u32,
    b'O' as u32,
    b'I' as u32,
    b'N' as u32,
    b'K' as u32,
    b'A' as u32,
    b'W' as u32,
    b'P' as u32,
    b'O' as u32,
    b'W' as u32,
];

const FNV_PRIME: u32 = 0x01000193;

#[inline(always)]
fn fnv1(u: u32, v: u32) -> u32 {
    u.wrapping_mul(FNV_PRIME) ^ v
}

fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

fn keccak512(data: &[u8]) -> [u8; 64] {
    let mut out = [0u8; 64];
    out.copy_from_slice(&Keccak512::digest(data));
    out
}

fn item_bytes(item: &Item) -> [u8; 64] {
    let mut out = [0u8; 64];
    for (chunk, w) in out.chunks_exact_mut(4).zip(item) {
        chunk.copy_from_slice(&w.to_le_bytes());
    }
    out
}

fn item_words(bytes: &[u8; 64]) -> Item {
    core::array::from_fn(|i| le_word(bytes, i))
}

/// Result of a full Meraki hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MerakiResult {
    pub final_hash: [u8; 32],
    pub mix_hash: [u8; 32],
}

/// Seed of `epoch`: Keccak-256 applied `epoch` times to 32 zero bytes
pub fn epoch_seed(epoch: u32) -> [u8; 32] {
    let mut seed = [0u8; 32];
    for _ in 0..epoch {
        seed = keccak256(&seed);
    }
    seed
}

/// Epoch whose seed starts with the same 32-bit word as `seed`
pub fn find_epoch_number(seed: &[u8; 32]) -> Option<u32> {
    let mut s = [0u8; 32];
    for epoch in 0..MERAKI_MAX_EPOCH_SEARCH {
        if s[..4] == seed[..4] {
            return Some(epoch);
        }
        s = keccak256(&s);
    }
    None
}

/// Largest prime not greater than `upper`, or 0 when `upper < 2`
pub fn find_largest_prime(upper: u64) -> u64 {
    fn is_prime(n: u64) -> bool {
        if n < 2 {
            return false;
        }
        if n % 2 == 0 {
            return n == 2;
        }
        let mut d = 3;
        while d * d <= n {
            if n % d == 0 {
                return false;
            }
            d += 2;
        }
        true
    }

    let mut n = upper;
    while n >= 2 {
        if is_prime(n) {
            return n;
        }
        n -= 1;
    }
    0
}

/// Number of 512-bit light cache items in `epoch`
pub fn light_cache_items(epoch: u32) -> u64 {
    let item = MERAKI_CACHE_ITEM_SIZE as u64;
    let growth = MERAKI_LIGHT_CACHE_GROWTH as u64 / item;
    let upper = MERAKI_LIGHT_CACHE_INIT as u64 / item + u64::from(epoch) * 4 * growth;
    find_largest_prime(upper)
}

/// Number of 1024-bit dataset items in `epoch`
pub fn dataset_items(epoch: u32) -> u64 {
    let item = MERAKI_DATASET_ITEM_SIZE as u64;
    let growth = MERAKI_DATASET_GROWTH as u64 / item;
    let upper = MERAKI_DATASET_INIT as u64 / item + u64::from(epoch) * 4 * growth;
    find_largest_prime(upper)
}

/// Light cache and dataset geometry for one epoch
///
/// Building the cache costs a few hundred thousand Keccak-512 calls; keep
/// the context around for the whole epoch. Dataset items are derived on
/// demand from the cache.
pub struct EpochContext {
    epoch: u32,
    cache: Vec<Item>,
    dataset_items: u64,
}

impl EpochContext {
    pub fn new(epoch: u32) -> Self {
        Self::with_sizes(epoch, light_cache_items(epoch), dataset_items(epoch))
    }

    fn with_sizes(epoch: u32, cache_items: u64, dataset_items: u64) -> Self {
        let seed = epoch_seed(epoch);
        let n = cache_items as usize;

        let mut cache = Vec::with_capacity(n);
        let mut item = keccak512(&seed);
        cache.push(item_words(&item));
        for _ in 1..n {
            item = keccak512(&item);
            cache.push(item_words(&item));
        }

        for _ in 0..MERAKI_LIGHT_CACHE_ROUNDS {
            for i in 0..n {
                let v = cache[i][0] as usize % n;
                let w = (n + i - 1) % n;
                let x: Item = core::array::from_fn(|k| cache[v][k] ^ cache[w][k]);
                cache[i] = item_words(&keccak512(&item_bytes(&x)));
            }
        }

        Self {
            epoch,
            cache,
            dataset_items,
        }
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn light_cache_items(&self) -> usize {
        self.cache.len()
    }

    pub fn dataset_items(&self) -> u64 {
        self.dataset_items
    }

    fn item_512(&self, index: u64) -> Item {
        let n = self.cache.len() as u64;
        let seed = index as u32;

        let mut mix = self.cache[(index % n) as usize];
        mix[0] ^= seed;
        mix = item_words(&keccak512(&item_bytes(&mix)));

        for round in 0..MERAKI_DATASET_PARENTS {
            let t = fnv1(seed ^ round, mix[round as usize % mix.len()]);
            let parent = &self.cache[(u64::from(t) % n) as usize];
            for (m, p) in mix.iter_mut().zip(parent) {
                *m = fnv1(*m, *p);
            }
        }

        item_words(&keccak512(&item_bytes(&mix)))
    }

    /// 1024-bit dataset item `index`, as two consecutive 512-bit halves
    pub fn dataset_item(&self, index: u32) -> [u32; 32] {
        let lo = self.item_512(u64::from(index) * 2);
        let hi = self.item_512(u64::from(index) * 2 + 1);
        core::array::from_fn(|i| if i < 16 { lo[i] } else { hi[i - 16] })
    }

    fn kernel(&self, seed: &[u8; 64]) -> [u8; 32] {
        let seed_words = item_words(seed);
        let seed_init = seed_words[0];
        let mut mix: [u32; 32] = core::array::from_fn(|i| seed_words[i % 16]);

        for i in 0..MERAKI_DATASET_ACCESSES {
            let t = fnv1(i ^ seed_init, mix[i as usize % mix.len()]);
            let p = u64::from(t) % self.dataset_items;
            let data = self.dataset_item(p as u32);
            for (m, d) in mix.iter_mut().zip(data) {
                *m = fnv1(*m, d);
            }
        }

        let mut mix_hash = [0u8; 32];
        for (chunk, m) in mix_hash.chunks_exact_mut(4).zip(mix.chunks_exact(4)) {
            let h = fnv1(fnv1(fnv1(m[0], m[1]), m[2]), m[3]);
            chunk.copy_from_slice(&h.to_le_bytes());
        }
        mix_hash
    }

    pub fn hash(&self, header_hash: &[u8; 32], nonce: u64) -> MerakiResult {
        let seed = hash_seed(header_hash, nonce);
        let mix_hash = self.kernel(&seed);
        MerakiResult {
            final_hash: hash_final(&seed, &mix_hash),
            mix_hash,
        }
    }

    /// Check the final hash against `boundary`, then recompute the mix
    pub fn verify(
        &self,
        header_hash: &[u8; 32],
        mix_hash: &[u8; 32],
        nonce: u64,
        boundary: &[u8; 32],
    ) -> bool {
        let seed = hash_seed(header_hash, nonce);
        if hash_final(&seed, mix_hash) > *boundary {
            return false;
        }
        self.kernel(&seed) == *mix_hash
    }

    /// Scan `iterations` nonces from `start_nonce` for a final hash at or
    /// below `boundary`; returns the first hit
    pub fn search_light(
        &self,
        header_hash: &[u8; 32],
        boundary: &[u8; 32],
        start_nonce: u64,
        iterations: u64,
    ) -> Option<(u64, MerakiResult)> {
        let end = start_nonce.saturating_add(iterations);
        (start_nonce..end)
            .map(|nonce| (nonce, self.hash(header_hash, nonce)))
            .find(|(_, r)| r.final_hash <= *boundary)
    }
}

fn hash_seed(header_hash: &[u8; 32], nonce: u64) -> [u8; 64] {
    let mut data = [0u8; 40];
    data[..32].copy_from_slice(header_hash);
    data[32..].copy_from_slice(&nonce.to_le_bytes());
    keccak512(&data)
}

fn hash_final(seed: &[u8; 64], mix_hash: &[u8; 32]) -> [u8; 32] {
    let mut data = [0u8; 96];
    data[..64].copy_from_slice(seed);
    data[64..].copy_from_slice(mix_hash);
    keccak256(&data)
}

/// Boundary check on the final hash alone, without recomputing the mix
pub fn verify_final_hash(
    header_hash: &[u8; 32],
    mix_hash: &[u8; 32],
    nonce: u64,
    boundary: &[u8; 32],
) -> bool {
    hash_final(&hash_seed(header_hash, nonce), mix_hash) <= *boundary
}

/// Header hash from a claimed mix: two Keccak-f[800] passes
pub fn light_verify(header_hash: &[u8; 32], mix_hash: &[u8; 32], nonce: u64) -> [u8; 32] {
    let mut state = [0u32; 25];
    for (i, w) in state[..8].iter_mut().enumerate() {
        *w = le_word(header_hash, i);
    }
    state[8] = nonce as u32;
    state[9] = (nonce >> 32) as u32;
    state[10..].copy_from_slice(&KAWPOW_TAG);
    keccak::f800(&mut state);

    let carry: [u32; 8] = core::array::from_fn(|i| state[i]);
    let mut state = [0u32; 25];
    state[..8].copy_from_slice(&carry);
    for (i, w) in state[8..16].iter_mut().enumerate() {
        *w = le_word(mix_hash, i);
    }
    state[16..].copy_from_slice(&KAWPOW_TAG[..9]);
    keccak::f800(&mut state);

    let mut out = [0u8; 32];
    for (chunk, w) in out.chunks_exact_mut(4).zip(&state[..8]) {
        chunk.copy_from_slice(&w.to_le_bytes());
    }
    out
}

/// Registry entry point: `header_hash(32) || nonce_le(8) || mix_hash(32)`
pub fn meraki_hash(input: &[u8]) -> Result<[u8; 32]> {
    let input = InputRule::Exact(MERAKI_INPUT_SIZE).apply("meraki", input)?;
    let mut header_hash = [0u8; 32];
    let mut nonce = [0u8; 8];
    let mut mix_hash = [0u8; 32];
    header_hash.copy_from_slice(&input[..32]);
    nonce.copy_from_slice(&input[32..40]);
    mix_hash.copy_from_slice(&input[40..]);
    Ok(light_verify(&header_hash, &mix_hash, u64::from_le_bytes(nonce)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_epoch_seed() {
        assert_eq!(epoch_seed(0), [0u8; 32]);
        assert_eq!(
            hex::encode(epoch_seed(1)),
            "290decd9548b62a8d60345a988386fc84ba6bc95484008f6362f93160ef3e563"
        );
    }

    #[test]
    fn test_find_epoch_number() {
        assert_eq!(find_epoch_number(&epoch_seed(0)), Some(0));
        assert_eq!(find_epoch_number(&epoch_seed(17)), Some(17));
        assert_eq!(find_epoch_number(&[0xffu8; 32]), None);
    }

    #[test]
    fn test_find_largest_prime() {
        assert_eq!(find_largest_prime(0), 0);
        assert_eq!(find_largest_prime(1), 0);
        assert_eq!(find_largest_prime(2), 2);
        assert_eq!(find_largest_prime(10), 7);
        assert_eq!(find_largest_prime(1024), 1021);
    }

    #[test]
    fn test_epoch_sizes() {
        assert_eq!(light_cache_items(0), 262139);
        assert_eq!(light_cache_items(1), 270329);
        assert_eq!(dataset_items(0), 8388593);
        assert_eq!(dataset_items(1), 8650727);
    }

    #[test]
    fn test_keccak_f800_zero_state() {
        let mut state = [0u32; 25];
        keccak::f800(&mut state);
        assert_eq!(state[0], 0xe531d45d);
        assert_eq!(state[1], 0xf404c6fb);
    }

    #[test]
    fn test_light_verify_vectors() {
        assert_eq!(
            hex::encode(light_verify(&[0u8; 32], &[0u8; 32], 0)),
            "eca8b4f31e736adb983cc905a06872eb3faebafe85a7b275b55e5ede41b5b019"
        );
        let header: [u8; 32] = core::array::from_fn(|i| i as u8);
        let mix: [u8; 32] = core::array::from_fn(|i| 32 + i as u8);
        assert_eq!(
            hex::encode(light_verify(&header, &mix, 0x0123456789abcdef)),
            "b8141579f18e0dd93953c6acbe025ca52872aab1319ec1e5523a0ab19a98b068"
        );
        assert_eq!(
            hex::encode(light_verify(&[0x11; 32], &[0x22; 32], 7)),
            "02fb8497fe339ce137525b244259ce9af2ab08f7b875af2f291d45f94273a33c"
        );
    }

    #[test]
    fn test_kawpow_tag_words() {
        assert_eq!(KAWPOW_TAG[0], 0x72);
        let rest: Vec<u8> = KAWPOW_TAG[1..].iter().map(|&w| w as u8).collect();
        assert_eq!(rest, b"AVENCOINKAWPOW");
    }

    #[test]
    fn test_meraki_hash_layout() {
        let header: [u8; 32] = core::array::from_fn(|i| i as u8);
        let mix: [u8; 32] = core::array::from_fn(|i| 32 + i as u8);
        let nonce: u64 = 0x0123456789abcdef;

        let mut input = Vec::with_capacity(MERAKI_INPUT_SIZE);
        input.extend_from_slice(&header);
        input.extend_from_slice(&nonce.to_le_bytes());
        input.extend_from_slice(&mix);

        assert_eq!(meraki_hash(&input).unwrap(), light_verify(&header, &mix, nonce));
        assert!(matches!(
            meraki_hash(&input[..71]),
            Err(Error::InvalidInput { actual: 71, .. })
        ));
    }

    fn small_context() -> EpochContext {
        EpochContext::with_sizes(0, 1021, 4093)
    }

    #[test]
    fn test_small_context_hash_verifies() {
        let ctx = small_context();
        let header = [0x42u8; 32];
        let result = ctx.hash(&header, 7);

        assert!(ctx.verify(&header, &result.mix_hash, 7, &[0xff; 32]));
        assert!(verify_final_hash(&header, &result.mix_hash, 7, &result.final_hash));
        assert!(!ctx.verify(&header, &result.mix_hash, 8, &[0xff; 32]));

        let mut forged = result.mix_hash;
        forged[0] ^= 1;
        assert!(!ctx.verify(&header, &forged, 7, &[0xff; 32]));
        assert!(!ctx.verify(&header, &result.mix_hash, 7, &[0u8; 32]));
    }

    #[test]
    fn test_search_light_finds_first_hit() {
        let ctx = small_context();
        let header = [0x42u8; 32];
        let hashes: Vec<MerakiResult> = (100..116).map(|n| ctx.hash(&header, n)).collect();

        // Boundary equal to the smallest final hash in the window
        let best = hashes.iter().map(|r| r.final_hash).min().unwrap();
        let first = 100 + hashes.iter().position(|r| r.final_hash == best).unwrap() as u64;

        let (nonce, result) = ctx.search_light(&header, &best, 100, 16).unwrap();
        assert_eq!(nonce, first);
        assert_eq!(result, hashes[(nonce - 100) as usize]);
        assert!(ctx.verify(&header, &result.mix_hash, nonce, &best));

        assert_eq!(ctx.search_light(&header, &[0xff; 32], 5, 3).map(|(n, _)| n), Some(5));
        assert!(ctx.search_light(&header, &[0u8; 32], 100, 16).is_none());
        assert!(ctx.search_light(&header, &[0xff; 32], 100, 0).is_none());
    }

    #[test]
    fn test_dataset_item_halves() {
        let ctx = small_context();
        let item = ctx.dataset_item(3);
        assert_eq!(item[..16], ctx.item_512(6));
        assert_eq!(item[16..], ctx.item_512(7));
        assert_ne!(ctx.dataset_item(3), ctx.dataset_item(4));
    }

    #[test]
    #[ignore = "builds the 16 MB epoch 0 cache"]
    fn test_epoch_zero_context() {
        let ctx = EpochContext::new(0);
        assert_eq!(ctx.light_cache_items(), 262139);
        let r = ctx.hash(&[0u8; 32], 0);
        assert!(ctx.verify(&[0u8; 32], &r.mix_hash, 0, &r.final_hash));
    }
}
