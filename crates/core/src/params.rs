//! Algorithm Parameters
//!
//! Fixed sizes and cost parameters shared by the registry and the
//! memory-hard functions.

/// Every registered algorithm returns a 256-bit digest
pub const DIGEST_SIZE: usize = 32;

/// Largest output of any chain stage (the 512-bit primitives)
pub const MAX_STAGE_OUTPUT: usize = 64;

/// Length of a legacy block header
pub const HEADER_SIZE: usize = 80;

/// Standard verification input: a version-112 block header
pub const TEST_HEADER: [u8; HEADER_SIZE] = [
    0x70, 0x00, 0x00, 0x00, 0x5d, 0x38, 0x5b, 0xa1, 0x14, 0xd0, 0x79, 0x97, 0x0b, 0x29, 0xa9, 0x41,
    0x8f, 0xd0, 0x54, 0x9e, 0x7d, 0x68, 0xa9, 0x5c, 0x7f, 0x16, 0x86, 0x21, 0xa3, 0x14, 0x20, 0x10,
    0x00, 0x00, 0x00, 0x00, 0x57, 0x85, 0x86, 0xd1, 0x49, 0xfd, 0x07, 0xb2, 0x2f, 0x3a, 0x8a, 0x34,
    0x7c, 0x51, 0x6d, 0xe7, 0x05, 0x2f, 0x03, 0x4d, 0x2b, 0x76, 0xff, 0x68, 0xe0, 0xd6, 0xec, 0xff,
    0x9b, 0x77, 0xa4, 0x54, 0x89, 0xe3, 0xfd, 0x51, 0x17, 0x32, 0x01, 0x1d, 0xf0, 0x73, 0x10, 0x00,
];

/// Offset of the previous-block hash inside a header
pub const PREV_HASH_OFFSET: usize = 4;

/// scrypt cost: N = 2^10
pub const SCRYPT_LOG_N: u8 = 10;
pub const SCRYPT_R: u32 = 1;
pub const SCRYPT_P: u32 = 1;

/// NeoScrypt iteration count (N)
pub const NEOSCRYPT_N: usize = 128;

/// NeoScrypt block multiplier (r); the working buffer is `2r` 64-byte blocks
pub const NEOSCRYPT_R: usize = 2;

/// Salsa20 and ChaCha20 rounds inside the NeoScrypt mixer
pub const NEOSCRYPT_ROUNDS: usize = 20;

/// FastKDF iterations
pub const FASTKDF_ROUNDS: usize = 32;

/// FastKDF ring buffer size
pub const FASTKDF_BUFFER: usize = 256;

/// Meraki input: header hash (32) || nonce (8, little-endian) || mix hash (32)
pub const MERAKI_INPUT_SIZE: usize = 72;

/// Meraki light cache item (512 bits)
pub const MERAKI_CACHE_ITEM_SIZE: usize = 64;

/// Meraki dataset item (1024 bits)
pub const MERAKI_DATASET_ITEM_SIZE: usize = 128;

pub const MERAKI_LIGHT_CACHE_INIT: usize = 1 << 24;
pub const MERAKI_LIGHT_CACHE_GROWTH: usize = 1 << 17;
pub const MERAKI_LIGHT_CACHE_ROUNDS: usize = 3;
pub const MERAKI_DATASET_INIT: usize = 1 << 30;
pub const MERAKI_DATASET_GROWTH: usize = 1 << 23;

/// Light cache parents folded into each 512-bit dataset item
pub const MERAKI_DATASET_PARENTS: u32 = 512;

/// Dataset reads per hash
pub const MERAKI_DATASET_ACCESSES: u32 = 64;

/// Epoch seeds are searched up to this epoch
pub const MERAKI_MAX_EPOCH_SEARCH: u32 = 30_000;
