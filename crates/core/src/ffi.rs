//! C FFI bindings for mobile platforms

use core::ffi::{CStr, c_char};
use core::slice;

use crate::neoscrypt::NeoScrypt;
use crate::params::{DIGEST_SIZE, HEADER_SIZE};
use crate::{Error, registry};

pub const ALGOHASH_OK: i32 = 0;
pub const ALGOHASH_ERR_NULL: i32 = -1;
pub const ALGOHASH_ERR_UNKNOWN_ALGORITHM: i32 = -2;
pub const ALGOHASH_ERR_INVALID_INPUT: i32 = -3;
pub const ALGOHASH_ERR_BUFFER_TOO_SMALL: i32 = -4;
pub const ALGOHASH_ERR_INTERNAL: i32 = -5;

fn error_code(err: &Error) -> i32 {
    match err {
        Error::UnknownAlgorithm(_) => ALGOHASH_ERR_UNKNOWN_ALGORITHM,
        Error::InvalidInput { .. } => ALGOHASH_ERR_INVALID_INPUT,
        Error::Kdf(_) => ALGOHASH_ERR_INTERNAL,
    }
}

/// # Safety
///
/// `name` must be null or a valid NUL-terminated string.
unsafe fn algorithm_name<'a>(name: *const c_char) -> Option<&'a str> {
    if name.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(name) }.to_str().ok()
}

/// Compute the digest of `input` with the algorithm called `name`
/// - name: NUL-terminated algorithm name, e.g. "x11"
/// - input: pointer to input bytes (may be null when input_len is 0)
/// - output: buffer of at least 32 bytes
///
/// Returns 0 on success or a negative `ALGOHASH_ERR_*` code.
#[unsafe(no_mangle)]
pub extern "C" fn algohash_compute(
    name: *const c_char,
    input: *const u8,
    input_len: usize,
    output: *mut u8,
    output_len: usize,
) -> i32 {
    if output.is_null() || (input.is_null() && input_len != 0) {
        return ALGOHASH_ERR_NULL;
    }
    let Some(name) = (unsafe { algorithm_name(name) }) else {
        return ALGOHASH_ERR_NULL;
    };
    if output_len < DIGEST_SIZE {
        return ALGOHASH_ERR_BUFFER_TOO_SMALL;
    }

    let input_slice: &[u8] = if input_len == 0 {
        &[]
    } else {
        unsafe { slice::from_raw_parts(input, input_len) }
    };

    match registry().digest(name, input_slice) {
        Ok(hash) => {
            let output_slice = unsafe { slice::from_raw_parts_mut(output, DIGEST_SIZE) };
            output_slice.copy_from_slice(&hash);
            ALGOHASH_OK
        }
        Err(err) => error_code(&err),
    }
}

/// Digest size of `name` in bytes, or a negative error code
#[unsafe(no_mangle)]
pub extern "C" fn algohash_digest_size(name: *const c_char) -> i32 {
    let Some(name) = (unsafe { algorithm_name(name) }) else {
        return ALGOHASH_ERR_NULL;
    };
    match registry().get(name) {
        Some(entry) => entry.digest_size() as i32,
        None => ALGOHASH_ERR_UNKNOWN_ALGORITHM,
    }
}

/// Opaque NeoScrypt handle; keeps the scratchpad between calls
pub struct NeoScryptHasher {
    inner: NeoScrypt,
}

/// Create a NeoScrypt hasher (caller must free with algohash_neoscrypt_free)
#[unsafe(no_mangle)]
pub extern "C" fn algohash_neoscrypt_new() -> *mut NeoScryptHasher {
    let hasher = Box::new(NeoScryptHasher {
        inner: NeoScrypt::new(),
    });
    Box::into_raw(hasher)
}

/// Free a NeoScrypt hasher
#[unsafe(no_mangle)]
pub extern "C" fn algohash_neoscrypt_free(hasher: *mut NeoScryptHasher) {
    if !hasher.is_null() {
        unsafe {
            let _ = Box::from_raw(hasher);
        }
    }
}

/// Hash an 80-byte header into a 32-byte output buffer
#[unsafe(no_mangle)]
pub extern "C" fn algohash_neoscrypt_hash(
    hasher: *mut NeoScryptHasher,
    header: *const u8,
    output: *mut u8,
) -> i32 {
    if hasher.is_null() || header.is_null() || output.is_null() {
        return ALGOHASH_ERR_NULL;
    }

    unsafe {
        let hasher = &mut *hasher;
        let mut buf = [0u8; HEADER_SIZE];
        buf.copy_from_slice(slice::from_raw_parts(header, HEADER_SIZE));
        match hasher.inner.hash(&buf) {
            Ok(hash) => {
                slice::from_raw_parts_mut(output, DIGEST_SIZE).copy_from_slice(&hash);
                ALGOHASH_OK
            }
            Err(err) => error_code(&err),
        }
    }
}

/// Benchmark: compute N digests of varying 80-byte headers and return total
/// microseconds, or 0 if `name` is not a usable algorithm
#[unsafe(no_mangle)]
pub extern "C" fn algohash_benchmark(name: *const c_char, iterations: u32) -> u64 {
    use std::time::Instant;

    let Some(entry) = (unsafe { algorithm_name(name) }).and_then(|n| registry().get(n)) else {
        return 0;
    };
    let mut input = if entry.name() == "meraki" {
        vec![0u8; crate::params::MERAKI_INPUT_SIZE]
    } else {
        crate::params::TEST_HEADER.to_vec()
    };

    let start = Instant::now();
    for i in 0..iterations {
        let n = input.len();
        input[n - 4..].copy_from_slice(&i.to_le_bytes());
        if entry.digest(&input).is_err() {
            return 0;
        }
    }
    let elapsed = start.elapsed();

    elapsed.as_micros() as u64
}

/// Get hash rate (hashes per second) from a benchmark run
#[unsafe(no_mangle)]
pub extern "C" fn algohash_hashrate(iterations: u32, microseconds: u64) -> f64 {
    if microseconds == 0 {
        return 0.0;
    }
    (iterations as f64) / (microseconds as f64 / 1_000_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_through_c_abi() {
        let mut out = [0u8; 32];
        let rc = algohash_compute(
            c"keccak".as_ptr(),
            crate::TEST_HEADER.as_ptr(),
            crate::TEST_HEADER.len(),
            out.as_mut_ptr(),
            out.len(),
        );
        assert_eq!(rc, ALGOHASH_OK);
        assert_eq!(out, crate::keccak_hash(&crate::TEST_HEADER).unwrap());
    }

    #[test]
    fn test_error_codes() {
        let mut out = [0u8; 32];
        let unknown = algohash_compute(c"x99".as_ptr(), core::ptr::null(), 0, out.as_mut_ptr(), 32);
        assert_eq!(unknown, ALGOHASH_ERR_UNKNOWN_ALGORITHM);

        let short = [0u8; 10];
        let invalid = algohash_compute(
            c"neoscrypt".as_ptr(),
            short.as_ptr(),
            short.len(),
            out.as_mut_ptr(),
            32,
        );
        assert_eq!(invalid, ALGOHASH_ERR_INVALID_INPUT);

        let small = algohash_compute(c"x11".as_ptr(), core::ptr::null(), 0, out.as_mut_ptr(), 16);
        assert_eq!(small, ALGOHASH_ERR_BUFFER_TOO_SMALL);

        let null = algohash_compute(core::ptr::null(), core::ptr::null(), 0, out.as_mut_ptr(), 32);
        assert_eq!(null, ALGOHASH_ERR_NULL);
    }

    #[test]
    fn test_digest_size() {
        assert_eq!(algohash_digest_size(c"x11".as_ptr()), 32);
        assert_eq!(algohash_digest_size(c"nope".as_ptr()), ALGOHASH_ERR_UNKNOWN_ALGORITHM);
    }

    #[test]
    fn test_neoscrypt_handle() {
        let hasher = algohash_neoscrypt_new();
        let mut out = [0u8; 32];
        let rc = algohash_neoscrypt_hash(hasher, crate::TEST_HEADER.as_ptr(), out.as_mut_ptr());
        algohash_neoscrypt_free(hasher);
        assert_eq!(rc, ALGOHASH_OK);
        assert_eq!(out, crate::neoscrypt_hash(&crate::TEST_HEADER).unwrap());
    }

    #[test]
    fn test_hashrate() {
        assert_eq!(algohash_hashrate(10, 0), 0.0);
        assert_eq!(algohash_hashrate(1000, 1_000_000), 1000.0);
        assert_eq!(algohash_benchmark(c"nope".as_ptr(), 10), 0);
    }
}
