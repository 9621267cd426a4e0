//! Cross-module tests for the algorithm registry

use proptest::prelude::*;

use crate::chain::{Chain, Stage};
use crate::primitives::{Primitive, aes};
use crate::*;

fn hex32(s: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    hex::decode_to_slice(s, &mut out).unwrap();
    out
}

/// Known-answer vectors over the standard 80-byte test header
const HEADER_VECTORS: &[(&str, &str)] = &[
    (
        "scrypt",
        "3d7c8462ad86260f9cfabdcf38f81e957a118d879e076cc44b810d38bf77a5e2",
    ),
    (
        "neoscrypt",
        "eed93239b2b63409b9d3babbf187874253e98e370c4517f805ab6c1ad1a4151a",
    ),
    (
        "keccak",
        "de96b224d0cbb2632c16b9ce311dfbabc10d155c2f4f9883eb345e991e82ac9b",
    ),
    (
        "blake",
        "a04e04c503d4db10542909031590c13ad4c269d5915e754c40eb4a758a994b98",
    ),
    (
        "blake256",
        "3f814f1b90ca9e5f87a3dfa775786f153b196c9e24618a76a9367f4949e7c969",
    ),
    (
        "skein",
        "c5286459ea4716b77ab979a1bc0198c996adb57d15fb848d99f7a85e83c7eee4",
    ),
    (
        "groestl",
        "96cd33ed0d05c964ddd57196a4c7c9b27a5006cbc98395dbc002e75f75858280",
    ),
    (
        "myr-groestl",
        "968d784d5fcdb97c21db3bfb0aa78e28535702336dc8d0f83976585bdc2d13f9",
    ),
    (
        "fugue",
        "7d56660cc610b7c1885497046c3e18a2e637896b488ac377b0e8f2f0fe72fcb0",
    ),
    (
        "x11",
        "ff2ca7dfd56dd50d25e77bfef267b82ade47f74f931b416aef35c70096d9d7b3",
    ),
    (
        "quark",
        "cf63d08172a51b859e339a9cbcc2e1318cd08eda796eaf48733386f000000000",
    ),
    (
        "nist5",
        "ca0edfc00512c126043532378752f9d69921b8ee61c0fdc0b66303e66a3573bb",
    ),
];

/// Dash genesis block header
fn dash_genesis_header() -> [u8; 80] {
    let mut merkle = hex32("e0028eb9648db56b1ac77cf090b99048a8007e2bb64b68f092c03c7f56a662c7");
    merkle.reverse();
    let mut header = [0u8; 80];
    header[..4].copy_from_slice(&1u32.to_le_bytes());
    header[36..68].copy_from_slice(&merkle);
    header[68..72].copy_from_slice(&1390095618u32.to_le_bytes());
    header[72..76].copy_from_slice(&0x1e0ffff0u32.to_le_bytes());
    header[76..].copy_from_slice(&28917698u32.to_le_bytes());
    header
}

#[test]
fn test_x11_dash_genesis() {
    let mut hash = x11_hash(&dash_genesis_header()).unwrap();
    hash.reverse();
    assert_eq!(
        hex::encode(hash),
        "00000ffd590b1485b3caadc19b22e6379c733355108f107a430458cdf3407ab6"
    );
}

/// The standard header is a mined Quark block: its digest meets the target
#[test]
fn test_quark_header_meets_target() {
    let hash = quark_hash(&TEST_HEADER).unwrap();
    assert_eq!(hash[28..], [0u8; 4]);
}

#[test]
fn test_known_vectors() {
    for (name, expected) in HEADER_VECTORS {
        let got = digest(name, &TEST_HEADER).unwrap();
        assert_eq!(hex::encode(got), *expected, "{name}");
    }
}

#[test]
fn test_scrypt_alias_vector() {
    assert_eq!(
        compute("ltc_scrypt", &TEST_HEADER).unwrap(),
        hex32(HEADER_VECTORS[0].1).to_vec()
    );
}

#[test]
fn test_every_algorithm_is_deterministic_and_sized() {
    let meraki_input = [0x11u8; MERAKI_INPUT_SIZE];
    for entry in registry().entries() {
        let input: &[u8] = if entry.name() == "meraki" {
            &meraki_input
        } else {
            &TEST_HEADER
        };
        let a = compute(entry.name(), input).unwrap();
        let b = compute(entry.name(), input).unwrap();
        assert_eq!(a.len(), entry.digest_size(), "{}", entry.name());
        assert_eq!(a, b, "{}", entry.name());
    }
}

#[test]
fn test_algorithms_disagree() {
    let mut seen = std::collections::HashSet::new();
    for name in registry().names().filter(|n| *n != "meraki") {
        assert!(seen.insert(digest(name, &TEST_HEADER).unwrap()), "{name}");
    }
}

#[test]
fn test_unknown_names_rejected() {
    for name in ["", "X11", "x11 ", "sha1", "x16rv2", "scrypt-n"] {
        assert_eq!(
            compute(name, &TEST_HEADER),
            Err(Error::UnknownAlgorithm(name.to_string()))
        );
    }
}

#[test]
fn test_empty_input_where_allowed() {
    for entry in registry().entries() {
        let result = compute(entry.name(), b"");
        match entry.input_rule() {
            InputRule::Any => assert_eq!(result.unwrap().len(), 32, "{}", entry.name()),
            _ => assert!(
                matches!(result, Err(Error::InvalidInput { actual: 0, .. })),
                "{}",
                entry.name()
            ),
        }
    }
}

#[test]
fn test_named_functions_match_compute() {
    assert_eq!(x11_hash(&TEST_HEADER).unwrap().to_vec(), compute("x11", &TEST_HEADER).unwrap());
    assert_eq!(quark_hash(&TEST_HEADER).unwrap().to_vec(), compute("quark", &TEST_HEADER).unwrap());
    assert_eq!(x16s_hash(&TEST_HEADER).unwrap().to_vec(), compute("x16s", &TEST_HEADER).unwrap());
}

#[test]
fn test_quark_follows_trace() {
    let Kind::Chain(chain) = registry().get("quark").unwrap().kind() else {
        panic!("quark is a chain");
    };
    for seed in 0u8..8 {
        let input = [seed; 80];
        let trace = chain.trace(&input);
        assert_eq!(trace.len(), 9);
        let mut buf = input.to_vec();
        for p in &trace {
            buf = p.digest(&buf).to_vec();
        }
        assert_eq!(quark_hash(&input).unwrap()[..], buf[..32]);
    }
}

#[test]
fn test_x16r_depends_on_prev_hash() {
    let mut other = TEST_HEADER;
    other[PREV_HASH_OFFSET] ^= 0x10;
    let Kind::Chain(chain) = registry().get("x16r").unwrap().kind() else {
        panic!("x16r is a chain");
    };
    assert_ne!(chain.trace(&TEST_HEADER), chain.trace(&other));
}

#[test]
fn test_concurrent_calls_match_sequential() {
    const THREADS: u32 = 4;
    const ROUNDS: u32 = 3;
    let names = ["x11", "quark", "nist5", "x16r", "scrypt", "keccak"];

    // Thread t, round r hashes the header with nonce t * ROUNDS + r
    let input = |nonce: u32| {
        let mut h = TEST_HEADER;
        h[76..].copy_from_slice(&nonce.to_le_bytes());
        h
    };
    let expected: Vec<Vec<[u8; 32]>> = (0..THREADS * ROUNDS)
        .map(|nonce| names.iter().map(|n| digest(n, &input(nonce)).unwrap()).collect())
        .collect();

    std::thread::scope(|s| {
        for t in 0..THREADS {
            let expected = &expected;
            s.spawn(move || {
                for r in 0..ROUNDS {
                    let nonce = t * ROUNDS + r;
                    let header = input(nonce);
                    for (name, want) in names.iter().zip(&expected[nonce as usize]) {
                        assert_eq!(digest(name, &header).unwrap(), *want, "{name} nonce {nonce}");
                    }
                }
            });
        }
    });

    // Distinct nonces must give distinct digests
    assert_ne!(expected[0], expected[1]);
}

#[test]
fn test_batch_matches_single() {
    let inputs: Vec<[u8; 80]> = (0u8..6)
        .map(|i| {
            let mut h = TEST_HEADER;
            h[76] = i;
            h
        })
        .collect();
    let batch = compute_batch("scrypt", &inputs).unwrap();
    assert_eq!(batch.len(), inputs.len());
    for (input, got) in inputs.iter().zip(batch) {
        assert_eq!(got, scrypt_hash(input).unwrap());
    }
}

/// Hardware AES dispatch must agree with a byte-level software round
#[test]
fn test_aes_round_matches_software_reference() {
    fn ref_round(state: &[u8; 16], key: &[u8; 16]) -> [u8; 16] {
        let mut s = [0u8; 16];
        for i in 0..16 {
            // SubBytes then ShiftRows
            s[i] = aes::SBOX[state[(i + 4 * (i % 4)) % 16] as usize];
        }
        let mut out = [0u8; 16];
        for col in 0..4 {
            let c = aes::mix_column([s[4 * col], s[4 * col + 1], s[4 * col + 2], s[4 * col + 3]]);
            out[4 * col..4 * col + 4].copy_from_slice(&c);
        }
        for i in 0..16 {
            out[i] ^= key[i];
        }
        out
    }

    let cases: [([u8; 16], [u8; 16]); 3] = [
        ([0u8; 16], [0u8; 16]),
        ([0xff; 16], [0x5a; 16]),
        (
            core::array::from_fn(|i| i as u8 * 17),
            core::array::from_fn(|i| 0xf0 ^ i as u8),
        ),
    ];
    for (i, (state, key)) in cases.iter().enumerate() {
        assert_eq!(aes::round(state, key), ref_round(state, key), "case {i}");
    }
}

const PROP_STAGES: &[Stage] = &[
    Stage::Run(Primitive::Blake512),
    Stage::Run(Primitive::Keccak512),
    Stage::Run(Primitive::Sha256),
];

proptest! {
    #[test]
    fn prop_chain_is_stage_composition(input in proptest::collection::vec(any::<u8>(), 0..200)) {
        let mut buf = input.clone();
        for stage in PROP_STAGES {
            buf = stage.resolve(&buf).digest(&buf).to_vec();
        }
        prop_assert_eq!(Chain::Stages(PROP_STAGES).run(&input).to_vec(), buf);
    }

    #[test]
    fn prop_prefix_rule_ignores_tail(tail in proptest::collection::vec(any::<u8>(), 1..64)) {
        let mut long = TEST_HEADER.to_vec();
        long.extend_from_slice(&tail);
        prop_assert_eq!(threes_hash(&long).unwrap(), threes_hash(&TEST_HEADER).unwrap());
    }

    #[test]
    fn prop_x16s_order_is_permutation(prev in any::<[u8; 32]>()) {
        let mut header = TEST_HEADER;
        header[PREV_HASH_OFFSET..PREV_HASH_OFFSET + 32].copy_from_slice(&prev);
        let mut order = chain::x16s_order(&header).to_vec();
        order.sort_by_key(|p| chain::X16_PRIMITIVES.iter().position(|q| q == p));
        prop_assert_eq!(order, chain::X16_PRIMITIVES.to_vec());
    }
}
