//! Self-test over the standard header
//!
//! Every registered algorithm is run twice on the standard input. A check
//! passes when both digests agree, have the advertised size and, for the
//! algorithms pinned below, equal the known answer.

use serde::Serialize;
use thiserror::Error;

use crate::algorithm::{self, Entry, HEADER_SIZE, MERAKI_INPUT_SIZE, TEST_HEADER};

/// Known answers over [`TEST_HEADER`]
pub const KNOWN_VECTORS: &[(&str, &str)] = &[
    ("scrypt", "3d7c8462ad86260f9cfabdcf38f81e957a118d879e076cc44b810d38bf77a5e2"),
    ("neoscrypt", "eed93239b2b63409b9d3babbf187874253e98e370c4517f805ab6c1ad1a4151a"),
    ("keccak", "de96b224d0cbb2632c16b9ce311dfbabc10d155c2f4f9883eb345e991e82ac9b"),
    ("blake256", "3f814f1b90ca9e5f87a3dfa775786f153b196c9e24618a76a9367f4949e7c969"),
    ("x11", "ff2ca7dfd56dd50d25e77bfef267b82ade47f74f931b416aef35c70096d9d7b3"),
    ("quark", "cf63d08172a51b859e339a9cbcc2e1318cd08eda796eaf48733386f000000000"),
    ("nist5", "ca0edfc00512c126043532378752f9d69921b8ee61c0fdc0b66303e66a3573bb"),
];

static STANDARD_HEADER: [u8; HEADER_SIZE] = TEST_HEADER;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    #[error("{0}")]
    Hash(#[from] algorithm::Error),

    #[error("digest is {got} bytes, expected {expected}")]
    WrongSize { expected: usize, got: usize },

    #[error("two runs over the same input disagree")]
    Nondeterministic,

    #[error("digest {got} does not match known answer {expected}")]
    Mismatch { expected: &'static str, got: String },
}

/// Outcome for one algorithm
#[derive(Debug, Clone, Serialize)]
pub struct Check {
    pub algorithm: &'static str,
    pub input_len: usize,
    pub digest: Option<String>,
    pub pinned: bool,
    pub error: Option<String>,
}

impl Check {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub checks: Vec<Check>,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(Check::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(|c| !c.passed())
    }
}

/// Input the self-test feeds to `entry`
///
/// Meraki takes a fixed 72-byte record, so it gets the first 72 header bytes.
pub fn standard_input(entry: &Entry) -> &'static [u8] {
    if entry.name() == "meraki" {
        &STANDARD_HEADER[..MERAKI_INPUT_SIZE]
    } else {
        &STANDARD_HEADER
    }
}

fn known_answer(name: &str) -> Option<&'static str> {
    KNOWN_VECTORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, hex)| *hex)
}

fn check_entry(entry: &Entry) -> Result<String, Failure> {
    let input = standard_input(entry);
    let first = entry.compute(input)?;
    let second = entry.compute(input)?;

    if first.len() != entry.digest_size() {
        return Err(Failure::WrongSize {
            expected: entry.digest_size(),
            got: first.len(),
        });
    }
    if first != second {
        return Err(Failure::Nondeterministic);
    }

    let got = hex::encode(&first);
    if let Some(expected) = known_answer(entry.name()) {
        if got != expected {
            return Err(Failure::Mismatch { expected, got });
        }
    }
    Ok(got)
}

/// Run every registered algorithm
pub fn run() -> Report {
    let checks = algorithm::registry()
        .entries()
        .iter()
        .map(|entry| {
            let pinned = known_answer(entry.name()).is_some();
            let input_len = standard_input(entry).len();
            match check_entry(entry) {
                Ok(digest) => {
                    tracing::debug!(algorithm = entry.name(), %digest, pinned, "self-test passed");
                    Check {
                        algorithm: entry.name(),
                        input_len,
                        digest: Some(digest),
                        pinned,
                        error: None,
                    }
                }
                Err(e) => {
                    tracing::warn!(algorithm = entry.name(), error = %e, "self-test failed");
                    Check {
                        algorithm: entry.name(),
                        input_len,
                        digest: None,
                        pinned,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();

    Report { checks }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selftest_passes() {
        let report = run();
        let failures: Vec<_> = report.failures().collect();
        assert!(failures.is_empty(), "{failures:?}");
        assert_eq!(report.checks.len(), algorithm::registry().len());
    }

    #[test]
    fn test_known_vectors_are_registered() {
        for (name, hex) in KNOWN_VECTORS {
            assert!(algorithm::registry().get(name).is_some(), "{name}");
            assert_eq!(hex.len(), 64);
        }
    }

    #[test]
    fn test_chains_are_pinned() {
        let report = run();
        for name in ["x11", "quark", "nist5"] {
            let check = report.checks.iter().find(|c| c.algorithm == name).unwrap();
            assert!(check.pinned && check.passed(), "{name}");
        }
    }

    #[test]
    fn test_meraki_gets_fixed_record() {
        let entry = algorithm::registry().get("meraki").unwrap();
        assert_eq!(standard_input(entry).len(), MERAKI_INPUT_SIZE);
    }

    #[test]
    fn test_report_serializes() {
        let report = run();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["checks"][0]["algorithm"], "scrypt");
        assert_eq!(json["checks"][0]["pinned"], true);
    }

    #[test]
    fn test_failure_messages() {
        let e = Failure::from(algorithm::Error::UnknownAlgorithm("x".into()));
        assert_eq!(e.to_string(), "unknown algorithm: x");
        assert_eq!(
            Failure::WrongSize { expected: 32, got: 64 }.to_string(),
            "digest is 64 bytes, expected 32"
        );
    }
}
