//! Algorithm registry
//!
//! The catalogue is built once, on first use, and never changes afterwards.
//! Lookups and `compute` calls only read it, so any number of threads can
//! hash through the shared instance at the same time.

use std::collections::HashMap;

use once_cell::sync::Lazy;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::chain::{Chain, Stage, bit3, x16r_order, x16s_order};
use crate::error::{Error, InputRule, Result};
use crate::meraki;
use crate::neoscrypt::NeoScrypt;
use crate::params::*;
use crate::primitives::Primitive::{self, *};

use Stage::Run;

/// What an entry executes
#[derive(Clone, Copy)]
pub enum Kind {
    /// One primitive; wide digests are truncated to 32 bytes
    Primitive(Primitive),
    /// Fixed, adaptive or input-ordered chain
    Chain(Chain),
    /// Key-derivation and verification functions with their own structure
    Custom(fn(&[u8]) -> Result<[u8; DIGEST_SIZE]>),
}

/// One named algorithm
pub struct Entry {
    name: &'static str,
    aliases: &'static [&'static str],
    summary: &'static str,
    input: InputRule,
    kind: Kind,
}

impl Entry {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    pub fn summary(&self) -> &'static str {
        self.summary
    }

    pub fn input_rule(&self) -> InputRule {
        self.input
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Always 32 bytes
    pub fn digest_size(&self) -> usize {
        DIGEST_SIZE
    }

    /// Hash `input` into a fixed-size digest
    pub fn digest(&self, input: &[u8]) -> Result<[u8; DIGEST_SIZE]> {
        let data = self.input.apply(self.name, input)?;
        match self.kind {
            Kind::Primitive(p) => {
                let full = p.digest(data);
                let mut out = [0u8; DIGEST_SIZE];
                out.copy_from_slice(&full[..DIGEST_SIZE]);
                Ok(out)
            }
            Kind::Chain(chain) => Ok(chain.run(data)),
            Kind::Custom(f) => f(data),
        }
    }

    /// Hash `input`; the returned buffer is `digest_size()` bytes long
    pub fn compute(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.digest(input).map(|d| d.to_vec())
    }
}

impl core::fmt::Debug for Entry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("input", &self.input)
            .finish()
    }
}

/// Immutable name-to-algorithm map
pub struct Registry {
    entries: Vec<Entry>,
    index: HashMap<&'static str, usize>,
}

impl Registry {
    /// The full catalogue
    pub fn standard() -> Self {
        Self::from_entries(catalogue())
    }

    fn from_entries(entries: Vec<Entry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len() * 2);
        for (i, e) in entries.iter().enumerate() {
            index.insert(e.name, i);
            for alias in e.aliases {
                index.insert(*alias, i);
            }
        }
        Self { entries, index }
    }

    /// Entry registered under `name` or one of its aliases
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    fn lookup(&self, name: &str) -> Result<&Entry> {
        self.get(name).ok_or_else(|| Error::UnknownAlgorithm(name.to_string()))
    }

    /// Canonical names in catalogue order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn digest(&self, name: &str, input: &[u8]) -> Result<[u8; DIGEST_SIZE]> {
        self.lookup(name)?.digest(input)
    }

    pub fn compute(&self, name: &str, input: &[u8]) -> Result<Vec<u8>> {
        self.lookup(name)?.compute(input)
    }

    /// Hash many buffers with one algorithm; results keep the input order
    #[cfg(feature = "parallel")]
    pub fn compute_batch<T>(&self, name: &str, inputs: &[T]) -> Result<Vec<[u8; DIGEST_SIZE]>>
    where
        T: AsRef<[u8]> + Sync,
    {
        let entry = self.lookup(name)?;
        inputs.par_iter().map(|i| entry.digest(i.as_ref())).collect()
    }

    /// Hash many buffers with one algorithm; results keep the input order
    #[cfg(not(feature = "parallel"))]
    pub fn compute_batch<T>(&self, name: &str, inputs: &[T]) -> Result<Vec<[u8; DIGEST_SIZE]>>
    where
        T: AsRef<[u8]>,
    {
        let entry = self.lookup(name)?;
        inputs.iter().map(|i| entry.digest(i.as_ref())).collect()
    }
}

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::standard);

/// The process-wide registry
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Hash `input` with the algorithm registered as `name`
pub fn compute(name: &str, input: &[u8]) -> Result<Vec<u8>> {
    registry().compute(name, input)
}

/// [`compute`] with a fixed-size result
pub fn digest(name: &str, input: &[u8]) -> Result<[u8; DIGEST_SIZE]> {
    registry().digest(name, input)
}

#[cfg(feature = "parallel")]
pub fn compute_batch<T>(name: &str, inputs: &[T]) -> Result<Vec<[u8; DIGEST_SIZE]>>
where
    T: AsRef<[u8]> + Sync,
{
    registry().compute_batch(name, inputs)
}

#[cfg(not(feature = "parallel"))]
pub fn compute_batch<T>(name: &str, inputs: &[T]) -> Result<Vec<[u8; DIGEST_SIZE]>>
where
    T: AsRef<[u8]>,
{
    registry().compute_batch(name, inputs)
}

macro_rules! named_entry_points {
    ($($fn_name:ident => $algo:literal),* $(,)?) => {
        $(
            #[doc = concat!("`", $algo, "` digest of `input`")]
            pub fn $fn_name(input: &[u8]) -> Result<[u8; DIGEST_SIZE]> {
                digest($algo, input)
            }
        )*
    };
}

named_entry_points! {
    scrypt_hash => "scrypt",
    x11_hash => "x11",
    x13_hash => "x13",
    x14_hash => "x14",
    x15_hash => "x15",
    quark_hash => "quark",
    nist5_hash => "nist5",
    qubit_hash => "qubit",
    fresh_hash => "fresh",
    threes_hash => "threes",
    x16r_hash => "x16r",
    x16s_hash => "x16s",
    groestl_hash => "groestl",
    myr_groestl_hash => "myr-groestl",
    skein_hash => "skein",
    keccak_hash => "keccak",
    blake_hash => "blake",
    blake256_hash => "blake256",
    fugue_hash => "fugue",
    shavite3_hash => "shavite3",
    neoscrypt_hash => "neoscrypt",
    meraki_hash => "meraki",
}

const X11: &[Stage] = &[
    Run(Blake512),
    Run(Bmw512),
    Run(Groestl512),
    Run(Skein512),
    Run(Jh512),
    Run(Keccak512),
    Run(Luffa512),
    Run(CubeHash512),
    Run(Shavite512),
    Run(Simd512),
    Run(Echo512),
];

const X13: &[Stage] = &[
    Run(Blake512),
    Run(Bmw512),
    Run(Groestl512),
    Run(Skein512),
    Run(Jh512),
    Run(Keccak512),
    Run(Luffa512),
    Run(CubeHash512),
    Run(Shavite512),
    Run(Simd512),
    Run(Echo512),
    Run(Hamsi512),
    Run(Fugue512),
];

const X14: &[Stage] = &[
    Run(Blake512),
    Run(Bmw512),
    Run(Groestl512),
    Run(Skein512),
    Run(Jh512),
    Run(Keccak512),
    Run(Luffa512),
    Run(CubeHash512),
    Run(Shavite512),
    Run(Simd512),
    Run(Echo512),
    Run(Hamsi512),
    Run(Fugue512),
    Run(Shabal512),
];

const X15: &[Stage] = &[
    Run(Blake512),
    Run(Bmw512),
    Run(Groestl512),
    Run(Skein512),
    Run(Jh512),
    Run(Keccak512),
    Run(Luffa512),
    Run(CubeHash512),
    Run(Shavite512),
    Run(Simd512),
    Run(Echo512),
    Run(Hamsi512),
    Run(Fugue512),
    Run(Shabal512),
    Run(Whirlpool),
];

const QUARK: &[Stage] = &[
    Run(Blake512),
    Run(Bmw512),
    Stage::Select {
        selector: bit3,
        choices: &[Skein512, Groestl512],
    },
    Run(Groestl512),
    Run(Jh512),
    Stage::Select {
        selector: bit3,
        choices: &[Bmw512, Blake512],
    },
    Run(Keccak512),
    Run(Skein512),
    Stage::Select {
        selector: bit3,
        choices: &[Jh512, Keccak512],
    },
];

const NIST5: &[Stage] = &[
    Run(Blake512),
    Run(Groestl512),
    Run(Jh512),
    Run(Keccak512),
    Run(Skein512),
];

const QUBIT: &[Stage] = &[
    Run(Luffa512),
    Run(CubeHash512),
    Run(Shavite512),
    Run(Simd512),
    Run(Echo512),
];

const FRESH: &[Stage] = &[
    Run(Shavite512),
    Run(Simd512),
    Run(Shavite512),
    Run(Simd512),
    Run(Echo512),
];

const THREES: &[Stage] = &[Run(Shavite512), Run(Simd512), Run(Skein512)];
const GROESTL: &[Stage] = &[Run(Groestl512), Run(Groestl512)];
const MYR_GROESTL: &[Stage] = &[Run(Groestl512), Run(Sha256)];
const SKEIN: &[Stage] = &[Run(Skein512), Run(Sha256)];
const SHAVITE3: &[Stage] = &[Run(Shavite512), Run(Shavite512)];

fn scrypt_digest(data: &[u8]) -> Result<[u8; DIGEST_SIZE]> {
    let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, DIGEST_SIZE)
        .map_err(|_| Error::Kdf("scrypt parameters"))?;
    let mut out = [0u8; DIGEST_SIZE];
    scrypt::scrypt(data, data, &params, &mut out).map_err(|_| Error::Kdf("scrypt output length"))?;
    Ok(out)
}

fn neoscrypt_digest(data: &[u8]) -> Result<[u8; DIGEST_SIZE]> {
    let mut header = [0u8; HEADER_SIZE];
    header.copy_from_slice(data);
    NeoScrypt::new().hash(&header)
}

fn catalogue() -> Vec<Entry> {
    let x16_input = InputRule::AtLeast(PREV_HASH_OFFSET + 32);
    let header = InputRule::Prefix(HEADER_SIZE);

    let entry = |name, summary, input, kind| Entry {
        name,
        aliases: &[],
        summary,
        input,
        kind,
    };

    vec![
        Entry {
            name: "scrypt",
            aliases: &["ltc_scrypt"],
            summary: "scrypt N=1024 r=1 p=1, header as password and salt",
            input: header,
            kind: Kind::Custom(scrypt_digest),
        },
        entry("x11", "11-stage SHA-3 candidate chain", InputRule::Any, Kind::Chain(Chain::Stages(X11))),
        entry("x13", "x11 + hamsi, fugue", InputRule::Any, Kind::Chain(Chain::Stages(X13))),
        entry("x14", "x13 + shabal", InputRule::Any, Kind::Chain(Chain::Stages(X14))),
        entry("x15", "x14 + whirlpool", InputRule::Any, Kind::Chain(Chain::Stages(X15))),
        entry("quark", "9-stage chain, three branches on bit 3", InputRule::Any, Kind::Chain(Chain::Stages(QUARK))),
        entry("nist5", "blake, groestl, jh, keccak, skein", InputRule::Any, Kind::Chain(Chain::Stages(NIST5))),
        entry("qubit", "luffa, cubehash, shavite, simd, echo", InputRule::Any, Kind::Chain(Chain::Stages(QUBIT))),
        entry("fresh", "shavite, simd, shavite, simd, echo", InputRule::Any, Kind::Chain(Chain::Stages(FRESH))),
        entry("threes", "shavite, simd, skein", header, Kind::Chain(Chain::Stages(THREES))),
        entry("x16r", "16 stages ordered by the previous-block hash", x16_input, Kind::Chain(Chain::Ordered(x16r_order))),
        entry("x16s", "x16r with shuffled ordering", x16_input, Kind::Chain(Chain::Ordered(x16s_order))),
        entry("groestl", "double Groestl-512", InputRule::Any, Kind::Chain(Chain::Stages(GROESTL))),
        entry("myr-groestl", "Groestl-512 then SHA-256", InputRule::Any, Kind::Chain(Chain::Stages(MYR_GROESTL))),
        entry("skein", "Skein-512 then SHA-256", InputRule::Any, Kind::Chain(Chain::Stages(SKEIN))),
        entry("keccak", "Keccak-256", InputRule::Any, Kind::Primitive(Keccak256)),
        entry("blake", "BLAKE-256, 8 rounds", InputRule::Any, Kind::Primitive(Blake256R8)),
        entry("blake256", "BLAKE-256, 14 rounds", InputRule::Any, Kind::Primitive(Blake256)),
        entry("fugue", "Fugue-256", InputRule::Any, Kind::Primitive(Fugue256)),
        entry("shavite3", "double SHAvite-3-512", InputRule::Any, Kind::Chain(Chain::Stages(SHAVITE3))),
        entry("neoscrypt", "NeoScrypt profile 0 (N=128, r=2)", header, Kind::Custom(neoscrypt_digest)),
        entry(
            "meraki",
            "Meraki light verification of header hash, nonce and mix hash",
            InputRule::Exact(MERAKI_INPUT_SIZE),
            Kind::Custom(meraki::meraki_hash),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_names() {
        let reg = Registry::standard();
        let names: Vec<_> = reg.names().collect();
        assert_eq!(names.len(), 22);
        assert_eq!(names[0], "scrypt");
        assert!(names.contains(&"x11"));
        assert!(names.contains(&"meraki"));
        assert_eq!(reg.len(), names.len());
        assert!(!reg.is_empty());
    }

    #[test]
    fn test_alias_resolves_to_same_entry() {
        let reg = Registry::standard();
        let a = reg.get("scrypt").unwrap();
        let b = reg.get("ltc_scrypt").unwrap();
        assert!(core::ptr::eq(a, b));
    }

    #[test]
    fn test_unknown_algorithm() {
        let err = compute("not_a_real_algorithm", b"anything").unwrap_err();
        assert_eq!(err, Error::UnknownAlgorithm("not_a_real_algorithm".into()));
        assert!(registry().get("X11").is_none());
    }

    #[test]
    fn test_primitive_entry_truncates() {
        let reg = Registry::standard();
        let entry = Entry {
            name: "sha512-trunc",
            aliases: &[],
            summary: "",
            input: InputRule::Any,
            kind: Kind::Primitive(Sha512),
        };
        let full = Sha512.digest(b"abc");
        assert_eq!(entry.digest(b"abc").unwrap()[..], full[..32]);
        assert_eq!(reg.get("keccak").unwrap().digest_size(), 32);
    }

    #[test]
    fn test_x11_is_composition() {
        let input = TEST_HEADER;
        let mut buf = input.to_vec();
        for stage in X11 {
            let Run(p) = stage else { unreachable!() };
            buf = p.digest(&buf).to_vec();
        }
        assert_eq!(x11_hash(&input).unwrap()[..], buf[..32]);
    }

    #[test]
    fn test_x13_extends_x11_stages() {
        assert_eq!(X13.len(), X11.len() + 2);
        assert_eq!(X14.len(), X13.len() + 1);
        assert_eq!(X15.len(), X14.len() + 1);
        for (a, b) in X11.iter().zip(X15) {
            assert_eq!(format!("{a:?}"), format!("{b:?}"));
        }
    }

    #[test]
    fn test_input_rules_enforced() {
        assert!(matches!(
            x16r_hash(&[0u8; 35]),
            Err(Error::InvalidInput { algorithm: "x16r", actual: 35, .. })
        ));
        assert!(x16r_hash(&[0u8; 36]).is_ok());
        assert!(matches!(
            neoscrypt_hash(&[0u8; 79]),
            Err(Error::InvalidInput { algorithm: "neoscrypt", .. })
        ));
        assert!(matches!(
            meraki_hash(&[0u8; 80]),
            Err(Error::InvalidInput { algorithm: "meraki", actual: 80, .. })
        ));
    }

    #[test]
    fn test_header_prefix_only() {
        let mut long = TEST_HEADER.to_vec();
        long.extend_from_slice(b"trailing bytes are ignored");
        assert_eq!(threes_hash(&long).unwrap(), threes_hash(&TEST_HEADER).unwrap());
        assert_eq!(scrypt_hash(&long).unwrap(), scrypt_hash(&TEST_HEADER).unwrap());
        assert_ne!(x11_hash(&long).unwrap(), x11_hash(&TEST_HEADER).unwrap());
    }

    #[test]
    fn test_batch_keeps_order() {
        let inputs: Vec<Vec<u8>> = (0u8..8).map(|i| vec![i; 80]).collect();
        let batch = compute_batch("nist5", &inputs).unwrap();
        for (input, got) in inputs.iter().zip(&batch) {
            assert_eq!(*got, nist5_hash(input).unwrap());
        }
        assert!(compute_batch("nope", &inputs).is_err());
    }
}
