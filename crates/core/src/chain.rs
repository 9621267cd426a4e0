//! Composite chain executor
//!
//! A chain is a list of stages. The first stage hashes the caller's buffer,
//! every later stage hashes the previous stage's whole output, and the
//! algorithm digest is the first 32 bytes of the last output.
//!
//! Three shapes exist:
//! - fixed: the stage list is static;
//! - adaptive: some stages pick their primitive from the previous output
//!   through a [`Selector`];
//! - input-ordered: the whole sequence is derived from the header before
//!   the first stage runs (x16r, x16s).

use crate::params::{DIGEST_SIZE, PREV_HASH_OFFSET};
use crate::primitives::{Output, Primitive};

/// Picks a choice index from the previous stage's output
pub type Selector = fn(&[u8]) -> usize;

/// Derives a stage order from the caller's input
pub type OrderRule = fn(&[u8]) -> [Primitive; 16];

#[derive(Clone, Copy)]
pub enum Stage {
    Run(Primitive),
    Select {
        selector: Selector,
        choices: &'static [Primitive],
    },
}

impl Stage {
    /// Primitive this stage runs when fed `prev`
    ///
    /// # Panics
    ///
    /// If the selector returns an index outside `choices`; chain tables are
    /// static, so this is a construction bug.
    pub fn resolve(&self, prev: &[u8]) -> Primitive {
        match *self {
            Stage::Run(p) => p,
            Stage::Select { selector, choices } => {
                let idx = selector(prev);
                match choices.get(idx) {
                    Some(&p) => p,
                    None => panic!(
                        "chain selector returned {idx} for {} choices",
                        choices.len()
                    ),
                }
            }
        }
    }
}

impl core::fmt::Debug for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Stage::Run(p) => write!(f, "{p}"),
            Stage::Select { choices, .. } => {
                f.write_str("[")?;
                for (i, p) in choices.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{p}")?;
                }
                f.write_str("]")
            }
        }
    }
}

#[derive(Clone, Copy)]
pub enum Chain {
    Stages(&'static [Stage]),
    Ordered(OrderRule),
}

impl Chain {
    /// Run the chain over `input`
    pub fn run(&self, input: &[u8]) -> [u8; DIGEST_SIZE] {
        match *self {
            Chain::Stages(stages) => run_stages(input, stages.iter().copied()),
            Chain::Ordered(rule) => run_stages(input, rule(input).into_iter().map(Stage::Run)),
        }
    }

    /// Primitives actually executed for `input`, in order
    pub fn trace(&self, input: &[u8]) -> Vec<Primitive> {
        let mut seen = Vec::new();
        let stages: Vec<Stage> = match *self {
            Chain::Stages(stages) => stages.to_vec(),
            Chain::Ordered(rule) => rule(input).into_iter().map(Stage::Run).collect(),
        };
        let mut prev: Option<Output> = None;
        for stage in stages {
            let data = prev.as_deref().unwrap_or(input);
            let p = stage.resolve(data);
            seen.push(p);
            prev = Some(p.digest(data));
        }
        seen
    }

    pub fn len(&self) -> usize {
        match self {
            Chain::Stages(stages) => stages.len(),
            Chain::Ordered(_) => 16,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn run_stages(input: &[u8], stages: impl Iterator<Item = Stage>) -> [u8; DIGEST_SIZE] {
    let mut prev: Option<Output> = None;
    for stage in stages {
        let data = prev.as_deref().unwrap_or(input);
        let p = stage.resolve(data);
        prev = Some(p.digest(data));
    }

    let last = prev.as_deref().unwrap_or(input);
    let mut out = [0u8; DIGEST_SIZE];
    let n = last.len().min(DIGEST_SIZE);
    out[..n].copy_from_slice(&last[..n]);
    out
}

/// Quark branch: bit 3 of the first output byte
pub fn bit3(prev: &[u8]) -> usize {
    usize::from(prev[0] & 0x08 != 0)
}

/// Stage `j` of the 16-stage chains: nibble `j` of the previous-block hash,
/// reading its first eight bytes from the last nibble backwards
#[inline]
pub fn prev_hash_nibble(input: &[u8], j: usize) -> u8 {
    let b = input[PREV_HASH_OFFSET + (15 - j) / 2];
    if j % 2 == 1 { b & 0x0f } else { b >> 4 }
}

/// Primitive order shared by x16r and x16s
pub const X16_PRIMITIVES: [Primitive; 16] = [
    Primitive::Blake512,
    Primitive::Bmw512,
    Primitive::Groestl512,
    Primitive::Jh512,
    Primitive::Keccak512,
    Primitive::Skein512,
    Primitive::Luffa512,
    Primitive::CubeHash512,
    Primitive::Shavite512,
    Primitive::Simd512,
    Primitive::Echo512,
    Primitive::Hamsi512,
    Primitive::Fugue512,
    Primitive::Shabal512,
    Primitive::Whirlpool,
    Primitive::Sha512,
];

/// x16r: stage `j` runs primitive `nibble_j`
pub fn x16r_order(input: &[u8]) -> [Primitive; 16] {
    core::array::from_fn(|j| X16_PRIMITIVES[prev_hash_nibble(input, j) as usize])
}

/// x16s: starting from the identity order, each nibble moves the entry at
/// that offset to the front
pub fn x16s_order(input: &[u8]) -> [Primitive; 16] {
    let mut order: [u8; 16] = core::array::from_fn(|i| i as u8);
    for j in 0..16 {
        let offset = prev_hash_nibble(input, j) as usize;
        order[..=offset].rotate_right(1);
    }
    order.map(|i| X16_PRIMITIVES[i as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose(input: &[u8], stages: &[Primitive]) -> [u8; 32] {
        let mut buf = input.to_vec();
        for p in stages {
            buf = p.digest(&buf).to_vec();
        }
        buf[..32].try_into().unwrap()
    }

    #[test]
    fn test_fixed_chain_composes() {
        const STAGES: &[Stage] = &[
            Stage::Run(Primitive::Blake512),
            Stage::Run(Primitive::Groestl512),
            Stage::Run(Primitive::Sha512),
        ];
        let input = b"chain composition";
        assert_eq!(
            Chain::Stages(STAGES).run(input),
            compose(
                input,
                &[Primitive::Blake512, Primitive::Groestl512, Primitive::Sha512]
            )
        );
    }

    #[test]
    fn test_short_last_stage_is_not_padded_with_garbage() {
        const STAGES: &[Stage] = &[
            Stage::Run(Primitive::Groestl512),
            Stage::Run(Primitive::Sha256),
        ];
        let out = Chain::Stages(STAGES).run(b"x");
        let expected = Primitive::Sha256.digest(&Primitive::Groestl512.digest(b"x"));
        assert_eq!(&out[..], &expected[..]);
    }

    #[test]
    fn test_select_follows_bit3() {
        const CHOICES: &[Primitive] = &[Primitive::Skein512, Primitive::Groestl512];
        let stage = Stage::Select {
            selector: bit3,
            choices: CHOICES,
        };
        assert_eq!(stage.resolve(&[0x00]), Primitive::Skein512);
        assert_eq!(stage.resolve(&[0x08]), Primitive::Groestl512);
        assert_eq!(stage.resolve(&[0xf7]), Primitive::Skein512);
    }

    #[test]
    #[should_panic(expected = "chain selector returned 2")]
    fn test_selector_out_of_range_panics() {
        const CHOICES: &[Primitive] = &[Primitive::Skein512, Primitive::Groestl512];
        let stage = Stage::Select {
            selector: |_| 2,
            choices: CHOICES,
        };
        stage.resolve(&[0u8; 64]);
    }

    #[test]
    fn test_adaptive_chain_matches_trace() {
        const CHOICES: &[Primitive] = &[Primitive::Bmw512, Primitive::Blake512];
        const STAGES: &[Stage] = &[
            Stage::Run(Primitive::Keccak512),
            Stage::Select {
                selector: bit3,
                choices: CHOICES,
            },
            Stage::Run(Primitive::Skein512),
        ];
        let chain = Chain::Stages(STAGES);
        for seed in 0u8..16 {
            let input = [seed; 80];
            let trace = chain.trace(&input);
            assert_eq!(chain.run(&input), compose(&input, &trace));
        }
    }

    #[test]
    fn test_prev_hash_nibbles() {
        let mut header = [0u8; 80];
        header[4..12].copy_from_slice(&[0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]);
        let nibbles: Vec<u8> = (0..16).map(|j| prev_hash_nibble(&header, j)).collect();
        assert_eq!(nibbles, vec![0xe, 0xf, 0xc, 0xd, 0xa, 0xb, 8, 9, 6, 7, 4, 5, 2, 3, 0, 1]);
    }

    #[test]
    fn test_x16r_order() {
        let mut header = [0u8; 80];
        header[4..12].copy_from_slice(&[0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]);
        let order = x16r_order(&header);
        assert_eq!(order[0], X16_PRIMITIVES[0xe]);
        assert_eq!(order[15], X16_PRIMITIVES[1]);
    }

    #[test]
    fn test_x16s_order_is_permutation() {
        let mut header = [0u8; 80];
        header[4..12].copy_from_slice(&[0xff, 0x00, 0x3c, 0xa5, 0x12, 0x9e, 0x77, 0x01]);
        let mut order = x16s_order(&header).to_vec();
        order.sort_by_key(|p| X16_PRIMITIVES.iter().position(|q| q == p));
        assert_eq!(order, X16_PRIMITIVES.to_vec());
    }

    #[test]
    fn test_x16s_zero_hash_keeps_identity() {
        // Offset 0 moves the head onto itself.
        assert_eq!(x16s_order(&[0u8; 80]), X16_PRIMITIVES);
    }

    #[test]
    fn test_x16s_moves_to_front() {
        // Only stage 15 (low nibble of byte 4) is non-zero: entry 3 moves first.
        let mut header = [0u8; 80];
        header[4] = 0x03;
        let order = x16s_order(&header);
        assert_eq!(order[0], Primitive::Jh512);
        assert_eq!(order[1..4], X16_PRIMITIVES[..3]);
        assert_eq!(order[4..], X16_PRIMITIVES[4..]);
    }
}
