use algohash_core::{Entry, MERAKI_INPUT_SIZE, TEST_HEADER, registry};
use wasm_bindgen::prelude::*;

fn lookup(name: &str) -> Result<&'static Entry, JsError> {
    registry()
        .get(name)
        .ok_or_else(|| JsError::new(&format!("unknown algorithm: {name}")))
}

/// Hash `input` with the algorithm called `name`
#[wasm_bindgen]
pub fn compute(name: &str, input: &[u8]) -> Result<Vec<u8>, JsError> {
    algohash_core::compute(name, input).map_err(|e| JsError::new(&e.to_string()))
}

/// Hex digest, for quick checks from the console
#[wasm_bindgen]
pub fn compute_hex(name: &str, input: &[u8]) -> Result<String, JsError> {
    compute(name, input).map(hex::encode)
}

/// Registered algorithm names as a JSON array
#[wasm_bindgen]
pub fn algorithms() -> String {
    let names: Vec<String> = registry().names().map(|n| format!(r#""{n}""#)).collect();
    format!("[{}]", names.join(","))
}

#[wasm_bindgen]
pub struct Benchmark {
    entry: &'static Entry,
    input: Vec<u8>,
}

#[wasm_bindgen]
impl Benchmark {
    #[wasm_bindgen(constructor)]
    pub fn new(name: &str) -> Result<Benchmark, JsError> {
        let entry = lookup(name)?;
        let input = if entry.name() == "meraki" {
            TEST_HEADER[..MERAKI_INPUT_SIZE].to_vec()
        } else {
            TEST_HEADER.to_vec()
        };
        Ok(Self { entry, input })
    }

    /// Run benchmark with specified number of hashes
    /// Returns hashrate in H/s
    #[wasm_bindgen]
    pub fn run(&mut self, num_hashes: u32) -> Result<f64, JsError> {
        let performance = web_sys::window()
            .and_then(|w| w.performance())
            .ok_or_else(|| JsError::new("performance timer unavailable"))?;

        let start = performance.now();

        let len = self.input.len();
        for i in 0..num_hashes {
            self.input[len - 4..].copy_from_slice(&i.to_le_bytes());
            self.entry
                .digest(&self.input)
                .map_err(|e| JsError::new(&e.to_string()))?;
        }

        let end = performance.now();
        let elapsed_s = (end - start) / 1000.0;

        Ok((num_hashes as f64) / elapsed_s)
    }

    /// Algorithm description as JSON string
    #[wasm_bindgen]
    pub fn get_params(&self) -> String {
        format!(
            r#"{{"algorithm": "{}", "digest_size": {}, "input": "{}", "summary": "{}"}}"#,
            self.entry.name(),
            self.entry.digest_size(),
            self.entry.input_rule(),
            self.entry.summary()
        )
    }
}
