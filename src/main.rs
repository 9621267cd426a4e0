//! algohash CLI
//!
//! A command-line front end for the algorithm registry.
//!
//! # Commands
//!
//! - `list` - Show every registered algorithm
//! - `hash` - Hash a hex-encoded input (default: the standard test header)
//! - `bench` - Measure hashes per second, optionally across threads
//! - `selftest` - Run every algorithm over the standard header

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use algohash::algorithm::{self, Entry};
use algohash::selftest;

#[derive(Parser)]
#[command(name = "algohash")]
#[command(author = "Cyberia")]
#[command(version)]
#[command(about = "Proof-of-work digests for altcoin block headers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered algorithms
    List,

    /// Hash an input
    Hash {
        /// Algorithm name, e.g. x11
        algorithm: String,

        /// Hex-encoded input (default: the standard 80-byte test header)
        input: Option<String>,
    },

    /// Run performance benchmark
    Bench {
        /// Algorithm name, e.g. x11
        algorithm: String,

        /// Number of hashes per thread
        #[arg(short, long, default_value = "100")]
        iterations: u64,

        /// Number of threads to use (default: number of CPU cores)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Hash random headers instead of the test header with a varying nonce
        #[arg(long)]
        random: bool,
    },

    /// Check every algorithm against the standard header
    Selftest,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::List => cmd_list(cli.json),
        Commands::Hash { algorithm, input } => cmd_hash(&algorithm, input.as_deref(), cli.json),
        Commands::Bench {
            algorithm,
            iterations,
            threads,
            random,
        } => cmd_bench(&algorithm, iterations, threads, random, cli.json),
        Commands::Selftest => cmd_selftest(cli.json),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn lookup(name: &str) -> anyhow::Result<&'static Entry> {
    let registry = algorithm::registry();
    debug!(algorithms = registry.len(), "registry ready");
    registry.get(name).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown algorithm '{}' (run 'algohash list' to see the available names)",
            name
        )
    })
}

#[derive(Serialize)]
struct ListItem {
    name: &'static str,
    aliases: &'static [&'static str],
    digest_size: usize,
    input: String,
    summary: &'static str,
}

fn cmd_list(json: bool) -> anyhow::Result<()> {
    let items: Vec<ListItem> = algorithm::registry()
        .entries()
        .iter()
        .map(|e| ListItem {
            name: e.name(),
            aliases: e.aliases(),
            digest_size: e.digest_size(),
            input: e.input_rule().to_string(),
            summary: e.summary(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    for item in &items {
        let aliases = if item.aliases.is_empty() {
            String::new()
        } else {
            format!(" (alias: {})", item.aliases.join(", "))
        };
        println!(
            "{:<12} {:>2} bytes  input: {:<32} {}{}",
            item.name, item.digest_size, item.input, item.summary, aliases
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct HashOutput<'a> {
    algorithm: &'a str,
    input: String,
    digest: String,
}

fn cmd_hash(name: &str, input_hex: Option<&str>, json: bool) -> anyhow::Result<()> {
    let entry = lookup(name)?;
    let input = match input_hex {
        Some(h) => hex::decode(h.trim().trim_start_matches("0x"))
            .context("input is not valid hex")?,
        None => selftest::standard_input(entry).to_vec(),
    };

    let digest = entry
        .compute(&input)
        .with_context(|| format!("hashing {} bytes with {}", input.len(), entry.name()))?;

    if json {
        let out = HashOutput {
            algorithm: entry.name(),
            input: hex::encode(&input),
            digest: hex::encode(&digest),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", hex::encode(&digest));
    }
    Ok(())
}

#[derive(Serialize)]
struct BenchOutput<'a> {
    algorithm: &'a str,
    threads: usize,
    hashes: u64,
    seconds: f64,
    hashrate: f64,
}

/// Build the `n`th benchmark input: the standard input with the counter in
/// its last four bytes, or fresh random bytes of the same length
fn bench_input(template: &[u8], n: u64, random: bool) -> anyhow::Result<Vec<u8>> {
    let mut input = template.to_vec();
    if random {
        getrandom::getrandom(&mut input)
            .map_err(|e| anyhow::anyhow!("reading random bytes: {}", e))?;
    } else {
        let len = input.len();
        input[len - 4..].copy_from_slice(&(n as u32).to_le_bytes());
    }
    Ok(input)
}

fn cmd_bench(
    name: &str,
    iterations: u64,
    threads: Option<usize>,
    random: bool,
    json: bool,
) -> anyhow::Result<()> {
    let entry = lookup(name)?;
    let template = selftest::standard_input(entry);
    let num_threads = threads.unwrap_or_else(num_cpus::get).max(1);

    info!(
        algorithm = entry.name(),
        iterations,
        threads = num_threads,
        random,
        "starting benchmark"
    );

    let total_hashes = Arc::new(AtomicU64::new(0));
    let stop = Arc::new(AtomicBool::new(false));
    let start = Instant::now();

    // Each thread uses interleaved counters: thread_id, thread_id + N, ...
    let mut handles = Vec::with_capacity(num_threads);
    for thread_id in 0..num_threads {
        let total_hashes = Arc::clone(&total_hashes);
        let stop = Arc::clone(&stop);

        let handle = std::thread::spawn(move || -> anyhow::Result<()> {
            let mut n = thread_id as u64;
            for _ in 0..iterations {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                let input = bench_input(template, n, random)?;
                if let Err(e) = entry.digest(&input) {
                    stop.store(true, Ordering::SeqCst);
                    return Err(e.into());
                }
                total_hashes.fetch_add(1, Ordering::Relaxed);
                n += num_threads as u64;
            }
            Ok(())
        });
        handles.push(handle);
    }

    // Report progress while threads work
    while !handles.iter().all(|h| h.is_finished()) {
        std::thread::sleep(Duration::from_millis(200));
        let elapsed = start.elapsed();
        if elapsed >= Duration::from_secs(2) && !json {
            let hashes = total_hashes.load(Ordering::Relaxed);
            print!(
                "\rHashrate: {:.2} H/s | Hashes: {} | Time: {:.0}s",
                hashes as f64 / elapsed.as_secs_f64(),
                hashes,
                elapsed.as_secs_f64()
            );
            use std::io::Write;
            std::io::stdout().flush().ok();
        }
    }

    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("benchmark thread panicked"))??;
    }

    let elapsed = start.elapsed().as_secs_f64();
    let hashes = total_hashes.load(Ordering::Relaxed);
    let hashrate = if elapsed > 0.0 {
        hashes as f64 / elapsed
    } else {
        0.0
    };
    info!(algorithm = entry.name(), hashes, hashrate, "benchmark finished");

    if json {
        let out = BenchOutput {
            algorithm: entry.name(),
            threads: num_threads,
            hashes,
            seconds: elapsed,
            hashrate,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("\nResults:");
        println!("  Algorithm: {}", entry.name());
        println!("  Threads: {}", num_threads);
        println!("  Total hashes: {}", hashes);
        println!("  Time elapsed: {:.2}s", elapsed);
        println!("  Hashrate: {:.2} H/s", hashrate);
        println!("  Input: {} bytes ({})", template.len(), entry.input_rule());
    }
    Ok(())
}

fn cmd_selftest(json: bool) -> anyhow::Result<()> {
    let report = selftest::run();
    let failed = report.failures().count();
    info!(
        checked = report.checks.len(),
        failed, "self-test finished"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for check in &report.checks {
            let status = if check.passed() { "ok  " } else { "FAIL" };
            let detail = match (&check.digest, &check.error) {
                (_, Some(err)) => err.as_str(),
                (Some(digest), None) => digest.as_str(),
                (None, None) => "",
            };
            let pin = if check.pinned { " [known answer]" } else { "" };
            println!("{} {:<12} {}{}", status, check.algorithm, detail, pin);
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} algorithms failed", failed, report.checks.len());
    }
    Ok(())
}
