//! Mines one block over the Merkle tree proof-of-work and times the
//! miner against the verifier.
use std::time::Instant;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::info;
use rand::{thread_rng, Rng};

use merkle_pow::pow::{mine, verify_submission, ChainHash, MineConfig};
use merkle_pow::Sha256Algorithm;

#[derive(Parser, Debug)]
#[command(author, version, about = "Merkle tree proof-of-work miner")]
struct Args {
    /// Length of the hash chain (odd, or a power of two)
    #[arg(short, long, default_value_t = MineConfig::default().difficulty)]
    difficulty: usize,

    /// Roots are reduced modulo `mask + 1`
    #[arg(short, long, default_value_t = MineConfig::default().mask)]
    mask: u64,

    /// Previous block digest, 64 hex characters
    #[arg(short, long)]
    prev_block_hash: Option<String>,

    /// Target to hit; drawn at random from `0..=mask` if absent
    #[arg(short, long)]
    target: Option<u64>,
}

fn parse_hash(s: &str) -> Result<ChainHash> {
    let bytes = hex::decode(s).context("previous block hash is not hex")?;
    ensure!(
        bytes.len() == 32,
        "previous block hash must be 32 bytes, got {}",
        bytes.len()
    );
    let mut h = [0u8; 32];
    h.copy_from_slice(&bytes);
    Ok(h)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = MineConfig {
        difficulty: args.difficulty,
        mask: args.mask,
        ..MineConfig::default()
    };
    if let Some(prev) = args.prev_block_hash.as_deref() {
        config.prev_block_hash = parse_hash(prev)?;
    }
    config.validate()?;

    let target = match args.target {
        Some(t) => t,
        None => thread_rng().gen_range(0..=config.mask),
    };
    info!(
        "mining: difficulty {}, mask {:#b}, target {}, prev {}",
        config.difficulty,
        config.mask,
        target,
        hex::encode(config.prev_block_hash)
    );

    let started = Instant::now();
    let solution = mine::<Sha256Algorithm>(&config, target)?;
    let mining = started.elapsed();
    info!(
        "mined nonce {} in {:?} ({} attempts)",
        solution.nonce, mining, solution.attempts
    );

    let submission = solution.submission();
    info!(
        "submission: root {}, {} path entries",
        hex::encode(submission.root),
        submission.path.len()
    );

    let started = Instant::now();
    let verdict = verify_submission::<Sha256Algorithm>(&config, &submission, target)?;
    let verifying = started.elapsed();
    info!("verified in {:?}: {:?}", verifying, verdict);
    ensure!(verdict.is_accepted(), "own submission rejected: {:?}", verdict);

    let ratio = mining.as_secs_f64() / verifying.as_secs_f64().max(f64::MIN_POSITIVE);
    info!("mining took {:.1}x the verification time", ratio);
    println!(
        "nonce={} root={} mining={:?} verifying={:?}",
        solution.nonce,
        hex::encode(submission.root),
        mining,
        verifying
    );
    Ok(())
}
