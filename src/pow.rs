//! Proof-of-work over a Merkle tree.
//!
//! A miner commits to a hash chain seeded with the previous block digest
//! and a nonce:
//!
//! ```text
//! leaf[0] = prev_block_hash
//! leaf[i] = ALG(leaf[i-1] || nonce)
//! ```
//!
//! The root of the tree over `difficulty` such leafs, read as a big-endian
//! integer modulo `mask + 1`, has to hit the target. The miner then ships
//! the nonce, the root and the proof of leaf 0 stripped of both ends: the
//! first entry (leaf 1) is cheap for the verifier to recompute and the
//! root travels separately.

use anyhow::{ensure, Context, Result};
use log::{debug, info, trace};

use crate::hash::Algorithm;
use crate::merkle::{tree_depth, MerkleTree};
use crate::proof::{verify_with_depth, Proof};

/// Digest width used by the chain.
pub type ChainHash = [u8; 32];

/// Nonces go on the wire as 8 big-endian bytes.
pub type Nonce = [u8; 8];

/// Mining parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MineConfig {
    /// Digest of the previous block, the first leaf of every chain.
    pub prev_block_hash: ChainHash,
    /// Number of chain leafs; the tree costs `2 * difficulty - 1` hashes.
    pub difficulty: usize,
    /// Roots are reduced modulo `mask + 1`.
    pub mask: u64,
}

impl Default for MineConfig {
    fn default() -> Self {
        MineConfig {
            prev_block_hash: *b"qwertyuiopasdfghjklzxcvbnmasdfew",
            difficulty: 8192,
            mask: 0b0111_1111,
        }
    }
}

impl MineConfig {
    /// Checks that the chain length yields a valid tree with a non-trivial
    /// proof for leaf 0.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.difficulty >= 2,
            "difficulty must be at least 2, got {}",
            self.difficulty
        );
        tree_depth(self.difficulty)
            .with_context(|| format!("difficulty {} gives no valid tree", self.difficulty))?;
        Ok(())
    }
}

/// Outcome of a successful mining run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Winning nonce.
    pub nonce: u64,
    /// Proof of leaf 0, as generated by the tree (root included).
    pub proof: Proof<ChainHash>,
    /// Number of nonces tried, the winning one included.
    pub attempts: u64,
}

impl Solution {
    /// What the miner sends to a verifying node.
    pub fn submission(&self) -> Submission {
        let path = self.proof.path();
        Submission {
            nonce: self.nonce.to_be_bytes(),
            path: path.iter().skip(1).cloned().collect(),
            root: *self.proof.root(),
        }
    }
}

/// Data a verifying node receives from a miner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Winning nonce.
    pub nonce: Nonce,
    /// Proof of leaf 0 without leaf 1 and without the root.
    pub path: Vec<ChainHash>,
    /// Claimed root.
    pub root: ChainHash,
}

/// Result of checking a [`Submission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// Leaf 0 folds up to the claimed root.
    pub proof_valid: bool,
    /// The claimed root hits the target.
    pub target_reached: bool,
}

impl Verdict {
    /// Both checks passed.
    pub fn is_accepted(&self) -> bool {
        self.proof_valid && self.target_reached
    }
}

/// Returns `ALG(prev || nonce)`.
pub fn chain_step<A: Algorithm<ChainHash>>(a: &mut A, prev: &ChainHash, nonce: &Nonce) -> ChainHash {
    a.reset();
    a.write(prev);
    a.write(nonce);
    a.hash()
}

/// Generates the `difficulty` leafs of the hash chain for `nonce`.
pub fn hash_chain<A: Algorithm<ChainHash>>(
    prev_block_hash: &ChainHash,
    difficulty: usize,
    nonce: &Nonce,
) -> Vec<ChainHash> {
    let mut a = A::default();
    let mut chain = Vec::with_capacity(difficulty);
    let mut prev = *prev_block_hash;
    chain.push(prev);
    for _ in 1..difficulty {
        prev = chain_step(&mut a, &prev, nonce);
        chain.push(prev);
    }
    chain
}

/// Reduces `root`, read as a big-endian integer, modulo `mask + 1`.
pub fn target_of(root: &[u8], mask: u64) -> u64 {
    let modulus = u128::from(mask) + 1;
    let rem = root
        .iter()
        .fold(0u128, |acc, &b| ((acc << 8) | u128::from(b)) % modulus);
    // rem <= mask
    rem as u64
}

/// Searches nonces from 0 upwards until the root of the chain tree hits
/// `target`.
pub fn mine<A: Algorithm<ChainHash>>(config: &MineConfig, target: u64) -> Result<Solution> {
    config.validate()?;
    ensure!(
        target <= config.mask,
        "target {} is unreachable with mask {:#b}",
        target,
        config.mask
    );

    for nonce in 0..=u64::MAX {
        let leafs = hash_chain::<A>(&config.prev_block_hash, config.difficulty, &nonce.to_be_bytes());
        let mut tree: MerkleTree<ChainHash, A> = MerkleTree::new(leafs)?;
        tree.build()?;

        let root = tree.root()?;
        let hit = target_of(&root, config.mask);
        trace!("nonce {} -> {}", nonce, hit);
        if hit == target {
            let proof = tree.gen_proof(0)?;
            info!("found nonce {} after {} attempts", nonce, nonce + 1);
            return Ok(Solution {
                nonce,
                proof,
                attempts: nonce + 1,
            });
        }
    }

    anyhow::bail!("nonce space exhausted without reaching target {}", target)
}

/// Checks a miner's submission against `target`.
///
/// Only the first chain step is recomputed: leaf 1 is the sibling of leaf
/// 0, so it is prepended to the received path before folding.
pub fn verify_submission<A: Algorithm<ChainHash>>(
    config: &MineConfig,
    submission: &Submission,
    target: u64,
) -> Result<Verdict> {
    config.validate()?;

    let mut a = A::default();
    let mut path = Vec::with_capacity(submission.path.len() + 1);
    path.push(chain_step(&mut a, &config.prev_block_hash, &submission.nonce));
    path.extend_from_slice(&submission.path);

    let depth = tree_depth(config.difficulty)?;
    let proof_valid = verify_with_depth::<ChainHash, A>(
        &config.prev_block_hash,
        &path,
        &submission.root,
        depth,
    )
    .context("malformed submission")?;
    let target_reached = target_of(&submission.root, config.mask) == target;

    debug!(
        "submission with nonce {:?}: proof valid {}, target reached {}",
        submission.nonce, proof_valid, target_reached
    );
    Ok(Verdict {
        proof_valid,
        target_reached,
    })
}
