//! Array-backed _Merkle Tree_ with inclusion proofs.
//!
//! Merkle Tree (MT) implemented as a complete binary tree allocated as a
//! single vec, root first and leafs last, to give hashes more locality.
//! The tree is specialized to the extent of the digest type and the hashing
//! algorithm, which is any [`Algorithm`] (a [`std::hash::Hasher`] that can
//! return a full length digest). The engine itself does not depend on a
//! crypto library; SHA-256 comes with the `sha256` feature.
//!
//! Interior nodes combine their children by hashing their bytewise AND:
//!
//! ```text
//! node(l, r) = ALG(l & r)
//! ```
//!
//! Leafs are digests already and are committed as given. An odd number of
//! leafs is padded up to the next power of two with a public padding digest
//! ([`DEFAULT_PADDING`] unless told otherwise).
//!
//! # Interface
//!
//! ```text
//! - with_padding / new (leafs) -> unbuilt tree
//! - build -> built tree
//! - root -> hash
//! - gen_proof (i) -> proof (root last)
//! - verify (leaf, proof without root, root) -> bool
//! ```
//!
//! # Quick start
//!
//! ```
//! # #[cfg(feature = "sha256")]
//! # fn main() -> Result<(), merkle_pow::MerkleError> {
//! use merkle_pow::{verify, MerkleTree, Sha256Algorithm};
//!
//! let leafs = vec![[0x01; 32], [0x02; 32], [0x03; 32], [0x04; 32]];
//! let mut tree: MerkleTree<[u8; 32], Sha256Algorithm> = MerkleTree::new(leafs)?;
//! tree.build()?;
//!
//! let root = tree.root()?;
//! let proof = tree.gen_proof(0)?;
//! assert_eq!(proof.len(), 3);
//! assert!(verify::<_, Sha256Algorithm>(&[0x01; 32], proof.path(), &root)?);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "sha256"))]
//! # fn main() {}
//! ```

#![deny(
    missing_docs,
    unused_qualifications,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces
)]

mod error;
pub use error::{MerkleError, Result};

/// Hash infrastructure for items in Merkle tree.
pub mod hash;
pub use hash::{Algorithm, Element};

/// Merkle tree inclusion proof.
pub mod proof;
pub use proof::{verify, verify_with_depth, Proof};

/// Merkle tree layout, construction and proof generation.
pub mod merkle;
pub use merkle::{padded_leaf_count, tree_depth, MerkleTree, DEFAULT_PADDING};

/// SHA-256 algorithm.
#[cfg(feature = "sha256")]
pub mod sha256;
#[cfg(feature = "sha256")]
pub use sha256::{Sha256Algorithm, Sha256Hash};

/// Proof-of-work demonstration on top of the tree.
pub mod pow;

#[cfg(test)]
mod test_common;
