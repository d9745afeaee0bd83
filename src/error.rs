use thiserror::Error;

/// Result type of the tree engine.
pub type Result<T> = std::result::Result<T, MerkleError>;

/// Precondition violations reported by the tree engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// Two digests that must share a width do not.
    #[error("digest length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Width of the reference digest.
        expected: usize,
        /// Width of the offending digest.
        actual: usize,
    },

    /// A tree was requested over zero leafs.
    #[error("cannot construct a tree without leafs")]
    EmptyLeafSet,

    /// The leaf layer is not a power of two after padding.
    #[error("leaf count {0} is not a power of two after padding")]
    InvalidLeafCount(usize),

    /// The tree was queried before `build`.
    #[error("tree is not built")]
    NotBuilt,

    /// `build` was called on a tree that is already built.
    #[error("tree is already built")]
    AlreadyBuilt,

    /// Proof requested for a position outside of the leaf layer.
    #[error("{index} is out of bounds (leafs: {leafs})")]
    LeafIndexOutOfRange {
        /// Requested leaf position.
        index: usize,
        /// Post-padding leaf count.
        leafs: usize,
    },

    /// The proof path does not fold up to a root of the expected depth.
    #[error("invalid proof length: expected {expected}, got {actual}")]
    ProofLengthMismatch {
        /// Path length implied by the tree depth.
        expected: usize,
        /// Supplied path length.
        actual: usize,
    },

    /// A proof needs at least the root.
    #[error("proof lemma is empty")]
    EmptyProof,

    /// A flat array slot that must be populated is empty.
    #[error("node {0} is missing")]
    MissingNode(usize),
}
