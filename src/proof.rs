use crate::error::{MerkleError, Result};
use crate::hash::{Algorithm, Element};

/// Merkle tree inclusion proof for a leaf.
///
/// Lemma layout:
///
/// ```text
/// [ s1 s2 s3 ... root ]
/// ```
///
/// where `s1` is the sibling of the leaf and every following entry is the
/// sibling of the previous level's parent. The leaf itself is not part of
/// the proof.
///
/// The verifier folds over the path only, so the root has to be split off
/// the lemma (see [`Proof::path`]) before the lemma is handed on.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Proof<T: Element> {
    lemma: Vec<T>,
}

impl<T: Element> Proof<T> {
    /// Creates new MT inclusion proof from a lemma ending with the root.
    pub fn new(lemma: Vec<T>) -> Result<Proof<T>> {
        if lemma.is_empty() {
            return Err(MerkleError::EmptyProof);
        }
        Ok(Proof { lemma })
    }

    /// Return tree root
    pub fn root(&self) -> &T {
        // `new` refuses empty lemmas
        &self.lemma[self.lemma.len() - 1]
    }

    /// Returns the sibling path, i.e. the lemma without the root.
    pub fn path(&self) -> &[T] {
        &self.lemma[..self.lemma.len() - 1]
    }

    /// Returns the lemma of this proof, root included.
    pub fn lemma(&self) -> &[T] {
        &self.lemma
    }

    /// Number of digests in the lemma, which is the depth of the tree.
    pub fn len(&self) -> usize {
        self.lemma.len()
    }

    /// Always `false`: a proof holds at least the root.
    pub fn is_empty(&self) -> bool {
        self.lemma.is_empty()
    }

    /// Consumes the proof and returns the sibling path.
    pub fn into_path(mut self) -> Vec<T> {
        self.lemma.pop();
        self.lemma
    }

    /// Verifies that `leaf` folds through this proof up to its own root.
    ///
    /// The caller still has to compare [`Proof::root`] with a root it
    /// trusts.
    pub fn validate<A: Algorithm<T>>(&self, leaf: &T) -> Result<bool> {
        verify_with_depth::<T, A>(leaf, self.path(), self.root(), self.len())
    }
}

/// Verifies MT inclusion of `leaf` under `root`.
///
/// `path` is the proof without its trailing root. Every entry is folded in
/// order as `running = ALG(running & entry)` and the result is compared
/// with `root` byte for byte.
pub fn verify<T: Element, A: Algorithm<T>>(leaf: &T, path: &[T], root: &T) -> Result<bool> {
    let mut a = A::default();
    let mut h = leaf.clone();
    for node in path {
        h = a.node(&h, node)?;
    }

    let (expected, actual) = (h.as_ref().len(), root.as_ref().len());
    if expected != actual {
        return Err(MerkleError::LengthMismatch { expected, actual });
    }

    Ok(h == *root)
}

/// Same as [`verify`], for a tree of known `depth`.
///
/// A path of any length other than `depth - 1` is reported as
/// [`MerkleError::ProofLengthMismatch`] instead of a failed fold; this
/// catches a lemma that still carries its root.
pub fn verify_with_depth<T: Element, A: Algorithm<T>>(
    leaf: &T,
    path: &[T],
    root: &T,
    depth: usize,
) -> Result<bool> {
    let expected = depth.saturating_sub(1);
    if depth == 0 || path.len() != expected {
        return Err(MerkleError::ProofLengthMismatch {
            expected,
            actual: path.len(),
        });
    }

    verify::<T, A>(leaf, path, root)
}
