//! Hash infrastructure for items in Merkle Tree.

use std::fmt::Debug;
use std::hash::Hasher;

use crate::error::{MerkleError, Result};

/// Digest stored in the merkle tree.
///
/// All leafs and nodes of one tree share the same width, which is the
/// width of the digests produced by the tree's [`Algorithm`].
pub trait Element: Clone + Eq + AsRef<[u8]> + Send + Sync + Debug {
    /// Creates the element from its byte form.
    ///
    /// Fails with [`MerkleError::LengthMismatch`] if the slice does not have
    /// the width of the element.
    fn from_slice(bytes: &[u8]) -> Result<Self>;
}

impl<const N: usize> Element for [u8; N] {
    fn from_slice(bytes: &[u8]) -> Result<Self> {
        <[u8; N]>::try_from(bytes).map_err(|_| MerkleError::LengthMismatch {
            expected: N,
            actual: bytes.len(),
        })
    }
}

impl Element for Vec<u8> {
    fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(bytes.to_vec())
    }
}

/// Hashing algorithm type.
///
/// Algorithm conforms standard [`Hasher`] trait and provides methods to return
/// full length hash and reset current state.
///
/// The tree and the verifier both derive interior nodes through
/// [`Algorithm::node`]; a custom implementation must keep the two in
/// agreement bit for bit, so overriding it is rarely what you want.
pub trait Algorithm<T>: Hasher + Default
where
    T: Element,
{
    /// Returns the hash value for the data stream written so far.
    fn hash(&mut self) -> T;

    /// Reset Hasher state.
    fn reset(&mut self);

    /// Returns the digest of `data`, starting from a fresh state.
    fn digest(&mut self, data: &[u8]) -> T {
        self.reset();
        self.write(data);
        self.hash()
    }

    /// Returns the hash value for MT interior node: `ALG(left & right)`.
    ///
    /// The hashed buffer holds `left[i] & right[i]` at position `i`. Digests
    /// of different widths are rejected rather than truncated.
    fn node(&mut self, left: &T, right: &T) -> Result<T> {
        let (lhs, rhs) = (left.as_ref(), right.as_ref());
        if lhs.len() != rhs.len() {
            return Err(MerkleError::LengthMismatch {
                expected: lhs.len(),
                actual: rhs.len(),
            });
        }

        let masked: Vec<u8> = lhs.iter().zip(rhs).map(|(l, r)| l & r).collect();
        Ok(self.digest(&masked))
    }
}
