use std::marker::PhantomData;

use log::{debug, trace};
use rayon::prelude::*;

use crate::error::{MerkleError, Result};
use crate::hash::{Algorithm, Element};
use crate::proof::{self, Proof};

/// Padding digest appended to odd leaf sets unless another one is given.
pub const DEFAULT_PADDING: [u8; 32] = [0xff; 32];

/// Merkle Tree.
///
/// All leafs and nodes are stored in a linear array (vec), root first and
/// leafs last. Layer `d` (the root is depth 1) starts at `2^(d-1) - 1`
/// and holds `2^(d-1)` nodes, so a tree over `L` leafs takes `2 * L - 1`
/// slots:
///
/// ```text
///         root = h1234 = h(h12 & h34)
///        /                           \
///  h12 = h(h1 & h2)            h34 = h(h3 & h4)
///   /            \              /            \
/// h1             h2            h3            h4
/// ```
///
/// In memory layout:
///
/// ```text
///     [root h12 h34 h1 h2 h3 h4]
/// ```
///
/// Leafs are taken as given: they are digests already and are not hashed
/// again. An odd number of leafs is padded with the padding digest up to
/// the next power of two. An even number of leafs is never padded, and a
/// count that is not a power of two is refused.
///
/// Interior slots stay `None` until [`MerkleTree::build`] fills them.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MerkleTree<T, A>
where
    T: Element,
    A: Algorithm<T>,
{
    data: Vec<Option<T>>,
    leafs: usize,
    depth: usize,
    padding: T,
    state: State,

    _a: PhantomData<A>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum State {
    Unbuilt,
    Built,
}

impl<T: Element, A: Algorithm<T>> MerkleTree<T, A> {
    /// Creates new merkle tree over `leafs`, padding with `padding`.
    ///
    /// The tree is not built yet.
    pub fn with_padding(mut leafs: Vec<T>, padding: T) -> Result<MerkleTree<T, A>> {
        let width = leafs.first().ok_or(MerkleError::EmptyLeafSet)?.as_ref().len();
        for item in leafs.iter().chain(std::iter::once(&padding)) {
            ensure_width(item, width)?;
        }

        let count = padded_leaf_count(leafs.len())?;
        if count > leafs.len() {
            debug!("padding {} leafs up to {}", leafs.len(), count);
            leafs.resize(count, padding.clone());
        }

        let depth = depth_of(count);
        let (_, start) = boundaries(depth);
        let mut data: Vec<Option<T>> = Vec::with_capacity(get_merkle_tree_len(count));
        data.resize(start, None);
        data.extend(leafs.into_iter().map(Some));
        debug_assert_eq!(data.len(), get_merkle_tree_len(count));

        Ok(MerkleTree {
            data,
            leafs: count,
            depth,
            padding,
            state: State::Unbuilt,
            _a: PhantomData,
        })
    }

    /// Computes every interior layer, bottom-up. Valid exactly once.
    pub fn build(&mut self) -> Result<()> {
        if self.state == State::Built {
            return Err(MerkleError::AlreadyBuilt);
        }

        let mut a = A::default();
        for depth in (2..=self.depth).rev() {
            let (width, start) = boundaries(depth);
            let (_, parent_start) = boundaries(depth - 1);

            // The parent layer always lives in front of its children.
            let (upper, lower) = self.data.split_at_mut(start);
            for (k, pair) in lower[..width].chunks_exact(2).enumerate() {
                let left = pair[0].as_ref().ok_or(MerkleError::MissingNode(start + 2 * k))?;
                let right = pair[1]
                    .as_ref()
                    .ok_or(MerkleError::MissingNode(start + 2 * k + 1))?;
                upper[parent_start + k] = Some(a.node(left, right)?);
            }

            trace!("built layer {} ({} nodes)", depth - 1, width / 2);
        }

        self.state = State::Built;
        debug!(
            "built tree over {} leafs, depth {}, {} nodes",
            self.leafs,
            self.depth,
            self.data.len()
        );
        Ok(())
    }

    /// Generate merkle tree inclusion proof for leaf `i`.
    ///
    /// The lemma is `[sibling of i, sibling of parent(i), ..., root]` and
    /// holds exactly `depth` digests.
    pub fn gen_proof(&self, i: usize) -> Result<Proof<T>> {
        self.ensure_built()?;
        if i >= self.leafs {
            return Err(MerkleError::LeafIndexOutOfRange {
                index: i,
                leafs: self.leafs,
            });
        }

        let root = self.root()?;
        let mut lemma: Vec<T> = Vec::with_capacity(self.depth);
        if self.depth > 1 {
            let (_, start) = boundaries(self.depth);
            let mut j = start + i;
            lemma.push(self.read_at(sibling(j, start))?);

            for depth in (3..=self.depth).rev() {
                let (_, parent_start) = boundaries(depth - 1);
                j = (j - 1) / 2;
                lemma.push(self.read_at(sibling(j, parent_start))?);
            }
        }

        // root is final
        lemma.push(root);
        debug_assert_eq!(lemma.len(), self.depth);

        trace!("generated proof for leaf {}", i);
        Proof::new(lemma)
    }

    /// Generates proofs for every position in `positions`, in parallel.
    ///
    /// Proofs come back in the order of `positions`.
    pub fn gen_proofs(&self, positions: &[usize]) -> Result<Vec<Proof<T>>>
    where
        A: Send + Sync,
    {
        self.ensure_built()?;
        positions.par_iter().map(|&i| self.gen_proof(i)).collect()
    }

    /// Stateless inclusion check, see [`proof::verify`].
    pub fn verify(leaf: &T, path: &[T], root: &T) -> Result<bool> {
        proof::verify::<T, A>(leaf, path, root)
    }

    /// Returns merkle root.
    pub fn root(&self) -> Result<T> {
        self.ensure_built()?;
        self.read_at(0)
    }

    /// Returns the node stored at absolute index `i`.
    pub fn read_at(&self, i: usize) -> Result<T> {
        self.data
            .get(i)
            .and_then(Option::as_ref)
            .cloned()
            .ok_or(MerkleError::MissingNode(i))
    }

    /// Returns the leaf layer, padding included.
    pub fn leaf_layer(&self) -> Result<Vec<T>> {
        let (_, start) = boundaries(self.depth);
        (start..self.data.len()).map(|i| self.read_at(i)).collect()
    }

    /// Returns `true` once [`MerkleTree::build`] has completed.
    pub fn is_built(&self) -> bool {
        self.state == State::Built
    }

    /// Returns number of slots in the tree.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the tree holds no slots, which never happens for a
    /// constructed tree.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns depth of the tree; the root is depth 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns number of leafs the tree was built upon, padding included.
    pub fn leafs(&self) -> usize {
        self.leafs
    }

    /// Returns the padding digest of this tree.
    pub fn padding(&self) -> &T {
        &self.padding
    }

    fn ensure_built(&self) -> Result<()> {
        match self.state {
            State::Built => Ok(()),
            State::Unbuilt => Err(MerkleError::NotBuilt),
        }
    }
}

impl<A: Algorithm<[u8; 32]>> MerkleTree<[u8; 32], A> {
    /// Creates new merkle tree over 32 byte leafs, padded with
    /// [`DEFAULT_PADDING`].
    pub fn new(leafs: Vec<[u8; 32]>) -> Result<MerkleTree<[u8; 32], A>> {
        Self::with_padding(leafs, DEFAULT_PADDING)
    }
}

/// Number of leafs a tree over `count` raw leafs holds after padding.
///
/// Odd counts are padded to the next power of two, even counts are kept.
/// Counts that end up not being a power of two are refused.
pub fn padded_leaf_count(count: usize) -> Result<usize> {
    if count == 0 {
        return Err(MerkleError::EmptyLeafSet);
    }

    let padded = if count & 1 == 1 {
        count.next_power_of_two()
    } else {
        count
    };

    if !padded.is_power_of_two() {
        return Err(MerkleError::InvalidLeafCount(padded));
    }
    Ok(padded)
}

/// Depth of a tree over `count` raw leafs, as seen by a verifier.
pub fn tree_depth(count: usize) -> Result<usize> {
    padded_leaf_count(count).map(depth_of)
}

/// Total number of slots of a tree over `leafs` padded leafs.
pub fn get_merkle_tree_len(leafs: usize) -> usize {
    2 * leafs - 1
}

// `leafs` must be a power of two.
fn depth_of(leafs: usize) -> usize {
    leafs.trailing_zeros() as usize + 1
}

/// Length and starting index of the layer at `depth`.
fn boundaries(depth: usize) -> (usize, usize) {
    let width = 1 << (depth - 1);
    (width, width - 1)
}

/// Index of the other half of the pair `index` belongs to.
fn sibling(index: usize, layer_start: usize) -> usize {
    if (index - layer_start) & 1 == 0 {
        // left
        index + 1
    } else {
        // right
        index - 1
    }
}

fn ensure_width<T: Element>(item: &T, width: usize) -> Result<()> {
    let actual = item.as_ref().len();
    if actual != width {
        return Err(MerkleError::LengthMismatch {
            expected: width,
            actual,
        });
    }
    Ok(())
}
