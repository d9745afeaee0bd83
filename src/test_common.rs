use crate::hash::*;
use crate::merkle::MerkleTree;
use std::fmt;
use std::hash::Hasher;

pub const SIZE: usize = 0x10;

pub type Item = [u8; SIZE];

/// Padding for 16 byte trees; all ones keeps `&` transparent.
pub const PADDING: Item = [0xff; SIZE];

/// XORs the written stream into a 16 byte state.
///
/// A single 16 byte write lands as is, so under XOR128 an interior node is
/// exactly `left & right` and the root of a tree is the AND of its leafs.
#[derive(Debug, Copy, Clone, Default)]
pub struct XOR128 {
    data: Item,
    i: usize,
}

impl XOR128 {
    pub fn new() -> XOR128 {
        XOR128 {
            data: [0; SIZE],
            i: 0,
        }
    }
}

impl Hasher for XOR128 {
    fn write(&mut self, bytes: &[u8]) {
        for x in bytes {
            self.data[self.i & (SIZE - 1)] ^= *x;
            self.i += 1;
        }
    }

    fn finish(&self) -> u64 {
        unimplemented!()
    }
}

impl Algorithm<Item> for XOR128 {
    #[inline]
    fn hash(&mut self) -> Item {
        self.data
    }

    #[inline]
    fn reset(&mut self) {
        *self = XOR128::new();
    }
}

impl fmt::UpperHex for XOR128 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        for b in self.data.as_ref() {
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

/// Variable width "hash" returning the written bytes.
#[derive(Debug, Clone, Default)]
pub struct Identity(Vec<u8>);

impl Hasher for Identity {
    fn write(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    fn finish(&self) -> u64 {
        unimplemented!()
    }
}

impl Algorithm<Vec<u8>> for Identity {
    fn hash(&mut self) -> Vec<u8> {
        self.0.clone()
    }

    fn reset(&mut self) {
        self.0.clear();
    }
}

/// Leaf `i` of the test trees.
pub fn item(i: usize) -> Item {
    let mut a = XOR128::new();
    a.write(&(i * 93).to_le_bytes());
    a.write_u8(0x5a);
    a.hash()
}

pub fn get_vec_tree_from_slice(leafs: usize) -> MerkleTree<Item, XOR128> {
    let x: Vec<Item> = (0..leafs).map(item).collect();
    let mut mt = MerkleTree::with_padding(x, PADDING).expect("failed to create tree from slice");
    mt.build().expect("failed to build tree");
    mt
}

/// AND of all items.
pub fn and_all(items: &[Item]) -> Item {
    items.iter().fold(PADDING, |mut acc, x| {
        for (a, b) in acc.iter_mut().zip(x) {
            *a &= b;
        }
        acc
    })
}
