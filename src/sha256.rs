use std::fmt;
use std::hash::Hasher;

use sha2::{Digest, Sha256};

use crate::hash::Algorithm;

/// SHA-256 digest of 32 bytes.
pub type Sha256Hash = [u8; 32];

/// SHA-256 [`Algorithm`] backed by the `sha2` crate.
#[derive(Clone, Default)]
pub struct Sha256Algorithm(Sha256);

impl Sha256Algorithm {
    /// Creates a fresh hasher.
    pub fn new() -> Sha256Algorithm {
        Sha256Algorithm(Sha256::new())
    }
}

impl fmt::Debug for Sha256Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sha256Algorithm")
    }
}

impl Hasher for Sha256Algorithm {
    #[inline]
    fn write(&mut self, msg: &[u8]) {
        Digest::update(&mut self.0, msg)
    }

    /// First eight bytes of the current digest, big-endian.
    #[inline]
    fn finish(&self) -> u64 {
        let h = self.0.clone().finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&h[..8]);
        u64::from_be_bytes(head)
    }
}

impl Algorithm<Sha256Hash> for Sha256Algorithm {
    #[inline]
    fn hash(&mut self) -> Sha256Hash {
        let mut h = [0u8; 32];
        h.copy_from_slice(&self.0.finalize_reset());
        h
    }

    #[inline]
    fn reset(&mut self) {
        Digest::reset(&mut self.0);
    }
}
