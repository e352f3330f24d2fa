//! Deterministic content hashing.
//!
//! A [`HashBuilder`] folds a read-only walk of one or more values into a
//! running digest. At every node it writes a type tag, then a value encoding
//! chosen by the node's [`Kind`](crate::Kind). Each write re-feeds the
//! digest's current output before the new bytes, so the result depends on
//! write order. Maps are canonicalized: entries are written in the order of
//! their keys' own digests, so iteration order never shows up in a hash.
//!
//! [`SecureHash`] is the default digest: BLAKE3 and SHA-512 over the same
//! input, concatenated.

mod builder;
mod function;

use std::fmt;

pub use builder::{HashBuilder, HashSession, Mode};
pub use function::{HashFunction, SecureHash};

use crate::{error::Error, object::Object};

/// Digest bytes produced by a [`HashBuilder`].
///
/// Ordered byte-lexicographically, which is what map canonicalization sorts
/// by. Displays as lowercase hex.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash(Vec<u8>);

impl Hash {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Hash {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

/// Stable hash of `values`, in order, with a fresh [`HashBuilder`].
///
/// Only public fields contribute. Fails if a value contains a function,
/// channel or raw pointer.
///
/// ```
/// use std::collections::HashMap;
///
/// let a = HashMap::from([("x", 1), ("y", 2)]);
/// let b = HashMap::from([("y", 2), ("x", 1)]);
/// assert_eq!(objgraph::hash(&[&a])?, objgraph::hash!(b)?);
/// # Ok::<(), objgraph::Error>(())
/// ```
pub fn hash(values: &[&dyn Object]) -> Result<Hash, Error> {
    HashBuilder::stable().reset_and_hash(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_lexicographic() {
        let low = Hash::from(vec![0x01, 0xff]);
        let high = Hash::from(vec![0x02]);
        assert!(low < high);
        assert_eq!(low.to_string(), "01ff");
        assert_eq!(format!("{high:?}"), "Hash(02)");
    }

    #[test]
    fn argument_order_matters() {
        let forward = hash(&[&1_u8, &2_u8]).unwrap();
        let backward = hash(&[&2_u8, &1_u8]).unwrap();
        assert_ne!(forward, backward);
        assert_eq!(forward, hash(&[&1_u8, &2_u8]).unwrap());
        assert_eq!(forward.len(), 128);
    }
}
