//! Digest primitives a [`HashBuilder`](super::HashBuilder) can run on.

use sha2::{Digest, Sha256, Sha512};

/// An incremental digest whose current output can be read without consuming
/// the state.
pub trait HashFunction {
    fn update(&mut self, bytes: &[u8]);

    /// Output for everything written so far. Does not change the state.
    fn sum(&self) -> Vec<u8>;

    fn reset(&mut self);

    fn output_size(&self) -> usize;

    /// Preferred unit for incremental writes, in bytes.
    fn block_size(&self) -> usize;
}

/// BLAKE3 output length used inside [`SecureHash`].
const BLAKE3_SIZE: usize = 64;

const SHA512_SIZE: usize = 64;

const SHA256_BLOCK: usize = 64;

const SHA512_BLOCK: usize = 128;

/// BLAKE3 (extended to 64 bytes) and SHA-512 run side by side over the same
/// input. The digest is their concatenation, so a collision needs a
/// simultaneous collision in both.
#[derive(Clone, Debug, Default)]
pub struct SecureHash {
    blake3: blake3::Hasher,
    sha512: Sha512,
}

impl SecureHash {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HashFunction for SecureHash {
    fn update(&mut self, bytes: &[u8]) {
        self.blake3.update(bytes);
        Digest::update(&mut self.sha512, bytes);
    }

    fn sum(&self) -> Vec<u8> {
        let mut out = vec![0; BLAKE3_SIZE + SHA512_SIZE];
        let (blake3, sha512) = out.split_at_mut(BLAKE3_SIZE);
        self.blake3.finalize_xof().fill(blake3);
        sha512.copy_from_slice(&self.sha512.clone().finalize());
        out
    }

    fn reset(&mut self) {
        self.blake3.reset();
        Digest::reset(&mut self.sha512);
    }

    fn output_size(&self) -> usize {
        BLAKE3_SIZE + SHA512_SIZE
    }

    fn block_size(&self) -> usize {
        blake3::BLOCK_LEN.max(SHA512_BLOCK)
    }
}

impl HashFunction for blake3::Hasher {
    fn update(&mut self, bytes: &[u8]) {
        blake3::Hasher::update(self, bytes);
    }

    fn sum(&self) -> Vec<u8> {
        self.finalize().as_bytes().to_vec()
    }

    fn reset(&mut self) {
        blake3::Hasher::reset(self);
    }

    fn output_size(&self) -> usize {
        blake3::OUT_LEN
    }

    fn block_size(&self) -> usize {
        blake3::BLOCK_LEN
    }
}

impl HashFunction for Sha256 {
    fn update(&mut self, bytes: &[u8]) {
        Digest::update(self, bytes);
    }

    fn sum(&self) -> Vec<u8> {
        self.clone().finalize().to_vec()
    }

    fn reset(&mut self) {
        Digest::reset(self);
    }

    fn output_size(&self) -> usize {
        <Self as Digest>::output_size()
    }

    fn block_size(&self) -> usize {
        SHA256_BLOCK
    }
}

impl HashFunction for Sha512 {
    fn update(&mut self, bytes: &[u8]) {
        Digest::update(self, bytes);
    }

    fn sum(&self) -> Vec<u8> {
        self.clone().finalize().to_vec()
    }

    fn reset(&mut self) {
        Digest::reset(self);
    }

    fn output_size(&self) -> usize {
        <Self as Digest>::output_size()
    }

    fn block_size(&self) -> usize {
        SHA512_BLOCK
    }
}
