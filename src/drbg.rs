//! Deterministic bit generator for RFC 6979 nonces (§3.2 of the RFC)

use crate::error::{Error, Result};
use crate::hashes;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Upper bound on nonce draws per signing call; running past it means the
/// key/hash combination is pathological and signing must abort.
const MAX_DRAWS: usize = 1000;

/// HMAC-DRBG state: created per signing call, discarded with the nonce.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct HmacDrbg {
    k: [u8; 32],
    v: [u8; 32],
    draws: usize,
}

impl HmacDrbg {
    /// Fresh state: V = 0x01 repeated, K = zeros.
    pub fn new() -> Self {
        HmacDrbg {
            k: [0x00; 32],
            v: [0x01; 32],
            draws: 0,
        }
    }

    /// Mix `seed` into the state.  An empty seed performs only the first
    /// round, which is how the retry path between candidate nonces reseeds.
    pub fn reseed(&mut self, seed: &[u8]) {
        self.k = hashes::hmac_sha256(&self.k, &[&self.v, &[0x00], seed]);
        self.v = hashes::hmac_sha256(&self.k, &[&self.v]);
        if seed.is_empty() {
            return;
        }
        self.k = hashes::hmac_sha256(&self.k, &[&self.v, &[0x01], seed]);
        self.v = hashes::hmac_sha256(&self.k, &[&self.v]);
    }

    /// Draw the next 32-byte candidate.
    pub fn generate(&mut self) -> Result<[u8; 32]> {
        if self.draws >= MAX_DRAWS {
            return Err(Error::Exhausted {
                operation: "HMAC-DRBG nonce generation",
                attempts: MAX_DRAWS,
            });
        }
        self.draws += 1;
        self.v = hashes::hmac_sha256(&self.k, &[&self.v]);
        Ok(self.v)
    }
}

impl Default for HmacDrbg {
    fn default() -> Self {
        Self::new()
    }
}
