//! Key types: validated secret scalars and public curve points

use crate::constants::{POINT_COMPRESSED_SIZE, POINT_UNCOMPRESSED_SIZE, SCALAR_SIZE};
use crate::error::{Error, Result};
use crate::point::AffinePoint;
use crate::scalar::Scalar;
use crate::wnaf;
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Rejection-sampling bound for random key generation; more misses than this
/// means the entropy source is broken.
const RANDOM_KEY_ATTEMPTS: usize = 8;

/// A secp256k1 private key: a scalar in [1, n).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Scalar);

impl SecretKey {
    /// Create a secret key from 32 big-endian bytes.
    ///
    /// Rejects zero and values >= the group order.
    pub fn from_bytes(bytes: &[u8; SCALAR_SIZE]) -> Result<Self> {
        let scalar = Scalar::from_bytes(bytes)?;
        if scalar.is_zero() {
            return Err(Error::param("SecretKey", "Private key cannot be zero"));
        }
        Ok(SecretKey(scalar))
    }

    /// Create a secret key from a 64-digit hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|_| Error::param("SecretKey", "Invalid hex encoding"))?;
        if bytes.len() != SCALAR_SIZE {
            return Err(Error::Length {
                context: "SecretKey",
                expected: SCALAR_SIZE,
                actual: bytes.len(),
            });
        }
        let mut fixed = [0u8; SCALAR_SIZE];
        fixed.copy_from_slice(&bytes);
        let key = Self::from_bytes(&fixed);
        fixed.zeroize();
        key
    }

    /// Sample a uniform key by rejection.
    pub fn random<R: CryptoRng + RngCore>(rng: &mut R) -> Result<Self> {
        let mut bytes = [0u8; SCALAR_SIZE];
        for _ in 0..RANDOM_KEY_ATTEMPTS {
            rng.fill_bytes(&mut bytes);
            if let Ok(key) = Self::from_bytes(&bytes) {
                bytes.zeroize();
                return Ok(key);
            }
        }
        bytes.zeroize();
        Err(Error::Exhausted {
            operation: "random private key sampling",
            attempts: RANDOM_KEY_ATTEMPTS,
        })
    }

    /// Serialize as 32 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; SCALAR_SIZE] {
        self.0.to_bytes()
    }

    /// The public key d·G.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            point: wnaf::mul_base(&self.0),
        }
    }

    pub(crate) fn scalar(&self) -> &Scalar {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.write_str("SecretKey(..)")
    }
}

/// A secp256k1 public key: a validated non-identity curve point.
#[derive(Clone, Debug, PartialEq)]
pub struct PublicKey {
    point: AffinePoint,
}

impl PublicKey {
    /// Derive the public key for a secret key.
    pub fn from_secret_key(secret: &SecretKey) -> Self {
        secret.public_key()
    }

    /// Parse a sec1-encoded point: 33 bytes compressed or 65 uncompressed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let point = match bytes.len() {
            POINT_COMPRESSED_SIZE => AffinePoint::deserialize_compressed(bytes)?,
            POINT_UNCOMPRESSED_SIZE => AffinePoint::deserialize_uncompressed(bytes)?,
            other => {
                return Err(Error::param(
                    "PublicKey",
                    format!("expected 33 (compressed) or 65 (uncompressed) bytes, got {other}"),
                ))
            }
        };
        Ok(PublicKey { point })
    }

    /// Parse from a hex string (66 or 130 digits).
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|_| Error::param("PublicKey", "Invalid hex encoding"))?;
        Self::from_bytes(&bytes)
    }

    /// Serialize in compressed form (33 bytes).
    pub fn serialize_compressed(&self) -> [u8; POINT_COMPRESSED_SIZE] {
        self.point.serialize_compressed()
    }

    /// Serialize in uncompressed form (65 bytes).
    pub fn serialize_uncompressed(&self) -> [u8; POINT_UNCOMPRESSED_SIZE] {
        self.point.serialize_uncompressed()
    }

    /// The underlying affine point.
    pub fn as_point(&self) -> &AffinePoint {
        &self.point
    }

    pub(crate) fn from_point(point: AffinePoint) -> Self {
        PublicKey { point }
    }
}

/// Generate a keypair from the given randomness source.
pub fn generate_keypair<R: CryptoRng + RngCore>(rng: &mut R) -> Result<(SecretKey, PublicKey)> {
    let secret = SecretKey::random(rng)?;
    let public = secret.public_key();
    Ok((secret, public))
}
