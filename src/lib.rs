//! secp256k1 signatures and key agreement with a constant-pattern scalar engine
//!
//! This crate implements the Koblitz curve y² = x³ + 7 over the 256-bit
//! prime field used by Bitcoin and related systems, and the protocols built
//! on it: deterministic ECDSA (RFC 6979) with public-key recovery, BIP-340
//! Schnorr signatures, and raw ECDH.
//!
//! The arithmetic core is pure Rust: 32-bit-limb field and scalar types,
//! Jacobian point formulas, and a wNAF scalar-multiplication ladder that
//! splits every scalar through the curve's GLV endomorphism and performs one
//! table addition per window regardless of the scalar.  Message hashing is
//! the caller's job — ECDSA operates on 32-byte digests — while SHA-256,
//! HMAC-SHA256 and OS entropy are consumed through the [`hashes`] seam.
//!
//! # Example
//!
//! ```
//! use koblitz::{ecdsa, SecretKey};
//!
//! # fn main() -> koblitz::Result<()> {
//! let key = SecretKey::from_hex(
//!     "0000000000000000000000000000000000000000000000000000000000000001",
//! )?;
//! let msg_hash = [0x24u8; 32];
//! let sig = ecdsa::sign(&msg_hash, &key, &Default::default())?;
//! assert!(ecdsa::verify(&sig, &msg_hash, &key.public_key(), true));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

// Error module and re-exports
pub mod error;
pub use error::{Error, Result};

// Curve constants and wire sizes
pub mod constants;

// Arithmetic layers
pub mod field;
pub mod point;
pub mod scalar;
pub use field::FieldElement;
pub use point::{AffinePoint, ProjectivePoint};
pub use scalar::Scalar;

// Scalar-multiplication engine (internal; reached through the point types)
mod wnaf;

// Injected primitives and the deterministic nonce generator
pub mod drbg;
pub mod hashes;

// Wire codecs
pub mod der;

// Keys and protocols
pub mod ecdh;
pub mod ecdsa;
pub mod keys;
pub mod schnorr;
pub use keys::{generate_keypair, PublicKey, SecretKey};
