//! ECDH shared-secret derivation
//!
//! Returns the serialized point a·B.  Hashing or KDF post-processing is the
//! caller's business.

use crate::keys::{PublicKey, SecretKey};

/// Derive the shared secret a·B and serialize it (33 bytes compressed, 65
/// uncompressed).
///
/// The secret scalar goes through the fixed-pattern ladder.  With validated
/// key types the result is never the identity: the peer point has prime
/// order and the scalar is in [1, n).
pub fn shared_secret(secret: &SecretKey, public: &PublicKey, compressed: bool) -> Vec<u8> {
    let shared = public.as_point().mul(secret.scalar());
    if compressed {
        shared.serialize_compressed().to_vec()
    } else {
        shared.serialize_uncompressed().to_vec()
    }
}
