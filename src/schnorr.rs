//! BIP-340 Schnorr signatures with x-only public keys
//!
//! Keys are 32-byte x-coordinates with even y implied; nonces are derived
//! from the aux-masked secret via tagged hashes.  Signing self-verifies
//! before returning, as the BIP requires.

use crate::constants::{FIELD_ELEMENT_SIZE, SCALAR_SIZE, SCHNORR_SIGNATURE_SIZE};
use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::hashes;
use crate::keys::SecretKey;
use crate::point::AffinePoint;
use crate::scalar::Scalar;
use crate::wnaf;

const AUX_TAG: &[u8] = b"BIP0340/aux";
const NONCE_TAG: &[u8] = b"BIP0340/nonce";
const CHALLENGE_TAG: &[u8] = b"BIP0340/challenge";

/// SHA256(SHA256(tag) || SHA256(tag) || parts...), the BIP-340 domain
/// separator.
fn tagged_hash(tag: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let tag_hash = hashes::sha256(&[tag]);
    let mut chunks: Vec<&[u8]> = Vec::with_capacity(parts.len() + 2);
    chunks.push(&tag_hash);
    chunks.push(&tag_hash);
    chunks.extend_from_slice(parts);
    hashes::sha256(&chunks)
}

/// An x-only public key: a curve point with even y.
#[derive(Clone, Debug, PartialEq)]
pub struct XOnlyPublicKey {
    point: AffinePoint,
}

impl XOnlyPublicKey {
    /// Decode a 32-byte x-coordinate, lifting to the even-y point.
    pub fn from_bytes(bytes: &[u8; FIELD_ELEMENT_SIZE]) -> Result<Self> {
        Ok(XOnlyPublicKey {
            point: AffinePoint::deserialize_x_only(bytes)?,
        })
    }

    /// The x-only key for a secret key.
    pub fn from_secret_key(secret: &SecretKey) -> Self {
        let point = wnaf::mul_base(secret.scalar());
        let point = if point.y_is_odd() {
            point.negate()
        } else {
            point
        };
        XOnlyPublicKey { point }
    }

    /// Serialize as the 32-byte x-coordinate.
    pub fn to_bytes(&self) -> [u8; FIELD_ELEMENT_SIZE] {
        self.point.x_bytes()
    }
}

/// A 64-byte BIP-340 signature: R.x (a field element) followed by s.
#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    r: FieldElement,
    s: Scalar,
}

impl Signature {
    /// Parse r || s, rejecting r >= p, s >= n, and r = 0 (a valid signature
    /// never commits to the identity).
    pub fn from_bytes(bytes: &[u8; SCHNORR_SIGNATURE_SIZE]) -> Result<Self> {
        let mut r_bytes = [0u8; FIELD_ELEMENT_SIZE];
        let mut s_bytes = [0u8; SCALAR_SIZE];
        r_bytes.copy_from_slice(&bytes[..FIELD_ELEMENT_SIZE]);
        s_bytes.copy_from_slice(&bytes[FIELD_ELEMENT_SIZE..]);
        let r = FieldElement::from_bytes(&r_bytes)?;
        if r.is_zero() {
            return Err(Error::param("Schnorr signature", "r cannot be zero"));
        }
        let s = Scalar::from_bytes(&s_bytes)?;
        Ok(Signature { r, s })
    }

    /// Serialize as 64 bytes r || s.
    pub fn to_bytes(&self) -> [u8; SCHNORR_SIGNATURE_SIZE] {
        let mut out = [0u8; SCHNORR_SIGNATURE_SIZE];
        out[..FIELD_ELEMENT_SIZE].copy_from_slice(&self.r.to_bytes());
        out[FIELD_ELEMENT_SIZE..].copy_from_slice(&self.s.to_bytes());
        out
    }
}

/// The x-only public key for a secret key.
pub fn public_key(secret: &SecretKey) -> XOnlyPublicKey {
    XOnlyPublicKey::from_secret_key(secret)
}

/// Sign with fresh auxiliary randomness.
pub fn sign(msg: &[u8], secret: &SecretKey) -> Result<Signature> {
    sign_with_aux(msg, secret, &hashes::random_bytes::<32>())
}

/// Sign with caller-supplied auxiliary randomness (deterministic).
pub fn sign_with_aux(msg: &[u8], secret: &SecretKey, aux: &[u8; 32]) -> Result<Signature> {
    let p_point = wnaf::mul_base(secret.scalar());
    let d = if p_point.y_is_odd() {
        secret.scalar().negate()
    } else {
        secret.scalar().clone()
    };
    let px = p_point.x_bytes();

    // t = d XOR H_aux(a), masking the key before it meets the nonce hash.
    let mask = tagged_hash(AUX_TAG, &[aux]);
    let d_bytes = d.to_bytes();
    let mut t = [0u8; 32];
    for (i, byte) in t.iter_mut().enumerate() {
        *byte = d_bytes[i] ^ mask[i];
    }

    let k0 = Scalar::from_bytes_reduced(&tagged_hash(NONCE_TAG, &[&t, &px, msg]));
    if k0.is_zero() {
        return Err(Error::param("Schnorr nonce", "Derived nonce is zero"));
    }

    let r_point = wnaf::mul_base(&k0);
    let k = if r_point.y_is_odd() { k0.negate() } else { k0 };
    let rx = r_point.x_bytes();

    let e = Scalar::from_bytes_reduced(&tagged_hash(CHALLENGE_TAG, &[&rx, &px, msg]));
    let signature = Signature {
        r: r_point.x.clone(),
        s: k.add(&e.mul(&d)),
    };

    // BIP-340 mandates verifying before release; a failure here means
    // corrupted state, not bad input.
    let pubkey = XOnlyPublicKey {
        point: if p_point.y_is_odd() {
            p_point.negate()
        } else {
            p_point
        },
    };
    if !verify(&signature, msg, &pubkey) {
        return Err(Error::param(
            "Schnorr signature",
            "Self-verification failed",
        ));
    }
    Ok(signature)
}

/// Verify a signature; returns false for anything invalid, never errors.
pub fn verify(sig: &Signature, msg: &[u8], pubkey: &XOnlyPublicKey) -> bool {
    let e = Scalar::from_bytes_reduced(&tagged_hash(
        CHALLENGE_TAG,
        &[&sig.r.to_bytes(), &pubkey.to_bytes(), msg],
    ));

    // R = s·G − e·P; both inputs are public, so the vartime ladder is fine
    // for the e·P half.
    let r_point = wnaf::mul_base(&sig.s)
        .to_projective()
        .sub(&pubkey.point.to_projective().mul_vartime(&e));
    if r_point.is_identity() {
        return false;
    }
    let r_affine = r_point.to_affine();
    !r_affine.y_is_odd() && r_affine.x == sig.r
}
