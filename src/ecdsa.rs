//! ECDSA signing, verification and public-key recovery
//!
//! Nonces come from the RFC 6979 HMAC-DRBG seeded with the key and message
//! hash (plus optional extra entropy).  Signatures are low-s by default;
//! verification is strict about high s unless told otherwise.

use crate::constants::{COMPACT_SIGNATURE_SIZE, SCALAR_SIZE};
use crate::der;
use crate::drbg::HmacDrbg;
use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::hashes;
use crate::keys::{PublicKey, SecretKey};
use crate::point::AffinePoint;
use crate::scalar::Scalar;
use crate::wnaf;
use zeroize::Zeroize;

/// An ECDSA signature (r, s), both in [1, n).
#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    pub(crate) r: Scalar,
    pub(crate) s: Scalar,
}

/// The 2-bit hint that lets a verifier reconstruct the signing key:
/// bit 0 is the parity of R.y, bit 1 is set when R.x overflowed the order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoveryId(u8);

/// Extra DRBG seed material for hedged (randomized-deterministic) signing.
#[derive(Clone, Debug)]
pub enum ExtraEntropy {
    /// Draw 32 fresh random bytes at signing time.
    Fresh,
    /// Mix in exactly these 32 bytes.
    Bytes([u8; 32]),
}

/// Signing knobs.
#[derive(Clone, Debug)]
pub struct SignOptions {
    /// Normalize s to the low half of the range (default true).
    pub canonical: bool,
    /// Optional extra entropy appended to the RFC 6979 seed.
    pub extra_entropy: Option<ExtraEntropy>,
}

impl Default for SignOptions {
    fn default() -> Self {
        SignOptions {
            canonical: true,
            extra_entropy: None,
        }
    }
}

impl Signature {
    /// Parse a 64-byte compact signature r || s.
    pub fn from_compact(bytes: &[u8; COMPACT_SIGNATURE_SIZE]) -> Result<Self> {
        let mut r_bytes = [0u8; SCALAR_SIZE];
        let mut s_bytes = [0u8; SCALAR_SIZE];
        r_bytes.copy_from_slice(&bytes[..SCALAR_SIZE]);
        s_bytes.copy_from_slice(&bytes[SCALAR_SIZE..]);
        Self::from_scalars(Scalar::from_bytes(&r_bytes)?, Scalar::from_bytes(&s_bytes)?)
    }

    /// Parse a DER-encoded signature.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let (r, s) = der::decode(bytes)?;
        Self::from_scalars(r, s)
    }

    /// Serialize as 64 bytes r || s.
    pub fn to_compact(&self) -> [u8; COMPACT_SIGNATURE_SIZE] {
        let mut out = [0u8; COMPACT_SIGNATURE_SIZE];
        out[..SCALAR_SIZE].copy_from_slice(&self.r.to_bytes());
        out[SCALAR_SIZE..].copy_from_slice(&self.s.to_bytes());
        out
    }

    /// Serialize as DER.
    pub fn to_der(&self) -> Vec<u8> {
        der::encode(&self.r, &self.s)
    }

    /// Whether s is already in the unmalleable low half.
    pub fn is_low_s(&self) -> bool {
        !self.s.is_high()
    }

    /// Return the low-s form of this signature (identity if already low).
    pub fn normalize_s(&self) -> Self {
        if self.s.is_high() {
            Signature {
                r: self.r.clone(),
                s: self.s.negate(),
            }
        } else {
            self.clone()
        }
    }

    fn from_scalars(r: Scalar, s: Scalar) -> Result<Self> {
        if r.is_zero() || s.is_zero() {
            return Err(Error::param("Signature", "r and s must be nonzero"));
        }
        Ok(Signature { r, s })
    }
}

impl RecoveryId {
    /// Validate a raw recovery id (0..=3).
    pub fn from_byte(id: u8) -> Result<Self> {
        if id > 3 {
            return Err(Error::param("RecoveryId", "Recovery id must be 0..=3"));
        }
        Ok(RecoveryId(id))
    }

    /// The raw id.
    pub fn to_byte(self) -> u8 {
        self.0
    }

    fn is_y_odd(self) -> bool {
        self.0 & 1 == 1
    }

    fn is_x_reduced(self) -> bool {
        self.0 & 2 == 2
    }
}

/// Sign a 32-byte message hash.
pub fn sign(msg_hash: &[u8; 32], key: &SecretKey, opts: &SignOptions) -> Result<Signature> {
    sign_inner(msg_hash, key, opts).map(|(sig, _)| sig)
}

/// Sign a 32-byte message hash, also returning the recovery id.
pub fn sign_recoverable(
    msg_hash: &[u8; 32],
    key: &SecretKey,
    opts: &SignOptions,
) -> Result<(Signature, RecoveryId)> {
    sign_inner(msg_hash, key, opts)
}

fn sign_inner(
    msg_hash: &[u8; 32],
    key: &SecretKey,
    opts: &SignOptions,
) -> Result<(Signature, RecoveryId)> {
    let d = key.scalar();
    let m = Scalar::from_bytes_reduced(msg_hash);

    // RFC 6979 seed: int2octets(d) || bits2octets(h1), plus any extra entropy.
    let mut seed = Vec::with_capacity(3 * SCALAR_SIZE);
    seed.extend_from_slice(&d.to_bytes());
    seed.extend_from_slice(&m.to_bytes());
    match &opts.extra_entropy {
        None => {}
        Some(ExtraEntropy::Fresh) => seed.extend_from_slice(&hashes::random_bytes::<32>()),
        Some(ExtraEntropy::Bytes(bytes)) => seed.extend_from_slice(&bytes[..]),
    }

    let mut drbg = HmacDrbg::new();
    drbg.reseed(&seed);
    seed.zeroize();
    loop {
        let candidate = drbg.generate()?;
        if let Some(found) = try_nonce(&candidate, &m, d, opts.canonical) {
            return Ok(found);
        }
        drbg.reseed(&[]);
    }
}

/// Attempt one DRBG candidate; `None` sends the caller back for the next.
fn try_nonce(
    k_bytes: &[u8; 32],
    m: &Scalar,
    d: &Scalar,
    canonical: bool,
) -> Option<(Signature, RecoveryId)> {
    let k = Scalar::from_bytes(k_bytes).ok()?;
    if k.is_zero() {
        return None;
    }

    let q = wnaf::mul_base(&k);
    let r = Scalar::from_field_bytes_reduced(&q.x);
    if r.is_zero() {
        return None;
    }

    let k_inv = k.invert().expect("nonce is nonzero");
    let s = k_inv.mul(&m.add(&d.mul(&r)));
    if s.is_zero() {
        return None;
    }

    let x_overflow = Scalar::from_bytes(&q.x_bytes()).is_err();
    let mut recovery = ((x_overflow as u8) << 1) | q.y_is_odd() as u8;

    let s = if canonical && s.is_high() {
        recovery ^= 1;
        s.negate()
    } else {
        s
    };

    Some((Signature { r, s }, RecoveryId(recovery)))
}

/// Verify a signature over a 32-byte message hash.
///
/// Returns false for anything invalid; never errors.  `strict` (the default
/// posture) rejects malleable high-s signatures.
pub fn verify(sig: &Signature, msg_hash: &[u8; 32], key: &PublicKey, strict: bool) -> bool {
    if sig.r.is_zero() || sig.s.is_zero() {
        return false;
    }
    if strict && sig.s.is_high() {
        return false;
    }
    let m = Scalar::from_bytes_reduced(msg_hash);
    // An all-zero reduced hash is a red flag for fault injection.
    if m.is_zero() {
        return false;
    }

    let w = match sig.s.invert() {
        Ok(w) => w,
        Err(_) => return false,
    };
    let u1 = m.mul(&w);
    let u2 = sig.r.mul(&w);

    // u2·P uses the variable-time ladder: the public key and signature are
    // public inputs here.
    let r_point = wnaf::mul_base(&u1)
        .to_projective()
        .add(&key.as_point().to_projective().mul_vartime(&u2));
    if r_point.is_identity() {
        return false;
    }
    Scalar::from_field_bytes_reduced(&r_point.to_affine().x) == sig.r
}

/// Reconstruct the signing public key from a recoverable signature.
pub fn recover(
    msg_hash: &[u8; 32],
    sig: &Signature,
    recovery: RecoveryId,
) -> Result<PublicKey> {
    let m = Scalar::from_bytes_reduced(msg_hash);
    if m.is_zero() {
        return Err(Error::param("recover", "Message hash reduces to zero"));
    }

    // Rebuild R from r: ids 2/3 mean the x-coordinate wrapped past n.
    let x_bytes = if recovery.is_x_reduced() {
        let (limbs, carry) = FieldElement::adc_n(sig.r.0, Scalar::ORDER_LIMBS);
        if carry != 0 {
            return Err(Error::param("recover", "r + n overflows the field"));
        }
        crate::constants::limbs_to_bytes(&limbs)
    } else {
        sig.r.to_bytes()
    };
    let mut encoded = [0u8; 33];
    encoded[0] = if recovery.is_y_odd() { 0x03 } else { 0x02 };
    encoded[1..].copy_from_slice(&x_bytes);
    let r_point = AffinePoint::deserialize_compressed(&encoded)?;

    // Q = r⁻¹ · (s·R − m·G)
    let r_inv = sig.r.invert()?;
    let q = r_point
        .to_projective()
        .mul_vartime(&sig.s)
        .sub(&wnaf::mul_base(&m).to_projective())
        .mul_vartime(&r_inv);
    if q.is_identity() {
        return Err(Error::param("recover", "Recovered point is the identity"));
    }
    let q_affine = q.to_affine();
    debug_assert!(q_affine.is_valid());
    Ok(PublicKey::from_point(q_affine))
}
