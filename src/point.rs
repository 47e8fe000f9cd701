//! secp256k1 point arithmetic in affine and Jacobian-projective coordinates

use crate::constants::{
    FIELD_ELEMENT_SIZE, GENERATOR_X, GENERATOR_Y, POINT_COMPRESSED_SIZE, POINT_UNCOMPRESSED_SIZE,
    POINT_X_ONLY_SIZE,
};
use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::scalar::Scalar;
use crate::wnaf;
use subtle::Choice;

/// A point on the curve in affine coordinates, or the identity sentinel.
#[derive(Clone, Debug)]
pub struct AffinePoint {
    pub(crate) is_identity: Choice,
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
}

/// A curve point in Jacobian projective coordinates (X : Y : Z) with
/// x = X/Z² and y = Y/Z³.  Z = 0 denotes the identity.  The representation
/// is not canonical; use [`ProjectivePoint::to_affine`] or the batch variant
/// to normalize.
#[derive(Clone, Debug)]
pub struct ProjectivePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &Self) -> bool {
        let self_is_identity: bool = self.is_identity.into();
        let other_is_identity: bool = other.is_identity.into();
        if self_is_identity || other_is_identity {
            return self_is_identity == other_is_identity;
        }
        self.x == other.x && self.y == other.y
    }
}

impl AffinePoint {
    /// The standard base point G.
    pub fn generator() -> Self {
        Self::new_uncompressed(&GENERATOR_X, &GENERATOR_Y)
            .expect("standard base point must be valid")
    }

    /// Create a point from affine coordinates.
    ///
    /// Returns an error if the coordinates don't satisfy the curve equation.
    pub fn new_uncompressed(
        x: &[u8; FIELD_ELEMENT_SIZE],
        y: &[u8; FIELD_ELEMENT_SIZE],
    ) -> Result<Self> {
        let x_fe = FieldElement::from_bytes(x)?;
        let y_fe = FieldElement::from_bytes(y)?;
        if !Self::is_on_curve(&x_fe, &y_fe) {
            return Err(Error::param(
                "Point",
                "Point coordinates do not satisfy curve equation",
            ));
        }
        Ok(AffinePoint {
            is_identity: Choice::from(0),
            x: x_fe,
            y: y_fe,
        })
    }

    /// Create the identity point (point at infinity).
    pub fn identity() -> Self {
        AffinePoint {
            is_identity: Choice::from(1),
            x: FieldElement::zero(),
            y: FieldElement::zero(),
        }
    }

    /// Check if this point is the identity element.
    pub fn is_identity(&self) -> bool {
        self.is_identity.into()
    }

    /// Check if this point is valid (identity or on the curve).
    pub fn is_valid(&self) -> bool {
        if self.is_identity() {
            return true;
        }
        Self::is_on_curve(&self.x, &self.y)
    }

    /// Get the x-coordinate as big-endian bytes.
    pub fn x_bytes(&self) -> [u8; FIELD_ELEMENT_SIZE] {
        self.x.to_bytes()
    }

    /// Get the y-coordinate as big-endian bytes.
    pub fn y_bytes(&self) -> [u8; FIELD_ELEMENT_SIZE] {
        self.y.to_bytes()
    }

    /// Parity of the y-coordinate.
    pub fn y_is_odd(&self) -> bool {
        self.y.is_odd()
    }

    /// Serialize in uncompressed form: 0x04 || x || y.
    pub fn serialize_uncompressed(&self) -> [u8; POINT_UNCOMPRESSED_SIZE] {
        let mut out = [0u8; POINT_UNCOMPRESSED_SIZE];
        if self.is_identity() {
            return out;
        }
        out[0] = 0x04;
        out[1..33].copy_from_slice(&self.x.to_bytes());
        out[33..].copy_from_slice(&self.y.to_bytes());
        out
    }

    /// Serialize in compressed form: parity tag || x.
    pub fn serialize_compressed(&self) -> [u8; POINT_COMPRESSED_SIZE] {
        let mut out = [0u8; POINT_COMPRESSED_SIZE];
        if self.is_identity() {
            return out;
        }
        out[0] = if self.y.is_odd() { 0x03 } else { 0x02 };
        out[1..].copy_from_slice(&self.x.to_bytes());
        out
    }

    /// Deserialize an uncompressed point: 65 bytes, 0x04 tag.
    pub fn deserialize_uncompressed(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != POINT_UNCOMPRESSED_SIZE {
            return Err(Error::Length {
                context: "Uncompressed point",
                expected: POINT_UNCOMPRESSED_SIZE,
                actual: bytes.len(),
            });
        }
        if bytes[0] != 0x04 {
            return Err(Error::param(
                "Point",
                "Invalid uncompressed point prefix (expected 0x04)",
            ));
        }
        let mut x_bytes = [0u8; FIELD_ELEMENT_SIZE];
        let mut y_bytes = [0u8; FIELD_ELEMENT_SIZE];
        x_bytes.copy_from_slice(&bytes[1..33]);
        y_bytes.copy_from_slice(&bytes[33..65]);
        Self::new_uncompressed(&x_bytes, &y_bytes)
    }

    /// Deserialize a compressed point: 33 bytes, 0x02/0x03 parity tag.
    pub fn deserialize_compressed(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != POINT_COMPRESSED_SIZE {
            return Err(Error::Length {
                context: "Compressed point",
                expected: POINT_COMPRESSED_SIZE,
                actual: bytes.len(),
            });
        }
        let tag = bytes[0];
        if tag != 0x02 && tag != 0x03 {
            return Err(Error::param("Point", "Invalid compressed point prefix"));
        }
        let mut x_bytes = [0u8; FIELD_ELEMENT_SIZE];
        x_bytes.copy_from_slice(&bytes[1..]);
        let point = Self::decompress(&x_bytes)?;
        // Flip the root to the requested parity.
        if point.y.is_odd() == (tag == 0x03) {
            Ok(point)
        } else {
            Ok(point.negate())
        }
    }

    /// Deserialize an x-only (BIP-340) point: 32 bytes, even y implied.
    pub fn deserialize_x_only(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != POINT_X_ONLY_SIZE {
            return Err(Error::Length {
                context: "X-only point",
                expected: POINT_X_ONLY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut x_bytes = [0u8; FIELD_ELEMENT_SIZE];
        x_bytes.copy_from_slice(bytes);
        let point = Self::decompress(&x_bytes)?;
        if point.y.is_odd() {
            Ok(point.negate())
        } else {
            Ok(point)
        }
    }

    /// Deserialize any supported encoding, dispatching on length and tag:
    /// 32 bytes x-only, 33 bytes compressed, 65 bytes uncompressed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            POINT_X_ONLY_SIZE => Self::deserialize_x_only(bytes),
            POINT_COMPRESSED_SIZE => Self::deserialize_compressed(bytes),
            POINT_UNCOMPRESSED_SIZE => Self::deserialize_uncompressed(bytes),
            other => Err(Error::param(
                "Point",
                format!(
                    "expected 32 (x-only), 33 (compressed), or 65 (uncompressed) bytes, got {other}"
                ),
            )),
        }
    }

    /// Deserialize from a hex string (64, 66 or 130 hex digits).
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|_| Error::param("Point", "Invalid hex encoding"))?;
        Self::from_bytes(&bytes)
    }

    /// Solve y² = x³ + 7 for the given x.  The returned root has unspecified
    /// parity; callers select the sign.
    fn decompress(x_bytes: &[u8; FIELD_ELEMENT_SIZE]) -> Result<Self> {
        let x = FieldElement::from_bytes(x_bytes)
            .map_err(|_| Error::param("Point", "Invalid x-coordinate"))?;
        if x.is_zero() {
            return Err(Error::param("Point", "Invalid x-coordinate"));
        }
        let rhs = x.square().mul(&x).add(&FieldElement::CURVE_B);
        let y = rhs
            .sqrt()
            .ok_or_else(|| Error::param("Point", "X-coordinate is not on the curve"))?;
        Ok(AffinePoint {
            is_identity: Choice::from(0),
            x,
            y,
        })
    }

    /// Negate: (x, −y).
    pub fn negate(&self) -> Self {
        AffinePoint {
            is_identity: self.is_identity,
            x: self.x.clone(),
            y: self.y.negate(),
        }
    }

    /// Add two points using the group law.
    pub fn add(&self, other: &Self) -> Self {
        self.to_projective().add(&other.to_projective()).to_affine()
    }

    /// Double a point (add it to itself).
    pub fn double(&self) -> Self {
        self.to_projective().double().to_affine()
    }

    /// Scalar multiplication with the fixed-pattern wNAF ladder.
    ///
    /// The zero scalar yields the identity.
    pub fn mul(&self, scalar: &Scalar) -> Self {
        if self.is_identity() {
            return Self::identity();
        }
        wnaf::mul_point(&self.to_projective(), scalar)
    }

    /// Variable-time scalar multiplication for public inputs only
    /// (verification, recovery).
    pub fn mul_vartime(&self, scalar: &Scalar) -> Self {
        if self.is_identity() {
            return Self::identity();
        }
        self.to_projective().mul_vartime(scalar).to_affine()
    }

    fn is_on_curve(x: &FieldElement, y: &FieldElement) -> bool {
        let y_squared = y.square();
        let rhs = x.square().mul(x).add(&FieldElement::CURVE_B);
        y_squared == rhs
    }

    /// Lift into Jacobian coordinates with Z = 1.
    pub fn to_projective(&self) -> ProjectivePoint {
        if self.is_identity() {
            return ProjectivePoint::identity();
        }
        ProjectivePoint {
            x: self.x.clone(),
            y: self.y.clone(),
            z: FieldElement::one(),
        }
    }
}

impl ProjectivePoint {
    /// The identity sentinel (0 : 1 : 0).
    pub fn identity() -> Self {
        ProjectivePoint {
            x: FieldElement::zero(),
            y: FieldElement::one(),
            z: FieldElement::zero(),
        }
    }

    /// The base point G with Z = 1.
    pub fn generator() -> Self {
        AffinePoint::generator().to_projective()
    }

    /// Whether this represents the point at infinity.
    pub fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    // Zero X or Y only ever appears in identity encodings: the curve has no
    // affine point with a zero coordinate, so additions may short-circuit on
    // either the (0, 1, 0) sentinel or a zeroed coordinate.
    fn is_identity_like(&self) -> bool {
        self.x.is_zero() || self.y.is_zero() || self.z.is_zero()
    }

    /// Point addition, a = 0 formulas (12M + 4S).
    pub fn add(&self, other: &Self) -> Self {
        if other.is_identity_like() {
            return self.clone();
        }
        if self.is_identity_like() {
            return other.clone();
        }

        let z1_sq = self.z.square();
        let z2_sq = other.z.square();
        let u1 = self.x.mul(&z2_sq);
        let u2 = other.x.mul(&z1_sq);
        let s1 = self.y.mul(&z2_sq).mul(&other.z);
        let s2 = other.y.mul(&z1_sq).mul(&self.z);

        let h = u2.sub(&u1);
        let r = s2.sub(&s1);
        if h.is_zero() {
            if r.is_zero() {
                return self.double();
            }
            return Self::identity();
        }

        let h_sq = h.square();
        let h_cu = h_sq.mul(&h);
        let v = u1.mul(&h_sq);

        let x3 = r.square().sub(&h_cu).sub(&v.double());
        let y3 = r.mul(&v.sub(&x3)).sub(&s1.mul(&h_cu));
        let z3 = self.z.mul(&other.z).mul(&h);

        ProjectivePoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Point doubling, a = 0 formulas (2M + 5S).
    pub fn double(&self) -> Self {
        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();

        // D = 2·((X + B)² − A − C)
        let d = self.x.add(&b).square().sub(&a).sub(&c).double();
        let e = a.double().add(&a); // 3A
        let f = e.square();

        let x3 = f.sub(&d.double());
        let y3 = e.mul(&d.sub(&x3)).sub(&c.double().double().double()); // 8C
        let z3 = self.y.mul(&self.z).double();

        ProjectivePoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Negate: (X, −Y, Z).
    pub fn negate(&self) -> Self {
        ProjectivePoint {
            x: self.x.clone(),
            y: self.y.negate(),
            z: self.z.clone(),
        }
    }

    /// Subtract: self + (−other).
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.negate())
    }

    /// Equality across non-canonical representations, by cross-multiplying
    /// away the Z denominators.
    pub fn equals(&self, other: &Self) -> bool {
        let self_id = self.is_identity();
        let other_id = other.is_identity();
        if self_id || other_id {
            return self_id == other_id;
        }
        let z1_sq = self.z.square();
        let z2_sq = other.z.square();
        let x_eq = self.x.mul(&z2_sq) == other.x.mul(&z1_sq);
        let y_eq = self.y.mul(&z2_sq).mul(&other.z) == other.y.mul(&z1_sq).mul(&self.z);
        x_eq && y_eq
    }

    /// Variable-time left-to-right double-and-add.  Only for public scalars;
    /// the branch pattern follows the scalar bits.
    pub fn mul_vartime(&self, scalar: &Scalar) -> Self {
        let mut result = Self::identity();
        if scalar.is_zero() || self.is_identity() {
            return result;
        }
        for i in (0..256).rev() {
            result = result.double();
            if scalar.bit(i) {
                result = result.add(self);
            }
        }
        result
    }

    /// Fixed-pattern wNAF scalar multiplication (the entry point for secret
    /// scalars against arbitrary bases).
    pub fn mul(&self, scalar: &Scalar) -> Self {
        wnaf::mul_point(self, scalar).to_projective()
    }

    /// Normalize to affine coordinates with a single field inversion.
    pub fn to_affine(&self) -> AffinePoint {
        if self.is_identity() {
            return AffinePoint::identity();
        }
        let z_inv = self.z.invert().expect("nonzero Z is invertible");
        let z_inv_sq = z_inv.square();
        let z_inv_cu = z_inv_sq.mul(&z_inv);
        AffinePoint {
            is_identity: Choice::from(0),
            x: self.x.mul(&z_inv_sq),
            y: self.y.mul(&z_inv_cu),
        }
    }

    /// Normalize a batch with one shared inversion (Montgomery's trick);
    /// identity entries stay identity.
    pub fn batch_to_affine(points: &[Self]) -> Vec<AffinePoint> {
        let zs: Vec<FieldElement> = points.iter().map(|p| p.z.clone()).collect();
        let z_invs = FieldElement::invert_batch(&zs);
        points
            .iter()
            .zip(z_invs.iter())
            .map(|(p, z_inv)| {
                if p.is_identity() {
                    return AffinePoint::identity();
                }
                let z_inv_sq = z_inv.square();
                let z_inv_cu = z_inv_sq.mul(z_inv);
                AffinePoint {
                    is_identity: Choice::from(0),
                    x: p.x.mul(&z_inv_sq),
                    y: p.y.mul(&z_inv_cu),
                }
            })
            .collect()
    }
}
