//! Field arithmetic over Fₚ for p = 2²⁵⁶ − 2³² − 977
//!
//! Heavy-weight primitives for the secp256k1 coordinate field: full-width
//! multiplication, squaring, modular inversion and modular square root.
//!   * pure Rust, constant-time where it matters.
//!   * 32-bit little-endian limbs stored in `[u32; 8]`, always fully reduced.
//!   * reduction exploits 2²⁵⁶ ≡ 2³² + 977 (mod p): the high half of a
//!     product is folded back in with two cheap word multiplies.
//!   * inversion and square root share one fixed addition chain built from
//!     the long runs of 1-bits in p − 2 and (p + 1)/4.

use crate::constants::{bytes_to_limbs, limbs_to_bytes, FIELD_ELEMENT_SIZE, LIMBS};
use crate::error::{Error, Result};
use subtle::{Choice, ConditionallySelectable};
use zeroize::Zeroize;

/// 2²⁵⁶ mod p, the wide-reduction fold constant: 2³² + 977.
const FOLD: u64 = 0x1_0000_03D1;

/// secp256k1 base-field element in [0, p).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldElement(pub(crate) [u32; LIMBS]);

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl FieldElement {
    /// p = 2²⁵⁶ − 2³² − 977 (little-endian limbs).
    pub(crate) const MOD_LIMBS: [u32; LIMBS] = [
        0xFFFF_FC2F, 0xFFFF_FFFE, 0xFFFF_FFFF, 0xFFFF_FFFF,
        0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF,
    ];

    /// Curve coefficient b = 7 of y² = x³ + 7.
    pub(crate) const CURVE_B: FieldElement = FieldElement([7, 0, 0, 0, 0, 0, 0, 0]);

    /// The additive identity element: 0
    #[inline]
    pub fn zero() -> Self {
        FieldElement([0u32; LIMBS])
    }

    /// The multiplicative identity element: 1
    #[inline]
    pub fn one() -> Self {
        FieldElement([1, 0, 0, 0, 0, 0, 0, 0])
    }
}

/* ========================================================================== */
/*  (De)Serialisation                                                         */
/* ========================================================================== */

impl FieldElement {
    /// Create a field element from big-endian bytes.
    ///
    /// Returns an error if the value is >= p.
    pub fn from_bytes(bytes: &[u8; FIELD_ELEMENT_SIZE]) -> Result<Self> {
        let fe = FieldElement(bytes_to_limbs(bytes));
        if !fe.is_valid() {
            return Err(Error::param("FieldElement", "Value >= field modulus"));
        }
        Ok(fe)
    }

    /// Convert to big-endian byte representation.
    pub fn to_bytes(&self) -> [u8; FIELD_ELEMENT_SIZE] {
        limbs_to_bytes(&self.0)
    }

    /// Check if the field element represents zero
    #[inline(always)]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    /// Return `true` if the field element is odd (least-significant bit set)
    #[inline(always)]
    pub fn is_odd(&self) -> bool {
        (self.0[0] & 1) == 1
    }

    /// self < p ?   (constant-time)
    #[inline(always)]
    pub(crate) fn is_valid(&self) -> bool {
        let (_, borrow) = Self::sbb_n(self.0, Self::MOD_LIMBS);
        borrow == 1 // borrow = 1  ⇒  self < p
    }
}

/* ========================================================================== */
/*  Core helpers: limb add / sub / select                                     */
/* ========================================================================== */

impl FieldElement {
    /// N-limb addition with carry.
    #[inline(always)]
    pub(crate) fn adc_n<const N: usize>(a: [u32; N], b: [u32; N]) -> ([u32; N], u32) {
        let mut out = [0u32; N];
        let mut carry = 0u64;
        for i in 0..N {
            let t = a[i] as u64 + b[i] as u64 + carry;
            out[i] = t as u32;
            carry = t >> 32;
        }
        (out, carry as u32)
    }

    /// N-limb subtraction with borrow.
    #[inline(always)]
    pub(crate) fn sbb_n<const N: usize>(a: [u32; N], b: [u32; N]) -> ([u32; N], u32) {
        let mut out = [0u32; N];
        let mut borrow = 0i64;
        for i in 0..N {
            let t = a[i] as i64 - b[i] as i64 - borrow;
            out[i] = t as u32;
            borrow = (t >> 63) & 1; // 1 if negative
        }
        (out, borrow as u32)
    }

    /// Conditionally select (`flag` = 0 ⇒ *a*, `flag` = 1 ⇒ *b*).
    #[inline(always)]
    fn conditional_select(a: &[u32; LIMBS], b: &[u32; LIMBS], flag: Choice) -> Self {
        let mut out = [0u32; LIMBS];
        for i in 0..LIMBS {
            out[i] = u32::conditional_select(&a[i], &b[i], flag);
        }
        FieldElement(out)
    }
}

/* ========================================================================== */
/*  secp256k1 reduction                                                       */
/* ========================================================================== */

impl FieldElement {
    /// Schoolbook 8×8 → 16 limb multiplication.
    #[inline(always)]
    pub(crate) fn mul_wide(a: &[u32; LIMBS], b: &[u32; LIMBS]) -> [u32; 2 * LIMBS] {
        let mut t = [0u64; 2 * LIMBS];
        for i in 0..LIMBS {
            let mut carry = 0u64;
            for j in 0..LIMBS {
                let v = t[i + j] + a[i] as u64 * b[j] as u64 + carry;
                t[i + j] = v & 0xFFFF_FFFF;
                carry = v >> 32;
            }
            t[i + LIMBS] = carry;
        }
        let mut out = [0u32; 2 * LIMBS];
        for i in 0..2 * LIMBS {
            out[i] = t[i] as u32;
        }
        out
    }

    /// Reduce a 16-limb value modulo p.  Runs a fixed number of folds so the
    /// operation count does not depend on the value.
    fn reduce_wide(t: [u32; 2 * LIMBS]) -> Self {
        // Fold 1: lo + hi·(2³² + 977).  Each accumulator stays below 2⁴³.
        let mut acc = [0u64; LIMBS + 2];
        for i in 0..LIMBS {
            acc[i] = t[i] as u64;
        }
        for i in 0..LIMBS {
            let h = t[LIMBS + i] as u64;
            acc[i] += h * 977;
            acc[i + 1] += h;
        }
        let mut wide = [0u32; LIMBS + 2];
        let mut carry = 0u64;
        for i in 0..LIMBS + 2 {
            let v = acc[i] + carry;
            wide[i] = v as u32;
            carry = v >> 32;
        }
        debug_assert_eq!(carry, 0);

        // Fold 2: the at-most-34-bit overflow above 2²⁵⁶.
        let h2 = wide[LIMBS] as u64 | ((wide[LIMBS + 1] as u64) << 32);
        let mut acc2 = [0u64; LIMBS];
        for i in 0..LIMBS {
            acc2[i] = wide[i] as u64;
        }
        acc2[0] += h2 * 977;
        acc2[1] += h2;
        let mut limbs = [0u32; LIMBS];
        let mut carry = 0u64;
        for (i, l) in limbs.iter_mut().enumerate() {
            let v = acc2[i] + carry;
            *l = v as u32;
            carry = v >> 32;
        }

        // Fold 3: a possible final carry bit; cannot overflow again because
        // the low half is tiny whenever the carry is set.
        let mut acc3 = [0u64; LIMBS];
        for i in 0..LIMBS {
            acc3[i] = limbs[i] as u64;
        }
        acc3[0] += carry * 977;
        acc3[1] += carry;
        let mut limbs = [0u32; LIMBS];
        let mut carry = 0u64;
        for (i, l) in limbs.iter_mut().enumerate() {
            let v = acc3[i] + carry;
            *l = v as u32;
            carry = v >> 32;
        }
        debug_assert_eq!(carry, 0);

        // Final conditional subtraction of the modulus.
        let (sub, borrow) = Self::sbb_n(limbs, Self::MOD_LIMBS);
        Self::conditional_select(&limbs, &sub, Choice::from((borrow ^ 1) as u8))
    }
}

/* ========================================================================== */
/*  Public API: add / sub / mul / square / invert / sqrt                      */
/* ========================================================================== */

impl FieldElement {
    /// Constant-time addition modulo p
    pub fn add(&self, other: &Self) -> Self {
        let (sum, carry) = Self::adc_n(self.0, other.0);
        // If there was a carry OR the sum ≥ p  ⇒ subtract once.
        let (sub, borrow) = Self::sbb_n(sum, Self::MOD_LIMBS);
        let need_sub = Choice::from(((carry | (borrow ^ 1)) & 1) as u8);
        Self::conditional_select(&sum, &sub, need_sub)
    }

    /// Constant-time subtraction modulo p
    pub fn sub(&self, other: &Self) -> Self {
        let (diff, borrow) = Self::sbb_n(self.0, other.0);
        // If we borrowed ⇒ add p back.
        let (sum, _) = Self::adc_n(diff, Self::MOD_LIMBS);
        Self::conditional_select(&diff, &sum, Choice::from(borrow as u8))
    }

    /// Doubling: self + self
    #[inline(always)]
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Additive inverse: p − self (zero maps to zero)
    pub fn negate(&self) -> Self {
        let (neg, _) = Self::sbb_n(Self::MOD_LIMBS, self.0);
        let zero = [0u32; LIMBS];
        Self::conditional_select(&neg, &zero, Choice::from(self.is_zero() as u8))
    }

    /// Field multiplication: schoolbook multiply + fold reduction.
    pub fn mul(&self, other: &Self) -> Self {
        Self::reduce_wide(Self::mul_wide(&self.0, &other.0))
    }

    /// Field squaring – a specialised multiplication.
    #[inline(always)]
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Raise to the power 2ᵏ by k successive squarings.
    pub fn pow2(&self, k: usize) -> Self {
        let mut r = self.clone();
        for _ in 0..k {
            r = r.square();
        }
        r
    }

    /// The shared x²…x²²³ ladder used by both `invert` and `sqrt`.
    ///
    /// Returns (x2, x3, x22, x223) where xN is self raised to the exponent
    /// of N consecutive 1-bits.
    fn pow_ladder(&self) -> (Self, Self, Self, Self) {
        let x2 = self.pow2(1).mul(self);
        let x3 = x2.pow2(1).mul(self);
        let x6 = x3.pow2(3).mul(&x3);
        let x9 = x6.pow2(3).mul(&x3);
        let x11 = x9.pow2(2).mul(&x2);
        let x22 = x11.pow2(11).mul(&x11);
        let x44 = x22.pow2(22).mul(&x22);
        let x88 = x44.pow2(44).mul(&x44);
        let x176 = x88.pow2(88).mul(&x88);
        let x220 = x176.pow2(44).mul(&x44);
        let x223 = x220.pow2(3).mul(&x3);
        (x2, x3, x22, x223)
    }

    /// Multiplicative inverse via the fixed p − 2 addition chain.
    ///
    /// p − 2 is 223 ones, a zero, 22 ones, then the tail 0…10 1101; the chain
    /// follows those runs exactly, so the work is independent of the input.
    pub fn invert(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::param("FieldElement", "Inverse of zero"));
        }
        let (x2, _x3, x22, x223) = self.pow_ladder();
        let t = x223.pow2(23).mul(&x22);
        let t = t.pow2(5).mul(self);
        let t = t.pow2(3).mul(&x2);
        Ok(t.pow2(2).mul(self))
    }

    /// Square root via self^((p+1)/4), p ≡ 3 (mod 4).
    ///
    /// Returns one of the two roots (the caller picks the sign), or `None`
    /// when self is a non-residue.
    pub fn sqrt(&self) -> Option<Self> {
        let (x2, _x3, x22, x223) = self.pow_ladder();
        let t = x223.pow2(23).mul(&x22);
        let t = t.pow2(6).mul(&x2);
        let root = t.pow2(2);
        if root.square() == *self {
            Some(root)
        } else {
            None
        }
    }

    /// Batch inversion by Montgomery's trick: one field inversion for the
    /// whole slice.  Zeros pass through unchanged.
    pub fn invert_batch(values: &[Self]) -> Vec<Self> {
        let mut scratch = vec![Self::zero(); values.len()];
        let mut acc = Self::one();
        for (i, v) in values.iter().enumerate() {
            if v.is_zero() {
                continue;
            }
            scratch[i] = acc.clone();
            acc = acc.mul(v);
        }
        let mut inv = acc
            .invert()
            .expect("product of nonzero field elements is nonzero");
        let mut out = values.to_vec();
        for i in (0..values.len()).rev() {
            if values[i].is_zero() {
                continue;
            }
            out[i] = scratch[i].mul(&inv);
            inv = inv.mul(&values[i]);
        }
        out
    }
}

// FOLD documents the identity the two-word fold relies on; keep the named
// constant in sync with the literal 977 / limb-shift pair used above.
const _: () = assert!(FOLD == (1u64 << 32) + 977);
