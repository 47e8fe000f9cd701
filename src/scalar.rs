//! Scalar arithmetic modulo the secp256k1 group order n

use crate::constants::{bytes_to_limbs, limbs_to_bytes, LIMBS, SCALAR_SIZE};
use crate::error::{Error, Result};
use crate::field::FieldElement;
use subtle::Choice;
use zeroize::Zeroize;

/// 2²⁵⁶ − n: the little-endian fold constant for wide reduction (129 bits).
const FOLD: [u32; 5] = [0x2FC9_BEBF, 0x402D_A173, 0x50B7_5FC4, 0x4551_2319, 0x0000_0001];

/// secp256k1 scalar in [0, n); private keys, nonces and signature halves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scalar(pub(crate) [u32; LIMBS]);

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Scalar {
    /// n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
    /// (little-endian limbs).
    pub(crate) const ORDER_LIMBS: [u32; LIMBS] = [
        0xD036_4141, 0xBFD2_5E8C, 0xAF48_A03B, 0xBAAE_DCE6,
        0xFFFF_FFFE, 0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF,
    ];

    /// ⌊n/2⌋, the low-s threshold (little-endian limbs).
    const ORDER_HALF_LIMBS: [u32; LIMBS] = [
        0x681B_20A0, 0xDFE9_2F46, 0x57A4_501D, 0x5D57_6E73,
        0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF, 0x7FFF_FFFF,
    ];

    /// n − 2, the fixed Fermat-inversion exponent (little-endian limbs).
    const ORDER_MINUS_2_LIMBS: [u32; LIMBS] = [
        0xD036_413F, 0xBFD2_5E8C, 0xAF48_A03B, 0xBAAE_DCE6,
        0xFFFF_FFFE, 0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF,
    ];

    /// The zero scalar.
    #[inline]
    pub fn zero() -> Self {
        Scalar([0u32; LIMBS])
    }

    /// The scalar 1.
    #[inline]
    pub fn one() -> Self {
        Scalar([1, 0, 0, 0, 0, 0, 0, 0])
    }

    /// Create a scalar from big-endian bytes, rejecting values >= n.
    pub fn from_bytes(bytes: &[u8; SCALAR_SIZE]) -> Result<Self> {
        let s = Scalar(bytes_to_limbs(bytes));
        if !s.is_valid() {
            return Err(Error::param("Scalar", "Value >= group order"));
        }
        Ok(s)
    }

    /// Create a scalar from big-endian bytes, reducing modulo n.
    ///
    /// Used for message hashes and tagged-hash outputs, which are allowed to
    /// exceed the order and wrap.
    pub fn from_bytes_reduced(bytes: &[u8; SCALAR_SIZE]) -> Self {
        let limbs = bytes_to_limbs(bytes);
        // A 256-bit value is below 2n, so one conditional subtract suffices.
        let (sub, borrow) = FieldElement::sbb_n(limbs, Self::ORDER_LIMBS);
        Self::select(&limbs, &sub, Choice::from((borrow ^ 1) as u8))
    }

    /// Serialize to big-endian bytes.
    pub fn to_bytes(&self) -> [u8; SCALAR_SIZE] {
        limbs_to_bytes(&self.0)
    }

    /// Check if this scalar is zero.
    #[inline(always)]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    /// self > n/2 ?  (the malleable half of the s range)
    pub fn is_high(&self) -> bool {
        let (_, borrow) = FieldElement::sbb_n(Self::ORDER_HALF_LIMBS, self.0);
        borrow == 1
    }

    /// self < n ?   (constant-time)
    #[inline(always)]
    fn is_valid(&self) -> bool {
        let (_, borrow) = FieldElement::sbb_n(self.0, Self::ORDER_LIMBS);
        borrow == 1
    }

    /// Bit i (little-endian), for the public-input double-and-add ladder.
    #[inline(always)]
    pub(crate) fn bit(&self, i: usize) -> bool {
        (self.0[i / 32] >> (i % 32)) & 1 == 1
    }

    #[inline(always)]
    fn select(a: &[u32; LIMBS], b: &[u32; LIMBS], flag: Choice) -> Self {
        use subtle::ConditionallySelectable;
        let mut out = [0u32; LIMBS];
        for i in 0..LIMBS {
            out[i] = u32::conditional_select(&a[i], &b[i], flag);
        }
        Scalar(out)
    }
}

/* ========================================================================== */
/*  Modular arithmetic                                                        */
/* ========================================================================== */

impl Scalar {
    /// Constant-time addition modulo n
    pub fn add(&self, other: &Self) -> Self {
        let (sum, carry) = FieldElement::adc_n(self.0, other.0);
        let (sub, borrow) = FieldElement::sbb_n(sum, Self::ORDER_LIMBS);
        let need_sub = Choice::from(((carry | (borrow ^ 1)) & 1) as u8);
        Self::select(&sum, &sub, need_sub)
    }

    /// Additive inverse: n − self (zero maps to zero)
    pub fn negate(&self) -> Self {
        let (neg, _) = FieldElement::sbb_n(Self::ORDER_LIMBS, self.0);
        let zero = [0u32; LIMBS];
        Self::select(&neg, &zero, Choice::from(self.is_zero() as u8))
    }

    /// Modular multiplication: schoolbook multiply + fold reduction.
    pub fn mul(&self, other: &Self) -> Self {
        Self::reduce_wide(FieldElement::mul_wide(&self.0, &other.0))
    }

    /// Squaring helper for the inversion ladder.
    #[inline(always)]
    fn square(&self) -> Self {
        self.mul(self)
    }

    /// Multiplicative inverse via Fermat's little theorem: self^(n−2).
    ///
    /// The exponent is a fixed public constant, so the square-and-multiply
    /// pattern leaks nothing about the input.
    pub fn invert(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::param("Scalar", "Inverse of zero"));
        }
        let mut result = Scalar::one();
        let mut base = self.clone();
        for i in 0..256 {
            if (Self::ORDER_MINUS_2_LIMBS[i / 32] >> (i % 32)) & 1 == 1 {
                result = result.mul(&base);
            }
            base = base.square();
        }
        Ok(result)
    }

    /// Reduce a 16-limb product modulo n with a fixed number of folds of
    /// hi·(2²⁵⁶ − n) back into the low half.
    fn reduce_wide(t: [u32; 2 * LIMBS]) -> Self {
        let mut buf = t;
        // Bit-size drops 512 → 386 → 260 → 257 → 256; four folds always land
        // below 2²⁵⁶.
        for _ in 0..4 {
            buf = Self::fold_once(buf);
        }
        let mut low = [0u32; LIMBS];
        low.copy_from_slice(&buf[..LIMBS]);
        let (sub, borrow) = FieldElement::sbb_n(low, Self::ORDER_LIMBS);
        Self::select(&low, &sub, Choice::from((borrow ^ 1) as u8))
    }

    /// One fold: value = lo + hi·(2²⁵⁶ − n).
    fn fold_once(t: [u32; 2 * LIMBS]) -> [u32; 2 * LIMBS] {
        // hi (8 limbs) × fold constant (5 limbs) → 13 limbs
        let mut prod = [0u64; 13];
        for i in 0..LIMBS {
            let mut carry = 0u64;
            for (j, &c) in FOLD.iter().enumerate() {
                let v = prod[i + j] + t[LIMBS + i] as u64 * c as u64 + carry;
                prod[i + j] = v & 0xFFFF_FFFF;
                carry = v >> 32;
            }
            prod[i + FOLD.len()] += carry;
        }
        // + lo (8 limbs); the sum stays within 13 limbs
        let mut out = [0u32; 2 * LIMBS];
        let mut carry = 0u64;
        for i in 0..13 {
            let lo = if i < LIMBS { t[i] as u64 } else { 0 };
            let v = prod[i] + lo + carry;
            out[i] = v as u32;
            carry = v >> 32;
        }
        debug_assert_eq!(carry, 0);
        out
    }
}

/// Conversion for Schnorr challenge plumbing, where an x-coordinate is
/// reinterpreted modulo n.
impl Scalar {
    /// Reinterpret a field element's canonical bytes as a scalar mod n.
    pub(crate) fn from_field_bytes_reduced(fe: &FieldElement) -> Self {
        Self::from_bytes_reduced(&fe.to_bytes())
    }
}
