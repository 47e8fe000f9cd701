//! Scalar multiplication: fixed-pattern wNAF with GLV endomorphism split
//!
//! Secret scalars take a two-stage route.  The scalar is first split into two
//! ~128-bit halves with the curve's cube-root-of-unity endomorphism
//! λ·(x, y) = (β·x, y), then each half is walked in w-ary non-adjacent form.
//! Every window performs exactly one table addition: nonzero digits go into
//! the real accumulator, zero digits add a parity-selected table entry to a
//! throwaway accumulator, so the addition pattern is independent of the
//! scalar.  Both accumulators are batch-normalized at the end and only the
//! real one is returned.
//!
//! The base point keeps a process-wide window-8 table (2176 entries,
//! normalized to Z = 1), installed atomically on first use.  Arbitrary bases
//! get a per-call window-1 table.

use crate::field::FieldElement;
use crate::point::{AffinePoint, ProjectivePoint};
use crate::scalar::Scalar;
use std::sync::OnceLock;

/// β: a primitive cube root of unity in Fₚ; (β·x, y) = λ·(x, y).
const BETA: FieldElement = FieldElement([
    0x7195_01EE, 0xC139_6C28, 0x12F5_8995, 0x9CF0_4975,
    0xAC34_34E9, 0x6E64_479E, 0x657C_0710, 0x7AE9_6A2B,
]);

/// λ: the scalar matching β, λ³ ≡ 1 (mod n).
const LAMBDA: Scalar = Scalar([
    0x1B23_BD72, 0xDF02_967C, 0x2081_6678, 0x122E_22EA,
    0x8812_645A, 0xA526_1C02, 0xC05C_30E0, 0x5363_AD4C,
]);

/// −b1 of the GLV lattice basis (mod n).
const MINUS_B1: Scalar = Scalar([
    0x0ABF_E4C3, 0x6F54_7FA9, 0x010E_8828, 0xE443_7ED6,
    0x0000_0000, 0x0000_0000, 0x0000_0000, 0x0000_0000,
]);

/// −b2 of the GLV lattice basis (mod n).
const MINUS_B2: Scalar = Scalar([
    0x3DB1_562C, 0xD765_CDA8, 0x0774_346D, 0x8A28_0AC5,
    0xFFFF_FFFE, 0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF,
]);

/// Rounding divisor g1 ≈ b2·2³⁸⁴/n for the first split coefficient.
const G1: [u32; 8] = [
    0x45DB_B031, 0xE893_209A, 0x71E8_CA7F, 0x3DAA_8A14,
    0x9284_EB15, 0xE86C_90E4, 0xA7D4_6BCD, 0x3086_D221,
];

/// Rounding divisor g2 ≈ −b1·2³⁸⁴/n for the second split coefficient.
const G2: [u32; 8] = [
    0x8AC4_7F71, 0x1571_B4AE, 0x9DF5_06C6, 0x2212_08AC,
    0x0ABF_E4C4, 0x6F54_7FA9, 0x010E_8828, 0xE443_7ED6,
];

/// Window width for the cached base-point table.
const BASE_WINDOW: usize = 8;

/// Apply the endomorphism (X, Y, Z) ↦ (β·X, Y, Z).
fn endomorphism(p: &ProjectivePoint) -> ProjectivePoint {
    ProjectivePoint {
        x: p.x.mul(&BETA),
        y: p.y.clone(),
        z: p.z.clone(),
    }
}

/* ========================================================================== */
/*  GLV split                                                                 */
/* ========================================================================== */

/// round(k·g / 2³⁸⁴), the lattice rounding step.  The result always fits in
/// 128 bits for valid inputs.
fn mul_shift_384_round(k: &[u32; 8], g: &[u32; 8]) -> Scalar {
    let wide = FieldElement::mul_wide(k, g);
    let round_up = (wide[11] >> 31) & 1;
    let mut limbs = [0u32; 8];
    let mut carry = round_up as u64;
    for i in 0..4 {
        let v = wide[12 + i] as u64 + carry;
        limbs[i] = v as u32;
        carry = v >> 32;
    }
    debug_assert_eq!(carry, 0);
    Scalar(limbs)
}

/// Conditionally negate a residue into its short representative, recording
/// the sign.
fn scalar_abs(k: Scalar) -> (bool, Scalar) {
    if k.is_high() {
        (true, k.negate())
    } else {
        (false, k)
    }
}

fn fits_128_bits(k: &Scalar) -> bool {
    k.0[4..].iter().all(|&w| w == 0)
}

/// Split k into (sign1, |k1|, sign2, |k2|) with k ≡ k1 + k2·λ (mod n) and
/// both magnitudes below 2¹²⁸.
fn split_scalar(k: &Scalar) -> (bool, Scalar, bool, Scalar) {
    let c1 = mul_shift_384_round(&k.0, &G1);
    let c2 = mul_shift_384_round(&k.0, &G2);
    let k2 = c1.mul(&MINUS_B1).add(&c2.mul(&MINUS_B2));
    let k1 = k.add(&k2.mul(&LAMBDA).negate());

    let (k1_neg, k1_abs) = scalar_abs(k1);
    let (k2_neg, k2_abs) = scalar_abs(k2);
    // An oversized half cannot happen for a reduced scalar; it means the
    // lattice constants are wrong.
    assert!(
        fits_128_bits(&k1_abs) && fits_128_bits(&k2_abs),
        "endomorphism split produced an out-of-range half"
    );
    (k1_neg, k1_abs, k2_neg, k2_abs)
}

/* ========================================================================== */
/*  wNAF window walk                                                          */
/* ========================================================================== */

fn window_count(w: usize) -> usize {
    // Split halves are at most 2¹²⁸, plus one window for the wNAF carry.
    128 / w + 1
}

/// limbs >>= w, for 1 <= w < 32.
fn shr_limbs(limbs: &mut [u32; 8], w: usize) {
    for i in 0..7 {
        limbs[i] = (limbs[i] >> w) | (limbs[i + 1] << (32 - w));
    }
    limbs[7] >>= w;
}

fn add_one(limbs: &mut [u32; 8]) {
    for l in limbs.iter_mut() {
        let (v, overflow) = l.overflowing_add(1);
        *l = v;
        if !overflow {
            break;
        }
    }
}

/// Build the window table for `p`: per window, the multiples 1·B … 2^(w−1)·B
/// of that window's doubled base B.
fn precompute_window(p: &ProjectivePoint, w: usize) -> Vec<ProjectivePoint> {
    let windows = window_count(w);
    let window_size = 1usize << (w - 1);
    let mut points = Vec::with_capacity(windows * window_size);
    let mut wbase = p.clone();
    for _ in 0..windows {
        let mut acc = wbase.clone();
        points.push(acc.clone());
        for _ in 1..window_size {
            acc = acc.add(&wbase);
            points.push(acc.clone());
        }
        wbase = acc.double();
    }
    points
}

/// Walk one split half in signed windows against a precomputed table.
///
/// Returns the real accumulator and the fake one that soaked up the
/// zero-digit additions.
fn wnaf_walk(
    table: &[ProjectivePoint],
    w: usize,
    k_abs: &Scalar,
) -> (ProjectivePoint, ProjectivePoint) {
    let windows = window_count(w);
    let window_size = 1i64 << (w - 1);
    let mask = (1u32 << w) - 1;

    let mut limbs = k_abs.0;
    let mut real = ProjectivePoint::identity();
    let mut fake = ProjectivePoint::identity();

    for window in 0..windows {
        let offset = window * window_size as usize;
        // Signed digit in (−2^(w−1), 2^(w−1)]: borrow 2^w and carry upward.
        let mut wbits = (limbs[0] & mask) as i64;
        shr_limbs(&mut limbs, w);
        if wbits > window_size {
            wbits -= 1i64 << w;
            add_one(&mut limbs);
        }

        if wbits == 0 {
            let mut entry = table[offset].clone();
            if window % 2 == 1 {
                entry = entry.negate();
            }
            fake = fake.add(&entry);
        } else {
            let mut entry = table[offset + wbits.unsigned_abs() as usize - 1].clone();
            if wbits < 0 {
                entry = entry.negate();
            }
            real = real.add(&entry);
        }
    }
    debug_assert!(limbs.iter().all(|&l| l == 0));
    (real, fake)
}

/* ========================================================================== */
/*  Entry points                                                              */
/* ========================================================================== */

fn mul_with_table(table: &[ProjectivePoint], w: usize, scalar: &Scalar) -> AffinePoint {
    let (k1_neg, k1, k2_neg, k2) = split_scalar(scalar);

    let (mut k1p, f1) = wnaf_walk(table, w, &k1);
    let (mut k2p, f2) = wnaf_walk(table, w, &k2);
    if k1_neg {
        k1p = k1p.negate();
    }
    if k2_neg {
        k2p = k2p.negate();
    }
    let k2p = endomorphism(&k2p);

    let real = k1p.add(&k2p);
    let fake = f1.add(&f2);
    let mut normalized = ProjectivePoint::batch_to_affine(&[real, fake]);
    normalized.swap_remove(0)
}

/// Multiply an arbitrary base with the fixed-pattern ladder (window 1,
/// per-call table).
pub(crate) fn mul_point(point: &ProjectivePoint, scalar: &Scalar) -> AffinePoint {
    let table = precompute_window(point, 1);
    mul_with_table(&table, 1, scalar)
}

/// Multiply the base point G against the shared window-8 table.
pub(crate) fn mul_base(scalar: &Scalar) -> AffinePoint {
    mul_with_table(base_table(), BASE_WINDOW, scalar)
}

/// The cached, Z-normalized table for G.  Built once; concurrent initializers
/// compute equal tables and the first store wins.
fn base_table() -> &'static [ProjectivePoint] {
    static BASE_TABLE: OnceLock<Vec<ProjectivePoint>> = OnceLock::new();
    BASE_TABLE.get_or_init(|| {
        let raw = precompute_window(&ProjectivePoint::generator(), BASE_WINDOW);
        ProjectivePoint::batch_to_affine(&raw)
            .iter()
            .map(|p| p.to_projective())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_from_u64(v: u64) -> Scalar {
        Scalar([v as u32, (v >> 32) as u32, 0, 0, 0, 0, 0, 0])
    }

    #[test]
    fn split_recombines() {
        let samples = [
            scalar_from_u64(1),
            scalar_from_u64(0xDEAD_BEEF_0BAD_F00D),
            Scalar::from_bytes_reduced(&[0xAB; 32]),
            Scalar::from_bytes_reduced(&[0xFE; 32]),
        ];
        for k in &samples {
            let (k1_neg, k1, k2_neg, k2) = split_scalar(k);
            let k1_signed = if k1_neg { k1.negate() } else { k1 };
            let k2_signed = if k2_neg { k2.negate() } else { k2 };
            let recombined = k1_signed.add(&k2_signed.mul(&LAMBDA));
            assert_eq!(&recombined, k, "k1 + k2·λ must reproduce k");
        }
    }

    #[test]
    fn lambda_maps_to_beta() {
        // λ·G must equal (β·Gx, Gy).
        let g = ProjectivePoint::generator();
        let lambda_g = g.mul_vartime(&LAMBDA).to_affine();
        let mapped = endomorphism(&g).to_affine();
        assert_eq!(lambda_g, mapped, "endomorphism constants disagree");
    }

    #[test]
    fn windowed_matches_vartime() {
        let g = ProjectivePoint::generator();
        for v in [1u64, 2, 3, 0xFFFF_FFFF, 0x1234_5678_9ABC_DEF0] {
            let k = scalar_from_u64(v);
            let fast = mul_base(&k);
            let plain = g.mul_vartime(&k).to_affine();
            assert_eq!(fast, plain, "wNAF and double-and-add disagree for {}", v);
        }
        let k = Scalar::from_bytes_reduced(&[0x5A; 32]);
        assert_eq!(mul_base(&k), g.mul_vartime(&k).to_affine());
        assert_eq!(
            mul_point(&g, &k),
            g.mul_vartime(&k).to_affine(),
            "window-1 path disagrees"
        );
    }

    #[test]
    fn zero_scalar_yields_identity() {
        assert!(mul_base(&Scalar::zero()).is_identity());
        let p = ProjectivePoint::generator().double();
        assert!(mul_point(&p, &Scalar::zero()).is_identity());
        assert!(AffinePoint::generator().mul(&Scalar::zero()).is_identity());
    }
}
