//! Shared constants and byte/limb conversions for secp256k1

/// Size of a field element in bytes (32 bytes = 256 bits)
pub const FIELD_ELEMENT_SIZE: usize = 32;

/// Size of a scalar in bytes (32 bytes = 256 bits)
pub const SCALAR_SIZE: usize = 32;

/// Number of 32-bit limbs in a field element or scalar
pub const LIMBS: usize = 8;

/// Size of a compressed point: format byte (0x02/0x03) + x-coordinate
pub const POINT_COMPRESSED_SIZE: usize = 1 + FIELD_ELEMENT_SIZE; // 33 bytes

/// Size of an uncompressed point: format byte (0x04) + x + y
pub const POINT_UNCOMPRESSED_SIZE: usize = 1 + 2 * FIELD_ELEMENT_SIZE; // 65 bytes

/// Size of an x-only (BIP-340) public key: bare x-coordinate, even y implied
pub const POINT_X_ONLY_SIZE: usize = FIELD_ELEMENT_SIZE; // 32 bytes

/// Size of a compact ECDSA signature: r || s
pub const COMPACT_SIGNATURE_SIZE: usize = 2 * SCALAR_SIZE; // 64 bytes

/// Size of a BIP-340 Schnorr signature: r || s
pub const SCHNORR_SIGNATURE_SIZE: usize = 2 * SCALAR_SIZE; // 64 bytes

/// x-coordinate of the base point G (big-endian)
pub const GENERATOR_X: [u8; 32] = [
    0x79, 0xBE, 0x66, 0x7E, 0xF9, 0xDC, 0xBB, 0xAC, 0x55, 0xA0, 0x62, 0x95, 0xCE, 0x87, 0x0B,
    0x07, 0x02, 0x9B, 0xFC, 0xDB, 0x2D, 0xCE, 0x28, 0xD9, 0x59, 0xF2, 0x81, 0x5B, 0x16, 0xF8,
    0x17, 0x98,
];

/// y-coordinate of the base point G (big-endian)
pub const GENERATOR_Y: [u8; 32] = [
    0x48, 0x3A, 0xDA, 0x77, 0x26, 0xA3, 0xC4, 0x65, 0x5D, 0xA4, 0xFB, 0xFC, 0x0E, 0x11, 0x08,
    0xA8, 0xFD, 0x17, 0xB4, 0x48, 0xA6, 0x85, 0x54, 0x19, 0x9C, 0x47, 0xD0, 0x8F, 0xFB, 0x10,
    0xD4, 0xB8,
];

/// Convert a 32-byte big-endian value into little-endian 32-bit limbs.
#[inline]
pub(crate) fn bytes_to_limbs(bytes: &[u8; 32]) -> [u32; LIMBS] {
    let mut limbs = [0u32; LIMBS];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let off = (LIMBS - 1 - i) * 4;
        *limb = u32::from_be_bytes([bytes[off], bytes[off + 1], bytes[off + 2], bytes[off + 3]]);
    }
    limbs
}

/// Convert little-endian 32-bit limbs into a 32-byte big-endian value.
#[inline]
pub(crate) fn limbs_to_bytes(limbs: &[u32; LIMBS]) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    for (i, limb) in limbs.iter().enumerate() {
        let off = (LIMBS - 1 - i) * 4;
        bytes[off..off + 4].copy_from_slice(&limb.to_be_bytes());
    }
    bytes
}
