//! ASN.1 DER codec for ECDSA signatures
//!
//! A signature is `30 len 02 rlen r 02 slen s`.  Integers are big-endian and
//! minimal: no leading 0x00 unless the next byte has its MSB set, in which
//! case exactly one pad byte is required to keep the value non-negative.
//! The parser rejects anything non-minimal, mis-tagged or trailing.

use crate::error::{Error, Result};
use crate::scalar::Scalar;

/// Shortest possible signature: both integers one byte.
const MIN_SIG_LEN: usize = 8;
/// Longest possible signature: both integers 32 bytes plus a pad byte each.
const MAX_SIG_LEN: usize = 72;

/// Encode (r, s) as a DER SEQUENCE of two INTEGERs.
pub fn encode(r: &Scalar, s: &Scalar) -> Vec<u8> {
    let r_der = encode_integer(&r.to_bytes());
    let s_der = encode_integer(&s.to_bytes());
    let mut out = Vec::with_capacity(2 + r_der.len() + s_der.len());
    out.push(0x30);
    out.push((r_der.len() + s_der.len()) as u8);
    out.extend_from_slice(&r_der);
    out.extend_from_slice(&s_der);
    out
}

/// Parse a DER signature into its (r, s) scalars.
pub fn decode(bytes: &[u8]) -> Result<(Scalar, Scalar)> {
    if bytes.len() < MIN_SIG_LEN {
        return Err(Error::Length {
            context: "DER signature",
            expected: MIN_SIG_LEN,
            actual: bytes.len(),
        });
    }
    if bytes.len() > MAX_SIG_LEN {
        return Err(Error::Length {
            context: "DER signature",
            expected: MAX_SIG_LEN,
            actual: bytes.len(),
        });
    }
    if bytes[0] != 0x30 {
        return Err(Error::param("DER signature", "Expected SEQUENCE tag"));
    }
    if bytes[1] as usize != bytes.len() - 2 {
        return Err(Error::param("DER signature", "SEQUENCE length mismatch"));
    }
    let (r, rest) = parse_integer(&bytes[2..])?;
    let (s, rest) = parse_integer(rest)?;
    if !rest.is_empty() {
        return Err(Error::param("DER signature", "Trailing bytes after s"));
    }
    Ok((r, s))
}

fn encode_integer(bytes: &[u8; 32]) -> Vec<u8> {
    // Strip leading zero bytes but keep at least one digit.
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(31);
    let body = &bytes[start..];
    let pad = body[0] & 0x80 != 0;
    let mut out = Vec::with_capacity(2 + body.len() + pad as usize);
    out.push(0x02);
    out.push((body.len() + pad as usize) as u8);
    if pad {
        out.push(0x00);
    }
    out.extend_from_slice(body);
    out
}

fn parse_integer(input: &[u8]) -> Result<(Scalar, &[u8])> {
    // Tag, length and at least one payload byte.
    if input.len() < 3 {
        return Err(Error::Length {
            context: "DER integer",
            expected: 3,
            actual: input.len(),
        });
    }
    if input[0] != 0x02 {
        return Err(Error::param("DER integer", "Expected INTEGER tag"));
    }
    let len = input[1] as usize;
    if len == 0 {
        return Err(Error::param("DER integer", "Empty integer"));
    }
    if len > input.len() - 2 {
        return Err(Error::param("DER integer", "Integer length exceeds input"));
    }
    let body = &input[2..2 + len];
    if body[0] & 0x80 != 0 {
        return Err(Error::param("DER integer", "Negative integer"));
    }
    if len > 1 && body[0] == 0x00 && body[1] & 0x80 == 0 {
        return Err(Error::param("DER integer", "Non-minimal integer encoding"));
    }
    // Strip the single sign pad byte if present.
    let digits = if body[0] == 0x00 { &body[1..] } else { body };
    if digits.len() > 32 {
        return Err(Error::param("DER integer", "Integer wider than 256 bits"));
    }
    let mut padded = [0u8; 32];
    padded[32 - digits.len()..].copy_from_slice(digits);
    Ok((Scalar::from_bytes(&padded)?, &input[2 + len..]))
}
