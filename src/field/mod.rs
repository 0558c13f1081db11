//! Finite field capability consumed by the proof engine
//!
//! Every component is generic over [`ZkField`], a prime field with a
//! canonical fixed-width little-endian encoding. The BLS12-381 scalar
//! field is the concrete instance shipped with the crate.

pub mod bls12_381;

pub use ark_bls12_381::Fr as Bls12381Fr;
pub use ark_ff::PrimeField;

use ark_ff::BigInteger;

/// Trait representing a finite field suitable for the proof engine
pub trait ZkField: PrimeField {
    /// Width of the canonical encoding of a field element.
    const BYTES: usize;

    /// Width of the encoding of a subfield element.
    const SUBFIELD_BYTES: usize = Self::BYTES;

    /// Tag identifying the field in serialized circuits.
    const FIELD_ID: usize;

    /// Append the canonical little-endian encoding to `out`.
    fn write_bytes_field(&self, out: &mut Vec<u8>) {
        let mut bytes = self.into_bigint().to_bytes_le();
        bytes.resize(Self::BYTES, 0);
        out.extend_from_slice(&bytes);
    }

    fn to_bytes_field(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::BYTES);
        self.write_bytes_field(&mut out);
        out
    }

    /// Decode a canonical encoding; `None` for a wrong length or a value
    /// not reduced modulo the field order.
    fn from_bytes_field(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::BYTES {
            return None;
        }
        Self::deserialize_compressed(bytes).ok()
    }

    /// Whether the element lies in the declared subfield. A prime field is
    /// its own only subfield.
    fn in_subfield(&self) -> bool {
        true
    }

    fn write_bytes_subfield(&self, out: &mut Vec<u8>) {
        self.write_bytes_field(out)
    }

    fn from_bytes_subfield(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes_field(bytes)
    }

    /// Mask applied to the most significant byte of a random candidate
    /// so that sampling only proposes values below `2^MODULUS_BIT_SIZE`.
    fn top_byte_mask() -> u8 {
        let excess = (8 * Self::BYTES as u32).saturating_sub(Self::MODULUS_BIT_SIZE);
        if excess >= 8 {
            0
        } else {
            0xffu8 >> excess
        }
    }
}
