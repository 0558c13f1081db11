//! BLS12-381 scalar field implementation
//!
//! Wrapper around ark-bls12-381 scalar field (Fr), a 255-bit prime field
//! encoded in 32 little-endian bytes.

use super::ZkField;
pub use ark_bls12_381::Fr;

impl ZkField for Fr {
    const BYTES: usize = 32;
    const FIELD_ID: usize = 11;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{One, PrimeField, Zero};
    use ark_std::{test_rng, UniformRand};

    #[test]
    fn test_encoding_width() {
        let mut rng = test_rng();
        for _ in 0..100 {
            let a = Fr::rand(&mut rng);
            assert_eq!(a.to_bytes_field().len(), Fr::BYTES);
        }
        assert_eq!(Fr::SUBFIELD_BYTES, Fr::BYTES);
    }

    #[test]
    fn test_encoding_round_trip() {
        let mut rng = test_rng();
        for _ in 0..100 {
            let a = Fr::rand(&mut rng);
            let bytes = a.to_bytes_field();
            assert_eq!(Fr::from_bytes_field(&bytes), Some(a));
            assert_eq!(Fr::from_bytes_subfield(&bytes), Some(a));
        }
    }

    #[test]
    fn test_small_values_little_endian() {
        let bytes = Fr::from(0x0102u64).to_bytes_field();
        assert_eq!(bytes[0], 0x02);
        assert_eq!(bytes[1], 0x01);
        assert!(bytes[2..].iter().all(|&b| b == 0));
        assert_eq!(Fr::zero().to_bytes_field(), vec![0u8; 32]);
    }

    #[test]
    fn test_rejects_non_canonical() {
        // all-ones is larger than the modulus
        assert_eq!(Fr::from_bytes_field(&[0xffu8; 32]), None);

        // the modulus itself is not a canonical encoding
        let mut modulus = ark_ff::BigInteger::to_bytes_le(&Fr::MODULUS);
        modulus.resize(32, 0);
        assert_eq!(Fr::from_bytes_field(&modulus), None);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert_eq!(Fr::from_bytes_field(&[0u8; 31]), None);
        assert_eq!(Fr::from_bytes_field(&[0u8; 33]), None);
    }

    #[test]
    fn test_minus_one_is_largest() {
        let m1 = -Fr::one();
        let bytes = m1.to_bytes_field();
        assert_eq!(Fr::from_bytes_field(&bytes), Some(m1));
        assert_eq!(m1 + Fr::one(), Fr::zero());
    }

    #[test]
    fn test_top_byte_mask() {
        // 255-bit modulus leaves exactly one spare bit in 32 bytes
        assert_eq!(Fr::MODULUS_BIT_SIZE, 255);
        assert_eq!(Fr::top_byte_mask(), 0x7f);
    }

    #[test]
    fn test_subfield_is_whole_field() {
        let mut rng = test_rng();
        for _ in 0..20 {
            assert!(Fr::rand(&mut rng).in_subfield());
        }
    }
}
