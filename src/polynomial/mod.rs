//! Wire arrays, equality tables and Reed-Solomon extension
//!
//! Multilinear extensions here are indexed little-endian: variable `l`
//! selects bit `l` of an array index, so binding the first variable pairs
//! entries `2i` and `2i + 1`.

pub mod dense;
pub mod eq;
pub mod interpolation;

pub use dense::{Dense, DenseFiller};
pub use eq::{eq_eval, Eqs};
pub use interpolation::{Interpolator, InterpolatorFactory, ReedSolomon, ReedSolomonFactory};

use ark_ff::Field;

/// The linear polynomial through `(0, f0)` and `(1, f1)`, evaluated at `r`.
#[inline]
pub fn affine_interpolation<F: Field>(r: F, f0: F, f1: F) -> F {
    f0 + r * (f1 - f0)
}

/// [`affine_interpolation`] with `f0 = 0`.
#[inline]
pub fn affine_interpolation_z_nz<F: Field>(r: F, f1: F) -> F {
    f1 * r
}

/// [`affine_interpolation`] with `f1 = 0`.
#[inline]
pub fn affine_interpolation_nz_z<F: Field>(r: F, f0: F) -> F {
    f0 - f0 * r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Bls12381Fr as Fr;
    use ark_ff::Zero;
    use ark_std::{test_rng, UniformRand};

    #[test]
    fn test_affine_special_cases_agree() {
        let mut rng = test_rng();
        for _ in 0..20 {
            let r = Fr::rand(&mut rng);
            let f = Fr::rand(&mut rng);
            assert_eq!(affine_interpolation_z_nz(r, f), affine_interpolation(r, Fr::zero(), f));
            assert_eq!(affine_interpolation_nz_z(r, f), affine_interpolation(r, f, Fr::zero()));
        }
    }
}
