//! Low-degree univariate polynomials exchanged in sum-check rounds
//!
//! A [`Poly<F, N>`] stores the evaluations `t[k] = p(k)` of a polynomial of
//! degree below `N` at the integer points `0..N`. Products of such
//! polynomials are computed pointwise on the same nodes, so a round message
//! is built by extending each linear factor to `N` points and multiplying.

use ark_ff::Field;
use std::ops::{Add, AddAssign, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poly<F: Field, const N: usize> {
    pub t: [F; N],
}

impl<F: Field, const N: usize> Default for Poly<F, N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<F: Field, const N: usize> Poly<F, N> {
    pub fn zero() -> Self {
        Self { t: [F::zero(); N] }
    }

    pub fn new(t: [F; N]) -> Self {
        Self { t }
    }

    /// Extend the linear polynomial with `p(0) = f[0]`, `p(1) = f[1]` to
    /// all `N` nodes.
    pub fn extend(f: [F; 2]) -> Self {
        let mut t = [F::zero(); N];
        let d = f[1] - f[0];
        t[0] = f[0];
        for i in 1..N {
            t[i] = t[i - 1] + d;
        }
        Self { t }
    }

    pub fn mul_scalar(&self, k: F) -> Self {
        let mut r = *self;
        r.t.iter_mut().for_each(|x| *x *= k);
        r
    }

    /// Convert evaluations at `0..N` to Newton divided differences in place.
    pub fn newton_of_lagrange(&mut self) {
        for i in 1..N {
            let inv = F::one() / F::from(i as u64);
            for k in (i..N).rev() {
                self.t[k] = (self.t[k] - self.t[k - 1]) * inv;
            }
        }
    }

    /// Evaluate a polynomial held in Newton form on nodes `0..N`.
    pub fn eval_newton(&self, x: F) -> F {
        let mut e = self.t[N - 1];
        for i in (0..N - 1).rev() {
            e = e * (x - F::from(i as u64)) + self.t[i];
        }
        e
    }

    /// Evaluate a polynomial held as evaluations at `0..N`.
    pub fn eval_lagrange(&self, x: F) -> F {
        let mut newton = *self;
        newton.newton_of_lagrange();
        newton.eval_newton(x)
    }

    /// Evaluate `Σ t[k] x^k`.
    pub fn eval_monomial(&self, x: F) -> F {
        self.t.iter().rev().fold(F::zero(), |e, c| e * x + c)
    }
}

impl<F: Field, const N: usize> Add for Poly<F, N> {
    type Output = Self;
    fn add(mut self, y: Self) -> Self {
        self += y;
        self
    }
}

impl<F: Field, const N: usize> AddAssign for Poly<F, N> {
    fn add_assign(&mut self, y: Self) {
        for (a, b) in self.t.iter_mut().zip(y.t) {
            *a += b;
        }
    }
}

impl<F: Field, const N: usize> Sub for Poly<F, N> {
    type Output = Self;
    fn sub(mut self, y: Self) -> Self {
        for (a, b) in self.t.iter_mut().zip(y.t) {
            *a -= b;
        }
        self
    }
}

impl<F: Field, const N: usize> Mul for Poly<F, N> {
    type Output = Self;
    fn mul(mut self, y: Self) -> Self {
        for (a, b) in self.t.iter_mut().zip(y.t) {
            *a *= b;
        }
        self
    }
}

/// Lagrange coefficients on the nodes `0..N` at an arbitrary point.
///
/// `coef(x)[k]` is the weight of `t[k]` in `p(x)`, so that
/// `p(x) = Σ_k coef(x)[k] · t[k]` is linear in the committed evaluations.
pub struct DotInterpolation<F: Field, const N: usize> {
    newton: [Poly<F, N>; N],
}

impl<F: Field, const N: usize> Default for DotInterpolation<F, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Field, const N: usize> DotInterpolation<F, N> {
    pub fn new() -> Self {
        let newton = std::array::from_fn(|k| {
            let mut row = Poly::<F, N>::zero();
            row.t[k] = F::one();
            row.newton_of_lagrange();
            row
        });
        Self { newton }
    }

    pub fn coef(&self, x: F) -> [F; N] {
        std::array::from_fn(|k| self.newton[k].eval_newton(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Bls12381Fr as Fr;
    use ark_ff::{One, Zero};
    use ark_std::{test_rng, UniformRand};

    fn random_coeffs<const N: usize>() -> Poly<Fr, N> {
        let mut rng = test_rng();
        Poly::new(std::array::from_fn(|_| Fr::rand(&mut rng)))
    }

    fn from_coeffs<const N: usize>(c: &Poly<Fr, N>) -> Poly<Fr, N> {
        Poly::new(std::array::from_fn(|k| c.eval_monomial(Fr::from(k as u64))))
    }

    #[test]
    fn test_eval_lagrange_matches_monomial() {
        let mut rng = test_rng();
        let c = random_coeffs::<4>();
        let p = from_coeffs(&c);
        for _ in 0..10 {
            let x = Fr::rand(&mut rng);
            assert_eq!(p.eval_lagrange(x), c.eval_monomial(x));
        }
        // on the nodes the evaluation is the stored value
        for k in 0..4 {
            assert_eq!(p.eval_lagrange(Fr::from(k as u64)), p.t[k]);
        }
    }

    #[test]
    fn test_extend_is_linear() {
        let p = Poly::<Fr, 3>::extend([Fr::from(5u64), Fr::from(7u64)]);
        assert_eq!(p.t, [Fr::from(5u64), Fr::from(7u64), Fr::from(9u64)]);
    }

    #[test]
    fn test_product_of_extensions() {
        let mut rng = test_rng();
        let a = [Fr::rand(&mut rng), Fr::rand(&mut rng)];
        let b = [Fr::rand(&mut rng), Fr::rand(&mut rng)];
        let p = Poly::<Fr, 3>::extend(a) * Poly::<Fr, 3>::extend(b);
        let x = Fr::rand(&mut rng);
        let la = a[0] + x * (a[1] - a[0]);
        let lb = b[0] + x * (b[1] - b[0]);
        assert_eq!(p.eval_lagrange(x), la * lb);
    }

    #[test]
    fn test_arithmetic() {
        let a = Poly::<Fr, 2>::new([Fr::from(2u64), Fr::from(3u64)]);
        let b = Poly::<Fr, 2>::new([Fr::from(5u64), Fr::from(1u64)]);
        assert_eq!((a + b).t, [Fr::from(7u64), Fr::from(4u64)]);
        assert_eq!((a - b).t, [-Fr::from(3u64), Fr::from(2u64)]);
        assert_eq!((a * b).t, [Fr::from(10u64), Fr::from(3u64)]);
        assert_eq!(a.mul_scalar(Fr::from(2u64)).t, [Fr::from(4u64), Fr::from(6u64)]);
    }

    #[test]
    fn test_dot_interpolation() {
        let mut rng = test_rng();
        let dot = DotInterpolation::<Fr, 3>::new();
        let p = from_coeffs(&random_coeffs::<3>());
        let x = Fr::rand(&mut rng);
        let lag = dot.coef(x);
        let got = lag.iter().zip(&p.t).fold(Fr::zero(), |s, (l, t)| s + *l * t);
        assert_eq!(got, p.eval_lagrange(x));
        // the weights of a partition of unity
        assert_eq!(lag.iter().fold(Fr::zero(), |s, l| s + l), Fr::one());
    }
}
