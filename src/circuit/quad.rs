//! Sparse bilinear form of one circuit layer
//!
//! A [`Quad`] is a list of corners `(g, h0, h1, v)`, each contributing
//! `v · W[h0] · W[h1]` to output gate `g`. A corner with `v == 0` is an
//! assertion that `W[h0] · W[h1]` vanishes.
//!
//! After [`Quad::canonicalize`], corners satisfy `h0 <= h1` and are sorted
//! by the Morton order of `(h0, h1)`, then by `g`, then by `v`, with equal
//! indices coalesced. Morton order keeps every pair of corners that differ
//! only in the low bit of one hand adjacent, for either hand, and binding
//! preserves the order, so [`Quad::bind_h`] can pair neighbours in one pass.

use crate::polynomial::{
    affine_interpolation, affine_interpolation_nz_z, affine_interpolation_z_nz, Eqs,
};
use crate::utils::morton_key;
use ark_ff::PrimeField;
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corner<F: PrimeField> {
    /// gate
    pub g: u32,
    /// hands
    pub h: [u32; 2],
    pub v: F,
}

impl<F: PrimeField> Corner<F> {
    pub fn new(g: u32, h0: u32, h1: u32, v: F) -> Self {
        Self { g, h: [h0, h1], v }
    }

    fn eq_index(&self, y: &Self) -> bool {
        self.g == y.g && self.h == y.h
    }

    fn canonicalize(&mut self) {
        if self.h[0] > self.h[1] {
            self.h.swap(0, 1);
        }
    }

    fn compare(x: &Self, y: &Self) -> Ordering {
        morton_key(x.h[0], x.h[1])
            .cmp(&morton_key(y.h[0], y.h[1]))
            .then(x.g.cmp(&y.g))
            .then_with(|| x.v.into_bigint().cmp(&y.v.into_bigint()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quad<F: PrimeField> {
    pub c: Vec<Corner<F>>,
}

impl<F: PrimeField> Quad<F> {
    pub fn new(c: Vec<Corner<F>>) -> Self {
        Self { c }
    }

    /// Number of corners.
    pub fn n(&self) -> usize {
        self.c.len()
    }

    pub fn canonicalize(&mut self) {
        self.c.iter_mut().for_each(Corner::canonicalize);
        self.c.sort_by(Corner::compare);
        self.coalesce();
    }

    /// Fix the low bit of hand `hand` to `r`, halving that dimension.
    pub fn bind_h(&mut self, r: F, hand: usize) {
        let ohand = 1 - hand;
        let n = self.c.len();
        let mut rd = 0;
        let mut wr = 0;
        while rd < n {
            let c0 = self.c[rd];
            let mut cc = Corner {
                g: 0,
                h: [0, 0],
                v: F::zero(),
            };
            cc.h[hand] = c0.h[hand] >> 1;
            cc.h[ohand] = c0.h[ohand];

            let paired = rd + 1 < n && {
                let c1 = &self.c[rd + 1];
                c0.h[ohand] == c1.h[ohand]
                    && (c0.h[hand] >> 1) == (c1.h[hand] >> 1)
                    && c1.h[hand] == c0.h[hand] + 1
            };

            if paired {
                cc.v = affine_interpolation(r, c0.v, self.c[rd + 1].v);
                rd += 2;
            } else {
                // the partner corner is zero
                cc.v = if c0.h[hand] & 1 == 0 {
                    affine_interpolation_nz_z(r, c0.v)
                } else {
                    affine_interpolation_z_nz(r, c0.v)
                };
                rd += 1;
            }

            self.c[wr] = cc;
            wr += 1;
        }
        self.c.truncate(wr);
    }

    /// Replace zero coefficients by `beta`, then bind the gate variable to
    /// `eq(G0, ·) + alpha · eq(G1, ·)`.
    pub fn bind_g(&mut self, logv: usize, g0: &[F], g1: &[F], alpha: F, beta: F) {
        let nv = 1usize << logv;
        let dot = Eqs::raw_eq2(logv, nv, g0, g1, alpha);
        for c in self.c.iter_mut() {
            if c.v.is_zero() {
                c.v = beta;
            }
            c.v *= dot[c.g as usize];
            c.g = 0;
        }
        self.coalesce();
    }

    /// `bind_g` followed by binding both hands completely, without
    /// modifying `self`.
    #[allow(clippy::too_many_arguments)]
    pub fn bind_gh_all(
        &self,
        logv: usize,
        g0: &[F],
        g1: &[F],
        alpha: F,
        beta: F,
        logw: usize,
        h0: &[F],
        h1: &[F],
    ) -> F {
        let nv = 1usize << logv;
        let eqg = Eqs::raw_eq2(logv, nv, g0, g1, alpha);

        let nw = 1usize << logw;
        let eqh0 = Eqs::new(logw, nw, h0);
        let eqh1 = Eqs::new(logw, nw, h1);

        self.c.iter().fold(F::zero(), |s, c| {
            let q = if c.v.is_zero() { beta } else { c.v };
            s + q * eqg[c.g as usize] * eqh0.at(c.h[0] as usize) * eqh1.at(c.h[1] as usize)
        })
    }

    /// The coefficient of a fully bound quad.
    pub fn scalar(&self) -> F {
        assert_eq!(self.c.len(), 1, "quad not fully bound");
        let c = &self.c[0];
        assert!(c.g == 0 && c.h == [0, 0], "quad not fully bound");
        c.v
    }

    fn coalesce(&mut self) {
        if self.c.is_empty() {
            return;
        }
        let mut wr = 1;
        for rd in 1..self.c.len() {
            if self.c[rd].eq_index(&self.c[wr - 1]) {
                let v = self.c[rd].v;
                self.c[wr - 1].v += v;
            } else {
                self.c[wr] = self.c[rd];
                wr += 1;
            }
        }
        self.c.truncate(wr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Bls12381Fr as Fr;
    use crate::polynomial::eq::tests::eq_at;
    use ark_ff::{One, Zero};
    use ark_std::{test_rng, UniformRand};
    use rand::Rng;

    fn random_quad<R: Rng>(rng: &mut R, n: usize, nv: u32, nw: u32) -> Quad<Fr> {
        let c = (0..n)
            .map(|_| {
                let v = if rng.gen_bool(0.1) { Fr::zero() } else { Fr::rand(rng) };
                Corner::new(rng.gen_range(0..nv), rng.gen_range(0..nw), rng.gen_range(0..nw), v)
            })
            .collect();
        Quad::new(c)
    }

    /// Σ_c eq(G, g) eq(H0, h0) eq(H1, h1) v, computed densely.
    fn brute_force(q: &Quad<Fr>, g0: &[Fr], g1: &[Fr], alpha: Fr, beta: Fr, h0: &[Fr], h1: &[Fr]) -> Fr {
        q.c.iter().fold(Fr::zero(), |s, c| {
            let v = if c.v.is_zero() { beta } else { c.v };
            let eqg = eq_at(g0, c.g as usize) + alpha * eq_at(g1, c.g as usize);
            s + v * eqg * eq_at(h0, c.h[0] as usize) * eq_at(h1, c.h[1] as usize)
        })
    }

    #[test]
    fn test_canonicalize_orders_and_coalesces() {
        let mut q = Quad::new(vec![
            Corner::new(0, 3, 1, Fr::from(2u64)),
            Corner::new(0, 1, 3, Fr::from(5u64)),
            Corner::new(1, 0, 0, Fr::from(7u64)),
            Corner::new(0, 0, 0, Fr::from(1u64)),
        ]);
        q.canonicalize();
        assert_eq!(q.n(), 3);
        assert_eq!(q.c[0], Corner::new(0, 0, 0, Fr::from(1u64)));
        assert_eq!(q.c[1], Corner::new(1, 0, 0, Fr::from(7u64)));
        assert_eq!(q.c[2], Corner::new(0, 1, 3, Fr::from(7u64)));
        assert!(q.c.iter().all(|c| c.h[0] <= c.h[1]));
    }

    #[test]
    fn test_bind_matches_dense_evaluation() {
        let mut rng = test_rng();
        let logv = 3;
        let logw = 4;
        for _ in 0..10 {
            let mut q = random_quad(&mut rng, 60, 1 << logv, 1 << logw);
            q.canonicalize();

            let g0: Vec<Fr> = (0..logv).map(|_| Fr::rand(&mut rng)).collect();
            let g1: Vec<Fr> = (0..logv).map(|_| Fr::rand(&mut rng)).collect();
            let h0: Vec<Fr> = (0..logw).map(|_| Fr::rand(&mut rng)).collect();
            let h1: Vec<Fr> = (0..logw).map(|_| Fr::rand(&mut rng)).collect();
            let alpha = Fr::rand(&mut rng);
            let beta = Fr::rand(&mut rng);

            let expected = brute_force(&q, &g0, &g1, alpha, beta, &h0, &h1);
            assert_eq!(q.bind_gh_all(logv, &g0, &g1, alpha, beta, logw, &h0, &h1), expected);

            // destructive binding in the order used by the prover
            let mut qb = q.clone();
            qb.bind_g(logv, &g0, &g1, alpha, beta);
            for round in 0..logw {
                qb.bind_h(h0[round], 0);
                qb.bind_h(h1[round], 1);
            }
            assert_eq!(qb.scalar(), expected);
        }
    }

    #[test]
    fn test_bind_h_unpaired_corners() {
        // a single odd corner binds to r·v, a single even one to (1-r)·v
        let r = Fr::from(3u64);
        let mut q = Quad::new(vec![Corner::new(0, 1, 0, Fr::from(5u64))]);
        q.bind_h(r, 0);
        assert_eq!(q.c[0], Corner::new(0, 0, 0, Fr::from(15u64)));

        let mut q = Quad::new(vec![Corner::new(0, 2, 0, Fr::from(5u64))]);
        q.bind_h(r, 0);
        assert_eq!(q.c[0], Corner::new(0, 1, 0, (Fr::one() - r) * Fr::from(5u64)));
    }

    #[test]
    fn test_bind_g_keeps_assertions_nonzero() {
        let mut q = Quad::new(vec![Corner::new(0, 0, 0, Fr::zero())]);
        let beta = Fr::from(11u64);
        q.bind_g(0, &[], &[], Fr::from(2u64), beta);
        // eq over zero variables is 1, plus alpha
        assert_eq!(q.scalar(), beta * Fr::from(3u64));
    }

    #[test]
    #[should_panic]
    fn test_scalar_requires_binding() {
        let q = Quad::new(vec![Corner::new(0, 1, 1, Fr::one())]);
        q.scalar();
    }
}
