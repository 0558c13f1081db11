//! Reed-Solomon extension of polynomial evaluations
//!
//! Given `y[k] = p(k)` for `k < n` and a polynomial `p` of degree below `n`,
//! fill `y[k]` for `n <= k < m`. Uses the barycentric form on the integer
//! nodes `0..n`:
//!
//! p(k) = ℓ(k) · Σ_i w_i · y_i / (k - i)
//!
//! with ℓ(k) = Π_i (k - i) and w_i = (-1)^(n-1-i) / (i! (n-1-i)!). All
//! reciprocals of `1..m` are computed once per (n, m) pair with a single
//! batch inversion, so extending a row costs `n (m - n)` multiplications.

use ark_ff::{batch_inversion, Field};
use rayon::prelude::*;

/// Extends evaluations at `0..n` to evaluations at `0..m` in place.
pub trait Interpolator<F: Field>: Send + Sync {
    fn n(&self) -> usize;
    fn m(&self) -> usize;
    /// `y[..n]` are inputs; `y[n..m]` are overwritten.
    fn interpolate(&self, y: &mut [F]);
}

pub trait InterpolatorFactory<F: Field>: Sync {
    type Interp: Interpolator<F>;
    fn make(&self, n: usize, m: usize) -> Self::Interp;
}

pub struct ReedSolomon<F: Field> {
    n: usize,
    m: usize,
    /// inv[d] = 1/d for 1 <= d < m; inv[0] is unused
    inv: Vec<F>,
    /// barycentric weights w_i
    weight: Vec<F>,
    /// ℓ(k) for n <= k < m
    leading: Vec<F>,
}

impl<F: Field> ReedSolomon<F> {
    pub fn new(n: usize, m: usize) -> Self {
        assert!(n > 0, "n > 0");
        assert!(m >= n, "m >= n");

        let mut inv: Vec<F> = (0..m.max(2)).map(|d| F::from(d as u64)).collect();
        inv[0] = F::one();
        batch_inversion(&mut inv);
        inv[0] = F::zero();

        // 1/j! for j < n
        let mut inv_fact = vec![F::one(); n];
        for j in 1..n {
            inv_fact[j] = inv_fact[j - 1] * inv[j];
        }
        let weight: Vec<F> = (0..n)
            .map(|i| {
                let w = inv_fact[i] * inv_fact[n - 1 - i];
                if (n - 1 - i) % 2 == 1 {
                    -w
                } else {
                    w
                }
            })
            .collect();

        // ℓ(n) = n!, ℓ(k+1) = ℓ(k) (k+1) / (k+1-n)
        let mut leading = Vec::with_capacity(m - n);
        if m > n {
            let mut l: F = (1..=n as u64).map(F::from).product();
            leading.push(l);
            for k in n..m - 1 {
                l *= F::from((k + 1) as u64) * inv[k + 1 - n];
                leading.push(l);
            }
        }

        Self {
            n,
            m,
            inv,
            weight,
            leading,
        }
    }

    fn extend_at(&self, wy: &[F], k: usize) -> F {
        let mut acc = F::zero();
        for (i, x) in wy.iter().enumerate() {
            acc += *x * self.inv[k - i];
        }
        acc * self.leading[k - self.n]
    }
}

impl<F: Field> Interpolator<F> for ReedSolomon<F> {
    fn n(&self) -> usize {
        self.n
    }

    fn m(&self) -> usize {
        self.m
    }

    fn interpolate(&self, y: &mut [F]) {
        assert!(y.len() >= self.m, "interpolation buffer too short");
        let (head, tail) = y[..self.m].split_at_mut(self.n);

        let wy: Vec<F> = head.iter().zip(&self.weight).map(|(a, b)| *a * b).collect();

        const PARALLEL_THRESHOLD: usize = 1 << 14;
        if tail.len() * self.n >= PARALLEL_THRESHOLD {
            tail.par_iter_mut()
                .enumerate()
                .for_each(|(t, out)| *out = self.extend_at(&wy, self.n + t));
        } else {
            for (t, out) in tail.iter_mut().enumerate() {
                *out = self.extend_at(&wy, self.n + t);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ReedSolomonFactory;

impl<F: Field> InterpolatorFactory<F> for ReedSolomonFactory {
    type Interp = ReedSolomon<F>;

    fn make(&self, n: usize, m: usize) -> ReedSolomon<F> {
        ReedSolomon::new(n, m)
    }
}
