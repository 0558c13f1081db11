//! Equality polynomial ẽq(x, e) = Π_i (e_i·x_i + (1-e_i)·(1-x_i))
//!
//! [`Eqs`] tabulates ẽq(q, i) for every index `i < n` (with `n` not
//! necessarily a power of two), and [`eq_eval`] evaluates the bound
//! diagonal matrix EQ[i, j] = [i == j], restricted to `i, j < n`, at a
//! pair of points in closed form.

use super::Dense;
use ark_ff::Field;

/// ceil(a / 2^n) for a != 0.
fn ceilshr(a: usize, n: usize) -> usize {
    1 + ((a - 1) >> n)
}

/// Fill `eq[i] = ẽq(q, bits(i))` for `i < n`, where `n <= 2^logn` and the
/// lowest bit of `i` pairs with `q[0]`.
///
/// Works from the top variable down: `eq` for `ceil(n / 2^l)` entries is
/// expanded in place to `ceil(n / 2^(l-1))` entries.
fn filleq<F: Field>(eq: &mut [F], logn: usize, n: usize, q: &[F]) {
    assert!(n > 0, "n > 0");
    eq[0] = F::one();
    for l in (0..logn).rev() {
        let nl = ceilshr(n, l);
        let mut i = ceilshr(nl, 1);

        // eq[2i + 1] of the top pair would be past the end
        if 2 * i - 1 >= nl {
            i -= 1;
            let v = eq[i];
            eq[2 * i] = v - q[l] * v;
        }
        while i > 0 {
            i -= 1;
            let v = eq[i];
            let qv = q[l] * v;
            eq[2 * i] = v - qv;
            eq[2 * i + 1] = qv;
        }
    }
}

/// The table ẽq(q, i) for `0 <= i < n`, as a `n x 1` dense array so that
/// it can be bound together with the wire arrays.
pub struct Eqs;

impl Eqs {
    pub fn new<F: Field>(logn: usize, n: usize, q: &[F]) -> Dense<F> {
        let mut d = Dense::new(n, 1);
        filleq(&mut d.v, logn, n, q);
        d
    }

    /// ẽq(g0, ·) + alpha · ẽq(g1, ·) as a plain vector of length `n`.
    pub fn raw_eq2<F: Field>(logn: usize, n: usize, g0: &[F], g1: &[F], alpha: F) -> Vec<F> {
        let mut eq0 = vec![F::zero(); n];
        let mut eq1 = vec![F::zero(); n];
        filleq(&mut eq0, logn, n, g0);
        filleq(&mut eq1, logn, n, g1);
        for (a, b) in eq0.iter_mut().zip(eq1.iter()) {
            *a += alpha * b;
        }
        eq0
    }
}

/// Evaluate Σ_{k < n} ẽq(i, k) ẽq(j, k) at points `i`, `j` of `logn`
/// variables.
///
/// Binding one variable of both `i` and `j` maps the diagonal matrix
/// `diag(a, ..., a, b)` of size `n` to one of the same form and size
/// `ceil(n / 2)`, so only the two distinct diagonal values are tracked.
pub fn eq_eval<F: Field>(logn: usize, n: usize, i: &[F], j: &[F]) -> F {
    let mut a = F::one();
    let mut b = F::one();
    let mut n = n;
    for round in 0..logn {
        let i1 = i[round];
        let j1 = j[round];
        let i0j0 = (F::one() - i1) * (F::one() - j1);
        let i1j1 = i1 * j1;
        if n & 1 == 0 {
            b = b * i1j1 + a * i0j0;
        } else {
            b *= i0j0;
        }
        a *= i0j0 + i1j1;
        n = (n + 1) / 2;
    }
    b
}
