//! Computations shared by the Ligero prover and verifier

use super::{LigeroParam, LinearConstraint, QuadraticConstraint};
use crate::field::ZkField;
use sha2::{Digest as _, Sha256};

/// Fold the linear constraints and the quadratic routing into a single
/// vector `A` of length `nwqrow · w`, so that all constraints hold (with
/// high probability over the challenges) iff `<A, W'> = <alphal, b>`, where
/// `W'` is the witness followed by the copies in the quadratic rows.
pub fn inner_product_vector<F: ZkField>(
    p: &LigeroParam,
    nl: usize,
    llterm: &[LinearConstraint<F>],
    alphal: &[F],
    lqc: &[QuadraticConstraint],
    alphaq: &[[F; 3]],
) -> Vec<F> {
    assert_eq!(alphal.len(), nl, "one challenge per linear constraint");
    assert!(lqc.len() >= p.nq && alphaq.len() >= p.nq, "quadratic constraints");

    let mut a = vec![F::zero(); p.nwqrow * p.w];
    for term in llterm {
        assert!(term.w < p.nw, "term.w < nw");
        assert!(term.c < nl, "term.c < nl");
        a[term.w] += term.k * alphal[term.c];
    }

    // each copy in a quadratic row must equal the witness it routes from
    let ax = p.nwrow * p.w;
    let ay = ax + p.nqtriples * p.w;
    let az = ay + p.nqtriples * p.w;
    for (iw, (l, aq)) in lqc.iter().zip(alphaq).take(p.nq).enumerate() {
        a[ax + iw] += aq[0];
        a[l.x] -= aq[0];
        a[ay + iw] += aq[1];
        a[l.y] -= aq[1];
        a[az + iw] += aq[2];
        a[l.z] -= aq[2];
    }
    a
}

/// Lay out row `i` of `A` as a public witness block: zero randomness
/// followed by `A[i·w .. (i+1)·w]`. `aext` must hold at least `block`
/// entries; the rest is left for interpolation.
pub fn layout_aext<F: ZkField>(aext: &mut [F], p: &LigeroParam, i: usize, a: &[F]) {
    aext[..p.r].iter_mut().for_each(|x| *x = F::zero());
    aext[p.r..p.block].copy_from_slice(&a[i * p.w..(i + 1) * p.w]);
}

/// Absorb a column given as an iterator over its entries.
pub fn column_hash<'a, F: ZkField + 'a>(column: impl Iterator<Item = &'a F>, sha: &mut Sha256) {
    let mut buf = Vec::with_capacity(F::BYTES);
    for x in column {
        buf.clear();
        x.write_bytes_field(&mut buf);
        sha.update(&buf);
    }
}
