//! Fiat-Shamir schedule of the sum-check protocol
//!
//! Both the prover and every verifier drive the shared [`Transcript`]
//! through this adapter so that the order of absorbs and squeezes cannot
//! diverge between them.

use super::proof::MAX_BINDINGS;
use super::univariate::Poly;
use crate::field::ZkField;
use crate::random::{RandomEngine, Transcript};

pub struct TranscriptSumcheck<'a> {
    ts: &'a mut Transcript,
}

impl<'a> TranscriptSumcheck<'a> {
    pub fn new(ts: &'a mut Transcript) -> Self {
        Self { ts }
    }

    /// Squeeze the copy point `Q` and the output point `G`.
    pub fn begin_circuit<F: ZkField>(&mut self) -> (Vec<F>, Vec<F>) {
        let q = self.ts.elts(MAX_BINDINGS);
        let g = self.ts.elts(MAX_BINDINGS);
        (q, g)
    }

    /// Squeeze the claim-combination coefficient `alpha` and the
    /// assertion weight `beta`.
    pub fn begin_layer<F: ZkField>(&mut self) -> (F, F) {
        let alpha = self.ts.elt();
        let beta = self.ts.elt();
        (alpha, beta)
    }

    /// Absorb a round message and squeeze the round challenge.
    ///
    /// `p(1)` is not sent: the receiver recovers it from the running claim.
    pub fn round<F: ZkField, const N: usize>(&mut self, poly: &Poly<F, N>) -> F {
        for (i, e) in poly.t.iter().enumerate() {
            if i != 1 {
                self.ts.write_elt(e);
            }
        }
        self.ts.elt()
    }

    pub fn write_claims<F: ZkField>(&mut self, wc: &[F; 2]) {
        self.ts.write_elts(wc);
    }

    pub fn transcript(&mut self) -> &mut Transcript {
        &mut *self.ts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Bls12381Fr as Fr;

    #[test]
    fn test_round_ignores_p1() {
        let mut t0 = Transcript::new(b"sumcheck");
        let mut t1 = Transcript::new(b"sumcheck");
        let p = Poly::<Fr, 3>::new([Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)]);
        let mut q = p;
        q.t[1] = Fr::from(99u64);
        let a: Fr = TranscriptSumcheck::new(&mut t0).round(&p);
        let b: Fr = TranscriptSumcheck::new(&mut t1).round(&q);
        assert_eq!(a, b);

        q.t[2] = Fr::from(4u64);
        let mut t2 = Transcript::new(b"sumcheck");
        let c: Fr = TranscriptSumcheck::new(&mut t2).round(&q);
        assert_ne!(a, c);
    }

    #[test]
    fn test_begin_circuit_lengths() {
        let mut t = Transcript::new(b"sumcheck");
        let (q, g) = TranscriptSumcheck::new(&mut t).begin_circuit::<Fr>();
        assert_eq!(q.len(), MAX_BINDINGS);
        assert_eq!(g.len(), MAX_BINDINGS);
        assert_ne!(q, g);
    }
}
