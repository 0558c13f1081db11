//! Sum-check verifier for unpadded proofs
//!
//! Checks every round message in the clear and finishes by evaluating the
//! input claims against the full input array. It has no zero-knowledge
//! role; it exists to validate the prover on its own.

use super::proof::{Challenge, LayerChallenge, Proof};
use super::transcript::TranscriptSumcheck;
use super::univariate::Poly;
use crate::circuit::Circuit;
use crate::errors::{Result, ZkError};
use crate::field::ZkField;
use crate::polynomial::{eq_eval, Dense, Eqs};
use crate::random::RandomEngine;

pub struct SumcheckVerifier;

/// Replace the unsent `p(1)` by `claim - p(0)` and move the claim to the
/// challenge.
fn reduce<F: ZkField, const N: usize>(claim: &mut F, p: &Poly<F, N>, ts: &mut TranscriptSumcheck) -> F {
    let mut p = *p;
    p.t[1] = *claim - p.t[0];
    let r = ts.round(&p);
    *claim = p.eval_lagrange(r);
    r
}

impl SumcheckVerifier {
    /// Verify `proof` for the `nc x ninputs` input array `w`. The outputs
    /// of every copy are claimed to be zero.
    #[tracing::instrument(skip_all, name = "SumcheckVerifier::verify", fields(nl = circuit.nl))]
    pub fn verify<F: ZkField>(
        circuit: &Circuit<F>,
        proof: &Proof<F>,
        w: &Dense<F>,
        ts: &mut TranscriptSumcheck,
    ) -> Result<Challenge<F>> {
        if proof.l.len() != circuit.nl || w.n0 != circuit.nc || w.n1 != circuit.ninputs {
            return Err(ZkError::MalformedProof("shape mismatch".to_string()));
        }

        let (q, g) = ts.begin_circuit::<F>();
        let mut ch = Challenge::new(q.clone(), g.clone());
        let mut logv = circuit.logv;
        let mut cl = [F::zero(); 2];
        let mut cq = q;
        let mut cg = [g.clone(), g];

        for (ly, (layer, lp)) in circuit.layers.iter().zip(&proof.l).enumerate() {
            if lp.cp.len() != circuit.logc || lp.hp.iter().any(|h| h.len() != layer.logw) {
                return Err(ZkError::MalformedProof(format!("layer {} shape", ly)));
            }
            let (alpha, beta) = ts.begin_layer::<F>();
            let mut claim = cl[0] + alpha * cl[1];

            let cb: Vec<F> = lp.cp.iter().map(|p| reduce(&mut claim, p, ts)).collect();
            let mut hb = [Vec::with_capacity(layer.logw), Vec::with_capacity(layer.logw)];
            for round in 0..layer.logw {
                for hand in 0..2 {
                    let r = reduce(&mut claim, &lp.hp[hand][round], ts);
                    hb[hand].push(r);
                }
            }

            let quad = layer
                .quad
                .bind_gh_all(logv, &cg[0], &cg[1], alpha, beta, layer.logw, &hb[0], &hb[1]);
            let eqv = eq_eval(circuit.logc, circuit.nc, &cq, &cb);
            if claim != eqv * quad * lp.wc[0] * lp.wc[1] {
                tracing::warn!(layer = ly, "sumcheck layer claim mismatch");
                return Err(ZkError::SumcheckFailed(format!("layer {}", ly)));
            }
            ts.write_claims(&lp.wc);

            logv = layer.logw;
            cl = lp.wc;
            cq = cb.clone();
            cg = hb.clone();
            ch.l.push(LayerChallenge { alpha, beta, cb, hb });
        }

        // both claims on the inputs, merged
        let alpha: F = ts.transcript().elt();
        let mut wb = w.clone();
        wb.bind_all(&cq);
        let eq2 = Eqs::raw_eq2(logv, circuit.ninputs, &cg[0], &cg[1], alpha);
        let got = eq2.iter().zip(&wb.v).fold(F::zero(), |s, (e, x)| s + *e * x);
        if got != cl[0] + alpha * cl[1] {
            tracing::warn!("sumcheck input binding mismatch");
            return Err(ZkError::SumcheckFailed("input binding".to_string()));
        }
        Ok(ch)
    }
}
