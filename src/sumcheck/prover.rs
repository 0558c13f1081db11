//! Layer-by-layer sum-check prover
//!
//! Layer `l` claims `V_l(Q, G) = Σ_{c, h0, h1} eq(Q, c) · quad_l(G, h0, h1)
//! · W_l(c, h0) · W_l(c, h1)`. Two claims on `V_l` (one per hand of the
//! layer above) are merged with a random `alpha`, then reduced in `logc`
//! copy rounds followed by `logw` rounds that alternate between the two
//! hands. The layer ends with two claims on `W_l`, which is `V_{l+1}`.
//!
//! When a pad is supplied, every message is sent minus the matching pad
//! entry. The verifier then only sees masked values and checks the
//! relations on the commitment instead of in the clear.

use super::proof::{CPoly, LayerProof, Proof, ProofAux, WPoly, MAX_BINDINGS};
use super::transcript::TranscriptSumcheck;
use crate::circuit::{Circuit, Quad};
use crate::field::ZkField;
use crate::polynomial::{Dense, Eqs};
use rayon::prelude::*;

const PARALLEL_THRESHOLD: usize = 1 << 12;

/// Points at which the next layer's wires are claimed.
#[derive(Clone, Debug)]
pub struct Bindings<F: ZkField> {
    pub logv: usize,
    pub q: Vec<F>,
    pub g: [Vec<F>; 2],
}

/// All wire values of an evaluated circuit.
#[derive(Clone, Debug)]
pub struct CircuitValues<F: ZkField> {
    /// the `nc x nv` outputs
    pub output: Dense<F>,
    /// `inputs[l]` holds the input wires of layer `l`
    pub inputs: Vec<Dense<F>>,
}

pub struct ProverLayers<'a, F: ZkField> {
    circuit: &'a Circuit<F>,
}

impl<'a, F: ZkField> ProverLayers<'a, F> {
    pub fn new(circuit: &'a Circuit<F>) -> Self {
        Self { circuit }
    }

    /// Evaluate every layer on the `nc x ninputs` input array `w0`.
    ///
    /// Returns `None` if some zero-coefficient corner sees a nonzero
    /// product, that is if an assertion of the circuit fails.
    #[tracing::instrument(skip_all, name = "ProverLayers::eval_circuit", fields(nl = self.circuit.nl))]
    pub fn eval_circuit(&self, w0: Dense<F>) -> Option<CircuitValues<F>> {
        let c = self.circuit;
        assert_eq!(w0.n0, c.nc, "input copies");
        assert_eq!(w0.n1, c.ninputs, "input wires");

        let mut inputs = Vec::with_capacity(c.nl);
        let mut w = w0;
        for l in (0..c.nl).rev() {
            let nv = if l > 0 { c.layers[l - 1].nw } else { c.nv };
            let mut v = Dense::new(c.nc, nv);
            if !eval_quad(&c.layers[l].quad, &mut v, &w) {
                tracing::debug!(layer = l, "assertion failed");
                return None;
            }
            inputs.push(w);
            w = v;
        }
        inputs.reverse();
        Some(CircuitValues { output: w, inputs })
    }

    /// Run the sum-check prover over all layers, writing the messages into
    /// `pr`. Consumes the per-layer inputs produced by [`Self::eval_circuit`].
    #[tracing::instrument(skip_all, name = "ProverLayers::prove", fields(nl = self.circuit.nl, padded = pad.is_some()))]
    pub fn prove(
        &self,
        pr: &mut Proof<F>,
        pad: Option<&Proof<F>>,
        inputs: Vec<Dense<F>>,
        mut aux: Option<&mut ProofAux<F>>,
        ts: &mut TranscriptSumcheck,
    ) -> Bindings<F> {
        let c = self.circuit;
        assert_eq!(inputs.len(), c.nl, "one input array per layer");
        assert_eq!(pr.l.len(), c.nl, "proof shape");
        assert!(c.logc <= MAX_BINDINGS && c.logv <= MAX_BINDINGS, "too many variables");

        let (q, g) = ts.begin_circuit::<F>();
        let mut bnd = Bindings {
            logv: c.logv,
            q,
            g: [g.clone(), g],
        };

        for (ly, w) in inputs.into_iter().enumerate() {
            let layer = &c.layers[ly];
            assert!(layer.logw <= MAX_BINDINGS, "too many variables");
            let (alpha, beta) = ts.begin_layer::<F>();

            let eq = Eqs::new(c.logc, c.nc, &bnd.q);
            let mut quad = layer.quad.clone();
            quad.bind_g(bnd.logv, &bnd.g[0], &bnd.g[1], alpha, beta);

            let lpad = pad.map(|p| &p.l[ly]);
            self.layer(&mut pr.l[ly], lpad, &mut bnd, &mut quad, eq, w, layer.logw, ts);

            if let Some(aux) = aux.as_deref_mut() {
                aux.bound_quad[ly] = quad.scalar();
            }
        }
        bnd
    }

    #[allow(clippy::too_many_arguments)]
    fn layer(
        &self,
        pr: &mut LayerProof<F>,
        pad: Option<&LayerProof<F>>,
        bnd: &mut Bindings<F>,
        quad: &mut Quad<F>,
        mut eq: Dense<F>,
        mut w: Dense<F>,
        logw: usize,
        ts: &mut TranscriptSumcheck,
    ) {
        for round in 0..self.circuit.logc {
            let mut p = copy_round_poly(quad, &eq, &w);
            if let Some(pad) = pad {
                p = p - pad.cp[round];
            }
            pr.cp[round] = p;
            let r = ts.round(&p);
            bnd.q[round] = r;
            eq.bind(r);
            w.bind(r);
        }

        // all copies are bound: the wires become the first dimension
        let eq0 = eq.scalar();
        w.reshape(w.n1);
        let mut wh = [w.clone(), w];

        for round in 0..logw {
            for hand in 0..2 {
                let mut p = hand_round_poly(quad, &wh, hand).mul_scalar(eq0);
                if let Some(pad) = pad {
                    p = p - pad.hp[hand][round];
                }
                pr.hp[hand][round] = p;
                let r = ts.round(&p);
                bnd.g[hand][round] = r;
                wh[hand].bind(r);
                quad.bind_h(r, hand);
            }
        }

        let mut wc = [wh[0].scalar(), wh[1].scalar()];
        if let Some(pad) = pad {
            wc[0] -= pad.wc[0];
            wc[1] -= pad.wc[1];
        }
        pr.wc = wc;
        ts.write_claims(&wc);
        bnd.logv = logw;
    }
}

/// `V[g] += v · W[h0] · W[h1]` for every corner and copy. Fails when a
/// zero-coefficient corner has a nonzero product.
fn eval_quad<F: ZkField>(quad: &Quad<F>, v: &mut Dense<F>, w: &Dense<F>) -> bool {
    let n0 = w.n0;
    for corner in &quad.c {
        let g = corner.g as usize;
        let h0 = corner.h[0] as usize;
        let h1 = corner.h[1] as usize;
        for c in 0..n0 {
            let x = w.v[n0 * h0 + c] * w.v[n0 * h1 + c];
            if corner.v.is_zero() {
                if !x.is_zero() {
                    return false;
                }
            } else {
                v.v[n0 * g + c] += corner.v * x;
            }
        }
    }
    true
}

/// Round message over the lowest copy variable.
fn copy_round_poly<F: ZkField>(quad: &Quad<F>, eq: &Dense<F>, w: &Dense<F>) -> CPoly<F> {
    let per_copy = |c: usize| {
        let e = CPoly::extend(eq.t2_at_corners(c, 0));
        quad.c.iter().fold(CPoly::zero(), |acc, corner| {
            let l = CPoly::extend(w.t2_at_corners(c, corner.h[0] as usize));
            let r = CPoly::extend(w.t2_at_corners(c, corner.h[1] as usize));
            acc + (e * l * r).mul_scalar(corner.v)
        })
    };

    let copies = (0..w.n0).step_by(2);
    if quad.n() * w.n0 >= PARALLEL_THRESHOLD {
        copies
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(per_copy)
            .reduce(CPoly::zero, |a, b| a + b)
    } else {
        copies.map(per_copy).fold(CPoly::zero(), |a, b| a + b)
    }
}

/// Round message over the lowest variable of hand `hand`: the other hand
/// is folded into the quad to give a linear form `QW` in the wires.
fn hand_round_poly<F: ZkField>(quad: &Quad<F>, wh: &[Dense<F>; 2], hand: usize) -> WPoly<F> {
    let ohand = 1 - hand;
    let wa = &wh[hand];
    let wb = &wh[ohand];

    let mut qw = Dense::new(wa.n0, 1);
    for corner in &quad.c {
        qw.v[corner.h[hand] as usize] += corner.v * wb.v[corner.h[ohand] as usize];
    }

    let term = |l: usize| WPoly::extend(wa.t2_at_corners(l, 0)) * WPoly::extend(qw.t2_at_corners(l, 0));
    let wires = (0..wa.n0).step_by(2);
    if wa.n0 >= PARALLEL_THRESHOLD {
        wires
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(term)
            .reduce(WPoly::zero, |a, b| a + b)
    } else {
        wires.map(term).fold(WPoly::zero(), |a, b| a + b)
    }
}
