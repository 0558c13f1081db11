//! Constraints on the committed pad
//!
//! The zero-knowledge prover sends every sum-check value minus a random pad
//! and commits to the pads. Replaying the sum-check verifier on the padded
//! values, every intermediate claim becomes an affine function of the pads,
//! `known + Σ symbolic[i] · pad[i]`. Each layer's final check, which is
//! quadratic in the two claim pads, becomes one linear constraint plus one
//! quadratic constraint on the product of those pads.
//!
//! The pads of one layer are laid out in the committed witness as
//!
//! ```text
//! for round < logw, hand < 2: p(0), p(2)      4 · logw entries
//! wc[0], wc[1], wc[0] · wc[1]                 3 entries
//! ```
//!
//! after the private inputs and the pads of the previous layers.

use crate::circuit::Circuit;
use crate::field::ZkField;
use crate::ligero::{LigeroHash, LinearConstraint, QuadraticConstraint};
use crate::polynomial::{eq_eval, Dense, Eqs};
use crate::random::{RandomEngine, Transcript};
use crate::sumcheck::{DotInterpolation, ProofAux, Proof, TranscriptSumcheck, WPoly};

/// Absorbed in place of a digest of the linear constraints, which the
/// verifier rebuilds from the transcript itself.
pub const HASH_OF_A: LigeroHash = LigeroHash([
    0xde, 0xad, 0xbe, 0xef, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
]);

/// Index arithmetic for the pads of one layer.
///
/// The `ovp_` ("overlapping") variants index a window that starts three
/// entries early, so that the claim pads of the previous layer occupy
/// positions 0 and 1.
#[derive(Clone, Copy, Debug)]
pub struct PadLayout {
    logw: usize,
}

impl PadLayout {
    pub fn new(logw: usize) -> Self {
        Self { logw }
    }

    /// Pad of `p(point)` in round `r = 2 · round + hand`, for point 0 or 2.
    pub fn poly_pad(&self, r: usize, point: usize) -> usize {
        debug_assert!(point == 0 || point == 2, "p(1) is never sent");
        2 * r + point / 2
    }

    /// Pads of `wc[0]`, `wc[1]` and their product for `n = 0, 1, 2`.
    pub fn claim_pad(&self, n: usize) -> usize {
        4 * self.logw + n
    }

    pub fn layer_size(&self) -> usize {
        self.claim_pad(3)
    }

    pub fn ovp_claim_pad_m1(&self, n: usize) -> usize {
        n
    }

    pub fn ovp_poly_pad(&self, r: usize, point: usize) -> usize {
        3 + self.poly_pad(r, point)
    }

    pub fn ovp_claim_pad(&self, n: usize) -> usize {
        3 + self.claim_pad(n)
    }

    pub fn ovp_layer_size(&self) -> usize {
        3 + self.layer_size()
    }
}

/// Affine form `known + Σ symbolic[i] · x[i]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expression<F: ZkField> {
    pub known: F,
    pub symbolic: Vec<F>,
}

impl<F: ZkField> Expression<F> {
    pub fn new(nvar: usize) -> Self {
        Self {
            known: F::zero(),
            symbolic: vec![F::zero(); nvar],
        }
    }

    pub fn scale(&mut self, k: F) {
        self.known *= k;
        self.symbolic.iter_mut().for_each(|s| *s *= k);
    }

    /// `self += k · (kv + x[var])`
    pub fn axpy(&mut self, var: usize, kv: F, k: F) {
        self.known += k * kv;
        self.symbolic[var] += k;
    }

    /// `self -= k · (kv + x[var])`
    pub fn axmy(&mut self, var: usize, kv: F, k: F) {
        self.known -= k * kv;
        self.symbolic[var] -= k;
    }
}

/// Claims entering a layer, in padded form.
#[derive(Clone, Debug)]
struct Claims<F: ZkField> {
    logv: usize,
    claim: [F; 2],
    q: Vec<F>,
    g: [Vec<F>; 2],
}

/// Tracks the symbolic claim of one layer through its rounds.
pub struct ConstraintBuilder<F: ZkField> {
    expr: Expression<F>,
    pl: PadLayout,
}

impl<F: ZkField> ConstraintBuilder<F> {
    pub fn new(pl: PadLayout) -> Self {
        Self {
            expr: Expression::new(pl.ovp_layer_size()),
            pl,
        }
    }

    /// The layer claim `(c0 + x0) + alpha · (c1 + x1)` where `x0, x1` are
    /// the claim pads of the previous layer.
    pub fn first(&mut self, alpha: F, claim: &[F; 2]) {
        self.expr = Expression::new(self.pl.ovp_layer_size());
        self.expr.axpy(self.pl.ovp_claim_pad_m1(0), claim[0], F::one());
        self.expr.axpy(self.pl.ovp_claim_pad_m1(1), claim[1], alpha);
    }

    /// Move the claim to `p(x)` for round `r` with padded message `tr`,
    /// where `lag` are the Lagrange weights at `x` and `p(1)` is
    /// `claim - p(0)`.
    pub fn next(&mut self, r: usize, lag: &[F; 3], tr: &WPoly<F>) {
        let p0 = self.pl.ovp_poly_pad(r, 0);
        let p2 = self.pl.ovp_poly_pad(r, 2);
        self.expr.axmy(p0, tr.t[0], F::one());
        self.expr.scale(lag[1]);
        self.expr.axpy(p0, tr.t[0], lag[0]);
        self.expr.axpy(p2, tr.t[2], lag[2]);
    }

    /// Emit the layer check `claim = eqq · (wc0 + x0) · (wc1 + x1)` as
    /// linear constraint `ci`, with `x0 · x1` standing for the product pad.
    /// `pi` is the index of the first pad of this layer.
    pub fn finalize(
        &self,
        wc: &[F; 2],
        eqq: F,
        ci: usize,
        ly: usize,
        pi: usize,
        a: &mut Vec<LinearConstraint<F>>,
        b: &mut Vec<F>,
    ) {
        let pl = &self.pl;
        let mut lhs = self.expr.symbolic.clone();
        lhs[pl.ovp_claim_pad(0)] -= eqq * wc[1];
        lhs[pl.ovp_claim_pad(1)] -= eqq * wc[0];
        lhs[pl.ovp_claim_pad(2)] -= eqq;
        b.push(eqq * wc[0] * wc[1] - self.expr.known);

        // the first layer has no previous claim pads
        let i0 = if ly == 0 { pl.ovp_poly_pad(0, 0) } else { 0 };
        for (i, k) in lhs.into_iter().enumerate().skip(i0) {
            a.push(LinearConstraint { c: ci, w: pi + i - 3, k });
        }
    }
}

/// The linear system `A · W = b` on the committed witness.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinearSystem<F: ZkField> {
    pub a: Vec<LinearConstraint<F>>,
    pub b: Vec<F>,
}

impl<F: ZkField> LinearSystem<F> {
    /// Number of constraints.
    pub fn nl(&self) -> usize {
        self.b.len()
    }
}

pub struct ZkCommon;

impl ZkCommon {
    /// Replay the sum-check verifier on the padded `proof` and return the
    /// constraints the committed pads and private inputs must satisfy.
    ///
    /// `pub_in` holds at least the public inputs. `pi` is the index of the
    /// first pad in the committed witness. With `aux` the bound quads are
    /// taken from the prover instead of being recomputed.
    #[tracing::instrument(skip_all, name = "ZkCommon::verifier_constraints", fields(nl = circuit.nl))]
    pub fn verifier_constraints<F: ZkField>(
        circuit: &Circuit<F>,
        pub_in: &Dense<F>,
        proof: &Proof<F>,
        aux: Option<&ProofAux<F>>,
        tsv: &mut Transcript,
        mut pi: usize,
    ) -> LinearSystem<F> {
        assert_eq!(circuit.logc, 0, "copies are not supported");
        assert_eq!(proof.l.len(), circuit.nl, "proof shape");

        let mut sys = LinearSystem::default();
        let dot = DotInterpolation::<F, 3>::new();
        let mut tss = TranscriptSumcheck::new(tsv);

        let (q, g) = tss.begin_circuit::<F>();
        let mut cla = Claims {
            logv: circuit.logv,
            claim: [F::zero(); 2],
            q,
            g: [g.clone(), g],
        };

        for (ly, (layer, plr)) in circuit.layers.iter().zip(&proof.l).enumerate() {
            let (alpha, beta) = tss.begin_layer::<F>();
            let logw = layer.logw;
            assert!(logw > 0, "layer without inputs");
            let pl = PadLayout::new(logw);
            let mut cb = ConstraintBuilder::new(pl);
            cb.first(alpha, &cla.claim);

            let mut hb = [Vec::with_capacity(logw), Vec::with_capacity(logw)];
            for round in 0..logw {
                for hand in 0..2 {
                    let r = 2 * round + hand;
                    let hp = &plr.hp[hand][round];
                    let x = tss.round(hp);
                    cb.next(r, &dot.coef(x), hp);
                    hb[hand].push(x);
                }
            }

            let quad = match aux {
                Some(aux) => aux.bound_quad[ly],
                None => Self::bind_quad(circuit, ly, cla.logv, &cla.g, alpha, beta, &hb),
            };
            // no copy rounds: cb is empty and eq(Q, cb) is 1
            let eqv = eq_eval(circuit.logc, circuit.nc, &cla.q, &[]);
            let eqq = eqv * quad;

            cb.finalize(&plr.wc, eqq, sys.b.len(), ly, pi, &mut sys.a, &mut sys.b);
            tss.write_claims(&plr.wc);

            cla = Claims {
                logv: logw,
                claim: plr.wc,
                q: Vec::new(),
                g: hb,
            };
            pi += pl.layer_size();
        }

        let alpha: F = tss.transcript().elt();
        let got = cla.claim[0] + alpha * cla.claim[1];
        Self::input_constraint(&cla, pub_in, circuit.ninputs, circuit.npub_in, pi, got, alpha, &mut sys);
        sys
    }

    /// `Σ_i (eq(G0, i) + alpha · eq(G1, i)) · W[i] = (wc0 + x0) + alpha ·
    /// (wc1 + x1)` with the public inputs moved to the right-hand side.
    #[allow(clippy::too_many_arguments)]
    fn input_constraint<F: ZkField>(
        cla: &Claims<F>,
        pub_in: &Dense<F>,
        ninputs: usize,
        npub: usize,
        pi: usize,
        got: F,
        alpha: F,
        sys: &mut LinearSystem<F>,
    ) {
        let ci = sys.b.len();
        let eq0 = Eqs::new(cla.logv, ninputs, &cla.g[0]);
        let eq1 = Eqs::new(cla.logv, ninputs, &cla.g[1]);

        let mut pub_binding = F::zero();
        for i in 0..ninputs {
            let bi = eq0.at(i) + alpha * eq1.at(i);
            if i < npub {
                pub_binding += bi * pub_in.at(i);
            } else {
                sys.a.push(LinearConstraint { c: ci, w: i - npub, k: bi });
            }
        }

        // claim pads of the last layer
        let claim_pad_m1 = pi - 3;
        sys.a.push(LinearConstraint { c: ci, w: claim_pad_m1, k: -F::one() });
        sys.a.push(LinearConstraint { c: ci, w: claim_pad_m1 + 1, k: -alpha });
        sys.b.push(got - pub_binding);
    }

    /// Total number of pad entries.
    pub fn pad_size<F: ZkField>(c: &Circuit<F>) -> usize {
        c.layers.iter().map(|l| PadLayout::new(l.logw).layer_size()).sum()
    }

    /// One quadratic constraint per layer: the product pad equals the
    /// product of the claim pads.
    pub fn setup_lqc<F: ZkField>(c: &Circuit<F>, mut pi: usize) -> Vec<QuadraticConstraint> {
        c.layers
            .iter()
            .map(|l| {
                let pl = PadLayout::new(l.logw);
                let q = QuadraticConstraint {
                    x: pi + pl.claim_pad(0),
                    y: pi + pl.claim_pad(1),
                    z: pi + pl.claim_pad(2),
                };
                pi += pl.layer_size();
                q
            })
            .collect()
    }

    /// Bind the statement: circuit id, public inputs, the zero outputs and
    /// one zero byte per quad term.
    pub fn initialize_sumcheck_fiat_shamir<F: ZkField>(ts: &mut Transcript, circuit: &Circuit<F>, pub_in: &Dense<F>) {
        ts.write_bytes(&circuit.id);
        for i in 0..circuit.npub_in {
            ts.write_elt(&pub_in.at(i));
        }
        ts.write_elt(&F::zero());
        ts.write0(circuit.nterms());
    }

    /// Bind a layer's quad at the challenges of the sum-check rounds.
    pub fn bind_quad<F: ZkField>(
        circuit: &Circuit<F>,
        ly: usize,
        logv: usize,
        g: &[Vec<F>; 2],
        alpha: F,
        beta: F,
        hb: &[Vec<F>; 2],
    ) -> F {
        let layer = &circuit.layers[ly];
        let mut quad = layer.quad.clone();
        quad.bind_g(logv, &g[0], &g[1], alpha, beta);
        for round in 0..layer.logw {
            for hand in 0..2 {
                quad.bind_h(hb[hand][round], hand);
            }
        }
        quad.scalar()
    }
}
