//! Zero-knowledge prover
//!
//! `commit` draws the pads and commits to the private inputs followed by
//! the pads. `prove` runs the sum-check prover with every message reduced
//! by its pad, then proves with Ligero that the committed values satisfy
//! the constraints the verifier derives from the padded messages.

use super::common::{PadLayout, ZkCommon, HASH_OF_A};
use super::proof::ZkProof;
use crate::circuit::Circuit;
use crate::config::ZkParams;
use crate::errors::{Result, ZkError};
use crate::field::ZkField;
use crate::ligero::{LigeroParam, LigeroProver, QuadraticConstraint};
use crate::polynomial::{Dense, InterpolatorFactory};
use crate::random::{RandomEngine, Transcript};
use crate::sumcheck::{Proof, ProofAux, ProverLayers, TranscriptSumcheck};

pub struct ZkProver<'a, F: ZkField, I: InterpolatorFactory<F>> {
    c: &'a Circuit<F>,
    n_witness: usize,
    param: LigeroParam,
    interpolator: I,
    pad: Proof<F>,
    lqc: Vec<QuadraticConstraint>,
    lp: Option<LigeroProver<F>>,
}

impl<'a, F: ZkField, I: InterpolatorFactory<F>> ZkProver<'a, F, I> {
    pub fn new(c: &'a Circuit<F>, params: &ZkParams, interpolator: I) -> Result<Self> {
        params.validate()?;
        if c.logc != 0 {
            return Err(ZkError::InvalidParameter("circuits with copies are not supported".to_string()));
        }
        let n_witness = c.ninputs - c.npub_in;
        let param = LigeroParam::new::<F>(n_witness + ZkCommon::pad_size(c), c.nl, params.rate, params.nreq)?;
        Ok(Self {
            c,
            n_witness,
            param,
            interpolator,
            pad: Proof::new(c),
            lqc: Vec::new(),
            lp: None,
        })
    }

    /// Commit to the private part of `w`, the full `ninputs` input vector,
    /// together with fresh pads. The root is written into `zkp` and
    /// absorbed by `tp`.
    #[tracing::instrument(skip_all, name = "ZkProver::commit", fields(n_witness = self.n_witness))]
    pub fn commit<E: RandomEngine>(
        &mut self,
        zkp: &mut ZkProof<F>,
        w: &Dense<F>,
        tp: &mut Transcript,
        rng: &mut E,
    ) -> Result<()> {
        if zkp.param != self.param {
            return Err(ZkError::InvalidParameter("proof was shaped for other parameters".to_string()));
        }
        self.check_inputs(w)?;

        let npub = self.c.npub_in;
        let mut witness: Vec<F> = w.v[npub..].to_vec();
        let sb = self.c.subfield_boundary.saturating_sub(npub);
        self.fill_pad(&mut witness, rng);

        self.lqc = ZkCommon::setup_lqc(self.c, self.n_witness);
        let mut lp = LigeroProver::new(&self.param);
        zkp.com = lp.commit(tp, &witness, sb, &self.lqc, &self.interpolator, rng)?;
        self.lp = Some(lp);
        Ok(())
    }

    fn check_inputs(&self, w: &Dense<F>) -> Result<()> {
        if w.n0 != 1 {
            return Err(ZkError::InvalidWitness("inputs must form a single copy".to_string()));
        }
        if w.n1 != self.c.ninputs {
            return Err(ZkError::InvalidWitness(format!(
                "expected {} inputs, got {}",
                self.c.ninputs, w.n1
            )));
        }
        Ok(())
    }

    /// Draw a pad for every sent value and append the pads, in layout
    /// order, to the witness.
    fn fill_pad<E: RandomEngine>(&mut self, witness: &mut Vec<F>, rng: &mut E) {
        for (layer, pad) in self.c.layers.iter().zip(self.pad.l.iter_mut()) {
            let pl = PadLayout::new(layer.logw);
            let start = witness.len();
            for round in 0..layer.logw {
                for hand in 0..2 {
                    for k in [0, 2] {
                        let r = rng.elt();
                        pad.hp[hand][round].t[k] = r;
                        witness.push(r);
                    }
                    pad.hp[hand][round].t[1] = F::zero();
                }
            }
            pad.wc = [rng.elt(), rng.elt()];
            witness.extend_from_slice(&pad.wc);
            witness.push(pad.wc[0] * pad.wc[1]);
            debug_assert_eq!(witness.len() - start, pl.layer_size());
        }
    }

    /// Prove that the committed `w` satisfies the circuit. Fails with
    /// [`ZkError::InvalidWitness`] when `w` is not a single copy of
    /// `ninputs` values, or when an assertion or an output is not zero; no
    /// proof is produced in that case.
    ///
    /// # Panics
    /// When called before [`Self::commit`].
    #[tracing::instrument(skip_all, name = "ZkProver::prove", fields(nl = self.c.nl))]
    pub fn prove(&self, zkp: &mut ZkProof<F>, w: &Dense<F>, tsp: &mut Transcript) -> Result<()> {
        let Some(lp) = self.lp.as_ref() else {
            panic!("prove called before commit");
        };
        self.check_inputs(w)?;

        ZkCommon::initialize_sumcheck_fiat_shamir(tsp, self.c, w);
        let mut tst = tsp.fork();

        let pl = ProverLayers::new(self.c);
        let values = pl
            .eval_circuit(w.clone())
            .ok_or_else(|| ZkError::InvalidWitness("assertion failed".to_string()))?;
        if values.output.v.iter().any(|x| !x.is_zero()) {
            return Err(ZkError::InvalidWitness("nonzero output".to_string()));
        }

        let mut aux = ProofAux::new(self.c.nl);
        pl.prove(
            &mut zkp.proof,
            Some(&self.pad),
            values.inputs,
            Some(&mut aux),
            &mut TranscriptSumcheck::new(&mut tst),
        );

        let sys = ZkCommon::verifier_constraints(self.c, w, &zkp.proof, Some(&aux), tsp, self.n_witness);
        zkp.com_proof = lp.prove(tsp, sys.nl(), &sys.a, &HASH_OF_A, &self.lqc, &self.interpolator);
        tracing::info!(nl = sys.nl(), nterms = sys.a.len(), bytes = zkp.size(), "zk proof generated");
        Ok(())
    }
}
