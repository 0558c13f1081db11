//! Zero-knowledge verifier
//!
//! Replays the sum-check verifier on the padded messages to rebuild the
//! constraints on the committed pads, then checks the Ligero proof against
//! them. The padded messages themselves are never checked in the clear.

use super::common::{ZkCommon, HASH_OF_A};
use super::proof::ZkProof;
use crate::circuit::Circuit;
use crate::config::ZkParams;
use crate::errors::{Result, ZkError};
use crate::field::ZkField;
use crate::ligero::{LigeroParam, LigeroVerifier, QuadraticConstraint};
use crate::polynomial::{Dense, InterpolatorFactory};
use crate::random::Transcript;
use crate::sumcheck::LayerProof;

pub struct ZkVerifier<'a, F: ZkField, I: InterpolatorFactory<F>> {
    c: &'a Circuit<F>,
    n_witness: usize,
    param: LigeroParam,
    interpolator: I,
    lqc: Vec<QuadraticConstraint>,
}

impl<'a, F: ZkField, I: InterpolatorFactory<F>> ZkVerifier<'a, F, I> {
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
            lqc: ZkCommon::setup_lqc(c, n_witness),
        })
    }

    pub fn recv_commitment(&self, zk: &ZkProof<F>, t: &mut Transcript) {
        LigeroVerifier::receive_commitment(&zk.com, t);
    }

    /// Verify `zk` for the public inputs `pub_in`, of which the first
    /// `npub_in` entries are used.
    #[tracing::instrument(skip_all, name = "ZkVerifier::verify", fields(nl = self.c.nl))]
    pub fn verify(&self, zk: &ZkProof<F>, pub_in: &Dense<F>, tv: &mut Transcript) -> Result<()> {
        if pub_in.n0 != 1 || pub_in.n1 < self.c.npub_in {
            return Err(ZkError::InvalidParameter(format!(
                "expected {} public inputs, got {}",
                self.c.npub_in, pub_in.n1
            )));
        }
        if !self.shape_matches(zk) {
            tracing::warn!("proof shape does not match the circuit");
            return Err(ZkError::MalformedProof("proof shape does not match the circuit".to_string()));
        }

        ZkCommon::initialize_sumcheck_fiat_shamir(tv, self.c, pub_in);
        let sys = ZkCommon::verifier_constraints(self.c, pub_in, &zk.proof, None, tv, self.n_witness);
        LigeroVerifier::verify(
            &self.param,
            &zk.com,
            &zk.com_proof,
            tv,
            &sys.a,
            &HASH_OF_A,
            &sys.b,
            &self.lqc,
            &self.interpolator,
        )
    }

    fn shape_matches(&self, zk: &ZkProof<F>) -> bool {
        let layer_ok = |(layer, lp): (&crate::circuit::Layer<F>, &LayerProof<F>)| {
            lp.cp.is_empty() && lp.hp.iter().all(|h| h.len() == layer.logw)
        };
        zk.param == self.param
            && zk.com_proof.matches(&self.param)
            && zk.proof.l.len() == self.c.nl
            && self.c.layers.iter().zip(&zk.proof.l).all(layer_ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::tests::product_circuit;
    use crate::field::Bls12381Fr as Fr;
    use crate::polynomial::ReedSolomonFactory;
    use crate::random::RngEngine;
    use crate::zk::ZkProver;
    use ark_ff::One;
    use ark_std::test_rng;

    fn params() -> ZkParams {
        ZkParams::default().with_nreq(8)
    }

    fn prove(c: &Circuit<Fr>, a: u64, b: u64) -> ZkProof<Fr> {
        let w = Dense::from_wires(vec![Fr::one(), Fr::from(a), Fr::from(b)]);
        let mut zkp = ZkProof::new(c, &params()).unwrap();
        let mut prover = ZkProver::new(c, &params(), ReedSolomonFactory).unwrap();
        let mut tp = Transcript::new(b"zk test");
        prover
            .commit(&mut zkp, &w, &mut tp, &mut RngEngine::new(test_rng()))
            .unwrap();
        prover.prove(&mut zkp, &w, &mut tp).unwrap();
        zkp
    }

    fn verify(c: &Circuit<Fr>, zkp: &ZkProof<Fr>) -> Result<()> {
        let verifier = ZkVerifier::new(c, &params(), ReedSolomonFactory).unwrap();
        let mut tv = Transcript::new(b"zk test");
        verifier.recv_commitment(zkp, &mut tv);
        verifier.verify(zkp, &Dense::from_wires(vec![Fr::one()]), &mut tv)
    }

    #[test]
    fn test_completeness() {
        let c = product_circuit(12);
        let zkp = prove(&c, 3, 4);
        assert_eq!(verify(&c, &zkp), Ok(()));
    }

    #[test]
    fn test_other_statement_rejected() {
        let c = product_circuit(12);
        let zkp = prove(&c, 3, 4);
        assert!(verify(&product_circuit(13), &zkp).is_err());
    }

    #[test]
    fn test_tampered_sumcheck_message_rejected() {
        let c = product_circuit(12);
        let mut zkp = prove(&c, 3, 4);
        zkp.proof.l[0].hp[1][0].t[2] += Fr::one();
        assert!(verify(&c, &zkp).is_err());

        let mut zkp = prove(&c, 6, 2);
        zkp.proof.l[0].wc[0] += Fr::one();
        assert!(verify(&c, &zkp).is_err());
    }

    #[test]
    fn test_wrong_shape_rejected() {
        let c = product_circuit(12);
        let mut zkp = prove(&c, 3, 4);
        zkp.proof.l[0].hp[0].pop();
        assert!(matches!(verify(&c, &zkp), Err(ZkError::MalformedProof(_))));
    }
}
