//! Ligero verifier
//!
//! Replays the transcript to recover every challenge, then checks the
//! opened columns against the prover's responses: Merkle membership, the
//! low-degree combination, the linear combination and its claimed value,
//! and the quadratic combination.

use super::common::{column_hash, inner_product_vector, layout_aext};
use super::transcript::LigeroTranscript;
use super::{LigeroCommitment, LigeroHash, LigeroParam, LigeroProof, LinearConstraint, QuadraticConstraint};
use crate::errors::{Result, ZkError};
use crate::field::ZkField;
use crate::merkle::MerkleCommitmentVerifier;
use crate::polynomial::{Interpolator, InterpolatorFactory};
use crate::random::Transcript;

pub struct LigeroVerifier;

impl LigeroVerifier {
    pub fn receive_commitment(com: &LigeroCommitment, ts: &mut Transcript) {
        LigeroTranscript::write_commitment(com, ts);
    }

    /// Check `proof` against the commitment, the linear constraints
    /// `llterm` with right-hand sides `b`, and the quadratic constraints
    /// `lqc`.
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(skip_all, name = "LigeroVerifier::verify", fields(nl = b.len(), nllterm = llterm.len()))]
    pub fn verify<F: ZkField, I: InterpolatorFactory<F>>(
        p: &LigeroParam,
        com: &LigeroCommitment,
        proof: &LigeroProof<F>,
        ts: &mut Transcript,
        llterm: &[LinearConstraint<F>],
        hash_of_llterm: &LigeroHash,
        b: &[F],
        lqc: &[QuadraticConstraint],
        interpolator: &I,
    ) -> Result<()> {
        if !proof.matches(p) {
            return Err(ZkError::MalformedProof("ligero proof does not match the layout".to_string()));
        }
        let nl = b.len();

        LigeroTranscript::write_hash(hash_of_llterm, ts);
        let u_ldt = LigeroTranscript::gen_uldt::<F>(p, ts);
        let alphal = LigeroTranscript::gen_alphal::<F>(nl, ts);
        let alphaq = LigeroTranscript::gen_alphaq::<F>(p, ts);
        let u_quad = LigeroTranscript::gen_uquad::<F>(p, ts);
        LigeroTranscript::write_responses(proof, ts);
        let idx = LigeroTranscript::gen_idx(p, ts);

        let fail = |why: &'static str| {
            tracing::warn!(reason = why, "ligero verification failed");
            Err(ZkError::Ligero(why))
        };

        if !merkle_check(p, com, proof, &idx) {
            return fail("merkle_check failed");
        }
        if !low_degree_check(p, proof, &idx, &u_ldt, interpolator) {
            return fail("low_degree_check failed");
        }

        let a = inner_product_vector(p, nl, llterm, &alphal, lqc, &alphaq);
        if !dot_check(p, proof, &idx, &a, interpolator) {
            return fail("dot_check failed");
        }
        let want_dot = b.iter().zip(&alphal).fold(F::zero(), |s, (x, y)| s + *x * y);
        let proof_dot = proof.y_dot[p.r..p.r + p.w].iter().fold(F::zero(), |s, x| s + x);
        if want_dot != proof_dot {
            return fail("wrong dot product");
        }

        if !quadratic_check(p, proof, &idx, &u_quad, interpolator) {
            return fail("quadratic_check failed");
        }
        Ok(())
    }
}

/// Extend the `y.len()` evaluations in `y` to the full row and read them
/// off at the opened columns.
fn interpolate_req_columns<F: ZkField, I: InterpolatorFactory<F>>(
    p: &LigeroParam,
    y: &[F],
    idx: &[usize],
    interpolator: &I,
) -> Vec<F> {
    let interp = interpolator.make(y.len(), p.block_enc);
    let mut yext = vec![F::zero(); p.block_enc];
    yext[..y.len()].copy_from_slice(y);
    interp.interpolate(&mut yext);
    idx.iter().map(|&j| yext[p.dblock + j]).collect()
}

fn merkle_check<F: ZkField>(p: &LigeroParam, com: &LigeroCommitment, proof: &LigeroProof<F>, idx: &[usize]) -> bool {
    let updhash = |r: usize, sha: &mut sha2::Sha256| {
        let col = (0..p.nrow).map(|i| &proof.req[i * p.nreq + r]);
        column_hash(col, sha);
    };
    MerkleCommitmentVerifier::verify(p.block_ext, &com.root, &proof.merkle, idx, updhash)
}

fn low_degree_check<F: ZkField, I: InterpolatorFactory<F>>(
    p: &LigeroParam,
    proof: &LigeroProof<F>,
    idx: &[usize],
    u_ldt: &[F],
    interpolator: &I,
) -> bool {
    let mut yc = proof.req_row(p.ildt).to_vec();
    for (i, u) in u_ldt.iter().enumerate() {
        for (acc, x) in yc.iter_mut().zip(proof.req_row(p.iw + i)) {
            *acc += *u * x;
        }
    }
    interpolate_req_columns(p, &proof.y_ldt, idx, interpolator) == yc
}

fn dot_check<F: ZkField, I: InterpolatorFactory<F>>(
    p: &LigeroParam,
    proof: &LigeroProof<F>,
    idx: &[usize],
    a: &[F],
    interpolator: &I,
) -> bool {
    let mut yc = proof.req_row(p.idot).to_vec();
    let interp = interpolator.make(p.block, p.block_enc);
    let mut aext = vec![F::zero(); p.block_enc];
    for i in 0..p.nwqrow {
        layout_aext(&mut aext, p, i, a);
        interp.interpolate(&mut aext);
        for ((acc, &j), x) in yc.iter_mut().zip(idx).zip(proof.req_row(p.iw + i)) {
            *acc += aext[p.dblock + j] * x;
        }
    }
    interpolate_req_columns(p, &proof.y_dot, idx, interpolator) == yc
}

fn quadratic_check<F: ZkField, I: InterpolatorFactory<F>>(
    p: &LigeroParam,
    proof: &LigeroProof<F>,
    idx: &[usize],
    u_quad: &[F],
    interpolator: &I,
) -> bool {
    let mut yc = proof.req_row(p.iquad).to_vec();
    let iqx = p.iq;
    let iqy = iqx + p.nqtriples;
    let iqz = iqy + p.nqtriples;
    for (i, u) in u_quad.iter().enumerate() {
        let x = proof.req_row(iqx + i);
        let y = proof.req_row(iqy + i);
        let z = proof.req_row(iqz + i);
        for k in 0..p.nreq {
            yc[k] += *u * (z[k] - x[k] * y[k]);
        }
    }

    let mut yquad = vec![F::zero(); p.dblock];
    yquad[..p.r].copy_from_slice(&proof.y_quad_0);
    yquad[p.block..].copy_from_slice(&proof.y_quad_2);
    interpolate_req_columns(p, &yquad, idx, interpolator) == yc
}
