//! Fiat-Shamir schedule of the Ligero argument

use super::{LigeroCommitment, LigeroHash, LigeroParam, LigeroProof};
use crate::field::ZkField;
use crate::random::{RandomEngine, Transcript};

pub struct LigeroTranscript;

impl LigeroTranscript {
    pub fn write_commitment(com: &LigeroCommitment, ts: &mut Transcript) {
        ts.write_bytes(com.root.as_bytes());
    }

    pub fn write_hash(hash: &LigeroHash, ts: &mut Transcript) {
        ts.write_bytes(&hash.0);
    }

    /// Coefficients of the low-degree test, one per witness or quadratic row.
    pub fn gen_uldt<F: ZkField>(p: &LigeroParam, ts: &mut Transcript) -> Vec<F> {
        ts.elts(p.nwqrow)
    }

    pub fn gen_alphal<F: ZkField>(nl: usize, ts: &mut Transcript) -> Vec<F> {
        ts.elts(nl)
    }

    pub fn gen_alphaq<F: ZkField>(p: &LigeroParam, ts: &mut Transcript) -> Vec<[F; 3]> {
        (0..p.nq).map(|_| [ts.elt(), ts.elt(), ts.elt()]).collect()
    }

    pub fn gen_uquad<F: ZkField>(p: &LigeroParam, ts: &mut Transcript) -> Vec<F> {
        ts.elts(p.nqtriples)
    }

    /// The prover's responses, each absorbed as one array.
    pub fn write_responses<F: ZkField>(proof: &LigeroProof<F>, ts: &mut Transcript) {
        ts.write_elts(&proof.y_ldt);
        ts.write_elts(&proof.y_dot);
        ts.write_elts(&proof.y_quad_0);
        ts.write_elts(&proof.y_quad_2);
    }

    /// `nreq` distinct columns among the `block_ext` committed ones.
    pub fn gen_idx(p: &LigeroParam, ts: &mut Transcript) -> Vec<usize> {
        assert!(p.block_ext >= p.nreq, "not enough columns to open");
        ts.choose(p.block_ext, p.nreq)
    }
}
