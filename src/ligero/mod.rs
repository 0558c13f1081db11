//! Ligero commitment and argument
//!
//! The prover commits to a witness vector `W` by encoding it into the rows
//! of a tableau and Merkle-committing the extension columns. It then shows
//! that the committed rows are low-degree, that `A · W = b` for sparse
//! linear constraints `A`, and that `W[z] = W[x] · W[y]` for a list of
//! quadratic constraints. Only `nreq` random columns are ever opened.
//!
//! Reference: Ames, Hazay, Ishai, Venkitasubramaniam, "Ligero: Lightweight
//! Sublinear Arguments Without a Trusted Setup".

pub mod common;
pub mod param;
pub mod prover;
pub mod transcript;
pub mod verifier;

pub use param::LigeroParam;
pub use prover::LigeroProver;
pub use verifier::LigeroVerifier;

use crate::field::ZkField;
use crate::merkle::{Digest, MerkleProof};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LigeroCommitment {
    pub root: Digest,
}

/// One term `k · W[w]` of linear constraint `c`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearConstraint<F: ZkField> {
    pub c: usize,
    pub w: usize,
    pub k: F,
}

/// `W[z] = W[x] · W[y]`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuadraticConstraint {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

/// Digest of the linear constraints, absorbed before any challenge is
/// drawn so that the challenges depend on the statement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LigeroHash(pub [u8; 32]);

impl LigeroHash {
    pub const LENGTH: usize = 32;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LigeroProof<F: ZkField> {
    pub block: usize,
    pub dblock: usize,
    pub r: usize,
    pub block_enc: usize,
    pub nrow: usize,
    pub nreq: usize,
    pub mc_pathlen: usize,

    /// `[block]`
    pub y_ldt: Vec<F>,
    /// `[dblock]`
    pub y_dot: Vec<F>,
    /// `[r]`, the leading part of the quadratic response
    pub y_quad_0: Vec<F>,
    /// `[dblock - block]`, its trailing part; the middle `w` entries are zero
    pub y_quad_2: Vec<F>,
    /// opened columns, `[nrow][nreq]`
    pub req: Vec<F>,
    pub merkle: MerkleProof,
}

impl<F: ZkField> LigeroProof<F> {
    pub fn new(p: &LigeroParam) -> Self {
        Self {
            block: p.block,
            dblock: p.dblock,
            r: p.r,
            block_enc: p.block_enc,
            nrow: p.nrow,
            nreq: p.nreq,
            mc_pathlen: p.mc_pathlen,
            y_ldt: vec![F::zero(); p.block],
            y_dot: vec![F::zero(); p.dblock],
            y_quad_0: vec![F::zero(); p.r],
            y_quad_2: vec![F::zero(); p.dblock - p.block],
            req: vec![F::zero(); p.nrow * p.nreq],
            merkle: MerkleProof::default(),
        }
    }

    /// Row `i` of the opened columns.
    pub fn req_row(&self, i: usize) -> &[F] {
        &self.req[i * self.nreq..(i + 1) * self.nreq]
    }

    /// Whether every vector has the length `p` prescribes.
    pub fn matches(&self, p: &LigeroParam) -> bool {
        self.block == p.block
            && self.dblock == p.dblock
            && self.r == p.r
            && self.block_enc == p.block_enc
            && self.nrow == p.nrow
            && self.nreq == p.nreq
            && self.mc_pathlen == p.mc_pathlen
            && self.y_ldt.len() == p.block
            && self.y_dot.len() == p.dblock
            && self.y_quad_0.len() == p.r
            && self.y_quad_2.len() == p.dblock - p.block
            && self.req.len() == p.nrow * p.nreq
            && self.merkle.nonce.len() == p.nreq
    }
}
