//! Tableau layout
//!
//! Each row of the tableau is `[X | XD | XEXT]` where the block `X` holds
//! `block` evaluations of a polynomial of degree below `block`, `XD`
//! (`block - 1` entries) makes room for products of two such polynomials,
//! and `XEXT` (`block_ext` entries) is the Reed-Solomon extension that gets
//! committed column by column.
//!
//! A witness block is `[RANDOM[r] | WITNESS[w]]` with `r = nreq`, so opening
//! `nreq` columns leaks nothing. Rows are laid out as
//!
//! ```text
//! ildt = 0        blinding for the low-degree test
//! idot = 1        blinding for the linear test, witness part sums to zero
//! iquad = 2       blinding for the quadratic test, witness part is zero
//! iw = 3          nwrow witness rows
//! iq = iw + nwrow 3 · nqtriples rows holding x, y, z of each quadratic
//!                 constraint
//! ```

use crate::errors::{Result, ZkError};
use crate::field::ZkField;
use crate::merkle::{merkle_commitment_len, Digest, MerkleNonce};
use crate::utils::ceil_div;

/// All dimensions stay below `2^MAX_LG_SIZE`.
const MAX_LG_SIZE: usize = 28;
const MAX_SIZE: usize = 1 << MAX_LG_SIZE;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LigeroParam {
    /// number of committed witnesses
    pub nw: usize,
    /// number of quadratic constraints
    pub nq: usize,
    pub rateinv: usize,
    /// number of opened columns
    pub nreq: usize,

    pub block_enc: usize,
    pub block: usize,
    pub dblock: usize,
    /// number of committed columns, `block_enc - dblock`
    pub block_ext: usize,
    pub r: usize,
    pub w: usize,
    pub nwrow: usize,
    pub nqtriples: usize,
    /// `nwrow + 3 · nqtriples`
    pub nwqrow: usize,
    pub nrow: usize,
    pub mc_pathlen: usize,

    pub ildt: usize,
    pub idot: usize,
    pub iquad: usize,
    pub iw: usize,
    pub iq: usize,
}

impl LigeroParam {
    /// Pick the row width `block_enc` among the powers of two up to
    /// `2^28` that minimizes the estimated proof size.
    #[tracing::instrument(name = "LigeroParam::new", level = "debug")]
    pub fn new<F: ZkField>(nw: usize, nq: usize, rateinv: usize, nreq: usize) -> Result<Self> {
        let mut p = Self {
            nw,
            nq,
            rateinv,
            nreq,
            block_enc: 0,
            block: 0,
            dblock: 0,
            block_ext: 0,
            r: nreq,
            w: 0,
            nwrow: 0,
            nqtriples: 0,
            nwqrow: 0,
            nrow: 0,
            mc_pathlen: 0,
            ildt: 0,
            idot: 1,
            iquad: 2,
            iw: 3,
            iq: 0,
        };

        let mut best: Option<(u64, usize)> = None;
        let mut e = 1usize;
        while e <= MAX_SIZE {
            if let Some(sz) = p.layout::<F>(e) {
                if best.map_or(true, |(min, _)| sz < min) {
                    best = Some((sz, e));
                }
            }
            e *= 2;
        }

        let (size, block_enc) = best.ok_or_else(|| {
            ZkError::InvalidParameter(format!("no Ligero layout for nw={} nq={} nreq={}", nw, nq, nreq))
        })?;
        p.layout::<F>(block_enc);
        if p.block_enc <= p.block || p.block_ext < p.nreq {
            return Err(ZkError::InvalidParameter("degenerate Ligero layout".to_string()));
        }
        p.iq = p.iw + p.nwrow;
        debug_assert_eq!(p.nrow, p.iq + 3 * p.nqtriples);

        tracing::debug!(
            block_enc = p.block_enc,
            block = p.block,
            nrow = p.nrow,
            estimated_size = size,
            "ligero layout"
        );
        Ok(p)
    }

    /// Lay out rows of width `e` and estimate the proof size, or `None` if
    /// the width is not admissible.
    fn layout<F: ZkField>(&mut self, e: usize) -> Option<u64> {
        self.block_enc = e;

        let subfield_bits = 8 * F::SUBFIELD_BYTES;
        if subfield_bits <= MAX_LG_SIZE && e >= (1 << subfield_bits) {
            return None;
        }
        if e > MAX_SIZE || self.rateinv > MAX_SIZE || e + 1 < 2 + self.rateinv {
            return None;
        }

        self.block = (e + 1) / (2 + self.rateinv);
        if self.block < self.r {
            return None;
        }
        self.w = self.block - self.r;
        // a witness block is at least half full
        if self.w < self.r || self.w == 0 {
            return None;
        }

        self.dblock = 2 * self.block - 1;
        if e < self.dblock {
            return None;
        }
        self.block_ext = e - self.dblock;
        if self.block_ext < self.nreq {
            return None;
        }

        self.nwrow = ceil_div(self.nw, self.w);
        self.nqtriples = ceil_div(self.nq, self.w);
        self.nwqrow = self.nwrow + 3 * self.nqtriples;
        self.nrow = self.nwqrow + 3;
        if self.nrow >= MAX_SIZE / e {
            return None;
        }

        self.mc_pathlen = merkle_commitment_len(self.block_ext);

        let fb = F::BYTES as u64;
        let (block, dblock, w) = (self.block as u64, self.dblock as u64, self.w as u64);
        let nreq = self.nreq as u64;
        let mut sz = Digest::LENGTH as u64;
        // openings, approximated since the path length depends on the coins
        sz += (self.mc_pathlen as u64) / 2 * nreq * Digest::LENGTH as u64;
        sz += block * fb;
        sz += dblock * fb;
        // the witness part of y_quad is zero and not sent
        sz += (dblock - w) * fb;
        sz += nreq * MerkleNonce::LENGTH as u64;
        // optimistically all opened entries are in the subfield
        sz += (self.nrow as u64) * nreq * F::SUBFIELD_BYTES as u64;
        Some(sz)
    }
}
