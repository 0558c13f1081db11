//! Ligero prover
//!
//! The tableau is one flat row-major array of `nrow x block_enc`
//! elements. Every random entry is drawn first, in row order, and only
//! then are the rows extended in parallel, so the sequence of samples
//! does not depend on the thread schedule.

use super::common::{column_hash, inner_product_vector, layout_aext};
use super::transcript::LigeroTranscript;
use super::{LigeroCommitment, LigeroHash, LigeroParam, LigeroProof, LinearConstraint, QuadraticConstraint};
use crate::errors::{Result, ZkError};
use crate::field::ZkField;
use crate::merkle::MerkleCommitment;
use crate::polynomial::{Interpolator, InterpolatorFactory};
use crate::random::{RandomEngine, Transcript};
use rayon::prelude::*;

pub struct LigeroProver<F: ZkField> {
    p: LigeroParam,
    mc: MerkleCommitment,
    tableau: Vec<F>,
}

impl<F: ZkField> LigeroProver<F> {
    pub fn new(p: &LigeroParam) -> Self {
        Self {
            p: p.clone(),
            mc: MerkleCommitment::new(p.block_ext),
            tableau: vec![F::zero(); p.nrow * p.block_enc],
        }
    }

    pub fn param(&self) -> &LigeroParam {
        &self.p
    }

    fn row(&self, i: usize) -> &[F] {
        let ld = self.p.block_enc;
        &self.tableau[i * ld..(i + 1) * ld]
    }

    fn row_mut(&mut self, i: usize) -> &mut [F] {
        let ld = self.p.block_enc;
        &mut self.tableau[i * ld..(i + 1) * ld]
    }

    /// Encode `w` into the tableau, commit to its extension columns and
    /// absorb the root.
    ///
    /// Witnesses below `subfield_boundary` must lie in the subfield; rows
    /// made only of such witnesses get subfield blinding.
    #[tracing::instrument(skip_all, name = "LigeroProver::commit", fields(nw = self.p.nw, nrow = self.p.nrow))]
    pub fn commit<I, E>(
        &mut self,
        ts: &mut Transcript,
        w: &[F],
        subfield_boundary: usize,
        lqc: &[QuadraticConstraint],
        interpolator: &I,
        rng: &mut E,
    ) -> Result<LigeroCommitment>
    where
        I: InterpolatorFactory<F>,
        E: RandomEngine,
    {
        if w.len() != self.p.nw || lqc.len() != self.p.nq {
            return Err(ZkError::InvalidWitness("witness size does not match the layout".to_string()));
        }
        if w[..subfield_boundary.min(w.len())].iter().any(|x| !x.in_subfield()) {
            return Err(ZkError::InvalidWitness("element not in subfield".to_string()));
        }

        self.layout(w, subfield_boundary, lqc, rng)?;
        self.extend_rows(interpolator);

        let p = &self.p;
        let tableau = &self.tableau;
        let updhash = |j: usize, sha: &mut sha2::Sha256| {
            let col = (0..p.nrow).map(|i| &tableau[i * p.block_enc + p.dblock + j]);
            column_hash(col, sha);
        };
        let root = self.mc.commit(updhash, rng);

        let com = LigeroCommitment { root };
        LigeroTranscript::write_commitment(&com, ts);
        Ok(com)
    }

    /// Prove the linear constraints `llterm` (with `nl` right-hand sides
    /// held by the verifier) and the quadratic constraints `lqc` about the
    /// committed witness.
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(skip_all, name = "LigeroProver::prove", fields(nl = nl, nllterm = llterm.len()))]
    pub fn prove<I: InterpolatorFactory<F>>(
        &self,
        ts: &mut Transcript,
        nl: usize,
        llterm: &[LinearConstraint<F>],
        hash_of_llterm: &LigeroHash,
        lqc: &[QuadraticConstraint],
        interpolator: &I,
    ) -> LigeroProof<F> {
        let p = &self.p;
        let mut proof = LigeroProof::new(p);

        LigeroTranscript::write_hash(hash_of_llterm, ts);

        let u_ldt = LigeroTranscript::gen_uldt::<F>(p, ts);
        self.low_degree_proof(&mut proof.y_ldt, &u_ldt);

        let alphal = LigeroTranscript::gen_alphal::<F>(nl, ts);
        let alphaq = LigeroTranscript::gen_alphaq::<F>(p, ts);
        let a = inner_product_vector(p, nl, llterm, &alphal, lqc, &alphaq);
        self.dot_proof(&mut proof.y_dot, &a, interpolator);

        let u_quad = LigeroTranscript::gen_uquad::<F>(p, ts);
        self.quadratic_proof(&mut proof.y_quad_0, &mut proof.y_quad_2, &u_quad);

        LigeroTranscript::write_responses(&proof, ts);

        let idx = LigeroTranscript::gen_idx(p, ts);
        for i in 0..p.nrow {
            let row = self.row(i);
            for (j, &c) in idx.iter().enumerate() {
                proof.req[i * p.nreq + j] = row[p.dblock + c];
            }
        }
        proof.merkle = self.mc.open(&idx);
        proof
    }

    /// Fill the block part of every row. Extension happens separately.
    fn layout<E: RandomEngine>(
        &mut self,
        w: &[F],
        subfield_boundary: usize,
        lqc: &[QuadraticConstraint],
        rng: &mut E,
    ) -> Result<()> {
        let p = self.p.clone();

        // low-degree blinding
        for x in self.row_mut(p.ildt)[..p.block].iter_mut() {
            *x = rng.elt();
        }

        // dot-product blinding, witness part summing to zero
        {
            let row = self.row_mut(p.idot);
            for x in row[..p.dblock].iter_mut() {
                *x = rng.elt();
            }
            let sum = row[p.r..p.r + p.w].iter().fold(F::zero(), |s, x| s + x);
            row[p.r] -= sum;
        }

        // quadratic blinding, witness part zero
        {
            let row = self.row_mut(p.iquad);
            for x in row[..p.dblock].iter_mut() {
                *x = rng.elt();
            }
            row[p.r..p.r + p.w].iter_mut().for_each(|x| *x = F::zero());
        }

        for i in 0..p.nwrow {
            let subfield_only = (i + 1) * p.w <= subfield_boundary;
            let row = self.row_mut(p.iw + i);
            for x in row[..p.r].iter_mut() {
                *x = if subfield_only { rng.subfield_elt() } else { rng.elt() };
            }
            row[p.r..p.block].iter_mut().for_each(|x| *x = F::zero());
            let lo = i * p.w;
            let hi = (lo + p.w).min(p.nw);
            row[p.r..p.r + (hi - lo)].copy_from_slice(&w[lo..hi]);
        }

        let iqx = p.iq;
        let iqy = iqx + p.nqtriples;
        let iqz = iqy + p.nqtriples;
        for i in 0..p.nqtriples {
            for iq in [iqx + i, iqy + i, iqz + i] {
                let row = self.row_mut(iq);
                for x in row[..p.r].iter_mut() {
                    *x = rng.elt();
                }
                row[p.r..p.block].iter_mut().for_each(|x| *x = F::zero());
            }
            for j in 0..p.w {
                let iw = j + i * p.w;
                if iw >= p.nq {
                    break;
                }
                let l = &lqc[iw];
                if l.x >= p.nw || l.y >= p.nw || l.z >= p.nw {
                    return Err(ZkError::InvalidWitness(format!("quadratic constraint {} out of range", iw)));
                }
                if w[l.z] != w[l.x] * w[l.y] {
                    return Err(ZkError::InvalidWitness(format!("quadratic constraint {} violated", iw)));
                }
                self.row_mut(iqx + i)[p.r + j] = w[l.x];
                self.row_mut(iqy + i)[p.r + j] = w[l.y];
                self.row_mut(iqz + i)[p.r + j] = w[l.z];
            }
        }
        Ok(())
    }

    /// Extend every row from its block (or double block, for the dot and
    /// quadratic blinding rows) to `block_enc` entries.
    fn extend_rows<I: InterpolatorFactory<F>>(&mut self, interpolator: &I) {
        let p = &self.p;
        let single = interpolator.make(p.block, p.block_enc);
        let double = interpolator.make(p.dblock, p.block_enc);
        let (idot, iquad) = (p.idot, p.iquad);
        self.tableau
            .par_chunks_mut(p.block_enc)
            .enumerate()
            .for_each(|(i, row)| {
                if i == idot || i == iquad {
                    double.interpolate(row);
                } else {
                    single.interpolate(row);
                }
            });
    }

    fn low_degree_proof(&self, y: &mut [F], u_ldt: &[F]) {
        let p = &self.p;
        y.copy_from_slice(&self.row(p.ildt)[..p.block]);
        for (i, u) in u_ldt.iter().enumerate() {
            let row = self.row(p.iw + i);
            for (a, x) in y.iter_mut().zip(&row[..p.block]) {
                *a += *u * x;
            }
        }
    }

    fn dot_proof<I: InterpolatorFactory<F>>(&self, y: &mut [F], a: &[F], interpolator: &I) {
        let p = &self.p;
        let interp = interpolator.make(p.block, p.dblock);
        y.copy_from_slice(&self.row(p.idot)[..p.dblock]);

        let mut aext = vec![F::zero(); p.dblock];
        for i in 0..p.nwqrow {
            layout_aext(&mut aext, p, i, a);
            interp.interpolate(&mut aext);
            let row = self.row(p.iw + i);
            for ((acc, x), w) in y.iter_mut().zip(&aext).zip(&row[..p.dblock]) {
                *acc += *x * w;
            }
        }
    }

    fn quadratic_proof(&self, y0: &mut [F], y2: &mut [F], u_quad: &[F]) {
        let p = &self.p;
        let mut y = self.row(p.iquad)[..p.dblock].to_vec();

        let iqx = p.iq;
        let iqy = iqx + p.nqtriples;
        let iqz = iqy + p.nqtriples;
        for (i, u) in u_quad.iter().enumerate() {
            let (x, yy, z) = (self.row(iqx + i), self.row(iqy + i), self.row(iqz + i));
            for k in 0..p.dblock {
                y[k] += *u * (z[k] - x[k] * yy[k]);
            }
        }

        assert!(
            y[p.r..p.r + p.w].iter().all(|x| x.is_zero()),
            "witness part of the quadratic response is nonzero"
        );
        y0.copy_from_slice(&y[..p.r]);
        y2.copy_from_slice(&y[p.block..p.dblock]);
    }
}
