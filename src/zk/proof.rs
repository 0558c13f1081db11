//! Zero-knowledge proof container and its byte format
//!
//! ```text
//! root(32)
//! per layer, per round: hp[0].t[0] hp[1].t[0] hp[0].t[2] hp[1].t[2]
//!            then wc[0] wc[1]
//! y_ldt[block] y_dot[dblock] y_quad_0[r] y_quad_2[dblock - block]
//! nonce(32)[nreq]
//! runs of opened entries: len(4) followed by len elements, alternating
//!            between full-field and subfield encodings, full-field first
//! npath(4) digest(32)[npath]
//! ```
//!
//! All lengths are little-endian. The opened entries are written in the
//! row-major order of `req`.

use super::common::ZkCommon;
use crate::circuit::Circuit;
use crate::config::ZkParams;
use crate::errors::{Result, ZkError};
use crate::field::ZkField;
use crate::ligero::{LigeroCommitment, LigeroParam, LigeroProof};
use crate::merkle::{Digest, MerkleNonce};
use crate::sumcheck::Proof;
use crate::utils::{u32_from_le, u32_to_le};

/// Longest run of opened entries in one encoding.
pub const MAX_RUN_LEN: usize = 1 << 25;
/// Most Merkle digests a proof may carry.
pub const MAX_NUM_DIGESTS: usize = 1 << 25;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZkProof<F: ZkField> {
    /// padded sum-check messages
    pub proof: Proof<F>,
    pub param: LigeroParam,
    pub com: LigeroCommitment,
    pub com_proof: LigeroProof<F>,
}

impl<F: ZkField> ZkProof<F> {
    /// An empty proof shaped for `circuit`, committing to the private
    /// inputs followed by the pads.
    pub fn new(circuit: &Circuit<F>, params: &ZkParams) -> Result<Self> {
        params.validate()?;
        if circuit.logc != 0 {
            return Err(ZkError::InvalidParameter("circuits with copies are not supported".to_string()));
        }
        let n_witness = circuit.ninputs - circuit.npub_in;
        let param = LigeroParam::new::<F>(
            n_witness + ZkCommon::pad_size(circuit),
            circuit.nl,
            params.rate,
            params.nreq,
        )?;
        let com_proof = LigeroProof::new(&param);
        Ok(Self {
            proof: Proof::new(circuit),
            param,
            com: LigeroCommitment::default(),
            com_proof,
        })
    }

    /// Upper bound on the length of [`Self::write`].
    pub fn size(&self) -> usize {
        let p = &self.param;
        let sc_elts: usize = self.proof.l.iter().map(|l| 4 * l.hp[0].len() + 2).sum();
        let nopen = p.nreq * p.nrow;
        Digest::LENGTH
            + sc_elts * F::BYTES
            + (p.block + p.dblock + p.r + (p.dblock - p.block)) * F::BYTES
            + p.nreq * MerkleNonce::LENGTH
            // worst case alternates encodings on every entry
            + (nopen + 1) * 4
            + nopen * F::BYTES
            + 4
            + p.nreq * p.mc_pathlen * Digest::LENGTH
    }

    pub fn write(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.size());
        buf.extend_from_slice(self.com.root.as_bytes());
        self.write_sc_proof(&mut buf);
        self.write_com_proof(&mut buf);
        tracing::debug!(bytes = buf.len(), bound = self.size(), "zk proof written");
        buf
    }

    /// Fill the proof from `bytes`. The shape comes from the circuit the
    /// proof was created for; the whole buffer must be consumed.
    pub fn read(&mut self, bytes: &[u8]) -> Result<()> {
        let mut rd = ProofReader { buf: bytes, pos: 0 };
        self.com.root = Digest::from_bytes(rd.bytes(Digest::LENGTH)?).ok_or_else(|| malformed("root"))?;
        self.read_sc_proof(&mut rd)?;
        self.read_com_proof(&mut rd)?;
        if rd.remaining() != 0 {
            return Err(malformed("trailing bytes"));
        }
        Ok(())
    }

    fn write_sc_proof(&self, buf: &mut Vec<u8>) {
        for layer in &self.proof.l {
            assert!(layer.cp.is_empty(), "copy rounds are not serialized");
            for wi in 0..layer.hp[0].len() {
                for k in [0, 2] {
                    layer.hp[0][wi].t[k].write_bytes_field(buf);
                    layer.hp[1][wi].t[k].write_bytes_field(buf);
                }
            }
            layer.wc[0].write_bytes_field(buf);
            layer.wc[1].write_bytes_field(buf);
        }
    }

    fn read_sc_proof(&mut self, rd: &mut ProofReader) -> Result<()> {
        for layer in self.proof.l.iter_mut() {
            for wi in 0..layer.hp[0].len() {
                for k in [0, 2] {
                    layer.hp[0][wi].t[k] = rd.elt()?;
                    layer.hp[1][wi].t[k] = rd.elt()?;
                }
                layer.hp[0][wi].t[1] = F::zero();
                layer.hp[1][wi].t[1] = F::zero();
            }
            layer.wc = [rd.elt()?, rd.elt()?];
        }
        Ok(())
    }

    fn write_com_proof(&self, buf: &mut Vec<u8>) {
        let pr = &self.com_proof;
        for v in [&pr.y_ldt, &pr.y_dot, &pr.y_quad_0, &pr.y_quad_2] {
            v.iter().for_each(|x| x.write_bytes_field(buf));
        }
        for nonce in &pr.merkle.nonce {
            buf.extend_from_slice(&nonce.0);
        }

        // runs alternate between encodings, starting with the full field
        let mut ci = 0;
        let mut subfield_run = false;
        while ci < pr.req.len() {
            let mut runlen = 0;
            while ci + runlen < pr.req.len()
                && runlen + 1 < MAX_RUN_LEN
                && pr.req[ci + runlen].in_subfield() == subfield_run
            {
                runlen += 1;
            }
            buf.extend_from_slice(&u32_to_le(runlen as u32));
            for x in &pr.req[ci..ci + runlen] {
                if subfield_run {
                    x.write_bytes_subfield(buf);
                } else {
                    x.write_bytes_field(buf);
                }
            }
            ci += runlen;
            subfield_run = !subfield_run;
        }

        buf.extend_from_slice(&u32_to_le(pr.merkle.path.len() as u32));
        for d in &pr.merkle.path {
            buf.extend_from_slice(d.as_bytes());
        }
    }

    fn read_com_proof(&mut self, rd: &mut ProofReader) -> Result<()> {
        let p = &self.param;
        let mut pr = LigeroProof::new(p);
        for v in [&mut pr.y_ldt, &mut pr.y_dot, &mut pr.y_quad_0, &mut pr.y_quad_2] {
            for x in v.iter_mut() {
                *x = rd.elt()?;
            }
        }

        pr.merkle.nonce = (0..p.nreq)
            .map(|_| {
                let mut n = MerkleNonce::default();
                n.0.copy_from_slice(rd.bytes(MerkleNonce::LENGTH)?);
                Ok(n)
            })
            .collect::<Result<Vec<_>>>()?;

        let total = p.nreq * p.nrow;
        let mut ci = 0;
        let mut subfield_run = false;
        while ci < total {
            let runlen = rd.size()?;
            if runlen >= MAX_RUN_LEN || ci + runlen > total {
                return Err(malformed("bad run length"));
            }
            for x in &mut pr.req[ci..ci + runlen] {
                *x = if subfield_run { rd.subfield_elt()? } else { rd.elt()? };
            }
            ci += runlen;
            subfield_run = !subfield_run;
        }

        let sz = rd.size()?;
        if sz < p.nreq || sz >= MAX_NUM_DIGESTS || sz > p.nreq * p.mc_pathlen {
            return Err(malformed("bad merkle path length"));
        }
        if rd.remaining() < sz * Digest::LENGTH {
            return Err(malformed("truncated merkle path"));
        }
        pr.merkle.path = (0..sz)
            .map(|_| Digest::from_bytes(rd.bytes(Digest::LENGTH)?).ok_or_else(|| malformed("digest")))
            .collect::<Result<Vec<_>>>()?;

        self.com_proof = pr;
        Ok(())
    }
}

fn malformed(what: &str) -> ZkError {
    ZkError::MalformedProof(what.to_string())
}

struct ProofReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ProofReader<'a> {
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(malformed("truncated"));
        }
        let s = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    fn size(&mut self) -> Result<usize> {
        let b = self.bytes(4)?;
        u32_from_le(b).map(|x| x as usize).ok_or_else(|| malformed("size"))
    }

    fn elt<F: ZkField>(&mut self) -> Result<F> {
        F::from_bytes_field(self.bytes(F::BYTES)?).ok_or_else(|| malformed("field element"))
    }

    fn subfield_elt<F: ZkField>(&mut self) -> Result<F> {
        F::from_bytes_subfield(self.bytes(F::SUBFIELD_BYTES)?).ok_or_else(|| malformed("subfield element"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::tests::product_circuit;
    use crate::field::Bls12381Fr as Fr;
    use ark_ff::Zero;
    use ark_std::{test_rng, UniformRand};
    use rand::Rng;

    fn random_proof() -> ZkProof<Fr> {
        let mut rng = test_rng();
        let c = product_circuit(12);
        let params = ZkParams::default().with_nreq(6);
        let mut zk = ZkProof::new(&c, &params).unwrap();
        for l in zk.proof.l.iter_mut() {
            for hand in 0..2 {
                for p in l.hp[hand].iter_mut() {
                    p.t = [Fr::rand(&mut rng), Fr::zero(), Fr::rand(&mut rng)];
                }
            }
            l.wc = [Fr::rand(&mut rng), Fr::rand(&mut rng)];
        }
        zk.com.root = Digest(rng.gen());
        let pr = &mut zk.com_proof;
        for v in [&mut pr.y_ldt, &mut pr.y_dot, &mut pr.y_quad_0, &mut pr.y_quad_2, &mut pr.req] {
            v.iter_mut().for_each(|x| *x = Fr::rand(&mut rng));
        }
        pr.merkle.nonce = (0..zk.param.nreq).map(|_| MerkleNonce(rng.gen())).collect();
        pr.merkle.path = (0..zk.param.nreq + 3).map(|_| Digest(rng.gen())).collect();
        zk
    }

    #[test]
    fn test_write_read() {
        let zk = random_proof();
        let bytes = zk.write();
        assert!(bytes.len() <= zk.size());

        let c = product_circuit(12);
        let mut back = ZkProof::new(&c, &ZkParams::default().with_nreq(6)).unwrap();
        back.read(&bytes).unwrap();
        assert_eq!(back, zk);
    }

    #[test]
    fn test_truncated_and_trailing_rejected() {
        let zk = random_proof();
        let bytes = zk.write();
        let c = product_circuit(12);
        let params = ZkParams::default().with_nreq(6);

        for cut in [0, 31, 40, bytes.len() / 2, bytes.len() - 1] {
            let mut back = ZkProof::new(&c, &params).unwrap();
            assert!(matches!(back.read(&bytes[..cut]), Err(ZkError::MalformedProof(_))), "cut={}", cut);
        }

        let mut longer = bytes.clone();
        longer.push(0);
        let mut back = ZkProof::new(&c, &params).unwrap();
        assert!(back.read(&longer).is_err());
    }

    #[test]
    fn test_bad_lengths_rejected() {
        let zk = random_proof();
        let bytes = zk.write();
        let c = product_circuit(12);
        let params = ZkParams::default().with_nreq(6);

        // the first run header follows the nonces
        let p = &zk.param;
        let sc: usize = zk.proof.l.iter().map(|l| 4 * l.hp[0].len() + 2).sum();
        let run_at = 32 + sc * Fr::BYTES + (2 * p.dblock + p.r) * Fr::BYTES + p.nreq * 32;
        let mut bad = bytes.clone();
        bad[run_at..run_at + 4].copy_from_slice(&u32_to_le(u32::MAX));
        let mut back = ZkProof::new(&c, &params).unwrap();
        assert_eq!(back.read(&bad), Err(ZkError::MalformedProof("bad run length".to_string())));

        // path length header is the last 4 bytes before the digests
        let npath = zk.com_proof.merkle.path.len();
        let path_at = bytes.len() - npath * 32 - 4;
        let mut bad = bytes.clone();
        bad[path_at..path_at + 4].copy_from_slice(&u32_to_le(1));
        let mut back = ZkProof::new(&c, &params).unwrap();
        assert_eq!(back.read(&bad), Err(ZkError::MalformedProof("bad merkle path length".to_string())));
    }

    #[test]
    fn test_non_canonical_element_rejected() {
        let zk = random_proof();
        let mut bytes = zk.write();
        // first sum-check element set to all ones, above the modulus
        bytes[32..32 + Fr::BYTES].iter_mut().for_each(|b| *b = 0xff);
        let c = product_circuit(12);
        let mut back = ZkProof::new(&c, &ZkParams::default().with_nreq(6)).unwrap();
        assert!(back.read(&bytes).is_err());
    }

    #[test]
    fn test_new_rejects_bad_params() {
        let c = product_circuit(12);
        assert!(ZkProof::new(&c, &ZkParams::default().with_rate(0)).is_err());
    }
}
