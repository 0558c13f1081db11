//! Circuit byte format
//!
//! ```text
//! version(1) field_id nv nc npub_in subfield_boundary ninputs nl
//! nconst const[nconst]
//! per layer: logw nw nq, per corner: dg dh0 dh1 const_index
//! id(32)
//! ```
//!
//! Every number is 3 bytes little-endian. Corner indices are written as
//! differences from the previous corner, with the sign in the low bit.
//! Coefficients are stored once in a constant table and referenced by
//! index.

use super::{Circuit, Corner, Layer, Quad};
use crate::errors::{Result, ZkError};
use crate::field::ZkField;
use crate::utils::lg;
use std::collections::HashMap;

const VERSION: u8 = 1;
const BYTES_WRITTEN: usize = 3;
const MAX_VALUE: usize = (1 << (8 * BYTES_WRITTEN)) - 1;
const MAX_LAYERS: usize = 10000;

fn malformed(msg: &str) -> ZkError {
    ZkError::MalformedCircuit(msg.to_string())
}

fn write_num(out: &mut Vec<u8>, x: usize) -> Result<()> {
    if x >= MAX_VALUE {
        return Err(malformed("value does not fit in 3 bytes"));
    }
    out.extend_from_slice(&(x as u32).to_le_bytes()[..BYTES_WRITTEN]);
    Ok(())
}

fn write_index(out: &mut Vec<u8>, ind: usize, prev: usize) -> Result<()> {
    if ind >= prev {
        write_num(out, 2 * (ind - prev))
    } else {
        write_num(out, 2 * (prev - ind) + 1)
    }
}

pub fn circuit_to_bytes<F: ZkField>(c: &Circuit<F>) -> Result<Vec<u8>> {
    let mut out = vec![VERSION];
    for x in [F::FIELD_ID, c.nv, c.nc, c.npub_in, c.subfield_boundary, c.ninputs, c.nl] {
        write_num(&mut out, x)?;
    }

    let mut constants: Vec<F> = Vec::new();
    let mut table: HashMap<F, usize> = HashMap::new();
    let mut quads = Vec::new();
    for layer in &c.layers {
        write_num(&mut quads, layer.logw)?;
        write_num(&mut quads, layer.nw)?;
        write_num(&mut quads, layer.quad.n())?;

        let (mut pg, mut ph0, mut ph1) = (0usize, 0usize, 0usize);
        for corner in &layer.quad.c {
            let (g, h0, h1) = (corner.g as usize, corner.h[0] as usize, corner.h[1] as usize);
            write_index(&mut quads, g, pg)?;
            write_index(&mut quads, h0, ph0)?;
            write_index(&mut quads, h1, ph1)?;
            (pg, ph0, ph1) = (g, h0, h1);

            let ki = *table.entry(corner.v).or_insert_with(|| {
                constants.push(corner.v);
                constants.len() - 1
            });
            write_num(&mut quads, ki)?;
        }
    }

    write_num(&mut out, constants.len())?;
    for k in &constants {
        k.write_bytes_field(&mut out);
    }
    out.extend_from_slice(&quads);
    out.extend_from_slice(&c.id);
    Ok(out)
}

/// Bounds-checked cursor over untrusted bytes.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(malformed("truncated circuit"));
        }
        let s = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    fn num(&mut self) -> Result<usize> {
        let b = self.bytes(BYTES_WRITTEN)?;
        Ok(b.iter().rev().fold(0usize, |acc, &x| (acc << 8) | x as usize))
    }

    fn index(&mut self, prev: usize) -> Result<usize> {
        let delta = self.num()?;
        if delta & 1 == 1 {
            prev.checked_sub(delta >> 1).ok_or_else(|| malformed("negative index"))
        } else {
            Ok(prev + (delta >> 1))
        }
    }
}

pub fn circuit_from_bytes<F: ZkField>(bytes: &[u8]) -> Result<Circuit<F>> {
    let mut rd = Reader { buf: bytes, pos: 0 };

    if rd.bytes(1)?[0] != VERSION {
        return Err(malformed("unknown circuit version"));
    }
    let field_id = rd.num()?;
    let nv = rd.num()?;
    let nc = rd.num()?;
    let npub_in = rd.num()?;
    let subfield_boundary = rd.num()?;
    let ninputs = rd.num()?;
    let nl = rd.num()?;
    let nconst = rd.num()?;

    if field_id != F::FIELD_ID {
        return Err(malformed("field mismatch"));
    }
    if npub_in > ninputs || subfield_boundary > ninputs || nl > MAX_LAYERS {
        return Err(malformed("inconsistent header"));
    }

    let need = nconst
        .checked_mul(F::BYTES)
        .ok_or_else(|| malformed("constant table overflow"))?;
    if rd.remaining() < need {
        return Err(malformed("truncated constant table"));
    }
    let constants = (0..nconst)
        .map(|_| F::from_bytes_field(rd.bytes(F::BYTES)?).ok_or_else(|| malformed("bad constant")))
        .collect::<Result<Vec<F>>>()?;

    let mut layers = Vec::with_capacity(nl);
    let mut max_g = nv;
    for _ in 0..nl {
        let logw = rd.num()?;
        let nw = rd.num()?;
        let nq = rd.num()?;

        let need = nq
            .checked_mul(4 * BYTES_WRITTEN)
            .ok_or_else(|| malformed("quad overflow"))?;
        if rd.remaining() < need {
            return Err(malformed("truncated quad"));
        }

        let mut c = Vec::with_capacity(nq);
        let (mut pg, mut ph0, mut ph1) = (0usize, 0usize, 0usize);
        for _ in 0..nq {
            let g = rd.index(pg)?;
            let h0 = rd.index(ph0)?;
            let h1 = rd.index(ph1)?;
            if g >= max_g || h0 >= nw || h1 >= nw {
                return Err(malformed("corner out of range"));
            }
            (pg, ph0, ph1) = (g, h0, h1);
            let vi = rd.num()?;
            let v = *constants.get(vi).ok_or_else(|| malformed("constant index out of range"))?;
            c.push(Corner::new(g as u32, h0 as u32, h1 as u32, v));
        }
        layers.push(Layer {
            nw,
            logw,
            quad: Quad::new(c),
        });
        max_g = nw;
    }

    let mut id = [0u8; 32];
    id.copy_from_slice(rd.bytes(32)?);

    let circuit = Circuit {
        nv,
        logv: lg(nv),
        nc,
        logc: lg(nc),
        nl,
        ninputs,
        npub_in,
        subfield_boundary,
        layers,
        id,
    };
    circuit.validate()?;
    Ok(circuit)
}
