//! Layered arithmetic circuits
//!
//! Layer 0 produces the `nv` circuit outputs; layer `l` reads the wires
//! produced by layer `l + 1`, and the last layer reads the `ninputs` input
//! wires. The whole circuit is replicated `nc` times in parallel over
//! independent inputs. A valid witness drives every output to zero.

pub mod codec;
pub mod quad;

pub use codec::{circuit_from_bytes, circuit_to_bytes};
pub use quad::{Corner, Quad};

use crate::errors::{Result, ZkError};
use crate::field::ZkField;
use crate::utils::lg;
use sha2::{Digest, Sha256};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer<F: ZkField> {
    /// number of input wires of this layer
    pub nw: usize,
    pub logw: usize,
    pub quad: Quad<F>,
}

impl<F: ZkField> Layer<F> {
    /// A layer over `nw` input wires; the quad is canonicalized.
    pub fn new(nw: usize, mut quad: Quad<F>) -> Self {
        quad.canonicalize();
        Self {
            nw,
            logw: lg(nw),
            quad,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Circuit<F: ZkField> {
    pub nv: usize,
    pub logv: usize,
    pub nc: usize,
    pub logc: usize,
    pub nl: usize,
    pub ninputs: usize,
    pub npub_in: usize,
    /// inputs below this index lie in the subfield
    pub subfield_boundary: usize,
    pub layers: Vec<Layer<F>>,
    pub id: [u8; 32],
}

impl<F: ZkField> Circuit<F> {
    /// Assemble a circuit from its layers, output layer first, and compute
    /// its identifier.
    pub fn new(
        nv: usize,
        nc: usize,
        npub_in: usize,
        subfield_boundary: usize,
        layers: Vec<Layer<F>>,
    ) -> Result<Self> {
        let ninputs = layers.last().map(|l| l.nw).unwrap_or(0);
        let mut c = Self {
            nv,
            logv: lg(nv),
            nc,
            logc: lg(nc),
            nl: layers.len(),
            ninputs,
            npub_in,
            subfield_boundary,
            layers,
            id: [0u8; 32],
        };
        c.validate()?;
        c.id = circuit_id(&c);
        Ok(c)
    }

    /// Structural checks: sizes are consistent and every corner indexes
    /// an existing wire.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(ZkError::MalformedCircuit(msg));
        if self.nl == 0 || self.nl != self.layers.len() {
            return fail(format!("bad layer count {}", self.nl));
        }
        if self.nv == 0 || self.nc == 0 {
            return fail("empty circuit".to_string());
        }
        if self.logv != lg(self.nv) || self.logc != lg(self.nc) {
            return fail("inconsistent logarithms".to_string());
        }
        if self.npub_in > self.ninputs || self.subfield_boundary > self.ninputs {
            return fail("public inputs exceed inputs".to_string());
        }
        if self.layers[self.nl - 1].nw != self.ninputs {
            return fail("last layer does not read the inputs".to_string());
        }

        let mut ng = self.nv;
        for (ly, layer) in self.layers.iter().enumerate() {
            if layer.nw == 0 || layer.logw != lg(layer.nw) {
                return fail(format!("layer {} has bad width", ly));
            }
            for c in &layer.quad.c {
                if c.g as usize >= ng || c.h[0] as usize >= layer.nw || c.h[1] as usize >= layer.nw {
                    return fail(format!("layer {} corner out of range", ly));
                }
            }
            ng = layer.nw;
        }
        Ok(())
    }

    /// Total number of quad corners.
    pub fn nterms(&self) -> usize {
        self.layers.iter().map(|l| l.quad.n()).sum()
    }
}

/// SHA-256 identifier of the circuit structure and coefficients.
pub fn circuit_id<F: ZkField>(c: &Circuit<F>) -> [u8; 32] {
    const ODD: u64 = 0x1;
    let update8 = |sha: &mut Sha256, x: u64| sha.update(x.to_le_bytes());

    let mut sha = Sha256::new();
    // an odd prime field is determined by the encoding of -1
    update8(&mut sha, ODD);
    sha.update((-F::one()).to_bytes_field());

    for x in [c.nv, c.logv, c.nc, c.logc, c.nl, c.ninputs, c.npub_in, c.subfield_boundary] {
        update8(&mut sha, x as u64);
    }
    for layer in &c.layers {
        update8(&mut sha, layer.nw as u64);
        update8(&mut sha, layer.logw as u64);
        update8(&mut sha, layer.quad.n() as u64);
        for corner in &layer.quad.c {
            update8(&mut sha, corner.g as u64);
            update8(&mut sha, corner.h[0] as u64);
            update8(&mut sha, corner.h[1] as u64);
            sha.update(corner.v.to_bytes_field());
        }
    }
    sha.finalize().into()
}
