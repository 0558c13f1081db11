//! Sum-check proof and challenge containers

use super::univariate::Poly;
use crate::circuit::Circuit;
use crate::field::ZkField;

/// Upper bound on the number of variables bound per dimension.
pub const MAX_BINDINGS: usize = 40;

/// Round message over a copy variable: `eq · W · W`, degree 3.
pub type CPoly<F> = Poly<F, 4>;
/// Round message over a hand variable: `W · Q`, degree 2.
pub type WPoly<F> = Poly<F, 3>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerProof<F: ZkField> {
    /// one message per copy round
    pub cp: Vec<CPoly<F>>,
    /// `hp[hand][round]`
    pub hp: [Vec<WPoly<F>>; 2],
    /// claimed values of the two bound input wires
    pub wc: [F; 2],
}

impl<F: ZkField> LayerProof<F> {
    pub fn new(logc: usize, logw: usize) -> Self {
        Self {
            cp: vec![CPoly::zero(); logc],
            hp: [vec![WPoly::zero(); logw], vec![WPoly::zero(); logw]],
            wc: [F::zero(); 2],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof<F: ZkField> {
    pub l: Vec<LayerProof<F>>,
}

impl<F: ZkField> Proof<F> {
    /// All-zero proof shaped for `circuit`.
    pub fn new(circuit: &Circuit<F>) -> Self {
        Self {
            l: circuit
                .layers
                .iter()
                .map(|layer| LayerProof::new(circuit.logc, layer.logw))
                .collect(),
        }
    }
}

/// Values the prover learns while proving and hands to the constraint
/// builder so it does not have to bind the quads a second time.
#[derive(Clone, Debug, Default)]
pub struct ProofAux<F: ZkField> {
    pub bound_quad: Vec<F>,
}

impl<F: ZkField> ProofAux<F> {
    pub fn new(nl: usize) -> Self {
        Self {
            bound_quad: vec![F::zero(); nl],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerChallenge<F: ZkField> {
    pub alpha: F,
    pub beta: F,
    /// challenges of the copy rounds
    pub cb: Vec<F>,
    /// `hb[hand][round]`
    pub hb: [Vec<F>; 2],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge<F: ZkField> {
    pub q: Vec<F>,
    pub g: Vec<F>,
    pub l: Vec<LayerChallenge<F>>,
}

impl<F: ZkField> Challenge<F> {
    pub fn new(q: Vec<F>, g: Vec<F>) -> Self {
        Self { q, g, l: Vec::new() }
    }
}
