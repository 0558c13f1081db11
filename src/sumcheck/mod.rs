//! Sum-check protocol over layered circuits
//!
//! Reduces the claim that every circuit output is zero, layer by layer, to
//! two claims on the multilinear extension of the input wires.

mod prover;
mod verifier;
pub mod proof;
pub mod transcript;
pub mod univariate;

pub use proof::{Challenge, CPoly, LayerChallenge, LayerProof, Proof, ProofAux, WPoly, MAX_BINDINGS};
pub use prover::{Bindings, CircuitValues, ProverLayers};
pub use transcript::TranscriptSumcheck;
pub use univariate::{DotInterpolation, Poly};
pub use verifier::SumcheckVerifier;
