//! # zk-ligero: zero-knowledge proofs for layered quadratic circuits
//!
//! A prover convinces a verifier that it knows private inputs driving every
//! output of a layered arithmetic circuit to zero. The sum-check protocol
//! reduces each layer to a claim about the next; its messages are padded
//! with random values, and a Ligero commitment proves that the pads satisfy
//! the constraints the verifier would have checked on the true messages.
//!
//! ## Structure
//!
//! - `field`: the field capability and the BLS12-381 scalar field
//! - `random`: random engines and the Fiat-Shamir transcript
//! - `merkle`: SHA-256 Merkle trees and hiding vector commitments
//! - `polynomial`: dense wire arrays, equality tables, Reed-Solomon extension
//! - `circuit`: layered circuits, quads and their byte format
//! - `sumcheck`: the layered sum-check prover and a plain verifier
//! - `ligero`: the Ligero commitment with linear and quadratic constraints
//! - `zk`: the zero-knowledge prover, verifier and proof format
//! - `config`: parameters shared by both parties
//!
//! ## Usage
//!
//! ```ignore
//! let params = ZkParams::default();
//! let mut zkp = ZkProof::new(&circuit, &params)?;
//!
//! let mut prover = ZkProver::new(&circuit, &params, ReedSolomonFactory)?;
//! let mut tp = params.transcript(b"session")?;
//! prover.commit(&mut zkp, &inputs, &mut tp, &mut RngEngine::new(OsRng))?;
//! prover.prove(&mut zkp, &inputs, &mut tp)?;
//! let bytes = zkp.write();
//!
//! let mut zkv = ZkProof::new(&circuit, &params)?;
//! zkv.read(&bytes)?;
//! let verifier = ZkVerifier::new(&circuit, &params, ReedSolomonFactory)?;
//! let mut tv = params.transcript(b"session")?;
//! verifier.recv_commitment(&zkv, &mut tv);
//! verifier.verify(&zkv, &public_inputs, &mut tv)?;
//! ```

pub mod circuit;
pub mod config;
pub mod field;
pub mod ligero;
pub mod merkle;
pub mod polynomial;
pub mod random;
pub mod sumcheck;
pub mod zk;

pub mod errors;
pub mod utils;

// Re-exports
pub use circuit::{Circuit, Corner, Layer, Quad};
pub use config::ZkParams;
pub use errors::{Result, ZkError};
pub use field::{Bls12381Fr, ZkField};
pub use polynomial::{Dense, ReedSolomonFactory};
pub use random::{RandomEngine, RngEngine, Transcript, TranscriptVersion};
pub use zk::{ZkProof, ZkProver, ZkVerifier};
