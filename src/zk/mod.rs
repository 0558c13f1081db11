//! Zero-knowledge wrapper around the sum-check prover
//!
//! The prover never reveals a sum-check message. Each message is sent
//! minus a random pad; the pads and the private inputs are committed with
//! Ligero, and the verifier's checks on the true messages become linear
//! and quadratic constraints on the committed values.
//!
//! Only circuits without copies (`nc = 1`) are supported.

pub mod common;
pub mod proof;
pub mod prover;
pub mod verifier;

pub use common::{ConstraintBuilder, Expression, LinearSystem, PadLayout, ZkCommon, HASH_OF_A};
pub use proof::{ZkProof, MAX_NUM_DIGESTS, MAX_RUN_LEN};
pub use prover::ZkProver;
pub use verifier::ZkVerifier;
