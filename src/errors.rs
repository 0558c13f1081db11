//! Error types for the proof engine

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZkError {
    /// The witness does not satisfy the circuit (failed assert0 or nonzero output).
    #[error("Invalid witness: {0}")]
    InvalidWitness(String),

    #[error("Malformed proof: {0}")]
    MalformedProof(String),

    #[error("Malformed circuit: {0}")]
    MalformedCircuit(String),

    /// A Ligero check rejected the proof. The payload is a short machine-readable reason.
    #[error("Ligero verification failed: {0}")]
    Ligero(&'static str),

    #[error("Sum-check protocol failed: {0}")]
    SumcheckFailed(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, ZkError>;
