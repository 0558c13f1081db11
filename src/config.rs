//! Proof system parameters shared by prover, verifier and proof codec

use crate::errors::{Result, ZkError};
use crate::random::{Transcript, TranscriptVersion};

/// Parameters both parties must agree on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZkParams {
    /// inverse rate of the Reed-Solomon code
    pub rate: usize,
    /// number of opened columns
    pub nreq: usize,
    /// numeric transcript encoding revision
    pub transcript_version: usize,
}

impl Default for ZkParams {
    fn default() -> Self {
        Self {
            rate: 4,
            nreq: 128,
            transcript_version: TranscriptVersion::V3.number(),
        }
    }
}

impl ZkParams {
    pub fn with_rate(mut self, rate: usize) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_nreq(mut self, nreq: usize) -> Self {
        self.nreq = nreq;
        self
    }

    pub fn with_transcript_version(mut self, version: usize) -> Self {
        self.transcript_version = version;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.rate == 0 {
            return Err(ZkError::InvalidParameter("rate must be positive".to_string()));
        }
        if self.nreq == 0 {
            return Err(ZkError::InvalidParameter("nreq must be positive".to_string()));
        }
        self.version().map(|_| ())
    }

    pub fn version(&self) -> Result<TranscriptVersion> {
        TranscriptVersion::from_number(self.transcript_version).ok_or_else(|| {
            ZkError::InvalidParameter(format!("unknown transcript version {}", self.transcript_version))
        })
    }

    /// A fresh transcript with the configured encoding.
    pub fn transcript(&self, init: &[u8]) -> Result<Transcript> {
        Ok(Transcript::with_version(init, self.version()?))
    }
}
