//! Fiat-Shamir transcript
//!
//! Converts the interactive protocol into a non-interactive one by deriving
//! verifier challenges from a SHA-256 hash of everything written so far.
//!
//! Writes are typed: every value is preceded by a one-byte tag, and byte
//! strings and arrays also carry an 8-byte little-endian length. Challenges
//! are read from an AES-256 counter-mode stream keyed by the digest of the
//! transcript so far. The stream is created lazily and dropped on every
//! write, so a challenge always depends on every preceding message.

use super::RandomEngine;
use crate::field::ZkField;
use crate::utils::u64_to_le;
use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes256;
use sha2::{Digest, Sha256};

const TAG_BSTR: u8 = 0;
const TAG_FIELD_ELEM: u8 = 1;
const TAG_ARRAY: u8 = 2;

const PRF_BLOCK: usize = 16;

/// Encoding revision of the transcript.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TranscriptVersion {
    /// Arrays are tagged with the field-element tag.
    #[default]
    V3,
    /// Arrays carry their own tag.
    V4,
}

impl TranscriptVersion {
    pub fn from_number(n: usize) -> Option<Self> {
        match n {
            3 => Some(Self::V3),
            4 => Some(Self::V4),
            _ => None,
        }
    }

    pub fn number(self) -> usize {
        match self {
            Self::V3 => 3,
            Self::V4 => 4,
        }
    }

    fn array_tag(self) -> u8 {
        match self {
            Self::V3 => TAG_FIELD_ELEM,
            Self::V4 => TAG_ARRAY,
        }
    }
}

/// AES-256 in counter mode over a little-endian block index.
struct FsPrf {
    cipher: Aes256,
    nblock: u64,
    rdptr: usize,
    saved: [u8; PRF_BLOCK],
}

impl FsPrf {
    // a 128-bit block allows 2^64 blocks; 2^40 is plenty
    const MAX_BLOCKS: u64 = 1 << 40;

    fn new(key: &[u8]) -> Self {
        Self {
            cipher: Aes256::new(GenericArray::from_slice(key)),
            nblock: 0,
            rdptr: PRF_BLOCK,
            saved: [0u8; PRF_BLOCK],
        }
    }

    fn bytes(&mut self, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            if self.rdptr == PRF_BLOCK {
                self.refill();
            }
            *b = self.saved[self.rdptr];
            self.rdptr += 1;
        }
    }

    fn refill(&mut self) {
        assert!(self.nblock < Self::MAX_BLOCKS, "too many blocks");
        let mut block = GenericArray::from([0u8; PRF_BLOCK]);
        block[..8].copy_from_slice(&u64_to_le(self.nblock));
        self.nblock += 1;
        self.cipher.encrypt_block(&mut block);
        self.saved.copy_from_slice(&block);
        self.rdptr = 0;
    }
}

/// Hash-chained Fiat-Shamir oracle.
///
/// `Clone` is deliberately not implemented; use [`Transcript::fork`] where
/// two protocols continue from a shared prefix.
pub struct Transcript {
    sha: Sha256,
    prf: Option<FsPrf>,
    version: TranscriptVersion,
}

impl Transcript {
    /// Create a transcript bound to the public initialization bytes `init`.
    pub fn new(init: &[u8]) -> Self {
        Self::with_version(init, TranscriptVersion::default())
    }

    pub fn with_version(init: &[u8], version: TranscriptVersion) -> Self {
        let mut ts = Self {
            sha: Sha256::new(),
            prf: None,
            version,
        };
        ts.write_bytes(init);
        ts
    }

    /// Independent transcript continuing from the same absorbed state.
    pub fn fork(&self) -> Self {
        Self {
            sha: self.sha.clone(),
            prf: None,
            version: self.version,
        }
    }

    pub fn version(&self) -> TranscriptVersion {
        self.version
    }

    /// Digest of everything written so far. The running hash is unchanged.
    pub fn snapshot(&self) -> [u8; 32] {
        self.sha.clone().finalize().into()
    }

    /// Absorb a byte string.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.tag(TAG_BSTR);
        self.length(data.len());
        self.write_untyped(data);
    }

    /// Absorb a byte string of `n` zeros.
    pub fn write0(&mut self, n: usize) {
        self.tag(TAG_BSTR);
        self.length(n);
        let zeros = [0u8; 32];
        let mut n = n;
        while n > zeros.len() {
            self.write_untyped(&zeros);
            n -= zeros.len();
        }
        self.write_untyped(&zeros[..n]);
    }

    /// Absorb one field element.
    pub fn write_elt<F: ZkField>(&mut self, e: &F) {
        self.tag(TAG_FIELD_ELEM);
        self.write_untyped_elt(e);
    }

    /// Absorb an array of field elements.
    pub fn write_elts<F: ZkField>(&mut self, es: &[F]) {
        self.tag(self.version.array_tag());
        self.length(es.len());
        for e in es {
            self.write_untyped_elt(e);
        }
    }

    fn tag(&mut self, t: u8) {
        self.write_untyped(&[t]);
    }

    fn length(&mut self, n: usize) {
        self.write_untyped(&u64_to_le(n as u64));
    }

    fn write_untyped(&mut self, data: &[u8]) {
        self.prf = None;
        self.sha.update(data);
    }

    fn write_untyped_elt<F: ZkField>(&mut self, e: &F) {
        let mut buf = Vec::with_capacity(F::BYTES);
        e.write_bytes_field(&mut buf);
        self.write_untyped(&buf);
    }
}

impl RandomEngine for Transcript {
    fn bytes(&mut self, buf: &mut [u8]) {
        if self.prf.is_none() {
            let key = self.snapshot();
            self.prf = Some(FsPrf::new(&key));
        }
        if let Some(prf) = self.prf.as_mut() {
            prf.bytes(buf);
        }
    }
}
