//! Hiding vector commitment on top of [`MerkleTree`]
//!
//! Leaf `i` is `SHA256(nonce_i || payload_i)` with a fresh 32-byte nonce per
//! leaf, so an unopened leaf reveals nothing about its payload. The payload
//! is supplied by a callback that feeds bytes into the leaf hasher.

use super::{Digest, MerkleTree, MerkleTreeVerifier};
use crate::random::RandomEngine;
use rayon::prelude::*;
use sha2::{Digest as _, Sha256};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MerkleNonce(pub [u8; 32]);

impl MerkleNonce {
    pub const LENGTH: usize = 32;
}

/// Opening of a set of leaves: one nonce per opened leaf, in request order,
/// and the compressed authentication path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MerkleProof {
    pub nonce: Vec<MerkleNonce>,
    pub path: Vec<Digest>,
}

/// Length of a single-leaf authentication path for `n` leaves.
pub fn merkle_commitment_len(n: usize) -> usize {
    super::merkle_tree_len(n)
}

fn leaf_hash<U>(nonce: &MerkleNonce, i: usize, updhash: &U) -> Digest
where
    U: Fn(usize, &mut Sha256),
{
    let mut sha = Sha256::new();
    sha.update(nonce.0);
    updhash(i, &mut sha);
    Digest::from_sha(sha)
}

pub struct MerkleCommitment {
    n: usize,
    tree: MerkleTree,
    nonce: Vec<MerkleNonce>,
}

impl MerkleCommitment {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            tree: MerkleTree::new(n),
            nonce: vec![MerkleNonce::default(); n],
        }
    }

    /// Commit to `n` leaves whose payloads are produced by `updhash(i, sha)`.
    ///
    /// Nonces are drawn from `rng` in leaf order before any hashing happens.
    pub fn commit<U, E>(&mut self, updhash: U, rng: &mut E) -> Digest
    where
        U: Fn(usize, &mut Sha256) + Sync,
        E: RandomEngine + ?Sized,
    {
        for nonce in self.nonce.iter_mut() {
            rng.bytes(&mut nonce.0);
        }

        const PARALLEL_THRESHOLD: usize = 64;
        let leaves: Vec<Digest> = if self.n >= PARALLEL_THRESHOLD {
            self.nonce
                .par_iter()
                .enumerate()
                .map(|(i, nonce)| leaf_hash(nonce, i, &updhash))
                .collect()
        } else {
            self.nonce
                .iter()
                .enumerate()
                .map(|(i, nonce)| leaf_hash(nonce, i, &updhash))
                .collect()
        };

        for (i, leaf) in leaves.into_iter().enumerate() {
            self.tree.set_leaf(i, leaf);
        }
        self.tree.build_tree()
    }

    pub fn open(&self, pos: &[usize]) -> MerkleProof {
        MerkleProof {
            nonce: pos.iter().map(|&p| self.nonce[p]).collect(),
            path: self.tree.generate_compressed_proof(pos),
        }
    }
}

pub struct MerkleCommitmentVerifier;

impl MerkleCommitmentVerifier {
    /// Check an opening of the leaves at `pos`. `updhash(r, sha)` feeds the
    /// payload of the `r`-th opened leaf (an index into `pos`, not a leaf
    /// position).
    pub fn verify<U>(n: usize, root: &Digest, proof: &MerkleProof, pos: &[usize], updhash: U) -> bool
    where
        U: Fn(usize, &mut Sha256),
    {
        if proof.nonce.len() != pos.len() {
            return false;
        }
        let leaves: Vec<Digest> = proof
            .nonce
            .iter()
            .enumerate()
            .map(|(r, nonce)| leaf_hash(nonce, r, &updhash))
            .collect();

        MerkleTreeVerifier::new(n, *root).verify_compressed_proof(&proof.path, &leaves, pos)
    }
}
