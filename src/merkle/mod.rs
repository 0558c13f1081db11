//! Binary SHA-256 Merkle trees with compressed multi-leaf openings
//!
//! The tree over `n` leaves is stored in heap order: leaves occupy
//! `[n, 2n)`, the parent of node `i` is `i / 2`, and the root is node 1.
//! `n` need not be a power of two.
//!
//! A compressed proof for a set of leaves contains, for every inner node
//! on a path from an opened leaf to the root, the hash of its child that
//! is not itself on such a path. Nodes the verifier can recompute are never
//! sent.

pub mod commitment;

pub use commitment::{merkle_commitment_len, MerkleCommitment, MerkleCommitmentVerifier, MerkleNonce, MerkleProof};

use sha2::{Digest as _, Sha256};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    pub const LENGTH: usize = 32;

    pub fn hash2(l: &Digest, r: &Digest) -> Digest {
        let mut sha = Sha256::new();
        sha.update(l.0);
        sha.update(r.0);
        Digest(sha.finalize().into())
    }

    pub fn from_sha(sha: Sha256) -> Digest {
        Digest(sha.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Digest> {
        Some(Digest(bytes.try_into().ok()?))
    }
}

/// Upper bound on the number of digests a single-leaf path can need in a
/// tree of `n` leaves.
pub fn merkle_tree_len(n: usize) -> usize {
    let mut r = 1;
    let mut pos = 2 * n - 1;
    while pos > 1 {
        pos >>= 1;
        r += 1;
    }
    r
}

/// Mark every node on a path from a leaf in `pos` to the root.
///
/// Returns `None` for an empty set, an out-of-range position or a
/// duplicate position.
fn compressed_proof_tree(n: usize, pos: &[usize]) -> Option<Vec<bool>> {
    if pos.is_empty() {
        return None;
    }
    let mut tree = vec![false; 2 * n];
    for &p in pos {
        if p >= n || tree[p + n] {
            return None;
        }
        tree[p + n] = true;
    }
    for i in (1..n).rev() {
        tree[i] = tree[2 * i] || tree[2 * i + 1];
    }
    Some(tree)
}

/// The child of `i` that is absent from `tree`, if exactly one is.
fn missing_child(tree: &[bool], i: usize) -> Option<usize> {
    let mut child = 2 * i;
    if tree[child] {
        child = 2 * i + 1;
    }
    if tree[child] {
        None
    } else {
        Some(child)
    }
}

pub struct MerkleTree {
    n: usize,
    layers: Vec<Digest>,
}

impl MerkleTree {
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "empty Merkle tree");
        Self {
            n,
            layers: vec![Digest::default(); 2 * n],
        }
    }

    pub fn num_leaves(&self) -> usize {
        self.n
    }

    pub fn set_leaf(&mut self, pos: usize, leaf: Digest) {
        assert!(pos < self.n, "Invalid position for leaf in Merkle tree");
        self.layers[pos + self.n] = leaf;
    }

    /// Hash all inner nodes and return the root.
    pub fn build_tree(&mut self) -> Digest {
        for i in (1..self.n).rev() {
            self.layers[i] = Digest::hash2(&self.layers[2 * i], &self.layers[2 * i + 1]);
        }
        self.layers[1]
    }

    pub fn root(&self) -> Digest {
        self.layers[1]
    }

    /// Compressed proof for the leaves at `pos`, which must be distinct,
    /// in range and non-empty.
    pub fn generate_compressed_proof(&self, pos: &[usize]) -> Vec<Digest> {
        let tree = match compressed_proof_tree(self.n, pos) {
            Some(tree) => tree,
            None => panic!("invalid Merkle opening positions"),
        };

        let mut proof = Vec::new();
        for i in (1..self.n).rev() {
            if tree[i] {
                if let Some(child) = missing_child(&tree, i) {
                    proof.push(self.layers[child]);
                }
            }
        }
        proof
    }
}

pub struct MerkleTreeVerifier {
    n: usize,
    root: Digest,
}

impl MerkleTreeVerifier {
    pub fn new(n: usize, root: Digest) -> Self {
        Self { n, root }
    }

    /// Check that `leaves[i]` sits at position `pos[i]` under the root.
    ///
    /// Never panics: malformed positions, mismatched lengths and short
    /// proofs all yield `false`.
    pub fn verify_compressed_proof(&self, proof: &[Digest], leaves: &[Digest], pos: &[usize]) -> bool {
        if self.n == 0 || leaves.len() != pos.len() {
            return false;
        }
        let tree = match compressed_proof_tree(self.n, pos) {
            Some(tree) => tree,
            None => return false,
        };

        let mut layers = vec![Digest::default(); 2 * self.n];
        let mut defined = vec![false; 2 * self.n];

        let mut path = proof.iter();
        for i in (1..self.n).rev() {
            if tree[i] {
                if let Some(child) = missing_child(&tree, i) {
                    match path.next() {
                        Some(d) => {
                            layers[child] = *d;
                            defined[child] = true;
                        }
                        None => return false,
                    }
                }
            }
        }

        for (&p, leaf) in pos.iter().zip(leaves) {
            layers[p + self.n] = *leaf;
            defined[p + self.n] = true;
        }

        for i in (1..self.n).rev() {
            if defined[2 * i] && defined[2 * i + 1] {
                layers[i] = Digest::hash2(&layers[2 * i], &layers[2 * i + 1]);
                defined[i] = true;
            }
        }

        defined[1] && layers[1] == self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::test_rng;
    use rand::Rng;

    fn random_digest<R: Rng>(rng: &mut R) -> Digest {
        let mut d = [0u8; 32];
        rng.fill(&mut d[..]);
        Digest(d)
    }

    fn build(n: usize) -> (MerkleTree, Vec<Digest>) {
        let mut rng = test_rng();
        let leaves: Vec<Digest> = (0..n).map(|_| random_digest(&mut rng)).collect();
        let mut mt = MerkleTree::new(n);
        for (i, l) in leaves.iter().enumerate() {
            mt.set_leaf(i, *l);
        }
        mt.build_tree();
        (mt, leaves)
    }

    #[test]
    fn test_tree_len() {
        assert_eq!(merkle_tree_len(1), 1);
        assert_eq!(merkle_tree_len(2), 2);
        assert_eq!(merkle_tree_len(3), 3);
        assert_eq!(merkle_tree_len(4), 3);
        assert_eq!(merkle_tree_len(5), 4);
        assert_eq!(merkle_tree_len(1024), 11);
    }

    #[test]
    fn test_root_of_two() {
        let (mt, leaves) = build(2);
        assert_eq!(mt.root(), Digest::hash2(&leaves[0], &leaves[1]));
    }

    #[test]
    fn test_all_subsets() {
        for n in 1..=7usize {
            let (mt, leaves) = build(n);
            let mtv = MerkleTreeVerifier::new(n, mt.root());
            for mask in 1u32..(1 << n) {
                let pos: Vec<usize> = (0..n).filter(|&i| mask & (1 << i) != 0).collect();
                let opened: Vec<Digest> = pos.iter().map(|&p| leaves[p]).collect();
                let proof = mt.generate_compressed_proof(&pos);
                assert!(proof.len() <= pos.len() * merkle_tree_len(n));
                assert!(mtv.verify_compressed_proof(&proof, &opened, &pos), "n={} mask={:b}", n, mask);
            }
        }
    }

    #[test]
    fn test_order_of_positions_is_irrelevant() {
        let (mt, leaves) = build(13);
        let mtv = MerkleTreeVerifier::new(13, mt.root());
        let pos = vec![11, 2, 7, 3];
        let opened: Vec<Digest> = pos.iter().map(|&p| leaves[p]).collect();
        let proof = mt.generate_compressed_proof(&pos);
        assert!(mtv.verify_compressed_proof(&proof, &opened, &pos));
    }

    #[test]
    fn test_tampering_rejected() {
        let mut rng = test_rng();
        let n = 37;
        let (mt, leaves) = build(n);
        let mtv = MerkleTreeVerifier::new(n, mt.root());
        let pos = vec![0, 5, 6, 20, 36];
        let opened: Vec<Digest> = pos.iter().map(|&p| leaves[p]).collect();
        let proof = mt.generate_compressed_proof(&pos);
        assert!(mtv.verify_compressed_proof(&proof, &opened, &pos));

        for i in 0..opened.len() {
            let mut bad = opened.clone();
            bad[i].0[rng.gen_range(0..32)] ^= 1;
            assert!(!mtv.verify_compressed_proof(&proof, &bad, &pos));
        }
        for i in 0..proof.len() {
            let mut bad = proof.clone();
            bad[i].0[rng.gen_range(0..32)] ^= 0x80;
            assert!(!mtv.verify_compressed_proof(&bad, &opened, &pos));
        }

        // wrong position for a correct leaf
        let moved = vec![0, 5, 7, 20, 36];
        assert!(!mtv.verify_compressed_proof(&proof, &opened, &moved));
    }

    #[test]
    fn test_malformed_inputs_rejected() {
        let (mt, leaves) = build(8);
        let mtv = MerkleTreeVerifier::new(8, mt.root());
        let pos = vec![1, 4];
        let opened = vec![leaves[1], leaves[4]];
        let proof = mt.generate_compressed_proof(&pos);

        // short path
        assert!(!mtv.verify_compressed_proof(&proof[..proof.len() - 1], &opened, &pos));
        assert!(!mtv.verify_compressed_proof(&[], &opened, &pos));
        // empty, out of range, duplicate, mismatched lengths
        assert!(!mtv.verify_compressed_proof(&proof, &[], &[]));
        assert!(!mtv.verify_compressed_proof(&proof, &opened, &[1, 8]));
        assert!(!mtv.verify_compressed_proof(&proof, &[leaves[1], leaves[1]], &[1, 1]));
        assert!(!mtv.verify_compressed_proof(&proof, &opened[..1], &pos));
    }
}
