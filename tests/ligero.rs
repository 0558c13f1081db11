//! Ligero commitment with linear and quadratic constraints

use ark_ff::One;
use ark_std::{test_rng, UniformRand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use zk_ligero::ligero::{
    LigeroCommitment, LigeroHash, LigeroParam, LigeroProof, LigeroProver, LigeroVerifier, LinearConstraint,
    QuadraticConstraint,
};
use zk_ligero::{Bls12381Fr as Fr, ReedSolomonFactory, RngEngine, Transcript, ZkError};

const HASH: LigeroHash = LigeroHash([7u8; 32]);

fn commit_and_prove(
    p: &LigeroParam,
    w: &[Fr],
    llterm: &[LinearConstraint<Fr>],
    nl: usize,
    lqc: &[QuadraticConstraint],
) -> Result<(LigeroCommitment, LigeroProof<Fr>), ZkError> {
    let mut ts = Transcript::new(b"ligero scenario");
    let mut rng = RngEngine::new(StdRng::seed_from_u64(99));
    let mut prover = LigeroProver::new(p);
    let com = prover.commit(&mut ts, w, 0, lqc, &ReedSolomonFactory, &mut rng)?;
    let proof = prover.prove(&mut ts, nl, llterm, &HASH, lqc, &ReedSolomonFactory);
    Ok((com, proof))
}

fn check(
    p: &LigeroParam,
    com: &LigeroCommitment,
    proof: &LigeroProof<Fr>,
    llterm: &[LinearConstraint<Fr>],
    b: &[Fr],
    lqc: &[QuadraticConstraint],
) -> Result<(), ZkError> {
    let mut ts = Transcript::new(b"ligero scenario");
    LigeroVerifier::receive_commitment(com, &mut ts);
    LigeroVerifier::verify(p, com, proof, &mut ts, llterm, &HASH, b, lqc, &ReedSolomonFactory)
}

/// `W = [3, 4, 12]` with `W0 + W1 = 7` and `W2 = W0 · W1`.
#[test]
fn test_small_scenario() {
    let w = vec![Fr::from(3u64), Fr::from(4u64), Fr::from(12u64)];
    let llterm = vec![
        LinearConstraint { c: 0, w: 0, k: Fr::one() },
        LinearConstraint { c: 0, w: 1, k: Fr::one() },
    ];
    let lqc = vec![QuadraticConstraint { x: 0, y: 1, z: 2 }];
    let p = LigeroParam::new::<Fr>(3, 1, 4, 6).unwrap();

    let (com, proof) = commit_and_prove(&p, &w, &llterm, 1, &lqc).unwrap();
    assert_eq!(check(&p, &com, &proof, &llterm, &[Fr::from(7u64)], &lqc), Ok(()));
    assert_eq!(
        check(&p, &com, &proof, &llterm, &[Fr::from(8u64)], &lqc),
        Err(ZkError::Ligero("wrong dot product"))
    );
}

#[test]
fn test_unsatisfied_product_cannot_be_committed() {
    let w = vec![Fr::from(3u64), Fr::from(4u64), Fr::from(13u64)];
    let lqc = vec![QuadraticConstraint { x: 0, y: 1, z: 2 }];
    let p = LigeroParam::new::<Fr>(3, 1, 4, 6).unwrap();
    let r = commit_and_prove(&p, &w, &[], 0, &lqc);
    assert!(matches!(r, Err(ZkError::InvalidWitness(_))));
}

#[test]
fn test_many_rows() {
    let mut rng = test_rng();
    let nw = 2000;
    let nq = 300;
    let mut w: Vec<Fr> = (0..nw).map(|_| Fr::rand(&mut rng)).collect();
    let lqc: Vec<QuadraticConstraint> = (0..nq)
        .map(|i| QuadraticConstraint { x: 2 * i, y: 2 * i + 1, z: nw - 1 - i })
        .collect();
    for q in &lqc {
        w[q.z] = w[q.x] * w[q.y];
    }

    // constraint c: sum of W[c], W[c + 500] and W[c + 1000] with weights
    let nl = 400;
    let mut llterm = Vec::new();
    let mut b = Vec::with_capacity(nl);
    for c in 0..nl {
        let mut rhs = Fr::from(0u64);
        for (j, off) in [0usize, 500, 1000].iter().enumerate() {
            let k = Fr::from((c * 3 + j + 1) as u64);
            llterm.push(LinearConstraint { c, w: c + off, k });
            rhs += k * w[c + off];
        }
        b.push(rhs);
    }

    let p = LigeroParam::new::<Fr>(nw, nq, 4, 32).unwrap();
    let (com, proof) = commit_and_prove(&p, &w, &llterm, nl, &lqc).unwrap();
    assert_eq!(check(&p, &com, &proof, &llterm, &b, &lqc), Ok(()));

    let mut bad = proof.clone();
    bad.y_dot[p.r] += Fr::one();
    assert!(check(&p, &com, &bad, &llterm, &b, &lqc).is_err());

    let mut bad = proof;
    bad.merkle.path[0].0[0] ^= 1;
    assert_eq!(check(&p, &com, &bad, &llterm, &b, &lqc), Err(ZkError::Ligero("merkle_check failed")));
}
