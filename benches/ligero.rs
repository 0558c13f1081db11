use ark_ff::Zero;
use ark_std::{test_rng, UniformRand};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use zk_ligero::ligero::{LigeroHash, LigeroParam, LigeroProver, LigeroVerifier, LinearConstraint, QuadraticConstraint};
use zk_ligero::{Bls12381Fr as Fr, ReedSolomonFactory, RngEngine, Transcript};

struct Instance {
    p: LigeroParam,
    w: Vec<Fr>,
    llterm: Vec<LinearConstraint<Fr>>,
    b: Vec<Fr>,
    lqc: Vec<QuadraticConstraint>,
}

/// `nw` witnesses, a tenth of them products of earlier pairs, and one
/// two-term linear constraint per witness.
fn instance(nw: usize) -> Instance {
    let mut rng = test_rng();
    let mut w: Vec<Fr> = (0..nw).map(|_| Fr::rand(&mut rng)).collect();
    let nq = nw / 10;
    let lqc: Vec<QuadraticConstraint> = (0..nq)
        .map(|i| QuadraticConstraint { x: 2 * i, y: 2 * i + 1, z: nw - 1 - i })
        .collect();
    for q in &lqc {
        w[q.z] = w[q.x] * w[q.y];
    }

    let mut llterm = Vec::with_capacity(2 * nw);
    let mut b = vec![Fr::zero(); nw - 1];
    for c in 0..nw - 1 {
        let k = Fr::from(c as u64 + 1);
        llterm.push(LinearConstraint { c, w: c, k });
        llterm.push(LinearConstraint { c, w: c + 1, k: -k });
        b[c] = k * (w[c] - w[c + 1]);
    }
    let p = LigeroParam::new::<Fr>(nw, nq, 4, 128).unwrap();
    Instance { p, w, llterm, b, lqc }
}

/// Benchmark: tableau layout, row extension and Merkle commitment
fn bench_ligero_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("ligero_commit");
    group.sample_size(10);

    for log_size in [10, 12, 14].iter() {
        let nw = 1usize << log_size;
        let inst = instance(nw);

        group.throughput(Throughput::Elements(nw as u64));
        group.bench_with_input(BenchmarkId::from_parameter(format!("nw=2^{}", log_size)), &nw, |b, _| {
            b.iter(|| {
                let mut prover = LigeroProver::new(&inst.p);
                let mut ts = Transcript::new(b"bench");
                let mut rng = RngEngine::new(test_rng());
                black_box(prover.commit(&mut ts, &inst.w, 0, &inst.lqc, &ReedSolomonFactory, &mut rng))
            });
        });
    }
    group.finish();
}

/// Benchmark: prove after commit, then verify
fn bench_ligero_prove_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("ligero_prove_verify");
    group.sample_size(10);
    let hash = LigeroHash::default();

    for log_size in [10, 12, 14].iter() {
        let nw = 1usize << log_size;
        let inst = instance(nw);
        let mut prover = LigeroProver::new(&inst.p);
        let mut ts = Transcript::new(b"bench");
        let com = prover
            .commit(&mut ts, &inst.w, 0, &inst.lqc, &ReedSolomonFactory, &mut RngEngine::new(test_rng()))
            .unwrap();
        let prefix = ts.fork();

        group.throughput(Throughput::Elements(nw as u64));
        group.bench_with_input(BenchmarkId::new("prove", format!("nw=2^{}", log_size)), &nw, |b, _| {
            b.iter(|| {
                let mut ts = prefix.fork();
                black_box(prover.prove(&mut ts, inst.b.len(), &inst.llterm, &hash, &inst.lqc, &ReedSolomonFactory))
            });
        });

        let mut ts = prefix.fork();
        let proof = prover.prove(&mut ts, inst.b.len(), &inst.llterm, &hash, &inst.lqc, &ReedSolomonFactory);
        group.bench_with_input(BenchmarkId::new("verify", format!("nw=2^{}", log_size)), &nw, |b, _| {
            b.iter(|| {
                let mut ts = Transcript::new(b"bench");
                LigeroVerifier::receive_commitment(&com, &mut ts);
                black_box(LigeroVerifier::verify(
                    &inst.p,
                    &com,
                    &proof,
                    &mut ts,
                    &inst.llterm,
                    &hash,
                    &inst.b,
                    &inst.lqc,
                    &ReedSolomonFactory,
                ))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ligero_commit, bench_ligero_prove_verify);
criterion_main!(benches);
