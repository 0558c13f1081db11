use ark_ff::One;
use ark_std::{test_rng, UniformRand};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use zk_ligero::{
    Bls12381Fr as Fr, Circuit, Corner, Dense, Layer, Quad, ReedSolomonFactory, RngEngine, ZkParams, ZkProof, ZkProver,
    ZkVerifier,
};

/// `n` independent products: output `i` is `x_i · y_i - z_i` over inputs
/// `[1, x_0, y_0, z_0, x_1, ...]`, with the constant one public.
fn products_circuit(n: usize) -> (Circuit<Fr>, Dense<Fr>) {
    let mut rng = test_rng();
    let mut corners = Vec::with_capacity(2 * n);
    let mut w = vec![Fr::one()];
    for i in 0..n {
        let (x, y) = (Fr::rand(&mut rng), Fr::rand(&mut rng));
        w.extend_from_slice(&[x, y, x * y]);
        let base = (1 + 3 * i) as u32;
        corners.push(Corner::new(i as u32, base, base + 1, Fr::one()));
        corners.push(Corner::new(i as u32, base + 2, 0, -Fr::one()));
    }
    let c = Circuit::new(n, 1, 1, 0, vec![Layer::new(w.len(), Quad::new(corners))]).unwrap();
    (c, Dense::from_wires(w))
}

fn prove(c: &Circuit<Fr>, params: &ZkParams, w: &Dense<Fr>) -> ZkProof<Fr> {
    let mut zkp = ZkProof::new(c, params).unwrap();
    let mut prover = ZkProver::new(c, params, ReedSolomonFactory).unwrap();
    let mut tp = params.transcript(b"bench").unwrap();
    prover
        .commit(&mut zkp, w, &mut tp, &mut RngEngine::new(test_rng()))
        .unwrap();
    prover.prove(&mut zkp, w, &mut tp).unwrap();
    zkp
}

/// Benchmark: commit and prove, both phases together
fn bench_zk_prove(c: &mut Criterion) {
    let mut group = c.benchmark_group("zk_prove");
    group.sample_size(10);
    let params = ZkParams::default();

    for log_size in [6, 8, 10].iter() {
        let n = 1usize << log_size;
        let (circuit, w) = products_circuit(n);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(format!("n=2^{}", log_size)), &n, |b, _| {
            b.iter(|| black_box(prove(&circuit, &params, black_box(&w))));
        });
    }
    group.finish();
}

/// Benchmark: deserialize and verify
fn bench_zk_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("zk_verify");
    group.sample_size(10);
    let params = ZkParams::default();

    for log_size in [6, 8, 10].iter() {
        let n = 1usize << log_size;
        let (circuit, w) = products_circuit(n);
        let bytes = prove(&circuit, &params, &w).write();
        let pub_in = Dense::from_wires(vec![Fr::one()]);

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(format!("n=2^{}", log_size)), &n, |b, _| {
            b.iter(|| {
                let mut zkp = ZkProof::new(&circuit, &params).unwrap();
                zkp.read(black_box(&bytes)).unwrap();
                let verifier = ZkVerifier::new(&circuit, &params, ReedSolomonFactory).unwrap();
                let mut tv = params.transcript(b"bench").unwrap();
                verifier.recv_commitment(&zkp, &mut tv);
                black_box(verifier.verify(&zkp, &pub_in, &mut tv).is_ok())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_zk_prove, bench_zk_verify);
criterion_main!(benches);
