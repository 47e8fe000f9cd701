//! Benchmarks for the secp256k1 engine

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use koblitz::ecdsa::{self, SignOptions};
use koblitz::{AffinePoint, FieldElement, Scalar, SecretKey};
use rand::rngs::OsRng;
use rand::RngCore;

/// Generate a random field element for benchmarking
fn random_field_element() -> FieldElement {
    let mut bytes = [0u8; 32];
    loop {
        OsRng.fill_bytes(&mut bytes);
        if let Ok(fe) = FieldElement::from_bytes(&bytes) {
            return fe;
        }
    }
}

/// Generate a random scalar for benchmarking
fn random_scalar() -> Scalar {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    Scalar::from_bytes_reduced(&bytes)
}

/// Generate a random point on the curve for benchmarking
fn random_point() -> AffinePoint {
    AffinePoint::generator().mul(&random_scalar())
}

fn bench_field_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("field");

    let a = random_field_element();
    let b = random_field_element();

    group.bench_function("add", |bench| {
        bench.iter(|| black_box(&a).add(black_box(&b)));
    });

    group.bench_function("mul", |bench| {
        bench.iter(|| black_box(&a).mul(black_box(&b)));
    });

    group.bench_function("square", |bench| {
        bench.iter(|| black_box(&a).square());
    });

    group.bench_function("invert", |bench| {
        bench.iter(|| black_box(&a).invert().expect("inversion should succeed"));
    });

    group.bench_function("sqrt", |bench| {
        let square = a.square();
        bench.iter(|| black_box(&square).sqrt());
    });

    group.finish();
}

fn bench_point_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("point");

    let p1 = random_point();
    let p2 = random_point();
    let k = random_scalar();

    group.bench_function("add", |bench| {
        bench.iter(|| black_box(&p1).add(black_box(&p2)));
    });

    group.bench_function("double", |bench| {
        bench.iter(|| black_box(&p1).double());
    });

    group.bench_function("mul_base", |bench| {
        let g = AffinePoint::generator();
        bench.iter(|| black_box(&g).mul(black_box(&k)));
    });

    group.bench_function("mul_arbitrary", |bench| {
        bench.iter(|| black_box(&p1).mul(black_box(&k)));
    });

    group.bench_function("mul_vartime", |bench| {
        bench.iter(|| black_box(&p1).mul_vartime(black_box(&k)));
    });

    group.finish();
}

fn bench_protocols(c: &mut Criterion) {
    let mut group = c.benchmark_group("protocols");

    let key = SecretKey::random(&mut OsRng).expect("key generation should succeed");
    let public = key.public_key();
    let mut msg_hash = [0u8; 32];
    OsRng.fill_bytes(&mut msg_hash);
    let opts = SignOptions::default();
    let sig = ecdsa::sign(&msg_hash, &key, &opts).expect("signing should succeed");

    group.bench_function("ecdsa_sign", |bench| {
        bench.iter(|| ecdsa::sign(black_box(&msg_hash), &key, &opts));
    });

    group.bench_function("ecdsa_verify", |bench| {
        bench.iter(|| ecdsa::verify(black_box(&sig), &msg_hash, &public, true));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_field_arithmetic,
    bench_point_operations,
    bench_protocols
);
criterion_main!(benches);
