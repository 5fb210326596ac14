// benches/primitives.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use onion_crypto::{dh, hash, keys, pq, sign, stream, subkey, SharedSecret, TunnelNonce};

fn bench_hash(c: &mut Criterion) {
    let data = vec![0x5au8; 1024];
    let key = SharedSecret::new([1u8; 32]);

    c.bench_function("shorthash_1k", |b| b.iter(|| hash::shorthash(black_box(&data))));
    c.bench_function("hmac_1k", |b| b.iter(|| hash::hmac(black_box(&data), &key)));
    c.bench_function("longhash_1k", |b| b.iter(|| hash::longhash(black_box(&data))));
}

fn bench_dh(c: &mut Criterion) {
    let client = keys::encryption_keygen();
    let server = keys::encryption_keygen().to_public();
    let nonce = TunnelNonce::random();

    c.bench_function("dh_client", |b| {
        b.iter(|| dh::dh_client(black_box(&server), &client, &nonce))
    });
}

fn bench_subkey(c: &mut Criterion) {
    let root = keys::identity_keygen();
    let root_pub = root.to_public();

    c.bench_function("derive_subkey", |b| {
        b.iter(|| subkey::derive_subkey(black_box(&root_pub), 42, None))
    });
    c.bench_function("derive_subkey_private", |b| {
        b.iter(|| subkey::derive_subkey_private(black_box(&root), 42, None))
    });
}

fn bench_sign(c: &mut Criterion) {
    let sk = keys::identity_keygen();
    let private = sk.to_private();
    let message = b"router contact record";
    let sig = sign::sign_with_secret_key(&sk, message).unwrap();

    c.bench_function("sign_with_secret_key", |b| {
        b.iter(|| sign::sign_with_secret_key(&sk, black_box(message)))
    });
    c.bench_function("sign_with_private_key", |b| {
        b.iter(|| sign::sign_with_private_key(&private, black_box(message)))
    });
    c.bench_function("verify", |b| {
        b.iter(|| sign::verify(&sk.to_public(), black_box(message), &sig))
    });
}

fn bench_stream(c: &mut Criterion) {
    let key = SharedSecret::new([7u8; 32]);
    let nonce = TunnelNonce::random();
    let mut cell = vec![0u8; 512];

    c.bench_function("xchacha20_cell", |b| {
        b.iter(|| stream::xchacha20(black_box(&mut cell), &key, &nonce))
    });
}

fn bench_pq(c: &mut Criterion) {
    let keypair = pq::pqe_keygen().unwrap();
    let (block, _) = pq::pqe_encrypt(keypair.public()).unwrap();

    c.bench_function("pqe_keygen", |b| b.iter(pq::pqe_keygen));
    c.bench_function("pqe_encrypt", |b| b.iter(|| pq::pqe_encrypt(keypair.public())));
    c.bench_function("pqe_decrypt", |b| {
        b.iter(|| pq::pqe_decrypt(black_box(&block), keypair.secret()))
    });
}

criterion_group!(benches, bench_hash, bench_dh, bench_subkey, bench_sign, bench_stream, bench_pq);
criterion_main!(benches);
