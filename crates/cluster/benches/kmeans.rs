use cluster::{Clusterer, InMemoryDocumentSource, KMeans, Term};
use criterion::{criterion_group, criterion_main, Criterion};

fn synthetic_source(n_docs: usize, n_terms: usize) -> InMemoryDocumentSource {
    let docs = (0..n_docs)
        .map(|i| {
            (0..5)
                .map(|j| (Term::from(format!("t{}", (i + j) % n_terms).as_str()), 1u32))
                .collect()
        })
        .collect();
    InMemoryDocumentSource::new(docs)
}

fn kmeans_benchmark(c: &mut Criterion) {
    c.bench_function("kmeans_200_docs_k10", |b| {
        b.iter(|| {
            let mut source = synthetic_source(200, 50);
            KMeans::new(10).cluster(&mut source).unwrap()
        });
    });
}

criterion_group!(benches, kmeans_benchmark);
criterion_main!(benches);
