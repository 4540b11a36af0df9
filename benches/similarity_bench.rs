use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use vallu::vector::codec::{decode_embedding, encode_embedding};
use vallu::vector::core::distance::cosine_similarity;
use vallu::vector::search::{RankerConfig, SimilarityRanker};
use vallu::vector::{EmbeddingRecord, VectorStore};

fn generate_test_vectors(count: usize, dimension: usize) -> Vec<Vec<f32>> {
    let mut vectors = Vec::with_capacity(count);
    for i in 0..count {
        let mut data = Vec::with_capacity(dimension);
        for j in 0..dimension {
            let value = ((i as f32 * 0.1 + j as f32 * 0.01).sin() * 0.5 + 0.5) * 2.0 - 1.0;
            data.push(value);
        }
        vectors.push(data);
    }
    vectors
}

fn build_store(vectors: &[Vec<f32>]) -> VectorStore {
    VectorStore::from_records(
        vectors
            .iter()
            .enumerate()
            .map(|(i, v)| EmbeddingRecord::new(i as i64 + 1, v.clone())),
    )
    .unwrap()
}

fn bench_cosine(c: &mut Criterion) {
    let dimension = 1536;
    let vectors = generate_test_vectors(101, dimension);
    let query = &vectors[0];
    let targets = &vectors[1..];

    c.bench_function("cosine_similarity_1536", |b| {
        b.iter(|| {
            for target in targets {
                let _ = black_box(cosine_similarity(black_box(query), black_box(target)).unwrap());
            }
        })
    });
}

fn bench_ranker(c: &mut Criterion) {
    let dimension = 1536;
    let mut group = c.benchmark_group("rank_top_5");

    for count in [1330, 5000] {
        let vectors = generate_test_vectors(count + 1, dimension);
        let query = vectors[0].clone();
        let store = build_store(&vectors[1..]);

        for (label, threshold) in [("sequential", usize::MAX), ("parallel", 1)] {
            let ranker = SimilarityRanker::new(RankerConfig {
                parallel_threshold: threshold,
            });
            group.bench_with_input(BenchmarkId::new(label, count), &store, |b, store| {
                b.iter(|| black_box(ranker.rank(black_box(&query), store, 5).unwrap()))
            });
        }
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let vectors = generate_test_vectors(1, 1536);
    let blob = format!("Optional(x'{}')", encode_embedding(&vectors[0]));

    c.bench_function("decode_embedding_1536", |b| {
        b.iter(|| black_box(decode_embedding(black_box(&blob))))
    });
}

criterion_group!(benches, bench_cosine, bench_ranker, bench_decode);
criterion_main!(benches);
