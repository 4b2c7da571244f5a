//! Performance benchmarks for catalog-kit
//!
//! This benchmark suite measures:
//! - Cache gateway operations (set, get hit/miss, reset)
//! - Entity service reads served from cache vs from the store
//! - Validated writes (validate, reset, persist, commit)
//! - Envelope serialization of list payloads
//!
//! Run with: cargo bench
//! View results: open target/criterion/report/index.html

use catalog_kit::backend::InMemoryBackend;
use catalog_kit::hasher::KdfParams;
use catalog_kit::model::{AuthorDto, BookDto, GenreDto};
use catalog_kit::repository::InMemoryStore;
use catalog_kit::serialization::{deserialize_from_cache, serialize_for_cache};
use catalog_kit::{CacheGateway, CacheStrategy, Catalog, CatalogConfig, Pagination};
use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ============================================================================
// Benchmark Fixtures
// ============================================================================

type BenchCatalog = Catalog<InMemoryStore, InMemoryBackend>;

fn book(i: usize) -> BookDto {
    BookDto {
        id: 0,
        title: format!("Title{}", i),
        description: format!("Description{}", i),
        year: 2000,
        content: Some(vec![0u8; 256]),
        author_id: 1,
        genre_id: 1,
        user_ids: Vec::new(),
    }
}

/// Catalog with one author, one genre and `books` books.
fn seeded(rt: &tokio::runtime::Runtime, books: usize) -> BenchCatalog {
    let catalog = Catalog::with_config(
        InMemoryStore::new(),
        InMemoryBackend::new(),
        CatalogConfig::default().with_kdf(KdfParams::fast()),
    );
    rt.block_on(async {
        catalog
            .genres()
            .add(GenreDto {
                name: "Bench".to_string(),
                ..GenreDto::default()
            })
            .await
            .expect("Failed to seed genre");
        catalog
            .authors()
            .add(AuthorDto {
                id: 0,
                full_name: "Bench Author".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1970, 1, 1),
                country: "Nowhere".to_string(),
                book_ids: Vec::new(),
            })
            .await
            .expect("Failed to seed author");
        for i in 0..books {
            catalog.books().add(book(i)).await.expect("Failed to seed book");
        }
    });
    catalog
}

// ============================================================================
// Group 1: Cache Gateway Benchmarks
// ============================================================================

fn gateway_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_gateway");
    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    for size in [10, 100, 1_000].iter() {
        let books: Vec<BookDto> = (0..*size).map(book).collect();

        group.bench_with_input(BenchmarkId::new("set", size), &books, |b, books| {
            let cache = CacheGateway::new(InMemoryBackend::new());
            b.to_async(&rt).iter(|| async {
                cache
                    .set(black_box("Book:page:none:none"), books, None)
                    .await
                    .expect("Failed to set")
            });
        });

        group.bench_with_input(BenchmarkId::new("get_hit", size), &books, |b, books| {
            let cache = CacheGateway::new(InMemoryBackend::new());
            rt.block_on(async {
                cache
                    .set("Book:page:none:none", books, None)
                    .await
                    .expect("Failed to set");
            });

            b.to_async(&rt).iter(|| async {
                cache
                    .get::<Vec<BookDto>>(black_box("Book:page:none:none"))
                    .await
            });
        });
    }

    group.bench_function("get_miss", |b| {
        let cache = CacheGateway::new(InMemoryBackend::new());
        b.to_async(&rt)
            .iter(|| async { cache.get::<BookDto>(black_box("Book:id:404")).await });
    });

    group.bench_function("reset_all", |b| {
        let cache = CacheGateway::new(InMemoryBackend::new());
        b.to_async(&rt).iter(|| async { cache.reset_all().await });
    });

    group.finish();
}

// ============================================================================
// Group 2: Entity Service Read Benchmarks
// ============================================================================

fn read_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("entity_service_reads");
    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    for size in [10, 100, 1_000].iter() {
        let catalog = seeded(&rt, *size);
        group.throughput(Throughput::Elements(*size as u64));

        // Measures: cache lookup + envelope decode
        group.bench_with_input(BenchmarkId::new("get_all_cached", size), size, |b, _| {
            let books = catalog.books();
            rt.block_on(async {
                books
                    .get_all(Pagination::all())
                    .await
                    .expect("Failed to warm cache");
            });
            b.to_async(&rt)
                .iter(|| async { books.get_all(black_box(Pagination::all())).await });
        });

        // Measures: read session + full scan + mapping + cache store
        group.bench_with_input(BenchmarkId::new("get_all_store", size), size, |b, _| {
            let books = catalog.books();
            b.to_async(&rt).iter(|| async {
                books
                    .get_all_with(black_box(Pagination::all()), CacheStrategy::Bypass)
                    .await
            });
        });

        group.bench_with_input(BenchmarkId::new("get_page_cached", size), size, |b, _| {
            let books = catalog.books();
            b.to_async(&rt)
                .iter(|| async { books.get_all(black_box(Pagination::new(1, 10))).await });
        });
    }

    group.bench_function("get_by_id_cached", |b| {
        let catalog = seeded(&rt, 10);
        let books = catalog.books();
        b.to_async(&rt)
            .iter(|| async { books.get_by_id(black_box(5)).await });
    });

    group.finish();
}

// ============================================================================
// Group 3: Write Benchmarks
// ============================================================================

fn write_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("entity_service_writes");
    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    // Measures: uniqueness scan + reset + insert + commit
    group.bench_function("add_genre", |b| {
        let catalog = seeded(&rt, 10);
        let counter = Arc::new(AtomicU64::new(0));
        b.to_async(&rt).iter(|| {
            let genres = catalog.genres();
            let counter = counter.clone();
            async move {
                let current = counter.fetch_add(1, Ordering::Relaxed);
                genres
                    .add(GenreDto {
                        name: format!("Genre{}", current),
                        ..GenreDto::default()
                    })
                    .await
            }
        });
    });

    group.bench_function("update_book", |b| {
        let catalog = seeded(&rt, 100);
        let books = catalog.books();
        let model = rt
            .block_on(books.get_by_id(50))
            .expect("Failed to read book");
        b.to_async(&rt)
            .iter(|| async { books.update(black_box(model.clone())).await });
    });

    group.finish();
}

// ============================================================================
// Group 4: Serialization Benchmarks
// ============================================================================

fn serialization_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");

    for size in [10, 100, 1_000].iter() {
        let books: Vec<BookDto> = (0..*size).map(book).collect();
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("serialize", size), &books, |b, books| {
            b.iter(|| serialize_for_cache(black_box(books)));
        });

        let bytes = serialize_for_cache(&books).expect("Failed to serialize");
        group.bench_with_input(BenchmarkId::new("deserialize", size), &bytes, |b, bytes| {
            b.iter(|| deserialize_from_cache::<Vec<BookDto>>(black_box(bytes)));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark Registration
// ============================================================================

criterion_group!(
    benches,
    gateway_benchmarks,
    read_benchmarks,
    write_benchmarks,
    serialization_benchmarks
);
criterion_main!(benches);
