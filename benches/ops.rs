use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use memstash::cache::Cache;
use memstash::options::Options;

const CAPACITY: usize = 1024;

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit");
    group.throughput(Throughput::Elements(1));

    group.bench_function("lru", |b| {
        let cache = Cache::open_lru(CAPACITY, Options::new()).unwrap();
        for key in 0..CAPACITY as u64 {
            cache.set(key, key);
        }
        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % CAPACITY as u64)));
            counter += 1;
        });
    });

    group.bench_function("lfu", |b| {
        let cache = Cache::open_lfu(CAPACITY, Options::new()).unwrap();
        for key in 0..CAPACITY as u64 {
            cache.set(key, key);
        }
        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % CAPACITY as u64)));
            counter += 1;
        });
    });

    group.bench_function("volatile_lru", |b| {
        let cache = Cache::open_volatile_lru(CAPACITY, Options::new()).unwrap();
        for key in 0..CAPACITY as u64 {
            cache.set(key, key);
        }
        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % CAPACITY as u64)));
            counter += 1;
        });
    });

    group.bench_function("no_eviction", |b| {
        let cache = Cache::open_no_eviction(Options::new()).unwrap();
        for key in 0..CAPACITY as u64 {
            cache.set(key, key);
        }
        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % CAPACITY as u64)));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_set_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_churn");
    group.throughput(Throughput::Elements(1));

    // Rolling key space twice the capacity: every other insert evicts.
    group.bench_function("lru", |b| {
        let cache = Cache::open_lru(CAPACITY, Options::new()).unwrap();
        let mut counter = 0u64;
        b.iter(|| {
            cache.set(counter % (2 * CAPACITY as u64), counter);
            counter += 1;
        });
    });

    group.bench_function("lfu", |b| {
        let cache = Cache::open_lfu(CAPACITY, Options::new()).unwrap();
        let mut counter = 0u64;
        b.iter(|| {
            cache.set(counter % (2 * CAPACITY as u64), counter);
            counter += 1;
        });
    });

    group.bench_function("volatile_lru", |b| {
        let cache = Cache::open_volatile_lru(CAPACITY, Options::new()).unwrap();
        let mut counter = 0u64;
        b.iter(|| {
            cache.set(counter % (2 * CAPACITY as u64), counter);
            counter += 1;
        });
    });

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.throughput(Throughput::Elements(1));

    group.bench_function("lru_50_read_50_write", |b| {
        let cache = Cache::open_lru(CAPACITY, Options::new()).unwrap();
        for key in 0..CAPACITY as u64 {
            cache.set(key, key);
        }
        let mut counter = 0u64;
        b.iter(|| {
            if counter % 2 == 0 {
                black_box(cache.get(&(counter % CAPACITY as u64)));
            } else {
                cache.set(counter % (2 * CAPACITY as u64), counter);
            }
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_get_hit, bench_set_churn, bench_mixed_50_50);
criterion_main!(benches);
