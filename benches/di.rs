use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use covenant_di::*;
use std::sync::Arc;

trait Greeter: Send + Sync {
    fn greet(&self) -> usize;
}

struct Plain;

impl Greeter for Plain {
    fn greet(&self) -> usize {
        1
    }
}

impl Injectable for Plain {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", || Plain);
    }
}

implements!(Plain => dyn Greeter);

struct Leaf;

impl Injectable for Leaf {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", || Leaf);
    }
}

struct Branch {
    _left: Arc<Leaf>,
    _right: Arc<dyn Greeter>,
}

impl Injectable for Branch {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", |left: Arc<Leaf>, right: Arc<dyn Greeter>| Branch {
            _left: left,
            _right: right,
        });
    }
}

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let mut config = InjectorConfiguration::new();
    config.bind::<u64>().to_factory(|_| Arc::new(42)).as_singleton();
    let injector = config.build().unwrap();

    // Prime the singleton
    let _ = injector.get::<u64>().unwrap();

    c.bench_function("singleton_hit_u64", |b| {
        b.iter(|| {
            let v = injector.get::<u64>().unwrap();
            black_box(v);
        })
    });
}

fn bench_singleton_cold(c: &mut Criterion) {
    struct ExpensiveToCreate {
        data: Vec<u64>,
    }

    c.bench_function("singleton_cold_expensive", |b| {
        b.iter_batched(
            || {
                let mut config = InjectorConfiguration::new();
                config
                    .bind::<ExpensiveToCreate>()
                    .to_factory(|_| {
                        Arc::new(ExpensiveToCreate {
                            data: (0..1000).collect(),
                        })
                    })
                    .as_singleton();
                config.build().unwrap()
            },
            |injector| {
                let v = injector.get::<ExpensiveToCreate>().unwrap();
                black_box(v.data.len());
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_construct_vs_factory(c: &mut Criterion) {
    let mut group = c.benchmark_group("construct_vs_factory");

    let mut config = InjectorConfiguration::new();
    config.bind::<Leaf>().to_self();
    let constructed = config.build().unwrap();

    group.bench_function("constructor", |b| {
        b.iter(|| black_box(constructed.get::<Leaf>().unwrap()))
    });

    let mut config = InjectorConfiguration::new();
    config.bind::<Leaf>().to_factory(|_| Arc::new(Leaf));
    let factory = config.build().unwrap();

    group.bench_function("factory", |b| b.iter(|| black_box(factory.get::<Leaf>().unwrap())));

    group.finish();
}

fn bench_constructor_parameters(c: &mut Criterion) {
    let mut config = InjectorConfiguration::new();
    config.bind::<Leaf>().to_self().as_singleton();
    config.bind::<dyn Greeter>().to::<Plain>();
    let injector = config.build().unwrap();

    c.bench_function("create_instance_two_parameters", |b| {
        b.iter(|| black_box(injector.create_instance::<Branch>().unwrap()))
    });
}

fn bench_creation_hooks(c: &mut Criterion) {
    let mut group = c.benchmark_group("creation_hooks");

    for &hooks in &[0usize, 1, 4] {
        let mut config = InjectorConfiguration::new();
        for _ in 0..hooks {
            config.add_creation_hook(|_, created| {
                black_box(created.type_name());
                Ok(())
            });
        }
        let injector = config.build().unwrap();

        group.bench_with_input(BenchmarkId::new("create_instance", hooks), &hooks, |b, _| {
            b.iter(|| black_box(injector.create_instance::<Leaf>().unwrap()))
        });
    }

    group.finish();
}

fn bench_collection_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection_scaling");

    for &count in &[1usize, 8, 64] {
        let mut config = InjectorConfiguration::new();
        for _ in 0..count {
            config.bind::<dyn Greeter>().to::<Plain>().as_singleton();
        }
        let injector = config.build().unwrap();

        group.bench_with_input(BenchmarkId::new("get_all", count), &count, |b, _| {
            b.iter(|| {
                let all = injector.get_all::<dyn Greeter>().unwrap();
                black_box(all.iter().map(|g| g.greet()).sum::<usize>());
            })
        });
        group.bench_with_input(BenchmarkId::new("service_list", count), &count, |b, _| {
            b.iter(|| black_box(injector.resolve::<ServiceList<dyn Greeter>>().unwrap().len()))
        });
    }

    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");

    let mut config = InjectorConfiguration::new();
    config.bind::<u64>().to_factory(|_| Arc::new(42)).as_singleton();
    let injector = config.build().unwrap();

    // Prime the singleton
    let _ = injector.get::<u64>().unwrap();

    for &thread_count in &[1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("singleton_threads", thread_count),
            &thread_count,
            |b, &threads| {
                b.iter_custom(|iters| {
                    let start = std::time::Instant::now();
                    crossbeam_utils::thread::scope(|s| {
                        for _ in 0..threads {
                            let injector = &injector;
                            s.spawn(move |_| {
                                for _ in 0..iters / threads as u64 {
                                    black_box(injector.get::<u64>().unwrap());
                                }
                            });
                        }
                    })
                    .unwrap();
                    start.elapsed()
                })
            },
        );
    }

    group.finish();
}

// ===== Macro Benchmarks =====

fn bench_large_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_registry");

    for &contract_count in &[10, 100, 1000] {
        let mut config = InjectorConfiguration::new();
        config.bind::<u64>().to_factory(|_| Arc::new(42)).as_singleton();

        // Bindings of another abstraction only grow the contract set
        for i in 0..contract_count {
            let value = i as u32;
            config.bind::<u32>().to_factory(move |_| Arc::new(value));
        }

        let injector = config.build().unwrap();

        group.bench_with_input(
            BenchmarkId::new("resolve_from_large_registry", contract_count),
            &contract_count,
            |b, _| b.iter(|| black_box(injector.get::<u64>().unwrap())),
        );
    }

    group.finish();
}

fn bench_observed_resolution(c: &mut Criterion) {
    let metrics = Arc::new(MetricsObserver::new());
    let mut config = InjectorConfiguration::new();
    config.add_observer(metrics.clone());
    config.bind::<Leaf>().to_self().as_singleton();
    config.bind::<dyn Greeter>().to::<Plain>();
    config.bind::<Branch>().to_self();
    let injector = config.build().unwrap();

    c.bench_function("observed_branch_resolution", |b| {
        b.iter(|| black_box(injector.get::<Branch>().unwrap()))
    });
    black_box(metrics.resolution_count());
}

criterion_group!(
    micro_benches,
    bench_singleton_hit,
    bench_singleton_cold,
    bench_construct_vs_factory,
    bench_constructor_parameters,
    bench_creation_hooks,
    bench_collection_scaling,
    bench_contention
);

criterion_group!(macro_benches, bench_large_registry, bench_observed_resolution);

criterion_main!(micro_benches, macro_benches);
