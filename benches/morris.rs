use batch_doe::{Morris, ParameterDimension, Saltelli, SamplingMethod};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn criterion_sensitivity_designs(c: &mut Criterion) {
    let dims = [5, 10];
    let size = 100;

    let mut group = c.benchmark_group("doe");
    group.sample_size(10);
    for dim in dims {
        let space: Vec<_> = (0..dim)
            .map(|i| ParameterDimension::float(format!("x{i}"), 0., 1.))
            .collect();
        group.bench_function(format!("morris-{dim}-dim-{size}-trajectories"), |b| {
            b.iter(|| black_box(Morris::new(&space).sample(size)));
        });
        group.bench_function(format!("saltelli-{dim}-dim-{size}-size"), |b| {
            b.iter(|| black_box(Saltelli::new(&space).sample(size)));
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_sensitivity_designs);
criterion_main!(benches);
