//! Criterion benchmarks for intake-mdtw: distance kernels and pairwise matrix.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use intake_mdtw::{Alignment, CostParams, DpKernel, EventRecord, EventSeries, Mdtw, NormalizedPerson, Person, prepare_person};

/// Deterministic synthetic day: `n` meals spread over 24 hours with a
/// smoothly varying calorie share.
fn make_series(n: usize, phase: f64) -> EventSeries {
    let total: f64 = (0..n).map(|i| 1.0 + (i as f64 * 0.7 + phase).sin().abs()).sum();
    let records: Vec<EventRecord> = (0..n)
        .map(|i| {
            let time = 24.0 * i as f64 / n as f64;
            let value = (1.0 + (i as f64 * 0.7 + phase).sin().abs()) / total;
            EventRecord::new(time, vec![value])
        })
        .collect();
    EventSeries::new(records).unwrap()
}

fn make_cohort(n_people: usize, events: usize) -> Vec<NormalizedPerson> {
    (0..n_people)
        .map(|p| {
            let records: Vec<EventRecord> = (0..events)
                .map(|i| {
                    let time = 24.0 * i as f64 / events as f64;
                    let calories = 200.0 + 50.0 * ((i + p) as f64 * 1.3).sin().abs() * 10.0;
                    EventRecord::new(time, vec![calories])
                })
                .collect();
            prepare_person(&Person::new(format!("person_{p}"), records)).unwrap()
        })
        .collect()
}

fn bench_distance_kernels(c: &mut Criterion) {
    let lengths = [4usize, 16, 64];
    let kernels: &[(DpKernel, &str)] = &[
        (DpKernel::FullMatrix, "full"),
        (DpKernel::TwoRow, "two_row"),
    ];

    let mut group = c.benchmark_group("mdtw_distance");

    for &len in &lengths {
        for &(kernel, label) in kernels {
            let id = BenchmarkId::new(format!("len{len}"), label);
            let a = make_series(len, 0.0);
            let b = make_series(len, 1.0);
            let mdtw = Mdtw::new(CostParams::default()).with_kernel(kernel);

            group.bench_with_input(id, &(a, b, mdtw), |bencher, (a, b, mdtw)| {
                bencher.iter(|| mdtw.distance(a, b).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_pairwise(c: &mut Criterion) {
    let cohort = make_cohort(50, 8);
    let mdtw = Mdtw::new(CostParams::default());

    c.bench_function("mdtw_pairwise_50x8_warped", |b| {
        b.iter(|| mdtw.pairwise(&cohort, Alignment::Warped).unwrap());
    });

    c.bench_function("mdtw_pairwise_50x8_paired", |b| {
        b.iter(|| mdtw.pairwise(&cohort, Alignment::PositionPaired).unwrap());
    });
}

criterion_group!(benches, bench_distance_kernels, bench_pairwise);
criterion_main!(benches);
