use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use quadlineage::compute::lineage::LineageTable;
use quadlineage::compute::quadtree::subdivide;
use quadlineage::compute::tree::LineageTree;
use quadlineage::{Config, QuadtreeBuilder, RawValue, SampleMetadata, SamplePoint};
use std::hint::black_box;

fn scattered_points(n: usize) -> Vec<SamplePoint> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..n)
        .map(|i| SamplePoint::new(format!("s{}", i), next() * 360.0, next() * 180.0))
        .collect()
}

fn metadata_for(points: &[SamplePoint]) -> SampleMetadata {
    let mut md = SampleMetadata::new("#SampleID", ["latitude", "longitude"]);
    for p in points {
        md.push_row(
            p.id(),
            vec![RawValue::from(p.y() - 90.0), RawValue::from(p.x() - 180.0)],
        )
        .unwrap();
    }
    md
}

fn bench_subdivide(c: &mut Criterion) {
    let mut group = c.benchmark_group("subdivide");

    for n in [100, 1_000, 10_000].iter() {
        let points = scattered_points(*n);
        group.throughput(Throughput::Elements(*n as u64));

        for threshold in [2, 16] {
            let config = Config::default().with_threshold(threshold);
            group.bench_with_input(
                BenchmarkId::new(format!("threshold_{}", threshold), n),
                &points,
                |b, points| {
                    b.iter(|| black_box(subdivide(points, &config).unwrap()));
                },
            );
        }
    }

    group.finish();
}

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");

    for n in [1_000, 10_000].iter() {
        let bins = subdivide(&scattered_points(*n), &Config::default()).unwrap();
        let table = LineageTable::from_bins(&bins);
        group.throughput(Throughput::Elements(*n as u64));

        group.bench_with_input(BenchmarkId::new("table", n), &bins, |b, bins| {
            b.iter(|| black_box(LineageTable::from_bins(bins)));
        });

        group.bench_with_input(BenchmarkId::new("tree", n), &table, |b, table| {
            b.iter(|| black_box(LineageTree::from_table(table)));
        });
    }

    group.finish();
}

fn bench_full_build(c: &mut Criterion) {
    let md = metadata_for(&scattered_points(5_000));

    c.bench_function("build_5000_samples", |b| {
        b.iter(|| black_box(QuadtreeBuilder::new().threshold(4).build(&md).unwrap()));
    });
}

criterion_group!(benches, bench_subdivide, bench_assembly, bench_full_build);
criterion_main!(benches);
