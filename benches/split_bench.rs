use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use colsplit::{SplitConfig, Splitter};
use tempfile::TempDir;

fn sorted_input(groups: usize, rows_per_group: usize) -> String {
    let mut result = String::from("group\tindex\tpayload\n");
    for g in 0..groups {
        for r in 0..rows_per_group {
            result.push_str(&format!("g{g:05}\t{r}\t\"quoted, {g}\"\tsome more text\n"));
        }
    }
    result
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");
    group.sample_size(10); // WHY: each iteration creates hundreds of files

    // Same row count, few large groups vs many small ones
    for (groups, rows_per_group) in [(10usize, 10_000usize), (1_000, 100)] {
        let input = sorted_input(groups, rows_per_group);
        group.throughput(Throughput::Bytes(input.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{groups}x{rows_per_group}")),
            &input,
            |b, input| {
                b.iter(|| {
                    let dir = TempDir::new().unwrap();
                    let config = SplitConfig {
                        column: 1,
                        output_stub: format!("{}/", dir.path().display()),
                        ..Default::default()
                    };
                    let summary = Splitter::new(config)
                        .run_from_reader(input.as_bytes())
                        .unwrap();
                    black_box(summary.total_records)
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_split);
criterion_main!(benches);
