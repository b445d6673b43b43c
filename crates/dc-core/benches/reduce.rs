use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dc_core::{reduce_domains, sort_canonical, Domain, SuffixTable};

const SUFFIXES: &[&str] = &["com", "net", "org", "co.uk", "com.cn", "io"];

fn synthetic_domains(count: usize) -> Vec<Domain> {
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let suffix = SUFFIXES[i % SUFFIXES.len()];
        let host = match i % 4 {
            0 => format!("site{}.{}", i / 4, suffix),
            1 => format!("cdn.site{}.{}", i / 8, suffix),
            2 => format!("a{}.b.site{}.{}", i % 13, i / 16, suffix),
            _ => format!("tracker{}.{}", i, suffix),
        };
        if let Ok(domain) = Domain::parse(&host) {
            out.push(domain);
        }
    }
    out
}

fn bench_reduce(c: &mut Criterion) {
    let domains = synthetic_domains(50_000);
    c.bench_function("reduce_50k", |b| {
        b.iter(|| reduce_domains(black_box(domains.clone())))
    });
}

fn bench_sort(c: &mut Criterion) {
    let table = SuffixTable::builtin();
    let (reduced, _) = reduce_domains(synthetic_domains(50_000));
    c.bench_function("sort_canonical_reduced", |b| {
        b.iter(|| {
            let mut domains = reduced.clone();
            sort_canonical(&table, black_box(&mut domains));
            domains
        })
    });
}

criterion_group!(benches, bench_reduce, bench_sort);
criterion_main!(benches);
