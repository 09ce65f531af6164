//! Benchmarks scanning a large document for artifact references.

#![allow(missing_docs)]

use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};
use reqtrace::references;

/// Generates a document mixing genuine references with bracket noise.
fn large_document() -> String {
    let mut text = String::new();
    for i in 0..1_000 {
        writeln!(
            text,
            "Paragraph {i} covers [[REQ-purpose]] and [[SPC-scan-{i}.tst-roundtrip]], \
             mentions [[not a reference]] in passing, and declares [[.detail_{i}]]."
        )
        .unwrap();
    }
    text
}

fn scan_text(c: &mut Criterion) {
    let text = large_document();
    c.bench_function("scan references", |b| {
        b.iter(|| references(std::hint::black_box(&text)).count());
    });
}

criterion_group!(benches, scan_text);
criterion_main!(benches);
