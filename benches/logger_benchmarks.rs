//! Criterion benchmarks for cli_tpl

use cli_tpl::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tempfile::TempDir;

// ============================================================================
// Encoding Benchmarks
// ============================================================================

fn sample_entry() -> LogEntry {
    LogEntry::new(LogLevel::Warn, "config update trigger").with_context(
        LogContext::new()
            .with_field("operation", "write")
            .with_field("filename", "/etc/cli-tpl/app.yaml"),
    )
}

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");
    group.throughput(Throughput::Elements(1));
    let entry = sample_entry();

    group.bench_function("json", |b| {
        b.iter(|| black_box(Encoder::Json.encode(black_box(&entry))));
    });

    group.bench_function("console", |b| {
        b.iter(|| black_box(Encoder::Console.encode(black_box(&entry))));
    });

    group.finish();
}

// ============================================================================
// Logging Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("bench.log");
    let registry = LoggerRegistry::default();
    let dest = registry
        .build_outputs(&[path.to_str().unwrap()])
        .expect("Failed to build outputs");
    registry.install(Logger::new(LogLevel::Info, Encoder::Json, dest));

    group.bench_function("filtered_debug", |b| {
        b.iter(|| registry.current().debug(black_box("not written")));
    });

    group.bench_function("file_info", |b| {
        b.iter(|| registry.current().info(black_box("written to file")));
    });

    group.finish();
}

// ============================================================================
// Swap Benchmarks
// ============================================================================

fn bench_install(c: &mut Criterion) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("swap.log");
    let target = path.to_str().unwrap().to_string();
    let registry = LoggerRegistry::default();

    c.bench_function("install_same_file", |b| {
        b.iter(|| {
            let dest = registry
                .build_outputs(&[target.as_str()])
                .expect("Failed to build outputs");
            registry.install(Logger::new(LogLevel::Info, Encoder::Json, dest))
        });
    });
}

criterion_group!(benches, bench_encoding, bench_logging, bench_install);
criterion_main!(benches);
