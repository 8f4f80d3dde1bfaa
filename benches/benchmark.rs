use criterion::{black_box, criterion_group, criterion_main, Criterion};
use screenshot_cache::fingerprint::{fix_url, RenderOptions};
use screenshot_cache::{storage, CaptureRequest, Config, Format, Namespace};
use std::path::Path;
use std::time::Duration;

// Fast settings for all benchmarks
fn configure_fast_group(group: &mut criterion::BenchmarkGroup<criterion::measurement::WallTime>) {
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_millis(500));
    group.sample_size(20);
}

fn benchmark_config_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("config");
    configure_fast_group(&mut group);

    group.bench_function("creation", |b| {
        b.iter(|| {
            let config = Config::default();
            black_box(config);
        });
    });

    group.finish();
}

fn benchmark_url_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("url_normalization");
    configure_fast_group(&mut group);

    let test_urls = vec![
        "https://example.com",
        "HTTP://Example.COM:80/path",
        "example.com/deep/path?query=value",
    ];

    group.bench_function("fix_url", |b| {
        b.iter(|| {
            for url in &test_urls {
                black_box(fix_url(url));
            }
        });
    });

    group.finish();
}

fn benchmark_fingerprint(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprint");
    configure_fast_group(&mut group);

    let config = Config::default();
    let request = CaptureRequest {
        url: "https://example.com/some/page?id=42".to_string(),
        ..Default::default()
    };

    group.bench_function("derivation", |b| {
        b.iter(|| {
            let options = RenderOptions::build(&request, &config);
            black_box(options.fingerprint());
        });
    });

    group.finish();
}

fn benchmark_path_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_resolution");
    configure_fast_group(&mut group);

    let namespace = Namespace {
        tid: "t1".to_string(),
        section: "home".to_string(),
        updated: "v2".to_string(),
    };

    group.bench_function("section_path", |b| {
        b.iter(|| {
            black_box(storage::section_path(
                Path::new("/var/cache/screenshots"),
                &namespace,
                Format::Png,
            ));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_config_creation,
    benchmark_url_normalization,
    benchmark_fingerprint,
    benchmark_path_resolution
);
criterion_main!(benches);
