use criterion::{Criterion, criterion_group, criterion_main};
use metric_lens_core::{SourceUnit, analyze};
use metric_lens_engine::{EngineConfig, run};
use std::hint::black_box;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A large synthetic Java unit built by repeating a method body.
fn synthetic_java(methods: usize) -> String {
    let mut text = String::from("public class Big {\n");
    for i in 0..methods {
        text.push_str(&format!(
            "    // method {i}\n    int m{i}(int a, int b) {{\n        if (a > b && b > 0) {{ return a; }} else if (a < 0) {{ return -a; }}\n        for (int j = 0; j < b; j++) {{ a += j > 2 ? 1 : 0; }}\n        /* done */\n        return b;\n    }}\n\n"
        ));
    }
    text.push_str("}\n");
    text
}

fn benchmark_analyze(c: &mut Criterion) {
    let unit = SourceUnit::new("Big.java", synthetic_java(500));
    c.bench_function("analyze_java_500_methods", |b| {
        b.iter(|| black_box(analyze(black_box(&unit))));
    });

    let shop = std::fs::read_to_string(fixture("Shop.java")).unwrap_or_default();
    let shop = SourceUnit::new("Shop.java", shop);
    c.bench_function("analyze_shop_fixture", |b| {
        b.iter(|| black_box(analyze(black_box(&shop))));
    });
}

fn benchmark_run(c: &mut Criterion) {
    let paths: Vec<PathBuf> = ["Shop.java", "Orders.kt", "Inventory.cs", "server.go", "cart.js"]
        .iter()
        .map(|n| fixture(n))
        .collect();
    let config = EngineConfig::default();
    c.bench_function("run_fixtures", |b| {
        b.iter(|| black_box(run(black_box(&paths), &config).map(|r| r.reports.len())));
    });
}

criterion_group!(benches, benchmark_analyze, benchmark_run);
criterion_main!(benches);
