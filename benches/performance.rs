use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polybundle::core::Bundler;
use std::path::Path;

fn write_project(root: &Path, modules: usize, scripts: usize) -> Vec<String> {
    std::fs::create_dir_all(root.join("lib")).unwrap();

    // Each module requires the next two, so the graph is wide and shared.
    for i in 0..modules {
        let mut content = String::new();
        for dep in [i + 1, i + 2] {
            if dep < modules {
                content.push_str(&format!("local dep{dep} = require(\"./m{dep}\")\n"));
            }
        }
        content.push_str(&format!(
            r#"
local M = {{}}

function M.value()
    return {i}
end

return M
"#
        ));
        std::fs::write(root.join(format!("lib/m{i}.module.lua")), content).unwrap();
    }

    let mut entries = Vec::with_capacity(scripts);
    for i in 0..scripts {
        let content = format!(
            "local m = require(\"lib/m{}\")\nprint(m.value())\n",
            i % modules.max(1)
        );
        let name = format!("script{i}.lua");
        std::fs::write(root.join(&name), content).unwrap();
        entries.push(name);
    }
    entries
}

fn benchmark_bundling(c: &mut Criterion) {
    let mut group = c.benchmark_group("bundling");

    let small_dir = std::env::temp_dir().join("polybundle_bench_small");
    let small_entries = write_project(&small_dir, 20, 5);

    let large_dir = std::env::temp_dir().join("polybundle_bench_large");
    let large_entries = write_project(&large_dir, 500, 50);

    group.bench_function("small_project", |b| {
        let bundler = Bundler::new(&small_dir).unwrap();
        b.iter(|| black_box(bundler.bundle(black_box(&small_entries))))
    });

    group.bench_function("large_project", |b| {
        let bundler = Bundler::new(&large_dir).unwrap();
        b.iter(|| black_box(bundler.bundle(black_box(&large_entries))))
    });

    group.finish();
}

criterion_group!(benches, benchmark_bundling);
criterion_main!(benches);
