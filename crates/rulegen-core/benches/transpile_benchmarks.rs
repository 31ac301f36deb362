//! Benchmarks for the transpilation pipeline
//!
//! Copyright (c) 2025 Rulegen Team
//! Licensed under the Apache-2.0 license

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rulegen_core::compare::japanese_eq;
use rulegen_core::{
    normalize_line, EntityCatalog, EntityMetadata, FieldMetadata, TranspileOptions, Transpiler,
};

fn entity() -> EntityMetadata {
    let mut metadata = EntityMetadata::new("TestTable1BaseEntity");
    for i in 0..200 {
        let ty = if i % 2 == 0 { "String" } else { "Integer" };
        metadata = metadata.with_field(FieldMetadata::new(format!("test_field_{i}"), format!("項目名称{i}")).with_type(ty));
    }
    metadata
}

fn document(blocks: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for i in 0..blocks {
        lines.push(format!("》【条件】項目「手袋(Ｌ０１).(項目名称{})」＝{}のとき", i % 200, i));
        lines.push(format!("または、項目「手袋(Ｌ０１).(項目名称{})」≠ブランクのとき", (i + 1) % 200));
        lines.push(format!("　　項目「手袋(Ｌ０１).(項目名称{})」にブランクを代入します。", (i + 2) % 200));
        lines.push(format!("　　項目「手袋(Ｌ０１).(項目名称{})」＝　０。", (i + 3) % 200));
        lines.push(String::new());
    }
    lines
}

fn transpiler(postprocess: bool) -> Transpiler {
    let options = TranspileOptions {
        postprocess,
        ..TranspileOptions::default()
    };
    let catalog = EntityCatalog::default().with_entity("手袋(Ｌ０１)", entity());
    Transpiler::with_catalog(options, catalog).unwrap()
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    let lines = vec![
        ("plain", "項目「手袋(Ｌ０１).(請求コード)」＝０。"),
        ("quoted", "\"  項目「 手袋(Ｌ０１) . ( 生活／仕事　会社コード ) 」に　ブランクを代入します。 \""),
        ("condition", "》【条件】項目「A.(X)」 ＝ 項目「B.(Y)」のとき"),
    ];

    for (name, line) in lines {
        group.bench_with_input(BenchmarkId::new("normalize_line", name), line, |b, line| {
            b.iter(|| black_box(normalize_line(black_box(line))))
        });
    }

    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    c.bench_function("japanese_eq", |b| {
        b.iter(|| black_box(japanese_eq(black_box("生活／仕事　会社ｺｰﾄﾞ１２３"), black_box("生活仕事会社コード123"))))
    });
}

fn bench_transpile(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpile");

    for blocks in [10, 100, 1000] {
        let lines = document(blocks);
        group.bench_with_input(BenchmarkId::new("block_mode", blocks), &lines, |b, lines| {
            b.iter(|| {
                let mut transpiler = transpiler(false);
                black_box(transpiler.transpile(black_box(lines)))
            })
        });
        group.bench_with_input(BenchmarkId::new("postprocessed", blocks), &lines, |b, lines| {
            b.iter(|| {
                let mut transpiler = transpiler(true);
                black_box(transpiler.transpile(black_box(lines)))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_compare, bench_transpile);

criterion_main!(benches);
