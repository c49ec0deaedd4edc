//! Benchmarks for the compile path.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mushformat_core::{compile, compress_spaces, DefineTable, Rank};

/// Generate a source with `commands` commands, each with a few continuation
/// lines, comments and a quoted banner every tenth command.
fn generate_source(commands: usize) -> String {
    let mut src = String::from("#:DEFINE OBJ #1234\n#:DEFINE DB #1235\n\n");
    for i in 0..commands {
        src.push_str(&format!("# command {i}\n"));
        src.push_str(&format!("&CMD_{i} OBJ=$+cmd{i} *:\n"));
        src.push_str("    @switch %0=\n");
        src.push_str(&format!("        1, {{@pemit %#=[u(DB/FN_{i})]}},     #// one\n"));
        src.push_str("        {@pemit %#=Other.}\n");
        if i % 10 == 0 {
            src.push_str("\"@pemit %#=+----------+\n|   box    |\n+----------+\"\n");
        }
        src.push('\n');
    }
    src
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for commands in [10usize, 100, 1000] {
        let source = generate_source(commands);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(commands), &source, |b, src| {
            b.iter(|| compile(src, DefineTable::new()).unwrap());
        });
    }
    group.finish();
}

fn bench_many_defines(c: &mut Criterion) {
    let source = generate_source(100);
    let mut table = DefineTable::new();
    for i in 0..500 {
        table
            .insert(format!("UNUSED_{i}"), format!("#{i}"), Rank::File)
            .unwrap();
    }
    c.bench_function("compile_with_500_defines", |b| {
        b.iter(|| compile(&source, table.clone()).unwrap());
    });
}

fn bench_compress(c: &mut Criterion) {
    let art = "  /\\_/\\      ( o.o )     > ^ <        ".repeat(50);
    c.bench_function("compress_spaces", |b| b.iter(|| compress_spaces(&art)));
}

criterion_group!(benches, bench_compile, bench_many_defines, bench_compress);
criterion_main!(benches);
