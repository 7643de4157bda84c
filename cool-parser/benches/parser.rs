use cool_parser::lexer::scan;
use cool_parser::parser::Parser;
use criterion::{criterion_group, criterion_main, Criterion, Throughput};

fn program(source: &str) {
    let source = source.into();
    let _ast = Parser::new(&source).parse_program();
    assert!(source.has_no_errors());
}

fn long_expr(c: &mut Criterion) {
    let mut group = c.benchmark_group("long-expr");

    let mut source = String::new();
    for _i in 0..100 {
        source.push_str("print 1");
        for _j in 0..200 {
            source.push_str(" + 1");
        }
        source.push_str(";\n");
    }
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("long-expr", |b| b.iter(|| program(&source)));
}

fn stress_precedence(c: &mut Criterion) {
    let mut group = c.benchmark_group("stress-precedence");

    let mut source = "print 1".to_string();
    for _i in 0..100 {
        source.push_str(" == 2 < 3 + 5 * 5 ** 2 || !x && y");
    }
    source.push(';');
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("stress-precedence", |b| b.iter(|| program(&source)));
}

fn many_declarations(c: &mut Criterion) {
    let mut group = c.benchmark_group("many-declarations");

    let mut source = String::new();
    for i in 0..500 {
        source.push_str(&format!(
            "class C{i} extends Base {{ var x: int = {i}; fn get(a: int) -> int {{ return x + a; }} }}\n\
             for {{var i: int = 0; i < {i}; i = i + 1}} if {{i % 2 == 0}} print i; else print \"odd\";\n",
            i = i
        ));
    }
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("scan", |b| {
        b.iter(|| {
            let source = source.as_str().into();
            scan(&source)
        })
    });
    group.bench_function("parse", |b| b.iter(|| program(&source)));
}

criterion_group!(benches, long_expr, stress_precedence, many_declarations);
criterion_main!(benches);
