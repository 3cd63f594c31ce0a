//! Benchmarks for scope construction and name resolution

use ast::{Block, FunctionCall, FunctionDecl, Node, PackageImport, Param, Program, VarDecl};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use semantic::Analyzer;

/// `count` globals, each read back once by a print statement
fn generate_many_globals(count: usize) -> Program {
    let declarations = (0..count)
        .map(|i| Node::VarDecl(VarDecl::new(&format!("v{}", i), "INTEGER", i + 1)))
        .collect();
    let statements = (0..count)
        .map(|i| Node::print(Node::var(&format!("v{}", i), count + i + 1, 7), count + i + 1))
        .collect();
    Program {
        name: "globals".to_string(),
        packages: vec![],
        block: Block::new(declarations, statements),
    }
}

/// Functions nested `depth` deep; the innermost one reads the outermost
/// global, walking the whole chain.
fn generate_deep_nesting(depth: usize) -> Program {
    let read_root = Node::print(Node::var("root", depth + 1, 7), depth + 1);
    let mut inner = Block::new(vec![], vec![read_root]);
    for level in (0..depth).rev() {
        let decl = FunctionDecl::new(format!("f{}", level), vec![], inner, level + 1);
        inner = Block::new(vec![Node::FunctionDecl(decl)], vec![]);
    }
    let mut declarations = vec![Node::VarDecl(VarDecl::new("root", "STRING", 1))];
    declarations.extend(inner.declarations);
    Program {
        name: "nested".to_string(),
        packages: vec![],
        block: Block::new(declarations, vec![]),
    }
}

/// `count` calls mixing user, builtin and package functions
fn generate_calls(count: usize) -> Program {
    let add = FunctionDecl::new(
        "add",
        vec![Param::new("a", "INTEGER", 1, 10), Param::new("b", "INTEGER", 1, 21)],
        Block::default(),
        1,
    );
    let statements = (0..count)
        .map(|i| {
            let line = i + 2;
            let call = match i % 3 {
                0 => {
                    let args = vec![Node::int(1, line, 5), Node::int(2, line, 8)];
                    FunctionCall::new(None, "add", args, line, 1)
                }
                1 => FunctionCall::new(None, "len", vec![Node::int(1, line, 5)], line, 1),
                _ => FunctionCall::new(Some("math"), "sqrt", vec![Node::int(4, line, 11)], line, 6),
            };
            Node::FunctionCall(call)
        })
        .collect();
    Program {
        name: "calls".to_string(),
        packages: vec![PackageImport::new("math", 1)],
        block: Block::new(vec![Node::FunctionDecl(add)], statements),
    }
}

fn benchmark_global_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("global_resolution");

    for count in [100, 1000, 5000].iter() {
        let program = generate_many_globals(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &program, |b, program| {
            b.iter(|| {
                let mut program = program.clone();
                black_box(Analyzer::default().analyze(&mut program).is_ok())
            });
        });
    }

    group.finish();
}

fn benchmark_chain_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_walk");

    for depth in [10, 50, 200].iter() {
        let program = generate_deep_nesting(*depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &program, |b, program| {
            b.iter(|| {
                let mut program = program.clone();
                black_box(Analyzer::default().analyze(&mut program).is_ok())
            });
        });
    }

    group.finish();
}

fn benchmark_call_resolution(c: &mut Criterion) {
    let program = generate_calls(1000);
    c.bench_function("call_resolution", |b| {
        b.iter(|| {
            let mut program = program.clone();
            black_box(Analyzer::default().analyze(&mut program).is_ok())
        });
    });
}

criterion_group!(
    benches,
    benchmark_global_resolution,
    benchmark_chain_walk,
    benchmark_call_resolution
);
criterion_main!(benches);
