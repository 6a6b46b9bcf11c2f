//! Benchmarks for the static type analysis.
//!
//! Tests classification and rule evaluation performance for:
//! - Deep inheritance chains, classified from the leaf
//! - Wide modules, analyzed sequentially and in parallel

extern crate dotlint;

use criterion::{criterion_group, criterion_main, Criterion};
use dotlint::{
    metadata::{
        typesystem::{CilTypeReference, Field, Method, TypeBuilder},
        Module, ModuleBuilder, TargetRuntime,
    },
    rules::{
        design::{classify, ConsiderUsingStaticTypeRule},
        Runner, RunnerConfig,
    },
};
use std::hint::black_box;

/// Module with a single chain of `depth` all-static classes.
fn deep_chain(depth: usize) -> Module {
    let mut builder = ModuleBuilder::new("Deep.dll", TargetRuntime::Net4_0);
    let mut base = CilTypeReference::object();
    for i in 0..depth {
        base = builder
            .define(
                TypeBuilder::class("Deep", &format!("Level{i}"))
                    .extends(base)
                    .method(Method::static_method("Help", 1))
                    .field(Field::static_field("shared")),
            )
            .unwrap();
    }
    builder.build()
}

/// Module with `count` independent classes, every third one holding instance state.
fn wide_module(count: usize) -> Module {
    let mut builder = ModuleBuilder::new("Wide.dll", TargetRuntime::Net4_0);
    for i in 0..count {
        let mut ty = TypeBuilder::class("Wide", &format!("Type{i}"))
            .extends_object()
            .method(Method::constructor(0))
            .method(Method::static_method("Help", 2));
        if i % 3 == 0 {
            ty = ty.field(Field::instance_field("state"));
        }
        builder.define(ty).unwrap();
    }
    builder.build()
}

/// Classify the leaf of a 1000 level chain.
fn bench_classify_deep_chain(c: &mut Criterion) {
    let module = deep_chain(1000);
    let leaf = module.types().get_by_fullname("Deep.Level999").unwrap();

    c.bench_function("classify_deep_chain_1000", |b| {
        b.iter(|| black_box(classify(black_box(&leaf), module.types())));
    });
}

/// Analyze 10k independent types.
fn bench_analyze_wide_module(c: &mut Criterion) {
    let module = wide_module(10_000);

    let mut group = c.benchmark_group("analyze_wide_10000");
    for (name, parallel) in [("sequential", false), ("parallel", true)] {
        let config = RunnerConfig {
            parallel,
            ..RunnerConfig::default()
        };
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut runner =
                    Runner::new(config).with_rule(ConsiderUsingStaticTypeRule::new());
                black_box(runner.analyze(&module))
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_classify_deep_chain,
    bench_analyze_wide_module
);
criterion_main!(benches);
