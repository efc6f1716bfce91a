use RustedFormal::formal::algebra::ElementOptions;
use RustedFormal::formal::node::{Formal, ooo};
use RustedFormal::formal::render::render;
use RustedFormal::formal::rules::RuleTable;
use RustedFormal::formal::style::Mode;
use RustedFormal::{range, style};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_range_sum(c: &mut Criterion) {
    let i = Formal::variable("i");
    let p = Formal::integer(13).named("p");
    let s = Formal::range_sum(
        range![0, 1, ooo(), p - 2],
        Some(Formal::string("a").subscript(i.clone())),
        Some(i),
        None,
    );
    let rules = RuleTable::new().rule("@term3-sub-subst", style! {"form" => "value"});
    c.bench_function("range sum by path", |b| {
        b.iter(|| render(black_box(&s), None, Some(&rules)))
    });
}

fn bench_derived_rules(c: &mut Criterion) {
    let ai = Formal::string("a").subscript(Formal::variable("i"));
    let s = Formal::sum(vec![ai; 50]);
    let rules =
        RuleTable::new().derived("@term[i] #i", &["i"], |args| Mode::from(args[0].unwrap_or(0)));
    c.bench_function("50 terms, index-derived rule", |b| {
        b.iter(|| render(black_box(&s), None, Some(&rules)))
    });
}

fn bench_galois_uset(c: &mut Criterion) {
    let k = Formal::cyclotomic_field(Formal::integer(13).named("p")).named("K");
    let g = Formal::galois_group(k.clone(), None).named("G");
    let rules = RuleTable::new()
        .rule("@", style! {"form" => "value"})
        .rule("@uset", style! {"form" => "symbolic", "generator" => "auto"})
        .rule("@uset-elt[i]", style! {"form" => "mapsto"})
        .rule("@uset-elt[i]-value-power", style! {"form" => "value"});
    c.bench_function("galois group underlying set", |b| {
        b.iter(|| render(black_box(&g), None, Some(&rules)))
    });
    c.bench_function("formal element", |b| {
        b.iter(|| k.build_formal_element(black_box(&ElementOptions::default())))
    });
}

criterion_group!(benches, bench_range_sum, bench_derived_rules, bench_galois_uset);
criterion_main!(benches);
