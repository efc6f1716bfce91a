#![allow(non_snake_case)]
use RustedFormal::Utils::logger::{init_logger, save_rendered_to_file};
use RustedFormal::Utils::task_parser::parse_rules;
use RustedFormal::formal::adapt::{SymExpr, adapt};
use RustedFormal::formal::algebra::ElementOptions;
use RustedFormal::formal::errors::FormalResult;
use RustedFormal::formal::node::{Formal, LookupTable, MappingData, ooo};
use RustedFormal::formal::render::render;
use RustedFormal::formal::rules::RuleTable;
use RustedFormal::formal::style::{Mode, Style};
use RustedFormal::formal::text::Tex;
use RustedFormal::{range, style};
use log::error;

// SUBSTITUTION BY RULE
// one generic term, rendered with the index set by a rule, saved to a file
fn substitution() -> Result<(), String> {
    let i = Formal::variable("i");
    let ai = Formal::string("a").subscript(i);
    let mut rows = Vec::new();
    for k in 0..5 {
        let rules = RuleTable::new().rule("#i", k);
        let t = render(&ai, None, Some(&rules)).map_err(|e| e.to_string())?;
        println!("i = {}: {}", k, t);
        rows.push((format!("a_{}", k), t));
    }
    save_rendered_to_file(&rows, "renderings.tsv").map_err(|e| e.to_string())
}

// SUMS: NESTING, FLATTENING, PERMUTING, SPLITTING
fn sums() -> FormalResult<()> {
    let a = Formal::integer(1).named("a");
    let b = Formal::integer(2).named("b");
    let c = Formal::integer(0).named("c");
    let d = Formal::integer(4).named("d");
    let s = (a + b) - (c + d);
    let flat = s.flattened();
    println!("nested:    {}", render(&s, None, None)?);
    println!("flattened: {}", render(&flat, None, None)?);
    let permuted = flat.permuted(&[2, 0, 1, 3])?;
    println!("permuted:  {}", render(&permuted, None, None)?);
    let halves = flat.split(&[vec![2, 0], vec![1, 3]], None)?;
    println!("split:     {}", render(&halves, None, None)?);
    let value = Mode::Style(style! {"form" => "value"});
    println!("value:     {}", render(&s, Some(&value), None)?);
    let rules = RuleTable::new()
        .rule("#c", style! {"form" => "value"})
        .rule("@term1", style! {"show-zeros" => true});
    println!("by path:   {}", render(&s, Some(&Mode::default()), Some(&rules))?);
    Ok(())
}

// RANGES: LISTED AND BOUND
fn ranges() -> FormalResult<()> {
    let i = Formal::variable("i");
    let p = Formal::integer(13).named("p");
    let s = Formal::range_sum(
        range![0, 1, ooo(), p - 2],
        Some(Formal::string("a").subscript(i.clone())),
        Some(i),
        None,
    );
    let bind = Mode::Style(style! {"range" => "bind"});
    let last = RuleTable::new().rule("@term3-sub-subst", style! {"form" => "value"});
    println!("{}", render(&s, None, None)?);
    println!("{}", render(&s, None, Some(&last))?);
    println!("{}", render(&s, Some(&bind), None)?);
    Ok(())
}

// MAPPINGS AND LOOKUPS
fn mappings() -> FormalResult<()> {
    let zeta = Formal::variable("\\zeta").with_id("zeta");
    let i = Formal::variable("i");
    let sigma = Formal::mapping(MappingData {
        name_form: Some(Formal::string("\\sigma").subscript(i.clone())),
        args: vec![zeta.clone()],
        value_form: Some(zeta.pow(i.clone())),
        ..Default::default()
    });
    let primes = Formal::lookup(vec![i], LookupTable::list(range![2, 3, 5, 7]));
    let mapsto = Mode::Style(style! {"form" => "name-mapsto"});
    for k in 0..4 {
        let rules = RuleTable::new().rule("#i", k);
        println!(
            "{}  (coefficient {})",
            render(&sigma, Some(&mapsto), Some(&rules))?,
            render(&primes, None, Some(&rules))?
        );
    }
    Ok(())
}

// CYCLOTOMIC FIELDS AND GALOIS GROUPS
fn galois() -> FormalResult<()> {
    let p = Formal::integer(7).named("p");
    let k = Formal::cyclotomic_field(p).named("K");
    let g = Formal::galois_group(k.clone(), None).named("G");
    let verbal = Mode::Style(style! {"form" => "verbal"});
    let elt = k.build_formal_element(&ElementOptions::default())?;
    let sentence = Tex::plain("Let $K$ be ")
        .concat(render(&k, Some(&verbal), None)?)
        .then_plain(" and consider ")
        .concat(render(&elt, None, None)?)
        .then_plain(".");
    println!("{}", sentence);
    let uset = RuleTable::new()
        .rule("@", style! {"form" => "value"})
        .rule("@uset", style! {"form" => "symbolic", "generator" => "auto"})
        .rule("@uset-elt[i]", style! {"form" => "mapsto"})
        .rule("@uset-elt[i]-value-power", style! {"form" => "value"});
    println!("{}", render(&g, None, Some(&uset))?);
    Ok(())
}

// RULES FROM A DOCUMENT
fn rule_document() -> Result<(), String> {
    let doc = r##"
// reciprocals as fractions
"Power":
    negative: frac
"#x": 3
"##;
    let rules = parse_rules(doc)?;
    let x = Formal::variable("x");
    let y = Formal::variable("y");
    let f = x.pow(-1) + y.pow(2);
    let t = render(&f, Some(&Mode::Style(Style::new())), Some(&rules)).map_err(|e| e.to_string())?;
    println!("{}", t.to_document());
    Ok(())
}

// ADAPTING AN EXTERNAL EXPRESSION TREE
fn adapted() -> FormalResult<()> {
    let e = SymExpr::Mul(vec![
        SymExpr::Integer(2),
        SymExpr::symbol("x"),
        SymExpr::pow(SymExpr::symbol("y"), SymExpr::Integer(-2)),
    ]);
    let f = adapt(&e)?;
    println!("{} => {}", e, render(&f, None, None)?);
    Ok(())
}

fn main() {
    if let Err(e) = init_logger(Some("info"), false) {
        eprintln!("{}", e);
    }
    let example = 0;
    let result = match example {
        0 => substitution(),
        1 => sums().map_err(|e| e.to_string()),
        2 => ranges().map_err(|e| e.to_string()),
        3 => mappings().map_err(|e| e.to_string()),
        4 => galois().map_err(|e| e.to_string()),
        5 => rule_document(),
        6 => adapted().map_err(|e| e.to_string()),
        _ => Err(format!("no example {}", example)),
    };
    if let Err(e) = result {
        error!("{}", e);
    }
}
