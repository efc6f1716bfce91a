//! Render dispatch.
//!
//! [`Renderer::format`] resolves the mode of a node, lets the node's own kind
//! render its children through [`Renderer::fwd`] (which extends the path by
//! the child's role), and assembles the result. Kinds with more involved
//! layouts live in their own modules (`arith`, `range`, `relations`,
//! `algebra`, `elnt`) as further `impl Renderer` blocks; the simple leaf
//! kinds are rendered here.
//!
//! The renderer also carries the values variables and lookups receive during
//! the pass, keyed by node. Nothing is written to the nodes themselves, so a
//! tree may be rendered any number of times, and disjoint renderers never
//! interfere.
use crate::formal::errors::{FormalError, FormalResult};
use crate::formal::node::{
    Formal, IntegerData, LookupTable, MappingData, Node, NodeKind, Operand, Value,
};
use crate::formal::path::ExpressionPath;
use crate::formal::rules::RuleTable;
use crate::formal::style::{Form, Mode, Modifier, decide_mode};
use crate::formal::text::Tex;
use log::{debug, trace, warn};
use std::collections::HashMap;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
enum EmptySetStyle {
    Slashzero,
    Braces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
enum CondStyle {
    Colon,
    Vbar,
    Where,
    With,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
enum EllipsisStyle {
    L,
    C,
    V,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
enum MappingForm {
    Name,
    NameArgs,
    Value,
    Map,
    Mapsto,
    NameMapsto,
}

/// Render `root` with an optional explicit mode and rule table.
pub fn render(root: &Node, mode: Option<&Mode>, rules: Option<&RuleTable>) -> FormalResult<Tex> {
    let mut renderer = Renderer::new();
    renderer.format(root, mode, rules, &ExpressionPath::new(), None)
}

#[derive(Debug, Default)]
pub struct Renderer {
    bindings: HashMap<usize, Value>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer::default()
    }

    /// the value a variable or lookup took on most recently in this pass
    pub fn binding(&self, node: &Node) -> Option<&Value> {
        self.bindings.get(&node.uid())
    }

    fn bind(&mut self, node: &Node, value: Option<Value>) {
        match value {
            Some(v) => {
                self.bindings.insert(node.uid(), v);
            }
            None => {
                self.bindings.remove(&node.uid());
            }
        }
    }

    /// Value of a node given the bindings made so far in this pass.
    pub fn value_of(&self, node: &Node) -> Option<Value> {
        match node.kind() {
            NodeKind::Variable | NodeKind::Lookup { .. } => self.binding(node).cloned(),
            NodeKind::Power { base, power } => {
                self.value_of(base)?.checked_pow(&self.value_of(power)?)
            }
            NodeKind::Summand(s) => signed(self.value_of(&s.term)?, s.sign),
            NodeKind::Sum(terms) => terms.iter().try_fold(Value::Int(0), |acc, s| {
                acc.checked_add(&signed(self.value_of(&s.term)?, s.sign)?)
            }),
            NodeKind::Product(factors) => factors
                .iter()
                .try_fold(Value::Int(1), |acc, f| acc.checked_mul(&self.value_of(f)?)),
            NodeKind::Quotient { top, bot } => {
                self.value_of(top)?.checked_div(&self.value_of(bot)?)
            }
            _ => node.intrinsic_value(),
        }
    }

    /// [`Renderer::value_of`], or an `UndefinedValue` error
    pub(crate) fn require_value(&self, node: &Node) -> FormalResult<Value> {
        self.value_of(node).ok_or_else(|| {
            FormalError::UndefinedValue(format!(
                "{} {}",
                node.node_type(),
                node.name().unwrap_or("")
            ))
        })
    }

    pub fn format<'a>(
        &mut self,
        node: &'a Node,
        mode: Option<&Mode>,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
        modifier: Option<&Modifier>,
    ) -> FormalResult<Tex> {
        let mode = decide_mode(node, mode, rules, path, modifier)?;
        trace!("format {} at {:?}", node.node_type(), path);
        let mode = match (node.kind(), mode) {
            (NodeKind::Variable, m) => m,
            (_, Mode::Subst { extra, .. }) => {
                warn!(
                    "substitution payload ignored on {} node at {:?}",
                    node.node_type(),
                    path
                );
                Mode::Style(extra)
            }
            (_, m) => m,
        };
        match node.kind() {
            NodeKind::Integer(data) => self.format_integer(node, data, &mode),
            NodeKind::Variable => self.format_variable(node, mode, rules, path),
            NodeKind::Str { text, math } => Ok(if *math {
                Tex::math(text.as_str())
            } else {
                Tex::plain(text.as_str())
            }),
            NodeKind::Lookup { args, table } => self.format_lookup(node, args, table, rules, path),
            NodeKind::Subscripted { base, sub } => {
                let b = self.fwd(node, base, "base", rules, path, None)?;
                let s = self.fwd(node, sub, "sub", rules, path, None)?;
                Ok(Tex::math(format!("{}_{{{}}}", b, s)))
            }
            NodeKind::Superscripted { base, sup } => {
                let b = self.fwd(node, base, "base", rules, path, None)?;
                let s = self.fwd(node, sup, "sup", rules, path, None)?;
                Ok(Tex::math(format!("{}^{{{}}}", b, s)))
            }
            NodeKind::Power { base, power } => {
                self.format_power(node, base, power, &mode, rules, path)
            }
            NodeKind::Set {
                elements,
                condition,
            } => self.format_set(node, elements, condition.as_ref(), &mode, rules, path, modifier),
            NodeKind::Mapping(data) => self.format_mapping(node, data, &mode, rules, path),
            NodeKind::Ellipsis => {
                let style = mode.options().get_enum("style", EllipsisStyle::L)?;
                Ok(Tex::math(format!("\\{}dots", style)))
            }
            NodeKind::Infinity { sign } => Ok(if *sign == -1 {
                Tex::math("-\\infty")
            } else {
                Tex::math("\\infty")
            }),
            NodeKind::Summand(s) => {
                let t = self.fwd(node, &s.term, "term", rules, path, None)?;
                Ok(if s.sign == -1 { t.negated() } else { t })
            }
            NodeKind::Sum(terms) => self.format_sum(node, terms, &mode, rules, path),
            NodeKind::Product(factors) => self.format_product(node, factors, &mode, rules, path),
            NodeKind::Quotient { top, bot } => {
                self.format_quotient(node, top, bot, &mode, rules, path)
            }
            NodeKind::Range(data) => self.format_range(node, data, &mode, rules, path, modifier),
            NodeKind::Relation(data) => self.format_relation(node, data, &mode, rules, path),
            NodeKind::RelnChain(data) => self.format_reln_chain(node, data, rules, path),
            NodeKind::IntResidue { residue, modulus } => {
                self.format_int_residue(node, *residue, *modulus, &mode)
            }
            NodeKind::Structure(_) => Ok(Tex::math(node.require_name()?)),
            NodeKind::PrimitiveRootOfUnity { order } => {
                self.format_root_of_unity(node, order.as_ref(), &mode, rules, path)
            }
            NodeKind::CyclotomicField(data) => {
                self.format_cyclotomic_field(node, data, &mode, rules, path)
            }
            NodeKind::GaloisGroup { ext, base } => {
                self.format_galois_group(node, ext, base, &mode, rules, path)
            }
        }
    }

    /// Render `child` in the role `role` under `parent`.
    pub(crate) fn fwd<'a>(
        &mut self,
        parent: &'a Node,
        child: &'a Node,
        role: &str,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
        modifier: Option<&Modifier>,
    ) -> FormalResult<Tex> {
        let child_path = path.extended(parent, role);
        self.format(child, None, rules, &child_path, modifier)
    }

    /// Like [`Renderer::fwd`], but plain values are written out as math text.
    pub(crate) fn tryfwd<'a>(
        &mut self,
        parent: &'a Node,
        operand: &'a Operand,
        role: &str,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
        modifier: Option<&Modifier>,
    ) -> FormalResult<Tex> {
        match operand {
            Operand::Node(child) => self.fwd(parent, child, role, rules, path, modifier),
            Operand::Value(v) => Ok(Tex::math(v.to_string())),
        }
    }

    /// the mode `fwd` would hand to a node in `role` under `parent`
    pub(crate) fn fwd_mode<'a>(
        &self,
        parent: &'a Node,
        child: &'a Node,
        role: &str,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
    ) -> FormalResult<Mode> {
        decide_mode(child, None, rules, &path.extended(parent, role), None)
    }

    fn format_integer(&mut self, node: &Node, data: &IntegerData, mode: &Mode) -> FormalResult<Tex> {
        let opts = mode.options();
        let form = match opts.form()? {
            Some(form) => form,
            None if node.name().is_some() => Form::Name,
            None if data.value.is_some() => Form::Value,
            None => Form::Verbal,
        };
        let s = match form {
            Form::Name => Tex::math(node.require_name()?),
            Form::Value | Form::Symbolic => match data.value {
                Some(v) => Tex::math(v.to_string()),
                None => return Err(FormalError::UndefinedValue("integer value".to_string())),
            },
            Form::Verbal => Tex::plain(integer_verbal(data)),
        };
        if form != Form::Verbal && opts.get_bool("ordinal", false)? {
            let text = s.as_str();
            let mut tail = text.chars().rev();
            let last = tail.next();
            let before_last = tail.next();
            let suffix = match (last, before_last) {
                (_, Some('1')) => "th",
                (Some('1'), _) => "st",
                (Some('2'), _) => "nd",
                (Some('3'), _) => "rd",
                _ => "th",
            };
            return Ok(Tex::math(format!("{}^{{\\mathrm{{{}}}}}", text, suffix)));
        }
        Ok(s)
    }

    fn format_variable<'a>(
        &mut self,
        node: &'a Node,
        mode: Mode,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
    ) -> FormalResult<Tex> {
        let (subst, extra) = match mode {
            Mode::Subst { value, extra } => (value, extra),
            Mode::Style(style) => {
                debug!("variable {:?} got a style without substitution", node.name());
                (Operand::Value(Value::Text(node.name().unwrap_or("").to_string())), style)
            }
        };
        let modifier = if extra.is_empty() {
            None
        } else {
            Some(Modifier::Merge(extra))
        };
        let out = self.tryfwd(node, &subst, "subst", rules, path, modifier.as_ref())?;
        let value = match &subst {
            Operand::Node(f) => self.value_of(f),
            Operand::Value(v) => Some(v.clone()),
        };
        self.bind(node, value);
        Ok(out)
    }

    fn format_lookup<'a>(
        &mut self,
        node: &'a Node,
        args: &'a [Formal],
        table: &LookupTable,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
    ) -> FormalResult<Tex> {
        // arguments may be variables that only get their values while rendering
        for (i, arg) in args.iter().enumerate() {
            self.fwd(node, arg, &format!("arg{}", i), rules, path, None)?;
        }
        let values = args
            .iter()
            .map(|a| self.require_value(a))
            .collect::<FormalResult<Vec<Value>>>()?;
        let result = match table {
            LookupTable::Function(f) => f(&values)?,
            nested => {
                let mut current = nested;
                for v in &values {
                    let index = v.as_int().ok_or_else(|| {
                        FormalError::UnsupportedOperation(format!("lookup by non-integer {}", v))
                    })?;
                    current = match current {
                        LookupTable::Table(entries) => {
                            let n = entries.len() as i64;
                            let k = if index < 0 { index + n } else { index };
                            if k < 0 || k >= n {
                                return Err(FormalError::IndexOutOfRange {
                                    index,
                                    lookup: format!("{:?}", current),
                                });
                            }
                            &entries[k as usize]
                        }
                        _ => {
                            return Err(FormalError::UnsupportedOperation(
                                "lookup has more arguments than table levels".to_string(),
                            ));
                        }
                    };
                }
                match current {
                    LookupTable::Entry(op) => op.clone(),
                    _ => {
                        return Err(FormalError::UnsupportedOperation(
                            "lookup has fewer arguments than table levels".to_string(),
                        ));
                    }
                }
            }
        };
        let out = self.tryfwd(node, &result, "value", rules, path, None)?;
        let value = match &result {
            Operand::Node(f) => self.value_of(f),
            Operand::Value(v) => Some(v.clone()),
        };
        self.bind(node, value);
        Ok(out)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn format_set<'a>(
        &mut self,
        node: &'a Node,
        elements: &'a [Formal],
        condition: Option<&'a Formal>,
        mode: &Mode,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
        modifier: Option<&Modifier>,
    ) -> FormalResult<Tex> {
        let mut elts = Vec::with_capacity(elements.len());
        for (i, elt) in elements.iter().enumerate() {
            elts.push(self.fwd(node, elt, &format!("elt{}", i), rules, path, modifier)?);
        }
        let cond = match condition {
            Some(c) => Some(self.fwd(node, c, "cond", rules, path, None)?),
            None => None,
        };
        let opts = mode.options();
        match opts.form_or(Form::Symbolic)? {
            Form::Name => return Ok(Tex::math(node.require_name()?)),
            Form::Value => {
                return Err(FormalError::UndefinedValue("a set has no value".to_string()));
            }
            Form::Verbal => return Ok(set_verbal(&elts, cond)),
            Form::Symbolic => {}
        }
        if elts.is_empty() {
            return Ok(match opts.get_enum("empty", EmptySetStyle::Slashzero)? {
                EmptySetStyle::Braces => Tex::math("\\{\\}"),
                EmptySetStyle::Slashzero => Tex::math("\\varnothing"),
            });
        }
        let list = Tex::join(", ", elts);
        let (mut inner, mut outer) = (Tex::plain(""), Tex::plain(""));
        if let Some(cond) = cond {
            match opts.get_enum("cond", CondStyle::Colon)? {
                CondStyle::Colon => inner = Tex::math(" : ").concat(cond.mbox()),
                CondStyle::Vbar => inner = Tex::math(" \\mid ").concat(cond.mbox()),
                CondStyle::Where => outer = Tex::plain(" where ").concat(cond),
                CondStyle::With => outer = Tex::plain(" with ").concat(cond),
            }
        }
        Ok(Tex::math("\\left\\{ ")
            .concat(list)
            .concat(inner)
            .then_math(" \\right\\}")
            .concat(outer))
    }

    fn format_mapping<'a>(
        &mut self,
        node: &'a Node,
        data: &'a MappingData,
        mode: &Mode,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
    ) -> FormalResult<Tex> {
        let form = mode.options().get_enum("form", MappingForm::Name)?;
        let part = |f: &'a Option<Formal>, what: &str| {
            f.as_ref()
                .ok_or_else(|| FormalError::UndefinedValue(format!("mapping has no {}", what)))
        };
        let mut name = None;
        let mut args = None;
        let mut value = None;
        if !matches!(form, MappingForm::Value | MappingForm::Mapsto) {
            let f = part(&data.name_form, "name")?;
            name = Some(self.fwd(node, f, "name", rules, path, None)?);
        }
        if matches!(
            form,
            MappingForm::NameArgs | MappingForm::Mapsto | MappingForm::NameMapsto
        ) {
            let mut rendered = Vec::with_capacity(data.args.len());
            for (i, arg) in data.args.iter().enumerate() {
                rendered.push(self.fwd(node, arg, &format!("arg{}", i), rules, path, None)?);
            }
            args = Some(Tex::join(", ", rendered));
        }
        if matches!(
            form,
            MappingForm::Value | MappingForm::Mapsto | MappingForm::NameMapsto
        ) {
            let v = part(&data.value_form, "value")?;
            value = Some(self.fwd(node, v, "value", rules, path, None)?);
        }
        let (f, a, v) = (
            name.unwrap_or_else(|| Tex::math("")),
            args.unwrap_or_else(|| Tex::math("")),
            value.unwrap_or_else(|| Tex::math("")),
        );
        Ok(match form {
            MappingForm::Name => f,
            MappingForm::NameArgs => Tex::math(format!("{}({})", f, a)),
            MappingForm::Value => v,
            MappingForm::Map => {
                let d = self.fwd(node, part(&data.domain, "domain")?, "domain", rules, path, None)?;
                let c =
                    self.fwd(node, part(&data.codomain, "codomain")?, "codomain", rules, path, None)?;
                Tex::math(format!("{}: {} \\rightarrow {}", f, d, c))
            }
            MappingForm::Mapsto => Tex::math(format!("{} \\mapsto {}", a, v)),
            MappingForm::NameMapsto => Tex::math(format!("{}: {} \\mapsto {}", f, a, v)),
        })
    }
}

fn signed(v: Value, sign: i8) -> Option<Value> {
    if sign == -1 { v.checked_neg() } else { Some(v) }
}

/// "an odd, positive prime", "an integer", ...
fn integer_verbal(data: &IntegerData) -> String {
    let mut adjectives = Vec::new();
    match data.odd {
        Some(true) => adjectives.push("odd"),
        Some(false) => adjectives.push("even"),
        None => {}
    }
    match data.pos {
        Some(true) => adjectives.push("positive"),
        Some(false) => adjectives.push("negative"),
        None => {}
    }
    let noun = match data.prime {
        Some(true) => "prime",
        Some(false) => "composite integer",
        None => "integer",
    };
    let phrase = format!("{} {}", adjectives.join(", "), noun);
    let phrase = phrase.trim();
    let article = if phrase.starts_with(['a', 'e', 'i', 'o', 'u']) {
        "an"
    } else {
        "a"
    };
    format!("{} {}", article, phrase)
}

fn set_verbal(elts: &[Tex], cond: Option<Tex>) -> Tex {
    match elts {
        [] => Tex::plain("the empty set"),
        [only] => {
            let s = Tex::plain("the set of all ").concat(only.clone());
            match cond {
                Some(c) => s.then_plain(" such that ").concat(c),
                None => s,
            }
        }
        many => Tex::plain(format!(
            "the set containing {}",
            many.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formal::node::ooo;
    use crate::{range, style};

    fn plain(f: &Formal) -> String {
        render(f, None, None).unwrap().to_string()
    }

    #[test]
    fn test_integer_forms() {
        let p = Formal::integer(13).named("p");
        assert_eq!(plain(&p), "p");
        assert_eq!(plain(&Formal::integer(13)), "13");
        let m = Mode::Style(style! {"form" => "value", "ordinal" => true});
        assert_eq!(render(&p, Some(&m), None).unwrap(), "13^{\\mathrm{th}}");
        let m = Mode::Style(style! {"ordinal" => true});
        assert_eq!(render(&Formal::integer(22), Some(&m), None).unwrap(), "22^{\\mathrm{nd}}");
        assert_eq!(render(&Formal::integer(12), Some(&m), None).unwrap(), "12^{\\mathrm{th}}");
        assert_eq!(render(&Formal::integer(1), Some(&m), None).unwrap(), "1^{\\mathrm{st}}");
    }

    #[test]
    fn test_integer_verbal() {
        let n = Formal::symbolic_integer(Some(true), Some(true), Some(true));
        assert_eq!(plain(&n), "an odd, positive prime");
        assert_eq!(plain(&Formal::symbolic_integer(None, None, None)), "an integer");
        let v = Mode::Style(style! {"form" => "verbal"});
        assert_eq!(
            render(&Formal::integer(-4), Some(&v), None).unwrap(),
            "an even, negative composite integer"
        );
    }

    #[test]
    fn test_undefined_integer_value() {
        let n = Formal::symbolic_integer(None, None, None);
        let m = Mode::Style(style! {"form" => "value"});
        assert!(matches!(
            render(&n, Some(&m), None),
            Err(FormalError::UndefinedValue(_))
        ));
    }

    #[test]
    fn test_variable_substitution() {
        let x = Formal::variable("x");
        let a = Formal::integer(2).named("a");
        assert_eq!(plain(&x), "x");
        let rules = RuleTable::new().rule("#x @subst", style! {"form" => "value"});
        assert_eq!(render(&x, Some(&Mode::subst(a.clone())), Some(&rules)).unwrap(), "2");
        let m = Mode::subst_with(a.clone(), style! {"form" => "value"});
        assert_eq!(render(&x, Some(&m), None).unwrap(), "2");
        assert_eq!(render(&x, Some(&Mode::subst(a)), None).unwrap(), "a");
    }

    #[test]
    fn test_variable_value_reaches_parent() {
        let x = Formal::variable("x");
        let sq = x.clone().pow(2);
        let rules = RuleTable::new()
            .rule("#x", 3)
            .rule("Power", style! {"form" => "value"});
        assert_eq!(render(&sq, None, Some(&rules)).unwrap(), "9");
    }

    #[test]
    fn test_sub_and_superscripts() {
        let a = Formal::string("a");
        assert_eq!(plain(&a.clone().subscript(0)), "a_{0}");
        assert_eq!(plain(&a.superscript("*")), "a^{*}");
    }

    #[test]
    fn test_lookup_table() {
        let i = Formal::variable("i");
        let f = Formal::lookup(vec![i.clone()], LookupTable::list(range![2, 3, 5, ooo(), 13]));
        assert_eq!(render(&f, None, Some(&RuleTable::new().rule("#i", 1))).unwrap(), "3");
        assert_eq!(render(&f, None, Some(&RuleTable::new().rule("#i", -1))).unwrap(), "13");
        assert!(matches!(
            render(&f, None, Some(&RuleTable::new().rule("#i", 5))),
            Err(FormalError::IndexOutOfRange { index: 5, .. })
        ));
    }

    #[test]
    fn test_lookup_function_and_value_role() {
        let i = Formal::variable("i");
        let j = Formal::variable("j");
        let f = Formal::lookup(
            vec![i, j],
            LookupTable::function(|vals| {
                let s = vals[0].checked_add(&vals[1]).unwrap_or(Value::Int(0));
                Operand::from(Formal::integer(s.as_int().unwrap_or(0)).named("s"))
            }),
        );
        let rules = RuleTable::new()
            .rule("#i", 4)
            .rule("#j", 5)
            .rule("Lookup @value", style! {"form" => "value"});
        assert_eq!(render(&f, None, Some(&rules)).unwrap(), "9");
        let rules = RuleTable::new().rule("#i", 4).rule("#j", 5);
        assert_eq!(render(&f, None, Some(&rules)).unwrap(), "s");
    }

    #[test]
    fn test_sets() {
        let empty = Formal::set(vec![], None);
        assert_eq!(plain(&empty), "\\varnothing");
        let braces = Mode::Style(style! {"empty" => "braces"});
        assert_eq!(render(&empty, Some(&braces), None).unwrap(), "\\{\\}");
        let s = Formal::set(vec![Formal::integer(1), Formal::integer(2)], None);
        assert_eq!(plain(&s), "\\left\\{ 1, 2 \\right\\}");
        let verbal = Mode::Style(style! {"form" => "verbal"});
        assert_eq!(render(&s, Some(&verbal), None).unwrap(), "the set containing 1, 2");
        assert_eq!(render(&empty, Some(&verbal), None).unwrap(), "the empty set");
        let bad = Mode::Style(style! {"cond" => "sideways"});
        let with_cond = Formal::set(vec![Formal::variable("x")], Some(Formal::string("x > 0")));
        assert!(matches!(
            render(&with_cond, Some(&bad), None),
            Err(FormalError::InvalidOption { .. })
        ));
        assert_eq!(plain(&with_cond), "\\left\\{ x : x > 0 \\right\\}");
    }

    #[test]
    fn test_mapping_forms() {
        let f = Formal::string("f");
        let x = Formal::variable("x");
        let map = Formal::mapping(MappingData {
            name_form: Some(f),
            domain: Some(Formal::string("\\mathbb{R}")),
            codomain: Some(Formal::string("\\mathbb{R}")),
            args: vec![x.clone()],
            value_form: Some(x.pow(2)),
        });
        let with_form = |form: &str| {
            render(&map, Some(&Mode::Style(style! {"form" => form})), None)
                .unwrap()
                .to_string()
        };
        assert_eq!(plain(&map), "f");
        assert_eq!(with_form("name-args"), "f(x)");
        assert_eq!(with_form("value"), "x^{2}");
        assert_eq!(with_form("map"), "f: \\mathbb{R} \\rightarrow \\mathbb{R}");
        assert_eq!(with_form("mapsto"), "x \\mapsto x^{2}");
        assert_eq!(with_form("name-mapsto"), "f: x \\mapsto x^{2}");
    }

    #[test]
    fn test_ellipsis_and_infinity() {
        assert_eq!(plain(&ooo()), "\\ldots");
        let v = Mode::Style(style! {"style" => "v"});
        assert_eq!(render(&ooo(), Some(&v), None).unwrap(), "\\vdots");
        let bad = Mode::Style(style! {"style" => "q"});
        assert!(render(&ooo(), Some(&bad), None).is_err());
        assert_eq!(plain(&Formal::infinity(-1)), "-\\infty");
        assert_eq!(plain(&Formal::infinity(1)), "\\infty");
    }

    #[test]
    fn test_subst_mode_on_non_variable_is_ignored() {
        let n = Formal::integer(4);
        assert_eq!(render(&n, Some(&Mode::subst(9)), None).unwrap(), "4");
    }
}
