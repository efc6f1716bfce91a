//! Range builders: sums, sets and products over a range of index values.
//!
//! A builder holds a range (a list of values, possibly containing
//! ellipses), a generic form and a bound variable occurring in it. It renders
//! either in *list* mode, writing out one item per range entry:
//!
//! ```text
//! a_{0} + a_{1} + \cdots + a_{p - 2}
//! ```
//!
//! or in *bind* mode, writing the generic form once with a condition on the
//! bound variable:
//!
//! ```text
//! \sum_{i = 0}^{p - 2} a_{i}
//! ```
//!
//! In list mode every item is the same generic-form node, so the value of the
//! bound variable inside item `k` is supplied by a rule matching on the item's
//! role (`term[k]`, `elt[k]`, `factor[k]`), added to a copy of the rule table
//! for the duration of the call.
use crate::formal::errors::{FormalError, FormalResult};
use crate::formal::node::{Formal, Node, NodeKind, Operand, Value};
use crate::formal::path::{ExpressionPath, PATH_DELIMITER};
use crate::formal::relations::RelationKind;
use crate::formal::render::Renderer;
use crate::formal::rules::RuleTable;
use crate::formal::style::{Mode, Modifier};
use crate::formal::text::Tex;
use log::debug;
use std::rc::Rc;
use strum_macros::{Display, EnumString};

/// interpolation never spells out more entries than this
const MAX_SPELLED_OUT: i64 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    Sum,
    Set,
    Prod,
}

impl RangeKind {
    /// role prefix of the items in list mode
    fn item_role(self) -> &'static str {
        match self {
            RangeKind::Sum => "term",
            RangeKind::Set => "elt",
            RangeKind::Prod => "factor",
        }
    }

    fn operator_symbol(self) -> Option<&'static str> {
        match self {
            RangeKind::Sum => Some("\\sum"),
            RangeKind::Prod => Some("\\prod"),
            RangeKind::Set => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
enum RangeMode {
    Auto,
    List,
    Bind,
}

#[derive(Debug, Clone)]
pub struct RangeData {
    pub kind: RangeKind,
    pub range: Vec<Operand>,
    pub gen_form: Formal,
    pub bound_var: Formal,
    pub cond: Option<Formal>,
}

impl Formal {
    /// Without both a generic form and a bound variable, the range entries
    /// themselves are the items.
    pub fn range_builder(
        kind: RangeKind,
        range: Vec<Operand>,
        gen_form: Option<Formal>,
        bound_var: Option<Formal>,
        cond: Option<Formal>,
    ) -> Formal {
        let (gen_form, bound_var) = match (gen_form, bound_var) {
            (Some(g), Some(v)) => (g, v),
            _ => {
                // the bound variable has to sit strictly inside the generic form
                let i = Formal::variable("i");
                let j = Formal::variable("j").with_mode(Mode::subst(i.clone()));
                (j, i)
            }
        };
        Formal::from_kind(NodeKind::Range(RangeData {
            kind,
            range,
            gen_form,
            bound_var,
            cond,
        }))
    }

    pub fn range_sum(
        range: Vec<Operand>,
        gen_form: Option<Formal>,
        bound_var: Option<Formal>,
        cond: Option<Formal>,
    ) -> Formal {
        Formal::range_builder(RangeKind::Sum, range, gen_form, bound_var, cond)
    }

    pub fn range_set(
        range: Vec<Operand>,
        gen_form: Option<Formal>,
        bound_var: Option<Formal>,
        cond: Option<Formal>,
    ) -> Formal {
        Formal::range_builder(RangeKind::Set, range, gen_form, bound_var, cond)
    }

    pub fn range_prod(
        range: Vec<Operand>,
        gen_form: Option<Formal>,
        bound_var: Option<Formal>,
        cond: Option<Formal>,
    ) -> Formal {
        Formal::range_builder(RangeKind::Prod, range, gen_form, bound_var, cond)
    }
}

impl Node {
    /// the generic term of a range sum
    pub fn generic_term(&self) -> Option<&Formal> {
        match self.kind() {
            NodeKind::Range(r) if r.kind == RangeKind::Sum => Some(&r.gen_form),
            _ => None,
        }
    }
}

/// An endpoint with a known integer value that is displayed as that value.
fn numeric_endpoint(op: &Operand) -> Option<i64> {
    match op {
        Operand::Value(Value::Int(i)) => Some(*i),
        Operand::Node(f) if f.name().is_none() => match f.kind() {
            NodeKind::Integer(d) => d.value,
            _ => None,
        },
        _ => None,
    }
}

/// Fill in a two-entry range `[a, b]` with step `step`. Bounds too far apart
/// for `i64` arithmetic get the elided form.
fn interpolate(range: &[Operand], step: i64) -> Vec<Operand> {
    if range.len() != 2 || step == 0 {
        return range.to_vec();
    }
    let (a, b) = (&range[0], &range[1]);
    let ellipsis = || Operand::Node(Formal::ellipsis());
    let elided = |x: i64| match x.checked_add(step) {
        Some(second) => vec![a.clone(), Operand::from(second), ellipsis(), b.clone()],
        None => vec![a.clone(), ellipsis(), b.clone()],
    };
    match (numeric_endpoint(a), numeric_endpoint(b)) {
        (Some(x), Some(y)) => {
            let Some(span) = y.checked_sub(x) else {
                debug!("range [{}, {}] overflows, elided", x, y);
                return elided(x);
            };
            if span != 0 && span.signum() != step.signum() {
                return range.to_vec();
            }
            let count = match span.checked_div(step) {
                Some(count) if count <= MAX_SPELLED_OUT => count,
                _ => return elided(x),
            };
            let items: Option<Vec<Operand>> = (0..=count)
                .map(|k| k.checked_mul(step).and_then(|d| x.checked_add(d)).map(Operand::from))
                .collect();
            let Some(mut items) = items else {
                return elided(x);
            };
            if count.checked_mul(step).and_then(|d| x.checked_add(d)) != Some(y) {
                items.push(b.clone());
            }
            items
        }
        (Some(x), None) => elided(x),
        _ => vec![a.clone(), ellipsis(), b.clone()],
    }
}

fn endpoint(op: &Operand, sign: i8) -> Formal {
    if op.is_ellipsis() {
        Formal::infinity(sign)
    } else {
        op.to_formal()
    }
}

impl Renderer {
    /// options: `range` (auto, list, bind), `step`; everything else is passed
    /// on to the sum, set or product that is actually rendered
    pub(crate) fn format_range<'a>(
        &mut self,
        node: &'a Node,
        data: &'a RangeData,
        mode: &Mode,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
        modifier: Option<&Modifier>,
    ) -> FormalResult<Tex> {
        let opts = mode.options();
        let step = opts.get_int("step", 0)?;
        let len = data.range.len();
        let range_mode = match opts.get_enum("range", RangeMode::Auto)? {
            RangeMode::Auto if len >= 3 || step != 0 => RangeMode::List,
            RangeMode::Auto => RangeMode::Bind,
            other => other,
        };
        debug!("{} in {} mode at {:?}", node.node_type(), range_mode, path);
        if range_mode == RangeMode::List {
            return self.format_range_list(data, step, mode, rules, path, modifier);
        }
        match (&data.cond, len >= 2) {
            (None, true) => {
                let a = endpoint(&data.range[0], -1);
                let b = endpoint(&data.range[len - 1], 1);
                self.format_range_bounds(node, data, a, b, mode, rules, path, modifier)
            }
            (cond, _) => {
                let cond = match (cond, data.kind) {
                    (Some(c), _) => Some(c.clone()),
                    (None, RangeKind::Set) => None,
                    (None, _) => Some(data.bound_var.clone()),
                };
                self.format_range_condition(node, data, cond, mode, rules, path, modifier)
            }
        }
    }

    fn format_range_list<'a>(
        &mut self,
        data: &RangeData,
        step: i64,
        mode: &Mode,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
        modifier: Option<&Modifier>,
    ) -> FormalResult<Tex> {
        let entries = interpolate(&data.range, step);
        let items: Vec<Formal> = entries
            .iter()
            .map(|e| match e {
                Operand::Node(f) if e.is_ellipsis() => f.clone(),
                _ => data.gen_form.clone(),
            })
            .collect();
        let subobject = match data.kind {
            RangeKind::Sum => Formal::sum(items).flattened(),
            RangeKind::Set => Formal::set(items, data.cond.clone()),
            RangeKind::Prod => Formal::product(items),
        };

        let bound_id = data.bound_var.id().ok_or_else(|| {
            FormalError::UnsupportedOperation("a bound variable without an id".to_string())
        })?;
        let basepath = path.rolepath();
        let chain = if basepath.is_empty() {
            format!("@{}[i] #{}", data.kind.item_role(), bound_id)
        } else {
            format!(
                "@{}{}{}[i] #{}",
                basepath,
                PATH_DELIMITER,
                data.kind.item_role(),
                bound_id
            )
        };
        let entries = Rc::new(entries);
        let mut table = rules.cloned().unwrap_or_default();
        table.insert_derived(
            &chain,
            &["i"],
            Rc::new(move |args: &[Option<i64>]| {
                let index = args.first().copied().flatten().unwrap_or(-1);
                usize::try_from(index)
                    .ok()
                    .and_then(|k| entries.get(k))
                    .map(|entry| Mode::subst(entry.clone()))
                    .ok_or_else(|| FormalError::IndexOutOfRange {
                        index,
                        lookup: format!("{:?}", entries),
                    })
            }),
        );
        self.format(&subobject, Some(mode), Some(&table), path, modifier)
    }

    #[allow(clippy::too_many_arguments)]
    fn format_range_bounds<'a>(
        &mut self,
        node: &'a Node,
        data: &'a RangeData,
        a: Formal,
        b: Formal,
        mode: &Mode,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
        modifier: Option<&Modifier>,
    ) -> FormalResult<Tex> {
        let Some(op) = data.kind.operator_symbol() else {
            let relation = |end: &Formal| {
                if matches!(end.kind(), NodeKind::Infinity { .. }) {
                    RelationKind::Lt
                } else {
                    RelationKind::Leq
                }
            };
            let cond = a
                .clone()
                .relate(relation(&a), true, data.bound_var.clone())
                .relate(relation(&b), true, b.clone());
            return self.format_range_condition(node, data, Some(cond), mode, rules, path, modifier);
        };
        let form = self.fwd(node, &data.gen_form, "form", rules, path, None)?;
        let var = self.fwd(node, &data.bound_var, "var", rules, path, None)?;
        let lower = self.fwd(node, &a, "lower", rules, path, None)?;
        let upper = self.fwd(node, &b, "upper", rules, path, None)?;
        Ok(Tex::math(op)
            .then_math("_{")
            .concat(var)
            .then_math(" = ")
            .concat(lower)
            .then_math("}^{")
            .concat(upper)
            .then_math("} ")
            .concat(form))
    }

    #[allow(clippy::too_many_arguments)]
    fn format_range_condition<'a>(
        &mut self,
        node: &'a Node,
        data: &'a RangeData,
        cond: Option<Formal>,
        mode: &Mode,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
        modifier: Option<&Modifier>,
    ) -> FormalResult<Tex> {
        match (data.kind.operator_symbol(), cond) {
            (Some(op), Some(cond)) => {
                let form = self.fwd(node, &data.gen_form, "form", rules, path, None)?;
                let cond = self.fwd(node, &cond, "cond", rules, path, None)?;
                Ok(Tex::math(op)
                    .then_math("_{")
                    .concat(cond)
                    .then_math("} ")
                    .concat(form))
            }
            (_, cond) => {
                let set = Formal::set(vec![data.gen_form.clone()], cond);
                self.format(&set, Some(mode), rules, path, modifier)
            }
        }
    }
}
