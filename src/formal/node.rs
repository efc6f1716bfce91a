//! The expression tree.
//!
//! Nodes are immutable once built and shared through the cheap [`Formal`]
//! handle, so one node may appear in many places of a tree (a range builder
//! repeats its generic term, for instance). Values that depend on a render
//! pass, like the value a variable receives through substitution, are kept by
//! the [`Renderer`](crate::formal::render::Renderer), never on the node.
use crate::formal::algebra::{CyclotomicData, StructureKind};
use crate::formal::errors::{FormalError, FormalResult};
use crate::formal::range::{RangeData, RangeKind};
use crate::formal::relations::{RelationData, RelnChainData};
use crate::formal::style::Mode;
use crate::numerical::number_theory::{is_prime, mod_pow};
use num::rational::Rational64;
use num::{CheckedAdd, CheckedDiv, CheckedMul, One, Zero};
use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Neg, Sub};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum_macros::{Display, EnumIter, EnumString};

static NEXT_UID: AtomicUsize = AtomicUsize::new(1);

fn next_uid() -> usize {
    NEXT_UID.fetch_add(1, Ordering::Relaxed)
}

////////////////////////////////////////////////////////////////////////////////
//                              VALUES
////////////////////////////////////////////////////////////////////////////////

/// A computed value: what `form: value` prints and what lookups index with.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Ratio(Rational64),
    /// residue class, always kept in `0..modulus`
    Residue { value: i64, modulus: i64 },
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Ratio(r) if r.denom().is_one() => write!(f, "{}", r.numer()),
            Value::Ratio(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Value::Residue { value, .. } => write!(f, "{}", value),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Value {
    pub fn residue(value: i64, modulus: i64) -> Value {
        Value::Residue {
            value: value.rem_euclid(modulus),
            modulus,
        }
    }

    /// the value as an integer, when it is one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Ratio(r) if r.denom().is_one() => Some(*r.numer()),
            Value::Residue { value, .. } => Some(*value),
            _ => None,
        }
    }

    fn as_ratio(&self) -> Option<Rational64> {
        match self {
            Value::Int(i) => Some(Rational64::from_integer(*i)),
            Value::Ratio(r) => Some(*r),
            _ => None,
        }
    }

    fn from_ratio(r: Rational64) -> Value {
        if r.denom().is_one() {
            Value::Int(*r.numer())
        } else {
            Value::Ratio(r)
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(i) => *i == 0,
            Value::Ratio(r) => r.is_zero(),
            Value::Residue { value, .. } => *value == 0,
            Value::Text(_) => false,
        }
    }

    pub fn checked_neg(&self) -> Option<Value> {
        match self {
            Value::Int(i) => i.checked_neg().map(Value::Int),
            Value::Ratio(r) => Some(Value::Ratio(-*r)),
            Value::Residue { value, modulus } => Some(Value::residue(-value, *modulus)),
            Value::Text(_) => None,
        }
    }

    pub fn checked_add(&self, other: &Value) -> Option<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => i64::checked_add(*a, *b).map(Value::Int),
            (Value::Residue { value, modulus }, o) | (o, Value::Residue { value, modulus }) => {
                let b = o.as_int()?;
                Some(Value::residue(
                    ((*value as i128 + b as i128).rem_euclid(*modulus as i128)) as i64,
                    *modulus,
                ))
            }
            (a, b) => {
                let sum = a.as_ratio()?.checked_add(&b.as_ratio()?)?;
                Some(Value::from_ratio(sum))
            }
        }
    }

    pub fn checked_mul(&self, other: &Value) -> Option<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => i64::checked_mul(*a, *b).map(Value::Int),
            (Value::Residue { value, modulus }, o) | (o, Value::Residue { value, modulus }) => {
                let b = o.as_int()?;
                Some(Value::residue(
                    ((*value as i128 * b as i128).rem_euclid(*modulus as i128)) as i64,
                    *modulus,
                ))
            }
            (a, b) => {
                let prod = a.as_ratio()?.checked_mul(&b.as_ratio()?)?;
                Some(Value::from_ratio(prod))
            }
        }
    }

    /// Exact division; `None` on a zero divisor.
    pub fn checked_div(&self, other: &Value) -> Option<Value> {
        if other.is_zero() {
            return None;
        }
        match (self, other) {
            (Value::Residue { modulus, .. }, o) => {
                let d = o.as_int()?;
                if d.rem_euclid(*modulus) == 0 {
                    return None;
                }
                let inverse = mod_pow(d, (*modulus - 2) as u64, *modulus);
                self.checked_mul(&Value::Int(inverse))
            }
            (a, Value::Residue { modulus, .. }) => {
                Value::residue(a.as_int()?, *modulus).checked_div(other)
            }
            (a, b) => {
                let q = a.as_ratio()?.checked_div(&b.as_ratio()?)?;
                Some(Value::from_ratio(q))
            }
        }
    }

    /// Integer exponents only. A negative power of an integer is a ratio; a
    /// negative power of a residue uses the inverse modulo the (prime) modulus.
    pub fn checked_pow(&self, exponent: &Value) -> Option<Value> {
        let e = match exponent {
            Value::Residue { .. } => return None,
            other => other.as_int()?,
        };
        match self {
            Value::Residue { value, modulus } => {
                if e >= 0 {
                    Some(Value::residue(mod_pow(*value, e as u64, *modulus), *modulus))
                } else if *value == 0 {
                    None
                } else {
                    let inv = mod_pow(*value, (*modulus - 2) as u64, *modulus);
                    Some(Value::residue(mod_pow(inv, e.unsigned_abs(), *modulus), *modulus))
                }
            }
            Value::Text(_) => None,
            base => {
                let r = base.as_ratio()?;
                let exp = usize::try_from(e.unsigned_abs()).ok()?;
                let n = num::checked_pow(*r.numer(), exp)?;
                let d = num::checked_pow(*r.denom(), exp)?;
                if e >= 0 {
                    Some(Value::from_ratio(Rational64::new(n, d)))
                } else if n.is_zero() {
                    None
                } else {
                    Some(Value::from_ratio(Rational64::new(d, n)))
                }
            }
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<Rational64> for Value {
    fn from(r: Rational64) -> Self {
        Value::from_ratio(r)
    }
}

/// Either a node or a plain value: what substitutions and range entries hold.
#[derive(Debug, Clone)]
pub enum Operand {
    Node(Formal),
    Value(Value),
}

impl Operand {
    pub fn is_ellipsis(&self) -> bool {
        matches!(self, Operand::Node(f) if matches!(f.kind(), NodeKind::Ellipsis))
    }

    pub fn as_node(&self) -> Option<&Formal> {
        match self {
            Operand::Node(f) => Some(f),
            Operand::Value(_) => None,
        }
    }

    /// The operand as a node, wrapping plain integers as integer nodes.
    pub fn to_formal(&self) -> Formal {
        match self {
            Operand::Node(f) => f.clone(),
            Operand::Value(Value::Int(i)) => Formal::integer(*i),
            Operand::Value(Value::Ratio(r)) => Formal::from(*r),
            Operand::Value(v) => Formal::string(&v.to_string()),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Node(n) => write!(f, "{:?}", n),
            Operand::Value(v) => write!(f, "{}", v),
        }
    }
}

impl From<Formal> for Operand {
    fn from(f: Formal) -> Self {
        Operand::Node(f)
    }
}

impl From<&Formal> for Operand {
    fn from(f: &Formal) -> Self {
        Operand::Node(f.clone())
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl From<i64> for Operand {
    fn from(i: i64) -> Self {
        Operand::Value(Value::Int(i))
    }
}

impl From<i32> for Operand {
    fn from(i: i32) -> Self {
        Operand::Value(Value::Int(i as i64))
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::Value(Value::Text(s.to_string()))
    }
}

/// Build a `Vec<Operand>` from mixed integers and nodes:
/// `range![0, 1, ooo(), n.clone() - 2]`.
#[macro_export]
macro_rules! range {
    ($($item:expr),* $(,)?) => {
        vec![$($crate::formal::node::Operand::from($item)),*]
    };
}

pub type LookupFn = Rc<dyn Fn(&[Value]) -> FormalResult<Operand>>;

/// What a lookup node reads its value from.
#[derive(Clone)]
pub enum LookupTable {
    /// called with the values of all arguments
    Function(LookupFn),
    /// indexed by the value of the next argument
    Table(Vec<LookupTable>),
    Entry(Operand),
}

impl LookupTable {
    pub fn function(f: impl Fn(&[Value]) -> Operand + 'static) -> Self {
        LookupTable::Function(Rc::new(move |args| Ok(f(args))))
    }

    pub fn list(entries: Vec<Operand>) -> Self {
        LookupTable::Table(entries.into_iter().map(LookupTable::Entry).collect())
    }
}

impl fmt::Debug for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupTable::Function(_) => write!(f, "<function>"),
            LookupTable::Table(entries) => f.debug_list().entries(entries).finish(),
            LookupTable::Entry(op) => write!(f, "{}", op),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
//                              NODES
////////////////////////////////////////////////////////////////////////////////

/// Variant tags, as matched by type selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum NodeType {
    Integer,
    Variable,
    #[strum(serialize = "String")]
    Str,
    Lookup,
    Subscripted,
    Superscripted,
    Power,
    Set,
    Mapping,
    Ellipsis,
    Infinity,
    Summand,
    Sum,
    Product,
    Quotient,
    RangeSum,
    RangeSet,
    RangeProd,
    SetMembershipRelation,
    LeqRelation,
    LtRelation,
    RelnChain,
    IntResidue,
    Group,
    Ring,
    Field,
    TheRationalNumbers,
    PrimitiveRootOfUnity,
    CyclotomicField,
    GaloisGroup,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegerData {
    pub value: Option<i64>,
    pub pos: Option<bool>,
    pub odd: Option<bool>,
    pub prime: Option<bool>,
}

/// One signed term of a sum.
#[derive(Debug, Clone)]
pub struct Summand {
    pub term: Formal,
    pub sign: i8,
}

impl Summand {
    pub fn new(term: Formal, sign: i8) -> Self {
        Summand { term, sign }
    }

    pub fn negated(self) -> Self {
        Summand {
            term: self.term,
            sign: -self.sign,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MappingData {
    pub name_form: Option<Formal>,
    pub domain: Option<Formal>,
    pub codomain: Option<Formal>,
    pub args: Vec<Formal>,
    pub value_form: Option<Formal>,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Integer(IntegerData),
    Variable,
    Str { text: String, math: bool },
    Lookup { args: Vec<Formal>, table: LookupTable },
    Subscripted { base: Formal, sub: Formal },
    Superscripted { base: Formal, sup: Formal },
    Power { base: Formal, power: Formal },
    Set { elements: Vec<Formal>, condition: Option<Formal> },
    Mapping(MappingData),
    Ellipsis,
    Infinity { sign: i8 },
    Summand(Summand),
    Sum(Vec<Summand>),
    Product(Vec<Formal>),
    Quotient { top: Formal, bot: Formal },
    Range(RangeData),
    Relation(RelationData),
    RelnChain(RelnChainData),
    IntResidue { residue: i64, modulus: i64 },
    Structure(StructureKind),
    PrimitiveRootOfUnity { order: Option<Formal> },
    CyclotomicField(CyclotomicData),
    GaloisGroup { ext: Formal, base: Formal },
}

#[derive(Debug, Clone)]
pub struct Node {
    uid: usize,
    name: Option<String>,
    id: Option<String>,
    mode: Option<Mode>,
    kind: NodeKind,
}

impl Node {
    /// unique per constructed node; keys the per-pass bindings
    pub fn uid(&self) -> usize {
        self.uid
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// identity token: the explicit id, else the name
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().or(self.name.as_deref())
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn default_mode(&self) -> Mode {
        self.mode.clone().unwrap_or_default()
    }

    pub fn node_type(&self) -> NodeType {
        match &self.kind {
            NodeKind::Integer(_) => NodeType::Integer,
            NodeKind::Variable => NodeType::Variable,
            NodeKind::Str { .. } => NodeType::Str,
            NodeKind::Lookup { .. } => NodeType::Lookup,
            NodeKind::Subscripted { .. } => NodeType::Subscripted,
            NodeKind::Superscripted { .. } => NodeType::Superscripted,
            NodeKind::Power { .. } => NodeType::Power,
            NodeKind::Set { .. } => NodeType::Set,
            NodeKind::Mapping(_) => NodeType::Mapping,
            NodeKind::Ellipsis => NodeType::Ellipsis,
            NodeKind::Infinity { .. } => NodeType::Infinity,
            NodeKind::Summand(_) => NodeType::Summand,
            NodeKind::Sum(_) => NodeType::Sum,
            NodeKind::Product(_) => NodeType::Product,
            NodeKind::Quotient { .. } => NodeType::Quotient,
            NodeKind::Range(r) => match r.kind {
                RangeKind::Sum => NodeType::RangeSum,
                RangeKind::Set => NodeType::RangeSet,
                RangeKind::Prod => NodeType::RangeProd,
            },
            NodeKind::Relation(r) => r.kind.node_type(),
            NodeKind::RelnChain(_) => NodeType::RelnChain,
            NodeKind::IntResidue { .. } => NodeType::IntResidue,
            NodeKind::Structure(s) => match s {
                StructureKind::Group => NodeType::Group,
                StructureKind::Ring => NodeType::Ring,
                StructureKind::Field => NodeType::Field,
                StructureKind::RationalNumbers => NodeType::TheRationalNumbers,
            },
            NodeKind::PrimitiveRootOfUnity { .. } => NodeType::PrimitiveRootOfUnity,
            NodeKind::CyclotomicField(_) => NodeType::CyclotomicField,
            NodeKind::GaloisGroup { .. } => NodeType::GaloisGroup,
        }
    }

    /// A value the node carries independently of any render pass.
    pub fn intrinsic_value(&self) -> Option<Value> {
        match &self.kind {
            NodeKind::Integer(data) => data.value.map(Value::Int),
            NodeKind::IntResidue { residue, modulus } => Some(Value::residue(*residue, *modulus)),
            _ => None,
        }
    }

    /// the name, or an `UndefinedValue` error naming this node's kind
    pub fn require_name(&self) -> FormalResult<&str> {
        self.name()
            .ok_or_else(|| FormalError::UndefinedValue(format!("{} has no name", self.node_type())))
    }
}

/// A sum of at least two terms.
pub fn is_proper_sum(node: &Node) -> bool {
    matches!(node.kind(), NodeKind::Sum(terms) if terms.len() >= 2)
}

/// Shared handle to a node.
#[derive(Clone)]
pub struct Formal(Rc<Node>);

impl Deref for Formal {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.0
    }
}

impl AsRef<Node> for Formal {
    fn as_ref(&self) -> &Node {
        &self.0
    }
}

impl fmt::Debug for Formal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{}({})", self.node_type(), id),
            None => write!(f, "{}", self.node_type()),
        }
    }
}

impl Formal {
    pub(crate) fn from_kind(kind: NodeKind) -> Formal {
        Formal(Rc::new(Node {
            uid: next_uid(),
            name: None,
            id: None,
            mode: None,
            kind,
        }))
    }

    /// Edit the node if this is the only handle to it, else edit a fresh copy.
    fn rebuild(self, edit: impl FnOnce(&mut Node)) -> Formal {
        let mut node = match Rc::try_unwrap(self.0) {
            Ok(node) => node,
            Err(shared) => {
                let mut copy = (*shared).clone();
                copy.uid = next_uid();
                copy
            }
        };
        edit(&mut node);
        Formal(Rc::new(node))
    }

    pub fn named(self, name: &str) -> Formal {
        self.rebuild(|n| n.name = Some(name.to_string()))
    }

    pub fn with_id(self, id: &str) -> Formal {
        self.rebuild(|n| n.id = Some(id.to_string()))
    }

    /// set the node's own default mode
    pub fn with_mode(self, mode: impl Into<Mode>) -> Formal {
        let mode = mode.into();
        self.rebuild(|n| n.mode = Some(mode))
    }

    pub fn ptr_eq(&self, other: &Formal) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn node(&self) -> &Node {
        &self.0
    }

    pub fn integer(value: i64) -> Formal {
        Formal::from_kind(NodeKind::Integer(IntegerData {
            value: Some(value),
            pos: Some(value > 0),
            odd: Some(value.rem_euclid(2) == 1),
            prime: Some(is_prime(value)),
        }))
    }

    /// An integer known only by its properties.
    pub fn symbolic_integer(pos: Option<bool>, odd: Option<bool>, prime: Option<bool>) -> Formal {
        Formal::from_kind(NodeKind::Integer(IntegerData {
            value: None,
            pos,
            odd,
            prime,
        }))
    }

    /// A variable renders whatever is substituted for it; by default, its name.
    pub fn variable(name: &str) -> Formal {
        Formal::from_kind(NodeKind::Variable)
            .named(name)
            .with_mode(Mode::subst(Value::Text(name.to_string())))
    }

    pub fn string(text: &str) -> Formal {
        Formal::from_kind(NodeKind::Str {
            text: text.to_string(),
            math: true,
        })
    }

    /// a string literal that is prose, not math
    pub fn plain_string(text: &str) -> Formal {
        Formal::from_kind(NodeKind::Str {
            text: text.to_string(),
            math: false,
        })
    }

    pub fn lookup(args: Vec<Formal>, table: LookupTable) -> Formal {
        Formal::from_kind(NodeKind::Lookup { args, table })
    }

    pub fn subscript(self, sub: impl Into<Formal>) -> Formal {
        Formal::from_kind(NodeKind::Subscripted {
            base: self,
            sub: sub.into(),
        })
    }

    pub fn superscript(self, sup: impl Into<Formal>) -> Formal {
        Formal::from_kind(NodeKind::Superscripted {
            base: self,
            sup: sup.into(),
        })
    }

    pub fn pow(self, power: impl Into<Formal>) -> Formal {
        Formal::from_kind(NodeKind::Power {
            base: self,
            power: power.into(),
        })
    }

    pub fn set(elements: Vec<Formal>, condition: Option<Formal>) -> Formal {
        Formal::from_kind(NodeKind::Set {
            elements,
            condition,
        })
    }

    pub fn mapping(data: MappingData) -> Formal {
        Formal::from_kind(NodeKind::Mapping(data))
    }

    pub fn ellipsis() -> Formal {
        Formal::from_kind(NodeKind::Ellipsis)
    }

    pub fn infinity(sign: i8) -> Formal {
        Formal::from_kind(NodeKind::Infinity { sign })
    }

    pub fn summand(term: Formal, sign: i8) -> Formal {
        Formal::from_kind(NodeKind::Summand(Summand::new(term, sign)))
    }

    /// Terms that are already summands keep their sign.
    pub fn sum(terms: Vec<Formal>) -> Formal {
        Formal::from_kind(NodeKind::Sum(terms.into_iter().map(as_summand).collect()))
    }

    pub fn sum_of_summands(summands: Vec<Summand>) -> Formal {
        Formal::from_kind(NodeKind::Sum(summands))
    }

    pub fn product(factors: Vec<Formal>) -> Formal {
        Formal::from_kind(NodeKind::Product(factors))
    }

    pub fn quotient(top: impl Into<Formal>, bot: impl Into<Formal>) -> Formal {
        Formal::from_kind(NodeKind::Quotient {
            top: top.into(),
            bot: bot.into(),
        })
    }
}

/// the general-purpose ellipsis
pub fn ooo() -> Formal {
    Formal::ellipsis()
}

/// A node viewed as a summand: summands are taken apart, anything else gets sign +1.
pub fn as_summand(f: Formal) -> Summand {
    match f.kind() {
        NodeKind::Summand(s) => s.clone(),
        _ => Summand::new(f, 1),
    }
}

impl From<&Formal> for Formal {
    fn from(f: &Formal) -> Self {
        f.clone()
    }
}

impl From<i64> for Formal {
    fn from(i: i64) -> Self {
        Formal::integer(i)
    }
}

impl From<i32> for Formal {
    fn from(i: i32) -> Self {
        Formal::integer(i as i64)
    }
}

impl From<&str> for Formal {
    fn from(s: &str) -> Self {
        Formal::string(s)
    }
}

impl From<Rational64> for Formal {
    fn from(r: Rational64) -> Self {
        Formal::quotient(*r.numer(), *r.denom())
    }
}

////////////////////////////////////////////////////////////////////////////////
//                              OPERATORS
////////////////////////////////////////////////////////////////////////////////
// Operators nest: a + b + c is Sum[Sum[a, b], c]. Flattening is explicit.

impl Neg for Formal {
    type Output = Formal;

    fn neg(self) -> Formal {
        Formal::from_kind(NodeKind::Summand(as_summand(self).negated()))
    }
}

impl<T: Into<Formal>> Add<T> for Formal {
    type Output = Formal;

    fn add(self, other: T) -> Formal {
        Formal::sum_of_summands(vec![as_summand(self), as_summand(other.into())])
    }
}

impl<T: Into<Formal>> Sub<T> for Formal {
    type Output = Formal;

    fn sub(self, other: T) -> Formal {
        Formal::sum_of_summands(vec![as_summand(self), as_summand(other.into()).negated()])
    }
}

impl<T: Into<Formal>> Mul<T> for Formal {
    type Output = Formal;

    fn mul(self, other: T) -> Formal {
        Formal::product(vec![self, other.into()])
    }
}

impl<T: Into<Formal>> Div<T> for Formal {
    type Output = Formal;

    fn div(self, other: T) -> Formal {
        Formal::quotient(self, other.into())
    }
}

macro_rules! int_lhs_ops {
    ($($t:ty),*) => {$(
        impl Add<Formal> for $t {
            type Output = Formal;
            fn add(self, other: Formal) -> Formal {
                Formal::from(self) + other
            }
        }

        impl Sub<Formal> for $t {
            type Output = Formal;
            fn sub(self, other: Formal) -> Formal {
                Formal::from(self) - other
            }
        }

        impl Mul<Formal> for $t {
            type Output = Formal;
            fn mul(self, other: Formal) -> Formal {
                Formal::from(self) * other
            }
        }

        impl Div<Formal> for $t {
            type Output = Formal;
            fn div(self, other: Formal) -> Formal {
                Formal::from(self) / other
            }
        }
    )*};
}

int_lhs_ops!(i32, i64);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_identity_defaults_to_name() {
        let x = Formal::variable("x");
        assert_eq!(x.id(), Some("x"));
        let zeta = Formal::variable("\\zeta").with_id("zeta");
        assert_eq!(zeta.name(), Some("\\zeta"));
        assert_eq!(zeta.id(), Some("zeta"));
        assert_eq!(Formal::ellipsis().id(), None);
    }

    #[test]
    fn test_builder_on_shared_handle_copies() {
        let a = Formal::integer(3);
        let alias = a.clone();
        let named = a.named("a");
        assert_eq!(named.name(), Some("a"));
        assert_eq!(alias.name(), None);
        assert_ne!(named.uid(), alias.uid());
    }

    #[test]
    fn test_type_tags() {
        assert_eq!(Formal::string("a").node_type().to_string(), "String");
        assert_eq!(NodeType::from_str("String").unwrap(), NodeType::Str);
        assert_eq!(Formal::integer(2).node_type().to_string(), "Integer");
        // type selectors match on these names
        for t in NodeType::iter() {
            assert_eq!(NodeType::from_str(&t.to_string()).unwrap(), t);
        }
    }

    #[test]
    fn test_integer_flags() {
        let n = Formal::integer(-3);
        match n.kind() {
            NodeKind::Integer(d) => {
                assert_eq!(d.pos, Some(false));
                assert_eq!(d.odd, Some(true));
                assert_eq!(d.prime, Some(false));
            }
            _ => panic!("not an integer"),
        }
    }

    #[test]
    fn test_operators_nest() {
        let a = Formal::variable("a");
        let b = Formal::variable("b");
        let c = Formal::variable("c");
        let s = a.clone() + b.clone() - c.clone();
        match s.kind() {
            NodeKind::Sum(terms) => {
                assert_eq!(terms.len(), 2);
                assert_eq!(terms[0].term.node_type(), NodeType::Sum);
                assert_eq!(terms[1].sign, -1);
                assert!(terms[1].term.ptr_eq(&c));
            }
            _ => panic!("not a sum"),
        }
        let neg = -(-a.clone());
        match neg.kind() {
            NodeKind::Summand(s) => assert_eq!(s.sign, 1),
            _ => panic!("not a summand"),
        }
        let d = 1i64 - a.pow(2);
        match d.kind() {
            NodeKind::Sum(terms) => {
                assert_eq!(terms[0].term.node_type(), NodeType::Integer);
                assert_eq!(terms[1].term.node_type(), NodeType::Power);
            }
            _ => panic!("not a sum"),
        }
    }

    #[test]
    fn test_value_arithmetic() {
        let half = Value::Int(1).checked_div(&Value::Int(2)).unwrap();
        assert_eq!(half.to_string(), "1/2");
        assert_eq!(half.checked_add(&half).unwrap(), Value::Int(1));
        assert_eq!(Value::Int(2).checked_pow(&Value::Int(-2)).unwrap().to_string(), "1/4");
        assert!(Value::Int(1).checked_div(&Value::Int(0)).is_none());
        assert!(Value::Int(0).checked_pow(&Value::Int(-1)).is_none());
        assert!(Value::Text("x".into()).checked_add(&Value::Int(1)).is_none());
    }

    #[test]
    fn test_residue_arithmetic() {
        let g = Value::residue(3, 7);
        assert_eq!(g.checked_pow(&Value::Int(2)).unwrap().to_string(), "2");
        assert_eq!(g.checked_pow(&Value::Int(6)).unwrap().to_string(), "1");
        // 3 * 5 = 15 = 1 mod 7
        assert_eq!(g.checked_pow(&Value::Int(-1)).unwrap().to_string(), "5");
        assert_eq!(g.checked_add(&Value::Int(5)).unwrap().to_string(), "1");
        assert_eq!(Value::residue(-1, 7).to_string(), "6");
    }

    #[test]
    fn test_range_macro() {
        let n = Formal::integer(7).named("n");
        let r = range![0, 1, ooo(), n - 2];
        assert_eq!(r.len(), 4);
        assert!(r[2].is_ellipsis());
        assert!(!r[0].is_ellipsis());
        assert_eq!(r[1].to_string(), "1");
    }
}
