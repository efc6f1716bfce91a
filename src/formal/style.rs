//! Styles, modes and the precedence protocol that picks one per render call.
//!
//! A [`Style`] is a key/option mapping; each node kind documents the keys it
//! understands. A [`Mode`] is what a render call actually receives: either a
//! style, or, for variables, a substitution payload plus extra style options
//! for the substituted object.
use crate::formal::errors::{FormalError, FormalResult};
use crate::formal::node::{Formal, Node, Operand, Value};
use crate::formal::path::ExpressionPath;
use crate::formal::rules::RuleTable;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Bool(b) => write!(f, "{}", b),
            StyleValue::Int(i) => write!(f, "{}", i),
            StyleValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for StyleValue {
    fn from(b: bool) -> Self {
        StyleValue::Bool(b)
    }
}

impl From<i64> for StyleValue {
    fn from(i: i64) -> Self {
        StyleValue::Int(i)
    }
}

impl From<i32> for StyleValue {
    fn from(i: i32) -> Self {
        StyleValue::Int(i as i64)
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Str(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::Str(s)
    }
}

/// The `form` option shared by most node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Form {
    Name,
    Value,
    Symbolic,
    Verbal,
}

/// key/option mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    options: BTreeMap<String, StyleValue>,
}

impl Style {
    pub fn new() -> Self {
        Style::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<StyleValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<StyleValue>) {
        self.options.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<StyleValue> {
        self.options.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.options.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StyleValue)> {
        self.options.iter()
    }

    /// this style overridden key by key by `other`
    pub fn merged(&self, other: &Style) -> Style {
        let mut options = self.options.clone();
        for (k, v) in &other.options {
            options.insert(k.clone(), v.clone());
        }
        Style { options }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> FormalResult<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(StyleValue::Bool(b)) => Ok(*b),
            Some(StyleValue::Int(i)) => Ok(*i != 0),
            Some(StyleValue::Str(s)) => s
                .parse::<bool>()
                .map_err(|_| FormalError::invalid_option(key, s)),
        }
    }

    /// integer option; strings are accepted when they parse as integers
    pub fn get_int(&self, key: &str, default: i64) -> FormalResult<i64> {
        match self.get(key) {
            None => Ok(default),
            Some(StyleValue::Int(i)) => Ok(*i),
            Some(StyleValue::Str(s)) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| FormalError::invalid_option(key, s)),
            Some(other) => Err(FormalError::invalid_option(key, other)),
        }
    }

    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.to_string())
    }

    /// An enumerated option, parsed with the enum's `FromStr`.
    pub fn get_enum<T: FromStr>(&self, key: &str, default: T) -> FormalResult<T> {
        match self.get(key) {
            None => Ok(default),
            Some(v) => {
                let s = v.to_string();
                s.parse::<T>()
                    .map_err(|_| FormalError::invalid_option(key, s))
            }
        }
    }

    pub fn form(&self) -> FormalResult<Option<Form>> {
        match self.get("form") {
            None => Ok(None),
            Some(_) => self.get_enum("form", Form::Symbolic).map(Some),
        }
    }

    pub fn form_or(&self, default: Form) -> FormalResult<Form> {
        self.get_enum("form", default)
    }
}

/// Build a [`Style`] from `key => value` pairs.
///
/// ```
/// use RustedFormal::style;
/// let s = style! {"form" => "value", "show-zeros" => true, "step" => 2};
/// assert_eq!(s.get_int("step", 0).unwrap(), 2);
/// ```
#[macro_export]
macro_rules! style {
    () => {
        $crate::formal::style::Style::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut s = $crate::formal::style::Style::new();
        $( s.insert($key, $value); )+
        s
    }};
}

/// What a single render call is told to do.
#[derive(Debug, Clone)]
pub enum Mode {
    Style(Style),
    /// substitute `value` for a variable; `extra` styles the substituted object
    Subst { value: Operand, extra: Style },
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Style(Style::new())
    }
}

impl Mode {
    pub fn subst(value: impl Into<Operand>) -> Mode {
        Mode::Subst {
            value: value.into(),
            extra: Style::new(),
        }
    }

    pub fn subst_with(value: impl Into<Operand>, extra: Style) -> Mode {
        Mode::Subst {
            value: value.into(),
            extra,
        }
    }

    /// the style options in effect
    pub fn options(&self) -> &Style {
        match self {
            Mode::Style(s) => s,
            Mode::Subst { extra, .. } => extra,
        }
    }

    pub fn is_subst(&self) -> bool {
        matches!(self, Mode::Subst { .. })
    }

    /// Override options key by key. A substitution keeps its payload and
    /// merges into its extra options.
    pub fn merged(self, modifier: &Style) -> Mode {
        match self {
            Mode::Style(s) => Mode::Style(s.merged(modifier)),
            Mode::Subst { value, extra } => Mode::Subst {
                value,
                extra: extra.merged(modifier),
            },
        }
    }
}

impl From<Style> for Mode {
    fn from(s: Style) -> Self {
        Mode::Style(s)
    }
}

impl From<Operand> for Mode {
    fn from(o: Operand) -> Self {
        Mode::subst(o)
    }
}

impl From<Value> for Mode {
    fn from(v: Value) -> Self {
        Mode::subst(v)
    }
}

impl From<Formal> for Mode {
    fn from(f: Formal) -> Self {
        Mode::subst(f)
    }
}

impl From<&Formal> for Mode {
    fn from(f: &Formal) -> Self {
        Mode::subst(f.clone())
    }
}

impl From<i64> for Mode {
    fn from(i: i64) -> Self {
        Mode::subst(Value::Int(i))
    }
}

impl From<i32> for Mode {
    fn from(i: i32) -> Self {
        Mode::subst(Value::Int(i as i64))
    }
}

impl From<&str> for Mode {
    fn from(s: &str) -> Self {
        Mode::subst(Value::Text(s.to_string()))
    }
}

/// Applied on top of whatever mode was resolved.
#[derive(Clone)]
pub enum Modifier {
    Merge(Style),
    Transform(Rc<dyn Fn(Mode) -> Mode>),
}

impl Modifier {
    pub fn merge(style: Style) -> Self {
        Modifier::Merge(style)
    }

    pub fn transform(f: impl Fn(Mode) -> Mode + 'static) -> Self {
        Modifier::Transform(Rc::new(f))
    }

    pub fn apply(&self, mode: Mode) -> Mode {
        match self {
            Modifier::Merge(style) => mode.merged(style),
            Modifier::Transform(f) => f(mode),
        }
    }
}

impl From<Style> for Modifier {
    fn from(s: Style) -> Self {
        Modifier::Merge(s)
    }
}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Merge(s) => write!(f, "Merge({:?})", s),
            Modifier::Transform(_) => write!(f, "Transform(..)"),
        }
    }
}

/// Pick the mode for one render call of `node` at `path`.
///
/// An explicit mode wins; otherwise the first matching rule of the table;
/// otherwise the node's own default. The modifier, if any, is applied last.
pub fn decide_mode<'a>(
    node: &'a Node,
    explicit: Option<&Mode>,
    rules: Option<&RuleTable>,
    path: &ExpressionPath<'a>,
    modifier: Option<&Modifier>,
) -> FormalResult<Mode> {
    let resolved = match (explicit, rules) {
        (Some(mode), _) => Some(mode.clone()),
        (None, Some(table)) => table.resolve(node, path)?,
        (None, None) => None,
    };
    let mode = resolved.unwrap_or_else(|| node.default_mode());
    Ok(match modifier {
        Some(m) => m.apply(mode),
        None => mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style;

    #[test]
    fn test_style_getters() {
        let s = style! {"form" => "value", "show-zeros" => true, "step" => "3"};
        assert_eq!(s.form().unwrap(), Some(Form::Value));
        assert!(s.get_bool("show-zeros", false).unwrap());
        assert!(!s.get_bool("flip-ops", false).unwrap());
        assert_eq!(s.get_int("step", 0).unwrap(), 3);
        assert_eq!(s.get_str("form").unwrap(), "value");
    }

    #[test]
    fn test_bad_option_values() {
        let s = style! {"step" => "two", "form" => "loud"};
        assert!(matches!(
            s.get_int("step", 0),
            Err(FormalError::InvalidOption { .. })
        ));
        assert!(matches!(s.form(), Err(FormalError::InvalidOption { .. })));
    }

    #[test]
    fn test_merge_overrides_key_by_key() {
        let base = style! {"brackets" => "none", "show-zeros" => true};
        let merged = base.merged(&style! {"brackets" => "round"});
        assert_eq!(merged.get_str("brackets").unwrap(), "round");
        assert!(merged.get_bool("show-zeros", false).unwrap());
    }

    #[test]
    fn test_modifier_on_substitution() {
        let mode = Mode::subst(5);
        let mode = Modifier::merge(style! {"form" => "value"}).apply(mode);
        assert!(mode.is_subst());
        assert_eq!(mode.options().get_str("form").unwrap(), "value");
    }

    #[test]
    fn test_transform_modifier() {
        let m = Modifier::transform(|_| Mode::Style(style! {"style" => "c"}));
        let mode = m.apply(Mode::default());
        assert_eq!(mode.options().get_str("style").unwrap(), "c");
    }

    #[test]
    fn test_precedence() {
        let x = Formal::variable("x").with_mode(style! {"form" => "name"});
        let root = ExpressionPath::new();
        let rules = RuleTable::new().rule("#x", style! {"form" => "symbolic"});
        let explicit = Mode::Style(style! {"form" => "value"});

        let m = decide_mode(&x, Some(&explicit), Some(&rules), &root, None).unwrap();
        assert_eq!(m.options().get_str("form").unwrap(), "value");
        let m = decide_mode(&x, None, Some(&rules), &root, None).unwrap();
        assert_eq!(m.options().get_str("form").unwrap(), "symbolic");
        let m = decide_mode(&x, None, None, &root, None).unwrap();
        assert_eq!(m.options().get_str("form").unwrap(), "name");
        let empty = RuleTable::new();
        let m = decide_mode(&x, None, Some(&empty), &root, None).unwrap();
        assert_eq!(m.options().get_str("form").unwrap(), "name");
    }
}
