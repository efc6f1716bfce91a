//! Ordered rule tables: selector chain -> mode, first match wins.
//!
//! A rule's value is either a literal [`Mode`] or a function of the indices
//! captured by the bracketed names in the chain's path selectors. Functions
//! declare the capture names they want, in order; a name that was not
//! captured arrives as `None`.
//!
//! Chains are parsed once, when the rule is added. A malformed chain is kept
//! and reported as [`FormalError::MalformedSelector`] when the table is next
//! consulted.
use crate::formal::errors::{FormalError, FormalResult};
use crate::formal::node::Node;
use crate::formal::path::ExpressionPath;
use crate::formal::selector::{Indices, SelectorChain};
use crate::formal::style::Mode;
use log::{debug, trace};
use std::fmt;
use std::rc::Rc;

pub type IndexFn = Rc<dyn Fn(&[Option<i64>]) -> FormalResult<Mode>>;

#[derive(Clone)]
pub enum RuleValue {
    Literal(Mode),
    Derived { params: Vec<String>, f: IndexFn },
}

impl RuleValue {
    fn evaluate(&self, indices: &Indices) -> FormalResult<Mode> {
        match self {
            RuleValue::Literal(mode) => Ok(mode.clone()),
            RuleValue::Derived { params, f } => {
                let args: Vec<Option<i64>> =
                    params.iter().map(|p| indices.get(p).copied()).collect();
                f(&args)
            }
        }
    }
}

impl fmt::Debug for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValue::Literal(mode) => write!(f, "{:?}", mode),
            RuleValue::Derived { params, .. } => write!(f, "Derived({:?})", params),
        }
    }
}

#[derive(Clone, Debug)]
struct Rule {
    chain: String,
    parsed: Option<SelectorChain>,
    value: RuleValue,
}

#[derive(Clone, Debug, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new() -> Self {
        RuleTable::default()
    }

    /// builder form of [`RuleTable::insert`]
    pub fn rule(mut self, chain: &str, mode: impl Into<Mode>) -> Self {
        self.insert(chain, mode);
        self
    }

    /// builder form of [`RuleTable::insert_derived`]
    pub fn derived(
        mut self,
        chain: &str,
        params: &[&str],
        f: impl Fn(&[Option<i64>]) -> Mode + 'static,
    ) -> Self {
        self.insert_derived(chain, params, Rc::new(move |args| Ok(f(args))));
        self
    }

    /// Add a literal rule. Re-inserting an existing chain replaces its value
    /// but keeps its position.
    pub fn insert(&mut self, chain: &str, mode: impl Into<Mode>) {
        self.put(chain, RuleValue::Literal(mode.into()));
    }

    pub fn insert_derived(&mut self, chain: &str, params: &[&str], f: IndexFn) {
        let params = params.iter().map(|p| p.to_string()).collect();
        self.put(chain, RuleValue::Derived { params, f });
    }

    fn put(&mut self, chain: &str, value: RuleValue) {
        if let Some(existing) = self.rules.iter_mut().find(|r| r.chain == chain) {
            existing.value = value;
            return;
        }
        let parsed = match SelectorChain::parse(chain) {
            Ok(p) => Some(p),
            Err(e) => {
                debug!("keeping unparsable rule for later: {}", e);
                None
            }
        };
        self.rules.push(Rule {
            chain: chain.to_string(),
            parsed,
            value,
        });
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn chains(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.chain.as_str())
    }

    pub fn get(&self, chain: &str) -> Option<&RuleValue> {
        self.rules.iter().find(|r| r.chain == chain).map(|r| &r.value)
    }

    /// A copy of this table with the rules of `other` added after its own.
    pub fn extended(&self, other: &RuleTable) -> RuleTable {
        let mut table = self.clone();
        for rule in &other.rules {
            table.put(&rule.chain, rule.value.clone());
        }
        table
    }

    /// Mode of the first rule matching `node` at `path`, if any.
    pub fn resolve<'a>(
        &self,
        node: &'a Node,
        path: &ExpressionPath<'a>,
    ) -> FormalResult<Option<Mode>> {
        for rule in &self.rules {
            let chain = rule
                .parsed
                .as_ref()
                .ok_or_else(|| FormalError::MalformedSelector(rule.chain.clone()))?;
            let mut indices = Indices::new();
            if chain.matches(node, path, &mut indices) {
                trace!("rule {} applies at {:?}", rule.chain, path);
                return rule.value.evaluate(&indices).map(Some);
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formal::node::Formal;
    use crate::style;

    #[test]
    fn test_first_match_wins() {
        let x = Formal::variable("x");
        let rules = RuleTable::new()
            .rule("Variable", style! {"form" => "first"})
            .rule("#x", style! {"form" => "second"});
        let mode = rules.resolve(&x, &ExpressionPath::new()).unwrap().unwrap();
        assert_eq!(mode.options().get_str("form").unwrap(), "first");
    }

    #[test]
    fn test_no_match() {
        let x = Formal::variable("x");
        let rules = RuleTable::new().rule("#y", 3);
        assert!(rules.resolve(&x, &ExpressionPath::new()).unwrap().is_none());
    }

    #[test]
    fn test_malformed_surfaces_at_resolution() {
        let x = Formal::variable("x");
        let rules = RuleTable::new().rule("  ", 3);
        assert_eq!(rules.len(), 1);
        assert!(matches!(
            rules.resolve(&x, &ExpressionPath::new()),
            Err(FormalError::MalformedSelector(_))
        ));
    }

    #[test]
    fn test_derived_gets_captures_in_declared_order() {
        let a = Formal::string("a");
        let i = Formal::variable("i");
        let sub = a.subscript(i.clone());
        let mut path = ExpressionPath::new();
        path.append(&sub, "term3");
        path.append(&sub, "factor8");
        let rules = RuleTable::new().derived("@term[i]-factor[j] #i", &["j", "k", "i"], |args| {
            let j = args[0].unwrap_or(-1);
            let k = args[1].unwrap_or(-1);
            let i = args[2].unwrap_or(-1);
            Mode::from(100 * j + 10 * k + i)
        });
        let mut child = path.clone();
        child.append(&sub, "sub");
        // "#i" matches the node, the path selector then matches strictly above
        let mode = rules.resolve(&i, &child).unwrap().unwrap();
        match mode {
            Mode::Subst { value, .. } => assert_eq!(value.to_string(), "793"),
            _ => panic!("expected a substitution"),
        }
        assert!(rules.resolve(&i, &path).unwrap().is_none());
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let rules = RuleTable::new()
            .rule("#a", 1)
            .rule("#b", 2)
            .rule("#a", 3);
        assert_eq!(rules.chains().collect::<Vec<_>>(), vec!["#a", "#b"]);
        let ext = rules.extended(&RuleTable::new().rule("#c", 4));
        assert_eq!(ext.chains().collect::<Vec<_>>(), vec!["#a", "#b", "#c"]);
        assert_eq!(rules.len(), 2);
    }
}
