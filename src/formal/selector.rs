//! Selector chains and the right-to-left matcher.
//!
//! A selector chain is a whitespace separated sequence of atomic selectors:
//!
//! * `#token` matches a node whose identity is `token`
//! * `Word` matches a node whose kind tag is `Word` (`Sum`, `Variable`, ...)
//! * `@pattern` matches the tail of the rolepath. Bracketed names in the
//!   pattern capture non-negative integers, so `term[i]-factor[j]` matches
//!   `term3-factor2` with `i = 3`, `j = 2`. A path selector that is not the
//!   last one in its chain is relative to the path of the node matched by
//!   the selector after it.
//!
//! The last selector must match the current node. Each earlier selector must
//! match a strict ancestor, found by climbing the path one role at a time.
use crate::formal::errors::{FormalError, FormalResult};
use crate::formal::node::Node;
use crate::formal::path::{ExpressionPath, PATH_DELIMITER};
use log::trace;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// captured bracket indices, by name
pub type Indices = HashMap<String, i64>;

/// a chain must be at least a space separated list of non-empty tokens
static WELL_FORMED_CHAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+(\s+\S+)*$").expect("valid chain pattern"));

static CAPTURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([a-zA-Z]\w*)\]").expect("valid capture pattern"));

/// A compiled `@pattern`.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
    segments: usize,
}

/// Result of a successful [`PathPattern`] match.
#[derive(Debug, Clone, PartialEq)]
pub struct PathMatch {
    pub indices: Indices,
    /// number of path segments the pattern spans
    pub num_segments: usize,
    /// length of the path prefix that precedes the matched span, plus the
    /// segment owning the first matched role
    pub prefix_len: usize,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> FormalResult<Self> {
        let mut body = String::new();
        let mut last = 0;
        for cap in CAPTURE.captures_iter(pattern) {
            let Some(whole) = cap.get(0) else {
                continue;
            };
            body.push_str(&regex::escape(&pattern[last..whole.start()]));
            body.push_str(&format!(r"(?P<{}>\d+)", &cap[1]));
            last = whole.end();
        }
        body.push_str(&regex::escape(&pattern[last..]));
        let full = format!(r"(?:^|{}){}$", PATH_DELIMITER, body);
        let regex = Regex::new(&full)
            .map_err(|_| FormalError::MalformedSelector(format!("@{}", pattern)))?;
        Ok(PathPattern {
            source: pattern.to_string(),
            regex,
            segments: pattern.split(PATH_DELIMITER).count(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn match_path(&self, path: &ExpressionPath<'_>) -> Option<PathMatch> {
        let rolepath = path.rolepath();
        let caps = self.regex.captures(&rolepath)?;
        let mut indices = Indices::new();
        for name in self.regex.capture_names().flatten() {
            if let Some(m) = caps.name(name) {
                if let Ok(v) = m.as_str().parse::<i64>() {
                    indices.insert(name.to_string(), v);
                }
            }
        }
        let n = self.segments;
        let prefix_len = if n == 1 {
            path.len()
        } else {
            path.len().saturating_sub(n - 1)
        };
        Some(PathMatch {
            indices,
            num_segments: n,
            prefix_len,
        })
    }
}

#[derive(Debug, Clone)]
pub enum Selector {
    Id(String),
    Type(String),
    Path(PathPattern),
}

impl Selector {
    pub fn parse(token: &str) -> FormalResult<Self> {
        if let Some(id) = token.strip_prefix('#') {
            Ok(Selector::Id(id.to_string()))
        } else if let Some(pattern) = token.strip_prefix('@') {
            Ok(Selector::Path(PathPattern::parse(pattern)?))
        } else {
            Ok(Selector::Type(token.to_string()))
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectorChain {
    selectors: Vec<Selector>,
}

impl SelectorChain {
    pub fn parse(chain: &str) -> FormalResult<Self> {
        if !WELL_FORMED_CHAIN.is_match(chain) {
            return Err(FormalError::MalformedSelector(chain.to_string()));
        }
        let selectors = chain
            .split_whitespace()
            .map(Selector::parse)
            .collect::<FormalResult<Vec<_>>>()?;
        Ok(SelectorChain { selectors })
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Match the chain against `node` reached by `path`, collecting bracket
    /// captures into `indices`.
    pub fn matches<'a>(
        &self,
        node: &'a Node,
        path: &ExpressionPath<'a>,
        indices: &mut Indices,
    ) -> bool {
        let mut remaining: &[Selector] = &self.selectors;
        let mut node = node;
        let mut path = path.clone();
        let mut defer_on_fail = false;
        loop {
            let Some((sel, rest)) = remaining.split_last() else {
                return false;
            };
            // climbing past a type or id selector may retry it higher up;
            // a matched path selector pins the chain to its span
            let mut defer = true;
            let mut next_path = None;
            let matched = match sel {
                Selector::Id(token) => node.id() == Some(token.as_str()),
                Selector::Type(word) => node.node_type().to_string() == *word,
                Selector::Path(pattern) => match pattern.match_path(&path) {
                    Some(pm) => {
                        indices.extend(pm.indices);
                        next_path = Some(path.prefix(pm.prefix_len));
                        defer = false;
                        true
                    }
                    None => false,
                },
            };
            if matched {
                remaining = rest;
            }
            let mut next_path = next_path.unwrap_or(path);
            if (matched && !remaining.is_empty()) || (defer_on_fail && !matched) {
                match next_path.pop() {
                    Some((ancestor, _role)) => {
                        node = ancestor;
                        path = next_path;
                        defer_on_fail = defer;
                    }
                    None => return false,
                }
            } else {
                return matched;
            }
        }
    }
}

/// Parse `chain` and match it in one go.
pub fn match_chain<'a>(
    chain: &str,
    node: &'a Node,
    path: &ExpressionPath<'a>,
) -> FormalResult<Option<Indices>> {
    let parsed = SelectorChain::parse(chain)?;
    let mut indices = Indices::new();
    if parsed.matches(node, path, &mut indices) {
        trace!("selector {} matched at {:?}", chain, path);
        Ok(Some(indices))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formal::node::Formal;

    fn path_of<'a>(node: &'a Node, rolepath: &str) -> ExpressionPath<'a> {
        let mut path = ExpressionPath::new();
        for role in rolepath.split('-').filter(|r| !r.is_empty()) {
            path.append(node, role);
        }
        path
    }

    #[test]
    fn test_bracket_capture() {
        let x = Formal::variable("x");
        let pattern = PathPattern::parse("cat-foo[i]bar[j]").unwrap();
        let path = path_of(&x, "baz3-cat-foo17bar81");
        let m = pattern.match_path(&path).unwrap();
        assert_eq!(m.indices["i"], 17);
        assert_eq!(m.indices["j"], 81);
        assert_eq!(m.num_segments, 2);
        assert_eq!(m.prefix_len, 2);

        let m = pattern.match_path(&path_of(&x, "cat-foo0bar1")).unwrap();
        assert_eq!(m.indices["i"], 0);
        assert!(pattern.match_path(&path_of(&x, "foo2bar3")).is_none());
        assert!(pattern.match_path(&path_of(&x, "cat-foo5bar")).is_none());
    }

    #[test]
    fn test_anchor_at_delimiter() {
        let x = Formal::variable("x");
        let pattern = PathPattern::parse("term1").unwrap();
        assert!(pattern.match_path(&path_of(&x, "term1")).is_some());
        assert!(pattern.match_path(&path_of(&x, "sum-term1")).is_some());
        assert!(pattern.match_path(&path_of(&x, "term11")).is_none());
        assert!(pattern.match_path(&path_of(&x, "subterm1")).is_none());
        // non-empty patterns never match the root
        assert!(pattern.match_path(&ExpressionPath::new()).is_none());
    }

    #[test]
    fn test_literal_parts_are_escaped() {
        let x = Formal::variable("x");
        let pattern = PathPattern::parse("a.b").unwrap();
        assert!(pattern.match_path(&path_of(&x, "a.b")).is_some());
        assert!(pattern.match_path(&path_of(&x, "axb")).is_none());
    }

    #[test]
    fn test_empty_pattern_matches_root_only() {
        let x = Formal::variable("x");
        let pattern = PathPattern::parse("").unwrap();
        assert!(pattern.match_path(&ExpressionPath::new()).is_some());
        assert!(pattern.match_path(&path_of(&x, "term0")).is_none());
    }

    #[test]
    fn test_malformed_chains() {
        assert!(matches!(
            SelectorChain::parse(""),
            Err(FormalError::MalformedSelector(_))
        ));
        assert!(matches!(
            SelectorChain::parse(" #x"),
            Err(FormalError::MalformedSelector(_))
        ));
        assert!(matches!(
            SelectorChain::parse("#x "),
            Err(FormalError::MalformedSelector(_))
        ));
        // a capture name used twice cannot compile
        assert!(matches!(
            SelectorChain::parse("@term[i]-factor[i]"),
            Err(FormalError::MalformedSelector(_))
        ));
        assert_eq!(SelectorChain::parse("Variable   @subst").unwrap().len(), 2);
    }

    #[test]
    fn test_single_selectors() {
        let x = Formal::variable("x");
        let zeta = Formal::variable("\\zeta").with_id("zeta");
        let root = ExpressionPath::new();
        assert!(match_chain("#x", &x, &root).unwrap().is_some());
        assert!(match_chain("#zeta", &zeta, &root).unwrap().is_some());
        assert!(match_chain("#\\zeta", &zeta, &root).unwrap().is_none());
        assert!(match_chain("Variable", &x, &root).unwrap().is_some());
        assert!(match_chain("Sum", &x, &root).unwrap().is_none());
        assert!(match_chain("NoSuchKind", &x, &root).unwrap().is_none());
    }

    #[test]
    fn test_deferral_climbs_to_ancestor() {
        // a_{i} rendered as term4 of a sum: the chain "@term4 Variable" must
        // find the term4 role above the subscript
        let a = Formal::string("a");
        let i = Formal::variable("i");
        let sub = a.subscript(i.clone());
        let sum = Formal::sum(vec![sub.clone()]);
        let mut path = ExpressionPath::new();
        path.append(&sum, "term4");
        path.append(&sub, "sub");

        let hit = match_chain("@term4 Variable", &i, &path).unwrap();
        assert!(hit.is_some());
        let hit = match_chain("@term[k] #i", &i, &path).unwrap().unwrap();
        assert_eq!(hit["k"], 4);
        // the ancestor selector has to be a strict ancestor
        assert!(match_chain("Variable #i", &i, &path).unwrap().is_none());
        assert!(match_chain("Sum #i", &i, &path).unwrap().is_some());
        assert!(match_chain("Subscripted #i", &i, &path).unwrap().is_some());
        // one selector alone never defers
        assert!(match_chain("@term4", &i, &path).unwrap().is_none());
    }

    #[test]
    fn test_path_selector_pins_the_span() {
        let a = Formal::string("a");
        let i = Formal::variable("i");
        let sub = a.subscript(i.clone());
        let sum = Formal::sum(vec![sub.clone()]);
        let mut path = ExpressionPath::new();
        path.append(&sum, "term4");
        path.append(&sub, "sub");
        // "@sub" matched at the subscript; the next selector must then match
        // the node owning that role exactly, no further climbing
        assert!(match_chain("Subscripted @sub", &i, &path).unwrap().is_some());
        assert!(match_chain("Sum @sub", &i, &path).unwrap().is_none());
        assert!(match_chain("Sum @term4-sub", &i, &path).unwrap().is_some());
    }
}
