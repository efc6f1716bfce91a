//! Infix relations and relation chains.
//!
//! `a.leq(b)` builds a relation; relating a relation again, as in
//! `a.lt(b).leq(c)`, turns it into a chain `a < b \leq c`. Every relation has
//! a valence: `false` negates it (`\not\in`, "is not an element of").
use crate::formal::errors::{FormalError, FormalResult};
use crate::formal::node::{Formal, Node, NodeKind, NodeType};
use crate::formal::path::ExpressionPath;
use crate::formal::render::Renderer;
use crate::formal::rules::RuleTable;
use crate::formal::style::{Form, Mode, Modifier};
use crate::formal::text::Tex;
use crate::style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Membership,
    Leq,
    Lt,
}

impl RelationKind {
    pub fn node_type(self) -> NodeType {
        match self {
            RelationKind::Membership => NodeType::SetMembershipRelation,
            RelationKind::Leq => NodeType::LeqRelation,
            RelationKind::Lt => NodeType::LtRelation,
        }
    }

    pub fn symbol(self, valence: bool) -> &'static str {
        match (self, valence) {
            (RelationKind::Membership, true) => "\\in",
            (RelationKind::Membership, false) => "\\not\\in",
            (RelationKind::Leq, true) => "\\leq",
            (RelationKind::Leq, false) => "\\not\\leq",
            (RelationKind::Lt, true) => "<",
            (RelationKind::Lt, false) => "\\nless",
        }
    }

    pub fn phrase(self, valence: bool) -> &'static str {
        match (self, valence) {
            (RelationKind::Membership, true) => "is an element of",
            (RelationKind::Membership, false) => "is not an element of",
            (RelationKind::Leq, true) => "is less than or equal to",
            (RelationKind::Leq, false) => "is not less than or equal to",
            (RelationKind::Lt, true) => "is less than",
            (RelationKind::Lt, false) => "is not less than",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelationData {
    pub kind: RelationKind,
    pub left: Formal,
    pub right: Formal,
    pub valence: bool,
}

/// One relation of a chain together with the term to its right.
#[derive(Debug, Clone)]
pub struct ChainLink {
    pub kind: RelationKind,
    pub valence: bool,
    pub right: Formal,
}

#[derive(Debug, Clone)]
pub struct RelnChainData {
    pub first: Formal,
    pub links: Vec<ChainLink>,
}

impl Formal {
    pub fn relation(kind: RelationKind, left: Formal, right: Formal, valence: bool) -> Formal {
        Formal::from_kind(NodeKind::Relation(RelationData {
            kind,
            left,
            right,
            valence,
        }))
    }

    pub fn reln_chain(first: Formal, links: Vec<ChainLink>) -> Formal {
        Formal::from_kind(NodeKind::RelnChain(RelnChainData { first, links }))
    }

    /// Relate `self` to `right`. A relation on the left becomes a chain, and a
    /// chain on the left grows by one link.
    pub fn relate(self, kind: RelationKind, valence: bool, right: impl Into<Formal>) -> Formal {
        let link = ChainLink {
            kind,
            valence,
            right: right.into(),
        };
        match self.kind() {
            NodeKind::Relation(r) => Formal::reln_chain(
                r.left.clone(),
                vec![
                    ChainLink {
                        kind: r.kind,
                        valence: r.valence,
                        right: r.right.clone(),
                    },
                    link,
                ],
            ),
            NodeKind::RelnChain(c) => {
                let mut links = c.links.clone();
                links.push(link);
                Formal::reln_chain(c.first.clone(), links)
            }
            _ => Formal::relation(kind, self, link.right, valence),
        }
    }

    pub fn is_in(self, set: impl Into<Formal>) -> Formal {
        self.relate(RelationKind::Membership, true, set)
    }

    pub fn not_in(self, set: impl Into<Formal>) -> Formal {
        self.relate(RelationKind::Membership, false, set)
    }

    /// membership in the set of the listed elements
    pub fn is_in_list(self, elements: Vec<Formal>) -> Formal {
        self.is_in(Formal::set(elements, None))
    }

    pub fn leq(self, other: impl Into<Formal>) -> Formal {
        self.relate(RelationKind::Leq, true, other)
    }

    pub fn lt(self, other: impl Into<Formal>) -> Formal {
        self.relate(RelationKind::Lt, true, other)
    }
}

impl Renderer {
    /// options: `form` (default symbolic), `omit-left`
    pub(crate) fn format_relation<'a>(
        &mut self,
        node: &'a Node,
        data: &'a RelationData,
        mode: &Mode,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
    ) -> FormalResult<Tex> {
        let opts = mode.options();
        let form = opts.form_or(Form::Symbolic)?;
        match form {
            Form::Name => return Ok(Tex::math(node.require_name()?)),
            Form::Value => {
                return Err(FormalError::UnsupportedOperation(format!(
                    "the value of a {}",
                    node.node_type()
                )));
            }
            Form::Symbolic | Form::Verbal => {}
        }
        let left = if opts.get_bool("omit-left", false)? {
            Tex::plain("")
        } else {
            self.fwd(node, &data.left, "left", rules, path, None)?
        };
        let right = self.fwd(node, &data.right, "right", rules, path, None)?;
        Ok(if form == Form::Symbolic {
            left.then_math(&format!(" {} ", data.kind.symbol(data.valence)))
                .concat(right)
        } else {
            left.then_plain(&format!(" {} ", data.kind.phrase(data.valence)))
                .concat(right)
        })
    }

    /// Each link is rendered as a relation between neighbouring terms, with
    /// its left term omitted.
    pub(crate) fn format_reln_chain<'a>(
        &mut self,
        node: &'a Node,
        data: &'a RelnChainData,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
    ) -> FormalResult<Tex> {
        let mut s = self.fwd(node, &data.first, "left", rules, path, None)?;
        let omit_left = Modifier::Merge(style! {"omit-left" => true});
        let mut left = &data.first;
        for (i, link) in data.links.iter().enumerate() {
            let relation = Formal::relation(link.kind, left.clone(), link.right.clone(), link.valence);
            let rendered =
                self.fwd(node, &relation, &format!("reln{}", i), rules, path, Some(&omit_left))?;
            s = s.concat(rendered);
            left = &link.right;
        }
        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formal::render::render;

    fn plain(f: &Formal) -> String {
        render(f, None, None).unwrap().to_string()
    }

    #[test]
    fn test_symbols_and_valence() {
        let a = Formal::variable("a");
        let s = Formal::string("S");
        assert_eq!(plain(&a.clone().is_in(s.clone())), "a \\in S");
        assert_eq!(plain(&a.clone().not_in(s)), "a \\not\\in S");
        assert_eq!(plain(&a.clone().lt(3)), "a < 3");
        assert_eq!(
            plain(&a.relate(RelationKind::Lt, false, 3)),
            "a \\nless 3"
        );
    }

    #[test]
    fn test_verbal() {
        let a = Formal::variable("a");
        let r = a.leq(Formal::variable("b"));
        let verbal = Mode::Style(style! {"form" => "verbal"});
        assert_eq!(
            render(&r, Some(&verbal), None).unwrap().to_string(),
            "$a$ is less than or equal to $b$"
        );
    }

    #[test]
    fn test_value_is_unsupported() {
        let r = Formal::variable("a").lt(1);
        let value = Mode::Style(style! {"form" => "value"});
        assert!(matches!(
            render(&r, Some(&value), None),
            Err(FormalError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_membership_in_list() {
        let x = Formal::variable("x");
        let r = x.is_in_list(vec![Formal::integer(1), Formal::integer(2)]);
        assert_eq!(plain(&r), "x \\in \\left\\{ 1, 2 \\right\\}");
    }

    #[test]
    fn test_chain() {
        let a = Formal::variable("a");
        let b = Formal::variable("b");
        let c = Formal::variable("c");
        let d = Formal::variable("d");
        let chain = a.lt(b).leq(c).is_in(d);
        assert_eq!(chain.node_type(), NodeType::RelnChain);
        assert_eq!(plain(&chain), "a < b \\leq c \\in d");
    }

    #[test]
    fn test_chain_roles() {
        let r = Formal::variable("r");
        let p = Formal::integer(7).named("p");
        let chain = Formal::integer(1).leq(r).leq(p - 1);
        assert_eq!(plain(&chain), "1 \\leq r \\leq p - 1");
        let rules = RuleTable::new().rule("@reln1-right", style! {"form" => "value"});
        assert_eq!(render(&chain, None, Some(&rules)).unwrap(), "1 \\leq r \\leq 6");
    }
}
