#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
//! Formal expressions and their rule-governed LaTeX rendering.
//!
/// # Formal expressions
/// build a tree of formal nodes and render it, styling each subnode by
/// position, type or identity through an ordered rule table
///# Example
/// ```
/// use RustedFormal::formal::node::Formal;
/// use RustedFormal::formal::rules::RuleTable;
/// use RustedFormal::formal::render::render;
/// use RustedFormal::style;
///
/// let a = Formal::integer(1).named("a");
/// let b = Formal::integer(2).named("b");
/// let s = Formal::sum(vec![a, b]);
/// assert_eq!(render(&s, None, None).unwrap(), "a + b");
///
/// let rules = RuleTable::new().rule("#b", style! {"form" => "value"});
/// assert_eq!(render(&s, None, Some(&rules)).unwrap(), "a + 2");
/// ```
/// ________________________________________________________________________________________________
/// math-mode and plain text with explicit concatenation rules
pub mod text;
/// the sequence of (ancestor, role) pairs leading to the node being rendered
pub mod path;
/// selector chains: `#id`, `Type`, `@role-path[i]` and the right-to-left matcher
pub mod selector;
/// ordered rule tables, literal and index-derived rules
pub mod rules;
/// style options, substitution modes, modifiers and the precedence protocol
pub mod style;
/// error kinds raised while rendering
pub mod errors;
/// node kinds, values, constructors and operators
pub mod node;
/// render dispatch and the leaf node kinds
pub mod render;
/// sums, products, quotients and powers
pub mod arith;
/// flatten, permute, split for sums and products
pub mod multiop;
/// spelled-out vs bound-variable rendering of indexed families
pub mod range;
/// infix relations and relation chains
pub mod relations;
/// groups, rings, fields, roots of unity, cyclotomic fields, Galois groups
pub mod algebra;
/// residues modulo a prime
pub mod elnt;
/// translation of an external symbolic tree into formal nodes
pub mod adapt;
