//! Expression paths.
//!
//! In an expression tree the nodes are the vertices and the *roles* are the
//! edges: a role names the part a child plays relative to its parent
//! (`base` and `power` inside a power, `term3` inside a sum, ...). An
//! [`ExpressionPath`] lists the (ancestor, role) pairs leading from the root
//! down to the node currently being rendered; the empty path is the root.
use crate::formal::node::Node;
use std::fmt;
use std::ops::Range;

/// Joins roles in a rolepath. Roles must never contain it.
pub const PATH_DELIMITER: char = '-';

#[derive(Clone, Default)]
pub struct ExpressionPath<'a> {
    segments: Vec<(&'a Node, String)>,
}

impl<'a> ExpressionPath<'a> {
    pub fn new() -> Self {
        ExpressionPath {
            segments: Vec::new(),
        }
    }

    pub fn append(&mut self, ancestor: &'a Node, role: impl Into<String>) {
        self.segments.push((ancestor, role.into()));
    }

    /// A new path one segment longer than this one.
    pub fn extended(&self, ancestor: &'a Node, role: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.append(ancestor, role);
        path
    }

    pub fn pop(&mut self) -> Option<(&'a Node, String)> {
        self.segments.pop()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<(&'a Node, &str)> {
        self.segments
            .get(index)
            .map(|(node, role)| (*node, role.as_str()))
    }

    /// all role labels joined with [`PATH_DELIMITER`]
    pub fn rolepath(&self) -> String {
        let mut s = String::new();
        for (i, (_, role)) in self.segments.iter().enumerate() {
            if i > 0 {
                s.push(PATH_DELIMITER);
            }
            s.push_str(role);
        }
        s
    }

    pub fn slice(&self, range: Range<usize>) -> Self {
        ExpressionPath {
            segments: self.segments[range].to_vec(),
        }
    }

    /// the first `len` segments
    pub fn prefix(&self, len: usize) -> Self {
        self.slice(0..len.min(self.len()))
    }

    pub fn concat(&self, other: &ExpressionPath<'a>) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        ExpressionPath { segments }
    }
}

impl fmt::Debug for ExpressionPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (node, role) in &self.segments {
            write!(f, "({})-{}-", node.node_type(), role)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formal::node::Formal;

    #[test]
    fn test_rolepath_and_pop() {
        let x = Formal::variable("x");
        let mut path = ExpressionPath::new();
        assert_eq!(path.rolepath(), "");
        path.append(&x, "term3");
        path.append(&x, "base");
        assert_eq!(path.rolepath(), "term3-base");
        let (_, role) = path.pop().unwrap();
        assert_eq!(role, "base");
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_slice_and_concat() {
        let x = Formal::variable("x");
        let mut path = ExpressionPath::new();
        for role in ["baz3", "cat", "foo17bar81"] {
            path.append(&x, role);
        }
        assert_eq!(path.slice(1..3).rolepath(), "cat-foo17bar81");
        assert_eq!(path.prefix(1).rolepath(), "baz3");
        let joined = path.prefix(1).concat(&path.slice(2..3));
        assert_eq!(joined.rolepath(), "baz3-foo17bar81");
        assert!(ExpressionPath::new().is_empty());
    }
}
