//! Restructuring sums and products: flattening, permuting, splitting.
//!
//! Nodes are immutable, so every operation returns a new node; `flatten`
//! and `permute` just replace the handle they are called on.
use crate::formal::errors::{FormalError, FormalResult};
use crate::formal::node::{Formal, NodeKind, Summand};

/// Which kind of multi-operand node to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiKind {
    Sum,
    Product,
}

fn flat_summands(terms: &[Summand]) -> Vec<Summand> {
    let mut flat = Vec::with_capacity(terms.len());
    for summand in terms {
        match summand.term.kind() {
            NodeKind::Sum(inner) => {
                let inner = flat_summands(inner);
                if summand.sign == -1 {
                    flat.extend(inner.into_iter().map(Summand::negated));
                } else {
                    flat.extend(inner);
                }
            }
            _ => flat.push(summand.clone()),
        }
    }
    flat
}

fn flat_factors(factors: &[Formal]) -> Vec<Formal> {
    let mut flat = Vec::with_capacity(factors.len());
    for factor in factors {
        match factor.kind() {
            NodeKind::Product(inner) => flat.extend(flat_factors(inner)),
            _ => flat.push(factor.clone()),
        }
    }
    flat
}

fn pick<T: Clone>(items: &[T], indices: &[usize]) -> FormalResult<Vec<T>> {
    indices
        .iter()
        .map(|&i| {
            items.get(i).cloned().ok_or_else(|| FormalError::IndexOutOfRange {
                index: i as i64,
                lookup: format!("{} operands", items.len()),
            })
        })
        .collect()
}

impl Formal {
    pub fn multi_kind(&self) -> Option<MultiKind> {
        match self.kind() {
            NodeKind::Sum(_) => Some(MultiKind::Sum),
            NodeKind::Product(_) => Some(MultiKind::Product),
            _ => None,
        }
    }

    /// Nested sums (products) spliced into one level. Signs of nested
    /// sums carry over to their terms. Other kinds come back unchanged.
    pub fn flattened(&self) -> Formal {
        match self.kind() {
            NodeKind::Sum(terms) => Formal::sum_of_summands(flat_summands(terms)),
            NodeKind::Product(factors) => Formal::product(flat_factors(factors)),
            _ => self.clone(),
        }
    }

    pub fn flatten(&mut self) {
        *self = self.flattened();
    }

    /// Reorder the operands: operand `i` of the result is operand `perm[i]`
    /// of this node.
    pub fn permuted(&self, perm: &[usize]) -> FormalResult<Formal> {
        match self.kind() {
            NodeKind::Sum(terms) => Ok(Formal::sum_of_summands(pick(terms, perm)?)),
            NodeKind::Product(factors) => Ok(Formal::product(pick(factors, perm)?)),
            _ => Err(FormalError::UnsupportedOperation(format!(
                "permuting a {}",
                self.node_type()
            ))),
        }
    }

    pub fn permute(&mut self, perm: &[usize]) -> FormalResult<()> {
        *self = self.permuted(perm)?;
        Ok(())
    }

    /// Group the operands: each part lists the operands of one inner node,
    /// in order. The inner nodes are of this node's kind; the outer one is
    /// `outer`, or this node's kind again.
    ///
    /// `(a b c d).split([[0, 3], [2, 1]], None)` renders `(a d)(c b)`
    /// with `mult-symb: paren`.
    pub fn split(&self, parts: &[Vec<usize>], outer: Option<MultiKind>) -> FormalResult<Formal> {
        let inner = match self.kind() {
            NodeKind::Sum(terms) => parts
                .iter()
                .map(|part| pick(terms, part).map(Formal::sum_of_summands))
                .collect::<FormalResult<Vec<_>>>()?,
            NodeKind::Product(factors) => parts
                .iter()
                .map(|part| pick(factors, part).map(Formal::product))
                .collect::<FormalResult<Vec<_>>>()?,
            _ => {
                return Err(FormalError::UnsupportedOperation(format!(
                    "splitting a {}",
                    self.node_type()
                )));
            }
        };
        let outer = outer.or(self.multi_kind());
        Ok(match outer {
            Some(MultiKind::Sum) => Formal::sum(inner),
            _ => Formal::product(inner),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formal::render::render;
    use crate::formal::style::Mode;
    use crate::style;

    fn vars() -> (Formal, Formal, Formal, Formal) {
        (
            Formal::variable("a"),
            Formal::variable("b"),
            Formal::variable("c"),
            Formal::variable("d"),
        )
    }

    fn plain(f: &Formal) -> String {
        render(f, None, None).unwrap().to_string()
    }

    #[test]
    fn test_flatten_sum_carries_signs() {
        let (a, b, c, d) = vars();
        let s = a - (b - c) + d;
        assert_eq!(plain(&s), "\\left(a - \\left(b - c\\right)\\right) + d");
        let flat = s.flattened();
        assert_eq!(plain(&flat), "a - b + c + d");
    }

    #[test]
    fn test_flatten_in_place() {
        let (a, b, c, _) = vars();
        let mut p = a * b * c;
        assert_eq!(plain(&p), "\\left(a b\\right) c");
        p.flatten();
        assert_eq!(plain(&p), "a b c");
        let mut x = Formal::variable("x");
        x.flatten();
        assert_eq!(plain(&x), "x");
    }

    #[test]
    fn test_permute() {
        let (a, b, c, d) = vars();
        let s = Formal::sum(vec![a, -b, c, d]);
        assert_eq!(plain(&s.permuted(&[0, 2, 1, 3]).unwrap()), "a + c - b + d");
        let mut t = s.clone();
        t.permute(&[3, 0]).unwrap();
        assert_eq!(plain(&t), "d + a");
        assert!(matches!(
            s.permuted(&[7]),
            Err(FormalError::IndexOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn test_split_products() {
        let (a, b, c, d) = vars();
        let p = Formal::product(vec![a, b, c, d]);
        let grouped = p.split(&[vec![0, 3], vec![2, 1]], None).unwrap();
        let paren = Mode::Style(style! {"mult-symb" => "paren"});
        assert_eq!(render(&grouped, None, None).unwrap(), "\\left(a d\\right) \\left(c b\\right)");
        assert_eq!(render(&grouped, Some(&paren), None).unwrap(), "(\\left(a d\\right))(\\left(c b\\right))");
        let as_sum = p.split(&[vec![0, 1], vec![2, 3]], Some(MultiKind::Sum)).unwrap();
        assert_eq!(plain(&as_sum), "a b + c d");
    }

    #[test]
    fn test_split_rejects_other_kinds() {
        let x = Formal::variable("x");
        assert!(x.split(&[vec![0]], None).is_err());
        assert!(x.permuted(&[0]).is_err());
    }
}
