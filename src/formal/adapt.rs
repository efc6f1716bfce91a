//! One-way translation of an external symbolic expression tree into formal
//! nodes, so that results computed elsewhere can be rendered with rules.
//!
//! The tree mirrors the shape computer-algebra systems hand out: n-ary sums
//! and products, a product `-1 * x` standing for `-x`, and reciprocals as
//! powers with negative exponents.
use crate::formal::errors::{FormalError, FormalResult};
use crate::formal::node::Formal;
use log::trace;
use num::rational::Rational64;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SymExpr {
    Symbol(String),
    Integer(i64),
    /// numerator, denominator
    Rational(i64, i64),
    Add(Vec<SymExpr>),
    Mul(Vec<SymExpr>),
    Pow(Box<SymExpr>, Box<SymExpr>),
    /// an applied function; not translated
    Function(String, Vec<SymExpr>),
}

impl SymExpr {
    pub fn symbol(name: &str) -> SymExpr {
        SymExpr::Symbol(name.to_string())
    }

    pub fn pow(base: SymExpr, exp: SymExpr) -> SymExpr {
        SymExpr::Pow(Box::new(base), Box::new(exp))
    }

    fn kind_name(&self) -> &'static str {
        match self {
            SymExpr::Symbol(_) => "Symbol",
            SymExpr::Integer(_) => "Integer",
            SymExpr::Rational(..) => "Rational",
            SymExpr::Add(_) => "Add",
            SymExpr::Mul(_) => "Mul",
            SymExpr::Pow(..) => "Pow",
            SymExpr::Function(..) => "Function",
        }
    }

    /// the negated number, if this is a negative number
    fn negated_if_negative(&self) -> Option<SymExpr> {
        match self {
            SymExpr::Integer(n) if *n < 0 => Some(SymExpr::Integer(-n)),
            SymExpr::Rational(n, d) if (*n < 0) != (*d < 0) && *n != 0 => {
                Some(SymExpr::Rational(-n, *d))
            }
            _ => None,
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[SymExpr], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, a) in args.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", a)?;
    }
    write!(f, ")")
}

impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymExpr::Symbol(s) => write!(f, "{}", s),
            SymExpr::Integer(n) => write!(f, "{}", n),
            SymExpr::Rational(n, d) => write!(f, "{}/{}", n, d),
            SymExpr::Add(args) => write_args(f, args, " + "),
            SymExpr::Mul(args) => write_args(f, args, "*"),
            SymExpr::Pow(b, e) => write!(f, "{}**{}", b, e),
            SymExpr::Function(name, args) => {
                write!(f, "{}", name)?;
                write_args(f, args, ", ")
            }
        }
    }
}

/// Translate `expr` into a formal node.
pub fn adapt(expr: &SymExpr) -> FormalResult<Formal> {
    trace!("adapting {}", expr);
    match expr {
        SymExpr::Symbol(name) => Ok(Formal::variable(name)),
        SymExpr::Integer(n) => Ok(Formal::integer(*n)),
        SymExpr::Rational(n, d) => {
            if *d == 0 {
                return Err(FormalError::UndefinedValue(format!("rational {}/0", n)));
            }
            Ok(Formal::from(Rational64::new(*n, *d)))
        }
        SymExpr::Add(terms) => Ok(Formal::sum(
            terms.iter().map(adapt).collect::<FormalResult<Vec<_>>>()?,
        )),
        SymExpr::Mul(args) => adapt_mul(args),
        SymExpr::Pow(base, exp) => Ok(adapt(base)?.pow(adapt(exp)?)),
        SymExpr::Function(..) => Err(FormalError::MissingHandler(format!(
            "{} ({})",
            expr.kind_name(),
            expr
        ))),
    }
}

fn adapt_mul(args: &[SymExpr]) -> FormalResult<Formal> {
    if let [SymExpr::Integer(-1), term] = args {
        return Ok(-adapt(term)?);
    }
    let mut upstairs = Vec::new();
    let mut downstairs = Vec::new();
    for arg in args {
        match arg {
            SymExpr::Pow(base, exp) => match exp.negated_if_negative() {
                Some(inverse_exp) => {
                    downstairs.push(adapt(&SymExpr::Pow(base.clone(), Box::new(inverse_exp)))?)
                }
                None => upstairs.push(adapt(arg)?),
            },
            _ => upstairs.push(adapt(arg)?),
        }
    }
    let top = factor_list(upstairs);
    if downstairs.is_empty() {
        Ok(top)
    } else {
        Ok(Formal::quotient(top, factor_list(downstairs)))
    }
}

fn factor_list(mut factors: Vec<Formal>) -> Formal {
    match factors.len() {
        0 => Formal::integer(1),
        1 => factors.remove(0),
        _ => Formal::product(factors),
    }
}

impl TryFrom<&SymExpr> for Formal {
    type Error = FormalError;

    fn try_from(expr: &SymExpr) -> FormalResult<Formal> {
        adapt(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formal::render::render;
    use crate::formal::rules::RuleTable;
    use crate::style;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    fn y() -> SymExpr {
        SymExpr::symbol("y")
    }

    fn rendered(e: &SymExpr) -> String {
        render(&adapt(e).unwrap(), None, None).unwrap().to_string()
    }

    #[test]
    fn test_negative_one() {
        assert_eq!(rendered(&SymExpr::Integer(-1)), "-1");
    }

    #[test]
    fn test_sums() {
        let e = SymExpr::Add(vec![x(), y(), SymExpr::Integer(3)]);
        assert_eq!(rendered(&e), "x + y + 3");
        let minus_y = SymExpr::Mul(vec![SymExpr::Integer(-1), y()]);
        assert_eq!(rendered(&SymExpr::Add(vec![x(), minus_y])), "x - y");
    }

    #[test]
    fn test_negative_powers() {
        let sup = RuleTable::new().rule("Power", style! {"negative" => "sup"});
        let frac = RuleTable::new().rule("Power", style! {"negative" => "frac"});
        let inline = RuleTable::new().rule("Power", style! {"negative" => "inline"});
        let check = |e: &SymExpr, expected: [&str; 3]| {
            let f = Formal::try_from(e).unwrap();
            assert_eq!(render(&f, None, Some(&sup)).unwrap(), expected[0]);
            assert_eq!(render(&f, None, Some(&frac)).unwrap(), expected[1]);
            assert_eq!(render(&f, None, Some(&inline)).unwrap(), expected[2]);
        };
        check(&SymExpr::pow(x(), SymExpr::Integer(-1)), ["x^{-1}", "\\frac{1}{x}", "1/x"]);
        check(
            &SymExpr::pow(x(), SymExpr::Integer(-2)),
            ["x^{-2}", "\\frac{1}{x^{2}}", "1/x^{2}"],
        );
    }

    #[test]
    fn test_products_move_reciprocals_down() {
        let e = SymExpr::Mul(vec![
            SymExpr::Integer(2),
            x(),
            SymExpr::pow(y(), SymExpr::Integer(-1)),
        ]);
        assert_eq!(rendered(&e), "\\frac{2 x}{y}");
        let e = SymExpr::Mul(vec![
            x(),
            SymExpr::pow(y(), SymExpr::Integer(-2)),
            SymExpr::pow(SymExpr::symbol("z"), SymExpr::Rational(-1, 2)),
        ]);
        assert_eq!(rendered(&e), "\\frac{x}{y^{2} z^{\\frac{1}{2}}}");
        let e = SymExpr::Mul(vec![SymExpr::pow(x(), SymExpr::Integer(-1))]);
        assert_eq!(rendered(&e), "\\frac{1}{x}");
        assert_eq!(rendered(&SymExpr::Mul(vec![])), "1");
    }

    #[test]
    fn test_rationals() {
        assert_eq!(rendered(&SymExpr::Rational(2, 4)), "\\frac{1}{2}");
        assert_eq!(rendered(&SymExpr::Rational(-3, 1)), "-3");
        assert!(adapt(&SymExpr::Rational(1, 0)).is_err());
    }

    #[test]
    fn test_functions_have_no_handler() {
        let e = SymExpr::Function("sin".to_string(), vec![x()]);
        assert!(matches!(adapt(&e), Err(FormalError::MissingHandler(_))));
        let nested = SymExpr::Add(vec![x(), e]);
        assert!(adapt(&nested).is_err());
    }
}
