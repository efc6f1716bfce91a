//! Sums, products, quotients and powers.
//!
//! All four render their operands first and only then look at the `form`
//! option, so that variables below them have taken on their substituted
//! values before a `form: value` result is computed.
use crate::formal::errors::FormalResult;
use crate::formal::node::{Formal, Node, NodeKind, Summand, is_proper_sum};
use crate::formal::path::ExpressionPath;
use crate::formal::render::Renderer;
use crate::formal::rules::RuleTable;
use crate::formal::style::{Form, Mode, Modifier};
use crate::formal::text::{Brackets, Tex, looks_like_integer};
use crate::style;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
enum MultSymbol {
    None,
    Dot,
    X,
    Paren,
}

impl MultSymbol {
    fn as_str(self) -> &'static str {
        match self {
            MultSymbol::None => " ",
            MultSymbol::Dot => " \\cdot ",
            MultSymbol::X => " \\times ",
            MultSymbol::Paren => ")(",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
enum SignRule {
    Gather,
    Bracket,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
enum NumeralRule {
    FrontDot,
    Dot,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
enum NegativePower {
    Sup,
    Frac,
    Inline,
    InlineParen,
}

impl NegativePower {
    fn wrap(self, s: &str) -> String {
        match self {
            NegativePower::Sup => s.to_string(),
            NegativePower::Frac => format!("\\frac{{1}}{{{}}}", s),
            NegativePower::Inline => format!("1/{}", s),
            NegativePower::InlineParen => format!("1/\\left({}\\right)", s),
        }
    }
}

/// Nested sums and products are forced into brackets; ellipses are centered.
fn operand_modifier(operand: &Node, bracket_products: bool) -> Option<Modifier> {
    match operand.kind() {
        NodeKind::Sum(_) => Some(Modifier::Merge(style! {"brackets" => "round"})),
        NodeKind::Product(_) if bracket_products => {
            Some(Modifier::Merge(style! {"brackets" => "round"}))
        }
        NodeKind::Ellipsis => Some(Modifier::Merge(style! {"style" => "c"})),
        _ => None,
    }
}

fn is_zero_text(t: &Tex) -> bool {
    t.is_one_of(&["0", "-0"])
}

impl Renderer {
    /// Shared `form: name` / `form: value` handling; `None` means render symbolically.
    pub(crate) fn name_or_value(&self, node: &Node, mode: &Mode) -> FormalResult<Option<Tex>> {
        Ok(match mode.options().form()? {
            Some(Form::Name) => Some(Tex::math(node.require_name()?)),
            Some(Form::Value) => Some(Tex::math(self.require_value(node)?.to_string())),
            _ => None,
        })
    }

    /// options: `form`, `brackets` (default none), `show-zeros` (default
    /// false), `flip-ops` (default true)
    pub(crate) fn format_sum<'a>(
        &mut self,
        node: &'a Node,
        terms: &'a [Summand],
        mode: &Mode,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
    ) -> FormalResult<Tex> {
        let mut rendered = Vec::with_capacity(terms.len());
        for (i, summand) in terms.iter().enumerate() {
            let modifier = operand_modifier(&summand.term, false);
            rendered.push(self.fwd(
                node,
                &summand.term,
                &format!("term{}", i),
                rules,
                path,
                modifier.as_ref(),
            )?);
        }
        if let Some(t) = self.name_or_value(node, mode)? {
            return Ok(t);
        }
        let opts = mode.options();
        let show_zeros = opts.get_bool("show-zeros", false)?;
        let flip_ops = opts.get_bool("flip-ops", true)?;

        let mut s: Option<String> = None;
        let mut multiple_terms = false;
        for (summand, f) in terms.iter().zip(rendered) {
            if is_zero_text(&f) && !show_zeros {
                continue;
            }
            s = Some(match s {
                None if summand.sign == -1 => f.negated().to_string(),
                None => f.to_string(),
                Some(acc) => {
                    let mut negative = summand.sign == -1;
                    let mut f = f;
                    if flip_ops && f.starts_with("-") {
                        negative = !negative;
                        f = f.strip_minus();
                    }
                    multiple_terms = true;
                    format!("{} {} {}", acc, if negative { "-" } else { "+" }, f)
                }
            });
        }
        let s = Tex::math(s.unwrap_or_else(|| "0".to_string()));
        if multiple_terms {
            Ok(s.bracketed(opts.get_enum("brackets", Brackets::None)?))
        } else {
            Ok(s)
        }
    }

    /// options: `form`, `brackets`, `collapse-zero`, `mult-symb`, `numerals`,
    /// `show-unity`, `signs`
    pub(crate) fn format_product<'a>(
        &mut self,
        node: &'a Node,
        factors: &'a [Formal],
        mode: &Mode,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
    ) -> FormalResult<Tex> {
        let mut rendered = Vec::with_capacity(factors.len());
        for (i, factor) in factors.iter().enumerate() {
            let modifier = operand_modifier(factor, true);
            rendered.push(self.fwd(
                node,
                factor,
                &format!("factor{}", i),
                rules,
                path,
                modifier.as_ref(),
            )?);
        }
        if let Some(t) = self.name_or_value(node, mode)? {
            return Ok(t);
        }
        let opts = mode.options();
        let mult_rule = opts.get_enum("mult-symb", MultSymbol::None)?;
        let mult_symbol = mult_rule.as_str();
        let collapse_zero = opts.get_bool("collapse-zero", true)?;
        let show_unity = opts.get_bool("show-unity", false)?;

        let sign_rule = opts.get_enum("signs", SignRule::Gather)?;
        let gather_signs = sign_rule == SignRule::Gather;
        let bracket_signs = sign_rule == SignRule::Bracket
            || (sign_rule == SignRule::Auto && mult_symbol == " ");

        let numeral_rule = opts.get_enum("numerals", NumeralRule::FrontDot)?;
        let gather_numerals = numeral_rule == NumeralRule::FrontDot;
        let dot_numerals = mult_rule == MultSymbol::None && numeral_rule != NumeralRule::None;

        let mut pruned: Vec<String> = Vec::new();
        let mut numerals: Vec<String> = Vec::new();
        let mut num_neg = 0;
        let mut num_factors = 0;
        let mut product = None;
        for f in rendered {
            let mut needs_brackets = false;
            if is_zero_text(&f) && collapse_zero {
                product = Some("0".to_string());
                break;
            }
            let mut s = f.to_string();
            if s.starts_with('-') {
                if gather_signs {
                    num_neg += 1;
                    s.remove(0);
                } else if bracket_signs {
                    needs_brackets = true;
                }
            }
            if s == "1" && !show_unity {
                continue;
            }
            let numeral = (gather_numerals || dot_numerals) && looks_like_integer(&s);
            if dot_numerals && numeral && (!numerals.is_empty() || (num_factors > 0 && !gather_numerals)) {
                s = format!("\\cdot {}", s);
                needs_brackets = false;
            }
            if needs_brackets {
                s = format!("({})", s);
            }
            if gather_numerals && numeral {
                numerals.push(s);
            } else {
                pruned.push(s);
            }
            num_factors += 1;
        }
        let product = match product {
            Some(zero) => zero,
            None => {
                numerals.append(&mut pruned);
                let sign = if num_neg % 2 == 1 { "-" } else { "" };
                let mut term = if num_factors == 0 {
                    "1".to_string()
                } else {
                    numerals.join(mult_symbol)
                };
                if mult_rule == MultSymbol::Paren {
                    term = format!("({})", term);
                }
                format!("{}{}", sign, term)
            }
        };
        Ok(Tex::math(product).bracketed(opts.get_enum("brackets", Brackets::None)?))
    }

    /// options: `form`, `inline`, `brackets-top`, `brackets-bot`,
    /// `collapse-zero`, `sign-front`, `collapse-int`
    pub(crate) fn format_quotient<'a>(
        &mut self,
        node: &'a Node,
        top: &'a Formal,
        bot: &'a Formal,
        mode: &Mode,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
    ) -> FormalResult<Tex> {
        let mut t = self.fwd(node, top, "top", rules, path, None)?;
        let mut b = self.fwd(node, bot, "bot", rules, path, None)?;
        if let Some(q) = self.name_or_value(node, mode)? {
            return Ok(q);
        }
        let opts = mode.options();
        if is_zero_text(&t) && opts.get_bool("collapse-zero", true)? {
            return Ok(Tex::math("0"));
        }
        let mut num_neg = 0;
        if opts.get_bool("sign-front", true)? {
            if t.starts_with("-") {
                num_neg += 1;
                t = t.strip_minus();
            }
            if b.starts_with("-") {
                num_neg += 1;
                b = b.strip_minus();
            }
        }
        let t = t.bracketed(opts.get_enum("brackets-top", Brackets::None)?);
        let b = b.bracketed(opts.get_enum("brackets-bot", Brackets::None)?);
        let q = if b == "1" && opts.get_bool("collapse-int", true)? {
            t.to_string()
        } else if opts.get_bool("inline", false)? {
            format!("{}/{}", t, b)
        } else {
            format!("\\frac{{{}}}{{{}}}", t, b)
        };
        Ok(Tex::math(if num_neg == 1 { format!("-{}", q) } else { q }))
    }

    /// options: `form`, `show-zero`, `show-unity`, `negative`,
    /// `brackets-base`, `brackets-power`
    pub(crate) fn format_power<'a>(
        &mut self,
        node: &'a Node,
        base: &'a Formal,
        power: &'a Formal,
        mode: &Mode,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
    ) -> FormalResult<Tex> {
        let b = self.fwd(node, base, "base", rules, path, None)?;
        let mut p = self.fwd(node, power, "power", rules, path, None)?;
        if let Some(t) = self.name_or_value(node, mode)? {
            return Ok(t);
        }
        let opts = mode.options();
        let mut outer = NegativePower::Sup;
        let policy = opts.get_enum("negative", NegativePower::Sup)?;
        if p.starts_with("-") && policy != NegativePower::Sup {
            outer = policy;
            p = p.negated();
        }
        let show_zero = opts.get_bool("show-zero", false)?;
        let show_unity = opts.get_bool("show-unity", false)?;

        let mut base_brackets = opts.get_enum("brackets-base", Brackets::Auto)?;
        if base_brackets == Brackets::Auto
            && !(p == "1" && !show_unity)
            && (is_proper_sum(base) || matches!(base.kind(), NodeKind::Quotient { .. }))
        {
            base_brackets = Brackets::Round;
        }
        let mut power_brackets = opts.get_enum("brackets-power", Brackets::Auto)?;
        if power_brackets == Brackets::Auto && is_proper_sum(power) {
            power_brackets = Brackets::Round;
        }
        let b = b.bracketed(base_brackets);
        let p = p.bracketed(power_brackets);

        Ok(Tex::math(if p == "0" && !show_zero {
            "1".to_string()
        } else if p == "1" && !show_unity {
            outer.wrap(b.as_str())
        } else {
            outer.wrap(&format!("{}^{{{}}}", b, p))
        }))
    }
}
