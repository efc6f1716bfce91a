//! Rendered text that knows whether it lives inside LaTeX math mode.
//!
//! Node renderers produce [`Tex::Math`] fragments; verbal forms produce
//! [`Tex::Plain`] prose. Concatenation keeps track of the boundary between
//! the two so that math fragments embedded in prose get `$...$` delimiters:
//!
//! | left  | right | result                 |
//! |-------|-------|------------------------|
//! | Math  | Math  | `Math(ab)`             |
//! | Math  | Plain | `Plain($a$b)`          |
//! | Plain | Math  | `Plain(a$b$)`          |
//! | Plain | Plain | `Plain(ab)`            |
//!
//! An empty operand never changes the mode of the other one.
use itertools::Itertools;
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tex {
    /// goes inside math mode
    Math(String),
    /// ordinary prose
    Plain(String),
}

/// bracket styles understood by every bracketing option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Brackets {
    Auto,
    None,
    Round,
    Square,
    Curly,
}

impl Tex {
    pub fn math(s: impl Into<String>) -> Self {
        Tex::Math(s.into())
    }

    pub fn plain(s: impl Into<String>) -> Self {
        Tex::Plain(s.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Tex::Math(s) | Tex::Plain(s) => s,
        }
    }

    pub fn is_math(&self) -> bool {
        matches!(self, Tex::Math(_))
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.as_str().starts_with(prefix)
    }

    /// true if the text is literally one of the given strings
    pub fn is_one_of(&self, options: &[&str]) -> bool {
        options.contains(&self.as_str())
    }

    /// Concatenate two fragments following the mode table of this module.
    pub fn concat(self, other: Tex) -> Tex {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        match (self, other) {
            (Tex::Math(a), Tex::Math(b)) => Tex::Math(a + &b),
            (Tex::Math(a), Tex::Plain(b)) => Tex::Plain(format!("${}${}", a, b)),
            (Tex::Plain(a), Tex::Math(b)) => Tex::Plain(format!("{}${}$", a, b)),
            (Tex::Plain(a), Tex::Plain(b)) => Tex::Plain(a + &b),
        }
    }

    /// shorthand for concatenating a math-mode literal
    pub fn then_math(self, s: &str) -> Tex {
        self.concat(Tex::math(s))
    }

    /// shorthand for concatenating a plain literal
    pub fn then_plain(self, s: &str) -> Tex {
        self.concat(Tex::plain(s))
    }

    /// Join fragments with a math-mode separator. The first fragment keeps
    /// its own mode, the rest are appended with [`Tex::concat`].
    pub fn join(separator: &str, items: Vec<Tex>) -> Tex {
        let mut iter = items.into_iter();
        let Some(first) = iter.next() else {
            return Tex::math("");
        };
        iter.fold(first, |acc, item| acc.then_math(separator).concat(item))
    }

    /// Formal negation: drop a leading minus sign, or prepend one.
    pub fn negated(self) -> Tex {
        match self {
            Tex::Math(s) if s.starts_with('-') => Tex::Math(s[1..].to_string()),
            Tex::Plain(s) if s.starts_with('-') => Tex::Math(s[1..].to_string()),
            other => Tex::math("-").concat(other),
        }
    }

    /// the same text with a leading minus removed, if there is one
    pub fn strip_minus(self) -> Tex {
        match self {
            Tex::Math(s) if s.starts_with('-') => Tex::Math(s[1..].to_string()),
            Tex::Plain(s) if s.starts_with('-') => Tex::Math(s[1..].to_string()),
            other => other,
        }
    }

    /// Put plain text inside `\mbox{...}` so it can live in math mode.
    pub fn mbox(self) -> Tex {
        match self {
            Tex::Math(s) => Tex::Math(s),
            Tex::Plain(s) => Tex::Math(format!("\\mbox{{{}}}", s)),
        }
    }

    /// Surround with `\left`/`\right` brackets; `None` and `Auto` leave the text alone.
    pub fn bracketed(self, style: Brackets) -> Tex {
        let (open, close) = match style {
            Brackets::Round => ("(", ")"),
            Brackets::Square => ("[", "]"),
            Brackets::Curly => ("\\{", "\\}"),
            Brackets::None | Brackets::Auto => return self,
        };
        Tex::math("\\left")
            .then_math(open)
            .concat(self)
            .then_math("\\right")
            .then_math(close)
    }

    /// The text as it would appear in a document body: math fragments get `$` delimiters.
    pub fn to_document(&self) -> String {
        match self {
            Tex::Math(s) => format!("${}$", s),
            Tex::Plain(s) => s.clone(),
        }
    }
}

/// Does the text read as an integer numeral (optional minus sign, then digits)?
pub fn looks_like_integer(s: &str) -> bool {
    i64::from_str(s.trim()).is_ok()
}

/// math-mode join of already rendered strings
pub fn join_math<I, S>(separator: &str, items: I) -> Tex
where
    I: IntoIterator<Item = S>,
    S: fmt::Display,
{
    Tex::Math(items.into_iter().join(separator))
}

impl fmt::Display for Tex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PartialEq<str> for Tex {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Tex {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<String> for Tex {
    fn eq(&self, other: &String) -> bool {
        self.as_str() == other.as_str()
    }
}
