/// parse a rule document into an ordered rule table. The document is a sequence of sections,
/// each a quoted selector chain followed by a colon and either an inline payload or indented
/// option lines:
///
/// ```text
/// // comment lines start with //
/// "#x @subst":
///     form: value
/// "Power":
///     negative: frac
/// "#i": 5
/// ```
/// Section order is rule precedence: the first matching section wins.
/*
 an inline payload is what a variable gets substituted with (an integer or a text); option
 lines build a style, unless one of them is `subst`, which substitutes with the other
 options styling the substituted object. Values parse as integer, then boolean, then text; text may be quoted
 to keep leading or trailing spaces.
*/
use crate::formal::node::Value;
use crate::formal::rules::RuleTable;
use crate::formal::style::{Mode, Style, StyleValue};
use log::{debug, info};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{is_not, take_while1},
    character::complete::{char, line_ending, multispace0, space0, space1},
    combinator::{map, recognize},
    multi::{many0, many1},
    sequence::{delimited, pair, preceded, separated_pair, terminated},
};
use std::fmt::Display;
use std::fs;
use std::path::Path;

/// enum to represent the value types a document may carry
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

#[allow(dead_code)]
impl DocValue {
    pub fn as_text(&self) -> Option<&String> {
        if let DocValue::Text(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let DocValue::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let DocValue::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl Display for DocValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocValue::Text(s) => write!(f, "{}", s),
            DocValue::Integer(val) => write!(f, "{}", val),
            DocValue::Boolean(val) => write!(f, "{}", val),
        }
    }
}

impl From<DocValue> for StyleValue {
    fn from(v: DocValue) -> Self {
        match v {
            DocValue::Text(s) => StyleValue::Str(s),
            DocValue::Integer(i) => StyleValue::Int(i),
            DocValue::Boolean(b) => StyleValue::Bool(b),
        }
    }
}

/// what follows the colon of a section
#[derive(Debug, Clone, PartialEq)]
pub enum RuleEntry {
    Payload(DocValue),
    Options(Vec<(String, DocValue)>),
}

fn scalar_value(s: &str) -> DocValue {
    let s = s.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        return DocValue::Text(s[1..s.len() - 1].to_string());
    }
    if let Ok(val) = s.parse::<i64>() {
        DocValue::Integer(val)
    } else if let Ok(val) = s.parse::<bool>() {
        DocValue::Boolean(val)
    } else {
        DocValue::Text(s.to_string())
    }
}

/// Parses a quoted selector chain
fn parse_chain(input: &str) -> IResult<&str, String> {
    let mut parser = map(delimited(char('"'), is_not("\"\n"), char('"')), String::from);
    parser.parse(input)
}

/// Parses an option key such as `show-zeros`
fn parse_key(input: &str) -> IResult<&str, String> {
    let mut parser = map(
        recognize(take_while1(|c: char| {
            c.is_alphanumeric() || c == '-' || c == '_'
        })),
        String::from,
    );
    parser.parse(input)
}

/// the rest of the line, as a value
fn parse_scalar(input: &str) -> IResult<&str, DocValue> {
    let mut parser = map(take_while1(|c: char| c != '\n' && c != '\r'), scalar_value);
    parser.parse(input)
}

/// Parses one indented `key: value` line, including the line break before it
fn parse_option_line(input: &str) -> IResult<&str, (String, DocValue)> {
    let colon_separator = delimited(space0, char(':'), space0);
    let mut parser = preceded(
        pair(line_ending, space1),
        separated_pair(parse_key, colon_separator, parse_scalar),
    );
    parser.parse(input)
}

/// Parses a section: chain, colon, payload or option block
fn parse_section(input: &str) -> IResult<&str, (String, RuleEntry)> {
    let (input, _) = space0(input)?;
    let (input, chain) = parse_chain(input)?;
    let (input, _) = (space0, char(':'), space0).parse(input)?;
    let mut entry = alt((
        map(parse_scalar, RuleEntry::Payload),
        map(many1(parse_option_line), RuleEntry::Options),
    ));
    let (input, entry) = entry.parse(input)?;
    Ok((input, (chain, entry)))
}

/// Filters out comment lines (starting with //) and blank lines. `#` starts
/// identity selectors here, so it is not a comment marker.
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//") && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the sections of a document, in order
pub fn parse_rule_document(input: &str) -> IResult<&str, Vec<(String, RuleEntry)>> {
    let mut parser = preceded(multispace0, many0(terminated(parse_section, multispace0)));
    parser.parse(input)
}

fn payload_value(chain: &str, value: DocValue) -> Result<Value, String> {
    match value {
        DocValue::Integer(i) => Ok(Value::Int(i)),
        DocValue::Text(s) => Ok(Value::Text(s)),
        DocValue::Boolean(b) => Err(format!(
            "rule \"{}\": {} is not a substitution payload",
            chain, b
        )),
    }
}

/// An option block with a `subst` key substitutes its value; the other
/// options then style the substituted object.
fn entry_mode(chain: &str, entry: RuleEntry) -> Result<Mode, String> {
    match entry {
        RuleEntry::Payload(value) => Ok(Mode::subst(payload_value(chain, value)?)),
        RuleEntry::Options(pairs) => {
            let mut style = Style::new();
            let mut subst = None;
            for (key, value) in pairs {
                if key == "subst" {
                    if subst.is_none() {
                        subst = Some(payload_value(chain, value)?);
                    }
                } else {
                    style.insert(&key, StyleValue::from(value));
                }
            }
            match subst {
                Some(value) => Ok(Mode::subst_with(value, style)),
                None => Ok(Mode::Style(style)),
            }
        }
    }
}

/// Parse a whole document into a rule table. Malformed selector chains are
/// accepted here and reported when the table is consulted.
pub fn parse_rules(input: &str) -> Result<RuleTable, String> {
    let filtered = filter_comments(input);
    let (remaining, sections) = match parse_rule_document(&filtered) {
        Ok(res) => res,
        Err(e) => return Err(format!("Parsing error: {:?}", e)),
    };
    if !remaining.trim().is_empty() {
        return Err(format!(
            "Failed to parse entire document. Remaining: '{}'",
            remaining
        ));
    }
    let mut table = RuleTable::new();
    for (chain, entry) in sections {
        debug!("rule \"{}\" -> {:?}", chain, entry);
        let mode = entry_mode(&chain, entry)?;
        table.insert(&chain, mode);
    }
    Ok(table)
}

/// Read and parse a rule document from a file
pub fn load_rules(path: &Path) -> Result<RuleTable, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let table = parse_rules(&content)?;
    info!("{} rules loaded from {}", table.len(), path.display());
    Ok(table)
}
