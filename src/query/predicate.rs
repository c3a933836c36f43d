//! Compiled query predicates.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::postfix::{to_postfix, PostfixItem};
use super::token::{strip_quotes, tokenize};
use crate::zeeklog::Record;

/// A case-insensitive, fully anchored wildcard pattern.
#[derive(Debug, Clone)]
pub struct Wildcard {
    pattern: String,
    regex: Option<Regex>,
}

impl Wildcard {
    /// Compile `pattern`; `*` and `?` are the only special characters.
    pub fn new(pattern: &str) -> Self {
        let mut source = String::with_capacity(pattern.len() + 2);
        source.push('^');
        let mut buf = [0u8; 4];
        for c in pattern.chars() {
            match c {
                '*' => source.push_str(".*"),
                '?' => source.push('.'),
                _ => source.push_str(&regex::escape(c.encode_utf8(&mut buf))),
            }
        }
        source.push('$');

        let regex = match RegexBuilder::new(&source).case_insensitive(true).build() {
            Ok(regex) => Some(regex),
            Err(e) => {
                debug!(pattern, error = %e, "wildcard did not compile, using substring match");
                None
            }
        };

        Self {
            pattern: pattern.to_string(),
            regex,
        }
    }

    /// The pattern as written.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether `value` matches the whole pattern.
    pub fn matches(&self, value: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(value),
            None => value
                .to_lowercase()
                .contains(&self.pattern.to_lowercase()),
        }
    }
}

impl PartialEq for Wildcard {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for Wildcard {}

/// A row predicate.
///
/// Evaluation is total: both sides of `And` and `Or` are always evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches every row. Stands in for malformed fragments.
    Always,
    /// `field:value`; a missing field reads as an empty string.
    FieldMatch { field: String, pattern: Wildcard },
    /// A bare value matched against every field.
    AnyFieldMatch(Wildcard),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    /// Compile one term.
    ///
    /// A term that is entirely quoted is a literal bare value. Otherwise it
    /// is split at the first `:` or `=`; when either side is empty the whole
    /// term is a bare value.
    pub fn term(term: &str) -> Self {
        let fully_quoted = term.len() >= 2 && term.starts_with('"') && term.ends_with('"');
        if fully_quoted {
            return Predicate::AnyFieldMatch(Wildcard::new(&strip_quotes(term)));
        }

        if let Some(split) = term.find(|c| c == ':' || c == '=') {
            let field = term[..split].trim();
            let value = term[split + 1..].trim();
            if !field.is_empty() && !value.is_empty() {
                return Predicate::FieldMatch {
                    field: field.to_string(),
                    pattern: Wildcard::new(&strip_quotes(value)),
                };
            }
        }

        Predicate::AnyFieldMatch(Wildcard::new(term))
    }

    /// Evaluate against one row.
    pub fn matches(&self, record: &Record<'_>) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::FieldMatch { field, pattern } => pattern.matches(record.get(field)),
            Predicate::AnyFieldMatch(pattern) => record
                .values()
                .fold(false, |found, value| found | pattern.matches(value)),
            Predicate::And(a, b) => a.matches(record) & b.matches(record),
            Predicate::Or(a, b) => a.matches(record) | b.matches(record),
            Predicate::Not(a) => !a.matches(record),
        }
    }
}

/// A compiled query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    predicate: Option<Predicate>,
}

impl Query {
    /// Compile a query string. Never fails.
    ///
    /// An empty query matches every row. Operators missing an operand
    /// compile to [`Predicate::Always`] and consume nothing. The operand on
    /// top of the stack at the end is the query; any below it are dropped.
    pub fn compile(query: &str) -> Self {
        let postfix = to_postfix(&tokenize(query));
        let mut operands: Vec<Predicate> = Vec::new();

        for item in postfix {
            match item {
                PostfixItem::Term(term) => operands.push(Predicate::term(&term)),
                PostfixItem::Not => {
                    let compiled = match operands.pop() {
                        Some(a) => Predicate::Not(Box::new(a)),
                        None => Predicate::Always,
                    };
                    operands.push(compiled);
                }
                PostfixItem::And | PostfixItem::Or => {
                    if operands.len() < 2 {
                        operands.push(Predicate::Always);
                        continue;
                    }
                    let (Some(b), Some(a)) = (operands.pop(), operands.pop()) else {
                        continue;
                    };
                    let (a, b) = (Box::new(a), Box::new(b));
                    operands.push(if item == PostfixItem::And {
                        Predicate::And(a, b)
                    } else {
                        Predicate::Or(a, b)
                    });
                }
            }
        }

        Self {
            predicate: operands.pop(),
        }
    }

    /// The compiled predicate, `None` for an empty query.
    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    /// Whether the query matches everything without looking at rows.
    pub fn is_empty(&self) -> bool {
        self.predicate.is_none()
    }

    /// Evaluate against one row.
    pub fn matches(&self, record: &Record<'_>) -> bool {
        self.predicate
            .as_ref()
            .map_or(true, |predicate| predicate.matches(record))
    }
}
