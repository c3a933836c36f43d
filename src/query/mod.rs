//! Boolean queries over Zeek logs.
//!
//! A query is a boolean expression of terms:
//!
//! ```text
//! proto:tcp AND (id.resp_p=443 OR id.resp_p=8443) AND NOT "10.0.0.*"
//! ```
//!
//! - `field:value` / `field=value` match one field; a bare value matches any
//!   field.
//! - `*` matches any run of characters and `?` any single character; the
//!   value must match the whole field, ignoring case.
//! - `NOT` binds tighter than `AND`, which binds tighter than `OR`.
//! - Double quotes keep whitespace, parentheses and keywords literal.
//!
//! Malformed queries never fail. Missing operands turn into an always-true
//! term, stray closing parentheses are ignored, and of adjacent terms
//! without an operator only the last one counts.

mod page;
mod postfix;
mod predicate;
mod token;

pub use page::{select, LogPage, LogRequest, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
pub use postfix::{to_postfix, PostfixItem};
pub use predicate::{Predicate, Query, Wildcard};
pub use token::{strip_quotes, tokenize, Token};
