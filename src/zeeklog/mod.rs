//! Zeek-style structured logs.
//!
//! A log is a set of `#`-prefixed metadata lines followed by tab-separated
//! data rows. The `#fields` line names the columns; every other metadata
//! line (`#types`, `#path`, `#open`, ...) is carried through verbatim.
//!
//! ```text
//! #separator \x09
//! #fields	ts	uid	id.orig_h
//! #types	time	string	addr
//! 1700000000.000001	CAbc12	10.0.0.1
//! ```

mod reader;
mod record;
mod writer;

pub use reader::ZeekLog;
pub use record::{OwnedRecord, Record};
pub use writer::ZeekLogWriter;

/// Prefix of metadata lines.
pub const META_PREFIX: char = '#';

/// Metadata line declaring the field list.
pub const FIELDS_DIRECTIVE: &str = "#fields";

/// Metadata line declaring the field types.
pub const TYPES_DIRECTIVE: &str = "#types";

/// Column separator.
pub const SEPARATOR: char = '\t';

/// Synthetic field holding the whole line of a log without `#fields`.
pub const RAW_FIELD: &str = "_raw";

/// Field merged logs are ordered by.
pub const TIMESTAMP_FIELD: &str = "ts";

/// File extension of log files.
pub const LOG_EXTENSION: &str = "log";
