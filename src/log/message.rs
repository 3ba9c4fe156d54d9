use super::{Error, ErrorKind};
use crate::region::Region;
use std::fmt::Display;

pub const UNEXPECTED_TOKEN: &str = "unexpected token";
pub const UNEXPECTED_EOF: &str = "unexpected eof";
pub const INVALID_SYNTAX: &str = "invalid syntax";
pub const INVALID_INDENTATION: &str = "invalid indentation";
pub const INCOMPATIBLE_TYPES: &str = "incompatible types";
pub const DIVISION_BY_ZERO: &str = "division by zero";
pub const NUMERIC_OVERFLOW: &str = "numeric overflow";
pub const NOT_ITERABLE: &str = "value is not iterable";

/// Return an [`Error`] of kind [`ErrorKind::Syntax`] pointing at the region.
pub fn error_syntax<T>(reason: &str, source: &str, region: T) -> Error
where
    T: Into<Region>,
{
    Error::build(reason)
        .with_kind(ErrorKind::Syntax)
        .with_pointer(source, region)
}

/// Return an [`Error`] explaining that the end of source was not expected.
pub fn error_eof(source: &str) -> Error {
    let source_len = source.len();
    error_syntax(UNEXPECTED_EOF, source, source_len..source_len)
        .with_help("expected additional tokens, did you close all brackets and splices?")
}

/// Return an [`Error`] explaining that the write operation failed.
///
/// This is likely caused by a failure during a `write!` macro operation.
pub fn error_write() -> Error {
    Error::build("write failure")
        .with_kind(ErrorKind::Write)
        .with_help("failed to write result of render, are you low on memory?")
}

/// Return an [`Error`] describing a missing template.
pub fn error_missing_template(name: &str) -> Error {
    Error::build("missing template")
        .with_kind(ErrorKind::Template)
        .with_help(format!(
            "template `{name}` not found in engine, add it with `.add_template`"
        ))
}

/// Return an [`Error`] describing a value that cannot be looped over.
pub fn error_not_iterable(type_name: &str) -> Error {
    Error::build(NOT_ITERABLE)
        .with_kind(ErrorKind::Iteration)
        .with_help(format!(
            "a loop requires an array, dictionary or string, found {type_name}"
        ))
}

/// Return a string describing an unexpected token.
pub fn expected_found<T, Y>(expected: T, found: Y) -> String
where
    T: Display,
    Y: Display,
{
    format!("expected {expected}, found {found}")
}

/// Return a string describing the statements that may begin a line.
pub fn expected_statement<T>(received: T) -> String
where
    T: Display,
{
    format!(
        "expected a statement like `var`, `if`, `for`, a tag or a text line, found {received}"
    )
}
