mod pointer;

pub use pointer::Pointer;

use std::fmt::{Debug, Formatter, Result};

const BLANK: &str = "";
const PIPE: &str = "|";
const EQUAL: &str = "=";
const HIGHLIGHT: &str = "^";

/// Describes a type that can be associated with an Error and used
/// to print a visualization.
pub trait Visual: Debug + Send + Sync {
    /// Display the visualization by writing to the given Formatter.
    fn display(
        &self,
        formatter: &mut Formatter<'_>,
        template: Option<&str>,
        help: Option<&str>,
    ) -> Result;

    /// Return the one-indexed line and column being illustrated, if the
    /// visualization refers to a single location.
    fn position(&self) -> Option<(usize, usize)> {
        None
    }
}

/// Get the zero-indexed line and column for the byte offset.
///
/// The column is measured in display width.
fn get_line_and_column(lines: &[&str], offset: usize) -> (usize, usize) {
    let mut n = 0;

    for (i, line) in lines.iter().enumerate() {
        let len = line.len() + 1;
        if n + len > offset {
            let before = line.get(..offset - n).unwrap_or(line);
            return (i, get_width(before));
        }
        n += len;
    }

    let last = lines.len().saturating_sub(1);
    let width = lines.last().map(|line| get_width(line)).unwrap_or(0);

    (last, width)
}

/// Wrapper for UnicodeWidthStr::width.
fn get_width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}
