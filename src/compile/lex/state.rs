/// Describes the internal state of a [`Lexer`][`super::Lexer`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CursorState {
    /// Indicates the [`Lexer`][`super::Lexer`] is at the beginning of a line,
    /// before any indentation has been measured.
    LineStart,
    /// Indicates the [`Lexer`][`super::Lexer`] is reading a statement such as
    /// a tag, assignment, loop or condition.
    Statement,
    /// Indicates the [`Lexer`][`super::Lexer`] is reading the raw text of a
    /// text line.
    Text,
    /// Indicates the [`Lexer`][`super::Lexer`] is reading an expression spliced
    /// into a text line.
    Splice,
}
