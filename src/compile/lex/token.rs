use crate::compile::{Keyword, Operator};
use std::fmt::Display;

/// Types emitted by the Lexer.
///
/// An abstraction over raw text to make construction of Tree types easier.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    /// Raw text within a text line.
    Text,
    /// Beginning of a text line - `-` by default.
    Marker,
    /// Beginning of an expression within a text line - `{` by default.
    BeginSplice,
    /// End of an expression within a text line - `}` by default.
    EndSplice,
    /// String literal.
    String,
    /// Number literal.
    Number,
    /// Identifier (unquoted string).
    Identifier,
    /// Whitespace between tokens.
    Whitespace,
    /// End of a logical line.
    Newline,
    /// Indentation increased, a block begins.
    Indent,
    /// Indentation decreased, a block ends.
    Dedent,
    /// =
    Assign,
    /// ,
    Comma,
    /// :
    Colon,
    /// (
    BeginParen,
    /// )
    EndParen,
    /// [
    BeginBracket,
    /// ]
    EndBracket,
    /// {
    BeginBrace,
    /// }
    EndBrace,
    /// A boolean true.
    True,
    /// A boolean false.
    False,
    /// The absence of a value.
    None,
    /// A recognized keyword that begins or divides a statement.
    Keyword(Keyword),
    /// Describes an arithmetic action taken on two values.
    Operator(Operator),
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Text => write!(f, "text"),
            Token::Marker => write!(f, "text marker"),
            Token::BeginSplice => write!(f, "begin splice"),
            Token::EndSplice => write!(f, "end splice"),
            Token::String => write!(f, "string"),
            Token::Number => write!(f, "number"),
            Token::Identifier => write!(f, "identifier"),
            Token::Whitespace => write!(f, "whitespace"),
            Token::Newline => write!(f, "end of line"),
            Token::Indent => write!(f, "indent"),
            Token::Dedent => write!(f, "dedent"),
            Token::Assign => write!(f, "assign (=)"),
            Token::Comma => write!(f, "comma (,)"),
            Token::Colon => write!(f, "colon (:)"),
            Token::BeginParen => write!(f, "open paren (()"),
            Token::EndParen => write!(f, "close paren ())"),
            Token::BeginBracket => write!(f, "open bracket ([)"),
            Token::EndBracket => write!(f, "close bracket (])"),
            Token::BeginBrace => write!(f, "open brace ({{)"),
            Token::EndBrace => write!(f, "close brace (}})"),
            Token::True => write!(f, "True"),
            Token::False => write!(f, "False"),
            Token::None => write!(f, "None"),
            Token::Keyword(keyword) => write!(f, "keyword `{keyword}`"),
            Token::Operator(operator) => write!(f, "operator `{operator}`"),
        }
    }
}
