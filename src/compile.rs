mod lex;
mod parse;
mod template;

pub use crate::compile::{
    parse::{scope::Scope, tree, Parser},
    template::Template,
};

use crate::{log::Error, Syntax};
use std::fmt::Display;

/// Compile a [`Template`] from the given text using the default [`Syntax`].
///
/// Provides a shortcut to quickly compile a `Template` without creating
/// an `Engine`.
///
/// # Examples
///
/// ```
/// use stanza::compile;
///
/// let template = compile("p:\n    - hello {name}\n");
/// assert!(template.is_ok())
/// ```
pub fn compile(text: &str) -> Result<Template<'_>, Error> {
    Parser::new(text, Syntax::default()).compile(None)
}

/// Compile a [`Template`] from the given text using the given [`Syntax`].
///
/// # Examples
///
/// ```
/// use stanza::{compile_with, Builder};
///
/// let syntax = Builder::new().text_marker('|').to_syntax();
/// assert!(compile_with("| hello", syntax).is_ok());
/// ```
pub fn compile_with(text: &str, syntax: Syntax) -> Result<Template<'_>, Error> {
    Parser::new(text, syntax).compile(None)
}

/// Keywords recognized by the Lexer and Parser.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Keyword {
    /// Beginning of an assignment.
    Var,
    /// Beginning of an "if" statement.
    If,
    /// Beginning of an alternate condition in an "if" statement.
    Elif,
    /// Marks the beginning of the else branch in an "if" statement.
    Else,
    /// Beginning of a loop.
    For,
    /// Divides the identifier from the iterable in a loop.
    ///
    /// In this example, identifier refers to "person" while the iterable
    /// refers to "people":
    ///
    /// "for person in people:"
    In,
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Keyword::Var => write!(f, "var"),
            Keyword::If => write!(f, "if"),
            Keyword::Elif => write!(f, "elif"),
            Keyword::Else => write!(f, "else"),
            Keyword::For => write!(f, "for"),
            Keyword::In => write!(f, "in"),
        }
    }
}

/// Arithmetic operators recognized by the Lexer and Parser.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Operator {
    /// +
    Add,
    /// -
    Subtract,
    /// *
    Multiply,
    /// /
    Divide,
}

impl Operator {
    /// Return true if the operator binds tighter than `+` and `-`.
    pub fn is_product(&self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Add => write!(f, "+"),
            Operator::Subtract => write!(f, "-"),
            Operator::Multiply => write!(f, "*"),
            Operator::Divide => write!(f, "/"),
        }
    }
}
