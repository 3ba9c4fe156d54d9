//! Stanza uses a [`Syntax`] to learn which characters mark text lines and
//! splices within text lines. This module defines the [`Builder`] type,
//! which provides methods to easily generate a `Syntax`.
//!
//! After a `Syntax` has been created, it can be passed to an
//! [`Engine`][`crate::Engine`] and used to compile templates.
mod builder;

pub use builder::Builder;

/// Defines the marker characters recognized by the lexer.
///
/// The default syntax reads text lines like this:
///
/// ```text
/// - Hello {name}!
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syntax {
    /// Character that begins a text line.
    pub(crate) text_marker: char,
    /// Character that opens an expression splice within a text line.
    pub(crate) begin_splice: char,
    /// Character that closes an expression splice.
    pub(crate) end_splice: char,
}

impl Syntax {
    /// Return the character that begins a text line.
    #[inline]
    pub fn text_marker(&self) -> char {
        self.text_marker
    }

    /// Return the characters that open and close a splice.
    #[inline]
    pub fn splice(&self) -> (char, char) {
        (self.begin_splice, self.end_splice)
    }
}

impl Default for Syntax {
    fn default() -> Self {
        Builder::new().to_syntax()
    }
}
