use super::Syntax;

/// A handy way to build a new instance of [`Syntax`].
///
/// # Examples
///
/// ```
/// use stanza::{compile_with, Builder, Context};
///
/// let syntax = Builder::new()
///     .text_marker('|')
///     .splice('[', ']')
///     .to_syntax();
///
/// let template = compile_with("| hello [name]", syntax).unwrap();
/// let mut context = Context::new().with_must("name", "taylor");
///
/// assert_eq!(template.render(&mut context).unwrap(), "hello taylor");
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
    text_marker: char,
    splice: (char, char),
}

impl Builder {
    /// Create a new [`Builder`] holding the default markers.
    ///
    /// Text lines: `- text`
    /// Splices: `{ expression }`
    #[inline]
    pub fn new() -> Self {
        Self {
            text_marker: '-',
            splice: ('{', '}'),
        }
    }

    /// Set the character that begins a text line.
    ///
    /// # Panics
    ///
    /// Panics if the character is whitespace or may begin an identifier.
    #[inline]
    pub fn text_marker(&mut self, marker: char) -> &mut Self {
        assert!(is_marker(marker), "text marker must be punctuation");
        self.text_marker = marker;

        self
    }

    /// Set the characters that open and close a splice within a text line.
    ///
    /// # Panics
    ///
    /// Panics if either character is whitespace, may begin an identifier,
    /// or both characters are the same.
    #[inline]
    pub fn splice(&mut self, begin: char, end: char) -> &mut Self {
        assert!(
            is_marker(begin) && is_marker(end),
            "splice markers must be punctuation"
        );
        assert!(begin != end, "splice markers must differ");
        self.splice = (begin, end);

        self
    }

    /// Build a [`Syntax`] from the configured markers.
    pub fn to_syntax(&self) -> Syntax {
        Syntax {
            text_marker: self.text_marker,
            begin_splice: self.splice.0,
            end_splice: self.splice.1,
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// Return true if the character is usable as a marker.
fn is_marker(c: char) -> bool {
    !c.is_whitespace() && !c.is_alphanumeric() && c != '_' && c != '\\'
}
