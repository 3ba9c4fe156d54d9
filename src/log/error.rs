use super::{Pointer, RED, RESET};
use crate::{log::Visual, region::Region};
use std::fmt::{Debug, Display, Formatter, Result};

/// Classifies an [`Error`] by the phase and cause of the failure.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// The source text does not match the grammar, or its indentation
    /// is structurally invalid. Raised during compilation.
    Syntax,
    /// An arithmetic operation cannot produce a result, such as a
    /// division by zero.
    Arithmetic,
    /// An operator was applied to values that do not support it.
    TypeMismatch,
    /// A loop was asked to iterate over a value that is not iterable.
    Iteration,
    /// A named template could not be found or registered.
    Template,
    /// Writing rendered output failed.
    Write,
    /// Any other failure, including errors raised by host functions.
    General,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ErrorKind::Syntax => write!(f, "syntax"),
            ErrorKind::Arithmetic => write!(f, "arithmetic"),
            ErrorKind::TypeMismatch => write!(f, "type mismatch"),
            ErrorKind::Iteration => write!(f, "iteration"),
            ErrorKind::Template => write!(f, "template"),
            ErrorKind::Write => write!(f, "write"),
            ErrorKind::General => write!(f, "general"),
        }
    }
}

/// Describes an error, and allows adding a contextual help text and visualization.
///
/// # Examples
///
/// Creating an [`Error`] that includes a [`Visual`] of type [`Pointer`]:
///
/// ```
/// use stanza::{Error, ErrorKind};
///
/// Error::build("unexpected token")
///     .with_kind(ErrorKind::Syntax)
///     .with_pointer("for item of items:", 9..11)
///     .with_name("list.stz")
///     .with_help("expected `in`");
/// ```
///
/// When printed with `println!("{:#}", error)` the [`Error`] produces this output:
///
/// ```text
/// error: unexpected token
///  --> list.stz:1:10
///   |
/// 1 | for item of items:
///   |          ^^---
///   |
///  = help: expected `in`
/// ```
pub struct Error {
    /// Describes the cause of the [`Error`].
    reason: String,
    /// Classification of the [`Error`].
    kind: ErrorKind,
    /// A visualization to help illustrate the [`Error`].
    visual: Option<Box<dyn Visual>>,
    /// Additional information to display with the [`Error`].
    help: Option<String>,
    /// The name of the Template that the [`Error`] comes from.
    name: Option<String>,
}

impl Error {
    /// Create a new [`Error`] with the given reason text.
    ///
    /// The kind begins as [`ErrorKind::General`]; the additional fields may
    /// be populated using the various methods defined on `Error`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::Error;
    ///
    /// Error::build("function `upper` requires string input")
    ///     .with_help("use quotes to coerce data to string");
    /// ```
    pub fn build<T>(reason: T) -> Self
    where
        T: Into<String>,
    {
        Error {
            reason: reason.into(),
            kind: ErrorKind::General,
            name: None,
            visual: None,
            help: None,
        }
    }

    /// Set the reason text, which is a short summary of the [`Error`].
    pub fn with_reason<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.reason = text.into();

        self
    }

    /// Set the [`ErrorKind`].
    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;

        self
    }

    /// Set the name text, which is the name of the [`Template`][`crate::Template`]
    /// that the [`Error`] is related to.
    pub fn with_name<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.name = Some(text.into());

        self
    }

    /// Set the [`Visual`], which is a visualization that helps illustrate the
    /// cause of the error.
    pub fn with_visual(mut self, visual: impl Visual + 'static) -> Self {
        self.visual = Some(Box::new(visual));

        self
    }

    /// Set the visualization to a new [`Pointer`] with the given source text and
    /// [`Region`].
    ///
    /// This is a shortcut for creating a `Pointer` yourself and passing it
    /// to [`with_visual`][`Error::with_visual`].
    pub fn with_pointer<T>(mut self, source: &str, region: T) -> Self
    where
        T: Into<Region>,
    {
        self.visual = Some(Box::new(Pointer::new(source, region.into())));

        self
    }

    /// Set the help text, which is contextual information to accompany the
    /// reason text.
    pub fn with_help<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.help = Some(text.into());

        self
    }

    /// Return the reason text.
    pub fn get_reason(&self) -> &str {
        &self.reason
    }

    /// Return the help text, if any.
    pub fn get_help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Return the name of the `Template` that the error is related to.
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Return the [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return true if a [`Visual`] is attached.
    pub fn has_visual(&self) -> bool {
        self.visual.is_some()
    }

    /// Return the one-indexed line and column the attached [`Visual`]
    /// points to, if any.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.visual.as_ref().and_then(|visual| visual.position())
    }

    /// Return true if the error was raised at compile time.
    pub fn is_syntax(&self) -> bool {
        self.kind == ErrorKind::Syntax
    }

    /// Return true if the error describes values of the wrong type.
    ///
    /// An [`ErrorKind::Iteration`] error is a kind of type mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::TypeMismatch | ErrorKind::Iteration)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if !f.alternate() {
            writeln!(f, "{self:#}")?;
        }
        f.debug_struct("Error")
            .field("reason", &self.reason)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("visual", &self.visual)
            .field("help", &self.help)
            .finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let header = format!("{RED}error{RESET}");
        write!(f, "{header}: {}", self.reason)?;

        match &self.visual {
            Some(visual) if f.alternate() => {
                visual.display(f, self.name.as_deref(), self.help.as_deref())
            }
            _ => Ok(()),
        }
    }
}

impl std::error::Error for Error {}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.reason == other.reason
            && self.kind == other.kind
            && self.help == other.help
            && self.name == other.name
    }
}
