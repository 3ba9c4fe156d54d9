use super::Scope;
use crate::{log::Error, render::Renderer, Context};

/// A compiled [`Template`] that can be rendered with a [`Context`].
///
/// A `Template` is never modified after compilation, so it can be shared
/// and rendered any number of times, as long as each render receives
/// its own `Context`.
#[derive(Debug, Clone)]
pub struct Template<'source> {
    /// The name of the [`Template`].
    pub name: Option<&'source str>,
    /// The Abstract Syntax Tree generated during compilation.
    pub scope: Scope,
    /// Reference to the source data from which this [`Template`] was generated.
    pub source: &'source str,
}

impl<'source> Template<'source> {
    /// Render the [`Template`] with the given [`Context`].
    ///
    /// Assignments made by the template remain in the root frame of the
    /// `Context` when rendering completes.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when an expression cannot be evaluated, such as
    /// a division by zero or a loop over a number.
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::{compile, Context};
    ///
    /// let template = compile("li(class=\"name\"):\n    - {name}\n").unwrap();
    /// let mut context = Context::new().with_must("name", "<taylor>");
    ///
    /// assert_eq!(
    ///     template.render(&mut context).unwrap(),
    ///     "<li class=\"name\">&lt;taylor&gt;</li>"
    /// );
    /// ```
    pub fn render(&self, context: &mut Context) -> Result<String, Error> {
        Renderer::new(self).render(context)
    }
}
