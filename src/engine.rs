use crate::{
    compile::{Parser, Template},
    log::{error_missing_template, Error, ErrorKind},
    render::Renderer,
    Context, Syntax,
};
use std::collections::HashMap;

/// Facilitates compiling and rendering templates, and provides storage
/// for named templates.
///
/// Every template is compiled with the [`Syntax`] the `Engine` was
/// created with.
#[derive(Debug, Default)]
pub struct Engine<'source> {
    /// Marker characters used to compile templates.
    syntax: Syntax,
    /// Templates that this Engine is aware of.
    templates: HashMap<String, Template<'source>>,
}

impl<'source> Engine<'source> {
    /// Create a new instance of [`Engine`] with the given [`Syntax`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::{Builder, Context, Engine};
    ///
    /// let engine = Engine::new(Builder::new().text_marker('|').to_syntax());
    /// let template = engine.compile("| hello").unwrap();
    ///
    /// assert_eq!(engine.render(&template, &mut Context::new()).unwrap(), "hello");
    /// ```
    #[inline]
    pub fn new(syntax: Syntax) -> Self {
        Self {
            syntax,
            templates: HashMap::new(),
        }
    }

    /// Return the [`Syntax`] used to compile templates.
    #[inline]
    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// Compile a new [`Template`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when compilation fails, which most likely means the source
    /// contains invalid syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::Engine;
    ///
    /// let engine = Engine::default();
    /// let template = engine.compile("- hello, {name}!");
    /// assert!(template.is_ok());
    /// ```
    #[inline]
    pub fn compile(&self, text: &'source str) -> Result<Template<'source>, Error> {
        Parser::new(text, self.syntax).compile(None)
    }

    /// Render a [`Template`] with the given [`Context`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if rendering fails, which may happen when a
    /// [`Function`][`crate::Function`] returns an `Error` itself, or the template
    /// cannot be rendered for a reason that will be described by the `Error`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::{Context, Engine};
    ///
    /// let engine = Engine::default();
    /// let template = engine.compile("- hello, {name}!").unwrap();
    /// let result = engine.render(&template, &mut Context::new().with_must("name", "taylor"));
    ///
    /// assert_eq!(result.unwrap(), "hello, taylor!")
    /// ```
    #[inline]
    pub fn render(&self, template: &Template, context: &mut Context) -> Result<String, Error> {
        Renderer::new(template).render(context)
    }

    /// Render the [`Template`] with the given name.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if no `Template` with the given name exists, or
    /// rendering fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::{Context, Engine};
    ///
    /// let mut engine = Engine::default();
    /// engine.add_template_must("greeting", "- hello, {name}!").unwrap();
    ///
    /// let result = engine.render_named("greeting", &mut Context::new().with_must("name", "taylor"));
    /// assert_eq!(result.unwrap(), "hello, taylor!");
    /// ```
    pub fn render_named(&self, name: &str, context: &mut Context) -> Result<String, Error> {
        match self.get_template(name) {
            Some(template) => self.render(template, context),
            None => Err(error_missing_template(name)),
        }
    }

    /// Compile and store a new [`Template`] with the given name.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a `Template` with the given name already exists,
    /// or when compilation fails, which most likely means the source contains invalid
    /// syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::Engine;
    ///
    /// let mut engine = Engine::default();
    /// let result = engine.add_template("template_name", "- hello, {name}!");
    /// assert!(result.is_ok());
    ///
    /// let second = engine.add_template("template_name", "- hello again");
    /// assert!(second.is_err());
    /// ```
    pub fn add_template(&mut self, name: &'source str, text: &'source str) -> Result<(), Error> {
        if self.templates.contains_key(name) {
            return Err(Error::build("duplicate template")
                .with_kind(ErrorKind::Template)
                .with_name(name)
                .with_help(format!(
                    "template with name `{name}` already exists in engine, \
                    overwrite it with `.add_template_must`"
                )));
        }

        self.add_template_must(name, text)
    }

    /// Compile and store a new [`Template`] with the given name.
    ///
    /// If a `Template` with the given name already exists in the [`Engine`],
    /// it is overwritten.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when compilation fails, which most likely means the source
    /// contains invalid syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::Engine;
    ///
    /// let mut engine = Engine::default();
    /// engine.add_template_must("template_name", "- hello, {name}!").unwrap();
    /// engine.add_template_must("template_name", "- hello again").unwrap();
    /// ```
    pub fn add_template_must(
        &mut self,
        name: &'source str,
        text: &'source str,
    ) -> Result<(), Error> {
        let template = Parser::new(text, self.syntax).compile(Some(name))?;
        tracing::debug!(name, replaced = self.templates.contains_key(name), "registered template");

        self.templates.insert(name.to_owned(), template);
        Ok(())
    }

    /// Return the named [`Template`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::Engine;
    ///
    /// let mut engine = Engine::default();
    /// engine.add_template_must("template_name", "- hello, {name}!").unwrap();
    ///
    /// let template = engine.get_template("template_name");
    /// assert!(template.is_some());
    /// ```
    #[inline]
    pub fn get_template(&self, name: &str) -> Option<&Template<'source>> {
        self.templates.get(name)
    }
}

#[cfg(test)]
mod tests {
    use crate::{engine::Engine, log::ErrorKind, Builder, Context};

    #[test]
    fn test_add() {
        let mut engine = Engine::default();
        engine.add_template_must("faux", "- a").unwrap();

        assert!(engine.get_template("faux").is_some());
        assert!(engine.get_template("ghost").is_none())
    }

    #[test]
    fn test_add_duplicate() {
        let mut engine = Engine::default();
        engine.add_template("faux", "- a").unwrap();
        let error = engine.add_template("faux", "- b").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Template);
        assert_eq!(
            engine.render_named("faux", &mut Context::new()).unwrap(),
            "a"
        );
    }

    #[test]
    fn test_add_overwrite() {
        let mut engine = Engine::default();
        engine.add_template_must("faux", "- a").unwrap();
        assert_eq!(
            engine.render_named("faux", &mut Context::new()).unwrap(),
            "a"
        );

        engine.add_template_must("faux", "- b").unwrap();
        assert_eq!(
            engine.render_named("faux", &mut Context::new()).unwrap(),
            "b"
        );
    }

    #[test]
    fn test_add_invalid_is_named() {
        let mut engine = Engine::default();
        let error = engine.add_template("broken", "if:\n").unwrap_err();

        assert!(error.is_syntax());
        assert_eq!(error.get_name(), Some("broken"));
        assert!(engine.get_template("broken").is_none());
    }

    #[test]
    fn test_render_missing() {
        let error = Engine::default()
            .render_named("ghost", &mut Context::new())
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Template);
    }

    #[test]
    fn test_render_error_is_named() {
        let mut engine = Engine::default();
        engine.add_template_must("math", "- {1 / 0}").unwrap();
        let error = engine
            .render_named("math", &mut Context::new())
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Arithmetic);
        assert_eq!(error.get_name(), Some("math"));
        assert!(format!("{error:#}").contains("--> math:1:4"));
    }

    #[test]
    fn test_engine_syntax() {
        let syntax = Builder::new().text_marker('|').splice('[', ']').to_syntax();
        let mut engine = Engine::new(syntax);
        engine.add_template_must("custom", "| hello [name]").unwrap();

        let mut context = Context::new().with_must("name", "taylor");
        assert_eq!(
            engine.render_named("custom", &mut context).unwrap(),
            "hello taylor"
        );
        assert!(engine.compile("- hello").is_err());
    }
}
