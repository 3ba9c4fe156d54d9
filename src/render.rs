mod arithmetic;
mod context;

pub use self::context::{Binding, Context, Frame};

use crate::{
    compile::{
        tree::{Expression, ForLoop, IfElse, Part, Tag, TextLine, Tree},
        Scope, Template,
    },
    log::{error_write, Error, ErrorKind, INCOMPATIBLE_TYPES},
    pipe::Pipe,
};
use serde_json::{Map, Value};
use std::{borrow::Cow, fmt::Write};

use self::arithmetic::{apply_operator, is_truthy, iterate, type_name};

/// Render a [`Template`].
///
/// Provides a shortcut to quickly render a `Template` when no advanced features
/// are needed.
///
/// # Examples
///
/// ```
/// use stanza::{compile, render, Context};
///
/// let template = compile("- hello, {name}!");
/// assert!(template.is_ok());
///
/// let mut context = Context::new().with_must("name", "taylor");
/// let output = render(&template.unwrap(), &mut context);
/// assert_eq!(output.unwrap(), "hello, taylor!");
/// ```
pub fn render(template: &Template, context: &mut Context) -> Result<String, Error> {
    Renderer::new(template).render(context)
}

pub struct Renderer<'template, 'source> {
    /// The template being rendered.
    template: &'template Template<'source>,
}

impl<'template, 'source> Renderer<'template, 'source> {
    /// Create a new Renderer.
    pub fn new(template: &'template Template<'source>) -> Self {
        Renderer { template }
    }

    /// Render the [`Template`] stored inside the [`Renderer`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if rendering any of the [`Tree`] instances within the `Template`
    /// fails, or writing the rendered `Tree` to the buffer fails.
    pub fn render(&self, context: &mut Context) -> Result<String, Error> {
        tracing::trace!(
            name = self.template.name.unwrap_or("<anonymous>"),
            depth = context.depth(),
            "rendering template"
        );

        let mut buffer = String::with_capacity(self.template.source.len());
        let mut pipe = Pipe::new(&mut buffer);

        match self.render_scope(&self.template.scope, context, &mut pipe) {
            Ok(()) => Ok(buffer),
            Err(error) => Err(match self.template.name {
                Some(name) if error.get_name().is_none() => error.with_name(name),
                _ => error,
            }),
        }
    }

    /// Render the given [`Scope`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if any of the [`Tree`] instances in the `Scope` cannot be rendered.
    fn render_scope(
        &self,
        scope: &Scope,
        context: &mut Context,
        pipe: &mut Pipe,
    ) -> Result<(), Error> {
        for tree in scope.data.iter() {
            match tree {
                Tree::Tag(tag) => self.render_tag(tag, context, pipe)?,
                Tree::Text(text) => self.render_text(text, context, pipe)?,
                Tree::If(if_else) => self.render_if(if_else, context, pipe)?,
                Tree::For(for_loop) => self.render_for(for_loop, context, pipe)?,
                Tree::Assign(assign) => {
                    let value = self.evaluate(&assign.value, context)?.into_owned();
                    context.assign(assign.identifier.name.as_str(), value);
                }
            }
        }

        Ok(())
    }

    /// Render a [`Tag`] with its attributes and body.
    fn render_tag(&self, tag: &Tag, context: &mut Context, pipe: &mut Pipe) -> Result<(), Error> {
        write!(pipe, "<{}", tag.name.name).map_err(|_| error_write())?;
        for attribute in tag.attributes.iter() {
            let value = self.evaluate(&attribute.value, context)?;
            write!(pipe, " {}=\"", attribute.key.name).map_err(|_| error_write())?;
            pipe.write_value(&value).map_err(|_| error_write())?;
            pipe.write_char('"').map_err(|_| error_write())?;
        }
        pipe.write_char('>').map_err(|_| error_write())?;

        self.render_scope(&tag.body, context, pipe)?;

        write!(pipe, "</{}>", tag.name.name).map_err(|_| error_write())
    }

    /// Render a [`TextLine`].
    ///
    /// One leading space is removed from the assembled line, so `- text`
    /// renders as `text`.
    fn render_text(
        &self,
        text: &TextLine,
        context: &Context,
        pipe: &mut Pipe,
    ) -> Result<(), Error> {
        let mut line = String::new();
        let mut line_pipe = Pipe::new(&mut line);
        for part in text.parts.iter() {
            let result = match part {
                Part::Text(raw) => line_pipe.write_str(raw),
                Part::Splice(expression) => {
                    let value = self.evaluate(expression, context)?;
                    line_pipe.write_value(&value)
                }
            };
            result.map_err(|_| error_write())?;
        }

        let line = line.strip_prefix(' ').unwrap_or(&line);
        pipe.write_str(line).map_err(|_| error_write())
    }

    /// Render the branch of an [`IfElse`] selected by its condition.
    fn render_if(
        &self,
        if_else: &IfElse,
        context: &mut Context,
        pipe: &mut Pipe,
    ) -> Result<(), Error> {
        let condition = self.evaluate(&if_else.condition, context)?;
        if is_truthy(&condition) {
            return self.render_scope(&if_else.then_branch, context, pipe);
        }
        match &if_else.else_branch {
            Some(else_branch) => self.render_scope(else_branch, context, pipe),
            None => Ok(()),
        }
    }

    /// Render the body of a [`ForLoop`] once for every item.
    ///
    /// Each iteration receives a new frame binding the identifier to the
    /// item, which is released before the next iteration begins.
    fn render_for(
        &self,
        for_loop: &ForLoop,
        context: &mut Context,
        pipe: &mut Pipe,
    ) -> Result<(), Error> {
        let iterable = self.evaluate(&for_loop.iterable, context)?.into_owned();
        let items = iterate(iterable)
            .map_err(|error| error.with_pointer(self.template.source, for_loop.iterable.get_region()))?;

        for item in items {
            let mut frame = context.push([(
                for_loop.identifier.name.clone(),
                Binding::Value(item),
            )]);
            tracing::trace!(
                identifier = for_loop.identifier.name.as_str(),
                depth = frame.depth(),
                "entered loop frame"
            );
            self.render_scope(&for_loop.body, &mut frame, pipe)?;
        }

        Ok(())
    }

    /// Evaluate an [`Expression`] to return a [`Value`].
    ///
    /// Values that already exist in the template or [`Context`] are borrowed.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when an operator is applied to incompatible values,
    /// a dictionary key is not a scalar, or a host function fails.
    fn evaluate<'a>(
        &self,
        expression: &'a Expression,
        context: &'a Context,
    ) -> Result<Cow<'a, Value>, Error> {
        let value = match expression {
            Expression::Literal(literal) => Cow::Borrowed(&literal.value),
            Expression::Variable(identifier) => match context.get(&identifier.name) {
                Some(value) => Cow::Borrowed(value),
                None => Cow::Owned(Value::Null),
            },
            Expression::Array(array) => {
                let items = array
                    .items
                    .iter()
                    .map(|item| self.evaluate(item, context).map(Cow::into_owned))
                    .collect::<Result<Vec<Value>, Error>>()?;
                Cow::Owned(Value::Array(items))
            }
            Expression::Dictionary(dictionary) => {
                let mut map = Map::with_capacity(dictionary.entries.len());
                for (key, value) in dictionary.entries.iter() {
                    let key_as = self.evaluate_key(key, context)?;
                    let value_as = self.evaluate(value, context)?.into_owned();
                    map.insert(key_as, value_as);
                }
                Cow::Owned(Value::Object(map))
            }
            Expression::Binary(binary) => {
                let left = self.evaluate(&binary.left, context)?;
                let right = self.evaluate(&binary.right, context)?;
                let result = apply_operator(&left, binary.operator, &right).map_err(|error| {
                    error.with_pointer(self.template.source, expression.get_region())
                })?;
                Cow::Owned(result)
            }
            Expression::Call(call) => {
                let function = context
                    .lookup(&call.name.name)
                    .and_then(Binding::as_function);
                let Some(function) = function else {
                    return Ok(Cow::Owned(Value::Null));
                };

                let arguments = call
                    .arguments
                    .iter()
                    .map(|argument| self.evaluate(argument, context).map(Cow::into_owned))
                    .collect::<Result<Vec<Value>, Error>>()?;
                let result = function.call(&arguments).map_err(|error| {
                    if error.has_visual() {
                        error
                    } else {
                        error.with_pointer(self.template.source, call.region)
                    }
                })?;
                Cow::Owned(result)
            }
        };

        Ok(value)
    }

    /// Evaluate the key of a dictionary entry to return its text form.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the key is not a string, number or boolean.
    fn evaluate_key(&self, key: &Expression, context: &Context) -> Result<String, Error> {
        match &*self.evaluate(key, context)? {
            Value::String(string) => Ok(string.clone()),
            Value::Number(number) => Ok(number.to_string()),
            Value::Bool(true) => Ok("True".to_owned()),
            Value::Bool(false) => Ok("False".to_owned()),
            other => Err(Error::build(INCOMPATIBLE_TYPES)
                .with_kind(ErrorKind::TypeMismatch)
                .with_pointer(self.template.source, key.get_region())
                .with_help(format!(
                    "a dictionary key must be a string, number or boolean, found {}",
                    type_name(other)
                ))),
        }
    }
}
