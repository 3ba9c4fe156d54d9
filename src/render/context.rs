use crate::{function::Function, log::Error};
use serde::Serialize;
use serde_json::{to_value, Value};
use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
    ops::{Deref, DerefMut},
    sync::Arc,
};

/// A value that a name may be bound to within a [`Context`].
#[derive(Clone)]
pub enum Binding {
    /// Plain data.
    Value(Value),
    /// A host function that may be called from an expression.
    Function(Arc<dyn Function>),
}

impl Binding {
    /// Return the [`Value`] if the binding holds plain data.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Binding::Value(value) => Some(value),
            Binding::Function(_) => None,
        }
    }

    /// Return the [`Function`] if the binding holds a function.
    pub fn as_function(&self) -> Option<&dyn Function> {
        match self {
            Binding::Value(_) => None,
            Binding::Function(function) => Some(function.as_ref()),
        }
    }
}

impl Debug for Binding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Binding::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Binding::Function(_) => f.write_str("Function"),
        }
    }
}

impl From<Value> for Binding {
    fn from(value: Value) -> Self {
        Binding::Value(value)
    }
}

/// Provides storage for data that a [`Template`][`crate::Template`] can be
/// rendered with.
///
/// A `Context` is a stack of frames. Names are searched from the innermost
/// frame outward, so a name bound in an inner frame shadows the same name
/// in an outer frame until the inner frame is released.
///
/// A new `Context` holds a single root frame, which is never released.
#[derive(Debug, Clone)]
pub struct Context {
    frames: Vec<HashMap<String, Binding>>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a new [`Context`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::Context;
    ///
    /// let context = Context::new();
    /// assert_eq!(context.depth(), 1);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    /// Inserts a key-value pair into the innermost frame of the [`Context`].
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::Context;
    ///
    /// let mut context = Context::new();
    /// let result = context.insert("name", "taylor");
    ///
    /// assert!(result.is_ok());
    /// ```
    pub fn insert<S, T>(&mut self, key: S, value: T) -> Result<(), Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        let key = key.into();
        let value = to_value(value).map_err(|error| {
            Error::build(format!("value for `{key}` is unserializable"))
                .with_help(error.to_string())
        })?;
        self.assign(key, value);

        Ok(())
    }

    /// Inserts a key-value pair into the innermost frame of the [`Context`].
    ///
    /// # Panics
    ///
    /// Panics if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::Context;
    ///
    /// let mut context = Context::new();
    /// context.insert_must("name", "taylor");
    /// ```
    #[inline]
    pub fn insert_must<S, T>(&mut self, key: S, value: T)
    where
        S: Into<String>,
        T: Serialize,
    {
        if let Err(error) = self.insert(key, value) {
            panic!("{error}");
        }
    }

    /// Inserts a key-value pair into the [`Context`].
    ///
    /// Returns the `Context`, so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::Context;
    ///
    /// let context = Context::new().with("name", "taylor");
    ///
    /// assert!(context.is_ok());
    /// ```
    #[inline]
    pub fn with<S, T>(mut self, key: S, value: T) -> Result<Self, Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert(key, value)?;

        Ok(self)
    }

    /// Inserts a key-value pair into the [`Context`].
    ///
    /// Returns the `Context`, so additional methods may be chained.
    ///
    /// # Panics
    ///
    /// Panics if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::Context;
    ///
    /// let context = Context::new().with_must("name", "taylor");
    /// ```
    #[inline]
    pub fn with_must<S, T>(mut self, key: S, value: T) -> Self
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert_must(key, value);

        self
    }

    /// Binds a [`Function`] to the given name in the innermost frame.
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::{function::serde::Value, Context, Error};
    ///
    /// let mut context = Context::new();
    /// context.insert_function("first", |arguments: &[Value]| -> Result<Value, Error> {
    ///     Ok(arguments.first().cloned().unwrap_or_default())
    /// });
    ///
    /// assert!(context.contains("first"));
    /// ```
    #[inline]
    pub fn insert_function<S, F>(&mut self, key: S, function: F)
    where
        S: Into<String>,
        F: Function + 'static,
    {
        self.assign(key, Binding::Function(Arc::new(function)));
    }

    /// Binds a [`Function`] to the given name.
    ///
    /// Returns the `Context`, so additional methods may be chained.
    #[inline]
    pub fn with_function<S, F>(mut self, key: S, function: F) -> Self
    where
        S: Into<String>,
        F: Function + 'static,
    {
        self.insert_function(key, function);

        self
    }

    /// Push a new frame seeded with the given bindings.
    ///
    /// The returned [`Frame`] dereferences to this `Context`, and releases
    /// the frame when dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::{function::serde::json, Binding, Context};
    ///
    /// let mut context = Context::new().with_must("name", "taylor");
    /// {
    ///     let frame = context.push([("name".to_owned(), Binding::Value(json!("dylan")))]);
    ///     assert_eq!(frame.get("name"), Some(&json!("dylan")));
    /// }
    /// assert_eq!(context.get("name"), Some(&json!("taylor")));
    /// ```
    pub fn push<I>(&mut self, bindings: I) -> Frame<'_>
    where
        I: IntoIterator<Item = (String, Binding)>,
    {
        let depth = self.frames.len();
        self.frames.push(bindings.into_iter().collect());

        Frame {
            context: self,
            depth,
        }
    }

    /// Bind the name in the innermost frame, replacing any binding of the
    /// same name in that frame.
    ///
    /// Outer frames are never modified.
    pub fn assign<S, B>(&mut self, key: S, binding: B)
    where
        S: Into<String>,
        B: Into<Binding>,
    {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(key.into(), binding.into());
        }
    }

    /// Returns a reference to the [`Binding`] for the name in the nearest
    /// frame that contains it.
    pub fn lookup(&self, key: &str) -> Option<&Binding> {
        self.frames.iter().rev().find_map(|frame| frame.get(key))
    }

    /// Returns a reference to the [`Value`] corresponding to the key.
    ///
    /// Returns `None` when the nearest binding of the name is a function.
    ///
    /// # Examples
    ///
    /// ```
    /// use stanza::Context;
    ///
    /// let context = Context::new().with_must("name", "taylor");
    /// let result = context.get("name");
    ///
    /// assert_eq!(result.unwrap(), "taylor")
    /// ```
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.lookup(key).and_then(Binding::as_value)
    }

    /// Return true if any frame binds the name.
    ///
    /// A name bound to `None` is present.
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Return the number of frames, including the root frame.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Remove every frame above the given depth.
    fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth.max(1));
    }
}

/// A frame pushed onto a [`Context`].
///
/// Dereferences to the `Context`. The frame is released when the `Frame`
/// is dropped, including when rendering the block fails.
#[derive(Debug)]
pub struct Frame<'context> {
    context: &'context mut Context,
    /// Number of frames before this one was pushed.
    depth: usize,
}

impl Deref for Frame<'_> {
    type Target = Context;

    fn deref(&self) -> &Self::Target {
        self.context
    }
}

impl DerefMut for Frame<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.context
    }
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        self.context.truncate(self.depth);
    }
}

#[cfg(test)]
mod tests {
    use super::{Binding, Context};
    use crate::log::Error;
    use serde_json::{json, Value};

    #[test]
    fn test_context_insert() {
        let mut context = Context::new();
        context.insert_must("one", "two");

        assert!(context
            .get("one")
            .is_some_and(|t| t.as_str() == Some("two")));
    }

    #[test]
    fn test_context_insert_fluent() {
        assert!(Context::new()
            .with_must("three", "four")
            .get("three")
            .is_some_and(|t| t.as_str() == Some("four")))
    }

    #[test]
    fn test_context_insert_unserializable() {
        let mut map = std::collections::HashMap::new();
        map.insert((1, 2), "tuple keys are not strings");

        assert!(Context::new().insert("map", map).is_err());
    }

    #[test]
    fn test_context_null_is_present() {
        let context = Context::new().with_must("nothing", Value::Null);

        assert!(context.contains("nothing"));
        assert_eq!(context.get("nothing"), Some(&Value::Null));
        assert!(!context.contains("missing"));
        assert_eq!(context.get("missing"), None);
    }

    #[test]
    fn test_frame_shadow_and_release() {
        let mut context = Context::new().with_must("one", "one").with_must("two", "two");
        {
            let mut frame = context.push([("one".to_owned(), Binding::Value(json!("shadowed one")))]);
            assert_eq!(frame.depth(), 2);
            assert_eq!(frame.get("one"), Some(&json!("shadowed one")));
            assert_eq!(frame.get("two"), Some(&json!("two")));

            frame.assign("three", json!(3));
            assert!(frame.contains("three"));
        }

        assert_eq!(context.depth(), 1);
        assert_eq!(context.get("one"), Some(&json!("one")));
        assert_eq!(context.get("two"), Some(&json!("two")));
        assert!(!context.contains("three"));
    }

    #[test]
    fn test_frame_nested_release() {
        let mut context = Context::new();
        {
            let mut outer = context.push([]);
            {
                let inner = outer.push([]);
                assert_eq!(inner.depth(), 3);
            }
            assert_eq!(outer.depth(), 2);
        }
        assert_eq!(context.depth(), 1);
    }

    #[test]
    fn test_frame_released_on_error() {
        fn fails(context: &mut Context) -> Result<(), Error> {
            let _frame = context.push([("item".to_owned(), Binding::Value(json!(1)))]);
            Err(Error::build("failed"))
        }

        let mut context = Context::new();
        assert!(fails(&mut context).is_err());
        assert_eq!(context.depth(), 1);
        assert!(!context.contains("item"));
    }

    #[test]
    fn test_assign_innermost_only() {
        let mut context = Context::new().with_must("name", "outer");
        {
            let mut frame = context.push([]);
            frame.assign("name", json!("inner"));
            assert_eq!(frame.get("name"), Some(&json!("inner")));
        }
        assert_eq!(context.get("name"), Some(&json!("outer")));
    }

    #[test]
    fn test_function_binding() {
        let context = Context::new()
            .with_function("one", |_: &[Value]| -> Result<Value, Error> { Ok(json!(1)) });

        assert!(context.contains("one"));
        assert_eq!(context.get("one"), None);
        let function = context
            .lookup("one")
            .and_then(Binding::as_function)
            .unwrap();
        assert_eq!(function.call(&[]).unwrap(), json!(1));
    }

    #[test]
    fn test_context_clone_is_independent() {
        let seeded = Context::new().with_must("name", "taylor");
        let mut copy = seeded.clone();
        copy.insert_must("name", "dylan");

        assert_eq!(seeded.get("name"), Some(&json!("taylor")));
        assert_eq!(copy.get("name"), Some(&json!("dylan")));
    }
}
