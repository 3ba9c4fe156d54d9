//! Contains the `Function` trait and other types useful for creating and calling
//! host functions.
//!
//! A function is any type which implements the [`Function`][`crate::function::Function`]
//! trait. You can bind a function to a [`Context`][`crate::Context`] with the
//! [`insert_function`][`crate::Context::insert_function()`] method, and it may then be
//! called from any expression in a [`Template`][`crate::Template`] rendered with
//! that context.
//!
//! Given this text line:
//!
//! ```text
//! - {upper(name, "!")}
//! ```
//!
//! Stanza will search the `Context` for a function named "upper", evaluate each
//! argument from left to right, and call the function with the results.
//!
//! When "upper" is not bound, or is bound to a plain value instead of a function,
//! the call quietly evaluates to `None`, just like a missing variable.
//!
//! # Examples
//!
//! You can either create a struct and implement the trait on that, or just create
//! a function matching the trait signature. Stanza will accept both.
//!
//! ```rust
//! use stanza::{
//!     compile,
//!     function::{
//!         serde::{json, Value},
//!         Error,
//!     },
//!     Context,
//! };
//!
//! fn upper(arguments: &[Value]) -> Result<Value, Error> {
//!     match arguments {
//!         [Value::String(string)] => Ok(json!(string.to_uppercase())),
//!         _ => Err(Error::build("function `upper` requires one string argument")
//!                 .with_help("use quotes to coerce data to string")),
//!     }
//! }
//!
//! let template = compile("- {upper(name)}").unwrap();
//! let mut context = Context::new()
//!     .with_must("name", "taylor")
//!     .with_function("upper", upper);
//!
//! assert_eq!(template.render(&mut context).unwrap(), "TAYLOR");
//! ```
//!
//! If you return an [`Error`][`crate::function::Error`] without using the
//! [`with_visual`][`crate::function::Error::with_visual`] method to set your own
//! visualization, Stanza will automatically generate one that points to the call.
//!
//! If you were to pass a number to the function and print the error with `{:#}`,
//! you would see:
//!
//! ```text
//! error: function `upper` requires one string argument
//!  --> ?:1:4
//!   |
//! 1 | - {upper(10)}
//!   |    ^^^^^^^^^
//!   |
//!  = help: use quotes to coerce data to string
//! ```

pub mod serde {
    //! Contains types from `serde_json`.
    pub use serde_json::*;
}
pub mod visual {
    //! Contains the `Visual` trait and different types which implement `Visual`.
    pub use crate::log::{Pointer, Visual};
}

pub use crate::{log::Error, region::Region};

use serde_json::Value;

/// Describes a host function which can be called from an expression.
pub trait Function: Sync + Send {
    /// Execute the function with the evaluated arguments and return a new
    /// Value as output.
    fn call(&self, arguments: &[Value]) -> Result<Value, Error>;
}

/// Allows binding any function matching the signature of `call` as a `Function`,
/// instead of requiring a struct be created.
impl<F> Function for F
where
    F: Fn(&[Value]) -> Result<Value, Error> + Sync + Send,
{
    fn call(&self, arguments: &[Value]) -> Result<Value, Error> {
        self(arguments)
    }
}
