//! Stanza - Indentation Structured Template Engine
//!
//! Templates are written as indented blocks of tags, control flow and text
//! lines, and render to HTML:
//!
//! ```
//! use stanza::{compile, Context};
//!
//! let template = compile(concat!(
//!     "ul(class=\"people\"):\n",
//!     "    for person in people:\n",
//!     "        li:\n",
//!     "            - {person}\n",
//! ))
//! .unwrap();
//!
//! let mut context = Context::new().with_must("people", ["taylor", "dylan"]);
//! assert_eq!(
//!     template.render(&mut context).unwrap(),
//!     "<ul class=\"people\"><li>taylor</li><li>dylan</li></ul>"
//! );
//! ```
mod compile;
mod engine;
mod log;
mod pipe;
mod region;
mod render;
mod syntax;

pub mod function;

pub use crate::{
    compile::{compile, compile_with, Keyword, Operator, Template},
    engine::Engine,
    function::Function,
    log::{Error, ErrorKind, Pointer, Visual},
    region::Region,
    render::{render, Binding, Context, Frame},
    syntax::{Builder, Syntax},
};
