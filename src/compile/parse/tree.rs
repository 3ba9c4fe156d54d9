use crate::{
    compile::{Operator, Scope},
    region::Region,
};
use serde_json::Value;

/// The Abstract Syntax Tree.
///
/// Each variant is a statement that renders output, or changes the
/// `Context` it is rendered with.
#[derive(Debug, Clone)]
pub enum Tree {
    /// An HTML element with attributes and a body.
    Tag(Tag),
    /// A line of text with spliced expressions.
    Text(TextLine),
    /// An if, elif or else statement.
    If(IfElse),
    /// A for loop.
    For(ForLoop),
    /// A variable assignment.
    Assign(Assign),
}

/// An HTML element, rendered as `<name attr="value">body</name>`.
#[derive(Debug, Clone)]
pub struct Tag {
    /// Name of the element.
    pub name: Identifier,
    /// Attributes in declaration order.
    pub attributes: Vec<Attribute>,
    /// Content of the element, empty when the tag has no block.
    pub body: Scope,
}

/// A `key="value"` pair within a [`Tag`].
#[derive(Debug, Clone)]
pub struct Attribute {
    pub key: Identifier,
    pub value: Expression,
}

/// A line of text, such as `- Hello {name}!`.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub parts: Vec<Part>,
    pub region: Region,
}

/// Fragment of a [`TextLine`].
#[derive(Debug, Clone)]
pub enum Part {
    /// Text written directly in the template, emitted as written.
    Text(String),
    /// An expression whose value is escaped and emitted.
    Splice(Expression),
}

/// Conditional rendering statement.
///
/// An `elif` is stored as an else branch holding another `IfElse`.
#[derive(Debug, Clone)]
pub struct IfElse {
    pub condition: Expression,
    pub then_branch: Scope,
    pub else_branch: Option<Scope>,
}

/// Loop rendering statement.
#[derive(Debug, Clone)]
pub struct ForLoop {
    /// Name bound to each item.
    pub identifier: Identifier,
    /// Value being iterated on.
    pub iterable: Expression,
    pub body: Scope,
}

/// Binds a name in the innermost frame of the `Context`.
#[derive(Debug, Clone)]
pub struct Assign {
    pub identifier: Identifier,
    pub value: Expression,
}

/// A name, and the area of source it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub region: Region,
}

/// Expression types, each of which resolves to a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal data located directly in the template source.
    Literal(Literal),
    /// A list of expressions, such as `[1, name]`.
    Array(Array),
    /// A mapping of expressions, such as `{"a": name}`.
    Dictionary(Dictionary),
    /// A value located in the `Context`.
    Variable(Identifier),
    /// Arithmetic on two expressions.
    Binary(Binary),
    /// A call to a host function located in the `Context`.
    Call(Call),
}

impl Expression {
    /// Get the Region from the underlying Expression kind.
    pub fn get_region(&self) -> Region {
        match self {
            Expression::Literal(literal) => literal.region,
            Expression::Array(array) => array.region,
            Expression::Dictionary(dictionary) => dictionary.region,
            Expression::Variable(identifier) => identifier.region,
            Expression::Binary(binary) => binary.left.get_region().combine(binary.right.get_region()),
            Expression::Call(call) => call.region,
        }
    }

    /// Create an [`Expression::Binary`] from two operands.
    pub fn binary(operator: Operator, left: Expression, right: Expression) -> Self {
        Expression::Binary(Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

/// Literal data that does not need to be evaluated any further.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Value,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    pub items: Vec<Expression>,
    pub region: Region,
}

/// Key/value pairs in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    pub entries: Vec<(Expression, Expression)>,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub operator: Operator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// Call to a function bound in the `Context`, such as `upper(name)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: Identifier,
    pub arguments: Vec<Expression>,
    /// Area spanning the name through the closing parenthesis.
    pub region: Region,
}
