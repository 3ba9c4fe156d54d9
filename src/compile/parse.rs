//! Stanza parser.
//!
//! Utilizes a Lexer to receive instances of Token and Region, which it uses
//! to construct a new Template containing the Abstract Syntax Tree.
//!
//! The template can be combined with a Context to produce output.
pub mod scope;
pub mod tree;

use crate::{
    compile::{
        lex::{token::Token, LexResult, LexResultMust, Lexer},
        parse::{
            scope::Scope,
            tree::{
                Array, Assign, Attribute, Call, Dictionary, Expression, ForLoop, Identifier,
                IfElse, Literal, Part, Tag, TextLine, Tree,
            },
        },
        Keyword, Operator, Template,
    },
    log::{
        error_eof, error_syntax, expected_found, expected_statement, Error, INVALID_SYNTAX,
        UNEXPECTED_TOKEN,
    },
    region::Region,
    Syntax,
};
use serde_json::{Number, Value};

pub struct Parser<'source> {
    /// Lexer used to pull from source as tokens instead of raw text.
    lexer: Lexer<'source>,
    /// Marker characters, needed to unescape text.
    syntax: Syntax,
    /// Store peeked tokens.
    ///
    /// Double option is used to remember when the next token is None.
    buffer: Option<Option<(Token, Region)>>,
}

impl<'source> Parser<'source> {
    /// Create a new Parser from the given string and [`Syntax`].
    #[inline]
    pub fn new(source: &'source str, syntax: Syntax) -> Self {
        Self {
            lexer: Lexer::new(source, syntax),
            syntax,
            buffer: None,
        }
    }

    /// Compile the template.
    ///
    /// Returns a new Template, which can be rendered with a Context
    /// to receive output.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind `Syntax` when the source does not match
    /// the grammar. The name is attached to the error when given.
    pub fn compile(mut self, name: Option<&'source str>) -> Result<Template<'source>, Error> {
        let scope = match self.parse_lines() {
            Ok(scope) => scope,
            Err(error) => {
                return Err(match name {
                    Some(name) => error.with_name(name),
                    None => error,
                })
            }
        };
        tracing::debug!(
            name = name.unwrap_or("<anonymous>"),
            statements = scope.data.len(),
            "compiled template"
        );

        Ok(Template {
            name,
            scope,
            source: self.lexer.source,
        })
    }

    /// Parse every statement until the end of source.
    fn parse_lines(&mut self) -> Result<Scope, Error> {
        let mut scope = Scope::new();
        while self.peek()?.is_some() {
            scope.data.push(self.parse_statement()?);
        }

        Ok(scope)
    }

    /// Parse a single statement, which is one line and any block
    /// belonging to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not begin with a statement.
    fn parse_statement(&mut self) -> Result<Tree, Error> {
        let tree = match self.next_any_must()? {
            (Token::Keyword(Keyword::Var), _) => Tree::Assign(self.parse_assign()?),
            (Token::Keyword(Keyword::If), _) => Tree::If(self.parse_if()?),
            (Token::Keyword(Keyword::For), _) => Tree::For(self.parse_for()?),
            (Token::Identifier, region) => Tree::Tag(self.parse_tag(region)?),
            (Token::Marker, region) => Tree::Text(self.parse_text(region)?),
            (Token::Keyword(keyword @ (Keyword::Elif | Keyword::Else)), region) => {
                return Err(self
                    .error_unexpected(region)
                    .with_help(format!("found `{keyword}` without a matching `if`")))
            }
            (Token::Indent, region) => {
                return Err(error_syntax(INVALID_SYNTAX, self.lexer.source, region)
                    .with_help("unexpected indent, only the body of a block may be indented"))
            }
            (token, region) => {
                return Err(self
                    .error_unexpected(region)
                    .with_help(expected_statement(token)))
            }
        };

        Ok(tree)
    }

    /// Parse the block belonging to a statement.
    ///
    /// The block begins with a colon, followed by the end of the line and
    /// one or more lines with deeper indentation.
    fn parse_block(&mut self) -> Result<Scope, Error> {
        // li(class="row"):
        //                |
        //                from
        //     - hello
        //            |
        //            to
        self.next_must(Token::Colon)?;
        self.next_must(Token::Newline)?;

        match self.next()? {
            Some((Token::Indent, _)) => (),
            Some((_, region)) => {
                return Err(error_syntax(INVALID_SYNTAX, self.lexer.source, region)
                    .with_help("expected an indented block"))
            }
            None => {
                return Err(error_eof(self.lexer.source).with_help("expected an indented block"))
            }
        }

        let mut scope = Scope::new();
        while !self.next_is(Token::Dedent)? {
            scope.data.push(self.parse_statement()?);
        }
        self.next_must(Token::Dedent)?;

        Ok(scope)
    }

    /// Parse an assignment.
    ///
    /// var name = "taylor"
    fn parse_assign(&mut self) -> Result<Assign, Error> {
        let identifier = self.parse_ident()?;
        self.next_must(Token::Assign)?;
        let value = self.parse_expression()?;
        self.next_must(Token::Newline)?;

        Ok(Assign { identifier, value })
    }

    /// Parse a text line, beginning after the marker.
    ///
    /// - Hello {name}!
    fn parse_text(&mut self, marker: Region) -> Result<TextLine, Error> {
        let mut parts = vec![];
        let mut region = marker;

        loop {
            match self.next_any_must()? {
                (Token::Text, next) => {
                    parts.push(Part::Text(self.unescape(next.literal(self.lexer.source))));
                    region = region.combine(next);
                }
                (Token::BeginSplice, _) => {
                    let expression = self.parse_expression()?;
                    let (_, next) = self.next_must(Token::EndSplice)?;
                    parts.push(Part::Splice(expression));
                    region = region.combine(next);
                }
                (Token::Newline, _) => break,
                (token, next) => {
                    return Err(self
                        .error_unexpected(next)
                        .with_help(expected_found("text or a splice", token)))
                }
            }
        }
        if parts.is_empty() {
            return Err(error_syntax(INVALID_SYNTAX, self.lexer.source, marker)
                .with_help("expected text after the text marker"));
        }

        Ok(TextLine { parts, region })
    }

    /// Parse an "if" statement, including every "elif" and "else" branch.
    ///
    /// Each "elif" becomes an else branch holding another [`IfElse`].
    fn parse_if(&mut self) -> Result<IfElse, Error> {
        let condition = self.parse_expression()?;
        let then_branch = self.parse_block()?;

        let else_branch = if self.next_is(Token::Keyword(Keyword::Elif))? {
            self.next_must(Token::Keyword(Keyword::Elif))?;
            let nested = self.parse_if()?;
            Some(Scope {
                data: vec![Tree::If(nested)],
            })
        } else if self.next_is(Token::Keyword(Keyword::Else))? {
            self.next_must(Token::Keyword(Keyword::Else))?;
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(IfElse {
            condition,
            then_branch,
            else_branch,
        })
    }

    /// Parse a "for" statement.
    ///
    /// for item in items:
    fn parse_for(&mut self) -> Result<ForLoop, Error> {
        let identifier = self.parse_ident()?;
        self.next_must(Token::Keyword(Keyword::In))?;
        let iterable = self.parse_expression()?;
        let body = self.parse_block()?;

        Ok(ForLoop {
            identifier,
            iterable,
            body,
        })
    }

    /// Parse a tag, beginning after the name.
    ///
    /// A tag without a colon has no body.
    ///
    /// li(class="test", id=name):
    fn parse_tag(&mut self, region: Region) -> Result<Tag, Error> {
        let name = Identifier {
            name: self.lexer.source[region].to_owned(),
            region,
        };

        let mut attributes = vec![];
        if self.next_is(Token::BeginParen)? {
            self.next_must(Token::BeginParen)?;
            while !self.next_is(Token::EndParen)? {
                let key = self.parse_ident()?;
                self.next_must(Token::Assign)?;
                let value = self.parse_expression()?;
                attributes.push(Attribute { key, value });

                if !self.next_comma()? {
                    break;
                }
            }
            self.next_must(Token::EndParen)?;
        }

        let body = if self.next_is(Token::Colon)? {
            self.parse_block()?
        } else {
            self.next_must(Token::Newline)?;
            Scope::new()
        };

        Ok(Tag {
            name,
            attributes,
            body,
        })
    }

    /// Parse an expression.
    ///
    /// An expression is a sum of products, so `*` and `/` bind tighter
    /// than `+` and `-`, and both groups are left associative.
    fn parse_expression(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_product()?;
        while let Some(operator) = self.next_operator(false)? {
            let right = self.parse_product()?;
            left = Expression::binary(operator, left, right);
        }

        Ok(left)
    }

    /// Parse a product, which is one or more atoms joined by `*` or `/`.
    fn parse_product(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_atom()?;
        while let Some(operator) = self.next_operator(true)? {
            let right = self.parse_atom()?;
            left = Expression::binary(operator, left, right);
        }

        Ok(left)
    }

    /// Consume and return the next operator if it belongs to the given
    /// precedence group.
    fn next_operator(&mut self, product: bool) -> Result<Option<Operator>, Error> {
        match self.peek()? {
            Some((Token::Operator(operator), _)) if operator.is_product() == product => {
                self.next()?;
                Ok(Some(operator))
            }
            _ => Ok(None),
        }
    }

    /// Parse an atom.
    ///
    /// ## Literal
    ///
    /// "hello world"
    ///
    /// -1000
    ///
    /// 10.2
    ///
    /// True
    ///
    /// ## Collection
    ///
    /// [1, 2, 3]
    ///
    /// {"one": 1}
    ///
    /// ## Variable or call
    ///
    /// name
    ///
    /// upper(name)
    fn parse_atom(&mut self) -> Result<Expression, Error> {
        let expression = match self.next_any_must()? {
            (Token::Number, region) => {
                Expression::Literal(self.parse_number_literal(&self.lexer.source[region], region)?)
            }
            (Token::String, region) => Expression::Literal(Literal {
                value: Value::String(self.parse_string(region)?),
                region,
            }),
            (Token::True, region) => Expression::Literal(Literal {
                value: Value::Bool(true),
                region,
            }),
            (Token::False, region) => Expression::Literal(Literal {
                value: Value::Bool(false),
                region,
            }),
            (Token::None, region) => Expression::Literal(Literal {
                value: Value::Null,
                region,
            }),
            (Token::Operator(operator @ (Operator::Add | Operator::Subtract)), region) => {
                let (_, next_region) = self.next_must(Token::Number)?;

                // -1000 | +1000  <- valid, negative/positive numbers
                // - 1000 | + 1000 <- invalid
                if !region.is_neighbor(next_region) {
                    return Err(self.error_unexpected(region).with_help(format!(
                        "if you want to indicate that {} is a positive or negative number \
                        try removing the separating whitespace",
                        &self.lexer.source[next_region]
                    )));
                }

                let merge = region.combine(next_region);
                let window = &self.lexer.source[merge];
                let window = match operator {
                    Operator::Add => &window[1..],
                    _ => window,
                };
                Expression::Literal(self.parse_number_literal(window, merge)?)
            }
            (Token::Operator(_), region) => {
                return Err(self.error_unexpected(region).with_help(format!(
                    "only `{}` or `{}` operators to indicate a positive or negative number \
                    are valid here",
                    Operator::Add,
                    Operator::Subtract
                )));
            }
            (Token::BeginParen, _) => {
                let expression = self.parse_expression()?;
                self.next_must(Token::EndParen)?;
                expression
            }
            (Token::BeginBracket, region) => Expression::Array(self.parse_array(region)?),
            (Token::BeginBrace, region) => Expression::Dictionary(self.parse_dictionary(region)?),
            (Token::Identifier, region) => {
                let identifier = Identifier {
                    name: self.lexer.source[region].to_owned(),
                    region,
                };
                if self.next_is(Token::BeginParen)? {
                    Expression::Call(self.parse_call(identifier)?)
                } else {
                    Expression::Variable(identifier)
                }
            }
            (token, region) => {
                return Err(self
                    .error_unexpected(region)
                    .with_help(expected_found("an expression", token)))
            }
        };

        Ok(expression)
    }

    /// Parse an array, beginning after the opening bracket.
    fn parse_array(&mut self, begin: Region) -> Result<Array, Error> {
        let mut items = vec![];
        while !self.next_is(Token::EndBracket)? {
            items.push(self.parse_expression()?);
            if !self.next_comma()? {
                break;
            }
        }
        let (_, end) = self.next_must(Token::EndBracket)?;

        Ok(Array {
            items,
            region: begin.combine(end),
        })
    }

    /// Parse a dictionary, beginning after the opening brace.
    fn parse_dictionary(&mut self, begin: Region) -> Result<Dictionary, Error> {
        let mut entries = vec![];
        while !self.next_is(Token::EndBrace)? {
            let key = self.parse_expression()?;
            self.next_must(Token::Colon)?;
            let value = self.parse_expression()?;
            entries.push((key, value));
            if !self.next_comma()? {
                break;
            }
        }
        let (_, end) = self.next_must(Token::EndBrace)?;

        Ok(Dictionary {
            entries,
            region: begin.combine(end),
        })
    }

    /// Parse the arguments of a call, beginning at the opening parenthesis.
    fn parse_call(&mut self, name: Identifier) -> Result<Call, Error> {
        self.next_must(Token::BeginParen)?;
        let mut arguments = vec![];
        while !self.next_is(Token::EndParen)? {
            arguments.push(self.parse_expression()?);
            if !self.next_comma()? {
                break;
            }
        }
        let (_, end) = self.next_must(Token::EndParen)?;
        let region = name.region.combine(end);

        Ok(Call {
            name,
            arguments,
            region,
        })
    }

    /// Consume the next token if it is a comma, returning true when one
    /// was found.
    fn next_comma(&mut self) -> Result<bool, Error> {
        if self.next_is(Token::Comma)? {
            self.next()?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Parse an Identifier.
    ///
    /// # Errors
    ///
    /// Propagates an error from next_must if the next token is not an
    /// Identifier.
    fn parse_ident(&mut self) -> Result<Identifier, Error> {
        let (_, region) = self.next_must(Token::Identifier)?;

        Ok(Identifier {
            name: self.lexer.source[region].to_owned(),
            region,
        })
    }

    /// Parse a String from the literal value of the given Region.
    ///
    /// # Errors
    ///
    /// Returns an error if an unrecognized escape character is found.
    fn parse_string(&self, region: Region) -> Result<String, Error> {
        let window = region.literal(self.lexer.source);
        let inner = window
            .strip_prefix('"')
            .and_then(|window| window.strip_suffix('"'))
            .unwrap_or(window);

        if !inner.contains('\\') {
            return Ok(inner.to_owned());
        }

        let mut string = String::with_capacity(inner.len());
        let mut iter = inner.chars();
        while let Some(c) = iter.next() {
            if c != '\\' {
                string.push(c);
                continue;
            }
            let c = match iter.next() {
                Some('n') => '\n',
                Some('r') => '\r',
                Some('t') => '\t',
                Some('\\') => '\\',
                Some('"') => '"',
                _ => {
                    return Err(error_syntax(INVALID_SYNTAX, self.lexer.source, region)
                        .with_reason("unexpected escape character")
                        .with_help("recognized escapes are `\\n`, `\\r`, `\\t`, `\\\\` and `\\\"`"))
                }
            };
            string.push(c);
        }

        Ok(string)
    }

    /// Parse a Literal containing a Value::Number from the given window.
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be converted to a Value::Number.
    fn parse_number_literal(&self, window: &str, region: Region) -> Result<Literal, Error> {
        let as_number: Number = window.parse().map_err(|_| {
            error_syntax(INVALID_SYNTAX, self.lexer.source, region)
                .with_reason("unrecognizable number")
                .with_help(format!(
                    "numbers may begin with `{}` to indicate a negative \
                    number and must not end with a decimal",
                    Operator::Subtract
                ))
        })?;

        Ok(Literal {
            value: Value::Number(as_number),
            region,
        })
    }

    /// Remove escapes from the raw text of a text line.
    fn unescape(&self, text: &str) -> String {
        if !text.contains('\\') {
            return text.to_owned();
        }

        let (begin, end) = self.syntax.splice();
        let mut string = String::with_capacity(text.len());
        let mut iter = text.chars().peekable();
        while let Some(c) = iter.next() {
            if c == '\\' {
                if let Some(&next) = iter.peek() {
                    if next == begin || next == end || next == '\\' {
                        string.push(next);
                        iter.next();
                        continue;
                    }
                }
            }
            string.push(c);
        }

        string
    }

    /// Return an [`Error`] pointing at an unexpected token.
    fn error_unexpected(&self, region: Region) -> Error {
        error_syntax(UNEXPECTED_TOKEN, self.lexer.source, region)
    }

    /// Peek the next token.
    ///
    /// # Errors
    ///
    /// Propagates any error reported by the underlying Lexer.
    fn peek(&mut self) -> LexResult {
        if let Some(peeked) = self.buffer {
            return Ok(peeked);
        }
        let next = self.lexer.next()?;
        self.buffer = Some(next);

        Ok(next)
    }

    /// Get the next token.
    ///
    /// Prefers to pull a token from the internal buffer first, but will pull from
    /// the lexer when the buffer is empty.
    fn next(&mut self) -> LexResult {
        match self.buffer.take() {
            Some(t) => Ok(t),
            None => self.lexer.next(),
        }
    }

    /// Returns true if the given token matches the upcoming token.
    ///
    /// # Errors
    ///
    /// Propagates any errors reported by the underlying lexer.
    fn next_is(&mut self, expect: Token) -> Result<bool, Error> {
        Ok(self
            .peek()?
            .map(|(token, _)| token == expect)
            .unwrap_or(false))
    }

    /// Get the next token, and compare it to the given token.
    ///
    /// # Errors
    ///
    /// An error is returned if the next token does not match the given token,
    /// or when [next()] returns None.
    fn next_must(&mut self, expect: Token) -> LexResultMust {
        match self.next()? {
            Some((token, region)) if token == expect => Ok((token, region)),
            Some((token, region)) => Err(self
                .error_unexpected(region)
                .with_help(expected_found(expect, token))),
            None => Err(error_eof(self.lexer.source).with_help(format!("expected {expect}"))),
        }
    }

    /// Get the next token.
    ///
    /// Similar to "next()" but requires that a token is returned.
    ///
    /// # Errors
    ///
    /// An error is returned if no more tokens are left.
    fn next_any_must(&mut self) -> LexResultMust {
        match self.next()? {
            Some(next) => Ok(next),
            None => Err(error_eof(self.lexer.source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Parser;
    use crate::{
        compile::{
            lex::token::Token,
            tree::{Expression, Part, Tree},
            Operator, Template,
        },
        log::Error,
        Builder, Syntax,
    };
    use indoc::indoc;
    use serde_json::{json, Value};

    fn helper_compile(text: &str) -> Result<Template<'_>, Error> {
        Parser::new(text, Syntax::default()).compile(None)
    }

    fn helper_expression(text: &str) -> Expression {
        let template = helper_compile(text).unwrap();
        match template.scope.data.into_iter().next() {
            Some(Tree::Assign(assign)) => assign.value,
            other => panic!("expected assignment, found {other:?}"),
        }
    }

    fn helper_literal(expression: &Expression) -> &Value {
        match expression {
            Expression::Literal(literal) => &literal.value,
            other => panic!("expected literal, found {other:?}"),
        }
    }

    #[test]
    fn test_parser_lexer_integration() {
        let mut parser = Parser::new("- hello", Syntax::default());
        assert_eq!(parser.next(), Ok(Some((Token::Marker, (0..1).into()))));
        assert_eq!(parser.next(), Ok(Some((Token::Text, (1..7).into()))));
        assert_eq!(parser.next(), Ok(Some((Token::Newline, (7..7).into()))));
        assert_eq!(parser.next(), Ok(None));
    }

    #[test]
    fn test_peek_multiple() {
        let mut parser = Parser::new("var one = two", Syntax::default());
        assert!(parser.next().is_ok());
        assert_eq!(parser.peek(), Ok(Some((Token::Identifier, (4..7).into()))));
        assert_eq!(parser.peek(), Ok(Some((Token::Identifier, (4..7).into()))));
        assert_eq!(parser.next(), Ok(Some((Token::Identifier, (4..7).into()))));
        assert_eq!(parser.next(), Ok(Some((Token::Assign, (8..9).into()))));
    }

    #[test]
    fn test_parse_tag_with_attributes() {
        let template = helper_compile(indoc! {r#"
            li(class="test", id=name):
                - Hello {msg}!
        "#})
        .unwrap();

        assert_eq!(template.scope.data.len(), 1);
        let Tree::Tag(tag) = &template.scope.data[0] else {
            panic!("expected tag");
        };
        assert_eq!(tag.name.name, "li");
        assert_eq!(tag.attributes.len(), 2);
        assert_eq!(tag.attributes[0].key.name, "class");
        assert_eq!(helper_literal(&tag.attributes[0].value), &json!("test"));
        assert!(matches!(&tag.attributes[1].value, Expression::Variable(v) if v.name == "name"));
        assert_eq!(tag.body.data.len(), 1);
    }

    #[test]
    fn test_parse_tag_without_body() {
        let template = helper_compile("br\nhr()\n").unwrap();
        assert_eq!(template.scope.data.len(), 2);
        for tree in &template.scope.data {
            let Tree::Tag(tag) = tree else {
                panic!("expected tag");
            };
            assert!(tag.body.is_empty());
            assert!(tag.attributes.is_empty());
        }
    }

    #[test]
    fn test_parse_tag_trailing_comma() {
        let template = helper_compile("a(href=\"/\", title=\"home\",)\n").unwrap();
        let Tree::Tag(tag) = &template.scope.data[0] else {
            panic!("expected tag");
        };
        assert_eq!(tag.attributes.len(), 2);
    }

    #[test]
    fn test_parse_text_parts() {
        let template = helper_compile("- Hello {name}! \\{not a splice\\}").unwrap();
        let Tree::Text(text) = &template.scope.data[0] else {
            panic!("expected text line");
        };
        assert_eq!(text.parts.len(), 3);
        assert!(matches!(&text.parts[0], Part::Text(t) if t == " Hello "));
        assert!(matches!(&text.parts[1], Part::Splice(Expression::Variable(v)) if v.name == "name"));
        assert!(matches!(&text.parts[2], Part::Text(t) if t == "! {not a splice}"));
    }

    #[test]
    fn test_parse_text_custom_syntax() {
        let syntax = Builder::new().text_marker('|').splice('[', ']').to_syntax();
        let template = Parser::new("| a [b] c", syntax).compile(None).unwrap();
        let Tree::Text(text) = &template.scope.data[0] else {
            panic!("expected text line");
        };
        assert_eq!(text.parts.len(), 3);
    }

    #[test]
    fn test_parse_empty_text_err() {
        let result = helper_compile("-\n");
        assert!(result.unwrap_err().is_syntax());
    }

    #[test]
    fn test_parse_precedence() {
        // 2 + (3 * 4)
        let Expression::Binary(sum) = helper_expression("var x = 2 + 3 * 4") else {
            panic!("expected binary");
        };
        assert_eq!(sum.operator, Operator::Add);
        assert_eq!(helper_literal(&sum.left), &json!(2));
        assert!(
            matches!(&*sum.right, Expression::Binary(product) if product.operator == Operator::Multiply)
        );
    }

    #[test]
    fn test_parse_left_associative() {
        // (10 - 4) - 3
        let Expression::Binary(outer) = helper_expression("var x = 10 - 4 - 3") else {
            panic!("expected binary");
        };
        assert_eq!(outer.operator, Operator::Subtract);
        assert_eq!(helper_literal(&outer.right), &json!(3));
        assert!(matches!(&*outer.left, Expression::Binary(_)));
    }

    #[test]
    fn test_parse_parentheses() {
        let Expression::Binary(product) = helper_expression("var x = (10 + 25) * 30") else {
            panic!("expected binary");
        };
        assert_eq!(product.operator, Operator::Multiply);
        assert!(matches!(&*product.left, Expression::Binary(sum) if sum.operator == Operator::Add));
    }

    #[test]
    fn test_parse_signed_numbers() {
        let Expression::Array(array) = helper_expression("var x = [-1, +2, 3.5,]") else {
            panic!("expected array");
        };
        assert_eq!(array.items.len(), 3);
        assert_eq!(helper_literal(&array.items[0]), &json!(-1));
        assert_eq!(helper_literal(&array.items[1]), &json!(2));
        assert_eq!(helper_literal(&array.items[2]), &json!(3.5));
    }

    #[test]
    fn test_parse_negative_num_err() {
        let result = helper_compile("var x = - 1000");
        assert!(result.unwrap_err().is_syntax());
    }

    #[test]
    fn test_parse_subtract_negative() {
        let Expression::Binary(binary) = helper_expression("var x = 1 - -2") else {
            panic!("expected binary");
        };
        assert_eq!(helper_literal(&binary.right), &json!(-2));
    }

    #[test]
    fn test_parse_bad_number_err() {
        assert!(helper_compile("var x = 1.2.3").is_err());
        assert!(helper_compile("var x = 10.").is_err());
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(helper_literal(&helper_expression("var x = True")), &json!(true));
        assert_eq!(helper_literal(&helper_expression("var x = False")), &json!(false));
        assert_eq!(helper_literal(&helper_expression("var x = None")), &Value::Null);
        assert_eq!(
            helper_literal(&helper_expression(r#"var x = "a\"b\n""#)),
            &json!("a\"b\n")
        );
    }

    #[test]
    fn test_parse_string_bad_escape_err() {
        let error = helper_compile(r#"var x = "\q""#).unwrap_err();
        assert_eq!(error.get_reason(), "unexpected escape character");
    }

    #[test]
    fn test_parse_dictionary() {
        let Expression::Dictionary(dictionary) =
            helper_expression(r#"var x = {"a": 1, "b": [2, 3]}"#)
        else {
            panic!("expected dictionary");
        };
        assert_eq!(dictionary.entries.len(), 2);
        assert_eq!(helper_literal(&dictionary.entries[0].0), &json!("a"));
        assert!(matches!(&dictionary.entries[1].1, Expression::Array(_)));
    }

    #[test]
    fn test_parse_multiline_collection() {
        let template = helper_compile(indoc! {r#"
            var x = [
                1,
                2,
            ]
            - {x}
        "#})
        .unwrap();
        assert_eq!(template.scope.data.len(), 2);
    }

    #[test]
    fn test_parse_call() {
        let Expression::Call(call) = helper_expression("var x = upper(name, \"!\")") else {
            panic!("expected call");
        };
        assert_eq!(call.name.name, "upper");
        assert_eq!(call.arguments.len(), 2);
        assert_eq!(call.region, (8..24).into());
    }

    #[test]
    fn test_parse_elif_desugars() {
        let template = helper_compile(indoc! {"
            if a:
                - a
            elif b:
                - b
            else:
                - c
        "})
        .unwrap();

        assert_eq!(template.scope.data.len(), 1);
        let Tree::If(outer) = &template.scope.data[0] else {
            panic!("expected if");
        };
        let else_branch = outer.else_branch.as_ref().unwrap();
        assert_eq!(else_branch.data.len(), 1);
        let Tree::If(inner) = &else_branch.data[0] else {
            panic!("expected nested if");
        };
        assert!(matches!(&inner.condition, Expression::Variable(v) if v.name == "b"));
        assert!(inner.else_branch.is_some());
    }

    #[test]
    fn test_parse_for() {
        let template = helper_compile(indoc! {r#"
            for i in ["hello", "world"]:
                li(class="test"):
                    - test {i}
        "#})
        .unwrap();
        let Tree::For(for_loop) = &template.scope.data[0] else {
            panic!("expected for");
        };
        assert_eq!(for_loop.identifier.name, "i");
        assert!(matches!(for_loop.iterable, Expression::Array(_)));
        assert_eq!(for_loop.body.data.len(), 1);
    }

    #[test]
    fn test_parse_sibling_after_block() {
        let template = helper_compile(indoc! {"
            ul:
                li:
                    - one
            p:
                - two
        "})
        .unwrap();
        assert_eq!(template.scope.data.len(), 2);
    }

    #[test]
    fn test_parse_missing_block_err() {
        let error = helper_compile("if a:\n- b\n").unwrap_err();
        assert!(error.is_syntax());
        assert_eq!(error.get_help(), Some("expected an indented block"));
        assert_eq!(error.position(), Some((2, 1)));
    }

    #[test]
    fn test_parse_missing_block_eof_err() {
        assert!(helper_compile("for i in items:").unwrap_err().is_syntax());
    }

    #[test]
    fn test_parse_unexpected_indent_err() {
        assert!(helper_compile("    - a\n").unwrap_err().is_syntax());
    }

    #[test]
    fn test_parse_orphan_else_err() {
        let error = helper_compile("else:\n    - a\n").unwrap_err();
        assert_eq!(error.get_help(), Some("found `else` without a matching `if`"));
    }

    #[test]
    fn test_parse_missing_colon_err() {
        let error = helper_compile("for i in items\n    - a\n").unwrap_err();
        assert!(error.is_syntax());
        assert_eq!(error.position(), Some((1, 15)));
    }

    #[test]
    fn test_parse_error_named() {
        let error = Parser::new("var = 1", Syntax::default())
            .compile(Some("index.stz"))
            .unwrap_err();
        assert_eq!(error.get_name(), Some("index.stz"));
    }

    #[test]
    fn test_parse_deterministic() {
        let text = "var x = (1 + 2) * 3\n- {x}\n";
        let one = format!("{:?}", helper_compile(text).unwrap().scope);
        let two = format!("{:?}", helper_compile(text).unwrap().scope);
        assert_eq!(one, two);
    }
}
