pub mod token;

mod state;

use crate::{
    compile::{Keyword, Operator},
    log::{
        error_eof, error_syntax, expected_found, Error, INVALID_INDENTATION, INVALID_SYNTAX,
        UNEXPECTED_TOKEN,
    },
    region::Region,
    Syntax,
};

use self::{state::CursorState, token::Token};
use std::collections::VecDeque;

pub type LexResult = Result<Option<(Token, Region)>, Error>;
pub type LexResultMust = Result<(Token, Region), Error>;

/// Provides methods to read a source string as [`Token`] instances.
///
/// Leading whitespace is converted into [`Token::Indent`] and
/// [`Token::Dedent`] instances, so a `Parser` can treat blocks as if they
/// were delimited by brackets.
pub struct Lexer<'source> {
    /// Reference to the source text.
    pub source: &'source str,
    /// Position within source.
    pub cursor: usize,
    /// Marker characters used to recognize text lines and splices.
    syntax: Syntax,
    /// Tracks the [`Lexer`] state and determines the action taken
    /// when `.next` is called.
    state: CursorState,
    /// Indentation of every open block, outermost first.
    ///
    /// The first entry is always the empty string.
    indents: Vec<&'source str>,
    /// Brackets opened within the current line that have not been closed.
    nesting: Vec<(Token, Region)>,
    /// Tokens that will be returned before any more source is read.
    buffer: VecDeque<(Token, Region)>,
    /// True when the end of source has been handled.
    finished: bool,
}

impl<'source> Lexer<'source> {
    /// Create a new [`Lexer`] from the given source and [`Syntax`].
    #[inline]
    pub fn new(source: &'source str, syntax: Syntax) -> Self {
        Self {
            source,
            cursor: 0,
            syntax,
            state: CursorState::LineStart,
            indents: vec![""],
            nesting: vec![],
            buffer: VecDeque::new(),
            finished: false,
        }
    }

    /// Return the next [`Token`] and [`Region`].
    ///
    /// Any instance of [`Token::Whitespace`] is ignored.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when an unexpected character or invalid
    /// indentation is found.
    pub fn next(&mut self) -> LexResult {
        loop {
            // Always prefer taking from the buffer when possible.
            if let Some(next) = self.buffer.pop_front() {
                return Ok(Some(next));
            }
            if self.cursor >= self.source.len() {
                if self.finished {
                    return Ok(None);
                }
                self.finish()?;
                continue;
            }

            let c = self.cursor;
            let result = match self.state {
                CursorState::LineStart => self.lex_line_start(c),
                CursorState::Statement | CursorState::Splice => self.lex_expression(c),
                CursorState::Text => self.lex_text(c),
            }?;

            match result {
                Some((Token::Whitespace, _)) | None => continue,
                Some(next) => return Ok(Some(next)),
            }
        }
    }

    /// Close the final line and every open block.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if a splice or bracket is still open.
    fn finish(&mut self) -> Result<(), Error> {
        let end = Region::at(self.source.len());

        if self.state == CursorState::Splice && self.nesting.is_empty() {
            return Err(error_eof(self.source).with_help(format!(
                "did you close the splice with `{}`?",
                self.syntax.end_splice
            )));
        }
        if let Some((token, region)) = self.nesting.last() {
            return Err(error_syntax(INVALID_SYNTAX, self.source, *region)
                .with_help(format!("this {token} is never closed")));
        }
        if self.state != CursorState::LineStart {
            self.buffer.push_back((Token::Newline, end));
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.buffer.push_back((Token::Dedent, end));
        }
        self.state = CursorState::LineStart;
        self.finished = true;

        Ok(())
    }

    /// Measure the indentation of a line and decide how the line is read.
    ///
    /// Blank lines are skipped entirely.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the indentation does not match any open block.
    fn lex_line_start(&mut self, from: usize) -> LexResult {
        let rest = &self.source[from..];
        let width = rest.len() - rest.trim_start_matches(|c: char| c == ' ' || c == '\t').len();
        let after = from + width;
        let line = &self.source[after..];

        if line.is_empty() {
            self.cursor = after;
            return Ok(None);
        }
        if line.starts_with('\n') || line.starts_with("\r\n") {
            self.cursor = after + if line.starts_with('\n') { 1 } else { 2 };
            return Ok(None);
        }

        let indent = &self.source[from..after];
        self.indent(indent, (from..after).into())?;
        self.cursor = after;

        let marker = self.syntax.text_marker;
        if line.starts_with(marker) {
            let to = after + marker.len_utf8();
            self.buffer.push_back((Token::Marker, (after..to).into()));
            self.cursor = to;
            self.state = CursorState::Text;
        } else {
            self.state = CursorState::Statement;
        }

        Ok(None)
    }

    /// Compare the indentation of a new line to the open blocks, buffering
    /// [`Token::Indent`] or [`Token::Dedent`] instances as needed.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the indentation neither extends the current
    /// block nor returns to an enclosing one.
    fn indent(&mut self, indent: &'source str, region: Region) -> Result<(), Error> {
        let top = self.indents.last().copied().unwrap_or_default();
        if indent == top {
            return Ok(());
        }
        if indent.starts_with(top) {
            self.indents.push(indent);
            self.buffer.push_back((Token::Indent, region));
            return Ok(());
        }

        while let Some(&top) = self.indents.last() {
            if top == indent {
                return Ok(());
            }
            if self.indents.len() == 1 || !top.starts_with(indent) {
                return Err(error_syntax(INVALID_INDENTATION, self.source, region).with_help(
                    "indentation does not match any outer block, \
                    did you mix tabs and spaces?",
                ));
            }
            self.indents.pop();
            self.buffer.push_back((Token::Dedent, Region::at(region.end)));
        }

        Ok(())
    }

    /// Return the next [`Token`] and [`Region`] within the raw text of a
    /// text line.
    ///
    /// Text is read until the end of the line or the beginning of a splice.
    fn lex_text(&mut self, from: usize) -> LexResult {
        let (begin, end) = self.syntax.splice();
        let mut iterator = self.source[from..]
            .char_indices()
            .map(|(d, c)| (from + d, c))
            .peekable();

        while let Some((index, char)) = iterator.next() {
            match char {
                '\\' => {
                    // Skip the escaped character so it is never mistaken for a marker.
                    if let Some(&(_, next)) = iterator.peek() {
                        if next == begin || next == end || next == '\\' {
                            iterator.next();
                        }
                    }
                }
                '\n' => {
                    let to = if self.source[..index].ends_with('\r') {
                        index - 1
                    } else {
                        index
                    };
                    if to > from {
                        self.cursor = index;
                        return Ok(Some((Token::Text, (from..to).into())));
                    }
                    self.cursor = index + 1;
                    self.state = CursorState::LineStart;

                    return Ok(Some((Token::Newline, (index..index + 1).into())));
                }
                c if c == begin => {
                    if index > from {
                        self.cursor = index;
                        return Ok(Some((Token::Text, (from..index).into())));
                    }
                    let to = index + c.len_utf8();
                    self.cursor = to;
                    self.state = CursorState::Splice;

                    return Ok(Some((Token::BeginSplice, (index..to).into())));
                }
                _ => continue,
            }
        }

        let to = self.source.len();
        self.cursor = to;

        Ok(Some((Token::Text, (from..to).into())))
    }

    /// Return the next [`Token`] and [`Region`] within a statement or splice.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when an unexpected [`Token`] is found.
    fn lex_expression(&mut self, from: usize) -> LexResult {
        let mut iterator = self.source[from..]
            .char_indices()
            .map(|(d, c)| (from + d, c));
        let Some((index, char)) = iterator.next() else {
            return Ok(None);
        };

        if self.state == CursorState::Splice
            && self.nesting.is_empty()
            && char == self.syntax.end_splice
        {
            self.state = CursorState::Text;
            return self.advance(from, char.len_utf8(), Token::EndSplice);
        }

        match char {
            '*' => self.advance(from, 1, Token::Operator(Operator::Multiply)),
            '+' => self.advance(from, 1, Token::Operator(Operator::Add)),
            '/' => self.advance(from, 1, Token::Operator(Operator::Divide)),
            '-' => self.advance(from, 1, Token::Operator(Operator::Subtract)),
            '=' => self.advance(from, 1, Token::Assign),
            ',' => self.advance(from, 1, Token::Comma),
            ':' => self.advance(from, 1, Token::Colon),
            '(' => self.open(from, Token::BeginParen),
            '[' => self.open(from, Token::BeginBracket),
            '{' => self.open(from, Token::BeginBrace),
            ')' => self.close(from, Token::EndParen),
            ']' => self.close(from, Token::EndBracket),
            '}' => self.close(from, Token::EndBrace),
            '"' => self.lex_string(iterator, index),
            '\n' => self.lex_newline(from),
            ' ' | '\t' | '\r' => Ok(Some(self.lex_whitespace(iterator, index))),
            c if c.is_ascii_digit() => Ok(Some(self.lex_digit(iterator, index))),
            c if is_ident_start(c) => Ok(Some(self.lex_ident_or_keyword(iterator, index))),
            _ => Err(
                error_syntax(UNEXPECTED_TOKEN, self.source, index..index + char.len_utf8())
                    .with_help(
                        "expected one of `*`, `+`, `/`, `-`, `=`, `,`, `:`, a bracket, \
                        an identifier, an ascii digit, or beginning of a string literal \
                        marked with `\"`",
                    ),
            ),
        }
    }

    /// Move the cursor forward and return the given [`Token`] spanning the
    /// skipped characters.
    #[inline]
    fn advance(&mut self, from: usize, length: usize, token: Token) -> LexResult {
        self.cursor = from + length;

        Ok(Some((token, (from..from + length).into())))
    }

    /// Return an opening bracket, remembering it so line ends within the
    /// brackets are ignored.
    fn open(&mut self, from: usize, token: Token) -> LexResult {
        self.nesting.push((token, (from..from + 1).into()));
        self.advance(from, 1, token)
    }

    /// Return a closing bracket.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the bracket does not close the most recently
    /// opened bracket.
    fn close(&mut self, from: usize, token: Token) -> LexResult {
        let expect = match self.nesting.pop() {
            Some((Token::BeginParen, _)) => Token::EndParen,
            Some((Token::BeginBracket, _)) => Token::EndBracket,
            Some((Token::BeginBrace, _)) => Token::EndBrace,
            _ => {
                return Err(error_syntax(UNEXPECTED_TOKEN, self.source, from..from + 1)
                    .with_help(format!("this {token} has no matching opening bracket")))
            }
        };
        if expect != token {
            return Err(error_syntax(UNEXPECTED_TOKEN, self.source, from..from + 1)
                .with_help(expected_found(expect, token)));
        }

        self.advance(from, 1, token)
    }

    /// Return a [`Token::Newline`], or [`Token::Whitespace`] when the line
    /// end falls within brackets.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the line ends within a splice.
    fn lex_newline(&mut self, from: usize) -> LexResult {
        if !self.nesting.is_empty() {
            return self.advance(from, 1, Token::Whitespace);
        }
        if self.state == CursorState::Splice {
            return Err(
                error_syntax(INVALID_SYNTAX, self.source, from..from + 1).with_help(format!(
                    "a splice must be closed with `{}` before the end of the line",
                    self.syntax.end_splice
                )),
            );
        }
        self.state = CursorState::LineStart;

        self.advance(from, 1, Token::Newline)
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::Number`].
    fn lex_digit<T>(&mut self, mut iter: T, from: usize) -> (Token, Region)
    where
        T: Iterator<Item = (usize, char)>,
    {
        loop {
            match iter.next() {
                Some((index, char)) if !is_number(char) => {
                    self.cursor = index;

                    break (Token::Number, (from..index).into());
                }
                Some((_, _)) => continue,
                None => {
                    self.cursor = self.source.len();

                    break (Token::Number, (from..self.source.len()).into());
                }
            }
        }
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::Whitespace`].
    ///
    /// Line ends are significant and never included.
    fn lex_whitespace<T>(&mut self, mut iter: T, from: usize) -> (Token, Region)
    where
        T: Iterator<Item = (usize, char)>,
    {
        loop {
            match iter.next() {
                Some((index, char)) if !matches!(char, ' ' | '\t' | '\r') => {
                    self.cursor = index;

                    break (Token::Whitespace, (from..index).into());
                }
                Some((_, _)) => continue,
                None => {
                    self.cursor = self.source.len();

                    break (Token::Whitespace, (from..self.source.len()).into());
                }
            }
        }
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::String`] using
    /// the given iterator.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the string is not closed before the end
    /// of the line.
    fn lex_string<T>(&mut self, mut iter: T, from: usize) -> LexResult
    where
        T: Iterator<Item = (usize, char)>,
    {
        let mut escaped = false;
        loop {
            match iter.next() {
                Some((index, '"')) if !escaped => {
                    // Add one to the index of the character to comply with string slice
                    // semantics.
                    let to = index + 1;
                    self.cursor = to;

                    return Ok(Some((Token::String, (from..to).into())));
                }
                Some((index, '\n')) => {
                    return Err(self.error_undelimited(from, index));
                }
                Some((_, char)) => {
                    escaped = !escaped && char == '\\';
                }
                None => {
                    return Err(self.error_undelimited(from, self.source.len()));
                }
            }
        }
    }

    /// Return an [`Error`] describing a string that is never closed.
    fn error_undelimited(&self, from: usize, to: usize) -> Error {
        error_syntax(INVALID_SYNTAX, self.source, from..to)
            .with_help("this might be an undelimited string, try closing it with `\"`")
    }

    /// Return a [`Token`] and [`Region`] from the given iterator.
    ///
    /// The `Token` will be [`Token::Identifier`], [`Token::Keyword`] or
    /// a literal such as [`Token::True`].
    fn lex_ident_or_keyword<T>(&mut self, mut iter: T, from: usize) -> (Token, Region)
    where
        T: Iterator<Item = (usize, char)>,
    {
        let to = loop {
            match iter.next() {
                Some((index, char)) if !is_ident_continue(char) => break index,
                Some((_, _)) => continue,
                None => break self.source.len(),
            }
        };

        let token = match &self.source[from..to] {
            "var" => Token::Keyword(Keyword::Var),
            "if" => Token::Keyword(Keyword::If),
            "elif" => Token::Keyword(Keyword::Elif),
            "else" => Token::Keyword(Keyword::Else),
            "for" => Token::Keyword(Keyword::For),
            "in" => Token::Keyword(Keyword::In),
            "True" => Token::True,
            "False" => Token::False,
            "None" => Token::None,
            _ => Token::Identifier,
        };
        self.cursor = to;

        (token, (from..to).into())
    }
}

/// Return true if the given character is a recognized beginning identifier,
/// meaning '_' or an `xid_start`.
fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

/// Return true if the given character is a recognized continue identifier,
/// meaning an `xid_continue`.
fn is_ident_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// Return true if the given character is a number (0-9) or a period.
fn is_number(c: char) -> bool {
    matches!(c, '0'..='9' | '.')
}

#[cfg(test)]
mod tests {
    use super::Lexer;
    use crate::{
        compile::{lex::Token, Keyword, Operator},
        region::Region,
        Builder, Syntax,
    };

    #[test]
    fn test_lex_text_line() {
        let expect = vec![
            (Token::Marker, 0..1),
            (Token::Text, 1..8),
            (Token::BeginSplice, 8..9),
            (Token::Identifier, 9..12),
            (Token::EndSplice, 12..13),
            (Token::Text, 13..14),
            (Token::Newline, 14..14),
        ];

        helper_lex_next_auto("- Hello {msg}!", expect);
    }

    #[test]
    fn test_lex_tag_with_block() {
        let expect = vec![
            (Token::Identifier, 0..2),
            (Token::BeginParen, 2..3),
            (Token::Identifier, 3..8),
            (Token::Assign, 8..9),
            (Token::String, 9..15),
            (Token::EndParen, 15..16),
            (Token::Colon, 16..17),
            (Token::Newline, 17..18),
            (Token::Indent, 18..22),
            (Token::Marker, 22..23),
            (Token::Text, 23..26),
            (Token::Newline, 26..27),
            (Token::Dedent, 27..27),
        ];

        helper_lex_next_auto("li(class=\"test\"):\n    - hi\n", expect);
    }

    #[test]
    fn test_lex_keywords_and_literals() {
        let expect = vec![
            (Token::Keyword(Keyword::Var), 0..3),
            (Token::Identifier, 4..5),
            (Token::Assign, 6..7),
            (Token::BeginBracket, 8..9),
            (Token::True, 9..13),
            (Token::Comma, 13..14),
            (Token::None, 15..19),
            (Token::Comma, 19..20),
            (Token::Number, 21..25),
            (Token::EndBracket, 25..26),
            (Token::Newline, 26..27),
        ];

        helper_lex_next_auto("var x = [True, None, 10.5]\n", expect);
    }

    #[test]
    fn test_lex_operators() {
        let expect = vec![
            (Token::Keyword(Keyword::If), 0..2),
            (Token::Number, 3..4),
            (Token::Operator(Operator::Add), 5..6),
            (Token::Number, 7..8),
            (Token::Operator(Operator::Multiply), 9..10),
            (Token::Number, 11..12),
            (Token::Operator(Operator::Divide), 12..13),
            (Token::Operator(Operator::Subtract), 13..14),
            (Token::Number, 14..15),
            (Token::Colon, 15..16),
            (Token::Newline, 16..16),
        ];

        helper_lex_next_auto("if 1 + 2 * 3/-4:", expect);
    }

    #[test]
    fn test_lex_nested_dedent() {
        let expect = vec![
            (Token::Identifier, 0..2),
            (Token::Colon, 2..3),
            (Token::Newline, 3..4),
            (Token::Indent, 4..6),
            (Token::Identifier, 6..8),
            (Token::Colon, 8..9),
            (Token::Newline, 9..10),
            (Token::Indent, 10..14),
            (Token::Marker, 14..15),
            (Token::Text, 15..16),
            (Token::Newline, 16..17),
            (Token::Dedent, 17..17),
            (Token::Dedent, 17..17),
            (Token::Marker, 17..18),
            (Token::Text, 18..19),
            (Token::Newline, 19..19),
        ];

        helper_lex_next_auto("ul:\n  li:\n    -a\n-b", expect);
    }

    #[test]
    fn test_lex_blank_lines_ignored() {
        let expect = vec![
            (Token::Marker, 5..6),
            (Token::Text, 6..8),
            (Token::Newline, 8..9),
            (Token::Marker, 13..14),
            (Token::Text, 14..16),
            (Token::Newline, 16..17),
        ];

        helper_lex_next_auto("\n   \n- a\n\t\n\n\n- b\n", expect);
    }

    #[test]
    fn test_lex_brackets_join_lines() {
        let expect = vec![
            (Token::Keyword(Keyword::Var), 0..3),
            (Token::Identifier, 4..5),
            (Token::Assign, 6..7),
            (Token::BeginBracket, 8..9),
            (Token::Number, 14..15),
            (Token::Comma, 15..16),
            (Token::Number, 21..22),
            (Token::EndBracket, 23..24),
            (Token::Newline, 24..25),
        ];

        helper_lex_next_auto("var a = [\n    1,\n    2\n]\n", expect);
    }

    #[test]
    fn test_lex_splice_with_dictionary() {
        let expect = vec![
            (Token::Marker, 0..1),
            (Token::BeginSplice, 1..2),
            (Token::BeginBrace, 2..3),
            (Token::String, 3..6),
            (Token::Colon, 6..7),
            (Token::Number, 7..8),
            (Token::EndBrace, 8..9),
            (Token::EndSplice, 9..10),
            (Token::Newline, 10..10),
        ];

        helper_lex_next_auto("-{{\"a\":1}}", expect);
    }

    #[test]
    fn test_lex_escaped_splice() {
        let expect = vec![
            (Token::Marker, 0..1),
            (Token::Text, 1..9),
            (Token::Newline, 9..9),
        ];

        helper_lex_next_auto(r"- \{not\}", expect);
    }

    #[test]
    fn test_lex_custom_syntax() {
        let expect = vec![
            (Token::Marker, 0..1),
            (Token::Text, 1..2),
            (Token::BeginSplice, 2..3),
            (Token::Identifier, 3..4),
            (Token::EndSplice, 4..5),
            (Token::Newline, 5..5),
        ];
        let syntax = Builder::new().text_marker('|').splice('<', '>').to_syntax();
        let mut lexer = Lexer::new("| <a>", syntax);
        for (token, range) in expect {
            assert_eq!(lexer.next(), Ok(Some((token, range.into()))));
        }

        assert_eq!(lexer.next(), Ok(None));
    }

    #[test]
    fn test_lex_crlf() {
        let expect = vec![
            (Token::Marker, 0..1),
            (Token::Text, 1..4),
            (Token::Newline, 5..6),
            (Token::Identifier, 6..8),
            (Token::Newline, 8..8),
        ];

        helper_lex_next_auto("- hi\r\nbr", expect);
    }

    #[test]
    fn test_error_inconsistent_indentation() {
        let mut lexer = Lexer::new("ul:\n    li\n  li\n", Syntax::default());
        let mut result = lexer.next();
        while let Ok(Some(_)) = result {
            result = lexer.next();
        }

        let error = result.unwrap_err();
        assert!(error.is_syntax());
        assert_eq!(error.position(), Some((3, 1)));
    }

    #[test]
    fn test_error_mixed_tabs_and_spaces() {
        let mut lexer = Lexer::new("ul:\n    li\n\tli\n", Syntax::default());
        let mut result = lexer.next();
        while let Ok(Some(_)) = result {
            result = lexer.next();
        }

        assert!(result.is_err());
    }

    #[test]
    fn test_error_unclosed_string() {
        let mut lexer = Lexer::new("var a = \"hello\n", Syntax::default());
        assert!(lexer.next().is_ok());
        assert!(lexer.next().is_ok());
        assert!(lexer.next().is_ok());
        assert!(lexer.next().is_err());
    }

    #[test]
    fn test_error_unclosed_splice() {
        let mut lexer = Lexer::new("- {name\n- b", Syntax::default());
        for _ in 0..4 {
            assert!(lexer.next().is_ok());
        }

        assert!(lexer.next().is_err());
    }

    #[test]
    fn test_error_mismatched_bracket() {
        let mut lexer = Lexer::new("var a = [1)", Syntax::default());
        for _ in 0..5 {
            assert!(lexer.next().is_ok());
        }

        assert!(lexer.next().is_err());
    }

    #[test]
    fn test_error_unclosed_bracket_at_eof() {
        let mut lexer = Lexer::new("var a = (1 + 2", Syntax::default());
        let mut result = lexer.next();
        while let Ok(Some(_)) = result {
            result = lexer.next();
        }

        assert_eq!(result.unwrap_err().position(), Some((1, 9)));
    }

    /// Helper function which takes in a source string, creates a lexer on that
    /// string and iterates [expect.len()] amount of times and compares the result
    /// against [lexer.next()].
    fn helper_lex_next_auto<T>(source: &str, expect: Vec<(Token, T)>)
    where
        T: Into<Region>,
    {
        let mut lexer = Lexer::new(source, Syntax::default());
        for (token, region) in expect {
            assert_eq!(lexer.next(), Ok(Some((token, region.into()))))
        }

        assert_eq!(lexer.next(), Ok(None));
        assert_eq!(lexer.next(), Ok(None));
        assert_eq!(lexer.next(), Ok(None));
    }
}
