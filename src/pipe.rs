use serde_json::{Map, Value};
use std::fmt::{Arguments, Display, Result, Write};

/// Wraps some underlying buffer by providing methods that write to it
/// in different formats.
///
/// Values are written in their text form with HTML special characters
/// escaped, while [`Write`] methods pass text through unchanged.
pub struct Pipe<'buffer> {
    buffer: &'buffer mut (dyn Write + 'buffer),
}

impl<'buffer> Pipe<'buffer> {
    /// Create a new Pipe that writes to the given buffer.
    pub fn new(buffer: &'buffer mut String) -> Self {
        Self { buffer }
    }

    /// Write the given Value to the Pipe buffer.
    ///
    /// The Pipe will handle formatting and escaping the value.
    ///
    /// # Errors
    ///
    /// The Pipe supports all Value types, so the only error that will
    /// be returned is propagated from the [write!] macro itself.
    pub fn write_value(&mut self, value: &Value) -> Result {
        match value {
            Value::Null => Ok(()),
            _ => self.write_nested(value),
        }
    }

    /// Write text to the buffer, replacing HTML special characters with
    /// their entities.
    pub fn write_escaped(&mut self, text: &str) -> Result {
        let mut from = 0;
        for (index, char) in text.char_indices() {
            let entity = match char {
                '&' => "&amp;",
                '<' => "&lt;",
                '>' => "&gt;",
                '"' => "&quot;",
                '\'' => "&#x27;",
                _ => continue,
            };
            self.buffer.write_str(&text[from..index])?;
            self.buffer.write_str(entity)?;
            from = index + 1;
        }

        self.buffer.write_str(&text[from..])
    }

    /// Write a value that may be nested within a collection.
    ///
    /// Unlike a top level `None`, a nested `None` is written as text so
    /// collections keep one entry per item.
    fn write_nested(&mut self, value: &Value) -> Result {
        match value {
            Value::Null => write!(self.buffer, "None"),
            Value::Bool(true) => write!(self.buffer, "True"),
            Value::Bool(false) => write!(self.buffer, "False"),
            Value::String(string) => self.write_escaped(string),
            Value::Array(array) => self.write_array(array),
            Value::Object(object) => self.write_object(object),
            Value::Number(number) => self.write_display(number),
        }
    }

    /// Write the value to the buffer using the Display implementation.
    fn write_display(&mut self, value: impl Display) -> Result {
        write!(self.buffer, "{}", value)
    }

    /// Write the value to the buffer as a comma separated list and
    /// surrounded by brackets.
    fn write_array(&mut self, value: &[Value]) -> Result {
        write!(self.buffer, "[")?;
        for (index, item) in value.iter().enumerate() {
            if index > 0 {
                write!(self.buffer, ", ")?;
            }
            self.write_nested(item)?;
        }
        write!(self.buffer, "]")
    }

    /// Write the value to the buffer as key/value pairs and surrounded
    /// by curly braces.
    fn write_object(&mut self, value: &Map<String, Value>) -> Result {
        write!(self.buffer, "{{")?;
        for (index, (key, value)) in value.iter().enumerate() {
            if index > 0 {
                write!(self.buffer, ", ")?;
            }
            self.write_escaped(key)?;
            write!(self.buffer, ": ")?;
            self.write_nested(value)?;
        }
        write!(self.buffer, "}}")
    }
}

impl Write for Pipe<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> Result {
        Write::write_str(self.buffer, s)
    }

    #[inline]
    fn write_char(&mut self, c: char) -> Result {
        Write::write_char(self.buffer, c)
    }

    #[inline]
    fn write_fmt(&mut self, args: Arguments<'_>) -> Result {
        Write::write_fmt(self.buffer, args)
    }
}

#[cfg(test)]
mod tests {
    use super::Pipe;
    use serde_json::{json, Value};
    use std::fmt::Write;

    fn helper_write(value: &Value) -> String {
        let mut buffer = String::new();
        Pipe::new(&mut buffer).write_value(value).unwrap();
        buffer
    }

    #[test]
    fn test_write_scalars() {
        assert_eq!(helper_write(&Value::Null), "");
        assert_eq!(helper_write(&json!(true)), "True");
        assert_eq!(helper_write(&json!(false)), "False");
        assert_eq!(helper_write(&json!(1050)), "1050");
        assert_eq!(helper_write(&json!(-3)), "-3");
        assert_eq!(helper_write(&json!(2.5)), "2.5");
        assert_eq!(helper_write(&json!("taylor")), "taylor");
    }

    #[test]
    fn test_write_collections() {
        assert_eq!(helper_write(&json!([])), "[]");
        assert_eq!(helper_write(&json!([1, "a", null, true])), "[1, a, None, True]");
        assert_eq!(helper_write(&json!({"b": [1], "a": {}})), "{b: [1], a: {}}");
    }

    #[test]
    fn test_write_escaped() {
        assert_eq!(
            helper_write(&json!("<script>alert(\"x\" & 'y')</script>")),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#x27;y&#x27;)&lt;/script&gt;"
        );
        assert_eq!(helper_write(&json!({"<k>": ["&"]})), "{&lt;k&gt;: [&amp;]}");
        assert_eq!(helper_write(&json!("héllo <ü>")), "héllo &lt;ü&gt;");
    }

    #[test]
    fn test_write_str_unescaped() {
        let mut buffer = String::new();
        Pipe::new(&mut buffer).write_str("<li>").unwrap();
        assert_eq!(buffer, "<li>");
    }
}
