//! Input cursor and literal tokens of the formula language.

use super::problem::Problem;
use crate::spec::Value;

/// A position in the formula text.
///
/// The cursor is a plain byte offset, so taking a snapshot is a copy and
/// restoring it undoes everything read since.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Current byte offset.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Go back to an offset returned by [`Cursor::offset`].
    pub fn reset(&mut self, offset: usize) {
        self.pos = offset;
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Skip whitespace and `;` comments.
    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == ';' {
                // Skip comment until end of line
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    /// Whether the next character ends a token.
    pub fn at_delimiter(&self) -> bool {
        match self.peek() {
            None => true,
            Some(ch) => ch.is_whitespace() || matches!(ch, '(' | ')' | ';'),
        }
    }

    /// Consume `symbol` if the text continues with it.
    pub fn eat_symbol(&mut self, symbol: &str) -> bool {
        if self.rest().starts_with(symbol) {
            self.pos += symbol.len();
            true
        } else {
            false
        }
    }

    /// Consume `keyword` if the text continues with it followed by a
    /// delimiter, so that `add` does not match the start of `addition`.
    pub fn eat_keyword(&mut self, keyword: &str) -> bool {
        let start = self.pos;
        if self.eat_symbol(keyword) && self.at_delimiter() {
            true
        } else {
            self.pos = start;
            false
        }
    }

    /// Read an integer literal. On failure the cursor stays at the token start.
    pub fn read_int(&mut self) -> Result<i64, Problem> {
        let start = self.pos;
        let scanned = self.scan_number();
        match scanned {
            Ok(false) if self.at_delimiter() => {
                let text = &self.input[start..self.pos];
                text.parse::<i64>().map_err(|_| {
                    self.pos = start;
                    Problem::ExpectingInt
                })
            }
            _ => {
                self.pos = start;
                Err(Problem::ExpectingInt)
            }
        }
    }

    /// Read an integer or decimal literal. On failure the cursor stays at
    /// the token start.
    pub fn read_number(&mut self) -> Result<f64, Problem> {
        let start = self.pos;
        let scanned = self.scan_number();
        let problem = match scanned {
            Ok(_) if self.at_delimiter() => {
                match self.input[start..self.pos].parse::<f64>() {
                    Ok(value) => return Ok(value),
                    Err(_) => Problem::ExpectingNumber,
                }
            }
            Ok(_) => Problem::ExpectingNumber,
            Err(problem) => problem,
        };
        self.pos = start;
        Err(problem)
    }

    /// Scan `-?[0-9]+(.[0-9]*)?([eE][+-]?[0-9]+)?`.
    ///
    /// Returns whether a fraction or exponent was present.
    fn scan_number(&mut self) -> Result<bool, Problem> {
        if self.peek() == Some('-') {
            self.advance();
        }

        let mut digits = 0;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
                digits += 1;
            } else {
                break;
            }
        }
        if digits == 0 {
            return Err(Problem::ExpectingNumber);
        }

        let mut is_float = false;

        // Decimal part
        if self.peek() == Some('.') {
            self.advance();
            is_float = true;
            while let Some(ch) = self.peek() {
                if ch.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        // Exponent part
        if let Some('e' | 'E') = self.peek() {
            self.advance();
            is_float = true;
            if let Some('-' | '+') = self.peek() {
                self.advance();
            }
            let mut exponent_digits = 0;
            while let Some(ch) = self.peek() {
                if ch.is_ascii_digit() {
                    self.advance();
                    exponent_digits += 1;
                } else {
                    break;
                }
            }
            if exponent_digits == 0 {
                return Err(Problem::ExpectingFloat);
            }
        }

        Ok(is_float)
    }

    /// Read a double-quoted string literal.
    ///
    /// A missing opening quote leaves the cursor at the token start; other
    /// failures leave it where the string went wrong.
    pub fn read_string(&mut self) -> Result<String, Problem> {
        if self.peek() != Some('"') {
            return Err(Problem::Expecting("string".to_string()));
        }
        self.advance();

        let mut text = String::new();
        loop {
            match self.peek() {
                None => return Err(Problem::ExpectingSymbol("\"".to_string())),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        _ => return Err(Problem::UnexpectedChar),
                    };
                    self.advance();
                    text.push(escaped);
                }
                Some(ch) => {
                    self.advance();
                    text.push(ch);
                }
            }
        }

        if self.at_delimiter() {
            Ok(text)
        } else {
            Err(Problem::UnexpectedChar)
        }
    }

    /// Read `#t` or `#f`. On failure the cursor stays at the token start.
    pub fn read_bool(&mut self) -> Result<bool, Problem> {
        if self.eat_keyword("#t") {
            Ok(true)
        } else if self.eat_keyword("#f") {
            Ok(false)
        } else {
            Err(Problem::Expecting("boolean".to_string()))
        }
    }

    /// Read a quoted date or date-time. An unparsable date leaves the cursor
    /// at the token start.
    pub fn read_timestamp(&mut self) -> Result<Value, Problem> {
        let start = self.pos;
        let text = self.read_string().map_err(|problem| match problem {
            Problem::Expecting(_) => Problem::Expecting("timestamp".to_string()),
            other => other,
        })?;
        match Value::parse_timestamp(&text) {
            Some(ts) => Ok(Value::Timestamp(ts)),
            None => {
                self.pos = start;
                Err(Problem::InvalidTimestamp(text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_read_int() {
        let mut cursor = Cursor::new("-42 rest");
        assert_eq!(cursor.read_int(), Ok(-42));
        assert_eq!(cursor.offset(), 3);

        for text in ["3.5", "12abc", "-", "x", "99999999999999999999"] {
            let mut cursor = Cursor::new(text);
            assert_eq!(cursor.read_int(), Err(Problem::ExpectingInt), "{}", text);
            assert_eq!(cursor.offset(), 0);
        }
    }

    #[test]
    fn test_read_number() {
        let mut cursor = Cursor::new("1.5e3)");
        assert_relative_eq!(cursor.read_number().unwrap(), 1500.0);

        let mut cursor = Cursor::new("7 ");
        assert_relative_eq!(cursor.read_number().unwrap(), 7.0);

        let mut cursor = Cursor::new("-0.25");
        assert_relative_eq!(cursor.read_number().unwrap(), -0.25);

        let mut cursor = Cursor::new("1e");
        assert_eq!(cursor.read_number(), Err(Problem::ExpectingFloat));
        assert_eq!(cursor.offset(), 0);

        let mut cursor = Cursor::new("2x");
        assert_eq!(cursor.read_number(), Err(Problem::ExpectingNumber));
    }

    #[test]
    fn test_read_string() {
        let mut cursor = Cursor::new(r#""a \"quoted\" name\n" tail"#);
        assert_eq!(cursor.read_string().unwrap(), "a \"quoted\" name\n");

        let mut cursor = Cursor::new("\"unterminated");
        assert_eq!(
            cursor.read_string(),
            Err(Problem::ExpectingSymbol("\"".to_string()))
        );
        assert_eq!(cursor.offset(), 13);

        let mut cursor = Cursor::new(r#""bad \q""#);
        assert_eq!(cursor.read_string(), Err(Problem::UnexpectedChar));
    }

    #[test]
    fn test_read_bool() {
        let mut cursor = Cursor::new("#t)");
        assert_eq!(cursor.read_bool(), Ok(true));
        let mut cursor = Cursor::new("#true");
        assert!(cursor.read_bool().is_err());
    }

    #[test]
    fn test_read_timestamp() {
        let mut cursor = Cursor::new("\"2020-01-31\"");
        assert!(matches!(cursor.read_timestamp(), Ok(Value::Timestamp(_))));

        let mut cursor = Cursor::new("\"2020-02-31\"");
        assert_eq!(
            cursor.read_timestamp(),
            Err(Problem::InvalidTimestamp("2020-02-31".to_string()))
        );
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn test_keyword_needs_delimiter() {
        let mut cursor = Cursor::new("addition");
        assert!(!cursor.eat_keyword("add"));
        assert_eq!(cursor.offset(), 0);

        let mut cursor = Cursor::new("add(");
        assert!(cursor.eat_keyword("add"));
    }

    #[test]
    fn test_skip_whitespace_and_comments() {
        let mut cursor = Cursor::new("  ; a comment\n\t(x");
        cursor.skip_whitespace();
        assert!(cursor.eat_symbol("("));
    }
}
