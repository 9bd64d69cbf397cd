//! Forward-only reader over literal text
//!
//! Every structural character of the literal grammar is ASCII, so the reader
//! walks bytes. Multi-byte UTF-8 sequences never collide with delimiters and
//! pass through the token buffer untouched.

use crate::errors::TupleError;
use std::fmt::Display;

/// Single-pass cursor over a decoded text payload.
///
/// Reading past the end yields `None` instead of failing; callers decide
/// whether end of input was acceptable at that point.
#[derive(Debug)]
pub struct PostgresReader<'a> {
    input: &'a [u8],
    position: usize,
    last: Option<u8>,
    token: Vec<u8>,
}

impl<'a> PostgresReader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            position: 0,
            last: None,
            token: Vec::new(),
        }
    }

    /// Next character without advancing
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    /// Consume and return the next character
    pub fn read(&mut self) -> Option<u8> {
        self.last = self.input.get(self.position).copied();
        if self.last.is_some() {
            self.position += 1;
        }
        self.last
    }

    /// Consume `count` characters and return the last one consumed.
    ///
    /// `read_n(0)` consumes nothing and returns [`last`](Self::last), which lets
    /// callers skip an escape run of length `m` uniformly, including `m == 0`.
    pub fn read_n(&mut self, count: usize) -> Option<u8> {
        if count == 0 {
            return self.last;
        }
        let target = self.position.saturating_add(count);
        if target <= self.input.len() {
            self.position = target;
            self.last = Some(self.input[target - 1]);
        } else {
            self.position = self.input.len();
            self.last = None;
        }
        self.last
    }

    /// Most recently consumed character
    pub fn last(&self) -> Option<u8> {
        self.last
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Read one scalar token whose first character was already consumed.
    ///
    /// A token starting with `"` or `\` is quoted at escape multiplier
    /// `context`: the opening and closing quote runs are `context` characters
    /// long and every escaped character occupies `2 * context` characters, the
    /// last of which is the literal. Anything else is bare and ends at `,` or
    /// `match_end`. At `context == 0` the token is the raw remainder of the
    /// input. The terminating delimiter is consumed and left in [`last`](Self::last).
    ///
    /// Returns whether the token was quoted; the text is available via [`token`](Self::token).
    pub fn read_token(
        &mut self,
        first: u8,
        context: usize,
        match_end: u8,
    ) -> Result<bool, TupleError> {
        self.token.clear();

        if context == 0 {
            self.token.push(first);
            while let Some(cur) = self.read() {
                self.token.push(cur);
            }
            return Ok(false);
        }

        if first != b'"' && first != b'\\' {
            let mut cur = Some(first);
            while let Some(c) = cur {
                if c == b',' || c == match_end {
                    break;
                }
                self.token.push(c);
                cur = self.read();
            }
            return Ok(false);
        }

        let mut cur = self.read_n(context);
        loop {
            match cur {
                None => return Err(self.unexpected_end()),
                Some(b'"') | Some(b'\\') => {
                    cur = self.read_n(context);
                    match cur {
                        None => return Ok(true),
                        Some(c) if c == b',' || c == match_end => return Ok(true),
                        _ => {}
                    }
                    if context > 1 {
                        cur = self.read_n(context - 1);
                    }
                    match cur {
                        Some(c) => self.token.push(c),
                        None => return Err(self.unexpected_end()),
                    }
                }
                Some(c) => self.token.push(c),
            }
            cur = self.read();
        }
    }

    /// Text of the token collected by the last [`read_token`](Self::read_token)
    pub fn token(&self) -> Result<&str, TupleError> {
        std::str::from_utf8(&self.token)
            .map_err(|e| self.malformed(format!("invalid UTF-8 in token: {}", e)))
    }

    pub fn malformed(&self, message: impl Into<String>) -> TupleError {
        TupleError::MalformedLiteral {
            position: self.position,
            message: message.into(),
        }
    }

    pub fn unexpected_end(&self) -> TupleError {
        self.malformed("unexpected end of input")
    }

    /// Error for a character (or end of input) where `expected` was required
    pub fn unexpected(&self, found: Option<u8>, expected: &str) -> TupleError {
        match found {
            Some(c) => self.malformed(format!(
                "expected {} but found '{}'",
                expected,
                char::from(c).escape_default()
            )),
            None => self.malformed(format!("expected {} but input ended", expected)),
        }
    }

    /// Error for a token that does not decode into `type_name`
    pub fn invalid_value(&self, type_name: &str, reason: impl Display) -> TupleError {
        self.malformed(format!("invalid {} value: {}", type_name, reason))
    }
}
