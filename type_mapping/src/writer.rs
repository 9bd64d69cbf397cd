//! Append-only output buffer for literal emission

use uuid::Uuid;

/// Text sink used for one serialize operation.
///
/// Numbers and UUIDs are formatted through fixed scratch buffers owned by the
/// writer and copied straight into the output, so emission never allocates an
/// intermediate string per value. A writer is not shared: acquire one, write a
/// literal, then [`reset`](Self::reset) it or drop it.
pub struct PostgresWriter {
    buffer: String,
    integers: itoa::Buffer,
    floats: ryu::Buffer,
    uuid: [u8; uuid::fmt::Hyphenated::LENGTH],
    sql_quoting: bool,
}

impl Default for PostgresWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PostgresWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresWriter")
            .field("buffer", &self.buffer)
            .field("sql_quoting", &self.sql_quoting)
            .finish()
    }
}

impl PostgresWriter {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
            integers: itoa::Buffer::new(),
            floats: ryu::Buffer::new(),
            uuid: [0; uuid::fmt::Hyphenated::LENGTH],
            sql_quoting: false,
        }
    }

    /// Double every `'` written from now on, for output embedded in an SQL string literal
    pub(crate) fn set_sql_quoting(&mut self, enabled: bool) {
        self.sql_quoting = enabled;
    }

    /// Append a character, bypassing SQL quote doubling
    pub(crate) fn write_raw(&mut self, ch: char) {
        self.buffer.push(ch);
    }

    pub fn write_char(&mut self, ch: char) {
        if self.sql_quoting && ch == '\'' {
            self.buffer.push_str("''");
        } else {
            self.buffer.push(ch);
        }
    }

    pub fn write_str(&mut self, text: &str) {
        if self.sql_quoting && text.contains('\'') {
            for ch in text.chars() {
                self.write_char(ch);
            }
        } else {
            self.buffer.push_str(text);
        }
    }

    pub fn write_integer(&mut self, value: i64) {
        let text = self.integers.format(value);
        self.buffer.push_str(text);
    }

    /// Write a double using PostgreSQL's spelling of the non-finite values
    pub fn write_float(&mut self, value: f64) {
        if value.is_finite() {
            let text = self.floats.format_finite(value);
            self.buffer.push_str(text);
        } else {
            self.buffer.push_str(non_finite(value.is_nan(), value.is_sign_negative()));
        }
    }

    pub fn write_real(&mut self, value: f32) {
        if value.is_finite() {
            let text = self.floats.format_finite(value);
            self.buffer.push_str(text);
        } else {
            self.buffer.push_str(non_finite(value.is_nan(), value.is_sign_negative()));
        }
    }

    pub fn write_uuid(&mut self, value: &Uuid) {
        let text = value.hyphenated().encode_lower(&mut self.uuid);
        self.buffer.push_str(text);
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Copy of the written text, leaving the writer reusable
    pub fn to_text(&self) -> String {
        self.buffer.clone()
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    /// Clear the output and quoting mode, keeping allocated capacity
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.sql_quoting = false;
    }
}

fn non_finite(nan: bool, negative: bool) -> &'static str {
    match (nan, negative) {
        (true, _) => "NaN",
        (false, true) => "-Infinity",
        (false, false) => "Infinity",
    }
}
