//! Escape levels for nested literals
//!
//! Every time a literal is embedded one level deeper inside a quoted parent,
//! PostgreSQL escapes each `"` and `\` of the inner text once more. A record
//! parent writes `"` as `""`, an array parent writes it as `\"`, and both
//! write `\` as `\\`. Either way the run for one logical character doubles
//! per level, which is what the parsers count as the escape multiplier.

use crate::writer::PostgresWriter;

/// Kind of quoted parent a value is embedded in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Record,
    Array,
}

/// Stack of enclosing quoted levels, outermost first.
///
/// Kept as a bitmask so it can be threaded by value through every
/// serialization call without allocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Escaping {
    depth: u32,
    arrays: u64,
}

impl Escaping {
    /// Top-level, unquoted context
    pub const ROOT: Escaping = Escaping {
        depth: 0,
        arrays: 0,
    };

    /// Deepest nesting representable by the level mask
    pub const MAX_DEPTH: u32 = u64::BITS;

    /// Escaping for a value quoted inside a parent of kind `level`
    pub fn nest(self, level: Level) -> Escaping {
        debug_assert!(self.depth < Self::MAX_DEPTH, "literal nested too deeply");
        let arrays = match level {
            Level::Record => self.arrays,
            Level::Array => self.arrays | 1u64.checked_shl(self.depth).unwrap_or(0),
        };
        Escaping {
            depth: self.depth + 1,
            arrays,
        }
    }

    pub fn depth(self) -> usize {
        self.depth as usize
    }

    /// Count of characters one logical quote occupies one level up: 0, 1, 2, 4, ...
    pub fn multiplier(self) -> usize {
        match self.depth {
            0 => 0,
            depth => 1usize << (depth - 1),
        }
    }

    fn innermost(self) -> Level {
        if self.arrays & (1u64 << (self.depth - 1)) != 0 {
            Level::Array
        } else {
            Level::Record
        }
    }

    fn outer(self) -> Escaping {
        let depth = self.depth - 1;
        Escaping {
            depth,
            arrays: self.arrays & !(1u64 << depth),
        }
    }

    /// Write one logical character as its escaped run
    pub fn write_char(self, writer: &mut PostgresWriter, ch: char) {
        if self.depth == 0 || (ch != '"' && ch != '\\') {
            writer.write_char(ch);
            return;
        }
        let prefix = match (self.innermost(), ch) {
            (Level::Record, '"') => '"',
            _ => '\\',
        };
        let outer = self.outer();
        outer.write_char(writer, prefix);
        outer.write_char(writer, ch);
    }

    pub fn write_str(self, writer: &mut PostgresWriter, text: &str) {
        if self.depth == 0 || !text.contains(|c| c == '"' || c == '\\') {
            writer.write_str(text);
            return;
        }
        for ch in text.chars() {
            self.write_char(writer, ch);
        }
    }
}

/// Multiplier for a value nested one level below a parent read at `context`.
///
/// The first nesting level introduces one unit of escaping and every level
/// after that doubles it, so depths 1, 2, 3 read at 1, 2, 4.
pub fn nested_context(context: usize) -> usize {
    if context == 0 {
        1
    } else {
        context << 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(escaping: Escaping, text: &str) -> String {
        let mut writer = PostgresWriter::new();
        escaping.write_str(&mut writer, text);
        writer.into_string()
    }

    #[test]
    fn test_multiplier_sequence() {
        let depth1 = Escaping::ROOT.nest(Level::Record);
        let depth2 = depth1.nest(Level::Array);
        let depth3 = depth2.nest(Level::Record);
        assert_eq!(Escaping::ROOT.multiplier(), 0);
        assert_eq!(depth1.multiplier(), 1);
        assert_eq!(depth2.multiplier(), 2);
        assert_eq!(depth3.multiplier(), 4);
    }

    #[test]
    fn test_nested_context_matches_multiplier() {
        let mut context = 0;
        let mut escaping = Escaping::ROOT;
        for _ in 0..5 {
            context = nested_context(context);
            escaping = escaping.nest(Level::Record);
            assert_eq!(context, escaping.multiplier());
        }
        assert_eq!(context, 16);
    }

    #[test]
    fn test_root_writes_verbatim() {
        assert_eq!(escaped(Escaping::ROOT, r#"a"b\c"#), r#"a"b\c"#);
    }

    #[test]
    fn test_record_level_doubles_quotes() {
        let escaping = Escaping::ROOT.nest(Level::Record);
        assert_eq!(escaped(escaping, r#"a"b\c"#), r#"a""b\\c"#);
    }

    #[test]
    fn test_array_level_uses_backslash() {
        let escaping = Escaping::ROOT.nest(Level::Array);
        assert_eq!(escaped(escaping, r#"a"b\c"#), r#"a\"b\\c"#);
    }

    #[test]
    fn test_array_inside_record() {
        let escaping = Escaping::ROOT.nest(Level::Record).nest(Level::Array);
        assert_eq!(escaped(escaping, "\""), r#"\\"""#);
        assert_eq!(escaped(escaping, "\\"), r#"\\\\"#);
    }

    #[test]
    fn test_run_length_doubles_per_level() {
        let mut escaping = Escaping::ROOT;
        for depth in 1..=6 {
            escaping = escaping.nest(if depth % 2 == 0 { Level::Array } else { Level::Record });
            let run = escaped(escaping, "\"");
            assert_eq!(run.len(), 1 << depth);
            assert!(run.ends_with('"'));
        }
    }
}
