//! String-literal escaping and identifier quoting.
//!
//! The parser never talks to a database driver directly. It renders values
//! through an [`Escaper`], which callers supply: a driver-bound escaper in
//! production, [`MysqlEscaper`] when no connection is at hand, or a stub in
//! tests.

use std::sync::Arc;

/// Escaping capability consumed by [`QueryParser`](crate::QueryParser).
pub trait Escaper {
    /// Return `raw` escaped so it can be placed between single quotes.
    fn escape_string(&self, raw: &str) -> String;

    /// Wrap an identifier in backticks.
    ///
    /// The identifier's content is not escaped: an embedded backtick is
    /// emitted as-is. Do not pass untrusted identifiers.
    fn quote_identifier(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        out.push('`');
        out.push_str(name);
        out.push('`');
        out
    }
}

impl<E: Escaper + ?Sized> Escaper for &E {
    fn escape_string(&self, raw: &str) -> String {
        (**self).escape_string(raw)
    }

    fn quote_identifier(&self, name: &str) -> String {
        (**self).quote_identifier(name)
    }
}

impl<E: Escaper + ?Sized> Escaper for Box<E> {
    fn escape_string(&self, raw: &str) -> String {
        (**self).escape_string(raw)
    }

    fn quote_identifier(&self, name: &str) -> String {
        (**self).quote_identifier(name)
    }
}

impl<E: Escaper + ?Sized> Escaper for Arc<E> {
    fn escape_string(&self, raw: &str) -> String {
        (**self).escape_string(raw)
    }

    fn quote_identifier(&self, name: &str) -> String {
        (**self).quote_identifier(name)
    }
}

/// Connection-free escaper with MySQL `real_escape_string` semantics.
///
/// Backslash-escapes NUL, `\n`, `\r`, `\`, `'`, `"` and Ctrl-Z. Correct for
/// UTF-8 and other ASCII-compatible connection charsets; multi-byte charsets
/// such as GBK need the driver's own routine.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlEscaper;

impl MysqlEscaper {
    pub fn new() -> Self {
        Self
    }
}

impl Escaper for MysqlEscaper {
    fn escape_string(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len() + raw.len() / 8);
        for ch in raw.chars() {
            match ch {
                '\0' => out.push_str("\\0"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                '"' => out.push_str("\\\""),
                '\x1a' => out.push_str("\\Z"),
                c => out.push(c),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mysql_passes_plain_text_through() {
        assert_eq!(MysqlEscaper.escape_string("Jack"), "Jack");
        assert_eq!(MysqlEscaper.escape_string("Jöhn ✓"), "Jöhn ✓");
    }

    #[test]
    fn mysql_escapes_quotes_and_backslash() {
        assert_eq!(MysqlEscaper.escape_string("O'Brien"), "O\\'Brien");
        assert_eq!(MysqlEscaper.escape_string("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(MysqlEscaper.escape_string("a\\b"), "a\\\\b");
    }

    #[test]
    fn mysql_escapes_control_characters() {
        assert_eq!(
            MysqlEscaper.escape_string("a\0b\nc\rd\x1ae"),
            "a\\0b\\nc\\rd\\Ze"
        );
    }

    #[test]
    fn identifiers_are_wrapped_not_escaped() {
        assert_eq!(MysqlEscaper.quote_identifier("name"), "`name`");
        assert_eq!(MysqlEscaper.quote_identifier("a`b"), "`a`b`");
    }

    #[test]
    fn blanket_impls_delegate() {
        let shared: Arc<dyn Escaper + Send + Sync> = Arc::new(MysqlEscaper);
        assert_eq!(shared.escape_string("'"), "\\'");
        let boxed: Box<dyn Escaper> = Box::new(MysqlEscaper);
        assert_eq!(boxed.quote_identifier("id"), "`id`");
    }
}
