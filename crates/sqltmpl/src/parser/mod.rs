//! Placeholder template parser.
//!
//! Templates are scanned once, character by character, by a small state
//! machine (see [`ScanState`](state::ScanState)). Placeholders are replaced by
//! escaped literal text and `{ ... }` blocks are kept or dropped depending on
//! the values bound inside them.
//!
//! | Syntax | Renders |
//! |--------|---------|
//! | `?`    | auto-typed scalar: `null`, `'escaped'`, numeral, `1`/`0` |
//! | `?d`   | value coerced to integer (null stays `null`) |
//! | `?f`   | value coerced to float (null stays `null`) |
//! | `?a`   | `v1, v2, ...` for lists, `` `k` = v, ... `` for maps |
//! | `?#`   | `` `name` `` or `` `a`, `b`, ... `` |
//! | `{..}` | conditional block, dropped if a value inside equals the skip value |
//! | `'..'` | string literal, placeholder syntax is inert inside |
//!
//! # Example
//!
//! ```ignore
//! use sqltmpl::{MysqlEscaper, QueryParser, Value};
//!
//! let parser = QueryParser::new(MysqlEscaper);
//! let sql = parser.parse(
//!     "select name from users where ?# in (?a){ and block = ?d}",
//!     &["user_id".into(), vec![1, 2, 3].into(), Value::Null],
//!     &Value::Null,
//! )?;
//! assert_eq!(sql, "select name from users where `user_id` in (1, 2, 3)");
//! ```

mod render;
mod state;


use crate::error::{ArgumentError, ParseErrorKind, PlaceholderKind, TemplateError, TemplateResult};
use crate::escape::Escaper;
use crate::value::Value;
use render::Renderer;
use state::{Block, ScanState};

/// Renders templates into fully-inlined SQL.
///
/// The parser holds nothing but its [`Escaper`]; every call to
/// [`parse`](QueryParser::parse) is independent, so a parser can be shared
/// across threads whenever the escaper can.
#[derive(Debug, Clone, Default)]
pub struct QueryParser<E> {
    escaper: E,
}

impl<E: Escaper> QueryParser<E> {
    /// Create a parser that escapes through `escaper`.
    pub fn new(escaper: E) -> Self {
        Self { escaper }
    }

    /// The escaper used for string literals and identifiers.
    pub fn escaper(&self) -> &E {
        &self.escaper
    }

    /// Substitute `params` into `template`.
    ///
    /// The Nth placeholder in the template (inside or outside a conditional
    /// block) consumes `params[N]`. A `{ ... }` block is dropped when any value
    /// consumed inside it is strictly equal to `skip`.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::Parse`] for a malformed template: `??`, nested or
    ///   unmatched braces, an unterminated block or string literal.
    /// - [`TemplateError::InvalidArgument`] when a placeholder has no matching
    ///   parameter or the value's shape is not accepted by the placeholder.
    ///
    /// No partial output is returned on error.
    pub fn parse(&self, template: &str, params: &[Value], skip: &Value) -> TemplateResult<String> {
        let scanner = Scanner::new(Renderer::new(&self.escaper), params, skip);
        let result = scanner.run(template);

        #[cfg(feature = "tracing")]
        log_outcome(template, params.len(), &result);

        result.map(|done| done.sql)
    }
}

#[cfg(feature = "tracing")]
const MAX_LOGGED_SQL: usize = 200;

#[cfg(feature = "tracing")]
fn log_outcome(template: &str, param_count: usize, result: &TemplateResult<Rendered>) {
    match result {
        Ok(done) => tracing::debug!(
            target: "sqltmpl.parse",
            param_count,
            consumed = done.consumed,
            blocks_dropped = done.blocks_dropped,
            sql = %truncate_sql_bytes(&done.sql, MAX_LOGGED_SQL),
            "template rendered"
        ),
        Err(err) => tracing::warn!(
            target: "sqltmpl.parse",
            param_count,
            template = %truncate_sql_bytes(template, MAX_LOGGED_SQL),
            error = %err,
            "template rejected"
        ),
    }
}

#[cfg(feature = "tracing")]
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Output of one successful scan.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
struct Rendered {
    sql: String,
    consumed: usize,
    blocks_dropped: usize,
}

/// Per-call scanner state. Never outlives a single `parse`.
struct Scanner<'a, E: ?Sized> {
    renderer: Renderer<'a, E>,
    params: &'a [Value],
    skip: &'a Value,
    next_param: usize,
    state: ScanState,
    block: Option<Block<'a>>,
    out: String,
    blocks_dropped: usize,
}

impl<'a, E: Escaper + ?Sized> Scanner<'a, E> {
    fn new(renderer: Renderer<'a, E>, params: &'a [Value], skip: &'a Value) -> Self {
        Self {
            renderer,
            params,
            skip,
            next_param: 0,
            state: ScanState::General,
            block: None,
            out: String::new(),
            blocks_dropped: 0,
        }
    }

    fn run(mut self, template: &str) -> TemplateResult<Rendered> {
        self.out.reserve(template.len());

        for (offset, c) in template.char_indices() {
            self.step(offset, c)?;
        }
        self.finish()?;

        Ok(Rendered {
            sql: self.out,
            consumed: self.next_param,
            blocks_dropped: self.blocks_dropped,
        })
    }

    fn step(&mut self, offset: usize, c: char) -> TemplateResult<()> {
        match self.state {
            ScanState::StringLiteral { .. } => {
                if c == '\'' {
                    self.state = ScanState::General;
                }
                self.push(c);
                Ok(())
            }
            ScanState::Placeholder => {
                if c == '?' {
                    return Err(TemplateError::parse(ParseErrorKind::DoublePlaceholder, offset));
                }
                self.state = ScanState::General;
                match PlaceholderKind::from_suffix(c) {
                    Some(kind) => self.resolve(kind),
                    None => {
                        // A bare `?`: resolve it, then treat `c` as ordinary input.
                        self.resolve(PlaceholderKind::Generic)?;
                        self.step(offset, c)
                    }
                }
            }
            ScanState::General => match c {
                '?' => {
                    self.state = ScanState::Placeholder;
                    Ok(())
                }
                '\'' => {
                    self.state = ScanState::StringLiteral { start: offset };
                    self.push(c);
                    Ok(())
                }
                '{' => self.open_block(offset),
                '}' => self.close_block(offset),
                _ => {
                    self.push(c);
                    Ok(())
                }
            },
        }
    }

    fn finish(&mut self) -> TemplateResult<()> {
        if let Some(block) = &self.block {
            return Err(TemplateError::parse(ParseErrorKind::UnterminatedBlock, block.start));
        }
        match self.state {
            ScanState::StringLiteral { start } => Err(TemplateError::parse(
                ParseErrorKind::UnterminatedString,
                start,
            )),
            ScanState::Placeholder => {
                self.state = ScanState::General;
                self.resolve(PlaceholderKind::Generic)
            }
            ScanState::General => Ok(()),
        }
    }

    fn open_block(&mut self, offset: usize) -> TemplateResult<()> {
        if self.block.is_some() {
            return Err(TemplateError::parse(ParseErrorKind::NestedBlock, offset));
        }
        self.block = Some(Block::open(offset));
        Ok(())
    }

    fn close_block(&mut self, offset: usize) -> TemplateResult<()> {
        let Some(block) = self.block.take() else {
            return Err(TemplateError::parse(ParseErrorKind::UnmatchedBlockClose, offset));
        };
        if block.is_included(self.skip) {
            self.out.push_str(&block.buf);
        } else {
            self.blocks_dropped += 1;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                target: "sqltmpl.parse",
                block_start = block.start,
                block_end = offset,
                "conditional block dropped"
            );
        }
        Ok(())
    }

    /// Consume the next parameter and render it into the active output.
    fn resolve(&mut self, kind: PlaceholderKind) -> TemplateResult<()> {
        let params = self.params;
        let index = self.next_param;
        let value = params.get(index).ok_or(ArgumentError::MissingParam {
            index,
            supplied: params.len(),
        })?;
        self.next_param += 1;

        match self.block.as_mut() {
            Some(block) => {
                block.values.push(value);
                self.renderer.write(&mut block.buf, kind, value)
            }
            None => self.renderer.write(&mut self.out, kind, value),
        }
    }

    fn push(&mut self, c: char) {
        match self.block.as_mut() {
            Some(block) => block.buf.push(c),
            None => self.out.push(c),
        }
    }
}
