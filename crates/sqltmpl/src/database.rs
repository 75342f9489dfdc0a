//! Query-building facade bundling a parser with its skip sentinel.

use crate::error::TemplateResult;
use crate::escape::Escaper;
use crate::parser::QueryParser;
use crate::value::Value;

/// Builds inlined SQL for one connection or escaping context.
///
/// `Database` owns a [`QueryParser`] and the value callers pass to omit a
/// conditional block (see [`skip`](Database::skip)).
///
/// # Example
/// ```ignore
/// use sqltmpl::{Database, MysqlEscaper};
///
/// let db = Database::new(MysqlEscaper);
/// let sql = db.build_query(
///     "select name from users where ?# in (?a){ and block = ?d}",
///     &["user_id".into(), vec![1, 2, 3].into(), db.skip().clone()],
/// )?;
/// ```
#[derive(Debug, Clone)]
pub struct Database<E> {
    parser: QueryParser<E>,
    skip: Value,
}

impl<E: Escaper> Database<E> {
    /// Create a facade whose skip sentinel is `Value::Null`.
    pub fn new(escaper: E) -> Self {
        Self {
            parser: QueryParser::new(escaper),
            skip: Value::Null,
        }
    }

    /// Use a different skip sentinel.
    pub fn with_skip(mut self, skip: impl Into<Value>) -> Self {
        self.skip = skip.into();
        self
    }

    /// Render `template` with `args`, dropping blocks bound to [`skip`](Self::skip).
    pub fn build_query(&self, template: &str, args: &[Value]) -> TemplateResult<String> {
        self.parser.parse(template, args, &self.skip)
    }

    /// The value that omits a conditional block when bound inside it.
    pub fn skip(&self) -> &Value {
        &self.skip
    }

    pub fn parser(&self) -> &QueryParser<E> {
        &self.parser
    }
}
