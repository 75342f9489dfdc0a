//! # sqltmpl
//!
//! Typed-placeholder SQL templates rendered to fully-inlined, escaped SQL.
//!
//! ## Features
//!
//! - **Typed placeholders**: `?`, `?d`, `?f`, `?a`, `?#`
//! - **Conditional blocks**: `{ ... }` is dropped when a value bound inside it
//!   equals the skip sentinel
//! - **Literal-aware**: placeholder syntax is inert inside `'...'`
//! - **Injected escaping**: strings and identifiers go through an [`Escaper`],
//!   so the parser needs no live connection
//! - **Tracing**: optional `tracing` events under the `sqltmpl.parse` target
//!
//! ## Example
//!
//! ```ignore
//! use sqltmpl::{Database, MysqlEscaper, Value, value};
//!
//! let db = Database::new(MysqlEscaper);
//!
//! let sql = db.build_query(
//!     "update users set ?a where user_id = ?d",
//!     &[value::map([("name", "Jack")]), Value::from(7)],
//! )?;
//! assert_eq!(sql, "update users set `name` = 'Jack' where user_id = 7");
//! ```

pub mod database;
pub mod error;
pub mod escape;
pub mod parser;
pub mod value;

pub use database::Database;
pub use error::{ArgumentError, ParseErrorKind, PlaceholderKind, TemplateError, TemplateResult};
pub use escape::{Escaper, MysqlEscaper};
pub use parser::QueryParser;
pub use value::Value;
