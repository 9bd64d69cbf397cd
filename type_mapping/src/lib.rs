//! PostgreSQL composite/array text literals
//!
//! This crate holds the value model shared by every converter in the workspace:
//! the tuple tree itself, a forward-only reader over literal text, an
//! append-only writer, and the escaping rules that apply when a literal is
//! embedded inside an enclosing quoted literal.

pub mod errors;
pub mod escaping;
pub mod parse;
pub mod reader;
pub mod serialize;
pub mod types;
pub mod validate;
pub mod writer;

pub use errors::TupleError;
pub use escaping::{nested_context, Escaping, Level};
pub use parse::{read_collection, read_record_body, skip_field};
pub use reader::PostgresReader;
pub use types::{PostgresTuple, ScalarValue, TupleShape};
pub use validate::{requires_quoting, validate};
pub use writer::PostgresWriter;
