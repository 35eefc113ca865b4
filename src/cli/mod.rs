//! CLI command handlers.

pub mod args;
pub mod handlers;

pub use args::{Cli, Commands, QueryFormat};
pub use handlers::{handle_aggregate, handle_query, handle_span, handle_trends, QueryArgs, TrendArgs};
