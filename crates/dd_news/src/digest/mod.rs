pub mod formatter;
pub mod parser;

pub use formatter::{format_digest, format_digest_at, group_by_topic};
pub use parser::{parse_digest, parse_fallback, parse_relaxed, parse_strict};
