pub mod rewrite;
pub mod substitute;

pub use rewrite::{rewrite_file, rewrite_stream, RewriteStats, StreamError};
pub use substitute::Substitution;
