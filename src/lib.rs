// resub - recursive literal search and replace over glob-matched files

pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod utils;
pub mod walker;

pub use config::{Invocation, ReplaceStrategy};
pub use error::{ErrorKind, ReplaceError, Result};
pub use walker::{run, WalkSummary};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
