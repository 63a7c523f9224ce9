use std::path::PathBuf;
use tracing::debug;

use crate::error::{ReplaceError, Result};

/// Number of positional arguments an invocation takes
pub const ARG_COUNT: usize = 4;

/// How a finished temp file takes the place of the original
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplaceStrategy {
    /// Remove the original, then rename the temp file onto its path.
    /// A crash between the two steps loses the original.
    #[default]
    DeleteThenRename,
    /// Rename the temp file over the original in one step
    RenameOver,
}

/// Everything a single search-and-replace walk needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Root of the tree to walk
    pub source_dir: PathBuf,
    /// Shell glob matched against each file's base name
    pub pattern: String,
    /// Literal text to search for
    pub from: String,
    /// Literal text written in place of `from`
    pub to: String,
    pub strategy: ReplaceStrategy,
}

impl Invocation {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        pattern: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            pattern: pattern.into(),
            from: from.into(),
            to: to.into(),
            strategy: ReplaceStrategy::default(),
        }
    }

    /// Build an invocation from positional arguments, excluding the program name.
    ///
    /// Arguments are `<sourceDir> <globPattern> <from> <to>`. Any other count
    /// fails with [`ReplaceError::InvalidArgs`].
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let [source_dir, pattern, from, to]: [String; ARG_COUNT] =
            args.try_into().map_err(|args: Vec<String>| ReplaceError::InvalidArgs {
                expected: ARG_COUNT,
                actual: args.len(),
            })?;

        let invocation = Self::new(source_dir, pattern, from, to);
        invocation.validate()?;
        debug!("Parsed invocation: {:?}", invocation);
        Ok(invocation)
    }

    pub fn with_strategy(mut self, strategy: ReplaceStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check the source directory and pattern. Empty `from`/`to` are allowed.
    pub fn validate(&self) -> Result<()> {
        if self.source_dir.as_os_str().is_empty() {
            return Err(ReplaceError::InvalidSource);
        }
        if self.pattern.is_empty() {
            return Err(ReplaceError::InvalidGlob);
        }
        Ok(())
    }
}
