use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::{Invocation, ReplaceStrategy};
use crate::error::{ReplaceError, Result};
use crate::file::rewrite::{rewrite_file, RewriteStats};
use crate::file::substitute::Substitution;
use crate::utils::pattern::BaseNameMatcher;

/// Totals for a walk that ran to completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Non-directory entries seen
    pub visited: usize,
    /// Files that matched and were rewritten; a matched file that fails
    /// ends the walk, so every match on a finished walk is counted here
    pub rewritten: usize,
    pub replacements: usize,
}

/// Terminal state of one candidate file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Skipped,
    Completed(RewriteStats),
}

/// Walk `invocation.source_dir` and rewrite every file whose base name matches.
///
/// Stops at the first error. Files rewritten before that point stay rewritten
/// and nothing is reported about them.
pub fn run(invocation: &Invocation) -> Result<WalkSummary> {
    invocation.validate()?;

    let root = invocation.source_dir.as_path();
    info!(
        "Replacing {:?} with {:?} in files matching `{}` under {}",
        invocation.from,
        invocation.to,
        invocation.pattern,
        root.display()
    );

    // Pattern errors surface at the first candidate, like any other per-file error
    let compiled = BaseNameMatcher::new(&invocation.pattern);
    let substitution = Substitution::new(invocation.from.as_bytes(), invocation.to.as_bytes());
    let mut summary = WalkSummary::default();

    // Sorting makes walkdir read each directory fully before yielding from it,
    // so renamed and temp files are never picked up as new entries.
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| ReplaceError::walk(root, e))?;
        if entry.file_type().is_dir() {
            continue;
        }
        summary.visited += 1;

        let matcher = compiled.as_ref().map_err(Clone::clone)?;
        match visit(entry.path(), matcher, &substitution, invocation.strategy)? {
            Outcome::Skipped => {}
            Outcome::Completed(stats) => {
                summary.rewritten += 1;
                summary.replacements += stats.replacements;
            }
        }
    }

    info!(
        "Rewrote {} of {} files ({} replacements)",
        summary.rewritten, summary.visited, summary.replacements
    );
    Ok(summary)
}

/// Take one non-directory entry from discovery to a terminal state
pub fn visit(
    path: &Path,
    matcher: &BaseNameMatcher,
    substitution: &Substitution,
    strategy: ReplaceStrategy,
) -> Result<Outcome> {
    if !matcher.matches_path(path) {
        debug!("Skipping {}", path.display());
        return Ok(Outcome::Skipped);
    }

    let stats = rewrite_file(path, substitution, strategy)?;
    debug!(
        "Rewrote {}: {} lines, {} replacements",
        path.display(),
        stats.lines,
        stats.replacements
    );
    Ok(Outcome::Completed(stats))
}
