use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

use crate::config::ReplaceStrategy;
use crate::error::{IoOp, ReplaceError, Result};
use crate::file::substitute::Substitution;
use crate::utils::paths::temp_path_for;

/// Counters for a single rewritten file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub lines: usize,
    pub replacements: usize,
    pub bytes_written: u64,
}

/// Which side of the stream failed
#[derive(Debug)]
pub enum StreamError {
    Read(io::Error),
    Write(io::Error),
}

/// Copy `reader` to `writer` line by line, substituting as it goes.
///
/// Every `\n`-terminated line gets all occurrences replaced. The unterminated
/// fragment at end of input (possibly empty) gets only its first occurrence
/// replaced. That asymmetry is long-standing output behaviour and may be an
/// accident; keep it until callers agree otherwise.
pub fn rewrite_stream<R, W>(
    reader: &mut R,
    writer: &mut W,
    substitution: &Substitution,
) -> std::result::Result<RewriteStats, StreamError>
where
    R: BufRead,
    W: Write,
{
    let mut stats = RewriteStats::default();
    let mut line = Vec::new();
    let mut out = Vec::new();

    loop {
        line.clear();
        out.clear();
        reader
            .read_until(b'\n', &mut line)
            .map_err(StreamError::Read)?;

        let terminated = line.last() == Some(&b'\n');
        let buf: &[u8] = if !substitution.contained_in(&line) {
            &line
        } else {
            stats.replacements += if terminated {
                substitution.replace_all(&line, &mut out)
            } else {
                substitution.replace_first(&line, &mut out)
            };
            &out
        };

        writer.write_all(buf).map_err(StreamError::Write)?;
        stats.bytes_written += buf.len() as u64;

        if !terminated {
            if !line.is_empty() {
                stats.lines += 1;
            }
            break;
        }
        stats.lines += 1;
    }

    writer.flush().map_err(StreamError::Write)?;
    Ok(stats)
}

/// Rewrite `path` through its `-modified` temp file, then put the temp file in
/// its place according to `strategy`.
///
/// A read failure removes the temp file and reports both outcomes. A write
/// failure leaves the temp file on disk.
pub fn rewrite_file(
    path: &Path,
    substitution: &Substitution,
    strategy: ReplaceStrategy,
) -> Result<RewriteStats> {
    let source = File::open(path).map_err(|e| ReplaceError::io(IoOp::Open, path, e))?;
    let temp = temp_path_for(path);
    let target = File::create(&temp).map_err(|e| ReplaceError::io(IoOp::Create, &temp, e))?;
    debug!("Rewriting {} via {}", path.display(), temp.display());

    let mut reader = BufReader::new(source);
    let mut writer = BufWriter::new(target);
    let result = rewrite_stream(&mut reader, &mut writer, substitution);

    // Both handles are closed before anything is removed or renamed
    drop(writer);
    drop(reader);

    let stats = match result {
        Ok(stats) => stats,
        Err(StreamError::Read(err)) => {
            let cleanup = remove_temp(&temp);
            return Err(ReplaceError::read_aborted(path, temp, err, cleanup));
        }
        Err(StreamError::Write(err)) => {
            return Err(ReplaceError::io(IoOp::Write, temp, err));
        }
    };

    promote(&temp, path, strategy)?;
    Ok(stats)
}

/// Remove a temp file left by an aborted rewrite. A missing file counts as removed.
pub fn remove_temp(temp: &Path) -> Option<io::Error> {
    match fs::remove_file(temp) {
        Ok(()) => None,
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            warn!("Failed to remove temp file {}: {}", temp.display(), err);
            Some(err)
        }
    }
}

/// Put the finished temp file at `path`
pub fn promote(temp: &Path, path: &Path, strategy: ReplaceStrategy) -> Result<()> {
    if strategy == ReplaceStrategy::DeleteThenRename {
        fs::remove_file(path).map_err(|e| ReplaceError::io(IoOp::Remove, path, e))?;
    }
    fs::rename(temp, path).map_err(|e| ReplaceError::io(IoOp::Rename, temp, e))
}
