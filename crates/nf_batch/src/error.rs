use std::fmt;
use std::path::PathBuf;

use nf_ast::ConvertError;

/// Errors produced by the file and batch wrappers.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Convert {
        path: PathBuf,
        source: ConvertError,
    },

    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("{} is also the output of {}", output.display(), claimed_by.display())]
    OutputCollision {
        output: PathBuf,
        claimed_by: PathBuf,
    },

    #[error("{} of {total} file(s) failed to convert:\n{}", failures.len(), FailureList(failures))]
    Failed {
        total: usize,
        failures: Vec<FileFailure>,
    },
}

/// One failed file of a batch.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: BatchError,
}

struct FailureList<'a>(&'a [FileFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {}", failure.error)?;
        }
        Ok(())
    }
}
