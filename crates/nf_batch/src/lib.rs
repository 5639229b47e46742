//! File and batch wrappers around [`nf_convert::convert`].
//!
//! The converter itself is pure. Everything here is I/O: reading inputs,
//! expanding glob patterns, mirroring paths into an output directory and
//! creating the directories on the way.

mod batch;
mod error;
mod file;

pub use batch::{common_root, concat_results, convert_batch, BatchRecord};
pub use error::{BatchError, FileFailure};
pub use file::convert_file;
