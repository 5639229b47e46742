//! Script parser and declaration locator for nodefy.
//!
//! Wraps the standard SWC parser and lowers the single top-level
//! `define(...)` call into the [`nf_ast`] declaration model:
//!
//! - Module id literal (`define('app/main', ...)`)
//! - Dependency array (`define(['jquery'], ...)`)
//! - Factory function, its leading `"use strict"` and first `return`
//!
//! Offsets in the model are byte offsets into the source passed to
//! [`parse_script`], never SWC `BytePos` values.

pub mod locate;
pub mod parse;

pub use locate::locate_define;
pub use parse::{parse_script, ParseResult};
