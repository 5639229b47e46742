//! AMD to CommonJS rewriting.
//!
//! Transforms:
//! - `define(['dep'], function (d) { ... })` → `var d = require('dep'); ...`
//! - `function (req) { ... }` bound to `require` → `var req = require;`
//! - `return expr;` in the factory body → `module.exports = expr;`
//! - `"use strict"` in the factory body → hoisted to the top of the file
//!
//! Text outside the `define(...)` statement is copied byte for byte.

pub mod body;
pub mod convert;
pub mod mapping;
pub mod resolve;
pub mod splice;

pub use convert::{assemble, convert, convert_named};
pub use mapping::{MappingEntry, MappingKind};
pub use resolve::Resolver;
pub use splice::{Fragment, Splice};
