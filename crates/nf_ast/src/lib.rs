//! Declaration model for the nodefy rewriter.
//!
//! The locator lowers the SWC syntax tree into the small closed set of node
//! shapes the rewriter cares about. Every node carries a [`TextRange`] of byte
//! offsets into the original source, so the assembler can splice the output
//! from borrowed spans instead of re-emitting code.

mod error;
mod options;

pub use error::ConvertError;
pub use options::{ConvertOptions, MapEntry, SubstitutionTable};

use serde::Serialize;

/// Callee name of the module declaration call.
pub const DEFINE_IDENT: &str = "define";

/// The three capabilities an AMD loader injects by convention.
pub const MAGIC_IDENTS: [&str; 3] = ["require", "exports", "module"];

/// Returns `true` for `require`, `exports` and `module`.
pub fn is_magic(id: &str) -> bool {
    MAGIC_IDENTS.contains(&id)
}

/// Half-open byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted range {start}..{end}");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Borrow the covered text from `source`.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// The single top-level `define(...)` statement of a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefineCall {
    /// Range of the whole expression statement, terminating `;` included.
    pub range: TextRange,
    pub args: Vec<DefineArg>,
}

impl DefineCall {
    /// The module id literal, e.g. `'app/main'` in `define('app/main', [...], fn)`.
    pub fn module_id(&self) -> Option<&str> {
        self.args.iter().find_map(|arg| match arg {
            DefineArg::ModuleId { id, .. } => Some(id.as_str()),
            _ => None,
        })
    }

    /// Declared dependency identifiers, or `None` for the simplified form.
    pub fn dependencies(&self) -> Option<&[String]> {
        self.args.iter().find_map(|arg| match arg {
            DefineArg::Dependencies { elements, .. } => Some(elements.as_slice()),
            _ => None,
        })
    }

    /// The first factory function argument.
    pub fn factory(&self) -> Option<&FactoryDescriptor> {
        self.args.iter().find_map(|arg| match arg {
            DefineArg::Factory(factory) => Some(factory),
            _ => None,
        })
    }

    /// The first plain value argument (`define({ ... })`).
    pub fn value(&self) -> Option<TextRange> {
        self.args.iter().find_map(|arg| match arg {
            DefineArg::Value { range } => Some(*range),
            _ => None,
        })
    }
}

/// One argument of the declaration call, tagged by shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DefineArg {
    /// A string literal naming the declared module.
    ModuleId { range: TextRange, id: String },
    /// The dependency array. Elements that are not string literals are empty.
    Dependencies {
        range: TextRange,
        elements: Vec<String>,
    },
    /// A `function` expression or arrow function.
    Factory(FactoryDescriptor),
    /// Any other expression, exported as-is.
    Value { range: TextRange },
}

/// Shape of the factory function as far as the rewriter needs it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactoryDescriptor {
    pub range: TextRange,
    /// Parameter names by position. Destructuring patterns are `None`.
    pub params: Vec<Option<String>>,
    pub body: FactoryBody,
    /// Leading `"use strict"` directive of a block body.
    pub use_strict: Option<Directive>,
    /// First top-level `return <expr>` of a block body.
    pub return_stmt: Option<ReturnNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FactoryBody {
    /// `{ ... }`, braces included in the range.
    Block { range: TextRange },
    /// Expression body of an arrow function.
    Expression { range: TextRange },
}

/// A directive prologue statement such as `"use strict";`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Directive {
    /// The whole statement, terminating `;` included.
    pub range: TextRange,
    /// The string literal alone, quotes included.
    pub literal: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnNode {
    pub range: TextRange,
}

impl ReturnNode {
    /// Range of the `return` keyword itself.
    pub fn keyword(&self) -> TextRange {
        TextRange::new(self.range.start, self.range.start + "return".len())
    }
}
