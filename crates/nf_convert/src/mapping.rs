//! Pairs factory parameters with dependency identifiers.
//!
//! Entry `i` binds parameter `i` to dependency `i`. Surplus parameters or
//! dependencies produce nothing.

use nf_ast::{is_magic, ConvertError, MAGIC_IDENTS};

use crate::resolve::Resolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingKind {
    /// `var req = require;` for a renamed magic capability.
    Alias,
    /// `var $ = require('jquery');`
    Reference,
    /// The parameter already means the right thing.
    Omitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub parameter: String,
    /// The resolved identifier.
    pub dependency: String,
    pub kind: MappingKind,
}

impl MappingEntry {
    pub fn new(parameter: impl Into<String>, dependency: impl Into<String>) -> Self {
        let parameter = parameter.into();
        let dependency = dependency.into();
        let kind = if is_magic(&dependency) {
            if parameter == dependency {
                MappingKind::Omitted
            } else {
                MappingKind::Alias
            }
        } else if dependency.is_empty() {
            MappingKind::Omitted
        } else {
            MappingKind::Reference
        };
        Self {
            parameter,
            dependency,
            kind,
        }
    }

    /// The statement binding this entry, if any.
    pub fn statement(&self) -> Option<String> {
        match self.kind {
            MappingKind::Alias => Some(format!("var {} = {};", self.parameter, self.dependency)),
            MappingKind::Reference => Some(format!(
                "var {} = require('{}');",
                self.parameter,
                escape_single_quoted(&self.dependency)
            )),
            MappingKind::Omitted => None,
        }
    }
}

/// Build the mapping entries of a factory.
///
/// `dependencies` is `None` for the simplified form, where the parameters
/// bind to `require`, `exports` and `module` by position.
pub fn map_dependencies(
    dependencies: Option<&[String]>,
    params: &[Option<String>],
    resolver: &Resolver<'_>,
) -> Result<Vec<MappingEntry>, ConvertError> {
    let defaults = MAGIC_IDENTS.map(String::from);
    let dependencies = dependencies.unwrap_or(&defaults);

    let mut entries = Vec::new();
    for (param, raw) in params.iter().zip(dependencies) {
        let Some(param) = param else {
            continue;
        };
        let dependency = if resolver.is_active() {
            resolver.resolve(raw)?
        } else {
            raw.clone()
        };
        let entry = MappingEntry::new(param.as_str(), dependency);
        tracing::debug!(
            parameter = %entry.parameter,
            raw = %raw,
            dependency = %entry.dependency,
            kind = ?entry.kind,
            "mapped dependency"
        );
        entries.push(entry);
    }
    Ok(entries)
}

/// One statement per line, in parameter order, without a trailing newline.
pub fn render_mappings(entries: &[MappingEntry]) -> String {
    entries
        .iter()
        .filter_map(MappingEntry::statement)
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_single_quoted(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for c in id.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
