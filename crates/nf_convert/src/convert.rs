//! Top-level conversion entry point.

use nf_ast::{ConvertError, ConvertOptions, DefineCall, TextRange};
use nf_parser::{locate_define, parse_script};

use crate::body::{rewrite_body, EXPORT_ASSIGNMENT};
use crate::mapping::{map_dependencies, render_mappings};
use crate::resolve::Resolver;
use crate::splice::Splice;

/// Convert an AMD module to CommonJS.
///
/// Returns the input unchanged when it has no top-level `define(...)`.
pub fn convert(source: &str, options: &ConvertOptions) -> Result<String, ConvertError> {
    convert_named(source, "<input>", options)
}

/// Like [`convert`], with a file name for syntax error messages.
pub fn convert_named(
    source: &str,
    filename: &str,
    options: &ConvertOptions,
) -> Result<String, ConvertError> {
    let parsed = parse_script(source, filename)?;
    let Some(call) = locate_define(&parsed, source)? else {
        tracing::debug!(filename, "no define call, leaving source unchanged");
        return Ok(source.to_string());
    };

    let splice = assemble(source, &call, options)?;
    Ok(splice.finish())
}

/// Lay out the converted file:
///
/// 1. hoisted `"use strict";`
/// 2. source text before the define statement
/// 3. mapping statements
/// 4. rewritten factory body
/// 5. source text after the define statement
pub fn assemble<'a>(
    source: &'a str,
    call: &DefineCall,
    options: &ConvertOptions,
) -> Result<Splice<'a>, ConvertError> {
    let prefix = TextRange::new(0, call.range.start);
    let suffix = TextRange::new(call.range.end, source.len());
    let mut out = Splice::new(source);

    if let Some(factory) = call.factory() {
        let module_id = call.module_id().or(options.module_id.as_deref());
        let resolver = Resolver::new(options, module_id)?;
        let mappings = map_dependencies(call.dependencies(), &factory.params, &resolver)?;

        if let Some(directive) = factory.use_strict {
            out.push_source(directive.literal);
            out.push_text(";\n");
        }
        out.push_source(prefix);
        out.push_text(render_mappings(&mappings));
        rewrite_body(factory, &mut out);
    } else if let Some(value) = call.value() {
        out.push_source(prefix);
        out.push_text(EXPORT_ASSIGNMENT);
        out.push_text(" ");
        out.push_source(value);
        out.push_text(";");
    } else {
        return Err(ConvertError::MissingFactory);
    }

    out.push_source(suffix);
    Ok(out)
}
