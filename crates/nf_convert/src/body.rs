//! Factory body rewriting.

use nf_ast::{FactoryBody, FactoryDescriptor, TextRange};

use crate::splice::Splice;

pub const EXPORT_ASSIGNMENT: &str = "module.exports =";

/// Append the inlined factory body to `out`.
///
/// The braces are dropped, a leading `"use strict"` statement is skipped
/// (the assembler hoists it), and the `return` keyword of the first
/// top-level return becomes `module.exports =`. Everything else is copied
/// verbatim.
pub fn rewrite_body(factory: &FactoryDescriptor, out: &mut Splice<'_>) {
    let block = match factory.body {
        FactoryBody::Block { range } => range,
        FactoryBody::Expression { range } => {
            out.push_text(EXPORT_ASSIGNMENT);
            out.push_text(" ");
            out.push_source(range);
            out.push_text(";");
            return;
        }
    };

    let mut start = block.start + 1;
    let end = block.end - 1;
    if let Some(directive) = factory.use_strict {
        start = directive.range.end;
    }

    match factory.return_stmt {
        Some(ret) => {
            let keyword = ret.keyword();
            out.push_source(TextRange::new(start, keyword.start));
            out.push_text(EXPORT_ASSIGNMENT);
            out.push_source(TextRange::new(keyword.end, end));
        }
        None => out.push_source(TextRange::new(start, end)),
    }
}

#[cfg(test)]
mod tests {
    use nf_ast::{Directive, ReturnNode};

    use super::*;

    fn find(source: &str, needle: &str) -> TextRange {
        let start = source.find(needle).unwrap();
        TextRange::new(start, start + needle.len())
    }

    fn block_factory(source: &str) -> FactoryDescriptor {
        FactoryDescriptor {
            range: TextRange::new(0, source.len()),
            params: vec![],
            body: FactoryBody::Block {
                range: TextRange::new(source.find('{').unwrap(), source.len()),
            },
            use_strict: None,
            return_stmt: None,
        }
    }

    fn render(source: &str, factory: &FactoryDescriptor) -> String {
        let mut out = Splice::new(source);
        rewrite_body(factory, &mut out);
        out.finish()
    }

    #[test]
    fn return_becomes_export_assignment() {
        let source = "function () {\n  var a = 1;\n  return a + 1;\n}";
        let mut factory = block_factory(source);
        factory.return_stmt = Some(ReturnNode {
            range: find(source, "return a + 1;"),
        });
        assert_eq!(
            render(source, &factory),
            "\n  var a = 1;\n  module.exports = a + 1;\n"
        );
    }

    #[test]
    fn trailing_statements_after_return_are_kept() {
        let source = "function () { return api; function api() {} }";
        let mut factory = block_factory(source);
        factory.return_stmt = Some(ReturnNode {
            range: find(source, "return api;"),
        });
        assert_eq!(
            render(source, &factory),
            " module.exports = api; function api() {} "
        );
    }

    #[test]
    fn strict_directive_is_skipped() {
        let source = "function () {\n  'use strict';\n  exports.a = 1;\n}";
        let mut factory = block_factory(source);
        factory.use_strict = Some(Directive {
            range: find(source, "'use strict';"),
            literal: find(source, "'use strict'"),
        });
        assert_eq!(render(source, &factory), "\n  exports.a = 1;\n");
    }

    #[test]
    fn body_without_return_is_verbatim() {
        let source = "function (exports) { exports.x = 1; }";
        assert_eq!(render(source, &block_factory(source)), " exports.x = 1; ");
    }

    #[test]
    fn expression_body_is_exported() {
        let source = "(a) => a.value";
        let factory = FactoryDescriptor {
            range: TextRange::new(0, source.len()),
            params: vec![Some("a".into())],
            body: FactoryBody::Expression {
                range: find(source, "a.value"),
            },
            use_strict: None,
            return_stmt: None,
        };
        assert_eq!(render(source, &factory), "module.exports = a.value;");
    }
}
