//! Declaration locator.
//!
//! Scans the top-level statements of a parsed script for `define(...)`
//! expression statements and lowers the single match into a [`DefineCall`].
//! Calls nested inside functions, conditionals or expressions are ignored.

use nf_ast::{
    ConvertError, DefineArg, DefineCall, Directive, FactoryBody, FactoryDescriptor, ReturnNode,
    TextRange, DEFINE_IDENT,
};
use swc_common::Spanned;
use swc_ecma_ast as ast;

use crate::parse::ParseResult;

/// Find the module declaration of a parsed script.
///
/// Returns `Ok(None)` when the script declares nothing, and
/// [`ConvertError::MultipleDefines`] when it declares more than once.
pub fn locate_define(
    parsed: &ParseResult,
    source: &str,
) -> Result<Option<DefineCall>, ConvertError> {
    let mut defines = parsed
        .script
        .body
        .iter()
        .filter_map(|stmt| as_define(stmt).map(|call| (stmt, call)));

    let Some((stmt, call)) = defines.next() else {
        return Ok(None);
    };
    if defines.next().is_some() {
        return Err(ConvertError::MultipleDefines);
    }

    let lowering = Lowering { parsed, source };
    Ok(Some(DefineCall {
        range: parsed.range(stmt.span()),
        args: call.args.iter().map(|arg| lowering.arg(&arg.expr)).collect(),
    }))
}

fn as_define(stmt: &ast::Stmt) -> Option<&ast::CallExpr> {
    let ast::Stmt::Expr(ast::ExprStmt { expr, .. }) = stmt else {
        return None;
    };
    let ast::Expr::Call(call) = &**expr else {
        return None;
    };
    match &call.callee {
        ast::Callee::Expr(callee) => match &**callee {
            ast::Expr::Ident(ident) if &*ident.sym == DEFINE_IDENT => Some(call),
            _ => None,
        },
        _ => None,
    }
}

struct Lowering<'a> {
    parsed: &'a ParseResult,
    source: &'a str,
}

impl Lowering<'_> {
    fn range(&self, node: &impl Spanned) -> TextRange {
        self.parsed.range(node.span())
    }

    fn arg(&self, expr: &ast::Expr) -> DefineArg {
        match expr {
            ast::Expr::Lit(ast::Lit::Str(lit)) => DefineArg::ModuleId {
                range: self.range(lit),
                id: string_value(lit),
            },
            ast::Expr::Array(array) => DefineArg::Dependencies {
                range: self.range(array),
                elements: array
                    .elems
                    .iter()
                    .map(|elem| match elem.as_ref().map(|e| &*e.expr) {
                        Some(ast::Expr::Lit(ast::Lit::Str(lit))) => string_value(lit),
                        _ => String::new(),
                    })
                    .collect(),
            },
            ast::Expr::Fn(fn_expr) => DefineArg::Factory(self.function(&fn_expr.function)),
            ast::Expr::Arrow(arrow) => DefineArg::Factory(self.arrow(arrow)),
            ast::Expr::Paren(paren) => self.arg(&paren.expr),
            other => DefineArg::Value {
                range: self.range(other),
            },
        }
    }

    fn function(&self, function: &ast::Function) -> FactoryDescriptor {
        let params = function.params.iter().map(|p| param_name(&p.pat)).collect();
        match &function.body {
            Some(block) => self.block_factory(self.range(function), params, block),
            // Only overload signatures lack a body; a parsed script never has one.
            None => FactoryDescriptor {
                range: self.range(function),
                params,
                body: FactoryBody::Block {
                    range: self.range(function),
                },
                use_strict: None,
                return_stmt: None,
            },
        }
    }

    fn arrow(&self, arrow: &ast::ArrowExpr) -> FactoryDescriptor {
        let params = arrow.params.iter().map(param_name).collect();
        match &*arrow.body {
            ast::BlockStmtOrExpr::BlockStmt(block) => {
                self.block_factory(self.range(arrow), params, block)
            }
            ast::BlockStmtOrExpr::Expr(expr) => FactoryDescriptor {
                range: self.range(arrow),
                params,
                body: FactoryBody::Expression {
                    range: self.range(&**expr),
                },
                use_strict: None,
                return_stmt: None,
            },
        }
    }

    fn block_factory(
        &self,
        range: TextRange,
        params: Vec<Option<String>>,
        block: &ast::BlockStmt,
    ) -> FactoryDescriptor {
        let use_strict = block.stmts.first().and_then(|stmt| self.use_strict(stmt));
        let return_stmt = block.stmts.iter().find_map(|stmt| match stmt {
            ast::Stmt::Return(ret) if ret.arg.is_some() => Some(ReturnNode {
                range: self.range(ret),
            }),
            _ => None,
        });

        FactoryDescriptor {
            range,
            params,
            body: FactoryBody::Block {
                range: self.range(block),
            },
            use_strict,
            return_stmt,
        }
    }

    fn use_strict(&self, stmt: &ast::Stmt) -> Option<Directive> {
        let ast::Stmt::Expr(expr_stmt) = stmt else {
            return None;
        };
        let ast::Expr::Lit(ast::Lit::Str(lit)) = &*expr_stmt.expr else {
            return None;
        };
        let literal = self.range(lit);
        (unquote(literal.slice(self.source)) == "use strict").then(|| Directive {
            range: self.range(expr_stmt),
            literal,
        })
    }
}

/// Cooked value of a string literal, escapes resolved by the parser.
fn string_value(lit: &ast::Str) -> String {
    lit.value.to_string_lossy().into_owned()
}

fn param_name(pat: &ast::Pat) -> Option<String> {
    match pat {
        ast::Pat::Ident(binding) => Some(binding.id.sym.to_string()),
        _ => None,
    }
}

/// Strip the surrounding quotes of a raw string literal.
fn unquote(raw: &str) -> &str {
    if raw.len() >= 2 {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}
