use nf_ast::{ConvertError, TextRange};
use swc_common::{sync::Lrc, FileName, SourceFile, SourceMap, Span, Spanned};
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::{EsSyntax, Syntax};

const BOM: char = '\u{feff}';

/// Result of parsing a source file.
pub struct ParseResult {
    pub script: swc_ecma_ast::Script,
    pub source_map: Lrc<SourceMap>,
    pub source_file: Lrc<SourceFile>,
    /// Bytes of the original source that precede the parsed text (a UTF-8 BOM).
    pub skipped: usize,
}

impl ParseResult {
    /// Rebase an SWC span onto byte offsets of the original source.
    pub fn range(&self, span: Span) -> TextRange {
        let base = self.source_file.start_pos.0;
        TextRange::new(
            (span.lo.0 - base) as usize + self.skipped,
            (span.hi.0 - base) as usize + self.skipped,
        )
    }
}

/// Parse an ECMAScript source string as a script.
///
/// AMD modules are scripts, not ES modules. Top-level `return` is accepted so
/// that already converted CommonJS output parses again unchanged. Recovered
/// errors are treated as fatal, like unrecoverable ones.
///
/// A leading byte order mark is not handed to SWC, which would drop it
/// silently; ranges are shifted past it instead so they still index `source`.
pub fn parse_script(source: &str, filename: &str) -> Result<ParseResult, ConvertError> {
    let text = source.strip_prefix(BOM).unwrap_or(source);
    let skipped = source.len() - text.len();

    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        text.to_string(),
    );

    let syntax = Syntax::Es(EsSyntax {
        allow_return_outside_function: true,
        ..Default::default()
    });

    let mut recovered = Vec::new();
    let parsed = swc_ecma_parser::parse_file_as_script(
        &source_file,
        syntax,
        EsVersion::latest(),
        None,
        &mut recovered,
    );

    let script = match parsed {
        Ok(script) => script,
        Err(e) => return Err(syntax_error(&source_map, filename, &e)),
    };
    if let Some(e) = recovered.first() {
        return Err(syntax_error(&source_map, filename, e));
    }

    tracing::trace!(filename, statements = script.body.len(), "parsed script");

    Ok(ParseResult {
        script,
        source_map,
        source_file,
        skipped,
    })
}

fn syntax_error(
    source_map: &SourceMap,
    filename: &str,
    error: &swc_ecma_parser::error::Error,
) -> ConvertError {
    let loc = source_map.lookup_char_pos(error.span().lo);
    ConvertError::Syntax {
        file: filename.to_string(),
        line: loc.line,
        column: loc.col_display + 1,
        message: error.kind().msg().into_owned(),
    }
}
