//! Output assembly from borrowed source spans and generated text.

use std::borrow::Cow;

use nf_ast::TextRange;

/// One piece of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<'a> {
    /// Copied verbatim from the source.
    Source(TextRange),
    /// Generated by the rewriter.
    Text(Cow<'a, str>),
}

/// An output file described as spans of the original text interleaved
/// with generated fragments. Nothing is concatenated until [`Splice::finish`].
#[derive(Debug, Clone)]
pub struct Splice<'a> {
    source: &'a str,
    fragments: Vec<Fragment<'a>>,
}

impl<'a> Splice<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            fragments: Vec::new(),
        }
    }

    pub fn push_source(&mut self, range: TextRange) {
        if !range.is_empty() {
            self.fragments.push(Fragment::Source(range));
        }
    }

    pub fn push_text(&mut self, text: impl Into<Cow<'a, str>>) {
        let text = text.into();
        if !text.is_empty() {
            self.fragments.push(Fragment::Text(text));
        }
    }

    pub fn fragments(&self) -> &[Fragment<'a>] {
        &self.fragments
    }

    /// Concatenate all fragments.
    pub fn finish(&self) -> String {
        let len = self
            .fragments
            .iter()
            .map(|f| match f {
                Fragment::Source(range) => range.len(),
                Fragment::Text(text) => text.len(),
            })
            .sum();
        let mut out = String::with_capacity(len);
        for fragment in &self.fragments {
            out.push_str(match fragment {
                Fragment::Source(range) => range.slice(self.source),
                Fragment::Text(text) => text.as_ref(),
            });
        }
        out
    }
}
