use std::{ops::Range, sync::Arc};

use anyhow::{Result, anyhow};
use swc_common::{
    BytePos, FileName, GLOBALS, Globals, SourceMap, Span, Spanned,
    comments::{CommentKind, SingleThreadedComments},
};
use swc_ecma_ast::Program;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax};

/// A comment with its byte range in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptComment {
    /// Full comment range including the `//` or `/* */` delimiters.
    pub range: Range<usize>,
    /// Comment body without delimiters.
    pub text: String,
    pub block: bool,
}

pub struct ParsedScript {
    pub program: Program,
    pub source_map: Arc<SourceMap>,
    pub start_pos: BytePos,
    /// Every comment in the file, sorted by position.
    pub comments: Vec<ScriptComment>,
}

impl ParsedScript {
    /// Convert an swc span into a byte range of the source text.
    pub fn byte_range(&self, span: Span) -> Range<usize> {
        (span.lo.0 - self.start_pos.0) as usize..(span.hi.0 - self.start_pos.0) as usize
    }

    /// 1-based line and column of a byte position.
    pub fn line_col(&self, pos: BytePos) -> (usize, usize) {
        let loc = self.source_map.lookup_char_pos(pos);
        (loc.line, loc.col_display + 1)
    }
}

/// Parse a browser script (classic script or ES module) into an AST.
///
/// Accepts a shared SourceMap so several files can be parsed from rayon
/// workers.
pub fn parse_script(
    code: String,
    file_path: &str,
    source_map: Arc<SourceMap>,
) -> Result<ParsedScript> {
    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);
        let start_pos = source_file.start_pos;

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            Syntax::Es(EsSyntax::default()),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let program = parser.parse_program().map_err(|e| {
            let loc = source_map.lookup_char_pos(e.span().lo);
            anyhow!(
                "{}:{}:{}: {}",
                file_path,
                loc.line,
                loc.col_display + 1,
                e.kind().msg()
            )
        })?;

        let (leading, trailing) = comments.borrow_all();
        let mut collected: Vec<ScriptComment> = leading
            .values()
            .chain(trailing.values())
            .flatten()
            .map(|cmt| ScriptComment {
                range: (cmt.span.lo.0 - start_pos.0) as usize
                    ..(cmt.span.hi.0 - start_pos.0) as usize,
                text: cmt.text.to_string(),
                block: cmt.kind == CommentKind::Block,
            })
            .collect();
        collected.sort_by_key(|c| c.range.start);
        collected.dedup_by_key(|c| c.range.start);

        Ok(ParsedScript {
            program,
            source_map,
            start_pos,
            comments: collected,
        })
    })
}
