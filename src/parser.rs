//! Document composer: walks the source line by line, trying each construct
//! in priority order at the cursor.

mod comments;
mod lines;
mod primitives;
mod tags;

use crate::ast::{Document, Node};
use crate::error::{FailureReason, ParseError};
use primitives::{Failure, Line, Outcome};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Skip a leading U+FEFF. Raw spans then start after it.
    pub strip_bom: bool,
    /// Require the closing `*/` of a block comment to open its own line.
    pub standalone_block_close: bool,
}

pub fn parse(source: &str) -> Result<Document, ParseError> {
    parse_with_options(source, &ParseOptions::default())
}

pub fn parse_with_options(source: &str, options: &ParseOptions) -> Result<Document, ParseError> {
    let start = match source.strip_prefix('\u{feff}') {
        Some(_) if options.strip_bom => '\u{feff}'.len_utf8(),
        _ => 0,
    };
    tracing::debug!(len = source.len(), start, "parsing scenario");
    if start == source.len() {
        return Ok(Document::Empty);
    }

    let mut lines = Vec::new();
    let mut cursor = start;
    while cursor < source.len() {
        match construct_at(source, cursor, options) {
            Outcome::Matched(node, next) => {
                debug_assert!(next > cursor);
                tracing::trace!(offset = cursor, kind = node.kind(), "recognized");
                lines.push(node);
                cursor = next;
            }
            Outcome::NotApplicable => {
                let failure = Failure::new(cursor, FailureReason::Unrecognized);
                return Err(abort(source, cursor, failure));
            }
            Outcome::Invalid(failure) => return Err(abort(source, cursor, failure)),
        }
    }

    if lines.is_empty() {
        return Err(abort(source, start, Failure::new(start, FailureReason::NoLines)));
    }
    tracing::debug!(lines = lines.len(), "parsed scenario");
    Ok(Document::Scenario { lines })
}

fn construct_at(source: &str, at: usize, options: &ParseOptions) -> Outcome<Node> {
    let line = Line::at(source, at);
    comments::line_comment(&line)
        .or_else(|| comments::block_comment(source, at, options.standalone_block_close))
        .or_else(|| tags::multi_line_tag(source, at))
        .or_else(|| line_construct(&line))
}

fn line_construct(line: &Line<'_>) -> Outcome<Node> {
    lines::label(line)
        .or_else(|| lines::character(line))
        .or_else(|| tags::single_line_tag(line))
        .or_else(|| lines::bare_text(line))
}

fn abort(source: &str, construct_start: usize, failure: Failure) -> ParseError {
    tracing::debug!(offset = failure.offset, reason = %failure.reason, "parse aborted");
    ParseError::new(source, construct_start, failure.offset, failure.reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ParamValue;

    fn kinds(doc: &Document) -> Vec<&'static str> {
        doc.lines().iter().map(Node::kind).collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse(""), Ok(Document::Empty));
    }

    #[test]
    fn priority_order() {
        let src = "; c\n/*\n*/\n[bg file=room]\n*start\n#Jane\n@wait\nHello\n";
        let doc = parse(src).unwrap();
        assert_eq!(
            kinds(&doc),
            [
                "line-comment",
                "block-comment",
                "multi-line-tag",
                "label",
                "character-declaration",
                "single-line-tag",
                "bare-text",
            ]
        );
        assert_eq!(doc.raw(), src);
    }

    #[test]
    fn unclosed_bracket_falls_back_to_text() {
        let doc = parse("[not a tag").unwrap();
        let Node::BareText(t) = &doc.lines()[0] else {
            panic!("expected bare text");
        };
        assert_eq!(t.text, "[not a tag");
    }

    #[test]
    fn blank_lines_are_empty_text() {
        let doc = parse("a\n\nb").unwrap();
        assert_eq!(doc.lines().len(), 3);
        assert_eq!(doc.lines()[1].raw(), "\n");
    }

    #[test]
    fn hard_failure_aborts_everything() {
        let err = parse("Hello\n#Jane:\nnever reached").unwrap_err();
        assert_eq!(err.reason, FailureReason::EmptyEmotion);
        assert_eq!(err.offset, 12);
        assert_eq!(err.line, 2);
        assert_eq!(err.remaining, "#Jane:\nnever reached");
    }

    #[test]
    fn bom_is_opt_in() {
        let src = "\u{feff}@tag key=value";
        let doc = parse(src).unwrap();
        assert_eq!(kinds(&doc), ["bare-text"]);

        let options = ParseOptions {
            strip_bom: true,
            ..ParseOptions::default()
        };
        let doc = parse_with_options(src, &options).unwrap();
        let Node::SingleLineTag(t) = &doc.lines()[0] else {
            panic!("expected a tag");
        };
        assert_eq!(t.parameters["key"], ParamValue::text("value"));
        assert_eq!(parse_with_options("\u{feff}", &options), Ok(Document::Empty));
    }

    #[test]
    fn standalone_close_option_reaches_block_comments() {
        let src = "/* a\nb */\n";
        assert!(parse(src).is_ok());
        let options = ParseOptions {
            standalone_block_close: true,
            ..ParseOptions::default()
        };
        let err = parse_with_options(src, &options).unwrap_err();
        assert_eq!(err.reason, FailureReason::BlockCloseNotAlone);
        assert_eq!(err.offset, 7);
    }
}
