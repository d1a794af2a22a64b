use super::primitives::{line_tail, Failure, Line, Outcome};
use crate::ast::{Comment, Node};
use crate::error::FailureReason;

/// `; anything` up to the end of the line.
pub(crate) fn line_comment(line: &Line<'_>) -> Outcome<Node> {
    line.recognize(';', |body| {
        Ok(Node::LineComment(Comment {
            raw: line.raw.to_string(),
            body: body.to_string(),
        }))
    })
}

/// `/* ... */` spanning at least two physical lines. The first `*/` closes
/// it; only whitespace may follow the closer on its line.
pub(crate) fn block_comment(src: &str, at: usize, standalone_close: bool) -> Outcome<Node> {
    if !src[at..].starts_with("/*") {
        return Outcome::NotApplicable;
    }
    block_comment_body(src, at, standalone_close).into()
}

fn block_comment_body(
    src: &str,
    at: usize,
    standalone_close: bool,
) -> Result<(Node, usize), Failure> {
    let body_start = at + 2;
    let close = src[body_start..]
        .find("*/")
        .map(|len| body_start + len)
        .ok_or_else(|| Failure::new(at, FailureReason::UnterminatedBlockComment))?;

    if !src[at..close].contains('\n') {
        return Err(Failure::new(at, FailureReason::SingleLineBlockComment));
    }
    if standalone_close {
        let closer_line = src[..close].rfind('\n').map_or(0, |nl| nl + 1);
        if !src[closer_line..close].trim().is_empty() {
            return Err(Failure::new(close, FailureReason::BlockCloseNotAlone));
        }
    }

    let next = line_tail(src, close + 2)?;
    let node = Node::BlockComment(Comment {
        raw: src[at..next].to_string(),
        body: src[body_start..close].to_string(),
    });
    Ok((node, next))
}
