use super::primitives::{
    first_match, identifier, key_value_pair, line_tail, name, Failure, Line, Outcome,
};
use crate::ast::{Node, ParamValue, Tag};
use crate::error::FailureReason;
use std::collections::BTreeMap;

type Parameters = BTreeMap<String, ParamValue>;

/// Parameters after a tag name ending at `name_end`. Shared by both tag forms.
///
/// `unfolded` is `text` before line breaks were replaced, byte for byte. A
/// parameter may not span a line break there, quoted or not.
fn tag_parameters(text: &str, unfolded: &str, name_end: usize) -> Result<Parameters, Failure> {
    if !text[name_end..].chars().next().map_or(true, char::is_whitespace) {
        return Err(Failure::new(name_end, FailureReason::TrailingContent));
    }

    let mut parameters = Parameters::new();
    let mut at = name_end;
    loop {
        match text[at..].find(|c: char| !c.is_whitespace()) {
            Some(skip) => at += skip,
            None => return Ok(parameters),
        }
        match key_value_pair(text, at) {
            Outcome::Matched(pair, end) => {
                if unfolded[at..end].contains('\n') {
                    let token = text[at..end].to_string();
                    return Err(Failure::new(at, FailureReason::MalformedParameter(token)));
                }
                if parameters.contains_key(pair.key) {
                    let key = pair.key.to_string();
                    return Err(Failure::new(at, FailureReason::DuplicateParameter(key)));
                }
                parameters.insert(pair.key.to_string(), pair.value);
                at = end;
            }
            Outcome::NotApplicable => return Ok(parameters),
            Outcome::Invalid(failure) => return Err(failure),
        }
    }
}

/// `@name param key=value ...` on one line.
pub(crate) fn single_line_tag(line: &Line<'_>) -> Outcome<Node> {
    line.recognize('@', |rest| {
        if rest.trim().is_empty() {
            return Err(Failure::new(0, FailureReason::EmptyTag));
        }
        let (tag, name_end) = name(rest, 0).required(0, FailureReason::ExpectedIdentifier)?;
        let parameters = tag_parameters(rest, rest, name_end)?;
        Ok(Node::SingleLineTag(Tag {
            raw: line.raw.to_string(),
            tag: tag.value.to_string(),
            parameters,
        }))
    })
}

/// `[name param key=value ...]`, possibly across several lines. Without a
/// closing `]` the rule does not apply.
pub(crate) fn multi_line_tag(src: &str, at: usize) -> Outcome<Node> {
    if !src[at..].starts_with('[') {
        return Outcome::NotApplicable;
    }
    let open = at + 1;
    let Some(close) = src[open..].find(']').map(|len| open + len) else {
        return Outcome::NotApplicable;
    };
    multi_line_tag_body(src, at, open, close).into()
}

fn multi_line_tag_body(
    src: &str,
    at: usize,
    open: usize,
    close: usize,
) -> Result<(Node, usize), Failure> {
    // Byte-for-byte fold, so offsets into `interior` still map onto `src`.
    let unfolded = &src[open..close];
    let interior = unfolded.replace(|c: char| c == '\n' || c == '\r', " ");
    if interior.trim().is_empty() {
        return Err(Failure::new(open, FailureReason::EmptyTag));
    }

    let (tag, _, name_end) = first_match(&interior, 0, identifier)
        .ok_or_else(|| Failure::new(open, FailureReason::ExpectedIdentifier))?;
    let parameters =
        tag_parameters(&interior, unfolded, name_end).map_err(|f| f.shifted(open))?;

    let next = line_tail(src, close + 1)?;
    let node = Node::MultiLineTag(Tag {
        raw: src[at..next].to_string(),
        tag: tag.value.to_string(),
        parameters,
    });
    Ok((node, next))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_of(outcome: Outcome<Node>) -> Tag {
        match outcome {
            Outcome::Matched(Node::SingleLineTag(t) | Node::MultiLineTag(t), _) => t,
            other => panic!("expected a tag, got {other:?}"),
        }
    }

    fn single(src: &str) -> Outcome<Node> {
        single_line_tag(&Line::at(src, 0))
    }

    #[test]
    fn single_line_switch_and_value() {
        let t = tag_of(single("@tag switch"));
        assert_eq!(t.tag, "tag");
        assert_eq!(t.parameters.get("switch"), Some(&ParamValue::Flag));

        let t = tag_of(single("@tag key=value"));
        assert_eq!(t.parameters.get("key"), Some(&ParamValue::text("value")));

        let t = tag_of(single("@wait"));
        assert!(t.parameters.is_empty());

        let t = tag_of(single("@bgm  file=\"main theme.ogg\"   loop \n"));
        assert_eq!(t.parameters.len(), 2);
        assert_eq!(t.parameters["file"], ParamValue::text("main theme.ogg"));
        assert_eq!(t.parameters["loop"], ParamValue::Flag);
    }

    #[test]
    fn single_line_failures() {
        assert_eq!(single("@"), Outcome::invalid(1, FailureReason::EmptyTag));
        assert_eq!(single("@  "), Outcome::invalid(1, FailureReason::EmptyTag));
        assert_eq!(single("@17"), Outcome::invalid(1, FailureReason::ExpectedIdentifier));
        assert_eq!(single("@tag1"), Outcome::invalid(4, FailureReason::TrailingContent));
        assert_eq!(
            single("@tag a a"),
            Outcome::invalid(7, FailureReason::DuplicateParameter("a".into()))
        );
        assert_eq!(
            single("@tag key = value"),
            Outcome::invalid(9, FailureReason::MalformedParameter("=".into()))
        );
        assert_eq!(single("tag"), Outcome::NotApplicable);
    }

    #[test]
    fn multi_line_on_one_line() {
        let t = tag_of(multi_line_tag("[tag key=value]", 0));
        assert_eq!(t.tag, "tag");
        assert_eq!(t.parameters["key"], ParamValue::text("value"));
        assert_eq!(t.raw, "[tag key=value]");
    }

    #[test]
    fn multi_line_across_lines() {
        let src = "[tag\n  key=value\n  flag\n]\nnext";
        let Outcome::Matched(Node::MultiLineTag(t), end) = multi_line_tag(src, 0) else {
            panic!("expected a multi-line tag");
        };
        assert_eq!(t.tag, "tag");
        assert_eq!(t.parameters["key"], ParamValue::text("value"));
        assert_eq!(t.parameters["flag"], ParamValue::Flag);
        assert_eq!(&src[end..], "next");
    }

    #[test]
    fn name_is_first_identifier_in_interior() {
        let t = tag_of(multi_line_tag("[  \r\n chara01 show]", 0));
        assert_eq!(t.tag, "chara01");
        assert_eq!(t.parameters["show"], ParamValue::Flag);
    }

    #[test]
    fn split_key_value_is_rejected() {
        assert_eq!(
            multi_line_tag("[tag key\n=\nvalue]", 0),
            Outcome::invalid(9, FailureReason::MalformedParameter("=".into()))
        );
        assert_eq!(
            multi_line_tag("[tag key=\nvalue]", 0),
            Outcome::invalid(5, FailureReason::MalformedParameter("key=".into()))
        );
    }

    #[test]
    fn quoted_value_cannot_cross_lines() {
        assert_eq!(
            multi_line_tag("[tag key=\"\nvalue\"]", 0),
            Outcome::invalid(5, FailureReason::MalformedParameter("key=\" value\"".into()))
        );
        assert_eq!(
            multi_line_tag("[tag key='a\r\nb']", 0),
            Outcome::invalid(5, FailureReason::MalformedParameter("key='a  b'".into()))
        );
        let t = tag_of(multi_line_tag("[tag\r\n  key='a b'\r\n]", 0));
        assert_eq!(t.parameters["key"], ParamValue::text("a b"));
    }

    #[test]
    fn multi_line_failures() {
        assert_eq!(multi_line_tag("[ \n ]", 0), Outcome::invalid(1, FailureReason::EmptyTag));
        assert_eq!(
            multi_line_tag("[17]", 0),
            Outcome::invalid(1, FailureReason::ExpectedIdentifier)
        );
        assert_eq!(
            multi_line_tag("[-]", 0),
            Outcome::invalid(1, FailureReason::ExpectedIdentifier)
        );
        assert_eq!(
            multi_line_tag("[tag] more", 0),
            Outcome::invalid(6, FailureReason::TrailingContent)
        );
        assert_eq!(
            multi_line_tag("[tag say=\"open]", 0),
            Outcome::invalid(9, FailureReason::UnterminatedString)
        );
    }

    #[test]
    fn unclosed_bracket_is_not_a_tag() {
        assert_eq!(multi_line_tag("[tag key=value", 0), Outcome::NotApplicable);
        assert_eq!(multi_line_tag("tag]", 0), Outcome::NotApplicable);
    }
}
