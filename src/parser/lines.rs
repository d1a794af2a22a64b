use super::primitives::{name, Failure, Line, Outcome};
use crate::ast::{BareText, CharacterDeclaration, Label, Narrative, Node};
use crate::error::FailureReason;

/// `*name` or `*name|alternate`, letters and underscore only.
pub(crate) fn label(line: &Line<'_>) -> Outcome<Node> {
    line.recognize('*', |rest| {
        let (label, mut end) = name(rest, 0).required(0, FailureReason::ExpectedIdentifier)?;
        let mut alternate = None;
        if rest[end..].starts_with('|') {
            let (alt, alt_end) =
                name(rest, end + 1).required(end + 1, FailureReason::ExpectedIdentifier)?;
            alternate = Some(alt.value.to_string());
            end = alt_end;
        }
        if let Some(junk) = rest[end..].find(|c: char| !c.is_whitespace()) {
            return Err(Failure::new(end + junk, FailureReason::TrailingContent));
        }
        Ok(Node::Label(Label {
            raw: line.raw.to_string(),
            name: label.value.to_string(),
            alternate,
        }))
    })
}

/// `#` alone marks narration; `#Name` or `#Name:Emotion` cues a character.
pub(crate) fn character(line: &Line<'_>) -> Outcome<Node> {
    line.recognize('#', |rest| {
        let body = rest.trim_end();
        if body.is_empty() {
            return Ok(Node::Narrative(Narrative {
                raw: line.raw.to_string(),
            }));
        }

        let (name, emotion) = match body.split_once(':') {
            None => (body, None),
            Some((name, emotion)) => {
                if let Some(extra) = emotion.find(':') {
                    return Err(Failure::new(
                        name.len() + 1 + extra,
                        FailureReason::TooManyColons,
                    ));
                }
                (name, Some((name.len() + 1, emotion)))
            }
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(Failure::new(0, FailureReason::EmptyCharacterName));
        }
        let emotion = match emotion {
            Some((at, emotion)) if emotion.trim().is_empty() => {
                return Err(Failure::new(at, FailureReason::EmptyEmotion));
            }
            Some((_, emotion)) => Some(emotion.trim().to_string()),
            None => None,
        };

        Ok(Node::CharacterDeclaration(CharacterDeclaration {
            raw: line.raw.to_string(),
            name: name.to_string(),
            emotion,
        }))
    })
}

/// Fallback for any line. A leading `_` is dropped and the rest kept
/// verbatim; otherwise surrounding whitespace is trimmed.
pub(crate) fn bare_text(line: &Line<'_>) -> Outcome<Node> {
    let text = match line.content.strip_prefix('_') {
        Some(verbatim) => verbatim,
        None => line.content.trim(),
    };
    Outcome::Matched(
        Node::BareText(BareText {
            raw: line.raw.to_string(),
            text: text.to_string(),
        }),
        line.end,
    )
}
