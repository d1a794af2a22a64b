use thiserror::Error;

/// Why a recognizer rejected input after its sigil matched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("expected an identifier")]
    ExpectedIdentifier,
    #[error("unexpected trailing content")]
    TrailingContent,
    #[error("character cue has an empty name")]
    EmptyCharacterName,
    #[error("character cue has an empty emotion")]
    EmptyEmotion,
    #[error("character cue has more than one ':'")]
    TooManyColons,
    #[error("tag has no name")]
    EmptyTag,
    #[error("malformed tag parameter '{0}'")]
    MalformedParameter(String),
    #[error("tag parameter '{0}' given more than once")]
    DuplicateParameter(String),
    #[error("unterminated quoted string")]
    UnterminatedString,
    #[error("block comment is never closed")]
    UnterminatedBlockComment,
    #[error("block comment must span more than one line")]
    SingleLineBlockComment,
    #[error("closing '*/' must stand alone on its line")]
    BlockCloseNotAlone,
    #[error("no construct matches here")]
    Unrecognized,
    #[error("input produced no lines")]
    NoLines,
}

/// Terminal parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse failed at offset {offset} (line {line}): {reason}")]
pub struct ParseError {
    /// Byte offset of the violation.
    pub offset: usize,
    /// 1-based line containing `offset`.
    pub line: usize,
    pub reason: FailureReason,
    /// Unparsed text, starting at the construct that failed.
    pub remaining: String,
}

impl ParseError {
    pub(crate) fn new(
        source: &str,
        construct_start: usize,
        offset: usize,
        reason: FailureReason,
    ) -> Self {
        let line = source
            .get(..offset)
            .map_or(1, |head| head.matches('\n').count() + 1);
        Self {
            offset,
            line,
            reason,
            remaining: source.get(construct_start..).unwrap_or_default().to_string(),
        }
    }
}
