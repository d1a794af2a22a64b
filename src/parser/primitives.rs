//! Stateless recognizers shared by the line-level constructs.
//!
//! Every recognizer takes the text and a byte cursor and answers with an
//! [`Outcome`]: the match plus the cursor just past it, "not this rule", or
//! a grammar violation at some offset.

use crate::ast::ParamValue;
use crate::error::FailureReason;
use winnow::combinator::{alt, delimited};
use winnow::token::{one_of, take_till, take_while};
use winnow::{ModalResult, Parser};

/// A grammar violation; `offset` is relative to the text the recognizer saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Failure {
    pub offset: usize,
    pub reason: FailureReason,
}

impl Failure {
    pub fn new(offset: usize, reason: FailureReason) -> Self {
        Self { offset, reason }
    }

    pub fn shifted(self, base: usize) -> Self {
        Self {
            offset: base + self.offset,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outcome<T> {
    /// Consumed input; the cursor now sits at the `usize`.
    Matched(T, usize),
    /// The rule's sigil is absent; another rule may apply.
    NotApplicable,
    /// The sigil matched but the body is malformed.
    Invalid(Failure),
}

impl<T> Outcome<T> {
    pub fn invalid(offset: usize, reason: FailureReason) -> Self {
        Outcome::Invalid(Failure::new(offset, reason))
    }

    /// Ordered alternation. Only `NotApplicable` falls through.
    pub fn or_else(self, next: impl FnOnce() -> Outcome<T>) -> Outcome<T> {
        match self {
            Outcome::NotApplicable => next(),
            decided => decided,
        }
    }

    /// Treats "not applicable" as a violation for callers that need a match.
    pub fn required(self, offset: usize, reason: FailureReason) -> Result<(T, usize), Failure> {
        match self {
            Outcome::Matched(value, next) => Ok((value, next)),
            Outcome::NotApplicable => Err(Failure::new(offset, reason)),
            Outcome::Invalid(failure) => Err(failure),
        }
    }
}

impl<T> From<Result<(T, usize), Failure>> for Outcome<T> {
    fn from(result: Result<(T, usize), Failure>) -> Self {
        match result {
            Ok((value, next)) => Outcome::Matched(value, next),
            Err(failure) => Outcome::Invalid(failure),
        }
    }
}

/// One physical line starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'s> {
    pub start: usize,
    /// Line text without its `\n` / `\r\n` terminator.
    pub content: &'s str,
    /// The line including its terminator.
    pub raw: &'s str,
    /// Cursor just past the terminator.
    pub end: usize,
}

impl<'s> Line<'s> {
    pub fn at(src: &'s str, start: usize) -> Self {
        let rest = &src[start..];
        match rest.find('\n') {
            Some(nl) => {
                let body = &rest[..nl];
                Line {
                    start,
                    content: body.strip_suffix('\r').unwrap_or(body),
                    raw: &rest[..=nl],
                    end: start + nl + 1,
                }
            }
            None => Line {
                start,
                content: rest,
                raw: rest,
                end: src.len(),
            },
        }
    }

    /// Runs `body` on the text after `sigil` when the line starts with it.
    /// Failures from `body` are relative to that text.
    pub fn recognize<T>(
        &self,
        sigil: char,
        body: impl FnOnce(&'s str) -> Result<T, Failure>,
    ) -> Outcome<T> {
        let Some(rest) = self.content.strip_prefix(sigil) else {
            return Outcome::NotApplicable;
        };
        match body(rest) {
            Ok(node) => Outcome::Matched(node, self.end),
            Err(failure) => Outcome::Invalid(failure.shifted(self.start + sigil.len_utf8())),
        }
    }
}

/// Accepts only whitespace from `at` to the end of its line and returns the
/// cursor past the terminator.
pub(crate) fn line_tail(src: &str, at: usize) -> Result<usize, Failure> {
    let line = Line::at(src, at);
    match line.content.find(|c: char| !c.is_whitespace()) {
        None => Ok(line.end),
        Some(junk) => Err(Failure::new(at + junk, FailureReason::TrailingContent)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Identifier<'s> {
    pub value: &'s str,
}

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// [A-Za-z_][A-Za-z0-9_]*
fn word<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (one_of(is_word_start), take_while(0.., is_word_char))
        .take()
        .parse_next(input)
}

// [A-Za-z_]+, used for label and `@` tag names
fn letters<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., is_word_start).parse_next(input)
}

fn run_identifier<'s>(
    recognizer: fn(&mut &'s str) -> ModalResult<&'s str>,
    text: &'s str,
    at: usize,
) -> Outcome<Identifier<'s>> {
    let mut rest = &text[at..];
    match recognizer(&mut rest) {
        Ok(value) => Outcome::Matched(Identifier { value }, at + value.len()),
        Err(_) => Outcome::invalid(at, FailureReason::ExpectedIdentifier),
    }
}

/// Longest identifier prefix at `at`. Trailing text is the caller's concern.
pub(crate) fn identifier(text: &str, at: usize) -> Outcome<Identifier<'_>> {
    run_identifier(word, text, at)
}

/// Like [`identifier`] but letters and underscore only.
pub(crate) fn name(text: &str, at: usize) -> Outcome<Identifier<'_>> {
    run_identifier(letters, text, at)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QuotedString<'s> {
    pub raw: &'s str,
    pub value: &'s str,
}

fn quoted<'s>(input: &mut &'s str) -> ModalResult<(&'s str, &'s str)> {
    alt((
        delimited('"', take_till(0.., '"'), '"'),
        delimited('\'', take_till(0.., '\''), '\''),
    ))
    .with_taken()
    .parse_next(input)
}

/// `'...'` or `"..."`. No escapes; an unterminated quote is not a string.
pub(crate) fn quoted_string(text: &str, at: usize) -> Outcome<QuotedString<'_>> {
    let mut rest = &text[at..];
    match quoted(&mut rest) {
        Ok((value, raw)) => Outcome::Matched(QuotedString { raw, value }, at + raw.len()),
        Err(_) => Outcome::NotApplicable,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyValuePair<'s> {
    pub key: &'s str,
    pub value: ParamValue,
}

fn token_at(text: &str, at: usize) -> &str {
    let rest = &text[at..];
    rest.split(char::is_whitespace).next().unwrap_or(rest)
}

fn ends_token(text: &str, at: usize) -> bool {
    text[at..].chars().next().map_or(true, char::is_whitespace)
}

/// One parameter token: `flag`, `key=value`, `key="quoted value"`.
pub(crate) fn key_value_pair(text: &str, at: usize) -> Outcome<KeyValuePair<'_>> {
    if ends_token(text, at) {
        return Outcome::NotApplicable;
    }
    let malformed = || {
        let token = token_at(text, at).to_string();
        Outcome::invalid(at, FailureReason::MalformedParameter(token))
    };

    let (key, key_end) = match identifier(text, at) {
        Outcome::Matched(Identifier { value }, end) => (value, end),
        _ => return malformed(),
    };
    if ends_token(text, key_end) {
        let pair = KeyValuePair {
            key,
            value: ParamValue::Flag,
        };
        return Outcome::Matched(pair, key_end);
    }
    if !text[key_end..].starts_with('=') {
        return malformed();
    }

    let value_start = key_end + 1;
    if text[value_start..].starts_with(|c: char| matches!(c, '"' | '\'')) {
        let Outcome::Matched(q, _) = quoted_string(text, value_start) else {
            return Outcome::invalid(value_start, FailureReason::UnterminatedString);
        };
        let end = value_start + q.raw.len();
        if !ends_token(text, end) {
            return malformed();
        }
        let pair = KeyValuePair {
            key,
            value: ParamValue::text(q.value),
        };
        return Outcome::Matched(pair, end);
    }

    let value = token_at(text, value_start);
    if value.is_empty() {
        return malformed();
    }
    let pair = KeyValuePair {
        key,
        value: ParamValue::text(value),
    };
    Outcome::Matched(pair, value_start + value.len())
}

/// Tries `recognizer` at each character offset from `from` and returns the
/// first match with its start and end.
pub(crate) fn first_match<'s, T>(
    text: &'s str,
    from: usize,
    recognizer: impl Fn(&'s str, usize) -> Outcome<T>,
) -> Option<(T, usize, usize)> {
    text[from..]
        .char_indices()
        .map(|(i, _)| from + i)
        .find_map(|at| match recognizer(text, at) {
            Outcome::Matched(value, end) => Some((value, at, end)),
            _ => None,
        })
}
