use crate::ast::Document;
use crate::error::ParseError;
use serde::Serialize;

/// Serializable outcome handed across the Python and wasm bindings.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ParseReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ErrorReport {
    pub offset: usize,
    pub line: usize,
    pub message: String,
    pub remaining: String,
}

impl From<Result<Document, ParseError>> for ParseReport {
    fn from(result: Result<Document, ParseError>) -> Self {
        match result {
            Ok(document) => Self {
                document: Some(document),
                error: None,
            },
            Err(err) => Self {
                document: None,
                error: Some(ErrorReport {
                    offset: err.offset,
                    line: err.line,
                    message: err.reason.to_string(),
                    remaining: err.remaining,
                }),
            },
        }
    }
}
