use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Result of parsing a whole scenario source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Document {
    /// The input was the empty string.
    Empty,
    /// One node per recognized line or block, in playback order.
    Scenario { lines: Vec<Node> },
}

impl Document {
    pub fn lines(&self) -> &[Node] {
        match self {
            Document::Empty => &[],
            Document::Scenario { lines } => lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }

    /// Concatenation of every line's `raw` text, in order.
    pub fn raw(&self) -> String {
        self.lines().iter().map(Node::raw).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Node {
    LineComment(Comment),
    BlockComment(Comment),
    CharacterDeclaration(CharacterDeclaration),
    Narrative(Narrative),
    Label(Label),
    SingleLineTag(Tag),
    MultiLineTag(Tag),
    BareText(BareText),
}

impl Node {
    pub fn raw(&self) -> &str {
        match self {
            Node::LineComment(c) | Node::BlockComment(c) => &c.raw,
            Node::CharacterDeclaration(c) => &c.raw,
            Node::Narrative(n) => &n.raw,
            Node::Label(l) => &l.raw,
            Node::SingleLineTag(t) | Node::MultiLineTag(t) => &t.raw,
            Node::BareText(t) => &t.raw,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::LineComment(_) => "line-comment",
            Node::BlockComment(_) => "block-comment",
            Node::CharacterDeclaration(_) => "character-declaration",
            Node::Narrative(_) => "narrative",
            Node::Label(_) => "label",
            Node::SingleLineTag(_) => "single-line-tag",
            Node::MultiLineTag(_) => "multi-line-tag",
            Node::BareText(_) => "bare-text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub raw: String,
    pub body: String, // text between the delimiters, terminator excluded
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterDeclaration {
    pub raw: String,
    pub name: String, // "Jane" in "#Jane:Angry"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
}

/// Anonymous narration marker, a bare `#`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Narrative {
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub raw: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate: Option<String>, // "extra" in "*scene|extra"
}

/// `@tag ...` and `[tag ...]` share this shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub raw: String,
    pub tag: String,
    pub parameters: BTreeMap<String, ParamValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BareText {
    pub raw: String,
    pub text: String,
}

/// A tag parameter: a bare switch or a `key=value` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Flag,
    Text(String),
}

impl ParamValue {
    pub fn text(t: impl Into<String>) -> Self {
        ParamValue::Text(t.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Flag => None,
            ParamValue::Text(s) => Some(s),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Flag => serializer.serialize_bool(true),
            ParamValue::Text(s) => serializer.serialize_str(s),
        }
    }
}
