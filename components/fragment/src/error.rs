use std::fmt;

/// Where a parse error was detected.
///
/// Lines and columns are 1-based and count characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextPosition {
    LineColumn { line: usize, column: usize },
    Column(usize),
}

impl TextPosition {
    /// Line and column of a byte offset, `None` if the offset is not a
    /// character boundary of `text`.
    pub fn from_offset(text: &str, offset: usize) -> Option<Self> {
        let before = text.get(..offset)?;
        let (line, line_start) = match before.rfind('\n') {
            Some(newline) => (before.matches('\n').count() + 1, newline + 1),
            None => (1, 0),
        };
        Some(TextPosition::LineColumn {
            line,
            column: before[line_start..].chars().count() + 1,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reason {
    /// Rejected by the pull parser.
    Syntax(String),
    Attribute(String),
    InvalidName(String),
    InvalidQName(String),
    MismatchedEndTag { expected: String, found: String },
    UnmatchedEndTag(String),
    UnclosedElement(String),
    /// A tag without its closing `>`.
    UnclosedTag,
    TrailingContent,
    UnexpectedDecl,
    UnexpectedDocType,
    UndefinedEntity(String),
    MalformedReference,
    InvalidCharRef(String),
    InvalidChar(char),
    CDataEndInText,
    LtInAttributeValue(String),
    UnboundPrefix { prefix: String, name: String },
    EmptyNamespace(String),
    ReservedPrefix(String),
    Utf8,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Syntax(message) => f.write_str(message),
            Reason::Attribute(message) => write!(f, "malformed attribute: {}", message),
            Reason::InvalidName(name) => write!(f, "invalid XML name `{}`", name),
            Reason::InvalidQName(name) => write!(f, "invalid qualified name `{}`", name),
            Reason::MismatchedEndTag { expected, found } => {
                write!(f, "expected </{}> but got </{}>", expected, found)
            }
            Reason::UnmatchedEndTag(name) => {
                write!(f, "end tag </{}> has no matching start tag", name)
            }
            Reason::UnclosedElement(name) => write!(f, "element <{}> is never closed", name),
            Reason::UnclosedTag => f.write_str("tag is not closed"),
            Reason::TrailingContent => f.write_str("content after the end of the fragment"),
            Reason::UnexpectedDecl => f.write_str("XML declaration is not allowed here"),
            Reason::UnexpectedDocType => f.write_str("DOCTYPE is not allowed in a fragment"),
            Reason::UndefinedEntity(name) => write!(f, "entity `{}` is not defined", name),
            Reason::MalformedReference => f.write_str("malformed entity reference"),
            Reason::InvalidCharRef(reference) => {
                write!(f, "character reference `{}` is not a valid XML character", reference)
            }
            Reason::InvalidChar(c) => {
                write!(f, "invalid XML character U+{:04X}", *c as u32)
            }
            Reason::CDataEndInText => f.write_str("`]]>` is not allowed in text"),
            Reason::LtInAttributeValue(name) => {
                write!(f, "unescaped `<` in value of attribute `{}`", name)
            }
            Reason::UnboundPrefix { prefix, name } => {
                write!(f, "namespace prefix {} of `{}` is not defined", prefix, name)
            }
            Reason::EmptyNamespace(prefix) => {
                write!(f, "namespace prefix {} is bound to an empty URI", prefix)
            }
            Reason::ReservedPrefix(name) => {
                write!(f, "reserved prefix xmlns used in `{}`", name)
            }
            Reason::Utf8 => f.write_str("invalid UTF-8"),
        }
    }
}

/// Well-formedness defect reported by the checker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    reason: Reason,
    position: Option<TextPosition>,
}

impl ParseError {
    pub fn new(reason: Reason, position: Option<TextPosition>) -> Self {
        Self { reason, position }
    }

    pub fn reason(&self) -> &Reason {
        &self.reason
    }

    pub fn position(&self) -> Option<TextPosition> {
        self.position
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.reason, f)
    }
}

impl std::error::Error for ParseError {}
