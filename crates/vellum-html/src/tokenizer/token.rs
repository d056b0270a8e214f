use core::fmt;

/// One unit of tokenizer output.
///
/// The tokenizer emits a flat sequence of these; there are no backward
/// references. A tag token carries the raw inside of the angle brackets
/// (`"p align=center"`, `"/p"`) and is handed to
/// [`crate::parser::ParsedTag::parse`] by whoever cares about its
/// attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of decoded document text. Entities have already been replaced
    /// and whitespace has been collapsed (or preserved, inside `<pre>`).
    Text(String),
    /// A raw tag string, without the surrounding `<`/`>`. Close tags begin
    /// with `/`.
    Tag(String),
}

impl Token {
    /// Returns true if this is a tag token.
    #[must_use]
    pub const fn is_tag(&self) -> bool {
        matches!(self, Self::Tag(_))
    }

    /// Returns true if this is a text token.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// The lowercase tag name, without a leading `/`, if this is a tag token.
    ///
    /// `Tag("TABLE border=1")` and `Tag("/table")` both yield `"table"`.
    #[must_use]
    pub fn tag_name(&self) -> Option<String> {
        let Self::Tag(raw) = self else { return None };
        let body = raw.strip_prefix('/').unwrap_or(raw);
        let name: String = body
            .chars()
            .take_while(|c| !c.is_ascii_whitespace() && *c != '/' && *c != '>')
            .collect();
        if name.is_empty() {
            None
        } else {
            Some(name.to_ascii_lowercase())
        }
    }

    /// Returns true if this is a close tag (`</name>`).
    #[must_use]
    pub fn is_close_tag(&self) -> bool {
        matches!(self, Self::Tag(raw) if raw.starts_with('/'))
    }

    /// Returns true if this token is the close tag for `name`
    /// (ASCII case-insensitive).
    #[must_use]
    pub fn closes(&self, name: &str) -> bool {
        self.is_close_tag() && self.tag_name().is_some_and(|n| n.eq_ignore_ascii_case(name))
    }

    /// Returns true if this token is the open tag for `name`
    /// (ASCII case-insensitive).
    #[must_use]
    pub fn opens(&self, name: &str) -> bool {
        !self.is_close_tag() && self.tag_name().is_some_and(|n| n.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(data) => write!(f, "Text({data:?})"),
            Self::Tag(raw) => write!(f, "<{raw}>"),
        }
    }
}
