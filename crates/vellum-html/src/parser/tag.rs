use core::fmt;

/// An attribute on a parsed tag.
///
/// Values are stored as written (minus surrounding quotes); nothing is
/// validated here. Legacy HTML, not XML: a present-but-valueless attribute
/// (`nowrap`, `selected`) has an empty value and is detected by key
/// presence alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercase attribute name.
    pub name: String,
    /// Attribute value with surrounding quotes stripped; empty for boolean
    /// attributes.
    pub value: String,
}

/// A dimension attribute: either absolute pixels or a percentage of the
/// container's propagated max width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthAttr {
    /// Absolute pixel length.
    Pixels(f32),
    /// Percentage of the container width, clamped to 0..=100.
    Percent(u8),
}

/// The result of parsing one raw tag string.
///
/// Attribute handling follows the legacy rules: the tag body is tokenized
/// on whitespace outside quotes, each chunk is split on its first `=`, and
/// the first occurrence of an attribute name wins; later duplicates are
/// kept in the list but never returned by the accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag {
    /// Lowercase tag name, without the leading `/` for close tags.
    pub name: String,
    /// True for `</name ...>` tags.
    pub is_close: bool,
    /// Attributes in source order (duplicates included).
    pub attrs: Vec<Attribute>,
}

impl ParsedTag {
    /// Parse a raw tag body (the inside of the angle brackets).
    ///
    /// Returns `None` when no tag name can be extracted; the caller skips
    /// the token. A trailing `/` (XML-style self-closing) is tolerated and
    /// ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (body, is_close) = match raw.strip_prefix('/') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };

        let name_end = body
            .find(|c: char| c.is_ascii_whitespace() || c == '/')
            .unwrap_or(body.len());
        let name = body[..name_end].to_ascii_lowercase();
        if name.is_empty() {
            return None;
        }

        let attrs = parse_attributes(&body[name_end..]);
        Some(Self {
            name,
            is_close,
            attrs,
        })
    }

    /// The first value for `name` (ASCII case-insensitive), if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Key-presence test for boolean attributes (`nowrap`, `selected`, ...).
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.attrs
            .iter()
            .any(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Parse an unsigned integer attribute, clamping garbage to `None` and
    /// huge values to the given cap. Legacy engines clamp rather than
    /// reject.
    #[must_use]
    pub fn get_u32(&self, name: &str, max: u32) -> Option<u32> {
        let value = self.get(name)?;
        let digits: String = value
            .trim()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse::<u32>().ok().map(|v| v.min(max))
    }

    /// Parse a signed integer attribute with an optional `+`/`-` prefix
    /// (used by `<font size=+1>`).
    #[must_use]
    pub fn get_i32(&self, name: &str) -> Option<(i32, bool)> {
        let value = self.get(name)?.trim();
        let (rest, sign, relative) = match value.chars().next()? {
            '+' => (&value[1..], 1, true),
            '-' => (&value[1..], -1, true),
            _ => (value, 1, false),
        };
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        digits.parse::<i32>().ok().map(|v| (sign * v, relative))
    }

    /// Parse a length attribute: `"50%"` or `"120"`.
    #[must_use]
    pub fn get_length(&self, name: &str) -> Option<LengthAttr> {
        let value = self.get(name)?.trim();
        if let Some(pct) = value.strip_suffix('%') {
            let digits: String = pct.chars().take_while(char::is_ascii_digit).collect();
            let pct = digits.parse::<u32>().ok()?.min(100);
            #[allow(clippy::cast_possible_truncation)]
            return Some(LengthAttr::Percent(pct as u8));
        }
        let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
        #[allow(clippy::cast_precision_loss)]
        digits.parse::<u32>().ok().map(|v| LengthAttr::Pixels(v as f32))
    }
}

impl fmt::Display for ParsedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_close {
            write!(f, "</{}>", self.name)
        } else {
            write!(f, "<{}", self.name)?;
            for attr in &self.attrs {
                if attr.value.is_empty() {
                    write!(f, " {}", attr.name)?;
                } else {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
            }
            write!(f, ">")
        }
    }
}

/// Tokenize the attribute portion of a tag body.
///
/// Chunks are separated by whitespace outside quotes; each chunk splits on
/// its first `=`; surrounding single or double quotes are stripped from the
/// value. A bare trailing `/` (self-closing syntax) is dropped.
fn parse_attributes(body: &str) -> Vec<Attribute> {
    let mut attrs = Vec::new();
    let mut chunk = String::new();
    let mut quote: Option<char> = None;

    let mut push_chunk = |chunk: &mut String, attrs: &mut Vec<Attribute>| {
        if chunk.is_empty() || chunk == "/" {
            chunk.clear();
            return;
        }
        let (name, value) = match chunk.split_once('=') {
            Some((n, v)) => (n, strip_quotes(v)),
            None => (chunk.as_str(), ""),
        };
        let name = name.to_ascii_lowercase();
        if !name.is_empty() {
            attrs.push(Attribute {
                name,
                value: value.to_string(),
            });
        }
        chunk.clear();
    };

    for c in body.chars() {
        if let Some(q) = quote {
            chunk.push(c);
            if c == q {
                quote = None;
            }
        } else if c == '"' || c == '\'' {
            quote = Some(c);
            chunk.push(c);
        } else if c.is_ascii_whitespace() {
            push_chunk(&mut chunk, &mut attrs);
        } else {
            chunk.push(c);
        }
    }
    push_chunk(&mut chunk, &mut attrs);
    attrs
}

/// Strip one layer of surrounding single or double quotes.
fn strip_quotes(value: &str) -> &str {
    let v = value.trim();
    for q in ['"', '\''] {
        if v.len() >= 2 && v.starts_with(q) && v.ends_with(q) {
            return &v[1..v.len() - 1];
        }
    }
    v
}
