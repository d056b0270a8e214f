//! Character entity lookup and decoding.
//!
//! Covers the Latin-1 entity set of legacy HTML plus the common typographic
//! and symbol entities, and numeric references (`&#NNN;` / `&#xHH;`).
//! An entity sequence longer than [`MAX_ENTITY_LEN`] characters is treated
//! as literal text by the tokenizer; that bound keeps a stray `&` in prose
//! from swallowing the rest of a word.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Longest entity name the tokenizer will accumulate after `&` before
/// giving up and emitting the characters literally.
pub const MAX_ENTITY_LEN: usize = 8;

/// The named character reference table.
/// Maps entity names (without the leading '&') to their replacement strings.
///
/// The legacy core four (`amp`, `lt`, `gt`, `quot`) also match without a
/// trailing semicolon; everything else requires one.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // Core four (required for any HTML at all)
        ("amp;", "&"),
        ("amp", "&"), // Legacy (no semicolon)
        ("lt;", "<"),
        ("lt", "<"), // Legacy
        ("gt;", ">"),
        ("gt", ">"), // Legacy
        ("quot;", "\""),
        ("quot", "\""), // Legacy
        ("apos;", "'"),
        ("nbsp;", "\u{00A0}"),
        ("shy;", "\u{00AD}"),
        // Common punctuation and symbols
        ("copy;", "\u{00A9}"),   // ©
        ("reg;", "\u{00AE}"),    // ®
        ("trade;", "\u{2122}"),  // ™
        ("sect;", "\u{00A7}"),   // §
        ("para;", "\u{00B6}"),   // ¶
        ("mdash;", "\u{2014}"),  // —
        ("ndash;", "\u{2013}"),  // –
        ("hellip;", "\u{2026}"), // …
        ("bull;", "\u{2022}"),   // •
        ("middot;", "\u{00B7}"), // ·
        ("lsquo;", "\u{2018}"),
        ("rsquo;", "\u{2019}"),
        ("ldquo;", "\u{201C}"),
        ("rdquo;", "\u{201D}"),
        ("laquo;", "\u{00AB}"),  // «
        ("raquo;", "\u{00BB}"),  // »
        ("iexcl;", "\u{00A1}"),  // ¡
        ("iquest;", "\u{00BF}"), // ¿
        // Currency
        ("cent;", "\u{00A2}"),   // ¢
        ("pound;", "\u{00A3}"),  // £
        ("curren;", "\u{00A4}"), // ¤
        ("yen;", "\u{00A5}"),    // ¥
        ("euro;", "\u{20AC}"),   // €
        // Math symbols
        ("times;", "\u{00D7}"),  // ×
        ("divide;", "\u{00F7}"), // ÷
        ("plusmn;", "\u{00B1}"), // ±
        ("not;", "\u{00AC}"),    // ¬
        ("micro;", "\u{00B5}"),  // µ
        ("deg;", "\u{00B0}"),    // °
        ("sup1;", "\u{00B9}"),   // ¹
        ("sup2;", "\u{00B2}"),   // ²
        ("sup3;", "\u{00B3}"),   // ³
        ("frac12;", "\u{00BD}"), // ½
        ("frac14;", "\u{00BC}"), // ¼
        ("frac34;", "\u{00BE}"), // ¾
        // Latin-1 accented characters
        ("Agrave;", "\u{00C0}"),
        ("Aacute;", "\u{00C1}"),
        ("Acirc;", "\u{00C2}"),
        ("Atilde;", "\u{00C3}"),
        ("Auml;", "\u{00C4}"),
        ("Aring;", "\u{00C5}"),
        ("AElig;", "\u{00C6}"),
        ("Ccedil;", "\u{00C7}"),
        ("Egrave;", "\u{00C8}"),
        ("Eacute;", "\u{00C9}"),
        ("Ecirc;", "\u{00CA}"),
        ("Euml;", "\u{00CB}"),
        ("Igrave;", "\u{00CC}"),
        ("Iacute;", "\u{00CD}"),
        ("Icirc;", "\u{00CE}"),
        ("Iuml;", "\u{00CF}"),
        ("ETH;", "\u{00D0}"),
        ("Ntilde;", "\u{00D1}"),
        ("Ograve;", "\u{00D2}"),
        ("Oacute;", "\u{00D3}"),
        ("Ocirc;", "\u{00D4}"),
        ("Otilde;", "\u{00D5}"),
        ("Ouml;", "\u{00D6}"),
        ("Oslash;", "\u{00D8}"),
        ("Ugrave;", "\u{00D9}"),
        ("Uacute;", "\u{00DA}"),
        ("Ucirc;", "\u{00DB}"),
        ("Uuml;", "\u{00DC}"),
        ("Yacute;", "\u{00DD}"),
        ("THORN;", "\u{00DE}"),
        ("szlig;", "\u{00DF}"),
        ("agrave;", "\u{00E0}"),
        ("aacute;", "\u{00E1}"),
        ("acirc;", "\u{00E2}"),
        ("atilde;", "\u{00E3}"),
        ("auml;", "\u{00E4}"),
        ("aring;", "\u{00E5}"),
        ("aelig;", "\u{00E6}"),
        ("ccedil;", "\u{00E7}"),
        ("egrave;", "\u{00E8}"),
        ("eacute;", "\u{00E9}"),
        ("ecirc;", "\u{00EA}"),
        ("euml;", "\u{00EB}"),
        ("igrave;", "\u{00EC}"),
        ("iacute;", "\u{00ED}"),
        ("icirc;", "\u{00EE}"),
        ("iuml;", "\u{00EF}"),
        ("eth;", "\u{00F0}"),
        ("ntilde;", "\u{00F1}"),
        ("ograve;", "\u{00F2}"),
        ("oacute;", "\u{00F3}"),
        ("ocirc;", "\u{00F4}"),
        ("otilde;", "\u{00F5}"),
        ("ouml;", "\u{00F6}"),
        ("oslash;", "\u{00F8}"),
        ("ugrave;", "\u{00F9}"),
        ("uacute;", "\u{00FA}"),
        ("ucirc;", "\u{00FB}"),
        ("uuml;", "\u{00FC}"),
        ("yacute;", "\u{00FD}"),
        ("thorn;", "\u{00FE}"),
        ("yuml;", "\u{00FF}"),
        // Arrows and a handful of Greek letters, seen in the wild often
        // enough to be worth carrying
        ("larr;", "\u{2190}"),
        ("rarr;", "\u{2192}"),
        ("uarr;", "\u{2191}"),
        ("darr;", "\u{2193}"),
        ("alpha;", "\u{03B1}"),
        ("beta;", "\u{03B2}"),
        ("gamma;", "\u{03B3}"),
        ("delta;", "\u{03B4}"),
        ("pi;", "\u{03C0}"),
        ("sigma;", "\u{03C3}"),
        ("omega;", "\u{03C9}"),
    ])
});

/// Look up a named character reference.
///
/// Returns the replacement string if found.
/// The `name` should NOT include the leading '&'.
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// Decode a numeric character reference body (`#NNN` or `#xHH`, without the
/// leading '&' or the trailing ';').
///
/// Out-of-range or unparseable values yield `None` and the tokenizer falls
/// back to literal text.
#[must_use]
pub fn decode_numeric(body: &str) -> Option<char> {
    let digits = body.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix(['x', 'X']) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    // NUL and surrogates never decode; they would corrupt the text run.
    if code == 0 {
        return None;
    }
    char::from_u32(code)
}

/// Decode a full entity body as accumulated by the tokenizer: either a
/// numeric reference or a named one. `body` excludes the leading '&';
/// `terminated` says whether a ';' was seen.
///
/// Unterminated entities only match the legacy no-semicolon names and
/// numeric forms.
#[must_use]
pub fn decode_entity(body: &str, terminated: bool) -> Option<String> {
    if body.starts_with('#') {
        return decode_numeric(body).map(String::from);
    }
    let key = if terminated {
        format!("{body};")
    } else {
        body.to_string()
    };
    lookup_entity(&key).map(String::from)
}
