//! Tag string parsing.
//!
//! Given one raw tag token from the tokenizer, extracts the tag name and an
//! attribute map. Independent of what the tag means.

mod tag;

pub use tag::{Attribute, LengthAttr, ParsedTag};
