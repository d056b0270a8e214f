//! Streaming legacy-HTML tokenizer and tag parser for the Vellum engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** - an incremental, chunk-fed tokenizer producing a flat
//!   stream of text runs and raw tag strings. It decodes character entities,
//!   collapses whitespace (with literal handling inside `<pre>`), captures
//!   `<script>`/`<style>` bodies verbatim without tokenizing them, suppresses
//!   comments, and holds back tokens while a `<table>` is open (blocking
//!   tokens) so bounded terminator scans downstream are never fooled by a
//!   nested construct.
//! - **Tag Parser** - extraction of a tag name and attribute map from one
//!   raw tag string, with legacy rules: first occurrence of an attribute
//!   wins, key presence alone detects boolean attributes, surrounding quotes
//!   are stripped, nothing else is validated.
//!
//! Neither component knows anything about what a tag *means*; tag semantics
//! live entirely in the dispatch layer of `vellum-engine`.

pub mod parser;
pub mod tokenizer;

pub use parser::{Attribute, LengthAttr, ParsedTag};
pub use tokenizer::{HtmlTokenizer, Token};
