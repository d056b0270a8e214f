use std::collections::VecDeque;

use strum_macros::Display;
use vellum_common::warning::warn_once;

use super::entities::{MAX_ENTITY_LEN, decode_entity};
use super::token::Token;

/// The tokenizer state machine. One state per lexical context; the
/// tokenizer processes exactly one input character per step, so a chunk
/// boundary can fall anywhere (mid-tag, mid-entity, mid-comment) without
/// being observable in the output.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Display)]
enum TokenizerState {
    /// Ordinary document text.
    Data,
    /// Accumulating an entity body after `&`.
    Entity,
    /// Just consumed `<`; deciding what kind of markup follows.
    TagOpen,
    /// Accumulating the inside of a tag up to the closing `>`.
    Tag,
    /// Just consumed `<!`; deciding between a comment and a declaration.
    MarkupDeclaration,
    /// Skipping an SGML declaration (`<!DOCTYPE ...>`) up to `>`.
    Declaration,
    /// Inside `<!-- ... -->`.
    Comment,
    /// Inside `<script>`/`<style>` content, which is captured verbatim and
    /// never tokenized as markup.
    RawText,
}

/// Streaming tokenizer for legacy HTML.
///
/// Feed input with [`write`](Self::write) in chunks of any size, drain
/// completed tokens with [`next_token`](Self::next_token), and finish with
/// [`end`](Self::end). The tokenizer never fails: malformed input is
/// skipped with a diagnostic on the warning channel and tokenization
/// continues.
///
/// # Blocking tokens
///
/// When a `<table>` start tag is produced, it and every subsequent token
/// are held in a side queue until the matching `</table>` arrives (nested
/// tables are depth-counted), then released all at once. Downstream loops
/// that scan forward for a bounded set of end tags (title, option, table
/// cell bodies) therefore never observe a partially delivered table and
/// cannot be terminated early by an end tag belonging to a nested
/// construct. [`end`](Self::end) force-releases held tokens so an
/// unterminated table still renders.
pub struct HtmlTokenizer {
    state: TokenizerState,
    /// Tokens ready for the consumer.
    ready: VecDeque<Token>,
    /// Tokens held behind an open `<table>`.
    held: VecDeque<Token>,
    /// Number of currently open blocking tables. Tokens route to `held`
    /// while this is non-zero.
    blocking: usize,

    /// Current text run being accumulated.
    text: String,
    /// A collapsed whitespace run is waiting to become one space.
    pending_space: bool,
    /// Something (text or tag) has been produced already. Whitespace before
    /// the first production is dropped entirely.
    produced_any: bool,

    /// Current tag body being accumulated (without `<`/`>`).
    tag: String,
    /// Quote character we are inside of, within a tag.
    quote: Option<char>,

    /// Current entity body being accumulated (without `&`).
    entity: String,
    /// Lookahead buffer for `<!` disambiguation.
    decl: String,
    /// Consecutive dashes seen inside a comment.
    comment_dashes: u8,

    /// Open `<pre>`-like elements. While non-zero, whitespace is literal.
    pre_depth: usize,
    /// Current column inside preformatted text, for tab expansion.
    pre_column: usize,

    /// Lowercase element name whose verbatim content we are consuming.
    raw_end: String,
    /// Partial match of `</name` inside raw text.
    raw_pending: String,

    ended: bool,
}

impl Default for HtmlTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlTokenizer {
    /// Create a tokenizer in its initial state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: TokenizerState::Data,
            ready: VecDeque::new(),
            held: VecDeque::new(),
            blocking: 0,
            text: String::new(),
            pending_space: false,
            produced_any: false,
            tag: String::new(),
            quote: None,
            entity: String::new(),
            decl: String::new(),
            comment_dashes: 0,
            pre_depth: 0,
            pre_column: 0,
            raw_end: String::new(),
            raw_pending: String::new(),
            ended: false,
        }
    }

    /// Feed a chunk of input. Chunks may split tags, entities, comments,
    /// and raw-text end tags arbitrarily.
    pub fn write(&mut self, chunk: &str) {
        debug_assert!(!self.ended, "write after end()");
        for c in chunk.chars() {
            self.consume(c);
        }
    }

    /// Returns true if a token is ready for the consumer.
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.ready.is_empty()
    }

    /// Take the next completed token, if any.
    pub fn next_token(&mut self) -> Option<Token> {
        self.ready.pop_front()
    }

    /// Signal end of input: flushes the trailing text run, discards any
    /// unterminated tag with a diagnostic, and force-releases tokens held
    /// behind an unterminated table. Idempotent.
    pub fn end(&mut self) {
        if self.ended {
            return;
        }
        match self.state {
            TokenizerState::Entity => {
                // A trailing `&foo` with no terminator is literal text.
                let literal = format!("&{}", self.entity);
                self.push_text_str(&literal);
                self.entity.clear();
            }
            TokenizerState::TagOpen => {
                self.push_text_char('<');
            }
            TokenizerState::Tag => {
                warn_once("HTML", "discarding unterminated tag at end of input");
            }
            _ => {}
        }
        self.state = TokenizerState::Data;
        self.flush_text();
        self.blocking = 0;
        self.release_held();
        self.ended = true;
    }

    /// Returns true once [`end`](Self::end) has been called.
    #[must_use]
    pub const fn is_ended(&self) -> bool {
        self.ended
    }

    // ------------------------------------------------------------------
    // Character dispatch
    // ------------------------------------------------------------------

    fn consume(&mut self, c: char) {
        // Normalize away carriage returns everywhere; line structure is
        // carried by '\n' alone.
        if c == '\r' {
            return;
        }
        match self.state {
            TokenizerState::Data => self.handle_data(c),
            TokenizerState::Entity => self.handle_entity(c),
            TokenizerState::TagOpen => self.handle_tag_open(c),
            TokenizerState::Tag => self.handle_tag(c),
            TokenizerState::MarkupDeclaration => self.handle_markup_declaration(c),
            TokenizerState::Declaration => self.handle_declaration(c),
            TokenizerState::Comment => self.handle_comment(c),
            TokenizerState::RawText => self.handle_raw_text(c),
        }
    }

    fn handle_data(&mut self, c: char) {
        match c {
            '&' => {
                self.entity.clear();
                self.state = TokenizerState::Entity;
            }
            '<' => {
                self.flush_text();
                self.state = TokenizerState::TagOpen;
            }
            ' ' | '\t' | '\n' if self.pre_depth == 0 => {
                // Whitespace runs collapse to a single pending space,
                // materialized when the next non-space character (or a tag
                // boundary) arrives.
                self.pending_space = true;
            }
            '\n' => {
                self.text.push('\n');
                self.pre_column = 0;
            }
            '\t' => {
                // Tabs expand to the next multiple-of-8 column.
                let fill = 8 - (self.pre_column % 8);
                for _ in 0..fill {
                    self.text.push(' ');
                }
                self.pre_column += fill;
            }
            _ => self.push_text_char(c),
        }
    }

    fn handle_entity(&mut self, c: char) {
        if c == ';' {
            let body = std::mem::take(&mut self.entity);
            if let Some(decoded) = decode_entity(&body, true) {
                self.push_text_str(&decoded);
            } else {
                let literal = format!("&{body};");
                self.push_text_str(&literal);
            }
            self.state = TokenizerState::Data;
        } else if c.is_ascii_alphanumeric() || (c == '#' && self.entity.is_empty()) {
            if self.entity.len() >= MAX_ENTITY_LEN {
                // Too long to be an entity; emit literally and return the
                // current character to ordinary text handling.
                let literal = format!("&{}", self.entity);
                self.push_text_str(&literal);
                self.entity.clear();
                self.state = TokenizerState::Data;
                self.consume(c);
            } else {
                self.entity.push(c);
            }
        } else {
            // Unterminated entity: only the legacy no-semicolon names and
            // numeric forms still decode.
            let body = std::mem::take(&mut self.entity);
            if let Some(decoded) = decode_entity(&body, false) {
                self.push_text_str(&decoded);
            } else {
                let literal = format!("&{body}");
                self.push_text_str(&literal);
            }
            self.state = TokenizerState::Data;
            self.consume(c);
        }
    }

    fn handle_tag_open(&mut self, c: char) {
        match c {
            '!' => {
                self.decl.clear();
                self.state = TokenizerState::MarkupDeclaration;
            }
            '>' => {
                warn_once("HTML", "skipping tag with empty name");
                self.state = TokenizerState::Data;
            }
            '/' => {
                self.tag.clear();
                self.tag.push('/');
                self.state = TokenizerState::Tag;
            }
            c if c.is_ascii_alphabetic() => {
                self.tag.clear();
                self.tag.push(c);
                self.state = TokenizerState::Tag;
            }
            _ => {
                // Not a tag after all; `<` was literal text.
                self.push_text_char('<');
                self.state = TokenizerState::Data;
                self.consume(c);
            }
        }
    }

    fn handle_tag(&mut self, c: char) {
        if let Some(q) = self.quote {
            if c == q {
                self.quote = None;
            }
            self.tag.push(c);
            return;
        }
        match c {
            '"' | '\'' => {
                self.quote = Some(c);
                self.tag.push(c);
            }
            '>' => self.finish_tag(),
            '\n' | '\t' => self.tag.push(' '),
            _ => self.tag.push(c),
        }
    }

    fn handle_markup_declaration(&mut self, c: char) {
        if c == '-' {
            if self.decl == "-" {
                self.decl.clear();
                self.comment_dashes = 0;
                self.state = TokenizerState::Comment;
            } else {
                self.decl.push('-');
            }
        } else if c == '>' {
            // `<!>` or `<!->`: an empty declaration, suppressed.
            self.decl.clear();
            self.state = TokenizerState::Data;
        } else {
            self.decl.clear();
            self.state = TokenizerState::Declaration;
        }
    }

    fn handle_declaration(&mut self, c: char) {
        if c == '>' {
            self.state = TokenizerState::Data;
        }
    }

    fn handle_comment(&mut self, c: char) {
        match c {
            '-' => self.comment_dashes = self.comment_dashes.saturating_add(1),
            '>' if self.comment_dashes >= 2 => {
                self.state = TokenizerState::Data;
            }
            _ => self.comment_dashes = 0,
        }
    }

    fn handle_raw_text(&mut self, c: char) {
        // Match `</name`, optional whitespace, `>`, case-insensitively,
        // one character at a time. Everything else is swallowed.
        let pos = self.raw_pending.chars().count();
        let name_len = self.raw_end.chars().count();
        let matched = match pos {
            0 => c == '<',
            1 => c == '/',
            p if p - 2 < name_len => {
                let expected = self.raw_end.chars().nth(p - 2);
                expected == Some(c.to_ascii_lowercase())
            }
            _ => {
                // Full `</name` matched; allow whitespace before `>`.
                if c == '>' {
                    let close = format!("/{}", self.raw_end);
                    self.emit(Token::Tag(close));
                    self.raw_pending.clear();
                    self.state = TokenizerState::Data;
                    return;
                }
                c.is_ascii_whitespace()
            }
        };
        if matched {
            self.raw_pending.push(c);
        } else {
            self.raw_pending.clear();
            if c == '<' {
                self.raw_pending.push('<');
            }
        }
    }

    // ------------------------------------------------------------------
    // Token production
    // ------------------------------------------------------------------

    /// Append one character of document text, materializing a pending
    /// collapsed space first. Whitespace before anything has been produced
    /// is dropped.
    fn push_text_char(&mut self, c: char) {
        if self.pending_space {
            if self.produced_any || !self.text.is_empty() {
                self.text.push(' ');
            }
            self.pending_space = false;
        }
        self.text.push(c);
        if self.pre_depth > 0 {
            self.pre_column += 1;
        }
    }

    fn push_text_str(&mut self, s: &str) {
        for c in s.chars() {
            self.push_text_char(c);
        }
    }

    /// Flush the accumulated text run as a token, if non-empty. A pending
    /// collapsed space at a tag boundary still becomes part of the run, so
    /// `"a <b>b</b>"` keeps the space between the words.
    fn flush_text(&mut self) {
        if self.pending_space {
            if self.produced_any || !self.text.is_empty() {
                self.text.push(' ');
            }
            self.pending_space = false;
        }
        if !self.text.is_empty() {
            let run = std::mem::take(&mut self.text);
            self.emit(Token::Text(run));
        }
    }

    /// Complete the tag being accumulated and apply its tokenizer-level
    /// side effects (pre mode, raw-text capture, table blocking).
    fn finish_tag(&mut self) {
        self.quote = None;
        let raw = std::mem::take(&mut self.tag);
        let token = Token::Tag(raw);
        let Some(name) = token.tag_name() else {
            warn_once("HTML", "skipping tag with empty name");
            self.state = TokenizerState::Data;
            return;
        };
        let is_close = token.is_close_tag();

        // The `<table>` start itself is held too: blocking is raised before
        // the token is routed, so the consumer sees the whole table at once.
        if name == "table" && !is_close {
            self.blocking += 1;
        }
        self.emit(token);
        if name == "table" && is_close && self.blocking > 0 {
            self.blocking -= 1;
            if self.blocking == 0 {
                self.release_held();
            }
        }

        match name.as_str() {
            "pre" | "textarea" | "xmp" => {
                if is_close {
                    self.pre_depth = self.pre_depth.saturating_sub(1);
                } else {
                    self.pre_depth += 1;
                }
                self.pre_column = 0;
            }
            "script" | "style" if !is_close => {
                self.raw_end = name;
                self.raw_pending.clear();
                self.state = TokenizerState::RawText;
                return;
            }
            _ => {}
        }
        self.state = TokenizerState::Data;
    }

    fn emit(&mut self, token: Token) {
        if self.blocking > 0 {
            self.held.push_back(token);
        } else {
            self.ready.push_back(token);
        }
        self.produced_any = true;
    }

    fn release_held(&mut self) {
        self.ready.append(&mut self.held);
    }
}
