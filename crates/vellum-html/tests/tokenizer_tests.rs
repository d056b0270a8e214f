//! Integration tests for the streaming tokenizer.

use vellum_html::{HtmlTokenizer, Token};

/// Helper to tokenize a complete input string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = HtmlTokenizer::new();
    tokenizer.write(input);
    tokenizer.end();
    drain(&mut tokenizer)
}

fn drain(tokenizer: &mut HtmlTokenizer) -> Vec<Token> {
    let mut tokens = Vec::new();
    while let Some(t) = tokenizer.next_token() {
        tokens.push(t);
    }
    tokens
}

/// Concatenate all text tokens.
fn text_of(tokens: &[Token]) -> String {
    let mut out = String::new();
    for t in tokens {
        if let Token::Text(s) = t {
            out.push_str(s);
        }
    }
    out
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens, vec![Token::Text("Hello".to_string())]);
}

#[test]
fn test_tag_and_text() {
    let tokens = tokenize("<p>Hello</p>");
    assert_eq!(
        tokens,
        vec![
            Token::Tag("p".to_string()),
            Token::Text("Hello".to_string()),
            Token::Tag("/p".to_string()),
        ]
    );
}

#[test]
fn test_whitespace_collapses_to_one_space() {
    let tokens = tokenize("a  \t\n  b");
    assert_eq!(text_of(&tokens), "a b");
}

#[test]
fn test_leading_whitespace_dropped() {
    let tokens = tokenize("   \n\t hello");
    assert_eq!(text_of(&tokens), "hello");
}

#[test]
fn test_space_preserved_at_tag_boundary() {
    let tokens = tokenize("a <b>b</b>");
    assert_eq!(
        tokens,
        vec![
            Token::Text("a ".to_string()),
            Token::Tag("b".to_string()),
            Token::Text("b".to_string()),
            Token::Tag("/b".to_string()),
        ]
    );
}

#[test]
fn test_entity_decoding() {
    let tokens = tokenize("&amp;&lt;&gt;&quot;&#65;&#x41;");
    assert_eq!(text_of(&tokens), "&<>\"AA");
}

#[test]
fn test_entity_without_semicolon_legacy_forms() {
    let tokens = tokenize("a&amp b");
    assert_eq!(text_of(&tokens), "a& b");
}

#[test]
fn test_unknown_entity_is_literal() {
    let tokens = tokenize("&bogus;");
    assert_eq!(text_of(&tokens), "&bogus;");
}

#[test]
fn test_overlong_entity_is_literal() {
    let tokens = tokenize("&thisistoolong;");
    assert_eq!(text_of(&tokens), "&thisistoolong;");
}

#[test]
fn test_comment_suppressed() {
    let tokens = tokenize("a<!-- secret <b>bold</b> -->b");
    assert_eq!(text_of(&tokens), "ab");
    assert!(tokens.iter().all(Token::is_text));
}

#[test]
fn test_doctype_suppressed() {
    let tokens = tokenize("<!DOCTYPE html><p>x</p>");
    assert_eq!(
        tokens,
        vec![
            Token::Tag("p".to_string()),
            Token::Text("x".to_string()),
            Token::Tag("/p".to_string()),
        ]
    );
}

#[test]
fn test_script_content_not_tokenized() {
    let tokens = tokenize("<script>if (a < b) { d.write('<p>no</p>'); }</script>after");
    assert_eq!(
        tokens,
        vec![
            Token::Tag("script".to_string()),
            Token::Tag("/script".to_string()),
            Token::Text("after".to_string()),
        ]
    );
}

#[test]
fn test_style_content_not_tokenized() {
    let tokens = tokenize("<style>p > em { color: red }</style>x");
    assert_eq!(
        tokens,
        vec![
            Token::Tag("style".to_string()),
            Token::Tag("/style".to_string()),
            Token::Text("x".to_string()),
        ]
    );
}

#[test]
fn test_pre_preserves_newlines() {
    let tokens = tokenize("<pre>a\nb</pre>");
    assert_eq!(
        tokens,
        vec![
            Token::Tag("pre".to_string()),
            Token::Text("a\nb".to_string()),
            Token::Tag("/pre".to_string()),
        ]
    );
}

#[test]
fn test_pre_tab_expands_to_column_8() {
    let tokens = tokenize("<pre>a\tb</pre>");
    // 'a' occupies column 0; the tab fills columns 1..8.
    assert_eq!(text_of(&tokens), format!("a{}b", " ".repeat(7)));
}

#[test]
fn test_streaming_split_mid_tag() {
    let mut tokenizer = HtmlTokenizer::new();
    tokenizer.write("<p ali");
    tokenizer.write("gn=center>x");
    tokenizer.end();
    let tokens = drain(&mut tokenizer);
    assert_eq!(
        tokens,
        vec![
            Token::Tag("p align=center".to_string()),
            Token::Text("x".to_string()),
        ]
    );
}

#[test]
fn test_streaming_split_mid_entity() {
    let mut tokenizer = HtmlTokenizer::new();
    tokenizer.write("a&am");
    tokenizer.write("p;b");
    tokenizer.end();
    assert_eq!(text_of(&drain(&mut tokenizer)), "a&b");
}

#[test]
fn test_table_tokens_held_until_table_closes() {
    let mut tokenizer = HtmlTokenizer::new();
    tokenizer.write("<table><tr><td>x</td>");
    // The table is still open: nothing may be delivered yet.
    assert!(!tokenizer.has_token());

    tokenizer.write("</tr></table>");
    let tokens = drain(&mut tokenizer);
    assert_eq!(tokens.first(), Some(&Token::Tag("table".to_string())));
    assert_eq!(tokens.last(), Some(&Token::Tag("/table".to_string())));
    assert_eq!(tokens.len(), 7);
}

#[test]
fn test_nested_table_blocks_until_outer_close() {
    let mut tokenizer = HtmlTokenizer::new();
    tokenizer.write("<table><td><table><td>y</td></table>");
    // Inner table closed, outer still open.
    assert!(!tokenizer.has_token());
    tokenizer.write("</table>");
    assert!(tokenizer.has_token());
    let tokens = drain(&mut tokenizer);
    assert_eq!(tokens.last(), Some(&Token::Tag("/table".to_string())));
}

#[test]
fn test_unterminated_table_released_at_end() {
    let mut tokenizer = HtmlTokenizer::new();
    tokenizer.write("<table><td>x");
    assert!(!tokenizer.has_token());
    tokenizer.end();
    let tokens = drain(&mut tokenizer);
    assert_eq!(tokens.first(), Some(&Token::Tag("table".to_string())));
    assert_eq!(tokens.len(), 3);
}

#[test]
fn test_quoted_attribute_may_contain_gt() {
    let tokens = tokenize(r#"<img alt="a > b">"#);
    assert_eq!(tokens, vec![Token::Tag(r#"img alt="a > b""#.to_string())]);
}

#[test]
fn test_stray_lt_is_literal_text() {
    let tokens = tokenize("1 < 2");
    assert_eq!(text_of(&tokens), "1 < 2");
}

#[test]
fn test_empty_tag_skipped() {
    let tokens = tokenize("a<>b");
    assert_eq!(text_of(&tokens), "ab");
}

#[test]
fn test_unterminated_tag_discarded_at_end() {
    let tokens = tokenize("hello<p attr");
    assert_eq!(tokens, vec![Token::Text("hello".to_string())]);
}

#[test]
fn test_end_is_idempotent() {
    let mut tokenizer = HtmlTokenizer::new();
    tokenizer.write("x");
    tokenizer.end();
    tokenizer.end();
    assert_eq!(drain(&mut tokenizer), vec![Token::Text("x".to_string())]);
}

#[test]
fn test_whitespace_only_input_produces_nothing() {
    let tokens = tokenize("  \n\t  ");
    assert!(tokens.is_empty());
}
