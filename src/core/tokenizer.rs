//! XML Tokenizer - lexical grammar for the pull reader
//!
//! Splits the input into tokens:
//! - Element start tags (with attributes, possibly self-closing)
//! - Element end tags
//! - Declarations and processing instructions (`<!name ...>`, `<?name ...?>`)
//! - Character runs, CDATA sections and comments
//!
//! The grammar is permissive: no validation beyond what is needed to find the
//! end of each construct. Anything that cannot be delimited is a [`ParseError`].

use super::attributes::Attribute;
use super::scanner::{is_name_start_char, is_whitespace, Scanner};
use crate::error::{ParseError, ParseErrorKind};

/// Type of XML token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Element start tag: <element> or <element/>
    StartTag,
    /// Element end tag: </element>
    EndTag,
    /// `<?target ...?>` or `<!NAME ...>`
    Declaration,
    /// Text content
    Text,
    /// CDATA section: <![CDATA[...]]>
    CData,
    /// Comment: <!--...-->
    Comment,
}

/// A scanned token, borrowing from the input
#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw span in input (start, end)
    pub span: (usize, usize),
    /// Tag name; declarations keep their `?` / `!` sigil
    pub name: &'a [u8],
    /// Body of text, CDATA and comment tokens (without delimiters)
    pub content: &'a [u8],
    pub attributes: Vec<Attribute<'a>>,
    /// Start tag ended with `/>`
    pub self_closing: bool,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: b"",
            content: b"",
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    fn with_name(mut self, name: &'a [u8]) -> Self {
        self.name = name;
        self
    }

    fn with_content(mut self, content: &'a [u8]) -> Self {
        self.content = content;
        self
    }

    fn with_attributes(mut self, attributes: Vec<Attribute<'a>>) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Tokenizer over an immutable byte buffer
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            scanner: Scanner::new(input),
        }
    }

    /// Current byte offset of the scan cursor
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Get the next token, `Ok(None)` at end of input
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        match self.scanner.peek() {
            None => Ok(None),
            Some(b'<') => self.parse_markup().map(Some),
            Some(_) => Ok(Some(self.parse_text())),
        }
    }

    /// Parse markup starting with '<'
    fn parse_markup(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.scanner.position();

        if self.scanner.starts_with(b"<![CDATA[") {
            return self.parse_cdata(start);
        }
        if self.scanner.starts_with(b"<!--") {
            return self.parse_comment(start);
        }

        self.scanner.advance(1); // Skip '<'
        match self.scanner.peek() {
            Some(b'/') => self.parse_end_tag(start),
            Some(b'?') | Some(b'!') => self.parse_declaration(start),
            _ => self.parse_start_tag(start),
        }
    }

    /// Parse a start tag or empty element tag
    fn parse_start_tag(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        let name = self
            .scanner
            .read_name()
            .ok_or(ParseError::new(ParseErrorKind::InvalidName, start))?;

        let attributes = self.parse_attributes(false)?;

        let self_closing = match self.scanner.peek() {
            Some(b'>') => {
                self.scanner.advance(1);
                false
            }
            Some(b'/') if self.scanner.peek_at(1) == Some(b'>') => {
                self.scanner.advance(2);
                true
            }
            _ => return Err(ParseError::new(ParseErrorKind::UnclosedTag, start)),
        };

        let mut token = Token::new(TokenKind::StartTag, (start, self.scanner.position()))
            .with_name(name)
            .with_attributes(attributes);
        token.self_closing = self_closing;
        Ok(token)
    }

    /// Parse an end tag
    fn parse_end_tag(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(1); // Skip '/'

        let name = self
            .scanner
            .read_name()
            .ok_or(ParseError::new(ParseErrorKind::InvalidName, start))?;

        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'>') {
            return Err(ParseError::new(ParseErrorKind::UnclosedTag, start));
        }
        self.scanner.advance(1);

        Ok(Token::new(TokenKind::EndTag, (start, self.scanner.position())).with_name(name))
    }

    /// Parse `<?name ...?>` or `<!name ...>`
    fn parse_declaration(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        let name_start = self.scanner.position();
        let is_pi = self.scanner.peek() == Some(b'?');
        self.scanner.advance(1); // Sigil stays part of the name

        if self.scanner.read_name().is_none() {
            return Err(ParseError::new(ParseErrorKind::InvalidName, start));
        }
        let name = self.scanner.slice(name_start, self.scanner.position());

        let attributes = self.parse_attributes(is_pi)?;

        if is_pi {
            if self.scanner.starts_with(b"?>") {
                self.scanner.advance(2);
            } else if self.scanner.peek() == Some(b'>') {
                self.scanner.advance(1);
            } else {
                let end = self
                    .scanner
                    .find_sequence(b"?>")
                    .ok_or(ParseError::new(ParseErrorKind::UnterminatedDeclaration, start))?;
                self.scanner.set_position(end + 2);
            }
        } else if self.scanner.peek() == Some(b'>') {
            self.scanner.advance(1);
        } else {
            self.skip_bang_declaration(start)?;
        }

        Ok(Token::new(TokenKind::Declaration, (start, self.scanner.position()))
            .with_name(name)
            .with_attributes(attributes))
    }

    /// Skip the rest of a `<!...>` declaration, honoring quoted literals and a
    /// bracketed internal subset
    fn skip_bang_declaration(&mut self, start: usize) -> Result<(), ParseError> {
        let mut quote: Option<u8> = None;
        let mut depth = 0usize;

        while let Some(b) = self.scanner.peek() {
            self.scanner.advance(1);
            match (quote, b) {
                (Some(q), b) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => depth += 1,
                (None, b']') => depth = depth.saturating_sub(1),
                (None, b'>') if depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(ParseError::new(ParseErrorKind::UnterminatedDeclaration, start))
    }

    /// Parse whitespace-separated attributes
    ///
    /// Stops, leaving the cursor in place, at the first byte that cannot start
    /// another attribute. The caller decides whether that byte closes the tag.
    fn parse_attributes(&mut self, in_pi: bool) -> Result<Vec<Attribute<'a>>, ParseError> {
        let mut attrs = Vec::new();

        loop {
            let had_space = self.scanner.skip_whitespace();
            match self.scanner.peek() {
                Some(b) if had_space && is_name_start_char(b) => {}
                _ => break,
            }

            let Some(name) = self.scanner.read_name() else {
                break;
            };
            let after_name = self.scanner.position();

            self.scanner.skip_whitespace();
            if self.scanner.peek() != Some(b'=') {
                // Bare attribute: `<input disabled>`
                self.scanner.set_position(after_name);
                attrs.push(Attribute::new(name, b""));
                continue;
            }
            self.scanner.advance(1); // Skip '='
            self.scanner.skip_whitespace();

            let value = match self.scanner.peek() {
                Some(quote @ (b'"' | b'\'')) => {
                    let quote_pos = self.scanner.position();
                    self.scanner.advance(1);
                    let end = self
                        .scanner
                        .find_byte(quote)
                        .ok_or(ParseError::new(ParseErrorKind::UnclosedAttributeValue, quote_pos))?;
                    let value = self.scanner.slice(quote_pos + 1, end);
                    self.scanner.set_position(end + 1);
                    value
                }
                _ => self.read_unquoted_value(in_pi),
            };
            attrs.push(Attribute::new(name, value));
        }

        Ok(attrs)
    }

    /// Unquoted value, terminated by whitespace, `>` or `/`
    fn read_unquoted_value(&mut self, in_pi: bool) -> &'a [u8] {
        let start = self.scanner.position();
        while let Some(b) = self.scanner.peek() {
            if is_whitespace(b) || b == b'>' || b == b'/' {
                break;
            }
            if in_pi && b == b'?' && self.scanner.peek_at(1) == Some(b'>') {
                break;
            }
            self.scanner.advance(1);
        }
        self.scanner.slice(start, self.scanner.position())
    }

    /// Parse a comment <!--...-->
    fn parse_comment(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(4); // Skip '<!--'
        let content_start = self.scanner.position();

        let end = self
            .scanner
            .find_sequence(b"-->")
            .ok_or(ParseError::new(ParseErrorKind::UnterminatedComment, start))?;
        let content = self.scanner.slice(content_start, end);
        self.scanner.set_position(end + 3);

        Ok(Token::new(TokenKind::Comment, (start, self.scanner.position())).with_content(content))
    }

    /// Parse a CDATA section <![CDATA[...]]>
    fn parse_cdata(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(9); // Skip '<![CDATA['
        let content_start = self.scanner.position();

        let end = self
            .scanner
            .find_sequence(b"]]>")
            .ok_or(ParseError::new(ParseErrorKind::UnterminatedCData, start))?;
        let content = self.scanner.slice(content_start, end);
        self.scanner.set_position(end + 3);

        Ok(Token::new(TokenKind::CData, (start, self.scanner.position())).with_content(content))
    }

    /// Parse a run of text up to the next '<' or end of input
    fn parse_text(&mut self) -> Token<'a> {
        let start = self.scanner.position();
        let end = self
            .scanner
            .find_tag_start()
            .unwrap_or(start + self.scanner.remaining().len());

        let content = self.scanner.slice(start, end);
        self.scanner.set_position(end);

        Token::new(TokenKind::Text, (start, end)).with_content(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &[u8]) -> Vec<Token<'_>> {
        let mut tok = Tokenizer::new(input);
        let mut out = Vec::new();
        while let Some(t) = tok.next_token().unwrap() {
            out.push(t);
        }
        out
    }

    fn error_kind(input: &[u8]) -> ParseErrorKind {
        let mut tok = Tokenizer::new(input);
        loop {
            match tok.next_token() {
                Ok(Some(_)) => continue,
                Ok(None) => panic!("expected an error"),
                Err(e) => return e.kind,
            }
        }
    }

    #[test]
    fn test_simple_element() {
        let mut tok = Tokenizer::new(b"<root>content</root>");

        let t1 = tok.next_token().unwrap().unwrap();
        assert_eq!(t1.kind, TokenKind::StartTag);
        assert_eq!(t1.name, b"root");

        let t2 = tok.next_token().unwrap().unwrap();
        assert_eq!(t2.kind, TokenKind::Text);
        assert_eq!(t2.content, b"content");

        let t3 = tok.next_token().unwrap().unwrap();
        assert_eq!(t3.kind, TokenKind::EndTag);
        assert_eq!(t3.name, b"root");
        assert_eq!(t3.span, (13, 20));

        assert!(tok.next_token().unwrap().is_none());
    }

    #[test]
    fn test_empty_element() {
        let t = &tokens(b"<br/>")[0];
        assert_eq!(t.kind, TokenKind::StartTag);
        assert_eq!(t.name, b"br");
        assert!(t.self_closing);
    }

    #[test]
    fn test_attribute_forms() {
        let t = &tokens(b"<a x='1' y=\"two words\" z=bare flag k = 'v'/>")[0];
        let pairs: Vec<_> = t.attributes.iter().map(|a| (a.name, a.value.raw())).collect();
        assert_eq!(
            pairs,
            vec![
                (b"x" as &[u8], b"1" as &[u8]),
                (b"y", b"two words"),
                (b"z", b"bare"),
                (b"flag", b""),
                (b"k", b"v"),
            ]
        );
        assert!(t.self_closing);
    }

    #[test]
    fn test_unquoted_value_stops_at_slash() {
        let t = &tokens(b"<a href=x/>")[0];
        assert_eq!(t.attributes[0].value.raw(), b"x");
        assert!(t.self_closing);
    }

    #[test]
    fn test_duplicate_attributes_kept_in_order() {
        let t = &tokens(b"<a k='1' k='2'>")[0];
        assert_eq!(t.attributes.len(), 2);
        assert_eq!(t.attributes[1].value.raw(), b"2");
    }

    #[test]
    fn test_cdata() {
        let t = &tokens(b"<![CDATA[<script>code</script>]]>")[0];
        assert_eq!(t.kind, TokenKind::CData);
        assert_eq!(t.content, b"<script>code</script>");
    }

    #[test]
    fn test_comment() {
        let t = &tokens(b"<!-- a -- b -->")[0];
        assert_eq!(t.kind, TokenKind::Comment);
        assert_eq!(t.content, b" a -- b ");
    }

    #[test]
    fn test_processing_instruction() {
        let t = &tokens(b"<?xml version=\"1.0\" encoding='UTF-8'?>")[0];
        assert_eq!(t.kind, TokenKind::Declaration);
        assert_eq!(t.name, b"?xml");
        assert_eq!(t.attributes.len(), 2);
        assert_eq!(t.attributes[1].value.raw(), b"UTF-8");
    }

    #[test]
    fn test_pi_with_free_form_body() {
        let toks = tokens(b"<?php echo 1; ?><a/>");
        assert_eq!(toks[0].kind, TokenKind::Declaration);
        assert_eq!(toks[0].name, b"?php");
        assert_eq!(toks[1].name, b"a");
    }

    #[test]
    fn test_doctype() {
        let toks = tokens(b"<!DOCTYPE html><html/>");
        assert_eq!(toks[0].kind, TokenKind::Declaration);
        assert_eq!(toks[0].name, b"!DOCTYPE");
        assert_eq!(toks[0].attributes[0].name, b"html");
        assert_eq!(toks[1].name, b"html");
    }

    #[test]
    fn test_doctype_with_literals_and_subset() {
        let input = b"<!DOCTYPE note SYSTEM \"a>b.dtd\" [<!ENTITY x \"y\">]><note/>";
        let toks = tokens(input);
        assert_eq!(toks[0].kind, TokenKind::Declaration);
        let names: Vec<_> = toks[0].attributes.iter().map(|a| a.name).collect();
        assert_eq!(names, vec![b"note" as &[u8], b"SYSTEM"]);
        assert_eq!(toks[1].name, b"note");
    }

    #[test]
    fn test_trailing_text() {
        let toks = tokens(b"<a/>tail");
        assert_eq!(toks[1].kind, TokenKind::Text);
        assert_eq!(toks[1].content, b"tail");
    }

    #[test]
    fn test_end_tag_with_whitespace() {
        let toks = tokens(b"<a></a  >");
        assert_eq!(toks[1].kind, TokenKind::EndTag);
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!(error_kind(b"<a"), ParseErrorKind::UnclosedTag);
        assert_eq!(error_kind(b"a < b"), ParseErrorKind::InvalidName);
        assert_eq!(error_kind(b"<1a>"), ParseErrorKind::InvalidName);
        assert_eq!(error_kind(b"<a x='1>"), ParseErrorKind::UnclosedAttributeValue);
        assert_eq!(error_kind(b"<a x='1'y='2'>"), ParseErrorKind::UnclosedTag);
        assert_eq!(error_kind(b"<a></a"), ParseErrorKind::UnclosedTag);
        assert_eq!(error_kind(b"<!-- open"), ParseErrorKind::UnterminatedComment);
        assert_eq!(error_kind(b"<![CDATA[open"), ParseErrorKind::UnterminatedCData);
        assert_eq!(error_kind(b"<?xml version='1.0'"), ParseErrorKind::UnterminatedDeclaration);
        assert_eq!(error_kind(b"<"), ParseErrorKind::InvalidName);
    }
}
