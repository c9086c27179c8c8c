//! XML Tokenizer - State machine for XML token extraction
//!
//! Implements a pull-parser style tokenizer that extracts XML tokens:
//! - Element start/end/empty tags (with attributes)
//! - Text content
//! - Entity references
//! - CDATA sections
//! - Comments
//! - Processing instructions
//! - DOCTYPE declarations (skipped, never interpreted)
//!
//! Every call to [`Tokenizer::next_token`] consumes exactly one lexical unit
//! and checks it against the document structure (prolog, a single root
//! element, trailing misc) before returning it. Malformed input produces a
//! [`TokenKind::Error`] token; the tokenizer never panics and never recovers.

use std::cell::Cell;
use std::rc::Rc;

use log::trace;

use super::attributes::{normalize_value, Attribute, Attributes};
use super::encoding::prepare_text;
use super::entities::decode_entity;
use super::error::{ErrorKind, ParseError};
use super::location::{Location, Locator};
use super::scanner::{is_blank, Scanner};
use super::span::{Content, ContentSpan, Span};

/// Where the tokenizer is in the document structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Before the root element
    Prolog,
    /// Inside the root element
    Document,
    /// After the root element has closed
    Misc,
}

/// Type of XML token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Element start tag: <element>
    StartTag,
    /// Element end tag: </element>
    EndTag,
    /// Empty element: <element/>
    EmptyTag,
    /// Text content
    Text,
    /// Entity or character reference: &amp; &#65;
    Entity,
    /// Processing instruction: <?target data?>
    ProcessingInstruction,
    /// CDATA section: <![CDATA[...]]>
    CData,
    /// Comment: <!--...-->
    Comment,
    /// DOCTYPE declaration
    DocType,
    /// Malformed input, see [`Token::error`]
    Error,
    /// End of input
    Eof,
}

/// A scanned XML token
///
/// Names and source content are spans into the tokenizer's buffer; resolve
/// them with [`Token::name`] and [`Token::content`].
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw markup span in the buffer
    pub span: Span,
    /// Element name, PI target or entity name
    pub name: Option<Span>,
    /// Text, CDATA, comment, PI data or entity replacement
    pub content: Content,
    /// Attributes of a start or empty tag
    pub attributes: Attributes,
    /// Set for `TokenKind::Error` only
    pub error: Option<ParseError>,
}

impl Token {
    fn new(kind: TokenKind, span: Span) -> Self {
        Token {
            kind,
            span,
            name: None,
            content: Content::None,
            attributes: Attributes::new(),
            error: None,
        }
    }

    fn failure(error: ParseError, span: Span) -> Self {
        Token {
            error: Some(error),
            ..Token::new(TokenKind::Error, span)
        }
    }

    fn with_name(mut self, name: Span) -> Self {
        self.name = Some(name);
        self
    }

    fn with_content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Name of the element, PI target or entity, or "" if the token has none
    pub fn name<'t>(&self, text: &'t str) -> &'t str {
        self.name.map_or("", |span| span.as_str(text))
    }

    /// Textual payload of the token
    pub fn content<'t>(&'t self, text: &'t str) -> ContentSpan<'t> {
        self.content.resolve(text)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Error token or end of input: nothing follows
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, TokenKind::Error | TokenKind::Eof)
    }
}

/// XML tokenizer implementing a pull-parser pattern
pub struct Tokenizer {
    text: Rc<str>,
    scanner: Scanner,
    state: ParseState,
    /// Names of the open elements, innermost last
    stack: Vec<Span>,
    error: Option<ParseError>,
    /// Cursor as of the last returned token, shared with locators
    cursor: Rc<Cell<usize>>,
    /// Iterator side: an `Eof` or error has been yielded
    finished: bool,
}

impl Tokenizer {
    /// Create a new tokenizer over `input`.
    ///
    /// A leading byte order mark is dropped and line endings are normalized
    /// to `\n`; all offsets refer to the normalized text.
    pub fn new(input: &str) -> Self {
        let text: Rc<str> = Rc::from(&*prepare_text(input));
        Tokenizer {
            scanner: Scanner::new(Rc::clone(&text)),
            text,
            state: ParseState::Prolog,
            stack: Vec::new(),
            error: None,
            cursor: Rc::new(Cell::new(0)),
            finished: false,
        }
    }

    /// The normalized document buffer
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shared handle to the normalized document buffer
    pub fn shared_text(&self) -> Rc<str> {
        Rc::clone(&self.text)
    }

    /// Get the current parse state
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Get the current position in the buffer
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Number of open elements
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The error reported by the last `Error` token, if any
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    pub fn location(&self) -> Location {
        Location::locate(&self.text, self.scanner.position())
    }

    pub fn line_number(&self) -> usize {
        self.location().line
    }

    pub fn column_number(&self) -> usize {
        self.location().column
    }

    /// A live position handle that follows this tokenizer
    pub fn locator(&self) -> Locator {
        Locator::new(Rc::clone(&self.text), Rc::clone(&self.cursor))
    }

    /// Get the next token.
    ///
    /// After an `Error` token every further call returns the same error.
    /// After `Eof` every further call returns `Eof`.
    pub fn next_token(&mut self) -> Token {
        if let Some(error) = &self.error {
            return Token::failure(error.clone(), Span::new(error.location.offset, 0));
        }

        let text = Rc::clone(&self.text);
        let start = self.scanner.position();
        let token = match self.scan_checked(&text, start) {
            Ok(token) => token,
            Err(kind) => self.fail(kind, start),
        };
        self.cursor.set(self.scanner.position());
        token
    }

    fn scan_checked(&mut self, text: &str, start: usize) -> Result<Token, ErrorKind> {
        let token = self.scan(text)?;
        if token.kind != TokenKind::Eof && self.scanner.position() == start {
            return Err(ErrorKind::InfiniteLoop);
        }
        self.check_structure(text, token)
    }

    fn fail(&mut self, kind: ErrorKind, start: usize) -> Token {
        let location = self.location();
        trace!("tokenizer error at {}: {}", location, kind);
        let error = ParseError::new(kind, location);
        self.error = Some(error.clone());
        Token::failure(error, Span::between(start, location.offset))
    }

    /// Classify and consume one lexical unit
    fn scan(&mut self, text: &str) -> Result<Token, ErrorKind> {
        if self.scanner.is_eof() {
            let at = self.scanner.position();
            return Ok(Token::new(TokenKind::Eof, Span::new(at, 0)));
        }

        match self.scanner.peek() {
            Some(b'<') => self.parse_markup(text),
            Some(b'&') => self.parse_entity(text),
            _ => Ok(self.parse_text()),
        }
    }

    /// Parse markup starting with '<'
    fn parse_markup(&mut self, text: &str) -> Result<Token, ErrorKind> {
        let start = self.scanner.position();

        if self.scanner.starts_with(b"<?") {
            self.parse_pi(start)
        } else if self.scanner.starts_with(b"<!DOCTYPE") {
            self.parse_doctype(start)
        } else if self.scanner.starts_with(b"<!--") {
            self.parse_comment(start)
        } else if self.scanner.starts_with(b"<![CDATA[") {
            self.parse_cdata(start)
        } else {
            self.parse_tag(text, start)
        }
    }

    /// Parse a processing instruction <?target data?>
    fn parse_pi(&mut self, start: usize) -> Result<Token, ErrorKind> {
        self.scanner.advance(2); // Skip '<?'

        let target = self.scanner.read_until_delimiter(b"?");
        self.scanner.skip_whitespace();
        let data_start = self.scanner.position();

        let end = self
            .scanner
            .find_sequence(b"?>")
            .ok_or(ErrorKind::PiUnterminated)?;

        self.scanner.set_position(end + 2); // Skip '?>'
        Ok(
            Token::new(TokenKind::ProcessingInstruction, Span::between(start, end + 2))
                .with_name(target)
                .with_content(Content::Source(Span::between(data_start, end))),
        )
    }

    /// Skip a DOCTYPE declaration, including any internal subset
    fn parse_doctype(&mut self, start: usize) -> Result<Token, ErrorKind> {
        self.scanner.advance(9); // Skip '<!DOCTYPE'

        let content_start = self.scanner.position();
        let mut angles = 1usize;
        let mut brackets = 0usize;
        let mut quote: Option<u8> = None;

        while let Some(b) = self.scanner.peek() {
            match (quote, b) {
                (Some(q), _) if q == b => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => brackets += 1,
                (None, b']') => brackets = brackets.saturating_sub(1),
                (None, b'<') if self.scanner.starts_with(b"<!--") => {
                    // Comments in the internal subset may hold quotes and '>'
                    let end = self
                        .scanner
                        .find_sequence(b"-->")
                        .ok_or(ErrorKind::DtdUnterminated)?;
                    self.scanner.set_position(end + 3);
                    continue;
                }
                (None, b'<') => angles += 1,
                (None, b'>') => {
                    angles = angles.saturating_sub(1);
                    if angles == 0 && brackets == 0 {
                        let content_end = self.scanner.position();
                        self.scanner.advance(1); // Skip '>'
                        return Ok(Token::new(
                            TokenKind::DocType,
                            Span::between(start, content_end + 1),
                        )
                        .with_content(Content::Source(Span::between(content_start, content_end))));
                    }
                }
                _ => {}
            }
            self.scanner.advance(1);
        }

        Err(ErrorKind::DtdUnterminated)
    }

    /// Parse a comment <!--...-->
    fn parse_comment(&mut self, start: usize) -> Result<Token, ErrorKind> {
        self.scanner.advance(4); // Skip '<!--'

        let content_start = self.scanner.position();
        let end = self
            .scanner
            .find_sequence(b"-->")
            .ok_or(ErrorKind::CommentUnterminated)?;

        self.scanner.set_position(end + 3); // Skip '-->'
        Ok(Token::new(TokenKind::Comment, Span::between(start, end + 3))
            .with_content(Content::Source(Span::between(content_start, end))))
    }

    /// Parse a CDATA section <![CDATA[...]]>
    fn parse_cdata(&mut self, start: usize) -> Result<Token, ErrorKind> {
        self.scanner.advance(9); // Skip '<![CDATA['

        let content_start = self.scanner.position();
        let end = self
            .scanner
            .find_sequence(b"]]>")
            .ok_or(ErrorKind::CDataUnterminated)?;

        self.scanner.set_position(end + 3); // Skip ']]>'
        Ok(Token::new(TokenKind::CData, Span::between(start, end + 3))
            .with_content(Content::Source(Span::between(content_start, end))))
    }

    /// Parse a start, end or empty element tag
    fn parse_tag(&mut self, text: &str, start: usize) -> Result<Token, ErrorKind> {
        self.scanner.advance(1); // Skip '<'

        let is_end = self.scanner.peek() == Some(b'/');
        if is_end {
            self.scanner.advance(1);
        }

        // Unknown '<!' constructs such as a lowercase '<!doctype'
        if self.scanner.peek() == Some(b'!') {
            return Err(ErrorKind::TagNameNotImmediate);
        }

        let name = self.scanner.read_until_delimiter(b"/><=\"'");
        match self.scanner.peek() {
            Some(b'<') => return Err(ErrorKind::TagNameLessThan),
            None if name.is_empty() => return Err(ErrorKind::TagUnterminated),
            _ if name.is_empty() => return Err(ErrorKind::TagNameNotImmediate),
            _ => {}
        }

        if is_end {
            self.parse_end_tag(start, name)
        } else {
            self.parse_start_tag(text, start, name)
        }
    }

    /// Finish an end tag after its name: only whitespace may precede '>'
    fn parse_end_tag(&mut self, start: usize, name: Span) -> Result<Token, ErrorKind> {
        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'>') {
            return Err(ErrorKind::TagUnterminated);
        }
        self.scanner.advance(1);

        let end = self.scanner.position();
        Ok(Token::new(TokenKind::EndTag, Span::between(start, end)).with_name(name))
    }

    /// Parse the attributes and the closing '>' or '/>' of a start tag
    fn parse_start_tag(&mut self, text: &str, start: usize, name: Span) -> Result<Token, ErrorKind> {
        let mut attributes = Attributes::new();

        loop {
            self.scanner.skip_whitespace();

            let kind = match self.scanner.peek() {
                None => return Err(ErrorKind::TagUnterminated),
                Some(b'>') => {
                    self.scanner.advance(1);
                    TokenKind::StartTag
                }
                Some(b'/') => {
                    self.scanner.advance(1);
                    match self.scanner.peek() {
                        Some(b'>') => self.scanner.advance(1),
                        None => return Err(ErrorKind::TagUnterminated),
                        Some(_) => return Err(ErrorKind::EmptyTagMalformed),
                    }
                    TokenKind::EmptyTag
                }
                Some(b'<') => return Err(ErrorKind::AttributeNameLessThan),
                Some(_) => {
                    let attribute = self.parse_attribute(text)?;
                    attributes.insert(attribute)?;
                    continue;
                }
            };

            let end = self.scanner.position();
            return Ok(Token::new(kind, Span::between(start, end))
                .with_name(name)
                .with_attributes(attributes));
        }
    }

    /// Parse one `name = "value"` pair
    fn parse_attribute(&mut self, text: &str) -> Result<Attribute, ErrorKind> {
        let name = self.scanner.read_until_delimiter(b"=/><");
        if self.scanner.peek() == Some(b'<') {
            return Err(ErrorKind::AttributeNameLessThan);
        }

        self.scanner.skip_whitespace();
        match self.scanner.peek() {
            None => return Err(ErrorKind::TagUnterminated),
            Some(b'=') if !name.is_empty() => self.scanner.advance(1),
            Some(_) => return Err(ErrorKind::AttributeValueMissing),
        }

        self.scanner.skip_whitespace();
        let quote = match self.scanner.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            None => return Err(ErrorKind::TagUnterminated),
            Some(_) => return Err(ErrorKind::AttributeValueMissing),
        };
        self.scanner.advance(1);

        let value_start = self.scanner.position();
        let value_end = self
            .scanner
            .find_byte(quote)
            .ok_or(ErrorKind::AttributeValueUnterminated)?;

        let raw = Span::between(value_start, value_end).as_str(text);
        if let Some(i) = raw.find('<') {
            self.scanner.set_position(value_start + i);
            return Err(ErrorKind::AttributeValueLessThan);
        }

        let value = normalize_value(raw)?.into_owned();
        self.scanner.set_position(value_end + 1); // Skip closing quote
        Ok(Attribute::new(name.as_str(text), value))
    }

    /// Parse an entity or character reference &name;
    fn parse_entity(&mut self, text: &str) -> Result<Token, ErrorKind> {
        let start = self.scanner.position();
        self.scanner.advance(1); // Skip '&'

        let end = self
            .scanner
            .find_reference_end()
            .ok_or(ErrorKind::EntityUnterminated)?;
        let name = Span::between(start + 1, end);
        let c = decode_entity(name.as_str(text)).ok_or(ErrorKind::EntityUnknown)?;

        self.scanner.set_position(end + 1); // Skip ';'
        Ok(Token::new(TokenKind::Entity, Span::between(start, end + 1))
            .with_name(name)
            .with_content(Content::Replaced(c.to_string())))
    }

    /// Parse text content up to the next '<' or '&'
    fn parse_text(&mut self) -> Token {
        let start = self.scanner.position();
        let end = self.scanner.find_text_boundary().unwrap_or(self.text.len());
        self.scanner.set_position(end);

        let span = Span::between(start, end);
        Token::new(TokenKind::Text, span).with_content(Content::Source(span))
    }

    /// Enforce prolog -> single root element -> misc
    fn check_structure(&mut self, text: &str, token: Token) -> Result<Token, ErrorKind> {
        match token.kind {
            TokenKind::StartTag | TokenKind::EmptyTag => {
                if self.state == ParseState::Misc {
                    return Err(ErrorKind::DocumentStructure);
                }
                self.state = ParseState::Document;
                if token.kind == TokenKind::StartTag {
                    self.stack.push(token.name.unwrap_or_default());
                } else if self.stack.is_empty() {
                    self.state = ParseState::Misc;
                }
            }
            TokenKind::EndTag => {
                if self.state != ParseState::Document {
                    return Err(ErrorKind::DocumentStructure);
                }
                let open = self.stack.pop().ok_or(ErrorKind::ElementNesting)?;
                if open.as_str(text) != token.name(text) {
                    return Err(ErrorKind::ElementNesting);
                }
                if self.stack.is_empty() {
                    self.state = ParseState::Misc;
                }
            }
            TokenKind::Text => {
                if self.state != ParseState::Document && !is_blank(token.content(text).as_str()) {
                    return Err(ErrorKind::DocumentStructure);
                }
            }
            TokenKind::Entity | TokenKind::CData => {
                if self.state != ParseState::Document {
                    return Err(ErrorKind::DocumentStructure);
                }
            }
            TokenKind::DocType => {
                if self.state != ParseState::Prolog {
                    return Err(ErrorKind::DocumentStructure);
                }
            }
            // Running out of input ends the token stream in any state
            TokenKind::Eof
            | TokenKind::ProcessingInstruction
            | TokenKind::Comment
            | TokenKind::Error => {}
        }
        Ok(token)
    }
}

/// Iterator adapter for tokenizer
///
/// Yields tokens up to (not including) `Eof`, or up to and including the
/// first error.
impl Iterator for Tokenizer {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let token = self.next_token();
        if !token.is_terminal() {
            return Some(Ok(token));
        }

        self.finished = true;
        token.error.map(Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    /// Collect tokens up to `Eof`, panicking on error
    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input)
            .map(|t| t.expect("well-formed input").kind)
            .collect()
    }

    /// The error kind the input fails with
    fn error_kind(input: &str) -> ErrorKind {
        let mut tok = Tokenizer::new(input);
        loop {
            let t = tok.next_token();
            match t.kind {
                TokenKind::Error => return t.error.expect("error token carries an error").kind,
                TokenKind::Eof => panic!("no error in {:?}", input),
                _ => {}
            }
        }
    }

    #[test]
    fn test_simple_element() {
        let mut tok = Tokenizer::new("<root>content</root>");

        let t1 = tok.next_token();
        assert_eq!(t1.kind, TokenKind::StartTag);
        assert_eq!(t1.name(tok.text()), "root");

        let t2 = tok.next_token();
        assert_eq!(t2.kind, TokenKind::Text);
        assert_eq!(t2.content(tok.text()).as_str(), "content");

        let t3 = tok.next_token();
        assert_eq!(t3.kind, TokenKind::EndTag);
        assert_eq!(t3.name(tok.text()), "root");

        assert_eq!(tok.next_token().kind, TokenKind::Eof);
        assert_eq!(tok.next_token().kind, TokenKind::Eof);
        assert_eq!(tok.state(), ParseState::Misc);
    }

    #[test]
    fn test_empty_element() {
        let mut tok = Tokenizer::new("<br/>");
        let t = tok.next_token();
        assert_eq!(t.kind, TokenKind::EmptyTag);
        assert_eq!(t.name(tok.text()), "br");
        assert_eq!(tok.state(), ParseState::Misc);
    }

    #[test]
    fn test_attributes() {
        let mut tok = Tokenizer::new("<div id=\"main\" class = 'a b' empty=\"\"/>");
        let t = tok.next_token();
        assert_eq!(t.kind, TokenKind::EmptyTag);
        let attrs = t.attributes();
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.name_at(0), Some("id"));
        assert_eq!(attrs.value_of("class"), Some("a b"));
        assert_eq!(attrs.value_of("empty"), Some(""));
    }

    #[test]
    fn test_attribute_value_normalization() {
        let mut tok = Tokenizer::new("<a v=\"x\ty\nz &lt;&#65;\"/>");
        let t = tok.next_token();
        assert_eq!(t.attributes().value_of("v"), Some("x  yz <A"));
    }

    #[test]
    fn test_attribute_value_may_hold_other_quote() {
        let mut tok = Tokenizer::new("<a v='say \"hi\"' w=\"it's\"/>");
        let t = tok.next_token();
        assert_eq!(t.attributes().value_of("v"), Some("say \"hi\""));
        assert_eq!(t.attributes().value_of("w"), Some("it's"));
    }

    #[test]
    fn test_cdata() {
        let mut tok = Tokenizer::new("<a><![CDATA[<script>code</script>]]></a>");
        tok.next_token();
        let t = tok.next_token();
        assert_eq!(t.kind, TokenKind::CData);
        assert_eq!(t.content(tok.text()).as_str(), "<script>code</script>");
    }

    #[test]
    fn test_comment() {
        let mut tok = Tokenizer::new("<!-- comment --><a/>");
        let t = tok.next_token();
        assert_eq!(t.kind, TokenKind::Comment);
        assert_eq!(t.content(tok.text()).as_str(), " comment ");
    }

    #[test]
    fn test_processing_instruction() {
        let mut tok = Tokenizer::new("<?xml version=\"1.0\"?><?pi?><a/>");
        let t = tok.next_token();
        assert_eq!(t.kind, TokenKind::ProcessingInstruction);
        assert_eq!(t.name(tok.text()), "xml");
        assert_eq!(t.content(tok.text()).as_str(), "version=\"1.0\"");

        let t = tok.next_token();
        assert_eq!(t.name(tok.text()), "pi");
        assert!(t.content(tok.text()).is_empty());
    }

    #[test]
    fn test_doctype_is_skipped_as_one_token() {
        let input = "<!DOCTYPE r [ <!ELEMENT r (#PCDATA)> <!-- > ' --> <!ATTLIST r a CDATA \">\"> ]>\n<r/>";
        assert_eq!(
            kinds(input),
            [TokenKind::DocType, TokenKind::Text, TokenKind::EmptyTag]
        );
    }

    #[test]
    fn test_entities() {
        let mut tok = Tokenizer::new("<a>x&amp;&#65;&#x42;</a>");
        tok.next_token();
        assert_eq!(tok.next_token().kind, TokenKind::Text);

        let t = tok.next_token();
        assert_eq!(t.kind, TokenKind::Entity);
        assert_eq!(t.name(tok.text()), "amp");
        assert_eq!(t.content(tok.text()).as_str(), "&");

        assert_eq!(tok.next_token().content(tok.text()).as_str(), "A");
        assert_eq!(tok.next_token().content(tok.text()).as_str(), "B");
    }

    #[test]
    fn test_nested_sequence() {
        assert_eq!(
            kinds("<a><b>text</b><c/></a>"),
            [
                TokenKind::StartTag,
                TokenKind::StartTag,
                TokenKind::Text,
                TokenKind::EndTag,
                TokenKind::EmptyTag,
                TokenKind::EndTag,
            ]
        );
    }

    #[test]
    fn test_whitespace_around_root_is_allowed() {
        assert_eq!(
            kinds("\n  <a/>  \n"),
            [TokenKind::Text, TokenKind::EmptyTag, TokenKind::Text]
        );
    }

    #[test]
    fn test_unterminated_constructs() {
        assert_eq!(error_kind("<?pi data"), ErrorKind::PiUnterminated);
        assert_eq!(error_kind("<!DOCTYPE a [ <!ELEMENT a ANY>"), ErrorKind::DtdUnterminated);
        assert_eq!(error_kind("<a><!-- open"), ErrorKind::CommentUnterminated);
        assert_eq!(error_kind("<a><![CDATA[ open"), ErrorKind::CDataUnterminated);
        assert_eq!(error_kind("<a"), ErrorKind::TagUnterminated);
        assert_eq!(error_kind("<a x='1'"), ErrorKind::TagUnterminated);
        assert_eq!(error_kind("<a></a"), ErrorKind::TagUnterminated);
        assert_eq!(error_kind("<a>x &amp y</a>"), ErrorKind::EntityUnterminated);
    }

    #[test]
    fn test_tag_name_errors() {
        assert_eq!(error_kind("< a/>"), ErrorKind::TagNameNotImmediate);
        assert_eq!(error_kind("<a></ a>"), ErrorKind::TagNameNotImmediate);
        assert_eq!(error_kind("<>"), ErrorKind::TagNameNotImmediate);
        assert_eq!(error_kind("<a<b>"), ErrorKind::TagNameLessThan);
        assert_eq!(error_kind("<!doctype a><a/>"), ErrorKind::TagNameNotImmediate);
        assert_eq!(error_kind("<a></!a>"), ErrorKind::TagNameNotImmediate);
    }

    #[test]
    fn test_name_stops_at_equals_and_quotes() {
        assert_eq!(error_kind("<a=\"1\">"), ErrorKind::AttributeValueMissing);
        assert_eq!(error_kind("<a'x'/>"), ErrorKind::AttributeValueMissing);
        assert_eq!(error_kind("<a></a=>"), ErrorKind::TagUnterminated);
    }

    #[test]
    fn test_attribute_errors() {
        assert_eq!(error_kind("<a x<='1'/>"), ErrorKind::AttributeNameLessThan);
        assert_eq!(error_kind("<a <b/>"), ErrorKind::AttributeNameLessThan);
        assert_eq!(error_kind("<a x='<'/>"), ErrorKind::AttributeValueLessThan);
        assert_eq!(error_kind("<a x/>"), ErrorKind::AttributeValueMissing);
        assert_eq!(error_kind("<a x=1/>"), ErrorKind::AttributeValueMissing);
        assert_eq!(error_kind("<a ='1'/>"), ErrorKind::AttributeValueMissing);
        assert_eq!(error_kind("<a x='1/>"), ErrorKind::AttributeValueUnterminated);
        assert_eq!(error_kind("<a x='&bogus;'/>"), ErrorKind::EntityUnknown);
    }

    #[test]
    fn test_duplicate_attribute() {
        let mut tok = Tokenizer::new("<a x=\"1\" x=\"2\"/>");
        let t = tok.next_token();
        assert_eq!(t.kind, TokenKind::Error);
        assert_matches!(t.error, Some(ParseError { kind: ErrorKind::AttributeDuplicate, .. }));
    }

    #[test]
    fn test_unknown_entity() {
        assert_eq!(error_kind("<a>&foo;</a>"), ErrorKind::EntityUnknown);
        assert_eq!(error_kind("<a>&#xD800;</a>"), ErrorKind::EntityUnknown);
    }

    #[test]
    fn test_malformed_empty_tag() {
        assert_eq!(error_kind("<a/ >"), ErrorKind::EmptyTagMalformed);
        assert_eq!(error_kind("<a x='1'/x>"), ErrorKind::EmptyTagMalformed);
    }

    #[test]
    fn test_nesting_mismatch() {
        let mut tok = Tokenizer::new("<a><b></a></b>");
        assert_eq!(tok.next_token().kind, TokenKind::StartTag);
        assert_eq!(tok.next_token().kind, TokenKind::StartTag);
        let t = tok.next_token();
        assert_eq!(t.kind, TokenKind::Error);
        assert_eq!(tok.error().map(|e| e.kind), Some(ErrorKind::ElementNesting));
    }

    #[test]
    fn test_document_structure() {
        assert_eq!(error_kind("text<a/>"), ErrorKind::DocumentStructure);
        assert_eq!(error_kind("&amp;<a/>"), ErrorKind::DocumentStructure);
        assert_eq!(error_kind("<a/>text"), ErrorKind::DocumentStructure);
        assert_eq!(error_kind("<a/><b/>"), ErrorKind::DocumentStructure);
        assert_eq!(error_kind("<a/></a>"), ErrorKind::DocumentStructure);
        assert_eq!(error_kind("</a>"), ErrorKind::DocumentStructure);
        assert_eq!(error_kind("<![CDATA[x]]><a/>"), ErrorKind::DocumentStructure);
        assert_eq!(error_kind("<a><!DOCTYPE a></a>"), ErrorKind::DocumentStructure);
        assert_eq!(error_kind("<a/><!DOCTYPE a>"), ErrorKind::DocumentStructure);
    }

    #[test]
    fn test_end_of_input_in_any_state() {
        for input in ["", "<!-- only a comment -->", "<?pi?>", "<a>", "<a><b></b>"] {
            let mut tok = Tokenizer::new(input);
            let last = tok.by_ref().last();
            assert!(matches!(last, None | Some(Ok(_))), "{:?}", input);
            assert_eq!(tok.next_token().kind, TokenKind::Eof, "{:?}", input);
            assert!(tok.error().is_none());
        }

        let mut tok = Tokenizer::new("");
        assert_eq!(tok.next_token().kind, TokenKind::Eof);
        assert_eq!(tok.state(), ParseState::Prolog);

        let mut tok = Tokenizer::new("<a><b>");
        tok.next_token();
        tok.next_token();
        assert_eq!(tok.next_token().kind, TokenKind::Eof);
        assert_eq!((tok.state(), tok.depth()), (ParseState::Document, 2));
    }

    #[test]
    fn test_doctype_only_in_prolog() {
        assert_eq!(
            kinds("<?xml version=\"1.0\"?><!DOCTYPE a><a/>"),
            [
                TokenKind::ProcessingInstruction,
                TokenKind::DocType,
                TokenKind::EmptyTag,
            ]
        );
    }

    #[test]
    fn test_error_is_sticky() {
        let mut tok = Tokenizer::new("<a>&foo;</a>");
        tok.next_token();
        let first = tok.next_token();
        let second = tok.next_token();
        assert_eq!(first.kind, TokenKind::Error);
        assert_eq!(first.error, second.error);
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let results: Vec<_> = Tokenizer::new("<a>&foo;</a>").collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_matches!(&results[1], Err(e) if e.kind == ErrorKind::EntityUnknown);
    }

    #[test]
    fn test_error_location() {
        let mut tok = Tokenizer::new("<a>\n  <b x='<'/>\n</a>");
        tok.next_token();
        tok.next_token();
        let t = tok.next_token();
        let err = t.error.expect("error token");
        assert_eq!(err.kind, ErrorKind::AttributeValueLessThan);
        assert_eq!((err.location.line, err.location.column), (2, 9));
    }

    #[test]
    fn test_line_endings_are_normalized() {
        let crlf = Tokenizer::new("<a>\r\n<b/>\r<c/></a>");
        let lf = Tokenizer::new("<a>\n<b/>\n<c/></a>");
        assert_eq!(crlf.text(), lf.text());

        let spans = |tok: Tokenizer| -> Vec<(TokenKind, Span)> {
            tok.map(|t| t.expect("well-formed")).map(|t| (t.kind, t.span)).collect()
        };
        assert_eq!(spans(crlf), spans(lf));
    }

    #[test]
    fn test_line_and_column() {
        let mut tok = Tokenizer::new("<a>\r\n  <b/>");
        assert_eq!((tok.line_number(), tok.column_number()), (1, 1));
        tok.next_token();
        tok.next_token();
        tok.next_token();
        assert_eq!((tok.line_number(), tok.column_number()), (2, 7));
    }

    #[test]
    fn test_locator_tracks_tokens() {
        let mut tok = Tokenizer::new("<a>\n<b/></a>");
        let locator = tok.locator();
        tok.next_token();
        assert_eq!((locator.line_number(), locator.column_number()), (1, 4));
        tok.next_token();
        tok.next_token();
        assert_eq!((locator.line_number(), locator.column_number()), (2, 5));
    }

    #[test]
    fn test_depth() {
        let mut tok = Tokenizer::new("<a><b>");
        tok.next_token();
        tok.next_token();
        assert_eq!(tok.depth(), 2);
        assert_eq!(tok.state(), ParseState::Document);
    }

    #[test]
    fn test_byte_order_mark_is_dropped() {
        let mut tok = Tokenizer::new("\u{FEFF}<a/>");
        assert_eq!(tok.next_token().kind, TokenKind::EmptyTag);
    }
}
