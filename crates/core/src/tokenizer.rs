//! Streaming HTML tokenizer that preserves source spelling.
//!
//! Annotation text has to be copied out of the article exactly as written,
//! so this tokenizer never decodes anything: text runs, entity references
//! and character references are handed out as slices of the input, and
//! attribute values keep their raw form. There is no tree construction and
//! no implicit tag insertion; `script` and `style` bodies are the only
//! raw-text contexts.
//!
//! # Example
//!
//! ```rust
//! use readeck_export_core::tokenizer::{Token, Tokenizer};
//!
//! let tokens: Vec<Token> = Tokenizer::new("<p>a &amp; b</p>").collect();
//! assert_eq!(tokens[2], Token::EntityRef("&amp;"));
//! ```

use crate::element::{Attribute, Element};

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A tokenizer event, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `<name attrs>` or `<name attrs/>`
    StartTag { element: Element, self_closing: bool },
    /// `</name>`, name lowercased
    EndTag(String),
    /// Character data between markup
    Text(&'a str),
    /// `&name;` exactly as written
    EntityRef(&'a str),
    /// `&#123;` or `&#x7b;` exactly as written
    CharRef(&'a str),
    /// Body of `<!-- ... -->`
    Comment(&'a str),
    /// Body of `<!...>` or `<?...>`
    Declaration(&'a str),
}

/// Iterator over the [`Token`]s of an HTML string.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    raw_text: Option<&'static str>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0, raw_text: None }
    }

    fn markup(&mut self) -> Token<'a> {
        let rest = &self.input[self.pos..];
        let bytes = rest.as_bytes();

        if let Some(body) = rest.strip_prefix("<!--") {
            let (comment, consumed) = match body.find("-->") {
                Some(end) => (&body[..end], 4 + end + 3),
                None => (body, rest.len()),
            };
            self.pos += consumed;
            return Token::Comment(comment);
        }

        match bytes.get(1) {
            Some(b'!' | b'?') => {
                let (decl, consumed) = match rest.find('>') {
                    Some(end) => (&rest[2..end], end + 1),
                    None => (&rest[2..], rest.len()),
                };
                self.pos += consumed;
                Token::Declaration(decl)
            }
            Some(b'/') if bytes.get(2).is_some_and(u8::is_ascii_alphabetic) => self.end_tag(),
            Some(c) if c.is_ascii_alphabetic() => self.start_tag(),
            _ => {
                self.pos += 1;
                Token::Text(&rest[..1])
            }
        }
    }

    fn end_tag(&mut self) -> Token<'a> {
        let rest = &self.input[self.pos + 2..];
        let name_len = scan(rest, 0, |b| b.is_ascii_whitespace() || b == b'/' || b == b'>');
        let name = rest[..name_len].to_ascii_lowercase();
        let consumed = rest.find('>').map_or(rest.len(), |end| end + 1);
        self.pos += 2 + consumed;
        Token::EndTag(name)
    }

    fn start_tag(&mut self) -> Token<'a> {
        let input = self.input;
        let bytes = input.as_bytes();

        let mut cursor = self.pos + 1;
        let name_end = scan(input, cursor, |b| b.is_ascii_whitespace() || b == b'/' || b == b'>');
        let name = input[cursor..name_end].to_ascii_lowercase();
        cursor = name_end;

        let mut attributes = Vec::new();
        let mut self_closing = false;
        loop {
            cursor = skip_whitespace(input, cursor);
            match bytes.get(cursor) {
                None => break,
                Some(b'>') => {
                    cursor += 1;
                    break;
                }
                Some(b'/') => {
                    cursor += 1;
                    if bytes.get(cursor) == Some(&b'>') {
                        self_closing = true;
                        cursor += 1;
                        break;
                    }
                }
                Some(_) => {
                    let attr_end = scan(input, cursor + 1, |b| {
                        b.is_ascii_whitespace() || b == b'=' || b == b'>' || b == b'/'
                    });
                    let attr_name = input[cursor..attr_end].to_ascii_lowercase();
                    cursor = skip_whitespace(input, attr_end);

                    let value = if bytes.get(cursor) == Some(&b'=') {
                        let (value, next) = attribute_value(input, skip_whitespace(input, cursor + 1));
                        cursor = next;
                        Some(value)
                    } else {
                        None
                    };
                    attributes.push(Attribute::new(attr_name, value));
                }
            }
        }
        self.pos = cursor;

        if !self_closing {
            self.raw_text = RAW_TEXT_ELEMENTS.iter().find(|tag| **tag == name).copied();
        }

        Token::StartTag { element: Element::new(name, attributes), self_closing }
    }

    fn reference(&mut self) -> Token<'a> {
        let rest = &self.input[self.pos..];
        let bytes = rest.as_bytes();

        let (len, numeric) = if bytes.get(1) == Some(&b'#') {
            let (digits_start, hex) = match bytes.get(2) {
                Some(b'x' | b'X') => (3, true),
                _ => (2, false),
            };
            let digits = bytes[digits_start..]
                .iter()
                .take_while(|b| if hex { b.is_ascii_hexdigit() } else { b.is_ascii_digit() })
                .count();
            (if digits == 0 { 0 } else { digits_start + digits }, true)
        } else if bytes.get(1).is_some_and(u8::is_ascii_alphabetic) {
            (1 + bytes[1..].iter().take_while(|b| b.is_ascii_alphanumeric()).count(), false)
        } else {
            (0, false)
        };

        if len == 0 {
            self.pos += 1;
            return Token::Text(&rest[..1]);
        }

        let len = if bytes.get(len) == Some(&b';') { len + 1 } else { len };
        self.pos += len;
        if numeric { Token::CharRef(&rest[..len]) } else { Token::EntityRef(&rest[..len]) }
    }

    fn text(&mut self) -> Token<'a> {
        let rest = &self.input[self.pos..];
        let len = rest.find(['<', '&']).unwrap_or(rest.len());
        self.pos += len;
        Token::Text(&rest[..len])
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.pos >= self.input.len() {
            return None;
        }

        if let Some(tag) = self.raw_text.take() {
            let rest = &self.input[self.pos..];
            let end = find_raw_text_end(rest, tag).unwrap_or(rest.len());
            if end > 0 {
                self.pos += end;
                return Some(Token::Text(&rest[..end]));
            }
        }

        let token = match self.input.as_bytes()[self.pos] {
            b'<' => self.markup(),
            b'&' => self.reference(),
            _ => self.text(),
        };
        Some(token)
    }
}

/// Position of the first byte at or after `from` matching `stop`, or the input length.
fn scan(input: &str, from: usize, stop: impl Fn(u8) -> bool) -> usize {
    input.as_bytes()[from..]
        .iter()
        .position(|b| stop(*b))
        .map_or(input.len(), |offset| from + offset)
}

fn skip_whitespace(input: &str, from: usize) -> usize {
    scan(input, from, |b| !b.is_ascii_whitespace())
}

/// Reads a quoted or unquoted attribute value starting at `cursor`.
fn attribute_value(input: &str, cursor: usize) -> (&str, usize) {
    match input.as_bytes().get(cursor) {
        Some(&quote @ (b'"' | b'\'')) => {
            let start = cursor + 1;
            match input[start..].find(quote as char) {
                Some(len) => (&input[start..start + len], start + len + 1),
                None => (&input[start..], input.len()),
            }
        }
        _ => {
            let end = scan(input, cursor, |b| b.is_ascii_whitespace() || b == b'>');
            (&input[cursor..end], end)
        }
    }
}

/// Offset of the `</tag` that ends a raw-text element, matched case-insensitively.
fn find_raw_text_end(text: &str, tag: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(offset) = text[from..].find("</") {
        let start = from + offset;
        let name_end = start + 2 + tag.len();
        if bytes.len() >= name_end
            && bytes[start + 2..name_end].eq_ignore_ascii_case(tag.as_bytes())
            && bytes
                .get(name_end)
                .is_none_or(|b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/')
        {
            return Some(start);
        }
        from = start + 2;
    }
    None
}
