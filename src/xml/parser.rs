//! XML deserializer producing [`Node`] trees

use tracing::trace;

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::node::{Attributes, Content, Node};
use crate::xml::cursor::Cursor;

/// Configuration for the XML parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// XML parser
///
/// Element content follows one rule: any child element makes the node a
/// `Children` node (stray character data between elements is dropped),
/// otherwise trimmed non-empty text makes it `Text`, otherwise `Empty`.
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    depth: u16,
    size: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser with default configuration
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new parser with custom configuration
    pub const fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            depth: 0,
            size: input.len(),
        }
    }

    /// Parse a document and return its root element
    pub fn parse(&mut self) -> Result<Node> {
        if self.config.max_size > 0 && self.size > self.config.max_size {
            return Err(Error::at(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                0,
                1,
                1,
            ));
        }

        self.skip_misc()?;
        if self.cursor.is_eof() {
            return Err(self.error_here(ErrorKind::Expected {
                expected: "root element".to_string(),
                found: "end of input".to_string(),
            }));
        }

        let root = self.parse_element()?;
        self.skip_misc()?;

        if !self.cursor.is_eof() {
            return Err(self.error_with(
                ErrorKind::InvalidToken,
                "unexpected content after root element",
            ));
        }

        trace!(root = %root.name, "parsed xml document");
        Ok(root)
    }

    fn parse_element(&mut self) -> Result<Node> {
        self.enter_nested()?;
        self.expect_byte(b'<')?;

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            self.exit_nested();
            return Ok(Node {
                name,
                attributes,
                content: Content::Empty,
            });
        }

        self.expect_byte(b'>')?;

        let mut children = Vec::new();
        let mut text = String::new();
        loop {
            if self.cursor.starts_with(b"</") {
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != name {
                    return Err(self.error_here(ErrorKind::MismatchedTag {
                        expected: name,
                        found: close_name,
                    }));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.starts_with(b"<![CDATA[") {
                self.cursor.advance_by(9);
                text.push_str(&self.take_until(b"]]>")?);
                continue;
            }

            if self.cursor.starts_with(b"<!--") || self.cursor.starts_with(b"<?") {
                self.skip_markup()?;
                continue;
            }

            if self.cursor.current() == Some(b'<') {
                children.push(self.parse_element()?);
                continue;
            }

            if self.cursor.is_eof() {
                return Err(self.error_here(ErrorKind::UnterminatedElement));
            }

            text.push_str(&self.parse_text()?);
        }

        self.exit_nested();

        let content = if !children.is_empty() {
            Content::Children(children)
        } else {
            match text.trim() {
                "" => Content::Empty,
                trimmed => Content::Text(trimmed.to_owned()),
            }
        };

        Ok(Node {
            name,
            attributes,
            content,
        })
    }

    fn parse_attributes(&mut self) -> Result<Attributes> {
        let mut attrs = Attributes::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here(ErrorKind::UnterminatedElement)),
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(self.error_here(ErrorKind::DuplicateAttribute { key: name }));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(self.error_here(ErrorKind::Expected {
                    expected: "quoted attribute value".to_string(),
                    found: self.describe_current(),
                }))
            }
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        let at = self.cursor.position();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                return decode_entities(&bytes_to_string(raw, at)?, at);
            }
            self.cursor.advance();
        }

        Err(self.error_with(ErrorKind::UnterminatedElement, "unterminated attribute value"))
    }

    fn parse_text(&mut self) -> Result<String> {
        let start = self.cursor.pos();
        let at = self.cursor.position();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        decode_entities(&bytes_to_string(raw, at)?, at)
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();
        let at = self.cursor.position();

        match self.cursor.current() {
            Some(first) if is_name_start(first) => self.cursor.advance(),
            _ => {
                return Err(self.error_here(ErrorKind::Expected {
                    expected: "name".to_string(),
                    found: self.describe_current(),
                }))
            }
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        bytes_to_string(self.cursor.slice_from(start), at)
    }

    /// Skip whitespace, comments, processing instructions and declarations
    /// outside the root element
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") || self.cursor.starts_with(b"<!") {
                self.skip_markup()?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_markup(&mut self) -> Result<()> {
        if self.cursor.starts_with(b"<!--") {
            self.cursor.advance_by(4);
            self.take_until(b"-->").map(drop)
        } else if self.cursor.starts_with(b"<?") {
            self.cursor.advance_by(2);
            self.take_until(b"?>").map(drop)
        } else {
            // DOCTYPE and other declarations; internal subsets are not supported
            self.cursor.advance_by(2);
            self.take_until(b">").map(drop)
        }
    }

    /// Consume input up to and including `pattern`, returning what came before it
    fn take_until(&mut self, pattern: &[u8]) -> Result<String> {
        let start = self.cursor.pos();
        let at = self.cursor.position();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(pattern.len());
                return bytes_to_string(raw, at);
            }
            self.cursor.advance();
        }
        Err(self.error_with(ErrorKind::UnterminatedElement, "unterminated markup"))
    }

    fn enter_nested(&mut self) -> Result<()> {
        self.depth = self.depth.saturating_add(1);
        if self.config.max_depth > 0 && self.depth > self.config.max_depth {
            return Err(self.error_here(ErrorKind::MaxDepthExceeded {
                max: self.config.max_depth,
            }));
        }
        Ok(())
    }

    fn exit_nested(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            Err(self.error_here(ErrorKind::Expected {
                expected: format!("'{}'", char::from(expected)),
                found: self.describe_current(),
            }))
        }
    }

    fn describe_current(&self) -> String {
        match self.cursor.current() {
            Some(b) if b.is_ascii_graphic() => format!("'{}'", char::from(b)),
            Some(b) => format!("byte 0x{b:02x}"),
            None => "end of input".to_string(),
        }
    }

    fn error_here(&self, kind: ErrorKind) -> Error {
        let pos = self.cursor.position();
        Error::new(kind, Span::new(pos, pos))
    }

    fn error_with(&self, kind: ErrorKind, message: &str) -> Error {
        let pos = self.cursor.position();
        Error::with_message(kind, Span::new(pos, pos), message)
    }
}

/// Errors are reported at `at`, the start of the slice
fn bytes_to_string(bytes: &[u8], at: Pos) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::new(ErrorKind::InvalidUtf8, Span::new(at, at)))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str, at: Pos) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        for next in chars.by_ref() {
            if next == ';' {
                terminated = true;
                break;
            }
            entity.push(next);
        }

        let decoded = match entity.as_str() {
            _ if !terminated => None,
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::with_message(
                    ErrorKind::InvalidEntity,
                    Span::new(at, at),
                    format!("invalid entity reference: &{entity}"),
                ));
            }
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
