use std::str::from_utf8;

use log::trace;
use memchr::{memchr, memchr_iter, memrchr};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::chars::{XmlChar, XmlStrExt};
use crate::error::{ParseError, Reason, TextPosition};
use crate::namespace::NamespaceStack;
use crate::wrap::WrappedDocument;

const PREDEFINED_ENTITIES: [&str; 5] = ["amp", "lt", "gt", "quot", "apos"];

/// Checks a wrapped fragment for well-formedness and namespace conformance.
///
/// Stops at the first defect. Positions point at the start of the offending
/// markup, or at the offending character inside text.
pub fn check(document: &WrappedDocument) -> Result<(), ParseError> {
    Checker::new(document).run()
}

struct OpenElement {
    name: String,
    start: usize,
}

struct Checker<'d> {
    document: &'d WrappedDocument,
    reader: Reader<&'d [u8]>,
    open: Vec<OpenElement>,
    namespaces: NamespaceStack,
    root_closed: bool,
}

impl<'d> Checker<'d> {
    fn new(document: &'d WrappedDocument) -> Self {
        let mut reader = Reader::from_str(document.as_str());
        let config = reader.config_mut();
        config.allow_unmatched_ends = false;
        config.check_comments = true;
        config.check_end_names = false;
        config.expand_empty_elements = false;
        config.trim_markup_names_in_closing_tags = true;

        Self {
            document,
            reader,
            open: Vec::with_capacity(16),
            namespaces: NamespaceStack::new(),
            root_closed: false,
        }
    }

    fn run(mut self) -> Result<(), ParseError> {
        loop {
            let pos = self.reader.buffer_position() as usize;
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(err) => {
                    let at = self.reader.error_position() as usize;
                    return Err(self.error(at, Reason::Syntax(err.to_string())));
                }
            };

            if self.root_closed && !matches!(event, Event::Eof) {
                return Err(self.error(pos, Reason::TrailingContent));
            }

            match event {
                Event::Start(tag) => {
                    let start = self.tag_start(pos)?;
                    self.open_element(&tag, start)?;
                }
                Event::Empty(tag) => {
                    let start = self.tag_start(pos)?;
                    self.open_element(&tag, start)?;
                    self.open.pop();
                    self.namespaces.pop_scope();
                }
                Event::End(tag) => {
                    let start = self.tag_start(pos)?;
                    self.close_element(tag.name().as_ref(), start)?;
                }
                Event::Text(text) => self.check_text(&text, pos)?,
                Event::CData(data) => {
                    let start = self.markup_start(pos) + "<![CDATA[".len();
                    self.check_chars(&data, start)?;
                }
                Event::Comment(comment) => {
                    let start = self.markup_start(pos) + "<!--".len();
                    self.check_chars(&comment, start)?;
                }
                Event::PI(_) => {}
                Event::Decl(_) => {
                    return Err(self.error(self.markup_start(pos), Reason::UnexpectedDecl));
                }
                Event::DocType(_) => {
                    return Err(self.error(self.markup_start(pos), Reason::UnexpectedDocType));
                }
                Event::Eof => return self.finish(),
            }
        }
    }

    /// Offset of the `<` that opened the markup read from `pos`.
    fn markup_start(&self, pos: usize) -> usize {
        let bytes = self.document.as_str().as_bytes();
        match bytes.get(pos) {
            Some(b'<') => pos,
            _ => memrchr(b'<', &bytes[..pos.min(bytes.len())]).unwrap_or(pos),
        }
    }

    /// Start of the tag just read. A tag left open at the end of the
    /// fragment swallows the synthetic close tag and is rejected here.
    fn tag_start(&self, pos: usize) -> Result<usize, ParseError> {
        let start = self.markup_start(pos);
        let end = self.reader.buffer_position() as usize;
        let close_at = self.document.close_at();
        if start < close_at && end > close_at {
            return Err(self.error(start, Reason::UnclosedTag));
        }
        Ok(start)
    }

    fn open_element(&mut self, tag: &BytesStart<'_>, start: usize) -> Result<(), ParseError> {
        let name = self.utf8(tag.name().as_ref(), start)?.to_string();
        self.check_qname(&name, start)?;

        let mut declared: Vec<(String, String)> = vec![];
        let mut prefixed: Vec<String> = vec![];
        for attr in tag.attributes() {
            let attr = attr.map_err(|err| self.error(start, Reason::Attribute(err.to_string())))?;
            let key = self.utf8(attr.key.as_ref(), start)?.to_string();
            self.check_qname(&key, start)?;

            let value = self.utf8(&attr.value, start)?;
            if value.contains('<') {
                return Err(self.error(start, Reason::LtInAttributeValue(key)));
            }
            if let Some((_, c)) = value.find_invalid_xml_char() {
                return Err(self.error(start, Reason::InvalidChar(c)));
            }
            if let Err((_, reason)) = check_references(value) {
                return Err(self.error(start, reason));
            }

            if let Some(prefix) = key.strip_prefix("xmlns:") {
                if prefix == "xmlns" {
                    return Err(self.error(start, Reason::ReservedPrefix(key)));
                }
                if value.is_empty() {
                    return Err(self.error(start, Reason::EmptyNamespace(prefix.to_string())));
                }
                declared.push((prefix.to_string(), value.to_string()));
            } else if key.contains(':') {
                prefixed.push(key);
            }
        }

        if !attributes_are_separated(tag.attributes_raw()) {
            return Err(self.error(
                start,
                Reason::Attribute("missing whitespace between attributes".to_string()),
            ));
        }

        let mut scope = self.namespaces.build_scope();
        for (prefix, uri) in declared {
            scope.add_prefix(prefix, uri);
        }
        scope.finish();

        self.check_prefix(&name, start)?;
        for key in &prefixed {
            self.check_prefix(key, start)?;
        }

        self.open.push(OpenElement { name, start });
        Ok(())
    }

    fn close_element(&mut self, name: &[u8], start: usize) -> Result<(), ParseError> {
        let name = self.utf8(name, start)?;

        if start == self.document.close_at() {
            // the synthetic root closes: anything still open was never closed
            if self.open.len() > 1 {
                if let Some(unclosed) = self.open.last() {
                    let reason = Reason::UnclosedElement(unclosed.name.clone());
                    return Err(self.error(unclosed.start, reason));
                }
            }
        } else if self.open.len() <= 1 {
            return Err(self.error(start, Reason::UnmatchedEndTag(name.to_string())));
        }

        match self.open.pop() {
            Some(element) if element.name == name => {
                self.namespaces.pop_scope();
                self.root_closed = self.open.is_empty();
                Ok(())
            }
            Some(element) => Err(self.error(
                start,
                Reason::MismatchedEndTag {
                    expected: element.name,
                    found: name.to_string(),
                },
            )),
            None => Err(self.error(start, Reason::UnmatchedEndTag(name.to_string()))),
        }
    }

    fn finish(&self) -> Result<(), ParseError> {
        match self.open.last() {
            Some(unclosed) => Err(self.error(
                unclosed.start,
                Reason::UnclosedElement(unclosed.name.clone()),
            )),
            None => Ok(()),
        }
    }

    fn check_qname(&self, name: &str, start: usize) -> Result<(), ParseError> {
        if !name.is_xml_name() {
            return Err(self.error(start, Reason::InvalidName(name.to_string())));
        }
        if let Some((prefix, local)) = name.split_once(':') {
            if !prefix.is_xml_ncname() || !local.is_xml_ncname() {
                return Err(self.error(start, Reason::InvalidQName(name.to_string())));
            }
        }
        Ok(())
    }

    fn check_prefix(&self, name: &str, start: usize) -> Result<(), ParseError> {
        let Some((prefix, _)) = name.split_once(':') else {
            return Ok(());
        };
        if prefix == "xmlns" {
            return Err(self.error(start, Reason::ReservedPrefix(name.to_string())));
        }
        if self.namespaces.resolve(prefix).is_none() {
            return Err(self.error(
                start,
                Reason::UnboundPrefix {
                    prefix: prefix.to_string(),
                    name: name.to_string(),
                },
            ));
        }
        Ok(())
    }

    fn check_text(&self, raw: &[u8], start: usize) -> Result<(), ParseError> {
        let text = self.check_chars(raw, start)?;
        if let Some(i) = text.find("]]>") {
            return Err(self.error(start + i, Reason::CDataEndInText));
        }
        check_references(text).map_err(|(i, reason)| self.error(start + i, reason))
    }

    fn check_chars<'b>(&self, raw: &'b [u8], start: usize) -> Result<&'b str, ParseError> {
        let text = self.utf8(raw, start)?;
        match text.find_invalid_xml_char() {
            Some((i, c)) => Err(self.error(start + i, Reason::InvalidChar(c))),
            None => Ok(text),
        }
    }

    fn utf8<'b>(&self, bytes: &'b [u8], at: usize) -> Result<&'b str, ParseError> {
        from_utf8(bytes).map_err(|_| self.error(at, Reason::Utf8))
    }

    fn error(&self, at: usize, reason: Reason) -> ParseError {
        trace!("well-formedness error at byte {}: {}", at, reason);
        ParseError::new(reason, TextPosition::from_offset(self.document.as_str(), at))
    }
}

/// Whether every quoted attribute value is followed by whitespace, `/` or
/// the end of the tag. Expects quoting to be balanced.
fn attributes_are_separated(raw: &[u8]) -> bool {
    let mut quote = None;
    let mut bytes = raw.iter().peekable();
    while let Some(&b) = bytes.next() {
        match quote {
            Some(open) if b == open => {
                quote = None;
                match bytes.peek().map(|&&next| next) {
                    None | Some(b'/') => {}
                    Some(next) if (next as char).is_xml_whitespace() => {}
                    Some(_) => return false,
                }
            }
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None => {}
        }
    }
    true
}

/// Validates every `&...;` reference in character data or an attribute value.
///
/// Returns the byte index of the first bad reference.
fn check_references(text: &str) -> Result<(), (usize, Reason)> {
    for amp in memchr_iter(b'&', text.as_bytes()) {
        let rest = &text[amp + 1..];
        let end = memchr(b';', rest.as_bytes()).ok_or((amp, Reason::MalformedReference))?;
        let name = &rest[..end];

        if let Some(number) = name.strip_prefix('#') {
            let (digits, radix) = match number.strip_prefix('x') {
                Some(hex) => (hex, 16),
                None => (number, 10),
            };
            let valid = !digits.is_empty()
                && digits.chars().all(|c| c.is_digit(radix))
                && u32::from_str_radix(digits, radix)
                    .ok()
                    .and_then(char::from_u32)
                    .map_or(false, |c| c.is_xml_char());
            if !valid {
                return Err((amp, Reason::InvalidCharRef(format!("&{};", name))));
            }
        } else if !PREDEFINED_ENTITIES.contains(&name) {
            let reason = if name.is_xml_name() {
                Reason::UndefinedEntity(name.to_string())
            } else {
                Reason::MalformedReference
            };
            return Err((amp, reason));
        }
    }
    Ok(())
}
