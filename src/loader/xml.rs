//! Minimal element tree over `quick-xml` events.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::error::{LoadError, LoadResult};

/// One XML element with its attributes, direct text and child elements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute `name`, or `MissingRequiredAttribute(name)`.
    pub fn required_attr(&self, name: &str) -> LoadResult<&str> {
        self.attr(name).ok_or_else(|| LoadError::missing(name))
    }

    /// Text content directly inside this element.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Integer attribute with a default; a malformed value is an error.
    pub fn int_attr(&self, name: &str, default: i32) -> LoadResult<i32> {
        match self.attr(name) {
            None => Ok(default),
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| LoadError::bad_value(value)),
        }
    }

    /// Boolean attribute with a default. Accepts `true`/`false` and `1`/`0`.
    pub fn bool_attr(&self, name: &str, default: bool) -> bool {
        match self.attr(name).map(str::trim) {
            Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            _ => default,
        }
    }

    /// Whether attribute `name` is present and spelled exactly `expected`.
    pub fn attr_is(&self, name: &str, expected: &str) -> bool {
        self.attr(name) == Some(expected)
    }
}

/// Parse `input` and return its root element.
pub fn parse_document(input: &str) -> LoadResult<Element> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => stack.push(start_element(e)?),
            Ok(Event::Empty(ref e)) => {
                let element = start_element(e)?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| LoadError::xml("unexpected closing tag"))?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| LoadError::xml(format!("bad text content: {e}")))?;
                push_text(&mut stack, &text);
            }
            Ok(Event::CData(c)) => {
                let text = std::str::from_utf8(&c)
                    .map_err(|e| LoadError::xml(format!("bad CDATA content: {e}")))?;
                push_text(&mut stack, text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(LoadError::xml(format!(
                    "XML parse error at position {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(LoadError::xml(format!("unclosed element '{}'", open.name)));
    }
    root.ok_or_else(|| LoadError::xml("document has no root element"))
}

fn start_element(e: &BytesStart<'_>) -> LoadResult<Element> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|e| LoadError::xml(format!("invalid tag name: {e}")))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| LoadError::xml(format!("bad attribute in '{name}': {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| LoadError::xml(format!("invalid attribute name: {e}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| LoadError::xml(format!("bad attribute value: {e}")))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        text: None,
        children: Vec::new(),
    })
}

/// Only the first root element is kept.
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn push_text(stack: &mut [Element], text: &str) {
    if let Some(current) = stack.last_mut() {
        current.text.get_or_insert_with(String::new).push_str(text);
    }
}
