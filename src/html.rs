//! A minimal view of an HTML document: the elements of its `<head>` and
//! their attributes, which is all favicon discovery needs.

use std::{borrow::Cow, sync::OnceLock};

use quick_xml::events::{BytesStart, Event};
use regex::{Captures, Regex};

use crate::Error;

/// Elements that may appear in a head even when the `<head>` tag is omitted.
const IMPLICIT_HEAD: [&str; 6] = ["base", "link", "meta", "title", "style", "script"];

static RAW_TEXT: OnceLock<Regex> = OnceLock::new();

/// Empty the contents of `<script>` and `<style>` elements. They are raw text
/// in HTML, and markup-like strings such as `"<!--"` inside them would
/// otherwise derail the XML reader.
fn strip_raw_text(body: &str) -> Cow<'_, str> {
    let raw_text = RAW_TEXT.get_or_init(|| {
        Regex::new(
            r"(?is)(<script\b[^>]*>).*?(</script\s*>)|(<style\b[^>]*>).*?(</style\s*>)",
        )
        .expect("valid regex")
    });
    raw_text.replace_all(body, |caps: &Captures| {
        let (open, close) = match (caps.get(1), caps.get(2)) {
            (Some(open), Some(close)) => (open, close),
            _ => match (caps.get(3), caps.get(4)) {
                (Some(open), Some(close)) => (open, close),
                _ => return caps[0].to_owned(),
            },
        };
        if open.as_str().ends_with("/>") {
            return caps[0].to_owned();
        }
        format!("{}{}", open.as_str(), close.as_str())
    })
}

#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
}

impl Element {
    fn from_start(e: &BytesStart) -> Self {
        let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
        let attributes = e
            .html_attributes()
            .filter_map(|attr| match attr {
                Ok(attr) => {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
                    let value = match attr.unescape_value() {
                        Ok(value) => value.into_owned(),
                        Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
                    };
                    Some((key, value))
                }
                Err(e) => {
                    tracing::trace!("Skipping malformed attribute: {e}");
                    None
                }
            })
            .collect();
        Self { name, attributes }
    }

    /// The lowercase tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value of the first attribute called `name`, compared without case.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Head {
    elements: Vec<Element>,
}

impl Head {
    /// Every element with the given tag name, in document order.
    pub fn select<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements
            .iter()
            .filter(move |e| e.name.eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Document {
    head: Option<Head>,
}

impl Document {
    /// Parse an HTML document, tolerating unclosed and mismatched tags.
    pub fn parse(body: &str) -> Result<Self, Error> {
        let stripped = strip_raw_text(body);
        let mut reader = quick_xml::Reader::from_str(&stripped);
        reader.check_end_names(false);
        reader.trim_markup_names_in_closing_tags(true);

        let mut elements = Vec::new();
        let mut explicit_head = false;
        let mut in_head = false;
        let mut seen_markup = false;
        loop {
            let position = reader.buffer_position();
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    seen_markup = true;
                    let element = Element::from_start(e);
                    if element.name == "head" {
                        explicit_head = true;
                        in_head = true;
                    } else if element.name == "body" {
                        break;
                    } else if in_head || IMPLICIT_HEAD.contains(&element.name.as_str()) {
                        elements.push(element);
                    }
                }
                Ok(Event::End(ref e)) => {
                    if e.name().as_ref().eq_ignore_ascii_case(b"head") {
                        break;
                    }
                }
                Ok(Event::DocType(_)) => seen_markup = true,
                Ok(Event::Eof) => break,
                Err(e) => {
                    tracing::debug!("Error at position {}: {:?}", reader.buffer_position(), e);
                    if reader.buffer_position() == position {
                        break;
                    }
                }
                _ => (),
            }
        }

        if !seen_markup && !body.trim().is_empty() {
            return Err(Error::HtmlParse);
        }
        let has_head = explicit_head || !elements.is_empty();
        Ok(Self {
            head: has_head.then_some(Head { elements }),
        })
    }

    pub fn head(&self) -> Option<&Head> {
        self.head.as_ref()
    }
}
