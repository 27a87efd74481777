//! Owned, mutable XML tree for Live session documents.
//!
//! Sessions are gzipped XML. Reading accepts plain XML too (detected by the
//! gzip magic), writing always compresses.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::export::ExportError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Attribute holding the scalar payload of most session elements.
pub const VALUE_ATTR: &str = "Value";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// `<name Value="..."/>`, the shape of nearly every leaf in a session.
    pub fn with_value(name: impl Into<String>, value: impl ToString) -> Self {
        Self::new(name).attr_builder(VALUE_ATTR, value)
    }

    #[must_use]
    pub fn attr_builder(mut self, key: &str, value: impl ToString) -> Self {
        self.set_attr(key, value);
        self
    }

    #[must_use]
    pub fn child_builder(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists.
    pub fn set_attr(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    #[allow(clippy::indexing_slicing)] // len >= 1 right after the push.
    pub fn push(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// Existing child or a freshly appended empty one.
    #[allow(clippy::indexing_slicing)] // position() came from this vec.
    pub fn child_or_insert(&mut self, name: &str) -> &mut Element {
        match self.children.iter().position(|c| c.name == name) {
            Some(i) => &mut self.children[i],
            None => self.push(Element::new(name)),
        }
    }

    /// Follow a `/`-separated chain of direct children.
    pub fn find(&self, path: &str) -> Option<&Element> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self, |el, step| el.child(step))
    }

    pub fn find_mut(&mut self, path: &str) -> Option<&mut Element> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self, |el, step| el.child_mut(step))
    }

    /// First descendant at any depth from which `path` resolves. The first
    /// step matches anywhere below `self`, the rest are direct children.
    pub fn search(&self, path: &str) -> Option<&Element> {
        let route = self.locate(path)?;
        self.at(&route)
    }

    pub fn search_mut(&mut self, path: &str) -> Option<&mut Element> {
        let route = self.locate(path)?;
        self.at_mut(&route)
    }

    /// `Value` attribute of the element at `path` (direct children).
    pub fn value_of(&self, path: &str) -> Option<&str> {
        self.find(path)?.attr(VALUE_ATTR)
    }

    /// Set the `Value` attribute at `path`. Returns false when the path
    /// does not exist.
    pub fn set_value(&mut self, path: &str, value: impl ToString) -> bool {
        match self.find_mut(path) {
            Some(el) => {
                el.set_attr(VALUE_ATTR, value);
                true
            }
            None => false,
        }
    }

    /// Pre-order traversal including `self`.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let el = stack.pop()?;
            stack.extend(el.children.iter().rev());
            Some(el)
        })
    }

    /// Visit every element of the subtree mutably, pre-order.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }

    fn locate(&self, path: &str) -> Option<Vec<usize>> {
        let mut steps = path.split('/').filter(|s| !s.is_empty());
        let first = steps.next()?;
        let rest: Vec<&str> = steps.collect();
        let mut route = Vec::new();
        self.locate_in(first, &rest, &mut route).then_some(route)
    }

    fn locate_in(&self, first: &str, rest: &[&str], route: &mut Vec<usize>) -> bool {
        for (i, child) in self.children.iter().enumerate() {
            route.push(i);
            if child.name == first {
                if let Some(tail) = child.route_children(rest) {
                    route.extend(tail);
                    return true;
                }
            }
            if child.locate_in(first, rest, route) {
                return true;
            }
            route.pop();
        }
        false
    }

    fn route_children(&self, steps: &[&str]) -> Option<Vec<usize>> {
        let mut el = self;
        let mut route = Vec::with_capacity(steps.len());
        for step in steps {
            let i = el.children.iter().position(|c| c.name == *step)?;
            route.push(i);
            el = el.children.get(i)?;
        }
        Some(route)
    }

    fn at(&self, route: &[usize]) -> Option<&Element> {
        route
            .iter()
            .try_fold(self, |el, &i| el.children.get(i))
    }

    fn at_mut(&mut self, route: &[usize]) -> Option<&mut Element> {
        route
            .iter()
            .try_fold(self, |el, &i| el.children.get_mut(i))
    }
}

// ── Document ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveDocument {
    pub root: Element,
}

impl LiveDocument {
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parse gzipped or plain XML.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExportError> {
        if bytes.starts_with(&GZIP_MAGIC) {
            let mut xml = Vec::new();
            GzDecoder::new(bytes).read_to_end(&mut xml)?;
            parse_xml(&xml)
        } else {
            parse_xml(bytes)
        }
    }

    /// Serialize as indented XML with a UTF-8 prolog.
    pub fn to_xml(&self) -> Result<Vec<u8>, ExportError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write_element(&mut writer, &self.root)?;
        let mut xml = writer.into_inner();
        xml.push(b'\n');
        Ok(xml)
    }

    pub fn to_gzip(&self) -> Result<Vec<u8>, ExportError> {
        let xml = self.to_xml()?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&xml)?;
        Ok(encoder.finish()?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        let data = self.to_gzip()?;
        fs::write(path, data)?;
        Ok(())
    }
}

fn parse_xml(xml: &[u8]) -> Result<LiveDocument, ExportError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(ref e) => stack.push(element_from(e)),
            Event::Empty(ref e) => {
                let el = element_from(e);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(el),
                    None => root = Some(el),
                }
            }
            Event::End(_) => {
                let Some(el) = stack.pop() else {
                    return Err(ExportError::InvalidTemplate("unbalanced end tag".into()));
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(el),
                    None => root = Some(el),
                }
            }
            Event::Text(ref e) => {
                if let Some(el) = stack.last_mut() {
                    let text = e.unescape().map_or_else(
                        |_| String::from_utf8_lossy(e).into_owned(),
                        std::borrow::Cow::into_owned,
                    );
                    el.text.push_str(&text);
                }
            }
            Event::CData(ref e) => {
                if let Some(el) = stack.last_mut() {
                    el.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ExportError::InvalidTemplate("document ends inside an element".into()));
    }
    root.map(|root| LiveDocument { root })
        .ok_or_else(|| ExportError::InvalidTemplate("document has no root element".into()))
}

fn element_from(e: &BytesStart<'_>) -> Element {
    let mut el = Element::new(String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let val = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).to_string(),
            |v| v.into_owned(),
        );
        el.attributes.push((key, val));
    }
    el
}

fn write_element<W: Write>(writer: &mut Writer<W>, el: &Element) -> Result<(), ExportError> {
    let mut start = BytesStart::new(el.name.as_str());
    for (key, value) in &el.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if el.children.is_empty() && el.text.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    if !el.text.is_empty() {
        writer.write_event(Event::Text(BytesText::new(&el.text)))?;
    }
    for child in &el.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(el.name.as_str())))?;
    Ok(())
}
