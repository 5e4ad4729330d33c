//! In-memory node tree for role files.
//!
//! A role file is small enough to be edited as a whole: it is read into a
//! [`Document`], mutated in place and written back. Only the parts of XML that
//! occur in configuration exports are modelled (elements with attributes, text
//! and comments); processing instructions and doctypes are dropped.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::error::{Result, RightsError};

/// Indentation of serialized output
const INDENT_SIZE: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Element holding a single text child, e.g. `<value>false</value>`.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.children.push(Node::Text(text.into()));
        element
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|element| element.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find(|element| element.name == name)
    }

    /// First text child, if any.
    pub fn text(&self) -> Option<&str> {
        self.children.iter().find_map(|node| match node {
            Node::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Overwrite the first text child. Returns `false` when there is none.
    pub fn set_text(&mut self, value: &str) -> bool {
        for node in self.children.iter_mut() {
            if let Node::Text(text) = node {
                *text = value.to_string();
                return true;
            }
        }
        false
    }

    /// Text of the first child element with the given name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(Element::text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub declaration: bool,
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            declaration: true,
            root,
        }
    }

    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut declaration = false;
        let mut root: Option<Element> = None;
        let mut stack: Vec<Element> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Decl(_) => declaration = true,
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(end) => {
                    let element = stack.pop().ok_or_else(|| {
                        RightsError::UnmatchedEnd(String::from_utf8_lossy(end.name().as_ref()).into_owned())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    match stack.last_mut() {
                        Some(parent) if !text.is_empty() => parent.push(Node::Text(text.into_owned())),
                        Some(_) => {}
                        None => reject_outside_root(&text)?,
                    }
                }
                Event::CData(cdata) => {
                    let text = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.push(Node::Text(text)),
                        None => reject_outside_root(&text)?,
                    }
                }
                Event::Comment(comment) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(RightsError::UnclosedElement(open.name));
        }

        let root = root.ok_or(RightsError::MissingRoot)?;
        Ok(Self { declaration, root })
    }

    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);

        if self.declaration {
            writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }
        write_element(&mut writer, &self.root)?;

        let mut xml = String::from_utf8(writer.into_inner())?;
        xml.push('\n');
        Ok(xml)
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());

    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

/// Only whitespace (and a byte order mark) may appear outside the root element.
fn reject_outside_root(text: &str) -> Result<()> {
    let text = text.trim_matches(|c: char| c == '\u{feff}' || c.is_whitespace());
    if text.is_empty() {
        Ok(())
    } else {
        Err(RightsError::TextOutsideRoot(text.to_string()))
    }
}

/// Attach a closed element to its parent, or make it the root.
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None if root.is_some() => return Err(RightsError::MultipleRoots),
        None => *root = Some(element),
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            Node::Comment(comment) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Rights xmlns="http://v8.1c.ru/8.2/roles" version="2.17">
	<setForNewObjects>false</setForNewObjects>
	<!-- exported -->
	<object>
		<name>Document.Invoice</name>
		<right>
			<name>Read</name>
			<value>true</value>
		</right>
	</object>
</Rights>
"#;

    #[test]
    fn test_parse_structure() {
        let document = Document::parse(SAMPLE).unwrap();

        assert!(document.declaration);
        assert_eq!(document.root.name, "Rights");
        assert_eq!(
            document.root.attributes,
            vec![
                ("xmlns".to_string(), "http://v8.1c.ru/8.2/roles".to_string()),
                ("version".to_string(), "2.17".to_string()),
            ]
        );

        let object = document.root.child("object").unwrap();
        assert_eq!(object.child_text("name"), Some("Document.Invoice"));
        let right = object.child("right").unwrap();
        assert_eq!(right.child_text("name"), Some("Read"));
        assert_eq!(right.child_text("value"), Some("true"));
        assert!(matches!(document.root.children[1], Node::Comment(_)));
    }

    #[test]
    fn test_serialize_reparses_to_same_tree() {
        let document = Document::parse(SAMPLE).unwrap();
        let xml = document.to_xml().unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Rights"));
        assert!(xml.contains("\n    <name>Document.Invoice</name>\n"));
        assert!(xml.ends_with("</Rights>\n"));
        assert_eq!(Document::parse(&xml).unwrap(), document);
    }

    #[test]
    fn test_text_is_unescaped_and_escaped_again() {
        let document = Document::parse("<a><b>x &amp; y</b></a>").unwrap();
        assert!(!document.declaration);
        assert_eq!(document.root.child_text("b"), Some("x & y"));

        let xml = document.to_xml().unwrap();
        assert!(xml.contains("<b>x &amp; y</b>"));
    }

    #[test]
    fn test_empty_element_is_self_closing() {
        let document = Document::new(Element::new("Rights"));
        assert_eq!(
            document.to_xml().unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Rights/>\n"
        );
    }

    #[test]
    fn test_set_text() {
        let mut value = Element::with_text("value", "true");
        assert!(value.set_text("false"));
        assert_eq!(value.text(), Some("false"));

        let mut empty = Element::new("value");
        assert!(!empty.set_text("false"));
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(Document::parse(""), Err(RightsError::MissingRoot)));
        assert!(matches!(Document::parse("<a/><b/>"), Err(RightsError::MultipleRoots)));
        assert!(Document::parse("<a><b></a>").is_err());
        assert!(Document::parse("<a>").is_err());
    }

    #[test]
    fn test_text_outside_root_is_rejected() {
        assert!(matches!(
            Document::parse("<Rights/>junk"),
            Err(RightsError::TextOutsideRoot(text)) if text == "junk"
        ));
        assert!(matches!(
            Document::parse("junk<Rights/>"),
            Err(RightsError::TextOutsideRoot(_))
        ));
        assert!(Document::parse("<Rights/><![CDATA[x]]>").is_err());
    }

    #[test]
    fn test_whitespace_and_bom_outside_root_are_accepted() {
        let document = Document::parse("\u{feff}<?xml version=\"1.0\"?>\n<Rights/>\n\n").unwrap();
        assert_eq!(document.root, Element::new("Rights"));
    }
}
