use std::fmt;

use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use crate::core::FacturaError;

/// A parsed XML document: a read-only tree of namespace-resolved elements.
///
/// Elements are stored in document (pre-order) order, so an element's
/// index is also its position in the document and its descendants occupy the
/// contiguous range right after it.
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
}

#[derive(Debug, Clone)]
struct Element {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<(String, String)>,
    /// Character data before the first child element.
    text: String,
    children: Vec<usize>,
    /// One past the index of the last descendant.
    end: usize,
}

fn invalid(message: impl fmt::Display) -> FacturaError {
    FacturaError::InvalidDocument(message.to_string())
}

impl Document {
    /// Parse `xml` into a tree.
    ///
    /// Fails with [`FacturaError::InvalidDocument`] unless the text is
    /// well-formed: a single root element, matching end tags, no character
    /// data outside the root, an XML declaration only as the very first
    /// thing in the text, declared namespace prefixes, and valid entity
    /// references.
    pub fn parse(xml: &str) -> Result<Self, FacturaError> {
        let mut reader = NsReader::from_str(xml);

        let mut elements: Vec<Element> = Vec::new();
        let mut open: Vec<usize> = Vec::new();
        let mut root_closed = false;
        let mut first_event = true;

        loop {
            let (namespace, event) = match reader.read_resolved_event() {
                Ok((ns, event)) => (namespace_uri(ns)?, event),
                Err(e) => return Err(invalid(format!("XML parse error: {e}"))),
            };

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    if root_closed {
                        return Err(invalid("multiple root elements"));
                    }
                    let id = elements.len();
                    elements.push(Element::from_start(namespace, e)?);
                    if let Some(&parent) = open.last() {
                        elements[parent].children.push(id);
                    }
                    if matches!(event, Event::Start(_)) {
                        open.push(id);
                    } else {
                        elements[id].end = id + 1;
                        root_closed = open.is_empty();
                    }
                }
                Event::End(_) => {
                    let id = open
                        .pop()
                        .ok_or_else(|| invalid("end tag without matching start tag"))?;
                    elements[id].end = elements.len();
                    root_closed = open.is_empty();
                }
                Event::Text(ref e) => {
                    let text = e
                        .unescape()
                        .map_err(|e| invalid(format!("invalid character data: {e}")))?;
                    append_text(&mut elements, &open, &text)?;
                }
                Event::CData(ref e) => {
                    let text = String::from_utf8_lossy(e);
                    append_text(&mut elements, &open, &text)?;
                }
                Event::Decl(_) if !first_event => {
                    return Err(invalid("XML declaration not at start of document"));
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions, DOCTYPE
                _ => {}
            }
            first_event = false;
        }

        if let Some(&id) = open.last() {
            return Err(invalid(format!(
                "unclosed element <{}>",
                elements[id].local_name
            )));
        }
        if elements.is_empty() {
            return Err(invalid("document has no root element"));
        }

        Ok(Self { elements })
    }

    /// The document element.
    pub fn root(&self) -> Node<'_> {
        Node { doc: self, id: 0 }
    }
}

fn namespace_uri(ns: ResolveResult<'_>) -> Result<Option<String>, FacturaError> {
    match ns {
        ResolveResult::Bound(uri) => Ok(Some(String::from_utf8_lossy(uri.as_ref()).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(invalid(format!(
            "undeclared namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn append_text(elements: &mut [Element], open: &[usize], text: &str) -> Result<(), FacturaError> {
    match open.last() {
        Some(&id) => {
            let element = &mut elements[id];
            // Text after a child element is tail text; lookups never read it.
            if element.children.is_empty() {
                element.text.push_str(text);
            }
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(invalid("character data outside the root element")),
    }
}

impl Element {
    fn from_start(namespace: Option<String>, e: &BytesStart<'_>) -> Result<Self, FacturaError> {
        let local_name = std::str::from_utf8(e.local_name().as_ref())
            .map_err(|e| invalid(format!("element name is not UTF-8: {e}")))?
            .to_string();

        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|e| invalid(format!("malformed attribute: {e}")))?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| invalid(format!("attribute name is not UTF-8: {e}")))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| invalid(format!("invalid value for attribute '{key}': {e}")))?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            namespace,
            local_name,
            attributes,
            text: String::new(),
            children: Vec::new(),
            end: 0,
        })
    }
}

/// A borrowed handle to one element of a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    doc: &'a Document,
    id: usize,
}

impl<'a> Node<'a> {
    fn element(&self) -> &'a Element {
        &self.doc.elements[self.id]
    }

    /// Position of the element in document order.
    pub fn index(&self) -> usize {
        self.id
    }

    /// One past the index of the last descendant.
    pub(crate) fn subtree_end(&self) -> usize {
        self.element().end
    }

    /// Namespace URI, `None` for elements in no namespace.
    pub fn namespace(&self) -> Option<&'a str> {
        self.element().namespace.as_deref()
    }

    pub fn local_name(&self) -> &'a str {
        &self.element().local_name
    }

    /// Raw character data before the first child element (untrimmed).
    pub fn text(&self) -> &'a str {
        &self.element().text
    }

    /// Attribute value by its name as written (`currencyID`, `xsi:type`).
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.element()
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Direct child elements in document order.
    pub fn children(self) -> impl Iterator<Item = Node<'a>> {
        let doc = self.doc;
        self.element()
            .children
            .iter()
            .map(move |&id| Node { doc, id })
    }

    /// All descendant elements (excluding `self`) in document order.
    pub fn descendants(self) -> impl Iterator<Item = Node<'a>> {
        let doc = self.doc;
        (self.id + 1..self.element().end).map(move |id| Node { doc, id })
    }

    /// Whether this element has namespace `uri` and local name `local`.
    pub fn is(&self, uri: Option<&str>, local: &str) -> bool {
        self.namespace() == uri && self.local_name() == local
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace() {
            Some(uri) => write!(f, "Node({} {{{}}}{})", self.id, uri, self.local_name()),
            None => write!(f, "Node({} {})", self.id, self.local_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";

    fn doc(xml: &str) -> Document {
        Document::parse(xml).unwrap()
    }

    #[test]
    fn resolves_namespaces() {
        let d = doc(&format!(
            r#"<Invoice xmlns="urn:x" xmlns:cbc="{CBC}"><cbc:ID>F001-1</cbc:ID></Invoice>"#
        ));
        let root = d.root();
        assert!(root.is(Some("urn:x"), "Invoice"));
        let id = root.children().next().unwrap();
        assert!(id.is(Some(CBC), "ID"));
        assert_eq!(id.text(), "F001-1");
    }

    #[test]
    fn document_order_and_descendants() {
        let d = doc("<a><b><c/></b><d>x</d></a>");
        let names: Vec<_> = d.root().descendants().map(|n| n.local_name()).collect();
        assert_eq!(names, ["b", "c", "d"]);
        let b = d.root().children().next().unwrap();
        let under_b: Vec<_> = b.descendants().map(|n| n.local_name()).collect();
        assert_eq!(under_b, ["c"]);
        assert_eq!(d.elements.len(), 4);
    }

    #[test]
    fn text_is_leading_character_data() {
        let d = doc("<a> head <b>inner</b> tail </a>");
        assert_eq!(d.root().text(), " head ");
    }

    #[test]
    fn entities_and_cdata() {
        let d = doc("<a><b>A &amp; B</b><c><![CDATA[1 < 2]]></c></a>");
        let texts: Vec<_> = d.root().children().map(|n| n.text()).collect();
        assert_eq!(texts, ["A & B", "1 < 2"]);
    }

    #[test]
    fn attributes_skip_namespace_declarations() {
        let d = doc(r#"<a xmlns:q="urn:q" unitCode="NIU" q:x="1"/>"#);
        let root = d.root();
        assert_eq!(root.attribute("unitCode"), Some("NIU"));
        assert_eq!(root.attribute("q:x"), Some("1"));
        assert_eq!(root.attribute("xmlns:q"), None);
    }

    #[test]
    fn rejects_malformed_documents() {
        for xml in [
            "",
            "   ",
            "<a>",
            "<a><b></a>",
            "<a></a><b/>",
            "junk<a/>",
            "<a>&bogus;</a>",
            "<x:a/>",
            r#"<a b="1" b="2"/>"#,
            "<!-- c -->\n<?xml version=\"1.0\"?>\n<a/>",
            "<a/>\n<?xml version=\"1.0\"?>",
            "<?xml version=\"1.0\"?>\n<?xml version=\"1.0\"?>\n<a/>",
        ] {
            let err = Document::parse(xml).unwrap_err();
            assert!(err.is_invalid_document(), "accepted {xml:?}: {err}");
        }
    }

    #[test]
    fn accepts_prolog_and_comments() {
        let d = doc("<?xml version=\"1.0\"?>\n<!-- c -->\n<a/>\n<!-- after -->");
        assert_eq!(d.root().local_name(), "a");
    }
}
