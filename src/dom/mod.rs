//! Arena-backed XML document tree.
//!
//! A minimal DOM for sanitization: nodes live in a flat arena addressed by
//! index, so violating subtrees can be collected during a read-only
//! traversal and detached afterwards without mutating the tree while it is
//! being walked.
//!
//! Entity expansion is never performed. DOCTYPE declarations, processing
//! instructions, comments, and the XML declaration are dropped at parse
//! time. Empty-element tags are expanded to start/end pairs so serialized
//! output is uniform (`<rect/>` becomes `<rect></rect>`).

use std::io::Cursor;

use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::error::{GuardError, GuardResult};

/// Index of a node in the arena.
pub type NodeId = usize;

/// Parsing strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Well-formed XML required; any reader error fails the parse.
    Strict,
    /// HTML-style recovery: mismatched end tags are tolerated, malformed
    /// attributes are skipped, and a reader error ends the parse keeping
    /// whatever was built so far.
    Lenient,
}

/// A single attribute, name case preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Element { name: String, attrs: Vec<Attribute> },
    Text(String),
    CData(String),
}

/// Arena node.
#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Parsed document.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Tree {
    /// Parse text into a tree.
    pub fn parse(text: &str, mode: ParseMode) -> GuardResult<Self> {
        let lenient = mode == ParseMode::Lenient;

        let mut reader = Reader::from_str(text);
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        if lenient {
            config.check_end_names = false;
        }

        let mut tree = Tree::default();
        // Stack of currently open elements.
        let mut open: Vec<NodeId> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(Event::Start(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    let attrs = read_attributes(&e, lenient)?;
                    let id = tree.push_node(
                        NodeKind::Element { name, attrs },
                        open.last().copied(),
                    );
                    open.push(id);
                }
                Ok(Event::End(_)) => {
                    if open.pop().is_none() && !lenient {
                        return Err(GuardError::InvalidMarkup(
                            "unexpected closing tag".to_string(),
                        ));
                    }
                }
                Ok(Event::Empty(e)) => {
                    // Not produced with expand_empty_elements, but handled
                    // the same way in case the reader configuration changes.
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    let attrs = read_attributes(&e, lenient)?;
                    tree.push_node(NodeKind::Element { name, attrs }, open.last().copied());
                }
                Ok(Event::Text(e)) => {
                    let text = match e.unescape() {
                        Ok(cow) => cow.into_owned(),
                        Err(err) if !lenient => {
                            return Err(GuardError::InvalidMarkup(format!(
                                "bad character reference: {err}"
                            )));
                        }
                        // Recovery: keep the raw bytes; they are re-escaped
                        // on serialization.
                        Err(_) => String::from_utf8_lossy(e.as_ref()).into_owned(),
                    };
                    if !text.is_empty() {
                        tree.push_node(NodeKind::Text(text), open.last().copied());
                    }
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    tree.push_node(NodeKind::CData(text), open.last().copied());
                }
                // No entity expansion; prologue and metadata are dropped.
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {}
                Err(_) if lenient => break,
                Err(e) => {
                    return Err(GuardError::InvalidMarkup(format!("XML parse error: {e}")));
                }
            }
        }

        if !open.is_empty() && !lenient {
            return Err(GuardError::InvalidMarkup("unclosed element".to_string()));
        }

        Ok(tree)
    }

    fn push_node(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.nodes[p].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Ids of all element nodes reachable from the roots, document order.
    pub fn element_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        // Reversed so the explicit stack pops in document order.
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if matches!(self.nodes[id].kind, NodeKind::Element { .. }) {
                out.push(id);
            }
            for child in self.nodes[id].children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Element name, if the node is an element.
    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Attributes of an element node.
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match &self.nodes[id].kind {
            NodeKind::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    /// Replace the attribute list of an element node.
    pub fn set_attributes(&mut self, id: NodeId, new_attrs: Vec<Attribute>) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id].kind {
            *attrs = new_attrs;
        }
    }

    /// First element in document order whose name is `svg`.
    pub fn find_svg_root(&self) -> Option<NodeId> {
        self.element_ids().into_iter().find(|id| {
            self.element_name(*id)
                .is_some_and(|name| name.eq_ignore_ascii_case("svg"))
        })
    }

    /// Detach a node and its whole subtree from the document.
    ///
    /// The arena slots stay allocated; the subtree simply becomes
    /// unreachable from the roots.
    pub fn remove_subtree(&mut self, id: NodeId) {
        match self.nodes[id].parent {
            Some(parent) => self.nodes[parent].children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }
        self.nodes[id].parent = None;
    }

    /// Serialize exactly one subtree, without an XML declaration.
    ///
    /// Elements are always written as start/end pairs.
    pub fn serialize_subtree(&self, root: NodeId) -> GuardResult<String> {
        enum Step {
            Enter(NodeId),
            Close(NodeId),
        }

        let mut writer = Writer::new(Cursor::new(Vec::new()));
        let mut stack = vec![Step::Enter(root)];

        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(id) => match &self.nodes[id].kind {
                    NodeKind::Element { name, attrs } => {
                        let mut start = BytesStart::new(name.as_str());
                        for attr in attrs {
                            start.push_attribute((attr.name.as_str(), attr.value.as_str()));
                        }
                        write_event(&mut writer, Event::Start(start))?;
                        stack.push(Step::Close(id));
                        for child in self.nodes[id].children.iter().rev() {
                            stack.push(Step::Enter(*child));
                        }
                    }
                    NodeKind::Text(text) => {
                        write_event(&mut writer, Event::Text(BytesText::new(text)))?;
                    }
                    NodeKind::CData(text) => {
                        write_event(&mut writer, Event::CData(BytesCData::new(text.as_str())))?;
                    }
                },
                Step::Close(id) => {
                    if let NodeKind::Element { name, .. } = &self.nodes[id].kind {
                        write_event(&mut writer, Event::End(BytesEnd::new(name.as_str())))?;
                    }
                }
            }
        }

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes)
            .map_err(|e| GuardError::Unsanitizable(format!("serialized output not UTF-8: {e}")))
    }

    /// True when no nodes were parsed at all. Lenient parsing can swallow
    /// every event of hopeless input and hand back an empty arena.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn write_event(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> GuardResult<()> {
    writer
        .write_event(event)
        .map_err(|e| GuardError::Unsanitizable(format!("serialization failed: {e}")))
}

fn read_attributes(start: &BytesStart<'_>, lenient: bool) -> GuardResult<Vec<Attribute>> {
    let mut attrs = Vec::new();

    for attr in start.attributes().with_checks(!lenient) {
        let attr = match attr {
            Ok(attr) => attr,
            Err(_) if lenient => continue,
            Err(e) => {
                return Err(GuardError::InvalidMarkup(format!("bad attribute: {e}")));
            }
        };

        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = match attr.unescape_value() {
            Ok(cow) => cow.into_owned(),
            Err(_) if lenient => String::from_utf8_lossy(&attr.value).into_owned(),
            Err(e) => {
                return Err(GuardError::InvalidMarkup(format!(
                    "bad attribute value: {e}"
                )));
            }
        };

        attrs.push(Attribute { name, value });
    }

    Ok(attrs)
}
