//! Package relationship graphs (`*.rels` parts)
//!
//! A relationships part links one source part to its targets. Ids are
//! assigned sequentially ("rId1", "rId2", ...) in the order links are added,
//! which for workbooks is sheet insertion order.

use quick_xml::events::Event;

use crate::error::XlsxResult;
use crate::parts::PACKAGE_RELATIONSHIPS_NS;
use crate::xml::{attr, escape_xml, PartReader, XML_DECLARATION};

/// One link from a source part to a target part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship id, unique within its part (e.g. "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path, relative to the source part's directory unless it starts with `/`
    pub target: String,
}

/// The ordered set of relationships of one source part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    items: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a link and return the id assigned to it
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let mut n = self.items.len() + 1;
        let id = loop {
            let candidate = format!("rId{}", n);
            if self.get(&candidate).is_none() {
                break candidate;
            }
            n += 1;
        };

        self.items.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        });
        id
    }

    /// Look up a relationship by id
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.id == id)
    }

    /// First relationship of the given type
    pub fn find_by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.rel_type == rel_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialize as a relationships part
    pub fn to_xml(&self) -> String {
        let mut content = String::from(XML_DECLARATION);
        content.push_str(&format!(
            "\n<Relationships xmlns=\"{}\">",
            PACKAGE_RELATIONSHIPS_NS
        ));

        for rel in &self.items {
            content.push_str(&format!(
                "\n    <Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>",
                escape_xml(&rel.id),
                escape_xml(&rel.rel_type),
                escape_xml(&rel.target)
            ));
        }

        content.push_str("\n</Relationships>");
        content
    }

    /// Parse a relationships part
    ///
    /// `part` names the part in error messages.
    pub fn parse(part: &str, bytes: &[u8]) -> XlsxResult<Self> {
        let mut reader = PartReader::new(part, bytes, "Relationships").trim_text();
        let mut items = Vec::new();

        loop {
            match reader.next()? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                    let id = attr(&e, b"Id")?
                        .ok_or_else(|| reader.error("<Relationship> without Id"))?;
                    let target = attr(&e, b"Target")?
                        .ok_or_else(|| reader.error(format!("relationship {} without Target", id)))?;
                    let rel_type = attr(&e, b"Type")?
                        .ok_or_else(|| reader.error(format!("relationship {} without Type", id)))?;

                    items.push(Relationship {
                        id,
                        rel_type,
                        target,
                    });
                }
                Event::Eof => break,
                _ => {}
            }
        }

        log::trace!("{}: {} relationships", part, items.len());
        Ok(Self { items })
    }
}
