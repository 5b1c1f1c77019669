//! Decoded document events and the records collected from the document
//! prologue.

use std::rc::Rc;

use crate::algorithm::AlgorithmData;
use crate::qname::QualifiedName;

/// Character data: decoded text or an encoding algorithm payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(Rc<str>),
    Algorithm(AlgorithmData),
}

impl Content {
    /// The text, if this is not an algorithm payload.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            Self::Algorithm(_) => None,
        }
    }
}

/// Attribute of a start element event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: Rc<QualifiedName>,
    pub value: Content,
}

/// Namespace declaration of a start element event.
///
/// An empty `namespace_name` undeclares the prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDeclaration {
    /// Empty for the default namespace.
    pub prefix: Rc<str>,
    pub namespace_name: Rc<str>,
}

/// Processing instruction (also used inside the document type declaration).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingInstruction {
    pub target: Rc<str>,
    pub data: Content,
}

/// Events produced by [`crate::decoder::Decoder::next_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartDocument,
    DocumentType {
        system_identifier: Option<Rc<str>>,
        public_identifier: Option<Rc<str>>,
        instructions: Vec<ProcessingInstruction>,
    },
    StartElement {
        name: Rc<QualifiedName>,
        namespaces: Vec<NamespaceDeclaration>,
        attributes: Vec<Attribute>,
    },
    EndElement {
        name: Rc<QualifiedName>,
    },
    Characters(Content),
    Comment(Content),
    ProcessingInstruction(ProcessingInstruction),
    UnexpandedEntityReference {
        name: Rc<str>,
        system_identifier: Option<Rc<str>>,
        public_identifier: Option<Rc<str>>,
    },
    EndDocument,
}

/// Notation declared in the document prologue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notation {
    pub name: Rc<str>,
    pub system_identifier: Option<Rc<str>>,
    pub public_identifier: Option<Rc<str>>,
}

/// Unparsed entity declared in the document prologue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparsedEntity {
    pub name: Rc<str>,
    pub system_identifier: Rc<str>,
    pub public_identifier: Option<Rc<str>>,
    pub notation_name: Rc<str>,
}

/// Additional data item: an identifying URI and opaque octets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalData {
    pub id: Rc<str>,
    pub data: Vec<u8>,
}

/// Document properties from the optional components of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentProperties {
    pub character_encoding_scheme: Option<Rc<str>>,
    pub standalone: Option<bool>,
    pub version: Option<Rc<str>>,
}
