//! Vocabulary: the per-document tables that back-references index into.
//!
//! The prefix and namespace name tables start with the built-in `xml`
//! entry, which the format addresses as index 0. User entries therefore
//! begin at wire index 1 and every table resolves wire index `k` as
//! position `k + 1`.

use std::rc::Rc;

use crate::qname::QualifiedName;
use crate::table::Table;

/// The reserved `xml` prefix.
pub const XML_PREFIX: &str = "xml";
/// The reserved `xmlns` prefix.
pub const XMLNS_PREFIX: &str = "xmlns";
/// Namespace bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
/// Namespace of namespace declarations.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// String tables of a vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    EncodingAlgorithm,
    Prefix,
    NamespaceName,
    LocalName,
    OtherNcName,
    OtherUri,
    AttributeValue,
    CharacterChunk,
    OtherString,
}

/// Who owns a vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Created by the decoder and reset for every document.
    Internal,
    /// Supplied by the caller; the decoder only copies from it.
    External,
}

/// Aggregate of all vocabulary tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    /// URI of the external vocabulary this one extends.
    pub(crate) external_vocabulary: Option<Rc<str>>,
    pub(crate) restricted_alphabets: Table<Rc<[u16]>>,
    pub(crate) encoding_algorithms: Table<Rc<str>>,
    pub(crate) prefixes: Table<Rc<str>>,
    pub(crate) namespace_names: Table<Rc<str>>,
    pub(crate) local_names: Table<Rc<str>>,
    pub(crate) other_ncnames: Table<Rc<str>>,
    pub(crate) other_uris: Table<Rc<str>>,
    pub(crate) attribute_values: Table<Rc<str>>,
    pub(crate) character_chunks: Table<Rc<str>>,
    pub(crate) other_strings: Table<Rc<str>>,
    pub(crate) element_names: Table<Rc<QualifiedName>>,
    pub(crate) attribute_names: Table<Rc<QualifiedName>>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

impl Vocabulary {
    /// Creates a vocabulary holding only the built-in entries.
    pub fn new() -> Self {
        let mut prefixes = Table::new("prefix");
        prefixes.add(Rc::from(XML_PREFIX));
        let mut namespace_names = Table::new("namespace name");
        namespace_names.add(Rc::from(XML_NAMESPACE));
        Self {
            external_vocabulary: None,
            restricted_alphabets: Table::new("restricted alphabet"),
            encoding_algorithms: Table::new("encoding algorithm"),
            prefixes,
            namespace_names,
            local_names: Table::new("local name"),
            other_ncnames: Table::new("other NCName"),
            other_uris: Table::new("other URI"),
            attribute_values: Table::new("attribute value"),
            character_chunks: Table::new("character content chunk"),
            other_strings: Table::new("other string"),
            element_names: Table::new("element name surrogate"),
            attribute_names: Table::new("attribute name surrogate"),
        }
    }

    /// Drops every entry except the built-ins.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// URI of the referenced external vocabulary, if any.
    pub fn external_vocabulary(&self) -> Option<&str> {
        self.external_vocabulary.as_deref()
    }

    /// A string table.
    pub fn strings(&self, partition: Partition) -> &Table<Rc<str>> {
        match partition {
            Partition::EncodingAlgorithm => &self.encoding_algorithms,
            Partition::Prefix => &self.prefixes,
            Partition::NamespaceName => &self.namespace_names,
            Partition::LocalName => &self.local_names,
            Partition::OtherNcName => &self.other_ncnames,
            Partition::OtherUri => &self.other_uris,
            Partition::AttributeValue => &self.attribute_values,
            Partition::CharacterChunk => &self.character_chunks,
            Partition::OtherString => &self.other_strings,
        }
    }

    /// A string table, mutable.
    pub fn strings_mut(&mut self, partition: Partition) -> &mut Table<Rc<str>> {
        match partition {
            Partition::EncodingAlgorithm => &mut self.encoding_algorithms,
            Partition::Prefix => &mut self.prefixes,
            Partition::NamespaceName => &mut self.namespace_names,
            Partition::LocalName => &mut self.local_names,
            Partition::OtherNcName => &mut self.other_ncnames,
            Partition::OtherUri => &mut self.other_uris,
            Partition::AttributeValue => &mut self.attribute_values,
            Partition::CharacterChunk => &mut self.character_chunks,
            Partition::OtherString => &mut self.other_strings,
        }
    }

    pub fn restricted_alphabets(&self) -> &Table<Rc<[u16]>> {
        &self.restricted_alphabets
    }

    pub fn element_names(&self) -> &Table<Rc<QualifiedName>> {
        &self.element_names
    }

    pub fn attribute_names(&self) -> &Table<Rc<QualifiedName>> {
        &self.attribute_names
    }

    /// Appends a string to a partition (for building external vocabularies).
    pub fn add_string(&mut self, partition: Partition, value: &str) -> usize {
        self.strings_mut(partition).add(Rc::from(value))
    }

    /// Appends an application restricted alphabet.
    pub fn add_restricted_alphabet(&mut self, characters: &str) -> usize {
        let units: Vec<u16> = characters.encode_utf16().collect();
        self.restricted_alphabets.add(Rc::from(units))
    }

    /// Appends an element name surrogate.
    pub fn add_element_name(&mut self, name: QualifiedName) -> usize {
        self.element_names.add(Rc::new(name))
    }

    /// Appends an attribute name surrogate; the dedup key is computed here.
    pub fn add_attribute_name(&mut self, name: QualifiedName) -> usize {
        self.attribute_names.add(Rc::new(name.into_attribute()))
    }

    /// Copies the tables of `external` behind the current entries.
    ///
    /// The built-in prefix and namespace entries of `external` are skipped.
    pub fn extend_from(&mut self, external: &Vocabulary) {
        self.restricted_alphabets.extend_from(&external.restricted_alphabets, 0);
        self.encoding_algorithms.extend_from(&external.encoding_algorithms, 0);
        self.prefixes.extend_from(&external.prefixes, 1);
        self.namespace_names.extend_from(&external.namespace_names, 1);
        self.local_names.extend_from(&external.local_names, 0);
        self.other_ncnames.extend_from(&external.other_ncnames, 0);
        self.other_uris.extend_from(&external.other_uris, 0);
        self.attribute_values.extend_from(&external.attribute_values, 0);
        self.character_chunks.extend_from(&external.character_chunks, 0);
        self.other_strings.extend_from(&external.other_strings, 0);
        self.element_names.extend_from(&external.element_names, 0);
        self.attribute_names.extend_from(&external.attribute_names, 0);
    }
}
