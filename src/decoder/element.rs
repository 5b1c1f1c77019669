//! Document body: elements, attributes and content items (X.891 C.3 to C.9).

use std::io::Read;
use std::rc::Rc;

use log::trace;

use crate::chars::CharClass;
use crate::error::{Error, Result};
use crate::event::{Attribute, Content, Event, NamespaceDeclaration, ProcessingInstruction};
use crate::qname::QualifiedName;
use crate::state_table::{
    self, DOUBLE_TERMINATOR, ElementName, Item, NamespaceAttribute, PROCESSING_INSTRUCTION, SECOND_BIT,
    TERMINATOR, THIRD_BIT,
};

use super::Decoder;

// Literal qualified name flags.
const NAME_PREFIX: u8 = 0x02;
const NAME_NAMESPACE: u8 = 0x01;

impl<R: Read> Decoder<R> {
    /// Decodes the next item of the document body.
    pub(super) fn body_event(&mut self) -> Result<Event> {
        if self.pending_terminators > 0 {
            self.pending_terminators -= 1;
            return self.close_container();
        }

        let b = self.strings.read()?;
        let item = if self.elements.is_empty() && !self.options.parse_fragments {
            state_table::document_child(b)
        } else {
            state_table::element_child(b)
        };
        match item {
            Item::Element { attributes, name } => self.start_element(attributes, name),
            Item::Characters => self.characters(b),
            Item::DocumentType { system, public } => self.document_type(system, public),
            Item::EntityReference { system, public } => self.entity_reference(system, public),
            Item::ProcessingInstruction => self.processing_instruction().map(Event::ProcessingInstruction),
            Item::Comment => self.comment(),
            Item::Terminator => self.close_container(),
            Item::DoubleTerminator => {
                if self.elements.is_empty() {
                    return Err(Error::malformed("double terminator without an open element"));
                }
                self.pending_terminators += 1;
                self.close_container()
            }
            Item::Illegal => Err(Error::malformed(format!(
                "illegal item octet {b:#04x} at depth {}",
                self.elements.len()
            ))),
        }
    }

    /// Ends the innermost element, or the document when none is open.
    fn close_container(&mut self) -> Result<Event> {
        match self.elements.pop() {
            Some(name) => {
                self.scopes.pop_element();
                trace!("end element {name}");
                Ok(Event::EndElement { name })
            }
            None => self.end_document(),
        }
    }

    fn start_element(&mut self, attributes: bool, name: ElementName) -> Result<Event> {
        if self.elements.is_empty() && !self.options.parse_fragments {
            if self.document_element_seen {
                return Err(Error::malformed("a document has exactly one root element"));
            }
            self.document_element_seen = true;
        }
        self.scopes.push_element();

        let (namespaces, name) = match name {
            ElementName::Namespaces => {
                let namespaces = self.namespace_attributes()?;
                let b = self.strings.read()?;
                match state_table::element(b) {
                    Item::Element { attributes: false, name } if b < 0x80 => (namespaces, name),
                    _ => {
                        return Err(Error::malformed(format!(
                            "octet {b:#04x} after namespace attributes is not an element name"
                        )));
                    }
                }
            }
            name => (Vec::new(), name),
        };

        let name = match name {
            ElementName::Index(index) => {
                let i = self.strings.index(index, THIRD_BIT)?;
                Rc::clone(self.vocabulary.element_names.at_index(i)?)
            }
            ElementName::Literal(flags) => self.literal_qualified_name(flags, false)?,
            ElementName::Namespaces => {
                return Err(Error::malformed("namespace attributes occur only once per element"));
            }
        };
        self.scopes.check_element(&name)?;

        let attributes = if attributes { self.attributes()? } else { Vec::new() };
        trace!(
            "start element {name} at depth {}, {} attribute(s)",
            self.elements.len(),
            attributes.len()
        );
        self.elements.push(Rc::clone(&name));
        Ok(Event::StartElement {
            name,
            namespaces,
            attributes,
        })
    }

    /// Namespace attributes up to their terminator; the bindings are
    /// declared in the scope of the element being started.
    fn namespace_attributes(&mut self) -> Result<Vec<NamespaceDeclaration>> {
        let mut declarations = Vec::new();
        loop {
            match state_table::namespace_attribute(self.strings.read()?) {
                NamespaceAttribute::Declaration { prefix, namespace } => {
                    let v = &mut self.vocabulary;
                    let prefix = if prefix {
                        Some(self.strings.prefix(&mut v.prefixes, namespace)?)
                    } else {
                        None
                    };
                    let namespace_name = if namespace {
                        Some(self.strings.namespace_name(&mut v.namespace_names, prefix.is_some())?)
                    } else {
                        None
                    };
                    self.scopes
                        .declare(prefix.as_ref().map(|p| p.index), namespace_name.as_ref().map(|n| n.index));
                    let declaration = NamespaceDeclaration {
                        prefix: prefix.map_or_else(|| self.strings.empty(), |p| p.value),
                        namespace_name: namespace_name.map_or_else(|| self.strings.empty(), |n| n.value),
                    };
                    trace!("namespace declaration {}={}", declaration.prefix, declaration.namespace_name);
                    declarations.push(declaration);
                }
                NamespaceAttribute::Terminator => return Ok(declarations),
                NamespaceAttribute::Illegal => {
                    return Err(Error::malformed("namespace attributes not terminated correctly"));
                }
            }
        }
    }

    /// Literal qualified name; the name is appended to the element or
    /// attribute name surrogate table.
    fn literal_qualified_name(&mut self, flags: u8, attribute: bool) -> Result<Rc<QualifiedName>> {
        let has_prefix = flags & NAME_PREFIX != 0;
        let has_namespace = flags & NAME_NAMESPACE != 0;
        if has_prefix && !has_namespace {
            return Err(Error::malformed("qualified name with a prefix but no namespace"));
        }

        let v = &mut self.vocabulary;
        let prefix = if has_prefix {
            Some(self.strings.prefix_index(&mut v.prefixes, has_namespace)?)
        } else {
            None
        };
        let namespace = if has_namespace {
            Some(self.strings.namespace_name_index(&mut v.namespace_names, has_prefix)?)
        } else {
            None
        };
        let local = self.strings.identifying(&mut v.local_names, CharClass::NcName)?;

        let prefix_index = prefix.as_ref().map(|p| p.index);
        let namespace_index = namespace.as_ref().map(|n| n.index);
        let name = QualifiedName::from_parts(
            prefix.map_or_else(|| self.strings.empty(), |p| p.value),
            namespace.map_or_else(|| self.strings.empty(), |n| n.value),
            local.value,
            &mut self.scratch,
        )
        .with_indices(prefix_index, namespace_index, local.index);

        let v = &mut self.vocabulary;
        let name = if attribute {
            let name = Rc::new(name.into_attribute());
            v.attribute_names.add(Rc::clone(&name));
            name
        } else {
            let name = Rc::new(name);
            v.element_names.add(Rc::clone(&name));
            name
        };
        Ok(name)
    }

    /// Attributes up to their terminator. A double terminator also ends
    /// the element.
    fn attributes(&mut self) -> Result<Vec<Attribute>> {
        self.duplicates.clear();
        let mut attributes: Vec<Attribute> = Vec::new();
        loop {
            let name = match state_table::attribute(self.strings.read()?) {
                state_table::Attribute::Index(index) => {
                    let i = self.strings.index(index, SECOND_BIT)?;
                    Rc::clone(self.vocabulary.attribute_names.at_index(i)?)
                }
                state_table::Attribute::Literal(flags) => self.literal_qualified_name(flags, true)?,
                state_table::Attribute::Terminator => break,
                state_table::Attribute::DoubleTerminator => {
                    self.pending_terminators += 1;
                    break;
                }
                state_table::Attribute::Illegal => {
                    return Err(Error::malformed("illegal attribute octet"));
                }
            };
            self.scopes.check_attribute(&name)?;

            let first = match name.attribute_key() {
                Some(key) => self.duplicates.insert(key),
                // Namen aus externen Vokabularen: Stringvergleich
                None => !attributes.iter().any(|a| {
                    a.name.local_name() == name.local_name() && a.name.namespace_name() == name.namespace_name()
                }),
            };
            if !first {
                return Err(Error::DuplicateAttribute(name.to_string()));
            }

            let v = &mut self.vocabulary;
            let value = self.strings.non_identifying(&v.restricted_alphabets, &v.encoding_algorithms)?;
            let value = self.strings.resolve(value, &mut v.attribute_values)?;
            self.check_algorithm(&value);
            attributes.push(Attribute { name, value });
        }
        Ok(attributes)
    }

    fn characters(&mut self, b: u8) -> Result<Event> {
        let v = &mut self.vocabulary;
        let chunk = self.strings.character_chunk(b, &v.restricted_alphabets, &v.encoding_algorithms)?;
        let content = self.strings.resolve(chunk, &mut v.character_chunks)?;
        self.check_algorithm(&content);
        Ok(Event::Characters(content))
    }

    fn comment(&mut self) -> Result<Event> {
        let v = &mut self.vocabulary;
        let value = self.strings.non_identifying(&v.restricted_alphabets, &v.encoding_algorithms)?;
        let text = self.strings.resolve_text(value, &mut v.other_strings, "comments")?;
        Ok(Event::Comment(Content::Text(text)))
    }

    fn processing_instruction(&mut self) -> Result<ProcessingInstruction> {
        let v = &mut self.vocabulary;
        let target = self.strings.identifying(&mut v.other_ncnames, CharClass::NcName)?.value;
        let value = self.strings.non_identifying(&v.restricted_alphabets, &v.encoding_algorithms)?;
        let data = self
            .strings
            .resolve_text(value, &mut v.other_strings, "processing instruction data")?;
        trace!("processing instruction {target}");
        Ok(ProcessingInstruction {
            target,
            data: Content::Text(data),
        })
    }

    fn entity_reference(&mut self, system: bool, public: bool) -> Result<Event> {
        let v = &mut self.vocabulary;
        let name = self.strings.identifying(&mut v.other_ncnames, CharClass::NcName)?.value;
        let system_identifier = if system {
            Some(self.strings.identifying(&mut v.other_uris, CharClass::Content)?.value)
        } else {
            None
        };
        let public_identifier = if public {
            Some(self.strings.identifying(&mut v.other_uris, CharClass::Content)?.value)
        } else {
            None
        };
        Ok(Event::UnexpandedEntityReference {
            name,
            system_identifier,
            public_identifier,
        })
    }

    /// Document type declaration with its processing instructions.
    fn document_type(&mut self, system: bool, public: bool) -> Result<Event> {
        if self.document_type_seen {
            return Err(Error::malformed("a document has at most one document type declaration"));
        }
        if self.document_element_seen {
            return Err(Error::malformed("document type declaration after the root element"));
        }
        self.document_type_seen = true;

        let v = &mut self.vocabulary;
        let system_identifier = if system {
            Some(self.strings.identifying(&mut v.other_uris, CharClass::Content)?.value)
        } else {
            None
        };
        let public_identifier = if public {
            Some(self.strings.identifying(&mut v.other_uris, CharClass::Content)?.value)
        } else {
            None
        };

        let mut instructions = Vec::new();
        loop {
            match self.strings.read()? {
                PROCESSING_INSTRUCTION => instructions.push(self.processing_instruction()?),
                TERMINATOR => break,
                DOUBLE_TERMINATOR => {
                    // Ende der DTD und des Dokuments
                    self.pending_terminators += 1;
                    break;
                }
                b => {
                    return Err(Error::malformed(format!(
                        "illegal octet {b:#04x} in the document type declaration"
                    )));
                }
            }
        }
        trace!("document type declaration, {} instruction(s)", instructions.len());
        Ok(Event::DocumentType {
            system_identifier,
            public_identifier,
            instructions,
        })
    }
}
