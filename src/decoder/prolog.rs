//! Document prologue: header, optional components and initial vocabulary
//! (X.891 C.2.3 to C.2.11).

use std::io::Read;
use std::rc::Rc;

use log::{debug, trace};

use crate::chars::CharClass;
use crate::error::{Error, Result};
use crate::event::{AdditionalData, Notation, UnparsedEntity};
use crate::header;
use crate::qname::QualifiedName;
use crate::state_table;
use crate::string::{NonIdentifyingString, StringDecoder};
use crate::table::Table;
use crate::vocabulary::{Vocabulary, XMLNS_NAMESPACE, XMLNS_PREFIX, XML_NAMESPACE, XML_PREFIX};

use super::Decoder;

// Optional components of the document.
const ADDITIONAL_DATA: u8 = 0x40;
const INITIAL_VOCABULARY: u8 = 0x20;
const NOTATIONS: u8 = 0x10;
const UNPARSED_ENTITIES: u8 = 0x08;
const CHARACTER_ENCODING_SCHEME: u8 = 0x04;
const STANDALONE: u8 = 0x02;
const VERSION: u8 = 0x01;

// Initial vocabulary, first octet.
const EXTERNAL_VOCABULARY: u8 = 0x10;
const RESTRICTED_ALPHABETS: u8 = 0x08;
const ENCODING_ALGORITHMS: u8 = 0x04;
const PREFIXES: u8 = 0x02;
const NAMESPACE_NAMES: u8 = 0x01;

// Initial vocabulary, second octet.
const LOCAL_NAMES: u8 = 0x80;
const OTHER_NCNAMES: u8 = 0x40;
const OTHER_URIS: u8 = 0x20;
const ATTRIBUTE_VALUES: u8 = 0x10;
const CHARACTER_CHUNKS: u8 = 0x08;
const OTHER_STRINGS: u8 = 0x04;
const ELEMENT_NAME_SURROGATES: u8 = 0x02;
const ATTRIBUTE_NAME_SURROGATES: u8 = 0x01;

// Name surrogate flags.
const SURROGATE_PREFIX: u8 = 0x02;
const SURROGATE_NAMESPACE: u8 = 0x01;

/// Reads a sequence length and appends that many decoded entries to `table`.
fn sequence<R: Read, T>(
    strings: &mut StringDecoder<R>,
    table: &mut Table<T>,
    mut entry: impl FnMut(&mut StringDecoder<R>) -> Result<T>,
) -> Result<usize> {
    let count = strings.sequence_length()?;
    for _ in 0..count {
        let value = entry(strings)?;
        table.add(value);
    }
    debug!("initial vocabulary: {count} {} entries", table.name());
    Ok(count)
}

/// Literal non-identifying string, as required for character tables.
fn literal<R: Read>(strings: &mut StringDecoder<R>, empty_alphabets: &Table<Rc<[u16]>>, algorithms: &Table<Rc<str>>) -> Result<()> {
    match strings.non_identifying(empty_alphabets, algorithms)? {
        NonIdentifyingString::Literal { .. } => Ok(()),
        _ => Err(Error::malformed("initial vocabulary entries must be literal strings")),
    }
}

/// `xml`/`xmlns` and their namespaces are built in and never listed.
fn unreserved(value: Rc<str>, reserved: [&str; 2]) -> Result<Rc<str>> {
    if reserved.contains(&&*value) {
        return Err(Error::malformed(format!("reserved name '{value}' in the initial vocabulary")));
    }
    Ok(value)
}

impl<R: Read> Decoder<R> {
    /// Decodes header and prologue of the next document.
    pub(super) fn start_document(&mut self) -> Result<()> {
        self.reset_document();
        self.header = header::decode(&mut self.strings.octets)?;
        self.documents += 1;
        debug!(
            "document {}: header decoded, xml declaration {:?}",
            self.documents,
            self.header.xml_declaration()
        );

        let b = self.strings.read()?;
        if b & 0x80 != 0 {
            return Err(Error::malformed("padding bit of the optional components is set"));
        }
        if b == INITIAL_VOCABULARY {
            return self.initial_vocabulary();
        }
        if b & ADDITIONAL_DATA != 0 {
            self.decode_additional_data()?;
        }
        if b & INITIAL_VOCABULARY != 0 {
            self.initial_vocabulary()?;
        }
        if b & NOTATIONS != 0 {
            self.decode_notations()?;
        }
        if b & UNPARSED_ENTITIES != 0 {
            self.decode_unparsed_entities()?;
        }
        if b & CHARACTER_ENCODING_SCHEME != 0 {
            let scheme = self.strings.utf8_on_second_bit(CharClass::Content)?;
            debug!("character encoding scheme: {scheme}");
            self.properties.character_encoding_scheme = Some(scheme);
        }
        if b & STANDALONE != 0 {
            self.properties.standalone = Some(self.strings.read()? != 0);
        }
        if b & VERSION != 0 {
            let value = self.strings.non_identifying(
                &self.vocabulary.restricted_alphabets,
                &self.vocabulary.encoding_algorithms,
            )?;
            let version = self.strings.resolve_text(value, &mut self.vocabulary.other_strings, "the version")?;
            self.properties.version = Some(version);
        }
        Ok(())
    }

    fn decode_additional_data(&mut self) -> Result<()> {
        let count = self.strings.sequence_length()?;
        for _ in 0..count {
            let id = self.strings.utf8_on_second_bit(CharClass::Content)?;
            let data = self.strings.octets_on_second_bit()?;
            trace!("additional data '{id}': {} octets", data.len());
            self.additional_data.push(AdditionalData { id, data });
        }
        Ok(())
    }

    /// Initial vocabulary: 13 presence flags over two octets, partitions in
    /// fixed order.
    fn initial_vocabulary(&mut self) -> Result<()> {
        let b1 = self.strings.read()?;
        let b2 = self.strings.read()?;
        if b1 & 0xE0 != 0 {
            return Err(Error::malformed("padding bits of the initial vocabulary are set"));
        }

        if b1 & EXTERNAL_VOCABULARY != 0 {
            self.external_vocabulary()?;
        }

        let strings = &mut self.strings;
        let v = &mut self.vocabulary;
        if b1 & RESTRICTED_ALPHABETS != 0 {
            let no_alphabets = Table::new("restricted alphabet");
            sequence(strings, &mut v.restricted_alphabets, |s| {
                literal(s, &no_alphabets, &v.encoding_algorithms)?;
                let units = s.chars.as_units();
                if units.len() < 2 {
                    return Err(Error::malformed("restricted alphabet with fewer than 2 characters"));
                }
                Ok(Rc::from(units))
            })?;
        }
        if b1 & ENCODING_ALGORITHMS != 0 {
            sequence(strings, &mut v.encoding_algorithms, |s| s.utf8_on_second_bit(CharClass::Content))?;
        }
        if b1 & PREFIXES != 0 {
            sequence(strings, &mut v.prefixes, |s| {
                unreserved(s.utf8_on_second_bit(CharClass::NcName)?, [XML_PREFIX, XMLNS_PREFIX])
            })?;
        }
        if b1 & NAMESPACE_NAMES != 0 {
            sequence(strings, &mut v.namespace_names, |s| {
                unreserved(s.utf8_on_second_bit(CharClass::Content)?, [XML_NAMESPACE, XMLNS_NAMESPACE])
            })?;
        }
        if b2 & LOCAL_NAMES != 0 {
            sequence(strings, &mut v.local_names, |s| s.utf8_on_second_bit(CharClass::NcName))?;
        }
        if b2 & OTHER_NCNAMES != 0 {
            sequence(strings, &mut v.other_ncnames, |s| s.utf8_on_second_bit(CharClass::NcName))?;
        }
        if b2 & OTHER_URIS != 0 {
            sequence(strings, &mut v.other_uris, |s| s.utf8_on_second_bit(CharClass::Content))?;
        }
        if b2 & ATTRIBUTE_VALUES != 0 {
            sequence(strings, &mut v.attribute_values, |s| s.utf8_on_second_bit(CharClass::Content))?;
        }
        if b2 & CHARACTER_CHUNKS != 0 {
            sequence(strings, &mut v.character_chunks, |s| {
                literal(s, &v.restricted_alphabets, &v.encoding_algorithms)?;
                s.text()
            })?;
        }
        if b2 & OTHER_STRINGS != 0 {
            sequence(strings, &mut v.other_strings, |s| {
                literal(s, &v.restricted_alphabets, &v.encoding_algorithms)?;
                s.text()
            })?;
        }
        if b2 & ELEMENT_NAME_SURROGATES != 0 {
            let names = name_surrogates(strings, v, &mut self.scratch, false)?;
            v.element_names.extend_from(&names, 0);
        }
        if b2 & ATTRIBUTE_NAME_SURROGATES != 0 {
            let names = name_surrogates(strings, v, &mut self.scratch, true)?;
            v.attribute_names.extend_from(&names, 0);
        }
        Ok(())
    }

    fn external_vocabulary(&mut self) -> Result<()> {
        if !self.options.has_external_vocabularies() {
            return Err(Error::UndeclaredExternalVocabulary);
        }
        let uri = self.strings.utf8_on_second_bit(CharClass::Content)?;
        let external = self
            .options
            .external_vocabulary(&uri)
            .ok_or_else(|| Error::VocabularyNotRegistered(uri.to_string()))?;
        self.vocabulary.extend_from(external);
        debug!("external vocabulary '{uri}' resolved");
        self.vocabulary.external_vocabulary = Some(uri);
        Ok(())
    }

    fn decode_notations(&mut self) -> Result<()> {
        loop {
            match state_table::notation(self.strings.read()?) {
                state_table::Notation::Entry { system, public } => {
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
                    trace!("notation {name}");
                    self.notations.push(Notation {
                        name,
                        system_identifier,
                        public_identifier,
                    });
                }
                state_table::Notation::Terminator => return Ok(()),
                state_table::Notation::Illegal => {
                    return Err(Error::malformed("notations not terminated correctly"));
                }
            }
        }
    }

    fn decode_unparsed_entities(&mut self) -> Result<()> {
        loop {
            match state_table::unparsed_entity(self.strings.read()?) {
                state_table::UnparsedEntity::Entry { public } => {
                    let v = &mut self.vocabulary;
                    let name = self.strings.identifying(&mut v.other_ncnames, CharClass::NcName)?.value;
                    let system_identifier = self.strings.identifying(&mut v.other_uris, CharClass::Content)?.value;
                    let public_identifier = if public {
                        Some(self.strings.identifying(&mut v.other_uris, CharClass::Content)?.value)
                    } else {
                        None
                    };
                    let notation_name = self.strings.identifying(&mut v.other_ncnames, CharClass::NcName)?.value;
                    trace!("unparsed entity {name}");
                    self.unparsed_entities.push(UnparsedEntity {
                        name,
                        system_identifier,
                        public_identifier,
                        notation_name,
                    });
                }
                state_table::UnparsedEntity::Terminator => return Ok(()),
                state_table::UnparsedEntity::Illegal => {
                    return Err(Error::malformed("unparsed entities not terminated correctly"));
                }
            }
        }
    }
}

/// Decodes a name surrogate partition against the string tables of `v`.
fn name_surrogates<R: Read>(
    strings: &mut StringDecoder<R>,
    v: &Vocabulary,
    scratch: &mut String,
    attribute: bool,
) -> Result<Table<Rc<QualifiedName>>> {
    let mut names = Table::new(if attribute {
        "attribute name surrogate"
    } else {
        "element name surrogate"
    });
    sequence(strings, &mut names, |s| {
        let flags = s.read()?;
        if flags & 0xFC != 0 {
            return Err(Error::malformed("padding bits of a name surrogate are set"));
        }
        if flags & SURROGATE_PREFIX != 0 && flags & SURROGATE_NAMESPACE == 0 {
            return Err(Error::malformed("name surrogate with a prefix but no namespace"));
        }
        let prefix = if flags & SURROGATE_PREFIX != 0 {
            let i = s.integer_on_second_bit()?;
            Some((i, Rc::clone(v.prefixes.at_index(i)?)))
        } else {
            None
        };
        let namespace = if flags & SURROGATE_NAMESPACE != 0 {
            let i = s.integer_on_second_bit()?;
            Some((i, Rc::clone(v.namespace_names.at_index(i)?)))
        } else {
            None
        };
        let local_index = s.integer_on_second_bit()?;
        let local = Rc::clone(v.local_names.at_index(local_index)?);
        let name = QualifiedName::from_parts(
            prefix.as_ref().map_or_else(|| s.empty(), |p| Rc::clone(&p.1)),
            namespace.as_ref().map_or_else(|| s.empty(), |n| Rc::clone(&n.1)),
            local,
            scratch,
        )
        .with_indices(prefix.map(|p| p.0), namespace.map(|n| n.0), local_index);
        Ok(Rc::new(if attribute { name.into_attribute() } else { name }))
    })?;
    Ok(names)
}
