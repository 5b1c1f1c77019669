//! String decoders (X.891 C.13, C.14, C.22, C.25).
//!
//! [`StringDecoder`] owns the octet buffer and the character buffer and
//! turns classified leading octets into values. Decode operations return
//! their result instead of leaving it in decoder fields: identifying
//! strings yield the string and its wire index, non-identifying strings a
//! [`NonIdentifyingString`] the caller resolves against its table.

use std::io::Read;
use std::rc::Rc;

use log::trace;

use crate::algorithm::{self, AlgorithmData};
use crate::alphabet;
use crate::chars::{CharBuffer, CharClass};
use crate::event::Content;
use crate::octet_buffer::OctetBuffer;
use crate::qname::StringInterner;
use crate::state_table::{
    self, CharacterChunk, Identifying, Index, IndexBiases, Length, LengthBiases, NonIdentifying,
    PrefixNamespace, SequenceLength, FOURTH_BIT, INDEX_ZERO, LENGTH_FIFTH_BIT, LENGTH_SECOND_BIT,
    LENGTH_SEVENTH_BIT, SECOND_BIT,
};
use crate::table::Table;
use crate::vocabulary::{XMLNS_NAMESPACE, XMLNS_PREFIX, XML_NAMESPACE, XML_PREFIX};
use crate::{Error, Result};

/// An identifying string and the wire index it has in its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifyingString {
    pub value: Rc<str>,
    pub index: usize,
}

/// Classification of a decoded non-identifying string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonIdentifyingString {
    /// The text sits in the character buffer.
    Literal { add_to_table: bool },
    /// Wire index into the caller's table.
    Index(usize),
    /// Encoding algorithm payload.
    Algorithm { add_to_table: bool, data: AlgorithmData },
    Empty,
}

/// Decodes strings, lengths and indices from an octet buffer.
pub struct StringDecoder<R> {
    pub(crate) octets: OctetBuffer<R>,
    pub(crate) chars: CharBuffer,
    interner: Option<StringInterner>,
    empty: Rc<str>,
}

impl<R: Read> StringDecoder<R> {
    pub fn new(octets: OctetBuffer<R>, string_interning: bool) -> Self {
        Self {
            octets,
            chars: CharBuffer::new(),
            interner: string_interning.then(StringInterner::new),
            empty: Rc::from(""),
        }
    }

    /// Forgets interned strings, e.g. between documents.
    pub fn clear_interned(&mut self) {
        if let Some(interner) = self.interner.as_mut() {
            interner.clear();
        }
    }

    /// Shared empty string.
    pub fn empty(&self) -> Rc<str> {
        Rc::clone(&self.empty)
    }

    #[inline]
    pub fn read(&mut self) -> Result<u8> {
        self.octets.read()
    }

    #[inline]
    pub fn peek(&mut self) -> Result<u8> {
        self.octets.peek()
    }

    /// Completes a classified length.
    pub fn length(&mut self, length: Length, biases: LengthBiases) -> Result<usize> {
        match length {
            Length::Small(n) => Ok(n),
            Length::Medium => Ok(usize::from(self.read()?) + biases.medium),
            Length::Large => {
                let n = self.octets.read_u32()? as usize;
                n.checked_add(biases.large)
                    .ok_or_else(|| Error::malformed("octet string length overflows"))
            }
        }
    }

    /// Completes a classified index.
    pub fn index(&mut self, index: Index, biases: IndexBiases) -> Result<usize> {
        match index {
            Index::Small(i) => Ok(i),
            Index::Medium(high) => Ok(((high << 8) | usize::from(self.read()?)) + biases.medium),
            Index::Large(high) => {
                let b1 = usize::from(self.read()?);
                let b2 = usize::from(self.read()?);
                Ok(((high << 16) | (b1 << 8) | b2) + biases.large)
            }
            Index::LargeLarge => {
                let b1 = usize::from(self.read()? & 0x0F);
                let b2 = usize::from(self.read()?);
                let b3 = usize::from(self.read()?);
                Ok(((b1 << 16) | (b2 << 8) | b3) + biases.large_large)
            }
        }
    }

    /// Length of a sequence.
    pub fn sequence_length(&mut self) -> Result<usize> {
        match state_table::sequence_length(self.read()?) {
            SequenceLength::Small(n) => Ok(n),
            SequenceLength::Large(high) => {
                let b1 = usize::from(self.read()?);
                let b2 = usize::from(self.read()?);
                Ok(((high << 16) | (b1 << 8) | b2) + state_table::SEQUENCE_LARGE_BIAS)
            }
            SequenceLength::Illegal => Err(Error::malformed("illegal sequence length")),
        }
    }

    /// Integer on the second bit (C.25); the first bit is padding.
    pub fn integer_on_second_bit(&mut self) -> Result<usize> {
        let b = self.read()? | 0x80;
        match state_table::second_bit_index(b) {
            Some(index) => self.index(index, SECOND_BIT),
            None => Err(Error::malformed("illegal integer on the second bit")),
        }
    }

    /// Length of a non-empty octet string on the second bit (C.22).
    pub fn octet_string_length_on_second_bit(&mut self) -> Result<usize> {
        let b = self.read()? & 0x7F;
        match state_table::identifying(b) {
            Identifying::Literal(length) => self.length(length, LENGTH_SECOND_BIT),
            _ => Err(Error::malformed("illegal non-empty octet string length")),
        }
    }

    /// Non-empty octet string on the second bit, decoded as UTF-8 of the
    /// given character class.
    pub fn utf8_on_second_bit(&mut self, class: CharClass) -> Result<Rc<str>> {
        let n = self.octet_string_length_on_second_bit()?;
        self.utf8(n, class)?;
        self.text()
    }

    /// Non-empty octet string on the second bit, copied out.
    pub fn octets_on_second_bit(&mut self) -> Result<Vec<u8>> {
        let n = self.octet_string_length_on_second_bit()?;
        let span = self.octets.take(n)?;
        Ok(self.octets.slice(&span)?.to_vec())
    }

    /// Decodes `n` UTF-8 octets into the character buffer.
    pub fn utf8(&mut self, n: usize, class: CharClass) -> Result<()> {
        let bytes = self.octets.read_slice(n)?;
        self.chars.decode_utf8(bytes, class)
    }

    /// Decodes `n` UTF-16 octets into the character buffer.
    pub fn utf16(&mut self, n: usize) -> Result<()> {
        let bytes = self.octets.read_slice(n)?;
        self.chars.decode_utf16(bytes)
    }

    /// Materializes the character buffer.
    pub fn text(&mut self) -> Result<Rc<str>> {
        if self.chars.is_empty() {
            return Ok(self.empty());
        }
        let s = self.chars.to_string_checked()?;
        Ok(match self.interner.as_mut() {
            Some(interner) => interner.intern(&s),
            None => Rc::from(s),
        })
    }

    /// Identifying string on the first bit (C.13).
    ///
    /// Literals are appended to `table`, indices resolved from it.
    pub fn identifying(&mut self, table: &mut Table<Rc<str>>, class: CharClass) -> Result<IdentifyingString> {
        let b = self.read()?;
        match state_table::identifying(b) {
            Identifying::Literal(length) => {
                let n = self.length(length, LENGTH_SECOND_BIT)?;
                self.utf8(n, class)?;
                let value = self.text()?;
                let index = table.add(Rc::clone(&value)) - 1;
                trace!("{} literal #{index}: {value}", table.name());
                Ok(IdentifyingString { value, index })
            }
            Identifying::Index(index) => {
                let index = self.index(index, SECOND_BIT)?;
                let value = Rc::clone(table.at_index(index)?);
                Ok(IdentifyingString { value, index })
            }
            Identifying::Illegal => Err(Error::malformed(format!(
                "illegal identifying string for the {} table",
                table.name()
            ))),
        }
    }

    /// Prefix as identifying string; `namespace_follows` allows index zero.
    pub fn prefix(&mut self, table: &mut Table<Rc<str>>, namespace_follows: bool) -> Result<IdentifyingString> {
        self.prefix_or_namespace(table, true, namespace_follows, true)
    }

    /// Namespace name as identifying string; index zero needs a prefix.
    pub fn namespace_name(&mut self, table: &mut Table<Rc<str>>, prefix_present: bool) -> Result<IdentifyingString> {
        self.prefix_or_namespace(table, false, prefix_present, true)
    }

    /// Prefix of a literal qualified name: index only.
    pub fn prefix_index(&mut self, table: &mut Table<Rc<str>>, namespace_follows: bool) -> Result<IdentifyingString> {
        self.prefix_or_namespace(table, true, namespace_follows, false)
    }

    /// Namespace name of a literal qualified name: index only.
    pub fn namespace_name_index(&mut self, table: &mut Table<Rc<str>>, prefix_present: bool) -> Result<IdentifyingString> {
        self.prefix_or_namespace(table, false, prefix_present, false)
    }

    fn prefix_or_namespace(
        &mut self,
        table: &mut Table<Rc<str>>,
        is_prefix: bool,
        paired: bool,
        allow_literal: bool,
    ) -> Result<IdentifyingString> {
        let b = self.read()?;
        match state_table::prefix_namespace(b) {
            PrefixNamespace::Literal(_) if !allow_literal => Err(Error::malformed(format!(
                "{} of a literal qualified name must be an index",
                table.name()
            ))),
            PrefixNamespace::Literal(length) => {
                let n = self.length(length, LENGTH_SECOND_BIT)?;
                let class = if is_prefix { CharClass::NcName } else { CharClass::Content };
                self.utf8(n, class)?;
                let value = self.text()?;
                let reserved = if is_prefix {
                    matches!(&*value, XML_PREFIX | XMLNS_PREFIX)
                } else {
                    matches!(&*value, XML_NAMESPACE | XMLNS_NAMESPACE)
                };
                if reserved {
                    return Err(Error::malformed(format!("reserved {} '{value}' used literally", table.name())));
                }
                let index = table.add(Rc::clone(&value)) - 1;
                Ok(IdentifyingString { value, index })
            }
            PrefixNamespace::IndexZero => {
                if is_prefix {
                    if !paired || self.peek()? != INDEX_ZERO {
                        return Err(Error::malformed("the xml prefix must be bound to the XML namespace"));
                    }
                } else if !paired {
                    return Err(Error::malformed("the XML namespace requires the xml prefix"));
                }
                let value = Rc::clone(table.at_index(0)?);
                Ok(IdentifyingString { value, index: 0 })
            }
            PrefixNamespace::Index(index) => {
                let index = self.index(index, SECOND_BIT)?;
                let value = Rc::clone(table.at_index(index)?);
                Ok(IdentifyingString { value, index })
            }
            PrefixNamespace::Illegal => Err(Error::malformed(format!(
                "illegal identifying string for the {} table",
                table.name()
            ))),
        }
    }

    /// Non-identifying string on the first bit (C.14).
    pub fn non_identifying(
        &mut self,
        alphabets: &Table<Rc<[u16]>>,
        algorithms: &Table<Rc<str>>,
    ) -> Result<NonIdentifyingString> {
        let b = self.read()?;
        match state_table::non_identifying(b) {
            NonIdentifying::Utf8 { add_to_table, length } => {
                let n = self.length(length, LENGTH_FIFTH_BIT)?;
                self.utf8(n, CharClass::Content)?;
                Ok(NonIdentifyingString::Literal { add_to_table })
            }
            NonIdentifying::Utf16 { add_to_table, length } => {
                let n = self.length(length, LENGTH_FIFTH_BIT)?;
                self.utf16(n)?;
                Ok(NonIdentifyingString::Literal { add_to_table })
            }
            NonIdentifying::RestrictedAlphabet { add_to_table, id_high } => {
                let b2 = self.read()?;
                let id = (id_high << 4) | (b2 >> 4);
                let n = self.fifth_bit_length(b2)?;
                self.restricted_alphabet(id, n, alphabets)?;
                Ok(NonIdentifyingString::Literal { add_to_table })
            }
            NonIdentifying::EncodingAlgorithm { add_to_table, id_high } => {
                let b2 = self.read()?;
                let id = (id_high << 4) | (b2 >> 4);
                let n = self.fifth_bit_length(b2)?;
                let data = self.algorithm_data(id, n, algorithms)?;
                Ok(NonIdentifyingString::Algorithm { add_to_table, data })
            }
            NonIdentifying::Index(index) => Ok(NonIdentifyingString::Index(self.index(index, SECOND_BIT)?)),
            NonIdentifying::Empty => Ok(NonIdentifyingString::Empty),
            NonIdentifying::Illegal => Err(Error::malformed("illegal non-identifying string")),
        }
    }

    fn fifth_bit_length(&mut self, b2: u8) -> Result<usize> {
        match state_table::length_fifth_bit(b2) {
            Some(length) => self.length(length, LENGTH_FIFTH_BIT),
            None => Err(Error::malformed("illegal octet string length on the fifth bit")),
        }
    }

    /// Character content chunk whose leading octet `b` was already read.
    pub fn character_chunk(
        &mut self,
        b: u8,
        alphabets: &Table<Rc<[u16]>>,
        algorithms: &Table<Rc<str>>,
    ) -> Result<NonIdentifyingString> {
        match state_table::character_chunk(b) {
            CharacterChunk::Utf8 { add_to_table, length } => {
                let n = self.length(length, LENGTH_SEVENTH_BIT)?;
                self.utf8(n, CharClass::Content)?;
                Ok(NonIdentifyingString::Literal { add_to_table })
            }
            CharacterChunk::Utf16 { add_to_table, length } => {
                let n = self.length(length, LENGTH_SEVENTH_BIT)?;
                self.utf16(n)?;
                Ok(NonIdentifyingString::Literal { add_to_table })
            }
            CharacterChunk::RestrictedAlphabet { add_to_table, id_high } => {
                let b2 = self.read()?;
                let id = (id_high << 6) | (b2 >> 2);
                let n = self.length(state_table::length_seventh_bit(b2), LENGTH_SEVENTH_BIT)?;
                self.restricted_alphabet(id, n, alphabets)?;
                Ok(NonIdentifyingString::Literal { add_to_table })
            }
            CharacterChunk::EncodingAlgorithm { add_to_table, id_high } => {
                let b2 = self.read()?;
                let id = (id_high << 6) | (b2 >> 2);
                let n = self.length(state_table::length_seventh_bit(b2), LENGTH_SEVENTH_BIT)?;
                let data = self.algorithm_data(id, n, algorithms)?;
                Ok(NonIdentifyingString::Algorithm { add_to_table, data })
            }
            CharacterChunk::Index(index) => Ok(NonIdentifyingString::Index(self.index(index, FOURTH_BIT)?)),
            CharacterChunk::Illegal => Err(Error::malformed("illegal character content chunk")),
        }
    }

    /// Decodes `n` octets of restricted alphabet `id` into the character buffer.
    pub fn restricted_alphabet(&mut self, id: u8, n: usize, alphabets: &Table<Rc<[u16]>>) -> Result<()> {
        let table: &[u16] = if id >= alphabet::APPLICATION_START {
            &alphabets.at_index(usize::from(id - alphabet::APPLICATION_START))?[..]
        } else {
            alphabet::builtin(id)
                .ok_or_else(|| Error::malformed(format!("restricted alphabet {id} is reserved")))?
        };
        let span = self.octets.take(n)?;
        let bytes = self.octets.slice(&span)?;
        alphabet::decode(table, bytes, &mut self.chars)
    }

    /// Captures `n` octets of encoding algorithm `id`.
    pub fn algorithm_data(&mut self, id: u8, n: usize, algorithms: &Table<Rc<str>>) -> Result<AlgorithmData> {
        let uri = if id >= algorithm::APPLICATION_START {
            Some(Rc::clone(algorithms.at_index(usize::from(id - algorithm::APPLICATION_START))?))
        } else if id > algorithm::CDATA {
            return Err(Error::UnsupportedEncodingAlgorithm(id));
        } else {
            None
        };
        let span = self.octets.take(n)?;
        Ok(AlgorithmData::new(id, uri, self.octets.slice(&span)?))
    }

    /// Turns a non-identifying result into content, updating `table`.
    ///
    /// Algorithm payloads flagged for the table are added as text, which
    /// only built-in algorithms can provide.
    pub fn resolve(&mut self, value: NonIdentifyingString, table: &mut Table<Rc<str>>) -> Result<Content> {
        match value {
            NonIdentifyingString::Literal { add_to_table } => {
                let text = self.text()?;
                if add_to_table {
                    table.add(Rc::clone(&text));
                }
                Ok(Content::Text(text))
            }
            NonIdentifyingString::Index(index) => Ok(Content::Text(Rc::clone(table.at_index(index)?))),
            NonIdentifyingString::Algorithm { add_to_table, data } => {
                if add_to_table {
                    let text = data.to_text()?.ok_or_else(|| {
                        Error::malformed("application algorithm payload cannot be added to a table")
                    })?;
                    table.add(Rc::from(text));
                }
                Ok(Content::Algorithm(data))
            }
            NonIdentifyingString::Empty => Ok(Content::Text(self.empty())),
        }
    }

    /// Like [`resolve`](Self::resolve) but rejects algorithm payloads
    /// (comments, processing instruction data, version).
    pub fn resolve_text(&mut self, value: NonIdentifyingString, table: &mut Table<Rc<str>>, what: &str) -> Result<Rc<str>> {
        match self.resolve(value, table)? {
            Content::Text(text) => Ok(text),
            Content::Algorithm(_) => Err(Error::malformed(format!(
                "encoding algorithm payloads are not supported for {what}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder(data: &[u8]) -> StringDecoder<&[u8]> {
        StringDecoder::new(OctetBuffer::new(data), false)
    }

    fn table(name: &'static str) -> Table<Rc<str>> {
        Table::new(name)
    }

    fn prefixes() -> Table<Rc<str>> {
        let mut t = table("prefix");
        t.add(Rc::from(XML_PREFIX));
        t
    }

    fn namespaces() -> Table<Rc<str>> {
        let mut t = table("namespace name");
        t.add(Rc::from(XML_NAMESPACE));
        t
    }

    #[test]
    fn sequence_length_tiers() {
        assert_eq!(decoder(&[0x7F]).sequence_length().unwrap(), 128);
        assert_eq!(decoder(&[0x80, 0x00, 0x00]).sequence_length().unwrap(), 129);
        assert_eq!(decoder(&[0x81, 0x00, 0x01]).sequence_length().unwrap(), 129 + 0x1_0001);
    }

    #[test]
    fn identifying_literal_then_index() {
        let mut t = table("local name");
        let mut d = decoder(&[0x02, b'a', b'b', b'c', 0x80]);
        let first = d.identifying(&mut t, CharClass::NcName).unwrap();
        assert_eq!(&*first.value, "abc");
        assert_eq!(first.index, 0);
        let second = d.identifying(&mut t, CharClass::NcName).unwrap();
        assert_eq!(second, first);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn identifying_length_boundaries() {
        let mut data = vec![0x3F];
        data.extend(std::iter::repeat_n(b'a', 64));
        data.extend([0x40, 0x00]);
        data.extend(std::iter::repeat_n(b'b', 65));
        let mut t = table("other string");
        let mut d = decoder(&data);
        assert_eq!(d.identifying(&mut t, CharClass::Content).unwrap().value.len(), 64);
        assert_eq!(d.identifying(&mut t, CharClass::Content).unwrap().value.len(), 65);
    }

    #[test]
    fn identifying_index_boundaries() {
        let mut t = table("other string");
        for i in 0..70 {
            t.add(Rc::from(i.to_string()));
        }
        let mut d = decoder(&[0xBF, 0xC0, 0x00, 0xC0, 0x05]);
        assert_eq!(d.identifying(&mut t, CharClass::Content).unwrap().index, 63);
        assert_eq!(d.identifying(&mut t, CharClass::Content).unwrap().index, 64);
        assert_eq!(d.identifying(&mut t, CharClass::Content).unwrap().index, 69);
    }

    #[test]
    fn identifying_index_out_of_range() {
        let mut t = table("local name");
        let err = decoder(&[0x81]).identifying(&mut t, CharClass::NcName).unwrap_err();
        assert_eq!(err, Error::index_out_of_range("local name", 2));
    }

    #[test]
    fn prefix_literal_xml_rejected() {
        let mut t = prefixes();
        let err = decoder(&[0x02, b'x', b'm', b'l']).prefix(&mut t, true).unwrap_err();
        assert!(matches!(err, Error::MalformedEncoding(_)));
        let err = decoder(b"\x04xmlns").prefix(&mut t, true).unwrap_err();
        assert!(matches!(err, Error::MalformedEncoding(_)));
    }

    #[test]
    fn namespace_literal_reserved_rejected() {
        let mut t = namespaces();
        let mut data = vec![0x23];
        data.extend_from_slice(XML_NAMESPACE.as_bytes());
        assert!(decoder(&data).namespace_name(&mut t, true).is_err());
        let mut data = vec![0x1C];
        data.extend_from_slice(XMLNS_NAMESPACE.as_bytes());
        assert!(decoder(&data).namespace_name(&mut t, true).is_err());
    }

    #[test]
    fn prefix_index_zero_pairing() {
        let mut p = prefixes();
        let mut n = namespaces();
        let mut d = decoder(&[0x80, 0x80]);
        assert_eq!(&*d.prefix(&mut p, true).unwrap().value, XML_PREFIX);
        assert_eq!(&*d.namespace_name(&mut n, true).unwrap().value, XML_NAMESPACE);

        // Praefix xml ohne Namespace
        assert!(decoder(&[0x80]).prefix(&mut p, false).is_err());
        // Praefix xml mit anderem Namespace
        assert!(decoder(&[0x80, 0x81]).prefix(&mut p, true).is_err());
        // XML-Namespace ohne Praefix
        assert!(decoder(&[0x80]).namespace_name(&mut n, false).is_err());
    }

    #[test]
    fn prefix_user_entries_start_at_index_one() {
        let mut p = prefixes();
        let mut d = decoder(&[0x00, b'p', 0x81]);
        let declared = d.prefix(&mut p, true).unwrap();
        assert_eq!(declared.index, 1);
        assert_eq!(d.prefix(&mut p, true).unwrap(), declared);
    }

    #[test]
    fn literal_qname_parts_must_be_indices() {
        let mut p = prefixes();
        assert!(decoder(&[0x00, b'p']).prefix_index(&mut p, true).is_err());
    }

    #[test]
    fn non_identifying_variants() {
        let alphabets = Table::new("restricted alphabet");
        let algorithms = Table::new("encoding algorithm");
        // UTF-8 "hi" mit add-to-table, dann leer, dann Index 0
        let mut d = decoder(&[0x41, b'h', b'i', 0xFF, 0x80]);
        let v = d.non_identifying(&alphabets, &algorithms).unwrap();
        assert_eq!(v, NonIdentifyingString::Literal { add_to_table: true });
        let mut values = table("attribute value");
        assert_eq!(d.resolve(v, &mut values).unwrap(), Content::Text(Rc::from("hi")));
        assert_eq!(values.len(), 1);
        assert_eq!(d.non_identifying(&alphabets, &algorithms).unwrap(), NonIdentifyingString::Empty);
        let v = d.non_identifying(&alphabets, &algorithms).unwrap();
        assert_eq!(v, NonIdentifyingString::Index(0));
        assert_eq!(d.resolve(v, &mut values).unwrap(), Content::Text(Rc::from("hi")));
    }

    #[test]
    fn non_identifying_utf16_medium_length() {
        let alphabets = Table::new("restricted alphabet");
        let algorithms = Table::new("encoding algorithm");
        let mut data = vec![0x18, 0x01];
        for _ in 0..5 {
            data.extend([0x00, b'z']);
        }
        let mut d = decoder(&data);
        d.non_identifying(&alphabets, &algorithms).unwrap();
        assert_eq!(d.text().unwrap().len(), 5);
    }

    #[test]
    fn non_identifying_builtin_alphabet() {
        let alphabets = Table::new("restricted alphabet");
        let algorithms = Table::new("encoding algorithm");
        // 0 0 10 0000 | 0000 0000: numerisches Alphabet, Laenge 1; Payload 0x12
        let mut d = decoder(&[0x20, 0x00, 0x12]);
        d.non_identifying(&alphabets, &algorithms).unwrap();
        assert_eq!(&*d.text().unwrap(), "12");
    }

    #[test]
    fn non_identifying_reserved_alphabet() {
        let alphabets = Table::new("restricted alphabet");
        let algorithms = Table::new("encoding algorithm");
        // Alphabet-Id 2 ist reserviert
        let mut d = decoder(&[0x20, 0x20, 0x12]);
        assert!(matches!(
            d.non_identifying(&alphabets, &algorithms),
            Err(Error::MalformedEncoding(_))
        ));
    }

    #[test]
    fn non_identifying_application_algorithm() {
        let alphabets = Table::new("restricted alphabet");
        let mut algorithms = Table::new("encoding algorithm");
        algorithms.add(Rc::from("urn:alg"));
        // 0 0 11 0010 | 0000 0001: Id 32, Laenge 2
        let mut d = decoder(&[0x32, 0x01, 0xAA, 0xBB]);
        match d.non_identifying(&alphabets, &algorithms).unwrap() {
            NonIdentifyingString::Algorithm { add_to_table, data } => {
                assert!(!add_to_table);
                assert_eq!(data.id(), 32);
                assert_eq!(data.uri(), Some("urn:alg"));
                assert_eq!(data.octets(), &[0xAA, 0xBB]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn reserved_algorithm_rejected() {
        let alphabets = Table::new("restricted alphabet");
        let algorithms = Table::new("encoding algorithm");
        // Id 10
        let mut d = decoder(&[0x30, 0xA0, 0x00]);
        assert_eq!(
            d.non_identifying(&alphabets, &algorithms),
            Err(Error::UnsupportedEncodingAlgorithm(10))
        );
    }

    #[test]
    fn character_chunk_algorithm_identifier_spans_two_octets() {
        let alphabets = Table::new("restricted alphabet");
        let algorithms = Table::new("encoding algorithm");
        // 10 0 0 11 00 | 000001 00: Base64 (Id 1), Laenge 1
        let mut d = decoder(&[0x04, b'M']);
        match d.character_chunk(0x8C, &alphabets, &algorithms).unwrap() {
            NonIdentifyingString::Algorithm { data, .. } => {
                assert_eq!(data.id(), algorithm::BASE64);
                assert_eq!(data.to_text().unwrap().unwrap(), "TQ==");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn character_chunk_index_tiers() {
        let alphabets = Table::new("restricted alphabet");
        let algorithms = Table::new("encoding algorithm");
        let mut d = decoder(&[0x00, 0x00, 0x00, 0x00]);
        assert_eq!(
            d.character_chunk(0xAF, &alphabets, &algorithms).unwrap(),
            NonIdentifyingString::Index(15)
        );
        assert_eq!(
            d.character_chunk(0xB0, &alphabets, &algorithms).unwrap(),
            NonIdentifyingString::Index(16)
        );
        assert_eq!(
            d.character_chunk(0xB8, &alphabets, &algorithms).unwrap(),
            NonIdentifyingString::Index(263_184)
        );
    }

    #[test]
    fn algorithm_added_to_table_as_text() {
        let mut values = table("character content chunk");
        let mut d = decoder(&[]);
        let data = AlgorithmData::new(algorithm::HEXADECIMAL, None, &[0xAB]);
        d.resolve(NonIdentifyingString::Algorithm { add_to_table: true, data }, &mut values)
            .unwrap();
        assert_eq!(&**values.get(1).unwrap(), "AB");

        let data = AlgorithmData::new(40, Some(Rc::from("urn:a")), &[0xAB]);
        assert!(d
            .resolve(NonIdentifyingString::Algorithm { add_to_table: true, data }, &mut values)
            .is_err());
    }

    #[test]
    fn octet_string_on_second_bit_ignores_first_bit() {
        let mut d = decoder(&[0x81, b'x', b'y', 0x00, b'z']);
        assert_eq!(&*d.utf8_on_second_bit(CharClass::Content).unwrap(), "xy");
        assert_eq!(d.octets_on_second_bit().unwrap(), b"z");
    }

    #[test]
    fn integer_on_second_bit_tiers() {
        let mut d = decoder(&[0x05, 0x40, 0x01, 0x60, 0x00, 0x00]);
        assert_eq!(d.integer_on_second_bit().unwrap(), 5);
        assert_eq!(d.integer_on_second_bit().unwrap(), 65);
        assert_eq!(d.integer_on_second_bit().unwrap(), 8256);
    }

    #[test]
    fn interning_shares_text() {
        let mut d = StringDecoder::new(OctetBuffer::new(&[0x00, b'a', 0x00, b'a'][..]), true);
        let mut t = table("local name");
        let a = d.identifying(&mut t, CharClass::NcName).unwrap().value;
        let b = d.identifying(&mut t, CharClass::NcName).unwrap().value;
        assert!(Rc::ptr_eq(&a, &b));
    }
}
