//! Leading-octet classification.
//!
//! Every function here is a pure mapping from an octet to the shape of the
//! structure it introduces. Continuation octets are read by the callers in
//! [`crate::string`] and [`crate::decoder`]; the shapes carry the bits of
//! the leading octet that belong to the encoded value.

/// A length whose leading octet has been classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// Final length, fully encoded in the leading octet.
    Small(usize),
    /// One continuation octet plus the medium bias.
    Medium,
    /// Four big-endian continuation octets plus the large bias.
    Large,
}

/// An index whose leading octet has been classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    /// Final index.
    Small(usize),
    /// High bits; one continuation octet follows.
    Medium(usize),
    /// High bits; two continuation octets follow.
    Large(usize),
    /// Three continuation octets follow, the first contributes its low nibble.
    LargeLarge,
}

/// Biases of the index tiers for one bit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBiases {
    pub medium: usize,
    pub large: usize,
    pub large_large: usize,
}

/// Integers starting on the second bit (identifying strings, attribute
/// names, name surrogates).
pub const SECOND_BIT: IndexBiases = IndexBiases {
    medium: 64,
    large: 8256,
    large_large: 0,
};

/// Integers starting on the third bit (element names).
pub const THIRD_BIT: IndexBiases = IndexBiases {
    medium: 32,
    large: 2080,
    large_large: 526_368,
};

/// Integers starting on the fourth bit (character chunk indices).
pub const FOURTH_BIT: IndexBiases = IndexBiases {
    medium: 16,
    large: 1040,
    large_large: 263_184,
};

/// Biases of the length tiers for one bit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBiases {
    pub medium: usize,
    pub large: usize,
}

/// Non-empty octet strings starting on the second bit.
pub const LENGTH_SECOND_BIT: LengthBiases = LengthBiases { medium: 65, large: 321 };
/// Octet strings starting on the fifth bit.
pub const LENGTH_FIFTH_BIT: LengthBiases = LengthBiases { medium: 9, large: 265 };
/// Octet strings starting on the seventh bit.
pub const LENGTH_SEVENTH_BIT: LengthBiases = LengthBiases { medium: 3, large: 259 };

/// Identifying string on the first bit, non-empty octet string or integer
/// on the second bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifying {
    Literal(Length),
    Index(Index),
    Illegal,
}

pub fn identifying(b: u8) -> Identifying {
    match b {
        0x00..=0x3F => Identifying::Literal(Length::Small(usize::from(b) + 1)),
        0x40 => Identifying::Literal(Length::Medium),
        0x60 => Identifying::Literal(Length::Large),
        0x80..=0xFF => match second_bit_index(b) {
            Some(index) => Identifying::Index(index),
            None => Identifying::Illegal,
        },
        _ => Identifying::Illegal,
    }
}

/// Integer on the second bit (`1` marker bit already part of `b`).
pub fn second_bit_index(b: u8) -> Option<Index> {
    match b {
        0x80..=0xBF => Some(Index::Small(usize::from(b & 0x3F))),
        0xC0..=0xDF => Some(Index::Medium(usize::from(b & 0x1F))),
        0xE0..=0xEF => Some(Index::Large(usize::from(b & 0x0F))),
        _ => None,
    }
}

/// Identifying string in a prefix or namespace name context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixNamespace {
    Literal(Length),
    /// The built-in `xml` prefix / XML namespace.
    IndexZero,
    /// A user entry; the built-in occupies wire index 0.
    Index(Index),
    Illegal,
}

/// Leading octet of a prefix or namespace name that is index zero.
pub const INDEX_ZERO: u8 = 0x80;

pub fn prefix_namespace(b: u8) -> PrefixNamespace {
    if b == INDEX_ZERO {
        return PrefixNamespace::IndexZero;
    }
    match identifying(b) {
        Identifying::Literal(length) => PrefixNamespace::Literal(length),
        Identifying::Index(index) => PrefixNamespace::Index(index),
        Identifying::Illegal => PrefixNamespace::Illegal,
    }
}

/// Non-identifying string on the first bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonIdentifying {
    Utf8 { add_to_table: bool, length: Length },
    Utf16 { add_to_table: bool, length: Length },
    /// Identifier continues in the next octet, which also carries the length.
    RestrictedAlphabet { add_to_table: bool, id_high: u8 },
    /// Identifier continues in the next octet, which also carries the length.
    EncodingAlgorithm { add_to_table: bool, id_high: u8 },
    Index(Index),
    Empty,
    Illegal,
}

pub fn non_identifying(b: u8) -> NonIdentifying {
    if b & 0x80 == 0 {
        let add_to_table = b & 0x40 != 0;
        let low = b & 0x0F;
        return match (b >> 4) & 0x03 {
            0 => match length_fifth_bit(low) {
                Some(length) => NonIdentifying::Utf8 { add_to_table, length },
                None => NonIdentifying::Illegal,
            },
            1 => match length_fifth_bit(low) {
                Some(length) => NonIdentifying::Utf16 { add_to_table, length },
                None => NonIdentifying::Illegal,
            },
            2 => NonIdentifying::RestrictedAlphabet { add_to_table, id_high: low },
            _ => NonIdentifying::EncodingAlgorithm { add_to_table, id_high: low },
        };
    }
    if b == 0xFF {
        return NonIdentifying::Empty;
    }
    match second_bit_index(b) {
        Some(index) => NonIdentifying::Index(index),
        None => NonIdentifying::Illegal,
    }
}

/// Octet string length starting on the fifth bit (low nibble).
pub fn length_fifth_bit(nibble: u8) -> Option<Length> {
    match nibble & 0x0F {
        n @ 0x00..=0x07 => Some(Length::Small(usize::from(n) + 1)),
        0x08 => Some(Length::Medium),
        0x0C => Some(Length::Large),
        _ => None,
    }
}

/// Octet string length starting on the seventh bit (low two bits).
pub fn length_seventh_bit(bits: u8) -> Length {
    match bits & 0x03 {
        0 => Length::Small(1),
        1 => Length::Small(2),
        2 => Length::Medium,
        _ => Length::Large,
    }
}

/// Character content chunk (leading octet in `0x80..=0xBF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterChunk {
    Utf8 { add_to_table: bool, length: Length },
    Utf16 { add_to_table: bool, length: Length },
    /// Two high identifier bits; the next octet holds the rest and the length.
    RestrictedAlphabet { add_to_table: bool, id_high: u8 },
    /// Two high identifier bits; the next octet holds the rest and the length.
    EncodingAlgorithm { add_to_table: bool, id_high: u8 },
    Index(Index),
    Illegal,
}

pub fn character_chunk(b: u8) -> CharacterChunk {
    if b & 0xC0 != 0x80 {
        return CharacterChunk::Illegal;
    }
    if b & 0x20 == 0 {
        let add_to_table = b & 0x10 != 0;
        let low = b & 0x03;
        return match (b >> 2) & 0x03 {
            0 => CharacterChunk::Utf8 { add_to_table, length: length_seventh_bit(low) },
            1 => CharacterChunk::Utf16 { add_to_table, length: length_seventh_bit(low) },
            2 => CharacterChunk::RestrictedAlphabet { add_to_table, id_high: low },
            _ => CharacterChunk::EncodingAlgorithm { add_to_table, id_high: low },
        };
    }
    match b {
        0xA0..=0xAF => CharacterChunk::Index(Index::Small(usize::from(b & 0x0F))),
        0xB0..=0xB3 => CharacterChunk::Index(Index::Medium(usize::from(b & 0x03))),
        0xB4..=0xB7 => CharacterChunk::Index(Index::Large(usize::from(b & 0x03))),
        0xB8 => CharacterChunk::Index(Index::LargeLarge),
        _ => CharacterChunk::Illegal,
    }
}

/// Element name part of an element leading octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementName {
    Index(Index),
    /// Literal qualified name; the value holds the prefix (0x02) and
    /// namespace (0x01) flags.
    Literal(u8),
    /// Namespace attributes follow, then another leading octet.
    Namespaces,
}

/// Item leading octet inside an element, a fragment or the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Element { attributes: bool, name: ElementName },
    Characters,
    DocumentType { system: bool, public: bool },
    EntityReference { system: bool, public: bool },
    ProcessingInstruction,
    Comment,
    Terminator,
    DoubleTerminator,
    Illegal,
}

pub const TERMINATOR: u8 = 0xF0;
pub const DOUBLE_TERMINATOR: u8 = 0xFF;
pub const PROCESSING_INSTRUCTION: u8 = 0xE1;
pub const COMMENT: u8 = 0xE2;

/// Element leading octet (first bit 0).
pub fn element(b: u8) -> Item {
    let attributes = b & 0x40 != 0;
    let name = match b & 0x3F {
        low @ 0x00..=0x1F => ElementName::Index(Index::Small(usize::from(low))),
        low @ 0x20..=0x27 => ElementName::Index(Index::Medium(usize::from(low & 0x07))),
        low @ 0x28..=0x2F => ElementName::Index(Index::Large(usize::from(low & 0x07))),
        0x30 => ElementName::Index(Index::LargeLarge),
        0x38 => ElementName::Namespaces,
        low @ 0x3C..=0x3F => ElementName::Literal(low & 0x03),
        _ => return Item::Illegal,
    };
    Item::Element { attributes, name }
}

/// Children of an element, and top-level items of a fragment.
pub fn element_child(b: u8) -> Item {
    match b {
        0x00..=0x7F => element(b),
        0x80..=0xBF => Item::Characters,
        0xC8..=0xCB => Item::EntityReference {
            system: b & 0x02 != 0,
            public: b & 0x01 != 0,
        },
        PROCESSING_INSTRUCTION => Item::ProcessingInstruction,
        COMMENT => Item::Comment,
        TERMINATOR => Item::Terminator,
        DOUBLE_TERMINATOR => Item::DoubleTerminator,
        _ => Item::Illegal,
    }
}

/// Children of the document.
pub fn document_child(b: u8) -> Item {
    match b {
        0x00..=0x7F => element(b),
        0xC4..=0xC7 => Item::DocumentType {
            system: b & 0x02 != 0,
            public: b & 0x01 != 0,
        },
        PROCESSING_INSTRUCTION => Item::ProcessingInstruction,
        COMMENT => Item::Comment,
        TERMINATOR => Item::Terminator,
        DOUBLE_TERMINATOR => Item::DoubleTerminator,
        _ => Item::Illegal,
    }
}

/// Attribute leading octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Index(Index),
    /// Literal qualified name with prefix/namespace flags.
    Literal(u8),
    Terminator,
    DoubleTerminator,
    Illegal,
}

pub fn attribute(b: u8) -> Attribute {
    match b {
        0x00..=0x3F => Attribute::Index(Index::Small(usize::from(b))),
        0x40..=0x5F => Attribute::Index(Index::Medium(usize::from(b & 0x1F))),
        0x60..=0x6F => Attribute::Index(Index::Large(usize::from(b & 0x0F))),
        0x78..=0x7B => Attribute::Literal(b & 0x03),
        TERMINATOR => Attribute::Terminator,
        DOUBLE_TERMINATOR => Attribute::DoubleTerminator,
        _ => Attribute::Illegal,
    }
}

/// Namespace attribute leading octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceAttribute {
    Declaration { prefix: bool, namespace: bool },
    Terminator,
    Illegal,
}

pub fn namespace_attribute(b: u8) -> NamespaceAttribute {
    if b & 0xFC == 0xCC {
        NamespaceAttribute::Declaration {
            prefix: b & 0x02 != 0,
            namespace: b & 0x01 != 0,
        }
    } else if b == TERMINATOR {
        NamespaceAttribute::Terminator
    } else {
        NamespaceAttribute::Illegal
    }
}

/// Length of a sequence (vocabulary partitions, additional data).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceLength {
    Small(usize),
    /// Low nibble; two continuation octets follow, bias 129.
    Large(usize),
    Illegal,
}

pub const SEQUENCE_LARGE_BIAS: usize = 129;

pub fn sequence_length(b: u8) -> SequenceLength {
    match b {
        0x00..=0x7F => SequenceLength::Small(usize::from(b) + 1),
        0x80..=0x8F => SequenceLength::Large(usize::from(b & 0x0F)),
        _ => SequenceLength::Illegal,
    }
}

/// Notation entry leading octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    Entry { system: bool, public: bool },
    Terminator,
    Illegal,
}

pub fn notation(b: u8) -> Notation {
    if b & 0xFC == 0xC0 {
        Notation::Entry {
            system: b & 0x02 != 0,
            public: b & 0x01 != 0,
        }
    } else if b == TERMINATOR {
        Notation::Terminator
    } else {
        Notation::Illegal
    }
}

/// Unparsed entity leading octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnparsedEntity {
    Entry { public: bool },
    Terminator,
    Illegal,
}

pub fn unparsed_entity(b: u8) -> UnparsedEntity {
    if b & 0xFE == 0xD0 {
        UnparsedEntity::Entry { public: b & 0x01 != 0 }
    } else if b == TERMINATOR {
        UnparsedEntity::Terminator
    } else {
        UnparsedEntity::Illegal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count<T>(f: impl Fn(u8) -> T, pred: impl Fn(&T) -> bool) -> usize {
        (0..=255u8).map(f).filter(|s| pred(s)).count()
    }

    #[test]
    fn identifying_partitions_all_octets() {
        assert_eq!(count(identifying, |s| matches!(s, Identifying::Literal(_))), 66);
        assert_eq!(count(identifying, |s| matches!(s, Identifying::Index(_))), 112);
        assert_eq!(count(identifying, |s| matches!(s, Identifying::Illegal)), 78);
    }

    #[test]
    fn identifying_tier_boundaries() {
        assert_eq!(identifying(0x3F), Identifying::Literal(Length::Small(64)));
        assert_eq!(identifying(0x40), Identifying::Literal(Length::Medium));
        assert_eq!(identifying(0x41), Identifying::Illegal);
        assert_eq!(identifying(0xBF), Identifying::Index(Index::Small(63)));
        assert_eq!(identifying(0xC0), Identifying::Index(Index::Medium(0)));
        assert_eq!(identifying(0xEF), Identifying::Index(Index::Large(0x0F)));
        assert_eq!(identifying(0xF0), Identifying::Illegal);
    }

    #[test]
    fn prefix_namespace_index_zero() {
        assert_eq!(prefix_namespace(0x80), PrefixNamespace::IndexZero);
        assert_eq!(prefix_namespace(0x81), PrefixNamespace::Index(Index::Small(1)));
        assert_eq!(prefix_namespace(0x02), PrefixNamespace::Literal(Length::Small(3)));
        assert_eq!(prefix_namespace(0x23), PrefixNamespace::Literal(Length::Small(36)));
        let index_zero = count(prefix_namespace, |s| matches!(s, PrefixNamespace::IndexZero));
        assert_eq!(index_zero, 1);
    }

    #[test]
    fn non_identifying_partitions_all_octets() {
        assert_eq!(count(non_identifying, |s| matches!(s, NonIdentifying::Utf8 { .. })), 20);
        assert_eq!(count(non_identifying, |s| matches!(s, NonIdentifying::Utf16 { .. })), 20);
        assert_eq!(
            count(non_identifying, |s| matches!(s, NonIdentifying::RestrictedAlphabet { .. })),
            32
        );
        assert_eq!(
            count(non_identifying, |s| matches!(s, NonIdentifying::EncodingAlgorithm { .. })),
            32
        );
        assert_eq!(count(non_identifying, |s| matches!(s, NonIdentifying::Index(_))), 112);
        assert_eq!(count(non_identifying, |s| matches!(s, NonIdentifying::Empty)), 1);
        assert_eq!(count(non_identifying, |s| matches!(s, NonIdentifying::Illegal)), 39);
    }

    #[test]
    fn non_identifying_shapes() {
        assert_eq!(
            non_identifying(0x47),
            NonIdentifying::Utf8 { add_to_table: true, length: Length::Small(8) }
        );
        assert_eq!(
            non_identifying(0x18),
            NonIdentifying::Utf16 { add_to_table: false, length: Length::Medium }
        );
        assert_eq!(
            non_identifying(0x0C),
            NonIdentifying::Utf8 { add_to_table: false, length: Length::Large }
        );
        assert_eq!(non_identifying(0x09), NonIdentifying::Illegal);
        assert_eq!(
            non_identifying(0x6A),
            NonIdentifying::RestrictedAlphabet { add_to_table: true, id_high: 0x0A }
        );
        assert_eq!(non_identifying(0xFE), NonIdentifying::Illegal);
    }

    #[test]
    fn character_chunk_partitions_all_octets() {
        let illegal = count(character_chunk, |s| matches!(s, CharacterChunk::Illegal));
        // 192 ausserhalb von 10xxxxxx, dazu 0xB9..=0xBF
        assert_eq!(illegal, 192 + 7);
        assert_eq!(count(character_chunk, |s| matches!(s, CharacterChunk::Index(_))), 25);
        assert_eq!(character_chunk(0x80), CharacterChunk::Utf8 { add_to_table: false, length: Length::Small(1) });
        assert_eq!(character_chunk(0x93), CharacterChunk::Utf8 { add_to_table: true, length: Length::Large });
        assert_eq!(character_chunk(0x86), CharacterChunk::Utf16 { add_to_table: false, length: Length::Medium });
        assert_eq!(character_chunk(0x8B), CharacterChunk::RestrictedAlphabet { add_to_table: false, id_high: 3 });
        assert_eq!(character_chunk(0x9C), CharacterChunk::EncodingAlgorithm { add_to_table: true, id_high: 0 });
        assert_eq!(character_chunk(0xB8), CharacterChunk::Index(Index::LargeLarge));
    }

    #[test]
    fn element_partitions_all_octets() {
        let elements = count(element_child, |s| matches!(s, Item::Element { .. }));
        assert_eq!(elements, 108);
        assert_eq!(element(0x1F), Item::Element { attributes: false, name: ElementName::Index(Index::Small(31)) });
        assert_eq!(element(0x60), Item::Element { attributes: true, name: ElementName::Index(Index::Medium(0)) });
        assert_eq!(element(0x2F), Item::Element { attributes: false, name: ElementName::Index(Index::Large(7)) });
        assert_eq!(element(0x70), Item::Element { attributes: true, name: ElementName::Index(Index::LargeLarge) });
        assert_eq!(element(0x78), Item::Element { attributes: true, name: ElementName::Namespaces });
        assert_eq!(element(0x3D), Item::Element { attributes: false, name: ElementName::Literal(1) });
        assert_eq!(element(0x31), Item::Illegal);
        assert_eq!(element(0x3B), Item::Illegal);
    }

    #[test]
    fn element_and_document_children() {
        assert_eq!(element_child(0x95), Item::Characters);
        assert_eq!(element_child(0xCA), Item::EntityReference { system: true, public: false });
        assert_eq!(element_child(0xC4), Item::Illegal);
        assert_eq!(document_child(0xC5), Item::DocumentType { system: false, public: true });
        assert_eq!(document_child(0x95), Item::Illegal);
        assert_eq!(document_child(0xCA), Item::Illegal);
        for b in [TERMINATOR, DOUBLE_TERMINATOR, COMMENT, PROCESSING_INSTRUCTION] {
            assert_ne!(element_child(b), Item::Illegal);
            assert_ne!(document_child(b), Item::Illegal);
        }
        let legal_document = count(document_child, |s| !matches!(s, Item::Illegal));
        assert_eq!(legal_document, 108 + 4 + 4);
    }

    #[test]
    fn attribute_partitions_all_octets() {
        assert_eq!(count(attribute, |s| matches!(s, Attribute::Index(_))), 64 + 32 + 16);
        assert_eq!(count(attribute, |s| matches!(s, Attribute::Literal(_))), 4);
        assert_eq!(attribute(0x7B), Attribute::Literal(3));
        assert_eq!(attribute(0x70), Attribute::Illegal);
        assert_eq!(attribute(0xF0), Attribute::Terminator);
        assert_eq!(attribute(0xFF), Attribute::DoubleTerminator);
    }

    #[test]
    fn namespace_attribute_octets() {
        assert_eq!(
            namespace_attribute(0xCF),
            NamespaceAttribute::Declaration { prefix: true, namespace: true }
        );
        assert_eq!(
            namespace_attribute(0xCD),
            NamespaceAttribute::Declaration { prefix: false, namespace: true }
        );
        assert_eq!(namespace_attribute(0xF0), NamespaceAttribute::Terminator);
        assert_eq!(namespace_attribute(0xFF), NamespaceAttribute::Illegal);
    }

    #[test]
    fn sequence_length_boundaries() {
        assert_eq!(sequence_length(0x00), SequenceLength::Small(1));
        assert_eq!(sequence_length(0x7F), SequenceLength::Small(128));
        assert_eq!(sequence_length(0x80), SequenceLength::Large(0));
        assert_eq!(sequence_length(0x8F), SequenceLength::Large(0x0F));
        assert_eq!(sequence_length(0x90), SequenceLength::Illegal);
    }

    #[test]
    fn notation_and_unparsed_entity_octets() {
        assert_eq!(notation(0xC3), Notation::Entry { system: true, public: true });
        assert_eq!(notation(0xF0), Notation::Terminator);
        assert_eq!(notation(0xC4), Notation::Illegal);
        assert_eq!(unparsed_entity(0xD1), UnparsedEntity::Entry { public: true });
        assert_eq!(unparsed_entity(0xD2), UnparsedEntity::Illegal);
        assert_eq!(unparsed_entity(0xF0), UnparsedEntity::Terminator);
    }
}
