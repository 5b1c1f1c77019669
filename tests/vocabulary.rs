//! Initiales Vokabular und externe Vokabulare.

use finf::decoder::Decoder;
use finf::event::{Content, Event};
use finf::options::DecoderOptions;
use finf::qname::QualifiedName;
use finf::vocabulary::{Partition, Vocabulary};

include!("common/builder.rs");

/// Alle zwölf Partitionen mit je zwei Einträgen.
fn full_vocabulary() -> Bytes {
    Bytes::new()
        .header(0x20)
        .raw(&[0x0F, 0xFF])
        // Restricted Alphabets
        .raw(&[0x01])
        .value("ab", false)
        .value("xyz", false)
        // Encoding Algorithms
        .raw(&[0x01])
        .ident("urn:a1")
        .ident("urn:a2")
        // Prefixes
        .raw(&[0x01])
        .ident("p")
        .ident("q")
        // Namespace Names
        .raw(&[0x01])
        .ident("urn:p")
        .ident("urn:q")
        // Local Names
        .raw(&[0x01])
        .ident("a")
        .ident("b")
        // Other NCNames
        .raw(&[0x01])
        .ident("n1")
        .ident("n2")
        // Other URIs
        .raw(&[0x01])
        .ident("u1")
        .ident("u2")
        // Attribute Values
        .raw(&[0x01])
        .ident("v1")
        .ident("v2")
        // Character Chunks
        .raw(&[0x01])
        .value("c1", false)
        .value("c2", false)
        // Other Strings
        .raw(&[0x01])
        .value("s1", false)
        .value("s2", false)
        // Element Name Surrogates: a, p:b
        .raw(&[0x01, 0x00, 0x00, 0x03, 0x01, 0x01, 0x01])
        // Attribute Name Surrogates: a, q:b
        .raw(&[0x01, 0x00, 0x00, 0x03, 0x02, 0x02, 0x01])
}

/// Das Vokabular wird exakt verbraucht: das folgende Dokument beginnt
/// genau dahinter.
#[test]
fn all_partitions_consume_exactly() {
    let first = full_vocabulary().raw(&[0xF0]).build();
    let second = Bytes::new().header(0x00).raw(&[0x3C]).ident("r").raw(&[0xFF]).build();
    let bytes = [first, second].concat();

    let options = DecoderOptions::default().with_multiple_documents();
    let mut decoder = Decoder::with_options(&bytes[..], options);
    assert_eq!(decoder.next_event().unwrap(), Some(Event::StartDocument));

    let v = decoder.vocabulary();
    assert_eq!(v.restricted_alphabets().len(), 2);
    assert_eq!(v.strings(Partition::EncodingAlgorithm).len(), 2);
    assert_eq!(v.strings(Partition::Prefix).len(), 3);
    assert_eq!(v.strings(Partition::NamespaceName).len(), 3);
    for partition in [
        Partition::LocalName,
        Partition::OtherNcName,
        Partition::OtherUri,
        Partition::AttributeValue,
        Partition::CharacterChunk,
        Partition::OtherString,
    ] {
        assert_eq!(v.strings(partition).len(), 2, "{partition:?}");
    }
    let element = v.element_names().at_index(1).unwrap();
    assert_eq!(element.to_string(), "{urn:p}p:b");
    let attribute = v.attribute_names().at_index(1).unwrap();
    assert_eq!(attribute.qname(), "q:b");
    assert!(attribute.attribute_key().is_some());

    let events: Vec<Event> = decoder.collect::<finf::Result<_>>().unwrap();
    assert_eq!(events.len(), 5);
    assert_eq!(events[1], Event::StartDocument);
}

/// Einträge des Prologs werden im Dokument per Index referenziert.
#[test]
fn prologue_entries_referenced_by_index() {
    // Wurzel a mit Attribut a="v2", Inhalt: Chunk 1 ("c2"), Kommentar "s1"
    let bytes = full_vocabulary()
        .raw(&[0x40, 0x00, 0x81, 0xF0, 0xA1, 0xE2, 0x80, 0xFF])
        .build();
    let events = finf::decode(&bytes).unwrap();
    let Event::StartElement { name, attributes, .. } = &events[1] else {
        panic!("unexpected {:?}", events[1]);
    };
    assert_eq!(name.qname(), "a");
    assert_eq!(attributes[0].value, Content::Text("v2".into()));
    assert_eq!(events[2], Event::Characters(Content::Text("c2".into())));
    assert_eq!(events[3], Event::Comment(Content::Text("s1".into())));
}

/// Partitionen des externen Vokabulars liegen vor denen des Dokuments.
#[test]
fn external_entries_precede_document_entries() {
    let mut external = Vocabulary::new();
    external.add_string(Partition::Prefix, "e");
    external.add_string(Partition::NamespaceName, "urn:e");
    external.add_string(Partition::LocalName, "item");
    external.add_element_name(QualifiedName::new("e", "urn:e", "item"));
    external.add_restricted_alphabet("01");

    let bytes = Bytes::new()
        .header(0x20)
        .raw(&[0x12, 0x00])
        .ident("urn:ext")
        .raw(&[0x00])
        .ident("p")
        // Wurzel: externer Name, Namespace-Bindung nicht geprüft
        .raw(&[0x00, 0xFF])
        .build();

    let options = DecoderOptions::default().with_external_vocabulary("urn:ext", external);
    let mut decoder = Decoder::with_options(&bytes[..], options);
    decoder.next_event().unwrap();
    let v = decoder.vocabulary();
    assert_eq!(v.external_vocabulary(), Some("urn:ext"));
    let prefixes: Vec<&str> = v.strings(Partition::Prefix).iter().map(|p| &**p).collect();
    assert_eq!(prefixes, ["xml", "e", "p"]);
    assert_eq!(v.restricted_alphabets().len(), 1);

    let Some(Event::StartElement { name, .. }) = decoder.next_event().unwrap() else {
        panic!("expected StartElement");
    };
    assert_eq!(name.to_string(), "{urn:e}e:item");
}

/// Externe Vokabulare werden beim Registrieren kopiert.
#[test]
fn registered_vocabulary_is_a_copy() {
    let mut external = Vocabulary::new();
    external.add_string(Partition::LocalName, "one");
    let options = DecoderOptions::default().with_external_vocabulary("urn:ext", external.clone());
    external.add_string(Partition::LocalName, "two");

    let bytes = Bytes::new()
        .header(0x20)
        .raw(&[0x10, 0x00])
        .ident("urn:ext")
        .raw(&[0xF0])
        .build();
    let mut decoder = Decoder::with_options(&bytes[..], options);
    decoder.next_event().unwrap();
    assert_eq!(decoder.vocabulary().strings(Partition::LocalName).len(), 1);
}

/// Index jenseits der Tabelle.
#[test]
fn index_out_of_range() {
    let bytes = full_vocabulary().raw(&[0x3C, 0x85, 0xFF]).build();
    let err = finf::decode(&bytes).unwrap_err();
    assert_eq!(err, finf::Error::IndexOutOfRange { table: "local name", index: 6 });
}
