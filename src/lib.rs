//! finf – streaming Fast Infoset (ITU-T X.891) decoder
//!
//! # Beispiel
//!
//! ```
//! use finf::{Content, Event};
//! use finf::decoder::decode;
//!
//! // <greeting>Hello</greeting>
//! let bytes = [
//!     0xE0, 0x00, 0x00, 0x01, // Signatur
//!     0x00,                   // keine optionalen Komponenten
//!     0x3C, 0x07, b'g', b'r', b'e', b'e', b't', b'i', b'n', b'g',
//!     0x82, 0x02, b'H', b'e', b'l', b'l', b'o', // UTF-8-Chunk, Laenge 3 + 2
//!     0xFF,                   // Element- und Dokumentende
//! ];
//!
//! let events = decode(&bytes).unwrap();
//! assert_eq!(events.len(), 5);
//! assert_eq!(events[2], Event::Characters(Content::Text("Hello".into())));
//! ```

pub mod algorithm;
pub mod alphabet;
pub mod chars;
pub mod decoder;
pub mod duplicate_attribute;
pub mod error;
pub mod event;
pub mod header;
pub mod namespace;
pub mod octet_buffer;
pub mod options;
pub mod qname;
pub mod state_table;
pub mod string;
pub mod table;
pub mod vocabulary;

pub use error::{Error, Result};

/// HashMap mit ahash (schneller, nicht DoS-resistent; nur für interne Datenstrukturen).
pub(crate) type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

/// HashSet mit ahash.
pub(crate) type FastHashSet<K> = hashbrown::HashSet<K, ahash::RandomState>;

/// IndexMap mit ahash (deterministische Iteration + schnelles Hashing).
pub(crate) type FastIndexMap<K, V> = indexmap::IndexMap<K, V, ahash::RandomState>;

// Public API: Events
pub use event::{
    AdditionalData, Attribute, Content, DocumentProperties, Event, NamespaceDeclaration, Notation,
    ProcessingInstruction, UnparsedEntity,
};

// Public API: Options
pub use options::DecoderOptions;

// Public API: Header
pub use header::Header;

// Public API: Decoder
pub use decoder::{Decoder, decode, decode_with_options};

// Public API: Types
pub use algorithm::{AlgorithmData, EncodingAlgorithm};
pub use qname::QualifiedName;
pub use vocabulary::{Ownership, Partition, Vocabulary};
