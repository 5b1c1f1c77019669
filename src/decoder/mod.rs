//! Streaming Fast Infoset decoder.
//!
//! [`Decoder`] pulls one [`Event`] at a time from a byte source. The
//! document prologue (header, optional components, initial vocabulary) is
//! decoded before `StartDocument` is returned; notations, unparsed
//! entities, additional data and document properties are available through
//! accessors from then on.
//!
//! # Beispiel
//!
//! ```
//! use finf::decoder::Decoder;
//! use finf::event::Event;
//!
//! // <root/>: Signatur, keine optionalen Komponenten, Element mit
//! // Literalnamen "root", Element- und Dokumentende.
//! let bytes = [0xE0, 0x00, 0x00, 0x01, 0x00, 0x3C, 0x03, b'r', b'o', b'o', b't', 0xFF];
//! let mut decoder = Decoder::new(&bytes[..]);
//!
//! assert_eq!(decoder.next_event().unwrap(), Some(Event::StartDocument));
//! match decoder.next_event().unwrap() {
//!     Some(Event::StartElement { name, .. }) => assert_eq!(name.qname(), "root"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! assert!(matches!(decoder.next_event().unwrap(), Some(Event::EndElement { .. })));
//! assert_eq!(decoder.next_event().unwrap(), Some(Event::EndDocument));
//! assert_eq!(decoder.next_event().unwrap(), None);
//! ```

mod api;
mod element;
mod prolog;

pub use api::{decode, decode_with_options};

use std::io::Read;
use std::rc::Rc;

use log::{debug, warn};

use crate::algorithm::{AlgorithmData, EncodingAlgorithm};
use crate::duplicate_attribute::DuplicateAttributeVerifier;
use crate::error::{Error, Result};
use crate::event::{AdditionalData, Content, DocumentProperties, Event, Notation, UnparsedEntity};
use crate::header::Header;
use crate::namespace::NamespaceScopes;
use crate::octet_buffer::OctetBuffer;
use crate::options::DecoderOptions;
use crate::qname::QualifiedName;
use crate::string::StringDecoder;
use crate::vocabulary::{Ownership, Vocabulary};

/// Position of the decoder in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Next call decodes a header and the document prologue.
    Header,
    /// Inside the document body.
    Body,
    /// A document ended; another one may follow.
    BetweenDocuments,
    /// End of input or after an error.
    Done,
}

/// Pull decoder over a byte source.
pub struct Decoder<R> {
    strings: StringDecoder<R>,
    options: DecoderOptions,
    /// Caller supplied vocabulary every document starts from.
    base_vocabulary: Option<Rc<Vocabulary>>,
    vocabulary: Vocabulary,
    scopes: NamespaceScopes,
    duplicates: DuplicateAttributeVerifier,
    /// Offene Elemente, innerstes zuletzt.
    elements: Vec<Rc<QualifiedName>>,
    /// Terminators already read but not applied yet.
    pending_terminators: usize,
    state: State,
    header: Header,
    properties: DocumentProperties,
    notations: Vec<Notation>,
    unparsed_entities: Vec<UnparsedEntity>,
    additional_data: Vec<AdditionalData>,
    document_element_seen: bool,
    document_type_seen: bool,
    /// Number of documents started on this source.
    documents: usize,
    /// Scratch buffer for qualified name display strings.
    scratch: String,
}

impl<R: Read> Decoder<R> {
    /// Creates a decoder with default options.
    pub fn new(source: R) -> Self {
        Self::with_options(source, DecoderOptions::default())
    }

    /// Creates a decoder with the given options.
    pub fn with_options(source: R, options: DecoderOptions) -> Self {
        let octets = OctetBuffer::with_capacity(source, options.buffer_size);
        Self {
            strings: StringDecoder::new(octets, options.string_interning),
            options,
            base_vocabulary: None,
            vocabulary: Vocabulary::new(),
            scopes: NamespaceScopes::new(),
            duplicates: DuplicateAttributeVerifier::new(),
            elements: Vec::new(),
            pending_terminators: 0,
            state: State::Header,
            header: Header::default(),
            properties: DocumentProperties::default(),
            notations: Vec::new(),
            unparsed_entities: Vec::new(),
            additional_data: Vec::new(),
            document_element_seen: false,
            document_type_seen: false,
            documents: 0,
            scratch: String::new(),
        }
    }

    /// Creates a decoder whose documents start from `vocabulary`.
    ///
    /// The vocabulary is copied for each document and never modified.
    pub fn with_vocabulary(source: R, options: DecoderOptions, vocabulary: Vocabulary) -> Self {
        let mut decoder = Self::with_options(source, options);
        decoder.base_vocabulary = Some(Rc::new(vocabulary));
        decoder
    }

    /// Replaces the source and starts over with the next `next_event`.
    pub fn reset(&mut self, source: R) {
        let octets = OctetBuffer::with_capacity(source, self.options.buffer_size);
        self.strings = StringDecoder::new(octets, self.options.string_interning);
        self.state = State::Header;
        self.documents = 0;
    }

    /// Records a new initial buffer size for [`reset`](Self::reset).
    ///
    /// Only sizes below the current capacity are taken over; the buffer
    /// still grows on demand.
    pub fn set_buffer_size(&mut self, size: usize) {
        if size < self.strings.octets.capacity() {
            self.options.buffer_size = size;
        }
    }

    /// Decodes the next event; `Ok(None)` once the input is finished.
    ///
    /// Errors are fatal: every later call returns `Ok(None)`.
    pub fn next_event(&mut self) -> Result<Option<Event>> {
        match self.step() {
            Ok(event) => Ok(event),
            Err(e) => {
                debug!("decoding aborted after {} document(s): {e}", self.documents);
                self.state = State::Done;
                Err(e)
            }
        }
    }

    fn step(&mut self) -> Result<Option<Event>> {
        loop {
            match self.state {
                State::Done => return Ok(None),
                State::Header => {
                    self.start_document()?;
                    self.state = State::Body;
                    return Ok(Some(Event::StartDocument));
                }
                State::Body => return self.body_event().map(Some),
                State::BetweenDocuments => {
                    if self.strings.octets.is_exhausted()? {
                        self.finish();
                        return Ok(None);
                    }
                    self.state = State::Header;
                }
            }
        }
    }

    /// Called once the document terminator was read.
    fn end_document(&mut self) -> Result<Event> {
        if !self.elements.is_empty() {
            return Err(Error::malformed("document ended with open elements"));
        }
        debug!("document {} ended at octet {}", self.documents, self.strings.octets.position());
        self.pending_terminators = 0;
        if self.options.multiple_documents {
            self.state = State::BetweenDocuments;
        } else {
            self.finish();
        }
        Ok(Event::EndDocument)
    }

    fn finish(&mut self) {
        self.state = State::Done;
        if self.options.force_stream_close {
            self.strings.octets.close();
        }
    }

    /// Resets per-document state before a new header.
    fn reset_document(&mut self) {
        self.vocabulary = match &self.base_vocabulary {
            Some(base) => Vocabulary::clone(base),
            None => Vocabulary::new(),
        };
        self.strings.clear_interned();
        self.scopes.reset();
        self.elements.clear();
        self.pending_terminators = 0;
        self.properties = DocumentProperties::default();
        self.notations.clear();
        self.unparsed_entities.clear();
        self.additional_data.clear();
        self.document_element_seen = false;
        self.document_type_seen = false;
    }

    /// Logs application algorithm payloads nobody can interpret.
    fn check_algorithm(&self, content: &Content) {
        if let Content::Algorithm(data) = content
            && let Some(uri) = data.uri()
            && self.options.encoding_algorithm(uri).is_none()
        {
            warn!("no encoding algorithm registered for '{uri}'");
        }
    }

    // --- Accessors ---

    /// Header of the current document.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Character encoding scheme, standalone and version of the current document.
    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    /// Notations of the current document.
    pub fn notations(&self) -> &[Notation] {
        &self.notations
    }

    /// Unparsed entities of the current document.
    pub fn unparsed_entities(&self) -> &[UnparsedEntity] {
        &self.unparsed_entities
    }

    /// Additional data items of the current document.
    pub fn additional_data(&self) -> &[AdditionalData] {
        &self.additional_data
    }

    /// UTF-16 units of the most recently decoded literal string.
    pub fn text_units(&self) -> &[u16] {
        self.strings.chars.as_units()
    }

    /// Working vocabulary of the current document.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Whether documents start from a caller supplied vocabulary.
    pub fn ownership(&self) -> Ownership {
        if self.base_vocabulary.is_some() {
            Ownership::External
        } else {
            Ownership::Internal
        }
    }

    /// Decoder options.
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Depth of open elements.
    pub fn depth(&self) -> usize {
        self.elements.len()
    }

    /// Registered application encoding algorithm for `uri`.
    pub fn encoding_algorithm(&self, uri: &str) -> Option<&Rc<dyn EncodingAlgorithm>> {
        self.options.encoding_algorithm(uri)
    }

    /// Renders an algorithm payload as text: built-in algorithms directly,
    /// application algorithms through their registered implementation.
    pub fn algorithm_text(&self, data: &AlgorithmData) -> Result<Option<String>> {
        if data.is_builtin() {
            return data.to_text();
        }
        match data.uri().and_then(|uri| self.encoding_algorithm(uri)) {
            Some(algorithm) => algorithm.decode_to_text(data.octets()).map(Some),
            None => Ok(None),
        }
    }

    /// True once the source was closed by `force_stream_close`.
    pub fn is_source_closed(&self) -> bool {
        self.strings.octets.is_closed()
    }

    /// Returns the source; `None` if it was force-closed.
    pub fn into_inner(self) -> Option<R> {
        self.strings.octets.into_inner()
    }
}

impl<R: Read> Iterator for Decoder<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event().transpose()
    }
}

// ============================================================================
// Tests
// ============================================================================
