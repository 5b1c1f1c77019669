//! Decoder configuration.
//!
//! # Beispiel
//!
//! ```
//! use finf::options::DecoderOptions;
//! use finf::vocabulary::{Partition, Vocabulary};
//!
//! let mut external = Vocabulary::new();
//! external.add_string(Partition::LocalName, "item");
//!
//! let opts = DecoderOptions::default()
//!     .with_string_interning()
//!     .with_multiple_documents()
//!     .with_external_vocabulary("urn:example:vocabulary", external);
//!
//! assert!(opts.string_interning());
//! assert!(opts.external_vocabulary("urn:example:vocabulary").is_some());
//! ```

use std::rc::Rc;

use crate::FastIndexMap;
use crate::algorithm::EncodingAlgorithm;
use crate::octet_buffer::DEFAULT_BUFFER_SIZE;
use crate::vocabulary::Vocabulary;

/// Options controlling how a [`crate::Decoder`] reads its source.
#[derive(Debug, Clone)]
pub struct DecoderOptions {
    pub(crate) string_interning: bool,
    pub(crate) buffer_size: usize,
    pub(crate) parse_fragments: bool,
    pub(crate) multiple_documents: bool,
    pub(crate) force_stream_close: bool,
    pub(crate) registered_encoding_algorithms: FastIndexMap<String, Rc<dyn EncodingAlgorithm>>,
    /// `None` until the first vocabulary is registered.
    pub(crate) external_vocabularies: Option<FastIndexMap<String, Rc<Vocabulary>>>,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            string_interning: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            parse_fragments: false,
            multiple_documents: false,
            force_stream_close: false,
            registered_encoding_algorithms: FastIndexMap::default(),
            external_vocabularies: None,
        }
    }
}

impl DecoderOptions {
    // --- Getter ---

    /// Decoded strings are canonicalized and shared.
    pub fn string_interning(&self) -> bool { self.string_interning }
    /// Initial capacity of the octet buffer.
    pub fn buffer_size(&self) -> usize { self.buffer_size }
    /// Top level holds element content instead of a document.
    pub fn parse_fragments(&self) -> bool { self.parse_fragments }
    /// Further documents may follow on the same source.
    pub fn multiple_documents(&self) -> bool { self.multiple_documents }
    /// The source is dropped once the final document ends.
    pub fn force_stream_close(&self) -> bool { self.force_stream_close }

    /// Application encoding algorithm registered under `uri`.
    pub fn encoding_algorithm(&self, uri: &str) -> Option<&Rc<dyn EncodingAlgorithm>> {
        self.registered_encoding_algorithms.get(uri)
    }

    /// Registered application encoding algorithms in registration order.
    pub fn encoding_algorithms(&self) -> impl Iterator<Item = (&str, &Rc<dyn EncodingAlgorithm>)> {
        self.registered_encoding_algorithms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// External vocabulary registered under `uri`.
    pub fn external_vocabulary(&self, uri: &str) -> Option<&Rc<Vocabulary>> {
        self.external_vocabularies.as_ref()?.get(uri)
    }

    /// True once any external vocabulary map was configured.
    pub fn has_external_vocabularies(&self) -> bool { self.external_vocabularies.is_some() }

    // --- Builder ---

    pub fn with_string_interning(mut self) -> Self { self.string_interning = true; self }
    pub fn with_buffer_size(mut self, size: usize) -> Self { self.buffer_size = size; self }
    pub fn with_parse_fragments(mut self) -> Self { self.parse_fragments = true; self }
    pub fn with_multiple_documents(mut self) -> Self { self.multiple_documents = true; self }
    pub fn with_force_stream_close(mut self) -> Self { self.force_stream_close = true; self }

    /// Registers an application encoding algorithm.
    pub fn with_encoding_algorithm(mut self, uri: impl Into<String>, algorithm: Rc<dyn EncodingAlgorithm>) -> Self {
        self.registered_encoding_algorithms.insert(uri.into(), algorithm);
        self
    }

    /// Registers an external vocabulary; it is copied, later changes to
    /// `vocabulary` are not seen.
    pub fn with_external_vocabulary(mut self, uri: impl Into<String>, vocabulary: Vocabulary) -> Self {
        self.set_external_vocabulary(uri, vocabulary);
        self
    }

    // --- Mutable Setter ---

    pub fn set_string_interning(&mut self, val: bool) { self.string_interning = val; }
    pub fn set_parse_fragments(&mut self, val: bool) { self.parse_fragments = val; }
    pub fn set_multiple_documents(&mut self, val: bool) { self.multiple_documents = val; }
    pub fn set_force_stream_close(&mut self, val: bool) { self.force_stream_close = val; }

    /// Ersetzt die registrierten Algorithmen.
    pub fn set_encoding_algorithms(&mut self, algorithms: FastIndexMap<String, Rc<dyn EncodingAlgorithm>>) {
        self.registered_encoding_algorithms = algorithms;
    }

    pub fn set_external_vocabulary(&mut self, uri: impl Into<String>, vocabulary: Vocabulary) {
        self.external_vocabularies
            .get_or_insert_with(FastIndexMap::default)
            .insert(uri.into(), Rc::new(vocabulary));
    }

    /// Removes every external vocabulary; referencing one becomes an error.
    pub fn clear_external_vocabularies(&mut self) { self.external_vocabularies = None; }
}
