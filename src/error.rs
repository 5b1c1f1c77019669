//! Central error types for the Fast Infoset decoder.
//!
//! Where a failure maps onto a clause of ITU-T X.891 the message names it.

use core::fmt;
use std::borrow::Cow;

/// All errors the decoder can report.
///
/// Every error is fatal for the document being decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The stream starts with neither the Fast Infoset signature nor a
    /// supported XML declaration followed by the signature.
    NotRecognizedFormat,
    /// The source ran dry in the middle of a structure.
    UnexpectedEndOfInput,
    /// An octet pattern, name combination, terminator or reserved-name use
    /// that the format does not allow.
    MalformedEncoding(Cow<'static, str>),
    /// A restricted alphabet terminator appeared before the last octet.
    MisalignedAlphabetTermination,
    /// The initial vocabulary references an external vocabulary but no
    /// external vocabularies were configured.
    UndeclaredExternalVocabulary,
    /// The referenced external vocabulary URI is not registered.
    VocabularyNotRegistered(String),
    /// A back-reference points beyond the entries of a table.
    IndexOutOfRange {
        /// Name of the vocabulary table.
        table: &'static str,
        /// Die angefragte Position (1-basiert, 0 = nicht vorhanden).
        index: usize,
    },
    /// The same attribute appears twice on one element.
    DuplicateAttribute(String),
    /// A qualified name uses a prefix that is not bound to its namespace.
    NamespaceNotInScope(String),
    /// An encoding algorithm identifier in the reserved range 10..=31.
    UnsupportedEncodingAlgorithm(u8),
    /// A span was resolved after the octet buffer was refilled.
    StaleSpan,
    /// I/O error of the underlying source.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRecognizedFormat => write!(f, "input is not a fast infoset document (X.891 header)"),
            Self::UnexpectedEndOfInput => write!(f, "unexpected end of input"),
            Self::MalformedEncoding(msg) => {
                if msg.is_empty() {
                    write!(f, "malformed encoding")
                } else {
                    write!(f, "malformed encoding: {msg}")
                }
            }
            Self::MisalignedAlphabetTermination => {
                write!(f, "restricted alphabet terminated before the last octet")
            }
            Self::UndeclaredExternalVocabulary => {
                write!(f, "external vocabulary referenced but none are configured")
            }
            Self::VocabularyNotRegistered(uri) => write!(f, "external vocabulary '{uri}' is not registered"),
            Self::IndexOutOfRange { table, index } => {
                write!(f, "index {index} out of range for the {table} table")
            }
            Self::DuplicateAttribute(name) => write!(f, "duplicate attribute '{name}'"),
            Self::NamespaceNotInScope(name) => write!(f, "namespace of '{name}' is not in scope"),
            Self::UnsupportedEncodingAlgorithm(id) => {
                write!(f, "encoding algorithm {id} is reserved and not supported")
            }
            Self::StaleSpan => write!(f, "span resolved after the octet buffer was refilled"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEndOfInput
        } else {
            Self::Io(e.to_string())
        }
    }
}

impl Error {
    /// Erstellt einen `MalformedEncoding`-Fehler.
    pub fn malformed(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::MalformedEncoding(msg.into())
    }

    /// Erstellt einen `IndexOutOfRange`-Fehler.
    pub fn index_out_of_range(table: &'static str, index: usize) -> Self {
        Self::IndexOutOfRange { table, index }
    }

    /// True for every error caused by the content of the stream (as opposed
    /// to configuration, I/O or a premature end of input).
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedEncoding(_)
                | Self::MisalignedAlphabetTermination
                | Self::IndexOutOfRange { .. }
                | Self::DuplicateAttribute(_)
                | Self::NamespaceNotInScope(_)
        )
    }
}

/// Result type alias for this crate.
pub type Result<T> = core::result::Result<T, Error>;
