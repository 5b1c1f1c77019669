//! Fast Infoset header (X.891 12.6, 12.7).
//!
//! A document starts with the signature `E0 00 00 01`, optionally preceded
//! by one of nine XML declarations that announce the `finf` encoding.
//!
//! # Beispiel
//!
//! ```
//! use finf::header;
//!
//! assert!(header::is_fast_infoset(&[0xE0, 0x00, 0x00, 0x01, 0x00]));
//! assert!(!header::is_fast_infoset(b"<?xml version='1.0'?>"));
//! ```

use std::io::Read;

use log::debug;

use crate::octet_buffer::OctetBuffer;
use crate::{Error, Result};

/// Identification and version octets.
pub const SIGNATURE: [u8; 4] = [0xE0, 0x00, 0x00, 0x01];

/// XML declarations permitted in front of the signature.
pub const XML_DECLARATIONS: [&str; 9] = [
    "<?xml encoding='finf'?>",
    "<?xml encoding='finf' standalone='yes'?>",
    "<?xml encoding='finf' standalone='no'?>",
    "<?xml version='1.0' encoding='finf'?>",
    "<?xml version='1.0' encoding='finf' standalone='yes'?>",
    "<?xml version='1.0' encoding='finf' standalone='no'?>",
    "<?xml version='1.1' encoding='finf'?>",
    "<?xml version='1.1' encoding='finf' standalone='yes'?>",
    "<?xml version='1.1' encoding='finf' standalone='no'?>",
];

/// Length of the longest declaration.
const LONGEST_DECLARATION: usize = 54;

/// Decoded header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    declaration: Option<usize>,
}

impl Header {
    /// The XML declaration in front of the signature, if any.
    pub fn xml_declaration(&self) -> Option<&'static str> {
        self.declaration.map(|i| XML_DECLARATIONS[i])
    }

    /// `version` pseudo-attribute of the declaration.
    pub fn xml_version(&self) -> Option<&'static str> {
        match self.declaration? {
            0..=2 => None,
            3..=5 => Some("1.0"),
            _ => Some("1.1"),
        }
    }

    /// `standalone` pseudo-attribute of the declaration.
    pub fn standalone(&self) -> Option<bool> {
        match self.declaration? % 3 {
            1 => Some(true),
            2 => Some(false),
            _ => None,
        }
    }
}

/// Decodes the header and leaves the buffer at the optional components octet.
pub fn decode<R: Read>(octets: &mut OctetBuffer<R>) -> Result<Header> {
    let mut header = Header::default();
    if octets.peek().map_err(not_recognized)? == b'<' {
        let window = octets.peek_up_to(LONGEST_DECLARATION)?;
        let end = memchr::memchr(b'>', window).ok_or(Error::NotRecognizedFormat)?;
        let declaration = &window[..=end];
        let index = XML_DECLARATIONS
            .iter()
            .position(|d| d.as_bytes() == declaration)
            .ok_or(Error::NotRecognizedFormat)?;
        octets.read_slice(end + 1)?;
        header.declaration = Some(index);
        debug!("xml declaration: {}", XML_DECLARATIONS[index]);
    }
    let signature = octets.read_slice(SIGNATURE.len()).map_err(not_recognized)?;
    if signature != SIGNATURE {
        return Err(Error::NotRecognizedFormat);
    }
    Ok(header)
}

/// A stream too short for a header is not a Fast Infoset document.
fn not_recognized(e: Error) -> Error {
    match e {
        Error::UnexpectedEndOfInput => Error::NotRecognizedFormat,
        other => other,
    }
}

/// True if `bytes` starts with the signature.
pub fn is_fast_infoset(bytes: &[u8]) -> bool {
    bytes.starts_with(&SIGNATURE)
}

/// Reads up to four bytes from `source` and compares them with the signature.
pub fn sniff(mut source: impl Read) -> Result<bool> {
    let mut head = [0u8; 4];
    let mut filled = 0;
    while filled < head.len() {
        match source.read(&mut head[filled..]) {
            Ok(0) => return Ok(false),
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(head == SIGNATURE)
}
