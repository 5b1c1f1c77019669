//! Encoding algorithm payloads.
//!
//! Payloads are captured as opaque octets together with their identifier.
//! The ten built-in algorithms can be rendered as text; application
//! algorithms (identifier 32 and up) carry the URI from the encoding
//! algorithm table and are interpreted by an [`EncodingAlgorithm`]
//! registered under that URI.

use std::fmt::{self, Write as _};
use std::rc::Rc;

use base64::Engine;

use crate::chars::{CharBuffer, CharClass};
use crate::{Error, Result};

pub const HEXADECIMAL: u8 = 0;
pub const BASE64: u8 = 1;
pub const SHORT: u8 = 2;
pub const INT: u8 = 3;
pub const LONG: u8 = 4;
pub const BOOLEAN: u8 = 5;
pub const FLOAT: u8 = 6;
pub const DOUBLE: u8 = 7;
pub const UUID: u8 = 8;
pub const CDATA: u8 = 9;
/// First identifier of application algorithms; 10..=31 are reserved.
pub const APPLICATION_START: u8 = 32;

/// Decoder for an application encoding algorithm.
pub trait EncodingAlgorithm {
    /// Converts the payload into its character representation.
    fn decode_to_text(&self, octets: &[u8]) -> Result<String>;
}

impl fmt::Debug for dyn EncodingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncodingAlgorithm")
    }
}

/// Opaque payload of an encoding algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmData {
    id: u8,
    uri: Option<Rc<str>>,
    octets: Rc<[u8]>,
}

impl AlgorithmData {
    pub fn new(id: u8, uri: Option<Rc<str>>, octets: &[u8]) -> Self {
        Self {
            id,
            uri,
            octets: Rc::from(octets),
        }
    }

    /// Algorithm identifier as encoded.
    pub fn id(&self) -> u8 {
        self.id
    }

    /// URI of an application algorithm.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// The raw payload.
    pub fn octets(&self) -> &[u8] {
        &self.octets
    }

    /// True for identifiers 0..=9.
    pub fn is_builtin(&self) -> bool {
        self.id <= CDATA
    }

    /// Renders a built-in payload as text; `None` for application algorithms.
    pub fn to_text(&self) -> Result<Option<String>> {
        let octets = &*self.octets;
        let text = match self.id {
            HEXADECIMAL => hexadecimal(octets),
            BASE64 => base64::engine::general_purpose::STANDARD.encode(octets),
            SHORT => join(octets, 2, |c| i16::from_be_bytes([c[0], c[1]]).to_string())?,
            INT => join(octets, 4, |c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]).to_string())?,
            LONG => join(octets, 8, |c| {
                i64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]).to_string()
            })?,
            BOOLEAN => booleans(octets)?,
            FLOAT => join(octets, 4, |c| {
                let v = f32::from_be_bytes([c[0], c[1], c[2], c[3]]);
                float_text(f64::from(v), |m| decimal_text(m, format!("{v:?}"), format!("{v:e}")))
            })?,
            DOUBLE => join(octets, 8, |c| {
                let v = f64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]);
                float_text(v, |m| decimal_text(m, format!("{v:?}"), format!("{v:e}")))
            })?,
            UUID => join(octets, 16, uuid)?,
            CDATA => {
                let mut chars = CharBuffer::new();
                chars.decode_utf8(octets, CharClass::Content)?;
                chars.to_string_checked()?
            }
            _ => return Ok(None),
        };
        Ok(Some(text))
    }
}

fn hexadecimal(octets: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(octets.len() * 2);
    for &b in octets {
        out.push(char::from(DIGITS[usize::from(b >> 4)]));
        out.push(char::from(DIGITS[usize::from(b & 0x0F)]));
    }
    out
}

/// Wendet `f` auf jeden Block der Groesse `size` an und verbindet mit Leerzeichen.
fn join(octets: &[u8], size: usize, f: impl Fn(&[u8]) -> String) -> Result<String> {
    if octets.len() % size != 0 {
        return Err(Error::malformed(format!(
            "algorithm payload of {} octets is not a multiple of {size}",
            octets.len()
        )));
    }
    let mut out = String::new();
    for (i, chunk) in octets.chunks_exact(size).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&f(chunk));
    }
    Ok(out)
}

/// XML Schema lexical form for special values.
fn float_text(v: f64, finite: impl Fn(f64) -> String) -> String {
    if v.is_nan() {
        "NaN".to_owned()
    } else if v.is_infinite() {
        if v > 0.0 { "INF".to_owned() } else { "-INF".to_owned() }
    } else {
        finite(v)
    }
}

/// `1.5`, `100.0` for magnitudes in `[1e-3, 1e7)`, else `1.0E20`, `2.5E-4`.
fn decimal_text(v: f64, plain: String, scientific: String) -> String {
    let magnitude = v.abs();
    if v == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return plain;
    }
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => format!("{mantissa}E{exponent}"),
        Some((mantissa, exponent)) => format!("{mantissa}.0E{exponent}"),
        None => plain,
    }
}

fn uuid(c: &[u8]) -> String {
    let mut out = String::with_capacity(36);
    for (i, b) in c.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            out.push('-');
        }
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// The first four bits hold the number of unused trailing bits.
fn booleans(octets: &[u8]) -> Result<String> {
    let Some(&first) = octets.first() else {
        return Ok(String::new());
    };
    let unused = usize::from(first >> 4);
    let total = octets.len() * 8;
    if unused > 7 || 4 + unused > total {
        return Err(Error::malformed("boolean payload with an invalid unused-bit count"));
    }
    let mut out = String::new();
    for bit in 4..total - unused {
        if bit > 4 {
            out.push(' ');
        }
        let set = octets[bit / 8] & (0x80 >> (bit % 8)) != 0;
        out.push_str(if set { "true" } else { "false" });
    }
    Ok(out)
}
