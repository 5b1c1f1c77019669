//! Character buffer and the UTF-8 / UTF-16 decoders.
//!
//! Decoded text is kept as UTF-16 code units: supplementary characters
//! become surrogate pairs, which is also the unit restricted alphabets
//! are defined in.

use crate::{Error, Result};

/// Character class a decoded string has to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Any XML 1.0 `Char`.
    Content,
    /// An NCName: name-start character followed by name characters.
    NcName,
}

/// Grow-only buffer of UTF-16 code units.
///
/// Each decode overwrites the previous content; the backing storage keeps
/// the size of the largest unit decoded so far.
#[derive(Debug, Default, Clone)]
pub struct CharBuffer {
    units: Vec<u16>,
    len: usize,
}

impl CharBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The decoded code units.
    pub fn as_units(&self) -> &[u16] {
        &self.units[..self.len]
    }

    /// Number of valid code units.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no code units are buffered.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Capacity of the backing storage in code units.
    pub fn capacity(&self) -> usize {
        self.units.len()
    }

    /// Forgets the content, keeps the storage.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Appends one code unit.
    #[inline]
    pub fn push(&mut self, unit: u16) {
        if self.len == self.units.len() {
            self.units.push(unit);
        } else {
            self.units[self.len] = unit;
        }
        self.len += 1;
    }

    /// Appends a code point, splitting supplementary characters.
    #[inline]
    pub fn push_code_point(&mut self, c: u32) {
        if c >= 0x1_0000 {
            let c = c - 0x1_0000;
            self.push(0xD800 | (c >> 10) as u16);
            self.push(0xDC00 | (c & 0x3FF) as u16);
        } else {
            self.push(c as u16);
        }
    }

    /// Replaces the content with `text`.
    pub fn set_str(&mut self, text: &str) {
        self.clear();
        self.reserve(text.len());
        for unit in text.encode_utf16() {
            self.push(unit);
        }
    }

    /// Stellt sicher, dass `n` Einheiten ohne Reallokation passen.
    fn reserve(&mut self, n: usize) {
        if self.units.len() < n {
            self.units.resize(n, 0);
        }
    }

    /// Converts the content into a `String`.
    pub fn to_string_checked(&self) -> Result<String> {
        String::from_utf16(self.as_units())
            .map_err(|_| Error::malformed("character buffer holds an unpaired surrogate"))
    }

    /// Decodes `bytes` as strict UTF-8, replacing the buffer content.
    pub fn decode_utf8(&mut self, bytes: &[u8], class: CharClass) -> Result<()> {
        self.clear();
        // Jedes Byte erzeugt hoechstens eine UTF-16-Einheit.
        self.reserve(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            let b1 = bytes[i];
            let (c, width) = match b1 {
                0x00..=0x7F => (u32::from(b1), 1),
                0xC2..=0xDF => {
                    let b2 = continuation(bytes, i + 1)?;
                    ((u32::from(b1 & 0x1F) << 6) | b2, 2)
                }
                0xE0..=0xEF => {
                    let b2 = continuation(bytes, i + 1)?;
                    let b3 = continuation(bytes, i + 2)?;
                    if b1 & 0x0F == 0 && b2 & 0x20 == 0 {
                        return Err(Error::malformed("overlong three-octet UTF-8 sequence"));
                    }
                    if b1 == 0xED && b2 >= 0x20 {
                        return Err(Error::malformed("UTF-8 sequence encodes a surrogate"));
                    }
                    ((u32::from(b1 & 0x0F) << 12) | (b2 << 6) | b3, 3)
                }
                0xF0..=0xF4 => {
                    let b2 = continuation(bytes, i + 1)?;
                    let b3 = continuation(bytes, i + 2)?;
                    let b4 = continuation(bytes, i + 3)?;
                    if b1 & 0x07 == 0 && b2 & 0x30 == 0 {
                        return Err(Error::malformed("overlong four-octet UTF-8 sequence"));
                    }
                    let c = (u32::from(b1 & 0x07) << 18) | (b2 << 12) | (b3 << 6) | b4;
                    if c > 0x10_FFFF {
                        return Err(Error::malformed("UTF-8 code point above U+10FFFF"));
                    }
                    (c, 4)
                }
                _ => return Err(Error::malformed("illegal UTF-8 lead octet")),
            };
            let legal = match class {
                CharClass::Content => is_xml_char(c),
                CharClass::NcName if i == 0 => is_ncname_start_char(c),
                CharClass::NcName => is_ncname_char(c),
            };
            if !legal {
                return Err(Error::malformed(format!(
                    "character U+{c:04X} not allowed in {}",
                    match class {
                        CharClass::Content => "character content",
                        CharClass::NcName => "a name",
                    }
                )));
            }
            self.push_code_point(c);
            i += width;
        }
        Ok(())
    }

    /// Decodes big-endian UTF-16, replacing the buffer content.
    pub fn decode_utf16(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() % 2 != 0 {
            return Err(Error::malformed("UTF-16 string with an odd number of octets"));
        }
        self.clear();
        self.reserve(bytes.len() / 2);
        let mut pending_high = false;
        for pair in bytes.chunks_exact(2) {
            let unit = u16::from_be_bytes([pair[0], pair[1]]);
            let is_high = (0xD800..=0xDBFF).contains(&unit);
            let is_low = (0xDC00..=0xDFFF).contains(&unit);
            if pending_high != is_low {
                return Err(Error::malformed("unpaired UTF-16 surrogate"));
            }
            pending_high = is_high;
            self.push(unit);
        }
        if pending_high {
            return Err(Error::malformed("unpaired UTF-16 surrogate"));
        }
        Ok(())
    }
}

/// Liest ein Folgebyte und prueft das `10xxxxxx`-Muster.
#[inline]
fn continuation(bytes: &[u8], i: usize) -> Result<u32> {
    match bytes.get(i) {
        Some(&b) if b & 0xC0 == 0x80 => Ok(u32::from(b & 0x3F)),
        Some(_) => Err(Error::malformed("illegal UTF-8 continuation octet")),
        None => Err(Error::malformed("truncated UTF-8 sequence")),
    }
}

/// XML 1.0 `Char`.
pub fn is_xml_char(c: u32) -> bool {
    matches!(c, 0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x1_0000..=0x10_FFFF)
}

/// XML `NameStartChar` without the colon.
pub fn is_ncname_start_char(c: u32) -> bool {
    matches!(
        c,
        0x41..=0x5A
            | 0x5F
            | 0x61..=0x7A
            | 0xC0..=0xD6
            | 0xD8..=0xF6
            | 0xF8..=0x2FF
            | 0x370..=0x37D
            | 0x37F..=0x1FFF
            | 0x200C..=0x200D
            | 0x2070..=0x218F
            | 0x2C00..=0x2FEF
            | 0x3001..=0xD7FF
            | 0xF900..=0xFDCF
            | 0xFDF0..=0xFFFD
            | 0x1_0000..=0xE_FFFF
    )
}

/// XML `NameChar` without the colon.
pub fn is_ncname_char(c: u32) -> bool {
    is_ncname_start_char(c)
        || matches!(c, 0x2D | 0x2E | 0x30..=0x39 | 0xB7 | 0x300..=0x36F | 0x203F..=0x2040)
}
