//! Restricted alphabets: built-in tables and the bit-packed decoder.
//!
//! Identifiers 0 and 1 name the built-in numeric and date/time alphabets,
//! 2..=31 are reserved and application alphabets start at 32 (they live in
//! the restricted alphabet table of the vocabulary).

use crate::chars::CharBuffer;
use crate::{Error, Result};

/// Identifier of the built-in numeric alphabet.
pub const NUMERIC_ID: u8 = 0;
/// Identifier of the built-in date and time alphabet.
pub const DATE_TIME_ID: u8 = 1;
/// First identifier of application alphabets.
pub const APPLICATION_START: u8 = 32;

const fn ascii_table(s: &[u8; 15]) -> [u16; 15] {
    let mut out = [0u16; 15];
    let mut i = 0;
    while i < 15 {
        out[i] = s[i] as u16;
        i += 1;
    }
    out
}

/// `0123456789-+.E ` (plus the terminator nibble 0xF).
pub const NUMERIC: [u16; 15] = ascii_table(b"0123456789-+.E ");
/// `0123456789-:TZ ` (plus the terminator nibble 0xF).
pub const DATE_TIME: [u16; 15] = ascii_table(b"0123456789-:TZ ");

/// Returns the built-in alphabet for `id`, if there is one.
pub fn builtin(id: u8) -> Option<&'static [u16]> {
    match id {
        NUMERIC_ID => Some(&NUMERIC),
        DATE_TIME_ID => Some(&DATE_TIME),
        _ => None,
    }
}

/// Smallest bit width whose all-ones value is not a character index.
pub fn bits_per_character(alphabet_len: usize) -> u32 {
    let mut bits = 1;
    while (1usize << bits) <= alphabet_len {
        bits += 1;
    }
    bits
}

/// Unpacks `bytes` MSB-first into characters of `alphabet`.
///
/// The all-ones value terminates the string; it has to start in the last
/// octet and every bit after it has to be set as well.
pub fn decode(alphabet: &[u16], bytes: &[u8], out: &mut CharBuffer) -> Result<()> {
    if alphabet.len() < 2 {
        return Err(Error::malformed("restricted alphabet with fewer than 2 characters"));
    }
    out.clear();
    let bits = bits_per_character(alphabet.len());
    let terminator = (1u32 << bits) - 1;
    let count = bytes.len() * 8 / bits as usize;

    let mut acc: u32 = 0;
    let mut acc_bits: u32 = 0;
    let mut next = 0;
    for i in 0..count {
        while acc_bits < bits {
            acc = (acc << 8) | u32::from(bytes[next]);
            next += 1;
            acc_bits += 8;
        }
        acc_bits -= bits;
        let value = (acc >> acc_bits) & terminator;
        acc &= (1u32 << acc_bits) - 1;

        if value == terminator {
            if (i * bits as usize) / 8 != bytes.len() - 1 || acc != (1u32 << acc_bits) - 1 {
                return Err(Error::MisalignedAlphabetTermination);
            }
            break;
        }
        match alphabet.get(value as usize) {
            Some(&unit) => out.push(unit),
            None => {
                return Err(Error::malformed(format!(
                    "restricted alphabet value {value} beyond {} characters",
                    alphabet.len()
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(bytes: &[u8]) -> Result<String> {
        let mut out = CharBuffer::new();
        decode(&NUMERIC, bytes, &mut out)?;
        out.to_string_checked()
    }

    #[test]
    fn builtin_two_symbols_per_octet() {
        assert_eq!(numeric(&[0x12]).unwrap(), "12");
        assert_eq!(numeric(&[0xAB, 0xCD]).unwrap(), "-+.E");
    }

    #[test]
    fn builtin_pad_nibble_yields_one_symbol() {
        assert_eq!(numeric(&[0x7F]).unwrap(), "7");
        assert_eq!(numeric(&[0x31, 0x4F]).unwrap(), "314");
    }

    #[test]
    fn pad_nibble_before_last_octet_is_misaligned() {
        assert_eq!(numeric(&[0xF1, 0x23]), Err(Error::MisalignedAlphabetTermination));
        assert_eq!(numeric(&[0x1F, 0x23]), Err(Error::MisalignedAlphabetTermination));
    }

    #[test]
    fn pad_nibble_must_be_final() {
        assert_eq!(numeric(&[0xF3]), Err(Error::MisalignedAlphabetTermination));
        assert_eq!(numeric(&[0xFF]).unwrap(), "");
    }

    #[test]
    fn date_time_alphabet() {
        let mut out = CharBuffer::new();
        decode(&DATE_TIME, &[0x20, 0x0A, 0x0B, 0x3C], &mut out).unwrap();
        assert_eq!(out.to_string_checked().unwrap(), "200-0:3T");
    }

    #[test]
    fn bit_widths() {
        assert_eq!(bits_per_character(2), 2);
        assert_eq!(bits_per_character(3), 2);
        assert_eq!(bits_per_character(4), 3);
        assert_eq!(bits_per_character(15), 4);
        assert_eq!(bits_per_character(16), 5);
    }

    #[test]
    fn application_alphabet_three_bits() {
        // "abcd" -> 3 Bits pro Zeichen, Terminator 0b111
        let alphabet: Vec<u16> = "abcd".encode_utf16().collect();
        let mut out = CharBuffer::new();
        // 000 001 01|0 011 1111 -> a b c d + Terminator
        decode(&alphabet, &[0b0000_0101, 0b0011_1111], &mut out).unwrap();
        assert_eq!(out.to_string_checked().unwrap(), "abcd");
    }

    #[test]
    fn application_value_beyond_alphabet() {
        let alphabet: Vec<u16> = "abcde".encode_utf16().collect();
        let mut out = CharBuffer::new();
        // 110 -> Index 6 bei 5 Zeichen
        assert!(matches!(
            decode(&alphabet, &[0b1101_1111], &mut out),
            Err(Error::MalformedEncoding(_))
        ));
    }

    #[test]
    fn builtin_lookup() {
        assert!(builtin(NUMERIC_ID).is_some());
        assert!(builtin(DATE_TIME_ID).is_some());
        assert!(builtin(2).is_none());
    }
}
