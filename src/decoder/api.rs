use crate::error::Result;
use crate::event::Event;
use crate::options::DecoderOptions;

use super::Decoder;

/// Decodiert einen Fast-Infoset-Stream vollständig zu einer Event-Sequenz.
pub fn decode(data: &[u8]) -> Result<Vec<Event>> {
    decode_with_options(data, DecoderOptions::default())
}

/// Wie [`decode`], mit externen Options (Fragmente, mehrere Dokumente,
/// externe Vokabulare).
pub fn decode_with_options(data: &[u8], options: DecoderOptions) -> Result<Vec<Event>> {
    Decoder::with_options(data, options).collect()
}
