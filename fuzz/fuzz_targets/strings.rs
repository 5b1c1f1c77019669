#![no_main]
use libfuzzer_sys::fuzz_target;

use finf::chars::CharClass;
use finf::octet_buffer::OctetBuffer;
use finf::string::StringDecoder;
use finf::vocabulary::{Partition, Vocabulary};

fuzz_target!(|data: &[u8]| {
    let mut vocabulary = Vocabulary::new();
    vocabulary.add_restricted_alphabet("abc");
    vocabulary.add_string(Partition::EncodingAlgorithm, "urn:fuzz");

    let mut strings = StringDecoder::new(OctetBuffer::new(data), true);
    loop {
        let Ok(b) = strings.peek() else { break };
        let done = match b >> 6 {
            0 => strings.identifying(vocabulary.strings_mut(Partition::LocalName), CharClass::NcName).is_err(),
            1 => {
                let value = strings.non_identifying(vocabulary.restricted_alphabets(), vocabulary.strings(Partition::EncodingAlgorithm));
                match value {
                    Ok(value) => strings.resolve(value, vocabulary.strings_mut(Partition::OtherString)).is_err(),
                    Err(_) => true,
                }
            }
            2 => match strings.read() {
                Ok(b) => strings
                    .character_chunk(b, vocabulary.restricted_alphabets(), vocabulary.strings(Partition::EncodingAlgorithm))
                    .is_err(),
                Err(_) => true,
            },
            _ => strings.sequence_length().is_err(),
        };
        if done {
            break;
        }
    }
});
