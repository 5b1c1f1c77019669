#![no_main]
use libfuzzer_sys::fuzz_target;

use finf::options::DecoderOptions;

fuzz_target!(|data: &[u8]| {
    let _ = finf::decode(data);

    // Fragmente und Dokumentfolgen mit winzigem Puffer
    let options = DecoderOptions::default()
        .with_parse_fragments()
        .with_multiple_documents()
        .with_buffer_size(1);
    let mut decoder = finf::Decoder::with_options(data, options);
    while let Ok(Some(_)) = decoder.next_event() {}
});
