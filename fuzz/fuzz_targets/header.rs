#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut octets = finf::octet_buffer::OctetBuffer::new(data);
    let _ = finf::header::decode(&mut octets);
    let _ = finf::header::sniff(data);
});
