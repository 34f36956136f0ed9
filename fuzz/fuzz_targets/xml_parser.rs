#![no_main]
use libfuzzer_sys::fuzz_target;
use subfilter::{from_xml_bytes, from_xml_str, to_xml};

fuzz_target!(|data: &[u8]| {
    if let Ok(node) = from_xml_bytes(data) {
        let reparsed = from_xml_str(&to_xml(&node));
        assert_eq!(reparsed.ok(), Some(node));
    }
});
