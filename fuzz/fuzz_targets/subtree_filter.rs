#![no_main]
use libfuzzer_sys::fuzz_target;
use subfilter::{from_xml_str, subtree_filter};

fuzz_target!(|input: (&str, &str)| {
    let (data, filter) = input;
    if let (Ok(data), Ok(filter)) = (from_xml_str(data), from_xml_str(filter)) {
        if let Ok(Some(once)) = subtree_filter(&data, &filter) {
            let _ = subtree_filter(&once, &filter);
        }
    }
});
