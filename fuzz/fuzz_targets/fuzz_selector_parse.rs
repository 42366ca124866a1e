#![no_main]

use libfuzzer_sys::fuzz_target;
use pue_dom::{Document, HeadlessDocument, HeadlessElement, Selector};

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let doc = HeadlessDocument::new();
    doc.append(HeadlessElement::input("checkbox").with_attribute("ref", "check"));
    doc.append(HeadlessElement::new("h1").with_attribute("class", "title big"));

    let parsed = Selector::parse(source);
    let found = doc.find_all(source);
    if parsed.is_err() {
        assert!(found.is_empty());
    }
});
