#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pue_dom::{Element, EventType, HeadlessElement, Model, ModelConfig};

#[derive(Arbitrary, Debug)]
enum Op {
    WriteCount(i16),
    TypeText(String),
    WriteFlag(bool),
    Click,
}

#[derive(Arbitrary, Debug)]
struct Script {
    relisten: bool,
    ops: Vec<Op>,
}

fuzz_target!(|script: Script| {
    let model = Model::new(ModelConfig::default().with_relisten_on_change(script.relisten));
    let field = HeadlessElement::input("text");
    let heading = HeadlessElement::new("h1");
    let boxed = HeadlessElement::input("checkbox");

    let count = model.value(Some(&field), 0i16);
    model.text_content(Some(&heading), &count);
    let flag = model.value(Some(&boxed), false);

    for op in script.ops.into_iter().take(256) {
        match op {
            Op::WriteCount(n) => count.set(n),
            Op::TypeText(text) => field.type_text(&text),
            Op::WriteFlag(v) => flag.set(v),
            Op::Click => boxed.click(),
        }
        assert_eq!(heading.text_content(), count.get().to_string());
        assert_eq!(boxed.checked(), flag.get());
        assert_eq!(field.listener_count(EventType::Input), 1);
    }
});
