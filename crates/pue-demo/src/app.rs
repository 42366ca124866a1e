#![forbid(unsafe_code)]

//! The demo page: a checkbox bound to `check`, a heading and a text field
//! bound to `counter`, and a timer that flips one and increments the other.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use pue::prelude::*;

use crate::cli::Opts;

const CHECKBOX: &str = r#"input[type="checkbox"]"#;
const FIELD: &str = r#"input[type="text"]"#;

/// The bound page.
pub struct Demo {
    document: HeadlessDocument,
    check: Cell<bool>,
    counter: Cell<u32>,
}

impl Demo {
    /// Build the page and bind it.
    pub fn new(pue: &Pue) -> Self {
        let document = HeadlessDocument::new();
        document.append(HeadlessElement::input("checkbox"));
        document.create_element("h1");
        document.append(HeadlessElement::input("text"));

        let checkbox = document.find(CHECKBOX);
        let heading = document.find("h1");
        let field = document.find(FIELD);
        let check = pue.model().value(checkbox.as_ref(), false);
        let counter = pue.model().text_content(heading.as_ref(), 0u32);
        pue.model().value(field.as_ref(), &counter);

        Self {
            document,
            check,
            counter,
        }
    }

    /// One timer tick.
    pub fn tick(&self) {
        self.check.update(|v| *v = !*v);
        self.counter.update(|n| *n += 1);
    }

    /// The page's state as markup.
    #[must_use]
    pub fn render(&self) -> String {
        let checked = self
            .document
            .find(CHECKBOX)
            .is_some_and(|input| input.checked());
        let heading = self
            .document
            .find("h1")
            .map(|h1| h1.text_content())
            .unwrap_or_default();
        let field = self
            .document
            .find(FIELD)
            .map(|input| input.value())
            .unwrap_or_default();
        format!(
            "<input type=\"checkbox\"{}> <h1>{heading}</h1> <input value=\"{field}\">",
            if checked { " checked" } else { "" }
        )
    }

    #[must_use]
    pub fn document(&self) -> &HeadlessDocument {
        &self.document
    }
}

/// Run the demo for `opts.ticks` ticks, writing one line per frame.
pub fn run(pue: &Pue, opts: &Opts, out: &mut impl Write) -> io::Result<()> {
    let demo = Demo::new(pue);
    writeln!(out, "{}", demo.render())?;
    for tick in 1..=opts.ticks {
        if opts.interval_ms > 0 {
            thread::sleep(Duration::from_millis(opts.interval_ms));
        }
        demo.tick();
        tracing::debug!(message = "demo.tick", tick);
        writeln!(out, "{}", demo.render())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn quick(ticks: u32) -> Opts {
        Opts {
            ticks,
            interval_ms: 0,
            relisten: None,
        }
    }

    fn frame(checked: bool, n: u32) -> String {
        format!(
            "<input type=\"checkbox\"{}> <h1>{n}</h1> <input value=\"{n}\">",
            if checked { " checked" } else { "" }
        )
    }

    #[test]
    fn initial_frame() {
        let demo = Demo::new(&Pue::default());
        assert_eq!(demo.render(), frame(false, 0));
    }

    #[test]
    fn frames_alternate() {
        let mut out = Vec::new();
        run(&Pue::default(), &quick(3), &mut out).expect("write to vec");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(
            text.lines().map(str::to_string).collect::<Vec<_>>(),
            vec![
                frame(false, 0),
                frame(true, 1),
                frame(false, 2),
                frame(true, 3),
            ]
        );
    }

    #[test]
    fn user_click_feeds_back() {
        let demo = Demo::new(&Pue::default());
        let checkbox = demo.document().find(CHECKBOX).expect("checkbox");
        checkbox.click();
        assert!(demo.check.get());

        demo.tick();
        assert!(!checkbox.checked());
        assert_eq!(demo.render(), frame(false, 1));
    }

    #[test]
    fn typed_count_drives_heading() {
        let demo = Demo::new(&Pue::default());
        let field = demo.document().find(FIELD).expect("field");
        field.type_text("41");
        demo.tick();
        assert_eq!(demo.render(), frame(true, 42));

        field.type_text("forty");
        assert_eq!(demo.counter.get(), 42);
    }
}
