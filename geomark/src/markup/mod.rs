//! In-memory XML writer shared by both output dialects.
//!
//! The whole document is kept in memory. This allows writing a header element whose content is only known after all
//! features have been read: the encoder takes a [`Reservation`] at the position of the header and
//! [splices](MarkupWriter::splice) the header into it at the end.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::EncodeError;

mod geometry;

pub use geometry::{GeometryEncoder, TagContext};

const INDENT_SIZE: usize = 2;

/// Position in the output where a fragment will be inserted later.
///
/// A writer issues only one reservation and it can be used only once.
#[derive(Debug)]
pub struct Reservation {
    offset: usize,
    depth: usize,
}

/// XML writer over an in-memory buffer.
pub struct MarkupWriter {
    writer: Writer<Vec<u8>>,
    pretty: bool,
    depth: usize,
    reserved: bool,
}

impl MarkupWriter {
    /// Creates an empty writer. Pretty writer puts every element on its own indented line.
    pub fn new(pretty: bool) -> Self {
        let writer = if pretty {
            Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE)
        } else {
            Writer::new(Vec::new())
        };

        Self {
            writer,
            pretty,
            depth: 0,
            reserved: false,
        }
    }

    /// Writes the `<?xml ... ?>` declaration.
    pub fn declaration(&mut self) -> Result<(), EncodeError> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    /// Opens an element.
    pub fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), EncodeError> {
        let mut element = BytesStart::new(name);
        for attribute in attributes {
            element.push_attribute(*attribute);
        }

        self.write(Event::Start(element))?;
        self.depth += 1;
        Ok(())
    }

    /// Closes an element.
    pub fn end(&mut self, name: &str) -> Result<(), EncodeError> {
        self.depth = self.depth.saturating_sub(1);
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Writes an element without content.
    pub fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), EncodeError> {
        let mut element = BytesStart::new(name);
        for attribute in attributes {
            element.push_attribute(*attribute);
        }

        self.write(Event::Empty(element))
    }

    /// Writes escaped text.
    pub fn text(&mut self, text: &str) -> Result<(), EncodeError> {
        self.write(Event::Text(BytesText::new(text)))
    }

    /// Writes an element with text content.
    pub fn text_element(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
        text: &str,
    ) -> Result<(), EncodeError> {
        self.start(name, attributes)?;
        self.text(text)?;
        self.end(name)
    }

    /// Reserves the current position for a fragment. Returns `None` if a reservation was already issued.
    pub fn reserve(&mut self) -> Option<Reservation> {
        if self.reserved {
            return None;
        }

        self.reserved = true;
        Some(Reservation {
            offset: self.writer.get_ref().len(),
            depth: self.depth,
        })
    }

    /// Inserts the fragment at the reserved position.
    ///
    /// In pretty mode every line of the fragment is put on a new line indented to the depth of the reservation.
    pub fn splice(&mut self, reservation: Reservation, fragment: &str) {
        let inserted = if self.pretty {
            let indent = " ".repeat(INDENT_SIZE * reservation.depth);
            fragment
                .lines()
                .map(|line| format!("\n{indent}{line}"))
                .collect::<String>()
        } else {
            fragment.to_string()
        };

        let buffer = self.writer.get_mut();
        let tail = buffer.split_off(reservation.offset.min(buffer.len()));
        buffer.extend_from_slice(inserted.as_bytes());
        buffer.extend_from_slice(&tail);
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.writer.get_ref().len()
    }

    /// Returns true if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the written markup.
    pub fn finish(self) -> Result<String, EncodeError> {
        String::from_utf8(self.writer.into_inner()).map_err(EncodeError::write)
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), EncodeError> {
        self.writer.write_event(event).map_err(EncodeError::write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_splice() {
        let mut writer = MarkupWriter::new(false);
        writer.start("root", &[("a", "1")]).expect("written");
        let reservation = writer.reserve().expect("first reservation");
        assert!(writer.reserve().is_none());
        writer.text_element("item", &[], "x < y").expect("written");
        writer.end("root").expect("written");

        writer.splice(reservation, "<header/>");

        assert_eq!(
            writer.finish().expect("utf-8"),
            r#"<root a="1"><header/><item>x &lt; y</item></root>"#
        );
    }

    #[test]
    fn pretty_splice_is_indented() {
        let mut writer = MarkupWriter::new(true);
        writer.start("root", &[]).expect("written");
        let reservation = writer.reserve().expect("reservation");
        writer.start("item", &[]).expect("written");
        writer.empty("leaf", &[]).expect("written");
        writer.end("item").expect("written");
        writer.end("root").expect("written");

        writer.splice(reservation, "<header>\n  <box/>\n</header>");

        insta::assert_snapshot!(writer.finish().expect("utf-8"), @r###"
        <root>
          <header>
            <box/>
          </header>
          <item>
            <leaf/>
          </item>
        </root>
        "###);
    }
}
