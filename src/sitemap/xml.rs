use anyhow::Result;
use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use std::io::Cursor;

pub type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Something that can render itself as an XML element.
///
/// Every sitemap element (the `<urlset>` document, page entries, extension entries)
/// implements this, so the generator never has to know which kinds exist.
pub trait ToXml {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()>;
}

pub fn new_xml_writer() -> XmlWriter {
    Writer::new_with_indent(Cursor::new(Vec::with_capacity(4096)), b' ', 2)
}

/// Write a text element: `<tag>text</tag>`. Text is escaped.
#[inline]
pub fn write_text_element(writer: &mut XmlWriter, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
