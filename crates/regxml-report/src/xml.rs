//! quick-xml serialization of [`DocumentNode`] trees.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use regxml_model::DocumentNode;

/// Writes the XML declaration followed by the tree rooted at `root`.
pub fn write_document<W: Write>(writer: W, root: &DocumentNode) -> Result<W> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_node(&mut xml, root)?;
    Ok(xml.into_inner())
}

/// Serializes the document into a UTF-8 string.
pub fn to_xml_string(root: &DocumentNode) -> Result<String> {
    let bytes = write_document(Vec::new(), root)?;
    String::from_utf8(bytes).context("serialized XML is not UTF-8")
}

/// Writes the document to `path`, creating parent directories as needed.
pub fn write_xml_file(path: &Path, root: &DocumentNode) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = write_document(BufWriter::new(file), root)
        .with_context(|| format!("write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

/// `<output_dir>/<input stem>.xml`
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "report".into(), |stem| stem.to_string_lossy());
    output_dir.join(format!("{stem}.xml"))
}

fn write_node<W: Write>(xml: &mut Writer<W>, node: &DocumentNode) -> Result<()> {
    let mut start = BytesStart::new(node.name.as_str());
    for (name, value) in &node.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    let text = node.text.as_deref().unwrap_or_default();
    if text.is_empty() && node.children.is_empty() {
        xml.write_event(Event::Empty(start))?;
        return Ok(());
    }

    xml.write_event(Event::Start(start))?;
    if !text.is_empty() {
        xml.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &node.children {
        write_node(xml, child)?;
    }
    xml.write_event(Event::End(BytesEnd::new(node.name.as_str())))?;
    Ok(())
}
