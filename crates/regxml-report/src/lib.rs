#![deny(unsafe_code)]

//! Report serialization.
//!
//! Writes built [`regxml_model::DocumentNode`] trees as indented UTF-8 XML
//! with an XML declaration. Empty leaf elements are written self-closing.

mod xml;

pub use xml::{output_path_for, to_xml_string, write_document, write_xml_file};
