//! XSD validation through the system libxml2.
//!
//! The schema is parsed from its file on every call and the document is
//! validated from memory. Validation messages are collected through the
//! structured error callback instead of going to stderr.
#![allow(unsafe_code)]

use std::ffi::{CStr, CString};
use std::path::Path;
use std::sync::Once;

use libc::{c_char, c_int, c_void};

use regxml_model::{Diagnostic, ValidationResult, ValidationStatus};

use crate::SchemaValidator;
use crate::error::{Result, ValidateError};

static LIBXML2_INIT: Once = Once::new();

// xmlParserOption flags
const XML_PARSE_NOERROR: c_int = 1 << 5;
const XML_PARSE_NOWARNING: c_int = 1 << 6;
const XML_PARSE_NONET: c_int = 1 << 11;

#[repr(C)]
struct XmlSchema {
    _private: [u8; 0],
}

#[repr(C)]
struct XmlSchemaParserCtxt {
    _private: [u8; 0],
}

#[repr(C)]
struct XmlSchemaValidCtxt {
    _private: [u8; 0],
}

#[repr(C)]
struct XmlDoc {
    _private: [u8; 0],
}

#[repr(C)]
#[allow(dead_code)]
struct XmlError {
    domain: c_int,
    code: c_int,
    message: *const c_char,
    level: c_int,
    file: *const c_char,
    line: c_int,
    str1: *const c_char,
    str2: *const c_char,
    str3: *const c_char,
    int1: c_int,
    /// Column, when known.
    int2: c_int,
    ctxt: *mut c_void,
    node: *mut c_void,
}

type XmlStructuredErrorFunc =
    Option<unsafe extern "C" fn(user_data: *mut c_void, error: *const XmlError)>;

#[cfg_attr(target_os = "windows", link(name = "libxml2"))]
#[cfg_attr(not(target_os = "windows"), link(name = "xml2"))]
unsafe extern "C" {
    fn xmlInitParser();

    fn xmlSchemaNewParserCtxt(url: *const c_char) -> *mut XmlSchemaParserCtxt;
    fn xmlSchemaParse(ctxt: *mut XmlSchemaParserCtxt) -> *mut XmlSchema;
    fn xmlSchemaFreeParserCtxt(ctxt: *mut XmlSchemaParserCtxt);
    fn xmlSchemaFree(schema: *mut XmlSchema);

    fn xmlSchemaNewValidCtxt(schema: *mut XmlSchema) -> *mut XmlSchemaValidCtxt;
    fn xmlSchemaFreeValidCtxt(ctxt: *mut XmlSchemaValidCtxt);
    fn xmlSchemaSetValidStructuredErrors(
        ctxt: *mut XmlSchemaValidCtxt,
        serror: XmlStructuredErrorFunc,
        user_data: *mut c_void,
    );
    fn xmlSchemaValidateDoc(ctxt: *mut XmlSchemaValidCtxt, doc: *mut XmlDoc) -> c_int;

    fn xmlReadMemory(
        buffer: *const c_char,
        size: c_int,
        url: *const c_char,
        encoding: *const c_char,
        options: c_int,
    ) -> *mut XmlDoc;
    fn xmlFreeDoc(doc: *mut XmlDoc);
}

/// Collects one structured error into the `Vec<Diagnostic>` behind `user_data`.
unsafe extern "C" fn collect_error(user_data: *mut c_void, error: *const XmlError) {
    if user_data.is_null() || error.is_null() {
        return;
    }
    // SAFETY: user_data is the Vec registered in `validate_doc`, which
    // outlives the validation call; error is valid for this callback.
    let (diagnostics, error) = unsafe { (&mut *user_data.cast::<Vec<Diagnostic>>(), &*error) };

    let message = if error.message.is_null() {
        format!("libxml2 error {}", error.code)
    } else {
        // SAFETY: libxml2 passes a NUL-terminated message.
        unsafe { CStr::from_ptr(error.message) }
            .to_string_lossy()
            .trim()
            .to_string()
    };
    let location = (error.line > 0).then(|| match error.int2 {
        col if col > 0 => format!("{}:{col}", error.line),
        _ => error.line.to_string(),
    });
    diagnostics.push(Diagnostic::new(location, message));
}

/// Owned libxml2 pointer freed on drop.
struct Owned<T> {
    ptr: *mut T,
    free: unsafe extern "C" fn(*mut T),
}

impl<T> Owned<T> {
    fn new(ptr: *mut T, free: unsafe extern "C" fn(*mut T)) -> Option<Self> {
        (!ptr.is_null()).then_some(Self { ptr, free })
    }
}

impl<T> Drop for Owned<T> {
    fn drop(&mut self) {
        // SAFETY: ptr is non-null and owned exclusively by this guard.
        unsafe { (self.free)(self.ptr) }
    }
}

/// Full XSD validation backed by libxml2.
#[derive(Debug, Clone, Copy)]
pub struct Libxml2Validator;

impl Libxml2Validator {
    pub fn new() -> Self {
        LIBXML2_INIT.call_once(|| {
            // SAFETY: one-time global initialisation, as libxml2 requires
            // before use from multiple threads.
            unsafe { xmlInitParser() }
        });
        Self
    }
}

impl Default for Libxml2Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaValidator for Libxml2Validator {
    fn name(&self) -> &'static str {
        "libxml2"
    }

    fn validate(&self, xml: &[u8], schema: &Path) -> ValidationResult {
        match validate_doc(xml, schema) {
            Ok(result) => result,
            Err(err) => ValidationResult::new(
                ValidationStatus::InternalError { code: err.code() },
                vec![Diagnostic::new(None, err.to_string())],
            ),
        }
    }
}

fn parse_schema(schema: &Path) -> Result<Owned<XmlSchema>> {
    if !schema.is_file() {
        return Err(ValidateError::SchemaNotFound {
            path: schema.to_path_buf(),
        });
    }
    let url = CString::new(schema.to_string_lossy().as_bytes()).map_err(|_| {
        ValidateError::InvalidPath {
            path: schema.to_path_buf(),
        }
    })?;

    // SAFETY: url is a valid C string for the duration of the call.
    let parser = unsafe { xmlSchemaNewParserCtxt(url.as_ptr()) };
    let parser = Owned::new(parser, xmlSchemaFreeParserCtxt)
        .ok_or(ValidateError::Allocation {
            what: "schema parser context",
        })?;

    // SAFETY: parser is a live context; the schema it returns is owned by us.
    let parsed = unsafe { xmlSchemaParse(parser.ptr) };
    Owned::new(parsed, xmlSchemaFree).ok_or_else(|| {
        ValidateError::SchemaParse {
            path: schema.to_path_buf(),
        }
    })
}

fn validate_doc(xml: &[u8], schema: &Path) -> Result<ValidationResult> {
    let schema = parse_schema(schema)?;
    let size = c_int::try_from(xml.len())
        .map_err(|_| ValidateError::DocumentTooLarge { len: xml.len() })?;

    // SAFETY: the buffer and its length describe `xml`; libxml2 copies what
    // it needs into the returned tree.
    let doc = unsafe {
        xmlReadMemory(
            xml.as_ptr().cast::<c_char>(),
            size,
            c"document.xml".as_ptr(),
            std::ptr::null(),
            XML_PARSE_NONET | XML_PARSE_NOERROR | XML_PARSE_NOWARNING,
        )
    };
    let Some(doc) = Owned::new(doc, xmlFreeDoc) else {
        return Ok(ValidationResult::new(
            ValidationStatus::Invalid,
            vec![Diagnostic::new(None, "document is not well-formed XML")],
        ));
    };

    // SAFETY: schema stays alive for the lifetime of the context.
    let ctxt = unsafe { xmlSchemaNewValidCtxt(schema.ptr) };
    let ctxt = Owned::new(ctxt, xmlSchemaFreeValidCtxt).ok_or(
        ValidateError::Allocation {
            what: "validation context",
        },
    )?;

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    // SAFETY: `diagnostics` outlives the validation call below; the callback
    // only runs inside xmlSchemaValidateDoc.
    let code = unsafe {
        xmlSchemaSetValidStructuredErrors(
            ctxt.ptr,
            Some(collect_error),
            std::ptr::from_mut(&mut diagnostics).cast::<c_void>(),
        );
        xmlSchemaValidateDoc(ctxt.ptr, doc.ptr)
    };
    tracing::trace!(code, messages = diagnostics.len(), "libxml2 validation");

    Ok(ValidationResult::new(
        ValidationStatus::from_code(code),
        diagnostics,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="Report">
    <xs:complexType>
      <xs:sequence>
        <xs:element name="Amount" type="xs:nonNegativeInteger"/>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
</xs:schema>
"#;

    fn schema_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("report.xsd");
        fs::write(&path, SCHEMA).unwrap();
        path
    }

    #[test]
    fn test_valid_document() {
        let dir = tempfile::tempdir().unwrap();
        let schema = schema_file(&dir);
        let result =
            Libxml2Validator::new().validate(b"<Report><Amount>12</Amount></Report>", &schema);
        assert!(result.passed(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_schema_violation_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let schema = schema_file(&dir);
        let result =
            Libxml2Validator::new().validate(b"<Report><Amount>-3</Amount></Report>", &schema);
        assert_eq!(result.status, ValidationStatus::Invalid);
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn test_undeclared_root_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let schema = schema_file(&dir);
        let result = Libxml2Validator::new().validate(
            b"<TotallyWrongRoot><Junk>1</Junk></TotallyWrongRoot>",
            &schema,
        );
        assert_eq!(result.status, ValidationStatus::Invalid);
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| d.message.contains("TotallyWrongRoot"))
        );
    }

    #[test]
    fn test_missing_schema_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Libxml2Validator::new()
            .validate(b"<Report/>", &dir.path().join("missing.xsd"));
        assert!(matches!(
            result.status,
            ValidationStatus::InternalError { .. }
        ));
    }
}
