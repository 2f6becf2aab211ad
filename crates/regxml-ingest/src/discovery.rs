//! File discovery for input and output folders.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Spreadsheet extensions accepted as report input.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xls", "xlsx"];

/// Lists all `.xls`/`.xlsx` files in a directory.
///
/// Returns files sorted by filename.
pub fn list_workbooks(dir: &Path) -> Result<Vec<PathBuf>> {
    list_files(dir, WORKBOOK_EXTENSIONS)
}

/// Like [`list_workbooks`], but an empty result is an error.
pub fn require_workbooks(dir: &Path) -> Result<Vec<PathBuf>> {
    let files = list_workbooks(dir)?;
    if files.is_empty() {
        return Err(IngestError::NoInputFilesFound {
            path: dir.to_path_buf(),
        });
    }
    Ok(files)
}

/// Lists all `.xml` files in a directory, sorted by filename.
pub fn list_xml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    list_files(dir, &["xml"])
}

fn list_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        // Case-insensitive extension match
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)));

        if matches {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in ["fund_b.XLSX", "fund_a.xls", "notes.txt", "fund_c.xlsx", "out.xml"] {
            std::fs::write(dir.path().join(name), "data").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.xlsx")).unwrap();
        dir
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_list_workbooks_sorted_case_insensitive() {
        let dir = create_test_dir();
        let files = list_workbooks(dir.path()).unwrap();
        assert_eq!(
            names(&files),
            vec!["fund_a.xls", "fund_b.XLSX", "fund_c.xlsx"]
        );
    }

    #[test]
    fn test_list_xml_files() {
        let dir = create_test_dir();
        let files = list_xml_files(dir.path()).unwrap();
        assert_eq!(names(&files), vec!["out.xml"]);
    }

    #[test]
    fn test_require_workbooks_empty_dir() {
        let dir = TempDir::new().unwrap();
        let err = require_workbooks(dir.path()).unwrap_err();
        assert!(matches!(err, IngestError::NoInputFilesFound { .. }));
    }

    #[test]
    fn test_list_workbooks_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("report.xlsx");
        std::fs::write(&file_path, "data").unwrap();

        let result = list_workbooks(&file_path);
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }
}
