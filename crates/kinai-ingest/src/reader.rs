//! CSV file intake: upload constraints applied before parsing.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use kinai_model::RawTable;

use crate::error::{IngestError, Result};
use crate::parser::parse_csv;

/// Maximum accepted CSV upload size (100 MB).
pub const MAX_CSV_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Rejects paths whose extension is not `csv` (any case).
pub fn check_extension(path: &Path) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(())
    } else {
        Err(IngestError::NotCsvFile {
            path: path.to_path_buf(),
        })
    }
}

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Rejects files that start with a UTF-16 byte-order mark.
///
/// A UTF-8 BOM is accepted and stripped during parsing.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;

    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read == 2 {
        let encoding = match buffer {
            [0xFF, 0xFE] => Some("UTF-16 LE"),
            [0xFE, 0xFF] => Some("UTF-16 BE"),
            _ => None,
        };
        if let Some(encoding) = encoding {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding,
            });
        }
    }

    Ok(())
}

/// Reads a CSV file as UTF-8 text after checking extension, size and
/// encoding.
pub fn read_csv_text(path: &Path) -> Result<String> {
    check_extension(path)?;
    check_file_size(path)?;
    validate_encoding(path)?;

    let bytes = std::fs::read(path).map_err(|e| open_error(path, e))?;
    String::from_utf8(bytes).map_err(|_| IngestError::InvalidUtf8 {
        path: path.to_path_buf(),
    })
}

/// Reads and parses a CSV file into a [`RawTable`].
pub fn read_csv_file(path: &Path) -> Result<RawTable> {
    let text = read_csv_text(path)?;
    let table = parse_csv(&text)?;

    tracing::debug!(
        path = %path.display(),
        columns = table.headers().len(),
        rows = table.total_rows(),
        "loaded CSV file"
    );

    Ok(table)
}

fn open_error(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}
