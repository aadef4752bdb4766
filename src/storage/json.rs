//! Interchange JSON files
//!
//! Deferred exports are written as a pretty-printed array of objects. Reading
//! also accepts line-delimited JSON, one object per line.

use crate::storage::traits::{StorageError, StorageResult};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes `documents` to `path` as a JSON array, replacing any existing file
pub fn write_documents(path: &Path, documents: &[Value]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, documents)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads documents from a JSON array file or a line-delimited JSON file
pub fn read_documents(path: &Path) -> StorageResult<Vec<Value>> {
    let content = std::fs::read_to_string(path)?;
    let trimmed = content.trim_start();

    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return match serde_json::from_str::<Value>(&content)? {
            Value::Array(documents) => Ok(documents),
            _ => Err(interchange_error(path, "expected a JSON array")),
        };
    }

    let mut documents = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line).map_err(|e| {
            interchange_error(path, &format!("line {}: {}", line_no + 1, e))
        })?;

        if !value.is_object() {
            return Err(interchange_error(
                path,
                &format!("line {}: expected a JSON object", line_no + 1),
            ));
        }
        documents.push(value);
    }

    Ok(documents)
}

fn interchange_error(path: &Path, message: &str) -> StorageError {
    StorageError::Interchange {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}
