//! Line-delimited JSON file sink

use crate::model::EntityKind;
use crate::storage::traits::{DocumentSink, StorageResult};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends documents to `<dir>/<collection>.jsonl`, one object per line
pub struct JsonLinesSink {
    dir: PathBuf,
}

impl JsonLinesSink {
    pub fn new(dir: &Path) -> StorageResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Path of the file backing `kind`
    pub fn path_for(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(format!("{}.jsonl", kind.collection_name()))
    }

    fn open(&self, kind: EntityKind) -> StorageResult<BufWriter<File>> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(kind))?;
        Ok(BufWriter::new(file))
    }
}

impl DocumentSink for JsonLinesSink {
    fn insert_one(&mut self, collection: &str, document: &Value) -> StorageResult<bool> {
        Ok(self.insert_many(collection, std::slice::from_ref(document))? == 1)
    }

    fn insert_many(&mut self, collection: &str, documents: &[Value]) -> StorageResult<usize> {
        let Some(kind) = EntityKind::from_collection_name(collection) else {
            tracing::debug!("Ignoring write to unknown collection '{}'", collection);
            return Ok(0);
        };

        let mut writer = self.open(kind)?;
        for document in documents {
            serde_json::to_writer(&mut writer, document)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        Ok(documents.len())
    }
}
