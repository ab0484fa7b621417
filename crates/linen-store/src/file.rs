use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use linen_types::Document;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::codec::{decode_document, encode_document};
use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

/// Document store backed by a single JSON file.
///
/// Saves write the encoded document to a temporary file in the same
/// directory, sync it, then rename it over the target, so readers never see
/// a partially written document. Last writer wins when several processes
/// share one file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> StoreResult<Option<Document>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored document");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(decode_document(&raw))
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        let encoded = encode_document(document)?;
        let dir = self.directory();
        fs::create_dir_all(&dir)?;

        let mut temp = NamedTempFile::new_in(&dir)?;
        temp.write_all(encoded.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path)
            .map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %self.path.display(), len = encoded.len(), "document saved");
        Ok(())
    }
}
