//! Registry persistence.
//!
//! The whole [`Registry`] lives in one JSON document. It is read in full at the start of every
//! operation and rewritten in full after every mutation.
//!
//! ## Document Layout
//!
//! ```text
//! {
//!     "111.111.111-11": {
//!         "nome": "Ana Silva",
//!         "cpf": "111.111.111-11",
//!         ...
//!         "data_cadastro": "01/03/2025 09:30:05"
//!     }
//! }
//! ```
//!
//! Writes go to a sibling `.tmp` file which is then renamed over the target, so a reader
//! never sees a half-written document.

use crate::constants::TEMP_FILE_EXTENSION;
use crate::error::{StorageError, StorageResult};
use crate::patient::{Registry, RegistryEntries};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Load and save the complete registry.
///
/// Callers only see whole registries, so a keyed backend (one record per key) can replace the
/// single document without changing them.
pub trait RecordStore: Send + Sync {
    /// Returns the persisted registry, or an empty one when nothing has been persisted yet.
    fn load(&self) -> StorageResult<Registry>;

    /// Replaces the persisted registry with `registry`.
    fn save(&self, registry: &Registry) -> StorageResult<()>;
}

/// [`RecordStore`] backed by a single JSON file.
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

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(TEMP_FILE_EXTENSION);
        self.path.with_file_name(name)
    }

    fn render(registry: &Registry) -> StorageResult<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        registry
            .serialize(&mut serializer)
            .map_err(StorageError::Serialization)?;
        Ok(buf)
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> StorageResult<Registry> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("no registry at {}, starting empty", self.path.display());
                return Ok(Registry::new());
            }
            Err(source) => {
                return Err(StorageError::FileRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let RegistryEntries(entries) = serde_json::from_str::<RegistryEntries>(&contents)
            .map_err(|source| StorageError::Deserialization {
                path: self.path.clone(),
                source,
            })?;

        let registry =
            Registry::from_entries(entries).map_err(|(key, cpf)| StorageError::InconsistentKey {
                path: self.path.clone(),
                key,
                cpf,
            })?;

        tracing::debug!(
            "loaded {} patient(s) from {}",
            registry.len(),
            self.path.display()
        );
        Ok(registry)
    }

    fn save(&self, registry: &Registry) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::StorageDirCreation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let data = Self::render(registry)?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, data).map_err(|source| StorageError::FileWrite {
            path: temp_path.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StorageError::FileWrite {
                path: self.path.clone(),
                source,
            });
        }

        tracing::debug!(
            "saved {} patient(s) to {}",
            registry.len(),
            self.path.display()
        );
        Ok(())
    }
}
