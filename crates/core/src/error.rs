use std::path::PathBuf;

/// Failures reading or writing the persisted registry document.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read registry file {path}: {source}", path = .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write registry file {path}: {source}", path = .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create storage directory {path}: {source}", path = .path.display())]
    StorageDirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed registry file {path}: {source}", path = .path.display())]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize registry: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error(
        "registry file {path} stores record with cpf '{cpf}' under key '{key}'",
        path = .path.display()
    )]
    InconsistentKey { path: PathBuf, key: String, cpf: String },
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Required fields missing from a registration request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("required fields missing: {}", .missing.join(", "))]
pub struct ValidationError {
    /// Wire names of the missing fields, in form order.
    pub missing: Vec<&'static str>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("national ID '{national_id}' is already registered")]
    Duplicate { national_id: String },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
