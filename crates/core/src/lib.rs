//! # Registry Core
//!
//! Core business logic for the patient registry.
//!
//! This crate contains pure data operations over a single JSON document:
//! - Patient registration with required-field validation and duplicate rejection
//! - Listing, label resolution and key lookup for display front-ends
//! - Whole-document persistence keyed by national ID (CPF)
//!
//! **No presentation concerns**: forms, tables and HTTP handlers belong in `registry-cli` and
//! `api-rest`. Both call into this crate through [`RegistryService`].

pub mod config;
pub mod constants;
pub mod directory;
pub mod error;
pub mod patient;
pub mod registration;
pub mod service;
pub mod store;

pub use config::CoreConfig;
pub use constants::DEFAULT_DATA_FILE;
pub use directory::{DetailRow, DirectoryService, PatientTable};
pub use error::{RegistryError, RegistryResult, StorageError, StorageResult, ValidationError};
pub use patient::{PatientFields, PatientRecord, Registry, Sex};
pub use registration::RegistrationService;
pub use service::RegistryService;
pub use store::{JsonFileStore, RecordStore};
