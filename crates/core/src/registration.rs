//! Patient registration.
//!
//! Validates submitted fields, rejects national IDs that are already registered, and appends
//! the new record to the persisted registry.
//!
//! Load, check and save run as one critical section behind a mutex shared by every clone of
//! the service, so concurrent registrations in one process cannot overwrite each other.
//! Separate processes writing the same file are not coordinated.

use crate::error::{RegistryError, RegistryResult};
use crate::patient::{PatientFields, PatientRecord};
use crate::store::RecordStore;
use chrono::{Local, NaiveDateTime, SubsecRound};
use std::sync::{Arc, Mutex};

/// Service for registering new patients.
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn RecordStore>,
    write_lock: Arc<Mutex<()>>,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Registers a new patient, timestamped with the current local time.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if:
    /// - a required field (name, national ID, phone, sex) is empty ([`RegistryError::Validation`])
    /// - the national ID is already registered ([`RegistryError::Duplicate`])
    /// - the registry cannot be loaded or saved ([`RegistryError::Storage`])
    ///
    /// Nothing is written unless the new record was fully built.
    pub fn register(&self, fields: PatientFields) -> RegistryResult<PatientRecord> {
        let now = Local::now().naive_local().trunc_subsecs(0);
        self.register_at(fields, now)
    }

    /// Registers a new patient with an explicit registration timestamp.
    ///
    /// Sub-second precision is dropped, matching what the document can hold.
    pub fn register_at(
        &self,
        fields: PatientFields,
        registered_at: NaiveDateTime,
    ) -> RegistryResult<PatientRecord> {
        if let Err(e) = fields.validate() {
            tracing::warn!("rejected registration: {}", e);
            return Err(e.into());
        }

        let record = fields.into_record(registered_at.trunc_subsecs(0));

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut registry = self.store.load()?;
        if !registry.insert(record.clone()) {
            tracing::warn!(
                "rejected registration: national ID {} already registered",
                record.national_id
            );
            return Err(RegistryError::Duplicate {
                national_id: record.national_id,
            });
        }
        self.store.save(&registry)?;

        tracing::info!(
            "registered patient {} ({} total)",
            record.national_id,
            registry.len()
        );
        Ok(record)
    }
}
