//! Registry service facade.
//!
//! Wires a [`RegistrationService`] and a [`DirectoryService`] onto one [`JsonFileStore`] at the
//! location named by [`CoreConfig`]. Front-ends hold one of these and call straight through.

use crate::config::CoreConfig;
use crate::directory::DirectoryService;
use crate::registration::RegistrationService;
use crate::store::{JsonFileStore, RecordStore};
use std::sync::Arc;

/// Pure patient data operations - no presentation concerns
#[derive(Clone)]
pub struct RegistryService {
    cfg: Arc<CoreConfig>,
    registration: RegistrationService,
    directory: DirectoryService,
}

impl RegistryService {
    /// Creates a service storing the registry at `cfg.data_file()`.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        let store: Arc<dyn RecordStore> = Arc::new(JsonFileStore::new(cfg.data_file()));
        Self::with_store(cfg, store)
    }

    /// Creates a service over an arbitrary [`RecordStore`].
    pub fn with_store(cfg: Arc<CoreConfig>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            cfg,
            registration: RegistrationService::new(store.clone()),
            directory: DirectoryService::new(store),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn registration(&self) -> &RegistrationService {
        &self.registration
    }

    pub fn directory(&self) -> &DirectoryService {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::{PatientFields, Sex};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn registration_is_visible_through_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = Arc::new(CoreConfig::new(temp_dir.path().join("pacientes.json")));
        let service = RegistryService::new(cfg);

        let record = service
            .registration()
            .register(PatientFields {
                full_name: "Ana Silva".into(),
                national_id: "111.111.111-11".into(),
                phone: "(11) 91234-5678".into(),
                birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
                sex: Sex::Female,
                ..Default::default()
            })
            .expect("register should succeed");

        assert_eq!(
            service.directory().get(&record.national_id).unwrap(),
            Some(record)
        );
        assert!(service.config().data_file().is_file());
    }
}
