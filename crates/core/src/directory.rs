//! Patient directory.
//!
//! Read-only views over the registry for listing front-ends: the full record list, the
//! display table, selection labels, and the detail rows for a chosen patient.

use crate::constants::{NOT_PROVIDED, TABLE_COLUMNS};
use crate::error::RegistryResult;
use crate::patient::PatientRecord;
use crate::store::RecordStore;
use std::sync::Arc;

/// Rows of display strings, one per patient, under [`TABLE_COLUMNS`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl PatientTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One labelled value in a patient's detail view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

/// Service for enumerating and looking up registered patients.
#[derive(Clone)]
pub struct DirectoryService {
    store: Arc<dyn RecordStore>,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All patients in storage order. An empty list means nobody is registered yet.
    pub fn list(&self) -> RegistryResult<Vec<PatientRecord>> {
        Ok(self.store.load()?.into_records())
    }

    pub fn count(&self) -> RegistryResult<usize> {
        Ok(self.store.load()?.len())
    }

    pub fn is_empty(&self) -> RegistryResult<bool> {
        Ok(self.store.load()?.is_empty())
    }

    pub fn get(&self, national_id: &str) -> RegistryResult<Option<PatientRecord>> {
        Ok(self.store.load()?.get(national_id).cloned())
    }

    /// Selection labels (`"<name> - <national id>"`) in storage order.
    pub fn labels(&self) -> RegistryResult<Vec<String>> {
        Ok(self.store.load()?.iter().map(PatientRecord::label).collect())
    }

    /// Resolves a label produced by [`labels`](Self::labels) back to its patient.
    ///
    /// Returns `None` for labels that match no current record. Labels are not unique when a
    /// name contains `" - "` (`"A - B"`/`"C"` and `"A"`/`"B - C"` both read `"A - B - C"`);
    /// the first matching record in storage order wins.
    pub fn find_by_label(&self, label: &str) -> RegistryResult<Option<PatientRecord>> {
        let registry = self.store.load()?;
        let found = registry.iter().find(|r| r.label() == label).cloned();
        Ok(found)
    }

    /// Builds the listing table. Absent optional values render as empty cells.
    pub fn table(&self) -> RegistryResult<PatientTable> {
        let rows = self
            .store
            .load()?
            .iter()
            .map(|r| {
                vec![
                    r.national_id.clone(),
                    r.full_name.clone(),
                    r.phone.clone(),
                    r.email.clone().unwrap_or_default(),
                    r.birth_date_display(),
                    r.sex.to_string(),
                    r.address.clone().unwrap_or_default(),
                    r.notes.clone().unwrap_or_default(),
                    r.registered_at_display(),
                ]
            })
            .collect();

        Ok(PatientTable {
            columns: TABLE_COLUMNS.to_vec(),
            rows,
        })
    }

    /// Detail view rows for one patient.
    ///
    /// Email falls back to "Não informado"; address and notes appear only when present.
    pub fn detail(record: &PatientRecord) -> Vec<DetailRow> {
        let mut rows = vec![
            DetailRow {
                label: "Nome",
                value: record.full_name.clone(),
            },
            DetailRow {
                label: "CPF",
                value: record.national_id.clone(),
            },
            DetailRow {
                label: "Telefone",
                value: record.phone.clone(),
            },
            DetailRow {
                label: "Email",
                value: record
                    .email
                    .clone()
                    .unwrap_or_else(|| NOT_PROVIDED.to_string()),
            },
            DetailRow {
                label: "Data Nascimento",
                value: record.birth_date_display(),
            },
            DetailRow {
                label: "Sexo",
                value: record.sex.to_string(),
            },
            DetailRow {
                label: "Data Cadastro",
                value: record.registered_at_display(),
            },
        ];

        if let Some(address) = &record.address {
            rows.push(DetailRow {
                label: "Endereço",
                value: address.clone(),
            });
        }
        if let Some(notes) = &record.notes {
            rows.push(DetailRow {
                label: "Observações",
                value: notes.clone(),
            });
        }

        rows
    }
}
