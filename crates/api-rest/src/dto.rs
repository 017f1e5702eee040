//! Request and response bodies for the REST API.
//!
//! Dates are rendered in the registry's display formats (`DD/MM/YYYY` and
//! `DD/MM/YYYY HH:MM:SS`), sex as its display string (`Masculino`, `Feminino`, `Outro`).

use registry_core::{DirectoryService, PatientRecord};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    pub full_name: String,
    pub national_id: String,
    pub phone: String,
    pub email: Option<String>,
    pub birth_date: String,
    pub sex: String,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub registered_at: String,
    /// Selection label, `"<name> - <cpf>"`.
    pub label: String,
}

impl From<PatientRecord> for PatientRes {
    fn from(record: PatientRecord) -> Self {
        Self {
            label: record.label(),
            birth_date: record.birth_date_display(),
            registered_at: record.registered_at_display(),
            sex: record.sex.to_string(),
            full_name: record.full_name,
            national_id: record.national_id,
            phone: record.phone,
            email: record.email,
            address: record.address,
            notes: record.notes,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    pub total: usize,
    pub patients: Vec<PatientRes>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientReq {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub national_id: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    /// `DD/MM/YYYY` or `YYYY-MM-DD`.
    pub birth_date: String,
    /// `Masculino`, `Feminino`, `Outro` (or `male`, `female`, `other`).
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientRes {
    pub patient: PatientRes,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientTableRes {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LabelsRes {
    pub labels: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DetailRowRes {
    pub label: String,
    pub value: String,
}

/// A patient together with its detail-view rows.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientDetailRes {
    pub patient: PatientRes,
    pub details: Vec<DetailRowRes>,
}

impl From<PatientRecord> for PatientDetailRes {
    fn from(record: PatientRecord) -> Self {
        let details = DirectoryService::detail(&record)
            .into_iter()
            .map(|row| DetailRowRes {
                label: row.label.to_string(),
                value: row.value,
            })
            .collect();
        Self {
            patient: PatientRes::from(record),
            details,
        }
    }
}
