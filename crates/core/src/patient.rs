//! Patient records and the registry aggregate.
//!
//! Responsibilities:
//! - Define the domain-level [`PatientRecord`], [`Sex`] and [`PatientFields`] types
//! - Define the on-disk wire shape (`nome`, `cpf`, `telefone`, ...) and translate to and from it
//! - Define the [`Registry`], an insertion-ordered mapping from national ID to record
//!
//! Notes:
//! - Dates are persisted as `DD/MM/YYYY`, registration timestamps as `DD/MM/YYYY HH:MM:SS`
//! - Absent optional text is persisted as an empty string and read back as `None`

use crate::constants::{DATE_FORMAT, LABEL_SEPARATOR, TIMESTAMP_FORMAT};
use crate::error::ValidationError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Public domain-level types
// ============================================================================

/// Patient sex as captured by the registration form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Sex {
    /// Nothing selected. Rejected by registration.
    #[default]
    Unspecified,
    Male,
    Female,
    Other,
}

impl Sex {
    /// Convert to the persisted wire string.
    pub fn to_wire(self) -> &'static str {
        match self {
            Sex::Unspecified => "",
            Sex::Male => "Masculino",
            Sex::Female => "Feminino",
            Sex::Other => "Outro",
        }
    }

    /// Parse from the persisted wire string.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "" => Some(Sex::Unspecified),
            "Masculino" => Some(Sex::Male),
            "Feminino" => Some(Sex::Female),
            "Outro" => Some(Sex::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_wire())
    }
}

/// Accepts the wire strings plus English names (`male`, `female`, `other`) in any case.
impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(sex) = Sex::from_wire(trimmed) {
            return Ok(sex);
        }
        match trimmed.to_lowercase().as_str() {
            "masculino" | "male" | "m" => Ok(Sex::Male),
            "feminino" | "female" | "f" => Ok(Sex::Female),
            "outro" | "other" => Ok(Sex::Other),
            "unspecified" => Ok(Sex::Unspecified),
            _ => Err(format!("unknown sex '{trimmed}'")),
        }
    }
}

/// A registered patient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PatientWire", into = "PatientWire")]
pub struct PatientRecord {
    pub full_name: String,
    /// National ID (CPF). Unique, and the registry key.
    pub national_id: String,
    pub phone: String,
    pub email: Option<String>,
    pub birth_date: NaiveDate,
    pub sex: Sex,
    pub address: Option<String>,
    pub notes: Option<String>,
    /// Local time of registration at second precision. Never changes after creation.
    pub registered_at: NaiveDateTime,
}

impl PatientRecord {
    /// Selection label, `"<name> - <national id>"`.
    pub fn label(&self) -> String {
        format!("{}{}{}", self.full_name, LABEL_SEPARATOR, self.national_id)
    }

    pub fn birth_date_display(&self) -> String {
        self.birth_date.format(DATE_FORMAT).to_string()
    }

    pub fn registered_at_display(&self) -> String {
        self.registered_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Raw values submitted by a front-end for a new registration.
///
/// Text is trimmed before use. Optional fields left blank become `None` on the record.
///
/// The national ID is trimmed too, before the duplicate check. A document written by an
/// older front-end that stored `" 111"` as a key will therefore not collide with a new `"111"`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientFields {
    pub full_name: String,
    pub national_id: String,
    pub phone: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub sex: Sex,
    pub address: String,
    pub notes: String,
}

impl PatientFields {
    /// Check that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing all missing fields by their wire name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.full_name.trim().is_empty() {
            missing.push("nome");
        }
        if self.national_id.trim().is_empty() {
            missing.push("cpf");
        }
        if self.phone.trim().is_empty() {
            missing.push("telefone");
        }
        if self.sex == Sex::Unspecified {
            missing.push("sexo");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// Build the record to persist. Callers validate first.
    pub fn into_record(self, registered_at: NaiveDateTime) -> PatientRecord {
        PatientRecord {
            full_name: self.full_name.trim().to_string(),
            national_id: self.national_id.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: optional_text(&self.email),
            birth_date: self.birth_date,
            sex: self.sex,
            address: optional_text(&self.address),
            notes: optional_text(&self.notes),
            registered_at,
        }
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ============================================================================
// Registry aggregate
// ============================================================================

/// All registered patients, keyed by national ID, in insertion order.
///
/// Serialises as a JSON object whose keys are national IDs. Lookups are linear scans.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
    records: Vec<PatientRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, national_id: &str) -> bool {
        self.get(national_id).is_some()
    }

    pub fn get(&self, national_id: &str) -> Option<&PatientRecord> {
        self.records.iter().find(|r| r.national_id == national_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatientRecord> {
        self.records.iter()
    }

    /// Append a record. Returns `false`, leaving the registry unchanged, when its national ID
    /// is already present.
    pub fn insert(&mut self, record: PatientRecord) -> bool {
        if self.contains(&record.national_id) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Build a registry from `(key, record)` pairs as read from a document.
    ///
    /// A repeated key keeps its first position and takes the last value.
    ///
    /// # Errors
    ///
    /// Returns the offending `(key, cpf)` pair when a key differs from its record's national ID.
    pub(crate) fn from_entries(
        entries: Vec<(String, PatientRecord)>,
    ) -> Result<Self, (String, String)> {
        let mut records: Vec<PatientRecord> = Vec::with_capacity(entries.len());
        for (key, record) in entries {
            if key != record.national_id {
                return Err((key, record.national_id));
            }
            match records.iter_mut().find(|r| r.national_id == key) {
                Some(existing) => *existing = record,
                None => records.push(record),
            }
        }
        Ok(Self { records })
    }

    pub fn into_records(self) -> Vec<PatientRecord> {
        self.records
    }
}

impl Serialize for Registry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.national_id, record)?;
        }
        map.end()
    }
}

/// Document entries in the order they appear, before key checks.
pub(crate) struct RegistryEntries(pub(crate) Vec<(String, PatientRecord)>);

impl<'de> Deserialize<'de> for RegistryEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RegistryEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping national IDs to patient records")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, record)) = access.next_entry::<String, PatientRecord>()? {
                    entries.push((key, record));
                }
                Ok(RegistryEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// On-disk representation of one patient.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
struct PatientWire {
    nome: String,
    cpf: String,
    telefone: String,
    #[serde(default)]
    email: String,
    data_nascimento: String,
    sexo: String,
    #[serde(default)]
    endereco: String,
    #[serde(default)]
    observacoes: String,
    data_cadastro: String,
}

impl TryFrom<PatientWire> for PatientRecord {
    type Error = String;

    fn try_from(wire: PatientWire) -> Result<Self, Self::Error> {
        let birth_date = NaiveDate::parse_from_str(&wire.data_nascimento, DATE_FORMAT)
            .map_err(|e| format!("invalid data_nascimento '{}': {e}", wire.data_nascimento))?;
        let registered_at = NaiveDateTime::parse_from_str(&wire.data_cadastro, TIMESTAMP_FORMAT)
            .map_err(|e| format!("invalid data_cadastro '{}': {e}", wire.data_cadastro))?;
        let sex =
            Sex::from_wire(&wire.sexo).ok_or_else(|| format!("invalid sexo '{}'", wire.sexo))?;

        Ok(PatientRecord {
            full_name: wire.nome,
            national_id: wire.cpf,
            phone: wire.telefone,
            email: optional_text(&wire.email),
            birth_date,
            sex,
            address: optional_text(&wire.endereco),
            notes: optional_text(&wire.observacoes),
            registered_at,
        })
    }
}

impl From<PatientRecord> for PatientWire {
    fn from(record: PatientRecord) -> Self {
        PatientWire {
            data_nascimento: record.birth_date_display(),
            data_cadastro: record.registered_at_display(),
            nome: record.full_name,
            cpf: record.national_id,
            telefone: record.phone,
            email: record.email.unwrap_or_default(),
            sexo: record.sex.to_wire().to_string(),
            endereco: record.address.unwrap_or_default(),
            observacoes: record.notes.unwrap_or_default(),
        }
    }
}
