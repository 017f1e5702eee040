//! Constants used throughout the registry core crate.
//!
//! Keeps file names, wire formats and display strings in one place so the store, the
//! directory and the front-ends agree on them.

/// Default data file when no explicit location is configured.
pub const DEFAULT_DATA_FILE: &str = "pacientes.json";

/// Extension used for the temporary file written before the atomic rename.
pub const TEMP_FILE_EXTENSION: &str = "tmp";

/// Birth date format in the persisted document (`DD/MM/YYYY`).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Registration timestamp format in the persisted document (`DD/MM/YYYY HH:MM:SS`).
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Separator between name and national ID in a selection label.
pub const LABEL_SEPARATOR: &str = " - ";

/// Placeholder shown in detail views for absent values.
pub const NOT_PROVIDED: &str = "Não informado";

/// Display headers of the patient table, in column order.
pub const TABLE_COLUMNS: [&str; 9] = [
    "CPF",
    "Nome",
    "Telefone",
    "Email",
    "Data Nascimento",
    "Sexo",
    "Endereço",
    "Observações",
    "Data Cadastro",
];
