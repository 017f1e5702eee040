use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use registry_core::{CoreConfig, DirectoryService, PatientFields, RegistryService, Sex};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "registry")]
#[command(about = "Patient registry CLI")]
struct Cli {
    /// Registry JSON file
    #[arg(long, global = true, env = "REGISTRY_DATA_FILE")]
    data_file: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new patient
    Register {
        /// Full name
        #[arg(long)]
        name: String,
        /// National ID (CPF), e.g. 000.000.000-00
        #[arg(long)]
        cpf: String,
        /// Phone, e.g. (00) 00000-0000
        #[arg(long)]
        phone: String,
        /// Date of birth (DD/MM/YYYY or YYYY-MM-DD)
        #[arg(long, value_parser = parse_birth_date)]
        birth_date: NaiveDate,
        /// Masculino, Feminino or Outro
        #[arg(long)]
        sex: Option<Sex>,
        #[arg(long)]
        email: Option<String>,
        /// Street, number, district, city
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List all patients
    List,
    /// Print selection labels
    Labels,
    /// Print the number of registered patients
    Count,
    /// Show one patient's details
    Show {
        /// Selection label, "<name> - <cpf>"
        #[arg(long, conflicts_with = "cpf", required_unless_present = "cpf")]
        label: Option<String>,
        #[arg(long)]
        cpf: Option<String>,
    },
    /// Edit a patient (not implemented yet)
    Edit { cpf: String },
    /// Delete a patient (not implemented yet)
    Delete { cpf: String },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("registry_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = Arc::new(CoreConfig::from_optional(cli.data_file));
    let service = RegistryService::new(cfg);

    match cli.command {
        Some(Commands::Register {
            name,
            cpf,
            phone,
            birth_date,
            sex,
            email,
            address,
            notes,
        }) => {
            let fields = PatientFields {
                full_name: name,
                national_id: cpf,
                phone,
                email: email.unwrap_or_default(),
                birth_date,
                sex: sex.unwrap_or_default(),
                address: address.unwrap_or_default(),
                notes: notes.unwrap_or_default(),
            };
            let record = service
                .registration()
                .register(fields)
                .context("registration failed")?;
            println!("Registered patient: {}", record.label());
            print_detail(&record);
        }
        Some(Commands::List) => {
            let table = service.directory().table()?;
            if table.is_empty() {
                println!("No patients registered.");
            } else {
                println!("Total patients: {}", table.rows.len());
                print!("{}", render_table(&table.columns, &table.rows));
            }
        }
        Some(Commands::Labels) => {
            for label in service.directory().labels()? {
                println!("{}", label);
            }
        }
        Some(Commands::Count) => {
            println!("{}", service.directory().count()?);
        }
        Some(Commands::Show { label, cpf }) => {
            let directory = service.directory();
            let found = match (label.as_deref(), cpf.as_deref()) {
                (Some(label), _) => directory.find_by_label(label)?,
                (None, Some(cpf)) => directory.get(cpf)?,
                (None, None) => None,
            };
            match found {
                Some(record) => print_detail(&record),
                None => anyhow::bail!("patient not found"),
            }
        }
        Some(Commands::Edit { cpf }) => {
            anyhow::bail!("editing patients is not implemented yet (cpf {})", cpf);
        }
        Some(Commands::Delete { cpf }) => {
            anyhow::bail!("deleting patients is not implemented yet (cpf {})", cpf);
        }
        None => {
            println!("Use 'registry --help' for commands");
        }
    }

    Ok(())
}

fn parse_birth_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|_| format!("'{value}' is not a date (expected DD/MM/YYYY or YYYY-MM-DD)"))
}

fn print_detail(record: &registry_core::PatientRecord) {
    for row in DirectoryService::detail(record) {
        println!("{}: {}", row.label, row.value);
    }
}

/// Left-aligned plain-text table, columns padded to their widest cell.
fn render_table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = format_line(columns.to_vec());
    for row in rows {
        out.push_str(&format_line(row.iter().map(String::as_str).collect()));
    }
    out
}
