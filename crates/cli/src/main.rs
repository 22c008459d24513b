use clap::{Parser, Subcommand};
use pmr_core::{
    config::patient_data_file_from_env_value, CoreConfig, PatientFields, PatientPatch,
    PatientService, PatientView, SortField, SortOrder, PATIENT_DATA_FILE_ENV,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pmr")]
#[command(about = "Patient metrics registry CLI")]
struct Cli {
    /// Patient record file (defaults to $PATIENT_DATA_FILE, then patient.json)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    List,
    /// Show one patient with BMI and verdict
    View {
        /// Patient id (first letter is capitalised, the rest lower-cased)
        id: String,
    },
    /// Create a patient
    Create {
        /// Patient id, stored exactly as given
        id: String,
        name: String,
        city: String,
        age: i64,
        /// male or female
        gender: String,
        /// Height in metres
        height: f64,
        /// Weight in kilograms
        weight: f64,
    },
    /// Update some fields of a patient
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        age: Option<i64>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        weight: Option<f64>,
    },
    /// Delete a patient
    Delete { id: String },
    /// Print all patients sorted by height, weight or bmi
    Sort {
        sort_by: String,
        /// asc or desc
        #[arg(long, default_value = "asc")]
        order: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let data_file = cli
        .data_file
        .unwrap_or_else(|| patient_data_file_from_env_value(std::env::var(PATIENT_DATA_FILE_ENV).ok()));
    let service = PatientService::new(Arc::new(CoreConfig::new(data_file)?));

    match cli.command {
        Some(Commands::List) => match service.list() {
            Ok(patients) if patients.is_empty() => println!("No patients found."),
            Ok(patients) => {
                for (id, view) in patients {
                    println!("ID: {}, {}", id, describe(&view));
                }
            }
            Err(e) => eprintln!("Error listing patients: {}", e),
        },
        Some(Commands::View { id }) => match service.view(&id) {
            Ok(view) => println!("{}", describe(&view)),
            Err(e) => eprintln!("Error viewing patient: {}", e),
        },
        Some(Commands::Create {
            id,
            name,
            city,
            age,
            gender,
            height,
            weight,
        }) => {
            let fields = PatientFields {
                name,
                city,
                age,
                gender,
                height,
                weight,
            };
            match service.create(&id, fields) {
                Ok(id) => println!("Created patient {}", id),
                Err(e) => eprintln!("Error creating patient: {}", e),
            }
        }
        Some(Commands::Update {
            id,
            name,
            city,
            age,
            gender,
            height,
            weight,
        }) => {
            let patch = PatientPatch {
                name,
                city,
                age,
                gender,
                height,
                weight,
            };
            match service.update(&id, patch) {
                Ok(view) => println!("Updated patient: {}", describe(&view)),
                Err(e) => eprintln!("Error updating patient: {}", e),
            }
        }
        Some(Commands::Delete { id }) => match service.delete(&id) {
            Ok(()) => println!("Deleted patient {}", id),
            Err(e) => eprintln!("Error deleting patient: {}", e),
        },
        Some(Commands::Sort { sort_by, order }) => {
            let sorted = SortField::parse(&sort_by.to_lowercase()).and_then(|field| {
                let order = SortOrder::parse(&order.to_lowercase())?;
                service.sort(field, order)
            });
            match sorted {
                Ok(views) => {
                    for view in views {
                        println!("{}", describe(&view));
                    }
                }
                Err(e) => eprintln!("Error sorting patients: {}", e),
            }
        }
        None => {
            println!("Use 'pmr --help' for commands");
        }
    }

    Ok(())
}

fn describe(view: &PatientView) -> String {
    let record = &view.record;
    format!(
        "Name: {}, City: {}, Age: {}, Gender: {}, Height: {} m, Weight: {} kg, BMI: {} ({})",
        record.name(),
        record.city(),
        record.age().years(),
        record.gender(),
        record.height(),
        record.weight(),
        view.bmi,
        view.verdict
    )
}
