use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pmr_core::{
    config::patient_data_file_from_env_value, CoreConfig, PatientService, PATIENT_DATA_FILE_ENV,
};

/// Main entry point for the PMR application
///
/// Starts the REST server over the configured patient record file.
///
/// # Environment Variables
/// - `PMR_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PATIENT_DATA_FILE`: JSON file holding all patient records (default: "patient.json")
/// - `RUST_LOG`: tracing filter, added to the default `pmr=info` directives
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, binding or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pmr_run=info".parse()?)
                .add_directive("pmr_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PMR_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let patient_data_file: PathBuf =
        patient_data_file_from_env_value(std::env::var(PATIENT_DATA_FILE_ENV).ok());

    let cfg = Arc::new(CoreConfig::new(patient_data_file)?);
    tracing::info!(
        "++ Using patient data file {}",
        cfg.patient_data_file().display()
    );

    let app = api_rest::router(PatientService::new(cfg));

    tracing::info!("++ Starting PMR REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
