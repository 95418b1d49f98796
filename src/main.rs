use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info, warn};

use transcription_intake::config::{IntakeConfig, MetricsConfig, ServerConfig, StoreConfig};
use transcription_intake::config_loader;
use transcription_intake::handlers::{job_status, transcribe};
use transcription_intake::job_store::JobStore;
use transcription_intake::metrics::metrics::{create_metrics_exporter, Metrics};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Seed the environment from the optional config file before anything
    // reads configuration
    config_loader::load_config();

    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Load configurations
    let server_config = ServerConfig::default();
    let intake_config = IntakeConfig::default();
    let store_config = StoreConfig::default();
    let metrics_config = MetricsConfig::default();

    // Initialize metrics
    let exporter = create_metrics_exporter(
        &metrics_config.backend,
        metrics_config.endpoint.as_deref(),
        metrics_config.prefix.as_deref(),
    );
    let metrics = Metrics::new(exporter);

    // Create the upload directory if it doesn't exist
    if let Err(e) = intake_config.ensure_upload_dir() {
        warn!(
            "Failed to create upload directory {}: {}",
            intake_config.upload_dir, e
        );
    }

    // Connect to the shared job store; the handle is cloned into every worker
    let store = match JobStore::connect(&store_config).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to connect to job store at {}: {}", store_config.url(), e);
            return Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e));
        }
    };
    info!("Connected to job store at {}", store_config.url());

    info!(
        "Starting transcription intake server on http://{}:{}",
        server_config.host, server_config.port
    );
    info!("Upload directory: {}", intake_config.upload_dir);
    info!("Metrics backend: {}", metrics_config.backend);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(intake_config.clone()))
            .app_data(web::Data::new(metrics.clone()))
            .service(transcribe)
            .service(job_status)
    })
    .bind(format!("{}:{}", server_config.host, server_config.port))?
    .client_disconnect_timeout(server_config.client_timeout)
    .keep_alive(server_config.keep_alive)
    .run()
    .await?;

    // Dropping the last store handle closes the connection with the process
    info!("Transcription intake server stopped");
    Ok(())
}
