use actix_web::HttpServer;
use minimal_weather_api::{
    AppConfig, create_app,
    telemetry::{LogFormat, init_tracing},
};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = init_tracing(LogFormat::from_env()) {
        eprintln!("Failed to initialize tracing: {e}");
    }

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    tracing::info!(
        environment = %config.environment,
        bind_address = %config.bind_address,
        https_port = ?config.https.https_port,
        signing_keys = config.jwt_bearer.signing_keys.len(),
        valid_audiences = ?config.jwt_bearer.valid_audiences,
        "Starting weather API"
    );

    if config.jwt_bearer.signing_keys.is_empty() {
        tracing::warn!("No JWT signing key configured; every protected request will be rejected");
    }

    let bind_address = config.bind_address.clone();
    HttpServer::new(move || create_app(&config))
        .bind(bind_address)?
        .run()
        .await
}
