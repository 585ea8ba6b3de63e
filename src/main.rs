use std::sync::Arc;

use tracing::info;

use openlms::mail::{Mailer, SmtpMailer};
use openlms::{Config, Database, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let mut config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = openlms::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        openlms::logging::init_console_only(&config.logging.level);
    }

    info!("openlms - learning management system backend");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            eprintln!("Failed to open database {}: {e}", config.database.path);
            std::process::exit(1);
        }
    };

    let mailer = if config.mail.smtp_url.is_empty() {
        info!("no smtp_url configured, outbound mail disabled");
        Arc::new(Mailer::Disabled)
    } else {
        match SmtpMailer::from_url(&config.mail.smtp_url, &config.mail.from_address) {
            Ok(smtp) => Arc::new(Mailer::Smtp(smtp)),
            Err(e) => {
                eprintln!("Invalid mail configuration: {e}");
                std::process::exit(1);
            }
        }
    };

    let server = match WebServer::new(&config, db, mailer) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Failed to configure web server: {e}");
            std::process::exit(1);
        }
    };

    info!(
        "serving on {}:{}",
        config.server.host, config.server.port
    );

    if let Err(e) = server.run().await {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}
