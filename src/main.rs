mod client;
mod config;
mod document;
mod drive;
mod error;
mod logging;
mod pipeline;
mod record;
mod scraper;
mod sources;
mod utils;

#[cfg(test)]
mod testing;

use crate::client::Client;
use crate::config::Config;
use crate::drive::{CredentialSource, DriveUploader};
use crate::error::Result;
use crate::logging::{init_logging, LoggerConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::from_file("config.toml")?;

    init_logging(LoggerConfig::from_config(&config.logging)?)?;

    let started = chrono::Local::now();
    log_info!("[main] Run started at {}", started.format("%Y-%m-%d %H:%M:%S"));

    let credentials = CredentialSource::resolve(&config.drive);
    log_info!("[main] Service account key from {}", credentials.describe());

    let fetcher = Client::from_config(&config.http)?;
    let uploader = DriveUploader::new(
        Client::from_config(&config.http)?,
        credentials,
        config.drive.clone(),
    );

    let summary = pipeline::run(&config, &fetcher, &uploader, started.date_naive()).await;

    log_info!(
        "[main] Done: {}/{} sources extracted, document {}, file id {}",
        summary.extracted,
        summary.attempted,
        summary.document.as_deref().unwrap_or("none"),
        summary.file_id.as_deref().unwrap_or("none")
    );
    Ok(())
}
