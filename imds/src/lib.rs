pub mod arp;
pub mod config;
pub mod document;
pub mod errors;
pub mod http;
pub mod identity;
pub mod metadata;
pub mod router;
pub mod service;
pub mod store;
pub mod userdata;

#[cfg(test)]
mod testutils;

pub use errors::{Error, Result};

/// Runs the metadata service with the given configuration.
///
/// The caller is expected to have run `config.validate()` first; fatal
/// store states are a startup concern, not a per-request one.
pub async fn run(config: config::Config) -> Result<()> {
    let state = service::AppState::from_config(&config);
    http::run_http_service(&config.listener.host, config.listener.port, state).await?;
    Ok(())
}
