//! Minimal embedding example for pihole-client
//!
//! Reads the appliance address and credential from the environment:
//!
//! - `PIHOLE_URL`: base URL (`http://pi.hole`, or `http://pi.hole/admin/api.php`
//!   for the legacy API)
//! - `PIHOLE_PASSWORD`: web password (current API), or
//! - `PIHOLE_API_TOKEN`: static token (legacy API)
//! - `PIHOLE_SESSION_ID`: optional existing session (current API)
//! - `PIHOLE_LOG_LEVEL`: trace, debug, info (default), warn or error
//!
//! With the current API it lists local DNS and CNAME records and logs out;
//! with the legacy API it prints blocking status, versions and custom DNS.

use anyhow::{Context, Result};
use pihole_client::{ApiGeneration, Client, ClientConfig};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn log_level() -> Level {
    match std::env::var("PIHOLE_LOG_LEVEL")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

async fn show_current(client: &Client) -> Result<()> {
    let hosts = client
        .local_dns()
        .list()
        .await
        .context("listing local DNS records")?;
    println!("Local DNS records ({}):", hosts.len());
    for record in &hosts {
        println!("  {:<40} {}", record.domain, record.ip);
    }

    let cnames = client
        .local_cname()
        .list()
        .await
        .context("listing CNAME records")?;
    println!("CNAME records ({}):", cnames.len());
    for record in &cnames {
        match record.ttl {
            Some(ttl) => println!("  {:<40} -> {} (ttl {})", record.domain, record.target, ttl),
            None => println!("  {:<40} -> {}", record.domain, record.target),
        }
    }

    client.logout().await.context("logging out")?;
    Ok(())
}

async fn show_legacy(client: &Client) -> Result<()> {
    let status = client
        .ad_blocker()
        .status()
        .await
        .context("fetching blocking status")?;
    println!(
        "Blocking: {}",
        if status.enabled { "enabled" } else { "disabled" }
    );

    let versions = client.version().get().await.context("fetching versions")?;
    println!(
        "Core {} / Web {} / FTL {}",
        versions.core_current, versions.web_current, versions.ftl_current
    );

    let records = client
        .custom_dns()
        .list()
        .await
        .context("listing custom DNS records")?;
    println!("Custom DNS records ({}):", records.len());
    for record in &records {
        println!("  {:<40} {}", record.domain, record.ip);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(log_level()).finish();
    tracing::subscriber::set_global_default(subscriber).context("setting tracing subscriber")?;

    let config = ClientConfig::from_env().context("reading configuration from environment")?;
    let client = Client::new(config).context("building client")?;

    tracing::info!("Connected client ({:?} API)", client.generation());

    match client.generation() {
        ApiGeneration::Current => show_current(&client).await,
        ApiGeneration::Legacy => show_legacy(&client).await,
    }
}
