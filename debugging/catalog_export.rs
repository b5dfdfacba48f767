//! Fetch a movie or show from the catalog and print it in an export format.
//! Usage:
//!   cargo run --bin catalog_export -- movie <tmdb_id> [json|txt|csv|xml|sql]
//!   cargo run --bin catalog_export -- tv <tmdb_id> [json|txt|csv|xml|sql]
//!   cargo run --bin catalog_export -- search <query...>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use reelfetch::catalog::CatalogClient;
use reelfetch::config::Settings;
use reelfetch::export::{exporter_for, ExportConfig, ExportData, ExportFormat};
use reelfetch::models::{ContentKind, SearchKind};
use std::env;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!("Usage: cargo run --bin catalog_export -- movie <tmdb_id> [format]");
    eprintln!("       cargo run --bin catalog_export -- tv <tmdb_id> [format]");
    eprintln!("       cargo run --bin catalog_export -- search <query>");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        usage();
    }

    let settings = Settings::from_env()?;
    let client = CatalogClient::from_settings(&settings)?;

    match args[1].as_str() {
        "search" => {
            let query = args[2..].join(" ");
            let resp = client.search(&query, SearchKind::Multi).await?;
            println!("{} result(s) for '{}'", resp.results.len(), query);
            for hit in &resp.results {
                println!(
                    "  [{}] {} {} ({})",
                    hit.media_type,
                    hit.id,
                    hit.title,
                    hit.release_date.as_deref().unwrap_or("N/A")
                );
            }
        }
        kind @ ("movie" | "tv") => {
            let id: i64 = args[2].parse().context("tmdb_id must be an integer")?;
            let format = match args.get(3) {
                Some(raw) => ExportFormat::from_str(raw)?,
                None => ExportFormat::Json,
            };
            let config = ExportConfig::with_format(format);
            let content = if kind == "movie" {
                ContentKind::Movie(client.get_movie(id).await?)
            } else {
                ContentKind::Show(client.get_tv_show(id, config.include_episodes).await?)
            };
            let out = exporter_for(format).export(ExportData::Single(&content), &config)?;
            println!("{out}");
        }
        _ => usage(),
    }

    client.close();
    Ok(())
}
