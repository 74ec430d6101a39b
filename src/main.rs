//! Command-line front end.
//!
//! Evaluates a URL query against a product file, the same way the storefront
//! does on a cold page load, and prints the canonical query, the match count
//! and the matching products.
//!
//! ```text
//! storefront-filters --products products.json --query '?brand=Olipop&sort=price-low'
//! storefront-filters --products products.json --query 'price=2-5&instock=true' --json
//! ```

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use storefront_filters::domain::Product;
use storefront_filters::query::QueryString;
use storefront_filters::storage::{JsonProductFile, ProductSource};
use storefront_filters::ui::FilterPanelViewModel;
use storefront_filters::{handle_event, initialize, observability, Config, Event, Result};

#[derive(Parser)]
#[command(name = "storefront-filters")]
#[command(about = "Apply storefront filter URLs to a product list", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON file with the product list.
    #[arg(long)]
    products: PathBuf,

    /// URL query string, with or without the leading `?`.
    #[arg(long, default_value = "")]
    query: String,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML catalog file; overrides the configured catalog.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Print the result and the filter panel as JSON.
    #[arg(long)]
    json: bool,

    /// Export spans with this filter, e.g. `debug`.
    #[arg(long)]
    trace_level: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    query: String,
    match_count: usize,
    products: &'a [Product],
    panel: FilterPanelViewModel,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if cli.catalog.is_some() {
        config.catalog_file = cli.catalog;
    }
    if cli.trace_level.is_some() {
        config.trace_level = cli.trace_level;
    }

    if config.trace_level.is_some() {
        let trace_file = observability::init_tracing(&config)?;
        eprintln!("tracing to {}", trace_file.display());
    }

    let products = JsonProductFile::new(&cli.products).load_products()?;
    let query = QueryString::new(cli.query);

    let mut state = initialize(&config, &query);
    handle_event(&mut state, &Event::ProductsLoaded(products));

    let canonical = state.share_query();

    if cli.json {
        let report = Report {
            query: canonical.to_url_suffix(),
            match_count: state.evaluation.match_count,
            products: &state.evaluation.products,
            panel: state.compute_viewmodel(),
        };
        let json = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{json}");
        return Ok(());
    }

    println!("query: {}", canonical.to_url_suffix());
    println!("{}", state.compute_viewmodel().result_summary);
    for product in &state.evaluation.products {
        let listed = product
            .created_at
            .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!(
            "{:>6}  {:<32} {:<14} {:>8.2}  {}{}",
            product.id,
            product.name,
            product.brand,
            product.price,
            if product.in_stock { "" } else { "sold out  " },
            listed,
        );
    }

    Ok(())
}
