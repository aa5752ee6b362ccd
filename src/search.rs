//! CLI entry points for catalog queries.
//!
//! Each command loads a fresh catalog snapshot, runs the corresponding
//! engine operation from [`sneakpeak_core::catalog`], and prints either a
//! compact table or pretty JSON.

use anyhow::{bail, Result};
use sneakpeak_core::catalog::{self, Criteria};
use sneakpeak_core::models::SneakerRecord;
use tracing::debug;

use crate::config::Config;
use crate::loader;

pub fn run_search(config: &Config, criteria: &Criteria, json: bool) -> Result<()> {
    validate_criteria(criteria)?;
    let records = loader::load(config);
    let results = catalog::filter(&records, criteria);
    debug!(
        unfiltered = criteria.is_empty(),
        total = records.len(),
        matched = results.len(),
        "catalog search"
    );
    print_records(&results, json)
}

pub fn run_trending(config: &Config, limit: Option<usize>, json: bool) -> Result<()> {
    let limit = limit.unwrap_or(config.trending.default_limit);
    if limit == 0 {
        bail!("invalid limit: must be >= 1");
    }
    let records = loader::load(config);
    let results = catalog::trending(&records, limit);
    print_records(&results, json)
}

pub fn run_get(config: &Config, id: &str) -> Result<()> {
    let records = loader::load(config);
    let record = match catalog::find_by_id(&records, id) {
        Some(r) => r,
        None => {
            eprintln!("Error: sneaker not found: {}", id);
            std::process::exit(1);
        }
    };
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

/// Boundary checks the engine leaves to its callers.
pub fn validate_criteria(criteria: &Criteria) -> Result<()> {
    for (name, value) in [
        ("minPrice", criteria.min_price),
        ("maxPrice", criteria.max_price),
    ] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                bail!("invalid {}: must be a non-negative number", name);
            }
        }
    }
    Ok(())
}

fn print_records(records: &[&SneakerRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, r) in records.iter().enumerate() {
        let price = r
            .last_sale()
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}. {} {} {} (id: {})",
            i + 1,
            r.brand,
            r.model,
            r.colorway,
            r.id
        );
        println!(
            "    released: {}  last sale: {}",
            r.release_date.as_deref().unwrap_or("-"),
            price
        );
    }
    Ok(())
}
