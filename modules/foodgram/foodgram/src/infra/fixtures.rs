//! Catalog seed file parsing for the `load-ingredients` command.
//!
//! The file is a JSON array of `{"name": ..., "measurement_unit": ...}` objects.

use std::path::Path;

use anyhow::Context;
use foodgram_sdk::NewIngredient;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct IngredientRecord {
    name: String,
    measurement_unit: String,
}

/// Parse catalog entries from a JSON document.
///
/// # Errors
/// Returns an error if the document is not an array of ingredient records.
pub fn parse_ingredients(raw: &str) -> anyhow::Result<Vec<NewIngredient>> {
    let records: Vec<IngredientRecord> =
        serde_json::from_str(raw).context("ingredients file must be a JSON array of records")?;
    Ok(records
        .into_iter()
        .map(|r| NewIngredient {
            name: r.name.trim().to_owned(),
            measurement_unit: r.measurement_unit.trim().to_owned(),
        })
        .collect())
}

/// Read and parse a catalog seed file.
///
/// # Errors
/// Returns an error if the file is missing, unreadable or malformed.
pub fn read_ingredients_file(path: &Path) -> anyhow::Result<Vec<NewIngredient>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("ingredients file not found: {}", path.display()))?;
    parse_ingredients(&raw).with_context(|| format!("invalid ingredients file: {}", path.display()))
}
