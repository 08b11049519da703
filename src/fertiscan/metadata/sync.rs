use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::fertiscan::metadata::error::Result;
use crate::fertiscan::metadata::export::inspection_from_store;
use crate::fertiscan::metadata::import::inspection_from_form;
use crate::fertiscan::metadata::model::Inspection;
use crate::fertiscan::metadata::store::MemoryStore;

/// Converts an analysis form file into an inspection document file.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display(), %inspector_id)
)]
pub fn form_to_document(input: &Path, output: &Path, inspector_id: Uuid) -> Result<()> {
    let form = read_json(input)?;
    let inspection = inspection_from_form(&form, inspector_id)?;
    write_document(output, &inspection)
}

/// Imports an analysis form and persists it into a store snapshot, creating
/// the snapshot when it does not exist yet. Returns the persisted document.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), store = %store_path.display(), %inspector_id)
)]
pub fn form_to_store(input: &Path, store_path: &Path, inspector_id: Uuid) -> Result<Inspection> {
    let form = read_json(input)?;
    let inspection = inspection_from_form(&form, inspector_id)?;
    let mut store = load_store(store_path)?;
    let persisted = store.persist(&inspection);
    save_store(store_path, &store)?;
    info!(
        inspection_id = ?persisted.inspection_id,
        inspections = store.len(),
        "persisted inspection into store snapshot"
    );
    Ok(persisted)
}

/// Exports a persisted inspection from a store snapshot into a document file.
#[instrument(
    level = "info",
    skip_all,
    fields(store = %store_path.display(), output = %output.display(), %inspection_id)
)]
pub fn store_to_document(store_path: &Path, inspection_id: Uuid, output: &Path) -> Result<()> {
    let store = load_store(store_path)?;
    let inspection = inspection_from_store(&store, inspection_id)?;
    write_document(output, &inspection)
}

/// Loads a store snapshot. A missing file is an empty store.
pub fn load_store(path: &Path) -> Result<MemoryStore> {
    if !path.exists() {
        debug!(path = %path.display(), "store snapshot missing, starting empty");
        return Ok(MemoryStore::new());
    }
    let source = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&source)?)
}

/// Writes a store snapshot as pretty-printed JSON.
pub fn save_store(path: &Path, store: &MemoryStore) -> Result<()> {
    let json_string = serde_json::to_string_pretty(store)?;
    fs::write(path, json_string)?;
    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let source = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&source)?)
}

fn write_document(output: &Path, inspection: &Inspection) -> Result<()> {
    let json_string = serde_json::to_string_pretty(inspection)?;
    fs::write(output, json_string)?;
    Ok(())
}
