//! Catalog loader.
//!
//! Reads the configured JSON catalog from disk on every call. Any failure
//! (missing file, unreadable file, malformed or mis-shaped JSON) yields an
//! empty catalog instead of an error; callers cannot tell "no source" apart
//! from "empty source". The failure is logged at `warn` so it is still
//! visible to operators.

use std::path::Path;

use sneakpeak_core::models::SneakerRecord;
use tracing::{debug, warn};

use crate::config::Config;

/// Load the catalog configured in `[catalog].path`.
pub fn load(config: &Config) -> Vec<SneakerRecord> {
    load_from(&config.catalog.path)
}

/// Load a catalog file, degrading to an empty sequence on any failure.
pub fn load_from(path: &Path) -> Vec<SneakerRecord> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "catalog source unavailable, serving empty catalog");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<SneakerRecord>>(&content) {
        Ok(records) => {
            debug!(path = %path.display(), count = records.len(), "catalog loaded");
            records
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "catalog source malformed, serving empty catalog");
            Vec::new()
        }
    }
}
