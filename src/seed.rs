//! Built-in demo schemas, embedded from `seed/` at compile time

use chrono::{DateTime, Utc};
use include_dir::{include_dir, Dir};
use serde::Deserialize;

use crate::error::{Result, StoreError};
use crate::ids::SchemaId;
use crate::schema::{Schema, SchemaField};

static SEED_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/seed");

/// On-disk shape of a seed file; timestamps are stamped at load time
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedSchema {
    id: SchemaId,
    schema_name: String,
    #[serde(default)]
    description: String,
    fields: Vec<SchemaField>,
}

/// Parse every embedded seed schema, ordered by file name
pub fn seed_schemas(now: DateTime<Utc>) -> Result<Vec<Schema>> {
    let mut files: Vec<_> = SEED_DIR
        .files()
        .filter(|f| f.path().extension().map(|e| e == "json").unwrap_or(false))
        .collect();
    files.sort_by_key(|f| f.path());

    let mut schemas = Vec::with_capacity(files.len());
    for file in files {
        let name = file.path().to_string_lossy().to_string();
        let seed: SeedSchema = serde_json::from_slice(file.contents())
            .map_err(|source| StoreError::InvalidSeed { file: name, source })?;
        schemas.push(Schema {
            id: seed.id,
            schema_name: seed.schema_name,
            description: seed.description,
            fields: seed.fields,
            created_at: now,
            updated_at: now,
        });
    }

    tracing::debug!(count = schemas.len(), "loaded seed schemas");
    Ok(schemas)
}
