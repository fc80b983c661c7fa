//! Dashboard figures derived from the store

use std::collections::BTreeMap;

use serde::Serialize;

use crate::schema::{FieldType, Schema};
use crate::store::AppStore;

/// Headline numbers for the dashboard overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_schemas: usize,
    pub configured_schemas: usize,
    /// Rows across every schema's data
    pub total_data_entries: usize,
    /// Schema count per schema name
    pub schemas_by_name: BTreeMap<String, usize>,
}

impl DashboardStats {
    pub fn collect(store: &AppStore) -> Self {
        let mut schemas_by_name = BTreeMap::new();
        for schema in store.registry().schemas() {
            *schemas_by_name.entry(schema.schema_name.clone()).or_insert(0) += 1;
        }

        Self {
            total_schemas: store.registry().len(),
            configured_schemas: store.project().configured_schemas().len(),
            total_data_entries: store.project().total_rows(),
            schemas_by_name,
        }
    }
}

/// Per-schema field overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSummary {
    pub total_fields: usize,
    pub required_fields: usize,
    /// (type, count), ordered by first appearance
    pub field_types: Vec<(FieldType, usize)>,
}

impl SchemaSummary {
    pub fn of(schema: &Schema) -> Self {
        let mut field_types: Vec<(FieldType, usize)> = Vec::new();
        for field in &schema.fields {
            match field_types.iter_mut().find(|(ty, _)| *ty == field.field_type) {
                Some((_, count)) => *count += 1,
                None => field_types.push((field.field_type, 1)),
            }
        }

        Self {
            total_fields: schema.fields.len(),
            required_fields: schema.required_fields().count(),
            field_types,
        }
    }
}
