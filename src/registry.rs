//! Schema Registry
//!
//! Catalog of schema definitions, kept in creation order. Every operation is
//! total: missing ids degrade to no-ops and nothing is validated here. Drafts
//! are checked by the caller (see [`crate::session`]) before they arrive.

use chrono::{DateTime, Utc};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::Serialize;

use crate::error::Result;
use crate::ids::{IdSource, SchemaId};
use crate::schema::{Schema, SchemaField};
use crate::seed::seed_schemas;

/// A fuzzy name match
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub id: SchemaId,
    pub schema_name: String,
    pub score: i64,
}

/// The schema catalog
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: Vec<Schema>,
    loading: bool,
    error: Option<String>,
}

impl SchemaRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in demo schemas
    pub fn seeded(now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            schemas: seed_schemas(now)?,
            ..Self::default()
        })
    }

    /// Create a schema with a fresh id and append it.
    ///
    /// Names need not be unique, and an empty name or field list is accepted.
    pub fn add_schema(
        &mut self,
        ids: &mut IdSource,
        name: impl Into<String>,
        description: impl Into<String>,
        fields: Vec<SchemaField>,
    ) -> SchemaId {
        let id = ids.schema_id(|candidate| self.contains(candidate));
        let now = ids.now();
        let schema = Schema {
            id: id.clone(),
            schema_name: name.into(),
            description: description.into(),
            fields,
            created_at: now,
            updated_at: now,
        };
        tracing::debug!(
            schema_id = %id,
            name = %schema.schema_name,
            fields = schema.fields.len(),
            "schema added"
        );
        self.schemas.push(schema);
        id
    }

    /// Remove a schema. Project attachments and rows are left untouched.
    pub fn delete_schema(&mut self, id: &SchemaId) -> bool {
        let before = self.schemas.len();
        self.schemas.retain(|s| &s.id != id);
        let removed = self.schemas.len() != before;
        if removed {
            tracing::debug!(schema_id = %id, "schema deleted");
        } else {
            tracing::trace!(schema_id = %id, "delete of unknown schema ignored");
        }
        removed
    }

    /// Replace the schema with the same id wholesale, `updated_at` included
    pub fn update_schema(&mut self, schema: Schema) -> bool {
        match self.schemas.iter_mut().find(|s| s.id == schema.id) {
            Some(slot) => {
                tracing::debug!(schema_id = %schema.id, "schema replaced");
                *slot = schema;
                true
            }
            None => {
                tracing::trace!(schema_id = %schema.id, "update of unknown schema ignored");
                false
            }
        }
    }

    /// All schemas in creation order
    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    pub fn get(&self, id: &SchemaId) -> Option<&Schema> {
        self.schemas.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &SchemaId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Search schemas by name (fuzzy), best match first.
    ///
    /// A blank query returns every schema in registry order with score 0.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return self
                .schemas
                .iter()
                .map(|s| SearchResult {
                    id: s.id.clone(),
                    schema_name: s.schema_name.clone(),
                    score: 0,
                })
                .collect();
        }

        let matcher = SkimMatcherV2::default().ignore_case();
        let mut results: Vec<SearchResult> = self
            .schemas
            .iter()
            .filter_map(|s| {
                matcher
                    .fuzzy_match(&s.schema_name, query)
                    .map(|score| SearchResult {
                        id: s.id.clone(),
                        schema_name: s.schema_name.clone(),
                        score,
                    })
            })
            .collect();

        // stable: equal scores keep registry order
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
