//! Project Data Store
//!
//! Tracks which schemas are attached to the active project and the rows
//! entered for each. Schemas are referenced by id only; nothing here checks
//! them against the [`crate::registry::SchemaRegistry`], so deleting an
//! attached schema leaves its id and rows in place.

use std::collections::HashMap;

use crate::ids::{IdSource, RowId, SchemaId};
use crate::value::{DataRow, RowValues};

/// Attachments, rows and selection for the single active project
#[derive(Debug, Default)]
pub struct ProjectStore {
    /// Insertion-ordered, duplicate-free
    configured_schemas: Vec<SchemaId>,
    project_data: HashMap<SchemaId, Vec<DataRow>>,
    selected_schema_id: Option<SchemaId>,
    loading: bool,
    error: Option<String>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach schemas, skipping any already configured. Each newly attached
    /// schema gets an empty row list unless it already has rows.
    ///
    /// Returns the ids that were actually attached.
    pub fn add_schemas_to_project<I>(&mut self, ids: I) -> Vec<SchemaId>
    where
        I: IntoIterator<Item = SchemaId>,
    {
        let mut added = Vec::new();
        for id in ids {
            if self.is_configured(&id) {
                continue;
            }
            self.project_data.entry(id.clone()).or_default();
            self.configured_schemas.push(id.clone());
            added.push(id);
        }
        tracing::debug!(
            added = added.len(),
            total = self.configured_schemas.len(),
            "schemas attached"
        );
        added
    }

    /// Detach a schema, drop its rows, and clear the selection if it pointed here.
    ///
    /// Returns `false` when none of the three held the id.
    pub fn remove_schema_from_project(&mut self, id: &SchemaId) -> bool {
        let before = self.configured_schemas.len();
        self.configured_schemas.retain(|c| c != id);
        let detached = self.configured_schemas.len() != before;
        let dropped = self.project_data.remove(id);
        let deselected = self.selected_schema_id.as_ref() == Some(id);
        if deselected {
            self.selected_schema_id = None;
        }

        let changed = detached || dropped.is_some() || deselected;
        if changed {
            let dropped_rows = dropped.map_or(0, |rows| rows.len());
            tracing::debug!(schema_id = %id, dropped_rows, "schema detached");
        } else {
            tracing::trace!(schema_id = %id, "detach of unknown schema ignored");
        }
        changed
    }

    /// Set the schema being edited. Not checked against the configured set.
    pub fn set_selected_schema_id(&mut self, id: Option<SchemaId>) {
        self.selected_schema_id = id;
    }

    /// Append a row with a freshly generated id, creating the schema's row
    /// list if needed. A `rowId` key in `values` is discarded.
    pub fn add_data_row(
        &mut self,
        ids: &mut IdSource,
        schema_id: &SchemaId,
        values: RowValues,
    ) -> RowId {
        let rows = self.project_data.entry(schema_id.clone()).or_default();
        let mut row_id = ids.row_id();
        while rows.iter().any(|r| r.row_id == row_id) {
            row_id = ids.row_id();
        }
        rows.push(DataRow::new(row_id.clone(), values));
        tracing::debug!(schema_id = %schema_id, row_id = %row_id, "row added");
        row_id
    }

    /// Shallow-merge `values` into the matching row. No-op if the schema has
    /// no rows or the row is missing.
    pub fn update_data_row(
        &mut self,
        schema_id: &SchemaId,
        row_id: &RowId,
        values: RowValues,
    ) -> bool {
        let row = self
            .project_data
            .get_mut(schema_id)
            .and_then(|rows| rows.iter_mut().find(|r| &r.row_id == row_id));
        match row {
            Some(row) => {
                row.merge(values);
                tracing::debug!(schema_id = %schema_id, row_id = %row_id, "row updated");
                true
            }
            None => {
                tracing::trace!(
                    schema_id = %schema_id,
                    row_id = %row_id,
                    "update of unknown row ignored"
                );
                false
            }
        }
    }

    pub fn delete_data_row(&mut self, schema_id: &SchemaId, row_id: &RowId) -> bool {
        let Some(rows) = self.project_data.get_mut(schema_id) else {
            tracing::trace!(schema_id = %schema_id, "delete on schema without rows ignored");
            return false;
        };
        let before = rows.len();
        rows.retain(|r| &r.row_id != row_id);
        let removed = rows.len() != before;
        if removed {
            tracing::debug!(schema_id = %schema_id, row_id = %row_id, "row deleted");
        }
        removed
    }

    /// Replace a schema's rows wholesale
    pub fn set_project_data(&mut self, schema_id: SchemaId, rows: Vec<DataRow>) {
        tracing::debug!(schema_id = %schema_id, rows = rows.len(), "rows replaced");
        self.project_data.insert(schema_id, rows);
    }

    pub fn configured_schemas(&self) -> &[SchemaId] {
        &self.configured_schemas
    }

    pub fn is_configured(&self, id: &SchemaId) -> bool {
        self.configured_schemas.contains(id)
    }

    /// Rows of a schema, or an empty slice if it has none
    pub fn rows(&self, schema_id: &SchemaId) -> &[DataRow] {
        self.project_data
            .get(schema_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `project_data` has an entry for the schema, even an empty one
    pub fn has_rows_entry(&self, schema_id: &SchemaId) -> bool {
        self.project_data.contains_key(schema_id)
    }

    pub fn project_data(&self) -> &HashMap<SchemaId, Vec<DataRow>> {
        &self.project_data
    }

    pub fn selected_schema_id(&self) -> Option<&SchemaId> {
        self.selected_schema_id.as_ref()
    }

    /// Rows across every schema
    pub fn total_rows(&self) -> usize {
        self.project_data.values().map(Vec::len).sum()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{row_values, FieldValue};

    fn g(id: &str) -> SchemaId {
        SchemaId::from(id)
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut project = ProjectStore::new();
        assert_eq!(project.add_schemas_to_project([g("g1")]), vec![g("g1")]);
        assert!(project.add_schemas_to_project([g("g1")]).is_empty());
        assert_eq!(project.configured_schemas(), &[g("g1")]);
        assert!(project.has_rows_entry(&g("g1")));
    }

    #[test]
    fn test_attach_dedupes_within_one_call() {
        let mut project = ProjectStore::new();
        let added = project.add_schemas_to_project([g("g2"), g("g1"), g("g2")]);
        assert_eq!(added, vec![g("g2"), g("g1")]);
        assert_eq!(project.configured_schemas(), &[g("g2"), g("g1")]);
    }

    #[test]
    fn test_attach_keeps_existing_rows() {
        let mut ids = IdSource::sequential();
        let mut project = ProjectStore::new();
        project.add_data_row(&mut ids, &g("g1"), row_values([("sku", "A1")]));
        project.add_schemas_to_project([g("g1")]);
        assert_eq!(project.rows(&g("g1")).len(), 1);
    }

    #[test]
    fn test_add_row() {
        let mut ids = IdSource::sequential();
        let mut project = ProjectStore::new();
        project.add_schemas_to_project([g("g1")]);

        let row_id = project.add_data_row(&mut ids, &g("g1"), row_values([("sku", "A1")]));

        let rows = project.rows(&g("g1"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_id, row_id);
        assert_eq!(rows[0].get("sku"), Some(&FieldValue::from("A1")));
    }

    #[test]
    fn test_add_row_creates_missing_sequence() {
        let mut ids = IdSource::sequential();
        let mut project = ProjectStore::new();
        project.add_data_row(&mut ids, &g("unattached"), RowValues::new());
        assert_eq!(project.rows(&g("unattached")).len(), 1);
        assert!(!project.is_configured(&g("unattached")));
    }

    #[test]
    fn test_add_row_avoids_loaded_ids() {
        let mut ids = IdSource::sequential();
        let mut project = ProjectStore::new();
        project.set_project_data(
            g("g1"),
            vec![DataRow::new(RowId::from("r1"), RowValues::new())],
        );
        let row_id = project.add_data_row(&mut ids, &g("g1"), RowValues::new());
        assert_eq!(row_id.as_str(), "r2");
    }

    #[test]
    fn test_update_row_merges() {
        let mut ids = IdSource::sequential();
        let mut project = ProjectStore::new();
        let row_id = project.add_data_row(
            &mut ids,
            &g("g1"),
            row_values([("sku", "A1"), ("name", "Widget")]),
        );

        assert!(project.update_data_row(&g("g1"), &row_id, row_values([("name", "Gadget")])));

        let row = &project.rows(&g("g1"))[0];
        assert_eq!(row.row_id, row_id);
        assert_eq!(row.get("sku"), Some(&FieldValue::from("A1")));
        assert_eq!(row.get("name"), Some(&FieldValue::from("Gadget")));
    }

    #[test]
    fn test_update_missing_row_is_noop() {
        let mut ids = IdSource::sequential();
        let mut project = ProjectStore::new();
        project.add_data_row(&mut ids, &g("g1"), row_values([("sku", "A1")]));
        let before = project.rows(&g("g1")).to_vec();

        let patch = row_values([("sku", "B2")]);
        assert!(!project.update_data_row(&g("g1"), &RowId::from("nonexistent"), patch.clone()));
        assert!(!project.update_data_row(&g("g9"), &RowId::from("r1"), patch));

        assert_eq!(project.rows(&g("g1")), before.as_slice());
        assert!(!project.has_rows_entry(&g("g9")));
    }

    #[test]
    fn test_delete_row() {
        let mut ids = IdSource::sequential();
        let mut project = ProjectStore::new();
        project.add_schemas_to_project([g("g1")]);
        let first = project.add_data_row(&mut ids, &g("g1"), row_values([("sku", "A1")]));
        let second = project.add_data_row(&mut ids, &g("g1"), row_values([("sku", "B2")]));

        assert!(project.delete_data_row(&g("g1"), &first));

        let rows = project.rows(&g("g1"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_id, second);
        assert!(!project.delete_data_row(&g("g1"), &first));
        assert!(!project.delete_data_row(&g("g7"), &first));
    }

    #[test]
    fn test_detach_cascades_rows_and_selection() {
        let mut ids = IdSource::sequential();
        let mut project = ProjectStore::new();
        project.add_schemas_to_project([g("g1"), g("g2")]);
        project.add_data_row(&mut ids, &g("g1"), row_values([("sku", "A1")]));
        project.set_selected_schema_id(Some(g("g1")));

        assert!(project.remove_schema_from_project(&g("g1")));

        assert_eq!(project.configured_schemas(), &[g("g2")]);
        assert!(!project.has_rows_entry(&g("g1")));
        assert!(project.selected_schema_id().is_none());
    }

    #[test]
    fn test_detach_other_schema_keeps_selection() {
        let mut project = ProjectStore::new();
        project.add_schemas_to_project([g("g1"), g("g2")]);
        project.set_selected_schema_id(Some(g("g1")));
        assert!(project.remove_schema_from_project(&g("g2")));
        assert_eq!(project.selected_schema_id(), Some(&g("g1")));
    }

    #[test]
    fn test_detach_unknown_schema_reports_no_change() {
        let mut project = ProjectStore::new();
        project.add_schemas_to_project([g("g1")]);

        assert!(!project.remove_schema_from_project(&g("g9")));
        assert_eq!(project.configured_schemas(), &[g("g1")]);
    }

    #[test]
    fn test_detach_clears_rows_of_unattached_schema() {
        let mut ids = IdSource::sequential();
        let mut project = ProjectStore::new();
        project.add_data_row(&mut ids, &g("g5"), RowValues::new());

        assert!(project.remove_schema_from_project(&g("g5")));
        assert!(!project.has_rows_entry(&g("g5")));
        assert!(!project.remove_schema_from_project(&g("g5")));
    }

    #[test]
    fn test_selection_is_unchecked() {
        let mut project = ProjectStore::new();
        project.set_selected_schema_id(Some(g("never-attached")));
        assert_eq!(project.selected_schema_id(), Some(&g("never-attached")));
        project.set_selected_schema_id(None);
        assert!(project.selected_schema_id().is_none());
    }

    #[test]
    fn test_total_rows() {
        let mut ids = IdSource::sequential();
        let mut project = ProjectStore::new();
        project.add_data_row(&mut ids, &g("g1"), RowValues::new());
        project.add_data_row(&mut ids, &g("g1"), RowValues::new());
        project.add_data_row(&mut ids, &g("g2"), RowValues::new());
        assert_eq!(project.total_rows(), 3);
    }
}
