//! Dashboard flows on top of the store
//!
//! A [`Session`] plays the part of the dashboard's screens. It validates
//! drafts before they reach the store and queues a toast describing each
//! outcome, success or failure.

use crate::error::ValidationError;
use crate::ids::{RowId, SchemaId};
use crate::store::AppStore;
use crate::ui::ToastKind;
use crate::validate::{check_row, check_schema_draft, SchemaDraft};
use crate::value::RowValues;

pub struct Session<'a> {
    store: &'a mut AppStore,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a mut AppStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &AppStore {
        &*self.store
    }

    fn reject(&mut self, err: ValidationError) -> ValidationError {
        tracing::debug!(error = %err, "draft rejected");
        self.store.add_toast(err.to_string(), ToastKind::Error);
        err
    }

    /// Create a schema from the editor's draft
    pub fn submit_schema(&mut self, draft: SchemaDraft) -> Result<SchemaId, ValidationError> {
        let valid = check_schema_draft(draft).map_err(|e| self.reject(e))?;
        let id = self
            .store
            .add_schema(valid.schema_name, valid.description, valid.fields);
        self.store
            .add_toast("Schema created successfully!", ToastKind::Success);
        Ok(id)
    }

    /// Delete from the registry. Project attachments are left as they are.
    pub fn delete_schema(&mut self, id: &SchemaId) {
        self.store.delete_schema(id);
        self.store
            .add_toast("Schema deleted successfully!", ToastKind::Success);
    }

    /// Attach the selected schemas; returns the ones that were new.
    ///
    /// With nothing selected yet, the first requested id becomes the
    /// selection.
    pub fn attach_schemas(&mut self, ids: Vec<SchemaId>) -> Vec<SchemaId> {
        let select = match self.store.project().selected_schema_id() {
            None => ids.first().cloned(),
            Some(_) => None,
        };
        let added = self.store.add_schemas_to_project(ids);
        if let Some(id) = select {
            tracing::debug!(schema_id = %id, "auto-selected first attached schema");
            self.store.set_selected_schema_id(Some(id));
        }
        if !added.is_empty() {
            let noun = if added.len() == 1 { "schema" } else { "schemas" };
            self.store.add_toast(
                format!("Added {} {} to project", added.len(), noun),
                ToastKind::Success,
            );
        }
        added
    }

    pub fn detach_schema(&mut self, id: &SchemaId) {
        self.store.remove_schema_from_project(id);
        self.store
            .add_toast("Schema removed from project", ToastKind::Success);
    }

    /// Save the data-entry form: update `editing` if given, otherwise add.
    ///
    /// Required fields are checked against the schema when the registry
    /// still has it. A detached or deleted schema id saves unchecked.
    /// Editing a row that is gone fails with [`ValidationError::RowNotFound`].
    pub fn save_row(
        &mut self,
        schema_id: &SchemaId,
        editing: Option<&RowId>,
        form: RowValues,
    ) -> Result<RowId, ValidationError> {
        let checked = self
            .store
            .registry()
            .get(schema_id)
            .map(|schema| check_row(schema, &form));
        if let Some(Err(err)) = checked {
            return Err(self.reject(err));
        }

        match editing {
            Some(row_id) => {
                if !self.store.update_data_row(schema_id, row_id, form) {
                    return Err(self.reject(ValidationError::RowNotFound(row_id.clone())));
                }
                self.store
                    .add_toast("Data updated successfully!", ToastKind::Success);
                Ok(row_id.clone())
            }
            None => {
                let row_id = self.store.add_data_row(schema_id, form);
                self.store
                    .add_toast("Data added successfully!", ToastKind::Success);
                Ok(row_id)
            }
        }
    }

    pub fn delete_row(&mut self, schema_id: &SchemaId, row_id: &RowId) {
        self.store.delete_data_row(schema_id, row_id);
        self.store
            .add_toast("Data deleted successfully!", ToastKind::Success);
    }
}
