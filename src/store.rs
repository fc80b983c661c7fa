//! The composed application store
//!
//! [`AppStore`] owns the schema registry, the project data store, the UI
//! state and the id/clock source. It is built once at startup and handed to
//! consumers by reference. Mutations arrive either as direct method calls or
//! as serialisable [`Action`]s through [`AppStore::dispatch`].

use std::collections::BTreeMap;
use std::io::BufRead;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::config::{DashboardConfig, IdScheme};
use crate::error::{Result, StoreError};
use crate::ids::{IdSource, RowId, SchemaId, ToastId};
use crate::project::ProjectStore;
use crate::registry::SchemaRegistry;
use crate::schema::{Schema, SchemaField};
use crate::ui::{Theme, Toast, ToastKind, UiState};
use crate::value::{DataRow, RowValues};

/// An intent dispatched into the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    AddSchema {
        schema_name: String,
        #[serde(default)]
        description: String,
        fields: Vec<SchemaField>,
    },
    DeleteSchema {
        id: SchemaId,
    },
    UpdateSchema {
        schema: Schema,
    },
    AddSchemasToProject {
        ids: Vec<SchemaId>,
    },
    RemoveSchemaFromProject {
        id: SchemaId,
    },
    SetSelectedSchemaId {
        #[serde(default)]
        id: Option<SchemaId>,
    },
    AddDataRow {
        schema_id: SchemaId,
        #[serde(default)]
        data: RowValues,
    },
    UpdateDataRow {
        schema_id: SchemaId,
        row_id: RowId,
        data: RowValues,
    },
    DeleteDataRow {
        schema_id: SchemaId,
        row_id: RowId,
    },
    SetProjectData {
        schema_id: SchemaId,
        rows: Vec<DataRow>,
    },
    SetTheme {
        theme: Theme,
    },
    AddToast {
        message: String,
        #[serde(rename = "type")]
        kind: ToastKind,
    },
    RemoveToast {
        id: ToastId,
    },
    ExpireToasts,
}

impl Action {
    /// Action name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddSchema { .. } => "addSchema",
            Action::DeleteSchema { .. } => "deleteSchema",
            Action::UpdateSchema { .. } => "updateSchema",
            Action::AddSchemasToProject { .. } => "addSchemasToProject",
            Action::RemoveSchemaFromProject { .. } => "removeSchemaFromProject",
            Action::SetSelectedSchemaId { .. } => "setSelectedSchemaId",
            Action::AddDataRow { .. } => "addDataRow",
            Action::UpdateDataRow { .. } => "updateDataRow",
            Action::DeleteDataRow { .. } => "deleteDataRow",
            Action::SetProjectData { .. } => "setProjectData",
            Action::SetTheme { .. } => "setTheme",
            Action::AddToast { .. } => "addToast",
            Action::RemoveToast { .. } => "removeToast",
            Action::ExpireToasts => "expireToasts",
        }
    }
}

/// What a dispatched action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    SchemaCreated(SchemaId),
    SchemasAttached(Vec<SchemaId>),
    RowAdded(RowId),
    ToastQueued(ToastId),
    /// State changed
    Applied,
    /// Target not found; state untouched
    Ignored,
}

impl Outcome {
    fn from_changed(changed: bool) -> Self {
        if changed {
            Outcome::Applied
        } else {
            Outcome::Ignored
        }
    }
}

/// Whole-state read view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub schemas: Vec<Schema>,
    pub configured_schemas: Vec<SchemaId>,
    /// Sorted by schema id for stable output
    pub project_data: BTreeMap<SchemaId, Vec<DataRow>>,
    pub selected_schema_id: Option<SchemaId>,
    pub theme: Theme,
    pub toasts: Vec<Toast>,
}

/// Registry, project data and UI state behind one owner
#[derive(Debug)]
pub struct AppStore {
    registry: SchemaRegistry,
    project: ProjectStore,
    ui: UiState,
    ids: IdSource,
    toast_ttl: Duration,
}

impl AppStore {
    /// Empty store with the default theme and a 5 second toast lifetime
    pub fn new(ids: IdSource) -> Self {
        Self::with_registry(SchemaRegistry::new(), ids)
    }

    pub fn with_registry(registry: SchemaRegistry, ids: IdSource) -> Self {
        Self {
            registry,
            project: ProjectStore::new(),
            ui: UiState::default(),
            ids,
            toast_ttl: Duration::milliseconds(5000),
        }
    }

    /// Build the store described by `config`: id scheme, seed schemas,
    /// initial theme and toast lifetime
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let ids = match config.store.id_scheme {
            IdScheme::Timestamp => IdSource::system(),
            IdScheme::Sequential => IdSource::sequential(),
        };
        let registry = if config.store.seed_demo_schemas {
            SchemaRegistry::seeded(ids.now())?
        } else {
            SchemaRegistry::new()
        };

        let mut store = Self::with_registry(registry, ids);
        store.ui = UiState::new(config.ui.theme);
        store.toast_ttl = config.ui.toast_ttl();
        tracing::info!(
            schemas = store.registry.len(),
            id_scheme = ?config.store.id_scheme,
            "store initialised"
        );
        Ok(store)
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn project(&self) -> &ProjectStore {
        &self.project
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn toast_ttl(&self) -> Duration {
        self.toast_ttl
    }

    /// Current time from the injected clock
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.ids.now()
    }

    // Schema registry

    pub fn add_schema(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        fields: Vec<SchemaField>,
    ) -> SchemaId {
        self.registry.add_schema(&mut self.ids, name, description, fields)
    }

    /// Does not detach the schema from the project
    pub fn delete_schema(&mut self, id: &SchemaId) -> bool {
        self.registry.delete_schema(id)
    }

    pub fn update_schema(&mut self, schema: Schema) -> bool {
        self.registry.update_schema(schema)
    }

    // Project data

    pub fn add_schemas_to_project<I>(&mut self, ids: I) -> Vec<SchemaId>
    where
        I: IntoIterator<Item = SchemaId>,
    {
        self.project.add_schemas_to_project(ids)
    }

    pub fn remove_schema_from_project(&mut self, id: &SchemaId) -> bool {
        self.project.remove_schema_from_project(id)
    }

    pub fn set_selected_schema_id(&mut self, id: Option<SchemaId>) {
        self.project.set_selected_schema_id(id)
    }

    pub fn add_data_row(&mut self, schema_id: &SchemaId, values: RowValues) -> RowId {
        self.project.add_data_row(&mut self.ids, schema_id, values)
    }

    pub fn update_data_row(
        &mut self,
        schema_id: &SchemaId,
        row_id: &RowId,
        values: RowValues,
    ) -> bool {
        self.project.update_data_row(schema_id, row_id, values)
    }

    pub fn delete_data_row(&mut self, schema_id: &SchemaId, row_id: &RowId) -> bool {
        self.project.delete_data_row(schema_id, row_id)
    }

    pub fn set_project_data(&mut self, schema_id: SchemaId, rows: Vec<DataRow>) {
        self.project.set_project_data(schema_id, rows)
    }

    // UI

    pub fn set_theme(&mut self, theme: Theme) {
        self.ui.set_theme(theme)
    }

    pub fn add_toast(&mut self, message: impl Into<String>, kind: ToastKind) -> ToastId {
        self.ui.add_toast(&mut self.ids, message, kind)
    }

    pub fn remove_toast(&mut self, id: &ToastId) -> bool {
        self.ui.remove_toast(id)
    }

    /// Drop toasts older than the configured lifetime
    pub fn expire_toasts(&mut self) -> usize {
        let now = self.ids.now();
        self.ui.expire_toasts(now, self.toast_ttl)
    }

    /// Apply one intent
    pub fn dispatch(&mut self, action: Action) -> Outcome {
        tracing::debug!(action = action.name(), "dispatch");
        match action {
            Action::AddSchema {
                schema_name,
                description,
                fields,
            } => Outcome::SchemaCreated(self.add_schema(schema_name, description, fields)),
            Action::DeleteSchema { id } => Outcome::from_changed(self.delete_schema(&id)),
            Action::UpdateSchema { schema } => Outcome::from_changed(self.update_schema(schema)),
            Action::AddSchemasToProject { ids } => {
                Outcome::SchemasAttached(self.add_schemas_to_project(ids))
            }
            Action::RemoveSchemaFromProject { id } => {
                Outcome::from_changed(self.remove_schema_from_project(&id))
            }
            Action::SetSelectedSchemaId { id } => {
                self.set_selected_schema_id(id);
                Outcome::Applied
            }
            Action::AddDataRow { schema_id, data } => {
                Outcome::RowAdded(self.add_data_row(&schema_id, data))
            }
            Action::UpdateDataRow {
                schema_id,
                row_id,
                data,
            } => Outcome::from_changed(self.update_data_row(&schema_id, &row_id, data)),
            Action::DeleteDataRow { schema_id, row_id } => {
                Outcome::from_changed(self.delete_data_row(&schema_id, &row_id))
            }
            Action::SetProjectData { schema_id, rows } => {
                self.set_project_data(schema_id, rows);
                Outcome::Applied
            }
            Action::SetTheme { theme } => {
                self.set_theme(theme);
                Outcome::Applied
            }
            Action::AddToast { message, kind } => {
                Outcome::ToastQueued(self.add_toast(message, kind))
            }
            Action::RemoveToast { id } => Outcome::from_changed(self.remove_toast(&id)),
            Action::ExpireToasts => Outcome::from_changed(self.expire_toasts() > 0),
        }
    }

    /// Dispatch newline-delimited JSON actions in order. Blank lines are
    /// skipped. Stops at the first malformed line; earlier actions stay
    /// applied.
    pub fn replay(&mut self, reader: impl BufRead) -> Result<Vec<Outcome>> {
        let mut outcomes = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let action: Action =
                serde_json::from_str(line).map_err(|source| StoreError::MalformedAction {
                    line: index + 1,
                    source,
                })?;
            outcomes.push(self.dispatch(action));
        }
        tracing::info!(actions = outcomes.len(), "replay finished");
        Ok(outcomes)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            schemas: self.registry.schemas().to_vec(),
            configured_schemas: self.project.configured_schemas().to_vec(),
            project_data: self
                .project
                .project_data()
                .iter()
                .map(|(id, rows)| (id.clone(), rows.clone()))
                .collect(),
            selected_schema_id: self.project.selected_schema_id().cloned(),
            theme: self.ui.theme(),
            toasts: self.ui.toasts().to_vec(),
        }
    }
}
