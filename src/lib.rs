//! Metadesk
//!
//! In-memory schema registry and project data store for a metadata
//! management dashboard. Users define schemas (named, ordered field lists),
//! attach some of them to the active project, and enter rows against them.
//! Nothing is persisted; state lives for the life of the process.
//!
//! ## Features
//!
//! - **Schema Registry**: create, replace and delete schema definitions,
//!   with fuzzy name search and built-in demo schemas
//! - **Project Data Store**: attach schemas, keep per-schema rows, track the
//!   selected schema
//! - **UI State**: theme and an auto-expiring toast queue
//! - **Injected ids and time**: every id and timestamp comes from an
//!   [`IdSource`], so tests are deterministic
//!
//! ## Architecture
//!
//! ```text
//! Session (validation + toasts)
//!    │
//!    ▼
//! AppStore ── dispatch(Action) ──┬── SchemaRegistry
//!    │                           ├── ProjectStore
//!    └── IdSource                └── UiState
//! ```
//!
//! Store mutations never fail. Missing ids are no-ops, and drafts are
//! checked by the caller before they reach the store.

pub mod config;
pub mod error;
pub mod ids;
pub mod project;
pub mod registry;
pub mod schema;
pub mod seed;
pub mod session;
pub mod stats;
pub mod store;
pub mod ui;
pub mod validate;
pub mod value;

pub use config::DashboardConfig;
pub use error::{Result, StoreError, ValidationError};
pub use ids::{IdGenerator, IdSource, RowId, SchemaId, ToastId};
pub use project::ProjectStore;
pub use registry::SchemaRegistry;
pub use schema::{FieldType, Schema, SchemaField};
pub use session::Session;
pub use stats::{DashboardStats, SchemaSummary};
pub use store::{Action, AppStore, Outcome, StoreSnapshot};
pub use ui::{Theme, Toast, ToastKind, UiState};
pub use value::{DataRow, FieldValue, RowValues};
