//! Schema types and structures

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::SchemaId;

/// Type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Currency,
    Percentage,
    /// Closed set of values taken from `picklist_values`
    Picklist,
    Array,
    Object,
}

impl FieldType {
    /// Every field type, in the order the schema editor offers them
    pub const ALL: [FieldType; 9] = [
        FieldType::String,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Date,
        FieldType::Currency,
        FieldType::Percentage,
        FieldType::Picklist,
        FieldType::Array,
        FieldType::Object,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Currency => "currency",
            FieldType::Percentage => "percentage",
            FieldType::Picklist => "picklist",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }

    /// Whether values of this type are entered as numbers
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Number | FieldType::Currency | FieldType::Percentage
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named, typed slot within a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    /// Pre-populates new data rows
    #[serde(default)]
    pub default_value: String,
    /// Comma-separated options, only meaningful for picklists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picklist_values: Option<String>,
}

impl SchemaField {
    /// Create an optional field with no default
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            description: String::new(),
            required: false,
            default_value: String::new(),
            picklist_values: None,
        }
    }

    /// Create a picklist field from a comma-separated option list
    pub fn picklist(name: impl Into<String>, values: impl Into<String>) -> Self {
        Self {
            picklist_values: Some(values.into()),
            ..Self::new(name, FieldType::Picklist)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Picklist options, trimmed, with empty entries dropped
    pub fn picklist_options(&self) -> Vec<&str> {
        self.picklist_values
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect()
    }
}

/// A schema definition: a named, ordered collection of fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub id: SchemaId,
    pub schema_name: String,
    #[serde(default)]
    pub description: String,
    /// Field order is the column order of data views
    pub fields: Vec<SchemaField>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schema {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &SchemaField> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Field names in column order
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
