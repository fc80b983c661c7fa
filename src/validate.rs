//! Caller-side checks
//!
//! The store accepts any well-typed input. These helpers are what the
//! dashboard runs before it calls the store: schema drafts need a name and at
//! least one named field, and row forms need every required field filled.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::schema::{Schema, SchemaField};
use crate::value::{FieldValue, RowValues};

/// A schema being edited, before it is submitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDraft {
    pub schema_name: String,
    pub description: String,
    pub fields: Vec<SchemaField>,
}

impl SchemaDraft {
    pub fn new(schema_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }
}

/// A draft that passed [`check_schema_draft`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub schema_name: String,
    pub description: String,
    pub fields: Vec<SchemaField>,
}

/// Check a draft and drop the blank rows the editor leaves behind.
///
/// Fields whose trimmed name is empty are discarded. The name is stored as
/// typed; only the emptiness check trims it.
pub fn check_schema_draft(draft: SchemaDraft) -> Result<ValidDraft, ValidationError> {
    if draft.schema_name.trim().is_empty() {
        return Err(ValidationError::EmptySchemaName);
    }

    let fields: Vec<SchemaField> = draft
        .fields
        .into_iter()
        .filter(|f| !f.name.trim().is_empty())
        .collect();
    if fields.is_empty() {
        return Err(ValidationError::NoFields);
    }

    let mut seen = HashSet::new();
    for field in &fields {
        if !seen.insert(field.name.as_str()) {
            return Err(ValidationError::DuplicateField(field.name.clone()));
        }
    }

    Ok(ValidDraft {
        schema_name: draft.schema_name,
        description: draft.description,
        fields,
    })
}

/// Form values for a new row, pre-populated from the schema's defaults
pub fn new_row_form(schema: &Schema) -> RowValues {
    schema
        .fields
        .iter()
        .map(|f| (f.name.clone(), FieldValue::from_default(f)))
        .collect()
}

/// Names of required fields that are absent, null, empty or an unchecked
/// box, in schema order
pub fn missing_required(schema: &Schema, values: &RowValues) -> Vec<String> {
    schema
        .required_fields()
        .filter(|f| values.get(&f.name).map_or(true, FieldValue::is_blank))
        .map(|f| f.name.clone())
        .collect()
}

/// Fail with the list of missing required fields, if any
pub fn check_row(schema: &Schema, values: &RowValues) -> Result<(), ValidationError> {
    let missing = missing_required(schema, values);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingRequired(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SchemaId;
    use crate::schema::FieldType;
    use crate::value::row_values;
    use chrono::Utc;

    fn widgets() -> Schema {
        Schema {
            id: SchemaId::from("g1"),
            schema_name: "Widgets".into(),
            description: String::new(),
            fields: vec![
                SchemaField::new("sku", FieldType::String).required(),
                SchemaField::new("qty", FieldType::Number).required().with_default("1"),
                SchemaField::new("notes", FieldType::String),
            ],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_draft_requires_name() {
        let draft = SchemaDraft::new("   ").with_field(SchemaField::new("sku", FieldType::String));
        assert_eq!(check_schema_draft(draft), Err(ValidationError::EmptySchemaName));
    }

    #[test]
    fn test_draft_drops_blank_fields() {
        let draft = SchemaDraft::new("Widgets")
            .with_field(SchemaField::new("", FieldType::String))
            .with_field(SchemaField::new("sku", FieldType::String))
            .with_field(SchemaField::new("  ", FieldType::Number));
        let valid = check_schema_draft(draft).unwrap();
        assert_eq!(valid.fields.len(), 1);
        assert_eq!(valid.fields[0].name, "sku");
    }

    #[test]
    fn test_draft_needs_a_named_field() {
        let draft =
            SchemaDraft::new("Widgets").with_field(SchemaField::new(" ", FieldType::String));
        assert_eq!(check_schema_draft(draft), Err(ValidationError::NoFields));
    }

    #[test]
    fn test_draft_rejects_duplicate_field_names() {
        let draft = SchemaDraft::new("Widgets")
            .with_field(SchemaField::new("sku", FieldType::String))
            .with_field(SchemaField::new("sku", FieldType::Number));
        assert_eq!(
            check_schema_draft(draft),
            Err(ValidationError::DuplicateField("sku".into()))
        );
    }

    #[test]
    fn test_new_row_form_uses_defaults() {
        let form = new_row_form(&widgets());
        assert_eq!(form.get("sku"), Some(&FieldValue::from("")));
        assert_eq!(form.get("qty"), Some(&FieldValue::Number(1.0)));
        assert_eq!(form.len(), 3);
    }

    #[test]
    fn test_missing_required() {
        let schema = widgets();
        let form = new_row_form(&schema);
        assert_eq!(missing_required(&schema, &form), vec!["sku"]);

        let filled = row_values([("sku", "A1")]);
        // qty absent entirely
        assert_eq!(missing_required(&schema, &filled), vec!["qty"]);

        let err = check_row(&schema, &RowValues::new()).unwrap_err();
        assert_eq!(err.to_string(), "Please fill in required fields: sku, qty");
    }

    #[test]
    fn test_unchecked_required_box_is_missing() {
        let mut schema = widgets();
        schema
            .fields
            .push(SchemaField::new("agreed", FieldType::Boolean).required().with_default("false"));

        let mut form = new_row_form(&schema);
        form.insert("sku".into(), FieldValue::from("A1"));
        assert_eq!(form.get("agreed"), Some(&FieldValue::Bool(false)));
        assert_eq!(missing_required(&schema, &form), vec!["agreed"]);

        form.insert("agreed".into(), FieldValue::Bool(true));
        assert!(check_row(&schema, &form).is_ok());
    }
}
