//! Row values
//!
//! Rows are schema-oblivious maps from field name to [`FieldValue`]. Merging
//! is a shallow, field-level overwrite: list and object values are replaced
//! wholesale, never merged recursively.
//!
//! Values travel as plain JSON (`"A1"`, `1.5`, `true`, `null`), the same shape
//! the dashboard keeps in its row objects. Dates and picklist choices are
//! written as strings and read back as [`FieldValue::Text`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ids::RowId;
use crate::schema::{FieldType, SchemaField};

/// Field values of one row, keyed by field name
pub type RowValues = BTreeMap<String, FieldValue>;

/// Key under which the row id is serialized; never stored as a value
pub const ROW_ID_KEY: &str = "rowId";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    /// A picklist selection
    Choice(String),
    List(Vec<FieldValue>),
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Absent for required-field purposes: null, an empty string, or an
    /// unchecked box
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null | FieldValue::Bool(false) => true,
            FieldValue::Text(s) | FieldValue::Choice(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Interpret a field's `default_value` according to its type.
    ///
    /// An empty default is empty text, as is any text default, which is kept
    /// verbatim. Numeric, boolean and date defaults are trimmed before
    /// parsing; one that does not parse is kept as text rather than dropped.
    pub fn from_default(field: &SchemaField) -> Self {
        let raw = field.default_value.as_str();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return FieldValue::Text(raw.to_string());
        }
        match field.field_type {
            ty if ty.is_numeric() => trimmed
                .parse::<f64>()
                .map(FieldValue::Number)
                .unwrap_or_else(|_| FieldValue::from(raw)),
            FieldType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" => FieldValue::Bool(true),
                "false" => FieldValue::Bool(false),
                _ => FieldValue::from(raw),
            },
            FieldType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(FieldValue::Date)
                .unwrap_or_else(|_| FieldValue::from(raw)),
            FieldType::Picklist => FieldValue::Choice(trimmed.to_string()),
            _ => FieldValue::from(raw),
        }
    }
}

// --- Serialization (FieldValue -> plain JSON) ---

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Text(s) | FieldValue::Choice(s) => serializer.serialize_str(s),
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Date(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
            FieldValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FieldValue::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

// --- Deserialization (plain JSON -> FieldValue) ---

struct FieldValueVisitor;

impl<'de> Visitor<'de> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON value")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(FieldValue::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(FieldValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        FieldValue::deserialize(deserializer)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(FieldValue::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(FieldValue::Number(v as f64))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(FieldValue::Number(v as f64))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        Ok(FieldValue::Number(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(FieldValue::Text(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(FieldValue::Text(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(FieldValue::List(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut fields = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<String, FieldValue>()? {
            fields.insert(key, value);
        }
        Ok(FieldValue::Object(fields))
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FieldValueVisitor)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

/// One record of a schema's data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    #[serde(rename = "rowId")]
    pub row_id: RowId,
    #[serde(flatten)]
    pub values: RowValues,
}

impl DataRow {
    /// Build a row, discarding any caller-supplied `rowId` value
    pub fn new(row_id: RowId, mut values: RowValues) -> Self {
        values.remove(ROW_ID_KEY);
        Self { row_id, values }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Shallow overwrite: every key in `patch` replaces the current value.
    /// Keys not in `patch` are kept. The row id is never touched.
    pub fn merge(&mut self, patch: RowValues) {
        for (key, value) in patch {
            if key == ROW_ID_KEY {
                continue;
            }
            self.values.insert(key, value);
        }
    }
}

/// Build [`RowValues`] from `(name, value)` pairs
pub fn row_values<K, V, I>(pairs: I) -> RowValues
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
