//! Inventory types shared by the SQLite and PostgreSQL backends

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::data::error::DataError;

// ============================================================================
// Tag / Resource
// ============================================================================

/// A single key/value label attached to a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// One inventoried cloud resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// Internal numeric key, used for ordering and exclusion
    pub id: i64,
    /// Provider-side identifier (ARN, resource URI, ...)
    pub resource_id: String,
    pub provider: String,
    pub account: String,
    pub service: String,
    pub region: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub fetched_at: DateTime<Utc>,
    pub cost: f64,
    pub metadata: serde_json::Value,
    pub tags: Vec<Tag>,
    pub link: String,
}

/// Raw resource row as selected by an export query
///
/// `metadata` and `tags` arrive as JSON text on both backends.
pub type ResourceRow = (
    i64,
    String,
    String,
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    f64,
    String,
    String,
    String,
);

impl Resource {
    /// Materialize a resource from a selected row, decoding the JSON columns
    pub fn from_row(row: ResourceRow) -> Result<Self, DataError> {
        let (
            id,
            resource_id,
            provider,
            account,
            service,
            region,
            name,
            created_at,
            fetched_at,
            cost,
            metadata,
            tags,
            link,
        ) = row;

        let metadata = serde_json::from_str(&metadata)
            .map_err(|e| DataError::Decode(format!("resource {} metadata: {}", id, e)))?;
        let tags = serde_json::from_str(&tags)
            .map_err(|e| DataError::Decode(format!("resource {} tags: {}", id, e)))?;

        Ok(Self {
            id,
            resource_id,
            provider,
            account,
            service,
            region,
            name,
            created_at,
            fetched_at,
            cost,
            metadata,
            tags,
            link,
        })
    }
}

// ============================================================================
// Filter / View
// ============================================================================

/// One filter triple of a saved view
///
/// `operator` is kept as the raw stored string and parsed when the view is
/// compiled, so an unknown operator surfaces as a filter error rather than a
/// decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub values: Vec<String>,
}

/// Stored views may hold `null` where a list is expected; read it as empty
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Filter {
    pub fn new(field: &str, operator: &str, values: &[&str]) -> Self {
        Self {
            field: field.to_string(),
            operator: operator.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Saved view: a named filter set plus resources excluded by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub id: i64,
    pub name: String,
    pub filters: Vec<Filter>,
    pub exclude: Vec<i64>,
}

/// Raw view row: `id, name, filters (JSON), exclude (JSON)`
pub type ViewRow = (i64, String, String, String);

impl View {
    pub fn from_row(row: ViewRow) -> Result<Self, DataError> {
        let (id, name, filters, exclude) = row;
        let filters: Option<Vec<Filter>> = serde_json::from_str(&filters)
            .map_err(|e| DataError::Decode(format!("view {} filters: {}", id, e)))?;
        let exclude: Option<Vec<i64>> = serde_json::from_str(&exclude)
            .map_err(|e| DataError::Decode(format!("view {} exclude: {}", id, e)))?;
        Ok(Self {
            id,
            name,
            filters: filters.unwrap_or_default(),
            exclude: exclude.unwrap_or_default(),
        })
    }
}
