//! SQL dialect trait for multi-database support
//!
//! This trait defines the interface for generating database-specific SQL syntax.

/// Member of an unnested tag element (`{"key": .., "value": ..}`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagMember {
    Key,
    Value,
}

impl TagMember {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagMember::Key => "key",
            TagMember::Value => "value",
        }
    }
}

/// SQL dialect trait for generating database-specific SQL
///
/// Different databases have different syntax for:
/// - Parameter placeholders (? vs $1)
/// - JSON member access on the unnested tag element
/// - Unnesting a JSON array into rows
/// - JSON array length
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Generate a parameter placeholder for the given index (1-based)
    ///
    /// - SQLite: Always returns "?"
    /// - PostgreSQL: Returns "$1", "$2", etc.
    fn placeholder(&self, index: usize) -> String;

    /// Extract a member of the unnested tag element as text
    ///
    /// - SQLite: `json_extract(res.value, '$.key')`
    /// - PostgreSQL: `res->>'key'`
    fn tag_member(&self, member: TagMember) -> String;

    /// Number of elements in a JSON array column
    ///
    /// - SQLite: `json_array_length(col)`
    /// - PostgreSQL: `jsonb_array_length(col)`
    fn tags_array_length(&self, col: &str) -> String;

    /// Predicate testing whether a JSON array column is empty
    fn tags_is_empty(&self, col: &str, empty: bool) -> String {
        let op = if empty { "=" } else { "!=" };
        format!("{} {} 0", self.tags_array_length(col), op)
    }

    /// Table expression expanding a JSON array column into one row per
    /// element, aliased `res`
    ///
    /// - SQLite: `json_each(col) AS res`
    /// - PostgreSQL: `jsonb_array_elements(col) AS res`
    fn unnest_tags(&self, col: &str) -> String;

    /// Extra predicate that restricts unnested elements to JSON objects
    ///
    /// - SQLite: `res.type = 'object'`
    /// - PostgreSQL: none, `->>` yields NULL on non-objects
    fn unnest_element_guard(&self) -> Option<&'static str> {
        None
    }

    /// Cast a column to string type
    ///
    /// - SQLite: `col` (JSON is stored as TEXT)
    /// - PostgreSQL: `col::TEXT`
    fn cast_to_string(&self, col: &str) -> String;
}
