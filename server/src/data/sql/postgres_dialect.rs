//! PostgreSQL SQL dialect implementation

use super::dialect::{SqlDialect, TagMember};

/// PostgreSQL SQL dialect
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn tag_member(&self, member: TagMember) -> String {
        format!("res->>'{}'", member.as_str())
    }

    fn tags_array_length(&self, col: &str) -> String {
        format!("jsonb_array_length({})", col)
    }

    fn unnest_tags(&self, col: &str) -> String {
        format!("jsonb_array_elements({}) AS res", col)
    }

    fn cast_to_string(&self, col: &str) -> String {
        format!("{}::TEXT", col)
    }
}
