//! SQLite SQL dialect implementation

use super::dialect::{SqlDialect, TagMember};

/// SQLite SQL dialect
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn tag_member(&self, member: TagMember) -> String {
        format!("json_extract(res.value, '$.{}')", member.as_str())
    }

    fn tags_array_length(&self, col: &str) -> String {
        format!("json_array_length({})", col)
    }

    fn unnest_tags(&self, col: &str) -> String {
        format!("json_each({}) AS res", col)
    }

    fn unnest_element_guard(&self) -> Option<&'static str> {
        Some("res.type = 'object'")
    }

    fn cast_to_string(&self, col: &str) -> String {
        col.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        let d = SqliteDialect;
        assert_eq!(d.placeholder(1), "?");
        assert_eq!(d.placeholder(5), "?");
    }

    #[test]
    fn test_tag_member() {
        let d = SqliteDialect;
        assert_eq!(
            d.tag_member(TagMember::Key),
            "json_extract(res.value, '$.key')"
        );
        assert_eq!(
            d.tag_member(TagMember::Value),
            "json_extract(res.value, '$.value')"
        );
    }

    #[test]
    fn test_tags_is_empty() {
        let d = SqliteDialect;
        assert_eq!(
            d.tags_is_empty("resources.tags", true),
            "json_array_length(resources.tags) = 0"
        );
        assert_eq!(
            d.tags_is_empty("resources.tags", false),
            "json_array_length(resources.tags) != 0"
        );
    }

    #[test]
    fn test_unnest_tags() {
        let d = SqliteDialect;
        assert_eq!(
            d.unnest_tags("resources.tags"),
            "json_each(resources.tags) AS res"
        );
        assert_eq!(d.unnest_element_guard(), Some("res.type = 'object'"));
    }

    #[test]
    fn test_cast_to_string() {
        assert_eq!(SqliteDialect.cast_to_string("resources.tags"), "resources.tags");
    }
}
