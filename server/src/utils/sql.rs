//! SQL text helpers

/// Escape LIKE wildcards so user input matches literally.
///
/// The resulting pattern must be used with `ESCAPE '\'`.
///
/// ```
/// use inventory_server::utils::sql::escape_like_pattern;
///
/// let pattern = format!("%{}%", escape_like_pattern("prod_eu 100%"));
/// assert_eq!(pattern, "%prod\\_eu 100\\%%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Wrap a value as a `%value%` substring pattern with wildcards escaped
pub fn contains_pattern(s: &str) -> String {
    format!("%{}%", escape_like_pattern(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern_plain() {
        assert_eq!(escape_like_pattern("web-1"), "web-1");
    }

    #[test]
    fn test_escape_like_pattern_wildcards() {
        assert_eq!(escape_like_pattern("a%b_c"), "a\\%b\\_c");
    }

    #[test]
    fn test_escape_like_pattern_backslash_first() {
        assert_eq!(escape_like_pattern("c:\\%"), "c:\\\\\\%");
    }

    #[test]
    fn test_contains_pattern() {
        assert_eq!(contains_pattern("prod"), "%prod%");
        assert_eq!(contains_pattern(""), "%%");
    }
}
