//! SQLite schema definitions
//!
//! JSON columns (`metadata`, `tags`, `filters`, `exclude`) are stored as TEXT
//! and queried through the JSON1 functions.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL
);

-- =============================================================================
-- 1. Resources (one row per inventoried cloud resource)
-- =============================================================================
CREATE TABLE IF NOT EXISTS resources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    resource_id TEXT NOT NULL,
    provider TEXT NOT NULL,
    account TEXT NOT NULL,
    service TEXT NOT NULL DEFAULT '',
    region TEXT NOT NULL DEFAULT '',
    name TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    fetched_at TEXT NOT NULL,
    cost REAL NOT NULL DEFAULT 0,
    metadata TEXT NOT NULL DEFAULT '{}' CHECK(json_valid(metadata)),
    tags TEXT NOT NULL DEFAULT '[]' CHECK(json_valid(tags) AND json_type(tags) = 'array'),
    link TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_resources_provider ON resources(provider);
CREATE INDEX IF NOT EXISTS idx_resources_account ON resources(account);

-- =============================================================================
-- 2. Views (saved filter sets)
-- =============================================================================
CREATE TABLE IF NOT EXISTS views (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    filters TEXT NOT NULL DEFAULT '[]' CHECK(json_valid(filters)),
    exclude TEXT NOT NULL DEFAULT '[]' CHECK(json_valid(exclude))
);
"#;
