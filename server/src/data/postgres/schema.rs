//! PostgreSQL schema definitions
//!
//! Same tables as the SQLite schema, with JSON columns stored as JSONB.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL for PostgreSQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at BIGINT NOT NULL
);

-- =============================================================================
-- 1. Resources (one row per inventoried cloud resource)
-- =============================================================================
CREATE TABLE IF NOT EXISTS resources (
    id BIGSERIAL PRIMARY KEY,
    resource_id TEXT NOT NULL,
    provider TEXT NOT NULL,
    account TEXT NOT NULL,
    service TEXT NOT NULL DEFAULT '',
    region TEXT NOT NULL DEFAULT '',
    name TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    fetched_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    cost DOUBLE PRECISION NOT NULL DEFAULT 0,
    metadata JSONB NOT NULL DEFAULT '{}'::jsonb,
    tags JSONB NOT NULL DEFAULT '[]'::jsonb CHECK(jsonb_typeof(tags) = 'array'),
    link TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_resources_provider ON resources(provider);
CREATE INDEX IF NOT EXISTS idx_resources_account ON resources(account);

-- =============================================================================
-- 2. Views (saved filter sets)
-- =============================================================================
CREATE TABLE IF NOT EXISTS views (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    filters JSONB NOT NULL DEFAULT '[]'::jsonb,
    exclude JSONB NOT NULL DEFAULT '[]'::jsonb
);
"#;
