// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "inventory";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".inventory";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "inventory.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "INVENTORY_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "INVENTORY_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "INVENTORY_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "INVENTORY_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 3002;

/// Seconds to wait for in-flight requests after a shutdown signal
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Environment Variables - Database
// =============================================================================

/// Environment variable for the database backend (sqlite or postgres)
pub const ENV_DATABASE_BACKEND: &str = "INVENTORY_DATABASE_BACKEND";

/// Environment variable for the SQLite database file
pub const ENV_SQLITE_PATH: &str = "INVENTORY_SQLITE_PATH";

/// Environment variable for the PostgreSQL connection URL
pub const ENV_POSTGRES_URL: &str = "INVENTORY_POSTGRES_URL";

// =============================================================================
// SQLite
// =============================================================================

/// Default SQLite database file (relative to the working directory)
pub const SQLITE_DEFAULT_PATH: &str = "inventory.db";

/// Busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 5;

/// Maximum pool connections. Exports are read-only, so WAL readers can share.
pub const SQLITE_MAX_CONNECTIONS: u32 = 8;

// =============================================================================
// PostgreSQL
// =============================================================================

pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 20;
pub const POSTGRES_DEFAULT_MIN_CONNECTIONS: u32 = 2;
pub const POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;
/// 0 disables the timeout
pub const POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// Export
// =============================================================================

/// Environment variable for the directory holding per-export temp files
pub const ENV_EXPORT_TEMP_DIR: &str = "INVENTORY_EXPORT_TEMP_DIR";

/// File name announced in Content-Disposition
pub const EXPORT_FILE_NAME: &str = "export.csv";

/// Prefix of per-export temporary files
pub const EXPORT_TEMP_PREFIX: &str = "inventory-export-";

/// CSV header. The `id` column carries the external resource identifier.
pub const EXPORT_CSV_HEADER: [&str; 7] =
    ["id", "provider", "account", "name", "region", "tags", "cost"];
