//! Shared data types for all database backends
//!
//! Row types returned by both the SQLite and PostgreSQL repositories.

mod inventory;

pub use inventory::{Filter, Resource, ResourceRow, Tag, View, ViewRow};
