//! Inventory export server
//!
//! Compiles saved inventory views into parameterized SQL for SQLite or
//! PostgreSQL and exports the matching resources as CSV.

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
