//! PostgreSQL repositories
//!
//! Types (Resource, View, etc.) should be imported from `crate::data::types`.

pub mod resources;
pub mod views;

pub use resources::fetch_rows;
pub use views::get_view;
