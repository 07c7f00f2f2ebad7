//! Domain logic for inventory exports
//!
//! - `export` - view filters to SQL, and result sets to CSV

pub mod export;
