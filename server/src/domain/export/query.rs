//! Query assembler
//!
//! Combines a view's compiled filters into one deterministic statement:
//! predicates are AND-ed, any tag-key predicate switches to the tag-unnesting
//! shape, excluded ids are appended as integer parameters, and rows are
//! always ordered by `resources.id`.

use crate::data::sql::SqlDialect;
use crate::data::types::Filter;

use super::filters::{FilterError, SqlParams, SqlValue, TAGS_COLUMN, compile_filter};

/// Selected resource columns, in the order the executor decodes them
pub const RESOURCE_COLUMNS: [&str; 13] = [
    "id",
    "resource_id",
    "provider",
    "account",
    "service",
    "region",
    "name",
    "created_at",
    "fetched_at",
    "cost",
    "metadata",
    "tags",
    "link",
];

/// Columns holding JSON, selected as text on every backend
const JSON_COLUMNS: [&str; 2] = ["metadata", "tags"];

/// Executable statement plus its bound values in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Build the export statement for a view's filters and exclusion list.
///
/// The first failing filter aborts the whole build.
pub fn build_export_query(
    filters: &[Filter],
    exclude: &[i64],
    dialect: &dyn SqlDialect,
) -> Result<CompiledQuery, FilterError> {
    let mut params = SqlParams::new();
    let mut predicates = Vec::with_capacity(filters.len());
    let mut uses_tags = false;

    for filter in filters {
        let predicate = compile_filter(filter, dialect, &mut params)?;
        uses_tags |= predicate.uses_tags;
        predicates.push(predicate.sql);
    }

    let mut conditions: Vec<String> = Vec::with_capacity(predicates.len() + 2);
    if uses_tags && let Some(guard) = dialect.unnest_element_guard() {
        conditions.push(guard.to_string());
    }
    conditions.extend(predicates);

    if !exclude.is_empty() {
        let list = params.push_list(dialect, exclude.iter().copied().map(SqlValue::Integer));
        conditions.push(format!("resources.id NOT IN ({})", list));
    }

    let from = if uses_tags {
        format!("resources CROSS JOIN {}", dialect.unnest_tags(TAGS_COLUMN))
    } else {
        "resources".to_string()
    };

    let mut sql = format!("SELECT {} FROM {}", select_list(dialect), from);
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY resources.id");

    tracing::trace!(
        dialect = dialect.name(),
        filters = filters.len(),
        excluded = exclude.len(),
        uses_tags,
        sql = %sql,
        "Built export query"
    );

    Ok(CompiledQuery {
        sql,
        params: params.into_values(),
    })
}

/// Statement exporting the whole resource set
pub fn unfiltered_query(dialect: &dyn SqlDialect) -> CompiledQuery {
    CompiledQuery {
        sql: format!(
            "SELECT {} FROM resources ORDER BY resources.id",
            select_list(dialect)
        ),
        params: Vec::new(),
    }
}

fn select_list(dialect: &dyn SqlDialect) -> String {
    RESOURCE_COLUMNS
        .iter()
        .map(|col| {
            let qualified = format!("resources.{}", col);
            if JSON_COLUMNS.contains(col) {
                format!("{} AS {}", dialect.cast_to_string(&qualified), col)
            } else {
                qualified
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
