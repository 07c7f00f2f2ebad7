//! Filter compiler
//!
//! Turns one stored `{field, operator, values}` triple into a parenthesized
//! SQL predicate. User values never reach the SQL text: each one becomes a
//! placeholder whose typed value is appended to [`SqlParams`] in the order
//! the placeholders appear. Column names only ever come from [`PlainColumn`].

use std::fmt;

use thiserror::Error;

use crate::data::sql::{SqlDialect, TagMember};
use crate::data::types::Filter;
use crate::utils::sql::contains_pattern;

/// Field prefix selecting a single tag key, e.g. `tag:env`
pub const TAG_FIELD_PREFIX: &str = "tag:";

/// Qualified tag collection column
pub const TAGS_COLUMN: &str = "resources.tags";

const TAGS_FIELD: &str = "tags";
const COST_FIELD: &str = "cost";
const COST_COLUMN: &str = "resources.cost";

// ============================================================================
// Errors
// ============================================================================

/// Caller error in a view's filter list
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Unsupported filter field: {0}")]
    UnsupportedField(String),

    #[error("Operator {operator} is not supported for field {field}")]
    UnsupportedOperator { field: String, operator: String },

    #[error("Invalid value for {field} {operator}: {reason}")]
    InvalidValue {
        field: String,
        operator: String,
        reason: String,
    },
}

impl FilterError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedField(_) => "UNSUPPORTED_FIELD",
            Self::UnsupportedOperator { .. } => "UNSUPPORTED_OPERATOR",
            Self::InvalidValue { .. } => "INVALID_VALUE",
        }
    }

    fn unsupported_operator(filter: &Filter) -> Self {
        Self::UnsupportedOperator {
            field: filter.field.clone(),
            operator: filter.operator.clone(),
        }
    }

    fn invalid_value(filter: &Filter, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: filter.field.clone(),
            operator: filter.operator.clone(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Operators / field classes
// ============================================================================

/// Closed set of filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Is,
    IsNot,
    Contains,
    NotContains,
    IsEmpty,
    IsNotEmpty,
    Equal,
    Between,
    GreaterThan,
    LessThan,
}

impl Operator {
    /// Parse a stored operator name; names are matched exactly
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IS" => Some(Self::Is),
            "IS_NOT" => Some(Self::IsNot),
            "CONTAINS" => Some(Self::Contains),
            "NOT_CONTAINS" => Some(Self::NotContains),
            "IS_EMPTY" => Some(Self::IsEmpty),
            "IS_NOT_EMPTY" => Some(Self::IsNotEmpty),
            "EQUAL" => Some(Self::Equal),
            "BETWEEN" => Some(Self::Between),
            "GREATER_THAN" => Some(Self::GreaterThan),
            "LESS_THAN" => Some(Self::LessThan),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Is => "IS",
            Self::IsNot => "IS_NOT",
            Self::Contains => "CONTAINS",
            Self::NotContains => "NOT_CONTAINS",
            Self::IsEmpty => "IS_EMPTY",
            Self::IsNotEmpty => "IS_NOT_EMPTY",
            Self::Equal => "EQUAL",
            Self::Between => "BETWEEN",
            Self::GreaterThan => "GREATER_THAN",
            Self::LessThan => "LESS_THAN",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plain scalar text columns that can be filtered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlainColumn {
    Name,
    Region,
    Service,
    Provider,
    Account,
}

impl PlainColumn {
    fn from_field(field: &str) -> Option<Self> {
        match field {
            "name" => Some(Self::Name),
            "region" => Some(Self::Region),
            "service" => Some(Self::Service),
            "provider" => Some(Self::Provider),
            "account" => Some(Self::Account),
            _ => None,
        }
    }

    /// Fully qualified column reference
    pub fn column(&self) -> &'static str {
        match self {
            Self::Name => "resources.name",
            Self::Region => "resources.region",
            Self::Service => "resources.service",
            Self::Provider => "resources.provider",
            Self::Account => "resources.account",
        }
    }
}

/// What a filter's `field` refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldClass {
    Column(PlainColumn),
    /// A single tag key (`tag:<key>`)
    TagKey(String),
    /// The tag collection as a whole
    Tags,
    Cost,
}

impl FieldClass {
    pub fn parse(field: &str) -> Result<Self, FilterError> {
        if let Some(column) = PlainColumn::from_field(field) {
            return Ok(Self::Column(column));
        }
        match field {
            TAGS_FIELD => Ok(Self::Tags),
            COST_FIELD => Ok(Self::Cost),
            _ => match field.strip_prefix(TAG_FIELD_PREFIX) {
                Some(key) if !key.is_empty() => Ok(Self::TagKey(key.to_string())),
                _ => Err(FilterError::UnsupportedField(field.to_string())),
            },
        }
    }
}

// ============================================================================
// Bound parameters
// ============================================================================

/// A typed value bound to one placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Float(f64),
    Integer(i64),
}

/// Bound values collected in placeholder order
#[derive(Debug, Default)]
pub struct SqlParams {
    values: Vec<SqlValue>,
}

impl SqlParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value and return the placeholder that refers to it
    pub fn push(&mut self, dialect: &dyn SqlDialect, value: SqlValue) -> String {
        self.values.push(value);
        dialect.placeholder(self.values.len())
    }

    /// Append each value and return the comma-separated placeholder list
    pub fn push_list<I>(&mut self, dialect: &dyn SqlDialect, values: I) -> String
    where
        I: IntoIterator<Item = SqlValue>,
    {
        values
            .into_iter()
            .map(|v| self.push(dialect, v))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

// ============================================================================
// Compilation
// ============================================================================

/// One compiled filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub sql: String,
    /// Predicate reads the unnested tag element and needs the tag join
    pub uses_tags: bool,
}

impl Predicate {
    fn plain(sql: String) -> Self {
        Self {
            sql,
            uses_tags: false,
        }
    }

    fn tag(sql: String) -> Self {
        Self {
            sql,
            uses_tags: true,
        }
    }
}

/// Compile one filter into a predicate, appending its values to `params`.
///
/// Arity and value types are checked before anything is appended, so a
/// failed filter leaves `params` untouched.
pub fn compile_filter(
    filter: &Filter,
    dialect: &dyn SqlDialect,
    params: &mut SqlParams,
) -> Result<Predicate, FilterError> {
    let field = FieldClass::parse(&filter.field)?;
    let operator = Operator::parse(&filter.operator)
        .ok_or_else(|| FilterError::unsupported_operator(filter))?;

    match field {
        FieldClass::Column(column) => {
            compile_plain(filter, column.column(), operator, dialect, params).map(Predicate::plain)
        }
        FieldClass::TagKey(ref key) => {
            compile_tag_key(filter, key, operator, dialect, params).map(Predicate::tag)
        }
        FieldClass::Tags => match operator {
            Operator::IsEmpty => Ok(Predicate::plain(format!(
                "({})",
                dialect.tags_is_empty(TAGS_COLUMN, true)
            ))),
            Operator::IsNotEmpty => Ok(Predicate::plain(format!(
                "({})",
                dialect.tags_is_empty(TAGS_COLUMN, false)
            ))),
            _ => Err(FilterError::unsupported_operator(filter)),
        },
        FieldClass::Cost => compile_cost(filter, operator, dialect, params).map(Predicate::plain),
    }
}

fn compile_plain(
    filter: &Filter,
    col: &str,
    operator: Operator,
    dialect: &dyn SqlDialect,
    params: &mut SqlParams,
) -> Result<String, FilterError> {
    match operator {
        Operator::Is | Operator::IsNot => {
            require_values(filter)?;
            let list = params.push_list(dialect, text_values(filter));
            let op = if operator == Operator::Is { "IN" } else { "NOT IN" };
            Ok(format!("({} {} ({}))", col, op, list))
        }
        Operator::Contains | Operator::NotContains => {
            require_values(filter)?;
            let (op, joiner) = if operator == Operator::Contains {
                ("LIKE", " OR ")
            } else {
                ("NOT LIKE", " AND ")
            };
            let terms: Vec<String> = filter
                .values
                .iter()
                .map(|v| {
                    let p = params.push(dialect, SqlValue::Text(contains_pattern(v)));
                    format!("({} {} {} ESCAPE '\\')", col, op, p)
                })
                .collect();
            Ok(format!("({})", terms.join(joiner)))
        }
        Operator::IsEmpty => Ok(format!("(COALESCE({}, '') = '')", col)),
        Operator::IsNotEmpty => Ok(format!("(COALESCE({}, '') != '')", col)),
        _ => Err(FilterError::unsupported_operator(filter)),
    }
}

fn compile_tag_key(
    filter: &Filter,
    key: &str,
    operator: Operator,
    dialect: &dyn SqlDialect,
    params: &mut SqlParams,
) -> Result<String, FilterError> {
    let key_col = dialect.tag_member(TagMember::Key);
    let value_col = dialect.tag_member(TagMember::Value);

    match operator {
        Operator::Is | Operator::IsNot => {
            require_values(filter)?;
            let key_param = params.push(dialect, SqlValue::Text(key.to_string()));
            let list = params.push_list(dialect, text_values(filter));
            let op = if operator == Operator::Is { "IN" } else { "NOT IN" };
            Ok(format!(
                "(({} = {}) AND ({} {} ({})))",
                key_col, key_param, value_col, op, list
            ))
        }
        Operator::IsEmpty | Operator::IsNotEmpty => {
            let key_param = params.push(dialect, SqlValue::Text(key.to_string()));
            let op = if operator == Operator::IsEmpty { "=" } else { "!=" };
            Ok(format!(
                "(({} = {}) AND ({} {} ''))",
                key_col, key_param, value_col, op
            ))
        }
        // Substring semantics on tag values are undefined; refuse instead of
        // silently dropping the filter.
        _ => Err(FilterError::unsupported_operator(filter)),
    }
}

fn compile_cost(
    filter: &Filter,
    operator: Operator,
    dialect: &dyn SqlDialect,
    params: &mut SqlParams,
) -> Result<String, FilterError> {
    let comparison = match operator {
        Operator::Equal => "=",
        Operator::GreaterThan => ">",
        Operator::LessThan => "<",
        Operator::Between => {
            let [low, high] = filter.values.as_slice() else {
                return Err(FilterError::invalid_value(
                    filter,
                    format!("expected 2 values, got {}", filter.values.len()),
                ));
            };
            let low = parse_cost(filter, low)?;
            let high = parse_cost(filter, high)?;
            let low = params.push(dialect, SqlValue::Float(low));
            let high = params.push(dialect, SqlValue::Float(high));
            return Ok(format!(
                "({col} >= {} AND {col} <= {})",
                low,
                high,
                col = COST_COLUMN
            ));
        }
        _ => return Err(FilterError::unsupported_operator(filter)),
    };

    require_values(filter)?;
    let value = parse_cost(filter, &filter.values[0])?;
    let p = params.push(dialect, SqlValue::Float(value));
    Ok(format!("({} {} {})", COST_COLUMN, comparison, p))
}

fn require_values(filter: &Filter) -> Result<(), FilterError> {
    if filter.values.is_empty() {
        return Err(FilterError::invalid_value(filter, "at least one value is required"));
    }
    Ok(())
}

fn text_values(filter: &Filter) -> impl Iterator<Item = SqlValue> + '_ {
    filter.values.iter().cloned().map(SqlValue::Text)
}

fn parse_cost(filter: &Filter, raw: &str) -> Result<f64, FilterError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FilterError::invalid_value(
            filter,
            format!("'{}' is not a number", raw),
        )),
    }
}
