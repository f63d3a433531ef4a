use serde_json::Value as JsonValue;

use crate::store::value::{encode, FieldValue};

/// Operator names understood by the store. Any other string is passed through
/// untouched and the store decides whether it is valid.
pub mod operators {
    pub const EQUAL: &str = "EQUAL";
    pub const NOT_EQUAL: &str = "NOT_EQUAL";
    pub const LESS_THAN: &str = "LESS_THAN";
    pub const LESS_THAN_OR_EQUAL: &str = "LESS_THAN_OR_EQUAL";
    pub const GREATER_THAN: &str = "GREATER_THAN";
    pub const GREATER_THAN_OR_EQUAL: &str = "GREATER_THAN_OR_EQUAL";
    pub const ARRAY_CONTAINS: &str = "ARRAY_CONTAINS";
    pub const IN: &str = "IN";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldFilter {
    field: String,
    op: String,
    value: FieldValue,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, op: impl Into<String>, value: FieldValue) -> Self {
        Self {
            field: field.into(),
            op: op.into(),
            value,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn op(&self) -> &str {
        &self.op
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    field: String,
    direction: Direction,
}

impl Order {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// Declarative filter/sort/limit description compiled into a structured query.
///
/// ```
/// use folio_store::store::api::query::{operators, Direction, QuerySpec};
///
/// let spec = QuerySpec::new()
///     .where_field("isPublic", operators::EQUAL, true)
///     .order_by("createdAt", Direction::Descending)
///     .limit(6);
/// assert_eq!(spec.filters().len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuerySpec {
    filters: Vec<FieldFilter>,
    order_by: Vec<Order>,
    limit: Option<u32>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter whose value is encoded from a native value.
    pub fn where_field(
        self,
        field: impl Into<String>,
        op: impl Into<String>,
        value: impl Into<JsonValue>,
    ) -> Self {
        let value = encode(&value.into());
        self.filter(FieldFilter::new(field, op, value))
    }

    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push(Order::new(field, direction));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filters(&self) -> &[FieldFilter] {
        &self.filters
    }

    pub fn orders(&self) -> &[Order] {
        &self.order_by
    }

    pub fn limit_value(&self) -> Option<u32> {
        self.limit
    }
}

/// Server-side sort and page size for a plain collection listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Raw `orderBy` parameter, e.g. `"createdAt desc"`.
    pub order_by: Option<String>,
    /// Caps the result to a single page of this size.
    pub page_size: Option<u32>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}
