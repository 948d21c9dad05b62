use crate::query::{Order, Query, QueryCondition};
use crate::row::Row;
use crate::value::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    SortAsc,
    SortDesc,
    LessThan,
    GreaterThan,
    EqualTo,
    NotEqualTo,
    Contains,
    PaginateBy,
}

impl Condition {
    pub fn is_sort(self) -> bool {
        matches!(self, Condition::SortAsc | Condition::SortDesc)
    }

    fn query_condition(self) -> Option<QueryCondition> {
        match self {
            Condition::LessThan => Some(QueryCondition::LessThan),
            Condition::GreaterThan => Some(QueryCondition::GreaterThan),
            Condition::EqualTo => Some(QueryCondition::Equal),
            Condition::NotEqualTo => Some(QueryCondition::NotEqual),
            Condition::Contains => Some(QueryCondition::Contains),
            Condition::SortAsc | Condition::SortDesc | Condition::PaginateBy => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Condition::SortAsc => "ascending",
            Condition::SortDesc => "descending",
            Condition::LessThan => "is less than",
            Condition::GreaterThan => "is greater than",
            Condition::EqualTo => "is",
            Condition::NotEqualTo => "is not",
            Condition::Contains => "contains",
            Condition::PaginateBy => "paginated by",
        };
        f.write_str(text)
    }
}

/// A single filtering instruction against one field.
///
/// Statements are immutable. The same statement can be pushed into a
/// [`Query`] or run over materialized [`Row`]s and gives the same answer
/// either way.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStatement {
    field_name: String,
    condition: Condition,
    criterion: Value,
    control: Option<Value>,
}

impl FilterStatement {
    pub fn new(
        field_name: impl Into<String>,
        condition: Condition,
        criterion: impl Into<Value>,
        control: Option<Value>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            condition,
            criterion: criterion.into(),
            control,
        }
    }

    pub fn sort_asc(field_name: impl Into<String>) -> Self {
        Self::new(field_name, Condition::SortAsc, Value::Null, None)
    }

    pub fn sort_desc(field_name: impl Into<String>) -> Self {
        Self::new(field_name, Condition::SortDesc, Value::Null, None)
    }

    pub fn compare(
        field_name: impl Into<String>,
        condition: Condition,
        criterion: impl Into<Value>,
    ) -> Self {
        Self::new(field_name, condition, criterion, None)
    }

    /// Shows page `page` (1-based) of `size` rows. Pagination targets no field.
    pub fn paginate_by(size: usize, page: usize) -> Self {
        Self::new("", Condition::PaginateBy, size, Some(Value::from(page)))
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn criterion(&self) -> &Value {
        &self.criterion
    }

    pub fn control(&self) -> Option<&Value> {
        self.control.as_ref()
    }

    /// Current page for pagination, never below 1.
    pub fn page(&self) -> usize {
        self.control
            .as_ref()
            .and_then(Value::as_i64)
            .map_or(1, |page| page.max(1) as usize)
    }

    /// Rows per page for pagination, never below 1.
    pub fn page_size(&self) -> usize {
        self.criterion.as_i64().map_or(1, |size| size.max(1) as usize)
    }

    fn page_offset(&self) -> usize {
        (self.page() - 1).saturating_mul(self.page_size())
    }

    pub fn apply_to_query<Q: Query>(&self, query: Q) -> Q {
        match self.condition {
            Condition::SortAsc => query.order_by(&self.field_name, Order::Ascending),
            Condition::SortDesc => query.order_by(&self.field_name, Order::Descending),
            Condition::PaginateBy => query
                .offset(self.page_offset())
                .limit(self.page_size()),
            other => match other.query_condition() {
                Some(condition) => {
                    query.filter_by(&self.field_name, condition, self.criterion.clone())
                }
                None => query,
            },
        }
    }

    pub fn apply_to_rows(&self, mut rows: Vec<Row>) -> Vec<Row> {
        match self.condition {
            Condition::SortAsc => {
                rows.sort_by(|a, b| {
                    a.value(&self.field_name)
                        .compare(&b.value(&self.field_name))
                });
                rows
            }
            Condition::SortDesc => {
                rows.sort_by(|a, b| {
                    b.value(&self.field_name)
                        .compare(&a.value(&self.field_name))
                });
                rows
            }
            Condition::PaginateBy => rows
                .into_iter()
                .skip(self.page_offset())
                .take(self.page_size())
                .collect(),
            other => match other.query_condition() {
                Some(condition) => {
                    rows.retain(|row| {
                        condition.matches(&row.value(&self.field_name), &self.criterion)
                    });
                    rows
                }
                None => rows,
            },
        }
    }

    /// One line of user-facing feedback for a non-pagination statement.
    pub fn describe(&self) -> String {
        if self.condition.is_sort() {
            format!("Sorted by {} {}.", self.field_name, self.condition)
        } else {
            format!(
                "Showing {} {} \"{}\".",
                self.field_name, self.condition, self.criterion
            )
        }
    }
}
