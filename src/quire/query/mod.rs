//! # Data Layer Capability
//!
//! The widget tree never talks to a database directly. Tables and filters are
//! written against the [`Query`] trait, a small ORM-shaped capability:
//!
//! - builder steps (`order_by`, `filter_by`, `offset`, `limit`) consume and return
//!   the query, so applying a filter statement is a pure function of
//!   `(query, statement)`
//! - terminal steps (`find`, `count`, `exists`, `find_by_primary_key`) execute it
//! - [`Query::contains_field`] tells the filter chain whether a statement can be
//!   pushed into the query or must fall back to in-memory row filtering
//!
//! ## Implementations
//!
//! - [`memory::InMemoryQuery`]: SQL-shaped evaluation over a vector of records.
//!   Used by the command line tool and by tests.
//!
//! Production bindings to a real ORM implement the same trait.

use crate::error::Result;
use crate::value::Value;

pub mod memory;

/// Sort direction for [`Query::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// Predicate applied by [`Query::filter_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryCondition {
    NotEqual,
    Equal,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Contains,
}

impl QueryCondition {
    /// Evaluates the predicate for one column value.
    pub fn matches(self, value: &Value, criterion: &Value) -> bool {
        use std::cmp::Ordering::*;
        match self {
            QueryCondition::Equal => value.compare(criterion) == Equal,
            QueryCondition::NotEqual => value.compare(criterion) != Equal,
            QueryCondition::GreaterThan => value.compare(criterion) == Greater,
            QueryCondition::GreaterThanOrEqual => value.compare(criterion) != Less,
            QueryCondition::LessThan => value.compare(criterion) == Less,
            QueryCondition::LessThanOrEqual => value.compare(criterion) != Greater,
            QueryCondition::Contains => value.contains(criterion),
        }
    }
}

/// A single persisted entity as seen by the widget layer.
pub trait Object {
    /// Column value, `None` when the object has no such column.
    fn get(&self, column: &str) -> Option<Value>;

    fn primary_key(&self) -> Value;

    /// Column names in their natural order.
    fn columns(&self) -> Vec<String>;
}

/// Abstract query over one entity type.
pub trait Query: Sized {
    type Object: Object;

    fn find_by_primary_key(&self, pk: &Value) -> Result<Option<Self::Object>>;

    fn find(&self) -> Result<Vec<Self::Object>>;

    /// Makes `column` the primary sort key. Earlier orderings break ties.
    fn order_by(self, column: &str, order: Order) -> Self;

    fn filter_by(self, column: &str, condition: QueryCondition, criterion: Value) -> Self;

    fn offset(self, offset: usize) -> Self;

    fn limit(self, limit: usize) -> Self;

    /// Number of objects matched by the predicates, ignoring offset and limit.
    fn count(&self) -> Result<usize>;

    fn exists(&self) -> Result<bool>;

    /// A new, unsaved object of this query's entity type.
    fn create_object(&self) -> Self::Object;

    /// Whether `field` names a column this query can order or filter by.
    fn contains_field(&self, field: &str) -> bool;
}
