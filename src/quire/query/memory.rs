use super::{Object, Order, Query, QueryCondition};
use crate::error::{QuireError, Result};
use crate::value::Value;

/// One in-memory object: ordered `(column, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.values.iter_mut().find(|(c, _)| c == column) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((column.to_string(), value)),
        }
    }
}

impl Object for Record {
    fn get(&self, column: &str) -> Option<Value> {
        self.values
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.clone())
    }

    /// `id` when present, otherwise the first column.
    fn primary_key(&self) -> Value {
        self.get("id")
            .or_else(|| self.values.first().map(|(_, v)| v.clone()))
            .unwrap_or_default()
    }

    fn columns(&self) -> Vec<String> {
        self.values.iter().map(|(c, _)| c.clone()).collect()
    }
}

/// A [`Query`] evaluated against a vector of records.
///
/// Evaluation follows SQL: predicates first, then ordering, then offset and
/// limit. Each `order_by` call becomes the primary key and earlier calls break
/// its ties, the same result as running stable sorts one after another.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryQuery {
    columns: Vec<String>,
    primary_key: String,
    records: Vec<Record>,
    predicates: Vec<(String, QueryCondition, Value)>,
    orders: Vec<(String, Order)>,
    offset: usize,
    limit: Option<usize>,
}

impl InMemoryQuery {
    /// The first column is the primary key.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        let primary_key = columns.first().cloned().unwrap_or_default();
        Self {
            columns,
            primary_key,
            records,
            predicates: Vec::new(),
            orders: Vec::new(),
            offset: 0,
            limit: None,
        }
    }

    /// Builds a query from a JSON array of flat objects.
    ///
    /// Columns are the union of object keys in order of first appearance. The
    /// primary key is `id` when present, otherwise the first column.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        let items = parsed
            .as_array()
            .ok_or_else(|| QuireError::Query("expected a JSON array of objects".to_string()))?;

        let mut columns: Vec<String> = Vec::new();
        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let object = item
                .as_object()
                .ok_or_else(|| QuireError::Query(format!("expected an object, got {}", item)))?;
            let mut record = Record::new();
            for (key, value) in object {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
                record.set(key, Value::from(value));
            }
            records.push(record);
        }

        let mut query = Self::new(columns, records);
        if query.columns.iter().any(|c| c == "id") {
            query.primary_key = "id".to_string();
        }
        Ok(query)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn primary_key_column(&self) -> &str {
        &self.primary_key
    }

    fn value_of(record: &Record, column: &str) -> Value {
        record.get(column).unwrap_or_default()
    }

    fn matching(&self) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|record| {
                self.predicates.iter().all(|(column, condition, criterion)| {
                    condition.matches(&Self::value_of(record, column), criterion)
                })
            })
            .collect()
    }
}

impl Query for InMemoryQuery {
    type Object = Record;

    fn find_by_primary_key(&self, pk: &Value) -> Result<Option<Record>> {
        Ok(self
            .records
            .iter()
            .find(|r| Self::value_of(r, &self.primary_key).compare(pk).is_eq())
            .cloned())
    }

    fn find(&self) -> Result<Vec<Record>> {
        let mut found = self.matching();

        found.sort_by(|a, b| {
            self.orders
                .iter()
                .map(|(column, order)| {
                    let ord = Self::value_of(a, column).compare(&Self::value_of(b, column));
                    match order {
                        Order::Ascending => ord,
                        Order::Descending => ord.reverse(),
                    }
                })
                .find(|ord| ord.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let limit = self.limit.unwrap_or(usize::MAX);
        Ok(found
            .into_iter()
            .skip(self.offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn order_by(mut self, column: &str, order: Order) -> Self {
        self.orders.insert(0, (column.to_string(), order));
        self
    }

    fn filter_by(mut self, column: &str, condition: QueryCondition, criterion: Value) -> Self {
        self.predicates
            .push((column.to_string(), condition, criterion));
        self
    }

    fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn count(&self) -> Result<usize> {
        Ok(self.matching().len())
    }

    fn exists(&self) -> Result<bool> {
        Ok(self.count()? > 0)
    }

    fn create_object(&self) -> Record {
        self.columns
            .iter()
            .fold(Record::new(), |record, column| record.with(column, Value::Null))
    }

    fn contains_field(&self, field: &str) -> bool {
        self.columns.iter().any(|c| c == field)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    /// Five staff records. `id, name, office, salary`.
    pub fn staff() -> InMemoryQuery {
        let columns = ["id", "name", "office", "salary"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let records = vec![
            staff_record(1, "Dana", "Seattle", 72_000),
            staff_record(2, "Abe", "Tacoma", 58_000),
            staff_record(3, "Cleo", "Seattle", 91_000),
            staff_record(4, "Bea", "Spokane", 64_000),
            staff_record(5, "Eli", "Seattle", 58_000),
        ];
        InMemoryQuery::new(columns, records)
    }

    fn staff_record(id: i64, name: &str, office: &str, salary: i64) -> Record {
        Record::new()
            .with("id", id)
            .with("name", name)
            .with("office", office)
            .with("salary", salary)
    }
}
