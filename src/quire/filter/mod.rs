//! # Filter Chains
//!
//! A table narrows its data through a [`FilterChain`]: an ordered list of
//! [`Filter`] stages, each holding [`FilterStatement`]s. The end of the list
//! is an implicit sentinel, so an empty chain *is* the sentinel and behaves as
//! the identity on both queries and rows.
//!
//! ## Application Order
//!
//! Stages apply tail first. `a.combine(b)` puts `b` behind `a`, so `b`'s
//! statements reach the query before `a`'s. Build chains head first:
//! pagination, then sorting, then selection.
//!
//! When several statements sort, the one applied last is the primary key and
//! earlier ones break its ties. Row sorts are stable and
//! [`Query::order_by`] makes its latest call primary, so a chain orders rows
//! the same way whichever side each sort ran on. In a chain that sorts by
//! `salary` then `name` (head first), salary is primary.
//!
//! ## Degradation
//!
//! Not every field a user can filter on is a column of the query (computed
//! fields, fields the row maker adds). [`FilterChain::query_filter`] walks the
//! statements in application order and pushes each into the query until it
//! meets one whose field the query does not expose. From then on, for the
//! rest of that call, every statement is routed to its stage's row
//! statements instead, and [`FilterChain::row_filter`] applies them to the
//! materialized rows. Keeping the break sticky preserves the relative order
//! of the statements: a sort that runs in memory can never be undone by an
//! offset that already ran in the database.
//!
//! Each call starts unbroken, and recomputes every stage's query/row split.

use crate::error::Result;
use crate::query::Query;
use crate::row::Row;
use tracing::debug;

pub mod statement;

pub use statement::{Condition, FilterStatement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Search,
    Sort,
    Select,
    Static,
    Pagination,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Search => "search",
            FilterKind::Sort => "sort",
            FilterKind::Select => "select",
            FilterKind::Static => "static",
            FilterKind::Pagination => "pagination",
        }
    }
}

/// One stage of a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    handle: String,
    kind: FilterKind,
    statements: Vec<FilterStatement>,
    query_statements: Vec<FilterStatement>,
    row_statements: Vec<FilterStatement>,
    options: Vec<String>,
    feedback: Vec<String>,
}

impl Filter {
    pub fn new(handle: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            handle: handle.into(),
            kind,
            statements: Vec::new(),
            query_statements: Vec::new(),
            row_statements: Vec::new(),
            options: Vec::new(),
            feedback: Vec::new(),
        }
    }

    pub fn with_statement(mut self, statement: FilterStatement) -> Self {
        self.statements.push(statement);
        self
    }

    /// Choices offered to the user, e.g. the values of a select box.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort(handle: impl Into<String>, statement: FilterStatement) -> Self {
        Filter::new(handle, FilterKind::Sort).with_statement(statement)
    }

    pub fn pagination(handle: impl Into<String>, size: usize, page: usize) -> Self {
        Filter::new(handle, FilterKind::Pagination)
            .with_statement(FilterStatement::paginate_by(size, page))
    }

    /// A chain with `self` at the head and `next` behind it.
    pub fn combine(self, next: impl Into<FilterChain>) -> FilterChain {
        FilterChain::from(self).combine(next.into())
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn statements(&self) -> &[FilterStatement] {
        &self.statements
    }

    /// Statements pushed into the query by the last `query_filter` call.
    pub fn query_statements(&self) -> &[FilterStatement] {
        &self.query_statements
    }

    /// Statements left for `row_filter` by the last `query_filter` call.
    pub fn row_statements(&self) -> &[FilterStatement] {
        &self.row_statements
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn feedback(&self) -> &[String] {
        &self.feedback
    }

    /// The value the user currently has selected, as a display string.
    pub fn current(&self) -> String {
        self.statements
            .first()
            .map(|s| match s.condition() {
                Condition::PaginateBy => s.page().to_string(),
                _ => s.criterion().to_string(),
            })
            .unwrap_or_default()
    }

    fn reset(&mut self) {
        self.query_statements.clear();
        self.row_statements.clear();
        self.feedback.clear();
        if self.kind == FilterKind::Pagination {
            self.options.clear();
        }
    }

    fn note(&mut self, statement: &FilterStatement, total: usize) {
        if statement.condition() != Condition::PaginateBy {
            self.feedback.push(statement.describe());
            return;
        }

        let size = statement.page_size();
        let pages = total.div_ceil(size).max(1);
        self.options = (1..=pages).map(|p| p.to_string()).collect();

        if total == 0 {
            self.feedback.push("No results.".to_string());
        } else {
            let page = statement.page();
            let first = (page - 1).saturating_mul(size).saturating_add(1).min(total);
            let last = page.saturating_mul(size).min(total);
            self.feedback.push(format!(
                "Displaying results {}-{} of {}.",
                first, last, total
            ));
        }
    }
}

/// Ordered filter stages, head first, ending in the implicit sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain {
    stages: Vec<Filter>,
}

impl From<Filter> for FilterChain {
    fn from(filter: Filter) -> Self {
        Self {
            stages: vec![filter],
        }
    }
}

impl FilterChain {
    /// The identity chain.
    pub fn sentinel() -> Self {
        Self::default()
    }

    pub fn is_sentinel(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn head(&self) -> Option<&Filter> {
        self.stages.first()
    }

    /// The stage after `position`, `None` at the sentinel.
    pub fn next_filter(&self, position: usize) -> Option<&Filter> {
        self.stages.get(position.checked_add(1)?)
    }

    pub fn stages(&self) -> &[Filter] {
        &self.stages
    }

    pub fn stages_mut(&mut self) -> &mut [Filter] {
        &mut self.stages
    }

    pub fn stage(&self, handle: &str) -> Option<&Filter> {
        self.stages.iter().find(|s| s.handle == handle)
    }

    /// Puts `other` where this chain's sentinel was.
    pub fn combine(mut self, other: FilterChain) -> Self {
        self.stages.extend(other.stages);
        self
    }

    /// Pushes every statement the query can take into it, routing the rest
    /// to row filtering.
    pub fn query_filter<Q: Query>(&mut self, mut query: Q) -> Result<Q> {
        let mut broken = false;

        for stage in self.stages.iter_mut().rev() {
            stage.reset();

            for statement in stage.statements.clone() {
                let field = statement.field_name();
                if !field.is_empty() && !query.contains_field(field) {
                    if !broken {
                        debug!(
                            filter = stage.handle.as_str(),
                            field, "query lacks field, deferring to rows"
                        );
                    }
                    broken = true;
                }

                if broken {
                    stage.row_statements.push(statement);
                    continue;
                }

                let total = match statement.condition() {
                    Condition::PaginateBy => query.count()?,
                    _ => 0,
                };
                stage.note(&statement, total);
                query = statement.apply_to_query(query);
                stage.query_statements.push(statement);
            }
        }

        Ok(query)
    }

    /// Routes every statement to row filtering, for rows that never came
    /// from a query.
    pub fn defer_to_rows(&mut self) {
        for stage in self.stages.iter_mut() {
            stage.reset();
            stage.row_statements = stage.statements.clone();
        }
    }

    /// Applies the deferred statements in application order.
    pub fn row_filter(&mut self, mut rows: Vec<Row>) -> Vec<Row> {
        for stage in self.stages.iter_mut().rev() {
            for statement in stage.row_statements.clone() {
                stage.note(&statement, rows.len());
                rows = statement.apply_to_rows(rows);
            }
        }
        rows
    }

    /// Every statement applied to the query by the last call, in
    /// application order.
    pub fn query_statements(&self) -> Vec<&FilterStatement> {
        self.stages
            .iter()
            .rev()
            .flat_map(|s| s.query_statements.iter())
            .collect()
    }

    /// Every deferred statement, in application order.
    pub fn row_statements(&self) -> Vec<&FilterStatement> {
        self.stages
            .iter()
            .rev()
            .flat_map(|s| s.row_statements.iter())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::query::memory::fixtures::staff;
    use crate::query::memory::{InMemoryQuery, Record};
    use crate::query::Object;
    use crate::value::Value;

    /// Staff rows plus a computed `initials` field the query cannot see.
    fn staff_row(record: &Record) -> Row {
        let mut row = Row::from_object(record);
        let initials: String = record
            .get("name")
            .unwrap_or_default()
            .to_string()
            .chars()
            .take(2)
            .collect();
        row.field_bearer_mut()
            .add_field(Field::literal("initials", initials.to_uppercase()));
        row
    }

    fn run(chain: &mut FilterChain, query: InMemoryQuery) -> Vec<String> {
        let query = chain.query_filter(query).unwrap();
        let rows = query.find().unwrap().iter().map(staff_row).collect();
        chain
            .row_filter(rows)
            .iter()
            .map(|r| r.value("name").to_string())
            .collect()
    }

    #[test]
    fn sentinel_is_identity() {
        let mut chain = FilterChain::sentinel();
        assert!(chain.is_sentinel());
        assert!(chain.head().is_none());
        assert!(chain.next_filter(0).is_none());

        assert_eq!(chain.query_filter(staff()).unwrap(), staff());

        let rows: Vec<Row> = staff().find().unwrap().iter().map(staff_row).collect();
        assert_eq!(chain.row_filter(rows.clone()), rows);
    }

    #[test]
    fn combine_links_next_and_is_associative() {
        let a = Filter::new("a", FilterKind::Static);
        let b = Filter::new("b", FilterKind::Static);
        let c = Filter::new("c", FilterKind::Static);

        let ab = a.clone().combine(b.clone());
        assert_eq!(ab.head().map(Filter::handle), Some("a"));
        assert_eq!(ab.next_filter(0).map(Filter::handle), Some("b"));
        assert!(ab.next_filter(1).is_none());

        let left = a.clone().combine(b.clone()).combine(FilterChain::from(c.clone()));
        let right = a.combine(b.combine(c));
        assert_eq!(left, right);

        let handles: Vec<_> = left.stages().iter().map(Filter::handle).collect();
        assert_eq!(handles, ["a", "b", "c"]);
    }

    #[test]
    fn backed_fields_all_reach_the_query() {
        let mut chain = Filter::sort("sort", FilterStatement::sort_asc("name")).combine(
            Filter::new("office", FilterKind::Select).with_statement(FilterStatement::compare(
                "office",
                Condition::EqualTo,
                "Seattle",
            )),
        );

        let names = run(&mut chain, staff());
        assert_eq!(names, ["Cleo", "Dana", "Eli"]);
        assert_eq!(chain.query_statements().len(), 2);
        assert!(chain.row_statements().is_empty());
    }

    #[test]
    fn missing_field_breaks_the_rest_of_the_chain() {
        // Application order: select office, sort initials, sort salary.
        let mut chain = Filter::sort("salary", FilterStatement::sort_desc("salary"))
            .combine(Filter::sort("initials", FilterStatement::sort_asc("initials")))
            .combine(FilterChain::from(
                Filter::new("office", FilterKind::Select).with_statement(
                    FilterStatement::compare("office", Condition::NotEqualTo, "Tacoma"),
                ),
            ));

        let names = run(&mut chain, staff());

        assert_eq!(chain.stage("office").unwrap().query_statements().len(), 1);
        assert_eq!(chain.stage("initials").unwrap().row_statements().len(), 1);
        assert_eq!(chain.stage("salary").unwrap().row_statements().len(), 1);
        assert!(chain.stage("salary").unwrap().query_statements().is_empty());

        // Sorting by initials (BE, CL, DA, EL) then stably by salary descending.
        assert_eq!(names, ["Cleo", "Dana", "Bea", "Eli"]);
    }

    #[test]
    fn three_statement_chain_defers_exactly_one() {
        // Select on office, sort by salary, then an in-memory sort by initials.
        let mut chain = Filter::sort("initials", FilterStatement::sort_desc("initials"))
            .combine(Filter::sort("salary", FilterStatement::sort_desc("salary")))
            .combine(FilterChain::from(
                Filter::new("office", FilterKind::Select).with_statement(
                    FilterStatement::compare("office", Condition::EqualTo, "Seattle"),
                ),
            ));

        let names = run(&mut chain, staff());

        assert_eq!(chain.query_statements().len(), 2);
        assert_eq!(chain.row_statements().len(), 1);
        assert_eq!(chain.row_statements()[0].field_name(), "initials");
        // The query yields Cleo, Dana, Eli by salary; initials EL > DA > CL.
        assert_eq!(names, ["Eli", "Dana", "Cleo"]);
    }

    #[test]
    fn break_resets_between_calls() {
        let mut chain = Filter::sort("initials", FilterStatement::sort_asc("initials"))
            .combine(Filter::sort("name", FilterStatement::sort_asc("name")));

        chain.query_filter(staff()).unwrap();
        assert_eq!(chain.query_statements().len(), 1);
        assert_eq!(chain.row_statements().len(), 1);

        let with_initials = InMemoryQuery::new(
            vec!["id".into(), "name".into(), "initials".into()],
            vec![Record::new().with("id", 1).with("name", "Ada").with("initials", "AD")],
        );
        chain.query_filter(with_initials).unwrap();
        assert_eq!(chain.query_statements().len(), 2);
        assert!(chain.row_statements().is_empty());
    }

    #[test]
    fn pagination_reports_position_and_options() {
        let mut chain = Filter::pagination("page", 2, 2)
            .combine(Filter::sort("name", FilterStatement::sort_asc("name")));

        let names = run(&mut chain, staff());
        assert_eq!(names, ["Cleo", "Dana"]);

        let page = chain.stage("page").unwrap();
        assert_eq!(page.options(), ["1", "2", "3"]);
        assert_eq!(page.feedback(), ["Displaying results 3-4 of 5."]);
        assert_eq!(page.current(), "2");
        assert_eq!(
            chain.stage("name").unwrap().feedback(),
            ["Sorted by name ascending."]
        );
    }

    #[test]
    fn deferred_pagination_counts_rows() {
        let mut chain = Filter::pagination("page", 2, 3)
            .combine(Filter::sort("initials", FilterStatement::sort_asc("initials")));

        let names = run(&mut chain, staff());
        assert_eq!(names, ["Eli"]);

        let page = chain.stage("page").unwrap();
        assert_eq!(page.row_statements().len(), 1);
        assert_eq!(page.feedback(), ["Displaying results 5-5 of 5."]);
    }

    #[test]
    fn multi_sort_order_matches_on_both_paths() {
        let build = || {
            Filter::sort("salary", FilterStatement::sort_asc("salary"))
                .combine(Filter::sort("name", FilterStatement::sort_desc("name")))
        };

        let mut in_query = build();
        let queried = run(&mut in_query, staff());
        assert_eq!(in_query.query_statements().len(), 2);

        let mut in_rows = build();
        in_rows.defer_to_rows();
        let rows = staff().find().unwrap().iter().map(staff_row).collect();
        let filtered: Vec<_> = in_rows
            .row_filter(rows)
            .iter()
            .map(|r| r.value("name").to_string())
            .collect();

        assert_eq!(queried, ["Eli", "Abe", "Bea", "Dana", "Cleo"]);
        assert_eq!(queried, filtered);
    }

    #[test]
    fn huge_page_reports_without_overflow() {
        let mut chain = Filter::pagination("page", 2, usize::MAX)
            .combine(Filter::sort("name", FilterStatement::sort_asc("name")));

        assert!(run(&mut chain, staff()).is_empty());
        let page = chain.stage("page").unwrap();
        assert_eq!(page.options(), ["1", "2", "3"]);
        assert_eq!(page.feedback(), ["Displaying results 5-5 of 5."]);

        chain.defer_to_rows();
        let rows = staff().find().unwrap().iter().map(staff_row).collect();
        assert!(chain.row_filter(rows).is_empty());
    }

    #[test]
    fn defer_to_rows_skips_the_query() {
        let mut chain = Filter::sort("name", FilterStatement::sort_desc("name")).combine(
            Filter::new("s", FilterKind::Search).with_statement(FilterStatement::compare(
                "office",
                Condition::Contains,
                Value::from("sea"),
            )),
        );
        chain.defer_to_rows();

        let rows = staff().find().unwrap().iter().map(staff_row).collect();
        let names: Vec<_> = chain
            .row_filter(rows)
            .iter()
            .map(|r| r.value("name").to_string())
            .collect();
        assert_eq!(names, ["Eli", "Dana", "Cleo"]);
        assert!(chain.query_statements().is_empty());
    }
}
