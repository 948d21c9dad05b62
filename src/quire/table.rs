//! Tables, and tables whose rows are form inputs.

use crate::config::QuireConfig;
use crate::error::Result;
use crate::field::Field;
use crate::filter::FilterChain;
use crate::form::{FieldValidator, FormAction, Validation, ValidationState};
use crate::query::Query;
use crate::request::RequestContext;
use crate::row::Row;
use crate::value::Value;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    id: String,
    rows: Vec<Row>,
    filter: FilterChain,
}

impl Table {
    pub fn new(id: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            id: id.into(),
            rows,
            filter: FilterChain::sentinel(),
        }
    }

    /// Runs `filter` over `query`, wraps every found object with
    /// `row_maker`, then applies the statements the query could not take.
    pub fn from_query<Q, F>(
        id: impl Into<String>,
        query: Q,
        mut filter: FilterChain,
        row_maker: F,
    ) -> Result<Self>
    where
        Q: Query,
        F: Fn(&Q::Object) -> Row,
    {
        let query = filter.query_filter(query)?;
        let rows = query.find()?.iter().map(row_maker).collect();
        let rows = filter.row_filter(rows);
        Ok(Self {
            id: id.into(),
            rows,
            filter,
        })
    }

    /// Filters already materialized rows; every statement runs in memory.
    pub fn from_rows(id: impl Into<String>, rows: Vec<Row>, mut filter: FilterChain) -> Self {
        filter.defer_to_rows();
        let rows = filter.row_filter(rows);
        Self {
            id: id.into(),
            rows,
            filter,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn filter(&self) -> &FilterChain {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut FilterChain {
        &mut self.filter
    }
}

/// Builds one blank row of a [`TableForm`].
pub type RowMaker = Rc<dyn Fn() -> Row>;

/// A form whose inputs repeat once per row.
///
/// The browser may add or remove rows before submitting, so on POST the rows
/// are rebuilt from the submitted keys rather than from anything stored: each
/// key containing the prototype's first field slug marks one row, and the
/// text around the slug is the fragment that tells the rows apart.
#[derive(Clone)]
pub struct TableForm {
    id: String,
    row_maker: RowMaker,
    prototype: Row,
    rows: Vec<Row>,
    actions: Vec<FormAction>,
    validation: Validation<TableForm>,
}

impl fmt::Debug for TableForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableForm")
            .field("id", &self.id)
            .field("prototype", &self.prototype)
            .field("rows", &self.rows)
            .field("errors", &self.validation.errors)
            .field("state", &self.validation.state)
            .finish_non_exhaustive()
    }
}

impl TableForm {
    pub fn new<M>(id: impl Into<String>, row_maker: M) -> Self
    where
        M: Fn() -> Row + 'static,
    {
        let row_maker: RowMaker = Rc::new(row_maker);
        Self {
            id: id.into(),
            prototype: row_maker(),
            row_maker,
            rows: Vec::new(),
            actions: Vec::new(),
            validation: Validation::default(),
        }
    }

    pub fn with_action(mut self, action: FormAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_validator<V>(mut self, field: &str, validator: V) -> Self
    where
        V: Fn(&Field, &TableForm) -> std::result::Result<(), String> + 'static,
    {
        let validator: FieldValidator<TableForm> = Rc::new(validator);
        self.validation.add_validator(field, validator);
        self
    }

    pub fn on_valid<C: Fn(&mut TableForm) + 'static>(mut self, callback: C) -> Self {
        self.validation.on_valid = Some(Rc::new(callback));
        self
    }

    pub fn on_invalid<C: Fn(&mut TableForm) + 'static>(mut self, callback: C) -> Self {
        self.validation.on_invalid = Some(Rc::new(callback));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// A fresh, unsuffixed row.
    pub fn prototypical_row(&self) -> Row {
        (self.row_maker)()
    }

    /// The stored prototype row, used for column headings.
    pub fn prototype(&self) -> &Row {
        &self.prototype
    }

    pub fn prototype_mut(&mut self) -> &mut Row {
        &mut self.prototype
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn actions(&self) -> &[FormAction] {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut [FormAction] {
        &mut self.actions
    }

    /// Table forms never filter their rows.
    pub fn filter(&self) -> FilterChain {
        FilterChain::sentinel()
    }

    pub fn errors(&self) -> &[String] {
        &self.validation.errors
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.validation.errors.push(error.into());
    }

    pub fn validation_state(&self) -> ValidationState {
        self.validation.state
    }

    pub fn is_valid(&mut self, request: &RequestContext, config: &QuireConfig) -> bool {
        if self.validation.state == ValidationState::Unvalidated {
            self.validate(request, config);
        }
        self.validation.state == ValidationState::Valid
    }

    fn validate(&mut self, request: &RequestContext, config: &QuireConfig) {
        let prototype = self.prototypical_row();
        self.rows = match prototype.field_bearer().fields().first() {
            Some(first) => self.rebuild_rows(&prototype, &first.slug(), request, config),
            None => Vec::new(),
        };

        let mut failures: Vec<(usize, usize, String)> = Vec::new();
        for (r, row) in self.rows.iter().enumerate() {
            for (f, field) in row.field_bearer().fields().iter().enumerate() {
                for error in self.validation.check(field, self) {
                    failures.push((r, f, error));
                }
            }
        }
        for (r, f, error) in failures {
            if let Some(field) = self.rows[r].field_bearer_mut().fields_mut().get_mut(f) {
                field.add_error(error);
            }
        }

        let mut valid = true;
        for row in &self.rows {
            if row.field_bearer().fields().iter().any(|f| !f.is_valid()) {
                self.validation.errors.push(config.form_error_message.clone());
                valid = false;
            }
        }

        self.validation.state = if valid {
            ValidationState::Valid
        } else {
            ValidationState::Invalid
        };
        debug!(
            form = self.id.as_str(),
            rows = self.rows.len(),
            valid,
            "table form validated"
        );
    }

    fn rebuild_rows(
        &self,
        prototype: &Row,
        first_slug: &str,
        request: &RequestContext,
        config: &QuireConfig,
    ) -> Vec<Row> {
        let mut rows = Vec::new();

        for key in request.submitted_keys() {
            let Some(at) = key.find(first_slug) else {
                continue;
            };
            let leading = key[..at].trim_matches('-');
            let trailing = key[at + first_slug.len()..].trim_matches('-');

            let mut row = self.prototypical_row();
            for field in row.field_bearer_mut().fields_mut() {
                if let Some(proto) = prototype.field_bearer().field(field.name()) {
                    for suffix in proto.suffixes() {
                        field.add_suffix(suffix.clone());
                    }
                }
                field.add_suffix(trailing);
                field.add_prefix(leading);

                if let Some(submitted) = request.submitted(&field.slug()) {
                    field.set_initial(Value::from(submitted));
                }
                field.validate(config);
            }
            rows.push(row);
        }

        rows
    }

    pub fn run_on_valid(&mut self) {
        if let Some(callback) = self.validation.on_valid.clone() {
            callback(self);
        }
    }

    pub fn run_on_invalid(&mut self) {
        if let Some(callback) = self.validation.on_invalid.clone() {
            callback(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldBearer, FieldType};
    use crate::filter::{Filter, FilterStatement};
    use crate::query::memory::fixtures::staff;

    fn name_row() -> Row {
        Row::new(FieldBearer::new(vec![
            Field::new("Row Name", "Name", FieldType::Text).required(true),
            Field::new("Row Note", "Note", FieldType::Text).with_size(5),
        ]))
    }

    #[test]
    fn from_query_sorts_and_wraps() {
        let chain = FilterChain::from(Filter::sort("name", FilterStatement::sort_desc("name")));
        let table = Table::from_query("staff", staff(), chain, Row::from_object).unwrap();

        let names: Vec<_> = table.rows().iter().map(|r| r.value("name").to_string()).collect();
        assert_eq!(names, ["Eli", "Dana", "Cleo", "Bea", "Abe"]);
        assert_eq!(table.filter().query_statements().len(), 1);
    }

    #[test]
    fn from_rows_filters_in_memory() {
        let rows = vec![
            Row::new(FieldBearer::new(vec![Field::literal("n", 2)])),
            Row::new(FieldBearer::new(vec![Field::literal("n", 1)])),
        ];
        let table = Table::from_rows(
            "t",
            rows,
            Filter::sort("n", FilterStatement::sort_asc("n")).into(),
        );
        assert_eq!(table.rows()[0].value("n"), Value::Int(1));
        assert_eq!(table.filter().row_statements().len(), 1);
    }

    #[test]
    fn rows_are_rebuilt_from_submitted_keys() {
        let config = QuireConfig::default();
        let request = RequestContext::post([
            ("row-name-0", "A"),
            ("row-note-0", "first"),
            ("row-name-1", "B"),
            ("unrelated", "x"),
        ]);
        let mut form = TableForm::new("people", name_row);

        assert!(form.is_valid(&request, &config));
        assert_eq!(form.rows().len(), 2);

        let first = form.rows()[0].field_bearer();
        assert_eq!(first.field("Row Name").unwrap().slug(), "row-name-0");
        assert_eq!(first.field("Row Name").unwrap().initial(), &Value::from("A"));
        assert_eq!(first.field("Row Note").unwrap().initial(), &Value::from("first"));

        let second = form.rows()[1].field_bearer();
        assert_eq!(second.field("Row Name").unwrap().initial(), &Value::from("B"));
        assert_eq!(second.field("Row Note").unwrap().slug(), "row-note-1");
    }

    #[test]
    fn leading_fragments_become_prefixes() {
        let config = QuireConfig::default();
        let request = RequestContext::post([("new-row-name-x", "A"), ("new-row-note-x", "n")]);
        let mut form = TableForm::new("people", name_row);

        assert!(form.is_valid(&request, &config));
        let note = form.rows()[0].field_bearer().field("Row Note").unwrap();
        assert_eq!(note.prefixes(), ["new"]);
        assert_eq!(note.slug(), "new-row-note-x");
        assert_eq!(note.initial(), &Value::from("n"));
    }

    #[test]
    fn each_invalid_row_adds_one_error() {
        let config = QuireConfig::default();
        let request = RequestContext::post([
            ("row-name-0", ""),
            ("row-note-0", "far too long"),
            ("row-name-1", "ok"),
            ("row-name-2", ""),
        ]);
        let mut form = TableForm::new("people", name_row);

        assert!(!form.is_valid(&request, &config));
        assert_eq!(form.validation_state(), ValidationState::Invalid);
        assert_eq!(form.errors().len(), 2);
        assert_eq!(form.rows()[0].field_bearer().fields()[0].errors().len(), 1);
    }

    #[test]
    fn validators_run_for_every_row_field() {
        let config = QuireConfig::default();
        let request = RequestContext::post([("row-name-0", "Ann"), ("row-name-1", "Ann")]);
        let mut form = TableForm::new("people", name_row).with_validator(
            "Row Name",
            |field, form| {
                let same = form
                    .rows()
                    .iter()
                    .filter(|r| r.value("Row Name") == *field.initial())
                    .count();
                if same > 1 {
                    Err("Names must be unique.".to_string())
                } else {
                    Ok(())
                }
            },
        );

        assert!(!form.is_valid(&request, &config));
        assert_eq!(form.errors().len(), 2);
        assert_eq!(
            form.rows()[1].field_bearer().fields()[0].errors(),
            ["Names must be unique."]
        );
    }

    #[test]
    fn get_request_leaves_rows_empty() {
        let mut form = TableForm::new("people", name_row);
        assert_eq!(form.validation_state(), ValidationState::Unvalidated);
        assert!(form.is_valid(&RequestContext::get(), &QuireConfig::default()));
        assert!(form.rows().is_empty());
        assert!(form.filter().is_sentinel());
    }
}
