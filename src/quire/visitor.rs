use crate::field::{Field, FieldBearer};
use crate::filter::Filter;
use crate::form::{Form, FormAction};
use crate::page::Page;
use crate::row::Row;
use crate::table::{Table, TableForm};
use crate::writable::{Link, Script, Section};

/// One operation per [`Writable`](crate::writable::Writable) variant.
///
/// Nodes do not recurse on their own. A visitor that wants to descend calls
/// back into itself for the children it cares about.
pub trait Visitor {
    type Output;

    fn visit_page(&mut self, page: &mut Page) -> Self::Output;
    fn visit_section(&mut self, section: &mut Section) -> Self::Output;
    fn visit_field_bearer(&mut self, bearer: &mut FieldBearer) -> Self::Output;
    fn visit_form(&mut self, form: &mut Form) -> Self::Output;
    fn visit_table_form(&mut self, form: &mut TableForm) -> Self::Output;
    fn visit_row(&mut self, row: &mut Row) -> Self::Output;
    fn visit_table(&mut self, table: &mut Table) -> Self::Output;
    fn visit_field(&mut self, field: &mut Field) -> Self::Output;
    fn visit_link(&mut self, link: &mut Link) -> Self::Output;
    fn visit_script(&mut self, script: &mut Script) -> Self::Output;
    fn visit_form_action(&mut self, action: &mut FormAction) -> Self::Output;
    fn visit_filter(&mut self, filter: &mut Filter) -> Self::Output;
}
