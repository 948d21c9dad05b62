//! The pass that runs before any writer.
//!
//! The initializer gives every field a positional suffix so that inputs of
//! the same name stay distinct, and on POST it validates forms and fires their
//! callbacks. Only containers are entered; leaves are left alone.

use crate::config::QuireConfig;
use crate::field::{Field, FieldBearer};
use crate::filter::Filter;
use crate::form::{Form, FormAction};
use crate::page::Page;
use crate::request::RequestContext;
use crate::row::Row;
use crate::table::{Table, TableForm};
use crate::visitor::Visitor;
use crate::writable::{Link, Script, Section, Writable};
use tracing::debug;

pub struct Initializer<'a> {
    request: &'a RequestContext,
    config: &'a QuireConfig,
}

impl<'a> Initializer<'a> {
    pub fn new(request: &'a RequestContext, config: &'a QuireConfig) -> Self {
        Self { request, config }
    }

    fn visit_child(&mut self, child: &mut Writable) {
        if child.is_initializable() {
            child.accept(self);
        }
    }
}

impl Visitor for Initializer<'_> {
    type Output = ();

    fn visit_page(&mut self, page: &mut Page) {
        debug!(page = page.id(), "initializing page");
        if let Some(child) = page.writable_mut() {
            self.visit_child(child);
        }
    }

    fn visit_section(&mut self, section: &mut Section) {
        for child in section.writables_mut() {
            self.visit_child(child);
        }
    }

    fn visit_field_bearer(&mut self, bearer: &mut FieldBearer) {
        for nested in bearer.field_bearers_mut() {
            self.visit_field_bearer(nested);
        }
        for (position, field) in bearer.fields_mut().iter_mut().enumerate() {
            field.set_position(position);
        }
    }

    fn visit_form(&mut self, form: &mut Form) {
        self.visit_field_bearer(form.field_bearer_mut());

        if self.request.is_post() {
            if form.is_valid(self.request, self.config) {
                form.run_on_valid();
            } else {
                form.run_on_invalid();
            }
        }
    }

    fn visit_table_form(&mut self, form: &mut TableForm) {
        self.visit_field_bearer(form.prototype_mut().field_bearer_mut());

        if self.request.is_post() {
            if form.is_valid(self.request, self.config) {
                form.run_on_valid();
            } else {
                form.run_on_invalid();
            }
        }
    }

    fn visit_row(&mut self, _: &mut Row) {}

    fn visit_table(&mut self, _: &mut Table) {}

    fn visit_field(&mut self, _: &mut Field) {}

    fn visit_link(&mut self, _: &mut Link) {}

    fn visit_script(&mut self, _: &mut Script) {}

    fn visit_form_action(&mut self, _: &mut FormAction) {}

    fn visit_filter(&mut self, _: &mut Filter) {}
}
