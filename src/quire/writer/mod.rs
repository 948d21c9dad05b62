//! # Writers
//!
//! [`HtmlWriter`] is the visitor that turns an initialized tree into markup.
//! Every node is rendered through a named template in [`templates`], with the
//! node's children rendered first and handed in as already-safe strings.
//!
//! Layout decisions (which fields are visible, what a table's headings are,
//! whether a literal is Markdown) stay in Rust. Templates only arrange the
//! pieces.
//!
//! [`excel`] holds the spreadsheet model used by the Excel render function.

use crate::config::QuireConfig;
use crate::error::Result;
use crate::field::{Field, FieldBearer, FieldType};
use crate::filter::Filter;
use crate::form::{Form, FormAction};
use crate::page::{Page, PageType};
use crate::row::Row;
use crate::table::{Table, TableForm};
use crate::value::Value;
use crate::visitor::Visitor;
use crate::writable::{Link, Script, Section};
use console::Style;
use once_cell::sync::Lazy;
use pulldown_cmark::{html, Parser};
use serde::Serialize;
use stencil::{Renderer, Target, Theme};

pub mod excel;
pub mod templates;

/// CSS classes for the named styles used in templates.
pub static HTML_THEME: Lazy<Theme> = Lazy::new(|| {
    Theme::new()
        .add_with_class("header", "page-header", Style::new().bold())
        .add_with_class("sub_header", "page-sub-header", Style::new())
        .add_with_class("error", "error", Style::new().red())
        .add_with_class("feedback", "feedback", Style::new().dim())
});

#[derive(Serialize)]
struct CrumbData<'a> {
    label: &'a str,
    href: &'a str,
}

#[derive(Serialize)]
struct PageData<'a> {
    id: &'a str,
    page_type: &'a str,
    title: &'a str,
    base_href: &'a str,
    header: &'a str,
    sub_header: &'a str,
    mini: bool,
    bread_crumbs: Vec<CrumbData<'a>>,
    content: String,
}

#[derive(Serialize)]
struct SectionData<'a> {
    id: &'a str,
    kind: &'a str,
    children: Vec<String>,
}

#[derive(Serialize)]
struct FieldData<'a> {
    slug: String,
    label: &'a str,
    field_type: &'a str,
    initial: String,
    checked: bool,
    required: bool,
    choices: &'a [String],
    size: Option<usize>,
    placeholder: &'a str,
    help_text: &'a str,
    errors: &'a [String],
    markdown: Option<String>,
    bare: bool,
}

#[derive(Serialize)]
struct RowData<'a> {
    highlightable: bool,
    on_click: Option<&'a str>,
    cells: Vec<String>,
}

#[derive(Serialize)]
struct TableData<'a> {
    id: &'a str,
    filters: Vec<String>,
    headers: Vec<String>,
    rows: Vec<String>,
    no_records: &'a str,
}

#[derive(Serialize)]
struct FilterData<'a> {
    handle: &'a str,
    kind: &'a str,
    options: &'a [String],
    current: String,
    feedback: &'a [String],
}

#[derive(Serialize)]
struct FormData<'a> {
    id: &'a str,
    errors: &'a [String],
    fields: String,
    actions: Vec<String>,
}

#[derive(Serialize)]
struct TableFormData<'a> {
    id: &'a str,
    errors: &'a [String],
    headers: Vec<String>,
    rows: Vec<String>,
    actions: Vec<String>,
}

#[derive(Serialize)]
struct FormActionData<'a> {
    label: &'a str,
    method: &'a str,
    target: &'a str,
}

#[derive(Serialize)]
struct LinkData<'a> {
    uri: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct ScriptData<'a> {
    kind: &'a str,
    contents: &'a str,
}

/// Renders writables to HTML.
pub struct HtmlWriter {
    renderer: Renderer,
    config: QuireConfig,
    markdown: bool,
    in_row: bool,
}

impl HtmlWriter {
    pub fn new(config: QuireConfig) -> Result<Self> {
        let mut renderer = Renderer::new(HTML_THEME.clone(), Target::Html);
        for (name, source) in templates::ALL {
            renderer.add_template(name, source)?;
        }
        Ok(Self {
            renderer,
            config,
            markdown: false,
            in_row: false,
        })
    }

    pub fn config(&self) -> &QuireConfig {
        &self.config
    }

    fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        Ok(self.renderer.render(template, data)?)
    }

    fn actions(&mut self, actions: &mut [FormAction]) -> Result<Vec<String>> {
        actions.iter_mut().map(|a| self.visit_form_action(a)).collect()
    }

    fn headers(row: &Row) -> Vec<String> {
        row.field_bearer()
            .visible_fields()
            .iter()
            .map(|f| f.label().to_string())
            .collect()
    }
}

fn is_checked(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Text(s) => matches!(s.as_str(), "true" | "on" | "1" | "yes"),
        Value::Float(_) | Value::Null => false,
    }
}

fn markdown_to_html(text: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new(text));
    out
}

impl Visitor for HtmlWriter {
    type Output = Result<String>;

    fn visit_page(&mut self, page: &mut Page) -> Result<String> {
        let page_type = page.page_type();
        self.markdown = page_type == PageType::MarkdownDocumentation;

        let content = match page.writable_mut() {
            Some(child) => child.accept(self)?,
            None => String::new(),
        };
        if page_type.is_fragment() {
            return Ok(content);
        }

        let data = PageData {
            id: page.id(),
            page_type: page_type.as_str(),
            title: page.title(),
            base_href: page.base_href(),
            header: page.header(),
            sub_header: page.sub_header(),
            mini: page_type == PageType::MiniHeader,
            bread_crumbs: page
                .bread_crumbs()
                .iter()
                .map(|(label, href)| CrumbData { label, href })
                .collect(),
            content,
        };
        self.render("page", &data)
    }

    fn visit_section(&mut self, section: &mut Section) -> Result<String> {
        let children = section
            .writables_mut()
            .iter_mut()
            .map(|child| child.accept(self))
            .collect::<Result<Vec<_>>>()?;

        self.render(
            "section",
            &SectionData {
                id: section.id(),
                kind: section.kind(),
                children,
            },
        )
    }

    fn visit_field_bearer(&mut self, bearer: &mut FieldBearer) -> Result<String> {
        let mut out = String::new();
        for nested in bearer.field_bearers_mut() {
            out.push_str(&self.visit_field_bearer(nested)?);
        }
        for field in bearer.fields_mut() {
            out.push_str(&self.visit_field(field)?);
        }
        Ok(out)
    }

    fn visit_form(&mut self, form: &mut Form) -> Result<String> {
        let fields = self.visit_field_bearer(form.field_bearer_mut())?;
        let actions = self.actions(form.actions_mut())?;

        self.render(
            "form",
            &FormData {
                id: form.id(),
                errors: form.errors(),
                fields,
                actions,
            },
        )
    }

    fn visit_table_form(&mut self, form: &mut TableForm) -> Result<String> {
        let headers = Self::headers(form.prototype());

        let mut rows = Vec::new();
        if form.rows().is_empty() {
            // A blank first row, named the way a submission of it is read back.
            let mut blank = form.prototypical_row();
            for field in blank.field_bearer_mut().fields_mut() {
                field.add_suffix("0");
            }
            rows.push(self.visit_row(&mut blank)?);
        } else {
            for row in form.rows_mut() {
                rows.push(self.visit_row(row)?);
            }
        }
        let actions = self.actions(form.actions_mut())?;

        self.render(
            "table_form",
            &TableFormData {
                id: form.id(),
                errors: form.errors(),
                headers,
                rows,
                actions,
            },
        )
    }

    fn visit_row(&mut self, row: &mut Row) -> Result<String> {
        let was_in_row = std::mem::replace(&mut self.in_row, true);
        let cells = row
            .field_bearer_mut()
            .fields_mut()
            .iter_mut()
            .filter(|f| f.is_visible())
            .map(|f| self.visit_field(f))
            .collect::<Result<Vec<_>>>();
        self.in_row = was_in_row;

        self.render(
            "row",
            &RowData {
                highlightable: row.is_highlightable(),
                on_click: row.on_click(),
                cells: cells?,
            },
        )
    }

    fn visit_table(&mut self, table: &mut Table) -> Result<String> {
        let filters = table
            .filter_mut()
            .stages_mut()
            .iter_mut()
            .map(|f| self.visit_filter(f))
            .collect::<Result<Vec<_>>>()?;
        let headers = table.rows().first().map(Self::headers).unwrap_or_default();
        let rows = table
            .rows_mut()
            .iter_mut()
            .map(|r| self.visit_row(r))
            .collect::<Result<Vec<_>>>()?;

        self.render(
            "table",
            &TableData {
                id: table.id(),
                filters,
                headers,
                rows,
                no_records: &self.config.no_records_message,
            },
        )
    }

    fn visit_field(&mut self, field: &mut Field) -> Result<String> {
        let field_type = field.field_type();
        let markdown = (self.markdown && field_type == FieldType::Literal)
            .then(|| markdown_to_html(&field.initial().to_string()));

        self.render(
            "field",
            &FieldData {
                slug: field.slug(),
                label: field.label(),
                field_type: field_type.as_str(),
                initial: field.initial().to_string(),
                checked: is_checked(field.initial()),
                required: field.is_required(),
                choices: field.choices(),
                size: field.size(),
                placeholder: field.placeholder(),
                help_text: field.help_text(),
                errors: field.errors(),
                markdown,
                bare: self.in_row,
            },
        )
    }

    fn visit_link(&mut self, link: &mut Link) -> Result<String> {
        self.render(
            "link",
            &LinkData {
                uri: link.uri(),
                text: link.text(),
            },
        )
    }

    fn visit_script(&mut self, script: &mut Script) -> Result<String> {
        self.render(
            "script",
            &ScriptData {
                kind: script.kind(),
                contents: script.contents(),
            },
        )
    }

    fn visit_form_action(&mut self, action: &mut FormAction) -> Result<String> {
        self.render(
            "form_action",
            &FormActionData {
                label: action.label(),
                method: action.method(),
                target: action.target(),
            },
        )
    }

    fn visit_filter(&mut self, filter: &mut Filter) -> Result<String> {
        self.render(
            "filter",
            &FilterData {
                handle: filter.handle(),
                kind: filter.kind().as_str(),
                options: filter.options(),
                current: filter.current(),
                feedback: filter.feedback(),
            },
        )
    }
}
