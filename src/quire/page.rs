//! The root writable and render dispatch.
//!
//! `Page::render` always runs two passes: the [`Initializer`] first, then a
//! render function chosen by the page type. HTML-ish types hand the tree to
//! the [`HtmlWriter`]; PDF wraps the same HTML with a document name for the
//! PDF engine; Excel ignores markup and lays every table out in a
//! [`Workbook`].

use crate::config::QuireConfig;
use crate::error::{QuireError, Result};
use crate::field::slugify;
use crate::initializer::Initializer;
use crate::request::RequestContext;
use crate::visitor::Visitor;
use crate::writable::Writable;
use crate::writer::excel::Workbook;
use crate::writer::HtmlWriter;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PageType {
    AjaxAction,
    AjaxPage,
    Excel,
    #[default]
    FullHeader,
    MiniHeader,
    MultiPanel,
    Pdf,
    MarkdownDocumentation,
}

impl PageType {
    pub const ALL: [PageType; 8] = [
        PageType::AjaxAction,
        PageType::AjaxPage,
        PageType::Excel,
        PageType::FullHeader,
        PageType::MiniHeader,
        PageType::MultiPanel,
        PageType::Pdf,
        PageType::MarkdownDocumentation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::AjaxAction => "ajax-action",
            PageType::AjaxPage => "ajax-page",
            PageType::Excel => "excel",
            PageType::FullHeader => "full-header",
            PageType::MiniHeader => "mini-header",
            PageType::MultiPanel => "multi-panel",
            PageType::Pdf => "pdf",
            PageType::MarkdownDocumentation => "markdown-documentation",
        }
    }

    /// Unknown names fall back to the default HTML page.
    pub fn parse(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == name.trim())
            .unwrap_or_default()
    }

    /// Ajax responses are fragments without the document shell.
    pub fn is_fragment(&self) -> bool {
        matches!(self, PageType::AjaxAction | PageType::AjaxPage)
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for PageType {
    fn from(name: String) -> Self {
        PageType::parse(&name)
    }
}

impl From<&str> for PageType {
    fn from(name: &str) -> Self {
        PageType::parse(name)
    }
}

impl From<PageType> for String {
    fn from(page_type: PageType) -> Self {
        page_type.as_str().to_string()
    }
}

/// A `(label, href)` navigation entry.
pub type Crumb = (String, String);

#[derive(Debug, Clone, Default)]
pub struct Page {
    id: String,
    page_type: PageType,
    title: String,
    base_href: String,
    header: String,
    sub_header: String,
    bread_crumbs: Vec<Crumb>,
    writable: Option<Box<Writable>>,
}

impl Page {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_base_href(mut self, base_href: impl Into<String>) -> Self {
        self.base_href = base_href.into();
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_sub_header(mut self, sub_header: impl Into<String>) -> Self {
        self.sub_header = sub_header.into();
        self
    }

    pub fn with_bread_crumb(mut self, label: impl Into<String>, href: impl Into<String>) -> Self {
        self.bread_crumbs.push((label.into(), href.into()));
        self
    }

    /// Sets the single child, replacing any earlier one.
    pub fn with_writable(mut self, writable: impl Into<Writable>) -> Self {
        self.writable = Some(Box::new(writable.into()));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn page_type(&self) -> PageType {
        self.page_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn base_href(&self) -> &str {
        &self.base_href
    }

    /// The header, or the title when no header was set.
    pub fn header(&self) -> &str {
        if self.header.is_empty() {
            &self.title
        } else {
            &self.header
        }
    }

    pub fn sub_header(&self) -> &str {
        &self.sub_header
    }

    pub fn bread_crumbs(&self) -> &[Crumb] {
        &self.bread_crumbs
    }

    pub fn writable(&self) -> Option<&Writable> {
        self.writable.as_deref()
    }

    pub fn writable_mut(&mut self) -> Option<&mut Writable> {
        self.writable.as_deref_mut()
    }

    /// Initializes then renders with the defaults for this page type.
    pub fn render(
        &mut self,
        request: &RequestContext,
        config: &QuireConfig,
    ) -> Result<RenderOutput> {
        self.render_with(request, config, RenderOptions::default())
    }

    pub fn render_with(
        &mut self,
        request: &RequestContext,
        config: &QuireConfig,
        options: RenderOptions<'_>,
    ) -> Result<RenderOutput> {
        let mut initializer = options
            .initializer
            .unwrap_or_else(|| Initializer::new(request, config));
        let mut writer = match options.writer {
            Some(writer) => writer,
            None => HtmlWriter::new(config.clone())?,
        };
        let render_function = options
            .render_function
            .unwrap_or_else(|| default_render_function(self.page_type));

        initializer.visit_page(self);
        info!(page = self.id.as_str(), page_type = %self.page_type, "rendering page");
        render_function(self, &mut writer)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutput {
    Html(String),
    /// HTML for the PDF engine, and the name of the resulting document.
    Pdf { document_name: String, html: String },
    Excel { filename: String, workbook: Workbook },
}

/// Turns an initialized page into output.
pub type RenderFunction = Box<dyn FnOnce(&mut Page, &mut HtmlWriter) -> Result<RenderOutput>>;

/// Overrides for [`Page::render_with`]. Unset entries use the defaults.
#[derive(Default)]
pub struct RenderOptions<'a> {
    pub initializer: Option<Initializer<'a>>,
    pub writer: Option<HtmlWriter>,
    pub render_function: Option<RenderFunction>,
}

pub fn default_render_function(page_type: PageType) -> RenderFunction {
    match page_type {
        PageType::Pdf => Box::new(render_pdf),
        PageType::Excel => Box::new(render_excel),
        _ => Box::new(render_html),
    }
}

pub fn render_html(page: &mut Page, writer: &mut HtmlWriter) -> Result<RenderOutput> {
    Ok(RenderOutput::Html(writer.visit_page(page)?))
}

pub fn render_pdf(page: &mut Page, writer: &mut HtmlWriter) -> Result<RenderOutput> {
    let html = writer.visit_page(page)?;
    let document_name = if page.title.is_empty() {
        writer.config().document_fallback_name.clone()
    } else {
        page.title.clone()
    };
    Ok(RenderOutput::Pdf {
        document_name,
        html,
    })
}

/// One sheet per table in the page, in document order.
pub fn render_excel(page: &mut Page, writer: &mut HtmlWriter) -> Result<RenderOutput> {
    let config = writer.config();
    let tables = page.writable().map(Writable::tables).unwrap_or_default();
    if tables.is_empty() {
        warn!(page = page.id.as_str(), "excel export found no tables");
        return Err(QuireError::NoTables);
    }

    let mut workbook = Workbook::new();
    for table in tables {
        workbook.add_table(table, &config.no_records_message);
    }

    let title = if page.title.is_empty() {
        &config.document_fallback_name
    } else {
        &page.title
    };
    let filename = format!("{}-{}.xlsx", Local::now().format("%Y-%m-%d"), slugify(title));

    Ok(RenderOutput::Excel { filename, workbook })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, FieldBearer, FieldType};
    use crate::row::Row;
    use crate::table::Table;
    use crate::writable::Section;

    fn table_with_two_rows() -> Table {
        Table::new(
            "people",
            vec![
                Row::new(FieldBearer::new(vec![
                    Field::new("name", "Name", FieldType::Literal).with_initial("Ada"),
                    Field::new("id", "Id", FieldType::Hidden).with_initial(1),
                ])),
                Row::new(FieldBearer::new(vec![
                    Field::new("name", "Name", FieldType::Literal).with_initial("Grace"),
                    Field::new("id", "Id", FieldType::Hidden).with_initial(2),
                ])),
            ],
        )
    }

    #[test]
    fn page_type_names_round_trip() {
        for page_type in PageType::ALL {
            assert_eq!(PageType::parse(page_type.as_str()), page_type);
        }
        assert_eq!(PageType::parse("landscape"), PageType::FullHeader);
        assert_eq!(PageType::from("pdf"), PageType::Pdf);
    }

    #[test]
    fn page_type_serializes_as_kebab_name() {
        let json = serde_json::to_string(&PageType::MarkdownDocumentation).unwrap();
        assert_eq!(json, r#""markdown-documentation""#);

        let parsed: PageType = serde_json::from_str(r#""no-such-type""#).unwrap();
        assert_eq!(parsed, PageType::FullHeader);
    }

    #[test]
    fn excel_writes_labels_then_values() {
        let mut page = Page::new("p")
            .with_type(PageType::Excel)
            .with_title("Staff List")
            .with_writable(table_with_two_rows());

        let output = page
            .render(&RequestContext::get(), &QuireConfig::default())
            .unwrap();
        let RenderOutput::Excel { filename, workbook } = output else {
            panic!("expected excel output");
        };

        assert!(filename.ends_with("-staff-list.xlsx"));
        assert_eq!(filename.len(), "YYYY-MM-DD-staff-list.xlsx".len());

        let sheet = &workbook.sheets()[0];
        assert_eq!(sheet.title(), "people");
        assert_eq!(sheet.cell("A1").unwrap().value(), "Name");
        assert!(sheet.cell("A1").unwrap().is_bold());
        assert_eq!(sheet.cell("A2").unwrap().value(), "Ada");
        assert_eq!(sheet.cell("A3").unwrap().value(), "Grace");
        assert!(sheet.cell("B1").is_none());
        assert_eq!(sheet.column_width("A"), Some(5));
    }

    #[test]
    fn excel_without_tables_is_an_error() {
        let mut page = Page::new("p")
            .with_type(PageType::Excel)
            .with_writable(Section::new("s").with_content("nothing tabular"));

        let result = page.render(&RequestContext::get(), &QuireConfig::default());
        assert!(matches!(result, Err(QuireError::NoTables)));
    }

    #[test]
    fn empty_table_gets_no_records_cell() {
        let config = QuireConfig::default();
        let mut page = Page::new("p")
            .with_type(PageType::Excel)
            .with_writable(Table::new("empty", Vec::new()));

        let RenderOutput::Excel { workbook, .. } =
            page.render(&RequestContext::get(), &config).unwrap()
        else {
            panic!("expected excel output");
        };
        assert_eq!(
            workbook.sheets()[0].cell("A1").unwrap().value(),
            config.no_records_message
        );
    }

    #[test]
    fn pdf_names_the_document() {
        let config = QuireConfig::default();
        let mut untitled = Page::new("p").with_type(PageType::Pdf);
        let RenderOutput::Pdf { document_name, html } =
            untitled.render(&RequestContext::get(), &config).unwrap()
        else {
            panic!("expected pdf output");
        };
        assert_eq!(document_name, "document");
        assert!(html.contains("<html"));

        let mut titled = Page::new("p").with_type(PageType::Pdf).with_title("Report");
        let RenderOutput::Pdf { document_name, .. } =
            titled.render(&RequestContext::get(), &config).unwrap()
        else {
            panic!("expected pdf output");
        };
        assert_eq!(document_name, "Report");
    }

    #[test]
    fn unknown_types_render_html() {
        let mut page = Page::new("p")
            .with_type(PageType::parse("sideways"))
            .with_title("Hello")
            .with_writable(Section::new("s").with_content("body text"));

        let RenderOutput::Html(html) = page
            .render(&RequestContext::get(), &QuireConfig::default())
            .unwrap()
        else {
            panic!("expected html output");
        };
        assert!(html.contains("<title>Hello</title>"));
        assert!(html.contains("body text"));
    }

    #[test]
    fn render_function_can_be_replaced() {
        let options = RenderOptions {
            render_function: Some(Box::new(|page: &mut Page, _: &mut HtmlWriter| {
                Ok(RenderOutput::Html(format!("custom:{}", page.id())))
            })),
            ..RenderOptions::default()
        };

        let output = Page::new("home")
            .render_with(&RequestContext::get(), &QuireConfig::default(), options)
            .unwrap();
        assert_eq!(output, RenderOutput::Html("custom:home".to_string()));
    }
}
