//! The closed set of renderable nodes.
//!
//! Every node kind is a variant of [`Writable`]. Traversal dispatches with an
//! exhaustive match in [`Writable::accept`], so adding a kind means every
//! [`Visitor`] has to say what it does with it.

use crate::field::{Field, FieldBearer, FieldType};
use crate::filter::Filter;
use crate::form::{Form, FormAction};
use crate::page::Page;
use crate::row::Row;
use crate::table::{Table, TableForm};
use crate::visitor::Visitor;

#[derive(Debug, Clone)]
pub enum Writable {
    Page(Box<Page>),
    Section(Section),
    FieldBearer(FieldBearer),
    Form(Form),
    TableForm(TableForm),
    Row(Row),
    Table(Table),
    Field(Field),
    Link(Link),
    Script(Script),
    FormAction(FormAction),
    Filter(Filter),
}

impl Writable {
    /// Calls the one visitor method matching this variant.
    pub fn accept<V: Visitor>(&mut self, visitor: &mut V) -> V::Output {
        match self {
            Writable::Page(page) => visitor.visit_page(page),
            Writable::Section(section) => visitor.visit_section(section),
            Writable::FieldBearer(bearer) => visitor.visit_field_bearer(bearer),
            Writable::Form(form) => visitor.visit_form(form),
            Writable::TableForm(form) => visitor.visit_table_form(form),
            Writable::Row(row) => visitor.visit_row(row),
            Writable::Table(table) => visitor.visit_table(table),
            Writable::Field(field) => visitor.visit_field(field),
            Writable::Link(link) => visitor.visit_link(link),
            Writable::Script(script) => visitor.visit_script(script),
            Writable::FormAction(action) => visitor.visit_form_action(action),
            Writable::Filter(filter) => visitor.visit_filter(filter),
        }
    }

    /// Whether the initializer descends into this node.
    pub fn is_initializable(&self) -> bool {
        matches!(
            self,
            Writable::Page(_)
                | Writable::Section(_)
                | Writable::FieldBearer(_)
                | Writable::Form(_)
                | Writable::TableForm(_)
        )
    }

    /// Every table in this subtree, depth first in document order.
    pub fn tables(&self) -> Vec<&Table> {
        match self {
            Writable::Table(table) => vec![table],
            Writable::Page(page) => page.writable().map(Writable::tables).unwrap_or_default(),
            Writable::Section(section) => section
                .writables()
                .iter()
                .flat_map(Writable::tables)
                .collect(),
            _ => Vec::new(),
        }
    }
}

macro_rules! writable_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Writable {
                fn from(node: $variant) -> Self {
                    Writable::$variant(node)
                }
            }
        )*
    };
}

writable_from!(Section, FieldBearer, Form, TableForm, Row, Table, Field, Link, Script, FormAction, Filter);

impl From<Page> for Writable {
    fn from(page: Page) -> Self {
        Writable::Page(Box::new(page))
    }
}

/// A container of writables, rendered in order.
#[derive(Debug, Clone, Default)]
pub struct Section {
    id: String,
    kind: String,
    writables: Vec<Writable>,
}

impl Section {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: "base".to_string(),
            writables: Vec::new(),
        }
    }

    /// Free-form kind, rendered as a CSS class.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_writable(mut self, writable: impl Into<Writable>) -> Self {
        self.writables.push(writable.into());
        self
    }

    /// Adds `text` as a literal field.
    pub fn with_content(self, text: impl Into<String>) -> Self {
        let text: String = text.into();
        let position = self.writables.len();
        self.with_writable(Field::literal(format!("content-{}", position), text))
    }

    /// Adds a heading.
    pub fn with_label(self, text: impl Into<String>) -> Self {
        let text = text.into();
        let position = self.writables.len();
        self.with_writable(Field::new(
            format!("label-{}", position),
            text,
            FieldType::SectionLabel,
        ))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn writables(&self) -> &[Writable] {
        &self.writables
    }

    pub fn writables_mut(&mut self) -> &mut [Writable] {
        &mut self.writables
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    uri: String,
    text: String,
}

impl Link {
    pub fn new(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            text: text.into(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    contents: String,
    kind: String,
}

impl Script {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            kind: "text/javascript".to_string(),
        }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;

    /// Records which visitor method ran.
    struct Recorder;

    impl Visitor for Recorder {
        type Output = &'static str;

        fn visit_page(&mut self, _: &mut Page) -> Self::Output {
            "page"
        }
        fn visit_section(&mut self, _: &mut Section) -> Self::Output {
            "section"
        }
        fn visit_field_bearer(&mut self, _: &mut FieldBearer) -> Self::Output {
            "field_bearer"
        }
        fn visit_form(&mut self, _: &mut Form) -> Self::Output {
            "form"
        }
        fn visit_table_form(&mut self, _: &mut TableForm) -> Self::Output {
            "table_form"
        }
        fn visit_row(&mut self, _: &mut Row) -> Self::Output {
            "row"
        }
        fn visit_table(&mut self, _: &mut Table) -> Self::Output {
            "table"
        }
        fn visit_field(&mut self, _: &mut Field) -> Self::Output {
            "field"
        }
        fn visit_link(&mut self, _: &mut Link) -> Self::Output {
            "link"
        }
        fn visit_script(&mut self, _: &mut Script) -> Self::Output {
            "script"
        }
        fn visit_form_action(&mut self, _: &mut FormAction) -> Self::Output {
            "form_action"
        }
        fn visit_filter(&mut self, _: &mut Filter) -> Self::Output {
            "filter"
        }
    }

    #[test]
    fn accept_dispatches_on_variant() {
        let mut recorder = Recorder;
        let mut link = Writable::from(Link::new("/", "home"));
        let mut table = Writable::from(Table::new("t", Vec::new()));
        let mut row = Writable::from(Row::default());

        assert_eq!(link.accept(&mut recorder), "link");
        assert_eq!(table.accept(&mut recorder), "table");
        assert_eq!(row.accept(&mut recorder), "row");
    }

    #[test]
    fn only_containers_are_initializable() {
        assert!(Writable::from(Section::new("s")).is_initializable());
        assert!(Writable::from(FieldBearer::default()).is_initializable());
        assert!(!Writable::from(Table::new("t", Vec::new())).is_initializable());
        assert!(!Writable::from(Script::new("")).is_initializable());
    }

    #[test]
    fn tables_are_collected_in_document_order() {
        let section = Section::new("outer")
            .with_writable(Table::new("a", Vec::new()))
            .with_writable(Section::new("inner").with_writable(Table::new("b", Vec::new())))
            .with_content("text")
            .with_writable(Table::new("c", Vec::new()));

        let writable = Writable::from(section);
        let ids: Vec<_> = writable.tables().iter().map(|t| t.id()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }
}
