//! Fields and field bearers.
//!
//! A [`Field`] carries a base name plus prefix/suffix fragments. Its *slug*
//! joins all of them with `-`, which is what ends up as the HTML input name
//! and what submitted form data is matched against. Repeated rows of the same
//! fields stay distinguishable because each copy carries different fragments.

use crate::config::QuireConfig;
use crate::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    /// Read-only text, no input control
    Literal,
    /// A heading inside a form; shows the label, never the value
    SectionLabel,
    Html,
    Choice,
    Boolean,
    Hidden,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Literal => "literal",
            FieldType::SectionLabel => "section-label",
            FieldType::Html => "html",
            FieldType::Choice => "choice",
            FieldType::Boolean => "boolean",
            FieldType::Hidden => "hidden",
        }
    }

    /// Whether a value for this field can arrive in a submission.
    pub fn is_input(&self) -> bool {
        !matches!(self, FieldType::Literal | FieldType::SectionLabel)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    label: String,
    field_type: FieldType,
    initial: Value,
    required: bool,
    choices: Vec<String>,
    size: Option<usize>,
    help_text: String,
    placeholder: String,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
    position: Option<usize>,
    errors: Vec<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            initial: Value::Null,
            required: false,
            choices: Vec::new(),
            size: None,
            help_text: String::new(),
            placeholder: String::new(),
            prefixes: Vec::new(),
            suffixes: Vec::new(),
            position: None,
            errors: Vec::new(),
        }
    }

    /// A read-only field showing `text`.
    pub fn literal(name: impl Into<String>, text: impl Into<Value>) -> Self {
        let name = name.into();
        Field::new(name.clone(), name, FieldType::Literal).with_initial(text)
    }

    pub fn with_initial(mut self, initial: impl Into<Value>) -> Self {
        self.initial = initial.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Maximum length of the submitted value.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn initial(&self) -> &Value {
        &self.initial
    }

    pub fn set_initial(&mut self, initial: impl Into<Value>) {
        self.initial = initial.into();
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn size(&self) -> Option<usize> {
        self.size
    }

    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn is_visible(&self) -> bool {
        self.field_type != FieldType::Hidden
    }

    /// Appends a suffix fragment. Empty fragments are ignored.
    pub fn add_suffix(&mut self, suffix: impl Into<String>) {
        let suffix = suffix.into();
        if !suffix.is_empty() {
            self.suffixes.push(suffix);
        }
    }

    /// Appends a prefix fragment. Empty fragments are ignored.
    pub fn add_prefix(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        if !prefix.is_empty() {
            self.prefixes.push(prefix);
        }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Sets the positional suffix, replacing any earlier one.
    ///
    /// The position always comes last in the slug.
    pub fn set_position(&mut self, position: usize) {
        self.position = Some(position);
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// `prefixes-name-suffixes-position`, with the name slugified.
    pub fn slug(&self) -> String {
        let position = self.position.map(|p| p.to_string());
        self.prefixes
            .iter()
            .cloned()
            .chain(std::iter::once(slugify(&self.name)))
            .chain(self.suffixes.iter().cloned())
            .chain(position)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Re-checks the current value, replacing any earlier errors.
    pub fn validate(&mut self, config: &QuireConfig) {
        self.errors.clear();

        if !self.field_type.is_input() {
            return;
        }

        if self.initial.is_empty() {
            if self.required {
                self.errors.push(config.required_message.clone());
            }
            return;
        }

        let text = self.initial.to_string();
        if self.field_type == FieldType::Choice && !self.choices.iter().any(|c| *c == text) {
            self.errors
                .push(format!("\"{}\" is not one of the available choices.", text));
        }

        if let Some(size) = self.size {
            if text.chars().count() > size {
                self.errors
                    .push(format!("Must be no more than {} characters long.", size));
            }
        }
    }
}

/// Lowercases and collapses every run of non-alphanumerics into one `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// An ordered collection of fields plus nested bearers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldBearer {
    fields: Vec<Field>,
    field_bearers: Vec<FieldBearer>,
}

impl FieldBearer {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            field_bearers: Vec::new(),
        }
    }

    pub fn with_field_bearer(mut self, bearer: FieldBearer) -> Self {
        self.field_bearers.push(bearer);
        self
    }

    /// Adds a field, replacing an existing one with the same name in place.
    pub fn add_field(&mut self, field: Field) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    /// Directly owned fields, in insertion order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn field_bearers(&self) -> &[FieldBearer] {
        &self.field_bearers
    }

    pub fn field_bearers_mut(&mut self) -> &mut [FieldBearer] {
        &mut self.field_bearers
    }

    pub fn visible_fields(&self) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.is_visible()).collect()
    }

    /// Every field, nested bearers first, depth first.
    pub fn all_fields(&self) -> Vec<&Field> {
        let mut all: Vec<&Field> = self
            .field_bearers
            .iter()
            .flat_map(|b| b.all_fields())
            .collect();
        all.extend(self.fields.iter());
        all
    }

    pub fn all_fields_mut(&mut self) -> Vec<&mut Field> {
        let mut all: Vec<&mut Field> = self
            .field_bearers
            .iter_mut()
            .flat_map(|b| b.all_fields_mut())
            .collect();
        all.extend(self.fields.iter_mut());
        all
    }
}
