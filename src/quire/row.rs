use crate::field::{Field, FieldBearer, FieldType};
use crate::query::Object;
use crate::value::Value;

/// One table row: a field bearer plus presentation flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    field_bearer: FieldBearer,
    on_click: Option<String>,
    highlightable: bool,
}

impl Row {
    pub fn new(field_bearer: FieldBearer) -> Self {
        Self {
            field_bearer,
            on_click: None,
            highlightable: false,
        }
    }

    /// One literal field per column of `object`, labelled with the column name.
    pub fn from_object<O: Object>(object: &O) -> Self {
        let fields = object
            .columns()
            .into_iter()
            .map(|column| {
                let value = object.get(&column).unwrap_or_default();
                Field::new(column.clone(), column, FieldType::Literal).with_initial(value)
            })
            .collect();
        Row::new(FieldBearer::new(fields))
    }

    pub fn with_on_click(mut self, on_click: impl Into<String>) -> Self {
        self.on_click = Some(on_click.into());
        self
    }

    pub fn highlightable(mut self, highlightable: bool) -> Self {
        self.highlightable = highlightable;
        self
    }

    pub fn field_bearer(&self) -> &FieldBearer {
        &self.field_bearer
    }

    pub fn field_bearer_mut(&mut self) -> &mut FieldBearer {
        &mut self.field_bearer
    }

    pub fn on_click(&self) -> Option<&str> {
        self.on_click.as_deref()
    }

    pub fn is_highlightable(&self) -> bool {
        self.highlightable
    }

    /// The initial value of the named field, `Null` when the row lacks it.
    pub fn value(&self, field: &str) -> Value {
        self.field_bearer
            .field(field)
            .map(|f| f.initial().clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::memory::Record;

    #[test]
    fn from_object_makes_literal_fields() {
        let record = Record::new().with("id", 7).with("name", "Ada");
        let row = Row::from_object(&record);

        let fields = row.field_bearer().fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].name(), "name");
        assert_eq!(fields[1].field_type(), FieldType::Literal);
        assert_eq!(row.value("id"), Value::Int(7));
        assert_eq!(row.value("missing"), Value::Null);
    }
}
