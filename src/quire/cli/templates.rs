pub const MESSAGE_TEMPLATE: &str = r#"{{ content | style(level) }}"#;

/// One grid per sheet. Cells arrive padded to their column width.
pub const WORKBOOK_TEMPLATE: &str = r#"{% for sheet in sheets -%}
{{ sheet.title | style("sheet_title") }}
{{ sheet.header | style("address") }}
{% for line in sheet.lines -%}
{{ line.label | style("address") }}{% for cell in line.cells %} {% if cell.bold %}{{ cell.text | style("label") }}{% else %}{{ cell.text }}{% endif %}{% endfor %}
{% endfor %}
{%- endfor %}"#;
