//! HTML templates, one per writable kind.
//!
//! Children arrive pre-rendered and are marked `safe`; everything else is
//! escaped by the environment.

pub const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
{%- if base_href %}
<base href="{{ base_href }}">
{%- endif %}
</head>
<body class="page {{ page_type }}" id="{{ id }}">
{%- if header %}
<header>
<h1>{{ header | style("header") }}</h1>
{%- if sub_header and not mini %}
<h2>{{ sub_header | style("sub_header") }}</h2>
{%- endif %}
{%- if bread_crumbs and not mini %}
<nav class="bread-crumbs">{% for crumb in bread_crumbs %}<a href="{{ crumb.href }}">{{ crumb.label }}</a>{% endfor %}</nav>
{%- endif %}
</header>
{%- endif %}
<main>{{ content|safe }}</main>
</body>
</html>
"#;

pub const SECTION_TEMPLATE: &str = r#"<section class="section {{ kind }}" id="{{ id }}">{% for child in children %}{{ child|safe }}{% endfor %}</section>"#;

pub const FIELD_TEMPLATE: &str = r#"
{%- if field_type == "literal" -%}
<div class="field literal">{% if markdown %}{{ markdown|safe }}{% else %}{{ initial }}{% endif %}</div>
{%- elif field_type == "section-label" -%}
<h3 class="section-label">{{ label }}</h3>
{%- elif field_type == "hidden" -%}
<input type="hidden" name="{{ slug }}" value="{{ initial }}">
{%- else -%}
{% if not bare %}<div class="field-container{% if errors %} has-errors{% endif %}"><label for="{{ slug }}">{{ label }}{% if required %} *{% endif %}</label>{% endif %}
{%- if field_type == "textarea" or field_type == "html" -%}
<textarea id="{{ slug }}" name="{{ slug }}" class="{{ field_type }}"{% if placeholder %} placeholder="{{ placeholder }}"{% endif %}{% if required %} required{% endif %}>{{ initial }}</textarea>
{%- elif field_type == "choice" -%}
{% for choice in choices %}<label class="choice"><input type="radio" name="{{ slug }}" value="{{ choice }}"{% if choice == initial %} checked{% endif %}>{{ choice }}</label>{% endfor %}
{%- elif field_type == "boolean" -%}
<input type="checkbox" id="{{ slug }}" name="{{ slug }}" value="true"{% if checked %} checked{% endif %}>
{%- else -%}
<input type="text" id="{{ slug }}" name="{{ slug }}" value="{{ initial }}"{% if size %} maxlength="{{ size }}"{% endif %}{% if placeholder %} placeholder="{{ placeholder }}"{% endif %}{% if required %} required{% endif %}>
{%- endif -%}
{% for error in errors %}<span class="field-error">{{ error | style("error") }}</span>{% endfor %}
{%- if help_text %}<span class="help-text">{{ help_text }}</span>{% endif %}
{%- if not bare %}</div>{% endif %}
{%- endif -%}
"#;

pub const ROW_TEMPLATE: &str = r#"<tr class="row{% if highlightable %} highlightable{% endif %}"{% if on_click %} onclick="{{ on_click }}"{% endif %}>{% for cell in cells %}<td>{{ cell|safe }}</td>{% endfor %}</tr>"#;

pub const TABLE_TEMPLATE: &str = r#"<div class="table-container" id="{{ id }}">
{%- for filter in filters %}{{ filter|safe }}{% endfor %}
<table>
<thead><tr>{% for label in headers %}<th>{{ label }}</th>{% endfor %}</tr></thead>
<tbody>{% for row in rows %}{{ row|safe }}{% endfor %}</tbody>
</table>
{%- if not rows %}
<p class="no-records">{{ no_records }}</p>
{%- endif %}
</div>"#;

pub const FILTER_TEMPLATE: &str = r#"<div class="filter {{ kind }}" data-handle="{{ handle }}">
{%- if kind == "pagination" -%}
<ul class="pages">{% for option in options %}<li{% if option == current %} class="current"{% endif %}>{{ option }}</li>{% endfor %}</ul>
{%- elif kind == "select" -%}
<select name="{{ handle }}">{% for option in options %}<option value="{{ option }}"{% if option == current %} selected{% endif %}>{{ option }}</option>{% endfor %}</select>
{%- elif kind == "search" -%}
<input type="search" name="{{ handle }}" value="{{ current }}">
{%- endif -%}
{% for line in feedback %}<span class="filter-feedback">{{ line | style("feedback") }}</span>{% endfor -%}
</div>"#;

pub const FORM_TEMPLATE: &str = r#"<form id="{{ id }}" class="form" method="post">
{%- if errors %}
<div class="form-errors">{% for error in errors %}<p>{{ error | style("error") }}</p>{% endfor %}</div>
{%- endif %}
{{ fields|safe }}
<div class="form-actions">{% for action in actions %}{{ action|safe }}{% endfor %}</div>
</form>"#;

pub const TABLE_FORM_TEMPLATE: &str = r#"<form id="{{ id }}" class="form table-form" method="post">
{%- if errors %}
<div class="form-errors">{% for error in errors %}<p>{{ error | style("error") }}</p>{% endfor %}</div>
{%- endif %}
<table>
<thead><tr>{% for label in headers %}<th>{{ label }}</th>{% endfor %}</tr></thead>
<tbody>{% for row in rows %}{{ row|safe }}{% endfor %}</tbody>
</table>
<div class="form-actions">{% for action in actions %}{{ action|safe }}{% endfor %}</div>
</form>"#;

pub const FORM_ACTION_TEMPLATE: &str = r#"<button type="submit" class="form-action" formaction="{{ target }}" formmethod="{{ method }}">{{ label }}</button>"#;

pub const LINK_TEMPLATE: &str = r#"<a href="{{ uri }}">{{ text }}</a>"#;

pub const SCRIPT_TEMPLATE: &str = r#"<script type="{{ kind }}">{{ contents|safe }}</script>"#;

pub const ALL: [(&str, &str); 11] = [
    ("page", PAGE_TEMPLATE),
    ("section", SECTION_TEMPLATE),
    ("field", FIELD_TEMPLATE),
    ("row", ROW_TEMPLATE),
    ("table", TABLE_TEMPLATE),
    ("filter", FILTER_TEMPLATE),
    ("form", FORM_TEMPLATE),
    ("table_form", TABLE_FORM_TEMPLATE),
    ("form_action", FORM_ACTION_TEMPLATE),
    ("link", LINK_TEMPLATE),
    ("script", SCRIPT_TEMPLATE),
];
