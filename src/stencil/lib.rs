//! # Stencil - Named-Style Template Rendering
//!
//! Renders [minijinja](https://docs.rs/minijinja) templates whose presentation is
//! expressed through *named styles* rather than inline markup or escape codes.
//!
//! The same template can be rendered for two targets:
//!
//! - [`Target::Html`]: auto-escaping is on, and `{{ value | style("name") }}` becomes
//!   `<span class="...">value</span>` using the CSS class registered for `name`.
//! - [`Target::Terminal`]: no escaping, and the `style` filter applies the registered
//!   `console::Style` (or nothing at all when colors are unsupported).
//!
//! ## Quick Example
//!
//! ```rust
//! use stencil::{render, Target, Theme};
//! use console::Style;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data {
//!     name: String,
//! }
//!
//! let theme = Theme::new().add_with_class("header", "page-header", Style::new().bold());
//!
//! let html = render(
//!     r#"<h1>{{ name | style("header") }}</h1>"#,
//!     &Data { name: "Q&A".into() },
//!     &theme,
//!     Target::Html,
//! )
//! .unwrap();
//! assert_eq!(html, r#"<h1><span class="page-header">Q&amp;A</span></h1>"#);
//! ```
//!
//! ## Missing Styles
//!
//! A style name that is not registered is reported by prepending an indicator
//! (`(!?)`) so typos in templates show up in output instead of being
//! silently dropped.

use console::{Style, Term};
use minijinja::{AutoEscape, Environment, Error, HtmlEscape, Value};
use serde::Serialize;
use std::collections::HashMap;

pub use minijinja::Error as TemplateError;

/// Prefix shown when a style name is not found.
pub const MISSING_STYLE_INDICATOR: &str = "(!?)";

/// Where rendered output is headed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// HTML output: auto-escaped, styles become CSS classes.
    Html,
    /// Terminal output: styles become ANSI codes when `color` is true.
    Terminal { color: bool },
}

impl Target {
    /// Terminal target with color support detected on `term`.
    ///
    /// Detect on the stream the output is written to: stdout and stderr are
    /// redirected independently.
    pub fn for_term(term: &Term) -> Self {
        Target::Terminal {
            color: term.features().colors_supported(),
        }
    }
}

#[derive(Clone)]
struct NamedStyle {
    terminal: Style,
    class: String,
}

/// A registry of named styles.
///
/// # Example
///
/// ```rust
/// use stencil::Styles;
/// use console::Style;
///
/// let styles = Styles::new()
///     .add("error", Style::new().bold().red())
///     .add_with_class("dim", "text-muted", Style::new().dim());
///
/// assert_eq!(styles.apply_html("dim", "<b>"), r#"<span class="text-muted">&lt;b&gt;</span>"#);
///
/// // Unknown style shows indicator
/// let unknown = styles.apply_plain("typo", "Hello");
/// assert!(unknown.starts_with("(!?)"));
/// ```
#[derive(Clone, Default)]
pub struct Styles {
    styles: HashMap<String, NamedStyle>,
}

impl Styles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named style whose CSS class is the style name itself.
    pub fn add(self, name: &str, style: Style) -> Self {
        self.add_with_class(name, name, style)
    }

    /// Adds a named style with an explicit CSS class.
    ///
    /// If a style with the same name exists, it is replaced.
    pub fn add_with_class(mut self, name: &str, class: &str, style: Style) -> Self {
        self.styles.insert(
            name.to_string(),
            NamedStyle {
                terminal: style,
                class: class.to_string(),
            },
        );
        self
    }

    /// Applies the terminal style. Always emits ANSI codes; callers decide
    /// whether color is wanted.
    pub fn apply(&self, name: &str, text: &str) -> String {
        match self.styles.get(name) {
            Some(style) => style
                .terminal
                .clone()
                .force_styling(true)
                .apply_to(text)
                .to_string(),
            None => self.flag_missing(text.to_string()),
        }
    }

    /// Checks the style name without emitting any codes.
    pub fn apply_plain(&self, name: &str, text: &str) -> String {
        if self.styles.contains_key(name) {
            text.to_string()
        } else {
            self.flag_missing(text.to_string())
        }
    }

    /// Wraps escaped text in a span carrying the style's CSS class.
    pub fn apply_html(&self, name: &str, text: &str) -> String {
        let escaped = escape_html(text);
        match self.styles.get(name) {
            Some(style) => format!(
                r#"<span class="{}">{}</span>"#,
                escape_html(&style.class),
                escaped
            ),
            None => self.flag_missing(escaped),
        }
    }

    fn flag_missing(&self, text: String) -> String {
        format!("{} {}", MISSING_STYLE_INDICATOR, text)
    }
}

/// A named collection of styles used when rendering templates.
#[derive(Clone, Default)]
pub struct Theme {
    styles: Styles,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, name: &str, style: Style) -> Self {
        self.styles = self.styles.add(name, style);
        self
    }

    pub fn add_with_class(mut self, name: &str, class: &str, style: Style) -> Self {
        self.styles = self.styles.add_with_class(name, class, style);
        self
    }
}

/// Escapes text for inclusion in HTML element content or attribute values.
fn escape_html(text: &str) -> String {
    HtmlEscape(text).to_string()
}

/// Renders a one-off template for the given target.
pub fn render<T: Serialize>(
    template: &str,
    data: &T,
    theme: &Theme,
    target: Target,
) -> Result<String, Error> {
    let mut env = Environment::new();
    configure(&mut env, theme, target);

    env.add_template_owned("_inline".to_string(), template.to_string())?;
    let tmpl = env.get_template("_inline")?;
    tmpl.render(data)
}

/// Renders a one-off template for `term`, detecting its color support.
pub fn render_terminal<T: Serialize>(
    template: &str,
    data: &T,
    theme: &Theme,
    term: &Term,
) -> Result<String, Error> {
    render(template, data, theme, Target::for_term(term))
}

/// A renderer with pre-registered templates.
///
/// Templates are compiled once when registered and reused on every render.
///
/// ```rust
/// use stencil::{Renderer, Target, Theme};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Link { href: String, text: String }
///
/// let mut renderer = Renderer::new(Theme::new(), Target::Html);
/// renderer.add_template("link", r#"<a href="{{ href }}">{{ text }}</a>"#).unwrap();
///
/// let out = renderer
///     .render("link", &Link { href: "?b=1&c=2".into(), text: "go".into() })
///     .unwrap();
/// assert_eq!(out, r#"<a href="?b=1&amp;c=2">go</a>"#);
/// ```
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new(theme: Theme, target: Target) -> Self {
        let mut env = Environment::new();
        configure(&mut env, &theme, target);
        Self { env }
    }

    /// Registers a named template, compiling it immediately.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), Error> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())
    }

    /// Renders a registered template with the given data.
    ///
    /// # Errors
    ///
    /// Returns an error if the template name is not found or rendering fails.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, Error> {
        let tmpl = self.env.get_template(name)?;
        tmpl.render(data)
    }
}

fn configure(env: &mut Environment<'static>, theme: &Theme, target: Target) {
    match target {
        Target::Html => env.set_auto_escape_callback(|_| AutoEscape::Html),
        Target::Terminal { .. } => env.set_auto_escape_callback(|_| AutoEscape::None),
    }

    let styles = theme.styles.clone();
    env.add_filter("style", move |value: Value, name: String| -> Value {
        let text = value.to_string();
        match target {
            Target::Html => Value::from_safe_string(styles.apply_html(&name, &text)),
            Target::Terminal { color: true } => Value::from(styles.apply(&name, &text)),
            Target::Terminal { color: false } => Value::from(styles.apply_plain(&name, &text)),
        }
    });
}

/// Converts an RGB triplet to the nearest ANSI 256-color palette index.
pub fn rgb_to_ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let red = (r as u16 * 5 / 255) as u8;
        let green = (g as u16 * 5 / 255) as u8;
        let blue = (b as u16 * 5 / 255) as u8;
        16 + 36 * red + 6 * green + blue
    }
}
