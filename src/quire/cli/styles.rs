use console::Style;
use once_cell::sync::Lazy;
use stencil::{rgb_to_ansi256, Theme};

pub static QUIRE_THEME: Lazy<Theme> = Lazy::new(|| {
    Theme::new()
        .add("info", Style::new().dim())
        .add("success", Style::new().green())
        .add("warning", Style::new().yellow())
        .add("error", Style::new().red().bold())
        .add("sheet_title", Style::new().bold().underlined())
        .add("address", Style::new().color256(rgb_to_ansi256((154, 154, 154))))
        .add("label", Style::new().bold())
});
