use clap::Parser;
use directories::ProjectDirs;
use quire::config::QuireConfig;
use quire::error::{QuireError, Result};
use quire::field::{Field, FieldBearer, FieldType};
use quire::filter::{Condition, Filter, FilterChain, FilterKind, FilterStatement};
use quire::page::{Page, PageType, RenderOutput};
use quire::query::memory::{InMemoryQuery, Record};
use quire::query::Object;
use quire::request::RequestContext;
use quire::row::Row;
use quire::table::Table;
use quire::value::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod args;
mod cli;

use args::{Cli, Commands, RenderArgs};
use cli::{print_message, render_workbook, MessageLevel};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        print_message(MessageLevel::Error, &format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("QUIRE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_dir = resolve_config_dir(cli.config_dir)?;
    let config = QuireConfig::load(&config_dir)?;
    debug!(config_dir = %config_dir.display(), "configuration loaded");

    match cli.command {
        Commands::Render(args) => handle_render(&config, args),
        Commands::Config { save } => handle_config(&config, &config_dir, save),
    }
}

fn resolve_config_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    ProjectDirs::from("com", "quire", "quire")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| QuireError::Config("could not determine a config directory".to_string()))
}

fn handle_render(config: &QuireConfig, args: RenderArgs) -> Result<()> {
    let json = fs::read_to_string(&args.data)?;
    let query = InMemoryQuery::from_json(&json)?;
    let chain = build_chain(config, &args)?;

    let table = Table::from_query("records", query, chain, |record: &Record| {
        record_row(record, &args.columns)
    })?;

    let page_type = args
        .page_type
        .as_deref()
        .map(PageType::parse)
        .unwrap_or(config.default_page_type);
    let title = args.title.clone().unwrap_or_else(|| file_title(&args.data));
    let mut page = Page::new("quire")
        .with_type(page_type)
        .with_title(title)
        .with_writable(table);

    match page.render(&RequestContext::get(), config)? {
        RenderOutput::Html(html) => emit(args.out.as_deref(), &html),
        RenderOutput::Pdf {
            document_name,
            html,
        } => {
            emit(args.out.as_deref(), &html)?;
            print_message(
                MessageLevel::Info,
                &format!("PDF document name: {}", document_name),
            );
            Ok(())
        }
        RenderOutput::Excel { filename, workbook } => {
            match args.out.as_deref() {
                Some(path) => emit(Some(path), &serde_json::to_string_pretty(&workbook)?)?,
                None => print!("{}", render_workbook(&workbook)),
            }
            print_message(
                MessageLevel::Info,
                &format!("Spreadsheet file name: {}", filename),
            );
            Ok(())
        }
    }
}

fn handle_config(config: &QuireConfig, config_dir: &Path, save: bool) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    if save {
        config.save(config_dir)?;
        print_message(
            MessageLevel::Success,
            &format!("Saved configuration to {}", config_dir.display()),
        );
    }
    Ok(())
}

/// Head first: pagination, then sorting, then selection, so selection
/// reaches the query first.
fn build_chain(config: &QuireConfig, args: &RenderArgs) -> Result<FilterChain> {
    let mut stages = Vec::new();

    if args.page.is_some() || args.page_size.is_some() {
        let size = args.page_size.unwrap_or(config.default_page_size);
        if size == 0 {
            return Err(QuireError::Argument("--page-size must be at least 1".to_string()));
        }
        stages.push(Filter::pagination("page", size, args.page.unwrap_or(1)));
    }

    if let Some(column) = &args.sort {
        let statement = if args.desc {
            FilterStatement::sort_desc(column.as_str())
        } else {
            FilterStatement::sort_asc(column.as_str())
        };
        stages.push(Filter::sort("sort", statement));
    }

    let mut select = Filter::new("select", FilterKind::Select);
    for raw in &args.equals {
        let (column, value) = parse_pair(raw)?;
        select = select.with_statement(FilterStatement::compare(
            column,
            Condition::EqualTo,
            parse_value(value),
        ));
    }
    let mut search = Filter::new("search", FilterKind::Search);
    for raw in &args.contains {
        let (column, value) = parse_pair(raw)?;
        search = search.with_statement(FilterStatement::compare(column, Condition::Contains, value));
    }
    stages.extend(
        [select, search]
            .into_iter()
            .filter(|stage| !stage.statements().is_empty()),
    );

    Ok(stages
        .into_iter()
        .fold(FilterChain::sentinel(), |chain, stage| {
            chain.combine(stage.into())
        }))
}

/// Numbers and booleans compare as such; everything else as text.
fn parse_value(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        Value::Int(i)
    } else if let Ok(x) = raw.parse::<f64>() {
        Value::Float(x)
    } else if let Ok(b) = raw.parse::<bool>() {
        Value::Bool(b)
    } else {
        Value::from(raw)
    }
}

fn parse_pair(raw: &str) -> Result<(&str, &str)> {
    raw.split_once('=')
        .filter(|(column, _)| !column.is_empty())
        .ok_or_else(|| QuireError::Argument(format!("expected COL=VALUE, got '{}'", raw)))
}

/// One literal field per requested column, or per record column when none
/// were requested.
fn record_row(record: &Record, columns: &[String]) -> Row {
    if columns.is_empty() {
        return Row::from_object(record);
    }
    let fields = columns
        .iter()
        .map(|column| {
            Field::new(column.as_str(), column.as_str(), FieldType::Literal)
                .with_initial(record.get(column).unwrap_or_default())
        })
        .collect();
    Row::new(FieldBearer::new(fields))
}

fn file_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn emit(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, content)?;
            print_message(
                MessageLevel::Success,
                &format!("Wrote {}", path.display()),
            );
        }
        None => println!("{}", content),
    }
    Ok(())
}
