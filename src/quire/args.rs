use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(about = "Render JSON records as filtered HTML, PDF or spreadsheet pages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding quire.json (defaults to the user config directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a JSON array of records as a page
    #[command(alias = "r")]
    Render(RenderArgs),

    /// Print the effective configuration
    Config {
        /// Write the effective configuration to the config directory
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// JSON file holding an array of flat objects
    pub data: PathBuf,

    /// Page title (defaults to the data file name)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Page type: full-header, mini-header, ajax-page, pdf, excel, ...
    #[arg(long = "type", value_name = "TYPE")]
    pub page_type: Option<String>,

    /// Columns to show, in order (e.g. name,office)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Column to sort by
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Keep rows whose column equals a value (repeatable)
    #[arg(long = "where", value_name = "COL=VALUE")]
    pub equals: Vec<String>,

    /// Keep rows whose column contains a value, ignoring case (repeatable)
    #[arg(long, value_name = "COL=VALUE")]
    pub contains: Vec<String>,

    /// Page of results to show, starting at 1
    #[arg(long)]
    pub page: Option<usize>,

    /// Rows per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}
