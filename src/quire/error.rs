use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuireError {
    #[error("No tables found in writables.")]
    NoTables,

    #[error("Template error: {0}")]
    Template(#[from] stencil::TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    Argument(String),
}

pub type Result<T> = std::result::Result<T, QuireError>;
