use crate::error::{QuireError, Result};
use crate::page::PageType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "quire.json";
const DEFAULT_PAGE_SIZE: usize = 10;

/// Rendering and validation settings, stored in `quire.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuireConfig {
    /// Page type used when a page is built without an explicit one
    #[serde(default)]
    pub default_page_type: PageType,

    /// Rows per page for pagination filters built without an explicit size
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Name given to PDF documents whose page has no title
    #[serde(default = "default_document_name")]
    pub document_fallback_name: String,

    /// Cell text written to a spreadsheet for a table without rows
    #[serde(default = "default_no_records_message")]
    pub no_records_message: String,

    /// The single error a form receives when any of its fields is invalid
    #[serde(default = "default_form_error_message")]
    pub form_error_message: String,

    /// Error attached to a required field left blank
    #[serde(default = "default_required_message")]
    pub required_message: String,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_document_name() -> String {
    "document".to_string()
}

fn default_no_records_message() -> String {
    "No records found".to_string()
}

fn default_form_error_message() -> String {
    "Please correct the indicated errors and resubmit the form.".to_string()
}

fn default_required_message() -> String {
    "This field is required.".to_string()
}

impl Default for QuireConfig {
    fn default() -> Self {
        Self {
            default_page_type: PageType::default(),
            default_page_size: DEFAULT_PAGE_SIZE,
            document_fallback_name: default_document_name(),
            no_records_message: default_no_records_message(),
            form_error_message: default_form_error_message(),
            required_message: default_required_message(),
        }
    }
}

impl QuireConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: QuireConfig = serde_json::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    fn check(&self) -> Result<()> {
        if self.default_page_size == 0 {
            return Err(QuireError::Config(
                "default_page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuireConfig::default();
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.default_page_type, PageType::FullHeader);
        assert_eq!(config.document_fallback_name, "document");
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = QuireConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config, QuireConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();

        let config = QuireConfig {
            default_page_type: PageType::Pdf,
            default_page_size: 25,
            ..QuireConfig::default()
        };
        config.save(temp_dir.path()).unwrap();

        let loaded = QuireConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            r#"{"default_page_type": "excel"}"#,
        )
        .unwrap();

        let loaded = QuireConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.default_page_type, PageType::Excel);
        assert_eq!(loaded.default_page_size, 10);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            r#"{"default_page_size": 0}"#,
        )
        .unwrap();

        assert!(matches!(
            QuireConfig::load(temp_dir.path()),
            Err(QuireError::Config(_))
        ));
    }
}
