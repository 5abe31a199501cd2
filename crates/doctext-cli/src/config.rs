//! `.doctext.toml` configuration
//!
//! Files are looked up in the user home directory and the current directory.
//! Precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Project config (`./.doctext.toml`)
//! 3. User config (`~/.doctext.toml`)
//! 4. Built-in defaults
//!
//! `--config <PATH>` replaces discovery with a single file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".doctext.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Defaults for the extract command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract: Option<ExtractConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Default OCR enablement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr: Option<bool>,

    /// Default PDF size threshold in megabytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pdf_size_mb: Option<f64>,

    /// Extract from an in-memory buffer by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer: Option<bool>,
}

impl ExtractConfig {
    /// Fields set in `over` win; the rest come from `self`
    fn overlay(self, over: Self) -> Self {
        Self {
            ocr: over.ocr.or(self.ocr),
            max_pdf_size_mb: over.max_pdf_size_mb.or(self.max_pdf_size_mb),
            buffer: over.buffer.or(self.buffer),
        }
    }
}

impl Config {
    /// Load an explicit config file, or discover and merge the defaults
    ///
    /// # Errors
    /// Fails only if an explicitly requested file cannot be loaded.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        let user = dirs::home_dir()
            .and_then(|home| Self::load_optional(&home.join(CONFIG_FILE_NAME)));
        let project = Self::load_optional(&PathBuf::from(CONFIG_FILE_NAME));
        Ok(Self::merge(user, project))
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Discovered files are optional; a broken one is reported and skipped
    fn load_optional(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => {
                log::debug!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                log::warn!("Ignoring config file {}: {e:#}", path.display());
                None
            }
        }
    }

    /// CLI args > project config > user config > defaults
    fn merge(user: Option<Self>, project: Option<Self>) -> Self {
        let layers = [user, project];
        let extract = layers
            .into_iter()
            .flatten()
            .filter_map(|config| config.extract)
            .reduce(ExtractConfig::overlay);
        Self { extract }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_extract_table() {
        let config = Config::parse(
            r"
[extract]
ocr = false
max_pdf_size_mb = 12.5
",
        )
        .unwrap();
        let extract = config.extract.unwrap();
        assert_eq!(extract.ocr, Some(false));
        assert_eq!(extract.max_pdf_size_mb, Some(12.5));
        assert_eq!(extract.buffer, None);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_rejects_wrong_type() {
        assert!(Config::parse("[extract]\nocr = \"yes\"").is_err());
    }

    #[test]
    fn test_project_overrides_user_per_field() {
        let user = Config {
            extract: Some(ExtractConfig {
                ocr: Some(true),
                max_pdf_size_mb: Some(20.0),
                buffer: None,
            }),
        };
        let project = Config {
            extract: Some(ExtractConfig {
                ocr: Some(false),
                max_pdf_size_mb: None,
                buffer: Some(true),
            }),
        };

        let merged = Config::merge(Some(user), Some(project)).extract.unwrap();
        assert_eq!(merged.ocr, Some(false));
        assert_eq!(merged.max_pdf_size_mb, Some(20.0));
        assert_eq!(merged.buffer, Some(true));
    }

    #[test]
    fn test_merge_nothing() {
        assert_eq!(Config::merge(None, None), Config::default());
    }

    #[test]
    fn test_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[extract]\nbuffer = true").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.extract.unwrap().buffer, Some(true));
    }

    #[test]
    fn test_broken_discovered_file_is_skipped() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[extract\nocr = true").unwrap();

        assert_eq!(Config::load_optional(file.path()), None);
        assert_eq!(
            Config::merge(Config::load_optional(file.path()), None),
            Config::default()
        );
    }

    #[test]
    fn test_missing_discovered_file_is_skipped() {
        assert_eq!(
            Config::load_optional(Path::new("/nonexistent/.doctext.toml")),
            None
        );
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/.doctext.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
