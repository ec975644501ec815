//! Settings manager for loading, saving, and atomic section updates.
//!
//! Writes go to a temp file first and are renamed into place. Section
//! updates only touch the named table, preserving comments and formatting
//! elsewhere in the file via toml_edit.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use toml_edit::{DocumentMut, Item};

use super::settings::Settings;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings file: {0}")]
    Read(#[from] io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to parse settings for editing: {0}")]
    EditParse(#[from] toml_edit::TomlError),

    #[error("settings file not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// Result type for settings operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Manages the application settings file.
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Create a manager for the given settings file path.
    ///
    /// Does not load anything; call `load()` or `load_or_create()` after.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// In-memory only until `save()` or `update_section()` is called.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Load settings from file. Errors if the file doesn't exist.
    pub fn load(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }
        let content = fs::read_to_string(&self.config_path)?;
        self.settings = toml::from_str(&content)?;
        Ok(())
    }

    /// Load settings, creating the file with defaults if it doesn't exist.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if self.config_path.exists() {
            self.load()
        } else {
            if let Some(parent) = self.config_path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            self.settings = Settings::default();
            self.save()
        }
    }

    /// Save the entire settings file atomically.
    pub fn save(&self) -> ConfigResult<()> {
        let content = toml::to_string_pretty(&self.settings)?;
        self.atomic_write(&content)
    }

    /// Update one section atomically, leaving the rest of the file as-is.
    ///
    /// Re-reads the file from disk so unknown tables and comments survive.
    pub fn update_section<T: Serialize>(&self, name: &str, section: &T) -> ConfigResult<()> {
        let current = if self.config_path.exists() {
            fs::read_to_string(&self.config_path)?
        } else {
            String::new()
        };

        let mut doc: DocumentMut = current.parse()?;

        let section_toml = toml::to_string_pretty(section)?;
        let section_doc: DocumentMut = section_toml.parse()?;
        doc[name] = Item::Table(section_doc.as_table().clone());

        self.atomic_write(&doc.to_string())
    }

    fn atomic_write(&self, content: &str) -> ConfigResult<()> {
        let tmp_path = self.config_path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.config_path)?;
        Ok(())
    }
}
