use crate::condition::{Catalog, Column, OperatorCatalog};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Column and operator catalogs offered to the condition editor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Free-form label for the loaded profile.
    pub profile_name: String,
    pub operators: OperatorCatalog,
    pub columns: Vec<Column>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            profile_name: "discover".to_string(),
            operators: OperatorCatalog::default(),
            columns: vec![
                Column::string("id"),
                Column::number("issue.id"),
                Column::number("project.id"),
                Column::string("project.name"),
                Column::string("platform"),
                Column::string("message"),
                Column::string("environment"),
                Column::string("release"),
                Column::string("user.email"),
                Column::string("sdk.name"),
                Column::number("retention_days"),
            ],
        }
    }
}

impl EditorConfig {
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.columns.clone(), self.operators.clone())
    }

    /// Reject catalogs the codec cannot resolve unambiguously
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.name.trim().is_empty() {
                return Err(ConfigError::Invalid("column with empty name".to_string()));
            }
            if column.name.contains(char::is_whitespace) {
                return Err(ConfigError::Invalid(format!(
                    "column name '{}' contains whitespace",
                    column.name
                )));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate column '{}'",
                    column.name
                )));
            }
        }
        if self.operators.is_empty() {
            return Err(ConfigError::Invalid("operator list is empty".to_string()));
        }
        Ok(())
    }
}

pub fn load_config(path: Option<&Path>) -> Result<EditorConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<EditorConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    let config = toml::from_str::<EditorConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })?;
    config.validate()?;
    tracing::debug!(
        profile = %config.profile_name,
        columns = config.columns.len(),
        operators = config.operators.len(),
        "config loaded"
    );
    Ok(config)
}

pub fn default_config() -> &'static EditorConfig {
    static DEFAULT_CONFIG: LazyLock<EditorConfig> = LazyLock::new(EditorConfig::default);
    &DEFAULT_CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ColumnType;

    #[test]
    fn test_default_config_is_valid() {
        let config = default_config();
        config.validate().unwrap();
        assert_eq!(config.operators.len(), 10);
        assert_eq!(
            config.catalog().column_type("issue.id"),
            Some(ColumnType::Number)
        );
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let mut config = EditorConfig::default();
        config.columns.push(Column::string("message"));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
