use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use thiserror::Error;
use validator::Validate;

use crate::schema_map::ColumnMapping;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Table and alias names used when assembling SQL commands.
///
/// The defaults match the product catalog schema; deployments with a
/// different physical layout override them through the environment or a
/// YAML file alongside the column mapping.
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct SqlTableConfig {
    /// Entity (product) table name
    #[validate(length(min = 1, message = "Entity table cannot be empty"))]
    pub entity_table: String,

    /// Alias of the entity table in generated SQL
    #[validate(length(min = 1, message = "Entity alias cannot be empty"))]
    pub entity_alias: String,

    /// Product file table joined for file-level fields
    #[validate(length(min = 1, message = "File table cannot be empty"))]
    pub file_table: String,

    /// Alias of the product file table
    #[validate(length(min = 1, message = "File alias cannot be empty"))]
    pub file_alias: String,

    /// Foreign key column joining the file table to its entity
    #[validate(length(min = 1, message = "File FK column cannot be empty"))]
    pub file_fk_column: String,

    /// Table holding the dynamic attribute collection
    #[validate(length(min = 1, message = "Attribute table cannot be empty"))]
    pub attribute_table: String,

    /// Foreign key column linking attributes to their entity
    #[validate(length(min = 1, message = "Attribute FK column cannot be empty"))]
    pub attribute_fk_column: String,

    /// Column holding the attribute name
    #[validate(length(min = 1, message = "Attribute name column cannot be empty"))]
    pub attribute_name_column: String,

    /// Column holding the attribute value
    #[validate(length(min = 1, message = "Attribute value column cannot be empty"))]
    pub attribute_value_column: String,
}

impl Default for SqlTableConfig {
    fn default() -> Self {
        Self {
            entity_table: "product".to_string(),
            entity_alias: "p".to_string(),
            file_table: "product_file".to_string(),
            file_alias: "ppf".to_string(),
            file_fk_column: "product_id".to_string(),
            attribute_table: "product_parameter".to_string(),
            attribute_fk_column: "product_id".to_string(),
            attribute_name_column: "parameter_name".to_string(),
            attribute_value_column: "parameter_value".to_string(),
        }
    }
}

impl SqlTableConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            entity_table: env_or("ODASQL_ENTITY_TABLE", &defaults.entity_table),
            entity_alias: env_or("ODASQL_ENTITY_ALIAS", &defaults.entity_alias),
            file_table: env_or("ODASQL_FILE_TABLE", &defaults.file_table),
            file_alias: env_or("ODASQL_FILE_ALIAS", &defaults.file_alias),
            file_fk_column: env_or("ODASQL_FILE_FK", &defaults.file_fk_column),
            attribute_table: env_or("ODASQL_ATTRIBUTE_TABLE", &defaults.attribute_table),
            attribute_fk_column: env_or("ODASQL_ATTRIBUTE_FK", &defaults.attribute_fk_column),
            attribute_name_column: env_or(
                "ODASQL_ATTRIBUTE_NAME_COLUMN",
                &defaults.attribute_name_column,
            ),
            attribute_value_column: env_or(
                "ODASQL_ATTRIBUTE_VALUE_COLUMN",
                &defaults.attribute_value_column,
            ),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// On-disk shape of a column mapping override.
///
/// ```yaml
/// fields:
///   Name: ppf.product_file_name
///   ContentType: null     # known field, no backing column
/// ```
#[derive(Debug, Serialize, Deserialize)]
struct MappingDocument {
    fields: HashMap<String, Option<String>>,
}

/// Load a column mapping override from a YAML file. Deployments use this
/// to replace the built-in product mapping without a code change.
pub fn column_mapping_from_yaml<P: AsRef<std::path::Path>>(
    path: P,
) -> Result<ColumnMapping, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
        field: "mapping_file".to_string(),
        value: "file read failed".to_string(),
        source: Box::new(e),
    })?;

    let document: MappingDocument =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "mapping_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

    Ok(ColumnMapping::from_entries(document.fields))
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
