//! Entity definitions.
//!
//! Entities arrive as JSON documents describing a data model type and its
//! fields. Only the field kinds matter to synthesis: a field of kind
//! [`DataType::Password`] is sensitive and must be hashed before storage.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::diagnostic::SynthError;

/// An entity of the data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Type name, e.g. `Customer`.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Entity {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            fields,
        }
    }

    /// Sensitive fields, in declaration order.
    pub fn sensitive_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| field.is_sensitive())
    }

    pub fn has_sensitive_fields(&self) -> bool {
        self.sensitive_fields().next().is_some()
    }
}

/// A field of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub required: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            required: false,
        }
    }

    /// True if the value must be one-way transformed before it is stored.
    pub fn is_sensitive(&self) -> bool {
        self.data_type == DataType::Password
    }
}

/// Field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    SingleLineText,
    MultiLineText,
    Email,
    WholeNumber,
    DecimalNumber,
    Boolean,
    DateTime,
    Id,
    Lookup,
    OptionSet,
    MultiSelectOptionSet,
    Json,
    Password,
    Username,
    Roles,
    CreatedAt,
    UpdatedAt,
}

/// Reads a single entity definition.
pub fn load_entity(path: &Path) -> Result<Entity, SynthError> {
    let source = std::fs::read_to_string(path).map_err(|e| SynthError::io(path, e.to_string()))?;
    serde_json::from_str(&source).map_err(|e| SynthError::InvalidEntity {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Reads every `*.json` entity definition under `dir`, ordered by file path.
pub fn load_entities(dir: &Path) -> Result<Vec<Entity>, SynthError> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    paths.iter().map(|path| load_entity(path)).collect()
}
