//! Saving and loading tree documents.
//!
//! A saved tree is a recursive JSON document, indented by two spaces:
//!
//! ```json
//! {
//!   "packages": [],
//!   "children": [
//!     { "packages": ["numpy"], "children": [], "split_generation": 1 }
//!   ],
//!   "split_generation": 0
//! }
//! ```
//!
//! The document is the tree's only output artifact; calls and costs are not
//! persisted.

mod convert;
mod schema;

use std::fs;
use std::path::Path;

pub use schema::{TreeDocument, TreeInput};

use crate::error::PersistError;
use crate::tree::ImportTree;

impl TreeDocument {
    /// Serialize as indented JSON.
    pub fn to_json_string(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write to `path` as indented JSON, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        let json = self.to_json_string()?;
        fs::write(path, json).map_err(|e| PersistError::io(path, e))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| PersistError::io(path, e))?;
        Self::from_json_str(&json)
    }
}

impl TreeInput {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| PersistError::io(path, e))?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl ImportTree {
    /// Save the tree structure to `path` as an indented JSON document.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        self.to_document().save(path)
    }
}
