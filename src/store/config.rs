//! Store configuration
//!
//! Declares which attributes get a secondary index and which attribute
//! pairs get a compound index. Loaded from JSON or built in code, and
//! validated before any store is constructed.
//!
//! ```json
//! {
//!   "name": "books",
//!   "secondary": ["author", "year", "price"],
//!   "compound": [{ "name": "year_price", "first": "year", "second": "price" }]
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::index::{IndexError, IndexResult};

/// A compound index over `(first, second)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundDefinition {
    /// Name used by queries to address this index
    pub name: String,
    /// Equality attribute
    pub first: String,
    /// Range attribute
    pub second: String,
}

impl CompoundDefinition {
    pub fn new(name: impl Into<String>, first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            first: first.into(),
            second: second.into(),
        }
    }
}

/// Index layout for one store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store name, used in logs
    pub name: String,
    /// Attributes with a secondary index
    #[serde(default)]
    pub secondary: Vec<String>,
    /// Compound indexes
    #[serde(default)]
    pub compound: Vec<CompoundDefinition>,
}

impl StoreConfig {
    /// Config with no indexes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secondary: Vec::new(),
            compound: Vec::new(),
        }
    }

    /// Add a secondary index on `attribute`
    pub fn with_secondary(mut self, attribute: impl Into<String>) -> Self {
        self.secondary.push(attribute.into());
        self
    }

    /// Add a compound index
    pub fn with_compound(
        mut self,
        name: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        self.compound.push(CompoundDefinition::new(name, first, second));
        self
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> IndexResult<Self> {
        let config: StoreConfig = serde_json::from_str(json)
            .map_err(|e| IndexError::config_invalid(format!("malformed config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> IndexResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| IndexError::config_invalid(format!("cannot serialize config: {}", e)))
    }

    /// Reject empty names and duplicate definitions.
    pub fn validate(&self) -> IndexResult<()> {
        if self.name.trim().is_empty() {
            return Err(IndexError::config_invalid("store name is empty"));
        }

        let mut seen = HashSet::new();
        for attribute in &self.secondary {
            if attribute.trim().is_empty() {
                return Err(IndexError::config_invalid("secondary attribute name is empty"));
            }
            if !seen.insert(attribute.as_str()) {
                return Err(IndexError::config_invalid(format!(
                    "duplicate secondary index on '{}'",
                    attribute
                )));
            }
        }

        let mut names = HashSet::new();
        for def in &self.compound {
            if def.name.trim().is_empty() || def.first.trim().is_empty() || def.second.trim().is_empty() {
                return Err(IndexError::config_invalid("compound index has an empty name or attribute"));
            }
            if def.first == def.second {
                return Err(IndexError::config_invalid(format!(
                    "compound index '{}' uses '{}' twice",
                    def.name, def.first
                )));
            }
            if !names.insert(def.name.as_str()) {
                return Err(IndexError::config_invalid(format!(
                    "duplicate compound index '{}'",
                    def.name
                )));
            }
        }

        Ok(())
    }

    /// Every attribute an entity must expose to be inserted
    pub fn indexed_attributes(&self) -> Vec<&str> {
        let mut attributes: Vec<&str> = self.secondary.iter().map(String::as_str).collect();
        for def in &self.compound {
            attributes.push(&def.first);
            attributes.push(&def.second);
        }
        attributes.sort_unstable();
        attributes.dedup();
        attributes
    }
}
