//! Person entity

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::index::IndexKey;
use crate::store::{Entity, StoreConfig};

/// An immutable person record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    first_name: String,
    last_name: String,
    age: u32,
    is_male: bool,
    city: String,
}

impl Person {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        age: u32,
        is_male: bool,
        city: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
            is_male,
            city: city.into(),
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn is_male(&self) -> bool {
        self.is_male
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Secondary indexes on first name and gender
    pub fn store_config() -> StoreConfig {
        StoreConfig::new("people")
            .with_secondary("first_name")
            .with_secondary("is_male")
    }
}

impl Entity for Person {
    fn attribute(&self, name: &str) -> Option<IndexKey> {
        match name {
            "first_name" => Some(IndexKey::from_string(&self.first_name)),
            "last_name" => Some(IndexKey::from_string(&self.last_name)),
            "age" => Some(IndexKey::from(self.age)),
            "is_male" => Some(IndexKey::from_bool(self.is_male)),
            "city" => Some(IndexKey::from_string(&self.city)),
            _ => None,
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gender = if self.is_male { "male" } else { "female" };
        write!(
            f,
            "{} {} is a {} year old {} from {}",
            self.first_name, self.last_name, self.age, gender, self.city
        )
    }
}
