//! Book entity

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::index::IndexKey;
use crate::store::{Entity, StoreConfig};

/// Name of the `(year, price)` compound index in `Book::store_config`
pub const YEAR_PRICE_INDEX: &str = "year_price";

/// An immutable book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    title: String,
    author: String,
    isbn: String,
    publisher: String,
    year: i32,
    price: f64,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        publisher: impl Into<String>,
        year: i32,
        price: f64,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            publisher: publisher.into(),
            year,
            price,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Secondary indexes on author, year and price; compound index on (year, price)
    pub fn store_config() -> StoreConfig {
        StoreConfig::new("books")
            .with_secondary("author")
            .with_secondary("year")
            .with_secondary("price")
            .with_compound(YEAR_PRICE_INDEX, "year", "price")
    }
}

impl Entity for Book {
    fn attribute(&self, name: &str) -> Option<IndexKey> {
        match name {
            "title" => Some(IndexKey::from_string(&self.title)),
            "author" => Some(IndexKey::from_string(&self.author)),
            "isbn" => Some(IndexKey::from_string(&self.isbn)),
            "publisher" => Some(IndexKey::from_string(&self.publisher)),
            "year" => Some(IndexKey::from(self.year)),
            "price" => Some(IndexKey::from_float(self.price)),
            _ => None,
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} by {} published in {} is ${:.2}",
            self.isbn, self.title, self.author, self.year, self.price
        )
    }
}
