//! Named use-case queries over owned stores
//!
//! Each repository owns its `IndexedStore`; create as many independent
//! repositories as needed.

use crate::index::{IndexKey, IndexResult};
use crate::store::{IndexedStore, StoreSnapshot};
use crate::store::SnapshotResult;

use super::book::{Book, YEAR_PRICE_INDEX};
use super::person::Person;

/// Book catalogue keyed by numeric id
#[derive(Debug)]
pub struct BookRepository {
    store: IndexedStore<u64, Book>,
}

impl BookRepository {
    /// Create an empty repository with the book index layout
    pub fn new() -> IndexResult<Self> {
        Ok(Self {
            store: IndexedStore::new(Book::store_config())?,
        })
    }

    /// Rebuild a repository from a snapshot of its primary store
    pub fn restore(snapshot: StoreSnapshot<u64, Book>) -> SnapshotResult<Self> {
        Ok(Self {
            store: IndexedStore::restore(Book::store_config(), snapshot)?,
        })
    }

    pub fn store(&self) -> &IndexedStore<u64, Book> {
        &self.store
    }

    pub fn size(&self) -> usize {
        self.store.size()
    }

    pub fn get(&self, id: u64) -> Option<Book> {
        self.store.get(&id)
    }

    /// Add or replace the book stored under `id`
    pub fn add(&self, id: u64, book: Book) -> IndexResult<()> {
        self.store.insert(id, book)
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    /// `author = author`
    pub fn by_author(&self, author: &str) -> Vec<Book> {
        self.store.query().equals("author", author)
    }

    /// `year = year`
    pub fn by_year(&self, year: i32) -> Vec<Book> {
        self.store.query().equals("year", year)
    }

    /// Books published between `start` and `end`, inclusivity per bound
    pub fn by_year_between(&self, start: i32, start_inclusive: bool, end: i32, end_inclusive: bool) -> Vec<Book> {
        self.store
            .query()
            .range("year", start, start_inclusive, end, end_inclusive)
    }

    /// Books published in or after (`inclusive`) / after `start`
    pub fn by_year_from(&self, start: i32, inclusive: bool) -> Vec<Book> {
        self.store.query().tail_from("year", start, inclusive)
    }

    /// Books priced at or above (`inclusive`) / above `start`
    pub fn by_price_from(&self, start: f64, inclusive: bool) -> Vec<Book> {
        self.store.query().tail_from("price", start, inclusive)
    }

    /// Books from `year` priced at or above `start_price`, ordered by price.
    ///
    /// Served by the `(year, price)` compound index: two books sharing both
    /// year and price collapse to the most recently added one.
    pub fn by_year_and_price(&self, year: i32, start_price: f64, inclusive: bool) -> Vec<Book> {
        self.store
            .query()
            .compound(YEAR_PRICE_INDEX, year, start_price, inclusive)
    }
}

/// People keyed by generated UUID
#[derive(Debug)]
pub struct PersonRepository {
    store: IndexedStore<String, Person>,
}

impl PersonRepository {
    pub fn new() -> IndexResult<Self> {
        Ok(Self {
            store: IndexedStore::new(Person::store_config())?,
        })
    }

    pub fn store(&self) -> &IndexedStore<String, Person> {
        &self.store
    }

    pub fn size(&self) -> usize {
        self.store.size()
    }

    /// Store `person` under a fresh UUID and return it
    pub fn add(&self, person: Person) -> IndexResult<String> {
        self.store.insert_generated(person)
    }

    pub fn get(&self, id: &str) -> Option<Person> {
        self.store.get(&id.to_string())
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn by_first_name(&self, first_name: &str) -> Vec<Person> {
        self.store.query().equals("first_name", first_name)
    }

    /// First names in `[lower, upper)`
    pub fn by_first_name_between(&self, lower: &str, upper: &str) -> Vec<Person> {
        self.store.query().range("first_name", lower, true, upper, false)
    }

    pub fn by_gender(&self, is_male: bool) -> Vec<Person> {
        self.store.query().equals("is_male", IndexKey::from_bool(is_male))
    }

    /// People whose id falls in `[lower, upper)`
    pub fn by_id_range(&self, lower: &str, upper: &str) -> Vec<Person> {
        self.store
            .query()
            .range_by_id(&lower.to_string(), &upper.to_string())
    }
}
