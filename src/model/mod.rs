//! Domain entities and their repositories
//!
//! `Book` and `Person` carry their own index layouts; the repositories expose
//! the named queries each use case needs on top of `IndexedStore`.

mod book;
mod person;
mod repository;

pub use book::{Book, YEAR_PRICE_INDEX};
pub use person::Person;
pub use repository::{BookRepository, PersonRepository};
