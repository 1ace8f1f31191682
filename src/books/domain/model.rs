use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::query::Catalogued;

// BookEntity abstracts a book record in the catalog store. The identifier is assigned
// by the store when the record is created, an entity that was never stored carries 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookEntity {
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub category: String,
    pub isbn: String,
    pub page_count: u32,
    pub price: f64,
}

impl BookEntity {
    pub fn new(title: &str, author: &str, publisher: &str, category: &str,
               isbn: &str, page_count: u32, price: f64) -> Self {
        Self {
            book_id: 0,
            title: title.to_string(),
            author: author.to_string(),
            publisher: publisher.to_string(),
            category: category.to_string(),
            isbn: isbn.to_string(),
            page_count,
            price,
        }
    }

    pub fn with_id(mut self, book_id: i64) -> Self {
        self.book_id = book_id;
        self
    }

    // all text fields are required and price must be a finite non-negative amount
    pub fn validate(&self) -> LibraryResult<()> {
        let required = [
            ("title", &self.title),
            ("author", &self.author),
            ("publisher", &self.publisher),
            ("category", &self.category),
            ("isbn", &self.isbn),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(LibraryError::validation(
                    format!("{} is required", name).as_str(), Some("MissingField".to_string())));
            }
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(LibraryError::validation(
                format!("price must be a non-negative amount but was {}", self.price).as_str(),
                Some("InvalidPrice".to_string())));
        }
        Ok(())
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> i64 {
        self.book_id
    }
}

impl Catalogued for BookEntity {
    fn title(&self) -> &str {
        self.title.as_str()
    }

    fn category(&self) -> &str {
        self.category.as_str()
    }
}

impl Book for BookEntity {
    fn author(&self) -> &str {
        self.author.as_str()
    }

    fn isbn(&self) -> &str {
        self.isbn.as_str()
    }

    fn price(&self) -> f64 {
        self.price
    }
}
