use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::books::domain::model::BookEntity;
use crate::core::domain::Identifiable;
use crate::core::query::Catalogued;

// BookDto is the wire shape of a book, field names follow the storefront client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookDto {
    #[serde(rename = "bookID")]
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub category: String,
    pub isbn: String,
    pub page_count: u32,
    pub price: f64,
}

impl BookDto {
    pub fn new(title: &str, author: &str, publisher: &str, category: &str,
               isbn: &str, page_count: u32, price: f64) -> BookDto {
        BookDto::from(&BookEntity::new(title, author, publisher, category, isbn, page_count, price))
    }
}

impl Identifiable for BookDto {
    fn id(&self) -> i64 {
        self.book_id
    }
}

impl Catalogued for BookDto {
    fn title(&self) -> &str {
        self.title.as_str()
    }

    fn category(&self) -> &str {
        self.category.as_str()
    }
}

impl Book for BookDto {
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

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            book_id: other.book_id,
            title: other.title.to_string(),
            author: other.author.to_string(),
            publisher: other.publisher.to_string(),
            category: other.category.to_string(),
            isbn: other.isbn.to_string(),
            page_count: other.page_count,
            price: other.price,
        }
    }
}

impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        Self {
            book_id: other.book_id,
            title: other.title.to_string(),
            author: other.author.to_string(),
            publisher: other.publisher.to_string(),
            category: other.category.to_string(),
            isbn: other.isbn.to_string(),
            page_count: other.page_count,
            price: other.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::BookEntity;
    use crate::books::dto::BookDto;

    #[tokio::test]
    async fn test_should_build_books() {
        let book = BookDto::new("Emma", "Jane Austen", "Penguin", "Fiction", "isbn", 474, 9.99);
        assert_eq!("isbn", book.isbn.as_str());
        assert_eq!("Emma", book.title.as_str());
        assert_eq!(BookDto::from(&BookEntity::from(&book)), book);
    }

    #[tokio::test]
    async fn test_should_serialize_client_field_names() {
        let book = BookDto::new("Emma", "Jane Austen", "Penguin", "Fiction", "isbn", 474, 9.99);
        let json = serde_json::to_value(&book).expect("should serialize");
        assert_eq!(0, json["bookID"]);
        assert_eq!("Emma", json["title"]);
        assert_eq!(474, json["pageCount"]);
        assert_eq!("isbn", json["isbn"]);
        assert!(json.get("book_id").is_none());
    }
}
