use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct UpdateBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl UpdateBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

// the book id comes from the request path, any id in the body is ignored
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateBookCommandRequest {
    #[serde(skip)]
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub category: String,
    pub isbn: String,
    #[serde(default)]
    pub page_count: u32,
    pub price: f64,
}

impl UpdateBookCommandRequest {
    pub fn new(book_id: i64, title: &str, author: &str, publisher: &str, category: &str,
               isbn: &str, page_count: u32, price: f64) -> Self {
        Self {
            book_id,
            title: title.to_string(),
            author: author.to_string(),
            publisher: publisher.to_string(),
            category: category.to_string(),
            isbn: isbn.to_string(),
            page_count,
            price,
        }
    }

    pub fn build_book(&self) -> BookDto {
        let mut book = BookDto::new(self.title.as_str(), self.author.as_str(), self.publisher.as_str(),
                                    self.category.as_str(), self.isbn.as_str(), self.page_count, self.price);
        book.book_id = self.book_id;
        book
    }
}


#[derive(Debug, Serialize)]
#[serde(transparent)]
pub(crate) struct UpdateBookCommandResponse {
    pub book: BookDto,
}

impl UpdateBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<UpdateBookCommandRequest, UpdateBookCommandResponse> for UpdateBookCommand {
    async fn execute(&self, req: UpdateBookCommandRequest) -> Result<UpdateBookCommandResponse, CommandError> {
        let book = req.build_book();
        self.catalog_service.update_book(req.book_id, &book).await
            .map_err(CommandError::from).map(UpdateBookCommandResponse::new)
    }
}
