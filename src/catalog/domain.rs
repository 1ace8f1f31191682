pub mod service;

use async_trait::async_trait;
use crate::books::dto::BookDto;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::query::CatalogQuery;

#[async_trait]
pub(crate) trait CatalogService: Sync + Send {
    async fn add_book(&self, book: &BookDto) -> LibraryResult<BookDto>;
    async fn remove_book(&self, id: i64) -> LibraryResult<()>;
    async fn update_book(&self, id: i64, book: &BookDto) -> LibraryResult<BookDto>;
    async fn find_book_by_id(&self, id: i64) -> LibraryResult<BookDto>;
    // filtered count plus the requested page of the sorted, filtered catalog
    async fn query_books(&self, query: &CatalogQuery) -> LibraryResult<PaginatedResult<BookDto>>;
    async fn distinct_categories(&self) -> LibraryResult<Vec<String>>;
}
