pub mod ddb_book_repository;
pub mod sqlite_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;


#[async_trait]
pub(crate) trait BookRepository: Repository<BookEntity> {
    // distinct category values ordered alphabetically
    async fn distinct_categories(&self) -> LibraryResult<Vec<String>>;
}
