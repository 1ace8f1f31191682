use async_trait::async_trait;
use tracing::{debug, info};
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::query::CatalogQuery;

pub(crate) struct CatalogServiceImpl {
    name: String,
    book_repository: Box<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(config: &Configuration, book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            name: config.name.to_string(),
            book_repository,
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_book(&self, book: &BookDto) -> LibraryResult<BookDto> {
        let entity = BookEntity::from(book);
        entity.validate()?;
        let book_id = self.book_repository.create(&entity).await?;
        info!(service = %self.name, book_id, category = %entity.category, "added book");
        Ok(BookDto::from(&entity.with_id(book_id)))
    }

    async fn remove_book(&self, id: i64) -> LibraryResult<()> {
        let _ = self.book_repository.delete(id).await?;
        info!(service = %self.name, book_id = id, "removed book");
        Ok(())
    }

    async fn update_book(&self, id: i64, book: &BookDto) -> LibraryResult<BookDto> {
        let entity = BookEntity::from(book).with_id(id);
        entity.validate()?;
        let _ = self.book_repository.update(&entity).await?;
        info!(service = %self.name, book_id = id, "updated book");
        Ok(BookDto::from(&entity))
    }

    async fn find_book_by_id(&self, id: i64) -> LibraryResult<BookDto> {
        self.book_repository.get(id).await.map(|b| BookDto::from(&b))
    }

    async fn query_books(&self, query: &CatalogQuery) -> LibraryResult<PaginatedResult<BookDto>> {
        let res = self.book_repository.query(query).await?;
        debug!(service = %self.name, categories = query.categories.len(), sort = %query.sort,
            page_num = res.page_num, page_size = res.page_size, total = res.total_match_count, "queried books");
        Ok(res.map(|b| BookDto::from(b)))
    }

    async fn distinct_categories(&self) -> LibraryResult<Vec<String>> {
        self.book_repository.distinct_categories().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::books::dto::BookDto;
    use crate::catalog::domain::CatalogService;
    use crate::catalog::factory;
    use crate::core::domain::Configuration;
    use crate::core::library::LibraryError;
    use crate::core::query::{CatalogQuery, CategoryFilter, PageRequest, SortMode};

    async fn catalog() -> Arc<dyn CatalogService> {
        factory::create_catalog_service(&Configuration::in_memory("test")).await.expect("should create catalog")
    }

    fn book(title: &str, category: &str) -> BookDto {
        BookDto::new(title, "author", "publisher", category, "isbn", 200, 15.0)
    }

    #[tokio::test]
    async fn test_should_add_book() {
        let catalog_svc = catalog().await;

        let added = catalog_svc.add_book(&book("Emma", "Fiction")).await.expect("should add book");
        assert!(added.book_id > 0);

        let loaded = catalog_svc.find_book_by_id(added.book_id).await.expect("should return book");
        assert_eq!(added, loaded);
    }

    #[tokio::test]
    async fn test_should_reject_invalid_book() {
        let catalog_svc = catalog().await;

        let res = catalog_svc.add_book(&book(" ", "Fiction")).await;
        assert!(matches!(res, Err(LibraryError::Validation { .. })));
        let mut priced = book("Emma", "Fiction");
        priced.price = -3.0;
        assert!(matches!(catalog_svc.add_book(&priced).await, Err(LibraryError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_should_update_book() {
        let catalog_svc = catalog().await;

        let added = catalog_svc.add_book(&book("Emma", "Fiction")).await.expect("should add book");
        let mut changed = book("new title", "Classics");
        changed.book_id = 9999;
        let updated = catalog_svc.update_book(added.book_id, &changed).await.expect("should update book");
        assert_eq!(added.book_id, updated.book_id);

        let loaded = catalog_svc.find_book_by_id(added.book_id).await.expect("should return book");
        assert_eq!("new title", loaded.title.as_str());
        assert_eq!("Classics", loaded.category.as_str());

        let missing = catalog_svc.update_book(added.book_id + 1, &changed).await;
        assert!(matches!(missing, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_remove_book() {
        let catalog_svc = catalog().await;

        let added = catalog_svc.add_book(&book("Emma", "Fiction")).await.expect("should add book");
        catalog_svc.remove_book(added.book_id).await.expect("should remove book");

        assert!(matches!(catalog_svc.find_book_by_id(added.book_id).await, Err(LibraryError::NotFound { .. })));
        assert!(matches!(catalog_svc.remove_book(added.book_id).await, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_query_books() {
        let catalog_svc = catalog().await;
        for (title, category) in [("Zeta", "Fiction"), ("Alpha", "History"), ("Mu", "Fiction")] {
            catalog_svc.add_book(&book(title, category)).await.expect("should add book");
        }

        let query = CatalogQuery::new(CategoryFilter::all(), SortMode::TitleAscending,
                                      PageRequest::new(2, 1).expect("valid page"));
        let res = catalog_svc.query_books(&query).await.expect("should query books");
        assert_eq!(3, res.total_match_count);
        assert_eq!(2, res.page_count());
        let titles: Vec<&str> = res.records.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(vec!["Alpha", "Mu"], titles);

        let query = CatalogQuery::new(CategoryFilter::new(["Fiction"]), SortMode::TitleDescending,
                                      PageRequest::new(5, 1).expect("valid page"));
        let res = catalog_svc.query_books(&query).await.expect("should query books");
        let titles: Vec<&str> = res.records.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(vec!["Zeta", "Mu"], titles);
    }

    #[tokio::test]
    async fn test_should_list_categories() {
        let catalog_svc = catalog().await;
        assert!(catalog_svc.distinct_categories().await.expect("should list").is_empty());
        for (title, category) in [("Zeta", "Poetry"), ("Alpha", "History"), ("Mu", "Poetry")] {
            catalog_svc.add_book(&book(title, category)).await.expect("should add book");
        }
        let categories = catalog_svc.distinct_categories().await.expect("should list");
        assert_eq!(vec!["History".to_string(), "Poetry".to_string()], categories);
    }
}
