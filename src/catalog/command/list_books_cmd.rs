use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::library::PaginatedResult;
use crate::core::query::{CatalogQuery, CategoryFilter, PageRequest, SortMode};

// ListBooksCommand serves every listing route, the routes only differ in sort mode
pub(crate) struct ListBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl ListBooksCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ListBooksCommandRequest {
    pub categories: Vec<String>,
    pub sort: SortMode,
    pub page_size: i64,
    pub page_num: i64,
}

impl ListBooksCommandRequest {
    pub fn new(categories: Vec<String>, sort: SortMode, page_size: i64, page_num: i64) -> Self {
        Self {
            categories,
            sort,
            page_size,
            page_num,
        }
    }

    pub fn build_query(&self) -> Result<CatalogQuery, CommandError> {
        let page = PageRequest::new(self.page_size, self.page_num)?;
        Ok(CatalogQuery::new(CategoryFilter::new(self.categories.iter()), self.sort, page))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListBooksCommandResponse {
    pub books: Vec<BookDto>,
    pub total_match_count: i64,
    // same value as total_match_count, kept for storefront clients reading the older name
    pub total_num_books: i64,
}

impl From<PaginatedResult<BookDto>> for ListBooksCommandResponse {
    fn from(res: PaginatedResult<BookDto>) -> Self {
        Self {
            total_match_count: res.total_match_count,
            total_num_books: res.total_match_count,
            books: res.records,
        }
    }
}

#[async_trait]
impl Command<ListBooksCommandRequest, ListBooksCommandResponse> for ListBooksCommand {
    async fn execute(&self, req: ListBooksCommandRequest) -> Result<ListBooksCommandResponse, CommandError> {
        let query = req.build_query()?;
        self.catalog_service.query_books(&query).await
            .map_err(CommandError::from).map(ListBooksCommandResponse::from)
    }
}
