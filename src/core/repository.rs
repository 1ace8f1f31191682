use std::fmt;
use std::fmt::{Display, Formatter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::query::CatalogQuery;

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // create an entity and return the identifier assigned by the store
    async fn create(&self, entity: &Entity) -> LibraryResult<i64>;

    // updates an entity
    async fn update(&self, entity: &Entity) -> LibraryResult<usize>;

    // get an entity
    async fn get(&self, id: i64) -> LibraryResult<Entity>;

    // delete an entity
    async fn delete(&self, id: i64) -> LibraryResult<usize>;

    // filter, count, sort and page against one consistent view of the store
    async fn query(&self, query: &CatalogQuery) -> LibraryResult<PaginatedResult<Entity>>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    Sqlite,
    DynamoDB,
    LocalDynamoDB,
}

impl RepositoryStore {
    pub fn parse(s: &str) -> LibraryResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(RepositoryStore::Sqlite),
            "dynamodb" => Ok(RepositoryStore::DynamoDB),
            "local-dynamodb" => Ok(RepositoryStore::LocalDynamoDB),
            other => Err(LibraryError::validation(
                format!("unknown repository store {}", other).as_str(), None)),
        }
    }
}

impl Display for RepositoryStore {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RepositoryStore::Sqlite => write!(f, "sqlite"),
            RepositoryStore::DynamoDB => write!(f, "dynamodb"),
            RepositoryStore::LocalDynamoDB => write!(f, "local-dynamodb"),
        }
    }
}
