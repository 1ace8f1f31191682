use std::env;
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::RepositoryStore;

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable: Sync + Send {
    fn id(&self) -> i64;
}

pub const DEFAULT_PAGE_SIZE: i64 = 5;
pub const DEFAULT_PORT: u16 = 3400;

// Configuration abstracts config options for the bookstore catalog
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub name: String,
    pub store: RepositoryStore,
    // SQLite database path, `:memory:` keeps the catalog in process
    pub database: String,
    pub books_table: String,
    pub sequences_table: String,
    // used when a listing request omits pageSize
    pub default_page_size: i64,
    pub port: u16,
    pub log_level: String,
}

impl Configuration {
    pub fn new(name: &str) -> Self {
        Configuration {
            name: name.to_string(),
            store: RepositoryStore::Sqlite,
            database: "bookstore.sqlite".to_string(),
            books_table: "books".to_string(),
            sequences_table: "sequences".to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
        }
    }

    // in-process catalog backed by a private SQLite memory database
    pub fn in_memory(name: &str) -> Self {
        Configuration {
            database: ":memory:".to_string(),
            ..Configuration::new(name)
        }
    }

    /// Overlays the defaults with `BOOKSTORE_*` environment variables.
    pub fn from_env(name: &str) -> LibraryResult<Self> {
        Self::from_lookup(name, |key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F: Fn(&str) -> Option<String>>(name: &str, lookup: F) -> LibraryResult<Self> {
        let mut config = Configuration::new(name);
        if let Some(store) = lookup("BOOKSTORE_STORE") {
            config.store = RepositoryStore::parse(store.as_str())?;
        }
        if let Some(database) = lookup("BOOKSTORE_DATABASE") {
            config.database = database;
        }
        if let Some(table) = lookup("BOOKSTORE_BOOKS_TABLE") {
            config.books_table = table;
        }
        if let Some(table) = lookup("BOOKSTORE_SEQUENCES_TABLE") {
            config.sequences_table = table;
        }
        if let Some(size) = lookup("BOOKSTORE_DEFAULT_PAGE_SIZE") {
            config.default_page_size = size.trim().parse::<i64>().map_err(|err| LibraryError::validation(
                format!("BOOKSTORE_DEFAULT_PAGE_SIZE must be an integer {:?}", err).as_str(), None))?;
        }
        if let Some(port) = lookup("BOOKSTORE_PORT") {
            config.port = port.trim().parse::<u16>().map_err(|err| LibraryError::validation(
                format!("BOOKSTORE_PORT must be a valid port {:?}", err).as_str(), None))?;
        }
        if let Some(level) = lookup("BOOKSTORE_LOG") {
            config.log_level = level;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LibraryResult<()> {
        if self.default_page_size < 1 {
            return Err(LibraryError::validation(
                format!("default page size must be positive but was {}", self.default_page_size).as_str(), None));
        }
        if self.database.trim().is_empty() {
            return Err(LibraryError::validation("database path must not be empty", None));
        }
        if self.books_table.trim().is_empty() || self.sequences_table.trim().is_empty() {
            return Err(LibraryError::validation("table names must not be empty", None));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use crate::core::domain::Configuration;
    use crate::core::library::LibraryError;
    use crate::core::repository::RepositoryStore;

    #[tokio::test]
    async fn test_should_build_config() {
        let config = Configuration::new("test");
        assert_eq!(5, config.default_page_size);
        assert_eq!(3400, config.port);
        assert_eq!(RepositoryStore::Sqlite, config.store);
        assert_eq!("books", config.books_table.as_str());
    }

    #[tokio::test]
    async fn test_should_overlay_config_from_lookup() {
        let vars = HashMap::from([
            ("BOOKSTORE_STORE", "local-dynamodb"),
            ("BOOKSTORE_DATABASE", ":memory:"),
            ("BOOKSTORE_DEFAULT_PAGE_SIZE", "12"),
            ("BOOKSTORE_PORT", "8080"),
        ]);
        let config = Configuration::from_lookup("test", |k| vars.get(k).map(|v| v.to_string()))
            .expect("should build config");
        assert_eq!(RepositoryStore::LocalDynamoDB, config.store);
        assert_eq!(":memory:", config.database.as_str());
        assert_eq!(12, config.default_page_size);
        assert_eq!(8080, config.port);
    }

    #[tokio::test]
    async fn test_should_reject_invalid_config() {
        let vars = HashMap::from([("BOOKSTORE_DEFAULT_PAGE_SIZE", "0")]);
        let res = Configuration::from_lookup("test", |k| vars.get(k).map(|v| v.to_string()));
        assert!(matches!(res, Err(LibraryError::Validation { .. })));

        let vars = HashMap::from([("BOOKSTORE_PORT", "port")]);
        let res = Configuration::from_lookup("test", |k| vars.get(k).map(|v| v.to_string()));
        assert!(matches!(res, Err(LibraryError::Validation { .. })));

        let vars = HashMap::from([("BOOKSTORE_STORE", "postgres")]);
        let res = Configuration::from_lookup("test", |k| vars.get(k).map(|v| v.to_string()));
        assert!(matches!(res, Err(LibraryError::Validation { .. })));
    }
}
