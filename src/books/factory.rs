use aws_sdk_dynamodb::types::ScalarAttributeType;
use tracing::info;
use crate::books::repository::BookRepository;
use crate::books::repository::ddb_book_repository::DDBBookRepository;
use crate::books::repository::sqlite_book_repository::SqliteBookRepository;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_book_repository(config: &Configuration) -> LibraryResult<Box<dyn BookRepository>> {
    info!(store = %config.store, "creating book repository");
    match config.store {
        RepositoryStore::Sqlite => {
            Ok(Box::new(SqliteBookRepository::open(config.database.as_str())?))
        }
        RepositoryStore::DynamoDB => {
            let client = build_db_client(config.store).await?;
            Ok(Box::new(DDBBookRepository::new(client, config.books_table.as_str(), config.sequences_table.as_str())))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(config.store).await?;
            let _ = create_table(&client, config.books_table.as_str(), "book_id", ScalarAttributeType::N).await;
            let _ = create_table(&client, config.sequences_table.as_str(), "sequence_name", ScalarAttributeType::S).await;
            Ok(Box::new(DDBBookRepository::new(client, config.books_table.as_str(), config.sequences_table.as_str())))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::BookEntity;
    use crate::books::factory::create_book_repository;
    use crate::core::domain::Configuration;

    #[tokio::test]
    async fn test_should_create_sqlite_repository() {
        let repo = create_book_repository(&Configuration::in_memory("test")).await.expect("should create repository");
        let id = repo.create(&BookEntity::new("Emma", "Jane Austen", "Penguin", "Fiction", "isbn", 474, 9.99))
            .await.expect("should create book");
        assert_eq!("Emma", repo.get(id).await.expect("should get book").title);
    }
}
