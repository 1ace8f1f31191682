use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use rusqlite::types::Value;
use tracing::debug;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::query::{CatalogQuery, CategoryFilter, PageRequest, SortMode};
use crate::core::repository::Repository;
use crate::utils::sqlite::{open_connection, placeholders};

const BOOK_COLUMNS: &str = "book_id, title, author, publisher, category, isbn, page_count, price";

// SqliteBookRepository keeps the catalog in a relational SQLite database. The single
// connection is serialized behind a mutex and only touched from the blocking pool,
// every listing runs in one read transaction.
pub struct SqliteBookRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBookRepository {
    pub(crate) fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub(crate) fn open(path: &str) -> LibraryResult<Self> {
        Ok(Self::new(open_connection(path)?))
    }

    // runs `f` on tokio's blocking pool so disk I/O and lock waits never stall a worker thread
    async fn with_connection<T, F>(&self, f: F) -> LibraryResult<T>
        where F: FnOnce(&mut Connection) -> LibraryResult<T> + Send + 'static,
              T: Send + 'static {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|err| LibraryError::runtime(
                format!("sqlite connection lock poisoned {}", err).as_str(), None))?;
            f(&mut guard)
        }).await.map_err(|err| LibraryError::runtime(
            format!("sqlite task failed {}", err).as_str(), None))?
    }
}

#[async_trait]
impl Repository<BookEntity> for SqliteBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<i64> {
        let entity = entity.clone();
        self.with_connection(move |conn| Ok(insert_book(conn, &entity)?)).await
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let entity = entity.clone();
        self.with_connection(move |conn| {
            let size = conn.execute(
                "UPDATE books
                 SET title = ?1, author = ?2, publisher = ?3, category = ?4,
                     isbn = ?5, page_count = ?6, price = ?7
                 WHERE book_id = ?8",
                params![entity.title, entity.author, entity.publisher, entity.category,
                        entity.isbn, entity.page_count, entity.price, entity.book_id],
            )?;
            if size == 0 {
                return Err(LibraryError::not_found(format!("book not found for {}", entity.book_id).as_str()));
            }
            Ok(size)
        }).await
    }

    async fn get(&self, id: i64) -> LibraryResult<BookEntity> {
        self.with_connection(move |conn| {
            conn.query_row(
                format!("SELECT {} FROM books WHERE book_id = ?1", BOOK_COLUMNS).as_str(),
                [id],
                map_to_book,
            ).optional()?
                .ok_or_else(|| LibraryError::not_found(format!("book not found for {}", id).as_str()))
        }).await
    }

    async fn delete(&self, id: i64) -> LibraryResult<usize> {
        self.with_connection(move |conn| {
            let size = conn.execute("DELETE FROM books WHERE book_id = ?1", [id])?;
            if size == 0 {
                return Err(LibraryError::not_found(format!("book not found for {}", id).as_str()));
            }
            Ok(size)
        }).await
    }

    async fn query(&self, query: &CatalogQuery) -> LibraryResult<PaginatedResult<BookEntity>> {
        let sort = query.sort;
        let query = query.clone();
        let res = self.with_connection(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
            let res = select_page(&tx, &query)?;
            tx.commit()?;
            Ok(res)
        }).await?;
        debug!(total = res.total_match_count, returned = res.records.len(), sort = %sort, "sqlite books page");
        Ok(res)
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn distinct_categories(&self) -> LibraryResult<Vec<String>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT DISTINCT category FROM books ORDER BY category ASC")?;
            let categories = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(categories)
        }).await
    }
}

// WHERE clause and bound values for a category filter, built once and shared by
// the count and the page fetch so both see exactly the same filtered set
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SqlPredicate {
    clause: String,
    values: Vec<Value>,
}

impl SqlPredicate {
    pub(crate) fn new(filter: &CategoryFilter) -> Self {
        if filter.is_empty() {
            return Self { clause: "1 = 1".to_string(), values: vec![] };
        }
        let values: Vec<Value> = filter.categories().map(|c| Value::Text(c.to_string())).collect();
        Self {
            clause: format!("category IN ({})", placeholders(values.len())),
            values,
        }
    }
}

fn order_by(sort: SortMode) -> &'static str {
    match sort {
        SortMode::Unsorted => "book_id ASC",
        SortMode::TitleAscending => "title ASC, book_id ASC",
        SortMode::TitleDescending => "title DESC, book_id ASC",
    }
}

pub(crate) fn count_matches(conn: &Connection, predicate: &SqlPredicate) -> rusqlite::Result<i64> {
    conn.query_row(
        format!("SELECT COUNT(*) FROM books WHERE {}", predicate.clause).as_str(),
        rusqlite::params_from_iter(predicate.values.iter()),
        |row| row.get(0),
    )
}

pub(crate) fn fetch_page(conn: &Connection, predicate: &SqlPredicate,
                         sort: SortMode, page: &PageRequest) -> rusqlite::Result<Vec<BookEntity>> {
    let sql = format!("SELECT {} FROM books WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
                      BOOK_COLUMNS, predicate.clause, order_by(sort));
    let mut values = predicate.values.clone();
    values.push(Value::Integer(page.page_size()));
    values.push(Value::Integer(page.offset()));
    let mut stmt = conn.prepare(sql.as_str())?;
    let books = stmt
        .query_map(rusqlite::params_from_iter(values), map_to_book)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(books)
}

// filter -> count -> sort -> slice, run against whatever snapshot `conn` is reading
pub(crate) fn select_page(conn: &Connection, query: &CatalogQuery) -> rusqlite::Result<PaginatedResult<BookEntity>> {
    let predicate = SqlPredicate::new(&query.categories);
    let total = count_matches(conn, &predicate)?;
    let books = fetch_page(conn, &predicate, query.sort, &query.page)?;
    Ok(PaginatedResult::new(query.page.page_num(), query.page.page_size(), total, books))
}

pub(crate) fn insert_book(conn: &Connection, entity: &BookEntity) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO books(title, author, publisher, category, isbn, page_count, price)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![entity.title, entity.author, entity.publisher, entity.category,
                entity.isbn, entity.page_count, entity.price],
    )?;
    Ok(conn.last_insert_rowid())
}

fn map_to_book(row: &Row<'_>) -> rusqlite::Result<BookEntity> {
    Ok(BookEntity {
        book_id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        publisher: row.get(3)?,
        category: row.get(4)?,
        isbn: row.get(5)?,
        page_count: row.get(6)?,
        price: row.get(7)?,
    })
}
