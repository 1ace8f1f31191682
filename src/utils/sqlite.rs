use rusqlite::{ffi, Connection, ErrorCode};
use crate::core::library::{LibraryError, LibraryResult};

pub(crate) const BOOKS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS books (
        book_id     INTEGER PRIMARY KEY AUTOINCREMENT,
        title       TEXT NOT NULL,
        author      TEXT NOT NULL,
        publisher   TEXT NOT NULL,
        category    TEXT NOT NULL,
        isbn        TEXT NOT NULL,
        page_count  INTEGER NOT NULL CHECK (page_count >= 0),
        price       REAL NOT NULL CHECK (price >= 0)
    );

    CREATE INDEX IF NOT EXISTS idx_books_category
        ON books(category);

    CREATE INDEX IF NOT EXISTS idx_books_title
        ON books(title, book_id);
";

// opens (or creates) the database at `path` and makes sure the books schema exists,
// file databases run in WAL mode
pub(crate) fn open_connection(path: &str) -> LibraryResult<Connection> {
    let conn = if path == ":memory:" {
        Connection::open_in_memory()?
    } else {
        let conn = Connection::open(path)?;
        let _ = enable_wal(&conn)?;
        conn
    };
    init_schema(&conn)?;
    Ok(conn)
}

pub(crate) fn init_schema(conn: &Connection) -> LibraryResult<()> {
    conn.execute_batch(BOOKS_SCHEMA)?;
    Ok(())
}

// switches a file database to write-ahead logging so readers keep their snapshot
// while another connection commits
pub(crate) fn enable_wal(conn: &Connection) -> LibraryResult<String> {
    let mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
    Ok(mode)
}

// builds `?, ?, ?` for an IN list of `n` bound values
pub(crate) fn placeholders(n: usize) -> String {
    std::iter::repeat("?").take(n).collect::<Vec<_>>().join(", ")
}

impl From<rusqlite::Error> for LibraryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => {
                LibraryError::not_found("no matching row")
            }
            rusqlite::Error::SqliteFailure(ref failure, _) => {
                match failure.code {
                    ErrorCode::ConstraintViolation
                    if failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                        || failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE => {
                        LibraryError::duplicate_key(format!("sqlite duplicate key {:?}", err).as_str())
                    }
                    ErrorCode::ConstraintViolation => {
                        LibraryError::validation(format!("sqlite constraint {:?}", err).as_str(),
                                                 Some(format!("{}", failure.extended_code)))
                    }
                    ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                        LibraryError::unavailable(format!("sqlite busy {:?}", err).as_str(),
                                                  Some(format!("{:?}", failure.code)), true)
                    }
                    _ => {
                        LibraryError::database(format!("sqlite error {:?}", err).as_str(),
                                               Some(format!("{:?}", failure.code)), false)
                    }
                }
            }
            other => {
                LibraryError::database(format!("sqlite error {:?}", other).as_str(), None, false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::LibraryError;
    use crate::utils::sqlite::{open_connection, placeholders};

    #[tokio::test]
    async fn test_should_build_placeholders() {
        assert_eq!("", placeholders(0));
        assert_eq!("?", placeholders(1));
        assert_eq!("?, ?, ?", placeholders(3));
    }

    #[tokio::test]
    async fn test_should_init_schema_idempotently() {
        let conn = open_connection(":memory:").expect("should open");
        crate::utils::sqlite::init_schema(&conn).expect("should re-run schema");
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0)).expect("should count");
        assert_eq!(0, count);
    }

    #[tokio::test]
    async fn test_should_map_sqlite_errors() {
        let conn = open_connection(":memory:").expect("should open");
        let err = conn.execute("INSERT INTO books(book_id, title, author, publisher, category, isbn, page_count, price)
                                VALUES (1, 't', 'a', 'p', 'c', 'i', -1, 1.0)", []).expect_err("check should fail");
        assert!(matches!(LibraryError::from(err), LibraryError::Validation { .. }));
        conn.execute("INSERT INTO books(book_id, title, author, publisher, category, isbn, page_count, price)
                      VALUES (1, 't', 'a', 'p', 'c', 'i', 1, 1.0)", []).expect("should insert");
        let err = conn.execute("INSERT INTO books(book_id, title, author, publisher, category, isbn, page_count, price)
                                VALUES (1, 't', 'a', 'p', 'c', 'i', 1, 1.0)", []).expect_err("duplicate should fail");
        assert!(matches!(LibraryError::from(err), LibraryError::DuplicateKey { .. }));
        let err = conn.query_row("SELECT book_id FROM books WHERE book_id = 2", [], |row| row.get::<_, i64>(0)).expect_err("no rows");
        assert!(matches!(LibraryError::from(err), LibraryError::NotFound { .. }));
        let err = conn.execute("SELECT nope FROM nothing", []).expect_err("bad sql");
        assert!(matches!(LibraryError::from(err), LibraryError::Database { .. }));
    }
}
