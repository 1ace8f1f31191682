use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::debug;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::query::{CatalogQuery, CategoryFilter};
use crate::core::repository::Repository;
use crate::utils::ddb::{map_conditional_error, next_sequence, parse_float_attribute, parse_item, parse_number_attribute, parse_string_attribute};

const BOOK_SEQUENCE: &str = "books";

// DDBBookRepository keeps books in a DynamoDB table keyed by the numeric book_id. Ids
// come from a counter item in the sequences table. Listings scan the filtered table into
// memory and apply the catalog query there, so the count and the page come from one read.
#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
    sequences_table: String,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str, sequences_table: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            sequences_table: sequences_table.to_string(),
        }
    }

    // Note you cannot use certain reserved words per https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html
    async fn scan(&self, categories: &CategoryFilter) -> LibraryResult<Vec<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let mut records = vec![];
        let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let mut request = self.client
                .scan()
                .table_name(table_name)
                .consistent_read(true)
                .set_exclusive_start_key(exclusive_start_key.take());
            if !categories.is_empty() {
                let mut names = vec![];
                for (i, category) in categories.categories().enumerate() {
                    names.push(format!(":c{}", i));
                    request = request.expression_attribute_values(
                        format!(":c{}", i).as_str(), AttributeValue::S(category.to_string()));
                }
                request = request
                    .expression_attribute_names("#category", "category")
                    .filter_expression(format!("#category IN ({})", names.join(", ")));
            }
            let out = request.send().await?;
            if let Some(items) = out.items() {
                records.extend(items.iter().map(map_to_book));
            }
            match out.last_evaluated_key() {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key.clone()),
                _ => break,
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl Repository<BookEntity> for DDBBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<i64> {
        let table_name: &str = self.table_name.as_ref();
        let book_id = next_sequence(&self.client, self.sequences_table.as_str(), BOOK_SEQUENCE).await?;
        let val = serde_json::to_value(entity.clone().with_id(book_id))?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(book_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| book_id).map_err(|err| map_conditional_error(
            err, |e| e.is_conditional_check_failed_exception(),
            || LibraryError::duplicate_key(format!("book already exists for {}", book_id).as_str())))
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .update_item()
            .table_name(table_name)
            .key("book_id", AttributeValue::N(entity.book_id.to_string()))
            .update_expression("SET #title = :title, #author = :author, #publisher = :publisher, #category = :category, isbn = :isbn, page_count = :page_count, price = :price")
            .expression_attribute_names("#title", "title")
            .expression_attribute_names("#author", "author")
            .expression_attribute_names("#publisher", "publisher")
            .expression_attribute_names("#category", "category")
            .expression_attribute_values(":title", AttributeValue::S(entity.title.to_string()))
            .expression_attribute_values(":author", AttributeValue::S(entity.author.to_string()))
            .expression_attribute_values(":publisher", AttributeValue::S(entity.publisher.to_string()))
            .expression_attribute_values(":category", AttributeValue::S(entity.category.to_string()))
            .expression_attribute_values(":isbn", AttributeValue::S(entity.isbn.to_string()))
            .expression_attribute_values(":page_count", AttributeValue::N(entity.page_count.to_string()))
            .expression_attribute_values(":price", AttributeValue::N(entity.price.to_string()))
            .condition_expression("attribute_exists(book_id)")
            .send()
            .await.map(|_| 1).map_err(|err| map_conditional_error(
            err, |e| e.is_conditional_check_failed_exception(),
            || LibraryError::not_found(format!("book not found for {}", entity.book_id).as_str())))
    }

    async fn get(&self, id: i64) -> LibraryResult<BookEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .get_item()
            .table_name(table_name)
            .consistent_read(true)
            .key("book_id", AttributeValue::N(id.to_string()))
            .send()
            .await.map_err(LibraryError::from).and_then(|req| {
            match req.item() {
                Some(map) => Ok(map_to_book(map)),
                None => Err(LibraryError::not_found(format!("book not found for {}", id).as_str())),
            }
        })
    }

    async fn delete(&self, id: i64) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("book_id", AttributeValue::N(id.to_string()))
            .condition_expression("attribute_exists(book_id)")
            .send()
            .await.map(|_| 1).map_err(|err| map_conditional_error(
            err, |e| e.is_conditional_check_failed_exception(),
            || LibraryError::not_found(format!("book not found for {}", id).as_str())))
    }

    async fn query(&self, query: &CatalogQuery) -> LibraryResult<PaginatedResult<BookEntity>> {
        let records = self.scan(&query.categories).await?;
        debug!(scanned = records.len(), sort = %query.sort, "dynamodb books scan");
        Ok(query.select(records))
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {
    async fn distinct_categories(&self) -> LibraryResult<Vec<String>> {
        let table_name: &str = self.table_name.as_ref();
        let mut categories = BTreeSet::new();
        let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let out = self.client
                .scan()
                .table_name(table_name)
                .consistent_read(true)
                .projection_expression("#category")
                .expression_attribute_names("#category", "category")
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await?;
            if let Some(items) = out.items() {
                categories.extend(items.iter().filter_map(|map| parse_string_attribute("category", map)));
            }
            match out.last_evaluated_key() {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key.clone()),
                _ => break,
            }
        }
        Ok(categories.into_iter().collect())
    }
}

fn map_to_book(map: &HashMap<String, AttributeValue>) -> BookEntity {
    BookEntity {
        book_id: parse_number_attribute("book_id", map).unwrap_or(0),
        title: parse_string_attribute("title", map).unwrap_or(String::from("")),
        author: parse_string_attribute("author", map).unwrap_or(String::from("")),
        publisher: parse_string_attribute("publisher", map).unwrap_or(String::from("")),
        category: parse_string_attribute("category", map).unwrap_or(String::from("")),
        isbn: parse_string_attribute("isbn", map).unwrap_or(String::from("")),
        page_count: parse_number_attribute("page_count", map).unwrap_or(0) as u32,
        price: parse_float_attribute("price", map).unwrap_or(0.0),
    }
}
