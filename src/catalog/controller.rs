use axum::{
    body::HttpBody,
    BoxError,
    extract::{Path, RawQuery, State},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::Value;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest, AddBookCommandResponse};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest, GetBookCommandResponse};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest, ListBooksCommandResponse};
use crate::catalog::command::list_categories_cmd::{ListCategoriesCommand, ListCategoriesCommandRequest, ListCategoriesCommandResponse};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest, RemoveBookCommandResponse};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest, UpdateBookCommandResponse};
use crate::core::command::Command;
use crate::core::controller::{AppState, bad_request, json_to_server_error, ServerError};
use crate::core::query::SortMode;

// generic over the request body so the same routes serve hyper and the lambda runtime
pub(crate) fn build_router<B>(state: AppState) -> Router<(), B>
    where B: HttpBody + Send + 'static,
          B::Data: Send,
          B::Error: Into<BoxError> {
    Router::new()
        .route("/Book/AllBooks", get(all_books))
        .route("/Book/BooksAsc", get(books_asc))
        .route("/Book/BooksDesc", get(books_desc))
        .route("/Book/GetBookTypes", get(get_book_types))
        .route("/Book/AddBook", post(add_book))
        .route("/Book/UpdateBook/:id", put(update_book))
        .route("/Book/DeleteBook/:id", delete(remove_book))
        .route("/Book/:id", get(find_book_by_id))
        .with_state(state)
}

pub(crate) async fn all_books(
    State(state): State<AppState>,
    RawQuery(query): RawQuery) -> Result<Json<ListBooksCommandResponse>, ServerError> {
    list_books(state, query, SortMode::Unsorted).await
}

pub(crate) async fn books_asc(
    State(state): State<AppState>,
    RawQuery(query): RawQuery) -> Result<Json<ListBooksCommandResponse>, ServerError> {
    list_books(state, query, SortMode::TitleAscending).await
}

pub(crate) async fn books_desc(
    State(state): State<AppState>,
    RawQuery(query): RawQuery) -> Result<Json<ListBooksCommandResponse>, ServerError> {
    list_books(state, query, SortMode::TitleDescending).await
}

async fn list_books(state: AppState, query: Option<String>,
                    sort: SortMode) -> Result<Json<ListBooksCommandResponse>, ServerError> {
    let req = parse_listing_query(query.as_deref(), sort, state.config.default_page_size)?;
    let res = ListBooksCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

// `bookTypes` may repeat, every occurrence is decoded on its own. Values that are not
// integers are rejected here, range checks happen when the page window is built.
pub(crate) fn parse_listing_query(query: Option<&str>, sort: SortMode,
                                  default_page_size: i64) -> Result<ListBooksCommandRequest, ServerError> {
    let mut req = ListBooksCommandRequest::new(vec![], sort, default_page_size, 1);
    let Some(query) = query else {
        return Ok(req);
    };
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "bookTypes" => req.categories.push(value.into_owned()),
            "pageSize" => req.page_size = parse_integer("pageSize", value.as_ref())?,
            "pageNum" => req.page_num = parse_integer("pageNum", value.as_ref())?,
            _ => {}
        }
    }
    Ok(req)
}

fn parse_integer(name: &str, value: &str) -> Result<i64, ServerError> {
    value.trim().parse::<i64>()
        .map_err(|_| bad_request(format!("{} must be an integer but was {:?}", name, value).as_str()))
}

pub(crate) async fn get_book_types(
    State(state): State<AppState>) -> Result<Json<ListCategoriesCommandResponse>, ServerError> {
    let res = ListCategoriesCommand::new(state.catalog).execute(ListCategoriesCommandRequest::default()).await?;
    Ok(Json(res))
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<AddBookCommandResponse>, ServerError> {
    let req: AddBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = AddBookCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_book_by_id(
    State(state): State<AppState>,
    Path(book_id): Path<i64>) -> Result<Json<GetBookCommandResponse>, ServerError> {
    let req = GetBookCommandRequest { book_id };
    let res = GetBookCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn update_book(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
    json: Json<Value>) -> Result<Json<UpdateBookCommandResponse>, ServerError> {
    let mut req: UpdateBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    req.book_id = book_id;
    let res = UpdateBookCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn remove_book(
    State(state): State<AppState>,
    Path(book_id): Path<i64>) -> Result<Json<RemoveBookCommandResponse>, ServerError> {
    let req = RemoveBookCommandRequest { book_id };
    let res = RemoveBookCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use crate::catalog::controller::{build_router, parse_listing_query};
    use crate::catalog::factory;
    use crate::core::controller::AppState;
    use crate::core::domain::Configuration;
    use crate::core::query::SortMode;

    async fn app() -> Router {
        let config = Configuration::in_memory("test");
        let catalog = factory::create_catalog_service(&config).await.expect("should create catalog");
        build_router(AppState::new(config, catalog))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder.header("content-type", "application/json")
                .body(Body::from(body.to_string())).expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };
        let response = app.clone().oneshot(request).await.expect("should respond");
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.expect("should read body");
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn add(app: &Router, title: &str, category: &str) -> i64 {
        let (status, body) = send(app, Method::POST, "/Book/AddBook", Some(json!({
            "title": title, "author": "author", "publisher": "publisher",
            "category": category, "isbn": "isbn", "pageCount": 100, "price": 12.5,
        }))).await;
        assert_eq!(StatusCode::OK, status);
        body["bookID"].as_i64().expect("book id")
    }

    fn titles(body: &Value) -> Vec<String> {
        body["books"].as_array().expect("books").iter()
            .map(|b| b["title"].as_str().expect("title").to_string()).collect()
    }

    #[tokio::test]
    async fn test_should_parse_listing_query() {
        let req = parse_listing_query(None, SortMode::Unsorted, 5).expect("should parse");
        assert_eq!((5, 1), (req.page_size, req.page_num));
        assert!(req.categories.is_empty());

        let req = parse_listing_query(Some("bookTypes=Science%20Fiction&bookTypes=Art+History&pageSize=2&pageNum=3&other=1"),
                                      SortMode::TitleAscending, 5).expect("should parse");
        assert_eq!(vec!["Science Fiction".to_string(), "Art History".to_string()], req.categories);
        assert_eq!((2, 3), (req.page_size, req.page_num));
        assert_eq!(SortMode::TitleAscending, req.sort);

        let (status, _) = parse_listing_query(Some("pageSize=two"), SortMode::Unsorted, 5).expect_err("should reject");
        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert!(parse_listing_query(Some("pageNum=1.5"), SortMode::Unsorted, 5).is_err());
    }

    #[tokio::test]
    async fn test_should_list_books_by_route() {
        let app = app().await;
        for title in ["Zeta", "Alpha", "Mu"] {
            add(&app, title, "Fiction").await;
        }
        add(&app, "Beta", "History").await;

        let (status, body) = send(&app, Method::GET, "/Book/BooksAsc?bookTypes=Fiction", None).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(vec!["Alpha", "Mu", "Zeta"], titles(&body));
        assert_eq!(3, body["totalMatchCount"]);
        assert_eq!(3, body["totalNumBooks"]);

        let (_, body) = send(&app, Method::GET, "/Book/BooksDesc?pageSize=2", None).await;
        assert_eq!(vec!["Zeta", "Mu"], titles(&body));
        assert_eq!(4, body["totalMatchCount"]);

        let (_, body) = send(&app, Method::GET, "/Book/AllBooks?pageSize=2&pageNum=2", None).await;
        assert_eq!(vec!["Mu", "Beta"], titles(&body));

        let (_, body) = send(&app, Method::GET, "/Book/AllBooks?bookTypes=Fiction&bookTypes=History&pageNum=99", None).await;
        assert!(titles(&body).is_empty());
        assert_eq!(4, body["totalMatchCount"]);

        let (_, body) = send(&app, Method::GET, "/Book/AllBooks?bookTypes=Nonexistent", None).await;
        assert!(titles(&body).is_empty());
        assert_eq!(0, body["totalMatchCount"]);
    }

    #[tokio::test]
    async fn test_should_reject_invalid_paging() {
        let app = app().await;
        for uri in ["/Book/AllBooks?pageSize=0", "/Book/BooksAsc?pageNum=-1", "/Book/BooksDesc?pageSize=abc"] {
            let (status, _) = send(&app, Method::GET, uri, None).await;
            assert_eq!(StatusCode::BAD_REQUEST, status, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_should_get_book_types() {
        let app = app().await;
        add(&app, "Zeta", "Poetry").await;
        add(&app, "Alpha", "Drama").await;
        add(&app, "Mu", "Poetry").await;

        let (status, body) = send(&app, Method::GET, "/Book/GetBookTypes", None).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(json!(["Drama", "Poetry"]), body);
    }

    #[tokio::test]
    async fn test_should_maintain_books() {
        let app = app().await;
        let id = add(&app, "Emma", "Fiction").await;

        let (status, body) = send(&app, Method::GET, format!("/Book/{}", id).as_str(), None).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!("Emma", body["title"]);
        assert_eq!(100, body["pageCount"]);

        let (status, body) = send(&app, Method::PUT, format!("/Book/UpdateBook/{}", id).as_str(), Some(json!({
            "title": "Emma", "author": "Jane Austen", "publisher": "Penguin",
            "category": "Classics", "isbn": "isbn", "pageCount": 474, "price": 9.99,
        }))).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(id, body["bookID"]);
        assert_eq!("Classics", body["category"]);

        let (status, body) = send(&app, Method::DELETE, format!("/Book/DeleteBook/{}", id).as_str(), None).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(id, body["bookID"]);

        let (status, _) = send(&app, Method::GET, format!("/Book/{}", id).as_str(), None).await;
        assert_eq!(StatusCode::NOT_FOUND, status);
        let (status, _) = send(&app, Method::DELETE, format!("/Book/DeleteBook/{}", id).as_str(), None).await;
        assert_eq!(StatusCode::NOT_FOUND, status);
    }

    #[tokio::test]
    async fn test_should_reject_bad_books() {
        let app = app().await;
        let (status, _) = send(&app, Method::POST, "/Book/AddBook", Some(json!({"title": "Emma"}))).await;
        assert_eq!(StatusCode::BAD_REQUEST, status);

        let (status, _) = send(&app, Method::POST, "/Book/AddBook", Some(json!({
            "title": "Emma", "author": "a", "publisher": "p", "category": "", "isbn": "i", "price": 1.0,
        }))).await;
        assert_eq!(StatusCode::BAD_REQUEST, status);

        let (status, _) = send(&app, Method::PUT, "/Book/UpdateBook/404", Some(json!({
            "title": "Emma", "author": "a", "publisher": "p", "category": "c", "isbn": "i", "price": 1.0,
        }))).await;
        assert_eq!(StatusCode::NOT_FOUND, status);

        let (status, _) = send(&app, Method::GET, "/Book/not-a-number", None).await;
        assert_eq!(StatusCode::BAD_REQUEST, status);
    }

    #[tokio::test]
    async fn test_should_serve_lambda_request_bodies() {
        let config = Configuration::in_memory("test");
        let catalog = factory::create_catalog_service(&config).await.expect("should create catalog");
        let app: Router<(), lambda_http::Body> = build_router(AppState::new(config, catalog));

        let request = Request::builder().method(Method::POST).uri("/Book/AddBook")
            .header("content-type", "application/json")
            .body(lambda_http::Body::from(json!({
                "title": "Emma", "author": "a", "publisher": "p", "category": "Fiction", "isbn": "i", "price": 1.0,
            }).to_string())).expect("request");
        let response = app.clone().oneshot(request).await.expect("should respond");
        assert_eq!(StatusCode::OK, response.status());

        let request = Request::builder().uri(format!("/Book/AllBooks?bookTypes=Fiction&pageSize=2&pageNum={}", i64::MAX))
            .body(lambda_http::Body::Empty).expect("request");
        let response = app.oneshot(request).await.expect("should respond");
        assert_eq!(StatusCode::OK, response.status());
        let bytes = hyper::body::to_bytes(response.into_body()).await.expect("should read body");
        let body: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(json!({"books": [], "totalMatchCount": 1, "totalNumBooks": 1}), body);
    }
}
