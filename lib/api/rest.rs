//! REST/JSON gateway over the same domain operations as the gRPC service.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{code_name, http_status, log_rejection, public_message};
use super::names::{parse_new_id, parse_new_shelf_id};
use super::proto::{book_resource_name, shelf_resource_name};
use super::{list_book_page, report_operation, OperationReport, CREATE_SHELF_RPC};
use crate::domain::books::FieldMask;
use crate::domain::entities::{Book, Shelf};
use crate::domain::error::DomainError;
use crate::domain::Library;

pub fn router(library: Library) -> Router {
    Router::new()
        .route("/v1/shelves", post(create_shelf))
        .route("/v1/shelves/:shelf/books", get(list_books).post(create_book))
        .route(
            "/v1/shelves/:shelf/books/:book",
            get(get_book).patch(update_book).delete(delete_book),
        )
        .route("/v1/operations/shelves/:shelf", get(get_operation))
        .with_state(library)
}

/// Error body: `{"code": "NOT_FOUND", "message": "..."}`.
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    fn from_domain(err: &DomainError) -> Self {
        Self {
            code: code_name(err.kind()).to_string(),
            message: public_message(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log_rejection("rest", &self.0);
        let status = http_status(self.0.kind());
        (status, Json(ErrorBody::from_domain(&self.0))).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookJson {
    pub name: String,
    pub author: String,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<&Book> for BookJson {
    fn from(book: &Book) -> Self {
        Self {
            name: book_resource_name(&book.shelf, &book.name),
            author: book.author.clone(),
            create_time: book.create_time,
            update_time: book.update_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfJson {
    pub name: String,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<&Shelf> for ShelfJson {
    fn from(shelf: &Shelf) -> Self {
        Self {
            name: shelf_resource_name(&shelf.name),
            create_time: shelf.create_time,
            update_time: shelf.update_time,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListBooksJson {
    pub books: Vec<BookJson>,
    #[serde(default)]
    pub next_page_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OperationMetadataJson {
    pub rpc: String,
    pub stage: String,
    pub percentage: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OperationJson {
    pub name: String,
    pub metadata: OperationMetadataJson,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ShelfJson>,
}

impl From<&OperationReport> for OperationJson {
    fn from(report: &OperationReport) -> Self {
        let operation = &report.operation;
        Self {
            name: operation.name.clone(),
            metadata: OperationMetadataJson {
                rpc: CREATE_SHELF_RPC.to_string(),
                stage: operation.stage.to_string(),
                percentage: operation.percentage,
            },
            done: operation.finished(),
            error: operation.error.as_ref().map(ErrorBody::from_domain),
            response: report.shelf.as_ref().map(ShelfJson::from),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(default)]
    page_size: i32,
    #[serde(default)]
    page_token: String,
}

#[derive(Debug, Deserialize)]
struct NewBook {
    name: String,
    author: String,
}

#[derive(Debug, Deserialize)]
struct UpdateParams {
    update_mask: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BookPatch {
    #[serde(default)]
    author: String,
}

#[derive(Debug, Deserialize)]
struct NewShelf {
    name: String,
}

async fn list_books(
    State(library): State<Library>,
    Path(shelf): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListBooksJson>, ApiError> {
    let page = list_book_page(&library, &shelf, params.page_size, &params.page_token).await?;
    Ok(Json(ListBooksJson {
        books: page.books.iter().map(BookJson::from).collect(),
        next_page_token: page.next_page_token,
    }))
}

async fn get_book(
    State(library): State<Library>,
    Path((shelf, book)): Path<(String, String)>,
) -> Result<Json<BookJson>, ApiError> {
    let book = library.get_book.get(&shelf, &book).await?;
    Ok(Json(BookJson::from(&book)))
}

async fn create_book(
    State(library): State<Library>,
    Path(shelf): Path<String>,
    Json(input): Json<NewBook>,
) -> Result<(StatusCode, Json<BookJson>), ApiError> {
    let name = parse_new_id("book.name", &input.name)?;
    let book = library
        .create_book
        .create(&shelf, &Book::input(name, input.author))
        .await?;
    Ok((StatusCode::CREATED, Json(BookJson::from(&book))))
}

async fn update_book(
    State(library): State<Library>,
    Path((shelf, book)): Path<(String, String)>,
    Query(params): Query<UpdateParams>,
    Json(patch): Json<BookPatch>,
) -> Result<Json<BookJson>, ApiError> {
    let update_mask = params
        .update_mask
        .map(|mask| FieldMask::new(mask.split(',')));
    let book = library
        .update_book
        .update(&shelf, &Book::input(book, patch.author), update_mask)
        .await?;
    Ok(Json(BookJson::from(&book)))
}

async fn delete_book(
    State(library): State<Library>,
    Path((shelf, book)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    library.delete_book.delete(&shelf, &book).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_shelf(
    State(library): State<Library>,
    Json(input): Json<NewShelf>,
) -> Result<Json<OperationJson>, ApiError> {
    let name = parse_new_shelf_id("shelf.name", &input.name)?;
    let operation = library.create_shelf.start(Shelf::input(name))?;
    Ok(Json(OperationJson::from(&OperationReport {
        operation,
        shelf: None,
    })))
}

async fn get_operation(
    State(library): State<Library>,
    Path(shelf): Path<String>,
) -> Result<Json<OperationJson>, ApiError> {
    let report = report_operation(&library, &shelf).await?;
    Ok(Json(OperationJson::from(&report)))
}
