pub mod errors;
pub mod grpc;
pub mod names;
pub mod pagination;
pub mod proto;
pub mod rest;

use crate::domain::entities::{Book, Operation, Shelf};
use crate::domain::error::DomainError;
use crate::domain::Library;

/// RPC recorded in operation metadata.
pub const CREATE_SHELF_RPC: &str = "CreateShelf";

/// One page of books plus the token for the next one (empty on the last page).
pub struct BookPage {
    pub books: Vec<Book>,
    pub next_page_token: String,
}

pub async fn list_book_page(
    library: &Library,
    shelf_name: &str,
    page_size: i32,
    page_token: &str,
) -> Result<BookPage, DomainError> {
    let page_size = pagination::page_size(page_size)?;
    let page_offset = pagination::page_offset(page_token)?;
    let next_offset = pagination::page_end(page_offset, page_size)?;

    let listing = library
        .list_books
        .list(shelf_name, page_size, page_offset)
        .await?;

    let next_page_token = if listing.finished {
        String::new()
    } else {
        pagination::next_page_token(next_offset)
    };

    Ok(BookPage {
        books: listing.books,
        next_page_token,
    })
}

/// Operation state plus the created shelf once the job succeeded.
pub struct OperationReport {
    pub operation: Operation,
    pub shelf: Option<Shelf>,
}

pub async fn report_operation(
    library: &Library,
    shelf_name: &str,
) -> Result<OperationReport, DomainError> {
    let operation = library.create_shelf.get_operation(shelf_name)?;

    let shelf = if operation.finished() && operation.error.is_none() {
        Some(library.get_shelf.get(shelf_name).await?)
    } else {
        None
    };

    Ok(OperationReport { operation, shelf })
}
