mod in_memory;
mod pg;
#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use diesel::result::Error as DieselError;
use diesel_async::pooled_connection::deadpool::PoolError;
use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::books::BookField;
use crate::domain::entities::{Book, Shelf};

pub use in_memory::InMemoryGateway;
pub use pg::PgGateway;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    DieselError(#[from] DieselError),

    #[error(transparent)]
    DBPoolError(#[from] PoolError),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result of a keyed read, update or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    Absent,
}

/// Result of an insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insert<T> {
    Created(T),
    /// A row with the same key already exists.
    Conflict,
    /// The row references a parent that does not exist.
    ParentMissing,
}

/// One page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub size: i64,
    pub offset: i64,
}

pub trait ShelfGateway: Send + Sync {
    fn create_shelf<'a>(
        &'a self,
        shelf: &'a Shelf,
    ) -> BoxFuture<'a, Result<Insert<Shelf>, GatewayError>>;

    fn get_shelf<'a>(
        &'a self,
        shelf_name: &'a str,
    ) -> BoxFuture<'a, Result<Lookup<Shelf>, GatewayError>>;
}

pub trait BookGateway: Send + Sync {
    /// Lists books across every shelf.
    fn list_books(&self, page: Page) -> BoxFuture<'_, Result<Vec<Book>, GatewayError>>;

    fn list_shelf_books<'a>(
        &'a self,
        shelf_name: &'a str,
        page: Page,
    ) -> BoxFuture<'a, Result<Vec<Book>, GatewayError>>;

    fn count_books(&self) -> BoxFuture<'_, Result<i64, GatewayError>>;

    fn count_shelf_books<'a>(
        &'a self,
        shelf_name: &'a str,
    ) -> BoxFuture<'a, Result<i64, GatewayError>>;

    fn get_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book_name: &'a str,
    ) -> BoxFuture<'a, Result<Lookup<Book>, GatewayError>>;

    fn create_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book: &'a Book,
    ) -> BoxFuture<'a, Result<Insert<Book>, GatewayError>>;

    /// Writes only `fields` from `book`; the book is keyed by `book.name`.
    fn update_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book: &'a Book,
        fields: &'a [BookField],
    ) -> BoxFuture<'a, Result<Lookup<Book>, GatewayError>>;

    fn delete_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book_name: &'a str,
    ) -> BoxFuture<'a, Result<Lookup<()>, GatewayError>>;
}

/// Storage for both resource kinds, as chosen at startup.
pub trait LibraryGateway: BookGateway + ShelfGateway {}

impl<T: BookGateway + ShelfGateway + ?Sized> LibraryGateway for T {}

pub type SharedGateway = Arc<dyn LibraryGateway>;

impl<T> ShelfGateway for Arc<T>
where
    T: ShelfGateway + ?Sized,
{
    fn create_shelf<'a>(
        &'a self,
        shelf: &'a Shelf,
    ) -> BoxFuture<'a, Result<Insert<Shelf>, GatewayError>> {
        (**self).create_shelf(shelf)
    }

    fn get_shelf<'a>(
        &'a self,
        shelf_name: &'a str,
    ) -> BoxFuture<'a, Result<Lookup<Shelf>, GatewayError>> {
        (**self).get_shelf(shelf_name)
    }
}

impl<T> BookGateway for Arc<T>
where
    T: BookGateway + ?Sized,
{
    fn list_books(&self, page: Page) -> BoxFuture<'_, Result<Vec<Book>, GatewayError>> {
        (**self).list_books(page)
    }

    fn list_shelf_books<'a>(
        &'a self,
        shelf_name: &'a str,
        page: Page,
    ) -> BoxFuture<'a, Result<Vec<Book>, GatewayError>> {
        (**self).list_shelf_books(shelf_name, page)
    }

    fn count_books(&self) -> BoxFuture<'_, Result<i64, GatewayError>> {
        (**self).count_books()
    }

    fn count_shelf_books<'a>(
        &'a self,
        shelf_name: &'a str,
    ) -> BoxFuture<'a, Result<i64, GatewayError>> {
        (**self).count_shelf_books(shelf_name)
    }

    fn get_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book_name: &'a str,
    ) -> BoxFuture<'a, Result<Lookup<Book>, GatewayError>> {
        (**self).get_book(shelf_name, book_name)
    }

    fn create_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book: &'a Book,
    ) -> BoxFuture<'a, Result<Insert<Book>, GatewayError>> {
        (**self).create_book(shelf_name, book)
    }

    fn update_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book: &'a Book,
        fields: &'a [BookField],
    ) -> BoxFuture<'a, Result<Lookup<Book>, GatewayError>> {
        (**self).update_book(shelf_name, book, fields)
    }

    fn delete_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book_name: &'a str,
    ) -> BoxFuture<'a, Result<Lookup<()>, GatewayError>> {
        (**self).delete_book(shelf_name, book_name)
    }
}
