use std::collections::VecDeque;
use std::sync::Mutex;

use futures::future::{self, BoxFuture};

use super::{BookGateway, GatewayError, InMemoryGateway, Insert, Lookup, Page, ShelfGateway};
use crate::domain::books::BookField;
use crate::domain::entities::{Book, Shelf};

/// In-memory gateway whose shelf inserts and book calls can be scripted to fail.
///
/// Unscripted calls fall through to a real [`InMemoryGateway`].
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    inner: InMemoryGateway,
    create_shelf_outcomes: Mutex<VecDeque<Result<Insert<Shelf>, GatewayError>>>,
    create_shelf_calls: Mutex<u32>,
    book_failure: Option<String>,
}

impl ScriptedGateway {
    pub(crate) fn with_create_shelf_outcomes(
        outcomes: Vec<Result<Insert<Shelf>, GatewayError>>,
    ) -> Self {
        Self {
            create_shelf_outcomes: Mutex::new(outcomes.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Every book call fails with a storage error carrying `message`.
    pub(crate) fn failing_books(message: &str) -> Self {
        Self {
            book_failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn create_shelf_calls(&self) -> u32 {
        *self
            .create_shelf_calls
            .lock()
            .expect("create_shelf_calls mutex poisoned")
    }

    fn book_failure<'a, T: Send + 'a>(&self) -> Option<BoxFuture<'a, Result<T, GatewayError>>> {
        self.book_failure.as_ref().map(|message| {
            let err = GatewayError::Storage(message.clone());
            Box::pin(future::ready(Err(err))) as BoxFuture<'a, Result<T, GatewayError>>
        })
    }
}

impl ShelfGateway for ScriptedGateway {
    fn create_shelf<'a>(
        &'a self,
        shelf: &'a Shelf,
    ) -> BoxFuture<'a, Result<Insert<Shelf>, GatewayError>> {
        *self
            .create_shelf_calls
            .lock()
            .expect("create_shelf_calls mutex poisoned") += 1;

        let scripted = self
            .create_shelf_outcomes
            .lock()
            .expect("create_shelf_outcomes mutex poisoned")
            .pop_front();

        match scripted {
            Some(outcome) => Box::pin(future::ready(outcome)),
            None => self.inner.create_shelf(shelf),
        }
    }

    fn get_shelf<'a>(
        &'a self,
        shelf_name: &'a str,
    ) -> BoxFuture<'a, Result<Lookup<Shelf>, GatewayError>> {
        self.inner.get_shelf(shelf_name)
    }
}

impl BookGateway for ScriptedGateway {
    fn list_books(&self, page: Page) -> BoxFuture<'_, Result<Vec<Book>, GatewayError>> {
        self.book_failure()
            .unwrap_or_else(|| self.inner.list_books(page))
    }

    fn list_shelf_books<'a>(
        &'a self,
        shelf_name: &'a str,
        page: Page,
    ) -> BoxFuture<'a, Result<Vec<Book>, GatewayError>> {
        self.book_failure()
            .unwrap_or_else(|| self.inner.list_shelf_books(shelf_name, page))
    }

    fn count_books(&self) -> BoxFuture<'_, Result<i64, GatewayError>> {
        self.book_failure()
            .unwrap_or_else(|| self.inner.count_books())
    }

    fn count_shelf_books<'a>(
        &'a self,
        shelf_name: &'a str,
    ) -> BoxFuture<'a, Result<i64, GatewayError>> {
        self.book_failure()
            .unwrap_or_else(|| self.inner.count_shelf_books(shelf_name))
    }

    fn get_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book_name: &'a str,
    ) -> BoxFuture<'a, Result<Lookup<Book>, GatewayError>> {
        self.book_failure()
            .unwrap_or_else(|| self.inner.get_book(shelf_name, book_name))
    }

    fn create_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book: &'a Book,
    ) -> BoxFuture<'a, Result<Insert<Book>, GatewayError>> {
        self.book_failure()
            .unwrap_or_else(|| self.inner.create_book(shelf_name, book))
    }

    fn update_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book: &'a Book,
        fields: &'a [BookField],
    ) -> BoxFuture<'a, Result<Lookup<Book>, GatewayError>> {
        self.book_failure()
            .unwrap_or_else(|| self.inner.update_book(shelf_name, book, fields))
    }

    fn delete_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book_name: &'a str,
    ) -> BoxFuture<'a, Result<Lookup<()>, GatewayError>> {
        self.book_failure()
            .unwrap_or_else(|| self.inner.delete_book(shelf_name, book_name))
    }
}
