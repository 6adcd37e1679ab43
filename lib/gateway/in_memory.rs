use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use futures::future::{self, BoxFuture};

use super::{BookGateway, GatewayError, Insert, Lookup, Page, ShelfGateway};
use crate::domain::books::BookField;
use crate::domain::entities::{Book, Shelf};

#[derive(Default)]
struct Store {
    shelves: BTreeMap<String, Shelf>,
    /// Keyed by (shelf name, book name).
    books: BTreeMap<(String, String), Book>,
}

/// Process-local storage with the same key semantics as the Postgres schema.
///
/// Used by tests and by `--storage memory`; contents are lost on exit.
#[derive(Default)]
pub struct InMemoryGateway {
    store: Mutex<Store>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> Result<MutexGuard<'_, Store>, GatewayError> {
        self.store
            .lock()
            .map_err(|_| GatewayError::Storage("in-memory store mutex poisoned".to_string()))
    }

    fn page_of<'b>(books: impl Iterator<Item = &'b Book>, page: Page) -> Vec<Book> {
        let mut books: Vec<&Book> = books.collect();
        books.sort_by(|a, b| {
            (a.create_time, &a.shelf, &a.name).cmp(&(b.create_time, &b.shelf, &b.name))
        });
        books
            .into_iter()
            .skip(page.offset.max(0) as usize)
            .take(page.size.max(0) as usize)
            .cloned()
            .collect()
    }
}

impl ShelfGateway for InMemoryGateway {
    fn create_shelf<'a>(
        &'a self,
        shelf: &'a Shelf,
    ) -> BoxFuture<'a, Result<Insert<Shelf>, GatewayError>> {
        let result = self.store().map(|mut store| {
            if store.shelves.contains_key(&shelf.name) {
                return Insert::Conflict;
            }
            let now = Utc::now();
            let created = Shelf {
                name: shelf.name.clone(),
                create_time: now,
                update_time: now,
            };
            store.shelves.insert(created.name.clone(), created.clone());
            Insert::Created(created)
        });
        Box::pin(future::ready(result))
    }

    fn get_shelf<'a>(
        &'a self,
        shelf_name: &'a str,
    ) -> BoxFuture<'a, Result<Lookup<Shelf>, GatewayError>> {
        let result = self.store().map(|store| match store.shelves.get(shelf_name) {
            Some(shelf) => Lookup::Found(shelf.clone()),
            None => Lookup::Absent,
        });
        Box::pin(future::ready(result))
    }
}

impl BookGateway for InMemoryGateway {
    fn list_books(&self, page: Page) -> BoxFuture<'_, Result<Vec<Book>, GatewayError>> {
        let result = self
            .store()
            .map(|store| Self::page_of(store.books.values(), page));
        Box::pin(future::ready(result))
    }

    fn list_shelf_books<'a>(
        &'a self,
        shelf_name: &'a str,
        page: Page,
    ) -> BoxFuture<'a, Result<Vec<Book>, GatewayError>> {
        let result = self.store().map(|store| {
            Self::page_of(
                store.books.values().filter(|book| book.shelf == shelf_name),
                page,
            )
        });
        Box::pin(future::ready(result))
    }

    fn count_books(&self) -> BoxFuture<'_, Result<i64, GatewayError>> {
        let result = self.store().map(|store| store.books.len() as i64);
        Box::pin(future::ready(result))
    }

    fn count_shelf_books<'a>(
        &'a self,
        shelf_name: &'a str,
    ) -> BoxFuture<'a, Result<i64, GatewayError>> {
        let result = self.store().map(|store| {
            store
                .books
                .values()
                .filter(|book| book.shelf == shelf_name)
                .count() as i64
        });
        Box::pin(future::ready(result))
    }

    fn get_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book_name: &'a str,
    ) -> BoxFuture<'a, Result<Lookup<Book>, GatewayError>> {
        let key = (shelf_name.to_string(), book_name.to_string());
        let result = self.store().map(|store| match store.books.get(&key) {
            Some(book) => Lookup::Found(book.clone()),
            None => Lookup::Absent,
        });
        Box::pin(future::ready(result))
    }

    fn create_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book: &'a Book,
    ) -> BoxFuture<'a, Result<Insert<Book>, GatewayError>> {
        let result = self.store().map(|mut store| {
            if !store.shelves.contains_key(shelf_name) {
                return Insert::ParentMissing;
            }
            let key = (shelf_name.to_string(), book.name.clone());
            if store.books.contains_key(&key) {
                return Insert::Conflict;
            }
            let now = Utc::now();
            let created = Book {
                name: book.name.clone(),
                author: book.author.clone(),
                shelf: shelf_name.to_string(),
                create_time: now,
                update_time: now,
            };
            store.books.insert(key, created.clone());
            Insert::Created(created)
        });
        Box::pin(future::ready(result))
    }

    fn update_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book: &'a Book,
        fields: &'a [BookField],
    ) -> BoxFuture<'a, Result<Lookup<Book>, GatewayError>> {
        let key = (shelf_name.to_string(), book.name.clone());
        let result = self.store().map(|mut store| {
            let Some(stored) = store.books.get_mut(&key) else {
                return Lookup::Absent;
            };
            for field in fields {
                match field {
                    BookField::Name => stored.name = book.name.clone(),
                    BookField::Author => stored.author = book.author.clone(),
                }
            }
            stored.update_time = Utc::now();
            Lookup::Found(stored.clone())
        });
        Box::pin(future::ready(result))
    }

    fn delete_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book_name: &'a str,
    ) -> BoxFuture<'a, Result<Lookup<()>, GatewayError>> {
        let key = (shelf_name.to_string(), book_name.to_string());
        let result = self.store().map(|mut store| match store.books.remove(&key) {
            Some(_) => Lookup::Found(()),
            None => Lookup::Absent,
        });
        Box::pin(future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_book_requires_existing_shelf() {
        let gateway = InMemoryGateway::new();
        let book = Book::input("dune", "Frank Herbert");

        let result = gateway
            .create_book("scifi", &book)
            .await
            .expect("in-memory create should not fail");
        assert_eq!(result, Insert::ParentMissing);

        gateway
            .create_shelf(&Shelf::input("scifi"))
            .await
            .expect("shelf create should not fail");
        let result = gateway
            .create_book("scifi", &book)
            .await
            .expect("in-memory create should not fail");
        assert!(matches!(result, Insert::Created(ref created) if created.shelf == "scifi"));

        let again = gateway
            .create_book("scifi", &book)
            .await
            .expect("in-memory create should not fail");
        assert_eq!(again, Insert::Conflict);
    }

    #[tokio::test]
    async fn duplicate_shelf_is_a_conflict() {
        let gateway = InMemoryGateway::new();
        let shelf = Shelf::input("fiction");

        let first = gateway.create_shelf(&shelf).await.expect("create shelf");
        assert!(matches!(first, Insert::Created(_)));
        let second = gateway.create_shelf(&shelf).await.expect("create shelf");
        assert_eq!(second, Insert::Conflict);
    }

    #[tokio::test]
    async fn paging_skips_and_takes_in_stable_order() {
        let gateway = InMemoryGateway::new();
        gateway
            .create_shelf(&Shelf::input("a"))
            .await
            .expect("create shelf");
        for name in ["one", "two", "three"] {
            gateway
                .create_book("a", &Book::input(name, "anon"))
                .await
                .expect("create book");
        }

        let first = gateway
            .list_shelf_books("a", Page { size: 2, offset: 0 })
            .await
            .expect("list");
        let rest = gateway
            .list_shelf_books("a", Page { size: 2, offset: 2 })
            .await
            .expect("list");

        assert_eq!(first.len(), 2);
        assert_eq!(rest.len(), 1);
        let mut seen: Vec<String> = first.iter().chain(rest.iter()).map(|b| b.name.clone()).collect();
        seen.sort();
        assert_eq!(seen, vec!["one", "three", "two"]);
        assert_eq!(gateway.count_books().await.expect("count"), 3);
    }
}
