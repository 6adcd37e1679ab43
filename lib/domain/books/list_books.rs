use crate::domain::entities::Book;
use crate::domain::error::DomainError;
use crate::gateway::{BookGateway, GatewayError, Page};

/// Shelf name that selects books across every shelf.
pub const ALL_SHELVES: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookListing {
    pub books: Vec<Book>,
    /// True when this page reaches the end of the result set.
    pub finished: bool,
}

#[derive(Clone)]
pub struct ListBooks<G> {
    gateway: G,
}

impl<G: BookGateway> ListBooks<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub async fn list(
        &self,
        shelf_name: &str,
        page_size: i64,
        page_offset: i64,
    ) -> Result<BookListing, DomainError> {
        let page_end = page_offset.checked_add(page_size).ok_or_else(|| {
            DomainError::bad_request("page_token", "page_token is past the end of any listing")
        })?;
        let page = Page {
            size: page_size,
            offset: page_offset,
        };

        let (books, total_books) = if shelf_name == ALL_SHELVES {
            self.list_books(page)
                .await
                .map_err(|e| DomainError::internal("failed to list books", e))?
        } else {
            self.list_shelf_books(shelf_name, page).await.map_err(|e| {
                DomainError::internal(format!("failed to list books of shelf {shelf_name}"), e)
            })?
        };

        Ok(BookListing {
            books,
            finished: total_books <= page_end,
        })
    }

    async fn list_books(&self, page: Page) -> Result<(Vec<Book>, i64), GatewayError> {
        let books = self.gateway.list_books(page).await?;
        let total_books = self.gateway.count_books().await?;
        Ok((books, total_books))
    }

    async fn list_shelf_books(
        &self,
        shelf_name: &str,
        page: Page,
    ) -> Result<(Vec<Book>, i64), GatewayError> {
        let books = self.gateway.list_shelf_books(shelf_name, page).await?;
        let total_books = self.gateway.count_shelf_books(shelf_name).await?;
        Ok((books, total_books))
    }
}
