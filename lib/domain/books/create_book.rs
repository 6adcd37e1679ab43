use crate::domain::entities::Book;
use crate::domain::error::DomainError;
use crate::gateway::{BookGateway, Insert};

#[derive(Clone)]
pub struct CreateBook<G> {
    gateway: G,
}

impl<G: BookGateway> CreateBook<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub async fn create(&self, shelf_name: &str, input_book: &Book) -> Result<Book, DomainError> {
        let book_name = &input_book.name;
        let inserted = self
            .gateway
            .create_book(shelf_name, input_book)
            .await
            .map_err(|e| {
                DomainError::internal(
                    format!("failed to create book {book_name} at shelf {shelf_name}"),
                    e,
                )
            })?;

        match inserted {
            Insert::Created(book) => Ok(book),
            Insert::Conflict => Err(DomainError::already_exists(format!(
                "book {book_name} at shelf {shelf_name} already exists"
            ))),
            Insert::ParentMissing => Err(DomainError::not_found(format!(
                "shelf {shelf_name} not found"
            ))),
        }
    }
}
