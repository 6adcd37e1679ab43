use crate::domain::entities::Book;
use crate::domain::error::DomainError;
use crate::gateway::{BookGateway, Lookup};

#[derive(Clone)]
pub struct GetBook<G> {
    gateway: G,
}

impl<G: BookGateway> GetBook<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub async fn get(&self, shelf_name: &str, book_name: &str) -> Result<Book, DomainError> {
        let lookup = self
            .gateway
            .get_book(shelf_name, book_name)
            .await
            .map_err(|e| {
                DomainError::internal(
                    format!("failed to get book {book_name} at shelf {shelf_name}"),
                    e,
                )
            })?;

        match lookup {
            Lookup::Found(book) => Ok(book),
            Lookup::Absent => Err(DomainError::not_found(format!(
                "book {book_name} at shelf {shelf_name} not found"
            ))),
        }
    }
}
