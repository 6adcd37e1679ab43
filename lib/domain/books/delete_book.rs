use crate::domain::error::DomainError;
use crate::gateway::{BookGateway, Lookup};

#[derive(Clone)]
pub struct DeleteBook<G> {
    gateway: G,
}

impl<G: BookGateway> DeleteBook<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub async fn delete(&self, shelf_name: &str, book_name: &str) -> Result<(), DomainError> {
        let deleted = self
            .gateway
            .delete_book(shelf_name, book_name)
            .await
            .map_err(|e| {
                DomainError::internal(
                    format!("failed to delete book {book_name} at shelf {shelf_name}"),
                    e,
                )
            })?;

        match deleted {
            Lookup::Found(()) => Ok(()),
            Lookup::Absent => Err(DomainError::not_found(format!(
                "book {book_name} at shelf {shelf_name} not found"
            ))),
        }
    }
}
