use crate::domain::entities::Shelf;
use crate::domain::error::DomainError;
use crate::gateway::{Lookup, ShelfGateway};

#[derive(Clone)]
pub struct GetShelf<G> {
    gateway: G,
}

impl<G: ShelfGateway> GetShelf<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub async fn get(&self, shelf_name: &str) -> Result<Shelf, DomainError> {
        let lookup = self
            .gateway
            .get_shelf(shelf_name)
            .await
            .map_err(|e| DomainError::internal(format!("failed to get shelf {shelf_name}"), e))?;

        match lookup {
            Lookup::Found(shelf) => Ok(shelf),
            Lookup::Absent => Err(DomainError::not_found(format!(
                "shelf {shelf_name} not found"
            ))),
        }
    }
}
