pub mod books;
pub mod entities;
pub mod error;
pub mod shelves;

use tokio_util::sync::CancellationToken;

use crate::gateway::SharedGateway;
use books::{CreateBook, DeleteBook, GetBook, ListBooks, UpdateBook};
use shelves::{CreateShelf, GetShelf, TrackerConfig};

/// Every domain operation wired to one storage gateway.
#[derive(Clone)]
pub struct Library {
    pub list_books: ListBooks<SharedGateway>,
    pub get_book: GetBook<SharedGateway>,
    pub create_book: CreateBook<SharedGateway>,
    pub update_book: UpdateBook<SharedGateway>,
    pub delete_book: DeleteBook<SharedGateway>,
    pub get_shelf: GetShelf<SharedGateway>,
    pub create_shelf: CreateShelf<SharedGateway>,
}

impl Library {
    /// Must run inside a Tokio runtime: the shelf tracker spawns its cleanup task here.
    pub fn new(gateway: SharedGateway, tracker: TrackerConfig, shutdown: CancellationToken) -> Self {
        Self {
            list_books: ListBooks::new(gateway.clone()),
            get_book: GetBook::new(gateway.clone()),
            create_book: CreateBook::new(gateway.clone()),
            update_book: UpdateBook::new(gateway.clone()),
            delete_book: DeleteBook::new(gateway.clone()),
            get_shelf: GetShelf::new(gateway.clone()),
            create_shelf: CreateShelf::new(gateway, tracker, shutdown),
        }
    }
}
