mod create_shelf;
mod get_shelf;

pub use create_shelf::{CreateShelf, TrackerConfig, SHELF_CREATION_STAGES};
pub use get_shelf::GetShelf;
