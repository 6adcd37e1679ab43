mod create_book;
mod delete_book;
mod get_book;
mod list_books;
mod update_book;

pub use create_book::CreateBook;
pub use delete_book::DeleteBook;
pub use get_book::GetBook;
pub use list_books::{BookListing, ListBooks, ALL_SHELVES};
pub use update_book::{user_updatable_fields, BookField, FieldMask, UpdateBook};

#[cfg(test)]
mod tests;
