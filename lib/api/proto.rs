//! Wire messages of `library.v1.LibraryService`.
//!
//! Declared with `prost` derives; `build.rs` generates the tonic server and
//! client from the method table only.

use chrono::{DateTime, Utc};

use crate::domain::entities;

#[derive(Clone, PartialEq, prost::Message)]
pub struct Timestamp {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(time: DateTime<Utc>) -> Self {
        Self {
            seconds: time.timestamp(),
            nanos: time.timestamp_subsec_nanos() as i32,
        }
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FieldMask {
    #[prost(string, repeated, tag = "1")]
    pub paths: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Empty {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Book {
    /// `shelves/{shelf}/books/{book}` on output.
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub author: String,
    #[prost(message, optional, tag = "3")]
    pub create_time: Option<Timestamp>,
    #[prost(message, optional, tag = "4")]
    pub update_time: Option<Timestamp>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Shelf {
    /// `shelves/{shelf}` on output.
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    pub create_time: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    pub update_time: Option<Timestamp>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ListBooksRequest {
    #[prost(string, tag = "1")]
    pub parent: String,
    #[prost(int32, tag = "2")]
    pub page_size: i32,
    #[prost(string, tag = "3")]
    pub page_token: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ListBooksResponse {
    #[prost(message, repeated, tag = "1")]
    pub books: Vec<Book>,
    #[prost(string, tag = "2")]
    pub next_page_token: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetBookRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateBookRequest {
    #[prost(string, tag = "1")]
    pub parent: String,
    #[prost(message, optional, tag = "2")]
    pub book: Option<Book>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateBookRequest {
    #[prost(message, optional, tag = "1")]
    pub book: Option<Book>,
    #[prost(message, optional, tag = "2")]
    pub update_mask: Option<FieldMask>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteBookRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateShelfRequest {
    #[prost(message, optional, tag = "1")]
    pub shelf: Option<Shelf>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetOperationRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct OperationMetadata {
    /// Name of the RPC that started the operation.
    #[prost(string, tag = "1")]
    pub rpc: String,
    #[prost(string, tag = "2")]
    pub stage: String,
    #[prost(uint32, tag = "3")]
    pub percentage: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RpcStatus {
    #[prost(int32, tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub message: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Operation {
    /// `operations/shelves/{shelf}`
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    pub metadata: Option<OperationMetadata>,
    #[prost(bool, tag = "3")]
    pub done: bool,
    #[prost(oneof = "operation::Outcome", tags = "4, 5")]
    pub outcome: Option<operation::Outcome>,
}

pub mod operation {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Outcome {
        #[prost(message, tag = "4")]
        Error(super::RpcStatus),
        #[prost(message, tag = "5")]
        Response(super::Shelf),
    }
}

include!(concat!(env!("OUT_DIR"), "/library.v1.LibraryService.rs"));

pub use library_service_client::LibraryServiceClient;
pub use library_service_server::{LibraryService, LibraryServiceServer};

pub fn shelf_resource_name(shelf_name: &str) -> String {
    format!("shelves/{shelf_name}")
}

pub fn book_resource_name(shelf_name: &str, book_name: &str) -> String {
    format!("shelves/{shelf_name}/books/{book_name}")
}

impl From<&entities::Book> for Book {
    fn from(book: &entities::Book) -> Self {
        Self {
            name: book_resource_name(&book.shelf, &book.name),
            author: book.author.clone(),
            create_time: Some(book.create_time.into()),
            update_time: Some(book.update_time.into()),
        }
    }
}

impl From<&entities::Shelf> for Shelf {
    fn from(shelf: &entities::Shelf) -> Self {
        Self {
            name: shelf_resource_name(&shelf.name),
            create_time: Some(shelf.create_time.into()),
            update_time: Some(shelf.update_time.into()),
        }
    }
}
