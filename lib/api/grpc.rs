use tonic::{Request, Response, Status};

use super::errors::{log_rejection, to_rpc_status, to_status};
use super::names::{
    parse_book_name, parse_new_id, parse_new_shelf_id, parse_operation_name, parse_shelf_name,
};
use super::proto::{
    self, operation::Outcome, CreateBookRequest, CreateShelfRequest, DeleteBookRequest, Empty,
    GetBookRequest, GetOperationRequest, LibraryService, LibraryServiceServer, ListBooksRequest,
    ListBooksResponse, OperationMetadata, UpdateBookRequest,
};
use super::{list_book_page, report_operation, OperationReport, CREATE_SHELF_RPC};
use crate::domain::books::FieldMask;
use crate::domain::entities::{Book, Shelf};
use crate::domain::error::DomainError;
use crate::domain::Library;

/// tonic handler for `library.v1.LibraryService`.
pub struct LibraryGrpc {
    library: Library,
}

impl LibraryGrpc {
    pub fn new(library: Library) -> Self {
        Self { library }
    }
}

pub fn library_server(library: Library) -> LibraryServiceServer<LibraryGrpc> {
    LibraryServiceServer::new(LibraryGrpc::new(library))
}

fn rejected(rpc: &'static str, err: DomainError) -> Status {
    log_rejection(rpc, &err);
    to_status(&err)
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, DomainError> {
    value.ok_or_else(|| DomainError::bad_request(field, "is required"))
}

fn to_proto_operation(report: &OperationReport) -> proto::Operation {
    let OperationReport { operation, shelf } = report;

    let outcome = match (&operation.error, shelf) {
        (Some(err), _) => Some(Outcome::Error(to_rpc_status(err))),
        (None, Some(shelf)) => Some(Outcome::Response(proto::Shelf::from(shelf))),
        (None, None) => None,
    };

    proto::Operation {
        name: operation.name.clone(),
        metadata: Some(OperationMetadata {
            rpc: CREATE_SHELF_RPC.to_string(),
            stage: operation.stage.to_string(),
            percentage: operation.percentage,
        }),
        done: operation.finished(),
        outcome,
    }
}

#[tonic::async_trait]
impl LibraryService for LibraryGrpc {
    async fn list_books(
        &self,
        request: Request<ListBooksRequest>,
    ) -> Result<Response<ListBooksResponse>, Status> {
        let request = request.into_inner();
        let result = async {
            let shelf_name = parse_shelf_name("parent", &request.parent)?;
            list_book_page(&self.library, shelf_name, request.page_size, &request.page_token).await
        }
        .await;

        let page = result.map_err(|err| rejected("ListBooks", err))?;
        Ok(Response::new(ListBooksResponse {
            books: page.books.iter().map(proto::Book::from).collect(),
            next_page_token: page.next_page_token,
        }))
    }

    async fn get_book(
        &self,
        request: Request<GetBookRequest>,
    ) -> Result<Response<proto::Book>, Status> {
        let request = request.into_inner();
        let result = async {
            let (shelf_name, book_name) = parse_book_name("name", &request.name)?;
            self.library.get_book.get(shelf_name, book_name).await
        }
        .await;

        let book = result.map_err(|err| rejected("GetBook", err))?;
        Ok(Response::new(proto::Book::from(&book)))
    }

    async fn create_book(
        &self,
        request: Request<CreateBookRequest>,
    ) -> Result<Response<proto::Book>, Status> {
        let request = request.into_inner();
        let result = async {
            let shelf_name = parse_shelf_name("parent", &request.parent)?;
            let book = required("book", request.book.as_ref())?;
            let book_name = parse_new_id("book.name", &book.name)?;
            self.library
                .create_book
                .create(shelf_name, &Book::input(book_name, book.author.as_str()))
                .await
        }
        .await;

        let book = result.map_err(|err| rejected("CreateBook", err))?;
        Ok(Response::new(proto::Book::from(&book)))
    }

    async fn update_book(
        &self,
        request: Request<UpdateBookRequest>,
    ) -> Result<Response<proto::Book>, Status> {
        let request = request.into_inner();
        let result = async {
            let book = required("book", request.book.as_ref())?;
            let (shelf_name, book_name) = parse_book_name("book.name", &book.name)?;
            let update_mask = request
                .update_mask
                .as_ref()
                .map(|mask| FieldMask::new(mask.paths.iter().map(String::as_str)));
            self.library
                .update_book
                .update(
                    shelf_name,
                    &Book::input(book_name, book.author.as_str()),
                    update_mask,
                )
                .await
        }
        .await;

        let book = result.map_err(|err| rejected("UpdateBook", err))?;
        Ok(Response::new(proto::Book::from(&book)))
    }

    async fn delete_book(
        &self,
        request: Request<DeleteBookRequest>,
    ) -> Result<Response<Empty>, Status> {
        let request = request.into_inner();
        let result = async {
            let (shelf_name, book_name) = parse_book_name("name", &request.name)?;
            self.library.delete_book.delete(shelf_name, book_name).await
        }
        .await;

        result.map_err(|err| rejected("DeleteBook", err))?;
        Ok(Response::new(Empty {}))
    }

    async fn create_shelf(
        &self,
        request: Request<CreateShelfRequest>,
    ) -> Result<Response<proto::Operation>, Status> {
        let request = request.into_inner();
        let result = (|| {
            let shelf = required("shelf", request.shelf.as_ref())?;
            let shelf_name = parse_new_shelf_id("shelf.name", &shelf.name)?;
            self.library.create_shelf.start(Shelf::input(shelf_name))
        })();

        let operation = result.map_err(|err| rejected("CreateShelf", err))?;
        Ok(Response::new(to_proto_operation(&OperationReport {
            operation,
            shelf: None,
        })))
    }

    async fn get_operation(
        &self,
        request: Request<GetOperationRequest>,
    ) -> Result<Response<proto::Operation>, Status> {
        let request = request.into_inner();
        let result = async {
            let shelf_name = parse_operation_name("name", &request.name)?;
            report_operation(&self.library, shelf_name).await
        }
        .await;

        let report = result.map_err(|err| rejected("GetOperation", err))?;
        Ok(Response::new(to_proto_operation(&report)))
    }
}
