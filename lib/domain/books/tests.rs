use std::error::Error as StdError;
use std::sync::Arc;

use super::{CreateBook, DeleteBook, FieldMask, GetBook, ListBooks, UpdateBook, ALL_SHELVES};
use crate::domain::entities::{Book, Shelf};
use crate::domain::error::{DomainError, ErrorKind};
use crate::gateway::test_support::ScriptedGateway;
use crate::gateway::{InMemoryGateway, ShelfGateway};

async fn gateway_with_shelves(shelves: &[&str]) -> Arc<InMemoryGateway> {
    let gateway = Arc::new(InMemoryGateway::new());
    for shelf in shelves {
        gateway
            .create_shelf(&Shelf::input(*shelf))
            .await
            .expect("failed to seed shelf");
    }
    gateway
}

#[tokio::test]
async fn create_then_get_returns_stored_book() {
    let gateway = gateway_with_shelves(&["fiction"]).await;
    let create = CreateBook::new(gateway.clone());
    let get = GetBook::new(gateway);

    let created = create
        .create("fiction", &Book::input("dune", "Frank Herbert"))
        .await
        .expect("create should succeed");
    let fetched = get.get("fiction", "dune").await.expect("book should exist");

    assert_eq!(created, fetched);
    assert_eq!(fetched.shelf, "fiction");
    assert_eq!(fetched.author, "Frank Herbert");
}

#[tokio::test]
async fn duplicate_book_is_already_exists() {
    let gateway = gateway_with_shelves(&["fiction"]).await;
    let create = CreateBook::new(gateway);
    let book = Book::input("dune", "Frank Herbert");

    create.create("fiction", &book).await.expect("first create");
    let err = create
        .create("fiction", &book)
        .await
        .expect_err("second create must conflict");

    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert!(err.to_string().contains("dune"));
}

#[tokio::test]
async fn creating_into_missing_shelf_is_not_found() {
    let gateway = gateway_with_shelves(&[]).await;
    let err = CreateBook::new(gateway)
        .create("nowhere", &Book::input("dune", "Frank Herbert"))
        .await
        .expect_err("shelf does not exist");

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn get_missing_book_is_not_found() {
    let gateway = gateway_with_shelves(&["fiction"]).await;
    let err = GetBook::new(gateway)
        .get("fiction", "missing")
        .await
        .expect_err("book does not exist");

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn update_writes_only_masked_fields() {
    let gateway = gateway_with_shelves(&["fiction"]).await;
    let created = CreateBook::new(gateway.clone())
        .create("fiction", &Book::input("dune", "F. Herbert"))
        .await
        .expect("create");

    let updated = UpdateBook::new(gateway)
        .update(
            "fiction",
            &Book::input("dune", "Frank Herbert"),
            Some(FieldMask::new(["author", "create_time"])),
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.author, "Frank Herbert");
    assert_eq!(updated.create_time, created.create_time);
    assert!(updated.update_time >= created.update_time);
}

#[tokio::test]
async fn update_with_empty_mask_never_reaches_gateway() {
    let gateway = Arc::new(ScriptedGateway::failing_books("gateway must not be called"));
    let err = UpdateBook::new(gateway)
        .update(
            "fiction",
            &Book::input("dune", "Frank Herbert"),
            Some(FieldMask::new(["update_time"])),
        )
        .await
        .expect_err("empty mask must be rejected");

    assert!(matches!(err, DomainError::BadRequest { ref field, .. } if field == "update_mask"));
}

#[tokio::test]
async fn update_missing_book_is_not_found() {
    let gateway = gateway_with_shelves(&["fiction"]).await;
    let err = UpdateBook::new(gateway)
        .update(
            "fiction",
            &Book::input("missing", "nobody"),
            Some(FieldMask::new(["author"])),
        )
        .await
        .expect_err("book does not exist");

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn delete_removes_book_once() {
    let gateway = gateway_with_shelves(&["fiction"]).await;
    CreateBook::new(gateway.clone())
        .create("fiction", &Book::input("dune", "Frank Herbert"))
        .await
        .expect("create");
    let delete = DeleteBook::new(gateway.clone());

    delete.delete("fiction", "dune").await.expect("first delete");
    let err = delete
        .delete("fiction", "dune")
        .await
        .expect_err("second delete has nothing to remove");

    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = GetBook::new(gateway)
        .get("fiction", "dune")
        .await
        .expect_err("deleted book is gone");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn list_reports_finished_on_last_page() {
    let gateway = gateway_with_shelves(&["fiction", "poetry"]).await;
    let create = CreateBook::new(gateway.clone());
    for name in ["a", "b", "c"] {
        create
            .create("fiction", &Book::input(name, "anon"))
            .await
            .expect("create");
    }
    create
        .create("poetry", &Book::input("odes", "Keats"))
        .await
        .expect("create");
    let list = ListBooks::new(gateway);

    let first = list.list("fiction", 2, 0).await.expect("first page");
    assert_eq!(first.books.len(), 2);
    assert!(!first.finished);

    let second = list.list("fiction", 2, 2).await.expect("second page");
    assert_eq!(second.books.len(), 1);
    assert!(second.finished);

    let everything = list.list(ALL_SHELVES, 10, 0).await.expect("all shelves");
    assert_eq!(everything.books.len(), 4);
    assert!(everything.finished);
}

#[tokio::test]
async fn exact_page_boundary_is_finished() {
    let gateway = gateway_with_shelves(&["fiction"]).await;
    let create = CreateBook::new(gateway.clone());
    for name in ["a", "b"] {
        create
            .create("fiction", &Book::input(name, "anon"))
            .await
            .expect("create");
    }

    let listing = ListBooks::new(gateway)
        .list("fiction", 2, 0)
        .await
        .expect("list");
    assert!(listing.finished);
}

#[tokio::test]
async fn gateway_failures_are_internal_with_context() {
    let gateway = Arc::new(ScriptedGateway::failing_books("connection reset"));

    let err = GetBook::new(gateway.clone())
        .get("fiction", "dune")
        .await
        .expect_err("gateway failure must surface");
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.to_string().contains("dune"));
    assert!(err.to_string().contains("fiction"));
    let source = err.source().expect("internal errors keep their cause");
    assert!(source.to_string().contains("connection reset"));

    let err = ListBooks::new(gateway)
        .list(ALL_SHELVES, 10, 0)
        .await
        .expect_err("gateway failure must surface");
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[tokio::test]
async fn offset_past_i64_range_is_bad_request() {
    let gateway = gateway_with_shelves(&["fiction"]).await;

    let err = ListBooks::new(gateway)
        .list("fiction", 10, i64::MAX)
        .await
        .expect_err("overflowing page must be rejected");
    assert!(matches!(err, DomainError::BadRequest { ref field, .. } if field == "page_token"));
}
