use std::process::Command;

const UNKNOWN_COMMIT: &str = "unknown";

fn main() {
    println!("cargo:rerun-if-env-changed=SOURCE_COMMIT_HASH");
    // Rebuild when git metadata changes during local development.
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=migrations");

    let commit_hash = std::env::var("SOURCE_COMMIT_HASH")
        .ok()
        .or_else(read_head_commit)
        .unwrap_or_else(|| UNKNOWN_COMMIT.to_string());

    println!("cargo:rustc-env=LIBRARY_GIT_COMMIT_HASH={commit_hash}");

    compile_library_service();
}

/// Generates the tonic server/client for `library.v1.LibraryService`.
///
/// Messages are declared by hand with `prost` derives in `lib/api/proto.rs`, so no
/// `protoc` is needed at build time.
fn compile_library_service() {
    let methods = [
        ("list_books", "ListBooks", "ListBooksRequest", "ListBooksResponse"),
        ("get_book", "GetBook", "GetBookRequest", "Book"),
        ("create_book", "CreateBook", "CreateBookRequest", "Book"),
        ("update_book", "UpdateBook", "UpdateBookRequest", "Book"),
        ("delete_book", "DeleteBook", "DeleteBookRequest", "Empty"),
        ("create_shelf", "CreateShelf", "CreateShelfRequest", "Operation"),
        ("get_operation", "GetOperation", "GetOperationRequest", "Operation"),
    ];

    let mut service = tonic_build::manual::Service::builder()
        .name("LibraryService")
        .package("library.v1");

    for (name, route, input, output) in methods {
        service = service.method(
            tonic_build::manual::Method::builder()
                .name(name)
                .route_name(route)
                .input_type(format!("crate::api::proto::{input}"))
                .output_type(format!("crate::api::proto::{output}"))
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        );
    }

    tonic_build::manual::Builder::new().compile(&[service.build()]);
}

fn read_head_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--verify", "HEAD"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let hash = String::from_utf8(output.stdout).ok()?;
    let trimmed = hash.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
