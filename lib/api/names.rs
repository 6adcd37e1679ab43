//! Parsing of resource names carried in requests.

use crate::domain::books::ALL_SHELVES;
use crate::domain::entities::shelf_name_from_operation;
use crate::domain::error::DomainError;

/// `shelves/{shelf}` to `{shelf}`.
pub fn parse_shelf_name<'a>(field: &str, name: &'a str) -> Result<&'a str, DomainError> {
    match name.split('/').collect::<Vec<_>>()[..] {
        ["shelves", shelf] if !shelf.is_empty() => Ok(shelf),
        _ => Err(DomainError::bad_request(
            field,
            "must be of format 'shelves/*'",
        )),
    }
}

/// `shelves/{shelf}/books/{book}` to `({shelf}, {book})`.
pub fn parse_book_name<'a>(field: &str, name: &'a str) -> Result<(&'a str, &'a str), DomainError> {
    match name.split('/').collect::<Vec<_>>()[..] {
        ["shelves", shelf, "books", book] if !shelf.is_empty() && !book.is_empty() => {
            Ok((shelf, book))
        }
        _ => Err(DomainError::bad_request(
            field,
            "must be of format 'shelves/*/books/*'",
        )),
    }
}

/// `operations/shelves/{shelf}` to `{shelf}`.
pub fn parse_operation_name<'a>(field: &str, name: &'a str) -> Result<&'a str, DomainError> {
    shelf_name_from_operation(name).ok_or_else(|| {
        DomainError::bad_request(field, "must be of format 'operations/shelves/*'")
    })
}

/// Validates a caller-chosen id for a new resource.
pub fn parse_new_id<'a>(field: &str, id: &'a str) -> Result<&'a str, DomainError> {
    if id.is_empty() || id.contains('/') {
        return Err(DomainError::bad_request(
            field,
            "must be non-empty and must not contain '/'",
        ));
    }
    Ok(id)
}

/// Like [`parse_new_id`], and `-` stays reserved for listing every shelf.
pub fn parse_new_shelf_id<'a>(field: &str, id: &'a str) -> Result<&'a str, DomainError> {
    let id = parse_new_id(field, id)?;
    if id == ALL_SHELVES {
        return Err(DomainError::bad_request(
            field,
            "'-' is reserved for listing books of all shelves",
        ));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;

    #[test]
    fn parses_well_formed_names() {
        assert_eq!(parse_shelf_name("parent", "shelves/fiction").unwrap(), "fiction");
        assert_eq!(parse_shelf_name("parent", "shelves/-").unwrap(), "-");
        assert_eq!(
            parse_book_name("name", "shelves/fiction/books/dune").unwrap(),
            ("fiction", "dune")
        );
        assert_eq!(
            parse_operation_name("name", "operations/shelves/fiction").unwrap(),
            "fiction"
        );
    }

    #[test]
    fn rejects_malformed_names_naming_the_field() {
        for (field, result) in [
            ("parent", parse_shelf_name("parent", "fiction").map(|_| ())),
            ("parent", parse_shelf_name("parent", "shelves/").map(|_| ())),
            ("parent", parse_shelf_name("parent", "books/fiction").map(|_| ())),
            ("name", parse_book_name("name", "shelves/fiction/dune").map(|_| ())),
            ("name", parse_book_name("name", "shelves/fiction/authors/dune").map(|_| ())),
            ("name", parse_operation_name("name", "operations/fiction").map(|_| ())),
        ] {
            let err = result.expect_err("malformed name must be rejected");
            assert_eq!(err.kind(), ErrorKind::BadRequest);
            assert!(matches!(err, DomainError::BadRequest { field: ref f, .. } if f == field));
        }
    }

    #[test]
    fn new_ids_cannot_nest() {
        assert!(parse_new_id("shelf.name", "fiction").is_ok());
        assert!(parse_new_id("shelf.name", "").is_err());
        assert!(parse_new_id("shelf.name", "a/b").is_err());
    }

    #[test]
    fn dash_is_not_a_shelf_id() {
        let err = parse_new_shelf_id("shelf.name", "-").expect_err("reserved");
        assert!(matches!(err, DomainError::BadRequest { ref field, .. } if field == "shelf.name"));
        assert!(parse_new_shelf_id("shelf.name", "fiction").is_ok());
        assert!(parse_new_shelf_id("shelf.name", "a/b").is_err());
        assert!(parse_new_id("book.name", "-").is_ok());
    }
}
