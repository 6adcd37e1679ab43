use std::collections::BTreeSet;

use crate::domain::entities::Book;
use crate::domain::error::DomainError;
use crate::gateway::{BookGateway, Lookup};

const UPDATE_MASK_FIELD: &str = "update_mask";

/// Paths callers may list but that only the server writes.
const NOT_USER_UPDATABLE_FIELDS: [&str; 2] = ["create_time", "update_time"];

/// Book attributes a caller is allowed to modify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BookField {
    Name,
    Author,
}

impl BookField {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "name" => Some(Self::Name),
            "author" => Some(Self::Author),
            _ => None,
        }
    }
}

/// Set of attribute paths addressed by a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMask {
    pub paths: Vec<String>,
}

impl FieldMask {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Sorts and deduplicates paths, dropping any path covered by a shorter one
    /// (`a` covers `a.b`).
    pub fn normalize(&mut self) {
        let unique: BTreeSet<String> = self
            .paths
            .drain(..)
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .collect();

        let mut normalized: Vec<String> = Vec::with_capacity(unique.len());
        for path in unique {
            let covered = normalized
                .iter()
                .any(|parent| path.starts_with(parent.as_str()) && path[parent.len()..].starts_with('.'));
            if !covered {
                normalized.push(path);
            }
        }
        self.paths = normalized;
    }
}

#[derive(Clone)]
pub struct UpdateBook<G> {
    gateway: G,
}

impl<G: BookGateway> UpdateBook<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub async fn update(
        &self,
        shelf_name: &str,
        input_book: &Book,
        update_mask: Option<FieldMask>,
    ) -> Result<Book, DomainError> {
        let fields = user_updatable_fields(update_mask)?;

        let updated = self
            .gateway
            .update_book(shelf_name, input_book, &fields)
            .await
            .map_err(|e| {
                DomainError::internal(
                    format!(
                        "failed to update book {} at shelf {shelf_name}",
                        input_book.name
                    ),
                    e,
                )
            })?;

        match updated {
            Lookup::Found(book) => Ok(book),
            Lookup::Absent => Err(DomainError::not_found(format!(
                "book {} at shelf {shelf_name} not found",
                input_book.name
            ))),
        }
    }
}

/// Reduces a caller mask to the fields the gateway may write.
pub fn user_updatable_fields(update_mask: Option<FieldMask>) -> Result<Vec<BookField>, DomainError> {
    let Some(mut update_mask) = update_mask else {
        return Err(DomainError::bad_request(
            UPDATE_MASK_FIELD,
            "update_mask must contain book fields",
        ));
    };

    update_mask.normalize();

    let mut fields = Vec::new();
    for path in &update_mask.paths {
        if NOT_USER_UPDATABLE_FIELDS.contains(&path.as_str()) {
            continue;
        }
        match BookField::from_path(path) {
            Some(field) => fields.push(field),
            None => {
                return Err(DomainError::bad_request(
                    UPDATE_MASK_FIELD,
                    format!("unknown book field {path}"),
                ))
            }
        }
    }

    if fields.is_empty() {
        return Err(DomainError::bad_request(
            UPDATE_MASK_FIELD,
            "update_mask doesn't have any valid fields to update",
        ));
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;

    #[test]
    fn normalize_sorts_dedupes_and_drops_covered_paths() {
        let mut mask = FieldMask::new(["author", "name", "author", "shelf.name", "shelf", " "]);
        mask.normalize();
        assert_eq!(mask.paths, vec!["author", "name", "shelf"]);
    }

    #[test]
    fn missing_mask_is_bad_request() {
        let err = user_updatable_fields(None).expect_err("missing mask must fail");
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(err.to_string().contains("update_mask"));
    }

    #[test]
    fn timestamps_are_filtered_out() {
        let fields = user_updatable_fields(Some(FieldMask::new([
            "create_time",
            "author",
            "update_time",
        ])))
        .expect("author is updatable");
        assert_eq!(fields, vec![BookField::Author]);
    }

    #[test]
    fn mask_with_only_timestamps_is_bad_request() {
        let err = user_updatable_fields(Some(FieldMask::new(["create_time", "update_time"])))
            .expect_err("nothing left to update");
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn unknown_path_is_bad_request() {
        let err = user_updatable_fields(Some(FieldMask::new(["author", "isbn"])))
            .expect_err("isbn is not a book field");
        assert!(err.to_string().contains("isbn"));
    }
}
