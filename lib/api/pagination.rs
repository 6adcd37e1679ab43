//! Opaque page tokens: base64 of the decimal offset of the next page.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::domain::error::DomainError;

pub const DEFAULT_PAGE_SIZE: i64 = 10;

const PAGE_TOKEN_FIELD: &str = "page_token";

fn invalid_page_token() -> DomainError {
    DomainError::bad_request(
        PAGE_TOKEN_FIELD,
        "page_token must be a previously returned next_page_token",
    )
}

/// Zero selects the default size.
pub fn page_size(requested: i32) -> Result<i64, DomainError> {
    match requested {
        0 => Ok(DEFAULT_PAGE_SIZE),
        size if size < 0 => Err(DomainError::bad_request(
            "page_size",
            "page_size must not be negative",
        )),
        size => Ok(i64::from(size)),
    }
}

/// Empty token starts at the first item.
pub fn page_offset(page_token: &str) -> Result<i64, DomainError> {
    if page_token.is_empty() {
        return Ok(0);
    }

    let decoded = STANDARD.decode(page_token).map_err(|err| {
        tracing::warn!(page_token, error = %err, "failed to decode base64 page_token");
        invalid_page_token()
    })?;

    let offset = std::str::from_utf8(&decoded)
        .ok()
        .and_then(|digits| digits.parse::<i64>().ok())
        .filter(|offset| *offset >= 0);

    offset.ok_or_else(|| {
        tracing::warn!(page_token, "page_token does not hold an offset");
        invalid_page_token()
    })
}

/// Offset of the page after this one. Rejects tokens too large to advance.
pub fn page_end(page_offset: i64, page_size: i64) -> Result<i64, DomainError> {
    page_offset.checked_add(page_size).ok_or_else(|| {
        tracing::warn!(page_offset, page_size, "page_token offset overflows");
        invalid_page_token()
    })
}

pub fn next_page_token(next_offset: i64) -> String {
    STANDARD.encode(next_offset.to_string())
}
