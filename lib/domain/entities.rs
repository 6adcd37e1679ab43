use chrono::{DateTime, Utc};

use super::error::DomainError;

/// Prefix shared by every long-running operation resource name.
pub const OPERATIONS_PREFIX: &str = "operations/";
const SHELF_OPERATIONS_PREFIX: &str = "operations/shelves/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub name: String,
    pub author: String,
    /// Name of the owning shelf. Not an ownership relation.
    pub shelf: String,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl Book {
    /// Builds an input book carrying only user-editable fields.
    pub fn input(name: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            shelf: String::new(),
            create_time: DateTime::<Utc>::UNIX_EPOCH,
            update_time: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shelf {
    pub name: String,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl Shelf {
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            create_time: DateTime::<Utc>::UNIX_EPOCH,
            update_time: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// Externally reported view of a long-running job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub stage: &'static str,
    /// 0..=100
    pub percentage: u32,
    pub error: Option<DomainError>,
}

impl Operation {
    pub fn finished(&self) -> bool {
        self.percentage == 100 || self.error.is_some()
    }

    /// Name of the resource the operation acts on, e.g. `shelves/fiction`.
    pub fn resource_name(&self) -> &str {
        self.name
            .strip_prefix(OPERATIONS_PREFIX)
            .unwrap_or(&self.name)
    }
}

pub fn shelf_operation_name(shelf_name: &str) -> String {
    format!("{SHELF_OPERATIONS_PREFIX}{shelf_name}")
}

/// Recovers `{shelf}` from `operations/shelves/{shelf}`.
pub fn shelf_name_from_operation(operation_name: &str) -> Option<&str> {
    let shelf_name = operation_name.strip_prefix(SHELF_OPERATIONS_PREFIX)?;
    if shelf_name.is_empty() || shelf_name.contains('/') {
        return None;
    }
    Some(shelf_name)
}
