use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{books, shelves};
use crate::domain::entities;

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = shelves)]
pub struct Shelf {
    pub name: String,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<Shelf> for entities::Shelf {
    fn from(row: Shelf) -> Self {
        Self {
            name: row.name,
            create_time: row.create_time,
            update_time: row.update_time,
        }
    }
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = books)]
pub struct Book {
    pub shelf_name: String,
    pub name: String,
    pub author: String,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<Book> for entities::Book {
    fn from(row: Book) -> Self {
        Self {
            name: row.name,
            author: row.author,
            shelf: row.shelf_name,
            create_time: row.create_time,
            update_time: row.update_time,
        }
    }
}

/// Partial update; `None` columns are left untouched.
#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = books)]
pub struct BookChangeset {
    pub name: Option<String>,
    pub author: Option<String>,
    pub update_time: Option<DateTime<Utc>>,
}
