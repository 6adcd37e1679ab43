use chrono::Utc;
use diesel::insert_into;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use futures::future::BoxFuture;

use super::{BookGateway, GatewayError, Insert, Lookup, Page, ShelfGateway};
use crate::db::models;
use crate::db::schema::{books, shelves};
use crate::domain::books::BookField;
use crate::domain::entities::{Book, Shelf};

/// Postgres-backed storage used by the production runtime.
#[derive(Clone)]
pub struct PgGateway {
    pool: Pool<AsyncPgConnection>,
}

impl PgGateway {
    pub fn new(pool: Pool<AsyncPgConnection>) -> Self {
        Self { pool }
    }
}

/// Splits key violations out of insert failures so callers see them as values.
fn classify_insert_error<T>(error: DieselError) -> Result<Insert<T>, GatewayError> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => Ok(Insert::Conflict),
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            Ok(Insert::ParentMissing)
        }
        other => Err(other.into()),
    }
}

fn found_or_absent<T, R: Into<T>>(row: Option<R>) -> Lookup<T> {
    match row {
        Some(row) => Lookup::Found(row.into()),
        None => Lookup::Absent,
    }
}

impl ShelfGateway for PgGateway {
    fn create_shelf<'a>(
        &'a self,
        shelf: &'a Shelf,
    ) -> BoxFuture<'a, Result<Insert<Shelf>, GatewayError>> {
        Box::pin(async move {
            let mut conn = self.pool.get().await?;
            let now = Utc::now();
            let row = models::Shelf {
                name: shelf.name.clone(),
                create_time: now,
                update_time: now,
            };

            let inserted = insert_into(shelves::table)
                .values(&row)
                .returning(models::Shelf::as_returning())
                .get_result(&mut conn)
                .await;

            match inserted {
                Ok(row) => Ok(Insert::Created(row.into())),
                Err(error) => classify_insert_error(error),
            }
        })
    }

    fn get_shelf<'a>(
        &'a self,
        shelf_name: &'a str,
    ) -> BoxFuture<'a, Result<Lookup<Shelf>, GatewayError>> {
        Box::pin(async move {
            let mut conn = self.pool.get().await?;
            let row: Option<models::Shelf> = shelves::table
                .find(shelf_name)
                .select(models::Shelf::as_select())
                .first(&mut conn)
                .await
                .optional()?;

            Ok(found_or_absent(row))
        })
    }
}

impl BookGateway for PgGateway {
    fn list_books(&self, page: Page) -> BoxFuture<'_, Result<Vec<Book>, GatewayError>> {
        Box::pin(async move {
            let mut conn = self.pool.get().await?;
            let rows: Vec<models::Book> = books::table
                .order((books::create_time, books::shelf_name, books::name))
                .limit(page.size)
                .offset(page.offset)
                .select(models::Book::as_select())
                .load(&mut conn)
                .await?;

            Ok(rows.into_iter().map(Book::from).collect())
        })
    }

    fn list_shelf_books<'a>(
        &'a self,
        shelf_name: &'a str,
        page: Page,
    ) -> BoxFuture<'a, Result<Vec<Book>, GatewayError>> {
        Box::pin(async move {
            let mut conn = self.pool.get().await?;
            let rows: Vec<models::Book> = books::table
                .filter(books::shelf_name.eq(shelf_name))
                .order((books::create_time, books::name))
                .limit(page.size)
                .offset(page.offset)
                .select(models::Book::as_select())
                .load(&mut conn)
                .await?;

            Ok(rows.into_iter().map(Book::from).collect())
        })
    }

    fn count_books(&self) -> BoxFuture<'_, Result<i64, GatewayError>> {
        Box::pin(async move {
            let mut conn = self.pool.get().await?;
            let count: i64 = books::table.count().get_result(&mut conn).await?;
            Ok(count)
        })
    }

    fn count_shelf_books<'a>(
        &'a self,
        shelf_name: &'a str,
    ) -> BoxFuture<'a, Result<i64, GatewayError>> {
        Box::pin(async move {
            let mut conn = self.pool.get().await?;
            let count: i64 = books::table
                .filter(books::shelf_name.eq(shelf_name))
                .count()
                .get_result(&mut conn)
                .await?;
            Ok(count)
        })
    }

    fn get_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book_name: &'a str,
    ) -> BoxFuture<'a, Result<Lookup<Book>, GatewayError>> {
        Box::pin(async move {
            let mut conn = self.pool.get().await?;
            let row: Option<models::Book> = books::table
                .find((shelf_name, book_name))
                .select(models::Book::as_select())
                .first(&mut conn)
                .await
                .optional()?;

            Ok(found_or_absent(row))
        })
    }

    fn create_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book: &'a Book,
    ) -> BoxFuture<'a, Result<Insert<Book>, GatewayError>> {
        Box::pin(async move {
            let mut conn = self.pool.get().await?;
            let now = Utc::now();
            let row = models::Book {
                shelf_name: shelf_name.to_string(),
                name: book.name.clone(),
                author: book.author.clone(),
                create_time: now,
                update_time: now,
            };

            let inserted = insert_into(books::table)
                .values(&row)
                .returning(models::Book::as_returning())
                .get_result(&mut conn)
                .await;

            match inserted {
                Ok(row) => Ok(Insert::Created(row.into())),
                Err(error) => classify_insert_error(error),
            }
        })
    }

    fn update_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book: &'a Book,
        fields: &'a [BookField],
    ) -> BoxFuture<'a, Result<Lookup<Book>, GatewayError>> {
        Box::pin(async move {
            let mut changes = models::BookChangeset {
                update_time: Some(Utc::now()),
                ..Default::default()
            };
            for field in fields {
                match field {
                    BookField::Name => changes.name = Some(book.name.clone()),
                    BookField::Author => changes.author = Some(book.author.clone()),
                }
            }

            let mut conn = self.pool.get().await?;
            let row: Option<models::Book> =
                diesel::update(books::table.find((shelf_name, book.name.as_str())))
                    .set(&changes)
                    .returning(models::Book::as_returning())
                    .get_result(&mut conn)
                    .await
                    .optional()?;

            Ok(found_or_absent(row))
        })
    }

    fn delete_book<'a>(
        &'a self,
        shelf_name: &'a str,
        book_name: &'a str,
    ) -> BoxFuture<'a, Result<Lookup<()>, GatewayError>> {
        Box::pin(async move {
            let mut conn = self.pool.get().await?;
            let deleted = diesel::delete(books::table.find((shelf_name, book_name)))
                .execute(&mut conn)
                .await?;

            if deleted == 0 {
                Ok(Lookup::Absent)
            } else {
                Ok(Lookup::Found(()))
            }
        })
    }
}
