//! Lazy and eager access paths over books
//!
//! The loading strategy is part of the result type:
//! - [`LazyBook`] only knows its foreign key; resolving the author or the
//!   categories needs the [`Session`] and costs one round trip per call.
//! - [`BookWithAuthor`] and [`BookWithCategories`] carry their relations
//!   already; their accessors never touch the store.

use std::collections::HashMap;

use sqlx::Row;
use tracing::debug;

use crate::error::Result;
use crate::model::{Author, Book, Category};
use crate::store::Session;

/// Book whose relations are resolved on demand
#[derive(Debug, Clone)]
pub struct LazyBook {
    book: Book,
}

impl LazyBook {
    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Fetch the author row. One round trip per call.
    pub async fn author(&self, session: &mut Session) -> Result<Author> {
        let author = sqlx::query_as::<_, Author>("SELECT id, name FROM authors WHERE id = ?")
            .bind(self.book.author_id)
            .fetch_one(session.executor())
            .await?;
        Ok(author)
    }

    /// Fetch the linked categories, ordered by name. One round trip per call.
    pub async fn categories(&self, session: &mut Session) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name
            FROM categories c
            JOIN book_categories bc ON bc.category_id = c.id
            WHERE bc.book_id = ?
            ORDER BY c.name, c.id
            "#,
        )
        .bind(self.book.id)
        .fetch_all(session.executor())
        .await?;
        Ok(categories)
    }
}

/// Book loaded together with its author in the same round trip
#[derive(Debug, Clone)]
pub struct BookWithAuthor {
    book: Book,
    author: Author,
}

impl BookWithAuthor {
    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn author(&self) -> &Author {
        &self.author
    }
}

/// Book loaded together with all of its categories
#[derive(Debug, Clone)]
pub struct BookWithCategories {
    book: Book,
    categories: Vec<Category>,
}

impl BookWithCategories {
    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Linked categories, ordered by name
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

/// All books, relations unresolved. One round trip.
pub async fn lazy_books(session: &mut Session) -> Result<Vec<LazyBook>> {
    let books = sqlx::query_as::<_, Book>("SELECT id, title, author_id FROM books ORDER BY id")
        .fetch_all(session.executor())
        .await?;
    Ok(books.into_iter().map(|book| LazyBook { book }).collect())
}

/// All books with their author joined in. One round trip.
pub async fn books_with_author(session: &mut Session) -> Result<Vec<BookWithAuthor>> {
    let rows = sqlx::query(
        r#"
        SELECT b.id, b.title, b.author_id, a.name AS author_name
        FROM books b
        JOIN authors a ON a.id = b.author_id
        ORDER BY b.id
        "#,
    )
    .fetch_all(session.executor())
    .await?;

    rows.iter()
        .map(|row| {
            let author_id: i64 = row.try_get("author_id")?;
            Ok(BookWithAuthor {
                book: Book {
                    id: row.try_get("id")?,
                    title: row.try_get("title")?,
                    author_id,
                },
                author: Author {
                    id: author_id,
                    name: row.try_get("author_name")?,
                },
            })
        })
        .collect()
}

/// All books with their categories prefetched.
///
/// One round trip for the books, plus one secondary round trip fetching the
/// category links of all books at once. The second query is skipped when
/// there are no books.
pub async fn books_with_categories(session: &mut Session) -> Result<Vec<BookWithCategories>> {
    let books = sqlx::query_as::<_, Book>("SELECT id, title, author_id FROM books ORDER BY id")
        .fetch_all(session.executor())
        .await?;

    if books.is_empty() {
        return Ok(Vec::new());
    }

    // Semi-join instead of a bound id list: no SQLite variable limit to hit
    let rows = sqlx::query(
        r#"
        SELECT bc.book_id, c.id AS category_id, c.name AS category_name
        FROM book_categories bc
        JOIN categories c ON c.id = bc.category_id
        WHERE bc.book_id IN (SELECT id FROM books)
        ORDER BY bc.book_id, c.name, c.id
        "#,
    )
    .fetch_all(session.executor())
    .await?;

    let mut by_book: HashMap<i64, Vec<Category>> = HashMap::new();
    for row in &rows {
        let book_id: i64 = row.try_get("book_id")?;
        by_book.entry(book_id).or_default().push(Category {
            id: row.try_get("category_id")?,
            name: row.try_get("category_name")?,
        });
    }

    debug!(
        books = books.len(),
        links = rows.len(),
        "prefetched categories"
    );

    Ok(books
        .into_iter()
        .map(|book| {
            let categories = by_book.remove(&book.id).unwrap_or_default();
            BookWithCategories { book, categories }
        })
        .collect())
}
