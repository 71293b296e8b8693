//! Row types for the three demo tables

use sqlx::FromRow;

/// Parent entity
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

/// Child entity; always references exactly one author
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
}

/// Tag entity linked to books through `book_categories`
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
