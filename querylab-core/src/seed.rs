//! Sample data seeding
//!
//! Seeding is guarded by a presence check: the basic variant seeds when no
//! author exists, the extended variant when no author OR no category exists.
//! A store holding authors but no categories therefore gets a second full set
//! of authors and books from the extended variant. That behaviour is kept as
//! is and covered by `test_authors_without_categories_reseeds_everything`.

use sqlx::{QueryBuilder, Sqlite};
use tracing::info;

use crate::bench::Variant;
use crate::error::Result;
use crate::model::{Author, Category};
use crate::store::Session;

/// Sizes of the generated dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPlan {
    pub authors: u32,
    pub books_per_author: u32,
    /// Only used by [`Variant::Extended`]
    pub categories: u32,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            authors: 5,
            books_per_author: 20,
            categories: 5,
        }
    }
}

/// What [`seed`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Skipped,
    Created {
        authors: u32,
        books: u32,
        categories: u32,
    },
}

impl SeedOutcome {
    pub fn was_created(&self) -> bool {
        matches!(self, SeedOutcome::Created { .. })
    }
}

/// Presence check deciding whether `variant` seeds.
async fn needs_seed(session: &mut Session, variant: Variant) -> Result<bool> {
    if session.count_authors().await? == 0 {
        return Ok(true);
    }
    match variant {
        Variant::Basic => Ok(false),
        Variant::Extended => Ok(session.count_categories().await? == 0),
    }
}

/// Seed the store unless the presence check for `variant` finds data.
///
/// `before_create` runs once the check has decided to seed and before any row
/// is written; its error aborts seeding.
pub async fn seed<F>(
    session: &mut Session,
    plan: &SeedPlan,
    variant: Variant,
    before_create: F,
) -> Result<SeedOutcome>
where
    F: FnOnce() -> Result<()>,
{
    if !needs_seed(session, variant).await? {
        return Ok(SeedOutcome::Skipped);
    }
    before_create()?;
    create(session, plan, variant).await
}

/// Write one full dataset for `variant` in a single transaction, without any presence check.
async fn create(session: &mut Session, plan: &SeedPlan, variant: Variant) -> Result<SeedOutcome> {
    info!(?variant, ?plan, "seeding sample data");

    let mut tx = session.begin().await?;

    let mut authors = Vec::with_capacity(plan.authors as usize);
    for i in 1..=plan.authors {
        let author: Author =
            sqlx::query_as("INSERT INTO authors (name) VALUES (?) RETURNING id, name")
                .bind(format!("Author {i}"))
                .fetch_one(&mut *tx)
                .await?;
        authors.push(author);
    }

    let mut categories = Vec::new();
    if variant == Variant::Extended {
        for k in 1..=plan.categories {
            let category: Category =
                sqlx::query_as("INSERT INTO categories (name) VALUES (?) RETURNING id, name")
                    .bind(format!("Category {k}"))
                    .fetch_one(&mut *tx)
                    .await?;
            categories.push(category);
        }
    }

    let mut books = 0;
    for author in &authors {
        let mut links: Vec<(i64, i64)> = Vec::new();

        for j in 1..=plan.books_per_author {
            let book_id: i64 =
                sqlx::query_scalar("INSERT INTO books (title, author_id) VALUES (?, ?) RETURNING id")
                    .bind(format!("Book {j} by {}", author.name))
                    .bind(author.id)
                    .fetch_one(&mut *tx)
                    .await?;
            books += 1;

            links.extend(rotated(&categories, j as usize).map(|c| (book_id, c.id)));
        }

        // One batched insert per author keeps the bind count small
        if !links.is_empty() {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new("INSERT INTO book_categories (book_id, category_id) ");
            builder.push_values(links, |mut row, (book_id, category_id)| {
                row.push_bind(book_id).push_bind(category_id);
            });
            builder.build().execute(&mut *tx).await?;
        }
    }

    tx.commit().await?;

    let outcome = SeedOutcome::Created {
        authors: authors.len() as u32,
        books,
        categories: categories.len() as u32,
    };
    info!(?outcome, "sample data created");
    Ok(outcome)
}

/// `items[offset % n..]` followed by `items[..offset % n]`
fn rotated<T>(items: &[T], offset: usize) -> impl Iterator<Item = &T> {
    let split = if items.is_empty() { 0 } else { offset % items.len() };
    items[split..].iter().chain(items[..split].iter())
}
