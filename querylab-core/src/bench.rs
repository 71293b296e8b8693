//! Timed traversal passes
//!
//! Every pass walks all books and materialises the related names, so the
//! lazy and the eager strategy do the same observable work. Timings are a
//! single wall-clock sample; nothing here asserts on them.

use std::io::Write;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::Result;
use crate::query;
use crate::report::Console;
use crate::seed::{self, SeedOutcome, SeedPlan};
use crate::store::Session;

/// Which relations a run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Book → author only
    Basic,
    /// Book → author, then book → categories
    Extended,
}

/// `(book id, author name)`
pub type AuthorVisit = (i64, String);

/// `(book id, category names sorted)`
pub type CategoryVisit = (i64, Vec<String>);

/// One pass, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    AuthorLazy,
    AuthorJoined,
    CategoryLazy,
    CategoryPrefetched,
}

impl PassKind {
    fn running(self) -> &'static str {
        match self {
            PassKind::AuthorLazy => "Running slow query (N+1 problem)...",
            PassKind::AuthorJoined => "Running optimized query (using a join)...",
            PassKind::CategoryLazy => "Running slow category query (N+1 problem)...",
            PassKind::CategoryPrefetched => {
                "Running optimized category query (using a batched prefetch)..."
            }
        }
    }

    fn subject(self) -> &'static str {
        match self {
            PassKind::AuthorLazy => "Slow query",
            PassKind::AuthorJoined => "Optimized query",
            PassKind::CategoryLazy => "Slow category query",
            PassKind::CategoryPrefetched => "Optimized category query",
        }
    }

    fn is_optimized(self) -> bool {
        matches!(self, PassKind::AuthorJoined | PassKind::CategoryPrefetched)
    }
}

/// Result of one traversal
#[derive(Debug, Clone)]
pub struct PassReport<T> {
    pub elapsed: Duration,
    pub round_trips: u64,
    pub visits: Vec<T>,
}

impl<T> PassReport<T> {
    pub fn records(&self) -> usize {
        self.visits.len()
    }

    fn summary(&self, kind: PassKind) -> PassSummary {
        PassSummary {
            kind,
            elapsed: self.elapsed,
            round_trips: self.round_trips,
            records: self.records(),
        }
    }
}

/// Timing line data for one pass of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub kind: PassKind,
    pub elapsed: Duration,
    pub round_trips: u64,
    pub records: usize,
}

impl PassSummary {
    /// `"<subject> took <secs> seconds for <n> books."`
    pub fn message(&self) -> String {
        format!(
            "{} took {:.4} seconds for {} books.",
            self.kind.subject(),
            self.elapsed.as_secs_f64(),
            self.records
        )
    }
}

/// Everything a run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub seed: SeedOutcome,
    pub passes: Vec<PassSummary>,
}

struct PassTimer {
    start: Instant,
    round_trips: u64,
}

impl PassTimer {
    fn start(session: &Session) -> Self {
        Self {
            start: Instant::now(),
            round_trips: session.round_trips(),
        }
    }

    fn finish<T>(self, session: &Session, visits: Vec<T>) -> PassReport<T> {
        PassReport {
            elapsed: self.start.elapsed(),
            round_trips: session.round_trips() - self.round_trips,
            visits,
        }
    }
}

/// Book → author, one extra round trip per book.
pub async fn author_pass_lazy(session: &mut Session) -> Result<PassReport<AuthorVisit>> {
    let timer = PassTimer::start(session);
    let books = query::lazy_books(session).await?;

    let mut visits = Vec::with_capacity(books.len());
    for book in &books {
        let author = book.author(session).await?;
        visits.push((book.book().id, author.name));
    }

    Ok(timer.finish(session, visits))
}

/// Book → author through a join, one round trip in total.
pub async fn author_pass_joined(session: &mut Session) -> Result<PassReport<AuthorVisit>> {
    let timer = PassTimer::start(session);
    let books = query::books_with_author(session).await?;

    let visits = books
        .iter()
        .map(|book| (book.book().id, book.author().name.clone()))
        .collect();

    Ok(timer.finish(session, visits))
}

/// Book → categories, one extra round trip per book.
pub async fn category_pass_lazy(session: &mut Session) -> Result<PassReport<CategoryVisit>> {
    let timer = PassTimer::start(session);
    let books = query::lazy_books(session).await?;

    let mut visits = Vec::with_capacity(books.len());
    for book in &books {
        let categories = book.categories(session).await?;
        visits.push((
            book.book().id,
            sorted_names(categories.into_iter().map(|c| c.name)),
        ));
    }

    Ok(timer.finish(session, visits))
}

/// Book → categories with one batched secondary query.
pub async fn category_pass_prefetched(session: &mut Session) -> Result<PassReport<CategoryVisit>> {
    let timer = PassTimer::start(session);
    let books = query::books_with_categories(session).await?;

    let visits = books
        .iter()
        .map(|book| {
            (
                book.book().id,
                sorted_names(book.categories().iter().map(|c| c.name.clone())),
            )
        })
        .collect();

    Ok(timer.finish(session, visits))
}

fn sorted_names(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut names: Vec<String> = names.collect();
    names.sort();
    names
}

/// Seed-or-skip, then every pass of `variant` in order, reporting to `console`.
pub async fn run<W: Write>(
    session: &mut Session,
    variant: Variant,
    plan: &SeedPlan,
    console: &mut Console<W>,
) -> Result<RunSummary> {
    let seed = seed::seed(session, plan, variant, || {
        console.warning("No data found. Creating sample data...")
    })
    .await?;
    if seed.was_created() {
        console.success("Sample data created.")?;
    }

    let mut passes = Vec::new();

    console.notice(PassKind::AuthorLazy.running())?;
    let report = author_pass_lazy(session).await?;
    passes.push(report_pass(console, report.summary(PassKind::AuthorLazy))?);

    console.notice(PassKind::AuthorJoined.running())?;
    let report = author_pass_joined(session).await?;
    passes.push(report_pass(console, report.summary(PassKind::AuthorJoined))?);

    if variant == Variant::Extended {
        console.notice(PassKind::CategoryLazy.running())?;
        let report = category_pass_lazy(session).await?;
        passes.push(report_pass(console, report.summary(PassKind::CategoryLazy))?);

        console.notice(PassKind::CategoryPrefetched.running())?;
        let report = category_pass_prefetched(session).await?;
        passes.push(report_pass(
            console,
            report.summary(PassKind::CategoryPrefetched),
        )?);
    }

    Ok(RunSummary { seed, passes })
}

fn report_pass<W: Write>(console: &mut Console<W>, summary: PassSummary) -> Result<PassSummary> {
    debug!(
        pass = ?summary.kind,
        records = summary.records,
        round_trips = summary.round_trips,
        elapsed_ms = summary.elapsed.as_secs_f64() * 1000.0,
        "pass finished"
    );

    if summary.kind.is_optimized() {
        console.success(summary.message())?;
    } else {
        console.error(summary.message())?;
    }
    Ok(summary)
}
