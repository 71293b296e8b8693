//! querylab-core - seed a small author/book/category dataset and time the
//! N+1 access pattern against its eager-loading fixes.
//!
//! ```ignore
//! let store = Store::open(&DemoConfig::default()).await?;
//! let mut session = store.session().await?;
//! let mut console = Console::stdout();
//! bench::run(&mut session, Variant::Basic, &SeedPlan::default(), &mut console).await?;
//! ```

pub mod bench;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod report;
pub mod seed;
pub mod store;

pub use bench::{PassKind, PassReport, PassSummary, RunSummary, Variant};
pub use config::DemoConfig;
pub use error::{QueryLabError, Result};
pub use model::{Author, Book, Category};
pub use report::{Console, Severity};
pub use seed::{SeedOutcome, SeedPlan};
pub use store::{Session, Store};
