//! Command implementations for the querylab CLI

pub mod optimize;

pub use optimize::{run_optimize, StoreArgs};
