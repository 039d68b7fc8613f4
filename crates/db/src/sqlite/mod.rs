//! SQLite-Backend-Implementierungen fuer alle Repository-Traits

pub mod checkpoints;
pub mod pool;
pub mod waiting;

pub use pool::SqliteDb;
