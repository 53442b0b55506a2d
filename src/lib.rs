pub mod config;
pub mod database;
pub mod dictionary;
pub mod error;
pub mod export;
pub mod models;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use models::{IntervalTable, ReviewFilter, ReviewScheduler, ReviewableWord, Word};
