pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod extraction;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use db::create_pool;
pub use error::EngineError;
pub use extraction::ExtractionClient;
pub use service::{CreditOptimizer, Gstr2bMatcher, IngestionService};
