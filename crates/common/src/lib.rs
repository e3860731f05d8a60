pub mod config;
pub mod indexer;
