pub mod indexer;
pub mod range;
pub mod state;
pub mod types;
