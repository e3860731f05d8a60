pub mod error;
pub mod handler;
pub mod indexer;
pub mod provider;
pub mod recorder;
pub mod registry;
pub mod seaport;

#[cfg(test)]
pub(crate) mod testing;
