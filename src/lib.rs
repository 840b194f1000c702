// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod compose;
pub mod config;
pub mod format;
pub mod query;
pub mod rack;
pub mod source;
pub mod store;
pub mod vocabulary;
