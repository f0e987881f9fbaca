//! Data models for the catalog

pub mod author;
pub mod book;
pub mod validation;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookDetails};
