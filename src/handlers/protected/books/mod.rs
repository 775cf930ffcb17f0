pub mod collection;
pub mod record;
pub mod search;

// Re-export handler functions for use in routing
pub use collection::get as books_get;
pub use collection::post as books_post;
pub use record::delete as book_delete;
pub use record::get as book_get;
pub use record::patch as book_patch;
pub use search::get as books_search;
