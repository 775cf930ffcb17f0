pub mod books;
pub mod collection;

pub use books::get as tag_books_get;
pub use collection::get as tags_get;
