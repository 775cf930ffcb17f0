pub mod format;

pub use format::{BookTags, BookView, TagRef, TagView, UserView};
