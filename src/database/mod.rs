pub mod books;
pub mod manager;
pub mod models;
pub mod tags;
pub mod users;

pub use books::BookRepository;
pub use manager::{DatabaseError, DatabaseManager};
pub use tags::TagRepository;
pub use users::UserRepository;
