pub mod error;
pub mod filter_order;
pub mod filter_where;
pub mod pagination;
pub mod types;

pub use error::FilterError;
pub use filter_where::{escape_like, fold_case, parse_status, BookFilter};
pub use pagination::{Page, PageMeta, PageRequest};
pub use types::*;
