pub mod auth_service;
pub mod tag_service;

pub use auth_service::{AuthError, AuthService, Session};
pub use tag_service::{Attachment, TagService};
