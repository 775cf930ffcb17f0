pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{authenticate, require_auth, AuthRejection, CurrentUser};
pub use extract::ApiJson;
pub use response::{ApiResponse, ApiResult};
