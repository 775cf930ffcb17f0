// handlers/public/auth/mod.rs - Public authentication handlers
use serde::Serialize;

use crate::api::UserView;
use crate::services::Session;

pub mod login;    // POST /auth/login - authenticate and get JWT
pub mod register; // POST /auth/register - create new account

pub use login::login_post;
pub use register::register_post;

/// `{ token, user }` returned by both endpoints.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub token: String,
    pub user: UserView,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        Self {
            user: UserView::from(&session.user),
            token: session.token,
        }
    }
}
