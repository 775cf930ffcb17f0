use crate::auth::password::{
    hash_password_blocking, verify_decoy_blocking, verify_password_blocking, PasswordError,
};
use crate::auth::{TokenError, TokenService};
use crate::database::models::{Registration, User, ValidationErrors};
use crate::database::{DatabaseError, UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// A freshly issued credential and the identity it names.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: UserRepository, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    pub async fn register(&self, email: Option<&str>, password: Option<&str>) -> Result<Session, AuthError> {
        let registration = Registration::validate(email, password).map_err(AuthError::Validation)?;

        if self.users.find_by_email(&registration.email).await?.is_some() {
            return Err(email_taken());
        }

        let digest = hash_password_blocking(registration.password).await?;
        let user = match self.users.create(&registration.email, &digest).await {
            Ok(user) => user,
            // Lost a race with a concurrent registration
            Err(DatabaseError::Conflict(_)) => return Err(email_taken()),
            Err(e) => return Err(e.into()),
        };

        let token = self.tokens.issue(user.id)?;
        Ok(Session { token, user })
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            // Same hashing cost as a wrong password, so timing doesn't reveal the account
            verify_decoy_blocking(password.to_string()).await?;
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password_blocking(password.to_string(), user.password_digest.clone()).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        Ok(Session { token, user })
    }
}

fn email_taken() -> AuthError {
    AuthError::Validation(ValidationErrors(vec!["Email has already been taken".to_string()]))
}
