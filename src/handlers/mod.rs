// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (bearer token resolved to a user by the
// `require_auth` middleware)
pub mod public;
pub mod protected;
pub mod system;

use crate::error::ApiError;

/// Path ids that are not integers cannot name a row, so they read as missing.
pub(crate) fn parse_id(raw: &str, not_found: &'static str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::not_found(not_found))
}
