use common::{
    api::ApiRequestValidator,
    error::PortalResult,
    utils::is_valid_email,
};
use portal_common::{Credentials, Registration};
use sqlx::{Database, Pool};
use uuid::Uuid;

use crate::data::user::User;

/// Validator for a [Registration] request. The name must contain a non-whitespace character, the
/// email must look like an address and the password cannot be empty.
pub struct RegistrationValidator;

impl ApiRequestValidator for RegistrationValidator {
    type ErrorMessage = &'static str;
    type Request = Registration;

    fn validate(request: &Self::Request) -> Result<(), Self::ErrorMessage> {
        if request.name.trim().is_empty() {
            return Err("Name cannot be empty");
        }
        if !is_valid_email(request.email.trim()) {
            return Err("Email is not a valid address");
        }
        if request.password.is_empty() {
            return Err("Password cannot be empty");
        }
        Ok(())
    }
}

/// Service for account storage and credential checks
pub trait UserService: Clone + Send + Sync {
    type Database: Database;

    /// Create new instance of a [UserService] using the connection `pool`
    fn new(pool: &Pool<Self::Database>) -> Self;
    /// Create a new account with the default role. The email is normalized before storage.
    async fn register(&self, request: &Registration) -> PortalResult<User>;
    /// Find the account matching the `request` email and verify its password. Unknown emails and
    /// wrong passwords both fail with [InvalidUser][common::error::PortalError::InvalidUser].
    async fn validate_user(&self, request: &Credentials) -> PortalResult<User>;
    /// Read a single account by `uid`
    async fn read_one(&self, uid: &Uuid) -> PortalResult<User>;
}
