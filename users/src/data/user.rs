use std::str::FromStr;

use common::error::PortalError;
use portal_common::{Role, UserProfile};
use uuid::Uuid;

/// Account entity as stored by a [UserService][crate::service::users::UserService]
#[derive(Debug, Clone)]
pub struct User {
    /// Unique identifier of the user
    pub(crate) uid: Uuid,
    /// Display name given at registration
    pub(crate) name: String,
    /// Normalized email address. Unique across all users
    pub(crate) email: String,
    /// Role granted to the user
    pub(crate) role: Role,
    /// Argon2 PHC string of the user's password
    pub(crate) password_hash: String,
}

impl User {
    /// Returns a reference to the user's uid
    pub const fn uid(&self) -> &Uuid {
        &self.uid
    }

    /// Returns a string slice of the user's email
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the role granted to the user
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Public view of the user, without credentials
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            uid: self.uid,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Raw user row as selected from the database. The role is stored as its lower case name.
#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    /// Unique identifier of the user
    uid: Uuid,
    /// Display name given at registration
    name: String,
    /// Normalized email address
    email: String,
    /// Argon2 PHC string of the user's password
    password_hash: String,
    /// Lower case role name
    role: String,
}

impl TryFrom<UserRow> for User {
    type Error = PortalError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(&row.role).map_err(|error| {
            sqlx::Error::Decode(format!("invalid value {:?} for role. {error}", row.role).into())
        })?;
        Ok(Self {
            uid: row.uid,
            name: row.name,
            email: row.email,
            role,
            password_hash: row.password_hash,
        })
    }
}
