//! Types exchanged between the account portal API and its browser client

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use uuid::Uuid;

/// Routes of the account API, relative to the API base url
pub mod paths {
    /// Scope every account route is nested under
    pub const SCOPE: &str = "/api/v1/users";
    pub const REGISTER: &str = "/register";
    pub const LOGIN: &str = "/login";
    pub const CURRENT_USER: &str = "/me";
}

/// Login request body
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Register request body
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Role granted to an account. The lower case name is used in the dashboard path of the client.
#[derive(
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    AsRefStr,
    Default,
    PartialEq,
    Eq,
    Debug,
    Copy,
    Clone,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Path of the dashboard a user with this role lands on after login
    pub fn dashboard_path(self) -> String {
        format!("/{}/dashboard", self.as_ref())
    }
}

/// Successful login response
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Signed token proving the identity of the user
    pub token: String,
    pub role: Role,
}

/// Public view of an account
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub uid: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Claims carried by a session token
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenClaims {
    /// Account uid
    pub sub: Uuid,
    pub name: String,
    pub role: Role,
    /// Expiry as seconds since the unix epoch
    pub exp: usize,
}

impl TokenClaims {
    /// True if the token expired at or before `now` (seconds since the unix epoch)
    pub const fn is_expired_at(&self, now: usize) -> bool {
        self.exp <= now
    }
}

/// Identity of the current user as seen by the client. A guest has no uid or role.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserInfo {
    pub uid: Option<Uuid>,
    pub name: String,
    pub role: Option<Role>,
}

impl UserInfo {
    pub fn guest() -> Self {
        Self {
            uid: None,
            name: "Guest".to_owned(),
            role: None,
        }
    }

    pub const fn is_guest(&self) -> bool {
        self.uid.is_none()
    }

    /// Dashboard of the user's role. A guest has no dashboard.
    pub fn dashboard_path(&self) -> Option<String> {
        self.role.map(Role::dashboard_path)
    }
}

impl Default for UserInfo {
    fn default() -> Self {
        Self::guest()
    }
}

impl From<TokenClaims> for UserInfo {
    fn from(claims: TokenClaims) -> Self {
        Self {
            uid: Some(claims.sub),
            name: claims.name,
            role: Some(claims.role),
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use rstest::rstest;
    use uuid::Uuid;

    use super::{Credentials, Role, TokenClaims, UserInfo};

    #[rstest]
    #[case::user(Role::User, "/user/dashboard")]
    #[case::admin(Role::Admin, "/admin/dashboard")]
    fn dashboard_path_should_use_role_name(#[case] role: Role, #[case] expected: &str) {
        assert_eq!(role.dashboard_path(), expected);
    }

    #[rstest]
    #[case("user", Role::User)]
    #[case("admin", Role::Admin)]
    fn role_should_parse_lowercase_name(#[case] name: &str, #[case] expected: Role) {
        assert_eq!(Role::from_str(name).ok(), Some(expected));
        assert_eq!(
            serde_json::to_string(&expected).expect("Failed to serialize role"),
            format!("\"{name}\"")
        );
    }

    #[test]
    fn credentials_debug_should_redact_password() {
        let credentials = Credentials {
            email: "jane@example.com".to_owned(),
            password: "hunter2".to_owned(),
        };

        let debug = format!("{credentials:?}");

        assert!(debug.contains("jane@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn guest_should_have_no_dashboard() {
        let guest = UserInfo::guest();

        assert!(guest.is_guest());
        assert_eq!(guest.dashboard_path(), None);
    }

    #[test]
    fn user_info_from_claims_should_keep_identity() {
        let uid = Uuid::new_v4();
        let claims = TokenClaims {
            sub: uid,
            name: "Jane".to_owned(),
            role: Role::Admin,
            exp: 10,
        };

        let info = UserInfo::from(claims.clone());

        assert!(claims.is_expired_at(10));
        assert!(!claims.is_expired_at(9));
        assert_eq!(info.uid, Some(uid));
        assert_eq!(info.dashboard_path().as_deref(), Some("/admin/dashboard"));
    }
}
