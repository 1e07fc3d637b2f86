use std::{cell::RefCell, rc::Rc};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use gloo_storage::{LocalStorage, Storage};
use portal_common::{TokenClaims, UserInfo};
use thiserror::Error;

/// Key of the session token within the browser's local storage
pub const TOKEN_KEY: &str = "jwt";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Could not store the session token. {0}")]
pub struct SessionError(pub String);

/// Persistent storage of the session token
pub trait SessionStore {
    /// Stored token, if any. Unreadable storage is treated as empty.
    fn get(&self) -> Option<String>;
    /// Replace the stored token
    /// # Errors
    /// This function will return an error if the underlying storage rejects the write
    fn set(&self, token: &str) -> Result<(), SessionError>;
    fn clear(&self);
}

/// [SessionStore] backed by the browser's `localStorage`
#[derive(Clone, Copy, Default)]
pub struct LocalSessionStore;

impl SessionStore for LocalSessionStore {
    fn get(&self) -> Option<String> {
        LocalStorage::get::<String>(TOKEN_KEY).ok()
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        LocalStorage::set(TOKEN_KEY, token).map_err(|error| SessionError(error.to_string()))
    }

    fn clear(&self) {
        LocalStorage::delete(TOKEN_KEY);
    }
}

/// In memory [SessionStore]. Clones share the same token.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    token: Rc<RefCell<Option<String>>>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        *self.token.borrow_mut() = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) {
        self.token.borrow_mut().take();
    }
}

/// Owner of the client side session. Reads are always done against the store so every page sees
/// the latest token.
#[derive(Clone, Copy, Default)]
pub struct SessionManager<S> {
    store: S,
}

pub type BrowserSession = SessionManager<LocalSessionStore>;

impl<S> SessionManager<S>
where
    S: SessionStore,
{
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Persist the `token` then call `on_persisted`. If the store rejects the token, the callback
    /// is never called and the error is returned.
    /// # Errors
    /// This function will return an error if the token cannot be stored
    pub fn authenticate<F>(&self, token: &str, on_persisted: F) -> Result<(), SessionError>
    where
        F: FnOnce(),
    {
        if let Err(error) = self.store.set(token) {
            log::error!("{error}");
            return Err(error);
        }
        on_persisted();
        Ok(())
    }

    /// True if a decodable token is stored and has not expired
    pub fn is_authenticated(&self) -> bool {
        self.valid_claims().is_some()
    }

    /// Identity carried by the stored token, or a guest when there is no valid token
    pub fn user_info(&self) -> UserInfo {
        self.valid_claims().map(UserInfo::from).unwrap_or_default()
    }

    pub fn token(&self) -> Option<String> {
        self.store.get()
    }

    pub fn sign_out(&self) {
        self.store.clear();
    }

    fn valid_claims(&self) -> Option<TokenClaims> {
        let claims = decode_claims(&self.store.get()?)?;
        let now = usize::try_from(Utc::now().timestamp()).unwrap_or_default();
        if claims.is_expired_at(now) {
            log::info!("Stored session token has expired");
            return None;
        }
        Some(claims)
    }
}

/// Read the claims of a JWT without verifying its signature. The server is the only party that
/// validates tokens.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = match URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) {
        Ok(bytes) => bytes,
        Err(error) => {
            log::warn!("Session token payload is not base64. {error}");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(claims) => Some(claims),
        Err(error) => {
            log::warn!("Session token payload is not valid claims. {error}");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::cell::Cell;

    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use chrono::Utc;
    use portal_common::{Role, TokenClaims, UserInfo};
    use rstest::rstest;
    use uuid::Uuid;

    use super::{decode_claims, MemorySessionStore, SessionError, SessionManager, SessionStore};

    /// Store that rejects every write
    #[derive(Clone, Default)]
    pub(crate) struct FullSessionStore;

    impl SessionStore for FullSessionStore {
        fn get(&self) -> Option<String> {
            None
        }

        fn set(&self, _token: &str) -> Result<(), SessionError> {
            Err(SessionError("Quota exceeded".to_owned()))
        }

        fn clear(&self) {}
    }

    /// Build an unsigned token carrying `claims`, the same shape the server issues
    pub(crate) fn token_for(claims: &TokenClaims) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"typ":"JWT","alg":"HS256"}"#);
        let payload =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).expect("Failed to serialize claims"));
        format!("{header}.{payload}.signature")
    }

    pub(crate) fn claims(role: Role, expires_in: i64) -> TokenClaims {
        TokenClaims {
            sub: Uuid::new_v4(),
            name: "Jane".to_owned(),
            role,
            exp: (Utc::now().timestamp() + expires_in) as usize,
        }
    }

    #[test]
    fn authenticate_should_persist_before_callback() {
        let session = SessionManager::new(MemorySessionStore::default());
        let token = token_for(&claims(Role::User, 3600));
        let called = Cell::new(false);

        session
            .authenticate(&token, || {
                assert_eq!(session.token().as_deref(), Some(token.as_str()));
                called.set(true);
            })
            .expect("Failed to authenticate");

        assert!(called.get());
        assert!(session.is_authenticated());
    }

    #[test]
    fn authenticate_should_skip_callback_when_store_fails() {
        let session = SessionManager::new(FullSessionStore);
        let called = Cell::new(false);

        let result = session.authenticate("a.b.c", || called.set(true));

        assert!(result.is_err());
        assert!(!called.get());
        assert!(!session.is_authenticated());
    }

    #[rstest]
    #[case::user(Role::User)]
    #[case::admin(Role::Admin)]
    fn user_info_should_read_claims(#[case] role: Role) {
        let session = SessionManager::new(MemorySessionStore::default());
        let claims = claims(role, 3600);
        session
            .authenticate(&token_for(&claims), || {})
            .expect("Failed to authenticate");

        let info = session.user_info();

        assert_eq!(info.uid, Some(claims.sub));
        assert_eq!(info.role, Some(role));
        assert_eq!(info.dashboard_path(), Some(role.dashboard_path()));
    }

    #[test]
    fn empty_session_should_be_guest() {
        let session = SessionManager::new(MemorySessionStore::default());

        assert!(!session.is_authenticated());
        assert_eq!(session.user_info(), UserInfo::guest());
    }

    #[rstest]
    #[case::no_segments("garbage")]
    #[case::bad_base64("header.%%%.signature")]
    #[case::not_claims("header.eyJmb28iOjF9.signature")]
    fn malformed_token_should_degrade_to_guest(#[case] token: &str) {
        let session = SessionManager::new(MemorySessionStore::default());
        session
            .authenticate(token, || {})
            .expect("Failed to authenticate");

        assert!(decode_claims(token).is_none());
        assert!(!session.is_authenticated());
        assert_eq!(session.user_info(), UserInfo::guest());
    }

    #[test]
    fn expired_token_should_not_authenticate() {
        let session = SessionManager::new(MemorySessionStore::default());
        session
            .authenticate(&token_for(&claims(Role::Admin, -60)), || {})
            .expect("Failed to authenticate");

        assert!(session.token().is_some());
        assert!(!session.is_authenticated());
        assert!(session.user_info().is_guest());
    }

    #[test]
    fn sign_out_should_clear_token() {
        let store = MemorySessionStore::default();
        let session = SessionManager::new(store.clone());
        session
            .authenticate(&token_for(&claims(Role::User, 3600)), || {})
            .expect("Failed to authenticate");

        session.sign_out();

        assert_eq!(store.get(), None);
        assert!(!session.is_authenticated());
    }
}
