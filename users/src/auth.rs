use chrono::{Days, Utc};
use common::error::{PortalError, PortalResult};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use portal_common::TokenClaims;

use crate::data::user::User;

/// Number of days a session token stays valid
const TOKEN_LIFETIME_DAYS: u64 = 7;

/// Keys used to sign and verify session tokens (HS256)
#[derive(Clone)]
pub struct JwtKeys {
    /// Key used when issuing tokens
    encoding: EncodingKey,
    /// Key used when validating tokens
    decoding: DecodingKey,
}

impl JwtKeys {
    /// Create a new key pair from a shared `secret`
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for the `user`, expiring after the token lifetime
    /// # Errors
    /// This function will return an error if an expiration date cannot be computed or the token
    /// cannot be signed
    pub fn create_token(&self, user: &User) -> PortalResult<String> {
        let expiry = Utc::now()
            .checked_add_days(Days::new(TOKEN_LIFETIME_DAYS))
            .ok_or("Could not get an expiration date for jwt")?;
        let claims = TokenClaims {
            sub: user.uid,
            name: user.name.clone(),
            role: user.role,
            exp: usize::try_from(expiry.timestamp())
                .map_err(|_| "Expiration date is before the unix epoch")?,
        };
        self.encode_claims(&claims)
    }

    /// Sign arbitrary `claims`
    /// # Errors
    /// This function will return an error if the claims cannot be serialized or signed
    pub fn encode_claims(&self, claims: &TokenClaims) -> PortalResult<String> {
        Ok(encode(&Header::default(), claims, &self.encoding)?)
    }

    /// Validate the signature and expiry of a `token` and return its claims
    /// # Errors
    /// This function will return [PortalError::InvalidToken] if the token is malformed, signed
    /// with another key or expired
    pub fn decode_token(&self, token: &str) -> PortalResult<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding, &Validation::default())
            .map(|token_data| token_data.claims)
            .map_err(|error| PortalError::InvalidToken {
                reason: error.to_string(),
            })
    }
}
