use common::api::ApiResponseBody;
use gloo_net::http::{Request, Response};
use portal_common::{paths, Credentials, Registration, Session, UserProfile};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::session::SessionError;

/// Message shown to the user for every failure that is not a rejection from the API
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!";

/// Base url of the account API. Overridden at build time with `PORTAL_API_URL`.
pub const API_URL: &str = match option_env!("PORTAL_API_URL") {
    Some(url) => url,
    None => "http://127.0.0.1:3001",
};

/// Calls that do not require a session
pub trait AuthApi {
    /// Exchange `credentials` for a session token
    /// # Errors
    /// This function will return an error if the request fails or the API rejects the credentials
    async fn login(&self, credentials: &Credentials) -> Result<Session>;
    /// Create a new account
    /// # Errors
    /// This function will return an error if the request fails or the API rejects the registration
    async fn register(&self, registration: &Registration) -> Result<UserProfile>;
}

#[derive(Clone, Copy)]
pub struct HttpAuthApi {
    url: &'static str,
}

impl HttpAuthApi {
    pub const fn new(url: &'static str) -> Self {
        Self { url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}{path}", self.url, paths::SCOPE)
    }

    /// Client for the calls that require the bearer `token`
    pub fn authorized(&self, token: String) -> AuthorizedApi {
        AuthorizedApi::new(self.url, token)
    }
}

impl Default for HttpAuthApi {
    fn default() -> Self {
        Self::new(API_URL)
    }
}

impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let response = Request::post(&self.endpoint(paths::LOGIN))
            .json(credentials)?
            .send()
            .await?;
        parse_response(response).await
    }

    async fn register(&self, registration: &Registration) -> Result<UserProfile> {
        let response = Request::post(&self.endpoint(paths::REGISTER))
            .json(registration)?
            .send()
            .await?;
        parse_response(response).await
    }
}

#[derive(Clone)]
pub struct AuthorizedApi {
    url: &'static str,
    token: String,
}

impl AuthorizedApi {
    pub fn new(url: &'static str, token: String) -> Self {
        Self { url, token }
    }

    /// Profile of the user owning the token, as validated by the server
    /// # Errors
    /// This function will return an error if the request fails or the server rejects the token
    pub async fn current_user(&self) -> Result<UserProfile> {
        let url = format!("{}{}{}", self.url, paths::SCOPE, paths::CURRENT_USER);
        self.send(Request::get(&url)).await
    }

    fn auth_header_value(&self) -> String {
        format!("Bearer {}", self.token)
    }

    async fn send<T>(&self, req: Request) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = req
            .header("Authorization", &self.auth_header_value())
            .send()
            .await?;
        parse_response(response).await
    }
}

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] gloo_net::Error),
    #[error("API error\n{0}")]
    ApiError(String),
    #[error("Could not decode the API response. {0}")]
    Decode(#[from] serde_json::Error),
    #[error("API request failed with status {0}")]
    Status(u16),
    #[error("Expecting data but got message")]
    UnexpectedMessage,
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl Error {
    /// Text displayed by a form. Rejections from the API are shown verbatim, anything else gets
    /// the generic message.
    pub fn user_message(&self) -> String {
        match self {
            Self::ApiError(message) => message.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_owned(),
        }
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Self::ApiError(value.to_owned())
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Self::ApiError(value)
    }
}

async fn parse_response<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned,
{
    let ok = response.ok();
    let status = response.status();
    let text = response.text().await?;
    decode_body(ok, status, &text)
}

/// Interpret a response `text` using the envelope. A 2xx response must be an envelope. Any other
/// response falls back to its raw text when it is not an envelope.
fn decode_body<T>(ok: bool, status: u16, text: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    match serde_json::from_str::<ApiResponseBody<T>>(text) {
        Ok(ApiResponseBody::Success(data)) => Ok(data),
        Ok(ApiResponseBody::Message(message)) => {
            log::debug!("{message}");
            Err(Error::UnexpectedMessage)
        }
        Ok(ApiResponseBody::Failure(message) | ApiResponseBody::Error(message)) => {
            Err(message.into())
        }
        Err(error) if ok => Err(error.into()),
        Err(_) if text.trim().is_empty() => Err(Error::Status(status)),
        Err(_) => Err(text.into()),
    }
}
