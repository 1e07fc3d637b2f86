use actix_web::{
    dev::Payload, error::PayloadError, http::header, web::BytesMut, FromRequest, HttpMessage,
    HttpRequest,
};
use futures::{future::LocalBoxFuture, StreamExt};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use super::ApiContentFormat;
use crate::error::{PortalError, PortalResult};

/// Default maximum size of a request body (64kB)
const DEFAULT_LIMIT: usize = 65_536;

/// Generic API request containing the extracted body of a request object. This type is
/// constrained to requests that have a `Content-Type` header that matches the labels in the
/// [ApiContentFormat] enum. Otherwise, a failure response is returned before entering the route
/// handler body.
#[derive(Serialize, Deserialize)]
pub struct ApiRequest<T>(T);

impl<T> ApiRequest<T> {
    /// Extract the inner contents of the request after deserializing from a request
    #[allow(clippy::missing_const_for_fn)]
    pub fn into_inner(self) -> T {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum ApiRequestPayloadError {
    /// Payload size is bigger than allowed and the content length header was set
    #[error("API request payload ({length} bytes) is larger than allowed (limit: {limit} bytes).")]
    OverflowKnownLength { length: usize, limit: usize },
    /// Payload size is bigger than allowed but no content length header was set
    #[error("API request payload has exceeded limit ({limit} bytes).")]
    Overflow { limit: usize },
    #[error("Content type error. No content type included in request")]
    NoContentType,
    #[error("Content type error. Expected json or msgpack but got {:?}", _0.subtype())]
    ContentType(mime::Mime),
    #[error("Json deserialize error: {0}")]
    JsonDeserialize(#[from] serde_json::Error),
    #[error("Msgpack deserialize error: {0}")]
    MsgpackDeserialize(#[from] rmp_serde::decode::Error),
    #[error("Error that occur during reading payload: {0}")]
    Payload(#[from] PayloadError),
}

impl From<ApiRequestPayloadError> for PortalError {
    fn from(value: ApiRequestPayloadError) -> Self {
        Self::InvalidPayload(format!("Could not read the request body. {value}"))
    }
}

/// [ApiRequest] extractor configuration. Register as app data to override the defaults.
#[derive(Debug, Clone, Copy)]
pub struct ApiRequestConfig {
    limit: usize,
}

impl ApiRequestConfig {
    /// Set maximum accepted payload size
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    fn from_req(req: &HttpRequest) -> Self {
        req.app_data::<Self>().copied().unwrap_or_default()
    }
}

impl Default for ApiRequestConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

impl<T> FromRequest for ApiRequest<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = PortalError;
    type Future = LocalBoxFuture<'static, PortalResult<Self>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let path = req.path().to_owned();
        let limit = ApiRequestConfig::from_req(req).limit;
        let format = content_format(req, limit);
        let mut payload = payload.take();
        Box::pin(async move {
            let result = match format {
                Ok(format) => read_body(&mut payload, format, limit).await,
                Err(error) => Err(error),
            };
            result.map(ApiRequest).map_err(|error| {
                log::debug!("Failed to deserialize payload. Request path: {path}. {error}");
                error.into()
            })
        })
    }
}

/// Check the headers of the request before the body is read
fn content_format(
    req: &HttpRequest,
    limit: usize,
) -> Result<ApiContentFormat, ApiRequestPayloadError> {
    let Ok(Some(mime)) = req.mime_type() else {
        return Err(ApiRequestPayloadError::NoContentType);
    };
    let Some(format) = ApiContentFormat::from_mime(&mime) else {
        return Err(ApiRequestPayloadError::ContentType(mime));
    };
    let length = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|l| l.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok());
    match length {
        Some(length) if length > limit => {
            Err(ApiRequestPayloadError::OverflowKnownLength { length, limit })
        }
        _ => Ok(format),
    }
}

async fn read_body<T>(
    payload: &mut Payload,
    format: ApiContentFormat,
    limit: usize,
) -> Result<T, ApiRequestPayloadError>
where
    T: DeserializeOwned,
{
    let mut buf = BytesMut::with_capacity(8192);
    while let Some(chunk) = payload.next().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > limit {
            return Err(ApiRequestPayloadError::Overflow { limit });
        }
        buf.extend_from_slice(&chunk);
    }
    let result = match format {
        ApiContentFormat::Json => serde_json::from_slice(&buf)?,
        ApiContentFormat::MessagePack => rmp_serde::from_slice(&buf)?,
    };
    Ok(result)
}

#[cfg(test)]
mod test {
    use actix_web::{http::header, test::TestRequest, FromRequest};
    use serde::{Deserialize, Serialize};

    use super::{ApiRequest, ApiRequestConfig};
    use crate::error::PortalError;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Login {
        email: String,
        password: String,
    }

    fn login() -> Login {
        Login {
            email: "jane@example.com".to_owned(),
            password: "hunter2".to_owned(),
        }
    }

    #[actix_web::test]
    async fn extractor_should_read_json_body() {
        let body = serde_json::to_vec(&login()).expect("Failed to serialize login");
        let (req, mut payload) = TestRequest::post()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload(body)
            .to_http_parts();

        let request = ApiRequest::<Login>::from_request(&req, &mut payload)
            .await
            .expect("Failed to extract request");

        assert_eq!(request.into_inner(), login());
    }

    #[actix_web::test]
    async fn extractor_should_read_msgpack_body() {
        let body = rmp_serde::to_vec_named(&login()).expect("Failed to serialize login");
        let (req, mut payload) = TestRequest::post()
            .insert_header((header::CONTENT_TYPE, "application/msgpack"))
            .set_payload(body)
            .to_http_parts();

        let request = ApiRequest::<Login>::from_request(&req, &mut payload)
            .await
            .expect("Failed to extract request");

        assert_eq!(request.into_inner(), login());
    }

    #[actix_web::test]
    async fn extractor_should_reject_missing_content_type() {
        let (req, mut payload) = TestRequest::post()
            .set_payload("{}")
            .to_http_parts();

        let result = ApiRequest::<Login>::from_request(&req, &mut payload).await;

        assert!(matches!(result, Err(PortalError::InvalidPayload(_))));
    }

    #[actix_web::test]
    async fn extractor_should_reject_malformed_json() {
        let (req, mut payload) = TestRequest::post()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload(r#"{"email":"#)
            .to_http_parts();

        let result = ApiRequest::<Login>::from_request(&req, &mut payload).await;

        assert!(result.is_err());
    }

    #[actix_web::test]
    async fn extractor_should_reject_body_over_limit() {
        let body = serde_json::to_vec(&login()).expect("Failed to serialize login");
        let (req, mut payload) = TestRequest::post()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .app_data(ApiRequestConfig::default().limit(8))
            .set_payload(body)
            .to_http_parts();

        let result = ApiRequest::<Login>::from_request(&req, &mut payload).await;

        let Err(PortalError::InvalidPayload(message)) = result else {
            panic!("Expected the request to be rejected");
        };
        assert!(message.contains("8 bytes"));
    }
}
