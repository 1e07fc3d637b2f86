use std::fmt::Debug;

use actix_web::{http::StatusCode, HttpResponse, Responder, ResponseError};
use log::{error, warn};
use serde::{Deserialize, Serialize};

use super::{ApiContentFormat, ApiResponseBody};
use crate::error::{PortalError, PortalResult};

/// Message returned in place of internal error details
const INTERNAL_ERROR_MESSAGE: &str = "Could not perform the required action due to an internal error";

/// Deserializable wrapper for allowing an API caller to choose the format of an [ApiResponse].
/// This type should be used in a route handler to deserialize a url query with the template of
/// `?f={format}`.
#[derive(Deserialize, Default)]
pub struct QueryApiFormat {
    #[serde(default)]
    pub f: ApiContentFormat,
}

impl ApiContentFormat {
    pub fn from_mime(value: &mime::Mime) -> Option<Self> {
        if value.subtype() == mime::JSON || value.suffix() == Some(mime::JSON) {
            return Some(Self::Json);
        }
        if value.subtype() == mime::MSGPACK || value.suffix() == Some(mime::MSGPACK) {
            return Some(Self::MessagePack);
        }
        None
    }

    /// Serialize the `body` into bytes using the current format
    /// # Errors
    /// This function will return an error if the `body` cannot be serialized
    pub fn to_vec<T: Serialize>(self, body: &T) -> PortalResult<Vec<u8>> {
        let bytes = match self {
            Self::Json => serde_json::to_vec(body)?,
            Self::MessagePack => rmp_serde::to_vec_named(body)?,
        };
        Ok(bytes)
    }

    fn mime(self) -> mime::Mime {
        match self {
            Self::Json => mime::APPLICATION_JSON,
            Self::MessagePack => mime::APPLICATION_MSGPACK,
        }
    }
}

/// API response object to enable serializing a `body` using the specified `format`. This type
/// can be used as a [Responder] for HTTP route handlers. The status code is derived from the kind
/// of body unless specified otherwise.
pub struct ApiResponse<T: Serialize> {
    format: ApiContentFormat,
    status: StatusCode,
    body: ApiResponseBody<T>,
}

impl<T> Responder for ApiResponse<T>
where
    T: Serialize + 'static,
{
    type Body = actix_web::body::BoxBody;

    fn respond_to(self, req: &actix_web::HttpRequest) -> HttpResponse<Self::Body> {
        let bytes = match self.format.to_vec(&self.body) {
            Ok(inner) => inner,
            Err(error) => {
                let message = format!(
                    "Could not serialize response for {}. Error: {}",
                    req.path(),
                    error
                );
                error!("{}", message);
                return HttpResponse::InternalServerError()
                    .content_type(actix_web::http::header::ContentType::plaintext())
                    .body(message.into_bytes());
            }
        };
        HttpResponse::build(self.status)
            .content_type(actix_web::http::header::ContentType(self.format.mime()))
            .body(bytes)
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Generate an [ApiResponse] wrapping a [ApiResponseBody::Success]`
    pub const fn success(data: T, format: ApiContentFormat) -> Self {
        Self {
            format,
            status: StatusCode::OK,
            body: ApiResponseBody::Success(data),
        }
    }

    /// Generate an [ApiResponse] for operations that return a [PortalError]. Errors caused by the
    /// caller are downgraded to a [Failure][ApiResponseBody::Failure] with a message the user can
    /// understand. Internal errors are logged and replaced with a generic message.
    pub fn error(error: PortalError, format: ApiContentFormat) -> Self {
        let (status, body) = error_body(&error);
        Self {
            format,
            status,
            body,
        }
    }

    /// Reference to the body that will be sent
    pub const fn body(&self) -> &ApiResponseBody<T> {
        &self.body
    }

    /// Status code that will be sent
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

/// Map a [PortalError] to the status code and body sent back to the caller
fn error_body<T>(error: &PortalError) -> (StatusCode, ApiResponseBody<T>) {
    if !error.is_user_error() {
        error!("{}", error);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiResponseBody::Error(INTERNAL_ERROR_MESSAGE.to_owned()),
        );
    }
    let message = match error {
        PortalError::InvalidPayload(message) => message.clone(),
        PortalError::InvalidRequest { reason, .. } => reason.clone(),
        PortalError::RmpDecode(_) => "Could not decode the request object".to_owned(),
        _ => format!("{error}"),
    };
    warn!("{}", message);
    (error_status(error), ApiResponseBody::Failure(message))
}

/// Status code sent back for the `error`
const fn error_status(error: &PortalError) -> StatusCode {
    if !error.is_user_error() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match error {
        PortalError::InvalidUser | PortalError::InvalidToken { .. } => StatusCode::UNAUTHORIZED,
        PortalError::MissingRecord { .. } => StatusCode::NOT_FOUND,
        PortalError::DuplicateEmail => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    }
}

impl ResponseError for PortalError {
    fn status_code(&self) -> StatusCode {
        error_status(self)
    }

    fn error_response(&self) -> HttpResponse {
        let (status, body) = error_body::<()>(self);
        match serde_json::to_vec(&body) {
            Ok(bytes) => HttpResponse::build(status)
                .content_type(actix_web::http::header::ContentType::json())
                .body(bytes),
            Err(_) => HttpResponse::build(status).finish(),
        }
    }
}

/// Validator for api requests that should have the request data verified
pub trait ApiRequestValidator {
    /// Type of the error message that is returned by the [validate][ApiRequestValidator::validate]
    /// method. Must be able to converted to a [String].
    type ErrorMessage: Into<String>;
    /// Type of request this validator is processing. Must implement debug to convert into a
    /// [PortalError] type.
    type Request: Debug;
    /// Perform checks against the `request` to confirm it meets specified requirements. Returns an
    /// [Err] of a type that can be converted into a [String] if the request is not valid. Otherwise
    /// [Ok] is returned.
    /// # Errors
    /// This function will return an error if the `request` cannot be validated
    fn validate(request: &Self::Request) -> Result<(), Self::ErrorMessage>;
    /// Performs the implemented validation against the `request`, mapping the error (if any) into a
    /// specific validation [PortalError]. If the validation succeeds, [Ok] is returned.
    /// # Errors
    /// This function will return an error if the `request` cannot be validated
    fn validate_request(request: &Self::Request) -> PortalResult<()> {
        if let Err(error) = Self::validate(request) {
            return Err((request, error).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use actix_web::{body::to_bytes, http::StatusCode, test::TestRequest, Responder};
    use rstest::rstest;

    use super::{ApiContentFormat, ApiRequestValidator, ApiResponse};
    use crate::{api::ApiResponseBody, error::PortalError};

    #[rstest]
    #[case::json("application/json", Some(ApiContentFormat::Json))]
    #[case::json_suffix("application/problem+json", Some(ApiContentFormat::Json))]
    #[case::msgpack("application/msgpack", Some(ApiContentFormat::MessagePack))]
    #[case::text("text/plain", None)]
    fn from_mime_should_match(#[case] mime: &str, #[case] expected: Option<ApiContentFormat>) {
        let mime: mime::Mime = mime.parse().expect("Invalid mime in test case");

        assert_eq!(ApiContentFormat::from_mime(&mime), expected);
    }

    #[rstest]
    #[case::invalid_user(PortalError::InvalidUser, StatusCode::UNAUTHORIZED, "Invalid credentials")]
    #[case::duplicate(PortalError::DuplicateEmail, StatusCode::CONFLICT, "Email is already registered")]
    #[case::invalid_request(
        PortalError::InvalidRequest { request: "secret".to_owned(), reason: "Name cannot be empty".to_owned() },
        StatusCode::BAD_REQUEST,
        "Name cannot be empty",
    )]
    #[case::payload(
        PortalError::InvalidPayload("Could not read the request body.".to_owned()),
        StatusCode::BAD_REQUEST,
        "Could not read the request body.",
    )]
    fn error_should_downgrade_user_errors(
        #[case] error: PortalError,
        #[case] status: StatusCode,
        #[case] message: &str,
    ) {
        let response = ApiResponse::<()>::error(error, ApiContentFormat::Json);

        assert_eq!(response.status(), status);
        assert_eq!(response.body(), &ApiResponseBody::Failure(message.to_owned()));
    }

    #[rstest]
    #[case::password(PortalError::PasswordHash("salt too short".to_owned()))]
    #[case::generic(PortalError::Generic("Could not get an expiration date for jwt salt".to_owned()))]
    fn error_should_hide_internal_errors(#[case] error: PortalError) {
        let response = ApiResponse::<()>::error(error, ApiContentFormat::Json);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let ApiResponseBody::Error(message) = response.body() else {
            panic!("Expected an error body");
        };
        assert!(!message.contains("salt"), "Internal details leaked: {message}");
    }

    #[actix_web::test]
    async fn responder_should_write_json_envelope() {
        let request = TestRequest::default().to_http_request();
        let response = ApiResponse::success("token", ApiContentFormat::Json).respond_to(&request);

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body())
            .await
            .expect("Failed to read response body");
        assert_eq!(&bytes[..], br#"{"type":"Success","data":"token"}"#);
    }

    struct NonEmpty;

    impl ApiRequestValidator for NonEmpty {
        type ErrorMessage = &'static str;
        type Request = String;

        fn validate(request: &Self::Request) -> Result<(), Self::ErrorMessage> {
            if request.is_empty() {
                return Err("Value cannot be empty");
            }
            Ok(())
        }
    }

    #[test]
    fn validate_request_should_map_to_invalid_request() {
        let result = NonEmpty::validate_request(&String::new());

        assert!(matches!(
            result,
            Err(PortalError::InvalidRequest { reason, .. }) if reason == "Value cannot be empty"
        ));
        assert!(NonEmpty::validate_request(&"value".to_owned()).is_ok());
    }
}
