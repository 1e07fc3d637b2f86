#[cfg(feature = "actix")]
pub mod actix;
#[cfg(feature = "actix")]
pub mod request;

use serde::{Deserialize, Serialize};

#[cfg(feature = "actix")]
pub use self::actix::{ApiRequestValidator, ApiResponse, QueryApiFormat};
#[cfg(feature = "actix")]
pub use self::request::{ApiRequest, ApiRequestConfig};

/// Format variants that an API response supports for serialization and deserialization of API
/// content
#[derive(Default, Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiContentFormat {
    #[default]
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "msgpack")]
    MessagePack,
}

/// Generic response body for an API response. A response is either a success containing data, a
/// message to let the user know what happened or an error/failure message.
///
/// `Failure` is reserved for problems the caller can fix (bad input, bad credentials) and carries a
/// message that is safe to show to an end user. `Error` is an internal failure.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum ApiResponseBody<T> {
    Success(T),
    Message(String),
    Failure(String),
    Error(String),
}

#[cfg(test)]
mod test {
    use super::ApiResponseBody;

    #[test]
    fn body_should_serialize_as_tagged_json() {
        let body = ApiResponseBody::Success(5);

        let json = serde_json::to_string(&body).expect("Failed to serialize body");

        assert_eq!(json, r#"{"type":"Success","data":5}"#);
    }

    #[test]
    fn failure_should_deserialize_from_tagged_json() {
        let json = r#"{"type":"Failure","data":"Invalid credentials"}"#;

        let body: ApiResponseBody<()> =
            serde_json::from_str(json).expect("Failed to deserialize body");

        assert_eq!(body, ApiResponseBody::Failure("Invalid credentials".to_owned()));
    }
}
