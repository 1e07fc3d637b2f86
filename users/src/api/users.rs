use actix_web::web::{Data, Query};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use common::{
    api::{ApiRequest, ApiRequestValidator, ApiResponse, QueryApiFormat},
    error::PortalError,
};
use log::info;
use portal_common::{Credentials, Registration, Session, UserProfile};

use crate::{
    auth::JwtKeys,
    service::users::{RegistrationValidator, UserService},
};

/// API endpoint to create a new account. Returns the public profile of the new user.
pub async fn register<U>(
    api_request: ApiRequest<Registration>,
    service: Data<U>,
    query: Query<QueryApiFormat>,
) -> ApiResponse<UserProfile>
where
    U: UserService,
{
    let format = query.into_inner().f;
    let request = api_request.into_inner();
    if let Err(error) = RegistrationValidator::validate_request(&request) {
        return ApiResponse::error(error, format);
    }
    match service.register(&request).await {
        Ok(user) => {
            info!("Registered user {}", user.uid());
            ApiResponse::success(user.profile(), format)
        }
        Err(error) => ApiResponse::error(error, format),
    }
}

/// API endpoint to validate a user's credentials. If successful, a signed token and the user's
/// role are returned.
pub async fn login<U>(
    api_request: ApiRequest<Credentials>,
    service: Data<U>,
    keys: Data<JwtKeys>,
    query: Query<QueryApiFormat>,
) -> ApiResponse<Session>
where
    U: UserService,
{
    let format = query.into_inner().f;
    let credentials = api_request.into_inner();
    let user = match service.validate_user(&credentials).await {
        Ok(user) => user,
        Err(error) => return ApiResponse::error(error, format),
    };
    match keys.create_token(&user) {
        Ok(token) => {
            info!("User {} logged in", user.uid());
            ApiResponse::success(
                Session {
                    token,
                    role: user.role(),
                },
                format,
            )
        }
        Err(error) => ApiResponse::error(error, format),
    }
}

/// API endpoint to read the profile of the user owning the bearer token
pub async fn current_user<U>(
    bearer: Option<BearerAuth>,
    service: Data<U>,
    keys: Data<JwtKeys>,
    query: Query<QueryApiFormat>,
) -> ApiResponse<UserProfile>
where
    U: UserService,
{
    let format = query.into_inner().f;
    let Some(bearer) = bearer else {
        let error = PortalError::InvalidToken {
            reason: "Missing bearer token".to_owned(),
        };
        return ApiResponse::error(error, format);
    };
    let claims = match keys.decode_token(bearer.token()) {
        Ok(claims) => claims,
        Err(error) => return ApiResponse::error(error, format),
    };
    match service.read_one(&claims.sub).await {
        Ok(user) => ApiResponse::success(user.profile(), format),
        Err(error) => ApiResponse::error(error, format),
    }
}
