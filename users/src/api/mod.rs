use actix_cors::Cors;
use actix_web::{
    http::header,
    middleware::Logger,
    web::{self, get, post, Data},
    App, HttpServer,
};
use common::{api::ApiRequestConfig, error::PortalResult};
use log::info;
use portal_common::paths;

pub mod users;

use crate::{auth::JwtKeys, config::ApiServerConfig, service::users::UserService};

/// Largest accepted request body. Account requests are a few short strings.
const REQUEST_BODY_LIMIT: usize = 16_384;

/// Register the account routes for a [UserService] implementation. The service and [JwtKeys]
/// must be provided as app data.
pub fn configure<U>(config: &mut web::ServiceConfig)
where
    U: UserService + 'static,
{
    config.service(
        web::scope(paths::SCOPE)
            .route(paths::REGISTER, post().to(users::register::<U>))
            .route(paths::LOGIN, post().to(users::login::<U>))
            .route(paths::CURRENT_USER, get().to(users::current_user::<U>)),
    );
}

/// Build the CORS policy that lets the browser client at `origin` call the API
fn cors(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .max_age(3600)
}

/// Run the users API server. Creates all the required endpoints and resources and blocks until
/// the server stops.
/// # Errors
/// This function will return an error if the server is unable to bind to the configured address or
/// the server's `run` method returns an error
pub async fn spawn_api_server<U>(
    users_service: U,
    keys: JwtKeys,
    config: &ApiServerConfig,
) -> PortalResult<()>
where
    U: UserService + 'static,
{
    let users_service_data: Data<U> = Data::new(users_service);
    let keys_data: Data<JwtKeys> = Data::new(keys);
    let origin = config.client_origin.clone();
    info!("App running on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors(&origin))
            .app_data(users_service_data.clone())
            .app_data(keys_data.clone())
            .app_data(ApiRequestConfig::default().limit(REQUEST_BODY_LIMIT))
            .configure(configure::<U>)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;
    Ok(())
}
