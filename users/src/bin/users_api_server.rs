use common::{
    database::{postgres::PgConnectionBuilder, ConnectionBuilder},
    error::PortalResult,
};
use log::{error, info};
use users::{
    api,
    auth::JwtKeys,
    config::ApiServerConfig,
    database::{db_options, ensure_schema},
    service::{create_users_service, postgres::users::PgUserService},
};

#[tokio::main]
async fn main() -> PortalResult<()> {
    let config = ApiServerConfig::from_env()?;
    log4rs::init_file(&config.log_config, Default::default())
        .map_err(|error| format!("Could not initialize logging. {error}"))?;
    let options = db_options()?;
    let pool = match PgConnectionBuilder::create_pool(options, 20, 10).await {
        Ok(pool) => {
            info!("Connected to database!");
            pool
        }
        Err(error) => {
            error!("Database connection failed! {error}");
            return Err(error);
        }
    };
    ensure_schema(&pool).await?;
    let users_service: PgUserService = create_users_service(&pool);
    let keys = JwtKeys::from_secret(config.jwt_secret.as_bytes());
    api::spawn_api_server(users_service, keys, &config).await?;
    Ok(())
}
