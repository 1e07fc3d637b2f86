use common::database::{postgres::PgConnectionBuilder, ConnectionBuilder};
use log::{error, info};
use users::database::{db_options, ensure_schema};

#[tokio::main]
async fn main() {
    if let Err(error) = log4rs::init_file("users/users_db_build_log.yml", Default::default()) {
        eprintln!("Could not initialize logging. {error}");
        return;
    }
    let options = match db_options() {
        Ok(inner) => inner,
        Err(error) => {
            error!("Error fetching database options. {error}");
            return;
        }
    };
    let pool = match PgConnectionBuilder::create_pool(options, 1, 1).await {
        Ok(inner) => inner,
        Err(error) => {
            error!("Could not connect to the database. {error}");
            return;
        }
    };
    match ensure_schema(&pool).await {
        Ok(()) => info!("Database build complete"),
        Err(error) => error!("Database build failed. {error}"),
    }
}
