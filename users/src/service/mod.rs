use sqlx::{Database, Pool};

use self::users::UserService;

pub mod postgres;
pub mod users;

/// Create a [UserService] backed by the `pool` provided
pub fn create_users_service<U, D>(pool: &Pool<D>) -> U
where
    U: UserService<Database = D>,
    D: Database,
{
    U::new(pool)
}
