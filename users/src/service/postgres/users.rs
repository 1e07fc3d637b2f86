use common::{
    database::is_unique_violation,
    error::{PortalError, PortalResult},
    utils::normalize_email,
};
use portal_common::{Credentials, Registration, Role};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use crate::{
    data::user::{User, UserRow},
    password::{hash_password, reject_unknown_user, verify_password},
    service::users::UserService,
};

/// Postgresql implementation of [UserService]
#[derive(Clone)]
pub struct PgUserService {
    /// Postgres database connection pool used by this service
    pool: PgPool,
}

impl PgUserService {
    /// Fetch the raw row of the user with the normalized `email`, if any
    async fn read_by_email(&self, email: &str) -> PortalResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            select u.uid, u.name, u.email, u.password_hash, u.role
            from portal_users u
            where u.email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from).transpose()
    }
}

impl UserService for PgUserService {
    type Database = Postgres;

    fn new(pool: &Pool<Self::Database>) -> Self {
        Self { pool: pool.clone() }
    }

    async fn register(&self, request: &Registration) -> PortalResult<User> {
        let email = normalize_email(&request.email);
        let password_hash = hash_password(&request.password)?;
        let role: &'static str = Role::default().into();
        let result = sqlx::query_as::<_, UserRow>(
            r#"
            insert into portal_users (uid, name, email, password_hash, role)
            values ($1, $2, $3, $4, $5)
            returning uid, name, email, password_hash, role"#,
        )
        .bind(Uuid::new_v4())
        .bind(request.name.trim())
        .bind(&email)
        .bind(&password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await;
        match result {
            Ok(row) => User::try_from(row),
            Err(error) if is_unique_violation(&error) => Err(PortalError::DuplicateEmail),
            Err(error) => Err(error.into()),
        }
    }

    async fn validate_user(&self, request: &Credentials) -> PortalResult<User> {
        let email = normalize_email(&request.email);
        let Some(user) = self.read_by_email(&email).await? else {
            return Err(reject_unknown_user(&request.password));
        };
        verify_password(&request.password, &user.password_hash)?;
        Ok(user)
    }

    async fn read_one(&self, uid: &Uuid) -> PortalResult<User> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            select u.uid, u.name, u.email, u.password_hash, u.role
            from portal_users u
            where u.uid = $1"#,
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => User::try_from(row),
            None => Err(PortalError::MissingRecord {
                id: uid.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use common::error::{PortalError, PortalResult};
    use portal_common::{Credentials, Registration, Role};
    use rstest::rstest;
    use sqlx::PgPool;
    use uuid::Uuid;

    use super::PgUserService;
    use crate::{
        database::ensure_schema,
        service::{postgres::test::database, users::UserService},
    };

    /// Cleanup function for users that are created during tests
    async fn cleanup_user(email: &str, pool: &PgPool) -> PortalResult<()> {
        sqlx::query("delete from portal_users where email = $1")
            .bind(email)
            .execute(pool)
            .await?;
        Ok(())
    }

    fn registration(email: &str) -> Registration {
        Registration {
            name: "Mr Test".to_owned(),
            email: email.to_owned(),
            password: "Test1!".to_owned(),
        }
    }

    #[rstest]
    #[ignore = "requires a test database (PORTAL_TEST_DB_*)"]
    #[tokio::test]
    async fn register_then_validate_should_succeed(database: &PgPool) -> PortalResult<()> {
        ensure_schema(database).await?;
        let service = PgUserService::new(database);
        let email = format!("{}@example.com", Uuid::new_v4());

        let registered = service.register(&registration(&email.to_uppercase())).await;
        let validated = service
            .validate_user(&Credentials {
                email: email.clone(),
                password: "Test1!".to_owned(),
            })
            .await;
        cleanup_user(&email, database).await?;

        let registered = registered?;
        assert_eq!(registered.email(), email);
        assert_eq!(registered.role(), Role::User);
        assert_eq!(validated?.uid(), registered.uid());
        Ok(())
    }

    #[rstest]
    #[ignore = "requires a test database (PORTAL_TEST_DB_*)"]
    #[tokio::test]
    async fn register_should_fail_when_email_exists(database: &PgPool) -> PortalResult<()> {
        ensure_schema(database).await?;
        let service = PgUserService::new(database);
        let email = format!("{}@example.com", Uuid::new_v4());

        let first = service.register(&registration(&email)).await;
        let second = service.register(&registration(&email)).await;
        cleanup_user(&email, database).await?;

        first?;
        assert!(matches!(second, Err(PortalError::DuplicateEmail)));
        Ok(())
    }

    #[rstest]
    #[case::unknown_email(false, "Test1!")]
    #[case::wrong_password(true, "Wrong1!")]
    #[ignore = "requires a test database (PORTAL_TEST_DB_*)"]
    #[tokio::test]
    async fn validate_user_should_fail_when(
        database: &PgPool,
        #[case] registered: bool,
        #[case] password: &str,
    ) -> PortalResult<()> {
        ensure_schema(database).await?;
        let service = PgUserService::new(database);
        let email = format!("{}@example.com", Uuid::new_v4());
        if registered {
            service.register(&registration(&email)).await?;
        }

        let result = service
            .validate_user(&Credentials {
                email: email.clone(),
                password: password.to_owned(),
            })
            .await;
        cleanup_user(&email, database).await?;

        assert!(matches!(result, Err(PortalError::InvalidUser)));
        Ok(())
    }
}
